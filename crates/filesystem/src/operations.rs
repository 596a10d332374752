use super::models::FileSystem;
use std::io::Result;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

impl FileSystem {
    /// Creates `path` (and parents) if missing, returning its absolute form
    pub async fn ensure_directory(path: &Path, description: &str) -> Result<PathBuf> {
        let abs_path = Self::get_absolute_path(path)?;
        Self::create_directory(&abs_path, description).await?;
        Ok(abs_path)
    }

    /// Removes everything under `path` and leaves an empty directory behind
    pub async fn reset_directory(path: &Path) -> Result<()> {
        match fs::remove_dir_all(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        fs::create_dir_all(path).await?;
        Ok(())
    }

    /// Reduces an arbitrary object name to a single safe path component.
    /// Returns `None` when nothing usable is left.
    pub fn flatten_name(name: &str) -> Option<String> {
        let flattened: String = Path::new(&name.replace('\\', "/"))
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("_");

        if flattened.is_empty() {
            None
        } else {
            Some(flattened)
        }
    }

    async fn create_directory(path: &Path, description: &str) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
            tracing::debug!("    Created: {} ({})", path.display(), description);
        } else {
            tracing::debug!("    Exists:  {} ({})", path.display(), description);
        }
        Ok(())
    }

    pub fn get_absolute_path(path: &Path) -> Result<PathBuf> {
        let abs_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        Ok(abs_path)
    }

    pub fn get_absolute_path_string(path: &str) -> Result<String> {
        let path_buf = PathBuf::from(path);
        let abs = Self::get_absolute_path(&path_buf)?;
        Ok(abs.to_string_lossy().to_string())
    }
}
