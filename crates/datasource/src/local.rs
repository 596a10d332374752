use crate::datasource::{ByteStream, Datasource};
use crate::errors::{DatasourceError, Result};
use bytes::Bytes;
use filedock_filesystem::FileSystem;
use futures::{StreamExt, TryStreamExt};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tokio_util::io::ReaderStream;

/// In-flight saves live next to the objects under this prefix
const TEMP_PREFIX: &str = ".filedock-tmp-";

/// Local filesystem datasource; every object is one file directly under `root`
pub struct LocalDatasource {
    root: PathBuf,
}

impl LocalDatasource {
    pub async fn new(directory: impl AsRef<Path>) -> Result<Self> {
        let root = FileSystem::ensure_directory(directory.as_ref(), "Datasource root").await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps an object name to its file, `None` if nothing of the name survives flattening
    fn path_for(&self, name: &str) -> Option<PathBuf> {
        FileSystem::flatten_name(name).map(|file| self.root.join(file))
    }
}

#[async_trait::async_trait]
impl Datasource for LocalDatasource {
    fn name(&self) -> &'static str {
        "Local"
    }

    fn target(&self) -> String {
        self.root.display().to_string()
    }

    async fn save(&self, name: &str, data: Bytes) -> Result<()> {
        let dest = self
            .path_for(name)
            .ok_or_else(|| DatasourceError::InvalidName(name.to_string()))?;

        // Each save gets its own temp file; the rename makes the last writer win
        let root = self.root.clone();
        let target = dest.clone();
        let len = data.len();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = tempfile::Builder::new()
                .prefix(TEMP_PREFIX)
                .tempfile_in(&root)?;
            tmp.write_all(&data)?;
            tmp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(std::io::Error::other)??;

        tracing::debug!("Saved {} ({} bytes)", dest.display(), len);
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<ByteStream>> {
        let Some(path) = self.path_for(name) else {
            return Ok(None);
        };

        match tokio::fs::File::open(&path).await {
            Ok(file) => Ok(Some(
                ReaderStream::new(file).map_err(DatasourceError::from).boxed(),
            )),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let Some(path) = self.path_for(name) else {
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> Result<()> {
        FileSystem::reset_directory(&self.root).await?;
        Ok(())
    }

    async fn size(&self, name: &str) -> Result<Option<u64>> {
        let Some(path) = self.path_for(name) else {
            return Ok(None);
        };

        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(Some(metadata.len())),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn full_size(&self) -> Result<u64> {
        let mut total = 0;
        let mut entries = tokio::fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_name().to_string_lossy().starts_with(TEMP_PREFIX) {
                continue;
            }
            let metadata = entry.metadata().await?;
            if metadata.is_file() {
                total += metadata.len();
            }
        }

        Ok(total)
    }
}
