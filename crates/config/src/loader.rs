use super::defaults::DEFAULT_CONFIG_TEMPLATE;
use super::errors::ConfigError;
use super::migration::migrate_config_if_needed;
use super::models::Config;
use std::path::Path;
use std::sync::Arc;

impl Config {
    /// Loads configuration from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Self::from_file_with_events(path, None).await
    }

    /// Loads configuration from a file with optional event bus for notifications
    pub async fn from_file_with_events<P: AsRef<Path>>(
        path: P,
        events: Option<&Arc<filedock_events::EventBus>>,
    ) -> anyhow::Result<Self> {
        let path = path.as_ref();

        // Create default config if it doesn't exist
        if !path.exists() {
            create_default_config(path).await?;
        }

        // Migrate config if needed
        migrate_config_if_needed(path, events).await?;

        let content = tokio::fs::read_to_string(path).await?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Parses and validates configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

/// Creates a default configuration file
async fn create_default_config<P: AsRef<Path>>(path: P) -> anyhow::Result<()> {
    tokio::fs::write(path.as_ref(), DEFAULT_CONFIG_TEMPLATE).await?;
    tracing::debug!("Wrote default configuration to {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_creates_default_local_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filedock.toml");

        let config = Config::from_file(&path).await.unwrap();

        assert!(path.exists());
        assert_eq!(config.datasource.kind, "local");
        assert_eq!(
            config.datasource.local.unwrap().directory,
            "./uploads".to_string()
        );
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.core.request_timeout_secs, 0);
    }

    #[test]
    fn test_parse_ddrv_config() {
        let config = Config::from_toml_str(
            r#"
            [datasource]
            type = "ddrv"

            [datasource.ddrv]
            url = "http://localhost:2525"
            key = "secret"
            bucket = "dir-1"
            parrent_bucket = "root"
            "#,
        )
        .unwrap();

        let ddrv = config.datasource.ddrv.unwrap();
        assert_eq!(ddrv.bucket, "dir-1");
        assert_eq!(ddrv.parrent_bucket, "root");
        assert_eq!(ddrv.directory_name, "zipline");
    }

    #[test]
    fn test_unknown_type_is_left_to_selector() {
        let config = Config::from_toml_str(
            r#"
            [datasource]
            type = "ftp"
            "#,
        )
        .unwrap();

        assert_eq!(config.datasource.kind, "ftp");
    }
}
