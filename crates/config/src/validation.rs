use super::errors::ConfigError;
use super::models::{Config, DatasourceConfig};

impl Config {
    /// Checks the section selected by `datasource.type`.
    /// Unknown types pass here and are rejected when the datasource is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.datasource.validate()
    }
}

impl DatasourceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.kind.as_str() {
            "local" => {
                let local = self.section(&self.local)?;
                require("datasource.local.directory", &local.directory)?;
            }
            "s3" => {
                let s3 = self.section(&self.s3)?;
                require("datasource.s3.access_key_id", &s3.access_key_id)?;
                require("datasource.s3.secret_access_key", &s3.secret_access_key)?;
                require("datasource.s3.bucket", &s3.bucket)?;
                if let Some(endpoint) = &s3.endpoint {
                    require_url("datasource.s3.endpoint", endpoint)?;
                }
            }
            "supabase" => {
                let supabase = self.section(&self.supabase)?;
                require_url("datasource.supabase.url", &supabase.url)?;
                require("datasource.supabase.key", &supabase.key)?;
                require("datasource.supabase.bucket", &supabase.bucket)?;
            }
            "ddrv" => {
                let ddrv = self.section(&self.ddrv)?;
                require_url("datasource.ddrv.url", &ddrv.url)?;
                require("datasource.ddrv.key", &ddrv.key)?;
                require("datasource.ddrv.bucket", &ddrv.bucket)?;
                require("datasource.ddrv.parrent_bucket", &ddrv.parrent_bucket)?;
            }
            other => tracing::debug!("Datasource type '{}' has no section checks", other),
        }
        Ok(())
    }

    fn section<'a, T>(&self, section: &'a Option<T>) -> Result<&'a T, ConfigError> {
        section
            .as_ref()
            .ok_or_else(|| ConfigError::MissingSection(self.kind.clone()))
    }
}

fn require(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidConfig(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_url(field: &str, value: &str) -> Result<(), ConfigError> {
    require(field, value)?;
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(ConfigError::InvalidConfig(format!(
            "{} must start with http:// or https:// (got '{}')",
            field, value
        )));
    }
    Ok(())
}
