use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "super::defaults::core_settings")]
    pub core: CoreSettings,
    #[serde(default = "super::defaults::logging_settings")]
    pub logging: LoggingSettings,
    pub datasource: DatasourceConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CoreSettings {
    /// Timeout applied to every remote datasource request, 0 = none
    #[serde(default = "super::defaults::request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// Filter used when RUST_LOG is not set
    #[serde(default = "super::defaults::logging_level")]
    pub level: String,
}

/// The `[datasource]` section: a `type` discriminator plus one sub-table
/// per backend kind. Only the sub-table matching `type` is required.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasourceConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<LocalConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Config>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supabase: Option<SupabaseConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ddrv: Option<DdrvConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocalConfig {
    #[serde(default = "super::defaults::local_directory")]
    pub directory: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct S3Config {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    #[serde(default = "super::defaults::s3_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, R2, ...)
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub force_path_style: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
    pub bucket: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DdrvConfig {
    pub url: String,
    /// Bearer token
    pub key: String,
    /// Id of the directory files are stored in
    pub bucket: String,
    /// Id of the directory the bucket is recreated under by `clear`
    pub parrent_bucket: String,
    #[serde(default = "super::defaults::ddrv_directory_name")]
    pub directory_name: String,
}
