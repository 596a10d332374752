/// Default values for configuration fields

pub fn request_timeout_secs() -> u64 {
    0 // 0 = no timeout
}

pub fn core_settings() -> super::models::CoreSettings {
    super::models::CoreSettings {
        request_timeout_secs: request_timeout_secs(),
    }
}

pub fn logging_level() -> String {
    "info".to_string()
}

pub fn logging_settings() -> super::models::LoggingSettings {
    super::models::LoggingSettings {
        level: logging_level(),
    }
}

pub fn datasource_type() -> String {
    "local".to_string()
}

pub fn local_directory() -> String {
    "./uploads".to_string()
}

pub fn s3_region() -> String {
    "us-east-1".to_string()
}

pub fn ddrv_directory_name() -> String {
    "zipline".to_string()
}

pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# ===============================================================================
# filedock Configuration
# ===============================================================================

[core]
request_timeout_secs = 0             # Timeout for remote datasource requests (0 = none)

[logging]
level = "info"                       # Default log filter when RUST_LOG is unset

# ===============================================================================
# DATASOURCE
# ===============================================================================
[datasource]
type = "local"                       # Datasource: "local" | "s3" | "supabase" | "ddrv"

[datasource.local]
directory = "./uploads"              # Directory uploaded files are written to

# S3 / S3-compatible object storage (only used if type = "s3")
#[datasource.s3]
#access_key_id = ""
#secret_access_key = ""
#bucket = "filedock"
#region = "us-east-1"
#endpoint = "https://s3.amazonaws.com" # Optional, for MinIO / R2 / Spaces
#force_path_style = false

# Supabase Storage (only used if type = "supabase")
#[datasource.supabase]
#url = "https://project.supabase.co"
#key = ""                            # Service role key
#bucket = "filedock"

# Ddrv (only used if type = "ddrv")
#[datasource.ddrv]
#url = "http://localhost:2525"
#key = ""                            # Bearer token
#bucket = ""                         # Directory id files are stored in
#parrent_bucket = ""                 # Directory id the bucket is recreated under on clear
#directory_name = "zipline"          # Name given to the recreated directory
"#;
