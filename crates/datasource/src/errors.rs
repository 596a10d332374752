use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatasourceError>;

#[derive(Error, Debug)]
pub enum DatasourceError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("{error}: {message}")]
    RemoteError { error: String, message: String },

    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[cfg(feature = "s3")]
    #[error("S3 SDK error: {0}")]
    S3SdkError(String),

    #[cfg(feature = "s3")]
    #[error("Upload failed for '{0}': {1}")]
    UploadError(String, String),

    #[cfg(feature = "s3")]
    #[error("Delete failed for '{0}': {1}")]
    DeleteError(String, String),

    #[error("Invalid object name: '{0}'")]
    InvalidName(String),

    #[error("Invalid datasource type: {0}")]
    UnknownKind(String),

    #[error("Invalid datasource configuration: {0}")]
    ConfigError(String),

    #[error("Container '{bucket}' was deleted but could not be recreated: {source}")]
    ClearDiverged {
        bucket: String,
        #[source]
        source: Box<DatasourceError>,
    },
}
