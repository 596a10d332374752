use serde::{Deserialize, Serialize};

/// One entry of a ddrv directory listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub size: u64,
    /// Sub-directories share the listing with files
    #[serde(default)]
    pub dir: bool,
}

/// `GET /api/directories/{id}` payload
#[derive(Debug, Deserialize)]
pub(crate) struct DirectoryListing {
    #[serde(default)]
    pub files: Vec<RemoteFile>,
}

/// `POST /api/directories/` payload
#[derive(Debug, Deserialize)]
pub(crate) struct CreatedDirectory {
    pub id: String,
}

/// `GET /api/directories/{id}/files/{file}` payload
#[derive(Debug, Deserialize)]
pub(crate) struct FileMetadata {
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateDirectoryRequest<'a> {
    pub name: &'a str,
    pub parent: &'a str,
}

/// Success side of the `{data}` / `{error, message}` envelope
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}
