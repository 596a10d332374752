use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ListRequest<'a> {
    pub prefix: &'a str,
    pub limit: usize,
    pub offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteRequest<'a> {
    pub prefixes: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StorageObject {
    pub name: String,
    /// Absent for folder placeholders
    #[serde(default)]
    pub metadata: Option<ObjectMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ObjectMetadata {
    #[serde(default)]
    pub size: u64,
}
