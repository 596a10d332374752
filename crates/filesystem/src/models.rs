/// Namespace for the path and directory helpers shared across crates
pub struct FileSystem;
