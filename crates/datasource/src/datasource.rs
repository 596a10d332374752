use crate::errors::Result;
use bytes::Bytes;
use futures::stream::BoxStream;

/// Lazily produced, forward-only object content
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Storage contract shared by every backend.
///
/// Objects are addressed by name inside one container (directory, bucket)
/// chosen by the backend's configuration. "Not found" is reported as
/// `Ok(None)` rather than as an error, so a zero-byte object and a missing
/// one stay distinguishable. Callers that need the historical
/// never-failing behaviour use [`crate::DatasourceExt`].
#[async_trait::async_trait]
pub trait Datasource: Send + Sync {
    /// Backend name used in log lines, e.g. `Ddrv`
    fn name(&self) -> &'static str;

    /// Identifies the container this instance writes to (bucket, directory)
    fn target(&self) -> String;

    /// Stores `data` under `name`, replacing previous content where the backend allows it
    async fn save(&self, name: &str, data: Bytes) -> Result<()>;

    /// Streams the object stored under `name`
    async fn get(&self, name: &str) -> Result<Option<ByteStream>>;

    /// Removes the object; a missing object is not an error
    async fn delete(&self, name: &str) -> Result<()>;

    /// Removes every object and leaves an empty, usable container
    async fn clear(&self) -> Result<()>;

    /// Byte size of the object under `name`
    async fn size(&self, name: &str) -> Result<Option<u64>>;

    /// Sum of the sizes of all non-directory objects in the container
    async fn full_size(&self) -> Result<u64>;
}
