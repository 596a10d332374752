use crate::datasource::{ByteStream, Datasource};
use bytes::Bytes;
use futures::StreamExt;

/// Never-failing wrappers around [`Datasource`].
///
/// Failures are logged and folded into empty or zero values: a missing
/// object, a remote error and a zero-byte object all look the same here.
#[async_trait::async_trait]
pub trait DatasourceExt: Datasource {
    async fn save_or_log(&self, name: &str, data: Bytes) {
        if let Err(e) = self.save(name, data).await {
            tracing::error!(datasource = self.name(), "save '{}' failed: {}", name, e);
        }
    }

    async fn get_or_empty(&self, name: &str) -> ByteStream {
        match self.get(name).await {
            Ok(Some(stream)) => stream,
            Ok(None) => {
                tracing::info!(datasource = self.name(), "'{}' not found", name);
                futures::stream::empty().boxed()
            }
            Err(e) => {
                tracing::error!(datasource = self.name(), "get '{}' failed: {}", name, e);
                futures::stream::empty().boxed()
            }
        }
    }

    async fn delete_or_log(&self, name: &str) {
        if let Err(e) = self.delete(name).await {
            tracing::error!(datasource = self.name(), "delete '{}' failed: {}", name, e);
        }
    }

    async fn clear_or_log(&self) {
        if let Err(e) = self.clear().await {
            tracing::error!(datasource = self.name(), "clear failed: {}", e);
        }
    }

    async fn size_or_zero(&self, name: &str) -> u64 {
        match self.size(name).await {
            Ok(size) => size.unwrap_or(0),
            Err(e) => {
                tracing::error!(datasource = self.name(), "size '{}' failed: {}", name, e);
                0
            }
        }
    }

    async fn full_size_or_zero(&self) -> u64 {
        self.full_size().await.unwrap_or_else(|e| {
            tracing::error!(datasource = self.name(), "full size failed: {}", e);
            0
        })
    }
}

impl<T: Datasource + ?Sized> DatasourceExt for T {}
