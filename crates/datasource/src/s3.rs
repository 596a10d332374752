use crate::datasource::{ByteStream, Datasource};
use crate::errors::{DatasourceError, Result};
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::{primitives::ByteStream as S3ByteStream, Client};
use bytes::Bytes;
use filedock_config::S3Config;
use futures::{StreamExt, TryStreamExt};
use tokio_util::io::ReaderStream;

/// Most keys a single DeleteObjects call accepts
const DELETE_BATCH: usize = 1000;

/// S3-compatible datasource
/// Compatible with: AWS S3, Cloudflare R2, MinIO, DigitalOcean Spaces, etc.
pub struct S3Datasource {
    client: Client,
    bucket: String,
}

impl S3Datasource {
    pub async fn new(config: &S3Config) -> Result<Self> {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "filedock-s3",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(config.region.clone()));
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style)
            .build();

        Ok(Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        })
    }

    /// Lists every key with its size, following continuation tokens
    async fn list_objects(&self) -> Result<Vec<(String, u64)>> {
        let mut objects = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let output = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| DatasourceError::S3SdkError(e.to_string()))?;

            for object in output.contents() {
                if let Some(key) = object.key() {
                    let size = object.size().unwrap_or(0).max(0) as u64;
                    objects.push((key.to_string(), size));
                }
            }

            match output.next_continuation_token() {
                Some(token) if output.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        Ok(objects)
    }
}

#[async_trait::async_trait]
impl Datasource for S3Datasource {
    fn name(&self) -> &'static str {
        "S3"
    }

    fn target(&self) -> String {
        self.bucket.clone()
    }

    async fn save(&self, name: &str, data: Bytes) -> Result<()> {
        tracing::info!("Uploading {} to S3 bucket {}", name, self.bucket);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(name)
            .body(S3ByteStream::from(data))
            .send()
            .await
            .map_err(|e| DatasourceError::UploadError(name.to_string(), e.to_string()))?;

        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<ByteStream>> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                if e.as_service_error().is_some_and(|err| err.is_no_such_key()) {
                    return Ok(None);
                }
                return Err(DatasourceError::S3SdkError(e.to_string()));
            }
        };

        let reader = output.body.into_async_read();
        Ok(Some(
            ReaderStream::new(reader).map_err(DatasourceError::from).boxed(),
        ))
    }

    async fn delete(&self, name: &str) -> Result<()> {
        tracing::info!("Deleting {} from S3 bucket {}", name, self.bucket);

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
            .map_err(|e| DatasourceError::DeleteError(name.to_string(), e.to_string()))?;

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let keys: Vec<String> = self.list_objects().await?.into_iter().map(|(key, _)| key).collect();

        for batch in keys.chunks(DELETE_BATCH) {
            let identifiers = batch
                .iter()
                .map(|key| ObjectIdentifier::builder().key(key).build())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| DatasourceError::S3SdkError(e.to_string()))?;

            let delete = Delete::builder()
                .set_objects(Some(identifiers))
                .quiet(true)
                .build()
                .map_err(|e| DatasourceError::S3SdkError(e.to_string()))?;

            self.client
                .delete_objects()
                .bucket(&self.bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|e| DatasourceError::S3SdkError(e.to_string()))?;
        }

        tracing::info!("Cleared {} objects from S3 bucket {}", keys.len(), self.bucket);
        Ok(())
    }

    async fn size(&self, name: &str) -> Result<Option<u64>> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
        {
            Ok(output) => Ok(Some(output.content_length().unwrap_or(0).max(0) as u64)),
            Err(e) if e.as_service_error().is_some_and(|err| err.is_not_found()) => Ok(None),
            Err(e) => Err(DatasourceError::S3SdkError(e.to_string())),
        }
    }

    async fn full_size(&self) -> Result<u64> {
        Ok(self.list_objects().await?.iter().map(|(_, size)| size).sum())
    }
}
