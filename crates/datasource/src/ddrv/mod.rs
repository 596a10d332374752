//! Datasource backed by a ddrv file-directory server.
//!
//! ddrv addresses files by opaque id inside a directory, so every
//! name-addressed operation first lists the directory and resolves the name.

mod models;

pub use models::RemoteFile;

use self::models::{
    CreateDirectoryRequest, CreatedDirectory, DirectoryListing, Envelope, FileMetadata,
};
use crate::datasource::{ByteStream, Datasource};
use crate::errors::{DatasourceError, Result};
use crate::http;
use bytes::Bytes;
use filedock_config::DdrvConfig;
use futures::{StreamExt, TryStreamExt};
use parking_lot::RwLock;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

pub struct DdrvDatasource {
    config: DdrvConfig,
    client: reqwest::Client,
    /// Id of the directory in use; starts as `config.bucket` and follows
    /// the directory recreated by `clear`
    bucket: RwLock<String>,
}

impl DdrvDatasource {
    pub fn new(config: DdrvConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: DdrvConfig, client: reqwest::Client) -> Self {
        let bucket = RwLock::new(config.bucket.clone());
        Self {
            config,
            client,
            bucket,
        }
    }

    /// Id of the directory currently written to
    pub fn bucket(&self) -> String {
        self.bucket.read().clone()
    }

    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    fn directory_url(&self, bucket: &str) -> String {
        format!("{}/api/directories/{}", self.base_url(), bucket)
    }

    fn file_url(&self, bucket: &str, id: &str) -> String {
        format!("{}/files/{}", self.directory_url(bucket), id)
    }

    fn download_url(&self, id: &str) -> String {
        format!("{}/files/{}", self.base_url(), id)
    }

    /// Fetches the current directory listing
    pub async fn list(&self) -> Result<Vec<RemoteFile>> {
        let response = self
            .client
            .get(self.directory_url(&self.bucket()))
            .bearer_auth(&self.config.key)
            .send()
            .await?;

        let listing: DirectoryListing = read_data(response).await?;
        Ok(listing.files)
    }

    /// Resolves `name` to a file id. See [`find_file_id`] for the matching rule.
    pub async fn resolve(&self, name: &str) -> Result<Option<String>> {
        tracing::debug!("Getting id from name: {}", name);

        let files = self.list().await?;
        if files.is_empty() {
            tracing::debug!("No files found in {}", self.bucket());
            return Ok(None);
        }

        let id = find_file_id(&files, name).map(str::to_string);
        match &id {
            Some(id) => tracing::debug!("Found id: {}", id),
            None => tracing::debug!("No id found for {}", name),
        }
        Ok(id)
    }

    async fn create_directory(&self) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/api/directories/", self.base_url()))
            .bearer_auth(&self.config.key)
            .json(&CreateDirectoryRequest {
                name: &self.config.directory_name,
                parent: &self.config.parrent_bucket,
            })
            .send()
            .await?;

        let created: CreatedDirectory = read_data(response).await?;
        Ok(created.id)
    }
}

/// First non-directory entry whose name equals `name` exactly, in listing order.
/// ddrv does not prevent duplicate names, so the earliest entry wins.
pub(crate) fn find_file_id<'a>(files: &'a [RemoteFile], name: &str) -> Option<&'a str> {
    files
        .iter()
        .find(|file| {
            if file.dir {
                tracing::trace!("Skipping {}", file.name);
                return false;
            }
            tracing::trace!("Checking {}", file.name);
            file.name == name
        })
        .map(|file| file.id.as_str())
}

/// Sum of file sizes in a listing, saturating on absurd remote values
pub(crate) fn total_size(files: &[RemoteFile]) -> u64 {
    files
        .iter()
        .filter(|file| !file.dir)
        .fold(0, |total, file| total.saturating_add(file.size))
}

/// Unwraps the `data` of a ddrv JSON envelope
async fn read_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let url = response.url().to_string();
    let body = response.bytes().await?;

    let value: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) if !status.is_success() => {
            return Err(DatasourceError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            })
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(err) = http::remote_error(&value) {
        return Err(err);
    }
    if !status.is_success() {
        return Err(DatasourceError::UnexpectedStatus {
            status: status.as_u16(),
            url,
        });
    }

    let envelope: Envelope<T> = serde_json::from_value(value)?;
    Ok(envelope.data)
}

#[async_trait::async_trait]
impl Datasource for DdrvDatasource {
    fn name(&self) -> &'static str {
        "Ddrv"
    }

    fn target(&self) -> String {
        self.bucket()
    }

    async fn save(&self, name: &str, data: Bytes) -> Result<()> {
        let bucket = self.bucket();
        tracing::info!("Uploading {} to {}", name, bucket);

        let len = data.len() as u64;
        let part = Part::stream_with_length(data, len)
            .file_name(name.to_string())
            .mime_str("application/octet-stream")?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/files", self.directory_url(&bucket)))
            .bearer_auth(&self.config.key)
            .multipart(form)
            .send()
            .await?;

        http::expect_ok(response).await
    }

    async fn get(&self, name: &str) -> Result<Option<ByteStream>> {
        tracing::info!("Downloading {} from {}", name, self.bucket());

        let Some(id) = self.resolve(name).await? else {
            return Ok(None);
        };

        let url = self.download_url(&id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DatasourceError::UnexpectedStatus {
                status: response.status().as_u16(),
                url,
            });
        }

        Ok(Some(response.bytes_stream().map_err(DatasourceError::from).boxed()))
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let Some(id) = self.resolve(name).await? else {
            tracing::debug!("Nothing to delete for {}", name);
            return Ok(());
        };

        let response = self
            .client
            .delete(self.file_url(&self.bucket(), &id))
            .bearer_auth(&self.config.key)
            .send()
            .await?;

        http::expect_ok(response).await
    }

    async fn clear(&self) -> Result<()> {
        let bucket = self.bucket();

        let response = self
            .client
            .delete(self.directory_url(&bucket))
            .bearer_auth(&self.config.key)
            .send()
            .await?;
        http::expect_ok(response).await?;

        // The directory is gone from here on; a failed create leaves nothing to write to
        let created = self.create_directory().await.map_err(|e| {
            tracing::error!(
                "Directory {} was deleted but recreating it under {} failed: {}",
                bucket,
                self.config.parrent_bucket,
                e
            );
            DatasourceError::ClearDiverged {
                bucket: bucket.clone(),
                source: Box::new(e),
            }
        })?;

        if created != bucket {
            tracing::warn!(
                "Directory {} recreated as {}; configured bucket id is stale",
                bucket,
                created
            );
            *self.bucket.write() = created;
        }

        Ok(())
    }

    async fn size(&self, name: &str) -> Result<Option<u64>> {
        let Some(id) = self.resolve(name).await? else {
            return Ok(None);
        };

        let response = self
            .client
            .get(self.file_url(&self.bucket(), &id))
            .bearer_auth(&self.config.key)
            .send()
            .await?;

        let metadata: FileMetadata = read_data(response).await?;
        Ok(Some(metadata.size))
    }

    async fn full_size(&self) -> Result<u64> {
        let files = self.list().await?;
        Ok(total_size(&files))
    }
}
