//! Datasource backed by a Supabase Storage bucket.
//!
//! Storage keeps a folder hierarchy: `/` in an object name creates folders,
//! and listings return one level at a time with folders as metadata-less
//! entries.

mod models;

use self::models::{DeleteRequest, ListRequest, StorageObject};
use crate::datasource::{ByteStream, Datasource};
use crate::errors::{DatasourceError, Result};
use crate::http;
use bytes::Bytes;
use filedock_config::SupabaseConfig;
use futures::{StreamExt, TryStreamExt};
use reqwest::StatusCode;

const PAGE_SIZE: usize = 1000;

pub struct SupabaseDatasource {
    config: SupabaseConfig,
    client: reqwest::Client,
}

impl SupabaseDatasource {
    pub fn new(config: SupabaseConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: SupabaseConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn storage_url(&self) -> String {
        format!("{}/storage/v1", self.config.url.trim_end_matches('/'))
    }

    fn bucket_url(&self) -> String {
        format!("{}/object/{}", self.storage_url(), self.config.bucket)
    }

    fn object_url(&self, name: &str) -> String {
        format!("{}/{}", self.bucket_url(), encode_key(name))
    }

    fn list_url(&self) -> String {
        format!("{}/object/list/{}", self.storage_url(), self.config.bucket)
    }

    async fn list_page(
        &self,
        prefix: &str,
        search: Option<&str>,
        offset: usize,
    ) -> Result<Vec<StorageObject>> {
        let response = self
            .client
            .post(self.list_url())
            .bearer_auth(&self.config.key)
            .json(&ListRequest {
                prefix,
                limit: PAGE_SIZE,
                offset,
                search,
            })
            .send()
            .await?;

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

        Ok(serde_json::from_value(value)?)
    }

    /// One folder level, all pages
    async fn list(&self, prefix: &str, search: Option<&str>) -> Result<Vec<StorageObject>> {
        let mut objects = Vec::new();
        loop {
            let page = self.list_page(prefix, search, objects.len()).await?;
            let last_page = page.len() < PAGE_SIZE;
            objects.extend(page);
            if last_page {
                break;
            }
        }
        Ok(objects)
    }

    /// Full key and size of every object in the bucket, descending into folders
    async fn walk(&self) -> Result<Vec<(String, u64)>> {
        let mut objects = Vec::new();
        let mut pending = vec![String::new()];

        while let Some(prefix) = pending.pop() {
            for entry in self.list(&prefix, None).await? {
                if entry.name.is_empty() {
                    continue;
                }
                let key = join_key(&prefix, &entry.name);
                match entry.metadata {
                    Some(metadata) => objects.push((key, metadata.size)),
                    None => pending.push(key),
                }
            }
        }

        Ok(objects)
    }
}

/// Percent-encodes each `/`-separated segment of an object key
fn encode_key(name: &str) -> String {
    name.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

fn join_key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

#[async_trait::async_trait]
impl Datasource for SupabaseDatasource {
    fn name(&self) -> &'static str {
        "Supabase"
    }

    fn target(&self) -> String {
        self.config.bucket.clone()
    }

    async fn save(&self, name: &str, data: Bytes) -> Result<()> {
        tracing::debug!("Uploading {} to {}", name, self.config.bucket);

        let response = self
            .client
            .post(self.object_url(name))
            .bearer_auth(&self.config.key)
            .header("Content-Type", "application/octet-stream")
            .header("x-upsert", "true")
            .body(data)
            .send()
            .await?;

        http::expect_ok(response).await
    }

    async fn get(&self, name: &str) -> Result<Option<ByteStream>> {
        let url = self.object_url(name);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.key)
            .send()
            .await?;

        // Storage answers 400 for unknown objects on some versions
        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => return Ok(None),
            status if !status.is_success() => {
                return Err(DatasourceError::UnexpectedStatus {
                    status: status.as_u16(),
                    url,
                })
            }
            _ => {}
        }

        Ok(Some(response.bytes_stream().map_err(DatasourceError::from).boxed()))
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let prefixes = [name.to_string()];
        let response = self
            .client
            .delete(self.bucket_url())
            .bearer_auth(&self.config.key)
            .json(&DeleteRequest {
                prefixes: &prefixes,
            })
            .send()
            .await?;

        http::expect_ok(response).await
    }

    async fn clear(&self) -> Result<()> {
        let keys: Vec<String> = self.walk().await?.into_iter().map(|(key, _)| key).collect();
        if keys.is_empty() {
            return Ok(());
        }

        tracing::debug!("Removing {} objects from {}", keys.len(), self.config.bucket);

        for batch in keys.chunks(PAGE_SIZE) {
            let response = self
                .client
                .delete(self.bucket_url())
                .bearer_auth(&self.config.key)
                .json(&DeleteRequest { prefixes: batch })
                .send()
                .await?;

            http::expect_ok(response).await?;
        }

        Ok(())
    }

    async fn size(&self, name: &str) -> Result<Option<u64>> {
        let (folder, file) = name.rsplit_once('/').unwrap_or(("", name));

        // `search` is a substring filter, so pick the exact match
        let objects = self.list(folder, Some(file)).await?;
        Ok(objects
            .into_iter()
            .find(|object| object.name == file)
            .and_then(|object| object.metadata)
            .map(|metadata| metadata.size))
    }

    async fn full_size(&self) -> Result<u64> {
        Ok(self
            .walk()
            .await?
            .iter()
            .fold(0u64, |total, (_, size)| total.saturating_add(*size)))
    }
}
