use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use crate::error::StorageError;

/// A logical object-storage bucket that can mint time-limited read URLs.
#[async_trait]
pub trait RemoteImageBucket: Send + Sync {
    fn bucket_name(&self) -> &str;
    async fn sign(&self, filename: &str, ttl_secs: u64) -> Result<String, StorageError>;
}

/// Downloads the bytes behind a URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, StorageError>;
}

/// Bucket on a storage API exposing `POST /object/sign/{bucket}/{path}`.
pub struct StorageBucket {
    client: Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL", alias = "signedUrl")]
    signed_url: Option<String>,
}

impl StorageBucket {
    pub fn new(client: Client, base_url: &str, api_key: &str, bucket: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            bucket: bucket.to_string(),
        }
    }

    fn storage_url(&self) -> String {
        format!("{}/storage/v1", self.base_url)
    }

    /// Signed paths come back relative to the storage root.
    fn absolute(&self, signed: &str) -> String {
        if signed.starts_with("http://") || signed.starts_with("https://") {
            signed.to_string()
        } else {
            format!("{}/{}", self.storage_url(), signed.trim_start_matches('/'))
        }
    }
}

#[async_trait]
impl RemoteImageBucket for StorageBucket {
    fn bucket_name(&self) -> &str {
        &self.bucket
    }

    async fn sign(&self, filename: &str, ttl_secs: u64) -> Result<String, StorageError> {
        let url = format!("{}/object/sign/{}/{}", self.storage_url(), self.bucket, filename);
        debug!("🔗 Signing {}/{} for {}s", self.bucket, filename, ttl_secs);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&json!({ "expiresIn": ttl_secs }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("❌ Sign request for {}/{} failed: {} {}", self.bucket, filename, status, body);
            return Err(StorageError::Status { status: status.as_u16(), body });
        }

        let parsed: SignResponse = response.json().await?;
        parsed
            .signed_url
            .filter(|u| !u.is_empty())
            .map(|u| self.absolute(&u))
            .ok_or_else(|| StorageError::MissingUrl(filename.to_string()))
    }
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, StorageError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Status { status: status.as_u16(), body });
        }
        let bytes = response.bytes().await?;
        debug!("📥 Fetched {} bytes", bytes.len());
        Ok(bytes)
    }
}
