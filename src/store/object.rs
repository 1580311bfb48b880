//! HTTP client for the object store collaborator.

use crate::config::get_config;
use crate::store::{ObjectStore, StorageError};
use async_trait::async_trait;
use reqwest::{Client, Method, Response};

/// REST object store client speaking a bucket/path protocol.
pub struct HttpObjectStore {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
}

impl HttpObjectStore {
    /// Construct a new client using configuration derived from the environment.
    pub fn new() -> Result<Self, StorageError> {
        let config = get_config();
        let client = Client::builder().user_agent("doctriage/0.1").build()?;
        let base_url = normalize_base_url(&config.object_store_url)?;
        tracing::debug!(
            url = %base_url,
            has_api_key = config.object_store_api_key.is_some(),
            "Initialized object store HTTP client"
        );

        Ok(Self {
            client,
            base_url,
            api_key: config.object_store_api_key.clone(),
        })
    }

    fn request(&self, method: Method, bucket: &str, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/object/{bucket}/{path}", self.base_url);
        let mut builder = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }

    async fn ensure_success(&self, response: Response) -> Result<(), StorageError> {
        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(StorageError::UnexpectedStatus { status, body })
    }
}

fn normalize_base_url(url: &str) -> Result<String, StorageError> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() || !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(StorageError::InvalidUrl(url.to_string()));
    }
    Ok(trimmed.to_string())
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let response = self
            .request(Method::POST, bucket, path)
            .header("content-type", content_type)
            .body(bytes)
            .send()
            .await?;
        self.ensure_success(response).await?;
        tracing::debug!(bucket, path, "Stored object");
        Ok(self.public_url(bucket, path))
    }

    async fn delete(&self, bucket: &str, path: &str) -> Result<(), StorageError> {
        let response = self.request(Method::DELETE, bucket, path).send().await?;
        self.ensure_success(response).await?;
        tracing::debug!(bucket, path, "Deleted object");
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/object/public/{bucket}/{path}", self.base_url)
    }
}
