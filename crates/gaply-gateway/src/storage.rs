//! Object storage for uploaded papers (Supabase Storage REST API).
//!
//! All objects live in the `papers` bucket under `YYYY/MM/<uuid><ext>`.
//! Requests authenticate with the service-role key.

use std::path::Path;
use std::time::Duration;

use chrono::{Datelike, Utc};
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::client::{build_http_client, handle_response, read_json};
use crate::config::{Config, api};
use crate::error::ClientError;

/// Bucket holding every paper upload.
pub const BUCKET: &str = "papers";

/// Object storage errors.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    /// The storage API call failed.
    #[error("storage request failed: {0}")]
    Client(#[from] ClientError),

    /// The storage API answered without a field the call needs.
    #[error("storage response missing {0}")]
    MissingField(&'static str),
}

/// A signed URL the frontend can PUT a file to, and where it will land.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUpload {
    /// Object path inside the bucket.
    pub path: String,
    /// Absolute signed URL.
    pub url: String,
}

/// An entry returned by [`StorageClient::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Name relative to the listed prefix.
    pub name: String,
    /// Object ID; absent for folder placeholders.
    #[serde(default)]
    pub id: Option<String>,
    /// Last update timestamp as reported by storage.
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Build a fresh object path for an uploaded file name.
///
/// The extension of the final path component is kept, dot included.
#[must_use]
pub fn object_path(filename: &str) -> String {
    let now = Utc::now();
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    format!("{:04}/{:02}/{}{ext}", now.year(), now.month(), Uuid::new_v4())
}

/// Supabase Storage client.
#[derive(Clone)]
pub struct StorageClient {
    client: Client,
    base_url: String,
    service_key: String,
    timeout: Duration,
}

impl StorageClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> Result<Self, StorageError> {
        Ok(Self {
            client: build_http_client(api::STORAGE_TIMEOUT, config.connect_timeout, None)?,
            base_url: format!("{}/storage/v1", config.supabase_url.trim_end_matches('/')),
            service_key: config.supabase_service_key.clone(),
            timeout: api::STORAGE_TIMEOUT,
        })
    }

    /// Upload a file under a fresh path and return that path.
    ///
    /// # Errors
    ///
    /// Returns error if the upload is rejected or the transport fails.
    #[instrument(skip(self, body))]
    pub async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        body: impl Into<reqwest::Body>,
    ) -> Result<String, StorageError> {
        let path = object_path(filename);
        let response = self
            .request(Method::POST, &format!("object/{BUCKET}/{path}"))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| ClientError::transport(e, self.timeout))?;

        handle_response(response).await?;
        tracing::info!(path = %path, "Uploaded object");
        Ok(path)
    }

    /// Create a signed upload URL for a fresh path.
    ///
    /// # Errors
    ///
    /// Returns error if signing fails or the response has no URL.
    #[instrument(skip(self))]
    pub async fn signed_upload_url(&self, filename: &str) -> Result<SignedUpload, StorageError> {
        #[derive(Deserialize)]
        struct Signed {
            url: Option<String>,
        }

        let path = object_path(filename);
        let response = self
            .request(Method::POST, &format!("object/upload/sign/{BUCKET}/{path}"))
            .send()
            .await
            .map_err(|e| ClientError::transport(e, self.timeout))?;

        let signed: Signed = read_json(response, self.timeout).await?;
        let url = signed.url.ok_or(StorageError::MissingField("url"))?;
        Ok(SignedUpload { url: self.absolute(&url), path })
    }

    /// Create a signed download URL valid for `expires_in`.
    ///
    /// # Errors
    ///
    /// Returns error if signing fails or the response has no URL.
    #[instrument(skip(self))]
    pub async fn signed_download_url(
        &self,
        path: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        #[derive(Deserialize)]
        struct Signed {
            #[serde(rename = "signedURL")]
            signed_url: Option<String>,
        }

        let response = self
            .request(Method::POST, &format!("object/sign/{BUCKET}/{path}"))
            .json(&serde_json::json!({ "expiresIn": expires_in.as_secs() }))
            .send()
            .await
            .map_err(|e| ClientError::transport(e, self.timeout))?;

        let signed: Signed = read_json(response, self.timeout).await?;
        let url = signed.signed_url.ok_or(StorageError::MissingField("signedURL"))?;
        Ok(self.absolute(&url))
    }

    /// Delete an object.
    ///
    /// # Errors
    ///
    /// Returns error if storage rejects the call.
    #[instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let response = self
            .request(Method::DELETE, &format!("object/{BUCKET}"))
            .json(&serde_json::json!({ "prefixes": [path] }))
            .send()
            .await
            .map_err(|e| ClientError::transport(e, self.timeout))?;

        handle_response(response).await?;
        Ok(())
    }

    /// Whether an object exists.
    ///
    /// Storage answers a missing object with 404 or, on some versions, 400.
    ///
    /// # Errors
    ///
    /// Returns error for any other failure.
    #[instrument(skip(self))]
    pub async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let response = self
            .request(Method::HEAD, &format!("object/{BUCKET}/{path}"))
            .send()
            .await
            .map_err(|e| ClientError::transport(e, self.timeout))?;

        match handle_response(response).await {
            Ok(_) => Ok(true),
            Err(ClientError::NotFound { .. } | ClientError::BadRequest { .. }) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// List up to `limit` objects under `prefix`.
    ///
    /// # Errors
    ///
    /// Returns error if storage rejects the call or the listing is malformed.
    #[instrument(skip(self))]
    pub async fn list(&self, prefix: &str, limit: u32) -> Result<Vec<StoredObject>, StorageError> {
        let response = self
            .request(Method::POST, &format!("object/list/{BUCKET}"))
            .json(&serde_json::json!({ "prefix": prefix, "limit": limit, "offset": 0 }))
            .send()
            .await
            .map_err(|e| ClientError::transport(e, self.timeout))?;

        Ok(read_json(response, self.timeout).await?)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{path}", self.base_url))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
    }

    // Storage returns signed URLs relative to `/storage/v1`.
    fn absolute(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}/{}", self.base_url, url.trim_start_matches('/'))
        }
    }
}

impl std::fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageClient").field("base_url", &self.base_url).finish()
    }
}
