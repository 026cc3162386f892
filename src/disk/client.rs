use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::RemoteSource;
use super::model::{FileEntry, FileMetadata, ListingResponse};
use crate::error::DiskError;

/// Default public-resources endpoint of the remote provider.
pub const DEFAULT_API_BASE: &str = "https://cloud-api.yandex.net/v1/disk/public/resources";

/// HTTP client for the provider's public-resources API.
///
/// All calls are unauthenticated GETs keyed by the caller-supplied
/// public key. There are no retries and no backoff: within a single
/// request lifecycle the provider is either reliable or failed.
pub struct DiskClient {
    http: Client,
    base_url: Url,
}

/// Short-lived location issued by the `/download` sub-resource.
#[derive(Debug, Deserialize)]
struct DownloadLocation {
    href: Url,
}

impl DiskClient {
    /// Create a client against the given API base URL.
    pub fn new(base_url: Url) -> Result<Self, DiskError> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { http, base_url })
    }

    fn download_endpoint(&self) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}/download", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url
    }

    /// List the entries visible under the public key. A 200 response
    /// without an items array is an empty listing; any other status is
    /// `NotFound`.
    pub async fn list_files(&self, public_key: &str) -> Result<Vec<FileEntry>, DiskError> {
        let resp = self
            .http
            .get(self.base_url.clone())
            .query(&[("public_key", public_key)])
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(DiskError::NotFound(format!("public key {public_key}")));
        }

        let listing: ListingResponse = resp.json().await?;
        let items = listing.embedded.map(|e| e.items).unwrap_or_default();
        tracing::debug!(public_key, count = items.len(), "fetched listing from provider");
        Ok(items)
    }

    /// Look up metadata for one path under the public key.
    pub async fn get_metadata(&self, public_key: &str, path: &str) -> Result<FileMetadata, DiskError> {
        let resp = self
            .http
            .get(self.base_url.clone())
            .query(&[("public_key", public_key), ("path", path)])
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(DiskError::NotFound(path.to_string()));
        }

        Ok(resp.json().await?)
    }

    /// Resolve the temporary download location for a path.
    pub async fn resolve_download_url(&self, public_key: &str, path: &str) -> Result<Url, DiskError> {
        let resp = self
            .http
            .get(self.download_endpoint())
            .query(&[("public_key", public_key), ("path", path)])
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(DiskError::NotFound(path.to_string()));
        }

        let location: DownloadLocation = resp.json().await?;
        Ok(location.href)
    }

    /// Resolve the download location and retrieve the file bytes.
    ///
    /// A failed location lookup propagates as `NotFound`; once a
    /// location was obtained, any failure of the second GET surfaces as
    /// `DownloadFailed`.
    pub async fn fetch(&self, public_key: &str, path: &str) -> Result<Vec<u8>, DiskError> {
        let href = self.resolve_download_url(public_key, path).await?;
        tracing::debug!(path, href = %href, "fetching file content");

        let resp = self.http.get(href).send().await.map_err(|err| {
            tracing::debug!(path, error = %err, "content request failed");
            DiskError::DownloadFailed(path.to_string())
        })?;

        if !resp.status().is_success() {
            tracing::debug!(path, status = %resp.status(), "content request rejected");
            return Err(DiskError::DownloadFailed(path.to_string()));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|_| DiskError::DownloadFailed(path.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl RemoteSource for DiskClient {
    async fn list_files(&self, public_key: &str) -> Result<Vec<FileEntry>, DiskError> {
        DiskClient::list_files(self, public_key).await
    }

    async fn get_metadata(&self, public_key: &str, path: &str) -> Result<FileMetadata, DiskError> {
        DiskClient::get_metadata(self, public_key, path).await
    }

    async fn fetch(&self, public_key: &str, path: &str) -> Result<Vec<u8>, DiskError> {
        DiskClient::fetch(self, public_key, path).await
    }
}
