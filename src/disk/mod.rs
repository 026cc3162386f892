//! Access to the provider's public-resources API.
//!
//! [`RemoteSource`] is the seam between the pipeline and the network:
//! the listing cache and the archive builder only ever talk to this
//! trait, so tests can substitute an in-memory provider. [`DiskClient`]
//! is the real HTTP implementation.

mod client;
mod model;

pub use client::{DEFAULT_API_BASE, DiskClient};
pub use model::{FileEntry, FileMetadata};

use crate::error::DiskError;
use async_trait::async_trait;

/// Read access to a public share tree on the remote provider.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// List the entries visible under the public key.
    async fn list_files(&self, public_key: &str) -> Result<Vec<FileEntry>, DiskError>;

    /// Look up metadata for one path under the public key.
    async fn get_metadata(&self, public_key: &str, path: &str) -> Result<FileMetadata, DiskError>;

    /// Retrieve the raw bytes of one file.
    ///
    /// The whole body is buffered in memory before it is returned; the
    /// practical file size is bounded by available memory.
    async fn fetch(&self, public_key: &str, path: &str) -> Result<Vec<u8>, DiskError>;
}
