use thiserror::Error;

/// Errors that can occur while listing, fetching, or bundling public-link
/// files.
///
/// The first three variants are the request-level conditions the handlers
/// translate into 4xx responses; the carriers below them cover transport
/// and packaging failures that are not the caller's fault.
#[derive(Debug, Error)]
pub enum DiskError {
    /// A remote listing, metadata, or download-location lookup returned a
    /// non-success status.
    #[error("not found: {0}")]
    NotFound(String),

    /// Content byte retrieval failed after a download location was
    /// resolved.
    #[error("failed to download {0}")]
    DownloadFailed(String),

    /// A required request parameter was missing or empty.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Transport-level failure talking to the provider, including
    /// unparseable provider responses.
    #[error(transparent)]
    Remote(#[from] reqwest::Error),

    #[error("failed to build zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
