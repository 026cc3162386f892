//! # diskproxy
//!
//! A browser-facing proxy for a cloud-storage public-link API: given a
//! public share key it lists the files behind the key, downloads a
//! single file, or bundles several files into one zip archive.
//!
//! The pipeline is list -> resolve metadata -> fetch content ->
//! optionally zip. Listings are cached with a fixed time-to-live; a
//! multi-file download fails atomically on the first path that cannot
//! be resolved or fetched.
//!
//! ## Example
//!
//! ```no_run
//! use diskproxy::{DiskClient, build_archive};
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = DiskClient::new(Url::parse(diskproxy::disk::DEFAULT_API_BASE)?)?;
//!
//!     // List everything behind a public key.
//!     let files = client.list_files("https://disk.example/d/abc123").await?;
//!     for file in &files {
//!         println!("{}", file.name);
//!     }
//!
//!     // Bundle two of them into a zip.
//!     let paths: Vec<String> = files.iter().take(2).map(|f| f.path.clone()).collect();
//!     let archive = build_archive(&client, "https://disk.example/d/abc123", &paths).await?;
//!     std::fs::write("downloaded_files.zip", archive)?;
//!
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cache;
pub mod cli;
pub mod disk;
pub mod error;
pub mod server;

pub use archive::build_archive;
pub use cache::{Clock, ListingCache, SystemClock, list_cached};
pub use cli::Cli;
pub use disk::{DiskClient, FileEntry, FileMetadata, RemoteSource};
pub use error::DiskError;
pub use server::{AppState, router};
