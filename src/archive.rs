//! Zip aggregation of multiple public-link files.

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::FileOptions;

use crate::disk::RemoteSource;
use crate::error::DiskError;

/// Bundle the given files into a single zip archive.
///
/// Paths are processed strictly in the given order, one file fully
/// completed before the next begins, and archive entries appear in that
/// same order under each file's resolved display name. The first
/// failure aborts the whole build: a failed metadata lookup returns
/// `NotFound` for that path, a failed content fetch returns
/// `DownloadFailed` for that file's name, and nothing already buffered
/// is salvaged either way.
///
/// Duplicate paths are not deduplicated; each occurrence is fetched and
/// written independently, which may produce duplicate-named entries.
pub async fn build_archive<R>(
    source: &R,
    public_key: &str,
    paths: &[String],
) -> Result<Vec<u8>, DiskError>
where
    R: RemoteSource + ?Sized,
{
    if paths.is_empty() {
        return Err(DiskError::InvalidRequest("no file paths supplied".to_string()));
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();

    for path in paths {
        let metadata = source.get_metadata(public_key, path).await?;
        let name = metadata.name;

        let bytes = source.fetch(public_key, path).await.map_err(|err| match err {
            DiskError::DownloadFailed(_) => DiskError::DownloadFailed(name.clone()),
            other => other,
        })?;

        tracing::debug!(name = %name, size = bytes.len(), "adding archive entry");
        writer.start_file(name.as_str(), options)?;
        writer.write_all(&bytes)?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}
