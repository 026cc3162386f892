use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of a public-link listing.
///
/// Only the fields this system acts on are named; everything else the
/// provider sends is kept verbatim in `extra` so nothing is silently
/// dropped on the way through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// Display name of the file or directory.
    pub name: String,
    /// Path of the entry within the tree rooted at the public key.
    pub path: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Metadata for a single file behind a public link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Display name; downloads are delivered under this name.
    pub name: String,
    /// Content type as reported by the provider, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Envelope of the provider's resource-listing response. A response
/// without an `_embedded` object is a valid empty listing.
#[derive(Debug, Deserialize)]
pub(crate) struct ListingResponse {
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<Embedded>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Embedded {
    #[serde(default)]
    pub items: Vec<FileEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_fields_survive_a_round_trip() {
        let raw = serde_json::json!({
            "name": "report.xlsx",
            "path": "/report.xlsx",
            "type": "file",
            "size": 1024,
        });

        let entry: FileEntry = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(entry.name, "report.xlsx");
        assert_eq!(entry.extra.get("size"), Some(&serde_json::json!(1024)));

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn listing_without_embedded_is_empty() {
        let listing: ListingResponse = serde_json::from_str(r#"{"public_key": "k"}"#).unwrap();
        assert!(listing.embedded.is_none());
    }

    #[test]
    fn metadata_mime_type_is_optional() {
        let meta: FileMetadata = serde_json::from_str(r#"{"name": "a.txt"}"#).unwrap();
        assert_eq!(meta.mime_type, None);
    }
}
