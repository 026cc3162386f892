//! Thin request handlers: translate inbound parameters into pipeline
//! calls and pipeline results into responses.

use std::sync::Arc;

use axum::extract::{Form, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{Html, IntoResponse, Response};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

use super::AppState;
use crate::archive::build_archive;
use crate::cache::list_cached;
use crate::disk::FileEntry;
use crate::error::DiskError;

/// Percent-encoding set for the Content-Disposition filename:
/// alphanumerics and `_.-~/` stay unescaped.
const FILENAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

#[derive(Debug, Deserialize)]
pub(super) struct PublicLinkForm {
    #[serde(default)]
    public_key: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct DownloadQuery {
    #[serde(default)]
    public_key: Option<String>,
    #[serde(default)]
    file_path: Option<String>,
}

/// `GET /` - the public-key form.
pub(super) async fn index() -> Html<String> {
    render_index(None)
}

/// `POST /` - list the files behind the submitted public key.
pub(super) async fn index_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PublicLinkForm>,
) -> Result<Html<String>, DiskError> {
    let public_key = form.public_key.trim();
    if public_key.is_empty() {
        return Err(DiskError::InvalidRequest("missing public_key".to_string()));
    }

    let files = list_cached(&state.cache, &state.client, public_key).await?;
    Ok(render_index(Some((public_key, files.as_slice()))))
}

/// `GET /download` - deliver one file's bytes under its resolved name.
pub(super) async fn download(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, DiskError> {
    let public_key = require_param(query.public_key, "public_key")?;
    let file_path = require_param(query.file_path, "file_path")?;

    let metadata = state.client.get_metadata(&public_key, &file_path).await?;
    let bytes = state.client.fetch(&public_key, &file_path).await?;

    let filename = utf8_percent_encode(&metadata.name, FILENAME_ENCODE_SET).to_string();
    let content_type = metadata
        .mime_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok((
        [
            (CONTENT_TYPE, content_type),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// `GET /download_multiple` - bundle the requested files into a zip.
///
/// `file_paths` repeats once per requested file, so the query string is
/// taken as raw pairs rather than a struct.
pub(super) async fn download_multiple(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, DiskError> {
    let mut public_key = None;
    let mut paths = Vec::new();
    for (key, value) in params {
        match key.as_str() {
            "public_key" => public_key = Some(value),
            "file_paths" => paths.push(value),
            _ => {}
        }
    }
    let public_key = require_param(public_key, "public_key")?;

    let archive = build_archive(&state.client, &public_key, &paths).await?;

    Ok((
        [
            (CONTENT_TYPE, "application/zip".to_string()),
            (
                CONTENT_DISPOSITION,
                "attachment; filename=\"downloaded_files.zip\"".to_string(),
            ),
        ],
        archive,
    )
        .into_response())
}

fn require_param(value: Option<String>, name: &str) -> Result<String, DiskError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| DiskError::InvalidRequest(format!("missing {name}")))
}

fn render_index(listing: Option<(&str, &[FileEntry])>) -> Html<String> {
    let mut page = String::from(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>diskproxy</title></head>\n<body>\n\
         <h1>Public link viewer</h1>\n",
    );

    let current_key = listing.map(|(key, _)| key).unwrap_or_default();
    page.push_str(&format!(
        "<form method=\"post\" action=\"/\">\n\
         <input type=\"text\" name=\"public_key\" placeholder=\"Public key or link\" value=\"{}\">\n\
         <button type=\"submit\">List files</button>\n</form>\n",
        html_escape(current_key)
    ));

    if let Some((public_key, files)) = listing {
        if files.is_empty() {
            page.push_str("<p>No files behind this key.</p>\n");
        } else {
            page.push_str(&format!(
                "<form method=\"get\" action=\"/download_multiple\">\n\
                 <input type=\"hidden\" name=\"public_key\" value=\"{}\">\n<ul>\n",
                html_escape(public_key)
            ));
            for file in files {
                let single = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("public_key", public_key)
                    .append_pair("file_path", &file.path)
                    .finish();
                page.push_str(&format!(
                    "<li><input type=\"checkbox\" name=\"file_paths\" value=\"{}\"> \
                     <a href=\"/download?{}\">{}</a></li>\n",
                    html_escape(&file.path),
                    single,
                    html_escape(&file.name)
                ));
            }
            page.push_str(
                "</ul>\n<button type=\"submit\">Download selected as zip</button>\n</form>\n",
            );
        }
    }

    page.push_str("</body>\n</html>\n");
    Html(page)
}

fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
