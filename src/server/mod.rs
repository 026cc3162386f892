//! HTTP surface: routing, shared state, and error mapping.

mod handlers;

use std::sync::Arc;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde_json::json;

use crate::cache::ListingCache;
use crate::disk::DiskClient;
use crate::error::DiskError;

/// Shared state behind every handler: the provider client and the
/// listing cache.
pub struct AppState {
    pub client: DiskClient,
    pub cache: ListingCache,
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::index_submit))
        .route("/download", get(handlers::download))
        .route("/download_multiple", get(handlers::download_multiple))
        .with_state(state)
}

/// Every pipeline failure surfaces as a structured JSON body with an
/// appropriate status; transport and packaging detail is logged, not
/// exposed to the caller.
impl IntoResponse for DiskError {
    fn into_response(self) -> Response {
        let status = match &self {
            DiskError::NotFound(_) | DiskError::DownloadFailed(_) => StatusCode::NOT_FOUND,
            DiskError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            DiskError::Remote(_) => StatusCode::BAD_GATEWAY,
            DiskError::Zip(_) | DiskError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            DiskError::Remote(_) | DiskError::Zip(_) | DiskError::Io(_) => {
                tracing::error!(error = %self, "request failed");
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
