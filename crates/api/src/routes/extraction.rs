use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use dtrack_core::extraction::MAX_UPLOAD_BYTES;

use crate::handlers::extraction;
use crate::state::AppState;

/// Extraction routes mounted at `/extractions`.
///
/// ```text
/// POST   /                 -> start_extraction
/// GET    /current          -> get_extraction
/// DELETE /current          -> cancel_extraction
/// POST   /current/accept   -> accept_extraction
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(extraction::start_extraction))
        .route(
            "/current",
            get(extraction::get_extraction).delete(extraction::cancel_extraction),
        )
        .route("/current/accept", post(extraction::accept_extraction))
        // Leave room above the limit so oversized uploads reach validation.
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024))
}
