//! Route definitions for the dashboard, mounted at `/dashboard`.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// ```text
/// GET    /                                      -> get_dashboard
/// DELETE /filters                               -> clear_filters
/// PUT    /filters/query                         -> set_query
/// POST   /filters/categories/{category}/toggle  -> toggle_category
/// POST   /filters/types/{type}/toggle           -> toggle_type
/// POST   /filters/expiring-soon/toggle          -> toggle_expiring_soon
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::get_dashboard))
        .route("/filters", delete(dashboard::clear_filters))
        .route("/filters/query", put(dashboard::set_query))
        .route(
            "/filters/categories/{category}/toggle",
            post(dashboard::toggle_category),
        )
        .route("/filters/types/{type}/toggle", post(dashboard::toggle_type))
        .route(
            "/filters/expiring-soon/toggle",
            post(dashboard::toggle_expiring_soon),
        )
}
