//! Route definitions for discounts, mounted at `/discounts`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::discounts;
use crate::state::AppState;

/// ```text
/// GET    /                 -> list_discounts
/// POST   /                 -> create_discount
/// GET    /{id}             -> get_discount
/// PUT    /{id}             -> update_discount
/// DELETE /{id}             -> delete_discount
/// POST   /{id}/copies      -> record_copy
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(discounts::list_discounts).post(discounts::create_discount),
        )
        .route(
            "/{id}",
            get(discounts::get_discount)
                .put(discounts::update_discount)
                .delete(discounts::delete_discount),
        )
        .route("/{id}/copies", post(discounts::record_copy))
}
