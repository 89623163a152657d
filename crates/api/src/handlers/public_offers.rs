//! Handler for the signed-out public offer listing.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use crate::error::AppResult;
use crate::query::SearchParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/public-offers
///
/// Public discounts only, with codes masked.
pub async fn list_public_offers(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let store = state.store.read().await;
    let offers = store.public_offers(params.q.as_deref().unwrap_or_default(), Utc::now());

    Ok(Json(DataResponse { data: offers }))
}
