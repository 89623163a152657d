//! Handlers for the dashboard view and its server-held filter state.
//!
//! Every mutation returns the refreshed [`DashboardView`] so the client can
//! re-render from a single response.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use dtrack_core::discount::{Category, Discount, OfferType};
use dtrack_core::filter::FilterConfig;
use dtrack_core::filter_state::FilterState;
use dtrack_core::store::DiscountStats;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// The dashboard list together with the filters that produced it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub discounts: Vec<Discount>,
    pub filters: FilterConfig,
    pub active_filter_count: usize,
    pub stats: DiscountStats,
}

/// Body for `PUT /dashboard/filters/query`.
#[derive(Debug, Deserialize)]
pub struct SetQueryRequest {
    pub query: String,
}

async fn render(state: &AppState, filters: &FilterState) -> DashboardView {
    let now = Utc::now();
    let store = state.store.read().await;

    DashboardView {
        discounts: store
            .filtered(filters.config(), now)
            .into_iter()
            .cloned()
            .collect(),
        filters: filters.config().clone(),
        active_filter_count: filters.active_filter_count(),
        stats: store.stats(now),
    }
}

/// GET /api/v1/dashboard
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let filters = state.filters.read().await;
    let view = render(&state, &filters).await;

    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/dashboard/filters/categories/{category}/toggle
pub async fn toggle_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<impl IntoResponse> {
    let mut filters = state.filters.write().await;
    filters.toggle_category(Category::new(category));
    let view = render(&state, &filters).await;

    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/dashboard/filters/types/{type}/toggle
pub async fn toggle_type(
    State(state): State<AppState>,
    Path(offer_type): Path<String>,
) -> AppResult<impl IntoResponse> {
    let offer_type: OfferType = offer_type.parse()?;

    let mut filters = state.filters.write().await;
    filters.toggle_type(offer_type);
    let view = render(&state, &filters).await;

    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/dashboard/filters/expiring-soon/toggle
pub async fn toggle_expiring_soon(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut filters = state.filters.write().await;
    filters.toggle_expiring_soon();
    let view = render(&state, &filters).await;

    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/dashboard/filters/query
pub async fn set_query(
    State(state): State<AppState>,
    Json(input): Json<SetQueryRequest>,
) -> AppResult<impl IntoResponse> {
    let mut filters = state.filters.write().await;
    filters.set_query(input.query);
    let view = render(&state, &filters).await;

    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/dashboard/filters
///
/// Clear every selection and the text query.
pub async fn clear_filters(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut filters = state.filters.write().await;
    filters.clear_all();
    let view = render(&state, &filters).await;

    Ok(Json(DataResponse { data: view }))
}
