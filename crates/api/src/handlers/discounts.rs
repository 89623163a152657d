//! Handlers for discount CRUD, copy tracking, and statistics.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use dtrack_core::discount::{CreateDiscount, Discount, UpdateDiscount};
use dtrack_core::types::DiscountId;

use crate::error::AppResult;
use crate::query::DiscountFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/discounts
///
/// List discounts matching the query-string filters, in store order.
pub async fn list_discounts(
    State(state): State<AppState>,
    Query(params): Query<DiscountFilterParams>,
) -> AppResult<impl IntoResponse> {
    let config = params.into_config()?;
    let store = state.store.read().await;

    let discounts: Vec<Discount> = store
        .filtered(&config, Utc::now())
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(DataResponse { data: discounts }))
}

/// POST /api/v1/discounts
pub async fn create_discount(
    State(state): State<AppState>,
    Json(input): Json<CreateDiscount>,
) -> AppResult<impl IntoResponse> {
    let mut store = state.store.write().await;
    let discount = store.create(input)?.clone();

    tracing::info!(discount_id = %discount.id, brand = %discount.brand, "Discount created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: discount })))
}

/// GET /api/v1/discounts/{id}
pub async fn get_discount(
    State(state): State<AppState>,
    Path(id): Path<DiscountId>,
) -> AppResult<impl IntoResponse> {
    let store = state.store.read().await;
    let discount = store.get(id)?.clone();

    Ok(Json(DataResponse { data: discount }))
}

/// PUT /api/v1/discounts/{id}
///
/// Apply the provided fields. Copy statistics cannot be edited.
pub async fn update_discount(
    State(state): State<AppState>,
    Path(id): Path<DiscountId>,
    Json(input): Json<UpdateDiscount>,
) -> AppResult<impl IntoResponse> {
    let mut store = state.store.write().await;
    let discount = store.update(id, input)?.clone();

    tracing::info!(discount_id = %id, "Discount updated");

    Ok(Json(DataResponse { data: discount }))
}

/// DELETE /api/v1/discounts/{id}
pub async fn delete_discount(
    State(state): State<AppState>,
    Path(id): Path<DiscountId>,
) -> AppResult<impl IntoResponse> {
    let mut store = state.store.write().await;
    store.delete(id)?;

    tracing::info!(discount_id = %id, "Discount deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/discounts/{id}/copies
///
/// Record that the client copied this code to its clipboard.
pub async fn record_copy(
    State(state): State<AppState>,
    Path(id): Path<DiscountId>,
) -> AppResult<impl IntoResponse> {
    let mut store = state.store.write().await;
    let discount = store.record_copy(id, Utc::now())?.clone();

    tracing::debug!(discount_id = %id, copied_count = discount.copied_count, "Copy recorded");

    Ok(Json(DataResponse { data: discount }))
}

/// GET /api/v1/stats
pub async fn get_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let store = state.store.read().await;
    let stats = store.stats(Utc::now());

    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/categories
///
/// Known categories, then any custom labels currently in use.
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = state.store.read().await.categories();

    Ok(Json(DataResponse { data: categories }))
}
