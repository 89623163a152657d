pub mod dashboard;
pub mod discounts;
pub mod extraction;
pub mod health;
pub mod public_offers;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /discounts                                          list (filtered), create
/// /discounts/{id}                                     get, update, delete
/// /discounts/{id}/copies                              record copy (POST)
///
/// /public-offers                                      masked public list
/// /stats                                              store statistics
/// /categories                                         category taxonomy
///
/// /dashboard                                          list under server-held filters
/// /dashboard/filters                                  clear all (DELETE)
/// /dashboard/filters/query                            set text query (PUT)
/// /dashboard/filters/categories/{category}/toggle     toggle category (POST)
/// /dashboard/filters/types/{type}/toggle              toggle offer type (POST)
/// /dashboard/filters/expiring-soon/toggle             toggle expiring flag (POST)
///
/// /extractions                                        start extraction (POST)
/// /extractions/current                                status, cancel
/// /extractions/current/accept                         save ready offer (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/discounts", discounts::router())
        .nest("/public-offers", public_offers::router())
        .nest("/dashboard", dashboard::router())
        .nest("/extractions", extraction::router())
        .route("/stats", get(handlers::discounts::get_stats))
        .route("/categories", get(handlers::discounts::list_categories))
}
