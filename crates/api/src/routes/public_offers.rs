use axum::routing::get;
use axum::Router;

use crate::handlers::public_offers;
use crate::state::AppState;

/// Public offer routes mounted at `/public-offers`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(public_offers::list_public_offers))
}
