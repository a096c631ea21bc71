//! Public listing route.

use crate::handlers::listing::index;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn listing_routes(state: AppState) -> Router {
    Router::new().route("/", get(index)).with_state(state)
}
