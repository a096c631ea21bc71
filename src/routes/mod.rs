//! HTTP routes: public listing, admin scaffold, and ops endpoints.

mod admin;
mod common;
mod listing;

pub use admin::admin_routes;
pub use common::common_routes;
pub use listing::listing_routes;

use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Form posts are a handful of short fields.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Full application router with request tracing and a body size limit.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(listing_routes(state.clone()))
        .merge(admin_routes(state.clone()))
        .merge(common_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
        )
}
