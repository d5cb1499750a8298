use axum::routing::{get, post};
use axum::Router;
use mintline_protocol::endpoints;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with all node endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::BLOCKHASH, get(handler::blockhash_handler))
        .route(endpoints::RENT, get(handler::rent_handler))
        .route(endpoints::ACCOUNT, get(handler::account_handler))
        .route(endpoints::BUNDLES, post(handler::submit_bundle_handler))
        .route(endpoints::BUNDLE_STATUS, get(handler::bundle_status_handler))
        .route(endpoints::AIRDROP, post(handler::airdrop_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
