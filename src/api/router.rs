//! Service router.
//!
//! Routes mirror the processing sequence: intake, then insights, then
//! summary. CORS is permissive; the service fronts browser-based clients
//! on other origins.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

pub fn service_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/fetch_and_summarize",
            post(endpoints::trials::fetch_and_summarize),
        )
        .route(
            "/generate_insights",
            post(endpoints::insights::generate_insights),
        )
        .route(
            "/summarize_trial_insights",
            post(endpoints::insights::summarize_trial_insights),
        )
        .with_state(ctx)
        .layer(CorsLayer::permissive())
}
