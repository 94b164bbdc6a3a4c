pub mod cache;
pub mod config;
pub mod error;
pub mod gemini;
pub mod github;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod review;
pub mod state;

use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/review", post(handlers::review_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(state)
}
