//! API route table.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, ApiState};

/// Build the /api/v1 router.
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        // Status & samples
        .route("/health", get(handlers::health))
        .route("/sample-data", get(handlers::sample_data))
        .route("/persona-samples", get(handlers::persona_samples))
        .route("/debug/sample-inputs", get(handlers::debug_sample_inputs))
        // Predictions
        .route("/predict/performance", post(handlers::predict_performance))
        .route("/predict/persona", post(handlers::predict_persona))
        .route("/predict/insight", post(handlers::predict_insight))
        // Benchmark & comparison
        .route("/benchmark/stats", get(handlers::benchmark_stats))
        .route("/compare/performance", post(handlers::compare_performance))
        .with_state(state)
}

/// Legacy unversioned probes: `/` banner and `/health` for load balancers.
pub fn legacy_routes(state: ApiState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::legacy_health))
        .with_state(state)
}
