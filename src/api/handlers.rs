//! API route handlers.
//!
//! Request handling for all endpoints: prediction, persona assignment,
//! combined insight, sample/benchmark data, and health. Handlers validate
//! client input against the active schema before it reaches the core;
//! any core failure surfaces as a single generic internal error with no
//! partial result.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::inference::ModelRegistry;
use crate::insight::{self, benchmark};
use crate::normalize::{round2, Normalizer};
use crate::types::{FeatureSet, PerformancePrediction, PersonaPrediction};

/// Default context-field values used in sample payloads.
const DEFAULT_STUDY_TIME_CATEGORY: f64 = 2.0;
const DEFAULT_TOTAL_ACTIVE_DAYS: f64 = 15.0;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers.
///
/// Everything inside is immutable after startup, so the state is safe for
/// unbounded concurrent reads without locking.
#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<ModelRegistry>,
    pub started_at: Instant,
}

impl ApiState {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self {
            registry,
            started_at: Instant::now(),
        }
    }
}

// ============================================================================
// Request / Response types
// ============================================================================

/// Typed body for the combined insight endpoint.
#[derive(Debug, Deserialize)]
pub struct InsightRequest {
    pub performance: FeatureSet,
    pub clustering: FeatureSet,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub schema: String,
    pub models: ModelStatus,
    pub total_personas: usize,
    pub cluster_features: Vec<String>,
    pub performance_features: Vec<String>,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct ModelStatus {
    pub performance_model: &'static str,
    pub cluster_model: &'static str,
    pub scaler: &'static str,
    pub persona_mapping: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SampleDataResponse {
    pub performance: BTreeMap<String, f64>,
    pub clustering: BTreeMap<String, f64>,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PersonaSample {
    pub cluster_id: usize,
    pub persona_label: String,
    pub performance: BTreeMap<String, f64>,
    pub clustering: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub struct PersonaSamplesResponse {
    pub samples: Vec<PersonaSample>,
    pub total_personas: usize,
}

#[derive(Debug, Serialize)]
pub struct SampleInputsResponse {
    pub persona_samples: Vec<RawPersonaSample>,
    pub default_performance_input: BTreeMap<String, f64>,
    pub order_info: OrderInfo,
}

#[derive(Debug, Serialize)]
pub struct RawPersonaSample {
    pub cluster_id: usize,
    pub persona_label: String,
    /// Centroid values as the model stores them (scaled space), rounded.
    pub sample_clustering_input: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub struct OrderInfo {
    pub performance_order: Vec<String>,
    pub cluster_order: Vec<String>,
}

// ============================================================================
// Helpers
// ============================================================================

fn owned(order: &[&str]) -> Vec<String> {
    order.iter().map(|s| (*s).to_string()).collect()
}

/// Readable sample with context defaults appended (performance shape).
fn with_context(signals: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    let mut perf = signals.clone();
    perf.insert("study_time_category".to_string(), DEFAULT_STUDY_TIME_CATEGORY);
    perf.insert("total_active_days".to_string(), DEFAULT_TOTAL_ACTIVE_DAYS);
    perf
}

fn internal(context: &str, err: impl std::fmt::Display) -> Response {
    warn!("{context}: {err}");
    ApiErrorResponse::internal(format!("{context}: {err}"))
}

// ============================================================================
// Handlers — status & samples
// ============================================================================

/// GET /api/v1/health
pub async fn health(State(state): State<ApiState>) -> Response {
    let schema = state.registry.schema();
    ApiResponse::ok(HealthResponse {
        status: "healthy",
        schema: schema.id().to_string(),
        models: ModelStatus {
            performance_model: "loaded",
            cluster_model: "loaded",
            scaler: "loaded",
            persona_mapping: "loaded",
        },
        total_personas: state.registry.persona_count(),
        cluster_features: owned(schema.cluster_order()),
        performance_features: owned(schema.performance_order()),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

/// GET /api/v1/sample-data — auto-fill sample from the first centroid.
pub async fn sample_data(State(state): State<ApiState>) -> Response {
    let normalizer = Normalizer::new(state.registry.schema());
    let Some(centroid) = state.registry.clusterer().centroids().first() else {
        return internal("sample data", "model has no clusters");
    };

    match normalizer.centroid_to_readable(centroid) {
        Ok(clustering) => ApiResponse::ok(SampleDataResponse {
            performance: with_context(&clustering),
            clustering,
            message: "Sample data for auto-fill",
        }),
        Err(e) => internal("sample data", e),
    }
}

/// GET /api/v1/persona-samples — one readable sample per persona.
pub async fn persona_samples(State(state): State<ApiState>) -> Response {
    let normalizer = Normalizer::new(state.registry.schema());

    let mut samples = Vec::new();
    for (cluster_id, centroid) in state.registry.clusterer().centroids().iter().enumerate() {
        let clustering = match normalizer.centroid_to_readable(centroid) {
            Ok(readable) => readable,
            Err(e) => return internal("persona samples", e),
        };
        samples.push(PersonaSample {
            cluster_id,
            persona_label: state.registry.persona_label_or_unknown(cluster_id),
            performance: with_context(&clustering),
            clustering,
        });
    }

    ApiResponse::ok(PersonaSamplesResponse {
        total_personas: samples.len(),
        samples,
    })
}

/// GET /api/v1/debug/sample-inputs — raw centroid values and order
/// contracts, for exercising every persona end to end.
pub async fn debug_sample_inputs(State(state): State<ApiState>) -> Response {
    let schema = state.registry.schema();
    let normalizer = Normalizer::new(schema);

    let persona_samples: Vec<RawPersonaSample> = state
        .registry
        .clusterer()
        .centroids()
        .iter()
        .enumerate()
        .map(|(cluster_id, centroid)| RawPersonaSample {
            cluster_id,
            persona_label: state.registry.persona_label_or_unknown(cluster_id),
            sample_clustering_input: schema
                .cluster_order()
                .iter()
                .zip(centroid)
                .map(|(name, value)| ((*name).to_string(), round2(*value)))
                .collect(),
        })
        .collect();

    // Profile means as the default performance input (z=0 per signal).
    let default_signals: BTreeMap<String, f64> = schema
        .cluster_order()
        .iter()
        .map(|name| ((*name).to_string(), normalizer.to_readable(0.0, name)))
        .collect();

    ApiResponse::ok(SampleInputsResponse {
        persona_samples,
        default_performance_input: with_context(&default_signals),
        order_info: OrderInfo {
            performance_order: owned(schema.performance_order()),
            cluster_order: owned(schema.cluster_order()),
        },
    })
}

// ============================================================================
// Handlers — predictions
// ============================================================================

/// POST /api/v1/predict/performance
pub async fn predict_performance(
    State(state): State<ApiState>,
    Json(features): Json<FeatureSet>,
) -> Response {
    let order = state.registry.schema().performance_order();
    if let Err(e) = features.validate(order) {
        return ApiErrorResponse::bad_request(e.to_string());
    }

    match insight::predict_performance(&state.registry, &features) {
        Ok(predicted) => ApiResponse::ok(PerformancePrediction {
            predicted_performance: predicted,
        }),
        Err(e) => internal("performance prediction", e),
    }
}

/// POST /api/v1/predict/persona
pub async fn predict_persona(
    State(state): State<ApiState>,
    Json(features): Json<FeatureSet>,
) -> Response {
    let order = state.registry.schema().cluster_order();
    if let Err(e) = features.validate(order) {
        return ApiErrorResponse::bad_request(e.to_string());
    }

    match insight::assign_persona(&state.registry, &features) {
        Ok((cluster, persona)) => ApiResponse::ok(PersonaPrediction { cluster, persona }),
        Err(e) => internal("persona assignment", e),
    }
}

/// POST /api/v1/predict/insight — the combined result.
pub async fn predict_insight(
    State(state): State<ApiState>,
    Json(request): Json<InsightRequest>,
) -> Response {
    let schema = state.registry.schema();
    if let Err(e) = request.performance.validate(schema.performance_order()) {
        return ApiErrorResponse::bad_request(format!("performance: {e}"));
    }
    if let Err(e) = request.clustering.validate(schema.cluster_order()) {
        return ApiErrorResponse::bad_request(format!("clustering: {e}"));
    }

    match insight::compute_insight(&state.registry, &request.performance, &request.clustering) {
        Ok(result) => ApiResponse::ok(result),
        Err(e) => internal("insight computation", e),
    }
}

// ============================================================================
// Handlers — benchmark & comparison
// ============================================================================

/// GET /api/v1/benchmark/stats
pub async fn benchmark_stats(State(state): State<ApiState>) -> Response {
    match benchmark::benchmark_stats(&state.registry) {
        Ok(stats) => ApiResponse::ok(stats),
        Err(e) => internal("benchmark stats", e),
    }
}

/// POST /api/v1/compare/performance
pub async fn compare_performance(
    State(state): State<ApiState>,
    Json(features): Json<FeatureSet>,
) -> Response {
    let order = state.registry.schema().performance_order();
    if let Err(e) = features.validate(order) {
        return ApiErrorResponse::bad_request(e.to_string());
    }

    match benchmark::compare_performance(&state.registry, &features) {
        Ok(report) => ApiResponse::ok(report),
        Err(e) => internal("performance comparison", e),
    }
}

// ============================================================================
// Handlers — legacy probes
// ============================================================================

/// GET / — service banner.
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "persona-flow",
        "status": "running",
    }))
}

/// GET /health — plain liveness probe for load balancers.
pub async fn legacy_health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "schema": state.registry.schema().id(),
        "uptime_secs": state.started_at.elapsed().as_secs(),
    }))
}
