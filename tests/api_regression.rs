//! API Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` and exercise
//! the /api/v1/* endpoints using `tower::ServiceExt::oneshot()`.
//! No binary spawn, no network port — runs in CI without `#[ignore]`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use persona_flow::api::{create_app, ApiState};
use persona_flow::config::{self, ServiceConfig};
use persona_flow::inference::ModelRegistry;
use persona_flow::types::SchemaVersion;

fn ensure_config() {
    if !config::is_initialized() {
        config::init(ServiceConfig::default());
    }
}

fn create_test_state() -> ApiState {
    ApiState::new(Arc::new(ModelRegistry::builtin(SchemaVersion::Behavioral5)))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn sample_performance() -> Value {
    json!({
        "completion_velocity": 0.75,
        "avg_minutes_per_module": 20.0,
        "login_gap_std": 2.5,
        "weekend_ratio": 0.3,
        "night_study_ratio": 0.25,
        "study_time_category": 2.0,
        "total_active_days": 15.0
    })
}

fn sample_clustering() -> Value {
    json!({
        "completion_velocity": 0.75,
        "avg_minutes_per_module": 20.0,
        "login_gap_std": 2.5,
        "weekend_ratio": 0.3,
        "night_study_ratio": 0.25
    })
}

/// All GET endpoints should return 200.
#[tokio::test]
async fn test_get_endpoints_return_200() {
    ensure_config();

    let endpoints = [
        "/",
        "/health",
        "/api/v1/health",
        "/api/v1/sample-data",
        "/api/v1/persona-samples",
        "/api/v1/debug/sample-inputs",
        "/api/v1/benchmark/stats",
    ];

    for endpoint in &endpoints {
        let app = create_app(create_test_state());
        let resp = app.oneshot(get(endpoint)).await.unwrap();
        assert!(
            resp.status().is_success(),
            "GET {endpoint} returned status {}",
            resp.status()
        );
    }
}

/// /api/v1/health reports the schema and the order contracts.
#[tokio::test]
async fn test_health_reports_schema_and_orders() {
    ensure_config();
    let app = create_app(create_test_state());
    let resp = app.oneshot(get("/api/v1/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v = body_json(resp).await;
    assert_eq!(v["data"]["status"], "healthy");
    assert_eq!(v["data"]["schema"], "v2");
    assert_eq!(v["data"]["total_personas"], 3);
    assert_eq!(v["data"]["performance_features"].as_array().unwrap().len(), 7);
    assert_eq!(v["data"]["cluster_features"].as_array().unwrap().len(), 5);
    assert_eq!(v["meta"]["version"], "1");
}

/// Performance prediction round-trips the envelope with a finite score.
#[tokio::test]
async fn test_predict_performance() {
    ensure_config();
    let app = create_app(create_test_state());
    let resp = app
        .oneshot(post_json("/api/v1/predict/performance", sample_performance()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v = body_json(resp).await;
    let score = v["data"]["predicted_performance"].as_f64().unwrap();
    assert!(score.is_finite());
}

/// Persona prediction returns one of the mapped labels.
#[tokio::test]
async fn test_predict_persona() {
    ensure_config();
    let app = create_app(create_test_state());
    let resp = app
        .oneshot(post_json("/api/v1/predict/persona", sample_clustering()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v = body_json(resp).await;
    let cluster = v["data"]["cluster"].as_u64().unwrap();
    assert!(cluster < 3);
    let persona = v["data"]["persona"].as_str().unwrap();
    assert!(["The Consistent", "The Sprinter", "The Warrior"].contains(&persona));
}

/// Combined insight returns prediction, persona, narratives, and a
/// priority-sorted recommendation list.
#[tokio::test]
async fn test_predict_insight_full_payload() {
    ensure_config();
    let app = create_app(create_test_state());
    let resp = app
        .oneshot(post_json(
            "/api/v1/predict/insight",
            json!({
                "performance": sample_performance(),
                "clustering": sample_clustering()
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v = body_json(resp).await;
    let data = &v["data"];
    assert!(data["predicted_performance"].as_f64().unwrap().is_finite());
    assert!(data["persona_label"].as_str().unwrap().len() > 0);
    assert!(data["insights"]["persona_based"].as_array().unwrap().len() >= 1);
    assert!(data["insights"]["performance_based"].as_str().unwrap().len() > 0);

    let recs = data["recommendations"].as_array().unwrap();
    assert!(!recs.is_empty());

    // Priority ordering: no medium/low before a high
    let rank = |p: &str| match p {
        "high" => 0,
        "medium" => 1,
        _ => 2,
    };
    let ranks: Vec<i32> = recs
        .iter()
        .map(|r| rank(r["priority"].as_str().unwrap()))
        .collect();
    let mut sorted = ranks.clone();
    sorted.sort_unstable();
    assert_eq!(ranks, sorted);
}

/// The struggling-learner scenario fires every rule group: 7 records with
/// a high-priority record first.
#[tokio::test]
async fn test_insight_struggling_learner_scenario() {
    ensure_config();
    let app = create_app(create_test_state());

    let clustering = json!({
        "completion_velocity": 0.3,
        "avg_minutes_per_module": 10.0,
        "login_gap_std": 4.0,
        "weekend_ratio": 0.1,
        "night_study_ratio": 0.6
    });
    let performance = json!({
        "completion_velocity": 0.3,
        "avg_minutes_per_module": 10.0,
        "login_gap_std": 4.0,
        "weekend_ratio": 0.1,
        "night_study_ratio": 0.6,
        "study_time_category": 1.0,
        "total_active_days": 3.0
    });

    let resp = app
        .oneshot(post_json(
            "/api/v1/predict/insight",
            json!({"performance": performance, "clustering": clustering}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v = body_json(resp).await;
    let data = &v["data"];
    // These readable values standardize closest to centroid 2.
    assert_eq!(data["persona_label"], "The Warrior");

    let recs = data["recommendations"].as_array().unwrap();
    // Velocity, login gap, study time, and overall fire high; weekend
    // (below 0.2), night (above 0.5), and the persona record fire medium.
    assert_eq!(recs.len(), 7);
    assert_eq!(recs[0]["priority"], "high");
    let high_count = recs.iter().filter(|r| r["priority"] == "high").count();
    assert_eq!(high_count, 4);
    let schedule_count = recs.iter().filter(|r| r["category"] == "Schedule").count();
    assert_eq!(schedule_count, 2);
    assert!(recs.iter().any(|r| r["category"] == "Persona"));
}

/// Missing fields are rejected with 400 before reaching the core.
#[tokio::test]
async fn test_malformed_bodies_return_400() {
    ensure_config();

    let cases = [
        ("/api/v1/predict/performance", json!({"completion_velocity": 0.5})),
        ("/api/v1/predict/persona", json!({})),
        (
            "/api/v1/predict/insight",
            json!({"performance": sample_performance(), "clustering": {}}),
        ),
        ("/api/v1/compare/performance", json!({"weekend_ratio": 0.3})),
    ];

    for (uri, body) in cases {
        let app = create_app(create_test_state());
        let resp = app.oneshot(post_json(uri, body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "POST {uri}");

        let v = body_json(resp).await;
        assert_eq!(v["error"]["code"], "BAD_REQUEST");
    }
}

/// Non-finite values are rejected as client errors.
#[tokio::test]
async fn test_non_finite_values_rejected() {
    ensure_config();
    let app = create_app(create_test_state());

    let mut body = sample_clustering();
    body["weekend_ratio"] = json!("NaN");
    // serde_json won't parse "NaN" as a number — this arrives as a type
    // error from the JSON extractor, also a 4xx.
    let resp = app
        .oneshot(post_json("/api/v1/predict/persona", body))
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

/// Sample data reflects the first centroid and fills context defaults.
#[tokio::test]
async fn test_sample_data_shape() {
    ensure_config();
    let app = create_app(create_test_state());
    let resp = app.oneshot(get("/api/v1/sample-data")).await.unwrap();
    let v = body_json(resp).await;

    let clustering = v["data"]["clustering"].as_object().unwrap();
    assert_eq!(clustering.len(), 5);

    let performance = v["data"]["performance"].as_object().unwrap();
    assert_eq!(performance.len(), 7);
    assert_eq!(performance["study_time_category"], 2.0);
    assert_eq!(performance["total_active_days"], 15.0);
}

/// Persona samples cover every cluster with its mapped label.
#[tokio::test]
async fn test_persona_samples_cover_all_clusters() {
    ensure_config();
    let app = create_app(create_test_state());
    let resp = app.oneshot(get("/api/v1/persona-samples")).await.unwrap();
    let v = body_json(resp).await;

    assert_eq!(v["data"]["total_personas"], 3);
    let samples = v["data"]["samples"].as_array().unwrap();
    let labels: Vec<&str> = samples
        .iter()
        .map(|s| s["persona_label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["The Consistent", "The Sprinter", "The Warrior"]);
}

/// Benchmark stats cover every persona and every clustering signal.
#[tokio::test]
async fn test_benchmark_stats_shape() {
    ensure_config();
    let app = create_app(create_test_state());
    let resp = app.oneshot(get("/api/v1/benchmark/stats")).await.unwrap();
    let v = body_json(resp).await;

    assert_eq!(v["data"]["total_personas"], 3);
    assert_eq!(v["data"]["overall_average"].as_object().unwrap().len(), 5);
}

/// Comparison returns a percentile, a level, and per-persona benchmarks.
#[tokio::test]
async fn test_compare_performance() {
    ensure_config();
    let app = create_app(create_test_state());
    let resp = app
        .oneshot(post_json("/api/v1/compare/performance", sample_performance()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v = body_json(resp).await;
    let data = &v["data"];
    let percentile = data["percentile"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&percentile));
    assert!(data["performance_level"].as_str().is_some());
    assert_eq!(data["benchmark_comparison"].as_array().unwrap().len(), 3);
    assert_eq!(data["benchmark_source"], "persona_centroids");
}

/// The 4-signal schema serves the same surface with its own contracts.
#[tokio::test]
async fn test_v1_schema_end_to_end() {
    ensure_config();
    let state = ApiState::new(Arc::new(ModelRegistry::builtin(SchemaVersion::Behavioral4)));
    let app = create_app(state.clone());

    let resp = app.oneshot(get("/api/v1/health")).await.unwrap();
    let v = body_json(resp).await;
    assert_eq!(v["data"]["schema"], "v1");
    assert_eq!(v["data"]["performance_features"].as_array().unwrap().len(), 6);
    assert_eq!(v["data"]["cluster_features"].as_array().unwrap().len(), 4);

    let app = create_app(state);
    let resp = app
        .oneshot(post_json(
            "/api/v1/predict/insight",
            json!({
                "performance": {
                    "avg_minutes_per_module": 30.0,
                    "consistency_score": 0.8,
                    "total_activities": 40.0,
                    "weekend_ratio": 0.3,
                    "study_time_category": 2.0,
                    "total_active_days": 12.0
                },
                "clustering": {
                    "avg_minutes_per_module": 30.0,
                    "consistency_score": 0.8,
                    "total_activities": 40.0,
                    "weekend_ratio": 0.3
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v = body_json(resp).await;
    let recs = v["data"]["recommendations"].as_array().unwrap();
    // Night-study group never fires for the 4-signal schema.
    assert!(recs.iter().all(|r| r["title"] != "Reconsider Your Study Hours"
        && r["title"] != "Good Study-Hour Pattern"));
}
