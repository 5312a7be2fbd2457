//! persona-flow: Learner Persona & Performance Insight Service
//!
//! Serves predictions from two pre-trained models (a regression model
//! estimating a learner's performance score and a clustering model assigning
//! a persona label) behind an HTTP API, layering deterministic rule-based
//! recommendations on top of the predictions.
//!
//! ## Architecture
//!
//! - **Normalizer**: bidirectional conversion between readable feature
//!   values and the standardized representation the models expect
//! - **Recommendation Engine**: threshold rule groups over feature signals
//!   and prediction outputs, stable-sorted by priority
//! - **Insight Orchestrator**: composes normalizer, model inference, and
//!   recommendations into one atomic insight result
//! - **Inference**: opaque model collaborators loaded from JSON artifacts

pub mod api;
pub mod config;
pub mod inference;
pub mod insight;
pub mod normalize;
pub mod recommend;
pub mod types;

// Re-export service configuration
pub use config::ServiceConfig;

// Re-export commonly used types
pub use types::{
    FeatureError, FeatureSet, InsightResult, PerformanceLevel, PerformancePrediction,
    PersonaPrediction, Priority, Recommendation, SchemaVersion,
};

// Re-export inference seams
pub use inference::{
    ArtifactBundle, ArtifactError, ClusterInferer, FeatureScaler, InferenceError, ModelRegistry,
    PerformanceInferer,
};

// Re-export the normalizer
pub use normalize::Normalizer;
