//! Insight orchestration.
//!
//! Composes the feature normalizer, the opaque model collaborators, and the
//! recommendation engine into the combined per-request insight. The whole
//! computation is atomic: either a full [`InsightResult`] or a single error,
//! never a partial payload.

pub mod benchmark;

use thiserror::Error;

use crate::config;
use crate::inference::{InferenceError, ModelRegistry};
use crate::normalize::Normalizer;
use crate::recommend::{self, PERSONA_CONSISTENT, PERSONA_SPRINTER, PERSONA_WARRIOR};
use crate::types::{FeatureError, FeatureSet, InsightNarratives, InsightResult};

// ============================================================================
// Error Types
// ============================================================================

/// Flat error for any insight computation failure. Handlers surface it as a
/// generic internal error; causes are not distinguished to the client.
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("feature handling failed: {0}")]
    Feature(#[from] FeatureError),
}

// ============================================================================
// Single-model operations
// ============================================================================

/// Predict the performance score from a readable performance feature set.
///
/// The regression model consumes readable (unscaled) inputs assembled in
/// the schema's performance order.
pub fn predict_performance(
    registry: &ModelRegistry,
    features: &FeatureSet,
) -> Result<f64, InsightError> {
    let vector = features.ordered(registry.schema().performance_order());
    Ok(registry.performance().predict(&vector)?)
}

/// Assign the persona cluster for a readable clustering feature set.
///
/// The 5-signal schema's clustering model was trained on z-scored input, so
/// readable values are standardized first; the 4-signal scaler was fitted
/// directly on readable values and gets them unchanged. Either way the
/// external scaler runs before cluster assignment.
pub fn assign_persona(
    registry: &ModelRegistry,
    features: &FeatureSet,
) -> Result<(usize, String), InsightError> {
    let schema = registry.schema();
    let model_input = if schema.prenormalize_clustering() {
        Normalizer::new(schema).vector_to_zscore(features)
    } else {
        features.clone()
    };

    let vector = model_input.ordered(schema.cluster_order());
    let scaled = registry.scaler().scale(&vector)?;
    let cluster_id = registry.clusterer().assign(&scaled)?;
    let persona = registry.persona_label(cluster_id);
    Ok((cluster_id, persona))
}

// ============================================================================
// Combined insight
// ============================================================================

/// Compute the full insight: prediction, persona, narratives, and the
/// priority-sorted recommendation list.
pub fn compute_insight(
    registry: &ModelRegistry,
    perf: &FeatureSet,
    cluster: &FeatureSet,
) -> Result<InsightResult, InsightError> {
    let predicted = predict_performance(registry, perf)?;
    let (cluster_id, persona) = assign_persona(registry, cluster)?;

    let insights = InsightNarratives {
        persona_based: persona_narratives(&persona),
        performance_based: performance_narrative(predicted),
    };

    let recommendations =
        recommend::generate(perf, cluster, predicted, &persona, registry.schema());

    Ok(InsightResult {
        predicted_performance: predicted,
        persona_cluster: cluster_id,
        persona_label: persona,
        insights,
        recommendations,
    })
}

/// Fixed narrative bank keyed by persona label.
fn persona_narratives(persona: &str) -> Vec<String> {
    let sentences: &[&str] = match persona {
        PERSONA_CONSISTENT => &[
            "Your study rhythm is remarkably stable and regular.",
            "Discipline is your main strength as a learner.",
            "That high consistency produces steady, sustainable progress.",
        ],
        PERSONA_SPRINTER => &[
            "You absorb material quickly and study efficiently.",
            "Your sprint capability is strong, but consistency could improve.",
            "Fast-paced learning methods suit your style well.",
        ],
        PERSONA_WARRIOR => &[
            "You bring high energy and strong dedication to learning.",
            "You are a persistent learner who does not give up on difficult material.",
            "That effort will pay off once paired with consistency.",
        ],
        _ => &["No persona insight available yet."],
    };
    sentences.iter().map(|s| (*s).to_string()).collect()
}

/// One performance sentence by 3-tier threshold on the predicted score.
///
/// Tiers come from `thresholds.narrative` (defaults 2/3), which is coarser
/// than the recommendation engine's overall tiers on purpose.
fn performance_narrative(predicted: f64) -> String {
    let t = &config::get().thresholds.narrative;
    if predicted > t.strong {
        "Your learning performance is very good.".to_string()
    } else if predicted > t.stable {
        "Your performance is fairly stable.".to_string()
    } else {
        "Your performance needs improvement.".to_string()
    }
}
