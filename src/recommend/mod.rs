//! Deterministic recommendation engine.
//!
//! Evaluates a fixed sequence of independent rule groups over the raw
//! feature vectors and the prediction outputs, appending at most one record
//! per group, then stable-sorts by priority. Pure function of its inputs
//! plus the threshold tables; calling it twice with identical inputs yields
//! identical output.
//!
//! ## Rule groups (evaluation order)
//!
//! 1. Completion velocity — 3-tier bucket
//! 2. Login-gap regularity (lower = better) — 3-tier bucket
//! 3. Study time per module — 4-way partition over 3 thresholds
//! 4. Weekend ratio — two-sided trigger, silent in the middle band
//! 5. Night-study ratio — two-sided trigger (5-signal schema only)
//! 6. Persona match — exact label, unknown personas contribute nothing
//! 7. Overall performance tier on the predicted score
//!
//! Evaluation order never affects the output ordering; only the final
//! stable sort does. Missing signals read as 0.0, never an error.

pub mod templates;

use templates::RecommendationCopy;

use crate::config::{self, ThresholdConfig};
use crate::types::{FeatureSet, Priority, Recommendation, SchemaVersion};

/// Known persona labels the engine has dedicated advice for.
pub const PERSONA_CONSISTENT: &str = "The Consistent";
pub const PERSONA_SPRINTER: &str = "The Sprinter";
pub const PERSONA_WARRIOR: &str = "The Warrior";

fn record(category: &str, priority: Priority, copy: RecommendationCopy) -> Recommendation {
    Recommendation {
        category: category.to_string(),
        priority,
        title: copy.title.to_string(),
        description: copy.description.to_string(),
        action: copy.action.to_string(),
        expected_impact: copy.expected_impact.to_string(),
    }
}

/// Generate the priority-sorted recommendation list using the process-wide
/// threshold configuration.
pub fn generate(
    perf: &FeatureSet,
    cluster: &FeatureSet,
    predicted_performance: f64,
    persona: &str,
    schema: SchemaVersion,
) -> Vec<Recommendation> {
    generate_with(
        &config::get().thresholds,
        perf,
        cluster,
        predicted_performance,
        persona,
        schema,
    )
}

/// Generate with an explicit threshold table (test seam).
pub fn generate_with(
    thresholds: &ThresholdConfig,
    perf: &FeatureSet,
    cluster: &FeatureSet,
    predicted_performance: f64,
    persona: &str,
    schema: SchemaVersion,
) -> Vec<Recommendation> {
    let mut records = Vec::with_capacity(7);

    records.push(velocity_group(thresholds, perf));
    records.push(login_gap_group(thresholds, perf));
    records.push(study_time_group(thresholds, perf));
    if let Some(rec) = weekend_group(thresholds, cluster) {
        records.push(rec);
    }
    if schema.has_night_signal() {
        if let Some(rec) = night_group(thresholds, cluster) {
            records.push(rec);
        }
    }
    if let Some(rec) = persona_group(persona) {
        records.push(rec);
    }
    records.push(overall_group(thresholds, predicted_performance));

    // Stable sort: equal priorities keep their emission order.
    records.sort_by_key(|r| r.priority.rank());
    records
}

/// Group 1: completion velocity, exhaustive 3-tier partition.
fn velocity_group(thresholds: &ThresholdConfig, perf: &FeatureSet) -> Recommendation {
    let velocity = perf.signal("completion_velocity");
    let t = &thresholds.velocity;

    if velocity < t.low {
        record("Completion Rate", Priority::High, templates::VELOCITY_LOW_TIER)
    } else if velocity < t.mid {
        record("Completion Rate", Priority::Medium, templates::VELOCITY_MID_TIER)
    } else {
        record("Completion Rate", Priority::Low, templates::VELOCITY_TOP_TIER)
    }
}

/// Group 2: login-gap standard deviation, inverted sense (low = best).
fn login_gap_group(thresholds: &ThresholdConfig, perf: &FeatureSet) -> Recommendation {
    let gap = perf.signal("login_gap_std");
    let t = &thresholds.login_gap;

    if gap > t.high {
        record("Consistency", Priority::High, templates::LOGIN_GAP_IRREGULAR)
    } else if gap > t.mid {
        record("Consistency", Priority::Medium, templates::LOGIN_GAP_WOBBLY)
    } else {
        record("Consistency", Priority::Low, templates::LOGIN_GAP_STEADY)
    }
}

/// Group 3: minutes per module. Four-way partition over three thresholds;
/// the ideal band is the implicit else.
fn study_time_group(thresholds: &ThresholdConfig, perf: &FeatureSet) -> Recommendation {
    let minutes = perf.signal("avg_minutes_per_module");
    let t = &thresholds.study_time;

    if minutes < t.short_minutes {
        record("Study Time", Priority::High, templates::STUDY_TIME_TOO_SHORT)
    } else if minutes < t.good_minutes {
        record("Study Time", Priority::Medium, templates::STUDY_TIME_BELOW_OPTIMAL)
    } else if minutes > t.long_minutes {
        record("Study Time", Priority::Medium, templates::STUDY_TIME_TOO_LONG)
    } else {
        record("Study Time", Priority::Low, templates::STUDY_TIME_IDEAL)
    }
}

/// Group 4: weekend ratio, two-sided trigger. Values strictly between the
/// thresholds produce no record.
fn weekend_group(thresholds: &ThresholdConfig, cluster: &FeatureSet) -> Option<Recommendation> {
    let ratio = cluster.signal("weekend_ratio");
    let t = &thresholds.weekend;

    if ratio < t.low {
        Some(record("Schedule", Priority::Medium, templates::WEEKEND_UNDERUSED))
    } else if ratio > t.high {
        Some(record("Schedule", Priority::Low, templates::WEEKEND_HEAVY))
    } else {
        None
    }
}

/// Group 5: night-study ratio, same two-sided shape as group 4.
fn night_group(thresholds: &ThresholdConfig, cluster: &FeatureSet) -> Option<Recommendation> {
    let ratio = cluster.signal("night_study_ratio");
    let t = &thresholds.night;

    if ratio > t.high {
        Some(record("Schedule", Priority::Medium, templates::NIGHT_HEAVY))
    } else if ratio < t.low {
        Some(record("Schedule", Priority::Low, templates::NIGHT_RARE))
    } else {
        None
    }
}

/// Group 6: persona-specific record by exact label match.
fn persona_group(persona: &str) -> Option<Recommendation> {
    match persona {
        PERSONA_CONSISTENT => Some(record("Persona", Priority::Low, templates::PERSONA_CONSISTENT)),
        PERSONA_SPRINTER => Some(record("Persona", Priority::Medium, templates::PERSONA_SPRINTER)),
        PERSONA_WARRIOR => Some(record("Persona", Priority::Medium, templates::PERSONA_WARRIOR)),
        _ => None,
    }
}

/// Group 7: overall tier on the predicted score, exhaustive 3-tier
/// partition.
fn overall_group(thresholds: &ThresholdConfig, predicted: f64) -> Recommendation {
    let t = &thresholds.overall;

    if predicted < t.improvement {
        record("Overall", Priority::High, templates::OVERALL_IMPROVEMENT)
    } else if predicted < t.push {
        record("Overall", Priority::Medium, templates::OVERALL_PUSH)
    } else {
        record("Overall", Priority::Low, templates::OVERALL_MAINTAIN)
    }
}
