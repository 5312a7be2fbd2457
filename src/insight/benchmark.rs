//! Benchmark statistics and user-vs-persona comparison.
//!
//! The cluster centroids double as per-persona benchmarks: converted to
//! readable values they describe the "typical" learner of each persona, and
//! substituted into the user's context fields they yield synthetic
//! performance predictions the user's score can be ranked against.

use std::collections::BTreeMap;

use crate::config;
use crate::inference::ModelRegistry;
use crate::normalize::{round2, Normalizer};
use crate::types::{
    BenchmarkComparison, BenchmarkStats, ComparisonReport, FeatureSet, PerformanceLevel,
    PersonaBenchmark, SchemaVersion,
};

use super::InsightError;

/// Round to 1 decimal place (percentile wire precision).
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============================================================================
// Benchmark stats
// ============================================================================

/// Per-persona readable centroid signals plus cross-persona averages.
pub fn benchmark_stats(registry: &ModelRegistry) -> Result<BenchmarkStats, InsightError> {
    let normalizer = Normalizer::new(registry.schema());

    let mut rows = Vec::new();
    for (cluster_id, centroid) in registry.clusterer().centroids().iter().enumerate() {
        let signals = normalizer.centroid_to_readable(centroid)?;
        rows.push(PersonaBenchmark {
            cluster_id,
            persona: registry.persona_label_or_unknown(cluster_id),
            signals,
        });
    }

    let mut overall_average = BTreeMap::new();
    if !rows.is_empty() {
        for name in registry.schema().cluster_order() {
            let sum: f64 = rows.iter().map(|r| r.signals.get(*name).copied().unwrap_or(0.0)).sum();
            overall_average.insert((*name).to_string(), round2(sum / rows.len() as f64));
        }
    }

    Ok(BenchmarkStats {
        total_personas: rows.len(),
        benchmark_by_persona: rows,
        overall_average,
    })
}

// ============================================================================
// Comparison
// ============================================================================

/// Sentence pair for one comparison signal: `high` fires when the user's
/// value exceeds `mean * high_factor`, `low` when it falls below
/// `mean * low_factor`.
struct ComparisonSignal {
    field: &'static str,
    high: &'static str,
    low: &'static str,
}

/// Comparison signals per schema. For `login_gap_std` the sense is
/// inverted: a low value is the good side.
fn comparison_signals(schema: SchemaVersion) -> &'static [ComparisonSignal] {
    match schema {
        SchemaVersion::Behavioral4 => &[
            ComparisonSignal {
                field: "consistency_score",
                high: "Your consistency is above the average learner.",
                low: "Work toward a steadier study routine to reach the average.",
            },
            ComparisonSignal {
                field: "total_activities",
                high: "Your activity level is above the average learner.",
                low: "Increase your activity count to reach the average.",
            },
            ComparisonSignal {
                field: "avg_minutes_per_module",
                high: "Your study sessions go deeper than average.",
                low: "Consider spending more time per module.",
            },
        ],
        SchemaVersion::Behavioral5 => &[
            ComparisonSignal {
                field: "completion_velocity",
                high: "Your completion speed is above the average learner.",
                low: "Raise your completion speed to reach the average.",
            },
            ComparisonSignal {
                field: "login_gap_std",
                high: "Focus on improving your daily login consistency.",
                low: "Your login consistency is excellent, well above average.",
            },
            ComparisonSignal {
                field: "avg_minutes_per_module",
                high: "Your study sessions go deeper than average.",
                low: "Consider spending more time per module.",
            },
        ],
    }
}

/// Rank the user's predicted score against centroid-derived synthetic
/// benchmarks and classify the resulting percentile.
pub fn compare_performance(
    registry: &ModelRegistry,
    features: &FeatureSet,
) -> Result<ComparisonReport, InsightError> {
    let schema = registry.schema();
    let normalizer = Normalizer::new(schema);

    let user_vector = features.ordered(schema.performance_order());
    let user_perf = registry.performance().predict(&user_vector)?;

    // Synthetic benchmark per centroid: readable centroid signals plus the
    // user's own context fields.
    let mut comparisons = Vec::new();
    let mut readable_centroids = Vec::new();
    for (cluster_id, centroid) in registry.clusterer().centroids().iter().enumerate() {
        let readable = normalizer.centroid_to_readable(centroid)?;

        let mut bench: FeatureSet = readable
            .iter()
            .map(|(name, value)| (name.clone(), *value))
            .collect();
        bench.insert("study_time_category", features.signal("study_time_category"));
        bench.insert("total_active_days", features.signal("total_active_days"));

        let bench_vector = bench.ordered(schema.performance_order());
        let bench_perf = round2(registry.performance().predict(&bench_vector)?);

        comparisons.push(BenchmarkComparison {
            persona: registry.persona_label_or_unknown(cluster_id),
            benchmark_performance: bench_perf,
            difference: round2(user_perf - bench_perf),
        });
        readable_centroids.push(readable);
    }

    let percentile = if comparisons.is_empty() {
        0.0
    } else {
        let below = comparisons
            .iter()
            .filter(|c| c.benchmark_performance < user_perf)
            .count();
        below as f64 / comparisons.len() as f64 * 100.0
    };

    let comparison_insights = comparison_sentences(schema, features, &readable_centroids);

    Ok(ComparisonReport {
        user_performance: round2(user_perf),
        percentile: round1(percentile),
        benchmark_source: "persona_centroids".to_string(),
        benchmark_comparison: comparisons,
        comparison_insights,
        performance_level: PerformanceLevel::from_percentile(percentile),
    })
}

fn comparison_sentences(
    schema: SchemaVersion,
    features: &FeatureSet,
    readable_centroids: &[BTreeMap<String, f64>],
) -> Vec<String> {
    if readable_centroids.is_empty() {
        return Vec::new();
    }
    let bench_cfg = &config::get().benchmark;

    let mut sentences = Vec::new();
    for signal in comparison_signals(schema) {
        let mean: f64 = readable_centroids
            .iter()
            .map(|c| c.get(signal.field).copied().unwrap_or(0.0))
            .sum::<f64>()
            / readable_centroids.len() as f64;

        let user_value = features.signal(signal.field);
        if user_value > mean * bench_cfg.high_factor {
            sentences.push(signal.high.to_string());
        } else if user_value < mean * bench_cfg.low_factor {
            sentences.push(signal.low.to_string());
        }
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::inference::{KMeansModel, LinearModel, ModelRegistry, StandardScaler};
    use std::collections::BTreeMap as Map;

    fn ensure_config() {
        if !config::is_initialized() {
            config::init(ServiceConfig::default());
        }
    }

    /// Registry whose benchmark predictions are easy to steer: the score is
    /// exactly the completion velocity plus the active-days context.
    fn steerable_registry() -> ModelRegistry {
        let personas: Map<String, String> = [
            ("0", "The Consistent"),
            ("1", "The Sprinter"),
            ("2", "The Warrior"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        ModelRegistry::new(
            crate::types::SchemaVersion::Behavioral5,
            Box::new(LinearModel::new(vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0], 0.0)),
            Box::new(KMeansModel::new(vec![
                // readable velocities after denormalization: 0.55, 0.75, 0.95
                vec![-1.0, 0.0, 0.0, 0.0, 0.0],
                vec![0.0, 0.0, 0.0, 0.0, 0.0],
                vec![1.0, 0.0, 0.0, 0.0, 0.0],
            ])),
            Box::new(StandardScaler::new(vec![0.0; 5], vec![1.0; 5])),
            personas,
        )
    }

    fn user(velocity: f64) -> FeatureSet {
        [
            ("completion_velocity", velocity),
            ("avg_minutes_per_module", 20.0),
            ("login_gap_std", 2.5),
            ("weekend_ratio", 0.3),
            ("night_study_ratio", 0.25),
            ("study_time_category", 2.0),
            ("total_active_days", 0.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_benchmark_stats_shape() {
        ensure_config();
        let registry = steerable_registry();
        let stats = benchmark_stats(&registry).unwrap();

        assert_eq!(stats.total_personas, 3);
        assert_eq!(stats.benchmark_by_persona.len(), 3);
        assert_eq!(stats.benchmark_by_persona[0].persona, "The Consistent");
        // Overall average covers every clustering signal
        assert_eq!(stats.overall_average.len(), 5);
        // velocity mean: (0.55 + 0.75 + 0.95) / 3 = 0.75
        assert_eq!(stats.overall_average["completion_velocity"], 0.75);
    }

    #[test]
    fn test_percentile_two_of_three_below() {
        ensure_config();
        let registry = steerable_registry();
        // Benchmarks score 0.55, 0.75, 0.95. User at 0.8 beats exactly 2.
        let report = compare_performance(&registry, &user(0.8)).unwrap();

        assert_eq!(report.percentile, 66.7);
        assert_eq!(report.performance_level, PerformanceLevel::AboveAverage);
        assert_eq!(report.benchmark_comparison.len(), 3);
    }

    #[test]
    fn test_percentile_extremes() {
        ensure_config();
        let registry = steerable_registry();

        let top = compare_performance(&registry, &user(1.0)).unwrap();
        assert_eq!(top.percentile, 100.0);
        assert_eq!(top.performance_level, PerformanceLevel::TopPerformer);

        let bottom = compare_performance(&registry, &user(0.2)).unwrap();
        assert_eq!(bottom.percentile, 0.0);
        assert_eq!(bottom.performance_level, PerformanceLevel::NeedsImprovement);
    }

    #[test]
    fn test_strictly_below_rule_at_exact_tie() {
        ensure_config();
        let registry = steerable_registry();
        // User score 0.75 is exactly equal to the middle benchmark: only the
        // strictly lower one (0.55) counts.
        let report = compare_performance(&registry, &user(0.75)).unwrap();
        assert_eq!(report.percentile, 33.3);
        assert_eq!(report.performance_level, PerformanceLevel::Average);
    }

    #[test]
    fn test_comparison_sentences_use_factor_bands() {
        ensure_config();
        let registry = steerable_registry();

        // Velocity mean across readable centroids is 0.75; 1.0 > 0.75*1.2
        // fires the high-side sentence.
        let report = compare_performance(&registry, &user(1.0)).unwrap();
        assert!(report
            .comparison_insights
            .iter()
            .any(|s| s.contains("completion speed is above")));

        // 0.5 < 0.75*0.8 fires the low-side sentence.
        let report = compare_performance(&registry, &user(0.5)).unwrap();
        assert!(report
            .comparison_insights
            .iter()
            .any(|s| s.contains("Raise your completion speed")));

        // In between (0.75 exactly) fires neither for velocity.
        let report = compare_performance(&registry, &user(0.75)).unwrap();
        assert!(!report
            .comparison_insights
            .iter()
            .any(|s| s.contains("completion speed")));
    }
}
