//! Insight output types: recommendations, narratives, and the combined
//! per-request insight result.

use serde::{Deserialize, Serialize};

// ============================================================================
// Recommendations
// ============================================================================

/// Recommendation priority. Rank drives the final stable sort
/// (High first), never the evaluation order of the rule groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank: high=0, medium=1, low=2.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => f.write_str("high"),
            Self::Medium => f.write_str("medium"),
            Self::Low => f.write_str("low"),
        }
    }
}

/// One actionable recommendation record.
///
/// The text fields are opaque templated copy selected by the rule engine;
/// only `category` and `priority` participate in logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub action: String,
    pub expected_impact: String,
}

// ============================================================================
// Predictions and insight payloads
// ============================================================================

/// Response body for the standalone performance prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformancePrediction {
    pub predicted_performance: f64,
}

/// Response body for the standalone persona assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaPrediction {
    pub cluster: usize,
    pub persona: String,
}

/// Narrative sentences attached to an insight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightNarratives {
    /// 2-3 sentences keyed by persona (fallback sentence for unknown).
    pub persona_based: Vec<String>,
    /// Single sentence derived from the predicted performance tier.
    pub performance_based: String,
}

/// The combined insight result: prediction + persona + narratives +
/// priority-sorted recommendations. Request-scoped, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightResult {
    pub predicted_performance: f64,
    pub persona_cluster: usize,
    pub persona_label: String,
    pub insights: InsightNarratives,
    pub recommendations: Vec<Recommendation>,
}

// ============================================================================
// Benchmark & comparison
// ============================================================================

/// Per-persona benchmark row built from a readable cluster centroid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaBenchmark {
    pub cluster_id: usize,
    pub persona: String,
    /// Readable centroid value per clustering signal.
    pub signals: std::collections::BTreeMap<String, f64>,
}

/// Aggregate benchmark statistics across all personas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkStats {
    pub benchmark_by_persona: Vec<PersonaBenchmark>,
    /// Cross-persona average per clustering signal (2-decimal rounding).
    pub overall_average: std::collections::BTreeMap<String, f64>,
    pub total_personas: usize,
}

/// One centroid-derived synthetic benchmark prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub persona: String,
    pub benchmark_performance: f64,
    /// User score minus benchmark score.
    pub difference: f64,
}

/// Four-level classification of the user's percentile rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceLevel {
    #[serde(rename = "Top Performer")]
    TopPerformer,
    #[serde(rename = "Above Average")]
    AboveAverage,
    #[serde(rename = "Average")]
    Average,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl PerformanceLevel {
    /// Classify a percentile rank: >=75 / >=50 / >=25 / below.
    pub fn from_percentile(percentile: f64) -> Self {
        if percentile >= 75.0 {
            Self::TopPerformer
        } else if percentile >= 50.0 {
            Self::AboveAverage
        } else if percentile >= 25.0 {
            Self::Average
        } else {
            Self::NeedsImprovement
        }
    }
}

/// Full comparison report: user score vs centroid-derived benchmarks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub user_performance: f64,
    /// Fraction of benchmarks strictly below the user's score × 100,
    /// rounded to 1 decimal.
    pub percentile: f64,
    pub benchmark_source: String,
    pub benchmark_comparison: Vec<BenchmarkComparison>,
    pub comparison_insights: Vec<String>,
    pub performance_level: PerformanceLevel,
}
