//! Service Configuration - rule thresholds and server settings as tunable TOML values
//!
//! Every threshold the recommendation engine and the narrative tiers use is a
//! field in this module. Each struct implements `Default` with the shipped
//! constants, ensuring zero-change behavior when no config file is present.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::types::SchemaVersion;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a persona-flow deployment.
///
/// Load with `ServiceConfig::load()` which searches:
/// 1. `$PERSONA_FLOW_CONFIG` env var
/// 2. `./persona_flow.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Model artifact location and schema selection
    #[serde(default)]
    pub models: ModelConfig,

    /// Recommendation rule thresholds
    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// Benchmark comparison tuning
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
}

impl ServiceConfig {
    /// Load configuration from the standard search path.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("PERSONA_FLOW_CONFIG") {
            return Self::load_from(Path::new(&path));
        }

        let default_path = Path::new("persona_flow.toml");
        if default_path.exists() {
            return Self::load_from(default_path);
        }

        info!("No config file found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific path, falling back to defaults on any error.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<Self>(&raw) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {} — using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {} — using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP API
    #[serde(default = "default_addr")]
    pub addr: String,
}

fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

// ============================================================================
// Models
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Directory holding the exported model artifacts
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: String,

    /// Active behavioral schema generation
    #[serde(default)]
    pub schema: SchemaVersion,
}

fn default_artifact_dir() -> String {
    "./artifacts".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_dir: default_artifact_dir(),
            schema: SchemaVersion::default(),
        }
    }
}

// ============================================================================
// Rule Thresholds
// ============================================================================

/// All recommendation-engine and narrative thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ThresholdConfig {
    #[serde(default)]
    pub velocity: VelocityThresholds,
    #[serde(default)]
    pub login_gap: LoginGapThresholds,
    #[serde(default)]
    pub study_time: StudyTimeThresholds,
    #[serde(default)]
    pub weekend: ScheduleBandThresholds,
    #[serde(default)]
    pub night: NightBandThresholds,
    #[serde(default)]
    pub overall: OverallThresholds,
    #[serde(default)]
    pub narrative: NarrativeThresholds,
}

/// Completion-velocity tiers: `< low` high priority, `< mid` medium,
/// else low.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityThresholds {
    pub low: f64,
    pub mid: f64,
}

impl Default for VelocityThresholds {
    fn default() -> Self {
        Self { low: 0.5, mid: 0.75 }
    }
}

/// Login-gap tiers (lower value = more regular): `> high` high priority,
/// `> mid` medium, else low.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginGapThresholds {
    pub mid: f64,
    pub high: f64,
}

impl Default for LoginGapThresholds {
    fn default() -> Self {
        Self { mid: 2.0, high: 3.0 }
    }
}

/// Study-time partition over 3 thresholds: `< short` too short,
/// `< good` below optimal, `> long` too long, else the ideal band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyTimeThresholds {
    pub short_minutes: f64,
    pub good_minutes: f64,
    pub long_minutes: f64,
}

impl Default for StudyTimeThresholds {
    fn default() -> Self {
        Self {
            short_minutes: 15.0,
            good_minutes: 25.0,
            long_minutes: 45.0,
        }
    }
}

/// Two-sided weekend-ratio band: trigger below `low` or above `high`,
/// silent strictly in between.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleBandThresholds {
    pub low: f64,
    pub high: f64,
}

impl Default for ScheduleBandThresholds {
    fn default() -> Self {
        Self { low: 0.2, high: 0.5 }
    }
}

/// Two-sided night-study band (5-signal schema only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NightBandThresholds {
    pub low: f64,
    pub high: f64,
}

impl Default for NightBandThresholds {
    fn default() -> Self {
        Self { low: 0.1, high: 0.5 }
    }
}

/// Overall recommendation tiers on the predicted score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallThresholds {
    pub improvement: f64,
    pub push: f64,
}

impl Default for OverallThresholds {
    fn default() -> Self {
        Self {
            improvement: 2.5,
            push: 3.5,
        }
    }
}

/// Narrative-sentence tiers on the predicted score.
///
/// Intentionally coarser than [`OverallThresholds`] (2/3 vs 2.5/3.5) —
/// the divergence is inherited product behavior and is kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeThresholds {
    pub stable: f64,
    pub strong: f64,
}

impl Default for NarrativeThresholds {
    fn default() -> Self {
        Self {
            stable: 2.0,
            strong: 3.0,
        }
    }
}

// ============================================================================
// Benchmark
// ============================================================================

/// Comparison-insight trigger factors against the cross-cluster mean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Above `mean * high_factor` triggers the high-side sentence
    pub high_factor: f64,
    /// Below `mean * low_factor` triggers the low-side sentence
    pub low_factor: f64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            high_factor: 1.2,
            low_factor: 0.8,
        }
    }
}
