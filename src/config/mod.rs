//! Service Configuration Module
//!
//! Provides service configuration loaded from a TOML file, replacing all
//! hardcoded rule thresholds with operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `PERSONA_FLOW_CONFIG` environment variable (path to TOML file)
//! 2. `persona_flow.toml` in the current working directory
//! 3. Built-in defaults (matching the shipped rule constants)
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(ServiceConfig::load());
//!
//! // Anywhere in the codebase:
//! let threshold = config::get().thresholds.velocity.low;
//! ```

mod service_config;

pub use service_config::*;

use std::sync::OnceLock;

/// Global service configuration, initialized once at startup.
static SERVICE_CONFIG: OnceLock<ServiceConfig> = OnceLock::new();

/// Initialize the global service configuration.
///
/// Must be called exactly once before any calls to `get()`.
pub fn init(config: ServiceConfig) {
    if SERVICE_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once — ignoring");
    }
}

/// Get a reference to the global service configuration.
///
/// Panics if `init()` has not been called. A missing config is a fatal
/// startup error, not a recoverable condition.
pub fn get() -> &'static ServiceConfig {
    SERVICE_CONFIG
        .get()
        .expect("config::get() called before config::init() — this is a startup bug")
}

/// Check whether the config has been initialized.
///
/// Useful for tests and optional config paths.
pub fn is_initialized() -> bool {
    SERVICE_CONFIG.get().is_some()
}
