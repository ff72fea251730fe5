//! Calibration configuration with sensible defaults.
//!
//! All operational parameters of the benchmark-driven parameter
//! selection are centralized here. Every value has a documented
//! default; the latency budget is the one knob deployments are
//! expected to tune.

use serde::{Deserialize, Serialize};

use crate::{CyraError, Result};

/// Configuration for adaptive Argon2id parameter selection.
///
/// Consumed by the parameter selector; the derivation engine is
/// configuration-free by design.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Wall-clock budget for one password-stretching run, in
    /// milliseconds. The selector searches for the strongest parameter
    /// set that completes within this budget.
    pub target_duration_ms: f64,

    /// Probe password hashed during benchmark runs. Never used for
    /// real key material; only its stretching cost matters.
    pub benchmark_probe_password: String,

    /// Lowest Argon2id memory cost the selector may descend to, in KiB.
    pub memory_floor_kb: u32,

    /// Lowest Argon2id iteration count the selector may descend to.
    pub iteration_floor: u32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            target_duration_ms: 500.0,
            benchmark_probe_password: "cyra-benchmark-probe".to_string(),
            memory_floor_kb: 64,
            iteration_floor: 2,
        }
    }
}

impl CalibrationConfig {
    /// Validates all configuration values.
    ///
    /// Returns an error if any value is outside its acceptable range.
    pub fn validate(&self) -> Result<()> {
        if !self.target_duration_ms.is_finite() || self.target_duration_ms <= 0.0 {
            return Err(CyraError::ConfigError {
                reason: "target_duration_ms must be a positive finite number".into(),
            });
        }

        if self.benchmark_probe_password.is_empty() {
            return Err(CyraError::ConfigError {
                reason: "benchmark_probe_password must not be empty".into(),
            });
        }

        if self.memory_floor_kb < 8 {
            return Err(CyraError::ConfigError {
                reason: "memory_floor_kb must be at least 8 KiB (Argon2 minimum)".into(),
            });
        }

        if self.iteration_floor == 0 {
            return Err(CyraError::ConfigError {
                reason: "iteration_floor must be greater than 0".into(),
            });
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
