//! Benchmark-driven adaptive parameter selection.
//!
//! The selector measures what the Argon2id primitive actually costs on
//! this device and descends from the tier default to the strongest
//! parameter set that completes within the caller's latency budget.
//! Benchmark results are cached by exact parameter tuple, so repeated
//! probes are idempotent — no hashing work is ever repeated for a
//! tuple already measured.

use std::collections::HashMap;
use std::time::Instant;

use cyra_types::config::CalibrationConfig;
use cyra_types::Result;
use serde::{Deserialize, Serialize};

use crate::params::Argon2Params;
use crate::profiler::DeviceCapabilities;
use crate::stretch::stretch_password;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Fixed salt for benchmark probes. Only the stretching cost matters;
/// the output is discarded.
const PROBE_SALT: [u8; Argon2Params::SALT_LENGTH] = [0x42; Argon2Params::SALT_LENGTH];

// ---------------------------------------------------------------------------
// BenchmarkResult
// ---------------------------------------------------------------------------

/// Outcome of one benchmark run of the password-hashing primitive.
///
/// `success = false` is a recoverable condition, not an error: it tells
/// the selector this parameter set is too heavy for the budget.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Measured wall-clock duration in milliseconds.
    pub duration_ms: f64,
    /// Peak memory used by the run, in MiB.
    pub memory_used_mb: f64,
    /// Iteration count of the parameter set tested.
    pub iterations_tested: u32,
    /// Whether the run completed within the target duration.
    pub success: bool,
    /// Populated when `success` is false.
    pub error_message: Option<String>,
}

// ---------------------------------------------------------------------------
// ParameterSelector
// ---------------------------------------------------------------------------

/// Adaptive Argon2id parameter selector with an idempotent benchmark
/// cache.
///
/// One instance per caller; the cache lives as long as the instance.
/// Benchmarking is the only operation in the core with non-trivial
/// wall-clock cost, and it never blocks derivation on other instances.
pub struct ParameterSelector {
    config: CalibrationConfig,
    /// The guaranteed-lightest parameter set, returned when even the
    /// weakest ladder candidate exceeds the budget.
    floor: Argon2Params,
    /// Cache keyed by `"memory:iterations:parallelism:target"`.
    benchmark_cache: HashMap<String, BenchmarkResult>,
}

impl ParameterSelector {
    /// Creates a selector from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`cyra_types::CyraError::ConfigError`] if the
    /// configuration fails validation.
    pub fn new(config: CalibrationConfig) -> Result<Self> {
        config.validate()?;
        let floor = Argon2Params::new(config.memory_floor_kb, config.iteration_floor, 1)?;
        Ok(Self {
            config,
            floor,
            benchmark_cache: HashMap::new(),
        })
    }

    /// Creates a selector with the default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: CalibrationConfig::default(),
            floor: Argon2Params::FLOOR,
            benchmark_cache: HashMap::new(),
        }
    }

    /// Executes the password-hashing primitive once with `params` and
    /// measures its cost.
    ///
    /// The result is cached by the exact `(params, target)` tuple: a
    /// second call with identical inputs returns the cached value
    /// without re-running the primitive. A run whose measured duration
    /// exceeds `target_duration_ms` reports `success = false` with a
    /// populated `error_message`; callers must not adopt failing
    /// parameters.
    pub fn benchmark(
        &mut self,
        params: &Argon2Params,
        target_duration_ms: f64,
    ) -> BenchmarkResult {
        let cache_key = format!(
            "{}:{}:{}:{}",
            params.memory_kb(),
            params.iterations(),
            params.parallelism(),
            target_duration_ms
        );

        if let Some(cached) = self.benchmark_cache.get(&cache_key) {
            tracing::debug!(%cache_key, "benchmark cache hit");
            return cached.clone();
        }

        let password = self.config.benchmark_probe_password.as_bytes();
        let start = Instant::now();
        let outcome = stretch_password(password, &PROBE_SALT, params);
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        let memory_used_mb = f64::from(params.memory_kb()) / 1024.0;

        let result = match outcome {
            Ok(_) => {
                let success = duration_ms <= target_duration_ms;
                BenchmarkResult {
                    duration_ms,
                    memory_used_mb,
                    iterations_tested: params.iterations(),
                    success,
                    error_message: if success {
                        None
                    } else {
                        Some(format!(
                            "benchmark exceeded target duration: {duration_ms:.1}ms > {target_duration_ms:.1}ms"
                        ))
                    },
                }
            }
            Err(e) => BenchmarkResult {
                duration_ms,
                memory_used_mb,
                iterations_tested: params.iterations(),
                success: false,
                error_message: Some(format!("benchmark run failed: {e}")),
            },
        };

        tracing::debug!(
            memory_kb = params.memory_kb(),
            iterations = params.iterations(),
            duration_ms,
            success = result.success,
            "benchmark complete"
        );

        self.benchmark_cache.insert(cache_key, result.clone());
        result
    }

    /// Selects the strongest parameter set that completes within
    /// `target_duration_ms` on this device.
    ///
    /// Descends a candidate ladder from the tier default (memory
    /// halving down to the configured floor, iterations stepping down
    /// to the configured floor, parallelism fixed at the tier default)
    /// and returns the first candidate whose benchmark succeeds. The
    /// ladder never exceeds the tier's memory ceiling.
    ///
    /// If every candidate exceeds the budget, the configured floor is
    /// returned: stretching must never become impossible, only weaker.
    pub fn select_adaptive(
        &mut self,
        capabilities: &DeviceCapabilities,
        target_duration_ms: f64,
    ) -> Argon2Params {
        let default = Argon2Params::tier_default(capabilities.device_class());
        let iteration_floor = self.config.iteration_floor.min(default.iterations());
        let memory_floor_kb = self.config.memory_floor_kb.min(default.memory_kb());

        // Halving memory while iterations stay within [floor, default]
        // keeps the ladder strictly descending in security cost, so the
        // first success is the strongest affordable candidate.
        let mut memory_kb = default.memory_kb();
        while memory_kb >= memory_floor_kb {
            for iterations in (iteration_floor..=default.iterations()).rev() {
                let candidate =
                    match Argon2Params::new(memory_kb, iterations, default.parallelism()) {
                        Ok(candidate) => candidate,
                        Err(_) => continue,
                    };

                let result = self.benchmark(&candidate, target_duration_ms);
                if result.success {
                    tracing::debug!(
                        memory_kb,
                        iterations,
                        duration_ms = result.duration_ms,
                        "adaptive selection settled"
                    );
                    return candidate;
                }
            }

            memory_kb /= 2;
        }

        tracing::warn!(
            device_class = ?capabilities.device_class(),
            target_duration_ms,
            "no candidate met the latency budget, falling back to floor parameters"
        );
        self.floor
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
