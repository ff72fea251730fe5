//! Device tier classification and performance scoring.
//!
//! The profiler turns coarse hardware signals (memory, core count,
//! platform string, secure-enclave presence) into a [`DeviceClass`]
//! tier and a continuous performance score. Detection degrades
//! gracefully: zeroed or missing signals classify into the lowest tier
//! instead of erroring, so capability detection can never block key
//! derivation.

use serde::{Deserialize, Serialize};

use crate::params::Argon2Params;

// ---------------------------------------------------------------------------
// DeviceClass
// ---------------------------------------------------------------------------

/// Hardware capability tier.
///
/// Tiers are totally ordered by aggregate cost budget:
/// `MobileHigh > MobileLow ≈ WebStandard > WebLimited`. Each tier
/// carries fixed default Argon2id cost parameters and a memory limit.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DeviceClass {
    /// High-end mobile device (≥6 GB RAM, ≥6 cores).
    MobileHigh,
    /// Any other mobile device.
    MobileLow,
    /// Capable web/desktop environment (≥4 GB RAM, ≥4 cores).
    WebStandard,
    /// Constrained or unknown environment; the conservative floor.
    WebLimited,
}

impl DeviceClass {
    /// Memory ceiling for key-stretching work on this tier, in bytes.
    pub fn memory_limit(&self) -> u64 {
        match self {
            DeviceClass::MobileHigh => 256 * 1024 * 1024,
            DeviceClass::MobileLow => 128 * 1024 * 1024,
            DeviceClass::WebStandard => 128 * 1024 * 1024,
            DeviceClass::WebLimited => 64 * 1024 * 1024,
        }
    }

    /// Default Argon2id iteration count for this tier.
    pub fn argon2_iterations(&self) -> u32 {
        match self {
            DeviceClass::MobileHigh => 3,
            DeviceClass::MobileLow => 2,
            DeviceClass::WebStandard => 2,
            DeviceClass::WebLimited => 2,
        }
    }

    /// Default Argon2id memory cost for this tier, in KiB.
    pub fn argon2_memory_kb(&self) -> u32 {
        match self {
            DeviceClass::MobileHigh => 256 * 1024,
            DeviceClass::MobileLow => 128 * 1024,
            DeviceClass::WebStandard => 128 * 1024,
            DeviceClass::WebLimited => 64 * 1024,
        }
    }

    /// Default Argon2id parallelism degree for this tier.
    pub fn argon2_parallelism(&self) -> u32 {
        match self {
            DeviceClass::MobileHigh => 4,
            DeviceClass::MobileLow => 2,
            DeviceClass::WebStandard => 2,
            DeviceClass::WebLimited => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// DeviceCapabilities
// ---------------------------------------------------------------------------

/// Immutable snapshot of detected device capabilities.
///
/// Created once per [`DeviceProfiler::detect`] call and never mutated.
/// Consumed by the adaptive parameter selector; callers may cache it
/// for the lifetime of the process.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeviceCapabilities {
    device_class: DeviceClass,
    available_memory: u64,
    cpu_cores: u32,
    has_secure_enclave: bool,
    platform: String,
    performance_score: f64,
}

impl DeviceCapabilities {
    /// The classified device tier.
    pub fn device_class(&self) -> DeviceClass {
        self.device_class
    }

    /// Available memory in bytes.
    pub fn available_memory(&self) -> u64 {
        self.available_memory
    }

    /// Number of CPU cores reported by the platform probe.
    pub fn cpu_cores(&self) -> u32 {
        self.cpu_cores
    }

    /// Whether hardware-backed secure key storage is present.
    pub fn has_secure_enclave(&self) -> bool {
        self.has_secure_enclave
    }

    /// Raw platform identifier string.
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Continuous performance score in `[0, 100]`, higher = more
    /// capable. Monotone in memory, cores, and enclave presence.
    pub fn performance_score(&self) -> f64 {
        self.performance_score
    }
}

// ---------------------------------------------------------------------------
// DeviceProfiler
// ---------------------------------------------------------------------------

/// Classifies devices from platform-probe signals.
///
/// Stateless; one instance per caller. Classification and scoring are
/// pure functions of the inputs, so repeated calls with identical
/// signals produce identical snapshots.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeviceProfiler;

impl DeviceProfiler {
    /// Creates a profiler.
    pub fn new() -> Self {
        Self
    }

    /// Detects device capabilities from platform-probe signals.
    ///
    /// Classification rule, first match wins:
    ///
    /// 1. Zero memory or zero cores → [`DeviceClass::WebLimited`]
    ///    (degraded detection; logged, never an error).
    /// 2. Mobile platform with ≥ 6000 MB and ≥ 6 cores →
    ///    [`DeviceClass::MobileHigh`].
    /// 3. Any other mobile platform → [`DeviceClass::MobileLow`].
    /// 4. Web/unknown platform with ≥ 4000 MB and ≥ 4 cores →
    ///    [`DeviceClass::WebStandard`].
    /// 5. Otherwise → [`DeviceClass::WebLimited`].
    pub fn detect(
        &self,
        available_memory_mb: u64,
        cpu_cores: u32,
        platform: &str,
        has_secure_enclave: bool,
    ) -> DeviceCapabilities {
        let device_class =
            classify_device(available_memory_mb, cpu_cores, platform);

        let performance_score =
            performance_score(available_memory_mb, cpu_cores, has_secure_enclave);

        tracing::debug!(
            ?device_class,
            performance_score,
            platform,
            "device capabilities detected"
        );

        DeviceCapabilities {
            device_class,
            available_memory: available_memory_mb * 1024 * 1024,
            cpu_cores,
            has_secure_enclave,
            platform: platform.to_string(),
            performance_score,
        }
    }

    /// Returns the tier-default Argon2id parameters for a snapshot.
    ///
    /// Pure and side-effect free; use
    /// [`crate::selector::ParameterSelector::select_adaptive`] when an
    /// empirical refinement is wanted.
    pub fn optimal_params(&self, capabilities: &DeviceCapabilities) -> Argon2Params {
        Argon2Params::tier_default(capabilities.device_class())
    }
}

// ---------------------------------------------------------------------------
// Internal: classification
// ---------------------------------------------------------------------------

fn is_mobile_platform(platform: &str) -> bool {
    let platform = platform.to_ascii_lowercase();
    platform.contains("ios") || platform.contains("android")
}

fn classify_device(available_memory_mb: u64, cpu_cores: u32, platform: &str) -> DeviceClass {
    // A zeroed probe means detection failed upstream. Classify into the
    // conservative floor rather than trusting the platform string alone.
    if available_memory_mb == 0 || cpu_cores == 0 {
        tracing::warn!(
            available_memory_mb,
            cpu_cores,
            platform,
            "degraded capability signals, classifying as WebLimited"
        );
        return DeviceClass::WebLimited;
    }

    if is_mobile_platform(platform) {
        if available_memory_mb >= 6000 && cpu_cores >= 6 {
            return DeviceClass::MobileHigh;
        }
        return DeviceClass::MobileLow;
    }

    if available_memory_mb >= 4000 && cpu_cores >= 4 {
        DeviceClass::WebStandard
    } else {
        DeviceClass::WebLimited
    }
}

// ---------------------------------------------------------------------------
// Internal: performance score
// ---------------------------------------------------------------------------

/// Weighted score: memory up to 40 points (saturating at 8 GB), cores
/// up to 30 points (saturating at 8 cores), secure enclave 30 points.
fn performance_score(available_memory_mb: u64, cpu_cores: u32, has_secure_enclave: bool) -> f64 {
    let memory_points = (available_memory_mb as f64 / 200.0).min(40.0);
    let cpu_points = (f64::from(cpu_cores) * 3.75).min(30.0);
    let enclave_points = if has_secure_enclave { 30.0 } else { 0.0 };

    (memory_points + cpu_points + enclave_points).min(100.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
