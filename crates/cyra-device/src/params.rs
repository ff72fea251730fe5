//! Validated Argon2id cost parameters.
//!
//! An [`Argon2Params`] value can only be obtained through the
//! validating constructor or as a tier default, so every instance in
//! circulation satisfies the Argon2id parameter constraints. Salt and
//! derived-key lengths are fixed at 32 bytes across the system.

use cyra_types::{CyraError, Result};
use serde::{Deserialize, Serialize};

use crate::profiler::DeviceClass;

// ---------------------------------------------------------------------------
// Argon2Params
// ---------------------------------------------------------------------------

/// Immutable Argon2id cost parameters.
///
/// Produced either as a tier default ([`Argon2Params::tier_default`])
/// or as the output of adaptive selection; consumed by the
/// password-stretching step.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Argon2Params {
    memory_kb: u32,
    iterations: u32,
    parallelism: u32,
}

impl Argon2Params {
    /// Fixed salt length in bytes.
    pub const SALT_LENGTH: usize = 32;

    /// Fixed derived-key length in bytes.
    pub const KEY_LENGTH: usize = 32;

    /// The lightest fixed parameter floor (64 KiB, 2 passes, 1 lane).
    ///
    /// Adaptive selection falls back to this set when even the weakest
    /// ladder candidate exceeds the latency budget.
    pub const FLOOR: Argon2Params = Argon2Params {
        memory_kb: 64,
        iterations: 2,
        parallelism: 1,
    };

    /// Creates a validated parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`CyraError::ConfigError`] if `iterations` or
    /// `parallelism` is zero, or if `memory_kb` is below the Argon2
    /// minimum of `8 × parallelism` KiB.
    pub fn new(memory_kb: u32, iterations: u32, parallelism: u32) -> Result<Self> {
        if iterations == 0 {
            return Err(CyraError::ConfigError {
                reason: "argon2 iterations must be greater than 0".into(),
            });
        }

        if parallelism == 0 {
            return Err(CyraError::ConfigError {
                reason: "argon2 parallelism must be greater than 0".into(),
            });
        }

        if memory_kb < 8 * parallelism {
            return Err(CyraError::ConfigError {
                reason: format!(
                    "argon2 memory must be at least {} KiB for parallelism {}, got {}",
                    8 * parallelism,
                    parallelism,
                    memory_kb
                ),
            });
        }

        Ok(Self {
            memory_kb,
            iterations,
            parallelism,
        })
    }

    /// Returns the default parameter set for a device tier.
    ///
    /// Tier defaults are frozen constants; [`crate::selector`] refines
    /// them empirically but never exceeds the tier's memory ceiling.
    pub fn tier_default(class: DeviceClass) -> Self {
        Self {
            memory_kb: class.argon2_memory_kb(),
            iterations: class.argon2_iterations(),
            parallelism: class.argon2_parallelism(),
        }
    }

    /// Memory cost in KiB.
    pub fn memory_kb(&self) -> u32 {
        self.memory_kb
    }

    /// Iteration count (number of passes).
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Parallelism degree (number of lanes).
    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    /// Salt length in bytes (fixed).
    pub fn salt_length(&self) -> usize {
        Self::SALT_LENGTH
    }

    /// Derived-key length in bytes (fixed).
    pub fn key_length(&self) -> usize {
        Self::KEY_LENGTH
    }

    /// Aggregate security cost: `iterations × memory_kb`.
    ///
    /// The ordering the adaptive selector preserves across device
    /// tiers.
    pub fn security_cost(&self) -> u64 {
        u64::from(self.iterations) * u64::from(self.memory_kb)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_params_accepted() -> Result<()> {
        let params = Argon2Params::new(65_536, 3, 4)?;
        assert_eq!(params.memory_kb(), 65_536);
        assert_eq!(params.iterations(), 3);
        assert_eq!(params.parallelism(), 4);
        Ok(())
    }

    #[test]
    fn zero_iterations_rejected() {
        assert!(Argon2Params::new(65_536, 0, 1).is_err());
    }

    #[test]
    fn zero_parallelism_rejected() {
        assert!(Argon2Params::new(65_536, 3, 0).is_err());
    }

    #[test]
    fn memory_below_argon2_minimum_rejected() {
        // 8 KiB per lane is the Argon2 floor; 16 KiB with 4 lanes is under it.
        assert!(Argon2Params::new(16, 3, 4).is_err());
    }

    #[test]
    fn fixed_lengths() -> Result<()> {
        let params = Argon2Params::new(1024, 2, 1)?;
        assert_eq!(params.salt_length(), 32);
        assert_eq!(params.key_length(), 32);
        Ok(())
    }

    #[test]
    fn tier_defaults_are_valid() {
        for class in [
            DeviceClass::MobileHigh,
            DeviceClass::MobileLow,
            DeviceClass::WebStandard,
            DeviceClass::WebLimited,
        ] {
            let params = Argon2Params::tier_default(class);
            // Re-validating through the constructor must succeed.
            assert!(Argon2Params::new(
                params.memory_kb(),
                params.iterations(),
                params.parallelism()
            )
            .is_ok());
        }
    }

    #[test]
    fn tier_defaults_ordered_by_security_cost() {
        let high = Argon2Params::tier_default(DeviceClass::MobileHigh);
        let low = Argon2Params::tier_default(DeviceClass::MobileLow);
        let web = Argon2Params::tier_default(DeviceClass::WebStandard);
        let limited = Argon2Params::tier_default(DeviceClass::WebLimited);

        assert!(high.security_cost() > low.security_cost());
        assert_eq!(low.security_cost(), web.security_cost());
        assert!(web.security_cost() > limited.security_cost());
    }

    #[test]
    fn floor_passes_validation() {
        let floor = Argon2Params::FLOOR;
        assert!(Argon2Params::new(
            floor.memory_kb(),
            floor.iterations(),
            floor.parallelism()
        )
        .is_ok());
    }

    #[test]
    fn floor_is_weakest() {
        for class in [
            DeviceClass::MobileHigh,
            DeviceClass::MobileLow,
            DeviceClass::WebStandard,
            DeviceClass::WebLimited,
        ] {
            assert!(
                Argon2Params::tier_default(class).security_cost()
                    >= Argon2Params::FLOOR.security_cost()
            );
        }
    }

    #[test]
    fn security_cost_product() -> Result<()> {
        let params = Argon2Params::new(1024, 3, 1)?;
        assert_eq!(params.security_cost(), 3 * 1024);
        Ok(())
    }
}
