//! Full pipeline: profile the device, pick Argon2id parameters,
//! stretch a passphrase into the master seed, and derive category
//! keys — the same flow the application layer runs at unlock.

use cyra_device::params::Argon2Params;
use cyra_device::profiler::DeviceProfiler;
use cyra_device::stretch::{generate_salt, stretch_password};
use cyra_keys::engine::HierarchicalKeyDerivation;
use cyra_types::{CyraError, DataCategory};

/// Light parameters so the test suite stays fast; production uses the
/// profiler/selector output instead.
fn light_params() -> Argon2Params {
    Argon2Params::new(1024, 2, 1).expect("test params are valid")
}

#[test]
fn unlock_flow_produces_stable_category_keys() -> Result<(), CyraError> {
    let salt = [0x07u8; 32];
    let seed = stretch_password(b"user passphrase", &salt, &light_params())?;

    let mut engine = HierarchicalKeyDerivation::new();
    engine.initialize_with_seed(seed.as_bytes())?;

    let first = engine.derive_data_category_key(DataCategory::CycleData, "phone-a")?;

    // A second unlock with the same passphrase and salt reaches the
    // same key.
    let seed_again = stretch_password(b"user passphrase", &salt, &light_params())?;
    let mut engine_again = HierarchicalKeyDerivation::new();
    engine_again.initialize_with_seed(seed_again.as_bytes())?;
    let second = engine_again.derive_data_category_key(DataCategory::CycleData, "phone-a")?;

    assert_eq!(first.as_bytes(), second.as_bytes());
    Ok(())
}

#[test]
fn wrong_passphrase_reaches_different_keys() -> Result<(), CyraError> {
    let salt = [0x07u8; 32];

    let seed_a = stretch_password(b"correct passphrase", &salt, &light_params())?;
    let seed_b = stretch_password(b"wrong passphrase", &salt, &light_params())?;

    let mut engine_a = HierarchicalKeyDerivation::new();
    let mut engine_b = HierarchicalKeyDerivation::new();
    engine_a.initialize_with_seed(seed_a.as_bytes())?;
    engine_b.initialize_with_seed(seed_b.as_bytes())?;

    let key_a = engine_a.derive_data_category_key(DataCategory::Preferences, "phone-a")?;
    let key_b = engine_b.derive_data_category_key(DataCategory::Preferences, "phone-a")?;
    assert_ne!(key_a.as_bytes(), key_b.as_bytes());
    Ok(())
}

#[test]
fn profiler_params_are_usable_for_stretching() -> Result<(), CyraError> {
    // The tier default for the weakest tier must actually stretch: the
    // calibration layer's output feeds straight into seeding.
    let profiler = DeviceProfiler::new();
    let caps = profiler.detect(2000, 2, "web", false);
    let params = profiler.optimal_params(&caps);

    let salt = generate_salt();
    let seed = stretch_password(b"user passphrase", &salt, &params)?;

    let mut engine = HierarchicalKeyDerivation::new();
    engine.initialize_with_seed(seed.as_bytes())?;
    assert!(engine.verify_key_isolation("phone-a")?);
    Ok(())
}
