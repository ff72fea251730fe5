//! Contract tests for device classification and adaptive calibration.
//!
//! The selector tests run the real Argon2id primitive, so they use
//! either generous budgets (tier default succeeds on the first probe)
//! or the weakest tier (short descent ladder) to keep the suite's
//! wall-clock cost bounded.

use cyra_device::params::Argon2Params;
use cyra_device::profiler::{DeviceClass, DeviceProfiler};
use cyra_device::selector::ParameterSelector;

// ===================================================================
// Classification contract
// ===================================================================

#[test]
fn high_end_mobile_profile() {
    let profiler = DeviceProfiler::new();
    let caps = profiler.detect(8000, 8, "ios", true);
    assert_eq!(caps.device_class(), DeviceClass::MobileHigh);
    assert!(caps.performance_score() > 90.0);
}

#[test]
fn low_end_web_profile() {
    let profiler = DeviceProfiler::new();
    let caps = profiler.detect(2000, 2, "web", false);
    assert_eq!(caps.device_class(), DeviceClass::WebLimited);
    assert!(caps.performance_score() < 40.0);
}

#[test]
fn degraded_signals_never_error() {
    let profiler = DeviceProfiler::new();
    // A probe that failed upstream reports zeros; classification must
    // land on the conservative floor instead of erroring.
    let caps = profiler.detect(0, 0, "", false);
    assert_eq!(caps.device_class(), DeviceClass::WebLimited);
    assert!(caps.performance_score() >= 0.0);
}

// ===================================================================
// Adaptive selection
// ===================================================================

#[test]
fn generous_budget_keeps_tier_defaults() {
    let profiler = DeviceProfiler::new();
    let mut selector = ParameterSelector::with_defaults();

    // With an effectively unlimited budget the first ladder candidate
    // (the tier default) always wins.
    let caps = profiler.detect(2000, 2, "web", false);
    let params = selector.select_adaptive(&caps, 1e9);
    assert_eq!(params, Argon2Params::tier_default(DeviceClass::WebLimited));
}

#[test]
fn higher_tier_never_selects_weaker_params() {
    let profiler = DeviceProfiler::new();
    let mut selector = ParameterSelector::with_defaults();
    let target = 1e9;

    let mobile_low = profiler.detect(4000, 4, "android", false);
    let web_limited = profiler.detect(2000, 2, "web", false);

    let stronger = selector.select_adaptive(&mobile_low, target);
    let weaker = selector.select_adaptive(&web_limited, target);

    assert!(stronger.security_cost() >= weaker.security_cost());
}

#[test]
fn impossible_budget_falls_back_to_floor() {
    let profiler = DeviceProfiler::new();
    let mut selector = ParameterSelector::with_defaults();

    // Nothing finishes in a hundredth of a millisecond; the selector
    // must degrade to the floor rather than fail.
    let caps = profiler.detect(2000, 2, "web", false);
    let params = selector.select_adaptive(&caps, 0.01);
    assert_eq!(params, Argon2Params::FLOOR);
}

#[test]
fn selection_respects_tier_memory_ceiling() {
    let profiler = DeviceProfiler::new();
    let mut selector = ParameterSelector::with_defaults();

    let caps = profiler.detect(2000, 2, "web", false);
    let params = selector.select_adaptive(&caps, 1e9);
    assert!(
        u64::from(params.memory_kb()) * 1024 <= DeviceClass::WebLimited.memory_limit()
    );
    assert!(params.iterations() >= 2);
    assert!(params.parallelism() >= 1);
}

// ===================================================================
// Benchmark cache
// ===================================================================

#[test]
fn failed_benchmark_is_cached_verbatim() {
    let mut selector = ParameterSelector::with_defaults();
    let params = Argon2Params::new(256, 1, 1).expect("valid");

    let first = selector.benchmark(&params, 0.01);
    assert!(!first.success);
    assert!(first
        .error_message
        .as_deref()
        .is_some_and(|m| !m.is_empty()));

    let second = selector.benchmark(&params, 0.01);
    assert_eq!(first.duration_ms, second.duration_ms);
    assert_eq!(first.memory_used_mb, second.memory_used_mb);
    assert_eq!(first.iterations_tested, second.iterations_tested);
    assert_eq!(first.error_message, second.error_message);
}
