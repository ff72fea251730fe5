//! Device capability profiling and adaptive Argon2id calibration.
//!
//! This crate decides *how expensive* password stretching should be on
//! the device it runs on. The profiler classifies coarse hardware
//! signals into a device tier; the selector benchmarks the Argon2id
//! primitive and searches for the strongest parameter set that stays
//! within a wall-clock budget; the stretch module runs the primitive
//! itself, producing the 32-byte master seed consumed by `cyra-keys`.
//!
//! # Modules
//!
//! - [`profiler`] — device tier classification and performance scoring
//! - [`params`] — validated Argon2id cost parameters and tier defaults
//! - [`selector`] — benchmark runs with an idempotent cache, adaptive search
//! - [`stretch`] — Argon2id password stretching into a master seed

pub mod params;
pub mod profiler;
pub mod selector;
pub mod stretch;
