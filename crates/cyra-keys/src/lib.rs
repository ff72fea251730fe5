//! Hierarchical deterministic key derivation for the Cyra
//! key-management core.
//!
//! Implements BIP32-style tree-structured key derivation from a
//! 32-byte master seed: purpose-tagged subtrees per data category and
//! device, per-path caching, and versioned key rotation. This crate is
//! the **sole** location for key-derivation logic; it performs no I/O
//! and holds no global state — every engine instance is caller-owned.
//!
//! # Modules
//!
//! - [`path`] — derivation path parsing, rendering, and extension
//! - [`extended`] — extended keys and HMAC-SHA512 child expansion
//! - [`engine`] — the stateful derivation engine with caching and rotation

pub mod engine;
pub mod extended;
pub mod path;
