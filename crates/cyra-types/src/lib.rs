//! Core shared types for the Cyra key-management core.
//!
//! This crate defines all types shared across the workspace: the
//! central error enum, the result alias, and the data-category purpose
//! tags. No other crate should define shared types — everything lives
//! here.

pub mod config;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DataCategory
// ---------------------------------------------------------------------------

/// Purpose tag identifying which kind of user data an encryption key
/// protects.
///
/// Each category maps to a fixed BIP44-style purpose constant, so keys
/// for different categories live in disjoint derivation subtrees and
/// cannot be derived from one another without the master secret.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DataCategory {
    /// Menstrual cycle entries — the most sensitive category.
    CycleData,
    /// User preferences and app settings.
    Preferences,
    /// Data shared with healthcare providers.
    HealthcareSharing,
    /// Cross-device synchronization payloads.
    DeviceSync,
}

impl DataCategory {
    /// Every known category, in purpose-constant order.
    ///
    /// Used by isolation self-checks that must sweep all categories.
    pub const ALL: [DataCategory; 4] = [
        DataCategory::CycleData,
        DataCategory::Preferences,
        DataCategory::HealthcareSharing,
        DataCategory::DeviceSync,
    ];

    /// Fixed BIP44-style purpose constant for this category.
    ///
    /// The constant selects the hardened top-level subtree
    /// (`m/{purpose}'/...`) that all keys of this category derive
    /// under. Constants are frozen — changing one would orphan every
    /// key already derived for the category.
    pub fn purpose_constant(&self) -> u32 {
        match self {
            DataCategory::CycleData => 44,
            DataCategory::Preferences => 45,
            DataCategory::HealthcareSharing => 46,
            DataCategory::DeviceSync => 47,
        }
    }
}

impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycleData => write!(f, "cycle_data"),
            Self::Preferences => write!(f, "preferences"),
            Self::HealthcareSharing => write!(f, "healthcare_sharing"),
            Self::DeviceSync => write!(f, "device_sync"),
        }
    }
}

impl FromStr for DataCategory {
    type Err = CyraError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cycle_data" => Ok(Self::CycleData),
            "preferences" => Ok(Self::Preferences),
            "healthcare_sharing" => Ok(Self::HealthcareSharing),
            "device_sync" => Ok(Self::DeviceSync),
            other => Err(CyraError::ConfigError {
                reason: format!("unknown data category '{other}'"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// CyraError
// ---------------------------------------------------------------------------

/// Central error type for the Cyra key-management core.
///
/// All crates in the workspace convert their internal errors into
/// variants of this enum, ensuring a unified error handling surface.
///
/// Recoverable conditions are deliberately absent: a benchmark that
/// exceeds its latency budget reports `success = false` in its result,
/// and degraded hardware signals classify into the lowest device tier.
/// Only structural input errors propagate as `Err`.
#[derive(Debug, Error)]
pub enum CyraError {
    /// A master seed of the wrong length was supplied to the
    /// derivation engine.
    #[error("invalid seed length: expected {expected} bytes, got {actual}")]
    InvalidSeedLength {
        /// Required seed length in bytes.
        expected: usize,
        /// Length of the seed actually supplied.
        actual: usize,
    },

    /// A derivation was requested before the engine was seeded.
    #[error("derivation engine is not initialized")]
    NotInitialized,

    /// A derivation path string does not match the `m(/\d+'?)*` form.
    #[error("invalid derivation path: {reason}")]
    InvalidPathFormat {
        /// Human-readable description of the malformation.
        reason: String,
    },

    /// A cryptographic primitive failed (HMAC construction, Argon2id
    /// invocation).
    #[error("crypto error: {reason}")]
    CryptoError {
        /// Human-readable description of the cryptographic failure.
        reason: String,
    },

    /// A configuration or parameter value is invalid.
    #[error("config error: {reason}")]
    ConfigError {
        /// Human-readable description of the configuration problem.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Result alias
// ---------------------------------------------------------------------------

/// Convenience result type using [`CyraError`].
pub type Result<T> = std::result::Result<T, CyraError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
