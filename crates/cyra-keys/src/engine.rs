//! The stateful hierarchical key derivation engine.
//!
//! One [`HierarchicalKeyDerivation`] instance owns a master key
//! (absent until seeded), a monotone key-version counter, and a cache
//! of previously derived keys keyed by canonical path string. The
//! state machine is `Uninitialized → Initialized → (Rotated →
//! Initialized)`; every derivation before seeding fails fast.
//!
//! Instances are caller-owned with no global state. All mutating
//! operations take `&mut self`, so exclusive access is enforced by
//! ownership — share an instance across threads by wrapping it in a
//! lock; separate instances never contend.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use cyra_types::{CyraError, DataCategory, Result};

use crate::extended::{ExtendedKey, KeyBytes};
use crate::path::DerivationPath;

// ---------------------------------------------------------------------------
// HierarchicalKeyDerivation
// ---------------------------------------------------------------------------

/// Deterministic tree-structured key derivation with per-path caching
/// and versioned rotation.
///
/// # Invariants
///
/// - The cache is never consulted or populated before initialization.
/// - For a fixed master key and version, derivation is a pure function
///   of the path: same input, byte-identical output, forever.
/// - The version counter only moves forward while the instance lives.
#[derive(Default)]
pub struct HierarchicalKeyDerivation {
    master_key: Option<ExtendedKey>,
    key_version: u32,
    /// Canonical path render → derived key, valid for the current
    /// master key and version.
    derived_cache: HashMap<String, KeyBytes>,
}

impl HierarchicalKeyDerivation {
    /// Creates an uninitialized engine at version 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the engine, creating the depth-0 master key.
    ///
    /// The only `Uninitialized → Initialized` transition. Re-seeding an
    /// initialized engine replaces the master key and clears the path
    /// cache; re-seeding with the same seed reproduces byte-identical
    /// derivations. The version counter is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`CyraError::InvalidSeedLength`] for any seed not
    /// exactly 32 bytes; the engine state is unchanged on error.
    pub fn initialize_with_seed(&mut self, seed: &[u8]) -> Result<()> {
        let master_key = ExtendedKey::from_seed(seed)?;
        self.master_key = Some(master_key);
        self.derived_cache.clear();
        tracing::debug!(key_version = self.key_version, "derivation engine seeded");
        Ok(())
    }

    /// Whether the engine has been seeded.
    pub fn is_initialized(&self) -> bool {
        self.master_key.is_some()
    }

    /// Current key version. Starts at 0; incremented only by
    /// [`rotate_keys`](Self::rotate_keys).
    pub fn key_version(&self) -> u32 {
        self.key_version
    }

    /// Derives the 32-byte key at a derivation path.
    ///
    /// Parses the path, walks it from the master key, and returns the
    /// terminal key material. Results are memoized by canonical path
    /// string for the lifetime of the current key version; a cache hit
    /// returns identical bytes without recomputation.
    ///
    /// # Errors
    ///
    /// - [`CyraError::NotInitialized`] before seeding.
    /// - [`CyraError::InvalidPathFormat`] for a malformed path string.
    pub fn derive_key_at_path(&mut self, path_str: &str) -> Result<KeyBytes> {
        let master_key = self.master_key.as_ref().ok_or(CyraError::NotInitialized)?;

        let path = DerivationPath::parse(path_str)?;
        let canonical = path.to_string();

        if let Some(cached) = self.derived_cache.get(&canonical) {
            tracing::trace!(path = %canonical, "derivation cache hit");
            return Ok(cached.clone());
        }

        let key_bytes = walk(master_key, &path)?;
        self.derived_cache.insert(canonical, key_bytes.clone());
        Ok(key_bytes)
    }

    /// Derives the purpose-isolated key for a data category on one
    /// device.
    ///
    /// The path is built deterministically as
    /// `m/{purpose}'/0'/0'/{device_hash}`, where `purpose` is the
    /// category's fixed constant and `device_hash` is a stable 31-bit
    /// hash of `device_id`. Keys for different categories or devices
    /// therefore live in disjoint subtrees.
    ///
    /// # Errors
    ///
    /// Returns [`CyraError::NotInitialized`] before seeding.
    pub fn derive_data_category_key(
        &mut self,
        category: DataCategory,
        device_id: &str,
    ) -> Result<KeyBytes> {
        let path = category_path(category, device_id)?;
        self.derive_key_at_path(&path.to_string())
    }

    /// Increments the key version and invalidates the path cache.
    ///
    /// The master key's bytes are not changed: derivable output stays
    /// the same until the caller re-seeds. Forward secrecy is completed
    /// by re-initializing with a freshly mixed seed (e.g. the old seed
    /// hashed together with the new version) so that post-rotation
    /// derivations differ from pre-rotation ones. Returns the new
    /// version.
    pub fn rotate_keys(&mut self) -> u32 {
        self.key_version += 1;
        self.derived_cache.clear();
        tracing::debug!(key_version = self.key_version, "keys rotated, cache cleared");
        self.key_version
    }

    /// Self-check that all category keys for `device_id` are pairwise
    /// distinct.
    ///
    /// Detects accidental purpose-constant collisions; it is not a
    /// security proof.
    ///
    /// # Errors
    ///
    /// Returns [`CyraError::NotInitialized`] before seeding.
    pub fn verify_key_isolation(&mut self, device_id: &str) -> Result<bool> {
        let mut keys = Vec::with_capacity(DataCategory::ALL.len());
        for category in DataCategory::ALL {
            keys.push(self.derive_data_category_key(category, device_id)?);
        }

        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                if a.as_bytes() == b.as_bytes() {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Internal: path walking
// ---------------------------------------------------------------------------

/// Walks a parsed path from the master key, deriving one child per
/// segment. An empty path yields the master key's own material.
fn walk(master_key: &ExtendedKey, path: &DerivationPath) -> Result<KeyBytes> {
    let segments = path.segments();

    let Some(first) = segments.first() else {
        return Ok(master_key.key_bytes());
    };

    let mut current = master_key.derive_child(first.index, first.hardened)?;
    for segment in &segments[1..] {
        current = current.derive_child(segment.index, segment.hardened)?;
    }

    Ok(current.key_bytes())
}

// ---------------------------------------------------------------------------
// Internal: category paths
// ---------------------------------------------------------------------------

/// Builds the canonical path `m/{purpose}'/0'/0'/{device_hash}`.
fn category_path(category: DataCategory, device_id: &str) -> Result<DerivationPath> {
    DerivationPath::master()
        .hardened_child(category.purpose_constant())?
        .hardened_child(0)?
        .hardened_child(0)?
        .child(device_hash(device_id))
}

/// Stable 31-bit hash of a device identifier: the first four bytes of
/// SHA-256, masked to keep the leaf index non-hardened.
fn device_hash(device_id: &str) -> u32 {
    let digest = Sha256::digest(device_id.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) & 0x7FFF_FFFF
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
