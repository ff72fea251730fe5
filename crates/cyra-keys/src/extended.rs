//! Extended keys and HMAC-SHA512 child expansion.
//!
//! An [`ExtendedKey`] is one node of the derivation tree: 32 bytes of
//! key material, a 32-byte chain code, and a depth counter. The master
//! key comes from the standard seed expansion
//! (`HMAC-SHA512(key="ed25519 seed", data=seed)`, per BIP32/SLIP-0010);
//! children come from HMAC-SHA512 keyed by the parent chain code.
//!
//! Hardened children mix the parent's raw private key into the HMAC
//! input. Non-hardened children mix only a SHA-256 commitment of the
//! parent key — this layer carries raw symmetric material rather than
//! curve points, so the commitment stands in for the public key. The
//! two branches are domain-separated by their leading byte.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};
use zeroize::{Zeroize, ZeroizeOnDrop};

use cyra_types::{CyraError, Result};

use crate::path::HARDENED_OFFSET;

/// HMAC-SHA512 type alias used for all child expansion.
type HmacSha512 = Hmac<Sha512>;

/// HMAC key for master key generation per SLIP-0010 §2.
const MASTER_HMAC_KEY: &[u8] = b"ed25519 seed";

/// Required master seed length in bytes.
pub const SEED_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// KeyBytes
// ---------------------------------------------------------------------------

/// 32 bytes of derived key material.
///
/// Automatically zeroized when dropped. Clone is deliberate: the
/// engine's per-path cache hands out copies, and each copy zeroizes
/// independently.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyBytes([u8; 32]);

impl KeyBytes {
    /// Fixed byte length of derived key material.
    pub const LEN: usize = 32;

    pub(crate) fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw 32-byte key material.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

// KeyBytes does not implement Debug/Display to prevent leakage.

// ---------------------------------------------------------------------------
// ExtendedKey
// ---------------------------------------------------------------------------

/// A node in the derivation tree.
///
/// Deriving a child never mutates the parent — it produces a new
/// independent `ExtendedKey` one depth deeper. The master key has
/// depth 0. Key material and chain code are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ExtendedKey {
    key: [u8; 32],
    chain_code: [u8; 32],
    #[zeroize(skip)]
    depth: u8,
}

// ExtendedKey does not implement Clone/Debug to prevent leakage.

impl ExtendedKey {
    /// Creates the depth-0 master key from a 32-byte seed.
    ///
    /// `I = HMAC-SHA512(key="ed25519 seed", data=seed)`;
    /// `I[0..32]` = master key, `I[32..64]` = chain code.
    ///
    /// # Errors
    ///
    /// Returns [`CyraError::InvalidSeedLength`] for any seed not
    /// exactly [`SEED_LENGTH`] bytes.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        if seed.len() != SEED_LENGTH {
            return Err(CyraError::InvalidSeedLength {
                expected: SEED_LENGTH,
                actual: seed.len(),
            });
        }

        let mut i = hmac_sha512(MASTER_HMAC_KEY, seed)?;

        let mut key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        key.copy_from_slice(&i[..32]);
        chain_code.copy_from_slice(&i[32..]);
        i.zeroize();

        Ok(Self {
            key,
            chain_code,
            depth: 0,
        })
    }

    /// Derives the child at `index`, producing a new key at `depth + 1`.
    ///
    /// `I = HMAC-SHA512(key=chain_code, data)` where
    ///
    /// - hardened: `data = 0x00 || parent_key || ser32(index | 0x80000000)`
    /// - non-hardened: `data = 0x02 || SHA-256(parent_key) || ser32(index)`
    ///
    /// # Errors
    ///
    /// - [`CyraError::InvalidPathFormat`] if `index` is at or above 2³¹.
    /// - [`CyraError::CryptoError`] if the maximum tree depth (255) is
    ///   exceeded or HMAC construction fails.
    pub fn derive_child(&self, index: u32, hardened: bool) -> Result<Self> {
        if index >= HARDENED_OFFSET {
            return Err(CyraError::InvalidPathFormat {
                reason: format!(
                    "child index {index} exceeds maximum ({})",
                    HARDENED_OFFSET - 1
                ),
            });
        }

        let depth = self.depth.checked_add(1).ok_or(CyraError::CryptoError {
            reason: "maximum derivation depth (255) exceeded".into(),
        })?;

        // data = prefix (1 byte) || key material (32 bytes) || index (4 bytes)
        let mut data = [0u8; 37];
        if hardened {
            data[0] = 0x00;
            data[1..33].copy_from_slice(&self.key);
            data[33..37].copy_from_slice(&(index | HARDENED_OFFSET).to_be_bytes());
        } else {
            data[0] = 0x02;
            data[1..33].copy_from_slice(&Sha256::digest(self.key));
            data[33..37].copy_from_slice(&index.to_be_bytes());
        }

        let result = hmac_sha512(&self.chain_code, &data);
        data.zeroize();
        let mut i = result?;

        let mut key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        key.copy_from_slice(&i[..32]);
        chain_code.copy_from_slice(&i[32..]);
        i.zeroize();

        Ok(Self {
            key,
            chain_code,
            depth,
        })
    }

    /// Depth of this node in the tree; the master key is 0.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Returns a zeroizing copy of this node's 32-byte key material.
    pub fn key_bytes(&self) -> KeyBytes {
        KeyBytes::new(self.key)
    }
}

// ---------------------------------------------------------------------------
// Internal: HMAC-SHA512
// ---------------------------------------------------------------------------

/// Computes HMAC-SHA512 and returns the 64-byte output.
fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<[u8; 64]> {
    let mut mac = HmacSha512::new_from_slice(key).map_err(|e| CyraError::CryptoError {
        reason: format!("HMAC-SHA512 key init failed: {e}"),
    })?;
    mac.update(data);
    let result = mac.finalize().into_bytes();

    let mut output = [0u8; 64];
    output.copy_from_slice(&result);
    Ok(output)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
