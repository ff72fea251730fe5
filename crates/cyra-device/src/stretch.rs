//! Argon2id password stretching into a master seed.
//!
//! Turns a user passphrase and a random 32-byte salt into the 32-byte
//! master seed consumed by the `cyra-keys` derivation engine. The cost
//! parameters come from the profiler (tier default) or the adaptive
//! selector; this module only executes them.

use cyra_types::{CyraError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::params::Argon2Params;

// ---------------------------------------------------------------------------
// StretchedSeed
// ---------------------------------------------------------------------------

/// 32-byte master seed produced by Argon2id stretching.
///
/// Automatically zeroized when dropped to minimize the time sensitive
/// material resides in memory. Hand it to the derivation engine and
/// let it drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct StretchedSeed([u8; 32]);

impl StretchedSeed {
    /// Fixed byte length of the seed.
    pub const LEN: usize = 32;

    /// Returns the raw 32-byte seed material.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

// StretchedSeed does not implement Clone/Debug to prevent leakage.

// ---------------------------------------------------------------------------
// Salt generation
// ---------------------------------------------------------------------------

/// Generates a fresh 32-byte random salt from the OS entropy source.
pub fn generate_salt() -> [u8; Argon2Params::SALT_LENGTH] {
    let mut salt = [0u8; Argon2Params::SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);
    salt
}

// ---------------------------------------------------------------------------
// Stretching
// ---------------------------------------------------------------------------

/// Stretches a password into a 32-byte master seed using Argon2id.
///
/// # Parameters
///
/// - `password` — user-supplied passphrase (arbitrary bytes).
/// - `salt` — random salt, exactly [`Argon2Params::SALT_LENGTH`] bytes.
/// - `params` — validated Argon2id cost parameters.
///
/// # Errors
///
/// - [`CyraError::ConfigError`] if the salt length does not match
///   `params.salt_length()`.
/// - [`CyraError::CryptoError`] if the underlying Argon2 computation
///   fails.
pub fn stretch_password(
    password: &[u8],
    salt: &[u8],
    params: &Argon2Params,
) -> Result<StretchedSeed> {
    if salt.len() != params.salt_length() {
        return Err(CyraError::ConfigError {
            reason: format!(
                "salt must be exactly {} bytes, got {}",
                params.salt_length(),
                salt.len()
            ),
        });
    }

    let argon2_params = argon2::Params::new(
        params.memory_kb(),
        params.iterations(),
        params.parallelism(),
        Some(params.key_length()),
    )
    .map_err(|e| CyraError::ConfigError {
        reason: format!("invalid Argon2 parameters: {e}"),
    })?;

    let argon2 = argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2_params,
    );

    let mut output = [0u8; 32];
    argon2
        .hash_password_into(password, salt, &mut output)
        .map_err(|e| CyraError::CryptoError {
            reason: format!("Argon2id stretching failed: {e}"),
        })?;

    Ok(StretchedSeed(output))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Light parameters suitable for fast unit tests.
    fn test_params() -> Argon2Params {
        Argon2Params::new(256, 1, 1).expect("test params are valid")
    }

    #[test]
    fn stretch_is_deterministic() -> Result<()> {
        let password = b"correct horse battery staple";
        let salt = [0x5Au8; 32];
        let params = test_params();

        let seed1 = stretch_password(password, &salt, &params)?;
        let seed2 = stretch_password(password, &salt, &params)?;
        assert_eq!(seed1.as_bytes(), seed2.as_bytes());
        Ok(())
    }

    #[test]
    fn different_password_different_seed() -> Result<()> {
        let salt = [0x5Au8; 32];
        let params = test_params();

        let seed_a = stretch_password(b"password_a", &salt, &params)?;
        let seed_b = stretch_password(b"password_b", &salt, &params)?;
        assert_ne!(seed_a.as_bytes(), seed_b.as_bytes());
        Ok(())
    }

    #[test]
    fn different_salt_different_seed() -> Result<()> {
        let params = test_params();

        let seed_a = stretch_password(b"same_password", &[0x01u8; 32], &params)?;
        let seed_b = stretch_password(b"same_password", &[0x02u8; 32], &params)?;
        assert_ne!(seed_a.as_bytes(), seed_b.as_bytes());
        Ok(())
    }

    #[test]
    fn wrong_salt_length_rejected() {
        let result = stretch_password(b"pw", &[0u8; 16], &test_params());
        assert!(result.is_err());
    }

    #[test]
    fn output_is_32_bytes() -> Result<()> {
        let seed = stretch_password(b"pw", &[0u8; 32], &test_params())?;
        assert_eq!(seed.as_bytes().len(), StretchedSeed::LEN);
        Ok(())
    }

    #[test]
    fn generated_salts_differ() {
        // Two draws colliding would mean a broken entropy source.
        let a = generate_salt();
        let b = generate_salt();
        assert_ne!(a, b);
        assert_eq!(a.len(), Argon2Params::SALT_LENGTH);
    }
}
