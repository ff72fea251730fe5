//! Derivation path parsing, rendering, and extension.
//!
//! Paths follow the BIP-44 convention, rooted at `m` with hardened
//! indices marked by `'`:
//!
//! ```text
//! m/44'/0'/0'/0
//! ```
//!
//! Parsing accepts exactly the grammar `m(/\d+'?)*` — a bare `m` is
//! the master path. Anything else fails with
//! [`CyraError::InvalidPathFormat`]; there is no partial or
//! best-effort parse. The canonical rendering round-trips through
//! parse without alteration.

use std::fmt;
use std::str::FromStr;

use cyra_types::{CyraError, Result};

/// The hardened index offset (0x80000000) per BIP-32.
///
/// Indices at or above this value cannot be expressed in a path
/// segment; the hardened flag is carried separately.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

// ---------------------------------------------------------------------------
// PathSegment
// ---------------------------------------------------------------------------

/// One step of a derivation path: a child index plus hardening flag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct PathSegment {
    /// Child index, always below [`HARDENED_OFFSET`].
    pub index: u32,
    /// Whether this step uses hardened derivation.
    pub hardened: bool,
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

// ---------------------------------------------------------------------------
// DerivationPath
// ---------------------------------------------------------------------------

/// Immutable ordered sequence of path segments, rooted at `m`.
///
/// Two paths are equal iff their segment sequences are equal.
/// Extension ([`child`](DerivationPath::child) /
/// [`hardened_child`](DerivationPath::hardened_child)) returns a new
/// path and leaves the parent untouched.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DerivationPath {
    segments: Vec<PathSegment>,
}

impl DerivationPath {
    /// The master path `m` with no segments.
    pub fn master() -> Self {
        Self::default()
    }

    /// Parses a path string of the form `m(/\d+'?)*`.
    ///
    /// # Errors
    ///
    /// Returns [`CyraError::InvalidPathFormat`] for any other shape:
    /// missing `m` root, empty string, empty or malformed segment, or
    /// an index at or above 2³¹.
    pub fn parse(s: &str) -> Result<Self> {
        if s == "m" {
            return Ok(Self::master());
        }

        let Some(rest) = s.strip_prefix("m/") else {
            return Err(CyraError::InvalidPathFormat {
                reason: format!("path must start with 'm', got '{s}'"),
            });
        };

        let mut segments = Vec::new();

        for part in rest.split('/') {
            if part.is_empty() {
                return Err(CyraError::InvalidPathFormat {
                    reason: format!("empty segment in path '{s}'"),
                });
            }

            let (digits, hardened) = match part.strip_suffix('\'') {
                Some(digits) => (digits, true),
                None => (part, false),
            };

            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(CyraError::InvalidPathFormat {
                    reason: format!("malformed segment '{part}' in path '{s}'"),
                });
            }

            let index: u32 = digits.parse().map_err(|_| CyraError::InvalidPathFormat {
                reason: format!("index '{digits}' out of range in path '{s}'"),
            })?;

            if index >= HARDENED_OFFSET {
                return Err(CyraError::InvalidPathFormat {
                    reason: format!(
                        "index {index} exceeds maximum ({})",
                        HARDENED_OFFSET - 1
                    ),
                });
            }

            segments.push(PathSegment { index, hardened });
        }

        Ok(Self { segments })
    }

    /// Returns a new path with a non-hardened child segment appended.
    ///
    /// # Errors
    ///
    /// Returns [`CyraError::InvalidPathFormat`] if `index` is at or
    /// above 2³¹.
    pub fn child(&self, index: u32) -> Result<Self> {
        self.extend(index, false)
    }

    /// Returns a new path with a hardened child segment appended.
    ///
    /// # Errors
    ///
    /// Returns [`CyraError::InvalidPathFormat`] if `index` is at or
    /// above 2³¹.
    pub fn hardened_child(&self, index: u32) -> Result<Self> {
        self.extend(index, true)
    }

    /// The segments of this path, root first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments (the depth of the terminal key).
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    fn extend(&self, index: u32, hardened: bool) -> Result<Self> {
        if index >= HARDENED_OFFSET {
            return Err(CyraError::InvalidPathFormat {
                reason: format!(
                    "child index {index} exceeds maximum ({})",
                    HARDENED_OFFSET - 1
                ),
            });
        }

        let mut segments = self.segments.clone();
        segments.push(PathSegment { index, hardened });
        Ok(Self { segments })
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = CyraError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
