//! Visitor fingerprints
//!
//! A fingerprint is the SHA-256 of `address + salt`, rendered as lowercase hex.
//! The raw address is never stored. Rotating the salt invalidates every
//! fingerprint, which only resets the rolling dedup window.

use sha2::{Digest, Sha256};
use std::fmt;

/// Address used when a request carries no client address header
pub const FALLBACK_ADDRESS: &str = "127.0.0.1";

/// Length of a rendered fingerprint (hex SHA-256)
pub const FINGERPRINT_LEN: usize = 64;

/// Salted, irreversible visitor identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Derive the fingerprint of a raw client address under `salt`
    ///
    /// # Examples
    ///
    /// ```
    /// use inkwell_domain::Fingerprint;
    ///
    /// let a = Fingerprint::derive("203.0.113.9", "pepper");
    /// let b = Fingerprint::derive("203.0.113.9", "pepper");
    /// assert_eq!(a, b);
    /// assert_eq!(a.as_str().len(), 64);
    /// ```
    pub fn derive(address: &str, salt: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(address.as_bytes());
        hasher.update(salt.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Wrap an already-derived fingerprint read back from storage
    ///
    /// Returns `None` unless the value is 64 lowercase hex characters.
    pub fn from_hex(value: &str) -> Option<Self> {
        let valid = value.len() == FINGERPRINT_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        valid.then(|| Self(value.to_string()))
    }

    /// Get fingerprint as hex string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix for log lines
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
