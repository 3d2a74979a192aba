// crates/gate-signer/src/lib.rs
// ============================================================================
// Module: Gate Signer
// Description: HMAC-SHA256 keyed MAC over a verdict's canonical signed fields.
// Purpose: Give every emitted Verdict a non-repudiation signature, and let
//          downstream auditors verify it in constant time.
// Dependencies: gate-core, hmac, sha2, subtle, serde_jcs
// ============================================================================

//! ## Overview
//! [`HmacSigner`] computes a hex-encoded HMAC-SHA256 over the canonical JSON
//! serialization (sorted keys, via `serde_jcs`) of [`gate_core::Verdict::signed_fields`].
//! The signing secret is loaded once at construction; its absence is a fatal
//! startup error the caller must surface, not a [`gate_core::SignerError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use gate_core::Signer;
use gate_core::SignerError;
use gate_core::Verdict;
use hmac::Hmac;
use hmac::Mac;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Reserved key-version tag for the default, non-rotating signer.
const DEFAULT_KEY_VERSION: u32 = 1;

// ============================================================================
// SECTION: HMAC Signer
// ============================================================================

/// HMAC-SHA256 [`Signer`] over a single process-wide secret.
///
/// # Invariants
/// - The secret is immutable after construction; rotation requires building a
///   new `HmacSigner` and restarting, per the signer's key-rotation note.
pub struct HmacSigner {
    /// Signing secret, loaded once at startup.
    secret: Vec<u8>,
    /// Reserved key-version tag attached to verdicts this signer produces.
    key_version: u32,
}

impl HmacSigner {
    /// Builds a signer from a non-empty secret.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::SecretUnavailable`] when `secret` is empty;
    /// callers should treat this as a fatal startup condition, not a
    /// per-request signing failure.
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, SignerError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(SignerError::SecretUnavailable);
        }
        Ok(Self { secret, key_version: DEFAULT_KEY_VERSION })
    }

    /// Returns the reserved key-version tag this signer attaches to verdicts.
    #[must_use]
    pub const fn key_version(&self) -> u32 {
        self.key_version
    }

    /// Computes the raw MAC bytes over `verdict`'s signed fields.
    fn mac_bytes(&self, verdict: &Verdict) -> Result<Vec<u8>, SignerError> {
        let canonical = gate_core::hashing::canonical_json_bytes(&verdict.signed_fields())
            .map_err(|error| SignerError::Canonicalization(error.to_string()))?;
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_error| SignerError::SecretUnavailable)?;
        mac.update(&canonical);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

impl Signer for HmacSigner {
    fn sign(&self, verdict: &Verdict) -> Result<String, SignerError> {
        let bytes = self.mac_bytes(verdict)?;
        Ok(hex_encode(&bytes))
    }

    fn verify(&self, verdict: &Verdict, signature: &str) -> bool {
        let Ok(expected) = self.mac_bytes(verdict) else {
            return false;
        };
        let Some(given) = hex_decode(signature) else {
            return false;
        };
        if given.len() != expected.len() {
            return false;
        }
        expected.as_slice().ct_eq(given.as_slice()).into()
    }
}

// ============================================================================
// SECTION: Hex Helpers
// ============================================================================

/// Encodes `bytes` as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Decodes a lowercase hex string into bytes, rejecting malformed input.
fn hex_decode(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 {
        return None;
    }
    let mut out = Vec::with_capacity(text.len() / 2);
    let bytes = text.as_bytes();
    for chunk in bytes.chunks(2) {
        let pair = std::str::from_utf8(chunk).ok()?;
        out.push(u8::from_str_radix(pair, 16).ok()?);
    }
    Some(out)
}

#[cfg(test)]
mod tests;
