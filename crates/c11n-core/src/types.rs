//! Identifiers exchanged with the node: participant public keys and
//! transaction hashes.
//!
//! Both travel as standard (padded) base64 text. The client never looks
//! inside them beyond encoding and length checks.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Length of an encrypted payload hash in bytes.
pub const TRANSACTION_HASH_LEN: usize = 64;

// ── Participant keys ──────────────────────────────────────────────────────────

/// Public key of a sender or recipient, held in its base64 textual form.
///
/// Keys arrive either as raw bytes (from a key file, say) or already
/// base64-encoded (from config or the command line). Both end up here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey(String);

impl PublicKey {
    /// Encode raw key bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(STANDARD.encode(bytes))
    }

    /// Wrap a key that is already base64. Not validated; the node decides
    /// whether it recognises the key.
    pub fn from_base64(b64: impl Into<String>) -> Self {
        Self(b64.into())
    }

    pub fn as_base64(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode back to raw bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, KeyError> {
        STANDARD
            .decode(&self.0)
            .map_err(|e| KeyError::InvalidBase64(self.0.clone(), e))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PublicKey {
    fn from(b64: &str) -> Self {
        Self::from_base64(b64)
    }
}

impl From<String> for PublicKey {
    fn from(b64: String) -> Self {
        Self::from_base64(b64)
    }
}

// ── Transaction hashes ────────────────────────────────────────────────────────

/// Content identifier of a previously sent encrypted payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionHash([u8; TRANSACTION_HASH_LEN]);

impl TransactionHash {
    pub const fn new(bytes: [u8; TRANSACTION_HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Build from a slice, which must be exactly 64 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        let arr: [u8; TRANSACTION_HASH_LEN] = bytes
            .try_into()
            .map_err(|_| KeyError::HashLength(bytes.len()))?;
        Ok(Self(arr))
    }

    pub fn from_base64(b64: &str) -> Result<Self, KeyError> {
        let bytes = STANDARD
            .decode(b64)
            .map_err(|e| KeyError::InvalidBase64(b64.to_string(), e))?;
        Self::from_slice(&bytes)
    }

    /// Canonical textual form. Contains `+`, `/` and `=`, so it must be
    /// escaped before being placed in a URL path.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }
}

impl fmt::Debug for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionHash({})", self.to_base64())
    }
}

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("invalid base64 {0:?}: {1}")]
    InvalidBase64(String, base64::DecodeError),
    #[error("transaction hash must be {} bytes, got {0}", TRANSACTION_HASH_LEN)]
    HashLength(usize),
}
