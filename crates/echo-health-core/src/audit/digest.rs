//! Text digests.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Digest errors.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Digest failed: {0}")]
    Digest(String),
}

pub type AuditResult<T> = Result<T, AuditError>;

/// Deterministic text-to-hex fingerprint.
pub trait Digester: Send + Sync {
    /// Algorithm name recorded alongside digests.
    fn algorithm(&self) -> &'static str;

    fn digest(&self, text: &str) -> AuditResult<String>;
}

/// SHA-256, hex encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digester;

impl Digester for Sha256Digester {
    fn algorithm(&self) -> &'static str {
        "SHA-256"
    }

    fn digest(&self, text: &str) -> AuditResult<String> {
        Ok(hash_data(text.as_bytes()))
    }
}

/// SHA-256 of `data` as lowercase hex.
pub fn hash_data(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Check `text` against a previously recorded hex digest.
pub fn verify_digest(text: &str, expected_hex: &str) -> bool {
    hash_data(text.as_bytes()).eq_ignore_ascii_case(expected_hex)
}
