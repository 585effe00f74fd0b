//! Error types for Blake Ledger Core.

use thiserror::Error;

use crate::crypto::SignerId;

/// Integrity failures found while walking a chain.
///
/// `index` is always the block's position in the chain, not the index it
/// claims to have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("chain is empty")]
    EmptyChain,

    #[error("index mismatch at position {index}: block claims index {found}")]
    IndexMismatch { index: u64, found: u64 },

    #[error("hash mismatch at block {index}: stored hash does not match contents")]
    HashMismatch { index: u64 },

    #[error("link mismatch at block {index}: previous hash does not match predecessor")]
    LinkMismatch { index: u64 },
}

impl ChainError {
    /// Position of the failing block, if any.
    pub fn index(&self) -> Option<u64> {
        match self {
            ChainError::EmptyChain => None,
            ChainError::IndexMismatch { index, .. }
            | ChainError::HashMismatch { index }
            | ChainError::LinkMismatch { index } => Some(*index),
        }
    }
}

/// Failures of the external verify operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("malformed signature: {0}")]
    Malformed(String),

    #[error("signature does not match message")]
    Invalid,
}

/// Caller-level signature judgments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error("signer mismatch: expected {expected}, recovered {recovered}")]
    SignerMismatch {
        expected: SignerId,
        recovered: SignerId,
    },
}

/// Errors parsing a block snapshot back into a block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("invalid hash field: {0}")]
    InvalidHash(String),

    #[error("invalid previous hash field: {0}")]
    InvalidPreviousHash(String),

    #[error("invalid signature field: {0}")]
    InvalidSignature(String),

    #[error("json error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        SnapshotError::Json(e.to_string())
    }
}
