//! Error types for the Ledger.

use blake_ledger_core::{BlockHash, ChainError, SignatureError, SnapshotError};
use blake_ledger_index::IndexError;
use thiserror::Error;

use crate::signer::SignError;

/// Errors that can occur during Ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Chain integrity failure.
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    /// Index error (collision on append).
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// Signature verification failed or named the wrong signer.
    #[error("signature error: {0}")]
    Signature(#[from] SignatureError),

    /// The signing capability could not produce a signature.
    #[error("signing failed: {0}")]
    Sign(#[from] SignError),

    /// Snapshot could not be converted into a block.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// No payload is indexed under this hash.
    #[error("no block with hash {0:?}")]
    LookupMiss(BlockHash),

    /// No block at this position.
    #[error("no block at index {0}")]
    BlockNotFound(u64),

    /// The block carries no signature.
    #[error("block {0} is unsigned")]
    BlockUnsigned(u64),

    /// The head moved between reading it and appending.
    #[error("concurrent append conflict: expected head {expected:?}, found {actual:?}")]
    ConcurrentAppendConflict {
        expected: BlockHash,
        actual: BlockHash,
    },

    /// Unsigned append refused by configuration.
    #[error("unsigned append rejected by ledger configuration")]
    UnsignedRejected,

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for Ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
