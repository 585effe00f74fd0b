//! Error types for the index module.

use blake_ledger_core::BlockHash;
use thiserror::Error;

/// Errors that can occur during index operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A different payload is already stored under this hash.
    #[error("hash collision: {hash:?} already maps to a different payload")]
    Collision { hash: BlockHash },

    /// No entry for the queried hash.
    #[error("no entry for hash {0:?}")]
    NotFound(BlockHash),
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
