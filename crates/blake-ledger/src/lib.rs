//! # Blake Ledger
//!
//! The unified API for Blake Ledger: an append-only, tamper-evident chain of
//! blocks, each bound to its predecessor by a BLAKE2b-512 hash, optionally
//! signed, and indexed by hash for payload lookup.
//!
//! ## Key Concepts
//!
//! - **Block**: Immutable. Its hash covers `index ‖ timestamp ‖ payload ‖ previous_hash`.
//! - **Ledger**: Starts with a genesis block; grows one block at a time.
//! - **Verification**: Re-derives every hash and link; never repairs anything.
//! - **Signatures**: Produced outside the ledger by a [`SignatureCapability`]
//!   and stored as given. Checking them is a separate, caller-invoked step.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use blake_ledger::{Keypair, Ledger, LedgerConfig, LedgerHandle, LocalKeySigner};
//! use blake_ledger::core::BlockSignature;
//!
//! async fn example() {
//!     // Single-owner ledger
//!     let mut ledger = Ledger::new(LedgerConfig::default());
//!     ledger.append("hello", BlockSignature::Unsigned).unwrap();
//!     assert!(ledger.verify());
//!
//!     // Shared between tasks, with signing and chain updates
//!     let handle = LedgerHandle::new(LedgerConfig::default());
//!     let mut updates = handle.subscribe();
//!     let signer = LocalKeySigner::new(Keypair::generate());
//!     let block = handle.append_signed("signed hello", &signer).await.unwrap();
//!     let chain = updates.recv().await.unwrap();
//!     assert_eq!(chain.last().unwrap().hash, block.hash);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `blake_ledger::core` - Core primitives (Block, BlockHash, signatures)
//! - `blake_ledger::index` - The hash index

pub mod config;
pub mod error;
pub mod handle;
pub mod ledger;
pub mod signer;

// Re-export component crates
pub use blake_ledger_core as core;
pub use blake_ledger_index as index;

// Re-export main types for convenience
pub use config::LedgerConfig;
pub use error::{LedgerError, Result};
pub use handle::{ChainUpdate, LedgerHandle};
pub use ledger::Ledger;
pub use signer::{AgentSigner, ExternalAgent, LocalKeySigner, SignError, SignatureCapability};

// Re-export commonly used core types
pub use blake_ledger_core::{
    Block, BlockHash, BlockSignature, BlockSnapshot, ChainError, Keypair, PreviousHash,
    Signature, SignatureScheme, SignerId,
};
pub use blake_ledger_index::HashIndex;
