//! # Blake Ledger Core
//!
//! Pure primitives for Blake Ledger: digests, blocks, signatures, and chain
//! verification.
//!
//! This crate contains no I/O, no storage, no networking. It is pure computation
//! over hash-linked records.
//!
//! ## Key Types
//!
//! - [`Block`] - An immutable, hash-linked record
//! - [`BlockHash`] - BLAKE2b-512 digest of a block's fields
//! - [`PreviousHash`] - Link to the preceding block (or the genesis sentinel)
//! - [`Signature`] - Opaque signature bytes tagged with their provenance
//! - [`BlockSnapshot`] - Plain-data view used by renderers and relays
//!
//! ## Hashing
//!
//! A block hash is `BLAKE2b-512(index ‖ timestamp ‖ payload ‖ previous_hash)`
//! over the text forms of the fields, with no separators. See [`block`].

pub mod block;
pub mod chain;
pub mod crypto;
pub mod error;
pub mod hash;

pub use block::{
    chain_from_json, chain_to_json, compute_block_hash, Block, BlockSnapshot, GENESIS_PAYLOAD,
};
pub use chain::{is_valid_chain, verify_chain};
pub use crypto::{
    verify_signature, verify_signer, BlockSignature, Keypair, Signature, SignatureScheme,
    SignerId, UNSIGNED_SIGNATURE,
};
pub use error::{ChainError, SignatureError, SnapshotError, VerificationError};
pub use hash::{BlockHash, PreviousHash, GENESIS_PREVIOUS_HASH, HASH_LEN};
