//! # Blake Ledger Index
//!
//! Payload lookup by block hash.
//!
//! ## Overview
//!
//! The [`HashIndex`] maps each appended block's hash to its payload so a
//! caller can fetch a payload without walking the chain. It is a flat
//! associative map: lookups are O(1) on average and there is no prefix
//! structure.
//!
//! ## Design Notes
//!
//! - **Idempotent inserts**: Inserting the same hash and payload twice returns `AlreadyExists`
//! - **Collision reporting**: A different payload under an existing hash is an error, never an overwrite
//! - **No partial writes**: A rejected insert leaves the index untouched, so the ledger can
//!   index a block before pushing it and abandon the append on failure

pub mod error;
pub mod index;

pub use error::{IndexError, Result};
pub use index::{HashIndex, InsertResult};
