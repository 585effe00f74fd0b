//! # Blake Ledger Testkit
//!
//! Testing utilities for Blake Ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Fixed block inputs with their expected BLAKE2b-512 hashes
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up ledgers and signers
//! - **Mock agent**: An [`ExternalAgent`](blake_ledger::ExternalAgent) that can approve, refuse, or stall
//!
//! ## Golden Vectors
//!
//! ```rust
//! use blake_ledger_testkit::vectors::{all_vectors, generate_block_from_vector};
//!
//! for vector in all_vectors() {
//!     let block = generate_block_from_vector(&vector).unwrap();
//!     assert_eq!(block.hash().to_hex(), vector.hash);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use blake_ledger_testkit::generators::{block_from_params, BlockParams};
//!
//! proptest! {
//!     #[test]
//!     fn block_hash_is_deterministic(params: BlockParams) {
//!         let b1 = block_from_params(&params);
//!         let b2 = block_from_params(&params);
//!         prop_assert_eq!(b1.hash(), b2.hash());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use blake_ledger_testkit::fixtures::TestFixture;
//!
//! let mut fixture = TestFixture::new();
//! fixture.append_signed("my payload").unwrap();
//! assert!(fixture.ledger.verify());
//! ```

pub mod agent;
pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use agent::{AgentBehavior, MockAgent};
pub use fixtures::{multi_party_fixtures, TestFixture};
pub use generators::{block_from_params, BlockParams};
pub use vectors::{all_vectors, generate_block_from_vector, verify_all_vectors, GoldenVector};
