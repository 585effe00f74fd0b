//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use blake_ledger::{Ledger, LedgerConfig, LedgerError, LocalKeySigner};
use blake_ledger_core::{Block, BlockSignature, Keypair, SignatureScheme, SignerId};

/// Fixed genesis time used by fixtures.
pub const FIXTURE_GENESIS_TIMESTAMP: i64 = 1_700_000_000_000;

/// A test fixture with a keypair and a ledger.
pub struct TestFixture {
    pub keypair: Keypair,
    pub ledger: Ledger,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self::with_keypair(Keypair::generate())
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::with_keypair(Keypair::from_seed(&seed))
    }

    fn with_keypair(keypair: Keypair) -> Self {
        Self {
            keypair,
            ledger: Ledger::with_genesis_timestamp(
                LedgerConfig::default(),
                FIXTURE_GENESIS_TIMESTAMP,
            ),
        }
    }

    /// The fixture's signer identity.
    pub fn signer_id(&self) -> SignerId {
        self.keypair.signer_id()
    }

    /// A local signing capability over the fixture's keypair.
    pub fn local_signer(&self) -> LocalKeySigner {
        LocalKeySigner::new(self.keypair.clone())
    }

    /// Append a payload signed with the fixture's key.
    pub fn append_signed(&mut self, payload: &str) -> Result<Block, LedgerError> {
        let sig = self.keypair.sign(SignatureScheme::LocalKey, payload.as_bytes());
        self.ledger.append(payload, sig).cloned()
    }

    /// Append an unsigned payload.
    pub fn append_unsigned(&mut self, payload: &str) -> Result<Block, LedgerError> {
        self.ledger.append(payload, BlockSignature::Unsigned).cloned()
    }

    /// Append `count` unsigned payloads named `"Block {n} Data"`.
    pub fn fill(&mut self, count: usize) -> Result<(), LedgerError> {
        for n in 1..=count {
            self.append_unsigned(&format!("Block {n} Data"))?;
        }
        Ok(())
    }

    /// A copy of the ledger with the payload at `at` replaced but its hash kept.
    pub fn tampered_payload(&self, at: usize, payload: &str) -> Result<Ledger, LedgerError> {
        let mut blocks = self.ledger.blocks().to_vec();
        let b = &blocks[at];
        blocks[at] = Block::from_parts(
            b.index(),
            b.timestamp(),
            payload,
            *b.previous_hash(),
            b.signature().clone(),
            *b.hash(),
        );
        Ledger::from_blocks(self.ledger.config().clone(), blocks)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple test fixtures for multi-signer tests.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestFixture::with_seed(seed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_chain() {
        let mut fixture = TestFixture::new();
        let a = fixture.append_signed("a").unwrap();
        let b = fixture.append_unsigned("b").unwrap();

        assert_eq!(a.index(), 1);
        assert_eq!(b.index(), 2);
        assert!(fixture.ledger.verify());
        assert_eq!(
            fixture.ledger.verify_block_signature(1).unwrap(),
            Some(fixture.signer_id())
        );
    }

    #[test]
    fn test_fill_and_tamper() {
        let mut fixture = TestFixture::with_seed([1u8; 32]);
        fixture.fill(10).unwrap();
        assert_eq!(fixture.ledger.len(), 11);
        assert_eq!(fixture.ledger.latest().payload(), "Block 10 Data");

        let tampered = fixture.tampered_payload(4, "forged").unwrap();
        assert!(!tampered.verify());
        assert!(fixture.ledger.verify());
    }

    #[test]
    fn test_multi_party() {
        let parties = multi_party_fixtures(3);
        let ids: Vec<_> = parties.iter().map(|p| p.signer_id()).collect();
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_ne!(ids[0], ids[2]);
    }
}
