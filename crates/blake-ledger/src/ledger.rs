//! The Ledger: an append-only chain of blocks plus its hash index.
//!
//! The chain and the index are only ever changed together, inside
//! [`Ledger::append`] and its variants. An append that cannot complete
//! leaves both untouched.

use blake_ledger_core::{
    verify_chain, verify_signature, verify_signer, Block, BlockHash, BlockSignature,
    BlockSnapshot, ChainError, PreviousHash, SignatureError, SignerId,
};
use blake_ledger_index::HashIndex;
use std::fmt;
use tracing::{debug, warn};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};

/// An append-only, hash-linked sequence of blocks.
///
/// Always holds at least the genesis block.
#[derive(Debug, Clone)]
pub struct Ledger {
    config: LedgerConfig,
    blocks: Vec<Block>,
    index: HashIndex,
}

impl Ledger {
    /// Create a ledger whose genesis block is stamped with the current time.
    pub fn new(config: LedgerConfig) -> Self {
        Self::with_genesis_timestamp(config, now_millis())
    }

    /// Create a ledger with an explicit genesis timestamp.
    pub fn with_genesis_timestamp(config: LedgerConfig, timestamp: i64) -> Self {
        let genesis = Self::create_genesis_block(&config, timestamp);
        Self {
            config,
            blocks: vec![genesis],
            index: HashIndex::new(),
        }
    }

    fn create_genesis_block(config: &LedgerConfig, timestamp: i64) -> Block {
        let genesis = Block::genesis(timestamp, config.genesis_payload.clone());
        debug!(hash = ?genesis.hash(), timestamp, "created genesis block");
        genesis
    }

    /// Import an existing chain without validating it.
    ///
    /// The index is rebuilt from every block after genesis. Run
    /// [`Ledger::verify`] before trusting the result.
    pub fn from_blocks(config: LedgerConfig, blocks: Vec<Block>) -> Result<Self> {
        if blocks.is_empty() {
            return Err(ChainError::EmptyChain.into());
        }
        let index = HashIndex::from_blocks(blocks.iter().skip(1))?;
        debug!(len = blocks.len(), "imported chain");
        Ok(Self {
            config,
            blocks,
            index,
        })
    }

    /// Import a chain from snapshots, as received from a relay.
    pub fn from_snapshots(config: LedgerConfig, snapshots: &[BlockSnapshot]) -> Result<Self> {
        let blocks = snapshots
            .iter()
            .map(Block::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::from_blocks(config, blocks)
    }

    /// The configuration this ledger was built with.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Append
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a block holding `payload`.
    ///
    /// The signature is stored as given; it is not checked here.
    pub fn append(
        &mut self,
        payload: impl Into<String>,
        signature: impl Into<BlockSignature>,
    ) -> Result<&Block> {
        self.commit(payload.into(), signature.into(), now_millis())
    }

    /// Append with an explicit timestamp.
    ///
    /// Timestamps earlier than the head's are raised to the head's, so they
    /// never decrease along the chain.
    pub fn append_at(
        &mut self,
        payload: impl Into<String>,
        signature: impl Into<BlockSignature>,
        timestamp: i64,
    ) -> Result<&Block> {
        self.commit(payload.into(), signature.into(), timestamp)
    }

    /// Append only if the head is still `expected_previous`.
    ///
    /// For callers that read the head, did other work (such as waiting on a
    /// signer), and must not land on top of someone else's block.
    pub fn append_after(
        &mut self,
        expected_previous: &BlockHash,
        payload: impl Into<String>,
        signature: impl Into<BlockSignature>,
    ) -> Result<&Block> {
        let actual = *self.latest().hash();
        if actual != *expected_previous {
            warn!(expected = ?expected_previous, actual = ?actual, "append raced another writer");
            return Err(LedgerError::ConcurrentAppendConflict {
                expected: *expected_previous,
                actual,
            });
        }
        self.commit(payload.into(), signature.into(), now_millis())
    }

    fn commit(
        &mut self,
        payload: String,
        signature: BlockSignature,
        timestamp: i64,
    ) -> Result<&Block> {
        if self.config.reject_unsigned && !signature.is_signed() {
            warn!("rejected unsigned append");
            return Err(LedgerError::UnsignedRejected);
        }

        let head = self.latest();
        let block = Block::new(
            self.blocks.len() as u64,
            timestamp.max(head.timestamp()),
            payload,
            PreviousHash::Block(*head.hash()),
            signature,
        );

        // Index first: a collision must leave the chain untouched.
        self.index.insert(*block.hash(), block.payload())?;

        debug!(
            index = block.index(),
            hash = ?block.hash(),
            signed = block.signature().is_signed(),
            "appended block"
        );
        self.blocks.push(block);
        Ok(self.latest())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Check the whole chain, reporting the first failure.
    pub fn verify_chain(&self) -> std::result::Result<(), ChainError> {
        verify_chain(&self.blocks).map_err(|e| {
            warn!(error = %e, "chain verification failed");
            e
        })
    }

    /// Whether the whole chain is internally consistent.
    pub fn verify(&self) -> bool {
        self.verify_chain().is_ok()
    }

    /// Verify the stored signature of a block over its payload.
    ///
    /// Returns the recovered signer, or `None` for an unsigned block.
    pub fn verify_block_signature(&self, index: u64) -> Result<Option<SignerId>> {
        let block = self.get(index).ok_or(LedgerError::BlockNotFound(index))?;
        match block.signature().signature() {
            None => Ok(None),
            Some(sig) => {
                let signer = verify_signature(block.payload().as_bytes(), sig)
                    .map_err(SignatureError::from)?;
                Ok(Some(signer))
            }
        }
    }

    /// Verify that a block was signed by `expected`.
    pub fn verify_block_signer(&self, index: u64, expected: &SignerId) -> Result<()> {
        let block = self.get(index).ok_or(LedgerError::BlockNotFound(index))?;
        let sig = block
            .signature()
            .signature()
            .ok_or(LedgerError::BlockUnsigned(index))?;
        verify_signer(block.payload().as_bytes(), sig, expected)?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: a ledger holds at least its genesis block.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All blocks in order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The genesis block.
    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    /// The most recently appended block.
    pub fn latest(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    /// The block at a position.
    pub fn get(&self, index: u64) -> Option<&Block> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }

    /// The payload stored under a block hash.
    pub fn retrieve(&self, hash: &BlockHash) -> Result<&str> {
        self.index
            .retrieve(hash)
            .ok_or(LedgerError::LookupMiss(*hash))
    }

    /// Find a block by hash with a linear scan.
    pub fn find_block(&self, hash: &BlockHash) -> Option<&Block> {
        self.blocks.iter().find(|b| b.hash() == hash)
    }

    /// The hash index.
    pub fn index(&self) -> &HashIndex {
        &self.index
    }

    /// Plain-data views of every block, in order.
    pub fn snapshots(&self) -> Vec<BlockSnapshot> {
        self.blocks.iter().map(Block::snapshot).collect()
    }
}

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Blockchain(")?;
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{block}")?;
        }
        f.write_str(")")
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

/// Get current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
