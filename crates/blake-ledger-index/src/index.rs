//! Flat hash → payload index.

use std::collections::HashMap;

use blake_ledger_core::{Block, BlockHash};
use tracing::{trace, warn};

use crate::error::{IndexError, Result};

/// Result of inserting an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertResult {
    /// Entry was inserted (new).
    Inserted,
    /// Identical entry already exists (idempotent, not an error).
    AlreadyExists,
}

/// Maps block hashes to payloads.
///
/// Owned by a single ledger and updated in the same step as the chain.
#[derive(Debug, Clone, Default)]
pub struct HashIndex {
    entries: HashMap<BlockHash, String>,
}

impl HashIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from blocks, skipping any genesis block.
    pub fn from_blocks<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> Result<Self> {
        let mut index = Self::new();
        for block in blocks.into_iter().filter(|b| !b.is_genesis()) {
            index.insert(*block.hash(), block.payload())?;
        }
        Ok(index)
    }

    /// Check whether `(hash, payload)` could be inserted, without mutating.
    pub fn check(&self, hash: &BlockHash, payload: &str) -> Result<InsertResult> {
        match self.entries.get(hash) {
            None => Ok(InsertResult::Inserted),
            Some(existing) if existing == payload => Ok(InsertResult::AlreadyExists),
            Some(_) => Err(IndexError::Collision { hash: *hash }),
        }
    }

    /// Insert an entry.
    ///
    /// Returns `Inserted` if new, `AlreadyExists` for an identical entry, and
    /// `Collision` if the hash already maps to a different payload.
    pub fn insert(&mut self, hash: BlockHash, payload: impl Into<String>) -> Result<InsertResult> {
        let payload = payload.into();
        let result = self.check(&hash, &payload).map_err(|e| {
            warn!(hash = ?hash, "refusing to overwrite index entry");
            e
        })?;

        if result == InsertResult::Inserted {
            self.entries.insert(hash, payload);
        }
        Ok(result)
    }

    /// Look up the payload stored under a hash.
    pub fn retrieve(&self, hash: &BlockHash) -> Option<&str> {
        let found = self.entries.get(hash).map(String::as_str);
        trace!(hash = ?hash, hit = found.is_some(), "index lookup");
        found
    }

    /// Like [`HashIndex::retrieve`], but a miss is an error.
    pub fn get(&self, hash: &BlockHash) -> Result<&str> {
        self.retrieve(hash).ok_or(IndexError::NotFound(*hash))
    }

    /// Check if an entry exists.
    pub fn contains(&self, hash: &BlockHash) -> bool {
        self.entries.contains_key(hash)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&BlockHash, &str)> {
        self.entries.iter().map(|(h, p)| (h, p.as_str()))
    }
}


#[cfg(test)]
mod props {
    use blake_ledger_core::BlockHash;
    use proptest::prelude::*;

    use super::HashIndex;

    proptest! {
        #[test]
        fn prop_every_insert_is_retrievable(payloads in prop::collection::vec(".*", 0..32)) {
            let mut index = HashIndex::new();
            let mut expected = Vec::new();
            for (i, payload) in payloads.iter().enumerate() {
                let hash = BlockHash::digest(format!("{i}:{payload}").as_bytes());
                index.insert(hash, payload.clone()).unwrap();
                expected.push((hash, payload.clone()));
            }
            for (hash, payload) in expected {
                prop_assert_eq!(index.retrieve(&hash), Some(payload.as_str()));
            }
        }
    }
}
