//! Block: one immutable, hash-linked record of the ledger.
//!
//! A block's hash is computed once, at construction, over the text forms of
//! `index`, `timestamp`, `payload` and `previous_hash` concatenated in that
//! order with no separators. The signature is carried alongside but is not
//! hashed.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::BlockSignature;
use crate::error::SnapshotError;
use crate::hash::{BlockHash, PreviousHash};

/// Payload of the genesis block.
pub const GENESIS_PAYLOAD: &str = "Genesis Block";

/// Compute the hash of a block from its fields.
pub fn compute_block_hash(
    index: u64,
    timestamp: i64,
    payload: &str,
    previous_hash: &PreviousHash,
) -> BlockHash {
    let input = format!("{index}{timestamp}{payload}{previous_hash}");
    BlockHash::digest(input.as_bytes())
}

/// An immutable ledger record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    index: u64,
    timestamp: i64,
    payload: String,
    previous_hash: PreviousHash,
    signature: BlockSignature,
    hash: BlockHash,
}

impl Block {
    /// Construct a block and compute its hash.
    pub fn new(
        index: u64,
        timestamp: i64,
        payload: impl Into<String>,
        previous_hash: PreviousHash,
        signature: BlockSignature,
    ) -> Self {
        let payload = payload.into();
        let hash = compute_block_hash(index, timestamp, &payload, &previous_hash);
        Self {
            index,
            timestamp,
            payload,
            previous_hash,
            signature,
            hash,
        }
    }

    /// Construct the genesis block.
    pub fn genesis(timestamp: i64, payload: impl Into<String>) -> Self {
        Self::new(
            0,
            timestamp,
            payload,
            PreviousHash::Genesis,
            BlockSignature::Unsigned,
        )
    }

    /// Rebuild a block with a stored hash, without recomputing it.
    ///
    /// Used when importing blocks from outside; the hash is trusted only
    /// until the chain is verified.
    pub fn from_parts(
        index: u64,
        timestamp: i64,
        payload: impl Into<String>,
        previous_hash: PreviousHash,
        signature: BlockSignature,
        hash: BlockHash,
    ) -> Self {
        Self {
            index,
            timestamp,
            payload: payload.into(),
            previous_hash,
            signature,
            hash,
        }
    }

    /// Position in the ledger.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Creation time (Unix milliseconds).
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// The caller-supplied payload.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Link to the preceding block.
    pub fn previous_hash(&self) -> &PreviousHash {
        &self.previous_hash
    }

    /// The signature field.
    pub fn signature(&self) -> &BlockSignature {
        &self.signature
    }

    /// The stored hash.
    pub fn hash(&self) -> &BlockHash {
        &self.hash
    }

    /// Recompute the hash from the stored fields.
    pub fn compute_hash(&self) -> BlockHash {
        compute_block_hash(self.index, self.timestamp, &self.payload, &self.previous_hash)
    }

    /// Whether the stored hash matches the contents.
    pub fn is_intact(&self) -> bool {
        self.compute_hash() == self.hash
    }

    /// Whether this block sits at the start of a chain.
    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_hash.is_genesis()
    }

    /// Plain-data view of this block.
    pub fn snapshot(&self) -> BlockSnapshot {
        BlockSnapshot {
            index: self.index,
            timestamp: self.timestamp,
            payload: self.payload.clone(),
            previous_hash: self.previous_hash.to_string(),
            signature: self.signature.to_string(),
            hash: self.hash.to_hex(),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block(Index: {}, Hash: {}, Previous Hash: {}, Signature: {}, Data: {})",
            self.index, self.hash, self.previous_hash, self.signature, self.payload
        )
    }
}

impl TryFrom<&BlockSnapshot> for Block {
    type Error = SnapshotError;

    fn try_from(snapshot: &BlockSnapshot) -> Result<Self, Self::Error> {
        let previous_hash = snapshot
            .previous_hash
            .parse()
            .map_err(|e: hex::FromHexError| SnapshotError::InvalidPreviousHash(e.to_string()))?;
        let signature = snapshot
            .signature
            .parse()
            .map_err(SnapshotError::InvalidSignature)?;
        let hash = BlockHash::from_hex(&snapshot.hash)
            .map_err(|e| SnapshotError::InvalidHash(e.to_string()))?;

        Ok(Block::from_parts(
            snapshot.index,
            snapshot.timestamp,
            snapshot.payload.clone(),
            previous_hash,
            signature,
            hash,
        ))
    }
}

impl TryFrom<BlockSnapshot> for Block {
    type Error = SnapshotError;

    fn try_from(snapshot: BlockSnapshot) -> Result<Self, Self::Error> {
        Block::try_from(&snapshot)
    }
}

/// All block fields as plain data, for rendering and broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSnapshot {
    pub index: u64,
    pub timestamp: i64,
    pub payload: String,
    pub previous_hash: String,
    pub signature: String,
    pub hash: String,
}

impl BlockSnapshot {
    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Encode an ordered list of snapshots as a JSON array.
pub fn chain_to_json(snapshots: &[BlockSnapshot]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(snapshots)?)
}

/// Decode a JSON array of snapshots.
pub fn chain_from_json(json: &str) -> Result<Vec<BlockSnapshot>, SnapshotError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Keypair, SignatureScheme};

    #[test]
    fn test_hash_covers_concatenated_fields() {
        let block = Block::new(1, 1700000000000, "A", PreviousHash::Genesis, BlockSignature::Unsigned);
        assert_eq!(*block.hash(), BlockHash::digest(b"11700000000000A0"));
    }

    #[test]
    fn test_identical_fields_identical_hash() {
        let prev = PreviousHash::Block(BlockHash::digest(b"prev"));
        let b1 = Block::new(3, 42, "payload", prev, BlockSignature::Unsigned);
        let b2 = Block::new(3, 42, "payload", prev, BlockSignature::Unsigned);
        assert_eq!(b1.hash(), b2.hash());
    }

    #[test]
    fn test_signature_is_not_hashed() {
        let sig = Keypair::from_seed(&[7u8; 32]).sign(SignatureScheme::LocalKey, b"data");
        let unsigned = Block::new(1, 5, "data", PreviousHash::Genesis, BlockSignature::Unsigned);
        let signed = Block::new(1, 5, "data", PreviousHash::Genesis, sig.into());
        assert_eq!(unsigned.hash(), signed.hash());
    }

    #[test]
    fn test_genesis_block() {
        let genesis = Block::genesis(1000, GENESIS_PAYLOAD);
        assert_eq!(genesis.index(), 0);
        assert_eq!(genesis.payload(), "Genesis Block");
        assert!(genesis.is_genesis());
        assert!(genesis.is_intact());

        let snapshot = genesis.snapshot();
        assert_eq!(snapshot.previous_hash, "0");
        assert_eq!(snapshot.signature, "0x0");
    }

    #[test]
    fn test_display() {
        let genesis = Block::genesis(1000, GENESIS_PAYLOAD);
        assert_eq!(
            genesis.to_string(),
            format!(
                "Block(Index: 0, Hash: {}, Previous Hash: 0, Signature: 0x0, Data: Genesis Block)",
                genesis.hash().to_hex()
            )
        );
    }

    #[test]
    fn test_from_parts_keeps_stored_hash() {
        let block = Block::new(1, 5, "data", PreviousHash::Genesis, BlockSignature::Unsigned);
        let forged = Block::from_parts(
            1,
            5,
            "other",
            PreviousHash::Genesis,
            BlockSignature::Unsigned,
            *block.hash(),
        );
        assert_eq!(forged.hash(), block.hash());
        assert!(!forged.is_intact());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let block = Block::genesis(1000, GENESIS_PAYLOAD);
        let json = block.snapshot().to_json().unwrap();
        assert!(json.contains("\"previousHash\":\"0\""));
        assert!(json.contains("\"signature\":\"0x0\""));

        let decoded = BlockSnapshot::from_json(&json).unwrap();
        assert_eq!(Block::try_from(decoded).unwrap(), block);
    }

    #[test]
    fn test_snapshot_with_bad_fields() {
        let mut snapshot = Block::genesis(1, GENESIS_PAYLOAD).snapshot();
        snapshot.hash = "xyz".into();
        assert!(matches!(
            Block::try_from(&snapshot),
            Err(SnapshotError::InvalidHash(_))
        ));

        let mut snapshot = Block::genesis(1, GENESIS_PAYLOAD).snapshot();
        snapshot.previous_hash = "1234".into();
        assert!(matches!(
            Block::try_from(&snapshot),
            Err(SnapshotError::InvalidPreviousHash(_))
        ));

        let genesis = Block::genesis(1, GENESIS_PAYLOAD);
        let mut snapshot = Block::new(
            1,
            2,
            "A",
            PreviousHash::Block(*genesis.hash()),
            BlockSignature::Unsigned,
        )
        .snapshot();
        snapshot.previous_hash = snapshot.previous_hash.to_uppercase();
        assert!(matches!(
            Block::try_from(&snapshot),
            Err(SnapshotError::InvalidPreviousHash(_))
        ));

        let mut snapshot = Block::genesis(1, GENESIS_PAYLOAD).snapshot();
        snapshot.signature = "bogus".into();
        assert!(matches!(
            Block::try_from(&snapshot),
            Err(SnapshotError::InvalidSignature(_))
        ));
    }
}
