//! BLAKE2b-512 digests and the previous-hash link.
//!
//! All block hashes are 64-byte BLAKE2b digests, rendered as 128 lower-case
//! hex characters wherever they appear as text.

use blake2::{Blake2b512, Digest};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of a BLAKE2b-512 digest in bytes.
pub const HASH_LEN: usize = 64;

/// Text form of the genesis block's previous hash.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// A 64-byte BLAKE2b-512 digest identifying a block.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockHash(pub [u8; HASH_LEN]);

impl BlockHash {
    /// Compute the BLAKE2b-512 digest of the given data.
    pub fn digest(data: &[u8]) -> Self {
        let output = Blake2b512::digest(data);
        let mut bytes = [0u8; HASH_LEN];
        bytes.copy_from_slice(&output);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Convert to lower-case hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a lower-case hex string.
    ///
    /// Upper-case digits are rejected: the text form feeds the next block's
    /// hash input, so it must round-trip exactly.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        if let Some((index, c)) = s.char_indices().find(|(_, c)| c.is_ascii_uppercase()) {
            return Err(hex::FromHexError::InvalidHexCharacter { c, index });
        }
        let bytes = hex::decode(s)?;
        if bytes.len() != HASH_LEN {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; HASH_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for BlockHash {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for BlockHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_LEN]> for BlockHash {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }
}

// serde has no impls for 64-byte arrays, and hex is the external form anyway.
impl Serialize for BlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// The link from a block to its predecessor.
///
/// The genesis block has no predecessor and carries the literal `"0"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviousHash {
    /// Sentinel link of the genesis block.
    Genesis,
    /// Hash of the preceding block.
    Block(BlockHash),
}

impl PreviousHash {
    /// Whether this is the genesis sentinel.
    pub fn is_genesis(&self) -> bool {
        matches!(self, PreviousHash::Genesis)
    }

    /// The linked block hash, if any.
    pub fn block_hash(&self) -> Option<&BlockHash> {
        match self {
            PreviousHash::Genesis => None,
            PreviousHash::Block(hash) => Some(hash),
        }
    }
}

impl fmt::Display for PreviousHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviousHash::Genesis => f.write_str(GENESIS_PREVIOUS_HASH),
            PreviousHash::Block(hash) => f.write_str(&hash.to_hex()),
        }
    }
}

impl FromStr for PreviousHash {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == GENESIS_PREVIOUS_HASH {
            Ok(PreviousHash::Genesis)
        } else {
            BlockHash::from_hex(s).map(PreviousHash::Block)
        }
    }
}

impl From<BlockHash> for PreviousHash {
    fn from(hash: BlockHash) -> Self {
        PreviousHash::Block(hash)
    }
}
