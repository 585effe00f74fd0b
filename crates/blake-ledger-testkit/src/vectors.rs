//! Golden test vectors for cross-implementation verification.
//!
//! Every implementation of the block format must produce identical hashes for
//! these inputs. The first four vectors form a chain; each links to the hash
//! of the one before it.

use blake_ledger_core::{
    compute_block_hash, verify_signature, Block, BlockSignature, PreviousHash, Signature,
    SignatureScheme,
};
use serde::{Deserialize, Serialize};

/// A single golden block vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenVector {
    pub name: String,
    pub description: String,

    // Inputs
    pub index: u64,
    pub timestamp: i64,
    pub payload: String,
    pub previous_hash: String,

    // Expected output (hex BLAKE2b-512)
    pub hash: String,
}

const GENESIS_HASH: &str = "a91e41bf39cb3234fecadc743dd783667f2b063261fe18d8b2a782f0266f8dd5\
                            7c0e5033cdcfe660082b9d5aa140c5b948fadc73d93638e6d33a5414625b8c0d";
const FIRST_HASH: &str = "b2becaf752c0a540521644f2cb463b0c546140b0e82e6d437aa877f1a14a435f\
                          7e050050ecd237e568de37b5ba51d4866aa8643d1d6b1b35fb614795ed48e927";
const EMPTY_HASH: &str = "738ef83632fa02e74b5131d744b9c0be9ca27cf10ad9fb91cbdfb73d093b3cbe\
                          f999beb6056931ecc2c9fa6e76fefd3ec727f011952e267641af010a2757be88";
const UNICODE_HASH: &str = "fbe477fe7183da897161710d0ce4025b29c2b28f2b325d7ec1a464e7c0509820\
                            207debcd23848fdd6db416a162bf1d7a8309e5b7403e06e54ea3eb875a0754b7";
const NEGATIVE_TS_HASH: &str = "f3741f71712e5fdb4451048709ada5c0bdb3dd1bc3f400d294b5952a3d1998fb\
                                1d1cb8520afbd098ca0f78fe879bacccd5e553d9122d36a5bf75d7a2688af36e";

fn vector(
    name: &str,
    description: &str,
    index: u64,
    timestamp: i64,
    payload: &str,
    previous_hash: &str,
    hash: &str,
) -> GoldenVector {
    GoldenVector {
        name: name.to_string(),
        description: description.to_string(),
        index,
        timestamp,
        payload: payload.to_string(),
        previous_hash: previous_hash.to_string(),
        hash: hash.to_string(),
    }
}

/// All golden block vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        vector(
            "genesis",
            "Genesis block at a fixed time",
            0,
            1_700_000_000_000,
            "Genesis Block",
            "0",
            GENESIS_HASH,
        ),
        vector(
            "first_block",
            "First block after genesis",
            1,
            1_700_000_000_001,
            "A",
            GENESIS_HASH,
            FIRST_HASH,
        ),
        vector(
            "empty_payload",
            "Empty payload contributes nothing to the hash input",
            2,
            1_700_000_000_002,
            "",
            FIRST_HASH,
            EMPTY_HASH,
        ),
        vector(
            "unicode_payload",
            "Multi-byte UTF-8 payload is hashed as its UTF-8 bytes",
            3,
            1_700_000_000_003,
            "héllo, 世界",
            EMPTY_HASH,
            UNICODE_HASH,
        ),
        vector(
            "negative_timestamp",
            "Timestamp before the Unix epoch keeps its sign",
            1,
            -1,
            "before epoch",
            "0",
            NEGATIVE_TS_HASH,
        ),
    ]
}

/// The vectors that form a chain, in order.
pub fn chain_vectors() -> Vec<GoldenVector> {
    all_vectors().into_iter().take(4).collect()
}

/// Build a block from a vector's inputs, computing its hash.
pub fn generate_block_from_vector(vector: &GoldenVector) -> Result<Block, String> {
    let previous_hash: PreviousHash = vector
        .previous_hash
        .parse()
        .map_err(|e| format!("{}: bad previous hash: {e}", vector.name))?;
    Ok(Block::new(
        vector.index,
        vector.timestamp,
        vector.payload.clone(),
        previous_hash,
        BlockSignature::Unsigned,
    ))
}

/// Check every vector, returning the names of those that do not match.
pub fn verify_all_vectors() -> Vec<String> {
    all_vectors()
        .iter()
        .filter(|v| match v.previous_hash.parse::<PreviousHash>() {
            Ok(prev) => {
                compute_block_hash(v.index, v.timestamp, &v.payload, &prev).to_hex() != v.hash
            }
            Err(_) => true,
        })
        .map(|v| v.name.clone())
        .collect()
}

/// A fixed Ed25519 signature vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureVector {
    pub seed: String,
    pub signer_id: String,
    pub message: String,
    pub envelope: String,
}

/// Seed `0x42 * 32` signing the payload `"A"`.
pub fn signature_vector() -> SignatureVector {
    SignatureVector {
        seed: "42".repeat(32),
        signer_id: "2152f8d19b791d24453242e15f2eab6cb7cffa7b6a5ed30097960e069881db12".into(),
        message: "A".into(),
        envelope: concat!(
            "2152f8d19b791d24453242e15f2eab6cb7cffa7b6a5ed30097960e069881db12",
            "d57b1a274473e2ee6a3fb1552028d1ca3034f54699f71cab01e90984bb1ad966",
            "da26dfa3a6facaf94c72513d1452eb41fbe13ff45c2b23097a15bb576cefc20a",
        )
        .into(),
    }
}

/// Whether the signature vector verifies and recovers its signer.
pub fn verify_signature_vector(vector: &SignatureVector) -> bool {
    let Ok(bytes) = hex::decode(&vector.envelope) else {
        return false;
    };
    let signature = Signature::new(SignatureScheme::LocalKey, bytes);
    matches!(
        verify_signature(vector.message.as_bytes(), &signature),
        Ok(id) if id.to_hex() == vector.signer_id
    )
}
