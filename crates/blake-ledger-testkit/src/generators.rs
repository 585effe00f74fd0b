//! Proptest generators for property-based testing.

use proptest::prelude::*;

use blake_ledger::{Ledger, LedgerConfig};
use blake_ledger_core::{Block, BlockHash, BlockSignature, Keypair, PreviousHash};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random BlockHash.
pub fn block_hash() -> impl Strategy<Value = BlockHash> {
    any::<Vec<u8>>().prop_map(|data| BlockHash::digest(&data))
}

/// Generate a previous-hash link, sometimes the genesis sentinel.
pub fn previous_hash() -> impl Strategy<Value = PreviousHash> {
    prop_oneof![
        1 => Just(PreviousHash::Genesis),
        4 => block_hash().prop_map(PreviousHash::Block),
    ]
}

/// Generate a reasonable timestamp (Unix milliseconds).
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=i64::MAX / 2
}

/// Generate a payload string of at most `max_len` characters.
pub fn payload(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>(), 0..=max_len).prop_map(|chars| chars.into_iter().collect())
}

/// Parameters for building a block.
#[derive(Debug, Clone)]
pub struct BlockParams {
    pub index: u64,
    pub timestamp: i64,
    pub payload: String,
    pub previous_hash: PreviousHash,
}

impl Arbitrary for BlockParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (any::<u64>(), timestamp(), payload(64), previous_hash())
            .prop_map(|(index, timestamp, payload, previous_hash)| BlockParams {
                index,
                timestamp,
                payload,
                previous_hash,
            })
            .boxed()
    }
}

/// Build an unsigned block from parameters.
pub fn block_from_params(params: &BlockParams) -> Block {
    Block::new(
        params.index,
        params.timestamp,
        params.payload.clone(),
        params.previous_hash,
        BlockSignature::Unsigned,
    )
}

/// Generate a ledger with up to `max_blocks` unsigned appends.
pub fn ledger(max_blocks: usize) -> impl Strategy<Value = Ledger> {
    (timestamp(), prop::collection::vec(payload(32), 0..=max_blocks)).prop_map(
        |(genesis_ts, payloads)| {
            let mut ledger = Ledger::with_genesis_timestamp(LedgerConfig::default(), genesis_ts);
            for (i, payload) in payloads.into_iter().enumerate() {
                ledger
                    .append_at(payload, BlockSignature::Unsigned, genesis_ts + i as i64)
                    .expect("distinct indices cannot collide");
            }
            ledger
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn block_hash_is_deterministic(params: BlockParams) {
            let b1 = block_from_params(&params);
            let b2 = block_from_params(&params);
            prop_assert_eq!(b1.hash(), b2.hash());
        }

        #[test]
        fn generated_ledgers_verify(ledger in ledger(16)) {
            prop_assert!(ledger.verify());
            prop_assert_eq!(ledger.index().len(), ledger.len() - 1);
        }
    }
}
