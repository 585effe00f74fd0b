//! Chain integrity verification.
//!
//! Walks a sequence of blocks, re-deriving each hash from the stored fields
//! and checking that every block links to the hash of its predecessor.

use crate::block::Block;
use crate::error::ChainError;
use crate::hash::PreviousHash;

/// Verify that `blocks` form an intact chain starting at genesis.
///
/// Checks, stopping at the first failure:
/// 1. Every block's stored index equals its position
/// 2. Every block rehashes to its stored hash
/// 3. The first block carries the `"0"` link; every later block's previous
///    hash equals its predecessor's hash
///
/// Failures are reported by position. Signatures are not checked.
pub fn verify_chain(blocks: &[Block]) -> Result<(), ChainError> {
    let genesis = blocks.first().ok_or(ChainError::EmptyChain)?;

    verify_block_at(0, genesis)?;
    if !genesis.previous_hash().is_genesis() {
        return Err(ChainError::LinkMismatch { index: 0 });
    }

    for (i, pair) in blocks.windows(2).enumerate() {
        let (previous, current) = (&pair[0], &pair[1]);
        let position = i as u64 + 1;

        verify_block_at(position, current)?;

        if *current.previous_hash() != PreviousHash::Block(*previous.hash()) {
            return Err(ChainError::LinkMismatch { index: position });
        }
    }

    Ok(())
}

fn verify_block_at(position: u64, block: &Block) -> Result<(), ChainError> {
    if block.index() != position {
        return Err(ChainError::IndexMismatch {
            index: position,
            found: block.index(),
        });
    }
    if !block.is_intact() {
        return Err(ChainError::HashMismatch { index: position });
    }
    Ok(())
}

/// Boolean form of [`verify_chain`].
pub fn is_valid_chain(blocks: &[Block]) -> bool {
    verify_chain(blocks).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::BlockSignature;
    use crate::hash::BlockHash;

    fn build_chain(payloads: &[&str]) -> Vec<Block> {
        let mut blocks = vec![Block::genesis(1000, "Genesis Block")];
        for (i, payload) in payloads.iter().enumerate() {
            let previous = blocks.last().unwrap();
            let block = Block::new(
                i as u64 + 1,
                1000 + i as i64 + 1,
                *payload,
                PreviousHash::Block(*previous.hash()),
                BlockSignature::Unsigned,
            );
            blocks.push(block);
        }
        blocks
    }

    fn replace(blocks: &mut [Block], at: usize, f: impl FnOnce(&Block) -> Block) {
        blocks[at] = f(&blocks[at]);
    }

    #[test]
    fn test_valid_chain() {
        let blocks = build_chain(&["A", "B", "C"]);
        assert_eq!(verify_chain(&blocks), Ok(()));
        assert!(is_valid_chain(&blocks));
    }

    #[test]
    fn test_genesis_only() {
        assert!(is_valid_chain(&build_chain(&[])));
    }

    #[test]
    fn test_empty_chain() {
        assert_eq!(verify_chain(&[]), Err(ChainError::EmptyChain));
    }

    #[test]
    fn test_tampered_payload() {
        let mut blocks = build_chain(&["A", "B"]);
        replace(&mut blocks, 1, |b| {
            Block::from_parts(
                b.index(),
                b.timestamp(),
                "A-tampered",
                *b.previous_hash(),
                b.signature().clone(),
                *b.hash(),
            )
        });
        assert_eq!(verify_chain(&blocks), Err(ChainError::HashMismatch { index: 1 }));
    }

    #[test]
    fn test_tampered_genesis() {
        let mut blocks = build_chain(&["A"]);
        replace(&mut blocks, 0, |b| {
            Block::from_parts(
                0,
                b.timestamp(),
                "Evil Genesis",
                PreviousHash::Genesis,
                BlockSignature::Unsigned,
                *b.hash(),
            )
        });
        assert_eq!(verify_chain(&blocks), Err(ChainError::HashMismatch { index: 0 }));
    }

    #[test]
    fn test_broken_link() {
        let mut blocks = build_chain(&["A", "B", "C"]);
        // Rehashed with an unrelated link: the block is intact but detached.
        replace(&mut blocks, 2, |b| {
            Block::new(
                b.index(),
                b.timestamp(),
                b.payload(),
                PreviousHash::Block(BlockHash::digest(b"unrelated")),
                b.signature().clone(),
            )
        });
        assert_eq!(verify_chain(&blocks), Err(ChainError::LinkMismatch { index: 2 }));
    }

    #[test]
    fn test_first_failure_wins() {
        let mut blocks = build_chain(&["A", "B", "C"]);
        for at in [3, 1] {
            replace(&mut blocks, at, |b| {
                Block::from_parts(
                    b.index(),
                    b.timestamp(),
                    "x",
                    *b.previous_hash(),
                    BlockSignature::Unsigned,
                    *b.hash(),
                )
            });
        }
        assert_eq!(verify_chain(&blocks).unwrap_err().index(), Some(1));
    }

    #[test]
    fn test_duplicate_index() {
        let mut blocks = build_chain(&["A", "B", "C"]);
        // Intact and linked, but claims the index of its predecessor.
        replace(&mut blocks, 2, |b| {
            Block::new(
                1,
                b.timestamp(),
                b.payload(),
                *b.previous_hash(),
                b.signature().clone(),
            )
        });
        let relinked = Block::new(
            3,
            blocks[3].timestamp(),
            blocks[3].payload(),
            PreviousHash::Block(*blocks[2].hash()),
            BlockSignature::Unsigned,
        );
        blocks[3] = relinked;

        assert_eq!(
            verify_chain(&blocks),
            Err(ChainError::IndexMismatch { index: 2, found: 1 })
        );
    }

    #[test]
    fn test_failure_reported_by_position() {
        let mut blocks = build_chain(&["A", "B"]);
        // A forged index must not move the reported failure.
        replace(&mut blocks, 2, |b| {
            Block::from_parts(
                7,
                b.timestamp(),
                b.payload(),
                *b.previous_hash(),
                b.signature().clone(),
                *b.hash(),
            )
        });
        assert_eq!(
            verify_chain(&blocks),
            Err(ChainError::IndexMismatch { index: 2, found: 7 })
        );
        assert_eq!(verify_chain(&blocks).unwrap_err().index(), Some(2));
    }

    #[test]
    fn test_genesis_with_nonzero_index() {
        let mut blocks = build_chain(&["A"]);
        replace(&mut blocks, 0, |b| {
            Block::new(
                5,
                b.timestamp(),
                b.payload(),
                PreviousHash::Genesis,
                BlockSignature::Unsigned,
            )
        });
        assert_eq!(
            verify_chain(&blocks),
            Err(ChainError::IndexMismatch { index: 0, found: 5 })
        );
    }
}
