use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::block::Block;
use crate::error::MineError;

/// Number of consecutive `'0'` characters at the start of a hex hash.
pub fn leading_zero_hex_chars(hash: &str) -> u32 {
    hash.bytes().take_while(|b| *b == b'0').count() as u32
}

pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    leading_zero_hex_chars(hash) >= difficulty
}

/// Mine the block by incrementing the nonce from zero until its hash starts
/// with `difficulty` zero characters. There is no iteration cap.
pub fn mine(block: &mut Block, difficulty: u32) {
    block.nonce = 0;
    block.hash = block.calculate_hash();
    while !meets_difficulty(&block.hash, difficulty) {
        block.nonce = block.nonce.wrapping_add(1);
        block.hash = block.calculate_hash();
    }
    info!(
        "Mined block {} with nonce {} and hash {}",
        block.index, block.nonce, block.hash
    );
}

/// Same search as [`mine`], but gives up once `cancel` is set.
///
/// The flag is checked before every attempt. A cancelled block is left with
/// whatever nonce was last tried and must be discarded.
pub fn mine_cancellable(
    block: &mut Block,
    difficulty: u32,
    cancel: &AtomicBool,
) -> Result<(), MineError> {
    block.nonce = 0;
    loop {
        if cancel.load(Ordering::Relaxed) {
            return Err(MineError::Cancelled { nonce: block.nonce });
        }
        block.hash = block.calculate_hash();
        if meets_difficulty(&block.hash, difficulty) {
            info!(
                "Mined block {} with nonce {} and hash {}",
                block.index, block.nonce, block.hash
            );
            return Ok(());
        }
        block.nonce = block.nonce.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_zero_hex_chars_examples() {
        assert_eq!(leading_zero_hex_chars("abcd"), 0);
        assert_eq!(leading_zero_hex_chars("0abc"), 1);
        assert_eq!(leading_zero_hex_chars("000f00"), 3);
        assert_eq!(leading_zero_hex_chars(&"0".repeat(64)), 64);
        assert_eq!(leading_zero_hex_chars(""), 0);
    }

    #[test]
    fn meets_difficulty_examples() {
        assert!(meets_difficulty("00ab", 2));
        assert!(meets_difficulty("00ab", 1));
        assert!(!meets_difficulty("00ab", 3));
        assert!(meets_difficulty("ffff", 0));
    }

    #[test]
    fn mine_block_example() {
        let mut block = Block::new(1, "prev", 1_600_000_000_000, "payload", 0);
        mine(&mut block, 3);
        assert!(block.hash().starts_with("000"));
        assert!(block.has_valid_hash());
    }

    #[test]
    fn mine_resets_nonce_and_is_deterministic() {
        let mut a = Block::new(1, "prev", 1_600_000_000_000, "payload", 999);
        let mut b = Block::new(1, "prev", 1_600_000_000_000, "payload", 0);
        mine(&mut a, 2);
        mine(&mut b, 2);
        assert_eq!(a.nonce(), b.nonce());
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn mine_finds_smallest_nonce() {
        let mut block = Block::new(4, "prev", 42, "x", 0);
        mine(&mut block, 2);
        for nonce in 0..block.nonce() {
            let candidate = Block::new(4, "prev", 42, "x", nonce);
            assert!(!candidate.meets_difficulty(2));
        }
    }

    #[test]
    fn difficulty_zero_accepts_first_hash() {
        let mut block = Block::new(1, "prev", 42, "x", 5);
        mine(&mut block, 0);
        assert_eq!(block.nonce(), 0);
    }

    #[test]
    fn mine_cancellable_matches_mine() {
        let cancel = AtomicBool::new(false);
        let mut a = Block::new(1, "prev", 42, "x", 0);
        let mut b = a.clone();
        mine(&mut a, 2);
        mine_cancellable(&mut b, 2, &cancel).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn mine_cancellable_stops_when_flag_set() {
        let cancel = AtomicBool::new(true);
        let mut block = Block::new(1, "prev", 42, "x", 0);
        let err = mine_cancellable(&mut block, 64, &cancel).unwrap_err();
        assert_eq!(err, MineError::Cancelled { nonce: 0 });
    }
}
