use std::sync::atomic::AtomicBool;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::block::Block;
use crate::clock::{Clock, SystemClock};
use crate::config::ChainConfig;
use crate::error::{ConfigError, Result, ValidationError, ValidationErrorKind};
use crate::payload::Payload;
use crate::pow;

/// Append-only sequence of blocks rooted at an unmined genesis block.
///
/// Every block after genesis is mined before it becomes visible, so readers
/// never observe a half-built tail. Appends take `&mut self`; sharing a chain
/// between writers requires wrapping it in a lock that serializes them.
#[derive(Debug, Clone, Serialize)]
pub struct Chain<C: Clock = SystemClock> {
    difficulty: u32,
    blocks: Vec<Block>,
    #[serde(skip)]
    clock: C,
}

impl Chain<SystemClock> {
    /// Chain with the default difficulty of 4 and the system clock.
    pub fn new() -> Self {
        Self::from_parts(ChainConfig::default(), SystemClock)
    }

    pub fn with_config(config: ChainConfig) -> std::result::Result<Self, ConfigError> {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for Chain<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Chain<C> {
    pub fn with_clock(config: ChainConfig, clock: C) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, clock))
    }

    fn from_parts(config: ChainConfig, clock: C) -> Self {
        let genesis = Block::genesis(config.genesis_data, clock.now());
        debug!("created genesis block {}", genesis.hash());
        Self {
            difficulty: config.difficulty,
            blocks: vec![genesis],
            clock,
        }
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, index: u64) -> Option<&Block> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: the genesis block is created with the chain.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn latest_block(&self) -> &Block {
        self.blocks
            .last()
            .expect("chain invariant violated: genesis block missing")
    }

    /// Mine a new block carrying `data` (merged with `extra` when given) and
    /// append it. Blocks until a valid nonce is found.
    pub fn add_block(
        &mut self,
        data: impl Into<String>,
        extra: Option<Map<String, Value>>,
    ) -> &Block {
        let mut candidate = self.candidate(Payload::merge(data, extra));
        pow::mine(&mut candidate, self.difficulty);
        self.commit(candidate)
    }

    /// Like [`Chain::add_block`], but abandons the candidate once `cancel` is
    /// set. A cancelled append leaves the chain untouched.
    pub fn add_block_cancellable(
        &mut self,
        data: impl Into<String>,
        extra: Option<Map<String, Value>>,
        cancel: &AtomicBool,
    ) -> Result<&Block> {
        let mut candidate = self.candidate(Payload::merge(data, extra));
        pow::mine_cancellable(&mut candidate, self.difficulty, cancel)?;
        Ok(self.commit(candidate))
    }

    fn candidate(&self, payload: Payload) -> Block {
        let tail = self.latest_block();
        Block::new(
            self.blocks.len() as u64,
            tail.hash(),
            self.clock.now(),
            payload,
            0,
        )
    }

    fn commit(&mut self, block: Block) -> &Block {
        debug!("appending block {} to chain", block.index());
        self.blocks.push(block);
        self.latest_block()
    }

    /// Check every block after genesis, stopping at the first failure.
    ///
    /// Each block must hash to its stored hash, reference its predecessor's
    /// hash, and carry the chain's proof of work. Genesis is trusted as is.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        for (i, pair) in self.blocks.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let kind = if !current.has_valid_hash() {
                Some(ValidationErrorKind::HashMismatch)
            } else if current.previous_hash() != previous.hash() {
                Some(ValidationErrorKind::BrokenLink)
            } else if !current.meets_difficulty(self.difficulty) {
                Some(ValidationErrorKind::InsufficientWork)
            } else {
                None
            };
            if let Some(kind) = kind {
                // Report the position, which a tampered `index` field cannot hide.
                return Err(ValidationError {
                    index: (i + 1) as u64,
                    kind,
                });
            }
        }
        Ok(())
    }

    pub fn is_chain_valid(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(err) => {
                warn!(index = err.index, kind = %err.kind, "chain validation failed");
                false
            }
        }
    }
}
