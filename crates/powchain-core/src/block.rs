use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::GENESIS_PREVIOUS_HASH;
use crate::payload::Payload;
use crate::pow;

/// SHA-256 over the canonical string forms of the block fields, as lowercase hex.
pub fn compute_hash(
    index: u64,
    previous_hash: &str,
    timestamp: u64,
    payload: &Payload,
    nonce: u64,
) -> String {
    let material = format!("{index}{previous_hash}{timestamp}{payload}{nonce}");
    let mut hasher = Sha256::new();
    hasher.update(material.as_bytes());
    hex::encode(hasher.finalize())
}

/// One committed unit of data. Fields are read-only outside this crate; only
/// mining changes `nonce` and `hash`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub(crate) index: u64,
    pub(crate) previous_hash: String,
    pub(crate) timestamp: u64,
    pub(crate) payload: Payload,
    pub(crate) nonce: u64,
    pub(crate) hash: String,
}

impl Block {
    pub fn new(
        index: u64,
        previous_hash: impl Into<String>,
        timestamp: u64,
        payload: impl Into<Payload>,
        nonce: u64,
    ) -> Self {
        let mut block = Self {
            index,
            previous_hash: previous_hash.into(),
            timestamp,
            payload: payload.into(),
            nonce,
            hash: String::new(),
        };
        block.hash = block.calculate_hash();
        block
    }

    /// Unmined root block at index 0 linked to the `"0"` sentinel.
    pub fn genesis(data: impl Into<Payload>, timestamp: u64) -> Self {
        Self::new(0, GENESIS_PREVIOUS_HASH, timestamp, data, 0)
    }

    pub fn calculate_hash(&self) -> String {
        compute_hash(
            self.index,
            &self.previous_hash,
            self.timestamp,
            &self.payload,
            self.nonce,
        )
    }

    pub fn has_valid_hash(&self) -> bool {
        self.hash == self.calculate_hash()
    }

    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        pow::meets_difficulty(&self.hash, difficulty)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block(index: {}, hash: {}, previous_hash: {}, timestamp: {}, data: {}, nonce: {})",
            self.index, self.hash, self.previous_hash, self.timestamp, self.payload, self.nonce
        )
    }
}
