use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DIFFICULTY, GENESIS_DATA, HASH_HEX_SIZE};
use crate::error::ConfigError;

/// Parameters fixed for the lifetime of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Leading `'0'` hex characters required of every mined hash.
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,
    /// Payload of the unmined genesis block.
    #[serde(default = "default_genesis_data")]
    pub genesis_data: String,
}

fn default_difficulty() -> u32 {
    DEFAULT_DIFFICULTY
}

fn default_genesis_data() -> String {
    GENESIS_DATA.to_string()
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            genesis_data: default_genesis_data(),
        }
    }
}

impl ChainConfig {
    pub fn with_difficulty(difficulty: u32) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = HASH_HEX_SIZE as u32;
        if self.difficulty > max {
            return Err(ConfigError::DifficultyTooHigh {
                difficulty: self.difficulty,
                max,
            });
        }
        Ok(())
    }
}
