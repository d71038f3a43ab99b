use std::fmt;

use thiserror::Error;

/// Rejected chain configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// More leading zeros requested than a hex digest has characters.
    #[error("difficulty {difficulty} exceeds the {max} hex characters of a digest")]
    DifficultyTooHigh { difficulty: u32, max: u32 },
}

/// Mining stopped before a valid nonce was found.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MineError {
    #[error("mining cancelled at nonce {nonce}")]
    Cancelled { nonce: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Stored hash differs from a recomputation over the block's fields.
    HashMismatch,
    /// `previous_hash` does not reference the preceding block's hash.
    BrokenLink,
    /// Hash lacks the leading zeros required by the chain's difficulty.
    InsufficientWork,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationErrorKind::HashMismatch => write!(f, "hash mismatch"),
            ValidationErrorKind::BrokenLink => write!(f, "broken previous-hash link"),
            ValidationErrorKind::InsufficientWork => write!(f, "insufficient proof of work"),
        }
    }
}

/// First failure found while scanning a chain.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("block {index} is invalid: {kind}")]
pub struct ValidationError {
    pub index: u64,
    pub kind: ValidationErrorKind,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Mine(#[from] MineError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, ChainError>;
