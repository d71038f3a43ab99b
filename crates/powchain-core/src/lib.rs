//! Minimal proof-of-work blockchain: hash-linked blocks, a brute-force nonce
//! search gating every append, and full-chain validation.

pub mod block;
pub mod chain;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod payload;
pub mod pow;

pub use block::{compute_hash, Block};
pub use chain::Chain;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ChainConfig;
pub use error::{ChainError, ConfigError, MineError, ValidationError, ValidationErrorKind};
pub use payload::Payload;

/// Re-exported so callers can build extra fields without naming serde_json.
pub use serde_json::{Map, Value};
