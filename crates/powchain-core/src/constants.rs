pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const DEFAULT_DIFFICULTY: u32 = 4;
pub const GENESIS_PREVIOUS_HASH: &str = "0";
pub const GENESIS_DATA: &str = "Genesis Block";
/// Key holding the raw data in a merged, structured payload.
pub const BASE_DATA_KEY: &str = "data";
