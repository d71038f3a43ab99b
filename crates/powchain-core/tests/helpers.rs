#![allow(dead_code)]

use powchain_core::{Chain, ChainConfig, FixedClock, Map, Value};

pub const FIXED_TS: u64 = 1_600_000_000_000;

pub fn fixed_chain(difficulty: u32) -> Chain<FixedClock> {
    Chain::with_clock(ChainConfig::with_difficulty(difficulty), FixedClock(FIXED_TS))
        .expect("valid difficulty")
}

pub fn transfer(sender: &str, receiver: &str, amount: u64) -> Option<Map<String, Value>> {
    let mut fields = Map::new();
    fields.insert("sender".into(), Value::from(sender));
    fields.insert("receiver".into(), Value::from(receiver));
    fields.insert("amount".into(), Value::from(amount));
    Some(fields)
}

pub fn assert_linked<C: powchain_core::Clock>(chain: &Chain<C>) {
    for pair in chain.blocks().windows(2) {
        assert_eq!(pair[1].previous_hash(), pair[0].hash());
        assert_eq!(pair[1].index(), pair[0].index() + 1);
    }
}
