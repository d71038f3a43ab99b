use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::BASE_DATA_KEY;

/// Application data carried by a block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Simple(String),
    /// Named fields in insertion order.
    Structured(Map<String, Value>),
}

impl Payload {
    /// Combine raw data with optional extra fields.
    ///
    /// Without extras (or with an empty mapping) the data stays a plain string.
    /// Otherwise the result starts with a `"data"` entry holding the raw data,
    /// followed by every extra field. An extra `"data"` field replaces the
    /// base value but keeps its position.
    pub fn merge(data: impl Into<String>, extra: Option<Map<String, Value>>) -> Self {
        let data = data.into();
        match extra {
            Some(extra) if !extra.is_empty() => {
                let mut fields = Map::with_capacity(extra.len() + 1);
                fields.insert(BASE_DATA_KEY.to_string(), Value::String(data));
                for (key, value) in extra {
                    fields.insert(key, value);
                }
                Payload::Structured(fields)
            }
            _ => Payload::Simple(data),
        }
    }

    /// Look up a field. A simple payload only answers to `"data"`.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Payload::Simple(s) if key == BASE_DATA_KEY => Some(Value::String(s.clone())),
            Payload::Simple(_) => None,
            Payload::Structured(fields) => fields.get(key).cloned(),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Payload::Structured(_))
    }
}

/// Canonical form fed into the block hash.
///
/// Structured payloads render as compact JSON in insertion order, so their
/// hashes differ from any scheme that stringifies maps another way (for
/// example `{'data': ...}` with single quotes).
impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Simple(s) => f.write_str(s),
            Payload::Structured(fields) => {
                let json = serde_json::to_string(fields).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Simple(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Simple(s)
    }
}
