use serde::{Deserialize, Serialize};

/// Destination address and encoded payload needed to submit a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallData {
    pub to: String,
    pub data: String,
}

impl CallData {
    pub fn new(to: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            data: data.into(),
        }
    }

    /// Both fields are non-empty `0x`-prefixed hex strings.
    pub fn is_well_formed(&self) -> bool {
        is_hex_string(&self.to) && is_hex_string(&self.data)
    }
}

fn is_hex_string(s: &str) -> bool {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(rest) => !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}
