//! Identifier types for transactions and locally known contracts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A transaction hash as reported by the backend (usually `0x`-prefixed hex).
///
/// The store keys everything by this value, so it is compared verbatim;
/// no case folding or prefix normalisation is applied.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short: String = self.0.chars().take(10).collect();
        write!(f, "TxHash({short})")
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TxHash {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TxHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of a contract in the local contracts registry.
///
/// Assigned by the UI before deployment, so it exists before any on-chain address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(String);

impl ContractId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContractId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_hash_is_transparent_in_json() {
        let hash = TxHash::new("0xabc");
        assert_eq!(serde_json::to_string(&hash).unwrap(), "\"0xabc\"");
        let back: TxHash = serde_json::from_str("\"0xabc\"").unwrap();
        assert_eq!(back, hash);
    }

    #[test]
    fn tx_hash_debug_is_shortened() {
        let hash = TxHash::new("0x0123456789abcdef");
        assert_eq!(format!("{hash:?}"), "TxHash(0x01234567)");
        assert_eq!(hash.to_string(), "0x0123456789abcdef");
    }
}
