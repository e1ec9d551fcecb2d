//! Unspent transaction outputs and their asset values
//!
//! The wire shape mirrors what both the wallet capability and the chain
//! indexer return: a (tx_hash, output_index) identity plus a list of
//! (unit, quantity) asset pairs, with quantities as decimal strings.

use serde::{Deserialize, Serialize};

/// Unit name of the base currency asset
pub const LOVELACE_UNIT: &str = "lovelace";

/// Smallest-unit multiplier: 1 ADA = 1,000,000 lovelace
pub const LOVELACE_PER_ADA: u64 = 1_000_000;

/// A single asset entry in an output's value list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub unit: String,
    pub quantity: String,
}

impl Asset {
    pub fn lovelace(quantity: u64) -> Self {
        Self {
            unit: LOVELACE_UNIT.to_string(),
            quantity: quantity.to_string(),
        }
    }
}

/// Identity key of an unspent output
///
/// Equality and hashing are defined solely by (tx_hash, output_index),
/// never by output content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtxoId {
    pub tx_hash: String,
    pub output_index: u32,
}

/// An unspent transaction output
///
/// Immutable once fetched. A spent output must be re-fetched from the
/// wallet or indexer, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub tx_hash: String,
    pub output_index: u32,
    pub amount: Vec<Asset>,
    /// Inline datum as CBOR hex, when the output carries one
    #[serde(default)]
    pub inline_datum: Option<String>,
    /// Datum hash, when the datum is referenced rather than inlined
    #[serde(default)]
    pub data_hash: Option<String>,
}

impl Utxo {
    pub fn new(tx_hash: impl Into<String>, output_index: u32, amount: Vec<Asset>) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            output_index,
            amount,
            inline_datum: None,
            data_hash: None,
        }
    }

    pub fn id(&self) -> UtxoId {
        UtxoId {
            tx_hash: self.tx_hash.clone(),
            output_index: self.output_index,
        }
    }

    /// Lovelace quantity of this output, 0 when absent or unparseable
    pub fn lovelace(&self) -> u64 {
        lovelace_of(&self.amount)
    }
}

/// Lovelace quantity of an asset list, 0 when absent or unparseable
pub fn lovelace_of(amount: &[Asset]) -> u64 {
    amount
        .iter()
        .find(|a| a.unit == LOVELACE_UNIT)
        .and_then(|a| a.quantity.parse::<u64>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_ignores_content() {
        let a = Utxo::new("abc", 0, vec![Asset::lovelace(5_000_000)]);
        let mut b = Utxo::new("abc", 0, vec![Asset::lovelace(9_999_999)]);
        b.data_hash = Some("deadbeef".to_string());
        assert_eq!(a.id(), b.id());

        let c = Utxo::new("abc", 1, vec![Asset::lovelace(5_000_000)]);
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn lovelace_accessor() {
        let utxo = Utxo::new(
            "abc",
            0,
            vec![
                Asset {
                    unit: "token123".to_string(),
                    quantity: "42".to_string(),
                },
                Asset::lovelace(7_500_000),
            ],
        );
        assert_eq!(utxo.lovelace(), 7_500_000);

        let empty = Utxo::new("def", 0, vec![]);
        assert_eq!(empty.lovelace(), 0);
    }

    #[test]
    fn deserializes_indexer_wire_shape() {
        let json = r#"{
            "tx_hash": "8f2e",
            "output_index": 1,
            "amount": [{"unit": "lovelace", "quantity": "2000000"}],
            "data_hash": "9a3b"
        }"#;
        let utxo: Utxo = serde_json::from_str(json).unwrap();
        assert_eq!(utxo.output_index, 1);
        assert_eq!(utxo.lovelace(), 2_000_000);
        assert_eq!(utxo.data_hash.as_deref(), Some("9a3b"));
        assert!(utxo.inline_datum.is_none());
    }
}
