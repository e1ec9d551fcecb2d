//! Transaction draft and build preview types

use serde::{Deserialize, Serialize};

/// User intent for a simple payment transaction
///
/// Amount is entered in ADA as decimal text and converted to lovelace at
/// build time. Metadata is raw JSON text; an empty string or `{}` means
/// no metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub recipient: String,
    pub amount_ada: String,
    pub metadata_json: String,
}

impl TransactionDraft {
    pub fn new(recipient: impl Into<String>, amount_ada: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            amount_ada: amount_ada.into(),
            metadata_json: "{}".to_string(),
        }
    }

    pub fn with_metadata(mut self, metadata_json: impl Into<String>) -> Self {
        self.metadata_json = metadata_json.into();
        self
    }
}

impl Default for TransactionDraft {
    fn default() -> Self {
        Self::new("", "")
    }
}

/// Result of a successful fee-accurate build, prior to signing
///
/// Exists only while the draft it was produced from is unchanged; any
/// draft mutation or a successful submission invalidates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPreview {
    /// Absolute fee in lovelace
    pub fee: u64,
    /// Lovelace returned to the sender's own address
    pub change: u64,
    /// Unsigned transaction encoding (CBOR hex)
    pub unsigned_tx: String,
}
