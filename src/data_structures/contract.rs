//! Contract interaction and submission outcome types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded view of a selected output's datum
///
/// `Missing` and `DecodeFailed` are distinct conditions and must render
/// distinguishable placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DatumView {
    /// Inline datum decoded to JSON under the detailed schema
    Decoded(Value),
    /// An inline datum was present but could not be decoded
    DecodeFailed,
    /// The selected output carries no inline datum
    Missing,
}

impl DatumView {
    /// Placeholder or pretty-printed JSON suitable for display
    pub fn display_text(&self) -> String {
        match self {
            DatumView::Decoded(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            DatumView::DecodeFailed => "// Failed to decode datum CBOR.".to_string(),
            DatumView::Missing => "// No inline datum found on selected UTxO.".to_string(),
        }
    }
}

/// Verdict of the most recent remote script evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationOutcome {
    Success { memory: u64, steps: u64 },
    Failure { reason: String },
}

impl SimulationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SimulationOutcome::Success { .. })
    }
}

/// One entry in the in-session submission history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Transaction identifier on success
    pub tx_id: Option<String>,
    /// Surfaced failure message on error
    pub error: Option<String>,
    /// Unix timestamp (seconds) of the attempt
    pub timestamp: u64,
}

impl SubmissionRecord {
    pub fn success(tx_id: impl Into<String>, timestamp: u64) -> Self {
        Self {
            tx_id: Some(tx_id.into()),
            error: None,
            timestamp,
        }
    }

    pub fn failure(error: impl Into<String>, timestamp: u64) -> Self {
        Self {
            tx_id: None,
            error: Some(error.into()),
            timestamp,
        }
    }
}
