//! Draft validation, amount conversion and preview extraction
//!
//! Everything here is local computation: validation failures short-circuit
//! before the build library is ever invoked.

use serde_json::Value;

use crate::{
    data_structures::{utxo::lovelace_of, BuildPreview, TransactionDraft, LOVELACE_PER_ADA},
    errors::{WorkbenchError, WorkbenchResult},
};

use super::BuiltTransaction;

/// A draft that passed local validation, ready to hand to the builder
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDraft {
    pub recipient: String,
    /// Payment amount in lovelace
    pub lovelace: u64,
    /// Metadata label and payload, when metadata was supplied
    pub metadata: Option<(u64, Value)>,
}

/// Validate a draft and convert its ADA amount to lovelace
///
/// Recipient must be non-empty and the amount a strictly positive decimal.
/// Conversion multiplies by 1,000,000 and truncates.
pub fn validate_draft(draft: &TransactionDraft) -> WorkbenchResult<ValidatedDraft> {
    if draft.recipient.trim().is_empty() {
        return Err(WorkbenchError::build_failed("Recipient address is required"));
    }

    Ok(ValidatedDraft {
        recipient: draft.recipient.trim().to_string(),
        lovelace: ada_to_lovelace(&draft.amount_ada)?,
        metadata: parse_metadata(&draft.metadata_json)?,
    })
}

/// Convert decimal ADA text to lovelace, truncating sub-lovelace precision
pub fn ada_to_lovelace(amount_ada: &str) -> WorkbenchResult<u64> {
    let ada: f64 = amount_ada
        .trim()
        .parse()
        .map_err(|_| WorkbenchError::build_failed("Amount must be a positive number"))?;
    if !ada.is_finite() || ada <= 0.0 {
        return Err(WorkbenchError::build_failed("Amount must be a positive number"));
    }
    Ok((ada * LOVELACE_PER_ADA as f64) as u64)
}

/// Parse metadata text into a (label, payload) pair
///
/// Empty text and the empty-object literal mean no metadata. Otherwise the
/// text must parse as a JSON object; its first key (insertion order) is the
/// numeric label and the corresponding value the payload. Exactly one label
/// per build is supported.
pub fn parse_metadata(metadata_json: &str) -> WorkbenchResult<Option<(u64, Value)>> {
    let trimmed = metadata_json.trim();
    if trimmed.is_empty() || trimmed == "{}" {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| WorkbenchError::InvalidMetadata(format!("Metadata is not valid JSON: {e}")))?;
    let object = value
        .as_object()
        .ok_or_else(|| WorkbenchError::invalid_metadata("Metadata must be a JSON object"))?;

    match object.iter().next() {
        None => Ok(None),
        Some((key, payload)) => {
            let label: u64 = key.parse().map_err(|_| {
                WorkbenchError::InvalidMetadata(format!("Metadata label '{key}' is not numeric"))
            })?;
            Ok(Some((label, payload.clone())))
        }
    }
}

/// Extract fee and change from a built transaction's body
///
/// The change output is the output directed back to the sender's own
/// address; its lovelace quantity is 0 when the build produced none.
pub fn extract_preview(built: &BuiltTransaction, own_address: &str) -> BuildPreview {
    let change = built
        .body
        .outputs
        .iter()
        .find(|o| o.address == own_address)
        .map(|o| lovelace_of(&o.amount))
        .unwrap_or(0);

    BuildPreview {
        fee: built.body.fee,
        change,
        unsigned_tx: built.unsigned_tx.clone(),
    }
}
