//! External collaborator boundaries: chain indexer, script evaluator and
//! datum decoder
//!
//! The workbench core only depends on the traits defined here. The
//! Blockfrost HTTP client in [`blockfrost`] implements the indexer and
//! evaluator; datum decoding is delegated to a data-serialization
//! collaborator supplied by the embedder.

#[cfg(feature = "http")]
pub mod blockfrost;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    data_structures::{SimulationOutcome, Utxo},
    errors::WorkbenchResult,
};

#[cfg(feature = "http")]
pub use blockfrost::{BlockfrostClient, BlockfrostConfig};

/// Chain indexer boundary: script-address UTxO lookup
#[async_trait(?Send)]
pub trait ChainIndexer {
    /// Fetch all UTxOs currently sitting at an address
    ///
    /// A transport failure or non-2xx response maps to `FetchError`.
    async fn address_utxos(&self, address: &str) -> WorkbenchResult<Vec<Utxo>>;
}

/// Raw response of a script evaluation request
///
/// `ok` reflects the HTTP status class; `payload` is the response body as
/// JSON. Classification into a [`SimulationOutcome`] is a separate, pure
/// step so it can be tested without a network.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResponse {
    pub ok: bool,
    pub payload: Value,
}

/// Remote script evaluator boundary
#[async_trait(?Send)]
pub trait ScriptEvaluator {
    /// Submit an unsigned transaction encoding for execution-cost evaluation
    ///
    /// Returns the raw response; only transport-level failures are errors.
    async fn evaluate(&self, unsigned_tx: &str) -> WorkbenchResult<EvaluationResponse>;
}

/// Data-serialization collaborator: binary datum to detailed-schema JSON
///
/// Used read-only; the workbench never encodes datums.
pub trait DatumDecoder {
    fn decode(&self, datum_hex: &str) -> Result<Value, String>;
}

/// Classify an evaluation response into a simulation outcome
///
/// A response whose payload carries an `EvaluationResult` entry for any
/// redeemer pointer is a success reporting that pointer's memory/step
/// cost. A non-2xx response or a payload lacking that key is a failure
/// with the reported reason, or a default reason when none is present.
pub fn classify_evaluation(response: &EvaluationResponse) -> SimulationOutcome {
    if response.ok {
        if let Some(result) = evaluation_result(&response.payload) {
            return result;
        }
    }

    let reason = response
        .payload
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| "Simulation request failed.".to_string());
    SimulationOutcome::Failure { reason }
}

fn evaluation_result(payload: &Value) -> Option<SimulationOutcome> {
    let by_pointer = payload.get("result")?.get("EvaluationResult")?.as_object()?;
    let (_, cost) = by_pointer.iter().next()?;
    Some(SimulationOutcome::Success {
        memory: cost.get("memory").and_then(Value::as_u64)?,
        steps: cost.get("steps").and_then(Value::as_u64)?,
    })
}
