//! WASM bindings for the transaction workbench
//!
//! JavaScript-compatible entry points for the pieces a browser UI calls
//! synchronously: amount conversion, metadata label parsing, datum
//! placeholders and evaluation-response classification.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::{
    building::{ada_to_lovelace, parse_metadata},
    data_structures::{DatumView, SimulationOutcome},
    providers::{classify_evaluation, EvaluationResponse},
};

// Enable logging for WASM environments
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

/// JavaScript-compatible workbench configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[wasm_bindgen(getter_with_clone)]
pub struct WasmWorkbenchConfig {
    /// Blockfrost API base URL
    pub base_url: String,
    /// Project credential for the indexer and evaluator endpoints
    pub project_id: String,
}

#[wasm_bindgen]
impl WasmWorkbenchConfig {
    #[wasm_bindgen(constructor)]
    pub fn new(base_url: String, project_id: String) -> WasmWorkbenchConfig {
        WasmWorkbenchConfig {
            base_url,
            project_id,
        }
    }
}

/// Convert decimal ADA text to a lovelace amount string
#[wasm_bindgen]
pub fn wasm_ada_to_lovelace(amount_ada: &str) -> Result<String, JsValue> {
    ada_to_lovelace(amount_ada)
        .map(|lovelace| lovelace.to_string())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse metadata text into `{label, payload}`, or null for no metadata
#[wasm_bindgen]
pub fn wasm_parse_metadata(metadata_json: &str) -> Result<JsValue, JsValue> {
    match parse_metadata(metadata_json) {
        Ok(Some((label, payload))) => {
            let entry = serde_json::json!({"label": label, "payload": payload});
            serde_wasm_bindgen::to_value(&entry).map_err(|e| JsValue::from_str(&e.to_string()))
        }
        Ok(None) => Ok(JsValue::NULL),
        Err(e) => Err(JsValue::from_str(&e.to_string())),
    }
}

/// Classify a script evaluation response payload
///
/// Returns the serialized [`SimulationOutcome`].
#[wasm_bindgen]
pub fn wasm_classify_evaluation(payload: JsValue, ok: bool) -> Result<JsValue, JsValue> {
    let payload: Value = serde_wasm_bindgen::from_value(payload).unwrap_or(Value::Null);
    let outcome: SimulationOutcome = classify_evaluation(&EvaluationResponse { ok, payload });
    if let SimulationOutcome::Failure { ref reason } = outcome {
        console_log!("simulation classified as failure: {}", reason);
    }
    serde_wasm_bindgen::to_value(&outcome).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Display text for a decode-failure datum placeholder
#[wasm_bindgen]
pub fn wasm_datum_decode_failed_placeholder() -> String {
    DatumView::DecodeFailed.display_text()
}

/// Display text for a missing-datum placeholder
#[wasm_bindgen]
pub fn wasm_datum_missing_placeholder() -> String {
    DatumView::Missing.display_text()
}
