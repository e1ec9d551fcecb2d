//! Transaction-building collaborator boundary
//!
//! Fee calculation, change computation, input auto-selection and CBOR
//! encoding are delegated entirely to an implementation of
//! [`TransactionBuilder`]. The workbench depends on a deliberately narrow
//! contract: the builder accepts a declarative [`BuildRequest`] and returns
//! the unsigned encoding plus an inspectable body exposing fee and
//! per-output address/amount. A library that cannot expose that shape must
//! be wrapped in an adapter that normalizes to it.

pub mod preview;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    data_structures::{Asset, Utxo},
    errors::WorkbenchResult,
};

pub use preview::{ada_to_lovelace, extract_preview, parse_metadata, validate_draft, ValidatedDraft};

/// A payment output in a build request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOutput {
    pub address: String,
    pub amount: Vec<Asset>,
    /// Datum to attach inline, as JSON under the detailed schema
    #[serde(default)]
    pub inline_datum: Option<Value>,
}

impl PaymentOutput {
    pub fn lovelace(address: impl Into<String>, quantity: u64) -> Self {
        Self {
            address: address.into(),
            amount: vec![Asset::lovelace(quantity)],
            inline_datum: None,
        }
    }
}

/// How the datum accompanying a script input is referenced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatumSource {
    /// The spent output carries the datum inline
    Inline,
    /// The datum is referenced by hash
    Hash(String),
}

/// Descriptor for spending a script-locked output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptRedemption {
    /// The locked output being spent
    pub utxo: Utxo,
    /// Plutus script version, e.g. "V2"
    pub script_version: String,
    /// Script code as CBOR hex
    pub script_code: String,
    pub datum_source: DatumSource,
    /// Parsed redeemer value
    pub redeemer: Value,
}

/// Declarative description of a candidate transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildRequest {
    pub outputs: Vec<PaymentOutput>,
    /// Mandatory input set; `None` lets the builder auto-select
    pub inputs: Option<Vec<Utxo>>,
    /// Single metadata label and payload
    pub metadata: Option<(u64, Value)>,
    pub redemption: Option<ScriptRedemption>,
    pub change_address: String,
}

/// One output of the built transaction's body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyOutput {
    pub address: String,
    pub amount: Vec<Asset>,
}

/// Inspectable body of a built transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBody {
    /// Absolute fee in lovelace
    pub fee: u64,
    pub outputs: Vec<BodyOutput>,
}

/// A successfully built, unsigned transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltTransaction {
    /// Unsigned transaction encoding (CBOR hex)
    pub unsigned_tx: String,
    pub body: TransactionBody,
}

/// The transaction-building library boundary
#[async_trait(?Send)]
pub trait TransactionBuilder {
    /// Build a balanced, fee-accurate unsigned transaction
    ///
    /// Failures surface the library's own message when available;
    /// "insufficient funds or invalid inputs" is the most common cause.
    async fn build(&self, request: BuildRequest) -> WorkbenchResult<BuiltTransaction>;
}
