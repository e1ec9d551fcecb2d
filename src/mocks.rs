//! Mock collaborators for deterministic testing
//!
//! Implementations of the wallet, builder, indexer, evaluator and datum
//! decoder boundaries that run without a browser or network, with explicit
//! failure modes for exercising error paths.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
    building::{BodyOutput, BuildRequest, BuiltTransaction, TransactionBody, TransactionBuilder},
    data_structures::{Asset, Utxo},
    errors::{WorkbenchError, WorkbenchResult},
    providers::{ChainIndexer, DatumDecoder, EvaluationResponse, ScriptEvaluator},
    wallet::{DRepInfo, WalletCapability, WalletProvider},
};

/// Default fee used by the mock builder, in lovelace
pub const MOCK_FEE: u64 = 171_441;

/// Default change amount used by the mock builder, in lovelace
pub const MOCK_CHANGE: u64 = 4_828_559;

/// Simulated failure modes for the mock wallet
#[derive(Debug, Clone, Default)]
pub struct MockWalletFailureModes {
    /// Fail the next enable call
    pub fail_enable: bool,
    /// Fail the next get_utxos call
    pub fail_get_utxos: bool,
    /// Fail the next sign_tx call
    pub fail_sign: bool,
    /// Fail the next submit_tx call
    pub fail_submit: bool,
}

/// In-memory wallet capability for deterministic testing
#[derive(Debug, Clone)]
pub struct MockWallet {
    utxos: Arc<Mutex<Vec<Utxo>>>,
    balance: Arc<Mutex<Vec<Asset>>>,
    addresses: Arc<Mutex<Vec<String>>>,
    network_id: u8,
    public_key_hash: String,
    next_tx_id: Arc<Mutex<String>>,
    submitted: Arc<Mutex<Vec<String>>>,
    refresh_reads: Arc<Mutex<u32>>,
    failure_modes: Arc<Mutex<MockWalletFailureModes>>,
}

impl Default for MockWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWallet {
    pub fn new() -> Self {
        Self {
            utxos: Arc::new(Mutex::new(vec![Utxo::new(
                "a1b2c3",
                0,
                vec![Asset::lovelace(15_000_000)],
            )])),
            balance: Arc::new(Mutex::new(vec![Asset::lovelace(15_000_000)])),
            addresses: Arc::new(Mutex::new(vec!["addr_test1me".to_string()])),
            network_id: 0,
            public_key_hash: "pkh_mock".to_string(),
            next_tx_id: Arc::new(Mutex::new("txid_mock".to_string())),
            submitted: Arc::new(Mutex::new(Vec::new())),
            refresh_reads: Arc::new(Mutex::new(0)),
            failure_modes: Arc::new(Mutex::new(MockWalletFailureModes::default())),
        }
    }

    pub fn with_address(self, address: impl Into<String>) -> Self {
        self.set_address(address);
        self
    }

    pub fn set_address(&self, address: impl Into<String>) {
        *self.addresses.lock().unwrap() = vec![address.into()];
    }

    pub fn set_utxos(&self, utxos: Vec<Utxo>) {
        *self.utxos.lock().unwrap() = utxos;
    }

    pub fn set_balance(&self, balance: Vec<Asset>) {
        *self.balance.lock().unwrap() = balance;
    }

    pub fn set_next_tx_id(&self, tx_id: impl Into<String>) {
        *self.next_tx_id.lock().unwrap() = tx_id.into();
    }

    pub fn set_failure_modes(&self, modes: MockWalletFailureModes) {
        *self.failure_modes.lock().unwrap() = modes;
    }

    /// Signed encodings handed to submit_tx, in order
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }

    /// Number of get_utxos reads observed (one per refresh)
    pub fn refresh_reads(&self) -> u32 {
        *self.refresh_reads.lock().unwrap()
    }
}

#[async_trait(?Send)]
impl WalletCapability for MockWallet {
    async fn get_utxos(&self) -> WorkbenchResult<Vec<Utxo>> {
        let mut modes = self.failure_modes.lock().unwrap();
        if modes.fail_get_utxos {
            modes.fail_get_utxos = false; // Reset after use
            return Err(WorkbenchError::refresh_failed("Mock failure: get_utxos"));
        }
        drop(modes);
        *self.refresh_reads.lock().unwrap() += 1;
        Ok(self.utxos.lock().unwrap().clone())
    }

    async fn get_balance(&self) -> WorkbenchResult<Vec<Asset>> {
        Ok(self.balance.lock().unwrap().clone())
    }

    async fn get_used_addresses(&self) -> WorkbenchResult<Vec<String>> {
        Ok(self.addresses.lock().unwrap().clone())
    }

    async fn get_network_id(&self) -> WorkbenchResult<u8> {
        Ok(self.network_id)
    }

    async fn get_drep(&self) -> WorkbenchResult<DRepInfo> {
        Ok(DRepInfo {
            public_key_hash: self.public_key_hash.clone(),
        })
    }

    async fn sign_tx(&self, unsigned_tx: &str) -> WorkbenchResult<String> {
        let mut modes = self.failure_modes.lock().unwrap();
        if modes.fail_sign {
            modes.fail_sign = false;
            return Err(WorkbenchError::sign_failed("User declined to sign"));
        }
        Ok(format!("signed:{unsigned_tx}"))
    }

    async fn submit_tx(&self, signed_tx: &str) -> WorkbenchResult<String> {
        let mut modes = self.failure_modes.lock().unwrap();
        if modes.fail_submit {
            modes.fail_submit = false;
            return Err(WorkbenchError::submit_failed("Transaction rejected"));
        }
        drop(modes);
        self.submitted.lock().unwrap().push(signed_tx.to_string());
        Ok(self.next_tx_id.lock().unwrap().clone())
    }
}

#[async_trait(?Send)]
impl WalletProvider for MockWallet {
    type Capability = MockWallet;

    async fn enable(&self, wallet_id: &str) -> WorkbenchResult<MockWallet> {
        let mut modes = self.failure_modes.lock().unwrap();
        if modes.fail_enable {
            modes.fail_enable = false;
            return Err(WorkbenchError::connection_failed(&format!(
                "Wallet '{wallet_id}' refused to enable"
            )));
        }
        Ok(self.clone())
    }
}

/// Mock transaction builder recording every request
#[derive(Debug, Clone, Default)]
pub struct MockBuilder {
    requests: Arc<Mutex<Vec<BuildRequest>>>,
    next_error: Arc<Mutex<Option<String>>>,
}

impl MockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next build with the given library message
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.next_error.lock().unwrap() = Some(message.into());
    }

    /// Requests observed so far, in order
    pub fn requests(&self) -> Vec<BuildRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait(?Send)]
impl TransactionBuilder for MockBuilder {
    async fn build(&self, request: BuildRequest) -> WorkbenchResult<BuiltTransaction> {
        if let Some(message) = self.next_error.lock().unwrap().take() {
            return Err(WorkbenchError::BuildError(message));
        }

        let mut outputs: Vec<BodyOutput> = request
            .outputs
            .iter()
            .map(|o| BodyOutput {
                address: o.address.clone(),
                amount: o.amount.clone(),
            })
            .collect();
        outputs.push(BodyOutput {
            address: request.change_address.clone(),
            amount: vec![Asset::lovelace(MOCK_CHANGE)],
        });
        self.requests.lock().unwrap().push(request);

        Ok(BuiltTransaction {
            unsigned_tx: "84a300_mock_cbor".to_string(),
            body: TransactionBody {
                fee: MOCK_FEE,
                outputs,
            },
        })
    }
}

/// Mock chain indexer serving canned UTxO lists per address
#[derive(Debug, Clone, Default)]
pub struct MockIndexer {
    utxos_by_address: Arc<Mutex<HashMap<String, Vec<Utxo>>>>,
    next_error: Arc<Mutex<Option<String>>>,
    fetch_count: Arc<Mutex<u32>>,
}

impl MockIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_address(&self, address: impl Into<String>, utxos: Vec<Utxo>) {
        self.utxos_by_address
            .lock()
            .unwrap()
            .insert(address.into(), utxos);
    }

    /// Fail the next fetch, e.g. "HTTP 404"
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.next_error.lock().unwrap() = Some(message.into());
    }

    pub fn fetch_count(&self) -> u32 {
        *self.fetch_count.lock().unwrap()
    }
}

#[async_trait(?Send)]
impl ChainIndexer for MockIndexer {
    async fn address_utxos(&self, address: &str) -> WorkbenchResult<Vec<Utxo>> {
        *self.fetch_count.lock().unwrap() += 1;
        if let Some(message) = self.next_error.lock().unwrap().take() {
            return Err(WorkbenchError::FetchError(format!(
                "Failed to fetch UTxOs: {message}"
            )));
        }
        Ok(self
            .utxos_by_address
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .unwrap_or_default())
    }
}

/// Mock script evaluator returning a queued response
#[derive(Debug, Clone)]
pub struct MockEvaluator {
    response: Arc<Mutex<EvaluationResponse>>,
    next_transport_error: Arc<Mutex<Option<String>>>,
    evaluated: Arc<Mutex<Vec<String>>>,
}

impl Default for MockEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEvaluator {
    /// Evaluator answering with a successful evaluation result
    pub fn new() -> Self {
        Self {
            response: Arc::new(Mutex::new(EvaluationResponse {
                ok: true,
                payload: json!({
                    "result": {
                        "EvaluationResult": {
                            "spend:0": {"memory": 1700, "steps": 476_468}
                        }
                    }
                }),
            })),
            next_transport_error: Arc::new(Mutex::new(None)),
            evaluated: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_response(&self, response: EvaluationResponse) {
        *self.response.lock().unwrap() = response;
    }

    /// Fail the next evaluation at the transport level
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.next_transport_error.lock().unwrap() = Some(message.into());
    }

    /// Unsigned encodings submitted for evaluation, in order
    pub fn evaluated(&self) -> Vec<String> {
        self.evaluated.lock().unwrap().clone()
    }
}

#[async_trait(?Send)]
impl ScriptEvaluator for MockEvaluator {
    async fn evaluate(&self, unsigned_tx: &str) -> WorkbenchResult<EvaluationResponse> {
        if let Some(message) = self.next_transport_error.lock().unwrap().take() {
            return Err(WorkbenchError::SimulationError(message));
        }
        self.evaluated.lock().unwrap().push(unsigned_tx.to_string());
        Ok(self.response.lock().unwrap().clone())
    }
}

/// Mock datum decoder with per-datum overrides
#[derive(Debug, Clone, Default)]
pub struct MockDatumDecoder {
    decoded: Arc<Mutex<HashMap<String, Value>>>,
    fail_all: Arc<Mutex<bool>>,
}

impl MockDatumDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_datum(&self, datum_hex: impl Into<String>, decoded: Value) {
        self.decoded.lock().unwrap().insert(datum_hex.into(), decoded);
    }

    /// Make every decode attempt fail
    pub fn fail_all(&self) {
        *self.fail_all.lock().unwrap() = true;
    }
}

impl DatumDecoder for MockDatumDecoder {
    fn decode(&self, datum_hex: &str) -> Result<Value, String> {
        if *self.fail_all.lock().unwrap() {
            return Err("Mock failure: decode".to_string());
        }
        Ok(self
            .decoded
            .lock()
            .unwrap()
            .get(datum_hex)
            .cloned()
            .unwrap_or_else(|| json!({"constructor": 0, "fields": []})))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_wallet_signs_and_submits() {
        let wallet = MockWallet::new();
        let signed = wallet.sign_tx("84a300").await.unwrap();
        assert_eq!(signed, "signed:84a300");

        let tx_id = wallet.submit_tx(&signed).await.unwrap();
        assert_eq!(tx_id, "txid_mock");
        assert_eq!(wallet.submitted(), vec!["signed:84a300".to_string()]);
    }

    #[tokio::test]
    async fn mock_wallet_failure_modes_reset_after_use() {
        let wallet = MockWallet::new();
        wallet.set_failure_modes(MockWalletFailureModes {
            fail_sign: true,
            ..Default::default()
        });

        assert!(wallet.sign_tx("84a300").await.is_err());
        assert!(wallet.sign_tx("84a300").await.is_ok());
    }

    #[tokio::test]
    async fn mock_builder_records_requests() {
        let builder = MockBuilder::new();
        let request = BuildRequest {
            outputs: vec![crate::building::PaymentOutput::lovelace("addr", 1_000_000)],
            inputs: None,
            metadata: None,
            redemption: None,
            change_address: "addr_me".to_string(),
        };
        let built = builder.build(request).await.unwrap();
        assert_eq!(built.body.fee, MOCK_FEE);
        assert_eq!(builder.request_count(), 1);
    }

    #[tokio::test]
    async fn mock_indexer_serves_canned_utxos() {
        let indexer = MockIndexer::new();
        indexer.add_address("addr_script", vec![Utxo::new("ff", 0, vec![])]);

        let utxos = indexer.address_utxos("addr_script").await.unwrap();
        assert_eq!(utxos.len(), 1);
        assert!(indexer.address_utxos("unknown").await.unwrap().is_empty());

        indexer.fail_next("HTTP 404");
        assert!(indexer.address_utxos("addr_script").await.is_err());
    }
}
