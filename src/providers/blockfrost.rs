//! Blockfrost HTTP client
//!
//! Implements the chain indexer and script evaluator boundaries against the
//! Blockfrost API. Native targets use `reqwest`; WASM targets go through the
//! browser `fetch` API via `web-sys`.
//!
//! Credentials are supplied by the embedder. A production deployment should
//! source them from a trusted server-side proxy rather than shipping them to
//! the client.

// Native targets use reqwest
#[cfg(not(target_arch = "wasm32"))]
use reqwest::Client;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

// WASM targets use web-sys
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::JsFuture;
#[cfg(target_arch = "wasm32")]
use web_sys::{window, Request, RequestInit, RequestMode, Response};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::{
    data_structures::Utxo,
    errors::{WorkbenchError, WorkbenchResult},
    providers::{ChainIndexer, EvaluationResponse, ScriptEvaluator},
};

/// Preprod Blockfrost API base URL
pub const PREPROD_BASE_URL: &str = "https://cardano-preprod.blockfrost.io/api/v0";

/// Configuration for the Blockfrost client
#[derive(Debug, Clone)]
pub struct BlockfrostConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Project credential sent as the `project_id` header
    pub project_id: String,
    /// Request timeout (native targets only)
    pub request_timeout_secs: u64,
}

impl BlockfrostConfig {
    pub fn new(base_url: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            project_id: project_id.into(),
            request_timeout_secs: 30,
        }
    }

    /// Config pointed at the preprod network
    pub fn preprod(project_id: impl Into<String>) -> Self {
        Self::new(PREPROD_BASE_URL, project_id)
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }
}

/// HTTP client for the Blockfrost indexer and evaluator endpoints
pub struct BlockfrostClient {
    /// HTTP client for making requests (native targets)
    #[cfg(not(target_arch = "wasm32"))]
    client: Client,
    config: BlockfrostConfig,
}

impl BlockfrostClient {
    pub fn new(config: BlockfrostConfig) -> WorkbenchResult<Self> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let client = Client::builder()
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .build()
                .map_err(|e| {
                    WorkbenchError::ConnectionError(format!("Failed to create HTTP client: {e}"))
                })?;
            Ok(Self { client, config })
        }

        #[cfg(target_arch = "wasm32")]
        {
            Ok(Self { config })
        }
    }

    fn utxos_url(&self, address: &str) -> String {
        format!("{}/addresses/{}/utxos", self.config.base_url, address)
    }

    fn evaluate_url(&self) -> String {
        format!("{}/utils/txs/evaluate", self.config.base_url)
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl ChainIndexer for BlockfrostClient {
    async fn address_utxos(&self, address: &str) -> WorkbenchResult<Vec<Utxo>> {
        let url = self.utxos_url(address);
        debug!(%url, "fetching address UTxOs");

        let response = self
            .client
            .get(&url)
            .header("project_id", &self.config.project_id)
            .send()
            .await
            .map_err(|e| WorkbenchError::FetchError(format!("Failed to fetch UTxOs: {e}")))?;

        if !response.status().is_success() {
            return Err(WorkbenchError::FetchError(format!(
                "Failed to fetch UTxOs: HTTP {}",
                response.status().as_u16()
            )));
        }

        response
            .json::<Vec<Utxo>>()
            .await
            .map_err(|e| WorkbenchError::FetchError(format!("Invalid UTxO response: {e}")))
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl ScriptEvaluator for BlockfrostClient {
    async fn evaluate(&self, unsigned_tx: &str) -> WorkbenchResult<EvaluationResponse> {
        let url = self.evaluate_url();
        debug!(%url, "submitting transaction for evaluation");

        let response = self
            .client
            .post(&url)
            .header("project_id", &self.config.project_id)
            .header("Content-Type", "application/cbor")
            .body(unsigned_tx.to_string())
            .send()
            .await
            .map_err(|e| {
                WorkbenchError::SimulationError(format!("Evaluation request failed: {e}"))
            })?;

        let ok = response.status().is_success();
        let payload = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok(EvaluationResponse { ok, payload })
    }
}

#[cfg(target_arch = "wasm32")]
impl BlockfrostClient {
    async fn fetch_json(
        &self,
        url: &str,
        method: &str,
        body: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<(bool, Value), String> {
        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        if let Some(body) = body {
            opts.set_body(&body.into());
        }

        let request = Request::new_with_str_and_init(url, &opts)
            .map_err(|_| "Failed to construct request".to_string())?;
        request
            .headers()
            .set("project_id", &self.config.project_id)
            .map_err(|_| "Failed to set credential header".to_string())?;
        if let Some(content_type) = content_type {
            request
                .headers()
                .set("Content-Type", content_type)
                .map_err(|_| "Failed to set content type".to_string())?;
        }

        let window = window().ok_or_else(|| "No window object available".to_string())?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|_| format!("Request to {url} failed"))?;
        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| "Invalid response type".to_string())?;

        let ok = resp.ok();
        let json_promise = resp.json().map_err(|_| "Invalid response body".to_string())?;
        let json_value = JsFuture::from(json_promise)
            .await
            .unwrap_or(wasm_bindgen::JsValue::NULL);
        let payload: Value = serde_wasm_bindgen::from_value(json_value).unwrap_or(Value::Null);
        Ok((ok, payload))
    }
}

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl ChainIndexer for BlockfrostClient {
    async fn address_utxos(&self, address: &str) -> WorkbenchResult<Vec<Utxo>> {
        let url = self.utxos_url(address);
        let (ok, payload) = self
            .fetch_json(&url, "GET", None, None)
            .await
            .map_err(|e| WorkbenchError::FetchError(format!("Failed to fetch UTxOs: {e}")))?;

        if !ok {
            return Err(WorkbenchError::fetch_failed("Failed to fetch UTxOs."));
        }
        serde_json::from_value(payload)
            .map_err(|e| WorkbenchError::FetchError(format!("Invalid UTxO response: {e}")))
    }
}

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl ScriptEvaluator for BlockfrostClient {
    async fn evaluate(&self, unsigned_tx: &str) -> WorkbenchResult<EvaluationResponse> {
        let url = self.evaluate_url();
        let (ok, payload) = self
            .fetch_json(&url, "POST", Some(unsigned_tx), Some("application/cbor"))
            .await
            .map_err(|e| {
                WorkbenchError::SimulationError(format!("Evaluation request failed: {e}"))
            })?;
        Ok(EvaluationResponse { ok, payload })
    }
}
