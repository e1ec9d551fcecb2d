//! Contract interaction flow: fetch, select, simulate
//!
//! A state machine over a script target. Fetching lists the outputs locked
//! at a script address, selecting one decodes its datum, and simulating
//! builds a candidate redemption transaction and sends it to the remote
//! evaluator. Signing is gated on a successful simulation; the terminal
//! build-and-submit step is deliberately left unwired.

use tracing::debug;

use crate::{
    building::{BuildRequest, DatumSource, ScriptRedemption, TransactionBuilder},
    data_structures::{DatumView, SimulationOutcome, Utxo, UtxoId},
    errors::{WorkbenchError, WorkbenchResult},
    providers::{classify_evaluation, ChainIndexer, DatumDecoder, ScriptEvaluator},
    wallet::WalletSession,
    workbench::{message_of, BusyFlag, Generation},
};

/// Plutus script version used for redemption candidates
const SCRIPT_VERSION: &str = "V2";

/// Named states of the contract interaction flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractFlowState {
    /// No script target yet
    Idle,
    /// Locked UTxOs fetched, none selected
    Listed,
    /// A locked UTxO is selected, datum decoded
    Selected,
    /// A simulation outcome exists for the selected UTxO
    Simulated,
    /// The last fetch failed; the UTxO list is empty
    Error,
}

/// Stateful fetch/select/simulate flow over a script address
pub struct ContractFlow<B, I, E, D>
where
    B: TransactionBuilder,
    I: ChainIndexer,
    E: ScriptEvaluator,
    D: DatumDecoder,
{
    builder: B,
    indexer: I,
    evaluator: E,
    decoder: D,
    state: ContractFlowState,
    script_address: String,
    utxos: Vec<Utxo>,
    selected: Option<Utxo>,
    datum_view: Option<DatumView>,
    outcome: Option<SimulationOutcome>,
    fetch_busy: BusyFlag,
    simulate_busy: BusyFlag,
    generation: Generation,
}

impl<B, I, E, D> ContractFlow<B, I, E, D>
where
    B: TransactionBuilder,
    I: ChainIndexer,
    E: ScriptEvaluator,
    D: DatumDecoder,
{
    pub fn new(builder: B, indexer: I, evaluator: E, decoder: D) -> Self {
        Self {
            builder,
            indexer,
            evaluator,
            decoder,
            state: ContractFlowState::Idle,
            script_address: String::new(),
            utxos: Vec::new(),
            selected: None,
            datum_view: None,
            outcome: None,
            fetch_busy: BusyFlag::new(),
            simulate_busy: BusyFlag::new(),
            generation: Generation::new(),
        }
    }

    pub fn state(&self) -> ContractFlowState {
        self.state
    }

    pub fn script_address(&self) -> &str {
        &self.script_address
    }

    /// Locked UTxOs from the last successful fetch
    pub fn utxos(&self) -> &[Utxo] {
        &self.utxos
    }

    pub fn selected(&self) -> Option<&Utxo> {
        self.selected.as_ref()
    }

    /// Datum view of the selected UTxO
    pub fn datum_view(&self) -> Option<&DatumView> {
        self.datum_view.as_ref()
    }

    /// Outcome of the most recent simulation attempt
    pub fn outcome(&self) -> Option<&SimulationOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_fetching(&self) -> bool {
        self.fetch_busy.is_busy()
    }

    pub fn is_simulating(&self) -> bool {
        self.simulate_busy.is_busy()
    }

    /// Whether the terminal build-and-submit action may be offered
    ///
    /// Placeholder gate: wiring it to the sign/submit pipeline is left to
    /// the embedder.
    pub fn may_submit(&self) -> bool {
        matches!(self.outcome, Some(SimulationOutcome::Success { .. }))
    }

    /// Fetch the outputs locked at a script address
    ///
    /// Resets any prior selection and outcome. A non-2xx or transport
    /// failure yields `FetchError` and leaves the UTxO list empty, never
    /// partial. No-op while a fetch is in flight.
    pub async fn fetch_locked_utxos(&mut self, script_address: &str) -> WorkbenchResult<()> {
        let _guard = match self.fetch_busy.try_acquire() {
            Some(guard) => guard,
            None => return Ok(()),
        };
        if script_address.trim().is_empty() {
            return Err(WorkbenchError::fetch_failed("Script address is required"));
        }

        self.script_address = script_address.trim().to_string();
        self.utxos.clear();
        self.selected = None;
        self.datum_view = None;
        self.outcome = None;
        self.generation.bump();
        let observed = self.generation.current();

        match self.indexer.address_utxos(&self.script_address).await {
            Ok(utxos) => {
                if !self.generation.is_current(observed) {
                    debug!("discarding stale UTxO fetch result");
                    return Ok(());
                }
                self.utxos = utxos;
                self.state = ContractFlowState::Listed;
                Ok(())
            }
            Err(e) => {
                self.state = ContractFlowState::Error;
                match e {
                    WorkbenchError::FetchError(_) => Err(e),
                    other => Err(WorkbenchError::FetchError(message_of(other))),
                }
            }
        }
    }

    /// Select a locked UTxO and decode its datum
    ///
    /// Discards any prior simulation outcome; outcomes are never carried
    /// across targets. Ignores identities not present in the fetched set.
    pub fn select_utxo(&mut self, id: &UtxoId) {
        let utxo = match self.utxos.iter().find(|u| &u.id() == id) {
            Some(utxo) => utxo.clone(),
            None => {
                debug!(?id, "ignoring selection outside the fetched set");
                return;
            }
        };

        self.datum_view = Some(datum_view_for(&self.decoder, &utxo));
        self.selected = Some(utxo);
        self.outcome = None;
        self.state = ContractFlowState::Selected;
        self.generation.bump();
    }

    /// Build a candidate redemption transaction and evaluate it remotely
    ///
    /// The redeemer must parse as JSON before any network call. The datum
    /// reference (inline vs by-hash) is chosen from what the selected UTxO
    /// carries. No-op without a selection, without a connected session, or
    /// while a simulation is in flight.
    pub async fn simulate(
        &mut self,
        redeemer_json: &str,
        script_code: &str,
        session: &WalletSession,
    ) -> WorkbenchResult<()> {
        let selected = match self.selected.clone() {
            Some(selected) => selected,
            None => return Ok(()),
        };
        let change_address = match session.address.as_ref() {
            Some(address) if session.is_connected() => address.clone(),
            _ => return Ok(()),
        };
        let _guard = match self.simulate_busy.try_acquire() {
            Some(guard) => guard,
            None => return Ok(()),
        };

        let redeemer: serde_json::Value = serde_json::from_str(redeemer_json)
            .map_err(|e| WorkbenchError::InvalidRedeemer(format!("Redeemer is not valid JSON: {e}")))?;

        let datum_source = if selected.inline_datum.is_some() {
            DatumSource::Inline
        } else {
            DatumSource::Hash(selected.data_hash.clone().unwrap_or_default())
        };
        let request = BuildRequest {
            outputs: Vec::new(),
            inputs: None,
            metadata: None,
            redemption: Some(ScriptRedemption {
                utxo: selected,
                script_version: SCRIPT_VERSION.to_string(),
                script_code: script_code.to_string(),
                datum_source,
                redeemer,
            }),
            change_address,
        };

        let observed = self.generation.current();
        let built = match self.builder.build(request).await {
            Ok(built) => built,
            Err(e) => return self.fail_simulation(observed, message_of(e)),
        };
        let response = match self.evaluator.evaluate(&built.unsigned_tx).await {
            Ok(response) => response,
            Err(e) => return self.fail_simulation(observed, message_of(e)),
        };

        if !self.generation.is_current(observed) {
            debug!("discarding stale simulation response");
            return Ok(());
        }
        self.outcome = Some(classify_evaluation(&response));
        self.state = ContractFlowState::Simulated;
        Ok(())
    }

    fn fail_simulation(&mut self, observed: u64, reason: String) -> WorkbenchResult<()> {
        if self.generation.is_current(observed) {
            self.outcome = Some(SimulationOutcome::Failure {
                reason: reason.clone(),
            });
            self.state = ContractFlowState::Simulated;
        }
        Err(WorkbenchError::SimulationError(reason))
    }
}

/// Datum view of an arbitrary UTxO
///
/// A missing inline datum and a datum that fails to decode are distinct,
/// visibly different conditions.
pub fn datum_view_for<D: DatumDecoder>(decoder: &D, utxo: &Utxo) -> DatumView {
    match utxo.inline_datum.as_deref() {
        None => DatumView::Missing,
        Some(datum_hex) => {
            if hex::decode(datum_hex).is_err() {
                return DatumView::DecodeFailed;
            }
            match decoder.decode(datum_hex) {
                Ok(value) => DatumView::Decoded(value),
                Err(_) => DatumView::DecodeFailed,
            }
        }
    }
}
