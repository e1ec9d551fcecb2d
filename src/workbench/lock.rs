//! Lock-funds flow: pay a script address with an inline datum
//!
//! Builds a transaction that locks an amount at a script address with a
//! user-supplied datum attached inline, then signs and submits it through
//! the wallet capability. Inputs are always auto-selected from the full
//! wallet UTxO set.

use serde_json::Value;

use crate::{
    building::{BuildRequest, PaymentOutput, TransactionBuilder},
    data_structures::{Asset, SubmissionRecord, TransactionDraft},
    errors::{WorkbenchError, WorkbenchResult},
    wallet::{SessionAdapter, WalletCapability},
    workbench::{message_of, now_unix_secs, sign_submit_refresh, BusyFlag},
};

use crate::building::validate_draft;

/// User intent for locking funds at a script address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockDraft {
    pub script_address: String,
    pub amount_ada: String,
    /// Datum as JSON text under the detailed schema
    pub datum_json: String,
}

/// One-shot build/sign/submit flow for contract deployment
pub struct LockFlow<B: TransactionBuilder> {
    builder: B,
    history: Vec<SubmissionRecord>,
    busy: BusyFlag,
}

impl<B: TransactionBuilder> LockFlow<B> {
    pub fn new(builder: B) -> Self {
        Self {
            builder,
            history: Vec::new(),
            busy: BusyFlag::new(),
        }
    }

    pub fn history(&self) -> &[SubmissionRecord] {
        &self.history
    }

    pub fn is_locking(&self) -> bool {
        self.busy.is_busy()
    }

    /// Reset history; invoked on disconnect
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Build, sign and submit a lock transaction in one step
    ///
    /// Validates locally (address non-empty, amount positive, datum valid
    /// JSON) before any collaborator call. Returns the transaction id on
    /// success and refreshes the session. No-op while a lock is in flight
    /// or when no wallet is connected.
    pub async fn lock_and_submit<W: WalletCapability>(
        &mut self,
        draft: &LockDraft,
        adapter: &mut SessionAdapter<W>,
    ) -> WorkbenchResult<Option<String>> {
        let _guard = match self.busy.try_acquire() {
            Some(guard) => guard,
            None => return Ok(None),
        };
        let own_address = match adapter.session().address.clone() {
            Some(address) if adapter.session().is_connected() => address,
            _ => return Ok(None),
        };

        // Reuse the payment validation for address and amount rules
        let validated = validate_draft(&TransactionDraft::new(
            draft.script_address.clone(),
            draft.amount_ada.clone(),
        ))?;
        let datum: Value = serde_json::from_str(draft.datum_json.trim())
            .map_err(|_| WorkbenchError::build_failed("Datum is not valid JSON."))?;

        let request = BuildRequest {
            outputs: vec![PaymentOutput {
                address: validated.recipient,
                amount: vec![Asset::lovelace(validated.lovelace)],
                inline_datum: Some(datum),
            }],
            inputs: None,
            metadata: None,
            redemption: None,
            change_address: own_address,
        };
        let built = self.builder.build(request).await.map_err(|e| match e {
            WorkbenchError::BuildError(_) => e,
            other => WorkbenchError::BuildError(message_of(other)),
        })?;

        match sign_submit_refresh(adapter, &built.unsigned_tx).await {
            Ok(tx_id) => {
                self.history
                    .push(SubmissionRecord::success(tx_id.clone(), now_unix_secs()));
                Ok(Some(tx_id))
            }
            Err(e) => {
                self.history
                    .push(SubmissionRecord::failure(e.to_string(), now_unix_secs()));
                Err(e)
            }
        }
    }
}
