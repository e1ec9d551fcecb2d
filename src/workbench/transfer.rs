//! Simple transfer flow: draft, build-preview, sign and submit
//!
//! The flow owns the draft, the preview produced from it, and the
//! in-session submission history. A preview only exists while the draft it
//! was built from is unchanged; any draft mutation invalidates it, so a
//! caller can never sign a stale encoding.

use tracing::debug;

use crate::{
    building::{
        extract_preview, validate_draft, BuildRequest, PaymentOutput, TransactionBuilder,
    },
    data_structures::{BuildPreview, SubmissionRecord, TransactionDraft},
    errors::{WorkbenchError, WorkbenchResult},
    selection::UtxoSelection,
    wallet::{SessionAdapter, WalletCapability, WalletSession},
    workbench::{message_of, now_unix_secs, sign_submit_refresh, BusyFlag, Generation},
};

/// Stateful build/sign/submit flow for simple payments
pub struct TransferFlow<B: TransactionBuilder> {
    builder: B,
    draft: TransactionDraft,
    preview: Option<BuildPreview>,
    history: Vec<SubmissionRecord>,
    build_busy: BusyFlag,
    submit_busy: BusyFlag,
    generation: Generation,
}

impl<B: TransactionBuilder> TransferFlow<B> {
    pub fn new(builder: B) -> Self {
        Self {
            builder,
            draft: TransactionDraft::default(),
            preview: None,
            history: Vec::new(),
            build_busy: BusyFlag::new(),
            submit_busy: BusyFlag::new(),
            generation: Generation::new(),
        }
    }

    pub fn draft(&self) -> &TransactionDraft {
        &self.draft
    }

    /// The current preview; absent until a build succeeds and after any
    /// draft mutation or successful submission
    pub fn preview(&self) -> Option<&BuildPreview> {
        self.preview.as_ref()
    }

    pub fn history(&self) -> &[SubmissionRecord] {
        &self.history
    }

    pub fn is_building(&self) -> bool {
        self.build_busy.is_busy()
    }

    pub fn is_submitting(&self) -> bool {
        self.submit_busy.is_busy()
    }

    pub fn set_recipient(&mut self, recipient: impl Into<String>) {
        self.draft.recipient = recipient.into();
        self.invalidate_preview();
    }

    pub fn set_amount(&mut self, amount_ada: impl Into<String>) {
        self.draft.amount_ada = amount_ada.into();
        self.invalidate_preview();
    }

    pub fn set_metadata(&mut self, metadata_json: impl Into<String>) {
        self.draft.metadata_json = metadata_json.into();
        self.invalidate_preview();
    }

    /// Reset draft, preview and history; invoked on disconnect
    pub fn reset(&mut self) {
        self.draft = TransactionDraft::default();
        self.history.clear();
        self.invalidate_preview();
    }

    fn invalidate_preview(&mut self) {
        self.preview = None;
        self.generation.bump();
    }

    /// Validate the draft and request a fee-accurate build
    ///
    /// No-op while a build is in flight or when no wallet is connected.
    /// A failed build leaves no preview visible. A result arriving after
    /// the draft changed is discarded.
    pub async fn build_preview(
        &mut self,
        session: &WalletSession,
        selection: &UtxoSelection,
    ) -> WorkbenchResult<()> {
        let _guard = match self.build_busy.try_acquire() {
            Some(guard) => guard,
            None => return Ok(()),
        };
        let own_address = match session.address.as_ref() {
            Some(address) if session.is_connected() => address.clone(),
            _ => return Ok(()),
        };

        self.preview = None;
        let validated = validate_draft(&self.draft)?;

        let inputs = if selection.is_empty() {
            None
        } else {
            Some(selection.resolve(session))
        };
        let request = BuildRequest {
            outputs: vec![PaymentOutput::lovelace(validated.recipient, validated.lovelace)],
            inputs,
            metadata: validated.metadata,
            redemption: None,
            change_address: own_address.clone(),
        };

        let observed = self.generation.current();
        let built = self.builder.build(request).await.map_err(|e| match e {
            WorkbenchError::BuildError(_) => e,
            other => WorkbenchError::BuildError(message_of(other)),
        })?;
        if built.unsigned_tx.is_empty() {
            return Err(WorkbenchError::build_failed("Failed to build transaction."));
        }
        if !self.generation.is_current(observed) {
            debug!("discarding stale build result");
            return Ok(());
        }

        self.preview = Some(extract_preview(&built, &own_address));
        Ok(())
    }

    /// Sign the previewed transaction and submit it to the network
    ///
    /// No-op without a built preview or while a submission is in flight.
    /// On any failure the preview is preserved so the user may retry
    /// signing without rebuilding; on success the draft and preview are
    /// cleared and the session refreshed. Strictly single-shot: a built
    /// transaction is never resubmitted implicitly.
    pub async fn sign_and_submit<W: WalletCapability>(
        &mut self,
        adapter: &mut SessionAdapter<W>,
    ) -> WorkbenchResult<Option<String>> {
        let unsigned_tx = match self.preview.as_ref() {
            Some(preview) => preview.unsigned_tx.clone(),
            None => return Ok(None),
        };
        let _guard = match self.submit_busy.try_acquire() {
            Some(guard) => guard,
            None => return Ok(None),
        };

        match sign_submit_refresh(adapter, &unsigned_tx).await {
            Ok(tx_id) => {
                self.history
                    .push(SubmissionRecord::success(tx_id.clone(), now_unix_secs()));
                self.draft = TransactionDraft::default();
                self.invalidate_preview();
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
