//! Stateful workbench flows
//!
//! Each flow is an explicit state holder with named transitions, so invalid
//! sequences (submit before build, simulate before select) are structurally
//! unreachable rather than guarded by ad hoc flags. Flows never mutate the
//! wallet session directly; they read snapshots and resynchronize through
//! the session adapter after every state-mutating chain operation.

pub mod contract;
pub mod guard;
pub mod lock;
pub mod transfer;

pub use contract::{datum_view_for, ContractFlow, ContractFlowState};
pub use guard::{BusyFlag, BusyGuard, Generation};
pub use lock::{LockDraft, LockFlow};
pub use transfer::TransferFlow;

use tracing::warn;

use crate::{
    errors::{WorkbenchError, WorkbenchResult},
    wallet::{SessionAdapter, WalletCapability},
};

/// Unix timestamp in seconds, for submission history entries
pub(crate) fn now_unix_secs() -> u64 {
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Date::now() / 1000.0) as u64
    }
}

/// Sign and submit an unsigned transaction, then resynchronize the session
///
/// Signing and submission failures map to `SignError` / `SubmitError` and
/// leave the caller's built state untouched. The refresh is sequenced
/// strictly after the submission response; a refresh failure does not undo
/// an accepted submission and only logs.
pub(crate) async fn sign_submit_refresh<W: WalletCapability>(
    adapter: &mut SessionAdapter<W>,
    unsigned_tx: &str,
) -> WorkbenchResult<String> {
    let tx_id = {
        let wallet = adapter
            .wallet()
            .ok_or_else(|| WorkbenchError::sign_failed("No active wallet session"))?;

        let signed_tx = wallet
            .sign_tx(unsigned_tx)
            .await
            .map_err(|e| WorkbenchError::SignError(message_of(e)))?;
        wallet
            .submit_tx(&signed_tx)
            .await
            .map_err(|e| WorkbenchError::SubmitError(message_of(e)))?
    };

    if let Err(e) = adapter.refresh().await {
        warn!(%e, "session refresh after submission failed");
    }
    Ok(tx_id)
}

/// Inner message of an error, avoiding double taxonomy prefixes
pub(crate) fn message_of(e: WorkbenchError) -> String {
    match e {
        WorkbenchError::ConnectionError(m)
        | WorkbenchError::RefreshError(m)
        | WorkbenchError::InvalidMetadata(m)
        | WorkbenchError::InvalidRedeemer(m)
        | WorkbenchError::BuildError(m)
        | WorkbenchError::SignError(m)
        | WorkbenchError::SubmitError(m)
        | WorkbenchError::FetchError(m)
        | WorkbenchError::SimulationError(m) => m,
    }
}
