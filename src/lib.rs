//! Browser-resident workbench for Cardano transactions
//!
//! This crate turns user intent (recipient/amount, metadata, UTxO
//! selection, contract redeemer) into well-formed, fee-accurate, balanced
//! transactions, previews their effects before any irreversible action, and
//! coordinates the asynchronous collaborators involved: the wallet
//! capability session, a chain indexer, a transaction-building library and
//! a remote script evaluator.
//!
//! ## Features
//!
//! - `http`: Enables the Blockfrost HTTP client (reqwest on native targets,
//!   browser `fetch` on WASM)
//! - `wasm`: Enables WebAssembly compilation support without the native
//!   HTTP stack
//!
//! All workbench state is ephemeral: nothing is persisted across sessions,
//! and every view is rebuilt from the wallet and chain on connection.

pub mod building;
pub mod data_structures;
pub mod errors;
pub mod mocks;
pub mod providers;
pub mod selection;
pub mod wallet;
pub mod workbench;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use building::*;
pub use data_structures::{
    Asset, BuildPreview, DatumView, SimulationOutcome, SubmissionRecord, TransactionDraft, Utxo,
    UtxoId, LOVELACE_PER_ADA, LOVELACE_UNIT,
};
pub use errors::*;
pub use providers::*;
pub use selection::*;
pub use wallet::*;
pub use workbench::{
    datum_view_for, BusyFlag, BusyGuard, ContractFlow, ContractFlowState, Generation, LockDraft,
    LockFlow, TransferFlow,
};
