//! Core data structures shared across the workbench

pub mod contract;
pub mod draft;
pub mod utxo;

pub use contract::{DatumView, SimulationOutcome, SubmissionRecord};
pub use draft::{BuildPreview, TransactionDraft};
pub use utxo::{Asset, Utxo, UtxoId, LOVELACE_PER_ADA, LOVELACE_UNIT};
