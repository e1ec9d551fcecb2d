//! Error types for the transaction workbench
//!
//! Every external collaborator failure is caught at the call site and mapped
//! onto this taxonomy before it reaches a caller. Validation failures are
//! produced locally and never trigger a collaborator call.

use thiserror::Error;

/// Result type alias for workbench operations
pub type WorkbenchResult<T> = Result<T, WorkbenchError>;

/// Top-level error taxonomy for the workbench
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkbenchError {
    /// Establishing a wallet capability session failed
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Re-reading wallet state failed; last-known-good state is retained
    #[error("Refresh error: {0}")]
    RefreshError(String),

    /// Metadata text is not valid JSON or carries an unusable label
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Redeemer text is not valid JSON
    #[error("Invalid redeemer: {0}")]
    InvalidRedeemer(String),

    /// The transaction-building collaborator rejected or failed the build
    #[error("Build error: {0}")]
    BuildError(String),

    /// The wallet rejected or failed the signing request
    #[error("Sign error: {0}")]
    SignError(String),

    /// The network rejected the signed transaction
    #[error("Submit error: {0}")]
    SubmitError(String),

    /// Fetching script-locked outputs from the chain indexer failed
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// The remote script evaluation request itself failed
    #[error("Simulation error: {0}")]
    SimulationError(String),
}

impl WorkbenchError {
    pub fn connection_failed(msg: &str) -> Self {
        WorkbenchError::ConnectionError(msg.to_string())
    }

    pub fn refresh_failed(msg: &str) -> Self {
        WorkbenchError::RefreshError(msg.to_string())
    }

    pub fn invalid_metadata(msg: &str) -> Self {
        WorkbenchError::InvalidMetadata(msg.to_string())
    }

    pub fn invalid_redeemer(msg: &str) -> Self {
        WorkbenchError::InvalidRedeemer(msg.to_string())
    }

    pub fn build_failed(msg: &str) -> Self {
        WorkbenchError::BuildError(msg.to_string())
    }

    pub fn sign_failed(msg: &str) -> Self {
        WorkbenchError::SignError(msg.to_string())
    }

    pub fn submit_failed(msg: &str) -> Self {
        WorkbenchError::SubmitError(msg.to_string())
    }

    pub fn fetch_failed(msg: &str) -> Self {
        WorkbenchError::FetchError(msg.to_string())
    }

    pub fn simulation_failed(msg: &str) -> Self {
        WorkbenchError::SimulationError(msg.to_string())
    }

    /// True for the JSON-text validation errors (metadata, redeemer)
    ///
    /// Recipient and amount failures are also detected locally but surface
    /// as `BuildError`, carrying the same variant the build library uses.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WorkbenchError::InvalidMetadata(_) | WorkbenchError::InvalidRedeemer(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_flagged() {
        assert!(WorkbenchError::invalid_metadata("bad json").is_validation());
        assert!(WorkbenchError::invalid_redeemer("bad json").is_validation());
        assert!(!WorkbenchError::build_failed("insufficient funds").is_validation());
    }

    #[test]
    fn error_messages_surface_reason() {
        let err = WorkbenchError::build_failed("insufficient funds or invalid inputs");
        assert_eq!(
            err.to_string(),
            "Build error: insufficient funds or invalid inputs"
        );
    }
}
