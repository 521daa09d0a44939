//! Error types for tip recording and aggregation.

use crate::config::ConfigError;
use crate::directory::WorkerRole;
use crate::ledger::StorageError;
use crate::policy::ValidationError;
use crate::workflow::WorkflowState;

/// Errors surfaced by the tip core. All are recoverable by the caller.
#[derive(Debug, thiserror::Error)]
pub enum TipError {
    #[error("Invalid split: {0}")]
    Validation(#[from] ValidationError),

    #[error("Cannot {operation} a workflow that is {state}")]
    InvalidState {
        operation: &'static str,
        state: WorkflowState,
    },

    #[error("Cannot confirm with the working split: {0}")]
    InvalidSplit(ValidationError),

    #[error("Tip amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("Table number must be positive, got {0}")]
    InvalidTable(i64),

    #[error("Worker not found: {0}")]
    NotFound(String),

    #[error("No workers assigned to role {0}")]
    NoWorkersForRole(WorkerRole),

    #[error("Ledger totals exceed the representable amount")]
    TotalOverflow,

    #[error("Ledger storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, TipError>;
