//! Ledger storage.
//!
//! The ledger is the ordered, append-only history of confirmed tips.
//! Insertion order is confirmation order and ids are assigned by the store
//! inside its append critical section, so they are strictly increasing.
//!
//! Implementations:
//! - `InMemoryLedgerStore`: in-process, for a single session and tests
//! - `SqliteLedgerStore`: SQLite storage (feature `sqlite`)

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::config::StorageConfig;
use crate::tip::{ConfirmedTip, PendingEntry};

mod memory;
#[cfg(feature = "sqlite")]
pub mod schema;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::InMemoryLedgerStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteLedgerStore;

/// Storage type value for the in-memory ledger.
pub const STORAGE_MEMORY: &str = "memory";
/// Storage type value for the SQLite ledger.
pub const STORAGE_SQLITE: &str = "sqlite";

/// Ledger storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Unknown ledger storage type: {0}")]
    UnknownStorageType(String),

    #[error("Ledger storage type '{0}' requires the '{0}' feature")]
    FeatureDisabled(String),

    #[error("Failed to prepare storage path: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt ledger entry {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Interface for ledger persistence.
///
/// Entries are never updated or deleted.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Append a confirmed tip, assigning the next id.
    ///
    /// The correlation id links the entry back to the workflow that
    /// confirmed it.
    async fn append(&self, entry: PendingEntry, correlation_id: &str) -> Result<ConfirmedTip>;

    /// All entries, in ledger order.
    async fn entries(&self) -> Result<Vec<ConfirmedTip>>;

    /// Entries logged by one worker, in ledger order.
    async fn entries_for_worker(&self, worker_id: &str) -> Result<Vec<ConfirmedTip>>;

    /// Look up the entry appended by a given workflow, if any.
    async fn get_by_correlation(&self, correlation_id: &str) -> Result<Option<ConfirmedTip>>;

    /// Number of entries.
    async fn len(&self) -> Result<usize>;

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

/// Initialize the ledger based on configuration.
pub async fn init_ledger(config: &StorageConfig) -> Result<Arc<dyn LedgerStore>> {
    info!(
        storage_type = %config.storage_type,
        path = %config.path,
        "Initializing ledger"
    );

    match config.storage_type.as_str() {
        STORAGE_MEMORY => Ok(Arc::new(InMemoryLedgerStore::new())),
        #[cfg(feature = "sqlite")]
        STORAGE_SQLITE => {
            if let Some(parent) = std::path::Path::new(&config.path).parent() {
                std::fs::create_dir_all(parent)?;
            }

            let pool =
                sqlx::SqlitePool::connect(&format!("sqlite:{}?mode=rwc", config.path)).await?;

            let store = SqliteLedgerStore::new(pool);
            store.init().await?;

            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "sqlite"))]
        STORAGE_SQLITE => {
            error!("SQLite ledger requested but 'sqlite' feature is not enabled");
            Err(StorageError::FeatureDisabled(STORAGE_SQLITE.to_string()))
        }
        other => {
            error!("Unknown ledger storage type: {}", other);
            Err(StorageError::UnknownStorageType(other.to_string()))
        }
    }
}
