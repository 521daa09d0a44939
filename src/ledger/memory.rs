//! In-memory ledger.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{LedgerStore, Result};
use crate::tip::{ConfirmedTip, PendingEntry};

/// Stored entry with correlation tracking.
struct StoredTip {
    tip: ConfirmedTip,
    correlation_id: String,
}

/// Ledger held in process memory. Appends are serialized by the write lock.
#[derive(Default)]
pub struct InMemoryLedgerStore {
    entries: RwLock<Vec<StoredTip>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn append(&self, entry: PendingEntry, correlation_id: &str) -> Result<ConfirmedTip> {
        let mut entries = self.entries.write().await;
        // Ids start at 1 and follow insertion order
        let id = entries.len() as u64 + 1;
        let tip = entry.into_confirmed(id);
        debug!(tip_id = id, correlation_id, "Appended tip to in-memory ledger");
        entries.push(StoredTip {
            tip: tip.clone(),
            correlation_id: correlation_id.to_string(),
        });
        Ok(tip)
    }

    async fn entries(&self) -> Result<Vec<ConfirmedTip>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().map(|stored| stored.tip.clone()).collect())
    }

    async fn entries_for_worker(&self, worker_id: &str) -> Result<Vec<ConfirmedTip>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|stored| stored.tip.worker_id() == worker_id)
            .map(|stored| stored.tip.clone())
            .collect())
    }

    async fn get_by_correlation(&self, correlation_id: &str) -> Result<Option<ConfirmedTip>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .find(|stored| stored.correlation_id == correlation_id)
            .map(|stored| stored.tip.clone()))
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.read().await.len())
    }
}
