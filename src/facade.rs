//! TipScan facade for in-process usage.
//!
//! Wires the worker directory, distribution policy, ledger and aggregator
//! together so callers only deal with one handle.
//!
//! # Example
//!
//! ```ignore
//! use tipscan::{Config, PaymentType, TipScan};
//!
//! let tipscan = TipScan::from_config(&Config::load(None)?).await?;
//!
//! let draft = tipscan.create_draft(8000, PaymentType::Digital, 5, "mesero1")?;
//! let mut review = tipscan.begin(draft, "mesero1")?;
//! review.confirm().await?;
//!
//! let summary = tipscan.aggregator().public_summary().await?;
//! ```

use std::sync::Arc;

use tracing::info;

use crate::aggregator::Aggregator;
use crate::config::Config;
use crate::directory::WorkerDirectory;
use crate::error::Result;
use crate::ledger::{init_ledger, InMemoryLedgerStore, LedgerStore};
use crate::policy::DistributionPolicy;
use crate::tip::{DraftTip, PaymentType};
use crate::workflow::ConfirmationWorkflow;

/// Handle over one team's tip day.
#[derive(Clone)]
pub struct TipScan {
    directory: Arc<WorkerDirectory>,
    policy: Arc<DistributionPolicy>,
    ledger: Arc<dyn LedgerStore>,
}

impl TipScan {
    pub fn new(
        directory: WorkerDirectory,
        policy: DistributionPolicy,
        ledger: Arc<dyn LedgerStore>,
    ) -> Self {
        Self {
            directory: Arc::new(directory),
            policy: Arc::new(policy),
            ledger,
        }
    }

    /// Build from configuration, opening the configured ledger.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let directory = config.directory()?;
        let policy = config.policy()?;
        let ledger = init_ledger(&config.storage).await?;

        info!(
            workers = directory.len(),
            storage = %config.storage.storage_type,
            default_split = %policy.current_default(),
            "TipScan initialized"
        );

        Ok(Self::new(directory, policy, ledger))
    }

    /// Default configuration over an empty in-memory ledger.
    pub fn in_memory() -> Result<Self> {
        let config = Config::default();
        Ok(Self::new(
            config.directory()?,
            config.policy()?,
            Arc::new(InMemoryLedgerStore::new()),
        ))
    }

    /// Validate a scanned tip for `worker_id`. Nothing is stored.
    pub fn create_draft(
        &self,
        amount: i64,
        payment_type: PaymentType,
        table: i64,
        worker_id: &str,
    ) -> Result<DraftTip> {
        self.directory.get(worker_id)?;
        DraftTip::new(amount, payment_type, table)
    }

    /// Open a review of `draft` on behalf of `worker_id`.
    pub fn begin(&self, draft: DraftTip, worker_id: &str) -> Result<ConfirmationWorkflow> {
        ConfirmationWorkflow::begin(
            draft,
            worker_id,
            &self.directory,
            &self.policy,
            self.ledger.clone(),
        )
    }

    pub fn aggregator(&self) -> Aggregator {
        Aggregator::new(
            self.ledger.clone(),
            self.directory.clone(),
            self.policy.clone(),
        )
    }

    pub fn policy(&self) -> &DistributionPolicy {
        &self.policy
    }

    pub fn directory(&self) -> &WorkerDirectory {
        &self.directory
    }

    pub fn ledger(&self) -> Arc<dyn LedgerStore> {
        self.ledger.clone()
    }
}
