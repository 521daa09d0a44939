//! Aggregated views over the ledger.
//!
//! The [`Aggregator`] keeps no state of its own. Every view reads the current
//! ledger, then derives its numbers from those entries plus the worker
//! directory via the pure functions in [`compute`]. Composite views (the
//! public summary, a worker's dashboard) are computed from a single ledger
//! read so their numbers agree with each other.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::apportion::RoleAmounts;
use crate::directory::{Worker, WorkerDirectory, WorkerRole};
use crate::error::{Result, TipError};
use crate::ledger::LedgerStore;
use crate::policy::{DistributionPolicy, DistributionSplit};
use crate::tip::ConfirmedTip;

pub mod compute;

/// Tip totals by payment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PaymentTotals {
    pub digital: u64,
    pub cash: u64,
}

/// Progress toward the daily goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub goal: u64,
    pub achieved: u64,
    /// Truncated, capped at 100.
    pub percent: u8,
}

/// What the customer-facing display shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicSummary {
    pub grand_total: u64,
    pub tip_count: usize,
    pub distribution: DistributionSplit,
    pub role_totals: RoleAmounts,
}

/// One roster line: a worker and their share.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamShare {
    pub worker: Worker,
    pub share: u64,
}

/// Everything a worker sees about their own day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerDashboard {
    pub worker: Worker,
    pub share: u64,
    /// Blended percentage for the worker's role.
    pub role_percent: u8,
    /// Sum of the tips this worker logged at their tables.
    pub generated: u64,
    pub team_total: u64,
    pub tip_count: usize,
    pub entries: Vec<ConfirmedTip>,
}

/// Read-only views over the ledger.
#[derive(Clone)]
pub struct Aggregator {
    ledger: Arc<dyn LedgerStore>,
    directory: Arc<WorkerDirectory>,
    policy: Arc<DistributionPolicy>,
}

impl Aggregator {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        directory: Arc<WorkerDirectory>,
        policy: Arc<DistributionPolicy>,
    ) -> Self {
        Self {
            ledger,
            directory,
            policy,
        }
    }

    async fn snapshot(&self) -> Result<Vec<ConfirmedTip>> {
        let entries = self.ledger.entries().await?;
        debug!(entries = entries.len(), "Ledger snapshot taken");
        Ok(entries)
    }

    /// Per-role totals across the whole ledger.
    pub async fn totals_by_role(&self) -> Result<RoleAmounts> {
        compute::totals_by_role(&self.snapshot().await?)
    }

    pub async fn grand_total(&self) -> Result<u64> {
        compute::grand_total(&self.snapshot().await?)
    }

    pub async fn tip_count(&self) -> Result<usize> {
        Ok(self.ledger.len().await?)
    }

    /// Share of one worker in `role`. Fails if nobody holds the role.
    pub async fn share_for_role(&self, role: WorkerRole) -> Result<u64> {
        let totals = self.totals_by_role().await?;
        compute::even_share(totals.get(role), self.directory.count_by_role(role))
            .ok_or(TipError::NoWorkersForRole(role))
    }

    /// Per-worker share for every role, 0 where a role has no workers.
    pub async fn shares_by_role(&self) -> Result<RoleAmounts> {
        let totals = self.totals_by_role().await?;
        Ok(compute::shares_by_role(&totals, &self.directory))
    }

    /// Share of a specific worker.
    pub async fn share_for_worker(&self, worker_id: &str) -> Result<u64> {
        let role = self.directory.get(worker_id)?.role;
        self.share_for_role(role).await
    }

    /// Amount-weighted split across the ledger; the policy default when empty.
    pub async fn blended_distribution(&self) -> Result<DistributionSplit> {
        let entries = self.snapshot().await?;
        Ok(compute::blended_distribution(
            &entries,
            self.policy.current_default(),
        ))
    }

    /// Entries logged by a worker, in ledger order.
    pub async fn entries_for_worker(&self, worker_id: &str) -> Result<Vec<ConfirmedTip>> {
        self.directory.get(worker_id)?;
        Ok(self.ledger.entries_for_worker(worker_id).await?)
    }

    /// Sum of the tips a worker logged.
    pub async fn generated_by_worker(&self, worker_id: &str) -> Result<u64> {
        let entries = self.entries_for_worker(worker_id).await?;
        compute::grand_total(&entries)
    }

    pub async fn totals_by_payment_type(&self) -> Result<PaymentTotals> {
        compute::totals_by_payment_type(&self.snapshot().await?)
    }

    pub async fn goal_progress(&self, goal: u64) -> Result<GoalProgress> {
        let achieved = self.grand_total().await?;
        Ok(GoalProgress {
            goal,
            achieved,
            percent: compute::goal_percent(achieved, goal),
        })
    }

    pub async fn public_summary(&self) -> Result<PublicSummary> {
        let entries = self.snapshot().await?;
        Ok(PublicSummary {
            grand_total: compute::grand_total(&entries)?,
            tip_count: entries.len(),
            distribution: compute::blended_distribution(&entries, self.policy.current_default()),
            role_totals: compute::totals_by_role(&entries)?,
        })
    }

    /// Every worker in directory order with their share.
    pub async fn team_shares(&self) -> Result<Vec<TeamShare>> {
        let shares = self.shares_by_role().await?;
        Ok(self
            .directory
            .iter()
            .map(|worker| TeamShare {
                worker: worker.clone(),
                share: shares.get(worker.role),
            })
            .collect())
    }

    pub async fn worker_dashboard(&self, worker_id: &str) -> Result<WorkerDashboard> {
        let worker = self.directory.get(worker_id)?.clone();
        let entries = self.snapshot().await?;

        let totals = compute::totals_by_role(&entries)?;
        let share = compute::shares_by_role(&totals, &self.directory).get(worker.role);
        let distribution =
            compute::blended_distribution(&entries, self.policy.current_default());
        let own: Vec<ConfirmedTip> = entries
            .iter()
            .filter(|tip| tip.worker_id() == worker_id)
            .cloned()
            .collect();

        Ok(WorkerDashboard {
            role_percent: distribution.percent_for(worker.role),
            share,
            generated: compute::generated_by(&entries, worker_id)?,
            team_total: compute::grand_total(&entries)?,
            tip_count: entries.len(),
            entries: own,
            worker,
        })
    }
}
