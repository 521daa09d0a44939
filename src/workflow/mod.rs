//! Confirmation workflow.
//!
//! One workflow per draft tip:
//!
//! ```text
//! begin(draft) ──► PendingReview ──confirm()──► Confirmed
//!                        │
//!                        └──────cancel()──────► Cancelled
//! ```
//!
//! `begin` snapshots the policy's default split; later changes to the default
//! are invisible to a workflow already in review. `select_default` /
//! `select_custom` switch the working split while in review. `confirm` is the
//! only operation in the crate that appends to the ledger, and it binds the
//! working split to the entry for good.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::directory::WorkerDirectory;
use crate::error::{Result, TipError};
use crate::ledger::LedgerStore;
use crate::policy::{DistributionPolicy, DistributionSplit, SplitCandidate, ValidationError};
use crate::tip::{ConfirmedTip, DraftTip, PendingEntry};

/// Workflow lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    PendingReview,
    Confirmed,
    Cancelled,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::PendingReview => "pending_review",
            WorkflowState::Confirmed => "confirmed",
            WorkflowState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkflowState::PendingReview)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The split currently selected for review.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkingSplit {
    /// The default snapshotted at `begin`.
    Default(DistributionSplit),
    /// A per-tip override and its validation outcome.
    Custom {
        candidate: SplitCandidate,
        outcome: std::result::Result<DistributionSplit, ValidationError>,
    },
}

impl WorkingSplit {
    /// The split that would be applied, or why there is none.
    pub fn resolve(&self) -> std::result::Result<DistributionSplit, ValidationError> {
        match self {
            WorkingSplit::Default(split) => Ok(*split),
            WorkingSplit::Custom { outcome, .. } => outcome.clone(),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, WorkingSplit::Custom { .. })
    }
}

/// Review-and-confirm state machine for a single draft tip.
pub struct ConfirmationWorkflow {
    correlation_id: String,
    draft: DraftTip,
    worker_id: String,
    snapshot_default: DistributionSplit,
    working: WorkingSplit,
    state: WorkflowState,
    confirmed: Option<ConfirmedTip>,
    ledger: Arc<dyn LedgerStore>,
}

impl ConfirmationWorkflow {
    /// Start reviewing `draft` on behalf of `worker_id`, with the policy's
    /// current default as the working split.
    ///
    /// Fails with `NotFound` if the worker is not in `directory`.
    pub fn begin(
        draft: DraftTip,
        worker_id: &str,
        directory: &WorkerDirectory,
        policy: &DistributionPolicy,
        ledger: Arc<dyn LedgerStore>,
    ) -> Result<Self> {
        let worker_id = directory.get(worker_id)?.id.clone();
        let snapshot_default = policy.current_default();
        let correlation_id = Uuid::new_v4().to_string();

        debug!(
            correlation_id = %correlation_id,
            worker_id = %worker_id,
            amount = draft.amount(),
            table = draft.table(),
            "Tip review started"
        );

        Ok(Self {
            correlation_id,
            draft,
            worker_id,
            snapshot_default,
            working: WorkingSplit::Default(snapshot_default),
            state: WorkflowState::PendingReview,
            confirmed: None,
            ledger,
        })
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn draft(&self) -> &DraftTip {
        &self.draft
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    /// Identifier linking log lines and the ledger entry to this workflow.
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn working(&self) -> &WorkingSplit {
        &self.working
    }

    /// The ledger entry, once confirmed.
    pub fn confirmed(&self) -> Option<&ConfirmedTip> {
        self.confirmed.as_ref()
    }

    fn require_pending(&self, operation: &'static str) -> Result<()> {
        if self.state != WorkflowState::PendingReview {
            return Err(TipError::InvalidState {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    /// Go back to the default captured at `begin`.
    pub fn select_default(&mut self) -> Result<DistributionSplit> {
        self.require_pending("select the default split for")?;
        self.working = WorkingSplit::Default(self.snapshot_default);
        debug!(correlation_id = %self.correlation_id, "Default split selected");
        Ok(self.snapshot_default)
    }

    /// Select a per-tip override.
    ///
    /// An invalid candidate becomes the working selection anyway, so the
    /// workflow stays in review and refuses to confirm until corrected. The
    /// specific validation error is returned.
    pub fn select_custom(&mut self, candidate: SplitCandidate) -> Result<DistributionSplit> {
        self.require_pending("select a custom split for")?;

        let outcome = DistributionPolicy::validate_custom(&candidate);
        self.working = WorkingSplit::Custom {
            candidate,
            outcome: outcome.clone(),
        };

        match outcome {
            Ok(split) => {
                debug!(
                    correlation_id = %self.correlation_id,
                    service = split.service(),
                    kitchen = split.kitchen(),
                    bar = split.bar(),
                    "Custom split selected"
                );
                Ok(split)
            }
            Err(e) => {
                warn!(
                    correlation_id = %self.correlation_id,
                    error = %e,
                    "Custom split rejected"
                );
                Err(TipError::Validation(e))
            }
        }
    }

    /// Confirm the draft with the working split and append it to the ledger.
    ///
    /// If the working split is invalid or the append fails, the workflow
    /// stays in review.
    pub async fn confirm(&mut self) -> Result<ConfirmedTip> {
        self.require_pending("confirm")?;

        let split = self.working.resolve().map_err(TipError::InvalidSplit)?;
        let entry = PendingEntry::new(self.draft, self.worker_id.clone(), Utc::now(), split);

        let tip = self.ledger.append(entry, &self.correlation_id).await?;

        self.state = WorkflowState::Confirmed;
        self.confirmed = Some(tip.clone());

        info!(
            correlation_id = %self.correlation_id,
            tip_id = tip.id(),
            worker_id = %tip.worker_id(),
            amount = tip.amount(),
            custom_split = self.working.is_custom(),
            "Tip confirmed"
        );

        Ok(tip)
    }

    /// Abandon the draft. Nothing reaches the ledger.
    pub fn cancel(&mut self) -> Result<()> {
        self.require_pending("cancel")?;
        self.state = WorkflowState::Cancelled;
        info!(correlation_id = %self.correlation_id, "Tip review cancelled");
        Ok(())
    }
}

impl fmt::Debug for ConfirmationWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmationWorkflow")
            .field("correlation_id", &self.correlation_id)
            .field("draft", &self.draft)
            .field("worker_id", &self.worker_id)
            .field("working", &self.working)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
