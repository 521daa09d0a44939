//! TipScan - transparent tip apportionment for restaurant teams.
//!
//! A scanned tip becomes a [`DraftTip`], is reviewed inside a
//! [`ConfirmationWorkflow`] where the team picks the default or a custom
//! role split, and on confirmation lands in the append-only ledger with that
//! split bound to it. The [`Aggregator`] derives every total, share and
//! blended distribution from the ledger on demand.

pub mod aggregator;
pub mod apportion;
pub mod config;
pub mod directory;
pub mod error;
pub mod facade;
pub mod ledger;
pub mod policy;
pub mod tip;
pub mod utils;
pub mod workflow;

pub use aggregator::{Aggregator, GoalProgress, PaymentTotals, PublicSummary, TeamShare, WorkerDashboard};
pub use apportion::{apportion, RoleAmounts};
pub use config::Config;
pub use directory::{Worker, WorkerDirectory, WorkerRole};
pub use error::{Result, TipError};
pub use facade::TipScan;
pub use ledger::{InMemoryLedgerStore, LedgerStore};
pub use policy::{DistributionPolicy, DistributionSplit, SplitCandidate, ValidationError};
pub use tip::{ConfirmedTip, DraftTip, PaymentType};
pub use workflow::{ConfirmationWorkflow, WorkflowState, WorkingSplit};
