//! Tip records: drafts awaiting confirmation and confirmed ledger entries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TipError};
use crate::policy::DistributionSplit;

/// How the customer paid the tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Digital,
    Cash,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Digital => "digital",
            PaymentType::Cash => "cash",
        }
    }

    /// Parse the stored representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "digital" => Some(PaymentType::Digital),
            "cash" => Some(PaymentType::Cash),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tip entered but not yet confirmed. Never stored in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DraftTip {
    amount: u64,
    payment_type: PaymentType,
    table: u32,
}

impl DraftTip {
    /// Build a draft, rejecting non-positive amounts and table numbers.
    pub fn new(amount: i64, payment_type: PaymentType, table: i64) -> Result<Self> {
        if amount <= 0 {
            return Err(TipError::InvalidAmount(amount));
        }
        let table_number = u32::try_from(table)
            .ok()
            .filter(|t| *t > 0)
            .ok_or(TipError::InvalidTable(table))?;

        Ok(Self {
            amount: amount as u64,
            payment_type,
            table: table_number,
        })
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn payment_type(&self) -> PaymentType {
        self.payment_type
    }

    pub fn table(&self) -> u32 {
        self.table
    }
}

/// A confirmed tip waiting for the ledger to assign its id.
///
/// Only the confirmation workflow can build one, so nothing else can put
/// entries into a ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEntry {
    draft: DraftTip,
    worker_id: String,
    recorded_at: DateTime<Utc>,
    applied_split: DistributionSplit,
}

impl PendingEntry {
    pub(crate) fn new(
        draft: DraftTip,
        worker_id: impl Into<String>,
        recorded_at: DateTime<Utc>,
        applied_split: DistributionSplit,
    ) -> Self {
        Self {
            draft,
            worker_id: worker_id.into(),
            recorded_at,
            applied_split,
        }
    }

    pub fn draft(&self) -> &DraftTip {
        &self.draft
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn applied_split(&self) -> DistributionSplit {
        self.applied_split
    }

    /// Seal the entry with the id assigned by the ledger.
    pub fn into_confirmed(self, id: u64) -> ConfirmedTip {
        ConfirmedTip {
            id,
            worker_id: self.worker_id,
            amount: self.draft.amount,
            payment_type: self.draft.payment_type,
            table: self.draft.table,
            recorded_at: self.recorded_at,
            applied_split: self.applied_split,
        }
    }
}

/// An immutable ledger entry, permanently bound to the split applied when it
/// was confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedTip {
    id: u64,
    worker_id: String,
    amount: u64,
    payment_type: PaymentType,
    table: u32,
    recorded_at: DateTime<Utc>,
    applied_split: DistributionSplit,
}

impl ConfirmedTip {
    /// Rebuild an entry read back from persistent storage.
    #[cfg_attr(not(feature = "sqlite"), allow(dead_code))]
    pub(crate) fn restore(
        id: u64,
        worker_id: String,
        amount: u64,
        payment_type: PaymentType,
        table: u32,
        recorded_at: DateTime<Utc>,
        applied_split: DistributionSplit,
    ) -> Self {
        Self {
            id,
            worker_id,
            amount,
            payment_type,
            table,
            recorded_at,
            applied_split,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The worker who logged the tip.
    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn payment_type(&self) -> PaymentType {
        self.payment_type
    }

    pub fn table(&self) -> u32 {
        self.table
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn applied_split(&self) -> DistributionSplit {
        self.applied_split
    }
}
