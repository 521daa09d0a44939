//! Distribution policy.
//!
//! A [`DistributionSplit`] is a validated `{service, kitchen, bar}` percentage
//! triple summing to exactly 100. Unvalidated input arrives as a
//! [`SplitCandidate`] and only becomes a split through [`SplitCandidate::validate`].
//!
//! [`DistributionPolicy`] holds the process-wide default split. Updating it
//! goes through the same validation as a per-tip override, and never touches
//! splits already bound to confirmed tips.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::directory::WorkerRole;

/// Percentages of a split always add up to this.
pub const PERCENT_TOTAL: i64 = 100;

/// Why a candidate split was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{role} percentage {value} is outside 0..=100")]
    OutOfRange { role: WorkerRole, value: i64 },

    #[error("split percentages sum to {total}, expected 100")]
    NotNormalized { total: i64 },
}

/// Raw, unvalidated split percentages as entered by a user or read from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitCandidate {
    pub service: i64,
    pub kitchen: i64,
    pub bar: i64,
}

impl SplitCandidate {
    pub fn new(service: i64, kitchen: i64, bar: i64) -> Self {
        Self {
            service,
            kitchen,
            bar,
        }
    }

    /// Validate all-or-nothing: range of every component first, then the sum.
    pub fn validate(&self) -> Result<DistributionSplit, ValidationError> {
        for role in WorkerRole::ALL {
            let value = self.get(role);
            if !(0..=PERCENT_TOTAL).contains(&value) {
                return Err(ValidationError::OutOfRange { role, value });
            }
        }

        let total = self.service + self.kitchen + self.bar;
        if total != PERCENT_TOTAL {
            return Err(ValidationError::NotNormalized { total });
        }

        // Each component is within 0..=100 here
        Ok(DistributionSplit::from_parts(
            self.service as u8,
            self.kitchen as u8,
            self.bar as u8,
        ))
    }

    pub fn get(&self, role: WorkerRole) -> i64 {
        match role {
            WorkerRole::Service => self.service,
            WorkerRole::Kitchen => self.kitchen,
            WorkerRole::Bar => self.bar,
        }
    }
}

impl Default for SplitCandidate {
    fn default() -> Self {
        DistributionSplit::default().into()
    }
}

impl From<DistributionSplit> for SplitCandidate {
    fn from(split: DistributionSplit) -> Self {
        Self::new(
            split.service.into(),
            split.kitchen.into(),
            split.bar.into(),
        )
    }
}

/// Validated role percentages. `service + kitchen + bar == 100` by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SplitCandidate", into = "SplitCandidate")]
pub struct DistributionSplit {
    service: u8,
    kitchen: u8,
    bar: u8,
}

impl DistributionSplit {
    /// Validate and build a split.
    pub fn new(service: i64, kitchen: i64, bar: i64) -> Result<Self, ValidationError> {
        SplitCandidate::new(service, kitchen, bar).validate()
    }

    /// Caller guarantees the parts sum to 100.
    pub(crate) fn from_parts(service: u8, kitchen: u8, bar: u8) -> Self {
        debug_assert_eq!(
            i64::from(service) + i64::from(kitchen) + i64::from(bar),
            PERCENT_TOTAL
        );
        Self {
            service,
            kitchen,
            bar,
        }
    }

    pub fn service(&self) -> u8 {
        self.service
    }

    pub fn kitchen(&self) -> u8 {
        self.kitchen
    }

    pub fn bar(&self) -> u8 {
        self.bar
    }

    /// Percentage assigned to `role`.
    pub fn percent_for(&self, role: WorkerRole) -> u8 {
        match role {
            WorkerRole::Service => self.service,
            WorkerRole::Kitchen => self.kitchen,
            WorkerRole::Bar => self.bar,
        }
    }
}

/// The split the MVP shipped with: 60% service, 30% kitchen, 10% bar.
impl Default for DistributionSplit {
    fn default() -> Self {
        Self::from_parts(60, 30, 10)
    }
}

impl fmt::Display for DistributionSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.service, self.kitchen, self.bar)
    }
}

impl TryFrom<SplitCandidate> for DistributionSplit {
    type Error = ValidationError;

    fn try_from(candidate: SplitCandidate) -> Result<Self, Self::Error> {
        candidate.validate()
    }
}

/// Process-wide default split.
#[derive(Debug, Default)]
pub struct DistributionPolicy {
    default: RwLock<DistributionSplit>,
}

impl DistributionPolicy {
    pub fn new(default: DistributionSplit) -> Self {
        Self {
            default: RwLock::new(default),
        }
    }

    /// The default split currently in effect.
    pub fn current_default(&self) -> DistributionSplit {
        // A poisoned lock still holds a valid Copy value
        *self.default.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate a per-tip override.
    pub fn validate_custom(candidate: &SplitCandidate) -> Result<DistributionSplit, ValidationError> {
        candidate.validate()
    }

    /// Replace the default split, returning the previous one.
    ///
    /// Rejected candidates leave the current default untouched.
    pub fn update_default(
        &self,
        candidate: &SplitCandidate,
    ) -> Result<DistributionSplit, ValidationError> {
        let split = Self::validate_custom(candidate)?;
        let mut guard = self.default.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *guard, split);
        info!(
            service = split.service(),
            kitchen = split.kitchen(),
            bar = split.bar(),
            "Default distribution updated"
        );
        Ok(previous)
    }
}
