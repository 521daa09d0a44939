//! Apportionment of a single tip across roles.
//!
//! Integer arithmetic only. Service and kitchen are truncated; bar takes
//! whatever is left so the three amounts always add back up to the tip.

use serde::{Deserialize, Serialize};

use crate::directory::WorkerRole;
use crate::policy::DistributionSplit;

/// Monetary amounts per role, in the smallest currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleAmounts {
    pub service: u64,
    pub kitchen: u64,
    pub bar: u64,
}

impl RoleAmounts {
    pub fn get(&self, role: WorkerRole) -> u64 {
        match role {
            WorkerRole::Service => self.service,
            WorkerRole::Kitchen => self.kitchen,
            WorkerRole::Bar => self.bar,
        }
    }

    /// Sum of the three roles, `None` on overflow.
    pub fn total(&self) -> Option<u64> {
        self.service.checked_add(self.kitchen)?.checked_add(self.bar)
    }

    /// Role-wise sum, `None` if any role overflows.
    pub fn checked_add(self, rhs: RoleAmounts) -> Option<RoleAmounts> {
        Some(RoleAmounts {
            service: self.service.checked_add(rhs.service)?,
            kitchen: self.kitchen.checked_add(rhs.kitchen)?,
            bar: self.bar.checked_add(rhs.bar)?,
        })
    }
}

/// `amount * percent / 100`, truncated. Never exceeds `amount`.
fn percent_of(amount: u64, percent: u8) -> u64 {
    let share = u128::from(amount) * u128::from(percent) / 100;
    // percent <= 100 so share <= amount
    share as u64
}

/// Split `amount` across roles according to `split`.
///
/// The remainder left by truncating service and kitchen goes to bar, so
/// `apportion(a, s).total() == Some(a)` for every amount and split.
pub fn apportion(amount: u64, split: DistributionSplit) -> RoleAmounts {
    let service = percent_of(amount, split.service());
    let kitchen = percent_of(amount, split.kitchen());
    RoleAmounts {
        service,
        kitchen,
        bar: amount - service - kitchen,
    }
}
