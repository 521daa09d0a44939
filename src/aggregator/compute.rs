//! Pure view computations over a ledger snapshot.
//!
//! Everything here is a function of the entries (and the directory where
//! shares are involved). No state is kept between calls. Sums are checked and
//! fail with [`TipError::TotalOverflow`] rather than wrap.

use crate::apportion::{apportion, RoleAmounts};
use crate::directory::{WorkerDirectory, WorkerRole};
use crate::error::{Result, TipError};
use crate::policy::DistributionSplit;
use crate::tip::{ConfirmedTip, PaymentType};

use super::PaymentTotals;

fn checked_sum<'a>(entries: impl Iterator<Item = &'a ConfirmedTip>) -> Result<u64> {
    entries
        .map(ConfirmedTip::amount)
        .try_fold(0u64, u64::checked_add)
        .ok_or(TipError::TotalOverflow)
}

/// Sum of each entry's apportionment under its own applied split.
pub fn totals_by_role(entries: &[ConfirmedTip]) -> Result<RoleAmounts> {
    entries
        .iter()
        .map(|tip| apportion(tip.amount(), tip.applied_split()))
        .try_fold(RoleAmounts::default(), RoleAmounts::checked_add)
        .ok_or(TipError::TotalOverflow)
}

pub fn grand_total(entries: &[ConfirmedTip]) -> Result<u64> {
    checked_sum(entries.iter())
}

/// Sum of the amounts a worker logged.
pub fn generated_by(entries: &[ConfirmedTip], worker_id: &str) -> Result<u64> {
    checked_sum(entries.iter().filter(|tip| tip.worker_id() == worker_id))
}

pub fn totals_by_payment_type(entries: &[ConfirmedTip]) -> Result<PaymentTotals> {
    let of_type = |payment_type: PaymentType| {
        checked_sum(
            entries
                .iter()
                .filter(move |tip| tip.payment_type() == payment_type),
        )
    };
    Ok(PaymentTotals {
        digital: of_type(PaymentType::Digital)?,
        cash: of_type(PaymentType::Cash)?,
    })
}

/// Even share of `role_total` across `workers`. `None` when nobody holds the role.
///
/// Integer division; the undivided remainder stays with the role total.
pub fn even_share(role_total: u64, workers: usize) -> Option<u64> {
    if workers == 0 {
        return None;
    }
    Some(role_total / workers as u64)
}

/// Per-role share of a single worker, 0 for roles nobody holds.
pub fn shares_by_role(totals: &RoleAmounts, directory: &WorkerDirectory) -> RoleAmounts {
    let share = |role: WorkerRole| {
        even_share(totals.get(role), directory.count_by_role(role)).unwrap_or(0)
    };
    RoleAmounts {
        service: share(WorkerRole::Service),
        kitchen: share(WorkerRole::Kitchen),
        bar: share(WorkerRole::Bar),
    }
}

/// `round(numerator / denominator)` with halves rounded up. `denominator > 0`.
fn round_half_up(numerator: u128, denominator: u128) -> u128 {
    (2 * numerator + denominator) / (2 * denominator)
}

fn weighted_percent(entries: &[ConfirmedTip], role: WorkerRole, weight: u128) -> u8 {
    let numerator: u128 = entries
        .iter()
        .map(|tip| u128::from(tip.applied_split().percent_for(role)) * u128::from(tip.amount()))
        .sum();
    // A weighted average of values <= 100 rounds to at most 100
    round_half_up(numerator, weight).min(100) as u8
}

/// Amount-weighted average of every entry's applied split.
///
/// Service and kitchen are rounded half up; bar is `100 - service - kitchen`
/// so the result always sums to exactly 100. If both service and kitchen
/// round up past 100 combined, kitchen gives way. An empty ledger yields
/// `fallback`.
pub fn blended_distribution(
    entries: &[ConfirmedTip],
    fallback: DistributionSplit,
) -> DistributionSplit {
    let weight: u128 = entries.iter().map(|tip| u128::from(tip.amount())).sum();
    if weight == 0 {
        return fallback;
    }

    let service = weighted_percent(entries, WorkerRole::Service, weight);
    let kitchen = weighted_percent(entries, WorkerRole::Kitchen, weight).min(100 - service);
    DistributionSplit::from_parts(service, kitchen, 100 - service - kitchen)
}

/// Percentage of `goal` reached, truncated and capped at 100. A zero goal
/// counts as reached.
pub fn goal_percent(achieved: u64, goal: u64) -> u8 {
    if goal == 0 {
        return 100;
    }
    let percent = u128::from(achieved) * 100 / u128::from(goal);
    percent.min(100) as u8
}
