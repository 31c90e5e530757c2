//! Derived schedule and payment fields for contracts.
//!
//! This is the single implementation used by contract listings, contract
//! detail, deadline alerts and reports. "Today" is passed in by the caller
//! and evaluated once per pass so every field of every contract in the pass
//! agrees on the same date.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::status::{ContractStatus, PaymentStatus};
use crate::types::{Amount, Date};

/// Contracts with at most this many days left are flagged as near deadline.
pub const NEAR_DEADLINE_DAYS: i64 = 30;

/// Milliseconds in a calendar day.
const MS_PER_DAY: i64 = 86_400_000;

/// The stored fields the calculation depends on.
#[derive(Debug, Clone)]
pub struct ContractTerms {
    pub status: Option<ContractStatus>,
    pub start_date: Option<Date>,
    pub duration_days: Option<i32>,
    pub initial_amount: Amount,
}

/// Fields computed from [`ContractTerms`] and linked settlements. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractMetrics {
    pub deadline_date: Option<Date>,
    pub consumed_days: i64,
    pub remaining_days: i64,
    pub is_overdue: bool,
    pub is_near_deadline: bool,
    pub total_paid: Amount,
    pub remaining_amount: Amount,
    pub payment_status: PaymentStatus,
    /// Share of the duration already elapsed, 0-100, one decimal.
    pub progress_percent: Decimal,
    /// Share of the initial amount already paid, one decimal. May exceed 100.
    pub payment_percent: Decimal,
}

/// Calendar days from `from` to `to`: ceiling of the millisecond difference
/// over one day. Negative when `to` precedes `from`.
pub fn calendar_days_between(from: Date, to: Date) -> i64 {
    let ms = (to - from).num_milliseconds();
    ms.div_euclid(MS_PER_DAY) + i64::from(ms.rem_euclid(MS_PER_DAY) != 0)
}

/// Start date plus duration, by plain calendar addition.
pub fn deadline_date(start: Date, duration_days: i32) -> Option<NaiveDate> {
    start.checked_add_signed(Duration::days(i64::from(duration_days)))
}

/// Classify payment progress. Overpayment still counts as paid.
pub fn payment_status(total_paid: Amount, initial_amount: Amount) -> PaymentStatus {
    if total_paid >= initial_amount {
        PaymentStatus::Paid
    } else if total_paid.is_zero() {
        PaymentStatus::Pending
    } else {
        PaymentStatus::Partial
    }
}

fn percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (part * Decimal::ONE_HUNDRED / whole).round_dp(1)
}

/// Compute every derived field of one contract.
///
/// `settlement_amounts` are the amounts of all settlements linked to the
/// contract.
pub fn evaluate_contract<I>(terms: &ContractTerms, settlement_amounts: I, today: Date) -> ContractMetrics
where
    I: IntoIterator<Item = Amount>,
{
    let duration = i64::from(terms.duration_days.unwrap_or(0).max(0));

    let consumed_days = terms
        .start_date
        .map(|start| calendar_days_between(start, today).max(0))
        .unwrap_or(0);
    let remaining_days = (duration - consumed_days).max(0);

    let deadline = match (terms.start_date, terms.duration_days) {
        (Some(start), Some(days)) => deadline_date(start, days),
        _ => None,
    };

    let is_active = terms.status == Some(ContractStatus::Active);
    let is_overdue = is_active && deadline.is_some_and(|d| today > d);
    let is_near_deadline =
        is_active && deadline.is_some() && remaining_days > 0 && remaining_days <= NEAR_DEADLINE_DAYS;

    let total_paid: Amount = settlement_amounts.into_iter().sum();
    let remaining_amount = terms.initial_amount - total_paid;

    let progress_percent = if duration > 0 {
        percent(Decimal::from(consumed_days), Decimal::from(duration)).min(Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    };

    ContractMetrics {
        deadline_date: deadline,
        consumed_days,
        remaining_days,
        is_overdue,
        is_near_deadline,
        total_paid,
        remaining_amount,
        payment_status: payment_status(total_paid, terms.initial_amount),
        progress_percent,
        payment_percent: percent(total_paid, terms.initial_amount),
    }
}
