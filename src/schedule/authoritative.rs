use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;

use crate::config::{EngineConfig, SplitEstimation};
use crate::decimal::{Money, Rate};
use crate::schedule::status::derive_statuses;
use crate::types::{LoanTerms, ScheduleEntry, SplitBasis};

/// schedule built on the backend's own installment records
///
/// Dates and amounts come straight from the records. The engine only
/// derives the running balance, the status, and an estimated
/// principal/interest split.
pub(crate) fn from_records(terms: &LoanTerms, as_of: NaiveDate, config: &EngineConfig) -> Vec<ScheduleEntry> {
    let limit = terms.term_months as usize;
    if terms.existing_schedule.len() > limit {
        warn!(
            "loan record carries {} installments for a {} month term, using the first {}",
            terms.existing_schedule.len(),
            terms.term_months,
            limit
        );
    }
    let records = &terms.existing_schedule[..terms.existing_schedule.len().min(limit)];

    if let SplitEstimation::FixedRatio { principal_percent } = config.split_estimation {
        warn!(
            "estimating principal/interest with a fixed {}% principal share",
            principal_percent
        );
    }

    let statuses = derive_statuses(records, as_of, config.overdue_grace_days);
    let monthly_rate = terms.monthly_rate();
    let mut balance = terms.principal;

    records
        .iter()
        .zip(statuses)
        .enumerate()
        .map(|(i, (record, derived_status))| {
            let (principal_component, interest_component) =
                estimate_split(record.amount_due, balance, monthly_rate, config.split_estimation);
            balance = (balance - principal_component).max(Money::ZERO);

            ScheduleEntry {
                period_index: i as u32 + 1,
                due_date: record.due_date,
                installment_amount: record.amount_due,
                principal_component,
                interest_component,
                remaining_balance: balance,
                derived_status,
                split_basis: SplitBasis::Estimated,
                amount_paid: Some(record.amount_paid),
                paid_on: record.paid_on,
            }
        })
        .collect()
}

/// split an installment into (principal, interest); the parts always sum to
/// `amount_due` and principal never exceeds the outstanding balance
fn estimate_split(
    amount_due: Money,
    balance: Money,
    monthly_rate: Rate,
    method: SplitEstimation,
) -> (Money, Money) {
    let principal = match method {
        SplitEstimation::Amortized => {
            // interest beyond the decimal range still caps at the installment
            let interest = balance
                .checked_mul(monthly_rate.as_decimal())
                .map_or(amount_due, |interest| interest.min(amount_due));
            amount_due - interest
        }
        SplitEstimation::FixedRatio { principal_percent } => {
            amount_due * (principal_percent / Decimal::ONE_HUNDRED)
        }
    };
    let principal = principal.min(balance).max(Money::ZERO);
    (principal, amount_due - principal)
}
