use chrono::{Months, NaiveDate};
use log::debug;
use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::{DerivedStatus, ScheduleEntry, SplitBasis};

/// level installment (EMI) for a fully amortizing loan
///
/// `P * r * (1 + r)^n / ((1 + r)^n - 1)` for a positive monthly rate,
/// `P / n` when the rate is zero. A rate and term whose compounding leaves
/// the decimal range are rejected as invalid terms.
pub fn level_installment(principal: Money, monthly_rate: Rate, months: u32) -> Result<Money> {
    if months == 0 {
        return Ok(principal);
    }

    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(months));
    }

    let r = monthly_rate.as_decimal();
    let out_of_range = || {
        LoanError::invalid_terms(
            "annual_rate",
            format!(
                "monthly rate {} compounded over {} months exceeds the supported range",
                monthly_rate, months
            ),
        )
    };

    let compound = monthly_rate.compound_factor(months).ok_or_else(out_of_range)?;
    let numerator = principal
        .as_decimal()
        .checked_mul(r)
        .and_then(|d| d.checked_mul(compound))
        .ok_or_else(out_of_range)?;
    let denominator = compound - Decimal::ONE;

    numerator
        .checked_div(denominator)
        .map(Money::from_decimal)
        .ok_or_else(out_of_range)
}

/// due date of a period, `start + (period - 1)` calendar months
///
/// Always computed from the start date so a month-end start (Jan 31) does
/// not drift after passing through a short month.
pub fn due_date_for_period(start_date: NaiveDate, period_index: u32) -> Result<NaiveDate> {
    start_date
        .checked_add_months(Months::new(period_index.saturating_sub(1)))
        .ok_or_else(|| {
            LoanError::invalid_terms(
                "start_date",
                format!("period {} falls outside the supported calendar", period_index),
            )
        })
}

/// equal installment schedule, statuses defaulted (period 1 due, rest upcoming)
pub(crate) fn equal_installments(
    principal: Money,
    annual_rate: Rate,
    term_months: u32,
    start_date: NaiveDate,
) -> Result<Vec<ScheduleEntry>> {
    let monthly_rate = annual_rate.monthly_rate();
    let installment = level_installment(principal, monthly_rate, term_months)?;

    debug!(
        "generating {} period schedule: principal {}, annual rate {}, installment {}",
        term_months, principal, annual_rate, installment
    );

    let mut entries = Vec::with_capacity(term_months as usize);
    let mut balance = principal;

    for period_index in 1..=term_months {
        let due_date = due_date_for_period(start_date, period_index)?;
        let interest_component = balance.checked_mul(monthly_rate.as_decimal()).ok_or_else(|| {
            LoanError::invalid_terms("annual_rate", "interest exceeds the supported range")
        })?;
        let mut principal_component = installment - interest_component;
        let mut installment_amount = installment;

        // last period closes the loan: the sub-unit residual left by
        // rounding at working precision goes into the final installment
        if period_index == term_months && principal_component != balance {
            debug!(
                "closing residual {} absorbed by period {}",
                balance - principal_component,
                period_index
            );
            principal_component = balance;
            installment_amount =
                principal_component.checked_add(interest_component).ok_or_else(|| {
                    LoanError::invalid_terms(
                        "principal",
                        "closing installment exceeds the supported range",
                    )
                })?;
        }

        balance = (balance - principal_component).max(Money::ZERO);

        entries.push(ScheduleEntry {
            period_index,
            due_date,
            installment_amount,
            principal_component,
            interest_component,
            remaining_balance: balance,
            derived_status: if period_index == 1 {
                DerivedStatus::Due
            } else {
                DerivedStatus::Upcoming
            },
            split_basis: SplitBasis::Computed,
            amount_paid: None,
            paid_on: None,
        });
    }

    Ok(entries)
}
