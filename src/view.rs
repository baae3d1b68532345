//! Serializable views for presentation layers.
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::types::{DerivedStatus, ProgressSummary, ScheduleEntry, SplitBasis};

/// schedule as a table, amounts rounded to the currency scale
#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleView {
    pub rows: Vec<ScheduleRow>,
    pub total_periods: usize,
    pub truncated: bool,
    /// true when any row's principal/interest split is an estimate
    pub split_estimated: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub period: u32,
    pub due_date: NaiveDate,
    pub installment: Money,
    pub principal: Money,
    pub interest: Money,
    pub balance: Money,
    pub status: DerivedStatus,
    pub amount_paid: Option<Money>,
    pub paid_on: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressView {
    pub percent_paid: Decimal,
    pub payments_completed: u32,
    pub payments_remaining: u32,
    pub total_paid: Money,
    pub current_balance: Money,
    pub next_payment_due_date: Option<NaiveDate>,
    pub next_payment_amount: Option<Money>,
    pub overdue_payments: u32,
    pub overdue_amount: Money,
    pub total_interest: Money,
    pub maturity_date: Option<NaiveDate>,
}

impl ScheduleView {
    /// rows limited to `display_periods` when configured
    pub fn new(schedule: &[ScheduleEntry], config: &EngineConfig) -> Self {
        let scale = config.currency_scale;
        let shown = config
            .display_periods
            .map_or(schedule.len(), |n| n.min(schedule.len()));

        let rows = schedule[..shown]
            .iter()
            .map(|e| ScheduleRow {
                period: e.period_index,
                due_date: e.due_date,
                installment: e.installment_amount.to_currency(scale),
                principal: e.principal_component.to_currency(scale),
                interest: e.interest_component.to_currency(scale),
                balance: e.remaining_balance.to_currency(scale),
                status: e.derived_status,
                amount_paid: e.amount_paid.map(|m| m.to_currency(scale)),
                paid_on: e.paid_on,
            })
            .collect();

        Self {
            rows,
            total_periods: schedule.len(),
            truncated: shown < schedule.len(),
            split_estimated: schedule.iter().any(|e| e.split_basis == SplitBasis::Estimated),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl ProgressView {
    pub fn new(summary: &ProgressSummary, config: &EngineConfig) -> Self {
        let scale = config.currency_scale;
        Self {
            percent_paid: summary
                .percent_paid
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            payments_completed: summary.payments_completed,
            payments_remaining: summary.payments_remaining,
            total_paid: summary.total_paid.to_currency(scale),
            current_balance: summary.current_balance.to_currency(scale),
            next_payment_due_date: summary.next_payment_due_date,
            next_payment_amount: summary.next_payment_amount.map(|m| m.to_currency(scale)),
            overdue_payments: summary.overdue_payments,
            overdue_amount: summary.overdue_amount.to_currency(scale),
            total_interest: summary.total_interest.to_currency(scale),
            maturity_date: summary.maturity_date,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
