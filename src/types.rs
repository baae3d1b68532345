use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};

/// loan terms the engine computes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    pub start_date: NaiveDate,
    /// authoritative schedule from the loan record, empty when not supplied
    #[serde(default)]
    pub existing_schedule: Vec<PaymentRecord>,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate: Rate, term_months: u32, start_date: NaiveDate) -> Self {
        Self {
            principal,
            annual_rate,
            term_months,
            start_date,
            existing_schedule: Vec::new(),
        }
    }

    /// build from an annual rate given in percent (12.5 means 12.5%)
    pub fn from_percent(
        principal: Money,
        annual_rate_percent: Decimal,
        term_months: u32,
        start_date: NaiveDate,
    ) -> Self {
        Self::new(principal, Rate::from_percent(annual_rate_percent), term_months, start_date)
    }

    pub fn with_existing_schedule(mut self, records: Vec<PaymentRecord>) -> Self {
        self.existing_schedule = records;
        self
    }

    pub fn has_existing_schedule(&self) -> bool {
        !self.existing_schedule.is_empty()
    }

    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate.monthly_rate()
    }

    /// reject terms the engine cannot compute from; nothing is clamped
    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(LoanError::invalid_terms(
                "principal",
                format!("must be greater than zero, got {}", self.principal),
            ));
        }
        if self.term_months == 0 {
            return Err(LoanError::invalid_terms("term_months", "must be greater than zero"));
        }
        if self.annual_rate.is_negative() {
            return Err(LoanError::invalid_terms(
                "annual_rate",
                format!("must not be negative, got {}", self.annual_rate),
            ));
        }
        for (i, record) in self.existing_schedule.iter().enumerate() {
            if record.amount_due.is_negative() {
                return Err(LoanError::invalid_terms(
                    format!("existing_schedule[{}].amount_due", i),
                    format!("must not be negative, got {}", record.amount_due),
                ));
            }
            if record.amount_paid.is_negative() {
                return Err(LoanError::invalid_terms(
                    format!("existing_schedule[{}].amount_paid", i),
                    format!("must not be negative, got {}", record.amount_paid),
                ));
            }
        }
        Ok(())
    }
}

/// payment status as recorded by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
}

/// authoritative installment record supplied with a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub due_date: NaiveDate,
    pub amount_due: Money,
    #[serde(default)]
    pub amount_paid: Money,
    #[serde(default)]
    pub paid_on: Option<NaiveDate>,
    pub status: PaymentStatus,
}

impl PaymentRecord {
    pub fn pending(due_date: NaiveDate, amount_due: Money) -> Self {
        Self {
            due_date,
            amount_due,
            amount_paid: Money::ZERO,
            paid_on: None,
            status: PaymentStatus::Pending,
        }
    }

    pub fn paid(due_date: NaiveDate, amount_due: Money, paid_on: NaiveDate) -> Self {
        Self {
            due_date,
            amount_due,
            amount_paid: amount_due,
            paid_on: Some(paid_on),
            status: PaymentStatus::Paid,
        }
    }

    /// marked paid, or paid in full
    pub fn is_settled(&self) -> bool {
        self.status == PaymentStatus::Paid || self.amount_paid >= self.amount_due
    }

    /// amount still owed on this installment
    pub fn outstanding(&self) -> Money {
        (self.amount_due - self.amount_paid).max(Money::ZERO)
    }
}

/// status shown for a schedule entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DerivedStatus {
    Paid,
    Due,
    Overdue,
    Upcoming,
}

impl DerivedStatus {
    /// due or overdue
    pub fn is_payable(&self) -> bool {
        matches!(self, DerivedStatus::Due | DerivedStatus::Overdue)
    }
}

/// where a principal/interest split came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitBasis {
    /// computed by the amortization formula
    Computed,
    /// apportioned from an authoritative amount due; not an accounting split
    Estimated,
}

/// one period of a payment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub period_index: u32,
    pub due_date: NaiveDate,
    pub installment_amount: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    pub remaining_balance: Money,
    pub derived_status: DerivedStatus,
    pub split_basis: SplitBasis,
    pub amount_paid: Option<Money>,
    pub paid_on: Option<NaiveDate>,
}

impl ScheduleEntry {
    /// amount still owed on this entry
    pub fn outstanding(&self) -> Money {
        match self.derived_status {
            DerivedStatus::Paid => Money::ZERO,
            _ => (self.installment_amount - self.amount_paid.unwrap_or(Money::ZERO)).max(Money::ZERO),
        }
    }
}

/// repayment progress derived from a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
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

impl ProgressSummary {
    pub fn is_fully_paid(&self) -> bool {
        self.next_payment_due_date.is_none() && self.payments_remaining == 0
    }

    pub fn is_delinquent(&self) -> bool {
        self.overdue_payments > 0
    }
}
