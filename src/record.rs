//! Normalisation of loan records as the REST backend returns them.
//!
//! Backend loans arrive with inconsistent field names (`amount` or
//! `amount_cents`, `tenure` or `term_months`, ...) and with numbers encoded
//! either as JSON numbers or as strings. Everything is resolved here, once,
//! into a validated [`LoanTerms`]. A missing or unparsable field is an error;
//! nothing is defaulted silently except an absent `amount_paid` (zero) and an
//! absent installment `status` (pending).

use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use log::debug;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::{LoanTerms, PaymentRecord, PaymentStatus};

const PRINCIPAL_KEYS: &[&str] = &["principal", "amount", "loan_amount"];
const PRINCIPAL_MINOR_KEYS: &[&str] = &["amount_cents", "principal_cents"];
const RATE_KEYS: &[&str] = &["interest_rate", "annual_rate", "rate"];
const TERM_KEYS: &[&str] = &["term_months", "tenure", "duration_months", "term"];
const START_KEYS: &[&str] = &["start_date", "disbursed_at", "application_date", "created_at"];
const SCHEDULE_KEYS: &[&str] = &["payment_schedule", "repayment_schedule", "installments"];

const DUE_DATE_KEYS: &[&str] = &["due_date"];
const AMOUNT_DUE_KEYS: &[&str] = &["amount_due", "amount"];
const AMOUNT_PAID_KEYS: &[&str] = &["amount_paid", "paid_amount"];
const PAID_ON_KEYS: &[&str] = &["paid_on", "paid_at"];
const STATUS_KEYS: &[&str] = &["status"];

/// minor-unit scale of `*_cents` fields
const MINOR_UNIT_SCALE: u32 = 2;

/// loan record normalised from a backend response
#[derive(Debug, Clone, PartialEq)]
pub struct LoanRecord {
    pub id: Option<String>,
    pub principal: Money,
    pub annual_rate_percent: Decimal,
    pub term_months: u32,
    pub start_date: NaiveDate,
    pub payment_schedule: Vec<PaymentRecord>,
}

impl LoanRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| LoanError::malformed("loan", "expected a json object"))?;

        let id = lookup(obj, &["id", "_id", "loan_id"]).and_then(|(_, v)| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        let principal = match lookup(obj, PRINCIPAL_KEYS) {
            Some((key, v)) => Money::from_decimal(parse_decimal(key, v)?),
            None => match lookup(obj, PRINCIPAL_MINOR_KEYS) {
                Some((key, v)) => Money::from_minor(parse_integer(key, v)?, MINOR_UNIT_SCALE),
                None => return Err(missing(PRINCIPAL_KEYS)),
            },
        };

        let (key, v) = lookup(obj, RATE_KEYS).ok_or_else(|| missing(RATE_KEYS))?;
        let annual_rate_percent = parse_decimal(key, v)?;

        let (key, v) = lookup(obj, TERM_KEYS).ok_or_else(|| missing(TERM_KEYS))?;
        let term = parse_integer(key, v)?;
        let term_months = u32::try_from(term)
            .map_err(|_| LoanError::malformed(key, format!("{} is not a valid month count", term)))?;

        let (key, v) = lookup(obj, START_KEYS).ok_or_else(|| missing(START_KEYS))?;
        let start_date = parse_date(key, v)?;

        let payment_schedule = match lookup(obj, SCHEDULE_KEYS) {
            Some((key, Value::Array(items))) => items
                .iter()
                .enumerate()
                .map(|(i, item)| parse_payment(&format!("{}[{}]", key, i), item))
                .collect::<Result<Vec<_>>>()?,
            Some((key, _)) => return Err(LoanError::malformed(key, "expected an array")),
            None => Vec::new(),
        };

        debug!(
            "normalised loan record {:?}: principal {}, rate {}%, {} months, {} installments",
            id,
            principal,
            annual_rate_percent,
            term_months,
            payment_schedule.len()
        );

        Ok(Self {
            id,
            principal,
            annual_rate_percent,
            term_months,
            start_date,
            payment_schedule,
        })
    }

    /// canonical, validated engine input
    pub fn into_terms(self) -> Result<LoanTerms> {
        let terms = LoanTerms {
            principal: self.principal,
            annual_rate: Rate::from_percent(self.annual_rate_percent),
            term_months: self.term_months,
            start_date: self.start_date,
            existing_schedule: self.payment_schedule,
        };
        terms.validate()?;
        Ok(terms)
    }
}

/// parse and validate loan terms straight from a backend json body
pub fn terms_from_json(json: &str) -> Result<LoanTerms> {
    LoanRecord::from_json(json)?.into_terms()
}

fn parse_payment(path: &str, value: &Value) -> Result<PaymentRecord> {
    let obj = value
        .as_object()
        .ok_or_else(|| LoanError::malformed(path, "expected a json object"))?;
    let field = |key: &str| format!("{}.{}", path, key);

    let (key, v) = lookup(obj, DUE_DATE_KEYS).ok_or_else(|| LoanError::malformed(field("due_date"), "missing"))?;
    let due_date = parse_date(&field(key), v)?;

    let (key, v) =
        lookup(obj, AMOUNT_DUE_KEYS).ok_or_else(|| LoanError::malformed(field("amount_due"), "missing"))?;
    let amount_due = Money::from_decimal(parse_decimal(&field(key), v)?);

    let amount_paid = match lookup(obj, AMOUNT_PAID_KEYS) {
        Some((key, v)) => Money::from_decimal(parse_decimal(&field(key), v)?),
        None => Money::ZERO,
    };

    let paid_on = match lookup(obj, PAID_ON_KEYS) {
        Some((key, v)) => Some(parse_date(&field(key), v)?),
        None => None,
    };

    let status = match lookup(obj, STATUS_KEYS) {
        Some((key, v)) => parse_status(&field(key), v)?,
        None => PaymentStatus::Pending,
    };

    Ok(PaymentRecord {
        due_date,
        amount_due,
        amount_paid,
        paid_on,
        status,
    })
}

/// first present, non-null key among the aliases
fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
    keys.iter()
        .find_map(|key| obj.get(*key).filter(|v| !v.is_null()).map(|v| (*key, v)))
}

fn missing(keys: &[&str]) -> LoanError {
    LoanError::malformed(keys.join("|"), "missing")
}

fn parse_decimal(field: &str, value: &Value) -> Result<Decimal> {
    let parsed = match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string())),
        Value::String(s) => Decimal::from_str(s.trim()),
        _ => return Err(LoanError::malformed(field, "expected a number")),
    };
    parsed.map_err(|e| LoanError::malformed(field, format!("{} is not a decimal: {}", value, e)))
}

fn parse_integer(field: &str, value: &Value) -> Result<i64> {
    let d = parse_decimal(field, value)?;
    if !d.fract().is_zero() {
        return Err(LoanError::malformed(field, format!("{} is not a whole number", d)));
    }
    d.to_i64()
        .ok_or_else(|| LoanError::malformed(field, format!("{} is out of range", d)))
}

fn parse_date(field: &str, value: &Value) -> Result<NaiveDate> {
    let s = value
        .as_str()
        .ok_or_else(|| LoanError::malformed(field, "expected a date string"))?
        .trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.date_naive())
        .map_err(|_| LoanError::malformed(field, format!("'{}' is not an ISO date", s)))
}

fn parse_status(field: &str, value: &Value) -> Result<PaymentStatus> {
    let s = value
        .as_str()
        .ok_or_else(|| LoanError::malformed(field, "expected a status string"))?;
    match s.trim().to_ascii_lowercase().as_str() {
        "pending" | "unpaid" | "scheduled" => Ok(PaymentStatus::Pending),
        "paid" | "completed" => Ok(PaymentStatus::Paid),
        "overdue" | "late" => Ok(PaymentStatus::Overdue),
        other => Err(LoanError::malformed(field, format!("unknown payment status '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_canonical_record() {
        let terms = terms_from_json(
            r#"{
                "id": "loan-42",
                "amount": 12000,
                "interest_rate": 12,
                "term_months": 12,
                "start_date": "2024-01-01"
            }"#,
        )
        .unwrap();

        assert_eq!(terms.principal, Money::from_major(12_000));
        assert_eq!(terms.annual_rate, Rate::from_percentage(12));
        assert_eq!(terms.term_months, 12);
        assert_eq!(terms.start_date, date(2024, 1, 1));
        assert!(terms.existing_schedule.is_empty());
    }

    #[test]
    fn test_aliases_and_string_numbers() {
        let record = LoanRecord::from_value(&json!({
            "_id": "65f0",
            "amount_cents": 1250050,
            "rate": "9.75",
            "tenure": "24",
            "application_date": "2024-03-15T10:30:00Z"
        }))
        .unwrap();

        assert_eq!(record.id.as_deref(), Some("65f0"));
        assert_eq!(record.principal, Money::from_str_exact("12500.50").unwrap());
        assert_eq!(record.annual_rate_percent, dec!(9.75));
        assert_eq!(record.term_months, 24);
        assert_eq!(record.start_date, date(2024, 3, 15));
    }

    #[test]
    fn test_payment_schedule_entries() {
        let record = LoanRecord::from_value(&json!({
            "principal": "1000",
            "annual_rate": 0,
            "duration_months": 2,
            "start_date": "2024-01-01",
            "repayment_schedule": [
                { "due_date": "2024-01-01", "amount": 500, "paid_amount": 500,
                  "paid_at": "2024-01-02T08:00:00+05:30", "status": "Completed" },
                { "due_date": "2024-02-01", "amount_due": "500" }
            ]
        }))
        .unwrap();

        let schedule = &record.payment_schedule;
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[0].status, PaymentStatus::Paid);
        assert_eq!(schedule[0].paid_on, Some(date(2024, 1, 2)));
        assert_eq!(schedule[0].amount_paid, Money::from_major(500));
        assert_eq!(schedule[1].status, PaymentStatus::Pending);
        assert_eq!(schedule[1].amount_paid, Money::ZERO);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let err = LoanRecord::from_value(&json!({
            "interest_rate": 12,
            "term_months": 12,
            "start_date": "2024-01-01"
        }))
        .unwrap_err();
        assert!(matches!(err, LoanError::MalformedRecord { .. }));
        assert_eq!(err.field(), Some("principal|amount|loan_amount"));
    }

    #[test]
    fn test_null_is_treated_as_missing() {
        let record = LoanRecord::from_value(&json!({
            "amount": null,
            "loan_amount": 500,
            "interest_rate": 5,
            "term": 6,
            "created_at": "2024-05-01"
        }))
        .unwrap();
        assert_eq!(record.principal, Money::from_major(500));
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        let base = json!({
            "amount": 1000,
            "interest_rate": 12,
            "term_months": 12,
            "start_date": "2024-01-01"
        });

        let mut bad = base.clone();
        bad["term_months"] = json!(12.5);
        assert_eq!(LoanRecord::from_value(&bad).unwrap_err().field(), Some("term_months"));

        let mut bad = base.clone();
        bad["start_date"] = json!("01/02/2024");
        assert_eq!(LoanRecord::from_value(&bad).unwrap_err().field(), Some("start_date"));

        let mut bad = base.clone();
        bad["amount"] = json!("lots");
        assert_eq!(LoanRecord::from_value(&bad).unwrap_err().field(), Some("amount"));

        let mut bad = base;
        bad["installments"] = json!([{ "due_date": "2024-01-01", "amount": 10, "status": "skipped" }]);
        assert_eq!(
            LoanRecord::from_value(&bad).unwrap_err().field(),
            Some("installments[0].status")
        );
    }

    #[test]
    fn test_normalised_record_is_validated() {
        let err = terms_from_json(
            r#"{ "amount": 0, "interest_rate": 12, "term_months": 12, "start_date": "2024-01-01" }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoanError::InvalidLoanTerms { .. }));
        assert_eq!(err.field(), Some("principal"));
    }
}
