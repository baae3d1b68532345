use rust_decimal::Decimal;

use crate::decimal::Money;
use crate::types::{DerivedStatus, LoanTerms, ProgressSummary, ScheduleEntry};

/// summarize repayment progress
///
/// The outstanding balance is the principal less the principal share of
/// every paid entry. `total_paid` prefers the backend's recorded payments
/// over the term and falls back to principal repaid when the loan has no
/// records.
pub fn summarize(terms: &LoanTerms, schedule: &[ScheduleEntry]) -> ProgressSummary {
    let paid: Vec<&ScheduleEntry> = schedule
        .iter()
        .filter(|e| e.derived_status == DerivedStatus::Paid)
        .collect();

    let principal_repaid: Money = paid.iter().map(|e| e.principal_component).sum();
    let current_balance = (terms.principal - principal_repaid).max(Money::ZERO);

    let percent_paid = (terms.principal - current_balance)
        .percent_of(terms.principal)
        .unwrap_or(Decimal::ONE_HUNDRED);

    let payments_completed = paid.len() as u32;
    let payments_remaining = terms.term_months.saturating_sub(payments_completed);

    let total_paid = if terms.has_existing_schedule() {
        // records past the term are not part of the schedule
        terms
            .existing_schedule
            .iter()
            .take(terms.term_months as usize)
            .map(|r| r.amount_paid)
            .sum::<Money>()
    } else {
        terms.principal - current_balance
    };

    let next_payable = schedule.iter().find(|e| e.derived_status.is_payable());

    let overdue: Vec<&ScheduleEntry> = schedule
        .iter()
        .filter(|e| e.derived_status == DerivedStatus::Overdue)
        .collect();

    ProgressSummary {
        percent_paid,
        payments_completed,
        payments_remaining,
        total_paid,
        current_balance,
        next_payment_due_date: next_payable.map(|e| e.due_date),
        next_payment_amount: next_payable.map(|e| e.outstanding()),
        overdue_payments: overdue.len() as u32,
        overdue_amount: overdue.iter().map(|e| e.outstanding()).sum(),
        total_interest: schedule.iter().map(|e| e.interest_component).sum(),
        maturity_date: schedule.last().map(|e| e.due_date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::generate_schedule;
    use crate::types::PaymentRecord;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_generated_schedule_progress() {
        let terms = LoanTerms::from_percent(Money::from_major(12_000), dec!(12), 12, date(2024, 1, 1));
        let schedule = generate_schedule(&terms, date(2024, 1, 1)).unwrap();
        let summary = summarize(&terms, &schedule);

        assert_eq!(summary.percent_paid, Decimal::ZERO);
        assert_eq!(summary.payments_completed, 0);
        assert_eq!(summary.payments_remaining, 12);
        assert_eq!(summary.total_paid, Money::ZERO);
        assert_eq!(summary.current_balance, Money::from_major(12_000));
        assert_eq!(summary.next_payment_due_date, Some(date(2024, 1, 1)));
        assert_eq!(summary.maturity_date, Some(date(2024, 12, 1)));
        assert_eq!(summary.total_interest.to_currency(2).as_decimal(), dec!(794.23));
        assert!(!summary.is_delinquent());
    }

    #[test]
    fn test_authoritative_progress() {
        let amount = Money::from_major(250);
        let records = vec![
            PaymentRecord::paid(date(2024, 1, 1), amount, date(2024, 1, 1)),
            PaymentRecord::paid(date(2024, 2, 1), amount, date(2024, 2, 3)),
            PaymentRecord {
                amount_paid: Money::from_major(100),
                ..PaymentRecord::pending(date(2024, 3, 1), amount)
            },
            PaymentRecord::pending(date(2024, 4, 1), amount),
        ];
        let terms = LoanTerms::from_percent(Money::from_major(1_000), dec!(0), 4, date(2024, 1, 1))
            .with_existing_schedule(records);
        let schedule = generate_schedule(&terms, date(2024, 3, 10)).unwrap();
        let summary = summarize(&terms, &schedule);

        assert_eq!(summary.payments_completed, 2);
        assert_eq!(summary.payments_remaining, 2);
        assert_eq!(summary.current_balance, Money::from_major(500));
        assert_eq!(summary.percent_paid, dec!(50));
        // recorded payments, including the partial one
        assert_eq!(summary.total_paid, Money::from_major(600));
        assert_eq!(summary.next_payment_due_date, Some(date(2024, 3, 1)));
        assert_eq!(summary.next_payment_amount, Some(Money::from_major(150)));
        assert_eq!(summary.overdue_payments, 1);
        assert_eq!(summary.overdue_amount, Money::from_major(150));
        assert!(summary.is_delinquent());
    }

    #[test]
    fn test_records_past_term_are_not_counted_as_paid() {
        let amount = Money::from_major(500);
        let records = vec![
            PaymentRecord::paid(date(2024, 1, 1), amount, date(2024, 1, 1)),
            PaymentRecord::paid(date(2024, 2, 1), amount, date(2024, 2, 1)),
            PaymentRecord::paid(date(2024, 3, 1), Money::from_major(9_999), date(2024, 3, 1)),
        ];
        let terms = LoanTerms::from_percent(Money::from_major(1_000), dec!(0), 2, date(2024, 1, 1))
            .with_existing_schedule(records);
        let schedule = generate_schedule(&terms, date(2024, 6, 1)).unwrap();
        let summary = summarize(&terms, &schedule);

        assert_eq!(schedule.len(), 2);
        assert_eq!(summary.payments_completed, 2);
        assert_eq!(summary.total_paid, Money::from_major(1_000));
        assert!(summary.is_fully_paid());
    }

    #[test]
    fn test_fully_paid_has_no_next_payment() {
        let amount = Money::from_major(500);
        let records = vec![
            PaymentRecord::paid(date(2024, 1, 1), amount, date(2024, 1, 1)),
            PaymentRecord::paid(date(2024, 2, 1), amount, date(2024, 2, 1)),
        ];
        let terms = LoanTerms::from_percent(Money::from_major(1_000), dec!(0), 2, date(2024, 1, 1))
            .with_existing_schedule(records);
        let schedule = generate_schedule(&terms, date(2024, 6, 1)).unwrap();
        let summary = summarize(&terms, &schedule);

        assert_eq!(summary.next_payment_due_date, None);
        assert_eq!(summary.percent_paid, dec!(100));
        assert!(summary.is_fully_paid());
    }

    #[test]
    fn test_zero_principal_counts_as_fully_paid() {
        let terms = LoanTerms::from_percent(Money::ZERO, dec!(10), 12, date(2024, 1, 1));
        let summary = summarize(&terms, &[]);
        assert_eq!(summary.percent_paid, Decimal::ONE_HUNDRED);
        assert_eq!(summary.current_balance, Money::ZERO);
    }
}
