pub mod amortization;
pub mod authoritative;
pub mod status;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;

use crate::config::EngineConfig;
use crate::errors::Result;
use crate::progress;
use crate::types::{LoanTerms, ProgressSummary, ScheduleEntry};

pub use amortization::{due_date_for_period, level_installment};
pub use status::derive_statuses;

/// amortization engine
///
/// Stateless apart from its configuration: every call computes a fresh
/// schedule from the terms it is given, so one engine can be shared freely
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct AmortizationEngine {
    config: EngineConfig,
}

impl AmortizationEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// generate the schedule, reading "today" from the time provider
    pub fn generate_schedule(
        &self,
        terms: &LoanTerms,
        time_provider: &SafeTimeProvider,
    ) -> Result<Vec<ScheduleEntry>> {
        self.generate_schedule_as_of(terms, time_provider.now().date_naive())
    }

    /// generate the schedule with statuses evaluated on `as_of`
    ///
    /// With an authoritative schedule on the terms its records are used as
    /// is; otherwise a level-installment schedule is computed.
    pub fn generate_schedule_as_of(&self, terms: &LoanTerms, as_of: NaiveDate) -> Result<Vec<ScheduleEntry>> {
        terms.validate()?;

        if terms.has_existing_schedule() {
            return Ok(authoritative::from_records(terms, as_of, &self.config));
        }

        amortization::equal_installments(
            terms.principal,
            terms.annual_rate,
            terms.term_months,
            terms.start_date,
        )
    }

    /// repayment progress for a schedule produced from `terms`
    pub fn progress_summary(&self, terms: &LoanTerms, schedule: &[ScheduleEntry]) -> ProgressSummary {
        progress::summarize(terms, schedule)
    }

    /// schedule and progress in one call
    pub fn evaluate(
        &self,
        terms: &LoanTerms,
        time_provider: &SafeTimeProvider,
    ) -> Result<(Vec<ScheduleEntry>, ProgressSummary)> {
        let schedule = self.generate_schedule(terms, time_provider)?;
        let summary = self.progress_summary(terms, &schedule);
        Ok((schedule, summary))
    }
}

/// generate a schedule with the default configuration
pub fn generate_schedule(terms: &LoanTerms, as_of: NaiveDate) -> Result<Vec<ScheduleEntry>> {
    AmortizationEngine::default().generate_schedule_as_of(terms, as_of)
}

/// progress summary with the default configuration
pub fn progress_summary(terms: &LoanTerms, schedule: &[ScheduleEntry]) -> ProgressSummary {
    progress::summarize(terms, schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::errors::LoanError;
    use crate::types::{DerivedStatus, PaymentRecord};
    use chrono::{Duration, TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reference_scenario() {
        let terms = LoanTerms::from_percent(Money::from_major(12_000), dec!(12), 12, date(2024, 1, 1));
        let schedule = generate_schedule(&terms, date(2024, 1, 1)).unwrap();

        let first = &schedule[0];
        assert_eq!(first.installment_amount.to_currency(2).as_decimal(), dec!(1066.19));
        assert_eq!(first.interest_component.to_currency(2).as_decimal(), dec!(120.00));
        assert_eq!(first.principal_component.to_currency(2).as_decimal(), dec!(946.19));
        assert_eq!(first.remaining_balance.to_currency(2).as_decimal(), dec!(11053.81));

        assert_eq!(schedule[11].remaining_balance, Money::ZERO);
    }

    #[test]
    fn test_invalid_terms_produce_no_output() {
        let start = date(2024, 1, 1);
        let cases = vec![
            (LoanTerms::from_percent(Money::ZERO, dec!(12), 12, start), "principal"),
            (LoanTerms::from_percent(Money::from_major(1_000), dec!(12), 0, start), "term_months"),
            (LoanTerms::from_percent(Money::from_major(1_000), dec!(-1), 12, start), "annual_rate"),
        ];

        for (terms, field) in cases {
            match generate_schedule(&terms, start) {
                Err(LoanError::InvalidLoanTerms { field: f, .. }) => assert_eq!(f, field),
                other => panic!("expected invalid terms for {}, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_runaway_compounding_is_invalid_terms() {
        let start = date(2024, 1, 1);
        let terms = LoanTerms::from_percent(Money::from_major(1_000), dec!(400), 240, start);

        match generate_schedule(&terms, start) {
            Err(LoanError::InvalidLoanTerms { field, .. }) => assert_eq!(field, "annual_rate"),
            other => panic!("expected invalid terms, got {:?}", other),
        }

        // records carry the amounts, so the same terms still produce a schedule
        let terms =
            terms.with_existing_schedule(vec![PaymentRecord::pending(start, Money::from_major(500))]);
        let schedule = generate_schedule(&terms, start).unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(
            schedule[0].principal_component + schedule[0].interest_component,
            Money::from_major(500)
        );
    }

    #[test]
    fn test_existing_schedule_takes_precedence() {
        let records = vec![
            PaymentRecord::pending(date(2024, 1, 10), Money::from_major(777)),
            PaymentRecord::pending(date(2024, 2, 10), Money::from_major(777)),
        ];
        let terms = LoanTerms::from_percent(Money::from_major(12_000), dec!(12), 12, date(2024, 1, 1))
            .with_existing_schedule(records.clone());

        let schedule = generate_schedule(&terms, date(2024, 1, 1)).unwrap();
        assert_eq!(schedule.len(), 2);
        for (entry, record) in schedule.iter().zip(&records) {
            assert_eq!(entry.due_date, record.due_date);
            assert_eq!(entry.installment_amount, record.amount_due);
        }
    }

    #[test]
    fn test_engine_reads_time_provider() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        ));
        let control = time.test_control().unwrap();

        let records = vec![
            PaymentRecord::pending(date(2024, 2, 1), Money::from_major(500)),
            PaymentRecord::pending(date(2024, 3, 1), Money::from_major(500)),
        ];
        let terms = LoanTerms::from_percent(Money::from_major(1_000), dec!(0), 2, date(2024, 1, 1))
            .with_existing_schedule(records);
        let engine = AmortizationEngine::default();

        let schedule = engine.generate_schedule(&terms, &time).unwrap();
        assert_eq!(schedule[0].derived_status, DerivedStatus::Due);

        control.advance(Duration::days(30));
        let (schedule, summary) = engine.evaluate(&terms, &time).unwrap();
        assert_eq!(schedule[0].derived_status, DerivedStatus::Overdue);
        assert_eq!(summary.overdue_payments, 1);
        assert_eq!(summary.next_payment_due_date, Some(date(2024, 2, 1)));
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let config = EngineConfig {
            currency_scale: 20,
            ..EngineConfig::default()
        };
        assert!(AmortizationEngine::new(config).is_err());
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AmortizationEngine>();
    }
}
