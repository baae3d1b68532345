/// time control - watch installments go overdue with controlled time
use loan_amortization_rs::{
    AmortizationEngine, Decimal, EngineConfig, LoanTerms, Money, PaymentRecord, SafeTimeProvider,
    TimeSource,
};
use loan_amortization_rs::chrono::{Duration, NaiveDate, TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== time control example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let start = NaiveDate::from_ymd_opt(2024, 2, 1).ok_or("bad start date")?;
    let installment = Money::from_major(1_000);
    let records = (0..6)
        .map(|m| {
            let due = start
                .checked_add_months(loan_amortization_rs::chrono::Months::new(m))
                .ok_or("bad due date")?;
            Ok(PaymentRecord::pending(due, installment))
        })
        .collect::<Result<Vec<_>, &str>>()?;

    let terms = LoanTerms::from_percent(Money::from_major(5_800), Decimal::from(11), 6, start)
        .with_existing_schedule(records);
    let engine = AmortizationEngine::new(EngineConfig::admin_console())?;

    for _ in 0..4 {
        let (schedule, summary) = engine.evaluate(&terms, &time)?;
        println!("as of {}:", time.now().format("%Y-%m-%d"));
        for entry in &schedule {
            println!("  {}  {:?}", entry.due_date, entry.derived_status);
        }
        println!(
            "  overdue: {} ({}), next due: {:?}\n",
            summary.overdue_payments,
            summary.overdue_amount.to_currency(2),
            summary.next_payment_due_date
        );

        controller.advance(Duration::days(30));
    }

    Ok(())
}
