/// backend record - normalise a loan as the api returns it and render views
use loan_amortization_rs::{
    AmortizationEngine, EngineConfig, LoanRecord, ProgressView, SafeTimeProvider, ScheduleView,
    TimeSource,
};

const LOAN_RESPONSE: &str = r#"{
    "_id": "6612ab90",
    "amount_cents": 2500000,
    "interest_rate": "10.5",
    "tenure": "24",
    "application_date": "2024-01-10T09:15:00Z",
    "payment_schedule": [
        { "due_date": "2024-02-10", "amount_due": 1159.38, "amount_paid": 1159.38,
          "paid_on": "2024-02-09", "status": "paid" },
        { "due_date": "2024-03-10", "amount_due": 1159.38, "amount_paid": 500, "status": "pending" },
        { "due_date": "2024-04-10", "amount_due": 1159.38, "status": "pending" }
    ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let record = LoanRecord::from_json(LOAN_RESPONSE)?;
    println!("loan {:?}: {} over {} months", record.id, record.principal, record.term_months);
    let terms = record.into_terms()?;

    let config = EngineConfig::borrower_dashboard();
    let engine = AmortizationEngine::new(config.clone())?;
    let time = SafeTimeProvider::new(TimeSource::System);

    let (schedule, summary) = engine.evaluate(&terms, &time)?;

    println!("=== schedule ===");
    println!("{}", ScheduleView::new(&schedule, &config).to_json_pretty()?);

    println!("\n=== progress ===");
    println!("{}", ProgressView::new(&summary, &config).to_json_pretty()?);

    // a record the boundary refuses
    match LoanRecord::from_json(r#"{ "interest_rate": 12, "tenure": 12, "start_date": "2024-01-01" }"#) {
        Ok(_) => println!("\nunexpectedly accepted"),
        Err(e) => println!("\nrejected: {}", e),
    }

    Ok(())
}
