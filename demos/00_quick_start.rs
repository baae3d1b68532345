/// quick start - minimal example to get started
use loan_amortization_rs::{generate_schedule, progress_summary, Decimal, LoanTerms, Money};
use loan_amortization_rs::chrono::NaiveDate;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // a 12,000 loan at 12% a year over 12 months
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad start date")?;
    let terms = LoanTerms::from_percent(Money::from_major(12_000), Decimal::from(12), 12, start);

    let schedule = generate_schedule(&terms, start)?;

    println!("{:>3}  {:<10}  {:>10}  {:>10}  {:>10}  {:>10}", "#", "due", "emi", "principal", "interest", "balance");
    for entry in &schedule {
        println!(
            "{:>3}  {}  {:>10}  {:>10}  {:>10}  {:>10}",
            entry.period_index,
            entry.due_date,
            entry.installment_amount.to_currency(2),
            entry.principal_component.to_currency(2),
            entry.interest_component.to_currency(2),
            entry.remaining_balance.to_currency(2),
        );
    }

    let summary = progress_summary(&terms, &schedule);
    println!("\ntotal interest: {}", summary.total_interest.to_currency(2));
    println!("next payment due: {:?}", summary.next_payment_due_date);

    Ok(())
}
