use chrono::{Duration, NaiveDate};

use crate::types::{DerivedStatus, PaymentRecord, PaymentStatus};

/// status of each authoritative record as of a given day
///
/// Paid wins over everything. An unpaid record is overdue when the backend
/// says so or its due date plus the grace window has passed. The first unpaid
/// record that is not overdue is due, but only when no earlier record is
/// still unpaid; every other unpaid record is upcoming.
pub fn derive_statuses(
    records: &[PaymentRecord],
    as_of: NaiveDate,
    grace_days: u32,
) -> Vec<DerivedStatus> {
    let grace = Duration::days(grace_days as i64);
    let mut seen_unpaid = false;

    records
        .iter()
        .map(|record| {
            if record.is_settled() {
                return DerivedStatus::Paid;
            }

            // a grace window running past the calendar never expires
            let past_due = record.status == PaymentStatus::Overdue
                || record
                    .due_date
                    .checked_add_signed(grace)
                    .map_or(false, |deadline| deadline < as_of);
            let status = if past_due {
                DerivedStatus::Overdue
            } else if !seen_unpaid {
                DerivedStatus::Due
            } else {
                DerivedStatus::Upcoming
            };

            seen_unpaid = true;
            status
        })
        .collect()
}
