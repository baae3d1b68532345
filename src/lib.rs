pub mod config;
pub mod decimal;
pub mod errors;
pub mod progress;
pub mod record;
pub mod schedule;
pub mod types;
pub mod view;

// re-export key types
pub use config::{EngineConfig, SplitEstimation};
pub use decimal::{Money, Rate};
pub use errors::{LoanError, Result};
pub use record::{terms_from_json, LoanRecord};
pub use schedule::{generate_schedule, level_installment, progress_summary, AmortizationEngine};
pub use types::{
    DerivedStatus, LoanTerms, PaymentRecord, PaymentStatus, ProgressSummary, ScheduleEntry,
    SplitBasis,
};
pub use view::{ProgressView, ScheduleView};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
