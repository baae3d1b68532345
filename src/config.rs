use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::INTERNAL_SCALE;
use crate::errors::{LoanError, Result};

/// longest accepted grace window, ten years
pub const MAX_GRACE_DAYS: u32 = 3_650;

/// engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// decimal places amounts are rounded to when presented
    pub currency_scale: u32,
    /// show only the first n periods in views; `None` shows all
    pub display_periods: Option<usize>,
    /// how an authoritative amount due is split into principal and interest
    pub split_estimation: SplitEstimation,
    /// days after the due date before an unpaid installment counts as overdue
    pub overdue_grace_days: u32,
}

/// estimation policy for authoritative schedules that carry no split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SplitEstimation {
    /// interest on the running balance, remainder to principal
    Amortized,
    /// fixed share of every installment goes to principal
    FixedRatio { principal_percent: Decimal },
}

impl Default for SplitEstimation {
    fn default() -> Self {
        SplitEstimation::Amortized
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            currency_scale: 2,
            display_periods: None,
            split_estimation: SplitEstimation::Amortized,
            overdue_grace_days: 0,
        }
    }
}

impl EngineConfig {
    /// borrower-facing dashboard: first year of the schedule only
    pub fn borrower_dashboard() -> Self {
        Self {
            display_periods: Some(12),
            ..Self::default()
        }
    }

    /// admin loan review: full schedule with a short grace window
    pub fn admin_console() -> Self {
        Self {
            overdue_grace_days: 3,
            ..Self::default()
        }
    }

    /// the 70/30 display split used by the legacy loan tracking page
    pub fn legacy_fixed_split() -> Self {
        Self {
            split_estimation: SplitEstimation::FixedRatio {
                principal_percent: dec!(70),
            },
            ..Self::default()
        }
    }

    pub fn with_display_periods(mut self, periods: usize) -> Self {
        self.display_periods = Some(periods);
        self
    }

    pub fn with_grace_days(mut self, days: u32) -> Self {
        self.overdue_grace_days = days;
        self
    }

    /// parse and validate a json configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.currency_scale > INTERNAL_SCALE {
            return Err(LoanError::InvalidConfiguration {
                message: format!(
                    "currency_scale {} exceeds working precision {}",
                    self.currency_scale, INTERNAL_SCALE
                ),
            });
        }
        if self.display_periods == Some(0) {
            return Err(LoanError::InvalidConfiguration {
                message: "display_periods must be at least 1".to_string(),
            });
        }
        if self.overdue_grace_days > MAX_GRACE_DAYS {
            return Err(LoanError::InvalidConfiguration {
                message: format!(
                    "overdue_grace_days {} exceeds {}",
                    self.overdue_grace_days, MAX_GRACE_DAYS
                ),
            });
        }
        if let SplitEstimation::FixedRatio { principal_percent } = self.split_estimation {
            if principal_percent < Decimal::ZERO || principal_percent > Decimal::ONE_HUNDRED {
                return Err(LoanError::InvalidConfiguration {
                    message: format!(
                        "principal_percent must be within 0..=100, got {}",
                        principal_percent
                    ),
                });
            }
        }
        Ok(())
    }
}
