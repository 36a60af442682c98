//! Per-period opening balance records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::period::Period;

/// The balance a month starts from. At most one record exists per period;
/// a missing record means the month opens at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningBalance {
    pub period: Period,
    pub value: Decimal,
    pub set_by: String,
    pub set_at: DateTime<Utc>,
}

impl OpeningBalance {
    pub fn new(period: Period, value: Decimal, set_by: &str, set_at: DateTime<Utc>) -> Self {
        Self {
            period,
            value,
            set_by: set_by.to_string(),
            set_at,
        }
    }
}
