//! Calendar period (year-month) handling.

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::error::FluxoError;

/// A calendar month, stored as its first day.
///
/// Ordering and equality follow calendar order, so periods can be collected
/// into sorted sets directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    first_day: NaiveDate,
}

impl Period {
    /// Parses a `YYYY-MM` string. Anything else is rejected.
    pub fn parse(input: &str) -> Result<Self, FluxoError> {
        let invalid = || FluxoError::PeriodParse {
            input: input.to_string(),
        };

        let trimmed = input.trim();
        let (year_str, month_str) = trimmed.split_once('-').ok_or_else(invalid)?;
        if year_str.len() != 4 || month_str.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year_str.parse().map_err(|_| invalid())?;
        let month: u32 = month_str.parse().map_err(|_| invalid())?;
        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        Ok(Self { first_day })
    }

    /// The period containing the given date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            first_day: date - Duration::days(i64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next_month_first_day() - Duration::days(1)
    }

    pub fn days_in_month(&self) -> u32 {
        (self.next_month_first_day() - self.first_day).num_days() as u32
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    fn next_month_first_day(&self) -> NaiveDate {
        // Adding 31 days to day 1 always lands inside the next month;
        // snapping back to day 1 gives its first day.
        let inside_next = self.first_day + Duration::days(31);
        inside_next - Duration::days(i64::from(inside_next.day0()))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}
