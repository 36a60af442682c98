//! Weekend adjustment for due dates.
//!
//! Cash only moves on banking days: a due date falling on Saturday or Sunday
//! is carried forward to the following Monday.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Shifts a date off the weekend: Saturday moves two days forward, Sunday
/// one day forward, any other day is returned unchanged.
pub fn shift_weekend(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date + Duration::days(2),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn saturday_moves_to_monday() {
        assert_eq!(shift_weekend(date(2024, 5, 4)), date(2024, 5, 6));
    }

    #[test]
    fn sunday_moves_to_monday() {
        assert_eq!(shift_weekend(date(2024, 5, 5)), date(2024, 5, 6));
    }

    #[test]
    fn weekday_is_unchanged() {
        assert_eq!(shift_weekend(date(2024, 5, 6)), date(2024, 5, 6));
        assert_eq!(shift_weekend(date(2024, 5, 10)), date(2024, 5, 10));
    }

    #[test]
    fn saturday_at_month_end_rolls_into_next_month() {
        assert_eq!(shift_weekend(date(2024, 8, 31)), date(2024, 9, 2));
    }

    #[test]
    fn sunday_at_year_end_rolls_into_next_year() {
        assert_eq!(shift_weekend(date(2023, 12, 31)), date(2024, 1, 1));
    }

    proptest! {
        #[test]
        fn never_lands_on_weekend(offset in 0i64..20_000) {
            let d = date(1990, 1, 1) + Duration::days(offset);
            let shifted = shift_weekend(d);
            prop_assert!(shifted.weekday() != Weekday::Sat);
            prop_assert!(shifted.weekday() != Weekday::Sun);
        }

        #[test]
        fn shifts_forward_by_at_most_two_days(offset in 0i64..20_000) {
            let d = date(1990, 1, 1) + Duration::days(offset);
            let shifted = shift_weekend(d);
            prop_assert!(shifted >= d);
            prop_assert!(shifted - d <= Duration::days(2));
        }

        #[test]
        fn idempotent(offset in 0i64..20_000) {
            let d = date(1990, 1, 1) + Duration::days(offset);
            prop_assert_eq!(shift_weekend(shift_weekend(d)), shift_weekend(d));
        }
    }
}
