//! Calendar math - pure date helpers behind the wheel grids
//!
//! Day counts, Sunday-based weekday numbering, and the week-of-year
//! bucketing used to group a month's days into rows of seven.

use chrono::{Datelike, NaiveDate};

/// Number of days (28-31) in the given month, accounting for leap years.
///
/// Computed as "day zero of the next month": the first day of the month
/// after, stepped back by one.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// Weekday of a date as 0..=6 with 0 = Sunday.
pub fn weekday_of(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Week-of-year bucket for grouping days into calendar rows.
///
/// `ceil((days_past_jan1 + weekday(Jan 1) + 1) / 7)`. This is not the ISO
/// week number; it only has to assign the same bucket to every day of one
/// Sunday-to-Saturday row, which it does because the offset anchors the
/// count to the first Sunday-aligned row of the year.
pub fn week_bucket(date: NaiveDate) -> u32 {
    let first_weekday = NaiveDate::from_yo_opt(date.year(), 1)
        .map(weekday_of)
        .unwrap_or(0);
    let past_days = date.ordinal0();
    (past_days + first_weekday + 1).div_ceil(7)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month_leap_years() {
        assert_eq!(days_in_month(2020, 2), 29);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2021, 2), 28);
        // Century rule: 2100 is not a leap year
        assert_eq!(days_in_month(2100, 2), 28);
    }

    #[test]
    fn test_days_in_month_lengths() {
        assert_eq!(days_in_month(2021, 1), 31);
        assert_eq!(days_in_month(2021, 4), 30);
        assert_eq!(days_in_month(2021, 12), 31);
    }

    #[test]
    fn test_weekday_of() {
        // 2021-05-20 was a Thursday
        let date = NaiveDate::from_ymd_opt(2021, 5, 20).unwrap();
        assert_eq!(weekday_of(date), 4);
        // 2021-05-02 was a Sunday
        let date = NaiveDate::from_ymd_opt(2021, 5, 2).unwrap();
        assert_eq!(weekday_of(date), 0);
    }

    #[test]
    fn test_week_bucket_starts_at_one() {
        let jan1 = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert_eq!(week_bucket(jan1), 1);
    }

    #[test]
    fn test_week_bucket_rows_break_on_sunday() {
        // 2021-05-01 (Saturday) and 2021-05-02 (Sunday) sit in different rows
        let sat = NaiveDate::from_ymd_opt(2021, 5, 1).unwrap();
        let sun = NaiveDate::from_ymd_opt(2021, 5, 2).unwrap();
        assert_eq!(week_bucket(sun), week_bucket(sat) + 1);
        // ...while a full Sunday-to-Saturday run shares one bucket
        for day in 2..=8 {
            let date = NaiveDate::from_ymd_opt(2021, 5, day).unwrap();
            assert_eq!(week_bucket(date), week_bucket(sun));
        }
    }
}
