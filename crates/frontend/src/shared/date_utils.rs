/// Utilities for date ranges
///
/// Dates travel as ISO `YYYY-MM-DD` strings everywhere in the frontend.
use chrono::{Datelike, Duration, NaiveDate};

/// First and last day of the month containing `today`
/// Example: 2024-02-10 -> ("2024-02-01", "2024-02-29")
pub fn month_range(today: NaiveDate) -> (String, String) {
    let year = today.year();
    let month = today.month();
    let month_start = today.with_day(1).unwrap_or(today);
    let next_month_start = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let month_end = next_month_start
        .map(|d| d - Duration::days(1))
        .unwrap_or(today);
    (
        month_start.format("%Y-%m-%d").to_string(),
        month_end.format("%Y-%m-%d").to_string(),
    )
}

/// Range of the current month (UTC)
pub fn current_month_range() -> (String, String) {
    month_range(chrono::Utc::now().date_naive())
}
