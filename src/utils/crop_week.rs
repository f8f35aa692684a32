// Crop-year week arithmetic; the crop year starts on October 1st

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

const CROP_YEAR_START_MONTH: u32 = 10;

/// Summary of the week a date falls in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekInfo {
    pub date: NaiveDate,
    pub week_number: u32,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub week_range: String,
}

/// October 1st of the crop year `date` belongs to
pub fn crop_year_start(date: NaiveDate) -> NaiveDate {
    let year = if date.month() >= CROP_YEAR_START_MONTH {
        date.year()
    } else {
        date.year() - 1
    };
    // October 1st exists in every year
    NaiveDate::from_ymd_opt(year, CROP_YEAR_START_MONTH, 1).unwrap_or(date)
}

/// 1-based week of the crop year
pub fn crop_week_number(date: NaiveDate) -> u32 {
    let days = (date - crop_year_start(date)).num_days();
    (days / 7 + 1).max(1) as u32
}

/// First and last day of the crop-year week containing `date`
pub fn week_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let week = crop_week_number(date);
    let start = crop_year_start(date) + Duration::days(i64::from(week - 1) * 7);
    (start, start + Duration::days(6))
}

/// e.g. "October 15, 2026 (Thursday)"
pub fn format_date_display(date: NaiveDate) -> String {
    date.format("%B %d, %Y (%A)").to_string()
}

/// e.g. "Oct 15 - Oct 21, 2026"
pub fn format_week_display(week_start: NaiveDate, week_end: NaiveDate) -> String {
    format!(
        "{} - {}",
        week_start.format("%b %d"),
        week_end.format("%b %d, %Y")
    )
}

pub fn week_info(date: NaiveDate) -> WeekInfo {
    let (week_start, week_end) = week_range(date);
    WeekInfo {
        date,
        week_number: crop_week_number(date),
        week_start,
        week_end,
        week_range: format_week_display(week_start, week_end),
    }
}

/// Week information for today's local date
pub fn current_week_info() -> WeekInfo {
    week_info(Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_week() {
        assert_eq!(crop_week_number(ymd(2026, 10, 1)), 1);
        assert_eq!(crop_week_number(ymd(2026, 10, 7)), 1);
        assert_eq!(crop_week_number(ymd(2026, 10, 8)), 2);
    }

    #[test]
    fn test_before_october_uses_previous_crop_year() {
        assert_eq!(crop_year_start(ymd(2026, 9, 30)), ymd(2025, 10, 1));
        // 364 days after 2025-10-01
        assert_eq!(crop_week_number(ymd(2026, 9, 30)), 53);
        assert_eq!(crop_week_number(ymd(2026, 1, 1)), 14);
    }

    #[test]
    fn test_week_range() {
        let (start, end) = week_range(ymd(2026, 10, 15));
        assert_eq!(start, ymd(2026, 10, 15));
        assert_eq!(end, ymd(2026, 10, 21));

        let (start, _) = week_range(ymd(2026, 10, 10));
        assert_eq!(start, ymd(2026, 10, 8));
    }

    #[test]
    fn test_formatting() {
        assert_eq!(
            format_date_display(ymd(2026, 10, 15)),
            "October 15, 2026 (Thursday)"
        );
        assert_eq!(
            format_week_display(ymd(2026, 10, 1), ymd(2026, 10, 7)),
            "Oct 01 - Oct 07, 2026"
        );
    }

    #[test]
    fn test_week_info() {
        let info = week_info(ymd(2026, 10, 3));
        assert_eq!(info.week_number, 1);
        assert_eq!(info.week_range, "Oct 01 - Oct 07, 2026");
    }
}
