use crate::data_structures::MonthOption;
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};
use std::ops::RangeInclusive;

/// Value of the "whole period" entry in the month filter.
pub const ALL_PERIODS_VALUE: &str = "all";
const ALL_PERIODS_LABEL: &str = "전체 기간";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Weekday,
    Weekend,
}

impl DayKind {
    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => DayKind::Weekend,
            _ => DayKind::Weekday,
        }
    }

    /// Inclusive range the dummy source draws daily cost from.
    pub fn usage_range(&self) -> RangeInclusive<u32> {
        match self {
            DayKind::Weekend => 30..=79,
            DayKind::Weekday => 100..=249,
        }
    }
}

/// `"2025년 04월 01일"`.
pub fn format_display_date(date: NaiveDate) -> String {
    format!(
        "{}년 {:02}월 {:02}일",
        date.year(),
        date.month(),
        date.day()
    )
}

/// Every calendar day from `start` to `end`, both inclusive. Empty when reversed.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` timestamp or a bare date.
pub fn parse_created_at(value: &str) -> Result<NaiveDate> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.date());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Failed to parse creation date: {}", value))
}

/// Month filter options from the account creation month up to `today`.
/// The whole-period option comes first, then the months newest first.
pub fn month_options(user_created_at: &str, today: NaiveDate) -> Result<Vec<MonthOption>> {
    let created = parse_created_at(user_created_at)?;

    let mut options = Vec::new();
    let mut year = created.year();
    let mut month = created.month();

    while (year, month) <= (today.year(), today.month()) {
        options.push(MonthOption {
            value: format!("{}-{:02}", year, month),
            label: format!("{}년 {}월", year, month),
        });

        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    options.push(MonthOption {
        value: ALL_PERIODS_VALUE.to_string(),
        label: ALL_PERIODS_LABEL.to_string(),
    });
    options.reverse();

    Ok(options)
}

/// `YYYY-MM` key of a date, as used by monthly series.
pub fn month_key(date: NaiveDate) -> String {
    format!("{}-{:02}", date.year(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_kind() {
        // 2025-04-05 is a Saturday
        assert_eq!(DayKind::of(date(2025, 4, 5)), DayKind::Weekend);
        assert_eq!(DayKind::of(date(2025, 4, 6)), DayKind::Weekend);
        assert_eq!(DayKind::of(date(2025, 4, 7)), DayKind::Weekday);
        assert_eq!(DayKind::of(date(2025, 4, 1)), DayKind::Weekday);
    }

    #[test]
    fn test_usage_ranges_are_disjoint() {
        let weekend = DayKind::Weekend.usage_range();
        let weekday = DayKind::Weekday.usage_range();
        assert!(weekend.end() < weekday.start());
        assert_eq!(weekend.clone().count(), 50);
        assert_eq!(weekday.clone().count(), 150);
    }

    #[test]
    fn test_format_display_date_pads() {
        assert_eq!(format_display_date(date(2025, 4, 1)), "2025년 04월 01일");
        assert_eq!(format_display_date(date(2025, 12, 25)), "2025년 12월 25일");
    }

    #[test]
    fn test_days_between_crosses_month_end() {
        let days: Vec<_> = days_between(date(2025, 4, 29), date(2025, 5, 2)).collect();
        assert_eq!(
            days,
            vec![date(2025, 4, 29), date(2025, 4, 30), date(2025, 5, 1), date(2025, 5, 2)]
        );
    }

    #[test]
    fn test_days_between_reversed_is_empty() {
        assert_eq!(days_between(date(2025, 5, 2), date(2025, 5, 1)).count(), 0);
    }

    #[test]
    fn test_days_between_inclusive() {
        assert_eq!(days_between(date(2025, 4, 1), date(2025, 4, 1)).count(), 1);
        assert_eq!(days_between(date(2025, 4, 1), date(2025, 6, 14)).count(), 75);
    }

    #[test]
    fn test_parse_created_at_formats() {
        assert_eq!(parse_created_at("2025-03-12T09:30:00").unwrap(), date(2025, 3, 12));
        assert_eq!(
            parse_created_at("2025-03-12T09:30:00.123456").unwrap(),
            date(2025, 3, 12)
        );
        assert_eq!(
            parse_created_at("2025-03-12T09:30:00+09:00").unwrap(),
            date(2025, 3, 12)
        );
        assert_eq!(parse_created_at("2025-03-12").unwrap(), date(2025, 3, 12));
        assert!(parse_created_at("yesterday").is_err());
    }

    #[test]
    fn test_month_options_all_first_then_newest() {
        let options = month_options("2024-11-20T10:00:00", date(2025, 2, 3)).unwrap();
        let values: Vec<_> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["all", "2025-02", "2025-01", "2024-12", "2024-11"]);
        assert_eq!(options[0].label, "전체 기간");
        assert_eq!(options[1].label, "2025년 2월");
    }

    #[test]
    fn test_month_options_same_month() {
        let options = month_options("2025-04-15", date(2025, 4, 30)).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].value, ALL_PERIODS_VALUE);
        assert_eq!(options[1].value, "2025-04");
    }

    #[test]
    fn test_month_key() {
        assert_eq!(month_key(date(2025, 4, 9)), "2025-04");
    }
}
