use chrono::{NaiveDate, Utc};

use super::business::{BusinessCalendar, SnapDirection};
use super::error::CalendarError;
use super::holidays::HolidaySet;
use super::iso::{format_iso_date, parse_iso_date};

pub fn is_business_day(date: &str, holidays: &HolidaySet) -> Result<bool, CalendarError> {
    let date = parse_iso_date(date)?;
    Ok(BusinessCalendar::new(holidays).is_business_day(date))
}

/// Like every function here, parses strictly and uses
/// [`DEFAULT_WALK_LIMIT_DAYS`](super::DEFAULT_WALK_LIMIT_DAYS). Build a
/// [`BusinessCalendar`] for another ceiling.
pub fn add_business_days(start: &str, n: i64, holidays: &HolidaySet) -> Result<String, CalendarError> {
    let start_date = parse_iso_date(start)?;
    if n == 0 {
        return Ok(start.to_string());
    }
    let end = BusinessCalendar::new(holidays).add_business_days(start_date, n)?;
    Ok(format_iso_date(end))
}

pub fn diff_business_days(start: &str, end: &str, holidays: &HolidaySet) -> Result<i64, CalendarError> {
    let start = parse_iso_date(start)?;
    let end = parse_iso_date(end)?;
    BusinessCalendar::new(holidays).diff_business_days(start, end)
}

pub fn get_next_business_day(date: &str, holidays: &HolidaySet) -> Result<String, CalendarError> {
    let date = parse_iso_date(date)?;
    BusinessCalendar::new(holidays)
        .next_business_day(date)
        .map(format_iso_date)
}

pub fn snap_to_business_day(
    date: &str,
    holidays: &HolidaySet,
    direction: SnapDirection,
) -> Result<String, CalendarError> {
    let date = parse_iso_date(date)?;
    BusinessCalendar::new(holidays)
        .snap(date, direction)
        .map(format_iso_date)
}

/// Every calendar day from `start` to `end` inclusive. Holidays play no
/// part, so none are taken.
pub fn get_date_range(start: &str, end: &str) -> Result<Vec<String>, CalendarError> {
    let start = parse_iso_date(start)?;
    let end = parse_iso_date(end)?;
    let none = HolidaySet::new();
    let dates = BusinessCalendar::new(&none).date_range(start, end)?;
    Ok(dates.into_iter().map(format_iso_date).collect())
}

/// Compare against the current UTC date.
pub fn is_today(date: &str) -> Result<bool, CalendarError> {
    is_today_at(date, Utc::now().date_naive())
}

pub fn is_today_at(date: &str, today: NaiveDate) -> Result<bool, CalendarError> {
    Ok(parse_iso_date(date)? == today)
}
