//! Every operation walks one calendar day at a time so that an arbitrary
//! holiday list is honoured exactly. Each walk is capped by
//! [`BusinessCalendar::walk_limit_days`].

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::error::CalendarError;
use super::holidays::HolidaySet;

/// Roughly ten years of calendar days.
pub const DEFAULT_WALK_LIMIT_DAYS: u32 = 3_660;

/// Which way [`BusinessCalendar::snap`] may move a non-business date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapDirection {
    #[default]
    Forward,
    Backward,
    /// Whichever business day is fewer business days away; forward on a tie.
    Nearest,
}

/// Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Weekend rules plus a borrowed holiday set.
#[derive(Debug, Clone, Copy)]
pub struct BusinessCalendar<'a> {
    holidays: &'a HolidaySet,
    walk_limit_days: u32,
}

impl<'a> BusinessCalendar<'a> {
    pub fn new(holidays: &'a HolidaySet) -> Self {
        Self {
            holidays,
            walk_limit_days: DEFAULT_WALK_LIMIT_DAYS,
        }
    }

    /// Override the per-walk ceiling on calendar-day steps.
    pub fn with_walk_limit(mut self, days: u32) -> Self {
        self.walk_limit_days = days;
        self
    }

    pub fn holidays(&self) -> &'a HolidaySet {
        self.holidays
    }

    pub fn walk_limit_days(&self) -> u32 {
        self.walk_limit_days
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !is_weekend(date) && !self.holidays.contains(date)
    }

    /// Move `n` business days from `start`; negative `n` walks backward.
    ///
    /// `n == 0` returns `start` unchanged, even when `start` is itself a
    /// weekend or holiday. Any other `n` always lands on a business day.
    pub fn add_business_days(&self, start: NaiveDate, n: i64) -> Result<NaiveDate, CalendarError> {
        if n == 0 {
            return Ok(start);
        }
        let forward = n > 0;
        let mut remaining = n.unsigned_abs();
        let mut walk = self.walk();
        let mut date = start;
        while remaining > 0 {
            date = walk.step(date, forward)?;
            if self.is_business_day(date) {
                remaining -= 1;
            }
        }
        Ok(date)
    }

    /// Signed count of business days landed on while walking from `start`
    /// to `end`.
    ///
    /// The start day itself is never counted; the end day is. This makes
    /// the function the left inverse of [`add_business_days`] whenever
    /// `start` is a business day.
    ///
    /// [`add_business_days`]: Self::add_business_days
    pub fn diff_business_days(&self, start: NaiveDate, end: NaiveDate) -> Result<i64, CalendarError> {
        if start == end {
            return Ok(0);
        }
        let span = (end - start).num_days().unsigned_abs();
        if span > u64::from(self.walk_limit_days) {
            return Err(CalendarError::RangeTooLarge {
                limit: self.walk_limit_days,
            });
        }

        let forward = end > start;
        let mut walk = self.walk();
        let mut date = start;
        let mut count = 0i64;
        while date != end {
            date = walk.step(date, forward)?;
            if self.is_business_day(date) {
                count += 1;
            }
        }
        Ok(if forward { count } else { -count })
    }

    /// `date` if it is a business day, else the first one after it.
    pub fn next_business_day(&self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        self.seek(date, true)
    }

    /// `date` if it is a business day, else the last one before it.
    pub fn previous_business_day(&self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        self.seek(date, false)
    }

    /// Move a non-business date onto a business day. Business days are
    /// returned unchanged regardless of direction.
    pub fn snap(&self, date: NaiveDate, direction: SnapDirection) -> Result<NaiveDate, CalendarError> {
        match direction {
            SnapDirection::Forward => self.next_business_day(date),
            SnapDirection::Backward => self.previous_business_day(date),
            SnapDirection::Nearest => {
                let forward = self.next_business_day(date)?;
                let backward = self.previous_business_day(date)?;
                let ahead = self.diff_business_days(date, forward)?.abs();
                let behind = self.diff_business_days(date, backward)?.abs();
                Ok(if behind < ahead { backward } else { forward })
            }
        }
    }

    /// Every calendar day from `start` to `end` inclusive, ascending.
    /// Empty when `end` precedes `start`.
    pub fn date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, CalendarError> {
        if end < start {
            return Ok(Vec::new());
        }
        let days = (end - start).num_days().unsigned_abs() + 1;
        if days > u64::from(self.walk_limit_days) {
            return Err(CalendarError::RangeTooLarge {
                limit: self.walk_limit_days,
            });
        }
        Ok(start.iter_days().take(days as usize).collect())
    }

    /// Dates for offsets `0..count` in a single forward walk.
    ///
    /// Element `k` equals `add_business_days(start, k)`, so element 0 is
    /// `start` itself. Every business day costs at least one calendar step,
    /// so a `count` above the ceiling is refused before allocating.
    pub fn offset_dates(&self, start: NaiveDate, count: usize) -> Result<Vec<NaiveDate>, CalendarError> {
        if u64::try_from(count).map_or(true, |c| c > u64::from(self.walk_limit_days)) {
            return Err(CalendarError::RangeTooLarge {
                limit: self.walk_limit_days,
            });
        }
        let mut dates = Vec::with_capacity(count);
        if count == 0 {
            return Ok(dates);
        }
        dates.push(start);
        let mut walk = self.walk();
        let mut date = start;
        while dates.len() < count {
            date = walk.step(date, true)?;
            if self.is_business_day(date) {
                dates.push(date);
            }
        }
        Ok(dates)
    }

    fn seek(&self, date: NaiveDate, forward: bool) -> Result<NaiveDate, CalendarError> {
        let mut walk = self.walk();
        let mut current = date;
        while !self.is_business_day(current) {
            current = walk.step(current, forward)?;
        }
        Ok(current)
    }

    fn walk(&self) -> Walk {
        Walk {
            limit: self.walk_limit_days,
            taken: 0,
        }
    }
}

/// Step counter shared by all day-by-day loops.
struct Walk {
    limit: u32,
    taken: u32,
}

impl Walk {
    fn step(&mut self, date: NaiveDate, forward: bool) -> Result<NaiveDate, CalendarError> {
        let exceeded = CalendarError::RangeTooLarge { limit: self.limit };
        if self.taken >= self.limit {
            return Err(exceeded);
        }
        self.taken += 1;
        let next = if forward { date.succ_opt() } else { date.pred_opt() };
        next.ok_or(exceeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn holidays(dates: &[&str]) -> HolidaySet {
        dates.iter().copied().collect()
    }

    #[test]
    fn weekends_are_not_business_days() {
        let none = HolidaySet::new();
        let cal = BusinessCalendar::new(&none);
        assert!(cal.is_business_day(d(2025, 1, 10))); // Friday
        assert!(!cal.is_business_day(d(2025, 1, 11))); // Saturday
        assert!(!cal.is_business_day(d(2025, 1, 12))); // Sunday
        assert!(cal.is_business_day(d(2025, 1, 13))); // Monday
    }

    #[test]
    fn holidays_are_not_business_days() {
        let set = holidays(&["2025-01-08"]);
        let cal = BusinessCalendar::new(&set);
        assert!(!cal.is_business_day(d(2025, 1, 8)));
        assert!(cal.is_business_day(d(2025, 1, 9)));
    }

    #[test]
    fn add_five_skips_weekend() {
        let none = HolidaySet::new();
        let cal = BusinessCalendar::new(&none);
        assert_eq!(cal.add_business_days(d(2025, 1, 6), 5).unwrap(), d(2025, 1, 13));
    }

    #[test]
    fn add_five_consumes_holiday() {
        let set = holidays(&["2025-01-08"]);
        let cal = BusinessCalendar::new(&set);
        assert_eq!(cal.add_business_days(d(2025, 1, 6), 5).unwrap(), d(2025, 1, 14));
    }

    #[test]
    fn add_zero_keeps_non_business_start() {
        let none = HolidaySet::new();
        let cal = BusinessCalendar::new(&none);
        assert_eq!(cal.add_business_days(d(2025, 1, 11), 0).unwrap(), d(2025, 1, 11));
    }

    #[test]
    fn add_negative_walks_backward() {
        let none = HolidaySet::new();
        let cal = BusinessCalendar::new(&none);
        // Monday minus one business day is the previous Friday.
        assert_eq!(cal.add_business_days(d(2025, 1, 13), -1).unwrap(), d(2025, 1, 10));
        assert_eq!(cal.add_business_days(d(2025, 1, 13), -5).unwrap(), d(2025, 1, 6));
    }

    #[test]
    fn add_from_weekend_lands_on_business_day() {
        let none = HolidaySet::new();
        let cal = BusinessCalendar::new(&none);
        assert_eq!(cal.add_business_days(d(2025, 1, 11), 1).unwrap(), d(2025, 1, 13));
    }

    #[test]
    fn diff_counts_landed_business_days() {
        let set = holidays(&["2025-01-08"]);
        let cal = BusinessCalendar::new(&set);
        assert_eq!(cal.diff_business_days(d(2025, 1, 6), d(2025, 1, 14)).unwrap(), 5);
        assert_eq!(cal.diff_business_days(d(2025, 1, 14), d(2025, 1, 6)).unwrap(), -5);
        assert_eq!(cal.diff_business_days(d(2025, 1, 6), d(2025, 1, 6)).unwrap(), 0);
    }

    #[test]
    fn diff_from_weekend_start() {
        let none = HolidaySet::new();
        let cal = BusinessCalendar::new(&none);
        // Saturday to Monday lands on one business day.
        assert_eq!(cal.diff_business_days(d(2025, 1, 11), d(2025, 1, 13)).unwrap(), 1);
        // Saturday to Sunday lands on none.
        assert_eq!(cal.diff_business_days(d(2025, 1, 11), d(2025, 1, 12)).unwrap(), 0);
    }

    #[test]
    fn next_business_day_never_walks_backward() {
        let set = holidays(&["2025-01-13"]);
        let cal = BusinessCalendar::new(&set);
        assert_eq!(cal.next_business_day(d(2025, 1, 11)).unwrap(), d(2025, 1, 14));
        assert_eq!(cal.next_business_day(d(2025, 1, 10)).unwrap(), d(2025, 1, 10));
    }

    #[test]
    fn snap_directions() {
        let none = HolidaySet::new();
        let cal = BusinessCalendar::new(&none);
        let saturday = d(2025, 1, 11);
        assert_eq!(cal.snap(saturday, SnapDirection::Forward).unwrap(), d(2025, 1, 13));
        assert_eq!(cal.snap(saturday, SnapDirection::Backward).unwrap(), d(2025, 1, 10));
        assert_eq!(cal.snap(saturday, SnapDirection::Nearest).unwrap(), d(2025, 1, 13));
    }

    #[test]
    fn snap_leaves_business_days_alone() {
        let none = HolidaySet::new();
        let cal = BusinessCalendar::new(&none);
        for direction in [SnapDirection::Forward, SnapDirection::Backward, SnapDirection::Nearest] {
            assert_eq!(cal.snap(d(2025, 1, 8), direction).unwrap(), d(2025, 1, 8));
        }
    }

    #[test]
    fn date_range_is_inclusive_and_ascending() {
        let none = HolidaySet::new();
        let cal = BusinessCalendar::new(&none);
        let range = cal.date_range(d(2024, 2, 27), d(2024, 3, 1)).unwrap();
        assert_eq!(
            range,
            vec![d(2024, 2, 27), d(2024, 2, 28), d(2024, 2, 29), d(2024, 3, 1)]
        );
        assert_eq!(cal.date_range(d(2024, 3, 1), d(2024, 3, 1)).unwrap().len(), 1);
        assert!(cal.date_range(d(2024, 3, 2), d(2024, 3, 1)).unwrap().is_empty());
    }

    #[test]
    fn offset_dates_match_add_business_days() {
        let set = holidays(&["2025-01-08"]);
        let cal = BusinessCalendar::new(&set);
        let start = d(2025, 1, 4); // Saturday
        let dates = cal.offset_dates(start, 8).unwrap();
        assert_eq!(dates.len(), 8);
        for (k, date) in dates.iter().enumerate() {
            assert_eq!(*date, cal.add_business_days(start, k as i64).unwrap());
        }
        assert!(cal.offset_dates(start, 0).unwrap().is_empty());
    }

    #[test]
    fn walk_limit_stops_large_offsets() {
        let none = HolidaySet::new();
        let cal = BusinessCalendar::new(&none).with_walk_limit(30);
        assert_eq!(
            cal.add_business_days(d(2025, 1, 6), 100).unwrap_err(),
            CalendarError::RangeTooLarge { limit: 30 }
        );
        assert!(cal.diff_business_days(d(2025, 1, 1), d(2025, 3, 1)).is_err());
        assert!(cal.date_range(d(2025, 1, 1), d(2025, 3, 1)).is_err());
        assert!(cal.add_business_days(d(2025, 1, 6), 20).is_ok());
    }

    #[test]
    fn offset_dates_refuses_counts_past_the_ceiling() {
        let none = HolidaySet::new();
        let cal = BusinessCalendar::new(&none).with_walk_limit(30);
        assert_eq!(
            cal.offset_dates(d(2025, 1, 6), usize::MAX).unwrap_err(),
            CalendarError::RangeTooLarge { limit: 30 }
        );
        assert!(cal.offset_dates(d(2025, 1, 6), 31).is_err());
        assert_eq!(cal.offset_dates(d(2025, 1, 6), 20).unwrap().len(), 20);
    }

    #[test]
    fn walk_limit_stops_all_holiday_calendars() {
        let dates: Vec<String> = (1..=31).map(|day| format!("2025-01-{day:02}")).collect();
        let set: HolidaySet = dates.into_iter().collect();
        let cal = BusinessCalendar::new(&set).with_walk_limit(20);
        assert!(cal.next_business_day(d(2025, 1, 1)).is_err());
    }
}
