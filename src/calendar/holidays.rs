use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::iso::{format_iso_date, parse_iso_date};

/// A set of non-working dates, matched by exact ISO string.
///
/// Entries are kept verbatim. A malformed entry such as `"2025-1-8"` is
/// retained but can never match a real date, so it has no effect on the
/// calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidaySet {
    dates: BTreeSet<String>,
}

impl HolidaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a holiday. Returns `false` if it was already present.
    pub fn insert(&mut self, date: impl Into<String>) -> bool {
        let date = date.into();
        if parse_iso_date(&date).is_err() {
            tracing::debug!(entry = %date, "holiday entry is not a valid ISO date and will never match");
        }
        self.dates.insert(date)
    }

    pub fn remove(&mut self, date: &str) -> bool {
        self.dates.remove(date)
    }

    /// True iff the ISO rendering of `date` is in the set.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&format_iso_date(date))
    }

    /// Exact string lookup.
    pub fn contains_iso(&self, date: &str) -> bool {
        self.dates.contains(date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Entries in ascending string order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.dates.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for date in iter {
            set.insert(date);
        }
        set
    }
}

impl<S: Into<String>> Extend<S> for HolidaySet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for date in iter {
            self.insert(date);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_by_iso_rendering() {
        let set: HolidaySet = ["2025-01-08"].into_iter().collect();
        assert!(set.contains(NaiveDate::from_ymd_opt(2025, 1, 8).unwrap()));
        assert!(!set.contains(NaiveDate::from_ymd_opt(2025, 1, 9).unwrap()));
    }

    #[test]
    fn malformed_entries_never_match() {
        let set: HolidaySet = ["2025-1-8"].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert!(!set.contains(NaiveDate::from_ymd_opt(2025, 1, 8).unwrap()));
        assert!(set.contains_iso("2025-1-8"));
    }

    #[test]
    fn duplicate_insert_is_reported() {
        let mut set = HolidaySet::new();
        assert!(set.insert("2025-12-25"));
        assert!(!set.insert("2025-12-25"));
        assert!(set.remove("2025-12-25"));
        assert!(set.is_empty());
    }

    #[test]
    fn serializes_as_plain_list() {
        let set: HolidaySet = ["2025-12-26", "2025-12-25"].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["2025-12-25","2025-12-26"]"#);
        let back: HolidaySet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
