use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::calendar::{format_iso_date, HolidaySet};

/// A presales plan: anchor date, non-working days and phases in row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    /// ISO date that business-day offset 0 refers to.
    pub start_date: String,
    #[serde(default)]
    pub holidays: HolidaySet,
    #[serde(default)]
    pub phases: Vec<Phase>,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub modified: DateTime<Utc>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            name: "Untitled Project".to_string(),
            start_date: format_iso_date(Utc::now().date_naive()),
            holidays: HolidaySet::new(),
            phases: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>, start_date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_date: start_date.into(),
            ..Default::default()
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    pub fn phase(&self, id: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }
}
