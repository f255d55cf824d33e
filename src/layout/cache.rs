use super::{HeaderBands, TimelineEngine, TimelineLayout};
use crate::calendar::{CalendarError, HolidaySet};
use crate::model::{Phase, ViewMode};

#[derive(Debug)]
struct Entry {
    engine: TimelineEngine,
    start_date: String,
    phases: Vec<Phase>,
    holidays: HolidaySet,
    view_mode: ViewMode,
    layout: TimelineLayout,
    header: HeaderBands,
}

impl Entry {
    fn matches(
        &self,
        engine: &TimelineEngine,
        start_date: &str,
        phases: &[Phase],
        holidays: &HolidaySet,
        view_mode: ViewMode,
    ) -> bool {
        self.view_mode == view_mode
            && self.start_date == start_date
            && self.engine == *engine
            && self.holidays == *holidays
            && self.phases == phases
    }
}

/// Remembers the last layout, its header bands and their inputs, compared
/// by value.
///
/// Only successful passes are stored. A failed pass clears the entry, so
/// [`last`](Self::last) never returns geometry for inputs that no longer
/// lay out.
#[derive(Debug, Default)]
pub struct LayoutCache {
    entry: Option<Entry>,
    hits: u64,
    misses: u64,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(
        &mut self,
        engine: &TimelineEngine,
        start_date: &str,
        phases: &[Phase],
        holidays: &HolidaySet,
        view_mode: ViewMode,
    ) -> Result<&TimelineLayout, CalendarError> {
        let entry = match self.entry.take() {
            Some(entry) if entry.matches(engine, start_date, phases, holidays, view_mode) => {
                self.hits += 1;
                entry
            }
            _ => {
                let layout = engine.layout(start_date, phases, holidays, view_mode)?;
                let header = engine.header(start_date, layout.max_end_bd, holidays, view_mode)?;
                self.misses += 1;
                Entry {
                    engine: *engine,
                    start_date: start_date.to_string(),
                    phases: phases.to_vec(),
                    holidays: holidays.clone(),
                    view_mode,
                    layout,
                    header,
                }
            }
        };
        Ok(&self.entry.insert(entry).layout)
    }

    /// The last stored layout, if any.
    pub fn last(&self) -> Option<&TimelineLayout> {
        self.entry.as_ref().map(|e| &e.layout)
    }

    /// Header bands computed with the last stored layout.
    pub fn header(&self) -> Option<&HeaderBands> {
        self.entry.as_ref().map(|e| &e.header)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
