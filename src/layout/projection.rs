use chrono::NaiveDate;
use serde::Serialize;

use super::config::LayoutConfig;
use crate::calendar::{format_iso_date, BusinessCalendar, CalendarError};

/// A horizontal span resolved to pixels and calendar labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarGeometry {
    pub start_x: f32,
    pub width: f32,
    pub start_date: String,
    pub end_date: String,
}

impl BarGeometry {
    pub fn end_x(&self) -> f32 {
        self.start_x + self.width
    }
}

/// Maps business-day offsets from the project start onto the canvas and
/// onto calendar dates.
///
/// Rows, links and header labels all go through this type, so a bar and
/// the header period above it can never disagree about where an offset
/// lands. The pixel half lives on [`LayoutConfig`] so a renderer holding
/// only a finished layout uses the same arithmetic.
#[derive(Debug, Clone, Copy)]
pub struct Projection<'a> {
    calendar: BusinessCalendar<'a>,
    start: NaiveDate,
    config: LayoutConfig,
}

impl<'a> Projection<'a> {
    pub fn new(calendar: BusinessCalendar<'a>, start: NaiveDate, config: LayoutConfig) -> Self {
        Self {
            calendar,
            start,
            config,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn calendar(&self) -> &BusinessCalendar<'a> {
        &self.calendar
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn x_for_offset(&self, bd: i64) -> f32 {
        self.config.x_for_offset(bd)
    }

    pub fn span_width(&self, bd: i64) -> f32 {
        self.config.span_width(bd)
    }

    pub fn offset_at_x(&self, x: f32) -> i64 {
        self.config.offset_at_x(x)
    }

    pub fn date_for_offset(&self, bd: i64) -> Result<NaiveDate, CalendarError> {
        self.calendar.add_business_days(self.start, bd)
    }

    /// Dates for offsets `0..count`, in one walk.
    pub fn offset_dates(&self, count: usize) -> Result<Vec<NaiveDate>, CalendarError> {
        self.calendar.offset_dates(self.start, count)
    }

    pub fn row_top(&self, index: usize) -> f32 {
        self.config.row_top(index)
    }

    pub fn row_center(&self, index: usize) -> f32 {
        self.config.row_center(index)
    }

    pub fn bar_top(&self, index: usize) -> f32 {
        self.config.bar_top(index)
    }

    /// Pixel span and date labels for `duration_bd` days from `start_bd`.
    ///
    /// Both labels come from the same offsets as the pixels, so the bar
    /// length and the labelled range always agree.
    pub fn bar(&self, start_bd: i64, duration_bd: u32) -> Result<BarGeometry, CalendarError> {
        let end_bd = start_bd
            .checked_add(i64::from(duration_bd))
            .ok_or(CalendarError::RangeTooLarge {
                limit: self.calendar.walk_limit_days(),
            })?;
        Ok(BarGeometry {
            start_x: self.x_for_offset(start_bd),
            width: self.span_width(i64::from(duration_bd)),
            start_date: format_iso_date(self.date_for_offset(start_bd)?),
            end_date: format_iso_date(self.date_for_offset(end_bd)?),
        })
    }
}
