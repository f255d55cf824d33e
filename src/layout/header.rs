use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::projection::Projection;
use crate::calendar::{format_iso_date, CalendarError};
use crate::model::ViewMode;

/// Calendar grouping for one header band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    Quarter,
    Year,
}

impl Period {
    fn key(self, date: NaiveDate) -> (i32, u32) {
        match self {
            Period::Week => {
                let week = date.iso_week();
                (week.year(), week.week())
            }
            Period::Month => (date.year(), date.month()),
            Period::Quarter => (date.year(), date.month0() / 3 + 1),
            Period::Year => (date.year(), 0),
        }
    }

    fn label(self, date: NaiveDate) -> String {
        match self {
            Period::Week => format!("W{:02}", date.iso_week().week()),
            Period::Month => date.format("%b %Y").to_string(),
            Period::Quarter => format!("Q{} {}", date.month0() / 3 + 1, date.year()),
            Period::Year => date.year().to_string(),
        }
    }
}

/// One labelled period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodLabel {
    pub label: String,
    /// ISO date of the first business day in the span.
    pub start_date: String,
    pub start_bd: i64,
    pub span_bd: i64,
    pub start_x: f32,
    pub width: f32,
}

/// Two-line header: coarse groups over the primary periods.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderBands {
    pub major: Vec<PeriodLabel>,
    pub minor: Vec<PeriodLabel>,
}

/// `(major, minor)` period for a zoom level.
pub fn periods_for(view_mode: ViewMode) -> (Period, Period) {
    match view_mode {
        ViewMode::Week => (Period::Month, Period::Week),
        ViewMode::Month => (Period::Quarter, Period::Month),
        ViewMode::Quarter => (Period::Year, Period::Quarter),
    }
}

/// Labels covering offsets `0..max_end_bd`. Empty when nothing is
/// scheduled past the start.
pub fn period_labels(
    projection: &Projection<'_>,
    max_end_bd: i64,
    period: Period,
) -> Result<Vec<PeriodLabel>, CalendarError> {
    let count = usize::try_from(max_end_bd).unwrap_or(0);
    let dates = projection.offset_dates(count)?;
    Ok(group(projection, &dates, period))
}

pub fn header_bands(
    projection: &Projection<'_>,
    max_end_bd: i64,
    view_mode: ViewMode,
) -> Result<HeaderBands, CalendarError> {
    let count = usize::try_from(max_end_bd).unwrap_or(0);
    let dates = projection.offset_dates(count)?;
    let (major, minor) = periods_for(view_mode);
    Ok(HeaderBands {
        major: group(projection, &dates, major),
        minor: group(projection, &dates, minor),
    })
}

fn group(projection: &Projection<'_>, dates: &[NaiveDate], period: Period) -> Vec<PeriodLabel> {
    let mut labels: Vec<PeriodLabel> = Vec::new();
    let mut current_key = None;

    for (bd, date) in dates.iter().enumerate() {
        let bd = bd as i64;
        let key = period.key(*date);
        if current_key == Some(key) {
            if let Some(last) = labels.last_mut() {
                last.span_bd += 1;
                last.width = projection.span_width(last.span_bd);
                continue;
            }
        }
        current_key = Some(key);
        labels.push(PeriodLabel {
            label: period.label(*date),
            start_date: format_iso_date(*date),
            start_bd: bd,
            span_bd: 1,
            start_x: projection.x_for_offset(bd),
            width: projection.span_width(1),
        });
    }

    labels
}
