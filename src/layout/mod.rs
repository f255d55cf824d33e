mod cache;
mod config;
pub mod header;
mod links;
mod projection;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use cache::LayoutCache;
pub use config::{DensityTable, LayoutConfig, LayoutSettings};
pub use header::{HeaderBands, Period, PeriodLabel};
pub use links::{Link, LinkPath, Point};
pub use projection::{BarGeometry, Projection};

use crate::calendar::{parse_iso_date, BusinessCalendar, CalendarError, HolidaySet, DEFAULT_WALK_LIMIT_DAYS};
use crate::model::{Phase, ViewMode};

/// Pixel projection of one phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: String,
    /// Position of the source phase in the input list.
    pub index: usize,
    pub start_x: f32,
    pub width: f32,
    pub start_date: String,
    pub end_date: String,
    pub progress: f32,
    pub critical: bool,
    pub baseline: Option<BarGeometry>,
}

impl Row {
    pub fn end_x(&self) -> f32 {
        self.start_x + self.width
    }

    /// The phase this row was computed from.
    pub fn phase<'p>(&self, phases: &'p [Phase]) -> Option<&'p Phase> {
        phases.get(self.index).filter(|p| p.id == self.id)
    }
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineLayout {
    /// Same length and order as the input phases.
    pub rows: Vec<Row>,
    pub links: Vec<Link>,
    pub config: LayoutConfig,
    pub max_end_bd: i64,
    pub total_width: f32,
    pub total_height: f32,
}

/// Layout entry point, holding the density table and walk ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineEngine {
    pub settings: LayoutSettings,
    pub walk_limit_days: u32,
}

impl Default for TimelineEngine {
    fn default() -> Self {
        Self {
            settings: LayoutSettings::default(),
            walk_limit_days: DEFAULT_WALK_LIMIT_DAYS,
        }
    }
}

impl TimelineEngine {
    pub fn new(settings: LayoutSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn with_walk_limit(mut self, days: u32) -> Self {
        self.walk_limit_days = days;
        self
    }

    pub fn config_for(&self, view_mode: ViewMode) -> LayoutConfig {
        self.settings.config_for(view_mode)
    }

    pub fn projection<'a>(&self, start: NaiveDate, holidays: &'a HolidaySet, view_mode: ViewMode) -> Projection<'a> {
        let calendar = BusinessCalendar::new(holidays).with_walk_limit(self.walk_limit_days);
        Projection::new(calendar, start, self.config_for(view_mode))
    }

    /// Lay out `phases` in input order.
    ///
    /// # Errors
    ///
    /// Fails only on calendar problems: a malformed `start_date`, or an
    /// offset whose date walk exceeds the ceiling. Dangling dependencies,
    /// cycles, zero durations and negative offsets all produce geometry.
    pub fn layout(
        &self,
        start_date: &str,
        phases: &[Phase],
        holidays: &HolidaySet,
        view_mode: ViewMode,
    ) -> Result<TimelineLayout, CalendarError> {
        let start = parse_iso_date(start_date)?;
        let projection = self.projection(start, holidays, view_mode);
        let config = *projection.config();

        let rows = phases
            .iter()
            .enumerate()
            .map(|(index, phase)| row_for(&projection, index, phase))
            .collect::<Result<Vec<_>, _>>()?;
        let links = links::build_links(phases, &rows, &projection);

        let max_end_bd = phases.iter().map(Phase::end_bd).max().unwrap_or(0);
        let total_width =
            config.padding_left + projection.span_width(max_end_bd.max(0)) + config.padding_right;
        let total_height = phases.len() as f32 * config.row_height;

        tracing::trace!(
            phases = phases.len(),
            links = links.len(),
            %view_mode,
            max_end_bd,
            "timeline laid out"
        );

        Ok(TimelineLayout {
            rows,
            links,
            config,
            max_end_bd,
            total_width,
            total_height,
        })
    }

    /// Header labels for the same start date and zoom.
    pub fn header(
        &self,
        start_date: &str,
        max_end_bd: i64,
        holidays: &HolidaySet,
        view_mode: ViewMode,
    ) -> Result<HeaderBands, CalendarError> {
        let start = parse_iso_date(start_date)?;
        let projection = self.projection(start, holidays, view_mode);
        header::header_bands(&projection, max_end_bd, view_mode)
    }
}

fn row_for(projection: &Projection<'_>, index: usize, phase: &Phase) -> Result<Row, CalendarError> {
    let bar = projection.bar(phase.start_bd, phase.duration_bd)?;
    let baseline = phase
        .baseline
        .map(|b| projection.bar(b.start_bd, b.duration_bd))
        .transpose()?;

    Ok(Row {
        id: phase.id.clone(),
        index,
        start_x: bar.start_x,
        width: bar.width,
        start_date: bar.start_date,
        end_date: bar.end_date,
        progress: phase.progress,
        critical: phase.critical,
        baseline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DependencyKind;

    const MONDAY: &str = "2025-01-06";

    fn engine() -> TimelineEngine {
        TimelineEngine::default()
    }

    #[test]
    fn single_phase_week_geometry() {
        let phases = vec![Phase::new("a", "Discovery", 0, 4)];
        let layout = engine().layout(MONDAY, &phases, &HolidaySet::new(), ViewMode::Week).unwrap();
        let row = &layout.rows[0];
        assert_eq!(row.start_x, 40.0);
        assert_eq!(row.width, 160.0);
        assert_eq!(row.start_date, "2025-01-06");
        assert_eq!(row.end_date, "2025-01-10");
        assert_eq!(layout.max_end_bd, 4);
        assert_eq!(layout.total_width, 40.0 + 160.0 + 40.0);
        assert_eq!(layout.total_height, 40.0);
    }

    #[test]
    fn back_to_back_phases_touch() {
        let phases = vec![
            Phase::new("a", "Discovery", 0, 4),
            Phase::new("b", "Design", 4, 3).after("a"),
        ];
        let layout = engine().layout(MONDAY, &phases, &HolidaySet::new(), ViewMode::Week).unwrap();
        assert_eq!(layout.links.len(), 1);
        let link = &layout.links[0];
        assert_eq!(link.from_id, "a");
        assert_eq!(link.to_id, "b");
        assert_eq!(link.kind, DependencyKind::FinishToStart);
        assert_eq!(link.path.from.x, layout.rows[0].end_x());
        assert_eq!(link.path.to.x, layout.rows[1].start_x);
        assert_eq!(link.path.from.x, link.path.to.x);
        assert_eq!(link.path.from.y, 20.0);
        assert_eq!(link.path.to.y, 60.0);
    }

    #[test]
    fn empty_plan_is_padding_only() {
        let layout = engine().layout(MONDAY, &[], &HolidaySet::new(), ViewMode::Month).unwrap();
        assert!(layout.rows.is_empty());
        assert!(layout.links.is_empty());
        assert_eq!(layout.max_end_bd, 0);
        assert_eq!(layout.total_width, 80.0);
        assert_eq!(layout.total_height, 0.0);
    }

    #[test]
    fn dates_follow_holidays() {
        let holidays: HolidaySet = ["2025-01-08"].into_iter().collect();
        let phases = vec![Phase::new("a", "Discovery", 0, 5)];
        let layout = engine().layout(MONDAY, &phases, &holidays, ViewMode::Week).unwrap();
        assert_eq!(layout.rows[0].end_date, "2025-01-14");
        // Pixels count business days, so the holiday does not widen the bar.
        assert_eq!(layout.rows[0].width, 200.0);
    }

    #[test]
    fn baseline_uses_row_formulas() {
        let phases = vec![Phase::new("a", "Build", 3, 5).with_baseline(1, 4)];
        let layout = engine().layout(MONDAY, &phases, &HolidaySet::new(), ViewMode::Month).unwrap();
        let baseline = layout.rows[0].baseline.as_ref().unwrap();
        assert_eq!(baseline.start_x, 40.0 + 20.0);
        assert_eq!(baseline.width, 80.0);
        assert_eq!(baseline.start_date, "2025-01-07");
        assert_eq!(baseline.end_date, "2025-01-13");
    }

    #[test]
    fn progress_and_critical_pass_through() {
        let mut phase = Phase::new("a", "Build", 0, 5);
        phase.progress = 35.0;
        phase.critical = true;
        let layout = engine().layout(MONDAY, &[phase], &HolidaySet::new(), ViewMode::Week).unwrap();
        assert_eq!(layout.rows[0].progress, 35.0);
        assert!(layout.rows[0].critical);
    }

    #[test]
    fn dangling_dependency_is_dropped() {
        let phases = vec![
            Phase::new("a", "A", 0, 2),
            Phase::new("b", "B", 2, 2).after("ghost").after("a"),
        ];
        let layout = engine().layout(MONDAY, &phases, &HolidaySet::new(), ViewMode::Week).unwrap();
        assert_eq!(layout.links.len(), 1);
        assert_eq!(layout.links[0].from_id, "a");
    }

    #[test]
    fn cycles_render_without_looping() {
        let phases = vec![
            Phase::new("a", "A", 0, 2).after("b"),
            Phase::new("b", "B", 2, 2).after("a"),
            Phase::new("c", "C", 4, 2).after("c"),
        ];
        let layout = engine().layout(MONDAY, &phases, &HolidaySet::new(), ViewMode::Week).unwrap();
        assert_eq!(layout.links.len(), 3);
    }

    #[test]
    fn link_endpoints_follow_list_order() {
        let a = Phase::new("a", "A", 0, 2);
        let b = Phase::new("b", "B", 2, 2).after("a");
        let forward = engine()
            .layout(MONDAY, &[a.clone(), b.clone()], &HolidaySet::new(), ViewMode::Week)
            .unwrap();
        let reversed = engine().layout(MONDAY, &[b, a], &HolidaySet::new(), ViewMode::Week).unwrap();
        assert_eq!(forward.links[0].path.from.y, 20.0);
        assert_eq!(reversed.links[0].path.from.y, 60.0);
        assert_eq!(reversed.links[0].path.to.y, 20.0);
    }

    #[test]
    fn other_dependency_kinds_use_their_edges() {
        let phases = vec![
            Phase::new("a", "A", 0, 4),
            Phase::new("b", "B", 2, 6)
                .with_dependency("a", DependencyKind::StartToStart)
                .with_dependency("a", DependencyKind::FinishToFinish)
                .with_dependency("a", DependencyKind::StartToFinish),
        ];
        let layout = engine().layout(MONDAY, &phases, &HolidaySet::new(), ViewMode::Week).unwrap();
        let (a, b) = (&layout.rows[0], &layout.rows[1]);
        let xs: Vec<(f32, f32)> = layout.links.iter().map(|l| (l.path.from.x, l.path.to.x)).collect();
        assert_eq!(
            xs,
            vec![
                (a.start_x, b.start_x),
                (a.end_x(), b.end_x()),
                (a.start_x, b.end_x()),
            ]
        );
    }

    #[test]
    fn negative_start_and_zero_duration_are_well_defined() {
        let phases = vec![Phase::new("m", "Kickoff", -2, 0)];
        let layout = engine().layout(MONDAY, &phases, &HolidaySet::new(), ViewMode::Week).unwrap();
        let row = &layout.rows[0];
        assert_eq!(row.start_x, -40.0);
        assert_eq!(row.width, 0.0);
        assert_eq!(row.start_date, "2025-01-02");
        assert_eq!(row.start_date, row.end_date);
        assert_eq!(layout.max_end_bd, -2);
        assert_eq!(layout.total_width, 80.0);
    }

    #[test]
    fn malformed_start_date_is_an_error() {
        let phases = vec![Phase::new("a", "A", 0, 2)];
        let err = engine().layout("06/01/2025", &phases, &HolidaySet::new(), ViewMode::Week);
        assert!(matches!(err, Err(CalendarError::InvalidDate { .. })));
    }

    #[test]
    fn oversized_offset_hits_walk_limit() {
        let phases = vec![Phase::new("a", "A", 0, 400)];
        let err = engine()
            .with_walk_limit(100)
            .layout(MONDAY, &phases, &HolidaySet::new(), ViewMode::Quarter);
        assert_eq!(err.unwrap_err(), CalendarError::RangeTooLarge { limit: 100 });
    }

    #[test]
    fn extreme_offsets_are_errors_not_panics() {
        let phases = vec![Phase::new("a", "A", i64::MAX, 1)];
        let err = engine().layout(MONDAY, &phases, &HolidaySet::new(), ViewMode::Week);
        assert_eq!(err.unwrap_err(), CalendarError::RangeTooLarge { limit: DEFAULT_WALK_LIMIT_DAYS });

        let phases = vec![Phase::new("a", "A", i64::MIN, 0)];
        let err = engine().layout(MONDAY, &phases, &HolidaySet::new(), ViewMode::Week);
        assert_eq!(err.unwrap_err(), CalendarError::RangeTooLarge { limit: DEFAULT_WALK_LIMIT_DAYS });
    }

    #[test]
    fn header_past_the_ceiling_is_an_error() {
        let err = engine().header(MONDAY, i64::MAX, &HolidaySet::new(), ViewMode::Week);
        assert_eq!(err.unwrap_err(), CalendarError::RangeTooLarge { limit: DEFAULT_WALK_LIMIT_DAYS });
    }

    #[test]
    fn row_back_reference() {
        let phases = vec![Phase::new("a", "A", 0, 2), Phase::new("b", "B", 2, 2)];
        let layout = engine().layout(MONDAY, &phases, &HolidaySet::new(), ViewMode::Week).unwrap();
        assert_eq!(layout.rows[1].phase(&phases).map(|p| p.name.as_str()), Some("B"));
        assert!(layout.rows[1].phase(&phases[..1]).is_none());
    }

    #[test]
    fn header_shares_row_projection() {
        let phases = vec![Phase::new("a", "A", 0, 7), Phase::new("b", "B", 7, 5)];
        let holidays = HolidaySet::new();
        let layout = engine().layout(MONDAY, &phases, &holidays, ViewMode::Week).unwrap();
        let bands = engine().header(MONDAY, layout.max_end_bd, &holidays, ViewMode::Week).unwrap();
        let second_week = &bands.minor[1];
        assert_eq!(second_week.start_date, "2025-01-13");
        assert_eq!(second_week.start_x, layout.rows[0].start_x + 5.0 * 40.0);
        let last = bands.minor.last().unwrap();
        assert_eq!(last.start_x + last.width, layout.rows[1].end_x());
    }
}
