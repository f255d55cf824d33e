use std::path::PathBuf;

use chrono::{NaiveDate, Utc};

use presales_gantt::calendar::{
    format_iso_date, is_weekend, parse_iso_date, BusinessCalendar, CalendarError, HolidaySet, SnapDirection,
};
use presales_gantt::io::{csv_export, csv_import, load_project, save_project};
use presales_gantt::layout::{LayoutCache, TimelineEngine};
use presales_gantt::model::validate::{dangling_dependencies, find_dependency_cycle};
use presales_gantt::model::{DependencyKind, Phase, Project, ViewMode};
use presales_gantt::settings::AppSettings;

use crate::ui;

/// Main application state.
pub struct GanttApp {
    pub project: Project,
    pub view_mode: ViewMode,
    pub file_path: Option<PathBuf>,
    pub selected_phase: Option<String>,

    // Dialog state
    pub show_about: bool,
    pub show_csv_help: bool,
    pub show_holidays: bool,
    pub new_holiday: NaiveDate,
    pub start_date_picker: NaiveDate,

    // Status message
    pub status_message: String,

    settings: AppSettings,
    settings_path: Option<PathBuf>,
    engine: TimelineEngine,
    cache: LayoutCache,
    hovered_bd: Option<i64>,
    last_error: Option<CalendarError>,
    issues: Option<Vec<String>>,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl GanttApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings_path = match AppSettings::default_path() {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "settings will not be persisted");
                None
            }
        };
        let settings = settings_path
            .as_deref()
            .map(AppSettings::load_or_default)
            .unwrap_or_default();
        let engine = settings.engine();
        let project = Self::sample_project(&engine);

        tracing::info!(
            view_mode = %settings.view_mode,
            walk_limit_days = engine.walk_limit_days,
            "viewer started"
        );

        let mut app = Self {
            project,
            view_mode: settings.view_mode,
            file_path: None,
            selected_phase: None,
            show_about: false,
            show_csv_help: false,
            show_holidays: false,
            new_holiday: today(),
            start_date_picker: today(),
            status_message: "Ready".to_string(),
            settings,
            settings_path,
            engine,
            cache: LayoutCache::new(),
            hovered_bd: None,
            last_error: None,
            issues: None,
        };
        app.sync_start_picker();
        app
    }

    /// A typical bid: workshops, fit-gap, demo, pricing and submission.
    fn sample_project(engine: &TimelineEngine) -> Project {
        let start = first_business_day(&HolidaySet::new(), engine, today());
        let mut project = Project::new("Sample Bid", format_iso_date(start));

        // Company offsite two and a half weeks in.
        let calendar = BusinessCalendar::new(&project.holidays).with_walk_limit(engine.walk_limit_days);
        if let Ok(offsite) = calendar.add_business_days(start, 12) {
            project.holidays.insert(format_iso_date(offsite));
        }

        let mut discovery = Phase::new("discovery", "Discovery workshops", 0, 5).with_baseline(0, 4);
        discovery.progress = 100.0;
        discovery.assignees = vec!["Solution architect".to_string()];

        let mut fit_gap = Phase::new("fit-gap", "Requirements & fit-gap", 5, 8).after("discovery");
        fit_gap.progress = 60.0;
        fit_gap.critical = true;

        let mut architecture = Phase::new("architecture", "Solution architecture", 7, 10)
            .with_dependency("fit-gap", DependencyKind::StartToStart);
        architecture.progress = 20.0;

        let mut demo = Phase::new("demo", "Demo build", 13, 10).after("fit-gap").with_baseline(12, 8);
        demo.critical = true;
        demo.assignees = vec!["Presales engineer".to_string(), "UX".to_string()];

        let pricing = Phase::new("pricing", "Pricing & commercials", 17, 6)
            .with_dependency("demo", DependencyKind::FinishToFinish);

        let mut proposal = Phase::new("proposal", "Proposal writing", 20, 6).after("architecture");
        proposal.critical = true;

        let mut submission = Phase::new("submission", "Proposal submission", 26, 0)
            .after("proposal")
            .after("pricing");
        submission.critical = true;

        project.phases = vec![discovery, fit_gap, architecture, demo, pricing, proposal, submission];
        project
    }

    fn sync_start_picker(&mut self) {
        self.start_date_picker = parse_iso_date(&self.project.start_date).unwrap_or_else(|_| today());
    }

    fn calendar(&self) -> BusinessCalendar<'_> {
        BusinessCalendar::new(&self.project.holidays).with_walk_limit(self.engine.walk_limit_days)
    }

    fn persist_settings(&self) {
        if let Some(path) = &self.settings_path {
            if let Err(e) = self.settings.save(path) {
                tracing::warn!(error = %e, "failed to save settings");
            }
        }
    }

    // --- File operations ---

    pub fn new_project(&mut self) {
        let start = first_business_day(&HolidaySet::new(), &self.engine, today());
        self.project = Project::new("Untitled Project", format_iso_date(start));
        self.issues = None;
        self.file_path = None;
        self.selected_phase = None;
        self.sync_start_picker();
        self.status_message = "New project created".to_string();
    }

    pub fn open_project(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Gantt Project", &["gantt.json", "json"])
            .pick_file()
        {
            match load_project(&path) {
                Ok(project) => {
                    self.status_message = format!("Opened {} ({} phases)", project.name, project.phases.len());
                    self.project = project;
                    self.issues = None;
                    self.file_path = Some(path);
                    self.selected_phase = None;
                    self.sync_start_picker();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "open failed");
                    self.status_message = format!("Error opening: {}", e);
                }
            }
        }
    }

    pub fn save_project(&mut self) {
        if let Some(path) = self.file_path.clone() {
            self.project.touch();
            match save_project(&self.project, &path) {
                Ok(()) => self.status_message = "Project saved".to_string(),
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        } else {
            self.save_project_as();
        }
    }

    pub fn save_project_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Gantt Project", &["gantt.json", "json"])
            .set_file_name(format!("{}.gantt.json", self.project.name))
            .save_file()
        {
            self.project.touch();
            match save_project(&self.project, &path) {
                Ok(()) => {
                    self.file_path = Some(path);
                    self.status_message = "Project saved".to_string();
                }
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        }
    }

    /// Replace the phases from a CSV file. Start date and holidays stay.
    pub fn import_csv(&mut self) {
        if !self.project.phases.is_empty() {
            let confirm = rfd::MessageDialog::new()
                .set_title("Import CSV")
                .set_description("This will replace the current phases. Continue?")
                .set_buttons(rfd::MessageButtons::YesNo)
                .show();
            if confirm != rfd::MessageDialogResult::Yes {
                return;
            }
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            match csv_import::import_csv(&path) {
                Ok((phases, skipped)) => {
                    let count = phases.len();
                    self.project.phases = phases;
                    self.issues = None;
                    self.project.touch();
                    self.selected_phase = None;
                    self.status_message = if skipped > 0 {
                        format!("Imported {} phases ({} rows skipped)", count, skipped)
                    } else {
                        format!("Imported {} phases", count)
                    };
                }
                Err(e) => {
                    self.status_message = format!("CSV import failed: {}", e);
                }
            }
        }
    }

    pub fn export_csv(&mut self) {
        if self.project.phases.is_empty() {
            self.status_message = "Nothing to export, the project has no phases".to_string();
            return;
        }
        if let Err(e) = self.refresh_layout() {
            self.status_message = format!("CSV export failed: {}", e);
            return;
        }
        let Some(layout) = self.cache.last() else {
            return;
        };

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(format!("{}.csv", self.project.name))
            .save_file()
        {
            match csv_export::export_csv(&self.project.phases, layout, &path) {
                Ok(count) => self.status_message = format!("Exported {} phases to CSV", count),
                Err(e) => self.status_message = format!("CSV export failed: {}", e),
            }
        }
    }

    // --- Timeline operations ---

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.view_mode == mode {
            return;
        }
        self.view_mode = mode;
        self.settings.view_mode = mode;
        self.persist_settings();
        self.status_message = format!("{} view", mode.label());
    }

    /// Move the anchor date, snapping forward onto a business day.
    pub fn set_start_date(&mut self, date: NaiveDate) {
        let snapped = match self.calendar().snap(date, SnapDirection::Forward) {
            Ok(snapped) => snapped,
            Err(e) => {
                self.status_message = format!("Cannot move start: {}", e);
                self.sync_start_picker();
                return;
            }
        };
        self.project.start_date = format_iso_date(snapped);
        self.project.touch();
        self.start_date_picker = snapped;
        self.status_message = if snapped == date {
            format!("Project starts {}", self.project.start_date)
        } else {
            format!(
                "{} is not a business day, project starts {}",
                format_iso_date(date),
                self.project.start_date
            )
        };
    }

    pub fn add_holiday(&mut self, date: NaiveDate) {
        let iso = format_iso_date(date);
        if is_weekend(date) {
            self.status_message = format!("{} is a weekend day already", iso);
        } else if self.project.holidays.insert(iso.clone()) {
            self.project.touch();
            self.status_message = format!("Added holiday {}", iso);
        } else {
            self.status_message = format!("{} is already a holiday", iso);
        }
    }

    pub fn remove_holiday(&mut self, iso: &str) {
        if self.project.holidays.remove(iso) {
            self.project.touch();
            self.status_message = format!("Removed holiday {}", iso);
        }
    }

    /// Bring the cached layout and header up to date. Read them back
    /// through `self.cache.last()` and `self.cache.header()`.
    fn refresh_layout(&mut self) -> Result<(), CalendarError> {
        self.cache
            .get_or_compute(
                &self.engine,
                &self.project.start_date,
                &self.project.phases,
                &self.project.holidays,
                self.view_mode,
            )
            .map(|_| ())
    }

    fn today_offset(&self) -> Option<i64> {
        let start = parse_iso_date(&self.project.start_date).ok()?;
        self.calendar().diff_business_days(start, today()).ok()
    }

    fn hovered_label(&self) -> Option<String> {
        let bd = self.hovered_bd?;
        let start = parse_iso_date(&self.project.start_date).ok()?;
        let date = self
            .engine
            .projection(start, &self.project.holidays, self.view_mode)
            .date_for_offset(bd)
            .ok()?;
        Some(format!("Day {} ({})", bd, format_iso_date(date)))
    }

    /// Dangling ids and cycles. Phases only change when the whole list is
    /// replaced, which resets `issues`.
    fn refresh_issues(&mut self) {
        if self.issues.is_none() {
            self.issues = Some(collect_schedule_issues(&self.project.phases));
        }
    }
}

fn collect_schedule_issues(phases: &[Phase]) -> Vec<String> {
    let mut issues: Vec<String> = dangling_dependencies(phases)
        .into_iter()
        .map(|d| format!("'{}' depends on unknown '{}'", d.phase_id, d.missing_id))
        .collect();
    if let Some(cycle) = find_dependency_cycle(phases) {
        issues.push(format!("Dependency cycle: {}", cycle.join(" → ")));
    }
    issues
}

/// `date` or the next business day, falling back to `date` itself.
fn first_business_day(holidays: &HolidaySet, engine: &TimelineEngine, date: NaiveDate) -> NaiveDate {
    BusinessCalendar::new(holidays)
        .with_walk_limit(engine.walk_limit_days)
        .next_business_day(date)
        .unwrap_or(date)
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S)) {
            self.save_project();
        }

        let error = self.refresh_layout().err();
        if let Some(e) = &error {
            if self.last_error.as_ref() != Some(e) {
                tracing::warn!(error = %e, start_date = %self.project.start_date, "layout failed");
                self.status_message = format!("Layout failed: {}", e);
            }
        }
        self.last_error = error;
        self.refresh_issues();
        let today_bd = self.today_offset();

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        let hovered = self.hovered_label();
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_STATUS)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_status())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let config = self.engine.config_for(self.view_mode);
                        let mut parts = vec![
                            format!("Phases: {}", self.project.phases.len()),
                            format!("{} · {:.0} px/day", self.view_mode.label(), config.pixels_per_day),
                        ];
                        if let Some(hovered) = &hovered {
                            parts.push(hovered.clone());
                        }
                        // Added right to left.
                        for (i, part) in parts.iter().rev().enumerate() {
                            if i > 0 {
                                ui.label(egui::RichText::new(" · ").size(10.5).color(ui::theme::TEXT_DIM));
                            }
                            ui.label(egui::RichText::new(part).size(10.5).color(ui::theme::TEXT_DIM));
                        }
                    });
                });
            });

        // Left panel: phase table
        let rail_width = self.engine.config_for(self.view_mode).rail_width;
        let mut table_action = ui::phase_table::PhaseTableAction::None;
        egui::SidePanel::left("phase_panel")
            .default_width(rail_width)
            .min_width(rail_width * 0.6)
            .max_width(rail_width * 2.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                let rows = self.cache.last().map(|layout| layout.rows.as_slice()).unwrap_or(&[]);
                table_action = ui::phase_table::show_phase_table(
                    &self.project.phases,
                    rows,
                    self.selected_phase.as_deref(),
                    self.issues.as_deref().unwrap_or(&[]),
                    ui,
                );
            });

        if let ui::phase_table::PhaseTableAction::Select(id) = table_action {
            self.selected_phase = Some(id);
        }

        // Central panel: Gantt chart
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            match (self.cache.last(), self.cache.header(), &self.last_error) {
                (Some(layout), Some(header), None) => {
                    let view = ui::gantt_chart::ChartView {
                        phases: &self.project.phases,
                        layout,
                        header,
                        today_bd,
                    };
                    let interaction = ui::gantt_chart::show_gantt_chart(&view, &mut self.selected_phase, ui);
                    self.hovered_bd = interaction.hovered_bd;
                    if interaction.selection_changed {
                        if let Some(phase) = self.selected_phase.as_deref().and_then(|id| self.project.phase(id)) {
                            self.status_message = format!("Selected '{}'", phase.name);
                        }
                    }
                }
                (_, _, error) => {
                    self.hovered_bd = None;
                    let reason = error.as_ref().map(ToString::to_string).unwrap_or_default();
                    ui.centered_and_justified(|ui| {
                        ui.label(
                            egui::RichText::new(format!("Cannot lay out timeline: {}", reason))
                                .color(ui::theme::TODAY_LINE),
                        );
                    });
                }
            }
        });

        // Dialogs
        if self.show_holidays {
            ui::dialogs::show_holidays_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
        if self.show_csv_help {
            ui::dialogs::show_csv_help_dialog(self, ctx);
        }
    }
}
