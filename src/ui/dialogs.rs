use egui::{Color32, Context, RichText, Window};

use presales_gantt::calendar::parse_iso_date;

use crate::app::GanttApp;
use crate::ui::theme;

fn modal(title: impl Into<egui::WidgetText>) -> Window<'static> {
    Window::new(title)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
}

/// A dialog closes on its button or on Escape.
fn dismissed(ctx: &Context, clicked: bool) -> bool {
    clicked || ctx.input(|i| i.key_pressed(egui::Key::Escape))
}

/// Render the "Holidays" dialog: the project's non-working dates.
pub fn show_holidays_dialog(app: &mut GanttApp, ctx: &Context) {
    let mut should_close = false;
    let mut remove: Option<String> = None;
    let mut add = false;

    modal(RichText::new("Holidays").strong().size(14.0))
        .resizable(false)
        .fixed_size([320.0, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            ui.add_space(4.0);
            ui.label(
                RichText::new("Weekends are always non-working. Dates listed here are skipped too.")
                    .small()
                    .color(theme::TEXT_SECONDARY),
            );
            ui.add_space(6.0);

            egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                if app.project.holidays.is_empty() {
                    ui.label(RichText::new("No holidays").color(theme::TEXT_DIM));
                }
                for date in app.project.holidays.iter() {
                    ui.horizontal(|ui| {
                        let weekday = parse_iso_date(date)
                            .map(|d| d.format("%a").to_string())
                            .unwrap_or_default();
                        ui.label(RichText::new(date).monospace());
                        ui.label(RichText::new(weekday).color(theme::TEXT_DIM));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let del = ui.add(
                                egui::Button::new(RichText::new("✕").size(10.0).color(theme::TEXT_DIM)).frame(false),
                            );
                            if del.on_hover_text("Remove holiday").clicked() {
                                remove = Some(date.to_string());
                            }
                        });
                    });
                }
            });

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                ui.add(egui_extras::DatePickerButton::new(&mut app.new_holiday).id_salt("dlg_holiday"));
                let add_btn = egui::Button::new(RichText::new("Add").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([60.0, 24.0], add_btn).clicked() {
                    add = true;
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.add_sized([70.0, 24.0], egui::Button::new("Close")).clicked() {
                        should_close = true;
                    }
                });
            });
            ui.add_space(2.0);
        });

    if add {
        app.add_holiday(app.new_holiday);
    }
    if let Some(date) = remove {
        app.remove_holiday(&date);
    }
    if dismissed(ctx, should_close) {
        app.show_holidays = false;
    }
}

pub fn show_about_dialog(app: &mut GanttApp, ctx: &Context) {
    let mut close = false;
    modal("About")
        .resizable(false)
        .fixed_size([300.0, 170.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(10.0);
                ui.heading(RichText::new("Presales Gantt").strong());
                ui.label(RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION"))).color(theme::TEXT_SECONDARY));
                ui.add_space(8.0);
                ui.label("Business-day timelines for presales plans.");
                ui.label(RichText::new("Weekends and project holidays are skipped.").small().color(theme::TEXT_DIM));
                ui.add_space(12.0);
                close = ui.add_sized([90.0, 26.0], egui::Button::new("Close")).clicked();
            });
        });
    if dismissed(ctx, close) {
        app.show_about = false;
    }
}

const CSV_COLUMNS: [(&str, &str, &str); 9] = [
    ("Name *", "Name, Phase, Task, Label, Title", "Any text"),
    ("Start *", "Start, Start BD, Offset", "Business days from project start"),
    ("Duration *", "Duration, Duration BD, Days, Length", "Whole business days, 0 for a milestone"),
    ("Id", "Id, Phase Id, Key", "Generated when missing"),
    ("Progress", "Progress, Complete, Done", "0 to 100, a trailing % is allowed"),
    ("Critical", "Critical, Critical Path", "true / yes / 1"),
    ("Depends On", "Depends On, Predecessors, After", "a|b:SS|c:FF"),
    ("Assignees", "Assignees, Owner, Resources", "alice|bob"),
    ("Baseline", "Baseline Start, Baseline Duration", "Business days"),
];

const CSV_EXAMPLE: &str = "Id;Name;Start;Duration;Progress;Depends On
disc;Discovery;0;4;100%;
design;Solution Design;4;6;40%;disc
demo;Demo Prep;6;5;0;design:SS
award;Award;15;0;0;demo";

/// Column reference for phase CSV import.
pub fn show_csv_help_dialog(app: &mut GanttApp, ctx: &Context) {
    let mut close = false;

    modal(RichText::new("CSV Import Format").strong().size(14.0))
        .resizable(true)
        .default_size([560.0, 440.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.label(
                    "Comma, semicolon and tab delimiters are detected. Headers are matched \
                     case-insensitively, ignoring spaces, hyphens and underscores.",
                );
                ui.add_space(6.0);

                egui::Grid::new("csv_columns")
                    .num_columns(3)
                    .striped(true)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for heading in ["Column", "Accepted headers", "Values"] {
                            ui.label(RichText::new(heading).color(theme::TEXT_SECONDARY));
                        }
                        ui.end_row();
                        for (column, headers, values) in CSV_COLUMNS {
                            ui.label(RichText::new(column).strong());
                            ui.label(headers);
                            ui.label(values);
                            ui.end_row();
                        }
                    });
                ui.add_space(6.0);
                ui.label(
                    RichText::new(
                        "* required. Dependency kinds are FS (default), SS, FF and SF. \
                         Rows missing a name, start or duration are skipped.",
                    )
                    .small()
                    .color(theme::TEXT_DIM),
                );
                ui.add_space(8.0);

                ui.label(RichText::new("Example").strong());
                egui::Frame::none()
                    .fill(theme::BG_FIELD)
                    .inner_margin(egui::Margin::same(6.0))
                    .rounding(egui::Rounding::same(4.0))
                    .show(ui, |ui| {
                        ui.label(RichText::new(CSV_EXAMPLE).monospace().size(11.0));
                    });
            });

            ui.separator();
            close = ui.add_sized([80.0, 26.0], egui::Button::new("Close")).clicked();
        });

    if dismissed(ctx, close) {
        app.show_csv_help = false;
    }
}
