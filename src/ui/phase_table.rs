use egui::{Color32, RichText, Ui};

use presales_gantt::layout::Row;
use presales_gantt::model::Phase;

use crate::ui::theme;

/// Actions that the phase table can request.
pub enum PhaseTableAction {
    None,
    Select(String),
}

/// `2025-01-06` → `01/06`.
fn short_date(iso: &str) -> String {
    iso.get(5..).map(|md| md.replace('-', "/")).unwrap_or_else(|| iso.to_string())
}

/// Render the left-side phase table panel.
///
/// `rows` comes from the current layout and supplies the resolved dates;
/// `issues` lists schedule problems to surface above the table.
pub fn show_phase_table(
    phases: &[Phase],
    rows: &[Row],
    selected: Option<&str>,
    issues: &[String],
    ui: &mut Ui,
) -> PhaseTableAction {
    let mut action = PhaseTableAction::None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new("Phases").strong().size(15.0).color(theme::TEXT_PRIMARY));
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({})", phases.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);

    if !issues.is_empty() {
        egui::Frame::none()
            .fill(Color32::from_rgba_premultiplied(60, 20, 16, 120))
            .rounding(egui::Rounding::same(4.0))
            .inner_margin(egui::Margin::symmetric(6.0, 4.0))
            .show(ui, |ui| {
                for issue in issues {
                    ui.label(RichText::new(format!("⚠ {issue}")).size(11.0).color(theme::CRITICAL));
                }
            });
        ui.add_space(4.0);
    }

    ui.separator();
    ui.add_space(2.0);

    ui.horizontal(|ui| {
        ui.add_space(12.0);
        ui.spacing_mut().item_spacing.x = 4.0;
        let hdr = |ui: &mut Ui, text: &str, width: f32| {
            ui.allocate_ui(egui::vec2(width, 16.0), |ui| {
                ui.label(RichText::new(text).size(9.0).color(theme::TEXT_DIM).strong());
            });
        };
        hdr(ui, "PHASE", 110.0);
        hdr(ui, "START", 40.0);
        hdr(ui, "END", 40.0);
        hdr(ui, "DONE", 55.0);
    });

    ui.add_space(2.0);

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (i, phase) in phases.iter().enumerate() {
                let is_selected = selected == Some(phase.id.as_str());
                let color = theme::phase_color(phase, i);
                let row_bg = if is_selected {
                    theme::BG_SELECTED
                } else if i % 2 == 0 {
                    theme::BG_PANEL
                } else {
                    theme::BG_DARK
                };

                let frame = egui::Frame {
                    fill: row_bg,
                    rounding: egui::Rounding::same(4.0),
                    inner_margin: egui::Margin::symmetric(6.0, 4.0),
                    outer_margin: egui::Margin::ZERO,
                    stroke: egui::Stroke::NONE,
                    shadow: egui::epaint::Shadow::NONE,
                };

                let frame_resp = frame.show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.spacing_mut().item_spacing.x = 6.0;

                        let (dot_rect, _) = ui.allocate_exact_size(egui::vec2(6.0, 6.0), egui::Sense::hover());
                        ui.painter().circle_filled(dot_rect.center(), 3.0, color);

                        let name = if phase.is_milestone() {
                            format!("◆ {}", phase.name)
                        } else {
                            phase.name.clone()
                        };
                        let name_color = if is_selected { Color32::WHITE } else { theme::TEXT_PRIMARY };
                        ui.add(egui::Label::new(RichText::new(name).size(12.0).color(name_color)).truncate());

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.spacing_mut().item_spacing.x = 4.0;

                            if phase.critical {
                                ui.label(RichText::new("CP").size(9.0).strong().color(theme::CRITICAL))
                                    .on_hover_text("On the critical path");
                            }

                            let pbar = egui::ProgressBar::new((phase.progress / 100.0).clamp(0.0, 1.0))
                                .desired_width(48.0)
                                .fill(color)
                                .rounding(egui::Rounding::same(3.0));
                            ui.add(pbar);

                            if let Some(row) = rows.get(i).filter(|r| r.id == phase.id) {
                                ui.label(
                                    RichText::new(short_date(&row.end_date))
                                        .size(10.0)
                                        .color(theme::TEXT_SECONDARY),
                                );
                                ui.label(RichText::new("→").size(9.0).color(theme::TEXT_DIM));
                                ui.label(
                                    RichText::new(short_date(&row.start_date))
                                        .size(10.0)
                                        .color(theme::TEXT_SECONDARY),
                                );
                            }
                        });
                    });
                });

                let row_click = ui.interact(
                    frame_resp.response.rect,
                    egui::Id::new(("phase-row", &phase.id)),
                    egui::Sense::click(),
                );
                if row_click.clicked() {
                    action = PhaseTableAction::Select(phase.id.clone());
                }

                ui.add_space(1.0);
            }
        });

    action
}

#[cfg(test)]
mod tests {
    use super::short_date;

    #[test]
    fn short_dates() {
        assert_eq!(short_date("2025-01-06"), "01/06");
        assert_eq!(short_date("bad"), "bad");
    }
}
