use egui::epaint::CubicBezierShape;
use egui::{Color32, Painter, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};

use presales_gantt::layout::{HeaderBands, Link, PeriodLabel, Point, Row, TimelineLayout};
use presales_gantt::model::Phase;

use crate::ui::theme;

const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;

/// Inputs for one frame of the chart. All geometry is precomputed.
pub struct ChartView<'a> {
    pub phases: &'a [Phase],
    pub layout: &'a TimelineLayout,
    pub header: &'a HeaderBands,
    /// Business-day offset of today from the project start, if resolvable.
    pub today_bd: Option<i64>,
}

/// Result details from interactions in the Gantt chart.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    pub selection_changed: bool,
    /// Business-day offset under the pointer.
    pub hovered_bd: Option<i64>,
}

/// Render the Gantt chart area (central panel).
pub fn show_gantt_chart(view: &ChartView<'_>, selected: &mut Option<String>, ui: &mut Ui) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let layout = view.layout;
    let available = ui.available_size();
    let chart_width = layout.total_width.max(available.x);
    let chart_height = HEADER_HEIGHT + layout.total_height + 40.0;

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(chart_width, chart_height.max(available.y)),
                Sense::click(),
            );
            let origin = response.rect.min;
            let canvas_bottom = response.rect.bottom();
            let mut consumed_click = false;

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

            draw_row_stripes(&painter, origin, layout, chart_width, selected.as_deref());
            draw_header(&painter, origin, view.header, chart_width, canvas_bottom);

            for link in &layout.links {
                draw_link(&painter, origin, link);
            }

            for row in &layout.rows {
                let phase = row.phase(view.phases);
                let is_selected = selected.as_deref() == Some(row.id.as_str());
                let hit_rect = if row.width <= 0.0 {
                    draw_milestone(&painter, origin, layout, row, phase, is_selected)
                } else {
                    draw_phase_bar(&painter, origin, layout, row, phase, is_selected)
                };

                let bar_response = ui.interact(
                    hit_rect.expand(3.0),
                    ui.make_persistent_id(("phase-bar", &row.id)),
                    Sense::click(),
                );
                if bar_response.clicked() {
                    if !is_selected {
                        interaction.selection_changed = true;
                    }
                    *selected = Some(row.id.clone());
                    consumed_click = true;
                }
                if bar_response.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        egui::Id::new(("phase-tip", &row.id)),
                        |ui| phase_tooltip(ui, row, phase),
                    );
                }
            }

            if let Some(bd) = view.today_bd {
                draw_today_line(&painter, origin, layout.config.x_for_offset(bd), chart_width, canvas_bottom);
            }

            if let Some(pos) = response.hover_pos() {
                interaction.hovered_bd = Some(layout.config.offset_at_x(pos.x - origin.x));
            }

            // Empty click on background clears selection
            if response.clicked() && !consumed_click && selected.is_some() {
                *selected = None;
                interaction.selection_changed = true;
            }
        });

    interaction
}

fn canvas_pos(origin: Pos2, p: Point) -> Pos2 {
    Pos2::new(origin.x + p.x, origin.y + HEADER_HEIGHT + p.y)
}

fn draw_row_stripes(
    painter: &Painter,
    origin: Pos2,
    layout: &TimelineLayout,
    width: f32,
    selected: Option<&str>,
) {
    let config = &layout.config;
    for row in &layout.rows {
        let y = origin.y + HEADER_HEIGHT + config.row_top(row.index);
        let rect = Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(width, config.row_height));
        let fill = if selected == Some(row.id.as_str()) {
            theme::BG_SELECTED
        } else if row.index % 2 == 0 {
            theme::BG_PANEL
        } else {
            theme::BG_DARK
        };
        painter.rect_filled(rect, 0.0, fill);
        painter.line_segment(
            [rect.left_bottom(), rect.right_bottom()],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }
}

fn draw_header(painter: &Painter, origin: Pos2, header: &HeaderBands, width: f32, bottom: f32) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );

    let major_top = origin.y;
    let minor_top = origin.y + theme::HEADER_BAND;

    for label in &header.major {
        draw_period(painter, origin, label, major_top, theme::font_header(), theme::TEXT_PRIMARY, true);
    }
    for label in &header.minor {
        draw_period(painter, origin, label, minor_top, theme::font_sub(), theme::TEXT_SECONDARY, false);
        let x = origin.x + label.start_x;
        painter.line_segment(
            [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, bottom)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    }

    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

fn draw_period(
    painter: &Painter,
    origin: Pos2,
    label: &PeriodLabel,
    top: f32,
    font: egui::FontId,
    color: Color32,
    major: bool,
) {
    let rect = Rect::from_min_size(
        Pos2::new(origin.x + label.start_x, top),
        Vec2::new(label.width, theme::HEADER_BAND),
    );
    if major {
        painter.rect_filled(rect.shrink2(Vec2::new(0.5, 0.0)), 0.0, theme::BG_HEADER_MAJOR);
    }
    painter.line_segment([rect.left_top(), rect.left_bottom()], Stroke::new(1.0, theme::BORDER_SUBTLE));

    // Narrow periods at coarse zoom would smear their labels into each other.
    let galley = painter.layout_no_wrap(label.label.clone(), font, color);
    if galley.size().x + 6.0 > rect.width() {
        return;
    }
    let text_y = rect.top() + (rect.height() - galley.size().y) / 2.0;
    painter.with_clip_rect(rect).galley(
        Pos2::new(rect.left() + 4.0, text_y),
        galley,
        Color32::TRANSPARENT,
    );
}

fn draw_link(painter: &Painter, origin: Pos2, link: &Link) {
    let [from, c1, c2, to] = link.path.points().map(|p| canvas_pos(origin, p));
    let stroke = Stroke::new(1.3, theme::LINK);
    painter.add(CubicBezierShape::from_points_stroke(
        [from, c1, c2, to],
        false,
        Color32::TRANSPARENT,
        stroke,
    ));

    // The curve enters horizontally, so the head points along x.
    let dir = if to.x >= c2.x { 1.0 } else { -1.0 };
    let head = vec![
        to,
        Pos2::new(to.x - dir * 6.0, to.y - 3.5),
        Pos2::new(to.x - dir * 6.0, to.y + 3.5),
    ];
    painter.add(egui::Shape::convex_polygon(head, theme::LINK, Stroke::NONE));
}

fn draw_phase_bar(
    painter: &Painter,
    origin: Pos2,
    layout: &TimelineLayout,
    row: &Row,
    phase: Option<&Phase>,
    is_selected: bool,
) -> Rect {
    let config = &layout.config;
    let top = origin.y + HEADER_HEIGHT + config.bar_top(row.index);
    let bar_rect = Rect::from_min_size(
        Pos2::new(origin.x + row.start_x, top),
        Vec2::new(row.width.max(2.0), config.bar_height),
    );
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    let color = phase
        .map(|p| theme::phase_color(p, row.index))
        .unwrap_or(theme::ACCENT);

    if let Some(baseline) = &row.baseline {
        let rect = Rect::from_min_size(
            Pos2::new(origin.x + baseline.start_x, bar_rect.bottom() + 1.0),
            Vec2::new(baseline.width.max(2.0), theme::BASELINE_HEIGHT),
        );
        painter.rect_filled(rect, Rounding::same(1.5), theme::BASELINE);
    }

    painter.rect_filled(bar_rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(bar_rect, rounding, color);

    if row.progress > 0.0 {
        let progress_width = bar_rect.width() * (row.progress / 100.0).clamp(0.0, 1.0);
        let progress_rect = Rect::from_min_size(bar_rect.min, Vec2::new(progress_width, bar_rect.height()));
        painter.rect_filled(progress_rect, rounding, theme::PROGRESS_OVERLAY);
    }

    if row.critical {
        painter.rect_stroke(bar_rect, rounding, Stroke::new(2.0, theme::CRITICAL));
    }
    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(2.0),
            Rounding::same(theme::BAR_ROUNDING + 2.0),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if let Some(phase) = phase {
        if bar_rect.width() > 30.0 {
            let galley = painter.layout_no_wrap(phase.name.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
            let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
            painter.with_clip_rect(bar_rect).galley(
                Pos2::new(bar_rect.left() + 6.0, text_y),
                galley,
                Color32::TRANSPARENT,
            );
        }
    }

    bar_rect
}

fn draw_milestone(
    painter: &Painter,
    origin: Pos2,
    layout: &TimelineLayout,
    row: &Row,
    phase: Option<&Phase>,
    is_selected: bool,
) -> Rect {
    let config = &layout.config;
    let center = Pos2::new(
        origin.x + row.start_x,
        origin.y + HEADER_HEIGHT + config.row_center(row.index),
    );
    let size = (config.bar_height / 2.0).max(6.0);
    let color = if row.critical {
        theme::CRITICAL
    } else {
        phase
            .map(|p| theme::phase_color(p, row.index))
            .unwrap_or(theme::ACCENT)
    };

    let points = vec![
        Pos2::new(center.x, center.y - size),
        Pos2::new(center.x + size, center.y),
        Pos2::new(center.x, center.y + size),
        Pos2::new(center.x - size, center.y),
    ];
    painter.add(egui::Shape::convex_polygon(points.clone(), color, Stroke::NONE));
    if is_selected {
        painter.add(egui::Shape::convex_polygon(
            points,
            Color32::TRANSPARENT,
            Stroke::new(2.0, theme::BORDER_ACCENT),
        ));
    }

    if let Some(phase) = phase {
        painter.text(
            Pos2::new(center.x + size + 6.0, center.y),
            egui::Align2::LEFT_CENTER,
            &phase.name,
            theme::font_bar(),
            theme::TEXT_SECONDARY,
        );
    }

    Rect::from_center_size(center, Vec2::splat(size * 2.0))
}

fn draw_today_line(painter: &Painter, origin: Pos2, x: f32, width: f32, bottom: f32) {
    if !(0.0..=width).contains(&x) {
        return;
    }
    let x = origin.x + x;
    painter.line_segment(
        [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, bottom)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, origin.y + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

fn phase_tooltip(ui: &mut Ui, row: &Row, phase: Option<&Phase>) {
    match phase {
        Some(phase) => {
            ui.strong(&phase.name);
            ui.label(format!("{} → {}", row.start_date, row.end_date));
            ui.label(format!("{} business days from day {}", phase.duration_bd, phase.start_bd));
            ui.label(format!("Progress: {:.0}%", phase.progress));
            if !phase.assignees.is_empty() {
                ui.label(format!("Assignees: {}", phase.assignees.join(", ")));
            }
            if let Some(baseline) = &row.baseline {
                ui.label(
                    egui::RichText::new(format!("Baseline: {} → {}", baseline.start_date, baseline.end_date))
                        .color(theme::TEXT_SECONDARY),
                );
            }
            if phase.critical {
                ui.label(egui::RichText::new("Critical path").color(theme::CRITICAL));
            }
        }
        None => {
            ui.strong(&row.id);
            ui.label(format!("{} → {}", row.start_date, row.end_date));
        }
    }
}
