use egui::{Color32, FontId, Rounding, Stroke, Visuals};

use presales_gantt::model::Phase;

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(22, 24, 30);
pub const BG_PANEL: Color32 = Color32::from_rgb(28, 31, 38);
pub const BG_HEADER: Color32 = Color32::from_rgb(33, 37, 46);
pub const BG_HEADER_MAJOR: Color32 = Color32::from_rgb(39, 44, 55);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(56, 132, 200, 48);
pub const BG_FIELD: Color32 = Color32::from_rgb(18, 20, 26);
pub const BG_STATUS: Color32 = Color32::from_rgb(24, 27, 33);
const BG_WIDGET: Color32 = Color32::from_rgb(40, 45, 55);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(48, 53, 64);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(78, 150, 214);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(226, 230, 237);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(150, 158, 172);
pub const TEXT_DIM: Color32 = Color32::from_rgb(98, 106, 120);
pub const TEXT_ON_BAR: Color32 = Color32::WHITE;

pub const ACCENT: Color32 = Color32::from_rgb(56, 132, 200);
pub const TODAY_LINE: Color32 = Color32::from_rgb(232, 80, 80);
pub const CRITICAL: Color32 = Color32::from_rgb(255, 96, 64);
pub const BASELINE: Color32 = Color32::from_rgb(150, 152, 170);
pub const LINK: Color32 = Color32::from_rgb(140, 150, 175);
pub const GRID_LINE: Color32 = Color32::from_rgb(42, 47, 57);

/// Drawn over the completed part of a bar.
pub const PROGRESS_OVERLAY: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 60);

// ── Sizes ────────────────────────────────────────────────────────────────────

/// Two stacked bands of `HEADER_BAND` each.
pub const HEADER_HEIGHT: f32 = 44.0;
pub const HEADER_BAND: f32 = HEADER_HEIGHT / 2.0;
pub const BAR_ROUNDING: f32 = 5.0;
pub const BASELINE_HEIGHT: f32 = 4.0;
pub const STATUS_BAR_HEIGHT: f32 = 24.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

pub fn font_menu() -> FontId {
    FontId::proportional(13.0)
}

pub fn font_status() -> FontId {
    FontId::proportional(11.0)
}

// ── Phase color palette ──────────────────────────────────────────────────────

pub const PHASE_COLORS: &[Color32] = &[
    Color32::from_rgb(66, 133, 244),  // blue
    Color32::from_rgb(52, 168, 83),   // green
    Color32::from_rgb(171, 71, 188),  // purple
    Color32::from_rgb(251, 140, 0),   // orange
    Color32::from_rgb(3, 169, 244),   // light blue
    Color32::from_rgb(0, 188, 212),   // cyan
    Color32::from_rgb(255, 193, 7),   // amber
];

/// `#rrggbb` or `rrggbb`.
pub fn parse_hex_color(s: &str) -> Option<Color32> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// The phase's own color, or a palette color picked by row.
pub fn phase_color(phase: &Phase, index: usize) -> Color32 {
    phase
        .color
        .as_deref()
        .and_then(parse_hex_color)
        .unwrap_or(PHASE_COLORS[index % PHASE_COLORS.len()])
}

// ── Visuals ──────────────────────────────────────────────────────────────────

const WIDGET_ROUNDING: f32 = 4.0;

fn widget(visuals: &mut egui::style::WidgetVisuals, fill: Color32, border: Color32, text: Stroke) {
    visuals.bg_fill = fill;
    visuals.weak_bg_fill = fill;
    visuals.bg_stroke = Stroke::new(1.0, border);
    visuals.fg_stroke = text;
    visuals.rounding = Rounding::same(WIDGET_ROUNDING);
}

/// Dark slate visuals for the whole viewer. Cheap enough to call every frame.
pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = BG_FIELD;
    visuals.faint_bg_color = BG_HEADER;

    let w = &mut visuals.widgets;
    widget(&mut w.noninteractive, BG_PANEL, BORDER_SUBTLE, Stroke::new(1.0, TEXT_SECONDARY));
    widget(&mut w.inactive, BG_WIDGET, BORDER_SUBTLE, Stroke::new(1.0, TEXT_PRIMARY));
    widget(&mut w.hovered, BG_WIDGET.gamma_multiply(1.25), ACCENT, Stroke::new(1.0, TEXT_PRIMARY));
    widget(&mut w.active, BG_WIDGET.gamma_multiply(1.5), ACCENT, Stroke::new(2.0, Color32::WHITE));
    w.open = w.hovered;

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, BORDER_ACCENT);
    visuals.window_rounding = Rounding::same(6.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.striped = false;
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(6.0, 4.0);
        style.spacing.button_padding = egui::vec2(8.0, 3.0);
        style.spacing.menu_margin = egui::Margin::same(6.0);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#4285f4"), Some(Color32::from_rgb(0x42, 0x85, 0xf4)));
        assert_eq!(parse_hex_color("ff0000"), Some(Color32::from_rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn palette_fallback_cycles() {
        let mut phase = Phase::new("a", "A", 0, 1);
        assert_eq!(phase_color(&phase, 0), PHASE_COLORS[0]);
        assert_eq!(phase_color(&phase, PHASE_COLORS.len() + 1), PHASE_COLORS[1]);
        phase.color = Some("#000000".to_string());
        assert_eq!(phase_color(&phase, 3), Color32::from_rgb(0, 0, 0));
    }
}
