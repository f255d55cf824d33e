use serde::{Deserialize, Serialize};

use crate::model::ViewMode;

/// Pixels per business day for each view mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityTable {
    pub week: f32,
    pub month: f32,
    pub quarter: f32,
}

impl Default for DensityTable {
    fn default() -> Self {
        Self {
            week: 40.0,
            month: 20.0,
            quarter: 8.0,
        }
    }
}

impl DensityTable {
    pub fn pixels_per_day(&self, mode: ViewMode) -> f32 {
        match mode {
            ViewMode::Week => self.week,
            ViewMode::Month => self.month,
            ViewMode::Quarter => self.quarter,
        }
    }
}

/// Static timeline geometry. Only the density varies with the view mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutSettings {
    pub densities: DensityTable,
    pub row_height: f32,
    pub bar_height: f32,
    /// Width reserved left of the canvas for phase labels.
    pub rail_width: f32,
    pub padding_left: f32,
    pub padding_right: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            densities: DensityTable::default(),
            row_height: 40.0,
            bar_height: 24.0,
            rail_width: 280.0,
            padding_left: 40.0,
            padding_right: 40.0,
        }
    }
}

impl LayoutSettings {
    /// Resolve the config for one zoom level.
    pub fn config_for(&self, view_mode: ViewMode) -> LayoutConfig {
        LayoutConfig {
            view_mode,
            pixels_per_day: self.densities.pixels_per_day(view_mode),
            row_height: self.row_height,
            bar_height: self.bar_height,
            rail_width: self.rail_width,
            padding_left: self.padding_left,
            padding_right: self.padding_right,
        }
    }
}

/// Geometry for one layout pass. Carries no phase-specific state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub view_mode: ViewMode,
    pub pixels_per_day: f32,
    pub row_height: f32,
    pub bar_height: f32,
    pub rail_width: f32,
    pub padding_left: f32,
    pub padding_right: f32,
}

impl LayoutConfig {
    pub fn x_for_offset(&self, bd: i64) -> f32 {
        self.padding_left + self.span_width(bd)
    }

    pub fn span_width(&self, bd: i64) -> f32 {
        bd as f32 * self.pixels_per_day
    }

    /// Nearest offset to a canvas x coordinate.
    pub fn offset_at_x(&self, x: f32) -> i64 {
        ((x - self.padding_left) / self.pixels_per_day).round() as i64
    }

    pub fn row_top(&self, index: usize) -> f32 {
        index as f32 * self.row_height
    }

    pub fn row_center(&self, index: usize) -> f32 {
        self.row_top(index) + self.row_height / 2.0
    }

    /// Top edge of a bar vertically centred in its row.
    pub fn bar_top(&self, index: usize) -> f32 {
        self.row_top(index) + (self.row_height - self.bar_height) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coarser_modes_are_denser() {
        let table = DensityTable::default();
        assert!(table.pixels_per_day(ViewMode::Week) > table.pixels_per_day(ViewMode::Month));
        assert!(table.pixels_per_day(ViewMode::Month) > table.pixels_per_day(ViewMode::Quarter));
    }

    #[test]
    fn config_only_varies_in_density() {
        let settings = LayoutSettings::default();
        let week = settings.config_for(ViewMode::Week);
        let quarter = settings.config_for(ViewMode::Quarter);
        assert_eq!(week.pixels_per_day, 40.0);
        assert_eq!(quarter.pixels_per_day, 8.0);
        assert_eq!(week.row_height, quarter.row_height);
        assert_eq!(week.padding_left, quarter.padding_left);
        assert_eq!(settings.config_for(ViewMode::Month), settings.config_for(ViewMode::Month));
    }

    #[test]
    fn partial_settings_fill_defaults() {
        let settings: LayoutSettings =
            serde_json::from_str(r#"{ "densities": { "week": 50.0 }, "rowHeight": 32.0 }"#).unwrap();
        assert_eq!(settings.densities.week, 50.0);
        assert_eq!(settings.densities.month, 20.0);
        assert_eq!(settings.row_height, 32.0);
        assert_eq!(settings.padding_right, 40.0);
    }
}
