use serde::{Deserialize, Serialize};

use crate::ui::theme::{PLACEHOLDER_NAME, Theme};
use crate::ui::tree::TreeMetrics;

/// Tunables read from `data/outliner.ron`. Missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlinerConfig {
    pub row_height: f32,
    /// Horizontal offset per depth level (pixels).
    pub indent: f32,
    /// Height share of the top and bottom drop bands, each.
    pub drop_edge_fraction: f32,
    /// Pointer travel before a press turns into a drag (pixels).
    pub drag_threshold: f32,
    pub placeholder_name: String,
    /// Pixels per scroll wheel line.
    pub scroll_speed: f32,
}

impl Default for OutlinerConfig {
    fn default() -> Self {
        Self {
            row_height: 18.0,
            indent: 14.0,
            drop_edge_fraction: 0.25,
            drag_threshold: 4.0,
            placeholder_name: PLACEHOLDER_NAME.to_string(),
            scroll_speed: 40.0,
        }
    }
}

impl OutlinerConfig {
    /// Replace out-of-range values with defaults, warning about each.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.row_height.is_nan() || self.row_height <= 0.0 {
            log::warn!("row_height {} is not positive, using {}", self.row_height, defaults.row_height);
            self.row_height = defaults.row_height;
        }
        if self.indent.is_nan() || self.indent < 0.0 {
            log::warn!("indent {} is negative, using {}", self.indent, defaults.indent);
            self.indent = defaults.indent;
        }
        // Two bands must leave room for a middle band.
        if self.drop_edge_fraction.is_nan()
            || self.drop_edge_fraction <= 0.0
            || self.drop_edge_fraction >= 0.5
        {
            log::warn!(
                "drop_edge_fraction {} outside (0, 0.5), using {}",
                self.drop_edge_fraction,
                defaults.drop_edge_fraction
            );
            self.drop_edge_fraction = defaults.drop_edge_fraction;
        }
        if self.drag_threshold.is_nan() || self.drag_threshold < 0.0 {
            self.drag_threshold = defaults.drag_threshold;
        }
        if self.placeholder_name.trim().is_empty() {
            self.placeholder_name = defaults.placeholder_name;
        }
        self
    }

    pub fn metrics(&self) -> TreeMetrics {
        TreeMetrics {
            row_height: self.row_height,
            indent: self.indent,
            drop_edge_fraction: self.drop_edge_fraction,
        }
    }

    pub fn theme(&self) -> Theme {
        Theme {
            placeholder_name: self.placeholder_name.clone(),
            ..Theme::default()
        }
    }
}
