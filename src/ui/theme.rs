/// Label shown for objects whose name is empty or whitespace.
pub const PLACEHOLDER_NAME: &str = "Untitled GameObject";

/// Centralized visual style constants for the outliner.
///
/// Rows read from Theme when producing their render description instead of
/// hardcoding colors.
#[derive(Debug, Clone)]
pub struct Theme {
    // -- Color palette (sRGB RGBA) --
    /// Accent blue: #3272EA
    pub blue: [f32; 4],
    /// Default control text: #C8C8C8
    pub control_text: [f32; 4],
    /// Text on selected rows.
    pub white: [f32; 4],
    /// Panel background: #262626
    pub background: [f32; 4],

    // -- Row painting --
    /// Base opacity of every row.
    pub row_opacity: f32,
    /// Opacity multiplier for inactive objects.
    pub inactive_opacity: f32,
    /// Opacity multiplier for rows that cannot take the current drag.
    pub drop_refused_opacity: f32,
    /// Alpha of the selection background (scaled by row opacity).
    pub selection_alpha: f32,
    /// Alpha of the drop indicator.
    pub drop_indicator_alpha: f32,
    /// Thickness of the top/bottom drop bar in pixels.
    pub drop_bar_height: f32,
    /// Corner radius of drop indicators in pixels.
    pub drop_corner_radius: f32,

    // -- Metrics --
    /// Left inset of the icon inside the row (pixels).
    pub icon_inset: f32,
    /// Icon glyph size (pixels).
    pub icon_size: f32,
    /// Horizontal advance from icon to label (pixels).
    pub icon_advance: f32,
    /// Label font size (pixels).
    pub font_size: f32,
    /// Width reserved left of a row for the expand/collapse arrow (pixels).
    pub expander_width: f32,

    // -- Labels --
    pub placeholder_name: String,
}

/// Convert a hex color (#RRGGBB) to sRGB [f32; 4] with alpha 1.0.
const fn hex(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            blue: hex(0x32, 0x72, 0xEA),
            control_text: hex(0xC8, 0xC8, 0xC8),
            white: hex(0xFF, 0xFF, 0xFF),
            background: hex(0x26, 0x26, 0x26),

            row_opacity: 0.9,
            inactive_opacity: 0.5,
            drop_refused_opacity: 0.23,
            selection_alpha: 0.4,
            drop_indicator_alpha: 0.2,
            drop_bar_height: 2.0,
            drop_corner_radius: 2.0,

            icon_inset: 4.0,
            icon_size: 14.0,
            icon_advance: 22.0,
            font_size: 9.0,
            expander_width: 14.0,

            placeholder_name: PLACEHOLDER_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette() {
        let t = Theme::default();

        // Blue #3272EA
        assert!((t.blue[0] - 0.196).abs() < 0.01);
        assert!((t.blue[1] - 0.447).abs() < 0.01);
        assert!((t.blue[2] - 0.918).abs() < 0.01);
        assert!((t.blue[3] - 1.0).abs() < 0.001);

        assert!((t.white[0] - 1.0).abs() < 0.001);
    }

    #[test]
    fn opacity_steps_are_ordered() {
        let t = Theme::default();
        let inactive = t.row_opacity * t.inactive_opacity;
        let refused = t.row_opacity * t.drop_refused_opacity;
        assert!(inactive < t.row_opacity);
        assert!(refused < inactive);
        assert!(t.row_opacity <= 1.0);
    }

    #[test]
    fn hex_conversion() {
        let black = hex(0x00, 0x00, 0x00);
        assert!(black[0].abs() < 0.001);
        assert!((black[3] - 1.0).abs() < 0.001);
    }
}
