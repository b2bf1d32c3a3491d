use super::Rect;

/// Intermediate draw command for a filled rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelCommand {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub bg_color: [f32; 4], // sRGB RGBA
    pub corner_radius: f32,
}

impl PanelCommand {
    pub fn new(rect: Rect, bg_color: [f32; 4], corner_radius: f32) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            bg_color,
            corner_radius,
        }
    }
}

/// Intermediate draw command for a single-line text run, left-center aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCommand {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub color: [f32; 4], // sRGB RGBA
    pub font_size: f32,
}

/// Intermediate draw command for a named glyph icon.
#[derive(Debug, Clone, PartialEq)]
pub struct IconCommand {
    pub name: &'static str,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: [f32; 4], // sRGB RGBA
}

/// Collects draw commands from the tree view.
/// Decouples row logic from whatever renderer the host uses.
#[derive(Debug, Default)]
pub struct DrawList {
    pub panels: Vec<PanelCommand>,
    pub texts: Vec<TextCommand>,
    pub icons: Vec<IconCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            panels: Vec::new(),
            texts: Vec::new(),
            icons: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.panels.clear();
        self.texts.clear();
        self.icons.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty() && self.texts.is_empty() && self.icons.is_empty()
    }
}

/// Scale the alpha channel of an sRGB RGBA color.
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}
