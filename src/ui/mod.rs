pub mod draw;
pub mod input;
pub mod keybindings;
pub mod menu;
pub mod theme;
pub mod tree;

pub use draw::{DrawList, IconCommand, PanelCommand, TextCommand};
pub use input::{MouseButton, UiEvent, UiState};
pub use keybindings::{Action, Key, KeyBindings, KeyCombo, ModifierFlags};
pub use menu::{Menu, MenuEntry};
pub use theme::Theme;
pub use tree::{DropAction, DropEdge, RenderSpec, RowState, TreeItem, TreeView};

use slotmap::new_key_type;

new_key_type! {
    /// Handle into the tree view's row arena. Invalidated whenever the row's
    /// parent rebuilds its children.
    pub struct RowId;
}

// ---------------------------------------------------------------------------
// Geometry primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns true if the point (px, py) is inside this rectangle.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}
