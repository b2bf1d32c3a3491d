use super::RowId;
use super::keybindings::ModifierFlags;
use super::tree::{DropAction, TreeItem, TreeView};
use crate::selection::Selection;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// What a pointer interaction amounted to, for the panel to act on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiEvent {
    /// Press + release on the same row without crossing the drag threshold.
    Click(RowId),
    /// Expand arrow pressed.
    Toggled(RowId),
    /// Right button pressed on a row.
    ContextMenu(RowId),
    /// Press crossed the drag threshold and the row handed out a payload.
    DragStart(RowId),
    /// Drag released. `target` is `None` when released outside any row.
    Drop {
        target: Option<RowId>,
        action: DropAction,
    },
    DragCancelled,
    /// Scroll wheel moved the list.
    Scrolled,
}

/// Minimum pixel distance before a press becomes a drag.
pub const DRAG_THRESHOLD: f32 = 4.0;

/// Pixels scrolled per mouse wheel line.
pub const SCROLL_SPEED: f32 = 40.0;

/// Pointer state for one tree view. Lives on the panel, not the model.
pub struct UiState {
    /// Row currently under the cursor.
    pub hovered: Option<RowId>,
    /// Row the left button went down on.
    pressed: Option<RowId>,
    /// Screen coords where the press started (for drag threshold).
    press_origin: Option<(f32, f32)>,
    /// Modifiers held at press time.
    press_modifiers: ModifierFlags,
    /// Whether we've crossed the drag threshold for the current press.
    dragging: bool,
    /// Last known cursor position (screen coords).
    pub cursor: (f32, f32),
    pub drag_threshold: f32,
    pub scroll_speed: f32,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            hovered: None,
            pressed: None,
            press_origin: None,
            press_modifiers: ModifierFlags::NONE,
            dragging: false,
            cursor: (0.0, 0.0),
            drag_threshold: DRAG_THRESHOLD,
            scroll_speed: SCROLL_SPEED,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Handle cursor movement. Starts a drag once the press moves past the
    /// threshold, and re-queries the hovered row while dragging.
    pub fn handle_cursor_moved<N: TreeItem>(
        &mut self,
        tree: &mut TreeView<N>,
        model: &mut N::Model,
        x: f32,
        y: f32,
    ) -> Option<UiEvent> {
        self.cursor = (x, y);
        self.hovered = tree.row_at(x, y);

        let mut event = None;
        if !self.dragging
            && let (Some(row), Some(origin)) = (self.pressed, self.press_origin)
        {
            let dx = x - origin.0;
            let dy = y - origin.1;
            if (dx * dx + dy * dy).sqrt() >= self.drag_threshold {
                if tree.begin_drag(model, row) {
                    self.dragging = true;
                    event = Some(UiEvent::DragStart(row));
                } else {
                    // Not draggable: the press no longer counts as a click either.
                    self.pressed = None;
                    self.press_origin = None;
                }
            }
        }

        if self.dragging {
            tree.drag_over(model, x, y);
        }
        event
    }

    /// Handle mouse button press/release.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_mouse_input<N: TreeItem>(
        &mut self,
        tree: &mut TreeView<N>,
        model: &mut N::Model,
        selection: &mut Selection<N::Value>,
        button: MouseButton,
        pressed: bool,
        x: f32,
        y: f32,
        modifiers: ModifierFlags,
    ) -> Option<UiEvent> {
        self.cursor = (x, y);
        let hit = tree.row_at(x, y);

        if pressed {
            match button {
                MouseButton::Left => {
                    let Some(row) = hit else {
                        if !modifiers.ctrl && !modifiers.shift {
                            selection.clear();
                        }
                        return None;
                    };
                    if tree.hit_expander(row, x, y) {
                        tree.toggle(model, row);
                        return Some(UiEvent::Toggled(row));
                    }
                    self.pressed = Some(row);
                    self.press_origin = Some((x, y));
                    self.press_modifiers = modifiers;
                    self.dragging = false;
                    None
                }
                MouseButton::Right => {
                    let row = hit?;
                    // Right-click on an unselected row selects it first.
                    let selected = tree
                        .item(row)
                        .and_then(|item| item.value(model))
                        .is_some_and(|v| selection.contains(&v));
                    if !selected {
                        tree.click(model, selection, row, ModifierFlags::NONE);
                    }
                    Some(UiEvent::ContextMenu(row))
                }
                MouseButton::Middle => None,
            }
        } else {
            if button != MouseButton::Left {
                return None;
            }
            let was_pressed = self.pressed.take();
            let was_dragging = self.dragging;
            let press_modifiers = self.press_modifiers;
            self.press_origin = None;
            self.dragging = false;

            if was_dragging {
                // Let the final pointer position settle the target.
                tree.drag_over(model, x, y);
                let target = tree.drag_target().map(|(row, _, _)| row);
                let action = tree.drop(model);
                return Some(UiEvent::Drop { target, action });
            }
            let row = was_pressed?;
            if hit == Some(row) {
                tree.click(model, selection, row, press_modifiers);
                return Some(UiEvent::Click(row));
            }
            None
        }
    }

    /// Handle scroll wheel. `lines` is positive when scrolling down.
    pub fn handle_scroll<N: TreeItem>(&mut self, tree: &mut TreeView<N>, lines: f32) -> Option<UiEvent> {
        let before = tree.scroll_offset();
        tree.scroll_by(lines * self.scroll_speed);
        (tree.scroll_offset() != before).then_some(UiEvent::Scrolled)
    }

    /// Abort any press or drag in progress. The model is left untouched.
    pub fn cancel<N: TreeItem>(&mut self, tree: &mut TreeView<N>) -> Option<UiEvent> {
        let was_dragging = self.dragging || tree.is_dragging();
        self.pressed = None;
        self.press_origin = None;
        self.dragging = false;
        tree.cancel_drag();
        was_dragging.then_some(UiEvent::DragCancelled)
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
