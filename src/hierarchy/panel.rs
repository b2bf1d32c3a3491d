//! The hierarchy panel: binds the tree view to the session's active scene.
//!
//! Once per tick the panel compares the active scene with the one it last
//! bound. Any change throws the whole forest away and builds a new root; the
//! selection follows by guid.

use crate::components::{ObjectKey, ObjectRef, SceneId};
use crate::config::OutlinerConfig;
use crate::selection::Selection;
use crate::session::Session;
use crate::ui::draw::DrawList;
use crate::ui::input::{MouseButton, UiEvent, UiState};
use crate::ui::keybindings::{Action, KeyBindings, KeyCombo, ModifierFlags};
use crate::ui::menu::MenuEntry;
use crate::ui::theme::Theme;
use crate::ui::tree::{TreeItem, TreeView};
use crate::ui::{Rect, RowId};

use super::clipboard::{self, Clipboard, PastePlacement};
use super::node::{HierarchyNode, MenuAction, NodeKey};

/// Where the host shell docks the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockInfo {
    pub category: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
}

pub const DOCK: DockInfo = DockInfo {
    category: "Editor",
    title: "Hierarchy",
    icon: "list",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Empty,
    Bound(SceneId),
}

/// Requests the panel hands back to the host shell.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// Pointer interaction the host may want to react to.
    Ui(UiEvent),
    /// Show this menu at the cursor; feed the chosen action to
    /// [`HierarchyPanel::run_action`] with `node`.
    ContextMenu {
        row: RowId,
        node: HierarchyNode,
        entries: Vec<MenuEntry<MenuAction>>,
    },
    /// Open a property window for the object.
    OpenProperties(ObjectRef),
}

pub struct HierarchyPanel {
    pub tree: TreeView<HierarchyNode>,
    pub ui: UiState,
    pub keybindings: KeyBindings,
    pub theme: Theme,
    state: PanelState,
}

impl HierarchyPanel {
    pub fn new(config: &OutlinerConfig) -> Self {
        let mut ui = UiState::new();
        ui.drag_threshold = config.drag_threshold;
        ui.scroll_speed = config.scroll_speed;
        Self {
            tree: TreeView::new(config.metrics()),
            ui,
            keybindings: KeyBindings::defaults(),
            theme: config.theme(),
            state: PanelState::Empty,
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    /// The scene currently shown, if any.
    pub fn bound_scene(&self) -> Option<SceneId> {
        match self.state {
            PanelState::Empty => None,
            PanelState::Bound(id) => Some(id),
        }
    }

    /// Per-tick poll. Resyncs when the active scene changed since the last
    /// call; returns true if it did.
    pub fn tick(&mut self, session: &Session, selection: &mut Selection<ObjectRef>) -> bool {
        let active = session.active();
        if active == self.bound_scene() {
            return false;
        }
        self.resync(session, selection, active);
        true
    }

    fn resync(&mut self, session: &Session, selection: &mut Selection<ObjectRef>, active: Option<SceneId>) {
        let captured = selection.to_vec();
        self.ui.cancel(&mut self.tree);
        self.tree.clear();
        selection.clear();

        let Some(id) = active else {
            self.state = PanelState::Empty;
            log::info!("hierarchy cleared, no active scene");
            return;
        };
        let Some(entry) = session.get(id) else {
            self.state = PanelState::Empty;
            return;
        };
        self.state = PanelState::Bound(id);

        let root = match entry.scene.roots().first() {
            Some(&root) if entry.is_prefab_editor() => HierarchyNode::Prefab { scene: id, root },
            _ => HierarchyNode::Scene(id),
        };
        let rows = self.tree.set_roots(vec![root]);
        for row in rows {
            self.tree.expand(session, row);
        }

        for r in &captured {
            if let Some(object) = entry.scene.find_by_guid(r.guid) {
                selection.add(ObjectRef {
                    scene: id,
                    object,
                    guid: r.guid,
                });
            }
        }
        log::info!(
            "hierarchy bound to {:?} ({} objects), kept {}/{} selected",
            entry.scene.name,
            entry.scene.len(),
            selection.len(),
            captured.len()
        );
    }

    pub fn paint(
        &mut self,
        session: &Session,
        selection: &Selection<ObjectRef>,
        viewport: Rect,
        draw: &mut DrawList,
    ) {
        self.tree.paint(session, selection, &self.theme, viewport, draw);
    }

    // ------------------------------------------------------------------
    // Pointer
    // ------------------------------------------------------------------

    pub fn cursor_moved(&mut self, session: &mut Session, x: f32, y: f32) -> Option<PanelEvent> {
        self.ui
            .handle_cursor_moved(&mut self.tree, session, x, y)
            .map(PanelEvent::Ui)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn mouse_input(
        &mut self,
        session: &mut Session,
        selection: &mut Selection<ObjectRef>,
        button: MouseButton,
        pressed: bool,
        x: f32,
        y: f32,
        modifiers: ModifierFlags,
    ) -> Option<PanelEvent> {
        let event = self.ui.handle_mouse_input(
            &mut self.tree,
            session,
            selection,
            button,
            pressed,
            x,
            y,
            modifiers,
        )?;
        if let UiEvent::ContextMenu(row) = event {
            let node = *self.tree.item(row)?;
            return Some(PanelEvent::ContextMenu {
                row,
                node,
                entries: self.tree.context_menu(session, row),
            });
        }
        Some(PanelEvent::Ui(event))
    }

    pub fn scroll(&mut self, lines: f32) -> Option<PanelEvent> {
        self.ui.handle_scroll(&mut self.tree, lines).map(PanelEvent::Ui)
    }

    // ------------------------------------------------------------------
    // Keyboard
    // ------------------------------------------------------------------

    pub fn handle_key(
        &mut self,
        session: &mut Session,
        selection: &mut Selection<ObjectRef>,
        clipboard: &mut impl Clipboard,
        combo: KeyCombo,
    ) -> Option<PanelEvent> {
        let action = self.keybindings.lookup(combo)?;
        let scene = self.bound_scene()?;
        // The anchor only counts while it is still selected.
        let focus = selection
            .anchor()
            .filter(|r| r.scene == scene && selection.contains(r))
            .map(|r| self.node_for(scene, r.object));

        match action {
            Action::CancelDrag => self.ui.cancel(&mut self.tree).map(PanelEvent::Ui),
            Action::SelectPrevious | Action::SelectNext => {
                let step = if action == Action::SelectNext { 1 } else { -1 };
                self.tree.select_step(session, selection, step);
                None
            }
            Action::Collapse | Action::Expand => {
                let row = self.tree.row_for_value(session, selection.anchor()?)?;
                if action == Action::Expand {
                    self.tree.expand(session, row);
                } else {
                    self.tree.collapse(row);
                }
                None
            }
            Action::Delete => {
                let doomed: Vec<ObjectKey> = selection
                    .iter()
                    .filter(|r| r.scene == scene)
                    .map(|r| r.object)
                    .collect();
                for object in doomed {
                    // The prefab root keeps its variant and refuses deletion.
                    let node = self.node_for(scene, object);
                    self.run_action(session, selection, clipboard, node, MenuAction::Delete);
                }
                None
            }
            Action::Cut => self.run_action(session, selection, clipboard, focus?, MenuAction::Cut),
            Action::Copy => self.run_action(session, selection, clipboard, focus?, MenuAction::Copy),
            Action::Paste => {
                let node = focus.unwrap_or(HierarchyNode::Scene(scene));
                self.run_action(session, selection, clipboard, node, MenuAction::Paste)
            }
            Action::PasteAsChild => {
                let node = focus.unwrap_or(HierarchyNode::Scene(scene));
                self.run_action(session, selection, clipboard, node, MenuAction::PasteAsChild)
            }
        }
    }

    /// The row kind `object` is shown as: the prefab root keeps its variant.
    fn node_for(&self, scene: SceneId, object: ObjectKey) -> HierarchyNode {
        match self.tree.roots().first().and_then(|&r| self.tree.item(r)) {
            Some(&HierarchyNode::Prefab { root, .. }) if root == object => {
                HierarchyNode::Prefab { scene, root }
            }
            _ => HierarchyNode::Object { scene, object },
        }
    }

    // ------------------------------------------------------------------
    // Menu actions
    // ------------------------------------------------------------------

    /// Carry out a context menu action on `node`.
    pub fn run_action(
        &mut self,
        session: &mut Session,
        selection: &mut Selection<ObjectRef>,
        clipboard: &mut impl Clipboard,
        node: HierarchyNode,
        action: MenuAction,
    ) -> Option<PanelEvent> {
        let scene_id = node.scene();
        match action {
            MenuAction::Copy => {
                let scene = session.scene(scene_id)?;
                clipboard::copy(scene, node.object()?, clipboard);
                None
            }
            MenuAction::Cut | MenuAction::Delete => {
                let HierarchyNode::Object { object, .. } = node else {
                    return None;
                };
                let scene = session.scene_mut(scene_id)?;
                if action == MenuAction::Cut {
                    clipboard::cut(scene, object, clipboard);
                } else {
                    scene.destroy(object);
                }
                prune_selection(session, selection);
                None
            }
            MenuAction::Paste | MenuAction::PasteAsChild => {
                // The prefab root cannot have siblings.
                let placement = match (action, node) {
                    (MenuAction::Paste, HierarchyNode::Object { .. }) => PastePlacement::Sibling,
                    _ => PastePlacement::Child,
                };
                let scene = session.scene_mut(scene_id)?;
                let created = clipboard::paste(scene, node.object(), placement, &*clipboard)?;
                if placement == PastePlacement::Child {
                    self.tree.open_key(node.key());
                }
                self.place_new(session, selection, scene_id, created);
                None
            }
            MenuAction::Create(kind) => {
                let scene = session.scene_mut(scene_id)?;
                let created = kind.spawn(scene);
                if let Some(parent) = node.object() {
                    scene.set_parent(created, Some(parent));
                }
                self.tree.open_key(node.key());
                self.place_new(session, selection, scene_id, created);
                None
            }
            MenuAction::Properties => {
                let value = node.value(session)?;
                Some(PanelEvent::OpenProperties(value))
            }
        }
    }

    /// Select a freshly created object and scroll it into view.
    fn place_new(
        &mut self,
        session: &Session,
        selection: &mut Selection<ObjectRef>,
        scene: SceneId,
        object: ObjectKey,
    ) {
        if let Some(r) = session.object_ref(scene, object) {
            selection.set(r);
        }
        self.reveal(session, scene, object);
    }

    /// Expand every ancestor of `object` and scroll its row into view.
    pub fn reveal(&mut self, session: &Session, scene: SceneId, object: ObjectKey) {
        let Some(s) = session.scene(scene) else {
            return;
        };
        self.tree.open_key(NodeKey::Scene(scene));
        let mut current = s.parent(object);
        while let Some(p) = current {
            self.tree.open_key(NodeKey::Object(scene, p));
            current = s.parent(p);
        }
        let Some(value) = session.object_ref(scene, object) else {
            return;
        };
        // Build the rows down to the object before looking it up.
        self.tree.flatten(session);
        if let Some(row) = self.tree.row_for_value(session, value) {
            self.tree.ensure_visible(session, row);
        }
    }
}

/// Drop references to objects that no longer exist.
fn prune_selection(session: &Session, selection: &mut Selection<ObjectRef>) {
    selection.retain(|r| {
        session
            .scene(r.scene)
            .is_some_and(|s| s.guid(r.object) == Some(r.guid))
    });
}
