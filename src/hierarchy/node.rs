//! Row adapters for the hierarchy tree.
//!
//! A `HierarchyNode` names one scene entity by handle and owns nothing. Nodes
//! are thrown away and rebuilt whenever the tree view decides their parent's
//! children are stale.

use std::hash::{DefaultHasher, Hash, Hasher};

use crate::components::{Component, ObjectKey, ObjectRef, SceneId};
use crate::scene::Scene;
use crate::session::Session;
use crate::ui::Rect;
use crate::ui::draw::{IconCommand, PanelCommand, TextCommand, with_alpha};
use crate::ui::menu::{Menu, MenuEntry};
use crate::ui::theme::Theme;
use crate::ui::tree::{DropAction, DropEdge, RenderSpec, RowState, TreeItem};

use super::create::{CreateKind, create_object_menu};
use super::reparent;

/// One row of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyNode {
    /// Scene root: lists the scene's top-level objects.
    Scene(SceneId),
    /// Root object of a prefab scene being edited.
    Prefab { scene: SceneId, root: ObjectKey },
    Object { scene: SceneId, object: ObjectKey },
}

/// Expansion identity of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKey {
    Scene(SceneId),
    Object(SceneId, ObjectKey),
}

/// What a hierarchy drag carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragPayload {
    pub object: ObjectRef,
}

/// Context menu actions of a hierarchy row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Cut,
    Copy,
    Paste,
    PasteAsChild,
    Delete,
    Create(CreateKind),
    Properties,
}

impl HierarchyNode {
    pub fn scene(self) -> SceneId {
        match self {
            HierarchyNode::Scene(scene)
            | HierarchyNode::Prefab { scene, .. }
            | HierarchyNode::Object { scene, .. } => scene,
        }
    }

    /// The wrapped object, `None` for the scene root.
    pub fn object(self) -> Option<ObjectKey> {
        match self {
            HierarchyNode::Scene(_) => None,
            HierarchyNode::Prefab { root, .. } => Some(root),
            HierarchyNode::Object { object, .. } => Some(object),
        }
    }

    /// Child keys of the wrapped entity, in display order.
    fn child_keys(self, session: &Session) -> &[ObjectKey] {
        let Some(scene) = session.scene(self.scene()) else {
            return &[];
        };
        match self.object() {
            Some(object) => scene.children(object),
            None => scene.roots(),
        }
    }

    fn display_name<'a>(self, scene: &'a Scene, theme: &'a Theme) -> &'a str {
        let name = match self.object() {
            Some(object) => scene.name(object).unwrap_or_default(),
            None => scene.name.as_str(),
        };
        if name.trim().is_empty() {
            &theme.placeholder_name
        } else {
            name
        }
    }

    fn icon(self, scene: &Scene) -> &'static str {
        match self {
            HierarchyNode::Scene(_) => "landscape",
            HierarchyNode::Prefab { .. } => "inventory_2",
            HierarchyNode::Object { object, .. } => {
                let components = scene
                    .get(object)
                    .map(|o| o.components.as_slice())
                    .unwrap_or_default();
                if components.iter().any(Component::is_camera) {
                    "videocam"
                } else if components.iter().any(Component::is_model) {
                    "view_in_ar"
                } else {
                    "circle"
                }
            }
        }
    }

    fn menu(self) -> Vec<MenuEntry<MenuAction>> {
        let mut m = Menu::new();
        match self {
            HierarchyNode::Object { .. } => {
                m.option("Cut", MenuAction::Cut)
                    .option("Copy", MenuAction::Copy)
                    .option("Paste", MenuAction::Paste)
                    .option("Paste As Child", MenuAction::PasteAsChild)
                    .separator()
                    .option("Delete", MenuAction::Delete)
                    .separator();
                create_object_menu(&mut m);
                m.separator().option("Properties..", MenuAction::Properties);
            }
            HierarchyNode::Prefab { .. } => {
                m.option("Copy", MenuAction::Copy)
                    .option("Paste As Child", MenuAction::PasteAsChild)
                    .separator();
                create_object_menu(&mut m);
                m.separator().option("Properties..", MenuAction::Properties);
            }
            HierarchyNode::Scene(_) => {
                m.option("Paste", MenuAction::Paste).separator();
                create_object_menu(&mut m);
            }
        }
        m.build()
    }
}

impl TreeItem for HierarchyNode {
    type Model = Session;
    type Key = NodeKey;
    type Value = ObjectRef;
    type Payload = DragPayload;
    type Action = MenuAction;

    fn key(&self) -> NodeKey {
        match *self {
            HierarchyNode::Scene(scene) => NodeKey::Scene(scene),
            HierarchyNode::Prefab { scene, root: object } | HierarchyNode::Object { scene, object } => {
                NodeKey::Object(scene, object)
            }
        }
    }

    fn value(&self, session: &Session) -> Option<ObjectRef> {
        session.object_ref(self.scene(), self.object()?)
    }

    fn has_children(&self, session: &Session) -> bool {
        !self.child_keys(session).is_empty()
    }

    /// Name plus the guid of every direct child, in order.
    fn fingerprint(&self, session: &Session) -> u64 {
        let mut hasher = DefaultHasher::new();
        let Some(scene) = session.scene(self.scene()) else {
            return hasher.finish();
        };
        match self.object() {
            Some(object) => scene.name(object).hash(&mut hasher),
            None => scene.name.hash(&mut hasher),
        }
        for &child in self.child_keys(session) {
            scene.guid(child).hash(&mut hasher);
        }
        hasher.finish()
    }

    fn build_children(&self, session: &Session) -> Vec<HierarchyNode> {
        let scene = self.scene();
        self.child_keys(session)
            .iter()
            .map(|&object| HierarchyNode::Object { scene, object })
            .collect()
    }

    fn describe(&self, session: &Session, row: &RowState<'_, DragPayload>, theme: &Theme) -> RenderSpec {
        let rect = row.rect;
        let label = TextCommand {
            text: theme.placeholder_name.clone(),
            x: rect.x + theme.icon_advance,
            y: rect.y + rect.height * 0.5,
            color: with_alpha(theme.control_text, theme.row_opacity),
            font_size: theme.font_size,
        };
        // Closed scene: the row is about to go away on the next resync.
        let Some(scene) = session.scene(self.scene()) else {
            return RenderSpec {
                drop_indicator: None,
                background: None,
                icon: None,
                label,
                opacity: theme.row_opacity,
            };
        };

        let mut opacity = theme.row_opacity;
        if let Some(object) = self.object()
            && !scene.is_active(object)
        {
            opacity *= theme.inactive_opacity;
        }
        if let Some(payload) = row.dragging
            && !reparent::accepts(session, *self, payload)
        {
            opacity *= theme.drop_refused_opacity;
        }

        let indicator_color = with_alpha(theme.blue, theme.drop_indicator_alpha);
        let drop_indicator = row.drop_edge.map(|edge| {
            // Edge bars straddle the row boundary.
            let bar = theme.drop_bar_height;
            let area = match edge {
                DropEdge::Top => Rect::new(rect.x, rect.y - bar * 0.5, rect.width, bar),
                DropEdge::Bottom => Rect::new(rect.x, rect.bottom() - bar * 0.5, rect.width, bar),
                DropEdge::Middle => rect,
            };
            PanelCommand::new(area, indicator_color, theme.drop_corner_radius)
        });

        let background = row.selected.then(|| {
            PanelCommand::new(
                row.full_span,
                with_alpha(theme.blue, theme.selection_alpha * opacity),
                0.0,
            )
        });

        let (text, icon) = if row.selected {
            (theme.white, theme.white)
        } else {
            (theme.control_text, theme.blue)
        };

        RenderSpec {
            drop_indicator,
            background,
            icon: Some(IconCommand {
                name: self.icon(scene),
                x: rect.x + theme.icon_inset,
                y: rect.y + (rect.height - theme.icon_size) * 0.5,
                size: theme.icon_size,
                color: with_alpha(icon, opacity),
            }),
            label: TextCommand {
                text: self.display_name(scene, theme).to_string(),
                color: with_alpha(text, opacity),
                ..label
            },
            opacity,
        }
    }

    fn drag_start(&self, session: &Session) -> Option<DragPayload> {
        match *self {
            HierarchyNode::Object { scene, object } => Some(DragPayload {
                object: session.object_ref(scene, object)?,
            }),
            HierarchyNode::Scene(_) | HierarchyNode::Prefab { .. } => None,
        }
    }

    fn drag_drop(
        &self,
        session: &mut Session,
        payload: &DragPayload,
        edge: DropEdge,
        is_drop: bool,
    ) -> DropAction {
        reparent::handle_drop(session, *self, payload, edge, is_drop)
    }

    fn context_menu(&self, _session: &Session) -> Vec<MenuEntry<MenuAction>> {
        self.menu()
    }
}
