//! Drop position → structural edit.
//!
//! A hovered row plus a drop edge resolves to one of three intents. Hovering
//! only asks whether the intent is legal; the scene is touched once, on the
//! final drop.

use crate::components::ObjectKey;
use crate::scene::Scene;
use crate::session::Session;
use crate::ui::tree::{DropAction, DropEdge};

use super::node::{DragPayload, HierarchyNode};

/// Structural edit a drop resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReparentIntent {
    /// Become the sibling immediately before the target.
    InsertBefore(ObjectKey),
    /// Become the sibling immediately after the target.
    InsertAfter(ObjectKey),
    /// Become the last child of the target (`None`: last top-level object).
    AppendChild(Option<ObjectKey>),
}

impl ReparentIntent {
    /// The object the dragged one would end up next to or under.
    fn target(self) -> Option<ObjectKey> {
        match self {
            ReparentIntent::InsertBefore(t)
            | ReparentIntent::InsertAfter(t)
            | ReparentIntent::AppendChild(Some(t)) => Some(t),
            ReparentIntent::AppendChild(None) => None,
        }
    }
}

/// A dragged object may land near or under `target` unless it is the target
/// or one of the target's ancestors.
pub fn is_legal(scene: &Scene, dragged: ObjectKey, target: ObjectKey) -> bool {
    dragged != target && !scene.is_ancestor_of(dragged, target)
}

/// What dropping on `node` at `edge` would mean, before any legality check.
/// `None` when the row takes no drop at that edge.
pub fn intent_for(node: HierarchyNode, edge: DropEdge) -> Option<ReparentIntent> {
    match node {
        // Anything dropped on the scene row goes to the top level.
        HierarchyNode::Scene(_) => Some(ReparentIntent::AppendChild(None)),
        // A prefab has exactly one root: no siblings for it.
        HierarchyNode::Prefab { root, .. } => {
            (edge == DropEdge::Middle).then_some(ReparentIntent::AppendChild(Some(root)))
        }
        HierarchyNode::Object { object, .. } => Some(match edge {
            DropEdge::Top => ReparentIntent::InsertBefore(object),
            DropEdge::Bottom => ReparentIntent::InsertAfter(object),
            DropEdge::Middle => ReparentIntent::AppendChild(Some(object)),
        }),
    }
}

/// True if `node` would take the payload on at least one edge. Drives the
/// faded look of refused rows while dragging.
pub fn accepts(session: &Session, node: HierarchyNode, payload: &DragPayload) -> bool {
    let scene_id = node.scene();
    if payload.object.scene != scene_id {
        return false;
    }
    let Some(scene) = session.scene(scene_id) else {
        return false;
    };
    if !scene.contains(payload.object.object) {
        return false;
    }
    match node {
        HierarchyNode::Scene(_) => true,
        HierarchyNode::Prefab { root: target, .. } | HierarchyNode::Object { object: target, .. } => {
            is_legal(scene, payload.object.object, target)
        }
    }
}

/// The drag-drop callback of every hierarchy row. Hover (`is_drop == false`)
/// only reports legality; the final drop commits the edit.
pub fn handle_drop(
    session: &mut Session,
    node: HierarchyNode,
    payload: &DragPayload,
    edge: DropEdge,
    is_drop: bool,
) -> DropAction {
    if !accepts(session, node, payload) {
        return DropAction::Ignore;
    }
    let Some(intent) = intent_for(node, edge) else {
        return DropAction::Ignore;
    };
    if !is_drop {
        return DropAction::Move;
    }
    let Some(scene) = session.scene_mut(node.scene()) else {
        return DropAction::Ignore;
    };
    if apply(scene, payload.object.object, intent) {
        DropAction::Move
    } else {
        DropAction::Ignore
    }
}

/// Commit `intent` for `dragged` as one reparent. The dragged subtree moves
/// as a whole. Returns false if the edit was refused.
pub fn apply(scene: &mut Scene, dragged: ObjectKey, intent: ReparentIntent) -> bool {
    if let Some(target) = intent.target()
        && !is_legal(scene, dragged, target)
    {
        log::debug!("refused drop of {:?} onto {:?}", dragged, target);
        return false;
    }
    match intent {
        ReparentIntent::InsertBefore(t) => scene.add_sibling(t, dragged, true),
        ReparentIntent::InsertAfter(t) => scene.add_sibling(t, dragged, false),
        ReparentIntent::AppendChild(parent) => scene.set_parent(dragged, parent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::SceneId;
    use crate::scene::SceneKind;

    /// Root{Car{Wheel1, Wheel2}, Tree1}
    fn car_scene() -> (Scene, [ObjectKey; 4]) {
        let mut scene = Scene::new_with_seed("Root", SceneKind::Standard, 7);
        let car = scene.create_object("Car");
        let w1 = scene.create_object("Wheel1");
        let w2 = scene.create_object("Wheel2");
        let tree = scene.create_object("Tree1");
        assert!(scene.set_parent(w1, Some(car)));
        assert!(scene.set_parent(w2, Some(car)));
        (scene, [car, w1, w2, tree])
    }

    #[test]
    fn legality() {
        let (scene, [car, w1, _, tree]) = car_scene();
        assert!(!is_legal(&scene, car, car));
        assert!(!is_legal(&scene, car, w1));
        assert!(is_legal(&scene, w1, car));
        assert!(is_legal(&scene, car, tree));
    }

    #[test]
    fn edges_map_to_intents() {
        let id = SceneId::default();
        let (_, [car, ..]) = car_scene();
        let node = HierarchyNode::Object { scene: id, object: car };
        assert_eq!(intent_for(node, DropEdge::Top), Some(ReparentIntent::InsertBefore(car)));
        assert_eq!(intent_for(node, DropEdge::Bottom), Some(ReparentIntent::InsertAfter(car)));
        assert_eq!(
            intent_for(node, DropEdge::Middle),
            Some(ReparentIntent::AppendChild(Some(car)))
        );

        let prefab = HierarchyNode::Prefab { scene: id, root: car };
        assert_eq!(intent_for(prefab, DropEdge::Top), None);
        assert_eq!(
            intent_for(prefab, DropEdge::Middle),
            Some(ReparentIntent::AppendChild(Some(car)))
        );

        let root = HierarchyNode::Scene(id);
        assert_eq!(intent_for(root, DropEdge::Bottom), Some(ReparentIntent::AppendChild(None)));
    }

    #[test]
    fn apply_scenario() {
        let (mut scene, [car, w1, _, tree]) = car_scene();
        assert!(apply(&mut scene, w1, ReparentIntent::InsertAfter(tree)));
        assert_eq!(scene.outline(), "Root{Car{Wheel2}, Tree1, Wheel1}");
        assert!(apply(&mut scene, car, ReparentIntent::AppendChild(Some(tree))));
        assert_eq!(scene.outline(), "Root{Tree1{Car{Wheel2}}, Wheel1}");
    }

    #[test]
    fn apply_refuses_cycles() {
        let (mut scene, [car, w1, ..]) = car_scene();
        let before = scene.outline();
        let revision = scene.revision();
        assert!(!apply(&mut scene, car, ReparentIntent::AppendChild(Some(w1))));
        assert!(!apply(&mut scene, car, ReparentIntent::InsertBefore(w1)));
        assert!(!apply(&mut scene, car, ReparentIntent::InsertAfter(car)));
        assert_eq!(scene.outline(), before);
        assert_eq!(scene.revision(), revision);
    }

    #[test]
    fn drop_in_place_is_legal_noop() {
        let (mut scene, [car, w1, w2, _]) = car_scene();
        let revision = scene.revision();
        assert!(apply(&mut scene, w1, ReparentIntent::InsertBefore(w2)));
        assert!(apply(&mut scene, w2, ReparentIntent::AppendChild(Some(car))));
        assert_eq!(scene.outline(), "Root{Car{Wheel1, Wheel2}, Tree1}");
        assert_eq!(scene.revision(), revision);
    }
}
