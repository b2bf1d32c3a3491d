use std::collections::HashMap;

use rand::rngs::StdRng;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::components::{Component, Guid, ObjectKey, Revision};
use crate::document::ObjectDocument;
use crate::events::{EventLog, SceneEvent};
use crate::rng::{create_rng, next_guid};

/// One object in the scene tree.
///
/// Tree links are private: they change only through `Scene`, which keeps
/// parent and child lists consistent and refuses edits that would form a cycle.
#[derive(Debug, Clone)]
pub struct GameObject {
    pub guid: Guid,
    pub name: String,
    pub active: bool,
    pub components: Vec<Component>,
    parent: Option<ObjectKey>,
    children: SmallVec<[ObjectKey; 4]>,
}

impl GameObject {
    /// `None` means the object sits at the top level of its scene.
    pub fn parent(&self) -> Option<ObjectKey> {
        self.parent
    }

    pub fn children(&self) -> &[ObjectKey] {
        &self.children
    }
}

/// Regular scenes hold any number of top-level objects. A prefab scene is
/// edited as a single root object with descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    Standard,
    Prefab,
}

/// Where a moved object lands among its new siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Before(ObjectKey),
    After(ObjectKey),
    Last,
}

/// Arena-backed mutable object tree.
pub struct Scene {
    pub name: String,
    pub kind: SceneKind,
    objects: SlotMap<ObjectKey, GameObject>,
    roots: Vec<ObjectKey>,
    by_guid: HashMap<Guid, ObjectKey>,
    revision: Revision,
    pub events: EventLog,
    rng: StdRng,
}

impl Scene {
    /// Create an empty scene with a deterministic guid sequence.
    pub fn new_with_seed(name: impl Into<String>, kind: SceneKind, seed: u64) -> Self {
        Self {
            name: name.into(),
            kind,
            objects: SlotMap::with_key(),
            roots: Vec::new(),
            by_guid: HashMap::new(),
            revision: Revision(0),
            events: EventLog::default_capacity(),
            rng: create_rng(seed),
        }
    }

    /// Copy every object, guids included, into a new scene. Used when a
    /// scene is entered in play mode: the copy resolves the same guids.
    pub fn clone_for_play(&self, seed: u64) -> Scene {
        Scene {
            name: self.name.clone(),
            kind: self.kind,
            objects: self.objects.clone(),
            roots: self.roots.clone(),
            by_guid: self.by_guid.clone(),
            revision: Revision(0),
            events: EventLog::default_capacity(),
            rng: create_rng(seed),
        }
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    pub fn get(&self, key: ObjectKey) -> Option<&GameObject> {
        self.objects.get(key)
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.objects.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Top-level objects in display order.
    pub fn roots(&self) -> &[ObjectKey] {
        &self.roots
    }

    /// Children of `key` in display order. Empty for unknown keys.
    pub fn children(&self, key: ObjectKey) -> &[ObjectKey] {
        self.objects.get(key).map(|o| o.children()).unwrap_or(&[])
    }

    pub fn parent(&self, key: ObjectKey) -> Option<ObjectKey> {
        self.objects.get(key).and_then(|o| o.parent)
    }

    pub fn name(&self, key: ObjectKey) -> Option<&str> {
        self.objects.get(key).map(|o| o.name.as_str())
    }

    pub fn guid(&self, key: ObjectKey) -> Option<Guid> {
        self.objects.get(key).map(|o| o.guid)
    }

    pub fn is_active(&self, key: ObjectKey) -> bool {
        self.objects.get(key).is_some_and(|o| o.active)
    }

    pub fn find_by_guid(&self, guid: Guid) -> Option<ObjectKey> {
        self.by_guid.get(&guid).copied()
    }

    /// Revision of the last structural edit.
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// True if `ancestor` is a strict ancestor of `key`.
    pub fn is_ancestor_of(&self, ancestor: ObjectKey, key: ObjectKey) -> bool {
        let mut current = self.parent(key);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    /// The ordered list `key` lives in: its parent's children, or the roots.
    fn siblings(&self, parent: Option<ObjectKey>) -> &[ObjectKey] {
        match parent {
            Some(p) => self.children(p),
            None => &self.roots,
        }
    }

    /// Position of `key` among its siblings.
    pub fn index_in_parent(&self, key: ObjectKey) -> Option<usize> {
        let obj = self.objects.get(key)?;
        self.siblings(obj.parent).iter().position(|&k| k == key)
    }

    // ------------------------------------------------------------------
    // Creation / destruction
    // ------------------------------------------------------------------

    /// Create a new top-level object with a fresh guid.
    pub fn create_object(&mut self, name: impl Into<String>) -> ObjectKey {
        let mut guid = next_guid(&mut self.rng);
        while self.by_guid.contains_key(&guid) {
            guid = next_guid(&mut self.rng);
        }
        let key = self.objects.insert(GameObject {
            guid,
            name: name.into(),
            active: true,
            components: Vec::new(),
            parent: None,
            children: SmallVec::new(),
        });
        self.by_guid.insert(guid, key);
        self.roots.push(key);
        let revision = self.bump();
        self.events.push(SceneEvent::Created { guid, revision });
        key
    }

    /// Remove `key` and all its descendants. Returns false for unknown keys.
    pub fn destroy(&mut self, key: ObjectKey) -> bool {
        if !self.objects.contains_key(key) {
            return false;
        }

        let mut doomed = Vec::new();
        Self::collect_post_order(&self.objects, key, &mut doomed);

        self.detach(key);
        for k in doomed {
            if let Some(obj) = self.objects.remove(k) {
                self.by_guid.remove(&obj.guid);
                let revision = self.bump();
                self.events.push(SceneEvent::Destroyed {
                    guid: obj.guid,
                    revision,
                });
            }
        }
        true
    }

    fn collect_post_order(
        objects: &SlotMap<ObjectKey, GameObject>,
        key: ObjectKey,
        out: &mut Vec<ObjectKey>,
    ) {
        if let Some(obj) = objects.get(key) {
            for &child in &obj.children {
                Self::collect_post_order(objects, child, out);
            }
        }
        out.push(key);
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    pub fn rename(&mut self, key: ObjectKey, name: impl Into<String>) -> bool {
        let name = name.into();
        let Some(obj) = self.objects.get_mut(key) else {
            return false;
        };
        if obj.name == name {
            return true;
        }
        obj.name = name.clone();
        let guid = obj.guid;
        let revision = self.bump();
        self.events.push(SceneEvent::Renamed {
            guid,
            name,
            revision,
        });
        true
    }

    pub fn set_active(&mut self, key: ObjectKey, active: bool) {
        if let Some(obj) = self.objects.get_mut(key) {
            obj.active = active;
        }
    }

    pub fn add_component(&mut self, key: ObjectKey, component: Component) {
        if let Some(obj) = self.objects.get_mut(key) {
            obj.components.push(component);
        }
    }

    // ------------------------------------------------------------------
    // Reparenting
    // ------------------------------------------------------------------

    /// Make `key` the last child of `parent` (`None` = last top-level object).
    /// Refused if it would put `key` under itself.
    pub fn set_parent(&mut self, key: ObjectKey, parent: Option<ObjectKey>) -> bool {
        self.relink(key, parent, Slot::Last)
    }

    /// Move `key` next to `anchor` under `anchor`'s parent, immediately before
    /// or after it. Refused if `key` is `anchor` or one of its ancestors.
    pub fn add_sibling(&mut self, anchor: ObjectKey, key: ObjectKey, before: bool) -> bool {
        let Some(anchor_obj) = self.objects.get(anchor) else {
            return false;
        };
        let parent = anchor_obj.parent;
        let slot = if before {
            Slot::Before(anchor)
        } else {
            Slot::After(anchor)
        };
        self.relink(key, parent, slot)
    }

    fn relink(&mut self, key: ObjectKey, parent: Option<ObjectKey>, slot: Slot) -> bool {
        if !self.objects.contains_key(key) {
            return false;
        }
        if let Some(p) = parent
            && (p == key || !self.objects.contains_key(p) || self.is_ancestor_of(key, p))
        {
            return false;
        }
        if let Slot::Before(anchor) | Slot::After(anchor) = slot
            && anchor == key
        {
            return false;
        }

        let old_parent = self.parent(key);
        let old_index = self.index_in_parent(key);

        self.detach(key);

        let list_len = self.siblings(parent).len();
        let index = match slot {
            Slot::Last => list_len,
            Slot::Before(anchor) => self
                .siblings(parent)
                .iter()
                .position(|&k| k == anchor)
                .unwrap_or(list_len),
            Slot::After(anchor) => self
                .siblings(parent)
                .iter()
                .position(|&k| k == anchor)
                .map_or(list_len, |i| i + 1),
        };

        match parent {
            Some(p) => {
                if let Some(p_obj) = self.objects.get_mut(p) {
                    p_obj.children.insert(index, key);
                }
            }
            None => self.roots.insert(index, key),
        }
        if let Some(obj) = self.objects.get_mut(key) {
            obj.parent = parent;
        }

        if old_parent == parent && old_index == Some(index) {
            return true;
        }

        let guid = self.objects.get(key).map(|o| o.guid).unwrap_or(Guid(0));
        let parent_guid = parent.and_then(|p| self.guid(p));
        let revision = self.bump();
        self.events.push(SceneEvent::Reparented {
            guid,
            parent: parent_guid,
            index,
            revision,
        });
        log::info!(
            "reparented {:?} under {:?} at {}",
            self.name(key).unwrap_or_default(),
            parent.and_then(|p| self.name(p)).unwrap_or("<scene>"),
            index
        );

        #[cfg(debug_assertions)]
        validate_scene(self);

        true
    }

    /// Unlink `key` from its sibling list. Leaves `parent` stale; callers fix it.
    fn detach(&mut self, key: ObjectKey) {
        let Some(parent) = self.objects.get(key).map(|o| o.parent) else {
            return;
        };
        match parent {
            Some(p) => {
                if let Some(p_obj) = self.objects.get_mut(p)
                    && let Some(i) = p_obj.children.iter().position(|&c| c == key)
                {
                    p_obj.children.remove(i);
                }
            }
            None => self.roots.retain(|&r| r != key),
        }
    }

    fn bump(&mut self) -> Revision {
        self.revision = Revision(self.revision.0 + 1);
        self.revision
    }

    // ------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------

    /// Capture `key` and its whole subtree as a portable document.
    pub fn serialize(&self, key: ObjectKey) -> Option<ObjectDocument> {
        let obj = self.objects.get(key)?;
        Some(ObjectDocument {
            name: obj.name.clone(),
            active: obj.active,
            components: obj.components.clone(),
            children: obj
                .children
                .iter()
                .filter_map(|&c| self.serialize(c))
                .collect(),
        })
    }

    /// Overwrite `key` with the document's contents. Existing children are
    /// destroyed; document children are created fresh, with new guids.
    pub fn deserialize_into(&mut self, key: ObjectKey, doc: &ObjectDocument) -> bool {
        if !self.objects.contains_key(key) {
            return false;
        }
        let old_children: Vec<ObjectKey> = self.children(key).to_vec();
        for child in old_children {
            self.destroy(child);
        }

        self.rename(key, doc.name.clone());
        if let Some(obj) = self.objects.get_mut(key) {
            obj.active = doc.active;
            obj.components = doc.components.clone();
        }

        for child_doc in &doc.children {
            let child = self.create_object(child_doc.name.clone());
            self.set_parent(child, Some(key));
            self.deserialize_into(child, child_doc);
        }
        true
    }

    // ------------------------------------------------------------------
    // Debug helpers
    // ------------------------------------------------------------------

    /// Compact outline: `Root{Car{Wheel1, Wheel2}, Tree1}` with the scene
    /// name as the outer node.
    pub fn outline(&self) -> String {
        let mut out = self.name.clone();
        Self::outline_list(self, &self.roots, &mut out);
        out
    }

    fn outline_list(scene: &Scene, keys: &[ObjectKey], out: &mut String) {
        if keys.is_empty() {
            return;
        }
        out.push('{');
        for (i, &k) in keys.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(scene.name(k).unwrap_or("?"));
            Self::outline_list(scene, scene.children(k), out);
        }
        out.push('}');
    }
}

/// Validate scene invariants: strict tree, consistent back-links, guid index.
/// Panics with a description of the first violation found.
pub fn validate_scene(scene: &Scene) {
    let mut seen: HashMap<ObjectKey, usize> = HashMap::new();

    for &root in &scene.roots {
        let obj = scene
            .objects
            .get(root)
            .unwrap_or_else(|| panic!("dangling root {:?}", root));
        assert!(
            obj.parent.is_none(),
            "root {:?} ({}) has parent {:?}",
            root,
            obj.name,
            obj.parent
        );
        *seen.entry(root).or_default() += 1;
    }

    for (key, obj) in &scene.objects {
        for &child in &obj.children {
            let child_obj = scene
                .objects
                .get(child)
                .unwrap_or_else(|| panic!("dangling child {:?} under {}", child, obj.name));
            assert_eq!(
                child_obj.parent,
                Some(key),
                "child {} does not point back at parent {}",
                child_obj.name,
                obj.name
            );
            *seen.entry(child).or_default() += 1;
        }

        // Walking up must terminate within len() steps.
        let mut steps = 0;
        let mut current = obj.parent;
        while let Some(p) = current {
            steps += 1;
            assert!(steps <= scene.objects.len(), "cycle through {}", obj.name);
            current = scene.objects.get(p).and_then(|o| o.parent);
        }

        assert_eq!(
            scene.by_guid.get(&obj.guid),
            Some(&key),
            "guid index out of date for {}",
            obj.name
        );
    }

    for key in scene.objects.keys() {
        assert_eq!(
            seen.get(&key).copied().unwrap_or(0),
            1,
            "object {:?} is not listed exactly once",
            key
        );
    }
    assert_eq!(scene.by_guid.len(), scene.objects.len(), "stale guid entries");
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Root{Car{Wheel1, Wheel2}, Tree1}
    fn car_scene() -> (Scene, [ObjectKey; 4]) {
        let mut scene = Scene::new_with_seed("Root", SceneKind::Standard, 42);
        let car = scene.create_object("Car");
        let w1 = scene.create_object("Wheel1");
        let w2 = scene.create_object("Wheel2");
        let tree = scene.create_object("Tree1");
        assert!(scene.set_parent(w1, Some(car)));
        assert!(scene.set_parent(w2, Some(car)));
        (scene, [car, w1, w2, tree])
    }

    #[test]
    fn create_assigns_unique_guids() {
        let (scene, [car, w1, w2, tree]) = car_scene();
        let guids: std::collections::HashSet<Guid> = [car, w1, w2, tree]
            .iter()
            .filter_map(|&k| scene.guid(k))
            .collect();
        assert_eq!(guids.len(), 4);
        for k in [car, w1, w2, tree] {
            let guid = scene.guid(k).expect("guid");
            assert_eq!(scene.find_by_guid(guid), Some(k));
        }
        validate_scene(&scene);
    }

    #[test]
    fn outline_matches_structure() {
        let (scene, _) = car_scene();
        assert_eq!(scene.outline(), "Root{Car{Wheel1, Wheel2}, Tree1}");
    }

    #[test]
    fn add_sibling_before_and_after() {
        let (mut scene, [car, w1, _w2, tree]) = car_scene();
        assert!(scene.add_sibling(tree, w1, false));
        assert_eq!(scene.outline(), "Root{Car{Wheel2}, Tree1, Wheel1}");
        assert!(scene.add_sibling(car, w1, true));
        assert_eq!(scene.outline(), "Root{Wheel1, Car{Wheel2}, Tree1}");
        validate_scene(&scene);
    }

    #[test]
    fn set_parent_refuses_cycles() {
        let (mut scene, [car, w1, _, _]) = car_scene();
        let before = scene.outline();
        let rev = scene.revision();
        assert!(!scene.set_parent(car, Some(w1)));
        assert!(!scene.set_parent(car, Some(car)));
        assert!(!scene.add_sibling(car, car, true));
        assert_eq!(scene.outline(), before);
        assert_eq!(scene.revision(), rev);
    }

    #[test]
    fn unchanged_position_records_nothing() {
        let (mut scene, [car, _, w2, _]) = car_scene();
        let rev = scene.revision();
        assert!(scene.set_parent(w2, Some(car)));
        assert_eq!(scene.revision(), rev);
    }

    #[test]
    fn destroy_removes_whole_subtree() {
        let (mut scene, [car, w1, w2, tree]) = car_scene();
        let w1_guid = scene.guid(w1).expect("guid");
        assert!(scene.destroy(car));
        assert!(!scene.contains(car));
        assert!(!scene.contains(w1));
        assert!(!scene.contains(w2));
        assert!(scene.contains(tree));
        assert_eq!(scene.find_by_guid(w1_guid), None);
        assert_eq!(scene.outline(), "Root{Tree1}");
        validate_scene(&scene);
        assert!(!scene.destroy(car));
    }

    #[test]
    fn serialize_then_deserialize_reproduces_structure() {
        let (mut scene, [car, ..]) = car_scene();
        let doc = scene.serialize(car).expect("doc");
        let copy = scene.create_object("scratch");
        assert!(scene.deserialize_into(copy, &doc));
        assert_eq!(scene.outline(), "Root{Car{Wheel1, Wheel2}, Tree1, Car{Wheel1, Wheel2}}");
        assert_ne!(scene.guid(copy), scene.guid(car));
        validate_scene(&scene);
    }

    #[test]
    fn clone_for_play_keeps_guids() {
        let (scene, [car, ..]) = car_scene();
        let play = scene.clone_for_play(7);
        let guid = scene.guid(car).expect("guid");
        let in_play = play.find_by_guid(guid).expect("resolves");
        assert_eq!(play.name(in_play), Some("Car"));
        assert_eq!(play.outline(), scene.outline());
    }

    #[test]
    fn is_ancestor_is_strict() {
        let (scene, [car, w1, _, tree]) = car_scene();
        assert!(scene.is_ancestor_of(car, w1));
        assert!(!scene.is_ancestor_of(w1, car));
        assert!(!scene.is_ancestor_of(car, car));
        assert!(!scene.is_ancestor_of(car, tree));
    }

    #[test]
    #[should_panic(expected = "not listed exactly once")]
    fn validate_catches_orphan() {
        let (mut scene, [_, w1, ..]) = car_scene();
        scene.detach(w1);
        validate_scene(&scene);
    }
}
