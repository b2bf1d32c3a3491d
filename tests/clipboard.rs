//! Cut / copy / paste through the hierarchy panel's context menus and
//! keyboard shortcuts.

use outliner::components::{CameraComponent, Component, ObjectKey, ObjectRef, SceneId};
use outliner::config::OutlinerConfig;
use outliner::hierarchy::{
    Clipboard, HierarchyNode, HierarchyPanel, MemoryClipboard, NodeKey, PanelEvent,
};
use outliner::scene::{Scene, SceneKind, validate_scene};
use outliner::selection::Selection;
use outliner::session::{Session, SessionMode};
use outliner::ui::keybindings::{Key, KeyCombo};
use outliner::ui::menu::{find_action, labels};
use outliner::ui::{DrawList, ModifierFlags, MouseButton, Rect};

const VIEWPORT: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 240.0,
    height: 360.0,
};

/// Root{Car{Wheel1, Wheel2}, Tree1}
fn car_scene(seed: u64) -> Scene {
    let mut scene = Scene::new_with_seed("Root", SceneKind::Standard, seed);
    let car = scene.create_object("Car");
    let w1 = scene.create_object("Wheel1");
    let w2 = scene.create_object("Wheel2");
    scene.create_object("Tree1");
    scene.set_parent(w1, Some(car));
    scene.set_parent(w2, Some(car));
    scene
}

fn find_object(scene: &Scene, name: &str) -> Option<ObjectKey> {
    let mut stack: Vec<ObjectKey> = scene.roots().to_vec();
    while let Some(key) = stack.pop() {
        if scene.name(key) == Some(name) {
            return Some(key);
        }
        stack.extend_from_slice(scene.children(key));
    }
    None
}

struct Editor {
    session: Session,
    id: SceneId,
    panel: HierarchyPanel,
    selection: Selection<ObjectRef>,
    clipboard: MemoryClipboard,
}

impl Editor {
    fn new(scene: Scene) -> Self {
        let mut session = Session::new();
        let id = session.open(scene, SessionMode::Editor);
        let mut panel = HierarchyPanel::new(&OutlinerConfig::default());
        let mut selection = Selection::new();
        panel.tick(&session, &mut selection);
        Self {
            session,
            id,
            panel,
            selection,
            clipboard: MemoryClipboard::new(),
        }
    }

    fn scene(&self) -> &Scene {
        self.session.scene(self.id).expect("scene open")
    }

    fn key(&self, name: &str) -> ObjectKey {
        find_object(self.scene(), name).unwrap_or_else(|| panic!("no object {name}"))
    }

    fn center_of(&mut self, name: &str) -> (f32, f32) {
        let key = self.key(name);
        self.panel.reveal(&self.session, self.id, key);
        let mut draw = DrawList::new();
        self.panel
            .paint(&self.session, &self.selection, VIEWPORT, &mut draw);
        let value = self.session.object_ref(self.id, key).expect("ref");
        let row = self
            .panel
            .tree
            .row_for_value(&self.session, value)
            .expect("row built");
        let rect = self.panel.tree.row_rect(row).expect("row laid out");
        (rect.x + 40.0, rect.y + rect.height * 0.5)
    }

    fn click(&mut self, name: &str, modifiers: ModifierFlags) {
        let (x, y) = self.center_of(name);
        for pressed in [true, false] {
            self.panel.mouse_input(
                &mut self.session,
                &mut self.selection,
                MouseButton::Left,
                pressed,
                x,
                y,
                modifiers,
            );
        }
    }

    /// Right-click `name` and pick `path` from the menu that opens.
    fn menu(&mut self, name: &str, path: &[&str]) -> Option<PanelEvent> {
        let (x, y) = self.center_of(name);
        self.menu_at(x, y, path)
    }

    fn menu_at(&mut self, x: f32, y: f32, path: &[&str]) -> Option<PanelEvent> {
        let event = self.panel.mouse_input(
            &mut self.session,
            &mut self.selection,
            MouseButton::Right,
            true,
            x,
            y,
            ModifierFlags::NONE,
        );
        let Some(PanelEvent::ContextMenu { node, entries, .. }) = event else {
            panic!("expected a context menu, got {event:?}");
        };
        let action = find_action(&entries, path).unwrap_or_else(|| panic!("no entry {path:?}"));
        self.panel.run_action(
            &mut self.session,
            &mut self.selection,
            &mut self.clipboard,
            node,
            action,
        )
    }

    fn key_press(&mut self, combo: KeyCombo) -> Option<PanelEvent> {
        self.panel.handle_key(
            &mut self.session,
            &mut self.selection,
            &mut self.clipboard,
            combo,
        )
    }

    fn selected_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .selection
            .iter()
            .filter_map(|r| self.scene().name(r.object))
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }
}

#[test]
fn copy_then_paste_as_child_from_menus() {
    let mut ed = Editor::new(car_scene(1));
    assert_eq!(ed.menu("Car", &["Copy"]), None);
    ed.menu("Tree1", &["Paste As Child"]);

    assert_eq!(
        ed.scene().outline(),
        "Root{Car{Wheel1, Wheel2}, Tree1{Car{Wheel1, Wheel2}}}"
    );
    validate_scene(ed.scene());

    // The copy is selected, its parent open, and it has its own guids.
    let tree = ed.key("Tree1");
    let pasted = ed.scene().children(tree)[0];
    let original = ed.scene().roots()[0];
    assert_ne!(ed.scene().guid(pasted), ed.scene().guid(original));
    assert_eq!(ed.selection.len(), 1);
    assert_eq!(ed.selection.anchor().map(|r| r.object), Some(pasted));
    assert!(ed.panel.tree.is_key_expanded(NodeKey::Object(ed.id, tree)));
}

#[test]
fn paste_beside_a_child_lands_under_the_same_parent() {
    let mut ed = Editor::new(car_scene(2));
    ed.menu("Tree1", &["Copy"]);
    ed.menu("Wheel1", &["Paste"]);
    assert_eq!(ed.scene().outline(), "Root{Car{Wheel1, Wheel2, Tree1}, Tree1}");
}

#[test]
fn round_trip_keeps_components_and_flags() {
    let mut scene = car_scene(3);
    let cam = scene.create_object("Eye");
    let camera = CameraComponent {
        field_of_view: 75.0,
        ..CameraComponent::default()
    };
    scene.add_component(cam, Component::Camera(camera.clone()));
    let lens = scene.create_object("Lens");
    scene.set_parent(lens, Some(cam));
    scene.set_active(lens, false);

    let mut ed = Editor::new(scene);
    ed.menu("Eye", &["Copy"]);
    ed.menu("Car", &["Paste As Child"]);

    let car = ed.key("Car");
    let copy = *ed.scene().children(car).last().expect("pasted");
    let obj = ed.scene().get(copy).expect("object");
    assert_eq!(obj.name, "Eye");
    assert_eq!(obj.components, vec![Component::Camera(camera)]);
    let lens_copy = ed.scene().children(copy)[0];
    assert_eq!(ed.scene().name(lens_copy), Some("Lens"));
    assert!(!ed.scene().is_active(lens_copy));
}

#[test]
fn foreign_clipboard_text_is_ignored() {
    let mut ed = Editor::new(car_scene(4));
    ed.click("Wheel1", ModifierFlags::NONE);
    let before = ed.scene().outline();
    let revision = ed.scene().revision();

    for text in ["", "just some words", "(name: 3)", "12345"] {
        ed.clipboard.copy(text);
        assert_eq!(ed.key_press(KeyCombo::ctrl(Key::Letter('V'))), None);
        ed.menu("Car", &["Paste As Child"]);
    }
    assert_eq!(ed.scene().outline(), before);
    assert_eq!(ed.scene().revision(), revision);
    assert_eq!(ed.scene().events.since(revision).count(), 0);
    assert_eq!(ed.selected_names(), vec!["Car"]);
}

#[test]
fn cut_prunes_selection_and_paste_restores() {
    let mut ed = Editor::new(car_scene(5));
    ed.click("Wheel1", ModifierFlags::NONE);
    ed.click("Car", ModifierFlags::CTRL);
    assert_eq!(ed.selected_names(), vec!["Car", "Wheel1"]);

    ed.key_press(KeyCombo::ctrl(Key::Letter('X')));
    assert_eq!(ed.scene().outline(), "Root{Tree1}");
    assert!(ed.selection.is_empty());

    // Nothing selected: paste goes to the top level.
    ed.key_press(KeyCombo::ctrl(Key::Letter('V')));
    assert_eq!(ed.scene().outline(), "Root{Tree1, Car{Wheel1, Wheel2}}");
    assert_eq!(ed.selected_names(), vec!["Car"]);
    validate_scene(ed.scene());
}

#[test]
fn scene_row_menu_pastes_at_top_level() {
    let mut ed = Editor::new(car_scene(6));
    ed.menu("Wheel2", &["Copy"]);

    let root = ed.panel.tree.roots()[0];
    assert_eq!(ed.panel.tree.item(root), Some(&HierarchyNode::Scene(ed.id)));
    let rect = ed.panel.tree.row_rect(root).expect("root laid out");
    let event = ed.panel.mouse_input(
        &mut ed.session,
        &mut ed.selection,
        MouseButton::Right,
        true,
        rect.x + 20.0,
        rect.y + 5.0,
        ModifierFlags::NONE,
    );
    let Some(PanelEvent::ContextMenu { entries, .. }) = event else {
        panic!("expected a context menu, got {event:?}");
    };
    assert_eq!(labels(&entries), vec!["Paste", "-", "Create Empty", "3D Object", "Camera"]);

    ed.menu_at(rect.x + 20.0, rect.y + 5.0, &["Paste"]);
    assert_eq!(ed.scene().outline(), "Root{Car{Wheel1, Wheel2}, Tree1, Wheel2}");
}

#[test]
fn create_from_menu_lands_under_the_row() {
    let mut ed = Editor::new(car_scene(7));
    ed.menu("Tree1", &["3D Object", "Sphere"]);
    assert_eq!(ed.scene().outline(), "Root{Car{Wheel1, Wheel2}, Tree1{Sphere}}");
    let sphere = ed.key("Sphere");
    let components = &ed.scene().get(sphere).expect("sphere").components;
    assert_eq!(
        components,
        &vec![Component::Model {
            path: "models/dev/sphere.vmdl".into()
        }]
    );
    assert_eq!(ed.selected_names(), vec!["Sphere"]);
}

#[test]
fn delete_from_menu_and_properties() {
    let mut ed = Editor::new(car_scene(8));
    let event = ed.menu("Tree1", &["Properties.."]);
    let tree = ed.key("Tree1");
    let tree_ref = ed.session.object_ref(ed.id, tree).expect("ref");
    assert_eq!(event, Some(PanelEvent::OpenProperties(tree_ref)));

    ed.menu("Car", &["Delete"]);
    assert_eq!(ed.scene().outline(), "Root{Tree1}");
    // Right-click selected Car; the deleted object left the selection.
    assert!(ed.selection.is_empty());
}

#[test]
fn ctrl_click_off_then_cut_takes_the_remaining_object() {
    let mut ed = Editor::new(car_scene(9));
    ed.click("Wheel1", ModifierFlags::NONE);
    ed.click("Tree1", ModifierFlags::CTRL);
    ed.click("Tree1", ModifierFlags::CTRL);
    assert_eq!(ed.selected_names(), vec!["Wheel1"]);
    let wheel = ed.key("Wheel1");
    assert_eq!(ed.selection.anchor().map(|r| r.object), Some(wheel));

    ed.key_press(KeyCombo::ctrl(Key::Letter('X')));
    assert_eq!(ed.scene().outline(), "Root{Car{Wheel2}, Tree1}");
    assert!(ed.selection.is_empty());
}

#[test]
fn shortcuts_do_nothing_once_everything_is_deselected() {
    let mut ed = Editor::new(car_scene(10));
    ed.click("Tree1", ModifierFlags::NONE);
    ed.click("Tree1", ModifierFlags::CTRL);
    assert!(ed.selection.is_empty());
    let revision = ed.scene().revision();

    assert_eq!(ed.key_press(KeyCombo::ctrl(Key::Letter('C'))), None);
    assert_eq!(ed.clipboard.paste(), "");
    assert_eq!(ed.key_press(KeyCombo::ctrl(Key::Letter('X'))), None);
    assert_eq!(ed.key_press(KeyCombo::plain(Key::Delete)), None);
    assert_eq!(ed.scene().outline(), "Root{Car{Wheel1, Wheel2}, Tree1}");
    assert_eq!(ed.scene().events.since(revision).count(), 0);
}

/// Barrel{Barrel{Lid}}: a prefab whose root object is Barrel.
fn barrel_prefab() -> Scene {
    let mut prefab = Scene::new_with_seed("Barrel", SceneKind::Prefab, 11);
    let barrel = prefab.create_object("Barrel");
    let lid = prefab.create_object("Lid");
    prefab.set_parent(lid, Some(barrel));
    prefab
}

#[test]
fn delete_key_spares_the_prefab_root() {
    let mut ed = Editor::new(barrel_prefab());
    let barrel = ed.scene().roots()[0];
    let barrel_ref = ed.session.object_ref(ed.id, barrel).expect("ref");
    ed.selection.set(barrel_ref);

    assert_eq!(ed.key_press(KeyCombo::plain(Key::Delete)), None);
    assert!(ed.scene().contains(barrel));
    assert_eq!(ed.scene().outline(), "Barrel{Barrel{Lid}}");
    assert!(ed.selection.contains(&barrel_ref));

    // Cut goes through the same guard.
    ed.key_press(KeyCombo::ctrl(Key::Letter('X')));
    assert_eq!(ed.scene().outline(), "Barrel{Barrel{Lid}}");
}

#[test]
fn delete_key_removes_children_of_the_prefab_root() {
    let mut ed = Editor::new(barrel_prefab());
    ed.click("Lid", ModifierFlags::NONE);
    assert_eq!(ed.selected_names(), vec!["Lid"]);

    ed.key_press(KeyCombo::plain(Key::Delete));
    assert_eq!(ed.scene().outline(), "Barrel{Barrel}");
    assert!(ed.selection.is_empty());
    validate_scene(ed.scene());
}
