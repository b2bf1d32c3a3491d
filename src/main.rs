//! Headless outliner demo.
//!
//! Loads the demo scene, drives the hierarchy panel with simulated pointer
//! input (two drag-drop reparents, a copy/paste, play mode) and prints the
//! rows the panel would draw after each step.

use outliner::components::{ObjectKey, ObjectRef, Revision, SceneId};
use outliner::events::SceneEvent;
use outliner::hierarchy::{HierarchyPanel, MemoryClipboard};
use outliner::loading;
use outliner::scene::{Scene, SceneKind};
use outliner::selection::Selection;
use outliner::session::{Session, SessionMode};
use outliner::ui::keybindings::{Key, KeyCombo};
use outliner::ui::{DrawList, DropEdge, ModifierFlags, MouseButton, Rect};

const VIEWPORT: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 320.0,
    height: 480.0,
};

/// Root{Car{Wheel1, Wheel2}, Tree1}, used when the data file is missing.
fn fallback_scene() -> Scene {
    let mut scene = Scene::new_with_seed("Root", SceneKind::Standard, 42);
    let car = scene.create_object("Car");
    let w1 = scene.create_object("Wheel1");
    let w2 = scene.create_object("Wheel2");
    scene.create_object("Tree1");
    scene.set_parent(w1, Some(car));
    scene.set_parent(w2, Some(car));
    scene
}

/// Depth-first lookup by name.
fn find_object(scene: &Scene, name: &str) -> Option<ObjectKey> {
    let mut stack: Vec<ObjectKey> = scene.roots().iter().rev().copied().collect();
    while let Some(key) = stack.pop() {
        if scene.name(key) == Some(name) {
            return Some(key);
        }
        stack.extend(scene.children(key).iter().rev());
    }
    None
}

struct Demo {
    session: Session,
    scene: SceneId,
    panel: HierarchyPanel,
    selection: Selection<ObjectRef>,
    clipboard: MemoryClipboard,
    draw: DrawList,
}

impl Demo {
    fn frame(&mut self, title: &str) {
        self.panel.tick(&self.session, &mut self.selection);
        self.draw.clear();
        self.panel
            .paint(&self.session, &self.selection, VIEWPORT, &mut self.draw);

        println!("-- {title}");
        let indent = self.panel.tree.metrics.indent;
        for (text, icon) in self.draw.texts.iter().zip(self.row_icons()) {
            let depth = ((text.x - self.panel.theme.icon_advance - self.panel.theme.expander_width)
                / indent)
                .round()
                .max(0.0) as usize;
            println!("{}[{}] {}", "  ".repeat(depth), icon, text.text);
        }
    }

    /// Row icons, skipping expander arrows.
    fn row_icons(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.draw
            .icons
            .iter()
            .map(|i| i.name)
            .filter(|n| !n.starts_with("arrow_"))
    }

    /// Point on the row of `name` for the given drop edge.
    fn point_on(&mut self, name: &str, edge: DropEdge) -> Option<(f32, f32)> {
        let scene = self.session.scene(self.scene)?;
        let object = find_object(scene, name)?;
        self.panel.reveal(&self.session, self.scene, object);
        self.frame_silent();
        let value = self.session.object_ref(self.scene, object)?;
        let row = self.panel.tree.row_for_value(&self.session, value)?;
        let rect = self.panel.tree.row_rect(row)?;
        let y = match edge {
            DropEdge::Top => rect.y + 1.0,
            DropEdge::Bottom => rect.bottom() - 1.0,
            DropEdge::Middle => rect.y + rect.height * 0.5,
        };
        Some((rect.x + 30.0, y))
    }

    fn frame_silent(&mut self) {
        self.draw.clear();
        self.panel
            .paint(&self.session, &self.selection, VIEWPORT, &mut self.draw);
    }

    /// Press on `from`, move past the drag threshold, release on `to`.
    fn drag(&mut self, from: &str, to: &str, edge: DropEdge) -> bool {
        let Some((sx, sy)) = self.point_on(from, DropEdge::Middle) else {
            log::warn!("no row named {from:?}");
            return false;
        };
        self.panel.mouse_input(
            &mut self.session,
            &mut self.selection,
            MouseButton::Left,
            true,
            sx,
            sy,
            ModifierFlags::NONE,
        );
        self.panel.cursor_moved(&mut self.session, sx + 10.0, sy);
        let Some((tx, ty)) = self.point_on(to, edge) else {
            log::warn!("no row named {to:?}");
            self.panel.ui.cancel(&mut self.panel.tree);
            return false;
        };
        self.panel.cursor_moved(&mut self.session, tx, ty);
        let event = self.panel.mouse_input(
            &mut self.session,
            &mut self.selection,
            MouseButton::Left,
            false,
            tx,
            ty,
            ModifierFlags::NONE,
        );
        log::info!("drag {from:?} -> {to:?} ({edge:?}): {event:?}");
        true
    }

    /// Press and release on the row of `name`.
    fn click(&mut self, name: &str) -> bool {
        let Some((x, y)) = self.point_on(name, DropEdge::Middle) else {
            log::warn!("no row named {name:?}");
            return false;
        };
        for pressed in [true, false] {
            self.panel.mouse_input(
                &mut self.session,
                &mut self.selection,
                MouseButton::Left,
                pressed,
                x,
                y,
                ModifierFlags::NONE,
            );
        }
        true
    }

    /// Print the structural edits made after `revision`.
    fn history(&self, revision: Revision) {
        let Some(scene) = self.session.scene(self.scene) else {
            return;
        };
        println!("-- edits");
        for event in scene.events.since(revision) {
            let name = scene
                .find_by_guid(event.guid())
                .and_then(|k| scene.name(k))
                .unwrap_or("<gone>");
            match event {
                SceneEvent::Created { revision, .. } => println!("r{} created {name}", revision.0),
                SceneEvent::Destroyed { revision, .. } => {
                    println!("r{} destroyed {:?}", revision.0, event.guid())
                }
                SceneEvent::Reparented { index, revision, .. } => {
                    println!("r{} moved {name} to slot {index}", revision.0)
                }
                SceneEvent::Renamed { name, revision, .. } => {
                    println!("r{} renamed to {name}", revision.0)
                }
            }
        }
    }

    fn outline(&self) -> String {
        self.session
            .scene(self.scene)
            .map(Scene::outline)
            .unwrap_or_default()
    }
}

fn main() {
    env_logger::init();

    let config = loading::load_config("data/outliner.ron");
    let scene = loading::load_scene("data/demo_scene.kdl", 42).unwrap_or_else(fallback_scene);

    let mut session = Session::new();
    let scene_id = session.open(scene, SessionMode::Editor);
    let mut demo = Demo {
        session,
        scene: scene_id,
        panel: HierarchyPanel::new(&config),
        selection: Selection::new(),
        clipboard: MemoryClipboard::new(),
        draw: DrawList::new(),
    };

    demo.frame("loaded");
    let loaded = demo
        .session
        .scene(demo.scene)
        .map(Scene::revision)
        .unwrap_or_default();

    if demo.drag("Wheel1", "Tree1", DropEdge::Bottom) {
        demo.frame("Wheel1 dropped below Tree1");
    }
    if demo.drag("Car", "Tree1", DropEdge::Middle) {
        demo.frame("Car dropped onto Tree1");
    }
    // Refused: a parent onto its own child.
    if demo.drag("Tree1", "Car", DropEdge::Middle) {
        demo.frame("Tree1 onto its child Car (refused)");
    }

    demo.click("Wheel1");
    let combo_copy = KeyCombo::ctrl(Key::Letter('C'));
    let combo_paste = KeyCombo::ctrl(Key::Letter('V'));
    demo.panel
        .handle_key(&mut demo.session, &mut demo.selection, &mut demo.clipboard, combo_copy);
    demo.panel
        .handle_key(&mut demo.session, &mut demo.selection, &mut demo.clipboard, combo_paste);
    demo.frame("Wheel1 copied and pasted");
    demo.history(loaded);

    let before = demo.selection.len();
    if let Some(play) = demo.session.start_play(demo.scene) {
        demo.scene = play;
        demo.frame("play mode");
        log::info!(
            "selection followed into play mode: {}/{}",
            demo.selection.len(),
            before
        );
    }

    println!("{}", demo.outline());
}
