//! Open scenes and the one the editor is currently looking at.

use slotmap::SlotMap;

use crate::components::{ObjectKey, ObjectRef, SceneId};
use crate::scene::{Scene, SceneKind};

/// How a scene is open. Game sessions run a play-mode copy of an editor scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Editor,
    Game,
}

pub struct SceneSession {
    pub scene: Scene,
    pub mode: SessionMode,
}

impl SceneSession {
    /// Prefab scenes get a dedicated root only while edited, not while played.
    pub fn is_prefab_editor(&self) -> bool {
        self.mode == SessionMode::Editor && self.scene.kind == SceneKind::Prefab
    }
}

/// Owner of every open scene. The hierarchy panel polls `active()` each tick.
pub struct Session {
    scenes: SlotMap<SceneId, SceneSession>,
    active: Option<SceneId>,
    next_seed: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            scenes: SlotMap::with_key(),
            active: None,
            next_seed: 1,
        }
    }

    /// Open a scene and make it active.
    pub fn open(&mut self, scene: Scene, mode: SessionMode) -> SceneId {
        let id = self.scenes.insert(SceneSession { scene, mode });
        self.active = Some(id);
        log::info!("opened scene {:?} ({:?})", id, mode);
        id
    }

    /// Close a scene. If it was active, nothing is active afterwards.
    pub fn close(&mut self, id: SceneId) -> Option<Scene> {
        let closed = self.scenes.remove(id)?;
        if self.active == Some(id) {
            self.active = None;
        }
        Some(closed.scene)
    }

    /// Switch the active scene. Unknown ids are ignored.
    pub fn set_active(&mut self, id: Option<SceneId>) {
        match id {
            Some(id) if !self.scenes.contains_key(id) => {
                log::warn!("ignoring activation of unknown scene {:?}", id);
            }
            _ => self.active = id,
        }
    }

    pub fn active(&self) -> Option<SceneId> {
        self.active
    }

    pub fn get(&self, id: SceneId) -> Option<&SceneSession> {
        self.scenes.get(id)
    }

    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(id).map(|s| &s.scene)
    }

    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.get_mut(id).map(|s| &mut s.scene)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Build a selection reference for an object of an open scene.
    pub fn object_ref(&self, scene: SceneId, object: ObjectKey) -> Option<ObjectRef> {
        let guid = self.scene(scene)?.guid(object)?;
        Some(ObjectRef {
            scene,
            object,
            guid,
        })
    }

    /// Enter play mode: copy an editor scene into a new game session and
    /// activate it. Object guids carry over so selections can follow.
    pub fn start_play(&mut self, id: SceneId) -> Option<SceneId> {
        let seed = self.next_seed;
        self.next_seed += 1;
        let copy = self.scene(id)?.clone_for_play(seed);
        Some(self.open(copy, SessionMode::Game))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_activates_and_close_deactivates() {
        let mut session = Session::new();
        assert_eq!(session.active(), None);
        let id = session.open(
            Scene::new_with_seed("Level", SceneKind::Standard, 1),
            SessionMode::Editor,
        );
        assert_eq!(session.active(), Some(id));
        assert!(session.close(id).is_some());
        assert_eq!(session.active(), None);
        assert!(session.is_empty());
    }

    #[test]
    fn unknown_scene_is_not_activated() {
        let mut session = Session::new();
        let id = session.open(
            Scene::new_with_seed("Level", SceneKind::Standard, 1),
            SessionMode::Editor,
        );
        session.close(id);
        let other = session.open(
            Scene::new_with_seed("Other", SceneKind::Standard, 2),
            SessionMode::Editor,
        );
        session.set_active(Some(id));
        assert_eq!(session.active(), Some(other));
    }

    #[test]
    fn play_copy_resolves_same_guids() {
        let mut session = Session::new();
        let mut scene = Scene::new_with_seed("Level", SceneKind::Standard, 1);
        let car = scene.create_object("Car");
        let editor = session.open(scene, SessionMode::Editor);
        let r = session.object_ref(editor, car).expect("ref");

        let game = session.start_play(editor).expect("play");
        assert_eq!(session.active(), Some(game));
        let resolved = session.scene(game).and_then(|s| s.find_by_guid(r.guid));
        assert!(resolved.is_some());
        assert_eq!(session.get(game).map(|s| s.mode), Some(SessionMode::Game));
    }

    #[test]
    fn prefab_root_only_in_editor() {
        let mut session = Session::new();
        let prefab = Scene::new_with_seed("Crate", SceneKind::Prefab, 1);
        let editor = session.open(prefab, SessionMode::Editor);
        let game = session.start_play(editor).expect("play");
        assert!(session.get(editor).is_some_and(|s| s.is_prefab_editor()));
        assert!(!session.get(game).is_some_and(|s| s.is_prefab_editor()));
    }
}
