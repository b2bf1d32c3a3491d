use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Handle into a scene's object arena. Only meaningful for the scene that issued it.
    pub struct ObjectKey;
    /// Handle into the session's open scenes.
    pub struct SceneId;
}

/// Stable object identity. Survives play-mode clones and view rebuilds.
/// Never use raw u64 where a Guid is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Guid(pub u64);

/// Scene revision counter. Bumped once per structural edit.
/// Never cast between Revision and Guid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Revision(pub u64);

/// Reference to one object in one open scene.
///
/// This is what the selection holds. The guid is captured alongside the handle
/// so the reference can be re-resolved against another scene after a resync,
/// even when the scene that issued `object` has since been closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub scene: SceneId,
    pub object: ObjectKey,
    pub guid: Guid,
}

/// Which parts of the target a camera clears before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearFlags {
    pub color: bool,
    pub depth: bool,
    pub stencil: bool,
}

impl Default for ClearFlags {
    fn default() -> Self {
        Self {
            color: true,
            depth: true,
            stencil: true,
        }
    }
}

/// Camera settings attached to an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraComponent {
    pub clear_flags: ClearFlags,
    /// sRGB RGBA, default #557685.
    pub background_color: [f32; 4],
    pub field_of_view: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            clear_flags: ClearFlags::default(),
            background_color: [
                0x55 as f32 / 255.0,
                0x76 as f32 / 255.0,
                0x85 as f32 / 255.0,
                1.0,
            ],
            field_of_view: 60.0,
            z_near: 10.0,
            z_far: 10_000.0,
        }
    }
}

/// Closed set of components an object can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Component {
    /// Renders a model asset.
    Model { path: String },
    Camera(CameraComponent),
}

impl Component {
    pub fn is_camera(&self) -> bool {
        matches!(self, Component::Camera(_))
    }

    pub fn is_model(&self) -> bool {
        matches!(self, Component::Model { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_defaults() {
        let cam = CameraComponent::default();
        assert!((cam.field_of_view - 60.0).abs() < 0.001);
        assert!((cam.z_near - 10.0).abs() < 0.001);
        assert!((cam.z_far - 10_000.0).abs() < 0.001);
        assert!(cam.clear_flags.color && cam.clear_flags.depth && cam.clear_flags.stencil);
        // #557685
        assert!((cam.background_color[0] - 0.333).abs() < 0.01);
        assert!((cam.background_color[1] - 0.463).abs() < 0.01);
        assert!((cam.background_color[2] - 0.522).abs() < 0.01);
    }

    #[test]
    fn component_kinds() {
        let model = Component::Model {
            path: "models/dev/box.vmdl".to_string(),
        };
        let cam = Component::Camera(CameraComponent::default());
        assert!(model.is_model() && !model.is_camera());
        assert!(cam.is_camera() && !cam.is_model());
    }
}
