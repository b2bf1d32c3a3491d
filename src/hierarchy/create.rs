//! "Create object" menu entries.

use crate::components::{CameraComponent, Component, ObjectKey};
use crate::scene::Scene;
use crate::ui::menu::Menu;

use super::node::MenuAction;

/// Prefabricated objects the context menu can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreateKind {
    Empty,
    Cube,
    Sphere,
    Plane,
    Camera,
}

impl CreateKind {
    /// Name given to the new object.
    pub fn object_name(self) -> &'static str {
        match self {
            CreateKind::Empty => "Object",
            CreateKind::Cube => "Cube",
            CreateKind::Sphere => "Sphere",
            CreateKind::Plane => "Plane",
            CreateKind::Camera => "Camera",
        }
    }

    fn model_path(self) -> Option<&'static str> {
        match self {
            CreateKind::Cube => Some("models/dev/box.vmdl"),
            CreateKind::Sphere => Some("models/dev/sphere.vmdl"),
            CreateKind::Plane => Some("models/dev/plane.vmdl"),
            CreateKind::Empty | CreateKind::Camera => None,
        }
    }

    /// Create the object at the top level of `scene`. Placement is the
    /// caller's job.
    pub fn spawn(self, scene: &mut Scene) -> ObjectKey {
        let key = scene.create_object(self.object_name());
        if let Some(path) = self.model_path() {
            scene.add_component(
                key,
                Component::Model {
                    path: path.to_string(),
                },
            );
        }
        if self == CreateKind::Camera {
            scene.add_component(key, Component::Camera(CameraComponent::default()));
        }
        key
    }
}

/// Append the create entries: Create Empty, 3D Object ▸ Cube/Sphere/Plane, Camera.
pub fn create_object_menu(menu: &mut Menu<MenuAction>) {
    menu.option_with_icon("Create Empty", "category", MenuAction::Create(CreateKind::Empty))
        .submenu("3D Object", |sub| {
            sub.option_with_icon("Cube", "category", MenuAction::Create(CreateKind::Cube))
                .option_with_icon("Sphere", "category", MenuAction::Create(CreateKind::Sphere))
                .option_with_icon("Plane", "category", MenuAction::Create(CreateKind::Plane));
        })
        .option_with_icon("Camera", "category", MenuAction::Create(CreateKind::Camera));
}
