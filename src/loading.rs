use crate::components::{CameraComponent, Component, ObjectKey};
use crate::config::OutlinerConfig;
use crate::scene::{Scene, SceneKind};

/// Parse KDL text. Logs a warning and returns None on failure.
fn parse_kdl(content: &str, origin: &str) -> Option<kdl::KdlDocument> {
    match content.parse::<kdl::KdlDocument>() {
        Ok(doc) => Some(doc),
        Err(e) => {
            log::warn!("failed to parse KDL {}: {}", origin, e);
            None
        }
    }
}

/// Helper to get a float property, accepting integers too.
fn prop_f32(node: &kdl::KdlNode, key: &str) -> Option<f32> {
    let val = node.get(key)?;
    val.as_float()
        .or_else(|| val.as_integer().map(|i| i as f64))
        .map(|f| f as f32)
}

/// Load outliner settings from a RON file. Missing or malformed files fall
/// back to defaults.
pub fn load_config(path: &str) -> OutlinerConfig {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("failed to read {}: {}, using default config", path, e);
            return OutlinerConfig::default();
        }
    };
    match ron::from_str::<OutlinerConfig>(&content) {
        Ok(config) => config.sanitized(),
        Err(e) => {
            log::warn!("failed to parse RON {}: {}, using default config", path, e);
            OutlinerConfig::default()
        }
    }
}

/// Load a scene description from a KDL file.
pub fn load_scene(path: &str, seed: u64) -> Option<Scene> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("failed to read {}: {}", path, e);
            return None;
        }
    };
    scene_from_kdl(&content, path, seed)
}

/// Build a scene from KDL text:
///
/// ```kdl
/// scene "Demo" kind="standard"
/// object "Car" {
///     object "Wheel1"
///     camera fov=70
///     model "models/dev/box.vmdl"
/// }
/// object "Tree1" active=#false
/// ```
pub fn scene_from_kdl(content: &str, origin: &str, seed: u64) -> Option<Scene> {
    let doc = parse_kdl(content, origin)?;

    let mut name = "Untitled Scene".to_string();
    let mut kind = SceneKind::Standard;
    if let Some(header) = doc.nodes().iter().find(|n| n.name().value() == "scene") {
        if let Some(n) = header.get(0).and_then(|v| v.as_string()) {
            name = n.to_string();
        }
        match header.get("kind").and_then(|v| v.as_string()) {
            Some("prefab") => kind = SceneKind::Prefab,
            Some("standard") | None => {}
            Some(other) => log::warn!("{}: unknown scene kind {:?}", origin, other),
        }
    }

    let mut scene = Scene::new_with_seed(name, kind, seed);
    spawn_objects(&mut scene, doc.nodes(), None, origin);

    if kind == SceneKind::Prefab && scene.roots().len() != 1 {
        log::warn!(
            "{}: prefab scene has {} top-level objects, expected 1",
            origin,
            scene.roots().len()
        );
    }
    log::info!("loaded scene {:?} from {} ({} objects)", scene.name, origin, scene.len());
    Some(scene)
}

fn spawn_objects(scene: &mut Scene, nodes: &[kdl::KdlNode], parent: Option<ObjectKey>, origin: &str) {
    for node in nodes {
        match node.name().value() {
            "object" => {
                let name = node.get(0).and_then(|v| v.as_string()).unwrap_or_default();
                let key = scene.create_object(name);
                if parent.is_some() {
                    scene.set_parent(key, parent);
                }
                if let Some(active) = node.get("active").and_then(|v| v.as_bool()) {
                    scene.set_active(key, active);
                }
                if let Some(children) = node.children() {
                    spawn_objects(scene, children.nodes(), Some(key), origin);
                }
            }
            "camera" | "model" if parent.is_none() => {
                log::warn!("{}: {} outside an object, skipped", origin, node.name().value());
            }
            "camera" => {
                let defaults = CameraComponent::default();
                let camera = CameraComponent {
                    field_of_view: prop_f32(node, "fov").unwrap_or(defaults.field_of_view),
                    z_near: prop_f32(node, "znear").unwrap_or(defaults.z_near),
                    z_far: prop_f32(node, "zfar").unwrap_or(defaults.z_far),
                    ..defaults
                };
                if let Some(p) = parent {
                    scene.add_component(p, Component::Camera(camera));
                }
            }
            "model" => {
                let Some(path) = node.get(0).and_then(|v| v.as_string()) else {
                    log::warn!("{}: model without a path, skipped", origin);
                    continue;
                };
                if let Some(p) = parent {
                    scene.add_component(
                        p,
                        Component::Model {
                            path: path.to_string(),
                        },
                    );
                }
            }
            "scene" if parent.is_none() => {}
            other => log::warn!("{}: unknown node {:?}, skipped", origin, other),
        }
    }
}
