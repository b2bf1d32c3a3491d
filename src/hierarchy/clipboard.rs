//! Cut / copy / paste of object subtrees through a text clipboard.
//!
//! The clipboard holds a RON `ObjectDocument`. Anything else on the clipboard
//! makes paste a silent no-op.

use crate::components::ObjectKey;
use crate::document::ObjectDocument;
use crate::scene::Scene;

/// System clipboard contract: plain text in, plain text out.
pub trait Clipboard {
    fn copy(&mut self, text: &str);
    fn paste(&self) -> String;
}

/// In-process clipboard.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: String,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn paste(&self) -> String {
        self.text.clone()
    }
}

/// Where a pasted object goes relative to the paste target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PastePlacement {
    /// Last child of the target's parent (or last top-level object).
    Sibling,
    /// Last child of the target.
    Child,
}

/// Serialize `object` and its subtree onto the clipboard. Returns false if
/// the object is gone or cannot be written.
pub fn copy(scene: &Scene, object: ObjectKey, clipboard: &mut impl Clipboard) -> bool {
    let Some(doc) = scene.serialize(object) else {
        return false;
    };
    match doc.to_text() {
        Ok(text) => {
            clipboard.copy(&text);
            log::debug!("copied {} object(s)", doc.object_count());
            true
        }
        Err(e) => {
            log::warn!("could not write {:?} to the clipboard: {}", doc.name, e);
            false
        }
    }
}

/// Copy, then destroy the object and its subtree.
pub fn cut(scene: &mut Scene, object: ObjectKey, clipboard: &mut impl Clipboard) -> bool {
    if !copy(scene, object, clipboard) {
        return false;
    }
    scene.destroy(object)
}

/// Recreate the clipboard document next to or under `target`
/// (`None`: the scene's top level). Returns the new object, or `None` when
/// the clipboard does not hold a document.
pub fn paste(
    scene: &mut Scene,
    target: Option<ObjectKey>,
    placement: PastePlacement,
    clipboard: &impl Clipboard,
) -> Option<ObjectKey> {
    let text = clipboard.paste();
    let doc = match ObjectDocument::parse(&text) {
        Ok(doc) => doc,
        Err(e) => {
            log::debug!("clipboard does not hold an object: {}", e);
            return None;
        }
    };
    if let Some(t) = target
        && !scene.contains(t)
    {
        return None;
    }

    let parent = match placement {
        PastePlacement::Child => target,
        PastePlacement::Sibling => target.and_then(|t| scene.parent(t)),
    };

    let created = scene.create_object(doc.name.clone());
    scene.deserialize_into(created, &doc);
    if parent.is_some() {
        scene.set_parent(created, parent);
    }
    log::info!(
        "pasted {:?} ({} object(s))",
        doc.name,
        doc.object_count()
    );
    Some(created)
}
