//! Portable text form of an object subtree.
//!
//! This is the clipboard wire format. It carries names, flags, components and
//! child structure but no identity: pasting always yields fresh guids.

use serde::{Deserialize, Serialize};

use crate::components::Component;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDocument {
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub children: Vec<ObjectDocument>,
}

fn default_active() -> bool {
    true
}

impl ObjectDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            components: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Render as pretty RON text.
    pub fn to_text(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Parse RON text produced by [`ObjectDocument::to_text`].
    pub fn parse(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Number of objects in this document, root included.
    pub fn object_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ObjectDocument::object_count)
            .sum::<usize>()
    }
}
