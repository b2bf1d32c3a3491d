use std::collections::HashMap;

/// Physical keys the outliner reacts to (decoupled from any windowing crate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Delete,
    Enter,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// Letter keys, always uppercase.
    Letter(char),
}

/// Modifier flags for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierFlags {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl ModifierFlags {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };
    pub const CTRL_SHIFT: Self = Self {
        shift: true,
        ctrl: true,
        alt: false,
    };
}

/// A key combination: modifier flags + a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub modifiers: ModifierFlags,
    pub key: Key,
}

impl KeyCombo {
    /// Plain key, no modifiers.
    pub const fn plain(key: Key) -> Self {
        Self {
            modifiers: ModifierFlags::NONE,
            key,
        }
    }

    pub const fn ctrl(key: Key) -> Self {
        Self {
            modifiers: ModifierFlags::CTRL,
            key,
        }
    }
}

/// Actions that can be triggered by keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Cut,
    Copy,
    Paste,
    PasteAsChild,
    Delete,
    /// Abort a drag in progress.
    CancelDrag,
    SelectPrevious,
    SelectNext,
    Collapse,
    Expand,
}

/// Configurable keyboard shortcut map.
pub struct KeyBindings {
    map: HashMap<KeyCombo, Action>,
    /// Reverse lookup: action → first combo that maps to it.
    reverse: HashMap<Action, KeyCombo>,
}

impl KeyBindings {
    pub fn defaults() -> Self {
        let bindings = [
            (KeyCombo::ctrl(Key::Letter('X')), Action::Cut),
            (KeyCombo::ctrl(Key::Letter('C')), Action::Copy),
            (KeyCombo::ctrl(Key::Letter('V')), Action::Paste),
            (
                KeyCombo {
                    modifiers: ModifierFlags::CTRL_SHIFT,
                    key: Key::Letter('V'),
                },
                Action::PasteAsChild,
            ),
            (KeyCombo::plain(Key::Delete), Action::Delete),
            (KeyCombo::plain(Key::Escape), Action::CancelDrag),
            (KeyCombo::plain(Key::ArrowUp), Action::SelectPrevious),
            (KeyCombo::plain(Key::ArrowDown), Action::SelectNext),
            (KeyCombo::plain(Key::ArrowLeft), Action::Collapse),
            (KeyCombo::plain(Key::ArrowRight), Action::Expand),
        ];
        let mut map = HashMap::new();
        let mut reverse = HashMap::new();
        for (combo, action) in bindings {
            map.insert(combo, action);
            reverse.entry(action).or_insert(combo);
        }
        Self { map, reverse }
    }

    /// Look up the action for a key combination.
    pub fn lookup(&self, combo: KeyCombo) -> Option<Action> {
        self.map.get(&combo).copied()
    }

    /// Rebind `combo`. Any previous action on that combo is replaced and
    /// loses its label unless another combo still maps to it.
    pub fn bind(&mut self, combo: KeyCombo, action: Action) {
        if let Some(displaced) = self.map.insert(combo, action)
            && displaced != action
            && self.reverse.get(&displaced) == Some(&combo)
        {
            self.reverse.remove(&displaced);
            if let Some((&other, _)) = self.map.iter().find(|(_, a)| **a == displaced) {
                self.reverse.insert(displaced, other);
            }
        }
        self.reverse.insert(action, combo);
    }

    /// Get the display label for an action's keybinding (e.g. "Ctrl+Shift+V").
    pub fn label_for(&self, action: Action) -> Option<String> {
        self.reverse.get(&action).map(|combo| {
            let mut parts: Vec<String> = Vec::new();
            if combo.modifiers.ctrl {
                parts.push("Ctrl".into());
            }
            if combo.modifiers.alt {
                parts.push("Alt".into());
            }
            if combo.modifiers.shift {
                parts.push("Shift".into());
            }
            parts.push(key_name(combo.key));
            parts.join("+")
        })
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Human-readable name for a key.
fn key_name(key: Key) -> String {
    match key {
        Key::Escape => "Esc".into(),
        Key::Delete => "Del".into(),
        Key::Enter => "Enter".into(),
        Key::ArrowUp => "Up".into(),
        Key::ArrowDown => "Down".into(),
        Key::ArrowLeft => "Left".into(),
        Key::ArrowRight => "Right".into(),
        Key::Letter(c) => c.to_ascii_uppercase().to_string(),
    }
}
