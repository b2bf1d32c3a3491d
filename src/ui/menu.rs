//! Per-row context menu contract: label + action, separators, nested submenus.
//! The host shell renders it; the chosen action comes back to the panel.

#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry<A> {
    Option {
        label: &'static str,
        icon: Option<&'static str>,
        action: A,
    },
    Separator,
    Submenu {
        label: &'static str,
        entries: Vec<MenuEntry<A>>,
    },
}

/// Builder mirroring how menus are assembled line by line.
#[derive(Debug, Clone)]
pub struct Menu<A> {
    entries: Vec<MenuEntry<A>>,
}

impl<A: Clone> Menu<A> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn option(&mut self, label: &'static str, action: A) -> &mut Self {
        self.entries.push(MenuEntry::Option {
            label,
            icon: None,
            action,
        });
        self
    }

    pub fn option_with_icon(&mut self, label: &'static str, icon: &'static str, action: A) -> &mut Self {
        self.entries.push(MenuEntry::Option {
            label,
            icon: Some(icon),
            action,
        });
        self
    }

    pub fn separator(&mut self) -> &mut Self {
        self.entries.push(MenuEntry::Separator);
        self
    }

    pub fn submenu(&mut self, label: &'static str, build: impl FnOnce(&mut Menu<A>)) -> &mut Self {
        let mut sub = Menu::new();
        build(&mut sub);
        self.entries.push(MenuEntry::Submenu {
            label,
            entries: sub.entries,
        });
        self
    }

    pub fn build(self) -> Vec<MenuEntry<A>> {
        self.entries
    }
}

impl<A: Clone> Default for Menu<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a label path (`["3D Object", "Cube"]`) to its action.
pub fn find_action<A: Clone>(entries: &[MenuEntry<A>], path: &[&str]) -> Option<A> {
    let (first, rest) = path.split_first()?;
    entries.iter().find_map(|entry| match entry {
        MenuEntry::Option { label, action, .. } if label == first && rest.is_empty() => {
            Some(action.clone())
        }
        MenuEntry::Submenu { label, entries } if label == first => find_action(entries, rest),
        _ => None,
    })
}

/// Top-level labels in order; separators show as "-".
pub fn labels<A>(entries: &[MenuEntry<A>]) -> Vec<&'static str> {
    entries
        .iter()
        .map(|e| match e {
            MenuEntry::Option { label, .. } | MenuEntry::Submenu { label, .. } => *label,
            MenuEntry::Separator => "-",
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_lookup() {
        let mut menu = Menu::new();
        menu.option("Copy", 1).separator().submenu("More", |m| {
            m.option("Deep", 2);
        });
        let entries = menu.build();
        assert_eq!(labels(&entries), vec!["Copy", "-", "More"]);
        assert_eq!(find_action(&entries, &["Copy"]), Some(1));
        assert_eq!(find_action(&entries, &["More", "Deep"]), Some(2));
        assert_eq!(find_action(&entries, &["More"]), None);
        assert_eq!(find_action(&entries, &["Missing"]), None);
    }
}
