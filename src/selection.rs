//! Explicit selection context.
//!
//! Owned by the hosting shell and handed to the tree view by reference, so
//! nothing about selection lives in process-wide state.

use std::collections::HashSet;
use std::hash::Hash;

/// Unordered set of selected values plus the anchor used for range selection.
#[derive(Debug, Clone)]
pub struct Selection<T> {
    items: HashSet<T>,
    anchor: Option<T>,
}

impl<T: Copy + Eq + Hash> Selection<T> {
    pub fn new() -> Self {
        Self {
            items: HashSet::new(),
            anchor: None,
        }
    }

    /// Replace the selection with a single value.
    pub fn set(&mut self, value: T) {
        self.items.clear();
        self.items.insert(value);
        self.anchor = Some(value);
    }

    /// Add without disturbing the anchor. Returns true if newly added.
    pub fn add(&mut self, value: T) -> bool {
        if self.anchor.is_none() {
            self.anchor = Some(value);
        }
        self.items.insert(value)
    }

    pub fn remove(&mut self, value: &T) -> bool {
        if self.anchor.as_ref() == Some(value) {
            self.anchor = None;
        }
        self.items.remove(value)
    }

    /// Flip membership. An added value becomes the anchor; removing the
    /// anchor moves it to a remaining member, if any.
    pub fn toggle(&mut self, value: T) {
        if self.items.remove(&value) {
            if self.anchor == Some(value) {
                self.anchor = self.items.iter().next().copied();
            }
        } else {
            self.items.insert(value);
            self.anchor = Some(value);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.anchor = None;
    }

    pub fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }

    pub fn anchor(&self) -> Option<T> {
        self.anchor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Snapshot the current members (order unspecified).
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().copied().collect()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.items.retain(|v| keep(v));
        if let Some(a) = self.anchor
            && !self.items.contains(&a)
        {
            self.anchor = None;
        }
    }
}

impl<T: Copy + Eq + Hash> Default for Selection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces() {
        let mut sel = Selection::new();
        sel.add(1);
        sel.add(2);
        sel.set(3);
        assert_eq!(sel.len(), 1);
        assert!(sel.contains(&3));
        assert_eq!(sel.anchor(), Some(3));
    }

    #[test]
    fn toggle_flips_membership() {
        let mut sel = Selection::new();
        sel.toggle(5);
        assert!(sel.contains(&5));
        sel.toggle(5);
        assert!(!sel.contains(&5));
        assert_eq!(sel.anchor(), None);
    }

    #[test]
    fn toggling_off_the_anchor_moves_it() {
        let mut sel = Selection::new();
        sel.set(1);
        sel.toggle(2);
        assert_eq!(sel.anchor(), Some(2));
        sel.toggle(2);
        assert!(!sel.contains(&2));
        assert_eq!(sel.anchor(), Some(1));

        // Removing a non-anchor member keeps the anchor.
        sel.toggle(3);
        sel.toggle(1);
        assert_eq!(sel.anchor(), Some(3));
    }

    #[test]
    fn retain_drops_anchor_when_removed() {
        let mut sel = Selection::new();
        sel.set(1);
        sel.add(2);
        sel.retain(|&v| v != 1);
        assert_eq!(sel.to_vec(), vec![2]);
        assert_eq!(sel.anchor(), None);
    }

    #[test]
    fn add_is_idempotent() {
        let mut sel = Selection::new();
        assert!(sel.add(4));
        assert!(!sel.add(4));
        assert_eq!(sel.len(), 1);
    }
}
