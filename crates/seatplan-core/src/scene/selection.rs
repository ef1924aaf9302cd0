//! Selection set shared by tables, zones and labels.

use super::ItemId;
use std::collections::HashSet;

/// Currently selected item ids.
///
/// Selection is interaction state and is never persisted. It is only changed
/// through scene actions so it always references items present in the scene.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<ItemId>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.ids.iter().copied()
    }

    /// Whether `id` is part of a selection of more than one item.
    pub fn is_multi_with(&self, id: ItemId) -> bool {
        self.ids.len() > 1 && self.ids.contains(&id)
    }

    pub(crate) fn replace(&mut self, ids: impl IntoIterator<Item = ItemId>) {
        self.ids.clear();
        self.ids.extend(ids);
    }

    /// Add `id` if absent, remove it if present.
    pub(crate) fn toggle(&mut self, id: ItemId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    pub(crate) fn remove(&mut self, id: ItemId) -> bool {
        self.ids.remove(&id)
    }

    pub(crate) fn clear(&mut self) {
        self.ids.clear();
    }
}

impl FromIterator<ItemId> for Selection {
    fn from_iter<I: IntoIterator<Item = ItemId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_toggle_is_symmetric_difference() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut selection: Selection = [a].into_iter().collect();

        selection.toggle(b);
        assert!(selection.contains(a) && selection.contains(b));

        selection.toggle(a);
        assert!(!selection.contains(a));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_multi_membership() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut selection = Selection::new();
        selection.replace([a]);
        assert!(!selection.is_multi_with(a));

        selection.replace([a, b]);
        assert!(selection.is_multi_with(a));
        assert!(!selection.is_multi_with(Uuid::new_v4()));
    }
}
