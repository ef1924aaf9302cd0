//! Inline edit sessions for zone names, label texts and table numbers.

use crate::scene::{Action, ItemId, ItemRef, Scene};

/// The field being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditTarget {
    ZoneName(ItemId),
    LabelText(ItemId),
    TableNumber(ItemId),
}

impl EditTarget {
    pub fn id(&self) -> ItemId {
        match self {
            EditTarget::ZoneName(id) | EditTarget::LabelText(id) | EditTarget::TableNumber(id) => {
                *id
            }
        }
    }
}

impl From<ItemRef> for EditTarget {
    fn from(item: ItemRef) -> Self {
        match item {
            ItemRef::Table(id) => EditTarget::TableNumber(id),
            ItemRef::Zone(id) => EditTarget::ZoneName(id),
            ItemRef::Label(id) => EditTarget::LabelText(id),
        }
    }
}

/// An open edit with its text buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    target: EditTarget,
    buffer: String,
}

impl EditSession {
    /// Open a session on `item`, seeding the buffer with its current value.
    ///
    /// Returns `None` if the item is not in the scene.
    pub fn begin(scene: &Scene, item: ItemRef) -> Option<Self> {
        let target = EditTarget::from(item);
        let buffer = match target {
            EditTarget::ZoneName(id) => scene.zone(id)?.name.clone(),
            EditTarget::LabelText(id) => scene.label(id)?.text.clone(),
            EditTarget::TableNumber(id) => scene
                .table(id)?
                .number
                .map(|n| n.to_string())
                .unwrap_or_default(),
        };
        Some(Self { target, buffer })
    }

    pub fn target(&self) -> EditTarget {
        self.target
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    /// Whether the edited item is still present.
    pub fn is_live(&self, scene: &Scene) -> bool {
        match self.target {
            EditTarget::ZoneName(id) => scene.zone(id).is_some(),
            EditTarget::LabelText(id) => scene.label(id).is_some(),
            EditTarget::TableNumber(id) => scene.table(id).is_some(),
        }
    }

    /// Close the session, producing the action to dispatch.
    ///
    /// Invalid entries yield `None`: table numbers must be positive integers,
    /// names and texts must be non-empty after trimming.
    pub fn commit(self) -> Option<Action> {
        let text = self.buffer.trim();
        match self.target {
            EditTarget::TableNumber(id) => match text.parse::<u32>() {
                Ok(number) if number > 0 => Some(Action::RenumberTable { id, number }),
                _ => {
                    log::debug!("Discarding table number entry {:?}", self.buffer);
                    None
                }
            },
            _ if text.is_empty() => None,
            EditTarget::ZoneName(id) => Some(Action::RenameZone {
                id,
                name: text.to_string(),
            }),
            EditTarget::LabelText(id) => Some(Action::RenameLabel {
                id,
                text: text.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Orientation, TableKind};
    use crate::scene::{Label, Table, Zone};

    fn scene() -> (Scene, ItemId, ItemId, ItemId) {
        let mut scene = Scene::default();
        let mut table = Table::new(TableKind::Regular, 12, Orientation::Row, 1, 1);
        table.number = Some(4);
        let zone = Zone::new("Stage", 10, 10, 4, 2);
        let label = Label::new("Bar", 20, 20);
        let ids = (table.id, zone.id, label.id);
        scene.tables.push(table);
        scene.zones.push(zone);
        scene.labels.push(label);
        (scene, ids.0, ids.1, ids.2)
    }

    #[test]
    fn test_begin_seeds_buffer() {
        let (scene, table, zone, label) = scene();
        let session = EditSession::begin(&scene, ItemRef::Table(table)).unwrap();
        assert_eq!(session.text(), "4");
        assert_eq!(session.target(), EditTarget::TableNumber(table));

        let session = EditSession::begin(&scene, ItemRef::Zone(zone)).unwrap();
        assert_eq!(session.text(), "Stage");

        let session = EditSession::begin(&scene, ItemRef::Label(label)).unwrap();
        assert_eq!(session.text(), "Bar");

        assert!(EditSession::begin(&scene, ItemRef::Zone(table)).is_none());
    }

    #[test]
    fn test_commit_table_number() {
        let (scene, table, ..) = scene();
        let mut session = EditSession::begin(&scene, ItemRef::Table(table)).unwrap();
        session.set_text(" 12 ");
        assert_eq!(
            session.commit(),
            Some(Action::RenumberTable { id: table, number: 12 })
        );

        for bad in ["0", "-3", "abc", "", "1.5"] {
            let mut session = EditSession::begin(&scene, ItemRef::Table(table)).unwrap();
            session.set_text(bad);
            assert_eq!(session.commit(), None, "{bad:?} should be discarded");
        }
    }

    #[test]
    fn test_commit_trims_text() {
        let (scene, _, zone, label) = scene();
        let mut session = EditSession::begin(&scene, ItemRef::Zone(zone)).unwrap();
        session.set_text("  Dance floor ");
        assert_eq!(
            session.commit(),
            Some(Action::RenameZone {
                id: zone,
                name: "Dance floor".to_string()
            })
        );

        let mut session = EditSession::begin(&scene, ItemRef::Label(label)).unwrap();
        session.set_text("   ");
        assert_eq!(session.commit(), None);
    }

    #[test]
    fn test_liveness() {
        let (mut scene, _, zone, _) = scene();
        let session = EditSession::begin(&scene, ItemRef::Zone(zone)).unwrap();
        assert!(session.is_live(&scene));
        scene.zones.clear();
        assert!(!session.is_live(&scene));
    }
}
