//! Scene graph: placed items, selection, and the reducer that transitions them.

mod items;
mod reducer;
mod selection;
mod store;

pub use items::{Label, MIN_ZONE_SIZE, PlacedItem, Table, Zone};
pub use reducer::{Action, MAX_BATCH_QUANTITY, ScenePatch, TABLE_GAP, TableConfig, apply};
pub use selection::Selection;
pub use store::SceneStore;

use crate::geometry::CellRect;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for placed items. Tables, zones and labels share one id space.
pub type ItemId = Uuid;

/// Default number of grid columns.
pub const DEFAULT_GRID_COLS: i32 = 50;
/// Default number of grid rows.
pub const DEFAULT_GRID_ROWS: i32 = 35;

/// Reference to an item together with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRef {
    Table(ItemId),
    Zone(ItemId),
    Label(ItemId),
}

impl ItemRef {
    pub fn id(&self) -> ItemId {
        match self {
            ItemRef::Table(id) | ItemRef::Zone(id) | ItemRef::Label(id) => *id,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, ItemRef::Table(_))
    }
}

/// The persisted set of placed items plus the table numbering counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub grid_cols: i32,
    pub grid_rows: i32,
    pub tables: Vec<Table>,
    pub zones: Vec<Zone>,
    pub labels: Vec<Label>,
    /// Next table number. Never decreases.
    pub table_counter: u32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_COLS, DEFAULT_GRID_ROWS)
    }
}

impl Scene {
    /// Create an empty scene with the given grid bounds.
    pub fn new(grid_cols: i32, grid_rows: i32) -> Self {
        Self {
            grid_cols,
            grid_rows,
            tables: Vec::new(),
            zones: Vec::new(),
            labels: Vec::new(),
            table_counter: 1,
        }
    }

    pub fn table(&self, id: ItemId) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn zone(&self, id: ItemId) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn label(&self, id: ItemId) -> Option<&Label> {
        self.labels.iter().find(|l| l.id == id)
    }

    pub(crate) fn table_mut(&mut self, id: ItemId) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.id == id)
    }

    pub(crate) fn zone_mut(&mut self, id: ItemId) -> Option<&mut Zone> {
        self.zones.iter_mut().find(|z| z.id == id)
    }

    pub(crate) fn label_mut(&mut self, id: ItemId) -> Option<&mut Label> {
        self.labels.iter_mut().find(|l| l.id == id)
    }

    /// Resolve an id to a typed reference.
    pub fn item_ref(&self, id: ItemId) -> Option<ItemRef> {
        if self.table(id).is_some() {
            Some(ItemRef::Table(id))
        } else if self.zone(id).is_some() {
            Some(ItemRef::Zone(id))
        } else if self.label(id).is_some() {
            Some(ItemRef::Label(id))
        } else {
            None
        }
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.item_ref(id).is_some()
    }

    /// Occupied rectangle of any item.
    pub fn item_rect(&self, id: ItemId) -> Option<CellRect> {
        self.table(id)
            .map(PlacedItem::rect)
            .or_else(|| self.zone(id).map(PlacedItem::rect))
            .or_else(|| self.label(id).map(PlacedItem::rect))
    }

    /// All items in paint order (zones at the back, labels at the front).
    pub fn items(&self) -> impl Iterator<Item = (ItemRef, CellRect)> + '_ {
        let zones = self.zones.iter().map(|z| (ItemRef::Zone(z.id), z.rect()));
        let tables = self.tables.iter().map(|t| (ItemRef::Table(t.id), t.rect()));
        let labels = self.labels.iter().map(|l| (ItemRef::Label(l.id), l.rect()));
        zones.chain(tables).chain(labels)
    }

    /// Topmost item under a fractional cell point.
    pub fn item_at(&self, point: Point) -> Option<ItemRef> {
        let hits: Vec<_> = self
            .items()
            .filter(|(_, rect)| rect.contains(point))
            .map(|(item, _)| item)
            .collect();
        hits.last().copied()
    }

    /// Ids of every item whose rectangle touches `rect` (fractional cells).
    pub fn items_touching(&self, rect: Rect) -> Vec<ItemId> {
        self.items()
            .filter(|(_, r)| r.touches(rect))
            .map(|(item, _)| item.id())
            .collect()
    }

    /// Union of all item rectangles.
    pub fn bounds(&self) -> Option<CellRect> {
        self.items()
            .map(|(_, rect)| rect)
            .reduce(|acc, rect| acc.union(rect))
    }

    pub fn len(&self) -> usize {
        self.tables.len() + self.zones.len() + self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
