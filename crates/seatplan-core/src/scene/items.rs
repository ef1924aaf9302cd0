//! Items that can be placed on the grid.

use super::ItemId;
use crate::geometry::{CellRect, Orientation, TableKind, footprint};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum edge length of a zone in cells.
pub const MIN_ZONE_SIZE: i32 = 2;

/// Common behavior of everything placed on the grid.
pub trait PlacedItem {
    /// Get the unique identifier.
    fn id(&self) -> ItemId;

    /// Top-left cell.
    fn origin(&self) -> (i32, i32);

    /// Size in cells (labels report 1x1).
    fn size(&self) -> (i32, i32);

    /// Move the top-left cell. Callers are responsible for clamping.
    fn set_origin(&mut self, x: i32, y: i32);

    /// Occupied rectangle in cells.
    fn rect(&self) -> CellRect {
        let (x, y) = self.origin();
        let (w, h) = self.size();
        CellRect::new(x, y, w, h)
    }
}

/// A banquet table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: TableKind,
    pub seat_count: u32,
    pub orientation: Orientation,
    pub grid_x: i32,
    pub grid_y: i32,
    /// Human-facing table number. Not enforced unique.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

impl Table {
    /// Create a table at the given cell with a fresh id.
    pub fn new(
        kind: TableKind,
        seat_count: u32,
        orientation: Orientation,
        grid_x: i32,
        grid_y: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            seat_count,
            orientation,
            grid_x,
            grid_y,
            number: None,
        }
    }

    /// Footprint `(width, height)` in cells.
    pub fn footprint(&self) -> (i32, i32) {
        footprint(self.kind, self.seat_count, self.orientation)
    }
}

impl PlacedItem for Table {
    fn id(&self) -> ItemId {
        self.id
    }

    fn origin(&self) -> (i32, i32) {
        (self.grid_x, self.grid_y)
    }

    fn size(&self) -> (i32, i32) {
        self.footprint()
    }

    fn set_origin(&mut self, x: i32, y: i32) {
        self.grid_x = x;
        self.grid_y = y;
    }
}

/// A named rectangular region such as a dance floor or stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: ItemId,
    pub name: String,
    pub grid_x: i32,
    pub grid_y: i32,
    pub width_cells: i32,
    pub height_cells: i32,
}

impl Zone {
    /// Create a zone with a fresh id.
    pub fn new(name: impl Into<String>, grid_x: i32, grid_y: i32, width: i32, height: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            grid_x,
            grid_y,
            width_cells: width,
            height_cells: height,
        }
    }
}

impl PlacedItem for Zone {
    fn id(&self) -> ItemId {
        self.id
    }

    fn origin(&self) -> (i32, i32) {
        (self.grid_x, self.grid_y)
    }

    fn size(&self) -> (i32, i32) {
        (self.width_cells, self.height_cells)
    }

    fn set_origin(&mut self, x: i32, y: i32) {
        self.grid_x = x;
        self.grid_y = y;
    }
}

/// A free text anchored to a single cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: ItemId,
    pub text: String,
    pub grid_x: i32,
    pub grid_y: i32,
}

impl Label {
    /// Create a label with a fresh id.
    pub fn new(text: impl Into<String>, grid_x: i32, grid_y: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            grid_x,
            grid_y,
        }
    }
}

impl PlacedItem for Label {
    fn id(&self) -> ItemId {
        self.id
    }

    fn origin(&self) -> (i32, i32) {
        (self.grid_x, self.grid_y)
    }

    fn size(&self) -> (i32, i32) {
        (1, 1)
    }

    fn set_origin(&mut self, x: i32, y: i32) {
        self.grid_x = x;
        self.grid_y = y;
    }
}
