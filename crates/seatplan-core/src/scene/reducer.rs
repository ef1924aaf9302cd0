//! Scene transitions.
//!
//! Every change to a scene goes through [`apply`]. Transitions are total:
//! coordinates are clamped into the grid, unknown ids are ignored, and no
//! transition panics or returns an error.

use super::{ItemId, Label, MIN_ZONE_SIZE, PlacedItem, Scene, Selection, Table, Zone};
use crate::geometry::{Orientation, TableKind, clamp_rect, footprint};
use serde::{Deserialize, Serialize};

/// Largest number of tables a single add can create.
pub const MAX_BATCH_QUANTITY: u32 = 20;

/// Gap in cells between tables created by one batch add.
pub const TABLE_GAP: i32 = 1;

/// Parameters for adding one or more tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    #[serde(rename = "type")]
    pub kind: TableKind,
    /// Overrides the kind's default seat count.
    #[serde(default)]
    pub seat_count: Option<u32>,
    #[serde(default)]
    pub orientation: Orientation,
    /// Number of tables to lay out, clamped to `1..=MAX_BATCH_QUANTITY`.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new(TableKind::default())
    }
}

impl TableConfig {
    pub fn new(kind: TableKind) -> Self {
        Self {
            kind,
            seat_count: None,
            orientation: Orientation::default(),
            quantity: 1,
        }
    }

    pub fn with_seats(mut self, seat_count: u32) -> Self {
        self.seat_count = Some(seat_count);
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Effective seat count.
    pub fn seats(&self) -> u32 {
        self.seat_count.unwrap_or_else(|| self.kind.default_seats())
    }
}

/// Partial scene used to hydrate from persisted data. `None` fields keep their
/// current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenePatch {
    pub grid_cols: Option<i32>,
    pub grid_rows: Option<i32>,
    pub tables: Option<Vec<Table>>,
    pub zones: Option<Vec<Zone>>,
    pub labels: Option<Vec<Label>>,
    pub table_counter: Option<u32>,
}

impl ScenePatch {
    /// A patch replacing every field of the scene.
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            grid_cols: Some(scene.grid_cols),
            grid_rows: Some(scene.grid_rows),
            tables: Some(scene.tables.clone()),
            zones: Some(scene.zones.clone()),
            labels: Some(scene.labels.clone()),
            table_counter: Some(scene.table_counter),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A scene transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Lay out `config.quantity` tables around an anchor cell.
    AddTable {
        config: TableConfig,
        anchor_x: i32,
        anchor_y: i32,
    },
    AddZone {
        name: String,
        anchor_x: i32,
        anchor_y: i32,
        width: i32,
        height: i32,
    },
    AddLabel {
        text: String,
        anchor_x: i32,
        anchor_y: i32,
    },
    /// Move a table, dragging the rest of a multi-selection along with it.
    MoveTable { id: ItemId, x: i32, y: i32 },
    MoveZone { id: ItemId, x: i32, y: i32 },
    MoveLabel { id: ItemId, x: i32, y: i32 },
    ResizeZone { id: ItemId, width: i32, height: i32 },
    RenameZone { id: ItemId, name: String },
    RenameLabel { id: ItemId, text: String },
    RenumberTable { id: ItemId, number: u32 },
    RemoveSelected,
    RemoveTable { id: ItemId },
    RemoveZone { id: ItemId },
    RemoveLabel { id: ItemId },
    /// Select only `id`, or toggle it when `multi` is set.
    ToggleSelect { id: ItemId, multi: bool },
    SelectMultiple { ids: Vec<ItemId> },
    ClearSelection,
    Hydrate(ScenePatch),
}

impl Action {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddTable { .. } => "add_table",
            Action::AddZone { .. } => "add_zone",
            Action::AddLabel { .. } => "add_label",
            Action::MoveTable { .. } => "move_table",
            Action::MoveZone { .. } => "move_zone",
            Action::MoveLabel { .. } => "move_label",
            Action::ResizeZone { .. } => "resize_zone",
            Action::RenameZone { .. } => "rename_zone",
            Action::RenameLabel { .. } => "rename_label",
            Action::RenumberTable { .. } => "renumber_table",
            Action::RemoveSelected => "remove_selected",
            Action::RemoveTable { .. } => "remove_table",
            Action::RemoveZone { .. } => "remove_zone",
            Action::RemoveLabel { .. } => "remove_label",
            Action::ToggleSelect { .. } => "toggle_select",
            Action::SelectMultiple { .. } => "select_multiple",
            Action::ClearSelection => "clear_selection",
            Action::Hydrate(_) => "hydrate",
        }
    }
}

/// Apply an action, producing the next scene and selection.
pub fn apply(scene: &Scene, selection: &Selection, action: Action) -> (Scene, Selection) {
    let mut scene = scene.clone();
    let mut selection = selection.clone();
    apply_in_place(&mut scene, &mut selection, action);
    (scene, selection)
}

pub(crate) fn apply_in_place(scene: &mut Scene, selection: &mut Selection, action: Action) {
    match action {
        Action::AddTable {
            config,
            anchor_x,
            anchor_y,
        } => add_table(scene, selection, config, anchor_x, anchor_y),
        Action::AddZone {
            name,
            anchor_x,
            anchor_y,
            width,
            height,
        } => {
            let (w, h) = zone_size(scene, width, height);
            let (x, y) = clamp_rect(
                scene.grid_cols,
                scene.grid_rows,
                anchor_x as f64,
                anchor_y as f64,
                w,
                h,
            );
            let zone = Zone::new(name, x, y, w, h);
            selection.replace([zone.id]);
            scene.zones.push(zone);
        }
        Action::AddLabel {
            text,
            anchor_x,
            anchor_y,
        } => {
            let (x, y) = clamp_rect(
                scene.grid_cols,
                scene.grid_rows,
                anchor_x as f64,
                anchor_y as f64,
                1,
                1,
            );
            let label = Label::new(text, x, y);
            selection.replace([label.id]);
            scene.labels.push(label);
        }
        Action::MoveTable { id, x, y } => move_table(scene, selection, id, x, y),
        Action::MoveZone { id, x, y } => {
            let (cols, rows) = (scene.grid_cols, scene.grid_rows);
            if let Some(zone) = scene.zone_mut(id) {
                move_clamped(zone, cols, rows, x, y);
            }
        }
        Action::MoveLabel { id, x, y } => {
            let (cols, rows) = (scene.grid_cols, scene.grid_rows);
            if let Some(label) = scene.label_mut(id) {
                move_clamped(label, cols, rows, x, y);
            }
        }
        Action::ResizeZone { id, width, height } => {
            let (w, h) = zone_size(scene, width, height);
            let (cols, rows) = (scene.grid_cols, scene.grid_rows);
            if let Some(zone) = scene.zone_mut(id) {
                zone.width_cells = w;
                zone.height_cells = h;
                let (x, y) = (zone.grid_x, zone.grid_y);
                move_clamped(zone, cols, rows, x, y);
            }
        }
        Action::RenameZone { id, name } => {
            if let Some(zone) = scene.zone_mut(id) {
                zone.name = name;
            }
        }
        Action::RenameLabel { id, text } => {
            if let Some(label) = scene.label_mut(id) {
                label.text = text;
            }
        }
        Action::RenumberTable { id, number } => {
            if let Some(table) = scene.table_mut(id) {
                table.number = Some(number);
                // Keep the counter ahead of every number handed out
                scene.table_counter = scene.table_counter.max(number.saturating_add(1));
            }
        }
        Action::RemoveSelected => {
            scene.tables.retain(|t| !selection.contains(t.id));
            scene.zones.retain(|z| !selection.contains(z.id));
            scene.labels.retain(|l| !selection.contains(l.id));
            selection.clear();
        }
        Action::RemoveTable { id } => {
            scene.tables.retain(|t| t.id != id);
            selection.remove(id);
        }
        Action::RemoveZone { id } => {
            scene.zones.retain(|z| z.id != id);
            selection.remove(id);
        }
        Action::RemoveLabel { id } => {
            scene.labels.retain(|l| l.id != id);
            selection.remove(id);
        }
        Action::ToggleSelect { id, multi } => {
            if !scene.contains(id) {
                return;
            }
            if multi {
                selection.toggle(id);
            } else {
                selection.replace([id]);
            }
        }
        Action::SelectMultiple { ids } => {
            selection.replace(ids.into_iter().filter(|&id| scene.contains(id)));
        }
        Action::ClearSelection => selection.clear(),
        Action::Hydrate(patch) => hydrate(scene, selection, patch),
    }
}

fn zone_size(scene: &Scene, width: i32, height: i32) -> (i32, i32) {
    (
        width.clamp(MIN_ZONE_SIZE, scene.grid_cols.max(MIN_ZONE_SIZE)),
        height.clamp(MIN_ZONE_SIZE, scene.grid_rows.max(MIN_ZONE_SIZE)),
    )
}

fn move_clamped(item: &mut impl PlacedItem, cols: i32, rows: i32, x: i32, y: i32) {
    let (w, h) = item.size();
    let (x, y) = clamp_rect(cols, rows, x as f64, y as f64, w, h);
    item.set_origin(x, y);
}

fn add_table(
    scene: &mut Scene,
    selection: &mut Selection,
    config: TableConfig,
    anchor_x: i32,
    anchor_y: i32,
) {
    let quantity = config.quantity.clamp(1, MAX_BATCH_QUANTITY);
    let count = quantity as i32;
    let seats = config.seats();
    let (w, h) = footprint(config.kind, seats, config.orientation);

    // The first table is centered on the anchor along the layout axis; the
    // batch extends away from it with a fixed gap.
    let (step_x, step_y, start_x, start_y) = match config.orientation {
        Orientation::Row => (
            w.saturating_add(TABLE_GAP),
            0,
            anchor_x.saturating_sub(w / 2),
            anchor_y,
        ),
        Orientation::Column => (
            0,
            h.saturating_add(TABLE_GAP),
            anchor_x,
            anchor_y.saturating_sub(h / 2),
        ),
    };
    let group_w = w.saturating_add(step_x.saturating_mul(count - 1));
    let group_h = h.saturating_add(step_y.saturating_mul(count - 1));

    let (cols, rows) = (scene.grid_cols, scene.grid_rows);
    let (group_x, group_y) = clamp_rect(
        cols,
        rows,
        start_x as f64,
        start_y as f64,
        group_w,
        group_h,
    );

    let mut ids = Vec::with_capacity(quantity as usize);
    for i in 0..count {
        let x = group_x.saturating_add(step_x.saturating_mul(i));
        let y = group_y.saturating_add(step_y.saturating_mul(i));
        let (x, y) = clamp_rect(cols, rows, x as f64, y as f64, w, h);
        let mut table = Table::new(config.kind, seats, config.orientation, x, y);
        table.number = Some(scene.table_counter.saturating_add(i as u32));
        ids.push(table.id);
        scene.tables.push(table);
    }
    scene.table_counter = scene.table_counter.saturating_add(quantity);
    selection.replace(ids);

    log::debug!(
        "Added {} {:?} table(s) at ({}, {}), next number {}",
        quantity,
        config.kind,
        group_x,
        group_y,
        scene.table_counter
    );
}

fn move_table(scene: &mut Scene, selection: &Selection, id: ItemId, x: i32, y: i32) {
    let (cols, rows) = (scene.grid_cols, scene.grid_rows);
    let Some(anchor) = scene.table(id).map(|t| (t.grid_x, t.grid_y)) else {
        return;
    };

    if !selection.is_multi_with(id) {
        if let Some(table) = scene.table_mut(id) {
            move_clamped(table, cols, rows, x, y);
        }
        return;
    }

    let Some(bounds) = scene
        .tables
        .iter()
        .filter(|t| selection.contains(t.id))
        .map(PlacedItem::rect)
        .reduce(|acc, rect| acc.union(rect))
    else {
        return;
    };

    let (dx, dy) = (x.saturating_sub(anchor.0), y.saturating_sub(anchor.1));
    let (group_x, group_y) = clamp_rect(
        cols,
        rows,
        bounds.x.saturating_add(dx) as f64,
        bounds.y.saturating_add(dy) as f64,
        bounds.w,
        bounds.h,
    );
    let delta = (group_x - bounds.x, group_y - bounds.y);

    for table in scene.tables.iter_mut().filter(|t| selection.contains(t.id)) {
        let (tx, ty) = (table.grid_x + delta.0, table.grid_y + delta.1);
        move_clamped(table, cols, rows, tx, ty);
    }
    log::trace!("Group move of {:?} applied delta {:?}", bounds, delta);
}

fn hydrate(scene: &mut Scene, selection: &mut Selection, patch: ScenePatch) {
    if let Some(cols) = patch.grid_cols {
        scene.grid_cols = cols;
    }
    if let Some(rows) = patch.grid_rows {
        scene.grid_rows = rows;
    }
    if let Some(tables) = patch.tables {
        scene.tables = tables;
    }
    if let Some(zones) = patch.zones {
        scene.zones = zones;
    }
    if let Some(labels) = patch.labels {
        scene.labels = labels;
    }
    if let Some(counter) = patch.table_counter {
        scene.table_counter = counter;
    }
    selection.clear();

    let out_of_bounds = scene
        .items()
        .filter(|(_, rect)| !rect.within_grid(scene.grid_cols, scene.grid_rows))
        .count();
    if out_of_bounds > 0 {
        log::warn!("Hydrated scene has {} item(s) outside the grid", out_of_bounds);
    }
    log::debug!(
        "Hydrated scene: {} tables, {} zones, {} labels, counter {}",
        scene.tables.len(),
        scene.zones.len(),
        scene.labels.len(),
        scene.table_counter
    );
}

/// Asserts every item lies inside the grid. Items larger than the grid on an
/// axis may only sit at 0 on that axis.
#[cfg(test)]
pub(crate) fn assert_in_bounds(scene: &Scene) {
    let axis_ok = |start: i32, end: i32, extent: i32| start >= 0 && (end <= extent || start == 0);
    for (item, rect) in scene.items() {
        assert!(
            axis_ok(rect.x, rect.right(), scene.grid_cols)
                && axis_ok(rect.y, rect.bottom(), scene.grid_rows),
            "{:?} at {:?} escapes the {}x{} grid",
            item,
            rect,
            scene.grid_cols,
            scene.grid_rows
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CellRect;
    use uuid::Uuid;

    fn run(scene: &Scene, selection: &Selection, action: Action) -> (Scene, Selection) {
        let (scene, selection) = apply(scene, selection, action);
        assert_in_bounds(&scene);
        (scene, selection)
    }

    fn add_tables(scene: &Scene, config: TableConfig, x: i32, y: i32) -> (Scene, Selection) {
        run(
            scene,
            &Selection::new(),
            Action::AddTable {
                config,
                anchor_x: x,
                anchor_y: y,
            },
        )
    }

    #[test]
    fn test_add_row_batch() {
        let scene = Scene::new(50, 35);
        let config = TableConfig::new(TableKind::Regular)
            .with_orientation(Orientation::Row)
            .with_quantity(3);
        let (scene, selection) = add_tables(&scene, config, 10, 10);

        assert_eq!(scene.tables.len(), 3);
        let xs: Vec<i32> = scene.tables.iter().map(|t| t.grid_x).collect();
        assert_eq!(xs, vec![9, 13, 17]);
        assert!(scene.tables.iter().all(|t| t.grid_y == 10));
        assert!(scene.tables.iter().all(|t| t.footprint() == (3, 3)));
        let numbers: Vec<_> = scene.tables.iter().map(|t| t.number).collect();
        assert_eq!(numbers, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(scene.table_counter, 4);

        assert_eq!(selection.len(), 3);
        assert!(scene.tables.iter().all(|t| selection.contains(t.id)));
    }

    #[test]
    fn test_add_column_batch() {
        let scene = Scene::new(50, 35);
        let config = TableConfig::new(TableKind::Reserve)
            .with_orientation(Orientation::Column)
            .with_quantity(2);
        let (scene, _) = add_tables(&scene, config, 20, 10);
        let positions: Vec<_> = scene.tables.iter().map(|t| (t.grid_x, t.grid_y)).collect();
        assert_eq!(positions, vec![(20, 9), (20, 13)]);
        assert!(scene.tables.iter().all(|t| t.seat_count == 8));
    }

    #[test]
    fn test_add_knight_table() {
        let scene = Scene::new(50, 35);
        let config = TableConfig::new(TableKind::Knight).with_seats(20);
        let (scene, _) = add_tables(&scene, config, 10, 10);
        assert_eq!(scene.tables[0].footprint(), (10, 2));
        assert_eq!(scene.tables[0].seat_count, 20);
    }

    #[test]
    fn test_add_batch_clamped_as_group() {
        let scene = Scene::new(50, 35);
        let config = TableConfig::new(TableKind::Regular).with_quantity(3);
        let (scene, _) = add_tables(&scene, config, 48, 40);
        let xs: Vec<i32> = scene.tables.iter().map(|t| t.grid_x).collect();
        // Group is 11 wide, pushed back as a unit
        assert_eq!(xs, vec![39, 43, 47]);
        assert!(scene.tables.iter().all(|t| t.grid_y == 32));
    }

    #[test]
    fn test_add_batch_larger_than_grid() {
        let scene = Scene::new(10, 10);
        let config = TableConfig::new(TableKind::Regular).with_quantity(5);
        let (scene, _) = add_tables(&scene, config, 5, 5);
        let xs: Vec<i32> = scene.tables.iter().map(|t| t.grid_x).collect();
        // Each instance is clamped after the group
        assert_eq!(xs, vec![0, 4, 7, 7, 7]);
    }

    #[test]
    fn test_quantity_is_clamped() {
        let scene = Scene::new(200, 200);
        let (scene, _) = add_tables(&scene, TableConfig::default().with_quantity(0), 10, 10);
        assert_eq!(scene.tables.len(), 1);
        let (scene, _) = add_tables(&scene, TableConfig::default().with_quantity(99), 10, 50);
        assert_eq!(scene.tables.len(), 21);
        assert_eq!(scene.table_counter, 22);
    }

    #[test]
    fn test_counter_survives_removals() {
        let scene = Scene::default();
        let (scene, selection) = add_tables(&scene, TableConfig::default().with_quantity(2), 5, 5);
        let (scene, _) = run(&scene, &selection, Action::RemoveSelected);
        assert!(scene.tables.is_empty());
        assert_eq!(scene.table_counter, 3);

        let (scene, _) = add_tables(&scene, TableConfig::default(), 5, 5);
        assert_eq!(scene.tables[0].number, Some(3));
        assert_eq!(scene.table_counter, 4);
    }

    #[test]
    fn test_move_single_table_clamps() {
        let scene = Scene::default();
        let (scene, selection) = add_tables(&scene, TableConfig::default(), 10, 10);
        let id = scene.tables[0].id;

        let (scene, _) = run(&scene, &selection, Action::MoveTable { id, x: 60, y: -3 });
        assert_eq!((scene.tables[0].grid_x, scene.tables[0].grid_y), (47, 0));
    }

    #[test]
    fn test_group_move_preserves_offsets() {
        let scene = Scene::default();
        let config = TableConfig::default().with_quantity(3);
        let (scene, selection) = add_tables(&scene, config, 10, 10);
        let before: Vec<_> = scene.tables.iter().map(|t| (t.grid_x, t.grid_y)).collect();
        let lead = scene.tables[1].id;

        let (scene, _) = run(&scene, &selection, Action::MoveTable { id: lead, x: 16, y: 12 });
        let after: Vec<_> = scene.tables.iter().map(|t| (t.grid_x, t.grid_y)).collect();
        for (b, a) in before.iter().zip(&after) {
            assert_eq!((a.0 - b.0, a.1 - b.1), (3, 2));
        }
    }

    #[test]
    fn test_group_move_truncated_at_edge() {
        let scene = Scene::new(20, 20);
        let config = TableConfig::default().with_quantity(2);
        // Tables at x=9 and x=13, group spans 9..16
        let (scene, selection) = add_tables(&scene, config, 10, 5);
        let first = scene.tables[0].id;

        let (scene, _) = run(&scene, &selection, Action::MoveTable { id: first, x: 14, y: 5 });
        let xs: Vec<i32> = scene.tables.iter().map(|t| t.grid_x).collect();
        // Delta of +5 truncated to +4 for both
        assert_eq!(xs, vec![13, 17]);
    }

    #[test]
    fn test_move_outside_selection_moves_alone() {
        let scene = Scene::default();
        let (scene, selection) = add_tables(&scene, TableConfig::default().with_quantity(2), 10, 10);
        let (scene, _) = add_tables(&scene, TableConfig::default(), 30, 20);
        let loner = scene.tables[2].id;

        let (scene, _) = run(&scene, &selection, Action::MoveTable { id: loner, x: 31, y: 21 });
        assert_eq!(scene.tables[0].grid_x, 9);
        assert_eq!(scene.tables[1].grid_x, 13);
        assert_eq!((scene.tables[2].grid_x, scene.tables[2].grid_y), (31, 21));
    }

    #[test]
    fn test_zone_lifecycle() {
        let scene = Scene::new(30, 20);
        let (scene, selection) = run(
            &scene,
            &Selection::new(),
            Action::AddZone {
                name: "Stage".to_string(),
                anchor_x: 28,
                anchor_y: 1,
                width: 1,
                height: 4,
            },
        );
        let zone = &scene.zones[0];
        assert_eq!((zone.width_cells, zone.height_cells), (2, 4));
        assert_eq!((zone.grid_x, zone.grid_y), (28, 1));
        assert!(selection.contains(zone.id));
        let id = zone.id;

        // Growing pushes the origin back inside
        let (scene, _) = run(&scene, &selection, Action::ResizeZone { id, width: 10, height: 50 });
        let zone = &scene.zones[0];
        assert_eq!((zone.width_cells, zone.height_cells), (10, 20));
        assert_eq!((zone.grid_x, zone.grid_y), (20, 0));

        let (scene, _) = run(&scene, &selection, Action::ResizeZone { id, width: -4, height: 0 });
        assert_eq!((scene.zones[0].width_cells, scene.zones[0].height_cells), (2, 2));

        let (scene, _) = run(
            &scene,
            &selection,
            Action::RenameZone {
                id,
                name: "Dance floor".to_string(),
            },
        );
        assert_eq!(scene.zones[0].name, "Dance floor");
        assert_eq!((scene.zones[0].grid_x, scene.zones[0].grid_y), (20, 0));
    }

    #[test]
    fn test_zones_move_individually() {
        let scene = Scene::default();
        let (scene, _) = run(
            &scene,
            &Selection::new(),
            Action::AddZone {
                name: "A".into(),
                anchor_x: 0,
                anchor_y: 0,
                width: 4,
                height: 4,
            },
        );
        let (scene, _) = add_tables(&scene, TableConfig::default(), 20, 20);
        let zone = scene.zones[0].id;
        let table = scene.tables[0].id;
        let selection: Selection = [zone, table].into_iter().collect();

        let (scene, _) = run(&scene, &selection, Action::MoveZone { id: zone, x: 5, y: 5 });
        assert_eq!((scene.zones[0].grid_x, scene.zones[0].grid_y), (5, 5));
        assert_eq!((scene.tables[0].grid_x, scene.tables[0].grid_y), (19, 20));
    }

    #[test]
    fn test_label_lifecycle() {
        let scene = Scene::new(10, 10);
        let (scene, selection) = run(
            &scene,
            &Selection::new(),
            Action::AddLabel {
                text: "Entrance".into(),
                anchor_x: 12,
                anchor_y: 4,
            },
        );
        let id = scene.labels[0].id;
        assert_eq!((scene.labels[0].grid_x, scene.labels[0].grid_y), (9, 4));

        let (scene, selection) = run(
            &scene,
            &selection,
            Action::RenameLabel {
                id,
                text: "Exit".into(),
            },
        );
        assert_eq!(scene.labels[0].text, "Exit");

        let (scene, selection) = run(&scene, &selection, Action::RemoveLabel { id });
        assert!(scene.labels.is_empty());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_renumber_keeps_counter_ahead() {
        let scene = Scene::default();
        let (scene, selection) = add_tables(&scene, TableConfig::default(), 5, 5);
        let id = scene.tables[0].id;

        let (scene, _) = run(&scene, &selection, Action::RenumberTable { id, number: 40 });
        assert_eq!(scene.tables[0].number, Some(40));
        assert_eq!(scene.table_counter, 41);

        let (scene, _) = run(&scene, &selection, Action::RenumberTable { id, number: 7 });
        assert_eq!(scene.tables[0].number, Some(7));
        assert_eq!(scene.table_counter, 41);
    }

    #[test]
    fn test_remove_table_prunes_selection() {
        let scene = Scene::default();
        let (scene, selection) = add_tables(&scene, TableConfig::default().with_quantity(2), 5, 5);
        let id = scene.tables[0].id;

        let (scene, selection) = run(&scene, &selection, Action::RemoveTable { id });
        assert_eq!(scene.tables.len(), 1);
        assert!(!selection.contains(id));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_toggle_select() {
        let scene = Scene::default();
        let (scene, _) = add_tables(&scene, TableConfig::default().with_quantity(3), 10, 10);
        let ids: Vec<_> = scene.tables.iter().map(|t| t.id).collect();

        let (_, selection) = run(&scene, &Selection::new(), Action::ToggleSelect { id: ids[0], multi: false });
        assert_eq!(selection.len(), 1);

        let (_, selection) = run(&scene, &selection, Action::ToggleSelect { id: ids[1], multi: true });
        assert_eq!(selection.len(), 2);

        let (_, selection) = run(&scene, &selection, Action::ToggleSelect { id: ids[0], multi: true });
        assert!(!selection.contains(ids[0]));
        assert!(selection.contains(ids[1]));

        let (_, selection) = run(&scene, &selection, Action::ToggleSelect { id: ids[2], multi: false });
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec![ids[2]]);

        // Unknown ids never enter the selection
        let (_, selection) = run(
            &scene,
            &selection,
            Action::ToggleSelect {
                id: Uuid::new_v4(),
                multi: true,
            },
        );
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_select_multiple_filters_unknown() {
        let scene = Scene::default();
        let (scene, _) = add_tables(&scene, TableConfig::default().with_quantity(2), 10, 10);
        let ids = vec![scene.tables[0].id, Uuid::new_v4()];
        let (_, selection) = run(&scene, &Selection::new(), Action::SelectMultiple { ids });
        assert_eq!(selection.len(), 1);

        let (_, selection) = run(&scene, &selection, Action::ClearSelection);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_hydrate_keeps_omitted_fields() {
        let scene = Scene::default();
        let (scene, selection) = add_tables(&scene, TableConfig::default(), 10, 10);
        let patch = ScenePatch {
            labels: Some(vec![Label::new("Gifts", 2, 2)]),
            table_counter: Some(9),
            ..ScenePatch::default()
        };

        let (next, selection) = run(&scene, &selection, Action::Hydrate(patch));
        assert_eq!(next.tables, scene.tables);
        assert_eq!(next.labels.len(), 1);
        assert_eq!(next.table_counter, 9);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_hydrate_full_patch_round_trip() {
        let scene = Scene::default();
        let (scene, selection) = add_tables(&scene, TableConfig::default().with_quantity(4), 10, 10);
        let patch = ScenePatch::from_scene(&scene);

        let (restored, _) = run(&Scene::new(5, 5), &selection, Action::Hydrate(patch));
        assert_eq!(restored, scene);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let scene = Scene::default();
        let (scene, selection) = add_tables(&scene, TableConfig::default(), 10, 10);
        let ghost = Uuid::new_v4();
        for action in [
            Action::MoveTable { id: ghost, x: 1, y: 1 },
            Action::MoveZone { id: ghost, x: 1, y: 1 },
            Action::ResizeZone { id: ghost, width: 4, height: 4 },
            Action::RenumberTable { id: ghost, number: 100 },
            Action::RemoveTable { id: ghost },
        ] {
            let (next, next_selection) = run(&scene, &selection, action);
            assert_eq!(next, scene);
            assert_eq!(next_selection, selection);
        }
    }

    #[test]
    fn test_clamping_holds_for_extreme_inputs() {
        let mut scene = Scene::new(12, 8);
        let mut selection = Selection::new();
        for (x, y) in [(i32::MIN, i32::MAX), (-5, 3), (100, -100), (6, 4)] {
            let config = TableConfig::new(TableKind::Knight)
                .with_seats(u32::MAX)
                .with_quantity(3);
            (scene, selection) = run(
                &scene,
                &selection,
                Action::AddTable {
                    config,
                    anchor_x: x,
                    anchor_y: y,
                },
            );
            (scene, selection) = run(
                &scene,
                &selection,
                Action::AddZone {
                    name: String::new(),
                    anchor_x: x,
                    anchor_y: y,
                    width: i32::MAX,
                    height: i32::MIN,
                },
            );
        }
        assert_eq!(scene.tables.len(), 12);
    }

    #[test]
    fn test_group_bounds_only_count_tables() {
        let scene = Scene::new(20, 20);
        let (scene, _) = run(
            &scene,
            &Selection::new(),
            Action::AddZone {
                name: "Wide".into(),
                anchor_x: 0,
                anchor_y: 0,
                width: 20,
                height: 3,
            },
        );
        let (scene, _) = add_tables(&scene, TableConfig::default().with_quantity(2), 5, 10);
        let mut ids: Vec<ItemId> = scene.tables.iter().map(|t| t.id).collect();
        ids.push(scene.zones[0].id);
        let selection: Selection = ids.iter().copied().collect();

        // The zone would pin a mixed bounding box; tables still move freely
        let lead = scene.tables[0].id;
        let (scene, _) = run(&scene, &selection, Action::MoveTable { id: lead, x: 6, y: 11 });
        assert_eq!((scene.tables[0].grid_x, scene.tables[0].grid_y), (6, 11));
        assert_eq!((scene.tables[1].grid_x, scene.tables[1].grid_y), (10, 11));
        assert_eq!((scene.zones[0].grid_x, scene.zones[0].grid_y), (0, 0));
    }

    #[test]
    fn test_rect_helper() {
        let table = Table::new(TableKind::Regular, 12, Orientation::Row, 1, 1);
        assert_eq!(table.rect(), CellRect::new(1, 1, 3, 3));
    }
}
