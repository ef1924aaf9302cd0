//! Persisted layout documents.
//!
//! The current format is a versioned `web_v2` document in grid cells. On save
//! a pixel-space projection of the tables is produced alongside it for older
//! readers. On load both the current document and the older pixel-table data
//! are accepted, and malformed entries are skipped rather than failing the
//! whole load.

use crate::geometry::{DEFAULT_CELL_SIZE, Orientation, TableKind};
use crate::scene::{Label, PlacedItem, Scene, ScenePatch, Table, Zone};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Document type tag.
pub const DOCUMENT_TYPE: &str = "web_v2";

/// Newest document version this crate reads and the one it writes.
pub const DOCUMENT_VERSION: u32 = 2;

/// Errors from parsing a persisted layout.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported layout version {0}")]
    UnsupportedVersion(u32),
    #[error("unrecognized layout format")]
    UnrecognizedFormat,
}

/// Grid description stored with a document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSpec {
    pub cols: i32,
    pub rows: i32,
    pub cell_size: f64,
}

/// The persisted scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: u32,
    pub grid: GridSpec,
    pub tables: Vec<Table>,
    pub zones: Vec<Zone>,
    pub labels: Vec<Label>,
    pub table_counter: u32,
    pub updated_at: DateTime<Utc>,
}

impl SceneDocument {
    pub fn from_scene(scene: &Scene, cell_size: f64, now: DateTime<Utc>) -> Self {
        Self {
            kind: DOCUMENT_TYPE.to_string(),
            version: DOCUMENT_VERSION,
            grid: GridSpec {
                cols: scene.grid_cols,
                rows: scene.grid_rows,
                cell_size,
            },
            tables: scene.tables.clone(),
            zones: scene.zones.clone(),
            labels: scene.labels.clone(),
            table_counter: scene.table_counter,
            updated_at: now,
        }
    }

    /// The hydrate payload for this document.
    pub fn into_patch(self) -> ScenePatch {
        ScenePatch {
            grid_cols: Some(self.grid.cols),
            grid_rows: Some(self.grid.rows),
            tables: Some(self.tables),
            zones: Some(self.zones),
            labels: Some(self.labels),
            table_counter: Some(self.table_counter),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Pixel-space table record used by older readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyTable {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(rename = "type")]
    pub kind: TableKind,
    pub seats: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    pub orientation: Orientation,
}

/// Project every table to pixel space.
pub fn legacy_tables(scene: &Scene, cell_size: f64) -> Vec<LegacyTable> {
    scene
        .tables
        .iter()
        .map(|table| {
            let (w, h) = table.size();
            LegacyTable {
                id: table.id.to_string(),
                x: table.grid_x as f64 * cell_size,
                y: table.grid_y as f64 * cell_size,
                width: w as f64 * cell_size,
                height: h as f64 * cell_size,
                kind: table.kind,
                seats: table.seat_count,
                number: table.number,
                orientation: table.orientation,
            }
        })
        .collect()
}

/// Everything written on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub layout: SceneDocument,
    pub tables: Vec<LegacyTable>,
}

impl ExportBundle {
    pub fn new(scene: &Scene, cell_size: f64, now: DateTime<Utc>) -> Self {
        Self {
            layout: SceneDocument::from_scene(scene, cell_size, now),
            tables: legacy_tables(scene, cell_size),
        }
    }
}

/// Lenient form of [`LegacyTable`] accepted on load.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyTableRecord {
    #[serde(default)]
    id: Option<String>,
    x: f64,
    y: f64,
    #[serde(default, rename = "type")]
    kind: TableKind,
    #[serde(default, alias = "seatCount")]
    seats: Option<u32>,
    #[serde(default)]
    number: Option<u32>,
    #[serde(default)]
    orientation: Orientation,
}

impl LegacyTableRecord {
    fn into_table(self, cell_size: f64) -> Table {
        let seats = self.seats.unwrap_or_else(|| self.kind.default_seats());
        let grid_x = (self.x / cell_size).round() as i32;
        let grid_y = (self.y / cell_size).round() as i32;
        let mut table = Table::new(self.kind, seats, self.orientation, grid_x, grid_y);
        if let Some(id) = self.id.as_deref().and_then(|id| Uuid::parse_str(id).ok()) {
            table.id = id;
        }
        table.number = self.number;
        table
    }
}

/// Parse each element of an array, dropping the ones that do not fit.
fn parse_items<T: DeserializeOwned>(field: &str, value: Option<&Value>) -> Option<Vec<T>> {
    let Some(Value::Array(items)) = value else {
        if value.is_some() {
            log::warn!("Ignoring non-array `{}` field", field);
        }
        return None;
    };
    let parsed = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                log::warn!("Dropping malformed {} entry {}: {}", field, index, e);
                None
            }
        })
        .collect();
    Some(parsed)
}

fn legacy_patch(items: &[Value], cell_size: f64) -> ScenePatch {
    let value = Value::Array(items.to_vec());
    let tables: Vec<Table> = parse_items::<LegacyTableRecord>("tables", Some(&value))
        .unwrap_or_default()
        .into_iter()
        .map(|record| record.into_table(cell_size))
        .collect();
    let table_counter = tables
        .iter()
        .filter_map(|t| t.number)
        .max()
        .map(|n| n.saturating_add(1));
    log::info!("Converted {} legacy table(s)", tables.len());
    ScenePatch {
        tables: Some(tables),
        table_counter,
        ..ScenePatch::default()
    }
}

fn document_patch(map: &Map<String, Value>) -> Result<ScenePatch, SnapshotError> {
    let version = map
        .get("version")
        .and_then(Value::as_u64)
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
        .unwrap_or(DOCUMENT_VERSION);
    if version > DOCUMENT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(version));
    }

    let grid = map.get("grid");
    let dimension = |key: &str| {
        grid.and_then(|g| g.get(key))
            .and_then(Value::as_i64)
            .and_then(|v| i32::try_from(v).ok())
    };

    Ok(ScenePatch {
        grid_cols: dimension("cols"),
        grid_rows: dimension("rows"),
        tables: parse_items("tables", map.get("tables")),
        zones: parse_items("zones", map.get("zones")),
        labels: parse_items("labels", map.get("labels")),
        table_counter: map
            .get("tableCounter")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok()),
    })
}

/// Parse a stored layout into a hydrate payload.
///
/// `cell_size` converts pixel coordinates in older table data.
pub fn parse_layout(json: &str, cell_size: f64) -> Result<ScenePatch, SnapshotError> {
    let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
        cell_size
    } else {
        DEFAULT_CELL_SIZE
    };

    match serde_json::from_str::<Value>(json)? {
        Value::Array(items) => Ok(legacy_patch(&items, cell_size)),
        Value::Object(map) => {
            if map.get("type").and_then(Value::as_str) == Some(DOCUMENT_TYPE) {
                return document_patch(&map);
            }
            // A save bundle wraps the document
            if let Some(Value::Object(layout)) = map.get("layout") {
                if layout.get("type").and_then(Value::as_str) == Some(DOCUMENT_TYPE) {
                    return document_patch(layout);
                }
            }
            match map.get("tables") {
                Some(Value::Array(items)) => Ok(legacy_patch(items, cell_size)),
                _ => Err(SnapshotError::UnrecognizedFormat),
            }
        }
        _ => Err(SnapshotError::UnrecognizedFormat),
    }
}
