//! Grid geometry: cell/pixel conversion, table footprints and clamping.
//!
//! Every item in a scene is positioned in whole grid cells. The functions here
//! are pure and never fail; out-of-range input is normalized into range.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Default edge length of one grid cell in device pixels at 100% zoom.
pub const DEFAULT_CELL_SIZE: f64 = 32.0;

/// Edge length of the square footprint used by regular and reserve tables.
pub const ROUND_TABLE_SIZE: i32 = 3;

/// Short side of a knight (banquet) table.
pub const KNIGHT_TABLE_DEPTH: i32 = 2;

/// Minimum long side of a knight table.
pub const KNIGHT_TABLE_MIN_LENGTH: i32 = 3;

/// Kind of banquet table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    #[default]
    Regular,
    Reserve,
    Knight,
}

impl TableKind {
    /// Seat count used when the caller does not override it.
    pub fn default_seats(self) -> u32 {
        match self {
            TableKind::Regular => 12,
            TableKind::Reserve => 8,
            TableKind::Knight => 20,
        }
    }
}

/// Axis along which a table (or a batch of tables) is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Long side along the x axis.
    #[default]
    Row,
    /// Long side along the y axis.
    Column,
}

/// Footprint `(width, height)` in cells for a table.
pub fn footprint(kind: TableKind, seat_count: u32, orientation: Orientation) -> (i32, i32) {
    match kind {
        TableKind::Regular | TableKind::Reserve => (ROUND_TABLE_SIZE, ROUND_TABLE_SIZE),
        TableKind::Knight => {
            let long = i32::try_from(seat_count.div_ceil(2))
                .unwrap_or(i32::MAX)
                .max(KNIGHT_TABLE_MIN_LENGTH);
            match orientation {
                Orientation::Row => (long, KNIGHT_TABLE_DEPTH),
                Orientation::Column => (KNIGHT_TABLE_DEPTH, long),
            }
        }
    }
}

/// Clamp a single axis: `clamp(round(value), 0, max(0, extent - max(1, size)))`.
///
/// NaN collapses to 0.
pub fn clamp_axis(value: f64, extent: i32, size: i32) -> i32 {
    let max = extent.saturating_sub(size.max(1)).max(0);
    value.round().clamp(0.0, max as f64) as i32
}

/// Clamp the origin of a `w × h` rectangle so it lies inside a `cols × rows` grid.
pub fn clamp_rect(cols: i32, rows: i32, x: f64, y: f64, w: i32, h: i32) -> (i32, i32) {
    (clamp_axis(x, cols, w), clamp_axis(y, rows, h))
}

/// Fractional variant of [`clamp_axis`] used for live previews.
pub fn clamp_axis_fractional(value: f64, extent: i32, size: i32) -> f64 {
    let max = extent.saturating_sub(size.max(1)).max(0) as f64;
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max)
}

fn scale(cell_size: f64, zoom: f64) -> f64 {
    let scale = cell_size * zoom;
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        f64::EPSILON
    }
}

/// Convert a local (canvas content) pixel point into fractional cell coordinates.
pub fn local_to_cells(point: Point, cell_size: f64, zoom: f64) -> Point {
    let s = scale(cell_size, zoom);
    Point::new(point.x / s, point.y / s)
}

/// Convert cell coordinates into local (canvas content) pixel coordinates.
pub fn cells_to_local(cells: Point, cell_size: f64, zoom: f64) -> Point {
    let s = scale(cell_size, zoom);
    Point::new(cells.x * s, cells.y * s)
}

/// Convert a pixel distance into a fractional cell distance.
pub fn pixels_to_cells(pixels: f64, cell_size: f64, zoom: f64) -> f64 {
    pixels / scale(cell_size, zoom)
}

/// An axis-aligned rectangle in whole cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl CellRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    pub fn center_x(&self) -> f64 {
        self.x as f64 + self.w as f64 / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y as f64 + self.h as f64 / 2.0
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: CellRect) -> CellRect {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        CellRect::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }

    /// Grow the rectangle by `cells` on every side.
    pub fn inflate(&self, cells: i32) -> CellRect {
        CellRect::new(
            self.x - cells,
            self.y - cells,
            self.w + 2 * cells,
            self.h + 2 * cells,
        )
    }

    /// Intersect with the `cols × rows` grid.
    pub fn intersect_grid(&self, cols: i32, rows: i32) -> CellRect {
        let x0 = self.x.clamp(0, cols.max(0));
        let y0 = self.y.clamp(0, rows.max(0));
        let x1 = self.right().clamp(x0, cols.max(x0));
        let y1 = self.bottom().clamp(y0, rows.max(y0));
        CellRect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Whether the rectangle lies fully inside the `cols × rows` grid.
    pub fn within_grid(&self, cols: i32, rows: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.right() <= cols && self.bottom() <= rows
    }

    /// Whether a fractional cell point falls inside this rectangle (half-open).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x as f64
            && point.x < self.right() as f64
            && point.y >= self.y as f64
            && point.y < self.bottom() as f64
    }

    /// Non-strict intersection with a fractional rectangle: sharing an edge counts.
    pub fn touches(&self, rect: Rect) -> bool {
        let rect = rect.abs();
        self.x as f64 <= rect.x1
            && self.right() as f64 >= rect.x0
            && self.y as f64 <= rect.y1
            && self.bottom() as f64 >= rect.y0
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.x as f64,
            self.y as f64,
            self.right() as f64,
            self.bottom() as f64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_table_footprint() {
        assert_eq!(footprint(TableKind::Regular, 12, Orientation::Row), (3, 3));
        assert_eq!(footprint(TableKind::Reserve, 8, Orientation::Column), (3, 3));
        // Seat count does not change round tables
        assert_eq!(footprint(TableKind::Regular, 40, Orientation::Row), (3, 3));
    }

    #[test]
    fn test_knight_footprint() {
        assert_eq!(footprint(TableKind::Knight, 20, Orientation::Row), (10, 2));
        assert_eq!(footprint(TableKind::Knight, 20, Orientation::Column), (2, 10));
        assert_eq!(footprint(TableKind::Knight, 7, Orientation::Row), (4, 2));
        // Never shorter than three cells
        assert_eq!(footprint(TableKind::Knight, 2, Orientation::Row), (3, 2));
        assert_eq!(footprint(TableKind::Knight, 0, Orientation::Column), (2, 3));
    }

    #[test]
    fn test_clamp_rect_inside() {
        assert_eq!(clamp_rect(50, 35, 10.0, 12.0, 3, 3), (10, 12));
        assert_eq!(clamp_rect(50, 35, 10.4, 12.6, 3, 3), (10, 13));
    }

    #[test]
    fn test_clamp_rect_edges() {
        assert_eq!(clamp_rect(50, 35, -4.0, -1.0, 3, 3), (0, 0));
        assert_eq!(clamp_rect(50, 35, 49.0, 34.0, 3, 3), (47, 32));
        assert_eq!(clamp_rect(50, 35, 100.0, 100.0, 10, 2), (40, 33));
    }

    #[test]
    fn test_clamp_rect_degenerate_sizes() {
        // Zero size behaves like a 1x1 item
        assert_eq!(clamp_rect(10, 10, 20.0, 20.0, 0, 0), (9, 9));
        // Larger than the grid pins to the origin
        assert_eq!(clamp_rect(10, 10, 5.0, 5.0, 30, 30), (0, 0));
        assert_eq!(clamp_rect(10, 10, f64::NAN, 3.0, 1, 1), (0, 3));
    }

    #[test]
    fn test_cell_conversion() {
        let cells = local_to_cells(Point::new(64.0, 96.0), 32.0, 1.0);
        assert!((cells.x - 2.0).abs() < f64::EPSILON);
        assert!((cells.y - 3.0).abs() < f64::EPSILON);

        let cells = local_to_cells(Point::new(64.0, 96.0), 32.0, 2.0);
        assert!((cells.x - 1.0).abs() < f64::EPSILON);
        assert!((cells.y - 1.5).abs() < f64::EPSILON);

        let back = cells_to_local(cells, 32.0, 2.0);
        assert!((back.x - 64.0).abs() < 1e-10);
        assert!((back.y - 96.0).abs() < 1e-10);
    }

    #[test]
    fn test_touching_counts_as_intersecting() {
        let rect = CellRect::new(5, 5, 3, 3);
        assert!(rect.touches(Rect::new(8.0, 8.0, 10.0, 10.0)));
        assert!(rect.touches(Rect::new(0.0, 0.0, 5.0, 5.0)));
        assert!(rect.touches(Rect::new(6.0, 6.0, 6.5, 6.5)));
        assert!(!rect.touches(Rect::new(8.1, 0.0, 10.0, 10.0)));
        // Reversed corners are normalized
        assert!(rect.touches(Rect::new(10.0, 10.0, 7.0, 7.0)));
    }

    #[test]
    fn test_union_and_grid() {
        let a = CellRect::new(2, 3, 3, 3);
        let b = CellRect::new(10, 1, 2, 10);
        assert_eq!(a.union(b), CellRect::new(2, 1, 10, 10));

        let padded = CellRect::new(0, 1, 4, 4).inflate(2);
        assert_eq!(padded.intersect_grid(50, 35), CellRect::new(0, 0, 6, 7));
        assert!(CellRect::new(47, 32, 3, 3).within_grid(50, 35));
        assert!(!CellRect::new(48, 32, 3, 3).within_grid(50, 35));
    }
}
