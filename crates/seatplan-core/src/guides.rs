//! Alignment guides for a table being dragged.
//!
//! Guides are advisory: they are drawn while dragging but never change where
//! the table is committed.

use crate::geometry::CellRect;
use crate::scene::{ItemId, PlacedItem, Scene};

/// Default distance in cells within which an edge or center aligns.
pub const GUIDE_TOLERANCE: f64 = 2.0;

/// Default cap on guides per axis.
pub const MAX_GUIDES_PER_AXIS: usize = 6;

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuideAxis {
    /// Constant x, from left/right/center-x matches.
    Vertical,
    /// Constant y, from top/bottom/center-y matches.
    Horizontal,
}

/// Which pair of features matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuideAnchor {
    /// Left with left, or top with top.
    Start,
    /// Right with right, or bottom with bottom.
    End,
    Center,
}

/// A single alignment guide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    pub axis: GuideAxis,
    /// Line position in cells on the other table. Centers may be half cells.
    pub position: f64,
    pub anchor: GuideAnchor,
    /// Distance in cells between the matched features.
    pub distance: f64,
}

/// Guide tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideSettings {
    pub tolerance: f64,
    pub max_per_axis: usize,
}

impl Default for GuideSettings {
    fn default() -> Self {
        Self {
            tolerance: GUIDE_TOLERANCE,
            max_per_axis: MAX_GUIDES_PER_AXIS,
        }
    }
}

/// Guides for both axes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Guides {
    pub vertical: Vec<Guide>,
    pub horizontal: Vec<Guide>,
}

impl Guides {
    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty() && self.horizontal.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Guide> {
        self.vertical.iter().chain(self.horizontal.iter())
    }
}

fn features(start: i32, end: i32, center: f64) -> [(GuideAnchor, f64); 3] {
    [
        (GuideAnchor::Start, start as f64),
        (GuideAnchor::End, end as f64),
        (GuideAnchor::Center, center),
    ]
}

fn collect_axis(
    axis: GuideAxis,
    dragged: [(GuideAnchor, f64); 3],
    others: impl Iterator<Item = [(GuideAnchor, f64); 3]>,
    settings: &GuideSettings,
) -> Vec<Guide> {
    let mut guides: Vec<Guide> = Vec::new();
    for other in others {
        for ((anchor, ours), (_, theirs)) in dragged.iter().zip(other.iter()) {
            let distance = (ours - theirs).abs();
            if distance > settings.tolerance {
                continue;
            }
            let duplicate = guides
                .iter()
                .any(|g| g.position == *theirs && g.anchor == *anchor);
            if !duplicate {
                guides.push(Guide {
                    axis,
                    position: *theirs,
                    anchor: *anchor,
                    distance,
                });
            }
        }
    }
    guides.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then(a.position.total_cmp(&b.position))
    });
    guides.truncate(settings.max_per_axis);
    guides
}

/// Compute guides for `dragged` against every table not in `exclude`.
pub fn compute_guides(
    scene: &Scene,
    dragged: CellRect,
    exclude: &[ItemId],
    settings: &GuideSettings,
) -> Guides {
    let others: Vec<CellRect> = scene
        .tables
        .iter()
        .filter(|t| !exclude.contains(&t.id))
        .map(PlacedItem::rect)
        .collect();

    let vertical = collect_axis(
        GuideAxis::Vertical,
        features(dragged.x, dragged.right(), dragged.center_x()),
        others
            .iter()
            .map(|r| features(r.x, r.right(), r.center_x())),
        settings,
    );
    let horizontal = collect_axis(
        GuideAxis::Horizontal,
        features(dragged.y, dragged.bottom(), dragged.center_y()),
        others
            .iter()
            .map(|r| features(r.y, r.bottom(), r.center_y())),
        settings,
    );
    Guides {
        vertical,
        horizontal,
    }
}
