//! Zoom and scroll state for the grid canvas.

use crate::geometry::{CellRect, DEFAULT_CELL_SIZE};
use crate::input::WheelEvent;
use crate::scene::{ItemRef, Scene};
use kurbo::{Affine, Point, Size, Vec2};

/// Lowest zoom in editable views.
pub const MIN_EDIT_ZOOM: f64 = 0.2;
/// Highest zoom in any view.
pub const MAX_ZOOM: f64 = 3.0;
/// Zoom factor applied per wheel tick.
pub const WHEEL_ZOOM_STEP: f64 = 1.06;
/// Cells of padding around content when fitting.
pub const FIT_PADDING: i32 = 2;

/// Whether the canvas accepts edits. Read-only views never zoom out past the fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Editable,
    ReadOnly,
}

/// Viewport tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSettings {
    pub cell_size: f64,
    pub min_edit_zoom: f64,
    pub max_zoom: f64,
    pub wheel_step: f64,
    pub fit_padding: i32,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            min_edit_zoom: MIN_EDIT_ZOOM,
            max_zoom: MAX_ZOOM,
            wheel_step: WHEEL_ZOOM_STEP,
            fit_padding: FIT_PADDING,
        }
    }
}

/// Region to fit: every item padded and clamped to the grid, or the whole grid
/// when the scene is empty.
pub fn content_bounds(scene: &Scene, padding: i32) -> CellRect {
    let grid = CellRect::new(0, 0, scene.grid_cols, scene.grid_rows);
    match scene.bounds() {
        Some(bounds) => bounds
            .inflate(padding)
            .intersect_grid(scene.grid_cols, scene.grid_rows),
        None => grid,
    }
}

/// Zoom at which `content` (in pixels at 100%) fits `viewport`, never above 1.0.
pub fn fit_zoom(content: Size, viewport: Size) -> f64 {
    if content.width <= 0.0 || content.height <= 0.0 {
        return 1.0;
    }
    let zoom = (viewport.width / content.width).min(viewport.height / content.height);
    if zoom.is_finite() && zoom > 0.0 {
        zoom.min(1.0)
    } else {
        1.0
    }
}

/// Zoom/scroll controller for one canvas.
///
/// Scroll is the device-pixel offset of the viewport's top-left corner within
/// the zoomed grid canvas.
#[derive(Debug, Clone)]
pub struct Viewport {
    settings: ViewportSettings,
    mode: ViewMode,
    size: Option<Size>,
    grid: (i32, i32),
    content: CellRect,
    content_key: Option<Vec<(ItemRef, CellRect)>>,
    fit_pending: bool,
    fitted_zoom: f64,
    /// Current zoom.
    pub zoom: f64,
    /// Current scroll offset.
    pub scroll: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportSettings::default(), ViewMode::default())
    }
}

impl Viewport {
    pub fn new(settings: ViewportSettings, mode: ViewMode) -> Self {
        Self {
            settings,
            mode,
            size: None,
            grid: (0, 0),
            content: CellRect::new(0, 0, 0, 0),
            content_key: None,
            fit_pending: false,
            fitted_zoom: 1.0,
            zoom: 1.0,
            scroll: Vec2::ZERO,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Content region used by the last fit.
    pub fn content(&self) -> CellRect {
        self.content
    }

    pub fn min_zoom(&self) -> f64 {
        match self.mode {
            ViewMode::Editable => self.settings.min_edit_zoom,
            ViewMode::ReadOnly => self.fitted_zoom.min(self.settings.max_zoom),
        }
    }

    pub fn max_zoom(&self) -> f64 {
        self.settings.max_zoom
    }

    /// Pixels per cell at the current zoom.
    pub fn scale(&self) -> f64 {
        self.settings.cell_size * self.zoom
    }

    /// Cells to device pixels.
    pub fn transform(&self) -> Affine {
        Affine::translate(-self.scroll) * Affine::scale(self.scale())
    }

    /// Device pixels to cells.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale()) * Affine::translate(self.scroll)
    }

    pub fn device_to_cells(&self, point: Point) -> Point {
        self.inverse_transform() * point
    }

    pub fn cells_to_device(&self, point: Point) -> Point {
        self.transform() * point
    }

    /// Device point to local canvas pixels (the coordinates pointer events use).
    pub fn device_to_local(&self, point: Point) -> Point {
        point + self.scroll
    }

    /// Track the scene. Refits when the content identity changed.
    ///
    /// Returns `true` if a fit was performed.
    pub fn sync_scene(&mut self, scene: &Scene) -> bool {
        let key: Vec<_> = scene.items().collect();
        self.grid = (scene.grid_cols, scene.grid_rows);
        if self.content_key.as_ref() == Some(&key) {
            return false;
        }
        self.content_key = Some(key);
        self.content = content_bounds(scene, self.settings.fit_padding);
        log::debug!("Content changed, bounds {:?}", self.content);

        if self.size.is_some() {
            self.fit();
            true
        } else {
            self.fit_pending = true;
            false
        }
    }

    /// Update the viewport size. Does not refit unless a fit is still pending.
    pub fn resize(&mut self, size: Size) {
        if size.width <= 0.0 || size.height <= 0.0 {
            self.size = None;
            return;
        }
        self.size = Some(size);
        if self.fit_pending {
            self.fit();
        } else {
            self.clamp_scroll();
        }
    }

    /// Fit the content into the viewport and scroll it into view.
    pub fn fit(&mut self) {
        let Some(size) = self.size else {
            self.fit_pending = true;
            return;
        };
        self.fit_pending = false;

        let cell = self.settings.cell_size;
        let content_px = Size::new(self.content.w as f64 * cell, self.content.h as f64 * cell);
        self.fitted_zoom = fit_zoom(content_px, size);
        self.zoom = self.fitted_zoom.clamp(self.min_zoom(), self.max_zoom());

        let origin = Point::new(self.content.x as f64, self.content.y as f64);
        self.scroll = origin.to_vec2() * self.scale();
        self.clamp_scroll();
        log::debug!("Fit zoom {:.3}, scroll {:?}", self.zoom, self.scroll);
    }

    /// Largest scroll offset on each axis.
    pub fn max_scroll(&self) -> Vec2 {
        let Some(size) = self.size else {
            return Vec2::ZERO;
        };
        let scale = self.scale();
        Vec2::new(
            (self.grid.0 as f64 * scale - size.width).max(0.0),
            (self.grid.1 as f64 * scale - size.height).max(0.0),
        )
    }

    fn clamp_scroll(&mut self) {
        let max = self.max_scroll();
        self.scroll = Vec2::new(
            self.scroll.x.clamp(0.0, max.x),
            self.scroll.y.clamp(0.0, max.y),
        );
    }

    pub fn scroll_by(&mut self, delta: Vec2) {
        self.scroll += delta;
        self.clamp_scroll();
    }

    pub fn scroll_to(&mut self, scroll: Vec2) {
        self.scroll = scroll;
        self.clamp_scroll();
    }

    /// Zoom by `factor`, keeping the content under the device point fixed.
    pub fn zoom_at(&mut self, point: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom(), self.max_zoom());
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let anchor = self.device_to_cells(point);
        self.zoom = new_zoom;
        let moved = self.cells_to_device(anchor);
        self.scroll += moved - point;
        self.clamp_scroll();
    }

    /// Wheel input: zoom one step per event, or scroll vertically with the
    /// command modifier held.
    pub fn wheel(&mut self, event: WheelEvent) {
        if event.modifiers.command() {
            self.scroll_by(Vec2::new(0.0, event.delta.y));
            return;
        }
        let step = self.settings.wheel_step;
        if event.delta.y < 0.0 {
            self.zoom_at(event.position, step);
        } else if event.delta.y > 0.0 {
            self.zoom_at(event.position, 1.0 / step);
        }
    }

    /// Pinch gesture with a relative scale factor.
    pub fn pinch(&mut self, center: Point, scale: f64) {
        self.zoom_at(center, scale);
    }
}
