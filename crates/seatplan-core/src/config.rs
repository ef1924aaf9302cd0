//! Editor tuning.

use crate::geometry::DEFAULT_CELL_SIZE;
use crate::guides::{GUIDE_TOLERANCE, GuideSettings, MAX_GUIDES_PER_AXIS};
use crate::input::DOUBLE_ACTIVATION_MS;
use crate::interaction::{InteractionSettings, MARQUEE_THRESHOLD};
use crate::scene::{DEFAULT_GRID_COLS, DEFAULT_GRID_ROWS};
use crate::viewport::{FIT_PADDING, MAX_ZOOM, MIN_EDIT_ZOOM, ViewportSettings, WHEEL_ZOOM_STEP};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Every tunable of the editor. Missing fields take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Edge of one cell in pixels at 100% zoom.
    pub cell_size: f64,
    pub grid_cols: i32,
    pub grid_rows: i32,
    pub double_activation_ms: u64,
    /// Pixels a marquee must span before it selects.
    pub marquee_threshold: f64,
    /// In cells.
    pub guide_tolerance: f64,
    pub max_guides_per_axis: usize,
    pub wheel_zoom_step: f64,
    pub min_edit_zoom: f64,
    pub max_zoom: f64,
    /// In cells.
    pub fit_padding: i32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            grid_cols: DEFAULT_GRID_COLS,
            grid_rows: DEFAULT_GRID_ROWS,
            double_activation_ms: DOUBLE_ACTIVATION_MS,
            marquee_threshold: MARQUEE_THRESHOLD,
            guide_tolerance: GUIDE_TOLERANCE,
            max_guides_per_axis: MAX_GUIDES_PER_AXIS,
            wheel_zoom_step: WHEEL_ZOOM_STEP,
            min_edit_zoom: MIN_EDIT_ZOOM,
            max_zoom: MAX_ZOOM,
            fit_padding: FIT_PADDING,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        // A bare array would otherwise deserialize as a field sequence
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(ConfigError::Json(serde::de::Error::custom(
                "config must be a JSON object",
            )));
        }
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded editor config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(invalid("cellSize", "must be positive"));
        }
        if self.grid_cols < 1 || self.grid_rows < 1 {
            return Err(invalid("gridCols", "grid must be at least 1x1"));
        }
        if !(self.wheel_zoom_step.is_finite() && self.wheel_zoom_step > 1.0) {
            return Err(invalid("wheelZoomStep", "must be greater than 1"));
        }
        if !(self.min_edit_zoom > 0.0 && self.min_edit_zoom <= self.max_zoom) {
            return Err(invalid(
                "minEditZoom",
                format!("must be in (0, {}]", self.max_zoom),
            ));
        }
        if self.guide_tolerance < 0.0 || self.marquee_threshold < 0.0 || self.fit_padding < 0 {
            return Err(invalid("guideTolerance", "distances must not be negative"));
        }
        Ok(())
    }

    pub fn guide_settings(&self) -> GuideSettings {
        GuideSettings {
            tolerance: self.guide_tolerance,
            max_per_axis: self.max_guides_per_axis,
        }
    }

    pub fn interaction_settings(&self) -> InteractionSettings {
        InteractionSettings {
            cell_size: self.cell_size,
            double_activation_ms: self.double_activation_ms,
            marquee_threshold: self.marquee_threshold,
            guides: self.guide_settings(),
        }
    }

    pub fn viewport_settings(&self) -> ViewportSettings {
        ViewportSettings {
            cell_size: self.cell_size,
            min_edit_zoom: self.min_edit_zoom,
            max_zoom: self.max_zoom,
            wheel_step: self.wheel_zoom_step,
            fit_padding: self.fit_padding,
        }
    }
}
