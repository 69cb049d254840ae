//! Viewer configuration, loaded from JSON. Every field has a default, so an
//! empty object is a valid configuration.

use crate::viewport::{Rect, HOME_BOUNDS};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CAPTURE_ID: &str = "6a0661b1-96bc-4a8d-94c2-b43d1f1c4cd9";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    /// Capture shown when the URL does not name one.
    pub default_capture_id: String,
    /// View fitted on first load and by "reset view".
    pub home_bounds: Rect,
    pub captures_list_visible: bool,
    pub overlays_visible: bool,
    /// Factor applied by the zoom-in button; zoom-out uses its inverse.
    pub zoom_step: f64,
    /// Handed to the widget as its zoom limit.
    pub max_zoom_pixel_ratio: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_capture_id: DEFAULT_CAPTURE_ID.to_string(),
            home_bounds: HOME_BOUNDS,
            captures_list_visible: false,
            overlays_visible: true,
            zoom_step: 2.0,
            max_zoom_pixel_ratio: 20.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse viewer config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("zoom step must be greater than 1, got {0}")]
    ZoomStep(f64),
    #[error("home bounds must have a positive size")]
    HomeBounds,
    #[error("max zoom pixel ratio must be positive, got {0}")]
    MaxZoomPixelRatio(f64),
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.zoom_step > 1.0) {
            return Err(ConfigError::ZoomStep(self.zoom_step));
        }
        if !(self.home_bounds.width > 0.0 && self.home_bounds.height > 0.0) {
            return Err(ConfigError::HomeBounds);
        }
        if !(self.max_zoom_pixel_ratio > 0.0) {
            return Err(ConfigError::MaxZoomPixelRatio(self.max_zoom_pixel_ratio));
        }
        Ok(())
    }
}
