//! Event subscriptions attached to elements.
//!
//! Listeners are plain data: an event kind paired with the viewer command to
//! run. Render code attaches them while filling an element; the viewer turns
//! dispatched actions into state changes on a later, separate call.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Click,
}

/// Commands the viewer knows how to run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Action {
    /// Show the capture with this unique id and hide all others.
    ActivateCapture(String),
    ToggleCapturesList,
    ToggleOverlays,
    /// Multiply the zoom level.
    ZoomBy(f64),
    /// Fit the configured home bounds.
    ResetView,
    ToggleFullscreen,
    /// Open the detail modal of an overlay object.
    OpenOverlay(String),
    CloseModal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Listener {
    pub kind: EventKind,
    pub action: Action,
}
