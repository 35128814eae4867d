use crate::core::{geo::ScreenPoint, projection::Rotation};
use serde::{Deserialize, Serialize};

/// Pointer drag delta in pixels since the previous drag event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragEvent {
    pub dx: f64,
    pub dy: f64,
}

/// Absolute zoom factor relative to the initial scale (1.0 = unzoomed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomEvent {
    pub factor: f64,
}

/// New drawing surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeEvent {
    pub width: f64,
    pub height: f64,
}

impl ResizeEvent {
    /// False for zero, negative or non-finite sizes, e.g. a minimized window.
    pub fn has_area(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// One auto-rotation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickEvent {
    /// Timer generation that produced the tick; bumps on every restart
    pub generation: u64,
    pub sequence: u64,
}

/// Input events consumed by the globe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Pointer pressed, drag gesture begins
    DragStart { position: ScreenPoint },
    /// Drag in progress
    Drag(DragEvent),
    /// Pointer released
    DragEnd,
    /// Pinch or programmatic zoom with an absolute factor
    Zoom(ZoomEvent),
    /// Scroll wheel, accumulated into a zoom factor
    Wheel { delta: f64 },
    /// Surface resized
    Resize(ResizeEvent),
    /// Pointer hovering without a button held
    PointerMove { position: ScreenPoint },
    /// Pointer left the surface
    PointerLeave,
}

impl InputEvent {
    pub fn drag(dx: f64, dy: f64) -> Self {
        Self::Drag(DragEvent { dx, dy })
    }

    pub fn zoom(factor: f64) -> Self {
        Self::Zoom(ZoomEvent { factor })
    }

    pub fn resize(width: f64, height: f64) -> Self {
        Self::Resize(ResizeEvent { width, height })
    }
}

/// Events emitted by the globe for the host to observe
#[derive(Debug, Clone, PartialEq)]
pub enum GlobeEvent {
    /// Rotation or scale changed
    ViewChanged { rotation: Rotation, scale: f64 },
    /// A drag began and auto-rotation paused
    AutoRotateSuspended,
    /// Auto-rotation (re)started
    AutoRotateResumed,
    /// Surface size changed
    Resized { width: f64, height: f64 },
    /// The hovered country changed; `None` when nothing is hovered
    HoverChanged { country: Option<String> },
}

