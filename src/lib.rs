//! # Globelet
//!
//! A draggable orthographic globe engine.
//!
//! The crate owns the interactive part of a spinning globe: the projection
//! state and its update rules (drag, zoom, auto-rotation, resize), the
//! orthographic transform, culling of point markers against the visible
//! hemisphere, and a small render loop that draws the sphere, country
//! boundaries and markers through an abstract drawing surface. Hosts
//! provide the surface (SVG, browser canvas, egui) and the input events.

pub mod animation;
pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod spatial;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{GlobeConfig, GlobeProfile, GlobeStyle, RadiusPolicy},
    controller::ViewController,
    geo::{angular_distance, GeoCoordinate, ScreenPoint},
    globe::{Globe, LoopState},
    projection::{project, unproject, ProjectionState, Rotation},
};

pub use crate::data::geojson::{CountryFeature, CountryLabel, MarkerPoint};

pub use crate::input::{
    events::{GlobeEvent, InputEvent},
    handler::{EventSender, InputHandler},
};

pub use crate::layers::base::LayerTrait;

pub use crate::rendering::context::{Color, DrawingSurface, FrameStats, RenderContext};

pub use crate::spatial::culling::visible_markers;

pub use crate::animation::timer::AutoRotateTimer;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, GlobeError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum GlobeError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Event channel disconnected")]
    Disconnected,
}

/// Error type alias for convenience
pub type Error = GlobeError;

/// Initializes `env_logger` from `RUST_LOG`. Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
