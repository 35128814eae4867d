//! Prelude module for common globelet types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use globelet::prelude::*;`

pub use crate::core::{
    config::{GlobeConfig, GlobeProfile, GlobeStyle, RadiusPolicy},
    controller::{apply_auto_rotate_step, apply_drag, apply_resize, apply_zoom, ViewController},
    geo::{angular_distance, GeoCoordinate, ScreenPoint},
    globe::{Globe, LoopState},
    projection::{project, project_ring, unproject, ProjectedPath, ProjectionState, Rotation},
};

pub use crate::data::geojson::{
    decode_countries, decode_markers, CountryFeature, CountryLabel, MarkerPoint,
};

pub use crate::input::{
    events::{DragEvent, GlobeEvent, InputEvent, ResizeEvent, TickEvent, ZoomEvent},
    handler::{EventSender, InputHandler},
};

pub use crate::layers::base::{LayerTrait, LayerType, RenderTarget};

pub use crate::rendering::{
    context::{Color, DrawingSurface, FrameStats, PathStyle, RenderContext},
    svg::SvgSurface,
};

#[cfg(feature = "egui")]
pub use crate::rendering::painter::PainterSurface;

#[cfg(feature = "wasm")]
pub use crate::rendering::canvas::CanvasSurface;

pub use crate::spatial::culling::{visible_markers, VisibleMarkers};

pub use crate::animation::timer::AutoRotateTimer;

pub use crate::{Error as GlobeError, Result};

pub use std::time::Duration;

pub use instant::Instant;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
