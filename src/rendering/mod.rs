pub mod context;
pub mod svg;

#[cfg(feature = "wasm")]
pub mod canvas;
#[cfg(feature = "egui")]
pub mod painter;

// Re-export main types
pub use context::{Color, DrawCommand, DrawingSurface, FrameStats, PathStyle, RenderContext};
pub use svg::SvgSurface;

#[cfg(feature = "wasm")]
pub use canvas::CanvasSurface;
#[cfg(feature = "egui")]
pub use painter::PainterSurface;
