pub mod culling;

pub use culling::{on_near_side, visible_markers, VisibleMarkers};
