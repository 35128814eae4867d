pub mod base;
pub mod country;
pub mod macros;
pub mod marker;
pub mod sphere;

pub use base::{LayerProperties, LayerTrait, LayerType, RenderTarget};
pub use country::CountryLayer;
pub use marker::MarkerLayer;
pub use sphere::SphereLayer;
