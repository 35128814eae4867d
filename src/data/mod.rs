pub mod geojson;

pub use geojson::{decode_countries, decode_markers, CountryFeature, CountryLabel, MarkerPoint};
