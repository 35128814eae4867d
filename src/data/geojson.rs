//! Decoding of the two globe inputs: country boundaries (a GeoJSON
//! FeatureCollection) and marker records (a JSON array of objects carrying
//! `longitude` and `latitude` plus arbitrary metadata).
//!
//! Fetching the documents is left to the host; these functions only turn
//! already-loaded text into immutable values.

use crate::{core::geo::GeoCoordinate, GlobeError, Result};
use geo::Contains;
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPoint {
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

impl GeoJsonGeometry {
    /// Collects the areal parts of this geometry. Points and lines have none.
    fn polygons(&self, out: &mut Vec<Polygon<f64>>) {
        match self {
            Self::Polygon { coordinates } => out.extend(to_polygon(coordinates)),
            Self::MultiPolygon { coordinates } => {
                out.extend(coordinates.iter().filter_map(|rings| to_polygon(rings)))
            }
            Self::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.polygons(out);
                }
            }
            _ => {}
        }
    }
}

fn to_line_string(ring: &[[f64; 2]]) -> LineString<f64> {
    LineString::new(ring.iter().map(|&[x, y]| Coord { x, y }).collect())
}

fn to_polygon(rings: &[Vec<[f64; 2]>]) -> Option<Polygon<f64>> {
    let (exterior, interiors) = rings.split_first()?;
    Some(Polygon::new(
        to_line_string(exterior),
        interiors.iter().map(|ring| to_line_string(ring)).collect(),
    ))
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<GeoJsonFeature> },
}

/// A country outline with the identifiers used for display.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryFeature {
    /// Feature id; doubles as the flag image code
    pub code: Option<String>,
    pub name: String,
    pub geometry: MultiPolygon<f64>,
}

/// Display text for a hovered country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryLabel {
    pub name: String,
    pub code: Option<String>,
    /// `flag_path + code + ".png"`, when the country has a code
    pub flag_src: Option<String>,
}

impl CountryFeature {
    pub fn new(code: Option<String>, name: impl Into<String>, geometry: MultiPolygon<f64>) -> Self {
        Self {
            code,
            name: name.into(),
            geometry,
        }
    }

    /// Every ring of every polygon, exteriors before their holes.
    pub fn rings(&self) -> impl Iterator<Item = Vec<GeoCoordinate>> + '_ {
        self.geometry.0.iter().flat_map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .map(|ring| ring.coords().map(|c| GeoCoordinate::from(*c)).collect())
        })
    }

    /// Planar point-in-polygon test on longitude/latitude. Rings drawn past
    /// the antimeridian (e.g. 170..190) are matched one turn over.
    pub fn contains(&self, coord: GeoCoordinate) -> bool {
        [0.0, 360.0, -360.0].iter().any(|turn| {
            self.geometry
                .contains(&geo_types::Point::new(coord.longitude + turn, coord.latitude))
        })
    }

    pub fn label(&self, flag_path: &str) -> CountryLabel {
        CountryLabel {
            name: self.name.clone(),
            code: self.code.clone(),
            flag_src: self
                .code
                .as_ref()
                .map(|code| format!("{}{}.png", flag_path, code)),
        }
    }

    fn from_feature(feature: &GeoJsonFeature) -> Option<Self> {
        let code = feature.id.as_ref().and_then(value_to_string);
        let name = feature
            .properties
            .as_ref()
            .and_then(|p| p.get("name"))
            .and_then(value_to_string)
            .or_else(|| code.clone())?;

        let mut polygons = Vec::new();
        if let Some(geometry) = &feature.geometry {
            geometry.polygons(&mut polygons);
        }
        if polygons.is_empty() {
            log::warn!("Skipping feature {:?}: no polygon geometry", name);
            return None;
        }

        Some(Self::new(code, name, MultiPolygon::new(polygons)))
    }
}

fn value_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decodes country outlines from a GeoJSON Feature or FeatureCollection.
///
/// Features without polygonal geometry, or without any name or id, are
/// skipped with a warning rather than failing the whole document.
pub fn decode_countries(json: &str) -> Result<Vec<CountryFeature>> {
    let document: GeoJson = serde_json::from_str(json)
        .map_err(|e| GlobeError::ParseError(format!("Invalid GeoJSON: {}", e)))?;

    let features = match &document {
        GeoJson::Feature(feature) => std::slice::from_ref(feature),
        GeoJson::FeatureCollection { features } => features.as_slice(),
    };

    let countries: Vec<CountryFeature> = features
        .iter()
        .filter_map(CountryFeature::from_feature)
        .collect();
    log::debug!(
        "Decoded {} countries from {} features",
        countries.len(),
        features.len()
    );
    Ok(countries)
}

/// A point of interest drawn as a dot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPoint {
    #[serde(flatten)]
    pub coordinate: GeoCoordinate,
    /// Every other field of the source record
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl MarkerPoint {
    pub fn new(coordinate: GeoCoordinate) -> Self {
        Self {
            coordinate,
            metadata: serde_json::Map::new(),
        }
    }

    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata.get("name").and_then(|v| v.as_str())
    }

    pub fn id(&self) -> Option<String> {
        self.metadata.get("id").and_then(value_to_string)
    }
}

/// Decodes a JSON array of marker records.
pub fn decode_markers(json: &str) -> Result<Vec<MarkerPoint>> {
    let markers: Vec<MarkerPoint> = serde_json::from_str(json)?;
    log::debug!("Decoded {} markers", markers.len());
    Ok(markers)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTRIES: &str = r#"
    {
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "FRA",
                "properties": { "name": "France" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-5, 42], [8, 42], [8, 51], [-5, 51], [-5, 42]]]
                }
            },
            {
                "type": "Feature",
                "id": 392,
                "properties": { "name": "Japan" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[130, 31], [135, 31], [135, 35], [130, 35], [130, 31]]],
                        [[[139, 35], [142, 35], [142, 41], [139, 41], [139, 35]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "Capital" },
                "geometry": { "type": "Point", "coordinates": [2.35, 48.85] }
            }
        ]
    }
    "#;

    #[test]
    fn test_decode_countries() {
        let countries = decode_countries(COUNTRIES).unwrap();
        assert_eq!(countries.len(), 2);

        assert_eq!(countries[0].name, "France");
        assert_eq!(countries[0].code.as_deref(), Some("FRA"));
        assert_eq!(countries[0].rings().count(), 1);

        assert_eq!(countries[1].code.as_deref(), Some("392"));
        assert_eq!(countries[1].geometry.0.len(), 2);
        let rings: Vec<_> = countries[1].rings().collect();
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[1][0], GeoCoordinate::new(139.0, 35.0));
    }

    #[test]
    fn test_polygon_holes_are_rings() {
        let json = r#"{
            "type": "Feature",
            "id": "ZAF",
            "properties": { "name": "South Africa" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [
                    [[16, -35], [33, -35], [33, -22], [16, -22], [16, -35]],
                    [[27, -30.5], [29.5, -30.5], [29.5, -28.5], [27, -28.5], [27, -30.5]]
                ]
            }
        }"#;
        let countries = decode_countries(json).unwrap();
        assert_eq!(countries[0].rings().count(), 2);

        // Lesotho sits in the hole
        assert!(!countries[0].contains(GeoCoordinate::new(28.0, -29.5)));
        assert!(countries[0].contains(GeoCoordinate::new(20.0, -30.0)));
    }

    #[test]
    fn test_contains() {
        let countries = decode_countries(COUNTRIES).unwrap();
        assert!(countries[0].contains(GeoCoordinate::new(2.35, 48.85)));
        assert!(!countries[0].contains(GeoCoordinate::new(-20.0, 48.85)));
        assert!(countries[1].contains(GeoCoordinate::new(140.0, 38.0)));
    }

    #[test]
    fn test_contains_across_the_antimeridian() {
        let json = r#"{
            "type": "Feature",
            "id": "FJI",
            "properties": { "name": "Fiji" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[170, -20], [190, -20], [190, -10], [170, -10], [170, -20]]]
            }
        }"#;
        let fiji = &decode_countries(json).unwrap()[0];

        assert!(fiji.contains(GeoCoordinate::new(175.0, -15.0)));
        // Unprojected longitudes are wrapped, so the eastern part arrives as negative
        assert!(fiji.contains(GeoCoordinate::new(-175.0, -15.0)));
        assert!(!fiji.contains(GeoCoordinate::new(-165.0, -15.0)));
    }

    #[test]
    fn test_label() {
        let countries = decode_countries(COUNTRIES).unwrap();
        let label = countries[0].label("./img/flags/");
        assert_eq!(label.name, "France");
        assert_eq!(label.flag_src.as_deref(), Some("./img/flags/FRA.png"));

        let unnamed = CountryFeature::new(None, "Nowhere", MultiPolygon::new(vec![]));
        assert_eq!(unnamed.label("./").flag_src, None);
    }

    #[test]
    fn test_invalid_geojson() {
        assert!(matches!(
            decode_countries("{\"type\": \"Topology\"}"),
            Err(GlobeError::ParseError(_))
        ));
    }

    #[test]
    fn test_decode_markers_keeps_metadata() {
        let markers = decode_markers(
            r#"[
                { "longitude": 2.35, "latitude": 48.85, "name": "Paris", "id": 7 },
                { "longitude": -74.0, "latitude": 40.7 }
            ]"#,
        )
        .unwrap();

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].coordinate, GeoCoordinate::new(2.35, 48.85));
        assert_eq!(markers[0].name(), Some("Paris"));
        assert_eq!(markers[0].id().as_deref(), Some("7"));
        assert!(!markers[0].metadata.contains_key("longitude"));
        assert!(markers[1].metadata.is_empty());
    }

    #[test]
    fn test_marker_without_coordinates_is_an_error() {
        assert!(decode_markers(r#"[{ "name": "Atlantis" }]"#).is_err());
        assert!(decode_markers("[]").unwrap().is_empty());
    }
}
