use crate::{
    core::{
        config::GlobeStyle,
        geo::GeoCoordinate,
        projection::{project_ring, ProjectionState},
    },
    data::geojson::CountryFeature,
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::context::{DrawingSurface, FrameStats, PathStyle},
    Result,
};
use fxhash::FxHashMap;

/// Country boundaries, one closed path per ring, clipped to the near side.
pub struct CountryLayer {
    properties: LayerProperties,
    countries: Vec<CountryFeature>,
    /// Rings per country, converted once at load
    rings: Vec<Vec<Vec<GeoCoordinate>>>,
    by_code: FxHashMap<String, usize>,
    hovered: Option<usize>,
    style: PathStyle,
    hover_style: PathStyle,
}

impl CountryLayer {
    pub fn new(countries: Vec<CountryFeature>, style: &GlobeStyle) -> Self {
        let rings = countries.iter().map(|c| c.rings().collect()).collect();
        let by_code = countries
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.code.clone().map(|code| (code, i)))
            .collect();

        Self {
            properties: LayerProperties::new(
                "countries".to_string(),
                "Countries".to_string(),
                LayerType::Country,
            )
            .with_z_index(1),
            countries,
            rings,
            by_code,
            hovered: None,
            style: PathStyle::filled(
                style.country_fill,
                style.country_stroke,
                style.country_stroke_width,
            ),
            hover_style: PathStyle::filled(
                style.country_hover_fill,
                style.country_stroke,
                style.country_stroke_width,
            ),
        }
    }

    pub fn countries(&self) -> &[CountryFeature] {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CountryFeature> {
        self.countries.get(index)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&CountryFeature> {
        self.by_code.get(code).map(|&i| &self.countries[i])
    }

    /// Index of the first country containing `coord`.
    pub fn hit_test(&self, coord: GeoCoordinate) -> Option<usize> {
        self.countries.iter().position(|c| c.contains(coord))
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Returns whether the hovered country changed.
    pub fn set_hovered(&mut self, index: Option<usize>) -> bool {
        let index = index.filter(|&i| i < self.countries.len());
        if self.hovered == index {
            return false;
        }
        self.hovered = index;
        true
    }
}

impl LayerTrait for CountryLayer {
    crate::impl_layer_trait!(CountryLayer, properties);

    fn render(
        &mut self,
        surface: &mut dyn DrawingSurface,
        state: &ProjectionState,
    ) -> Result<FrameStats> {
        let opacity = self.properties.opacity;
        let style = self.style.with_opacity(opacity);
        let hover_style = self.hover_style.with_opacity(opacity);

        let mut stats = FrameStats::default();
        for (index, rings) in self.rings.iter().enumerate() {
            let style = if self.hovered == Some(index) {
                &hover_style
            } else {
                &style
            };
            for ring in rings {
                if let Some(path) = project_ring(ring, state) {
                    surface.draw_path(&path.points, true, style)?;
                    stats.paths_drawn += 1;
                }
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{geo::ScreenPoint, projection::Rotation},
        rendering::context::RenderContext,
    };
    use geo_types::{polygon, MultiPolygon};

    fn square(code: &str, lon: f64, lat: f64) -> CountryFeature {
        let poly = polygon![
            (x: lon - 5.0, y: lat - 5.0),
            (x: lon + 5.0, y: lat - 5.0),
            (x: lon + 5.0, y: lat + 5.0),
            (x: lon - 5.0, y: lat + 5.0),
            (x: lon - 5.0, y: lat - 5.0),
        ];
        CountryFeature::new(Some(code.to_string()), code, MultiPolygon::new(vec![poly]))
    }

    fn layer() -> CountryLayer {
        CountryLayer::new(
            vec![square("NEAR", 0.0, -20.0), square("FAR", 180.0, 20.0)],
            &GlobeStyle::default(),
        )
    }

    fn state() -> ProjectionState {
        ProjectionState::new(Rotation::new(0.0, -25.0), 250.0, ScreenPoint::new(250.0, 250.0))
    }

    #[test]
    fn test_far_side_country_draws_nothing() {
        let mut layer = layer();
        let mut context = RenderContext::new(500, 500);
        let stats = layer.render(&mut context, &state()).unwrap();

        assert_eq!(stats.paths_drawn, 1);
        let (points, closed, _) = context.paths().next().unwrap();
        assert!(closed);
        assert_eq!(points.len(), 5);
    }

    #[test]
    fn test_hovered_country_uses_hover_fill() {
        let mut layer = layer();
        assert!(layer.set_hovered(Some(0)));
        assert!(!layer.set_hovered(Some(0)));

        let mut context = RenderContext::new(500, 500);
        layer.render(&mut context, &state()).unwrap();
        let (_, _, style) = context.paths().next().unwrap();
        assert_eq!(style.fill, Some(GlobeStyle::default().country_hover_fill));

        // Out-of-range indices clear the hover
        assert!(layer.set_hovered(Some(9)));
        assert_eq!(layer.hovered(), None);
    }

    #[test]
    fn test_country_on_the_limb_keeps_its_hover_fill() {
        let band = polygon![
            (x: 60.0, y: -10.0),
            (x: 120.0, y: -10.0),
            (x: 120.0, y: 10.0),
            (x: 60.0, y: 10.0),
            (x: 60.0, y: -10.0),
        ];
        let mut layer = CountryLayer::new(
            vec![CountryFeature::new(None, "Big", MultiPolygon::new(vec![band]))],
            &GlobeStyle::default(),
        );
        let state =
            ProjectionState::new(Rotation::new(0.0, 0.0), 100.0, ScreenPoint::new(100.0, 100.0));

        let hovered = layer.hit_test(GeoCoordinate::new(75.0, 0.0));
        assert_eq!(hovered, Some(0));
        layer.set_hovered(hovered);

        let mut context = RenderContext::new(200, 200);
        let stats = layer.render(&mut context, &state).unwrap();
        assert_eq!(stats.paths_drawn, 1);

        let (points, closed, style) = context.paths().next().unwrap();
        assert!(closed);
        assert_eq!(style.fill, Some(GlobeStyle::default().country_hover_fill));
        // The outline reaches the right edge of the disc
        let rightmost = points.iter().map(|p| p.x).fold(f64::MIN, f64::max);
        assert!(rightmost > 199.0 && rightmost <= 200.0 + 1e-9);
    }

    #[test]
    fn test_hit_test_and_lookup() {
        let layer = layer();
        assert_eq!(layer.hit_test(GeoCoordinate::new(1.0, -21.0)), Some(0));
        assert_eq!(layer.hit_test(GeoCoordinate::new(179.0, 21.0)), Some(1));
        assert_eq!(layer.hit_test(GeoCoordinate::new(90.0, 0.0)), None);
        assert_eq!(layer.find_by_code("FAR").map(|c| c.name.as_str()), Some("FAR"));
        assert!(layer.find_by_code("XYZ").is_none());
    }
}
