use crate::{
    core::{config::GlobeStyle, geo::ScreenPoint, projection::ProjectionState},
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::context::{DrawingSurface, FrameStats, PathStyle},
    Result,
};

const OUTLINE_SEGMENTS: usize = 128;

/// The globe disc: a filled circle of radius `scale` around `translate`,
/// drawn beneath the countries.
pub struct SphereLayer {
    properties: LayerProperties,
    style: PathStyle,
}

impl SphereLayer {
    pub fn new(style: &GlobeStyle) -> Self {
        Self {
            properties: LayerProperties::new(
                "sphere".to_string(),
                "Sphere".to_string(),
                LayerType::Sphere,
            ),
            style: PathStyle::filled(
                style.sphere_fill,
                style.sphere_stroke,
                style.sphere_stroke_width,
            ),
        }
    }

    /// Closed outline of the visible disc.
    pub fn outline(state: &ProjectionState) -> Vec<ScreenPoint> {
        (0..OUTLINE_SEGMENTS)
            .map(|i| {
                let angle = i as f64 / OUTLINE_SEGMENTS as f64 * std::f64::consts::TAU;
                let (sin, cos) = angle.sin_cos();
                ScreenPoint::new(
                    state.translate.x + state.scale * cos,
                    state.translate.y + state.scale * sin,
                )
            })
            .collect()
    }
}

impl LayerTrait for SphereLayer {
    crate::impl_layer_trait!(SphereLayer, properties);

    fn render(
        &mut self,
        surface: &mut dyn DrawingSurface,
        state: &ProjectionState,
    ) -> Result<FrameStats> {
        if !(state.scale > 0.0) {
            return Ok(FrameStats::default());
        }
        let style = self.style.with_opacity(self.properties.opacity);
        surface.draw_path(&Self::outline(state), true, &style)?;
        Ok(FrameStats {
            paths_drawn: 1,
            ..FrameStats::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::projection::Rotation, rendering::context::RenderContext};

    #[test]
    fn test_outline_is_on_the_disc() {
        let state =
            ProjectionState::new(Rotation::default(), 200.0, ScreenPoint::new(400.0, 250.0));
        let outline = SphereLayer::outline(&state);
        assert_eq!(outline.len(), OUTLINE_SEGMENTS);
        for point in outline {
            assert!((point.distance_to(&state.translate) - 200.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_renders_one_closed_path() {
        let mut layer = SphereLayer::new(&GlobeStyle::default());
        let mut context = RenderContext::new(800, 500);
        let stats = layer
            .render(&mut context, &ProjectionState::default())
            .unwrap();

        assert_eq!(stats.paths_drawn, 1);
        let (_, closed, style) = context.paths().next().unwrap();
        assert!(closed);
        assert_eq!(style.fill, Some(GlobeStyle::default().sphere_fill));
    }
}
