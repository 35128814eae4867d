use crate::{
    core::{config::GlobeStyle, projection::ProjectionState},
    data::geojson::MarkerPoint,
    layers::base::{LayerProperties, LayerTrait, LayerType, RenderTarget},
    rendering::context::{Color, DrawingSurface, FrameStats},
    spatial::culling::visible_markers,
    Result,
};

/// Marker dots. Every render repaints all visible markers from scratch;
/// the caller clears the overlay surface first.
pub struct MarkerLayer {
    properties: LayerProperties,
    markers: Vec<MarkerPoint>,
    color: Color,
    radius: f64,
}

impl MarkerLayer {
    pub fn new(markers: Vec<MarkerPoint>, style: &GlobeStyle) -> Self {
        Self {
            properties: LayerProperties::new(
                "markers".to_string(),
                "Markers".to_string(),
                LayerType::Marker,
            )
            .with_target(RenderTarget::Overlay)
            .with_z_index(2),
            markers,
            color: style.dot_color,
            radius: style.dot_radius,
        }
    }

    pub fn markers(&self) -> &[MarkerPoint] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl LayerTrait for MarkerLayer {
    crate::impl_layer_trait!(MarkerLayer, properties);

    fn render(
        &mut self,
        surface: &mut dyn DrawingSurface,
        state: &ProjectionState,
    ) -> Result<FrameStats> {
        let color = self.color.with_opacity(self.properties.opacity);
        let mut visible = 0;
        for (_, point) in visible_markers(&self.markers, state) {
            surface.fill_circle(point, self.radius, color)?;
            visible += 1;
        }
        log::trace!("{} of {} markers visible", visible, self.markers.len());

        Ok(FrameStats {
            paths_drawn: 0,
            markers_visible: visible,
            markers_culled: self.markers.len() - visible,
        })
    }
}
