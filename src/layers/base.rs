use crate::{
    core::projection::ProjectionState,
    rendering::context::{DrawingSurface, FrameStats},
    Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Sphere,
    Country,
    Marker,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Sphere => write!(f, "sphere"),
            LayerType::Country => write!(f, "country"),
            LayerType::Marker => write!(f, "marker"),
        }
    }
}

/// Which surface a layer paints on when the globe renders to two surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTarget {
    /// Vector surface, redrawn path by path
    Base,
    /// Raster surface, cleared and repainted every frame
    Overlay,
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    pub target: RenderTarget,
    pub z_index: i32,
    pub opacity: f32,
    pub visible: bool,
}

impl LayerProperties {
    pub fn new(id: String, name: String, layer_type: LayerType) -> Self {
        Self {
            id,
            name,
            layer_type,
            target: RenderTarget::Base,
            z_index: 0,
            opacity: 1.0,
            visible: true,
        }
    }

    pub fn with_target(mut self, target: RenderTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}

/// A drawable slice of the globe.
///
/// Layers read the projection state for the duration of one `render` call
/// and keep no reference to it afterwards.
pub trait LayerTrait {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn layer_type(&self) -> LayerType;
    fn target(&self) -> RenderTarget;
    fn z_index(&self) -> i32;
    fn set_z_index(&mut self, z_index: i32);
    fn opacity(&self) -> f32;
    fn set_opacity(&mut self, opacity: f32);
    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);

    fn render(
        &mut self,
        surface: &mut dyn DrawingSurface,
        state: &ProjectionState,
    ) -> Result<FrameStats>;

    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_properties() {
        let props = LayerProperties::new(
            "markers".to_string(),
            "Markers".to_string(),
            LayerType::Marker,
        )
        .with_target(RenderTarget::Overlay)
        .with_z_index(2);

        assert_eq!(props.id, "markers");
        assert_eq!(props.layer_type, LayerType::Marker);
        assert_eq!(props.target, RenderTarget::Overlay);
        assert_eq!(props.z_index, 2);
        assert_eq!(props.opacity, 1.0);
        assert!(props.visible);
    }

    #[test]
    fn test_layer_type_display() {
        assert_eq!(LayerType::Sphere.to_string(), "sphere");
        assert_eq!(LayerType::Country.to_string(), "country");
        assert_eq!(LayerType::Marker.to_string(), "marker");
    }
}
