//! Configuration for globe interaction and appearance
//!
//! Two presets mirror the two ways the globe has been deployed: a pure
//! vector rendering with a fixed radius, and a hybrid vector + canvas
//! rendering that sizes the globe from the surface height. Either can be
//! used as-is, or a partial JSON document can be layered over the defaults.

use crate::{
    core::{
        constants::*,
        projection::{ProjectionState, Rotation},
        geo::ScreenPoint,
    },
    rendering::context::Color,
    Result,
};
use serde::{Deserialize, Serialize};

/// How the globe radius follows the surface size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RadiusPolicy {
    /// radius = height / ratio
    HeightRatio { ratio: f64 },
    /// Constant radius regardless of the surface size
    Fixed { scale: f64 },
}

impl RadiusPolicy {
    pub fn radius(&self, height: f64) -> f64 {
        match self {
            Self::HeightRatio { ratio } => height / ratio,
            Self::Fixed { scale } => *scale,
        }
    }
}

impl Default for RadiusPolicy {
    fn default() -> Self {
        Self::HeightRatio {
            ratio: DEFAULT_RADIUS_RATIO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeStyle {
    pub sphere_fill: Color,
    pub sphere_stroke: Color,
    pub sphere_stroke_width: f64,
    pub country_fill: Color,
    pub country_hover_fill: Color,
    pub country_stroke: Color,
    pub country_stroke_width: f64,
    pub dot_color: Color,
    pub dot_radius: f64,
    /// Prefix joined with `<code>.png` to locate flag images
    pub flag_path: String,
}

impl Default for GlobeStyle {
    fn default() -> Self {
        Self {
            sphere_fill: Color::rgb(0xee, 0xee, 0xee),
            sphere_stroke: Color::BLACK,
            sphere_stroke_width: 0.2,
            country_fill: Color::WHITE,
            country_hover_fill: Color::rgb(0xf2, 0xf2, 0xf2),
            country_stroke: Color::BLACK,
            country_stroke_width: 0.3,
            dot_color: Color::rgb(0x00, 0x00, 0x75),
            dot_radius: DEFAULT_DOT_RADIUS,
            flag_path: DEFAULT_FLAG_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub rotation_sensitivity: f64,
    pub auto_rotate_step: f64,
    pub auto_rotate: bool,
    pub initial_rotation: Rotation,
    pub min_zoom_factor: f64,
    pub radius_policy: RadiusPolicy,
    pub tick_interval_ms: u64,
    pub wheel_zoom_speed: f64,
    pub style: GlobeStyle,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        GlobeProfile::default().resolve()
    }
}

impl GlobeConfig {
    /// Decodes a (possibly partial) JSON object over the default configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GlobeConfig = serde_json::from_str(json)?;
        log::debug!(
            "Loaded globe config: sensitivity={}, zoom floor={}, radius={:?}",
            config.rotation_sensitivity,
            config.min_zoom_factor,
            config.radius_policy
        );
        Ok(config)
    }

    /// Builds the startup projection for a surface of the given size.
    pub fn initial_state(&self, width: f64, height: f64) -> ProjectionState {
        ProjectionState::new(
            self.initial_rotation,
            self.radius_policy.radius(height),
            ScreenPoint::new(width / 2.0, height / 2.0),
        )
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GlobeProfile {
    /// Countries as vector paths, markers on a raster overlay
    #[default]
    Canvas,
    /// Everything as vector paths, fixed radius
    Svg,
    Custom(GlobeConfig),
}

impl GlobeProfile {
    pub fn resolve(&self) -> GlobeConfig {
        match self {
            Self::Canvas => GlobeConfig {
                rotation_sensitivity: DEFAULT_ROTATION_SENSITIVITY,
                auto_rotate_step: DEFAULT_AUTO_ROTATE_STEP,
                auto_rotate: true,
                initial_rotation: Rotation::from(DEFAULT_ROTATION),
                min_zoom_factor: DEFAULT_MIN_ZOOM_FACTOR,
                radius_policy: RadiusPolicy::HeightRatio {
                    ratio: DEFAULT_RADIUS_RATIO,
                },
                tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
                wheel_zoom_speed: DEFAULT_WHEEL_ZOOM_SPEED,
                style: GlobeStyle::default(),
            },
            Self::Svg => GlobeConfig {
                rotation_sensitivity: 80.0,
                auto_rotate_step: DEFAULT_AUTO_ROTATE_STEP,
                auto_rotate: true,
                initial_rotation: Rotation::new(0.0, -30.0),
                min_zoom_factor: 0.3,
                radius_policy: RadiusPolicy::Fixed { scale: 250.0 },
                tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
                wheel_zoom_speed: DEFAULT_WHEEL_ZOOM_SPEED,
                style: GlobeStyle {
                    dot_color: Color::rgb(0x85, 0x01, 0x01),
                    dot_radius: 0.6,
                    country_stroke_width: 0.3,
                    ..GlobeStyle::default()
                },
            },
            Self::Custom(config) => config.clone(),
        }
    }
}
