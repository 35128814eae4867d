//! Engine-wide defaults, mostly taken from the hybrid vector + canvas globe.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

use std::f64::consts::FRAC_PI_2;

/// Angular distance from the view center to the horizon, in radians.
/// Markers at exactly this distance are still drawn.
pub const HORIZON: f64 = FRAC_PI_2;

/// Drag rotation sensitivity. Divided by the current scale, so dragging a
/// zoomed-in globe rotates it by a smaller angle per pixel.
pub const DEFAULT_ROTATION_SENSITIVITY: f64 = 60.0;

/// Auto-rotation step per tick, before division by the current scale.
pub const DEFAULT_AUTO_ROTATE_STEP: f64 = 1.0;

/// Rotation applied at startup: `(lambda, phi)` in degrees.
pub const DEFAULT_ROTATION: (f64, f64) = (0.0, -25.0);

/// Zoom factors below this floor are clamped.
pub const DEFAULT_MIN_ZOOM_FACTOR: f64 = 0.5;

/// Globe radius is the surface height divided by this ratio.
pub const DEFAULT_RADIUS_RATIO: f64 = 2.5;

/// Auto-rotate tick cadence (~60 fps).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 16;

/// Wheel delta to zoom exponent, base 2.
pub const DEFAULT_WHEEL_ZOOM_SPEED: f64 = 0.002;

/// Marker dot radius in pixels.
pub const DEFAULT_DOT_RADIUS: f64 = 0.8;

/// Fallback surface size used before the first resize.
pub const DEFAULT_SURFACE_SIZE: (f64, f64) = (960.0, 500.0);

/// Directory (or URL prefix) holding `<code>.png` flag images.
pub const DEFAULT_FLAG_PATH: &str = "./img/flags/";
