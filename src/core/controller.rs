//! View controller: the single owner of the [`ProjectionState`].
//!
//! The free functions are the pure update rules; [`ViewController`] applies
//! them to the state it owns, one function per event type.

use crate::{
    core::{
        config::{GlobeConfig, RadiusPolicy},
        geo::{wrap_longitude, ScreenPoint},
        projection::{ProjectionState, Rotation},
    },
    input::events::{DragEvent, ResizeEvent, ZoomEvent},
};

/// Rotates by a screen-space drag. The angular step is divided by the
/// current scale so that the globe surface tracks the pointer at any zoom.
/// A globe with no radius is left as is.
pub fn apply_drag(state: &ProjectionState, dx: f64, dy: f64, sensitivity: f64) -> ProjectionState {
    if !(state.scale > 0.0) {
        return *state;
    }
    let k = sensitivity / state.scale;
    ProjectionState {
        rotation: Rotation::new(
            wrap_longitude(state.rotation.lambda + dx * k),
            state.rotation.phi - dy * k,
        ),
        ..*state
    }
}

/// Sets the scale to `initial_scale * max(zoom_factor, min_zoom_factor)`.
/// Factors below the floor (including zero, negative and NaN) are clamped.
pub fn apply_zoom(
    state: &ProjectionState,
    zoom_factor: f64,
    initial_scale: f64,
    min_zoom_factor: f64,
) -> ProjectionState {
    let effective = zoom_factor.max(min_zoom_factor);
    ProjectionState {
        scale: initial_scale * effective,
        ..*state
    }
}

/// One auto-rotation step: longitude decreases by `step_sensitivity / scale`.
pub fn apply_auto_rotate_step(state: &ProjectionState, step_sensitivity: f64) -> ProjectionState {
    if !(state.scale > 0.0) {
        return *state;
    }
    let step = step_sensitivity / state.scale;
    ProjectionState {
        rotation: Rotation::new(
            wrap_longitude(state.rotation.lambda - step),
            state.rotation.phi,
        ),
        ..*state
    }
}

/// Recomputes scale and center for a new surface size. Rotation is kept.
pub fn apply_resize(
    state: &ProjectionState,
    width: f64,
    height: f64,
    radius_policy: &RadiusPolicy,
) -> ProjectionState {
    ProjectionState {
        rotation: state.rotation,
        scale: radius_policy.radius(height),
        translate: ScreenPoint::new(width / 2.0, height / 2.0),
    }
}

/// Owns the projection state and the parameters of every update rule.
#[derive(Debug, Clone)]
pub struct ViewController {
    state: ProjectionState,
    /// Scale at zoom factor 1; reset by every resize
    initial_scale: f64,
    zoom_factor: f64,
    rotation_sensitivity: f64,
    auto_rotate_step: f64,
    min_zoom_factor: f64,
    radius_policy: RadiusPolicy,
}

impl ViewController {
    pub fn new(config: &GlobeConfig, width: f64, height: f64) -> Self {
        let state = config.initial_state(width, height);
        Self {
            state,
            initial_scale: state.scale,
            zoom_factor: 1.0,
            rotation_sensitivity: config.rotation_sensitivity,
            auto_rotate_step: config.auto_rotate_step,
            min_zoom_factor: config.min_zoom_factor,
            radius_policy: config.radius_policy,
        }
    }

    pub fn state(&self) -> &ProjectionState {
        &self.state
    }

    pub fn initial_scale(&self) -> f64 {
        self.initial_scale
    }

    /// The zoom factor currently in effect, after clamping.
    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    pub fn min_zoom_factor(&self) -> f64 {
        self.min_zoom_factor
    }

    pub fn drag(&mut self, event: DragEvent) -> &ProjectionState {
        self.state = apply_drag(&self.state, event.dx, event.dy, self.rotation_sensitivity);
        &self.state
    }

    pub fn zoom(&mut self, event: ZoomEvent) -> &ProjectionState {
        self.state = apply_zoom(
            &self.state,
            event.factor,
            self.initial_scale,
            self.min_zoom_factor,
        );
        self.zoom_factor = event.factor.max(self.min_zoom_factor);
        &self.state
    }

    pub fn auto_rotate_step(&mut self) -> &ProjectionState {
        self.state = apply_auto_rotate_step(&self.state, self.auto_rotate_step);
        &self.state
    }

    /// Resizing starts a fresh zoom baseline at the policy's radius.
    /// Sizes without area (a minimized window) are ignored.
    pub fn resize(&mut self, event: ResizeEvent) -> &ProjectionState {
        if !event.has_area() {
            log::warn!(
                "Ignoring resize to {}x{}, keeping scale {}",
                event.width,
                event.height,
                self.state.scale
            );
            return &self.state;
        }
        self.state = apply_resize(&self.state, event.width, event.height, &self.radius_policy);
        self.initial_scale = self.state.scale;
        self.zoom_factor = 1.0;
        log::debug!(
            "Resized to {}x{}: scale={}, center=({}, {})",
            event.width,
            event.height,
            self.state.scale,
            self.state.translate.x,
            self.state.translate.y
        );
        &self.state
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.state.rotation = rotation.wrapped();
    }
}
