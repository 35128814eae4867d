//! The globe: owns the view controller, the input queue, the auto-rotation
//! timer and the layers, and runs the render-loop state machine.
//!
//! Everything happens on the caller's thread. Input callbacks queue events
//! through an [`EventSender`] (or call [`Globe::handle_input`] directly), the
//! frame callback calls [`Globe::pump`] and [`Globe::advance`], and redraws
//! with [`Globe::render`] or [`Globe::render_split`] when either reports a
//! change.

use crate::{
    animation::timer::AutoRotateTimer,
    core::{
        config::GlobeConfig,
        controller::ViewController,
        geo::ScreenPoint,
        projection::{ProjectionState, Rotation},
    },
    data::geojson::{CountryFeature, CountryLabel, MarkerPoint},
    input::{
        events::{GlobeEvent, InputEvent, TickEvent},
        handler::{EventSender, InputHandler},
    },
    layers::{
        base::{LayerTrait, RenderTarget},
        country::CountryLayer,
        marker::MarkerLayer,
        sphere::SphereLayer,
    },
    rendering::context::{DrawingSurface, FrameStats},
    spatial::culling::{visible_markers, VisibleMarkers},
    GlobeError, Result,
};
use instant::Instant;

/// Render-loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Redraw only on input
    Idle,
    /// Ticking at the configured cadence, one rotation step per tick
    AutoRotating,
}

pub struct Globe {
    config: GlobeConfig,
    controller: ViewController,
    input: InputHandler,
    timer: AutoRotateTimer,
    loop_state: LoopState,
    auto_rotate: bool,
    shut_down: bool,
    sphere: SphereLayer,
    countries: CountryLayer,
    markers: MarkerLayer,
    events: Vec<GlobeEvent>,
    size: (f64, f64),
}

impl Globe {
    pub fn new(
        config: GlobeConfig,
        countries: Vec<CountryFeature>,
        markers: Vec<MarkerPoint>,
        width: f64,
        height: f64,
    ) -> Self {
        let mut timer = AutoRotateTimer::new(config.tick_interval());
        let loop_state = if config.auto_rotate {
            timer.start(Instant::now());
            LoopState::AutoRotating
        } else {
            LoopState::Idle
        };

        log::debug!(
            "Globe created: {} countries, {} markers, {}x{}, {:?}",
            countries.len(),
            markers.len(),
            width,
            height,
            loop_state
        );

        Self {
            controller: ViewController::new(&config, width, height),
            input: InputHandler::new(config.min_zoom_factor, config.wheel_zoom_speed),
            timer,
            loop_state,
            auto_rotate: config.auto_rotate,
            shut_down: false,
            sphere: SphereLayer::new(&config.style),
            countries: CountryLayer::new(countries, &config.style),
            markers: MarkerLayer::new(markers, &config.style),
            events: Vec::new(),
            size: (width, height),
            config,
        }
    }

    /// Decodes both JSON inputs and builds a globe from them.
    pub fn from_json(
        config: GlobeConfig,
        countries_geojson: &str,
        markers_json: &str,
        width: f64,
        height: f64,
    ) -> Result<Self> {
        let countries = crate::data::geojson::decode_countries(countries_geojson)?;
        let markers = crate::data::geojson::decode_markers(markers_json)?;
        Ok(Self::new(config, countries, markers, width, height))
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn state(&self) -> &ProjectionState {
        self.controller.state()
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    pub fn is_auto_rotating(&self) -> bool {
        self.loop_state == LoopState::AutoRotating
    }

    pub fn size(&self) -> (f64, f64) {
        self.size
    }

    pub fn zoom_factor(&self) -> f64 {
        self.controller.zoom_factor()
    }

    pub fn countries(&self) -> &[CountryFeature] {
        self.countries.countries()
    }

    pub fn markers(&self) -> &[MarkerPoint] {
        self.markers.markers()
    }

    /// Markers on the near hemisphere with their screen positions.
    pub fn visible_markers(&self) -> VisibleMarkers<'_> {
        visible_markers(self.markers.markers(), self.controller.state())
    }

    pub fn hovered_country(&self) -> Option<&CountryFeature> {
        self.countries
            .hovered()
            .and_then(|index| self.countries.get(index))
    }

    /// Cloneable handle for queueing input from gesture callbacks.
    pub fn sender(&self) -> EventSender {
        self.input.sender()
    }

    /// Applies every queued input event in order. Returns whether a redraw
    /// is needed.
    pub fn pump(&mut self) -> bool {
        let mut redraw = false;
        for event in self.input.drain() {
            redraw |= self.handle_input(event);
        }
        redraw
    }

    /// Applies one input event. Returns whether a redraw is needed.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        let Some(event) = self.input.normalize(event) else {
            return false;
        };

        match event {
            InputEvent::DragStart { .. } => {
                self.suspend_auto_rotate();
                false
            }
            InputEvent::Drag(drag) => {
                self.controller.drag(drag);
                self.emit_view_changed();
                true
            }
            InputEvent::DragEnd => {
                if self.auto_rotate {
                    self.resume_auto_rotate(Instant::now(), true);
                }
                false
            }
            InputEvent::Zoom(zoom) => {
                self.controller.zoom(zoom);
                self.emit_view_changed();
                true
            }
            InputEvent::Resize(resize) => {
                self.controller.resize(resize);
                self.size = (resize.width, resize.height);
                self.events.push(GlobeEvent::Resized {
                    width: resize.width,
                    height: resize.height,
                });
                self.emit_view_changed();
                true
            }
            InputEvent::PointerMove { position } => {
                let before = self.countries.hovered();
                self.hover(position);
                before != self.countries.hovered()
            }
            InputEvent::PointerLeave => self.clear_hover(),
            // Wheel deltas leave the input handler as absolute zooms
            InputEvent::Wheel { .. } => false,
        }
    }

    /// Forces one auto-rotation step if auto-rotating, ignoring the cadence.
    pub fn tick(&mut self) -> bool {
        if self.loop_state != LoopState::AutoRotating {
            return false;
        }
        match self.timer.step() {
            Some(tick) => self.on_tick(tick),
            None => false,
        }
    }

    /// Steps auto-rotation if a tick is due at `now`. Returns whether a
    /// redraw is needed.
    pub fn advance(&mut self, now: Instant) -> bool {
        if self.loop_state != LoopState::AutoRotating {
            return false;
        }
        match self.timer.poll(now) {
            Some(tick) => self.on_tick(tick),
            None => false,
        }
    }

    fn on_tick(&mut self, tick: TickEvent) -> bool {
        log::trace!("Auto-rotate tick {:?}", tick);
        self.controller.auto_rotate_step();
        self.emit_view_changed();
        true
    }

    /// Enables or disables auto-rotation. While a drag is in progress the
    /// change takes effect when the drag ends.
    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.auto_rotate = enabled;
        if enabled {
            if !self.input.is_dragging() {
                self.resume_auto_rotate(Instant::now(), false);
            }
        } else {
            self.suspend_auto_rotate();
        }
    }

    fn suspend_auto_rotate(&mut self) {
        self.timer.stop();
        if self.loop_state == LoopState::AutoRotating {
            self.loop_state = LoopState::Idle;
            self.events.push(GlobeEvent::AutoRotateSuspended);
            log::debug!("Auto-rotation suspended");
        }
    }

    /// `restart` replaces any live schedule; otherwise an already running
    /// timer is left alone.
    fn resume_auto_rotate(&mut self, now: Instant, restart: bool) {
        if self.shut_down {
            return;
        }
        if restart {
            self.timer.restart(now);
        } else {
            self.timer.start(now);
        }
        if self.loop_state != LoopState::AutoRotating {
            self.loop_state = LoopState::AutoRotating;
            self.events.push(GlobeEvent::AutoRotateResumed);
            log::debug!("Auto-rotation resumed");
        }
    }

    /// Resolves the country under a screen point and marks it hovered.
    ///
    /// Points off the globe disc, or over the ocean, clear the hover.
    pub fn hover(&mut self, point: ScreenPoint) -> Option<CountryLabel> {
        let index = self
            .controller
            .state()
            .unproject(point)
            .and_then(|coord| self.countries.hit_test(coord));

        if self.countries.set_hovered(index) {
            self.events.push(GlobeEvent::HoverChanged {
                country: self.hovered_country().map(|c| c.name.clone()),
            });
        }
        self.hovered_country()
            .map(|c| c.label(&self.config.style.flag_path))
    }

    /// Returns whether anything was hovered.
    pub fn clear_hover(&mut self) -> bool {
        let changed = self.countries.set_hovered(None);
        if changed {
            self.events
                .push(GlobeEvent::HoverChanged { country: None });
        }
        changed
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.controller.set_rotation(rotation);
        self.emit_view_changed();
    }

    /// Takes the events emitted since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<GlobeEvent> {
        std::mem::take(&mut self.events)
    }

    /// Stops the loop for good. Later ticks and drag ends do nothing.
    pub fn shutdown(&mut self) {
        self.timer.stop();
        self.shut_down = true;
        self.loop_state = LoopState::Idle;
        log::debug!("Globe shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Looks up a layer by id.
    pub fn layer_mut(&mut self, id: &str) -> Result<&mut dyn LayerTrait> {
        self.layers_mut()
            .into_iter()
            .find(|layer| layer.id() == id)
            .ok_or_else(|| GlobeError::Layer(format!("no layer '{}'", id)))
    }

    fn layers_mut(&mut self) -> Vec<&mut dyn LayerTrait> {
        let mut layers = vec![
            &mut self.sphere as &mut dyn LayerTrait,
            &mut self.countries,
            &mut self.markers,
        ];
        layers.sort_by_key(|layer| layer.z_index());
        layers
    }

    /// Clears `surface` and draws every layer on it, bottom to top.
    pub fn render(&mut self, surface: &mut dyn DrawingSurface) -> Result<FrameStats> {
        let state = *self.controller.state();
        surface.clear()?;

        let mut stats = FrameStats::default();
        for layer in self.layers_mut() {
            if layer.is_visible() {
                stats += layer.render(surface, &state)?;
            }
        }
        log::trace!("Rendered frame: {:?}", stats);
        Ok(stats)
    }

    /// Draws sphere and countries on `base` and markers on `overlay`. Both
    /// surfaces are cleared first, so the overlay is fully repainted.
    pub fn render_split(
        &mut self,
        base: &mut dyn DrawingSurface,
        overlay: &mut dyn DrawingSurface,
    ) -> Result<FrameStats> {
        let state = *self.controller.state();
        base.clear()?;
        overlay.clear()?;

        let mut stats = FrameStats::default();
        for layer in self.layers_mut() {
            if !layer.is_visible() {
                continue;
            }
            let surface: &mut dyn DrawingSurface = match layer.target() {
                RenderTarget::Base => &mut *base,
                RenderTarget::Overlay => &mut *overlay,
            };
            stats += layer.render(surface, &state)?;
        }
        log::trace!("Rendered split frame: {:?}", stats);
        Ok(stats)
    }

    fn emit_view_changed(&mut self) {
        let state = self.controller.state();
        self.events.push(GlobeEvent::ViewChanged {
            rotation: state.rotation,
            scale: state.scale,
        });
    }
}
