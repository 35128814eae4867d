//! Browser entry point.
//!
//! `WasmGlobe` wraps a [`Globe`] for JavaScript hosts: the page forwards
//! pointer and wheel events, calls `frame(timestamp)` from
//! `requestAnimationFrame`, and the globe paints onto one or two canvases.

use crate::{
    core::{config::GlobeConfig, geo::ScreenPoint, globe::Globe},
    input::events::InputEvent,
    rendering::canvas::CanvasSurface,
    GlobeError,
};
use instant::Instant;
use wasm_bindgen::prelude::*;

// Import console.log for debugging
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

fn to_js(err: GlobeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Main WASM entry point
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub struct WasmGlobe {
    inner: Globe,
    base: CanvasSurface,
    overlay: Option<CanvasSurface>,
}

#[wasm_bindgen]
impl WasmGlobe {
    /// Builds a globe from the two JSON documents and the id of the canvas
    /// to draw on. `overlay_id`, when given, names a second canvas stacked
    /// above the first that receives the markers.
    #[wasm_bindgen(constructor)]
    pub fn new(
        countries_geojson: &str,
        markers_json: &str,
        canvas_id: &str,
        overlay_id: Option<String>,
        config_json: Option<String>,
    ) -> Result<WasmGlobe, JsValue> {
        let config = match config_json {
            Some(json) => GlobeConfig::from_json(&json).map_err(to_js)?,
            None => GlobeConfig::default(),
        };
        let base = CanvasSurface::from_element_id(canvas_id).map_err(to_js)?;
        let overlay = overlay_id
            .map(|id| CanvasSurface::from_element_id(&id))
            .transpose()
            .map_err(to_js)?;

        let (width, height) = base.size();
        let inner = Globe::from_json(config, countries_geojson, markers_json, width, height)
            .map_err(to_js)?;
        console_log!(
            "Globe ready: {} countries, {} markers",
            inner.countries().len(),
            inner.markers().len()
        );

        Ok(WasmGlobe {
            inner,
            base,
            overlay,
        })
    }

    pub fn drag_start(&mut self, x: f64, y: f64) {
        self.inner.handle_input(InputEvent::DragStart {
            position: ScreenPoint::new(x, y),
        });
    }

    pub fn drag(&mut self, dx: f64, dy: f64) -> Result<(), JsValue> {
        if self.inner.handle_input(InputEvent::drag(dx, dy)) {
            self.render()?;
        }
        Ok(())
    }

    pub fn drag_end(&mut self) {
        self.inner.handle_input(InputEvent::DragEnd);
    }

    pub fn wheel(&mut self, delta: f64) -> Result<(), JsValue> {
        if self.inner.handle_input(InputEvent::Wheel { delta }) {
            self.render()?;
        }
        Ok(())
    }

    pub fn zoom(&mut self, factor: f64) -> Result<(), JsValue> {
        if self.inner.handle_input(InputEvent::zoom(factor)) {
            self.render()?;
        }
        Ok(())
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.base.resize(width, height);
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.resize(width, height);
        }
        self.inner.handle_input(InputEvent::resize(width, height));
        self.render()
    }

    /// Hover lookup. Returns the hovered country label as a JSON string, or
    /// `undefined` when nothing is under the pointer.
    pub fn hover(&mut self, x: f64, y: f64) -> Result<Option<String>, JsValue> {
        let before = self.inner.hovered_country().map(|c| c.name.clone());
        let label = self.inner.hover(ScreenPoint::new(x, y));
        if before != label.as_ref().map(|l| l.name.clone()) {
            self.render()?;
        }
        label
            .map(|l| serde_json::to_string(&l).map_err(|e| to_js(e.into())))
            .transpose()
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.inner.set_auto_rotate(enabled);
    }

    /// Animation-frame callback. Advances auto-rotation and redraws when
    /// the view changed.
    pub fn frame(&mut self) -> Result<bool, JsValue> {
        let redraw = self.inner.advance(Instant::now());
        if redraw {
            self.render()?;
        }
        Ok(redraw)
    }

    /// Forces one auto-rotation step regardless of the cadence.
    pub fn tick(&mut self) -> Result<bool, JsValue> {
        let redraw = self.inner.tick();
        if redraw {
            self.render()?;
        }
        Ok(redraw)
    }

    pub fn render(&mut self) -> Result<(), JsValue> {
        let stats = match self.overlay.as_mut() {
            Some(overlay) => self.inner.render_split(&mut self.base, overlay),
            None => self.inner.render(&mut self.base),
        }
        .map_err(to_js)?;
        log::trace!("frame: {:?}", stats);
        Ok(())
    }

    pub fn rotation_lambda(&self) -> f64 {
        self.inner.state().rotation.lambda
    }

    pub fn rotation_phi(&self) -> f64 {
        self.inner.state().rotation.phi
    }

    pub fn scale(&self) -> f64 {
        self.inner.state().scale
    }

    pub fn shutdown(&mut self) {
        self.inner.shutdown();
    }
}
