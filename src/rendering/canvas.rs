//! Browser 2-D canvas surface.

use crate::{
    core::geo::ScreenPoint,
    rendering::context::{Color, DrawingSurface, PathStyle},
    GlobeError, Result,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

fn js_error(err: JsValue) -> GlobeError {
    GlobeError::Render(format!("{:?}", err))
}

pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    pub fn new(context: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self {
            context,
            width,
            height,
        }
    }

    /// Wraps the 2-D context of `canvas`, sized to the element.
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self> {
        let context = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or_else(|| GlobeError::Render("canvas has no 2d context".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GlobeError::Render("unexpected canvas context type".to_string()))?;
        Ok(Self::new(
            context,
            canvas.width() as f64,
            canvas.height() as f64,
        ))
    }

    /// Looks up a `<canvas>` element by id in the current document.
    pub fn from_element_id(id: &str) -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| GlobeError::Render("no document".to_string()))?;
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| GlobeError::Render(format!("no element #{}", id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| GlobeError::Render(format!("#{} is not a canvas", id)))?;
        Self::from_canvas(&canvas)
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn trace(&self, points: &[ScreenPoint], closed: bool) {
        self.context.begin_path();
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                self.context.move_to(p.x, p.y);
            } else {
                self.context.line_to(p.x, p.y);
            }
        }
        if closed {
            self.context.close_path();
        }
    }
}

impl DrawingSurface for CanvasSurface {
    fn clear(&mut self) -> Result<()> {
        self.context.clear_rect(0.0, 0.0, self.width, self.height);
        Ok(())
    }

    fn draw_path(&mut self, points: &[ScreenPoint], closed: bool, style: &PathStyle) -> Result<()> {
        if points.len() < 2 {
            return Ok(());
        }
        self.trace(points, closed);
        if let (true, Some(fill)) = (closed, style.fill) {
            self.context.set_fill_style(&JsValue::from_str(&fill.to_css()));
            self.context.fill();
        }
        if let Some(stroke) = style.stroke {
            self.context
                .set_stroke_style(&JsValue::from_str(&stroke.to_css()));
            self.context.set_line_width(style.stroke_width);
            self.context.stroke();
        }
        Ok(())
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Color) -> Result<()> {
        self.context.begin_path();
        self.context
            .arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU)
            .map_err(js_error)?;
        self.context.set_fill_style(&JsValue::from_str(&color.to_css()));
        self.context.fill();
        Ok(())
    }
}
