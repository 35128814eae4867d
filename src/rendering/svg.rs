//! Vector surface that serializes every draw call into an SVG document.

use crate::{
    core::geo::ScreenPoint,
    rendering::context::{Color, DrawingSurface, PathStyle},
    Result,
};
use std::fmt::Write;

#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    elements: Vec<String>,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Complete `<svg>` document with the current elements in draw order.
    pub fn to_document(&self) -> String {
        let mut doc = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        for element in &self.elements {
            doc.push_str(element);
        }
        doc.push_str("</svg>");
        doc
    }
}

/// Path data (`d` attribute) for a polyline.
pub fn path_data(points: &[ScreenPoint], closed: bool) -> String {
    let mut d = String::with_capacity(points.len() * 16);
    for (i, p) in points.iter().enumerate() {
        let command = if i == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{}{:.2},{:.2}", command, p.x, p.y);
    }
    if closed && !points.is_empty() {
        d.push('Z');
    }
    d
}

fn paint(color: Option<Color>) -> String {
    match color {
        Some(c) if !c.is_transparent() => c.to_hex(),
        _ => "none".to_string(),
    }
}

impl DrawingSurface for SvgSurface {
    fn clear(&mut self) -> Result<()> {
        self.elements.clear();
        Ok(())
    }

    fn draw_path(&mut self, points: &[ScreenPoint], closed: bool, style: &PathStyle) -> Result<()> {
        if points.len() < 2 {
            return Ok(());
        }
        let fill = if closed { style.fill } else { None };
        self.elements.push(format!(
            r#"<path d="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
            path_data(points, closed),
            paint(fill),
            paint(style.stroke),
            style.stroke_width
        ));
        Ok(())
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Color) -> Result<()> {
        self.elements.push(format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}"/>"#,
            center.x,
            center.y,
            radius,
            paint(Some(color))
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_data() {
        let points = [
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(10.0, 0.5),
            ScreenPoint::new(10.0, 10.0),
        ];
        assert_eq!(path_data(&points, false), "M0.00,0.00L10.00,0.50L10.00,10.00");
        assert_eq!(path_data(&points, true), "M0.00,0.00L10.00,0.50L10.00,10.00Z");
    }

    #[test]
    fn test_open_paths_are_not_filled() {
        let mut svg = SvgSurface::new(100.0, 100.0);
        let style = PathStyle::filled(Color::WHITE, Color::BLACK, 0.3);
        let points = [ScreenPoint::new(0.0, 0.0), ScreenPoint::new(5.0, 5.0)];

        svg.draw_path(&points, false, &style).unwrap();
        svg.draw_path(&points, true, &style).unwrap();
        let doc = svg.to_document();

        assert!(doc.contains(r##"fill="none" stroke="#000000""##));
        assert!(doc.contains(r##"fill="#ffffff""##));
    }

    #[test]
    fn test_clear_empties_document() {
        let mut svg = SvgSurface::new(960.0, 500.0);
        svg.fill_circle(ScreenPoint::new(1.0, 2.0), 0.6, Color::rgb(0x85, 1, 1))
            .unwrap();
        let circle = r##"<circle cx="1.00" cy="2.00" r="0.6" fill="#850101"/>"##;
        assert!(svg.to_document().contains(circle));

        svg.clear().unwrap();
        assert_eq!(svg.element_count(), 0);
        assert!(svg.to_document().ends_with(r#"viewBox="0 0 960 500"></svg>"#));
    }
}
