//! egui painter surface.
//!
//! egui has no retained canvas to erase, so `clear` paints the background
//! color over the surface rect. Country outlines are generally concave, so
//! closed paths are triangulated before filling instead of going through
//! egui's convex-only path fill.

use crate::{
    core::geo::ScreenPoint,
    rendering::context::{Color, DrawingSurface, PathStyle},
    Result,
};
use egui::{epaint::Mesh, Color32, Painter, Pos2, Rect, Shape, Stroke};
use geo::TriangulateEarcut;
use geo_types::{Coord, LineString, Polygon};

pub struct PainterSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
    background: Option<Color>,
}

impl<'a> PainterSurface<'a> {
    /// Draws with screen coordinates relative to the top-left of `rect`.
    pub fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self {
            painter,
            rect,
            background: None,
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    fn pos(&self, p: ScreenPoint) -> Pos2 {
        Pos2::new(
            self.rect.min.x + p.x as f32,
            self.rect.min.y + p.y as f32,
        )
    }

    fn fill_polygon(&self, points: &[ScreenPoint], color: Color32) {
        let ring = LineString::new(points.iter().map(|p| Coord { x: p.x, y: p.y }).collect());
        let triangulation = Polygon::new(ring, vec![]).earcut_triangles_raw();

        let mut mesh = Mesh::default();
        for pair in triangulation.vertices.chunks_exact(2) {
            let vertex = self.pos(ScreenPoint::new(pair[0], pair[1]));
            mesh.colored_vertex(vertex, color);
        }
        for triangle in triangulation.triangle_indices.chunks_exact(3) {
            mesh.add_triangle(triangle[0] as u32, triangle[1] as u32, triangle[2] as u32);
        }
        self.painter.add(Shape::mesh(mesh));
    }
}

impl DrawingSurface for PainterSurface<'_> {
    fn clear(&mut self) -> Result<()> {
        if let Some(background) = self.background {
            self.painter.rect_filled(self.rect, 0.0, background);
        }
        Ok(())
    }

    fn draw_path(&mut self, points: &[ScreenPoint], closed: bool, style: &PathStyle) -> Result<()> {
        if points.len() < 2 {
            return Ok(());
        }
        if let (true, Some(fill)) = (closed, style.fill) {
            if points.len() >= 3 && !fill.is_transparent() {
                self.fill_polygon(points, fill.into());
            }
        }
        if let Some(stroke) = style.stroke {
            let stroke = Stroke::new(style.stroke_width as f32, stroke);
            let positions: Vec<Pos2> = points.iter().map(|p| self.pos(*p)).collect();
            let shape = if closed {
                Shape::closed_line(positions, stroke)
            } else {
                Shape::line(positions, stroke)
            };
            self.painter.add(shape);
        }
        Ok(())
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Color) -> Result<()> {
        self.painter
            .circle_filled(self.pos(center), radius as f32, color);
        Ok(())
    }
}
