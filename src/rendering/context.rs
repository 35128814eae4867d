use crate::{core::geo::ScreenPoint, GlobeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA color, serialized as a CSS hex string (`#rrggbb` or `#rrggbbaa`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Scales the alpha channel by `opacity` in `[0, 1]`.
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa`, or one of a few CSS keywords.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "black" => return Ok(Self::BLACK),
            "white" => return Ok(Self::WHITE),
            "transparent" | "none" => return Ok(Self::TRANSPARENT),
            _ => {}
        }

        let invalid = || GlobeError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| invalid())
        };

        match hex.len() {
            3 => Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(invalid()),
        }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// CSS color usable as a canvas fill or stroke style.
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            self.to_hex()
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f32 / 255.0
            )
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = GlobeError;

    fn try_from(value: String) -> Result<Self> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[cfg(feature = "egui")]
impl From<Color> for egui::Color32 {
    fn from(color: Color) -> Self {
        egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
    }
}

/// Fill and stroke for a path. `None` skips that part.
#[derive(Debug, Clone, PartialEq)]
pub struct PathStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
}

impl PathStyle {
    pub fn filled(fill: Color, stroke: Color, stroke_width: f64) -> Self {
        Self {
            fill: Some(fill),
            stroke: Some(stroke),
            stroke_width,
        }
    }

    pub fn stroked(stroke: Color, stroke_width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(stroke),
            stroke_width,
        }
    }

    pub fn with_opacity(&self, opacity: f32) -> Self {
        Self {
            fill: self.fill.map(|c| c.with_opacity(opacity)),
            stroke: self.stroke.map(|c| c.with_opacity(opacity)),
            stroke_width: self.stroke_width,
        }
    }
}

/// A 2-D target the globe layers draw into.
///
/// Implemented by the recording [`RenderContext`], the SVG writer and, behind
/// their features, the browser canvas and egui painters.
pub trait DrawingSurface {
    /// Erases everything drawn since the last clear.
    fn clear(&mut self) -> Result<()>;

    /// Draws a polyline, closing it back to the first point when `closed`.
    /// Only closed paths are filled.
    fn draw_path(&mut self, points: &[ScreenPoint], closed: bool, style: &PathStyle) -> Result<()>;

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Color) -> Result<()>;
}

/// Commands that can be issued to the render context
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Path {
        points: Vec<ScreenPoint>,
        closed: bool,
        style: PathStyle,
    },
    Circle {
        center: ScreenPoint,
        radius: f64,
        color: Color,
    },
}

/// Surface that records draw commands instead of rasterizing them.
///
/// Used by headless hosts and tests; a `clear` drops the queued commands.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub width: u32,
    pub height: u32,
    pub drawing_queue: Vec<DrawCommand>,
    clears: usize,
}

impl RenderContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            drawing_queue: Vec::new(),
            clears: 0,
        }
    }

    pub fn get_drawing_queue(&self) -> &[DrawCommand] {
        &self.drawing_queue
    }

    /// Number of times the surface has been cleared
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    pub fn paths(&self) -> impl Iterator<Item = (&[ScreenPoint], bool, &PathStyle)> + '_ {
        self.drawing_queue.iter().filter_map(|cmd| match cmd {
            DrawCommand::Path {
                points,
                closed,
                style,
            } => Some((points.as_slice(), *closed, style)),
            _ => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = (ScreenPoint, f64, Color)> + '_ {
        self.drawing_queue.iter().filter_map(|cmd| match cmd {
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => Some((*center, *radius, *color)),
            _ => None,
        })
    }
}

impl DrawingSurface for RenderContext {
    fn clear(&mut self) -> Result<()> {
        self.drawing_queue.clear();
        self.drawing_queue.push(DrawCommand::Clear);
        self.clears += 1;
        Ok(())
    }

    fn draw_path(&mut self, points: &[ScreenPoint], closed: bool, style: &PathStyle) -> Result<()> {
        if points.len() < 2 {
            return Ok(());
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(GlobeError::Render("non-finite path vertex".to_string()));
        }
        self.drawing_queue.push(DrawCommand::Path {
            points: points.to_vec(),
            closed,
            style: style.clone(),
        });
        Ok(())
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Color) -> Result<()> {
        self.drawing_queue.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
        Ok(())
    }
}

/// Counters for one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    pub paths_drawn: usize,
    pub markers_visible: usize,
    pub markers_culled: usize,
}

impl std::ops::AddAssign for FrameStats {
    fn add_assign(&mut self, other: Self) {
        self.paths_drawn += other.paths_drawn;
        self.markers_visible += other.markers_visible;
        self.markers_culled += other.markers_culled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parsing() {
        assert_eq!(Color::parse("#eeeeee").unwrap(), Color::rgb(0xee, 0xee, 0xee));
        assert_eq!(Color::parse("#000075").unwrap(), Color::rgb(0, 0, 0x75));
        assert_eq!(Color::parse("#fff").unwrap(), Color::WHITE);
        assert_eq!(Color::parse("#ff000080").unwrap(), Color::new(255, 0, 0, 128));
        assert_eq!(Color::parse("Black").unwrap(), Color::BLACK);

        for bad in ["", "#", "#12345", "eeeeee", "#gggggg", "blue-ish", "#ééé"] {
            assert!(
                matches!(Color::parse(bad), Err(GlobeError::InvalidColor(_))),
                "{:?} should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_color_css() {
        assert_eq!(Color::rgb(0x85, 0x01, 0x01).to_hex(), "#850101");
        assert_eq!(Color::new(0, 0, 0, 0).to_css(), "rgba(0, 0, 0, 0.000)");
        assert_eq!(Color::WHITE.to_string(), "#ffffff");
    }

    #[test]
    fn test_color_serde_uses_hex() {
        let json = serde_json::to_string(&Color::rgb(0xf2, 0xf2, 0xf2)).unwrap();
        assert_eq!(json, "\"#f2f2f2\"");
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }

    #[test]
    fn test_with_opacity() {
        assert_eq!(Color::WHITE.with_opacity(0.5).a, 128);
        assert_eq!(Color::WHITE.with_opacity(2.0).a, 255);
        let style = PathStyle::filled(Color::WHITE, Color::BLACK, 0.3).with_opacity(0.0);
        assert!(style.fill.unwrap().is_transparent());
    }

    #[test]
    fn test_render_context_records_and_clears() {
        let mut context = RenderContext::new(100, 100);
        let style = PathStyle::stroked(Color::BLACK, 1.0);
        let line = [ScreenPoint::new(0.0, 0.0), ScreenPoint::new(10.0, 10.0)];

        context.draw_path(&line, false, &style).unwrap();
        context.draw_path(&line[..1], false, &style).unwrap();
        context
            .fill_circle(ScreenPoint::new(5.0, 5.0), 1.0, Color::BLACK)
            .unwrap();
        assert_eq!(context.paths().count(), 1);
        assert_eq!(context.circles().count(), 1);

        context.clear().unwrap();
        assert_eq!(context.get_drawing_queue(), &[DrawCommand::Clear]);
        assert_eq!(context.clear_count(), 1);
    }

    #[test]
    fn test_non_finite_path_is_rejected() {
        let mut context = RenderContext::new(100, 100);
        let result = context.draw_path(
            &[ScreenPoint::new(0.0, 0.0), ScreenPoint::new(f64::NAN, 1.0)],
            false,
            &PathStyle::stroked(Color::BLACK, 1.0),
        );
        assert!(matches!(result, Err(GlobeError::Render(_))));
    }
}
