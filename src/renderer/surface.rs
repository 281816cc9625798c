//! Drawing surface capability
//!
//! The scene pass only issues these primitives. The browser backend maps them
//! onto a Canvas2D context; tests record them.

use glam::Vec2;

use crate::Color;
use crate::sim::Rect;

/// A 2D target accepting filled primitives
pub trait Surface {
    /// Fill the whole surface with `color`
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// Closed polygon through `points`
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    /// Text horizontally centered on `pos.x`, baseline at `pos.y`
    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: f32, color: Color);
    /// Opacity applied to subsequent primitives (0.0 - 1.0)
    fn set_global_alpha(&mut self, alpha: f32);
}

/// A recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Color),
    Rect(Rect, Color),
    Circle(Vec2, f32, Color),
    Polygon(Vec<Vec2>, Color),
    Text(String, Vec2, f32, Color),
    Alpha(f32),
}

/// Records calls per frame. Used headless and in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls issued since the most recent clear
    pub fn last_frame(&self) -> &[DrawCall] {
        let start = self
            .calls
            .iter()
            .rposition(|c| matches!(c, DrawCall::Clear(_)))
            .unwrap_or(0);
        &self.calls[start..]
    }

    /// All text drawn in the most recent frame
    pub fn last_frame_text(&self) -> Vec<&str> {
        self.last_frame()
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text(text, ..) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        // Keep memory bounded across long headless runs
        self.calls.clear();
        self.calls.push(DrawCall::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::Rect(rect, color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.calls.push(DrawCall::Circle(center, radius, color));
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.calls.push(DrawCall::Polygon(points.to_vec(), color));
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: f32, color: Color) {
        self.calls
            .push(DrawCall::Text(text.to_string(), pos, size_px, color));
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.calls.push(DrawCall::Alpha(alpha));
    }
}
