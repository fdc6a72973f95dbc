//! Canvas abstraction the renderer draws on.
//!
//! Every coordinate handed to a [`DeviceContext`] is already in device space
//! (y axis pointing down). Conversion from logical units happens in the
//! renderer's viewport at the point of drawing.

mod recorder;
mod svg;

pub use recorder::{Primitive, RecordingDevice};
pub use svg::SvgDevice;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    /// CSS hex notation, e.g. `#ff0000`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PenStyle {
    #[default]
    Solid,
    Dot,
    Transparent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BrushStyle {
    #[default]
    Solid,
    Transparent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExtent {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pen {
    pub(crate) color: Color,
    pub(crate) width: i32,
    pub(crate) style: PenStyle,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1,
            style: PenStyle::Solid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Brush {
    pub(crate) color: Color,
    pub(crate) style: BrushStyle,
}

/// Pen and brush stacks shared by the device implementations.
///
/// `set_*` pushes, `reset_*` pops back to the previous state.
#[derive(Debug, Default)]
pub(crate) struct PaintState {
    pens: Vec<Pen>,
    brushes: Vec<Brush>,
}

impl PaintState {
    pub(crate) fn pen(&self) -> Pen {
        self.pens.last().copied().unwrap_or_default()
    }

    pub(crate) fn brush(&self) -> Brush {
        self.brushes.last().copied().unwrap_or_default()
    }

    pub(crate) fn push_pen(&mut self, pen: Pen) {
        self.pens.push(pen);
    }

    pub(crate) fn pop_pen(&mut self) {
        self.pens.pop();
    }

    pub(crate) fn push_brush(&mut self, brush: Brush) {
        self.brushes.push(brush);
    }

    pub(crate) fn pop_brush(&mut self) {
        self.brushes.pop();
    }
}

/// The drawing surface. Lines, circles and arcs stroke with the current pen;
/// rectangles, glyphs, text and bezier fills use the current brush.
pub trait DeviceContext {
    /// Open a named group for the primitives of one element.
    fn start_graphic(&mut self, kind: &str, id: &str);
    fn end_graphic(&mut self, kind: &str, id: &str);

    fn set_pen(&mut self, color: Color, width: i32, style: PenStyle);
    fn reset_pen(&mut self);
    fn set_brush(&mut self, color: Color, style: BrushStyle);
    fn reset_brush(&mut self);

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);
    fn draw_circle(&mut self, x: i32, y: i32, radius: i32);
    /// Arc of the ellipse inscribed in the box at (x, y), angles in degrees,
    /// counter-clockwise from 3 o'clock.
    fn draw_elliptic_arc(&mut self, x: i32, y: i32, width: i32, height: i32, start: f64, end: f64);
    fn draw_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32);
    /// Stamp a music font glyph by code point.
    fn draw_music_glyph(&mut self, code: u32, x: i32, y: i32, size: i32);
    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: i32);
    fn text_extent(&self, text: &str, size: i32) -> TextExtent;
    /// Filled shape bounded by two cubic curves sharing their end points.
    fn draw_bezier_path(&mut self, top: [Point; 4], bottom: [Point; 4]);
}

/// Text extent estimate for devices without font access.
pub(crate) fn estimate_text_extent(text: &str, size: i32) -> TextExtent {
    let chars = text.chars().count() as i32;
    TextExtent {
        width: chars * size * 3 / 5,
        height: size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_state_restores_previous_pen() {
        let mut state = PaintState::default();
        state.push_pen(Pen { color: Color::RED, width: 4, style: PenStyle::Solid });
        state.push_pen(Pen { color: Color::BLUE, width: 2, style: PenStyle::Solid });
        assert_eq!(state.pen().color, Color::BLUE);
        state.pop_pen();
        assert_eq!(state.pen().width, 4);
        state.pop_pen();
        assert_eq!(state.pen(), Pen::default());
    }

    #[test]
    fn color_hex() {
        assert_eq!(Color::RED.to_hex(), "#ff0000");
        assert_eq!(Color::rgb(1, 2, 171).to_hex(), "#0102ab");
    }
}
