//! Device that records primitives instead of painting them.

use serde::{Deserialize, Serialize};

use super::{estimate_text_extent, Brush, BrushStyle, Color, DeviceContext, PaintState, Pen, PenStyle, Point, TextExtent};

/// A drawn primitive with the colour it was painted in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Primitive {
    StartGraphic { kind: String, id: String },
    EndGraphic { kind: String, id: String },
    Line { x1: i32, y1: i32, x2: i32, y2: i32, width: i32, color: Color },
    Circle { x: i32, y: i32, radius: i32, filled: bool, color: Color },
    Arc { x: i32, y: i32, width: i32, height: i32, start: f64, end: f64, color: Color },
    Rectangle { x: i32, y: i32, width: i32, height: i32, color: Color },
    Glyph { code: u32, x: i32, y: i32, size: i32, color: Color },
    Text { text: String, x: i32, y: i32, size: i32, color: Color },
    Bezier { top: [Point; 4], bottom: [Point; 4], color: Color },
}

impl Primitive {
    pub fn color(&self) -> Option<Color> {
        match self {
            Primitive::StartGraphic { .. } | Primitive::EndGraphic { .. } => None,
            Primitive::Line { color, .. }
            | Primitive::Circle { color, .. }
            | Primitive::Arc { color, .. }
            | Primitive::Rectangle { color, .. }
            | Primitive::Glyph { color, .. }
            | Primitive::Text { color, .. }
            | Primitive::Bezier { color, .. } => Some(*color),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingDevice {
    primitives: Vec<Primitive>,
    paint: PaintState,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn into_primitives(self) -> Vec<Primitive> {
        self.primitives
    }

    /// Primitives recorded inside the group with the given kind and id,
    /// nested groups included.
    pub fn group(&self, kind: &str, id: &str) -> Vec<&Primitive> {
        let mut out = Vec::new();
        let mut depth = 0usize;
        for p in &self.primitives {
            match p {
                Primitive::StartGraphic { kind: k, id: i } if depth == 0 && k == kind && i == id => {
                    depth = 1;
                }
                Primitive::StartGraphic { .. } if depth > 0 => {
                    depth += 1;
                    out.push(p);
                }
                Primitive::EndGraphic { .. } if depth > 0 => {
                    depth -= 1;
                    if depth > 0 {
                        out.push(p);
                    }
                }
                _ if depth > 0 => out.push(p),
                _ => {}
            }
        }
        out
    }

    /// All glyph codes in drawing order.
    pub fn glyphs(&self) -> Vec<u32> {
        self.primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Glyph { code, .. } => Some(*code),
                _ => None,
            })
            .collect()
    }

    pub fn count_beziers(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Bezier { .. }))
            .count()
    }
}

impl DeviceContext for RecordingDevice {
    fn start_graphic(&mut self, kind: &str, id: &str) {
        self.primitives.push(Primitive::StartGraphic {
            kind: kind.to_string(),
            id: id.to_string(),
        });
    }

    fn end_graphic(&mut self, kind: &str, id: &str) {
        self.primitives.push(Primitive::EndGraphic {
            kind: kind.to_string(),
            id: id.to_string(),
        });
    }

    fn set_pen(&mut self, color: Color, width: i32, style: PenStyle) {
        self.paint.push_pen(Pen { color, width, style });
    }

    fn reset_pen(&mut self) {
        self.paint.pop_pen();
    }

    fn set_brush(&mut self, color: Color, style: BrushStyle) {
        self.paint.push_brush(Brush { color, style });
    }

    fn reset_brush(&mut self) {
        self.paint.pop_brush();
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let pen = self.paint.pen();
        self.primitives.push(Primitive::Line { x1, y1, x2, y2, width: pen.width, color: pen.color });
    }

    fn draw_circle(&mut self, x: i32, y: i32, radius: i32) {
        let brush = self.paint.brush();
        let filled = brush.style == BrushStyle::Solid;
        let color = if filled { brush.color } else { self.paint.pen().color };
        self.primitives.push(Primitive::Circle { x, y, radius, filled, color });
    }

    fn draw_elliptic_arc(&mut self, x: i32, y: i32, width: i32, height: i32, start: f64, end: f64) {
        let color = self.paint.pen().color;
        self.primitives.push(Primitive::Arc { x, y, width, height, start, end, color });
    }

    fn draw_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let color = self.paint.brush().color;
        self.primitives.push(Primitive::Rectangle { x, y, width, height, color });
    }

    fn draw_music_glyph(&mut self, code: u32, x: i32, y: i32, size: i32) {
        let color = self.paint.brush().color;
        self.primitives.push(Primitive::Glyph { code, x, y, size, color });
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: i32) {
        let color = self.paint.brush().color;
        self.primitives.push(Primitive::Text { text: text.to_string(), x, y, size, color });
    }

    fn text_extent(&self, text: &str, size: i32) -> TextExtent {
        estimate_text_extent(text, size)
    }

    fn draw_bezier_path(&mut self, top: [Point; 4], bottom: [Point; 4]) {
        let color = self.paint.brush().color;
        self.primitives.push(Primitive::Bezier { top, bottom, color });
    }
}
