//! SVG device: accumulates SVG elements and produces the final string.
//!
//! Glyphs are emitted as `<text>` runs in a SMuFL music font, so the output
//! needs a font such as Bravura to display correctly.

use super::{estimate_text_extent, Brush, BrushStyle, Color, DeviceContext, PaintState, Pen, PenStyle, Point, TextExtent};

const MUSIC_FONT: &str = "Bravura, Leipzig, serif";
const TEXT_FONT: &str = "Times New Roman, serif";

// ═══════════════════════════════════════════════════════════════════════
// SvgDevice
// ═══════════════════════════════════════════════════════════════════════

pub struct SvgDevice {
    elements: Vec<String>,
    depth: usize,
    width: i32,
    height: i32,
    paint: PaintState,
}

impl SvgDevice {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            elements: Vec::new(),
            depth: 0,
            width,
            height,
            paint: PaintState::default(),
        }
    }

    pub fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">"#,
            self.width, self.height, self.width, self.height
        );
        svg.push('\n');
        for el in &self.elements {
            svg.push_str(el);
            svg.push('\n');
        }
        // Close any group left open by an aborted render
        for _ in 0..self.depth {
            svg.push_str("</g>\n");
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn push(&mut self, element: String) {
        let indent = "  ".repeat(self.depth + 1);
        self.elements.push(format!("{indent}{element}"));
    }

    fn stroke(&self) -> (String, i32, &'static str) {
        let pen = self.paint.pen();
        let dash = match pen.style {
            PenStyle::Dot => r#" stroke-dasharray="2,2""#,
            _ => "",
        };
        let color = match pen.style {
            PenStyle::Transparent => "none".to_string(),
            _ => pen.color.to_hex(),
        };
        (color, pen.width.max(1), dash)
    }

    fn fill(&self) -> String {
        let brush = self.paint.brush();
        match brush.style {
            BrushStyle::Solid => brush.color.to_hex(),
            BrushStyle::Transparent => "none".to_string(),
        }
    }

    fn text_fill(&self) -> String {
        // Text is always painted, a transparent brush only affects shapes
        self.paint.brush().color.to_hex()
    }
}

fn escape(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn arc_point(cx: f64, cy: f64, rx: f64, ry: f64, degrees: f64) -> (f64, f64) {
    let rad = degrees.to_radians();
    (cx + rx * rad.cos(), cy - ry * rad.sin())
}

impl DeviceContext for SvgDevice {
    fn start_graphic(&mut self, kind: &str, id: &str) {
        self.push(format!(r#"<g class="{}" id="{}">"#, escape(kind), escape(id)));
        self.depth += 1;
    }

    fn end_graphic(&mut self, _kind: &str, _id: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.push("</g>".to_string());
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
        let (color, width, dash) = self.stroke();
        self.push(format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"{}/>"#,
            x1, y1, x2, y2, color, width, dash
        ));
    }

    fn draw_circle(&mut self, x: i32, y: i32, radius: i32) {
        let (color, width, dash) = self.stroke();
        let fill = self.fill();
        self.push(format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}" stroke="{}" stroke-width="{}"{}/>"#,
            x, y, radius, fill, color, width, dash
        ));
    }

    fn draw_elliptic_arc(&mut self, x: i32, y: i32, width: i32, height: i32, start: f64, end: f64) {
        let rx = f64::from(width) / 2.0;
        let ry = f64::from(height) / 2.0;
        let cx = f64::from(x) + rx;
        let cy = f64::from(y) + ry;
        let (sx, sy) = arc_point(cx, cy, rx, ry, start);
        let (ex, ey) = arc_point(cx, cy, rx, ry, end);
        let sweep = (end - start).rem_euclid(360.0);
        let large = if sweep > 180.0 { 1 } else { 0 };
        let (color, stroke_width, dash) = self.stroke();
        self.push(format!(
            r#"<path d="M{:.1},{:.1} A{:.1},{:.1} 0 {} 0 {:.1},{:.1}" fill="none" stroke="{}" stroke-width="{}"{}/>"#,
            sx, sy, rx, ry, large, ex, ey, color, stroke_width, dash
        ));
    }

    fn draw_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32) {
        // Callers may pass a negative extent when corners come from flipped y
        let (x, width) = if width < 0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0 { (y + height, -height) } else { (y, height) };
        let fill = self.fill();
        self.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            x, y, width, height, fill
        ));
    }

    fn draw_music_glyph(&mut self, code: u32, x: i32, y: i32, size: i32) {
        let fill = self.text_fill();
        self.push(format!(
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}">&#x{:X};</text>"#,
            x, y, MUSIC_FONT, size, fill, code
        ));
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: i32) {
        let fill = self.text_fill();
        self.push(format!(
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}">{}</text>"#,
            x, y, TEXT_FONT, size, fill, escape(text)
        ));
    }

    fn text_extent(&self, text: &str, size: i32) -> TextExtent {
        estimate_text_extent(text, size)
    }

    fn draw_bezier_path(&mut self, top: [Point; 4], bottom: [Point; 4]) {
        let fill = self.text_fill();
        let path = format!(
            "M{},{} C{},{} {},{} {},{} L{},{} C{},{} {},{} {},{} Z",
            top[0].x, top[0].y,
            top[1].x, top[1].y,
            top[2].x, top[2].y,
            top[3].x, top[3].y,
            bottom[3].x, bottom[3].y,
            bottom[2].x, bottom[2].y,
            bottom[1].x, bottom[1].y,
            bottom[0].x, bottom[0].y,
        );
        self.push(format!(r#"<path d="{}" fill="{}" stroke="none"/>"#, path, fill));
    }
}
