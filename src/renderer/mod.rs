//! Element view: draws a laid-out document onto a device context.
//!
//! Rendering walks every page, system, measure, staff and layer. Each layer
//! runs in two phases: the primary pass draws its elements in document order
//! and queues the draws that depend on later elements ([`DeferredDraw`]);
//! [`View::flush_layer`] then drains that queue in insertion order.

mod apparatus;
mod deferred;
mod geometry;
mod glyphs;
mod grouping;
mod ligature;
mod notes;
mod slurs;
mod staff;
mod stems;
mod symbols;

use std::collections::HashMap;

use crate::config::RenderOptions;
use crate::device::{BrushStyle, Color, DeviceContext, PenStyle, Point, SvgDevice};
use crate::error::{RenderError, RenderResult};
use crate::metrics::{DrawingMetrics, StaffMetrics};
use crate::model::*;

pub use deferred::{DeferredDraw, DeferredQueue};
pub use ligature::LigatureState;

use geometry::Viewport;

// ═══════════════════════════════════════════════════════════════════════
// Render context types
// ═══════════════════════════════════════════════════════════════════════

/// Drawing state handed down the element tree by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderScope {
    pub color: Color,
    /// Set inside a beam: its precomputed stem direction
    pub beam_dir: Option<StemDirection>,
    pub in_beam: bool,
}

impl RenderScope {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            beam_dir: None,
            in_beam: false,
        }
    }

    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    /// Shared stem direction for the notes of a beam that draws no stroke.
    pub fn with_beam_dir(self, dir: StemDirection) -> Self {
        Self {
            beam_dir: Some(dir),
            ..self
        }
    }

    pub fn in_beam(self, dir: StemDirection) -> Self {
        Self {
            beam_dir: Some(dir),
            in_beam: true,
            ..self
        }
    }
}

/// Geometry recorded for a drawn note or rest, read by beams, tuplets and curves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawnGeometry {
    pub x: i32,
    pub y: i32,
    pub stem_dir: Option<StemDirection>,
    pub stem_start: Point,
    pub stem_end: Point,
    /// Flag count of the note's drawing duration
    pub flags: u32,
    pub is_note: bool,
    pub cue: bool,
}

/// The staff an element is drawn on, with the index of its system in the document.
#[derive(Debug, Clone, Copy)]
pub struct StaffContext<'a> {
    pub staff: &'a Staff,
    pub system: usize,
}

impl<'a> StaffContext<'a> {
    pub fn new(staff: &'a Staff, system: usize) -> Self {
        Self { staff, system }
    }
}

/// State of one layer's rendering pass.
#[derive(Debug)]
pub struct LayerPass<'a> {
    layer: &'a Layer,
    queue: DeferredQueue,
    clef: Option<ClefId>,
    ligature: LigatureState,
}

impl<'a> LayerPass<'a> {
    pub fn new(layer: &'a Layer) -> Self {
        Self {
            layer,
            queue: DeferredQueue::new(),
            clef: layer.clef,
            ligature: LigatureState::new(),
        }
    }

    pub fn layer(&self) -> &Layer {
        self.layer
    }

    pub fn queue(&self) -> &DeferredQueue {
        &self.queue
    }

    /// Clef in effect at the current point of the pass.
    pub fn clef(&self) -> Option<ClefId> {
        self.clef
    }

    pub fn ligature(&self) -> &LigatureState {
        &self.ligature
    }
}

/// Where a note lives in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NoteLocation {
    system: usize,
    measure: usize,
    alignment: Option<usize>,
}

/// Resolved placement of the element being drawn.
#[derive(Debug, Clone, Copy)]
struct ElementCtx<'e> {
    element: &'e Element,
    measure: &'e Measure,
    staff: &'e Staff,
    system: usize,
    m: StaffMetrics,
    /// Drawing x, horizontal offset not applied
    x: i32,
    staff_y: i32,
    scope: RenderScope,
}

impl ElementCtx<'_> {
    fn color(&self) -> Color {
        self.scope.color
    }

    fn staff_ctx(&self) -> StaffContext<'_> {
        StaffContext::new(self.staff, self.system)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// View
// ═══════════════════════════════════════════════════════════════════════

pub struct View<'a> {
    doc: &'a Document,
    options: RenderOptions,
    metrics: DrawingMetrics,
    viewport: Viewport,
    current_element: Option<String>,
    locations: HashMap<String, NoteLocation>,
    drawn: HashMap<String, DrawnGeometry>,
}

impl<'a> View<'a> {
    pub fn new(doc: &'a Document, options: RenderOptions) -> RenderResult<View<'a>> {
        options.validate().map_err(|e| RenderError::InvalidOptions {
            reason: e.to_string(),
        })?;
        let metrics = DrawingMetrics::from_options(&options);
        let mut locations = HashMap::new();
        let mut system_index = 0;
        for page in &doc.pages {
            for system in &page.systems {
                for (mi, measure) in system.measures.iter().enumerate() {
                    for staff in &measure.staves {
                        if staff.lines == 0 {
                            return Err(RenderError::InvalidStaffLines {
                                staff: staff.id.clone(),
                                lines: staff.lines,
                            });
                        }
                        for layer in &staff.layers {
                            index_notes(&layer.elements, system_index, mi, &mut locations);
                        }
                    }
                }
                system_index += 1;
            }
        }
        log::debug!(
            "view over {} pages, {} systems, {} notes",
            doc.pages.len(),
            system_index,
            locations.len()
        );
        let viewport = Viewport {
            zoom: options.zoom,
            page_height: options.page_height,
        };
        Ok(View {
            doc,
            options,
            metrics,
            viewport,
            current_element: None,
            locations,
            drawn: HashMap::new(),
        })
    }

    /// Mark the element drawn in the selection colour.
    pub fn set_current_element(&mut self, id: Option<&str>) {
        self.current_element = id.map(str::to_string);
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn metrics(&self) -> &DrawingMetrics {
        &self.metrics
    }

    /// Geometry recorded for a note or rest during the current render.
    pub fn drawn(&self, id: &str) -> Option<&DrawnGeometry> {
        self.drawn.get(id)
    }

    pub fn render_document(&mut self, dc: &mut impl DeviceContext) -> RenderResult<()> {
        self.drawn.clear();
        for page in 0..self.doc.pages.len() {
            self.draw_page(dc, page)?;
        }
        Ok(())
    }

    pub fn render_page(&mut self, dc: &mut impl DeviceContext, page: usize) -> RenderResult<()> {
        if page >= self.doc.pages.len() {
            return Err(RenderError::PageOutOfRange { page });
        }
        self.drawn.clear();
        self.draw_page(dc, page)
    }

    fn draw_page(&mut self, dc: &mut dyn DeviceContext, page_index: usize) -> RenderResult<()> {
        let doc = self.doc;
        let page = &doc.pages[page_index];
        let first_system: usize = doc.pages[..page_index].iter().map(|p| p.systems.len()).sum();
        dc.start_graphic("page", &page.id);
        for (si, system) in page.systems.iter().enumerate() {
            let system_index = first_system + si;
            dc.start_graphic("system", &system.id);
            for measure in &system.measures {
                dc.start_graphic("measure", &measure.id);
                for staff in &measure.staves {
                    let ctx = StaffContext::new(staff, system_index);
                    self.draw_staff(dc, measure, &ctx)?;
                }
                dc.end_graphic("measure", &measure.id);
            }
            dc.end_graphic("system", &system.id);
        }
        dc.end_graphic("page", &page.id);
        Ok(())
    }

    fn draw_staff(&mut self, dc: &mut dyn DeviceContext, measure: &Measure, ctx: &StaffContext) -> RenderResult<()> {
        let staff = ctx.staff;
        let m = *self.metrics.for_staff(staff);
        dc.start_graphic("staff", &staff.id);
        let x1 = measure.drawing_x;
        let x2 = measure.drawing_x + measure.right_barline_x;
        for line in 0..i32::from(staff.lines) {
            let y = staff.drawing_y - line * m.interline;
            self.horizontal_line(dc, x1, x2, y, self.metrics.staff_line_width, self.options.colors.normal);
        }
        for layer in &staff.layers {
            self.draw_layer(dc, layer, measure, ctx)?;
        }
        dc.end_graphic("staff", &staff.id);
        Ok(())
    }

    fn draw_layer(&mut self, dc: &mut dyn DeviceContext, layer: &Layer, measure: &Measure, ctx: &StaffContext) -> RenderResult<()> {
        dc.start_graphic("layer", &layer.id);
        let mut pass = LayerPass::new(layer);
        let scope = RenderScope::new(self.options.colors.normal);
        log::trace!("layer {}: primary pass over {} elements", layer.id, layer.elements.len());
        for element in &layer.elements {
            self.draw_element(dc, element, Some(&mut pass), measure, Some(ctx), scope)?;
        }
        self.flush_layer(dc, &mut pass, measure, ctx)?;
        dc.end_graphic("layer", &layer.id);
        Ok(())
    }

    /// Draw one element and its children.
    ///
    /// Fails when the owning layer pass or the staff context is missing, or
    /// when the element's coordinate mode does not match the document kind.
    pub fn draw_element(
        &mut self,
        dc: &mut dyn DeviceContext,
        element: &Element,
        pass: Option<&mut LayerPass<'_>>,
        measure: &Measure,
        staff: Option<&StaffContext<'_>>,
        scope: RenderScope,
    ) -> RenderResult<()> {
        let pass = pass.ok_or_else(|| RenderError::MissingLayer {
            element: element.id.clone(),
        })?;
        let staff = staff.ok_or_else(|| RenderError::MissingStaff {
            element: element.id.clone(),
        })?;
        let m = *self.metrics.for_staff(staff.staff);
        if staff.staff.lines == 0 {
            return Err(RenderError::InvalidStaffLines {
                staff: staff.staff.id.clone(),
                lines: staff.staff.lines,
            });
        }
        let x = self.element_x(element, measure)?;
        let scope = if self.current_element.as_deref() == Some(element.id.as_str()) {
            scope.with_color(self.options.colors.selected)
        } else {
            scope
        };
        let cx = ElementCtx {
            element,
            measure,
            staff: staff.staff,
            system: staff.system,
            m,
            x,
            staff_y: staff.staff.drawing_y,
            scope,
        };

        let name = element.kind.name();
        dc.start_graphic(name, &element.id);
        let result = match &element.kind {
            ElementKind::Barline(barline) => {
                self.draw_barline(dc, &cx, barline);
                Ok(())
            }
            ElementKind::Beam(beam) => self.draw_beam(dc, &cx, beam, pass),
            ElementKind::Clef(clef) => {
                self.draw_clef(dc, &cx, clef);
                pass.clef = Some(clef.id);
                Ok(())
            }
            ElementKind::KeySig(keysig) => {
                self.draw_keysig(dc, &cx, keysig, pass.clef);
                Ok(())
            }
            ElementKind::Mensur(mensur) => {
                self.draw_mensur(dc, &cx, mensur);
                Ok(())
            }
            ElementKind::MeterSig(meter) => {
                self.draw_meter_sig(dc, &cx, meter);
                Ok(())
            }
            ElementKind::MRest(_) => {
                self.draw_mrest(dc, &cx);
                Ok(())
            }
            ElementKind::MultiRest(multi) => {
                self.draw_multi_rest(dc, &cx, multi);
                Ok(())
            }
            ElementKind::Note(note) => {
                self.draw_note(dc, &cx, note, pass);
                Ok(())
            }
            ElementKind::Rest(rest) => {
                pass.ligature.reset();
                self.draw_rest(dc, &cx, rest, pass.clef);
                Ok(())
            }
            ElementKind::Symbol(symbol) => {
                self.draw_symbol(dc, &cx, symbol, pass.clef);
                Ok(())
            }
            ElementKind::Tuplet(tuplet) => self.draw_tuplet(dc, &cx, tuplet, pass),
            ElementKind::App(app) => self.draw_app(dc, &cx, app, pass),
        };
        dc.end_graphic(name, &element.id);
        result
    }

    /// Drain a layer's deferred queue. Called once, after the primary pass.
    pub fn flush_layer(
        &mut self,
        dc: &mut dyn DeviceContext,
        pass: &mut LayerPass<'_>,
        measure: &Measure,
        staff: &StaffContext<'_>,
    ) -> RenderResult<()> {
        let m = *self.metrics.for_staff(staff.staff);
        let tasks = pass.queue.take_all();
        log::trace!("layer {}: flushing {} deferred draws", pass.layer.id, tasks.len());
        for task in tasks {
            match task {
                DeferredDraw::BeamStroke { id, members, color } => {
                    self.draw_beam_stroke(dc, &id, &members, &m, color);
                }
                DeferredDraw::TupletBracket { id, num, numbase, members, color } => {
                    self.draw_tuplet_bracket(dc, &id, num, numbase, &members, &m, color);
                }
                DeferredDraw::Curve { relation, kind, color } => {
                    self.draw_curve(dc, &relation, kind, measure, staff, &m, color);
                }
            }
        }
        Ok(())
    }

    fn element_x(&self, element: &Element, measure: &Measure) -> RenderResult<i32> {
        match (element.x_abs, self.doc.kind) {
            (None, DocumentKind::Raw) => Ok(element.x_rel + measure.drawing_x),
            (Some(x), DocumentKind::Transcription) => Ok(x),
            (_, kind) => Err(RenderError::CoordinateMode {
                element: element.id.clone(),
                kind,
            }),
        }
    }

    fn record(&mut self, id: &str, geometry: DrawnGeometry) {
        self.drawn.insert(id.to_string(), geometry);
    }

    fn location(&self, id: &str) -> Option<NoteLocation> {
        self.locations.get(id).copied()
    }

    // ── Logical-unit drawing helpers ────────────────────────────────

    fn line(&self, dc: &mut dyn DeviceContext, from: Point, to: Point, width: i32, color: Color) {
        let vp = self.viewport;
        dc.set_pen(color, vp.x(width).max(1), PenStyle::Solid);
        dc.draw_line(vp.x(from.x), vp.y(from.y), vp.x(to.x), vp.y(to.y));
        dc.reset_pen();
    }

    fn vertical_line(&self, dc: &mut dyn DeviceContext, x: i32, y1: i32, y2: i32, width: i32, color: Color) {
        self.line(dc, Point::new(x, y1), Point::new(x, y2), width, color);
    }

    fn horizontal_line(&self, dc: &mut dyn DeviceContext, x1: i32, x2: i32, y: i32, width: i32, color: Color) {
        self.line(dc, Point::new(x1, y), Point::new(x2, y), width, color);
    }

    /// Filled rectangle between two corners, in any order.
    fn full_rectangle(&self, dc: &mut dyn DeviceContext, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        let vp = self.viewport;
        let (left, right) = (x1.min(x2), x1.max(x2));
        let (bottom, top) = (y1.min(y2), y1.max(y2));
        dc.set_brush(color, BrushStyle::Solid);
        dc.draw_rectangle(vp.x(left), vp.y(top), vp.x(right - left), vp.x(top - bottom));
        dc.reset_brush();
    }

    fn glyph(&self, dc: &mut dyn DeviceContext, code: u32, x: i32, y: i32, m: &StaffMetrics, cue: bool, color: Color) {
        let vp = self.viewport;
        dc.set_brush(color, BrushStyle::Solid);
        dc.draw_music_glyph(code, vp.x(x), vp.y(y), vp.x(m.font(cue)));
        dc.reset_brush();
    }

    fn dot(&self, dc: &mut dyn DeviceContext, x: i32, y: i32, m: &StaffMetrics, color: Color) {
        let vp = self.viewport;
        dc.set_pen(color, 1, PenStyle::Solid);
        dc.set_brush(color, BrushStyle::Solid);
        dc.draw_circle(vp.x(x), vp.y(y), vp.x((m.interline / 5).max(2)));
        dc.reset_brush();
        dc.reset_pen();
    }

    /// Text whose horizontal centre sits at x.
    fn centered_text(&self, dc: &mut dyn DeviceContext, text: &str, x: i32, y: i32, size: i32, color: Color) {
        let vp = self.viewport;
        let size = vp.x(size);
        let extent = dc.text_extent(text, size);
        dc.set_brush(color, BrushStyle::Solid);
        dc.draw_text(text, vp.x(x) - extent.width / 2, vp.y(y), size);
        dc.reset_brush();
    }
}

fn index_notes(elements: &[Element], system: usize, measure: usize, out: &mut HashMap<String, NoteLocation>) {
    for element in elements {
        match &element.kind {
            ElementKind::Note(_) => {
                out.insert(
                    element.id.clone(),
                    NoteLocation {
                        system,
                        measure,
                        alignment: element.alignment,
                    },
                );
            }
            ElementKind::Beam(b) => index_notes(&b.children, system, measure, out),
            ElementKind::Tuplet(t) => index_notes(&t.children, system, measure, out),
            ElementKind::App(app) => {
                for reading in &app.readings {
                    index_notes(&reading.children, system, measure, out);
                }
            }
            _ => {}
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Render a whole document into an SVG string.
pub fn render_document_to_svg(doc: &Document, options: RenderOptions) -> RenderResult<String> {
    let width = doc
        .pages
        .iter()
        .flat_map(|p| p.systems.iter())
        .flat_map(|s| s.measures.iter())
        .map(|m| m.drawing_x + m.right_barline_x)
        .max()
        .unwrap_or(0);
    let mut view = View::new(doc, options)?;
    let vp = view.viewport;
    let mut dc = SvgDevice::new(vp.x(width + view.metrics.step2), vp.x(vp.page_height));
    view.render_document(&mut dc)?;
    Ok(dc.build())
}
