//! scoreview: draws a laid-out music document as device primitives.
//!
//! The layout engine has already placed every element; this crate turns
//! notes, rests, clefs, signatures, barlines, beams, tuplets, ties, slurs and
//! editorial readings into lines, glyphs, arcs and curves on a
//! [`DeviceContext`].
//!
//! # Example
//! ```
//! use scoreview::{render_document_to_svg, Document, DocumentKind, RenderOptions};
//!
//! let doc = Document::new(DocumentKind::Raw);
//! let svg = render_document_to_svg(&doc, RenderOptions::default())?;
//! assert!(svg.starts_with("<svg"));
//! # Ok::<(), scoreview::RenderError>(())
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod metrics;
pub mod model;
pub mod renderer;

pub use config::{Palette, Ratio, RenderOptions};
pub use device::{BrushStyle, Color, DeviceContext, PenStyle, Point, Primitive, RecordingDevice, SvgDevice, TextExtent};
pub use error::{ConfigError, RenderError, RenderResult};
pub use metrics::{DrawingMetrics, StaffMetrics};
pub use model::*;
pub use renderer::{
    render_document_to_svg, DeferredDraw, DeferredQueue, DrawnGeometry, LayerPass, RenderScope, StaffContext, View,
};
