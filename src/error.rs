//! Render and configuration error types

use thiserror::Error;

use crate::model::DocumentKind;

/// Structural problems that stop the render of a subtree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Element drawn without an owning layer
    #[error("Element {element} has no owning layer")]
    MissingLayer { element: String },

    /// Element drawn without staff context
    #[error("Element {element} has no staff context")]
    MissingStaff { element: String },

    /// Staff with no lines to draw on
    #[error("Staff {staff} has an invalid line count: {lines}")]
    InvalidStaffLines { staff: String, lines: u8 },

    /// Coordinate mode of the element does not match the document kind
    #[error("Element {element} uses the wrong coordinate mode for a {kind:?} document")]
    CoordinateMode { element: String, kind: DocumentKind },

    /// Requested page does not exist
    #[error("Page index out of range: {page}")]
    PageOutOfRange { page: usize },

    /// Options rejected when building a view
    #[error("Invalid render options: {reason}")]
    InvalidOptions { reason: String },
}

/// Errors loading render options.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid render options: {0}")]
    Parse(#[from] serde_json::Error),

    /// A ratio with a zero denominator
    #[error("Invalid ratio for {name}: {num}/{den}")]
    InvalidRatio { name: &'static str, num: i32, den: i32 },

    /// Interline too small for one of the staff size classes
    #[error("Interline of the {size} staff size must be at least 2, got {interline}")]
    InvalidInterline { size: &'static str, interline: i32 },
}

pub type RenderResult<T> = Result<T, RenderError>;
