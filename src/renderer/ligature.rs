//! Ligature path for long, breve and ligated whole notes.
//!
//! Ligature geometry is not drawn. The path only keeps the anchor of the
//! previous ligature member so a run can be joined once shapes are supported.

use crate::device::Point;

/// Anchor of the last ligature member in the current run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LigatureState {
    anchor: Option<Point>,
    members: usize,
}

impl LigatureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    pub fn members(&self) -> usize {
        self.members
    }

    /// End the current run.
    pub fn reset(&mut self) {
        self.anchor = None;
        self.members = 0;
    }

    pub(super) fn record(&mut self, at: Point) {
        self.anchor = Some(at);
        self.members += 1;
    }
}

/// Ligature member at (x, y). Draws nothing.
pub(super) fn draw_ligature(state: &mut LigatureState, id: &str, x: i32, y: i32) {
    log::trace!(
        "ligature member {} at ({}, {}), previous anchor {:?}",
        id,
        x,
        y,
        state.anchor()
    );
    state.record(Point::new(x, y));
}
