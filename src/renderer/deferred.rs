//! Per-layer queue of draws that wait for the primary pass to finish.

use std::collections::VecDeque;

use crate::device::Color;
use crate::model::CurveKind;

/// A draw whose geometry depends on elements drawn later in the layer.
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredDraw {
    /// Beam over the stems of its members
    BeamStroke {
        id: String,
        members: Vec<String>,
        color: Color,
    },
    /// Tuplet bracket and number over its members
    TupletBracket {
        id: String,
        num: u32,
        numbase: u32,
        members: Vec<String>,
        color: Color,
    },
    /// One half (or the whole) of a tie or slur
    Curve {
        relation: String,
        kind: CurveKind,
        color: Color,
    },
}

impl DeferredDraw {
    pub fn kind_name(&self) -> &'static str {
        match self {
            DeferredDraw::BeamStroke { .. } => "beam",
            DeferredDraw::TupletBracket { .. } => "tuplet",
            DeferredDraw::Curve { kind: CurveKind::Tie, .. } => "tie",
            DeferredDraw::Curve { kind: CurveKind::Slur, .. } => "slur",
        }
    }
}

/// FIFO of deferred draws. Drained once at the end of the layer's pass.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    tasks: VecDeque<DeferredDraw>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: DeferredDraw) {
        self.tasks.push_back(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeferredDraw> {
        self.tasks.iter()
    }

    /// Take every queued task in insertion order, leaving the queue empty.
    pub fn take_all(&mut self) -> Vec<DeferredDraw> {
        self.tasks.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(id: &str) -> DeferredDraw {
        DeferredDraw::Curve {
            relation: id.to_string(),
            kind: CurveKind::Tie,
            color: Color::BLACK,
        }
    }

    #[test]
    fn drains_in_insertion_order_once() {
        let mut q = DeferredQueue::new();
        q.push(curve("t1"));
        q.push(DeferredDraw::BeamStroke {
            id: "b1".into(),
            members: vec!["n1".into(), "n2".into()],
            color: Color::BLACK,
        });
        q.push(curve("t2"));
        assert_eq!(q.len(), 3);

        let drained = q.take_all();
        let names: Vec<&str> = drained.iter().map(|t| t.kind_name()).collect();
        assert_eq!(names, vec!["tie", "beam", "tie"]);
        assert!(matches!(&drained[2], DeferredDraw::Curve { relation, .. } if relation == "t2"));
        assert!(q.is_empty());
        assert!(q.take_all().is_empty());
    }
}
