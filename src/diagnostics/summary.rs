//! Per-file face statistics

use std::collections::BTreeMap;

use crate::face::{FaceEvaluation, FaceState};
use crate::model::Facing;

use super::consistency::{FaceLocation, TransformableDiagnostics};

/// Running face counts of one input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaceStateSummary {
    pub total_faces: usize,
    pub renderable_faces: usize,
    pub inside_faces: usize,
    pub outside_faces: usize,
    /// Indexed by [`FaceState::ordinal`]
    pub by_state: [usize; 5],
    /// Indexed by [`Facing::ordinal`]
    pub by_facing: [usize; 6],
    pub by_reason: BTreeMap<&'static str, usize>,
}

impl FaceStateSummary {
    pub fn record(&mut self, face: &FaceEvaluation) {
        self.total_faces += 1;
        self.by_state[face.state.ordinal()] += 1;
        self.by_facing[face.facing.ordinal()] += 1;
        *self.by_reason.entry(face.reason).or_default() += 1;
        if face.state.outside() {
            self.outside_faces += 1;
        } else {
            self.inside_faces += 1;
        }
        if face.renderable() {
            self.renderable_faces += 1;
        }
    }

    pub fn count(&self, state: FaceState) -> usize {
        self.by_state[state.ordinal()]
    }

    pub fn count_facing(&self, facing: Facing) -> usize {
        self.by_facing[facing.ordinal()]
    }
}

/// Structure counters of one tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub groups: usize,
    pub tiles: usize,
    pub boxes: usize,
    pub transformable_boxes: usize,
}

/// Mutable context threaded through the evaluation of one input.
#[derive(Clone, Debug, Default)]
pub struct Aggregator {
    pub stats: TreeStats,
    pub faces: FaceStateSummary,
    pub transformables: TransformableDiagnostics,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_face(&mut self, path: &str, tile_index: usize, box_index: usize, face: &FaceEvaluation) {
        self.faces.record(face);
        if let Some(diagnostic) = &face.cache {
            self.transformables.record(diagnostic, || FaceLocation {
                path: path.to_string(),
                tile_index,
                box_index,
                facing: face.facing,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::ScanCounters;
    use crate::face::state::reason;

    fn face(facing: Facing, state: FaceState, reason: &'static str) -> FaceEvaluation {
        FaceEvaluation {
            facing,
            state,
            reason,
            total_cells: 4,
            filled_cells: 0,
            counters: ScanCounters::default(),
            cache: None,
        }
    }

    #[test]
    fn test_record_counts() {
        let mut summary = FaceStateSummary::default();
        summary.record(&face(Facing::Up, FaceState::OutsideUncovered, reason::OUTSIDE_ASSUME_AIR_NEIGHBOUR));
        summary.record(&face(Facing::Up, FaceState::InsideCovered, reason::INSIDE_COVERED));
        summary.record(&face(Facing::Down, FaceState::Unloaded, reason::FACE_UNLOADED));

        assert_eq!(summary.total_faces, 3);
        assert_eq!(summary.renderable_faces, 1);
        assert_eq!(summary.outside_faces, 1);
        // UNLOADED counts as inside
        assert_eq!(summary.inside_faces, 2);
        assert_eq!(summary.count(FaceState::InsideCovered), 1);
        assert_eq!(summary.count_facing(Facing::Up), 2);
        assert_eq!(summary.by_reason["face_unloaded"], 1);
    }

    #[test]
    fn test_reasons_sorted() {
        let mut summary = FaceStateSummary::default();
        summary.record(&face(Facing::Up, FaceState::InsideUncovered, reason::INSIDE_UNCOVERED));
        summary.record(&face(Facing::Up, FaceState::Unloaded, reason::FACE_UNLOADED));
        summary.record(&face(Facing::Up, FaceState::InsideCovered, reason::INSIDE_COVERED));
        let keys: Vec<&str> = summary.by_reason.keys().copied().collect();
        assert_eq!(keys, vec!["face_unloaded", "inside_covered", "inside_uncovered"]);
    }

    #[test]
    fn test_aggregator_ignores_axis_faces_for_diagnostics() {
        let mut aggregator = Aggregator::new();
        aggregator.record_face("root", 0, 0, &face(Facing::Up, FaceState::InsideUncovered, reason::INSIDE_UNCOVERED));
        assert_eq!(aggregator.transformables.faces_evaluated, 0);
        assert_eq!(aggregator.faces.total_faces, 1);
    }
}
