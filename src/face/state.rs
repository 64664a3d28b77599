//! Face visibility states and reason tags

/// Result of classifying one face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FaceState {
    /// Face geometry cannot be resolved right now
    Unloaded,
    OutsideUncovered,
    InsideUncovered,
    InsidePartiallyCovered,
    InsideCovered,
}

impl FaceState {
    pub const ALL: [FaceState; 5] = [
        FaceState::Unloaded,
        FaceState::OutsideUncovered,
        FaceState::InsideUncovered,
        FaceState::InsidePartiallyCovered,
        FaceState::InsideCovered,
    ];

    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            FaceState::Unloaded => "UNLOADED",
            FaceState::OutsideUncovered => "OUTSIDE_UNCOVERED",
            FaceState::InsideUncovered => "INSIDE_UNCOVERED",
            FaceState::InsidePartiallyCovered => "INSIDE_PARTIALLY_COVERED",
            FaceState::InsideCovered => "INSIDE_COVERED",
        }
    }

    /// Face lies on the block boundary
    pub fn outside(self) -> bool {
        self == FaceState::OutsideUncovered
    }

    pub fn covered_fully(self) -> bool {
        self == FaceState::InsideCovered
    }

    pub fn partially(self) -> bool {
        self == FaceState::InsidePartiallyCovered
    }

    /// Something of the face is drawn
    pub fn renderable(self) -> bool {
        self != FaceState::Unloaded && !self.covered_fully()
    }
}

/// Reason tags attached to classified faces
pub mod reason {
    pub const FACE_UNLOADED: &str = "face_unloaded";
    pub const OUTSIDE_CULL_OVER_EDGE_DISABLED: &str = "outside_cull_over_edge_disabled";
    pub const OUTSIDE_ASSUME_AIR_NEIGHBOUR: &str = "outside_assume_air_neighbour";
    pub const INSIDE_COVERED: &str = "inside_covered";
    pub const INSIDE_PARTIALLY_COVERED: &str = "inside_partially_covered";
    pub const INSIDE_UNCOVERED: &str = "inside_uncovered";

    /// Tag for a boundary face; both tags yield `OUTSIDE_UNCOVERED`.
    pub fn outside(cull_over_edge: bool) -> &'static str {
        if cull_over_edge {
            OUTSIDE_ASSUME_AIR_NEIGHBOUR
        } else {
            OUTSIDE_CULL_OVER_EDGE_DISABLED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderable() {
        assert!(!FaceState::Unloaded.renderable());
        assert!(!FaceState::InsideCovered.renderable());
        assert!(FaceState::OutsideUncovered.renderable());
        assert!(FaceState::InsidePartiallyCovered.renderable());
        assert!(FaceState::InsideUncovered.renderable());
    }

    #[test]
    fn test_only_outside_uncovered_is_outside() {
        let outside: Vec<FaceState> = FaceState::ALL.into_iter().filter(|s| s.outside()).collect();
        assert_eq!(outside, vec![FaceState::OutsideUncovered]);
    }

    #[test]
    fn test_outside_reason() {
        assert_eq!(reason::outside(true), "outside_assume_air_neighbour");
        assert_eq!(reason::outside(false), "outside_cull_over_edge_disabled");
    }
}
