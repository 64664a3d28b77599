//! Integer axis-aligned box on a tile grid

use glam::IVec3;

use crate::model::facing::{Axis, Facing};

/// Axis-aligned box defined by min and max corners in grid units
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridBox {
    pub min: IVec3,
    pub max: IVec3,
}

impl GridBox {
    /// Create box from min and max corners
    pub fn new(min: IVec3, max: IVec3) -> Self {
        Self { min, max }
    }

    /// Create box from the first six entries of a serialized box array
    pub fn from_array(array: &[i32; 6]) -> Self {
        Self {
            min: IVec3::new(array[0], array[1], array[2]),
            max: IVec3::new(array[3], array[4], array[5]),
        }
    }

    pub fn to_array(&self) -> [i32; 6] {
        [self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z]
    }

    pub fn min(&self, axis: Axis) -> i32 {
        self.min[axis.index()]
    }

    pub fn max(&self, axis: Axis) -> i32 {
        self.max[axis.index()]
    }

    /// Extent along an axis, never negative
    pub fn span(&self, axis: Axis) -> u32 {
        let span = (i64::from(self.max(axis)) - i64::from(self.min(axis))).max(0);
        u32::try_from(span).unwrap_or(u32::MAX)
    }

    /// min <= max on every axis
    pub fn is_ordered(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    /// Coordinate of the face plane for `facing` along its axis
    pub fn face_origin(&self, facing: Facing) -> i32 {
        if facing.positive() {
            self.max(facing.axis())
        } else {
            self.min(facing.axis())
        }
    }

    /// Position of one of the eight corners
    pub fn corner(&self, corner: BoxCorner) -> IVec3 {
        IVec3::new(
            if corner.east() { self.max.x } else { self.min.x },
            if corner.up() { self.max.y } else { self.min.y },
            if corner.south() { self.max.z } else { self.min.z },
        )
    }
}

/// Box corners, named by their east/west, up/down and south/north side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoxCorner {
    Eun,
    Eus,
    Edn,
    Eds,
    Wun,
    Wus,
    Wdn,
    Wds,
}

impl BoxCorner {
    /// Serialization order of corner displacements
    pub const ALL: [BoxCorner; 8] = [
        BoxCorner::Eun,
        BoxCorner::Eus,
        BoxCorner::Edn,
        BoxCorner::Eds,
        BoxCorner::Wun,
        BoxCorner::Wus,
        BoxCorner::Wdn,
        BoxCorner::Wds,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn east(self) -> bool {
        matches!(self, BoxCorner::Eun | BoxCorner::Eus | BoxCorner::Edn | BoxCorner::Eds)
    }

    pub fn up(self) -> bool {
        matches!(self, BoxCorner::Eun | BoxCorner::Eus | BoxCorner::Wun | BoxCorner::Wus)
    }

    pub fn south(self) -> bool {
        matches!(self, BoxCorner::Eus | BoxCorner::Eds | BoxCorner::Wus | BoxCorner::Wds)
    }

    pub fn name(self) -> &'static str {
        match self {
            BoxCorner::Eun => "EUN",
            BoxCorner::Eus => "EUS",
            BoxCorner::Edn => "EDN",
            BoxCorner::Eds => "EDS",
            BoxCorner::Wun => "WUN",
            BoxCorner::Wus => "WUS",
            BoxCorner::Wdn => "WDN",
            BoxCorner::Wds => "WDS",
        }
    }

    /// The four corners of a face, wound outward-facing.
    pub fn face_corners(facing: Facing) -> [BoxCorner; 4] {
        use BoxCorner::*;
        match facing {
            Facing::East => [Eus, Eds, Edn, Eun],
            Facing::West => [Wun, Wdn, Wds, Wus],
            Facing::Up => [Wun, Wus, Eus, Eun],
            Facing::Down => [Wds, Wdn, Edn, Eds],
            Facing::South => [Wus, Wds, Eds, Eus],
            Facing::North => [Eun, Edn, Wdn, Wun],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_accessors() {
        let b = GridBox::new(IVec3::new(0, 2, 4), IVec3::new(8, 6, 16));
        assert_eq!(b.span(Axis::X), 8);
        assert_eq!(b.span(Axis::Y), 4);
        assert_eq!(b.span(Axis::Z), 12);
        assert!(b.is_ordered());
    }

    #[test]
    fn test_flat_box_is_ordered_but_empty() {
        let b = GridBox::new(IVec3::new(0, 0, 0), IVec3::new(4, 0, 4));
        assert!(b.is_ordered());
        assert_eq!(b.span(Axis::Y), 0);
        assert!(!GridBox::new(IVec3::new(0, 1, 0), IVec3::new(4, 0, 4)).is_ordered());
    }

    #[test]
    fn test_span_of_extreme_bounds() {
        let b = GridBox::from_array(&[i32::MIN, 0, 0, i32::MAX, 1, 1]);
        assert_eq!(b.span(Axis::X), u32::MAX);
        assert_eq!(b.span(Axis::Y), 1);
    }

    #[test]
    fn test_face_origin() {
        let b = GridBox::from_array(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(b.face_origin(Facing::Down), 2);
        assert_eq!(b.face_origin(Facing::Up), 5);
        assert_eq!(b.face_origin(Facing::West), 1);
        assert_eq!(b.face_origin(Facing::South), 6);
    }

    #[test]
    fn test_face_corners_lie_on_face() {
        let b = GridBox::from_array(&[0, 0, 0, 2, 3, 4]);
        for facing in Facing::ALL {
            let origin = b.face_origin(facing);
            for corner in BoxCorner::face_corners(facing) {
                assert_eq!(b.corner(corner)[facing.axis().index()], origin);
            }
        }
    }
}
