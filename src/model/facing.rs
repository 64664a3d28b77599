//! Axes and the six cardinal facings of a box

use glam::Vec3;

/// Coordinate axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index (x = 0, y = 1, z = 2)
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// First in-face axis of a face perpendicular to this axis
    pub fn one(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
            Axis::Z => Axis::X,
        }
    }

    /// Second in-face axis of a face perpendicular to this axis
    pub fn two(self) -> Axis {
        match self {
            Axis::X => Axis::Z,
            Axis::Y => Axis::Z,
            Axis::Z => Axis::Y,
        }
    }

    /// The axis that is neither `self` nor `other`
    pub fn third(self, other: Axis) -> Axis {
        match (self, other) {
            (Axis::X, Axis::Y) | (Axis::Y, Axis::X) => Axis::Z,
            (Axis::X, Axis::Z) | (Axis::Z, Axis::X) => Axis::Y,
            _ => Axis::X,
        }
    }
}

/// One of the six box facings, in ordinal order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Facing {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Facing {
    /// Fixed evaluation and report order
    pub const ALL: [Facing; 6] = [
        Facing::Down,
        Facing::Up,
        Facing::North,
        Facing::South,
        Facing::West,
        Facing::East,
    ];

    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn axis(self) -> Axis {
        match self {
            Facing::Down | Facing::Up => Axis::Y,
            Facing::North | Facing::South => Axis::Z,
            Facing::West | Facing::East => Axis::X,
        }
    }

    /// True for UP, SOUTH and EAST
    pub fn positive(self) -> bool {
        matches!(self, Facing::Up | Facing::South | Facing::East)
    }

    pub fn one(self) -> Axis {
        self.axis().one()
    }

    pub fn two(self) -> Axis {
        self.axis().two()
    }

    pub fn opposite(self) -> Facing {
        match self {
            Facing::Down => Facing::Up,
            Facing::Up => Facing::Down,
            Facing::North => Facing::South,
            Facing::South => Facing::North,
            Facing::West => Facing::East,
            Facing::East => Facing::West,
        }
    }

    /// Outward unit normal
    pub fn normal(self) -> Vec3 {
        match self {
            Facing::Down => Vec3::NEG_Y,
            Facing::Up => Vec3::Y,
            Facing::North => Vec3::NEG_Z,
            Facing::South => Vec3::Z,
            Facing::West => Vec3::NEG_X,
            Facing::East => Vec3::X,
        }
    }

    /// Upper-case name used in reports
    pub fn name(self) -> &'static str {
        match self {
            Facing::Down => "DOWN",
            Facing::Up => "UP",
            Facing::North => "NORTH",
            Facing::South => "SOUTH",
            Facing::West => "WEST",
            Facing::East => "EAST",
        }
    }

    /// Facing whose normal is closest to `normal`.
    ///
    /// Ties resolve to the earliest facing in ordinal order, a zero vector
    /// resolves to DOWN.
    pub fn nearest(normal: Vec3) -> Facing {
        if normal == Vec3::ZERO {
            return Facing::Down;
        }

        let mut best = Facing::Down;
        let mut distance = f32::NEG_INFINITY;
        for facing in Facing::ALL {
            let dot = normal.dot(facing.normal());
            if dot > distance {
                distance = dot;
                best = facing;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_face_axes_exclude_facing_axis() {
        for facing in Facing::ALL {
            let axis = facing.axis();
            assert_ne!(facing.one(), axis);
            assert_ne!(facing.two(), axis);
            assert_ne!(facing.one(), facing.two());
            assert_eq!(facing.one().third(facing.two()), axis);
        }
    }

    #[test]
    fn test_opposite_flips_sign() {
        for facing in Facing::ALL {
            let opposite = facing.opposite();
            assert_eq!(opposite.axis(), facing.axis());
            assert_ne!(opposite.positive(), facing.positive());
            assert_eq!(opposite.opposite(), facing);
        }
    }

    #[test]
    fn test_nearest_facing() {
        assert_eq!(Facing::nearest(Vec3::new(0.2, 0.9, 0.1)), Facing::Up);
        assert_eq!(Facing::nearest(Vec3::new(-0.8, 0.1, 0.1)), Facing::West);
        assert_eq!(Facing::nearest(Vec3::ZERO), Facing::Down);
        // 45 degrees between UP and EAST: UP comes first in ordinal order
        assert_eq!(Facing::nearest(Vec3::new(1.0, 1.0, 0.0)), Facing::Up);
    }

    #[test]
    fn test_ordinals_match_order() {
        for (i, facing) in Facing::ALL.iter().enumerate() {
            assert_eq!(facing.ordinal(), i);
        }
    }
}
