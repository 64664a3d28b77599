//! Boxes owned by tiles: axis-aligned or transformable

use thiserror::Error;

use crate::math::GridBox;

/// Largest accepted box coordinate magnitude, in grid units
pub const MAX_COORDINATE: i32 = 1 << 12;

/// Identity of a transformable box inside one tile tree.
///
/// Assigned in tree pre-order by [`super::TileTree::new`]; keys the face cache
/// side table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxId(pub u32);

/// A tilted box: integer bounds plus an indicator and packed corner offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformableBox {
    pub id: BoxId,
    pub bounds: GridBox,
    /// `data[0]` is the indicator, the remaining words hold packed shorts.
    pub data: Vec<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TileBox {
    Axis(GridBox),
    Transformable(TransformableBox),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoxArrayError {
    #[error("invalid box array length {0}")]
    TooShort(usize),

    #[error("unsupported box encoding length {0}")]
    UnsupportedLength(usize),

    #[error("invalid box bounds [{},{},{}] -> [{},{},{}]", .0[0], .0[1], .0[2], .0[3], .0[4], .0[5])]
    InvalidBounds([i32; 6]),

    #[error("box coordinate {0} outside [-{max}, {max}]", max = MAX_COORDINATE)]
    CoordinateOutOfRange(i32),
}

impl TileBox {
    /// Decode a serialized box array.
    ///
    /// Six ints are an axis box. Longer arrays with a negative seventh entry
    /// are transformable; lengths 7 and 11 with a non-negative seventh entry
    /// are old slice encodings and read as axis boxes.
    pub fn from_array(array: &[i32]) -> Result<Self, BoxArrayError> {
        if array.len() < 6 {
            return Err(BoxArrayError::TooShort(array.len()));
        }

        let mut head = [0i32; 6];
        head.copy_from_slice(&array[..6]);
        let bounds = GridBox::from_array(&head);

        let transformable = array.len() > 6 && array[6] < 0;
        if array.len() != 6 && !transformable && array.len() != 7 && array.len() != 11 {
            return Err(BoxArrayError::UnsupportedLength(array.len()));
        }
        if let Some(&value) = head.iter().find(|v| v.unsigned_abs() > MAX_COORDINATE as u32) {
            return Err(BoxArrayError::CoordinateOutOfRange(value));
        }
        // Zero-thickness boxes are kept; their flat faces classify as unloaded
        if !bounds.is_ordered() {
            return Err(BoxArrayError::InvalidBounds(head));
        }

        if transformable {
            Ok(TileBox::Transformable(TransformableBox {
                id: BoxId::default(),
                bounds,
                data: array[6..].to_vec(),
            }))
        } else {
            Ok(TileBox::Axis(bounds))
        }
    }

    pub fn bounds(&self) -> &GridBox {
        match self {
            TileBox::Axis(bounds) => bounds,
            TileBox::Transformable(t) => &t.bounds,
        }
    }

    /// Serialized form (bounds followed by transform data, if any)
    pub fn to_array(&self) -> Vec<i32> {
        let mut out = self.bounds().to_array().to_vec();
        if let TileBox::Transformable(t) = self {
            out.extend_from_slice(&t.data);
        }
        out
    }

    /// `"aabb"` or `"transformable"`
    pub fn kind(&self) -> &'static str {
        match self {
            TileBox::Axis(_) => "aabb",
            TileBox::Transformable(_) => "transformable",
        }
    }

    pub fn as_transformable(&self) -> Option<&TransformableBox> {
        match self {
            TileBox::Transformable(t) => Some(t),
            TileBox::Axis(_) => None,
        }
    }

    pub fn is_transformable(&self) -> bool {
        matches!(self, TileBox::Transformable(_))
    }
}
