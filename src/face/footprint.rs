//! 2D coverage grid of one box face

use crate::math::{GridBox, polygon};
use crate::model::{Facing, TileBox, TransformableBox};
use crate::transform::FaceCacheTable;

/// Face plane coordinate lies on or beyond the block boundary.
pub fn is_outside_origin(origin: i32, grid: u32) -> bool {
    !(origin > 0 && i64::from(origin) < i64::from(grid))
}

/// Cells of one face over its two in-face axes, in grid units.
///
/// Cell `(one, two)` covers `[one, one+1) x [two, two+1)` in absolute grid
/// coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Footprint {
    facing: Facing,
    grid: u32,
    origin: i32,
    min_one: i32,
    max_one: i32,
    min_two: i32,
    max_two: i32,
    /// Row-major over `one`
    filled: Vec<bool>,
}

impl Footprint {
    /// Empty footprint for `facing` of `tile_box`.
    ///
    /// `None` means the face cannot be resolved: the face has no area, or the
    /// box is transformable and its cache holds no axis strip for `facing`.
    pub fn generate(tile_box: &TileBox, facing: Facing, grid: u32, caches: &mut FaceCacheTable) -> Option<Self> {
        match tile_box {
            TileBox::Axis(bounds) => Self::for_bounds(bounds, facing, grid),
            TileBox::Transformable(tbox) => Self::for_transformable(tbox, facing, grid, caches),
        }
    }

    pub fn for_transformable(
        tbox: &TransformableBox,
        facing: Facing,
        grid: u32,
        caches: &mut FaceCacheTable,
    ) -> Option<Self> {
        if !caches.request(tbox).get(facing).has_axis_strip() {
            return None;
        }
        Self::for_bounds(&tbox.bounds, facing, grid)
    }

    fn for_bounds(bounds: &GridBox, facing: Facing, grid: u32) -> Option<Self> {
        let (one, two) = (facing.one(), facing.two());
        let cells = bounds.span(one) as usize * bounds.span(two) as usize;
        if cells == 0 {
            return None;
        }
        Some(Self {
            facing,
            grid,
            origin: bounds.face_origin(facing),
            min_one: bounds.min(one),
            max_one: bounds.max(one),
            min_two: bounds.min(two),
            max_two: bounds.max(two),
            filled: vec![false; cells],
        })
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn grid(&self) -> u32 {
        self.grid
    }

    /// Plane coordinate along the facing axis
    pub fn origin(&self) -> i32 {
        self.origin
    }

    pub fn one_range(&self) -> (i32, i32) {
        (self.min_one, self.max_one)
    }

    pub fn two_range(&self) -> (i32, i32) {
        (self.min_two, self.max_two)
    }

    fn span_two(&self) -> usize {
        (self.max_two - self.min_two) as usize
    }

    pub fn total_cells(&self) -> usize {
        self.filled.len()
    }

    pub fn is_outside(&self) -> bool {
        is_outside_origin(self.origin, self.grid)
    }

    /// Mark the cell at absolute coordinates; out-of-range cells are ignored.
    pub fn fill(&mut self, one: i32, two: i32) {
        if one < self.min_one || one >= self.max_one || two < self.min_two || two >= self.max_two {
            return;
        }
        let index = (one - self.min_one) as usize * self.span_two() + (two - self.min_two) as usize;
        self.filled[index] = true;
    }

    pub fn is_cell_filled(&self, one: i32, two: i32) -> bool {
        if one < self.min_one || one >= self.max_one || two < self.min_two || two >= self.max_two {
            return false;
        }
        self.filled[(one - self.min_one) as usize * self.span_two() + (two - self.min_two) as usize]
    }

    pub fn filled_cells(&self) -> usize {
        self.filled.iter().filter(|&&cell| cell).count()
    }

    pub fn is_filled(&self) -> bool {
        self.filled.iter().all(|&cell| cell)
    }

    pub fn is_partially_filled(&self) -> bool {
        self.filled.iter().any(|&cell| cell)
    }
}

/// Try to write the face geometry back into the box.
///
/// Axis boxes accept any resolvable face. Transformable boxes additionally
/// need a cached axis strip on the face plane, or a completely filled face.
pub fn write_back(tile_box: &TileBox, facing: Facing, grid: u32, caches: &mut FaceCacheTable) -> bool {
    match tile_box {
        TileBox::Axis(bounds) => Footprint::for_bounds(bounds, facing, grid).is_some(),
        TileBox::Transformable(tbox) => write_back_transformable(tbox, facing, grid, caches),
    }
}

pub fn write_back_transformable(
    tbox: &TransformableBox,
    facing: Facing,
    grid: u32,
    caches: &mut FaceCacheTable,
) -> bool {
    if Footprint::for_transformable(tbox, facing, grid, caches).is_none() {
        return false;
    }
    let origin = tbox.bounds.face_origin(facing) as f32;
    let cache = caches.request(tbox).get(facing);
    cache.is_completely_filled
        || cache
            .axis_strips
            .iter()
            .any(|strip| polygon::lies_on_axis_plane(strip, facing.axis(), origin))
}
