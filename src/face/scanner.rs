//! Whole-tree coverage scan for one face

use crate::math::polygon;
use crate::model::{Tile, TileBox, TileRef};
use crate::transform::FaceCacheTable;

use super::footprint::Footprint;

/// How the candidate tiles of one scan were treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanCounters {
    pub evaluated_tiles: usize,
    pub eligible_tiles: usize,
    pub eligible_solid_face_tiles: usize,
    pub eligible_render_combined_only_tiles: usize,
    pub skipped_no_collision_structure_tiles: usize,
    pub skipped_ineligible_tiles: usize,
}

/// Fill `footprint` from every eligible tile of `tiles`, in order.
///
/// A tile is eligible when it provides a solid face or renders combined with
/// `subject`; tiles of non-colliding structures are skipped first.
pub fn scan_coverage(
    footprint: &mut Footprint,
    subject: &Tile,
    tiles: &[TileRef<'_>],
    caches: &mut FaceCacheTable,
) -> ScanCounters {
    let mut counters = ScanCounters::default();

    for candidate in tiles {
        counters.evaluated_tiles += 1;

        if candidate.group.non_colliding {
            counters.skipped_no_collision_structure_tiles += 1;
            continue;
        }

        let solid = candidate.tile.provides_solid_face;
        let combined = candidate.tile.can_be_render_combined(subject);
        if !(solid || combined) {
            counters.skipped_ineligible_tiles += 1;
            continue;
        }

        counters.eligible_tiles += 1;
        if solid {
            counters.eligible_solid_face_tiles += 1;
        } else {
            counters.eligible_render_combined_only_tiles += 1;
        }

        for tile_box in &candidate.tile.boxes {
            fill_from_box(footprint, tile_box, candidate.group.grid, caches);
        }
    }

    counters
}

/// `a / b` rounded down, for `b > 0`
fn floor_div(a: i64, b: i64) -> i64 {
    a.div_euclid(b)
}

/// `a / b` rounded up, for `b > 0`
fn ceil_div(a: i64, b: i64) -> i64 {
    -(-a).div_euclid(b)
}

/// Mark the footprint cells covered by `candidate`'s face touching the plane.
///
/// The candidate may live on another grid; only cells it covers completely
/// are marked.
pub fn fill_from_box(footprint: &mut Footprint, candidate: &TileBox, candidate_grid: u32, caches: &mut FaceCacheTable) {
    let facing = footprint.facing();
    let bounds = candidate.bounds();
    let face_grid = i64::from(footprint.grid());
    let cand_grid = i64::from(candidate_grid);
    if face_grid == 0 || cand_grid == 0 {
        return;
    }

    let touching = i64::from(bounds.face_origin(facing.opposite()));
    if touching * face_grid != i64::from(footprint.origin()) * cand_grid {
        return;
    }

    let (one, two) = (facing.one(), facing.two());
    let (face_min_one, face_max_one) = footprint.one_range();
    let (face_min_two, face_max_two) = footprint.two_range();
    let to_face = |value: i32, round_up: bool| {
        let scaled = i64::from(value) * face_grid;
        if round_up { ceil_div(scaled, cand_grid) } else { floor_div(scaled, cand_grid) }
    };

    let start_one = to_face(bounds.min(one), true).max(i64::from(face_min_one)) as i32;
    let end_one = to_face(bounds.max(one), false).min(i64::from(face_max_one)) as i32;
    let start_two = to_face(bounds.min(two), true).max(i64::from(face_min_two)) as i32;
    let end_two = to_face(bounds.max(two), false).min(i64::from(face_max_two)) as i32;
    if end_one <= start_one || end_two <= start_two {
        return;
    }

    let strips = match candidate {
        TileBox::Axis(_) => None,
        TileBox::Transformable(tbox) => {
            let cache = caches.request(tbox).get(facing.opposite());
            if cache.is_completely_filled {
                None
            } else if cache.axis_strips.is_empty() {
                return;
            } else {
                Some(cache.axis_strips.clone())
            }
        }
    };

    let scale = cand_grid as f32 / face_grid as f32;
    for cell_one in start_one..end_one {
        for cell_two in start_two..end_two {
            let covered = match &strips {
                None => true,
                Some(strips) => {
                    let corners = [
                        (cell_one, cell_two),
                        (cell_one + 1, cell_two),
                        (cell_one, cell_two + 1),
                        (cell_one + 1, cell_two + 1),
                    ]
                    .map(|(u, v)| (u as f32 * scale, v as f32 * scale));
                    strips.iter().any(|strip| {
                        corners
                            .iter()
                            .all(|&point| polygon::contains_2d(strip, one, two, point))
                    })
                }
            };
            if covered {
                footprint.fill(cell_one, cell_two);
            }
        }
    }
}
