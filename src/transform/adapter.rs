//! Current-vs-fresh view of a transformable box's face cache

use crate::diagnostics::CacheDiagnostic;
use crate::face::footprint::{Footprint, write_back_transformable};
use crate::model::{Facing, TransformableBox};

use super::cache::FaceCacheTable;

/// Compare the memoized cache of `tbox` with one rebuilt from scratch.
///
/// `current` reads (and on first use fills) the shared table. `fresh` runs
/// against a clone of the box with its own empty table, so the shared table
/// is never touched by the rebuild.
pub fn diagnose(tbox: &TransformableBox, facing: Facing, grid: u32, caches: &mut FaceCacheTable) -> CacheDiagnostic {
    let current = caches.request(tbox).get(facing).snapshot();

    let copy = tbox.clone();
    let mut scratch = FaceCacheTable::new();
    let fresh = scratch.request(&copy).get(facing).snapshot();

    let diagnostic = CacheDiagnostic {
        current,
        fresh,
        generate_face_current_null: Footprint::for_transformable(tbox, facing, grid, caches).is_none(),
        generate_face_fresh_null: Footprint::for_transformable(&copy, facing, grid, &mut scratch).is_none(),
        set_current_result: write_back_transformable(tbox, facing, grid, caches),
        set_fresh_result: write_back_transformable(&copy, facing, grid, &mut scratch),
    };

    if diagnostic.any_mismatch() {
        log::warn!("Stale face cache for box {:?} facing {}", tbox.id, facing.name());
    }
    diagnostic
}
