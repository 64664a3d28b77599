//! Cache consistency diagnostic and bounded mismatch sampling

use crate::model::Facing;
use crate::transform::CacheSnapshot;

/// Samples kept per mismatch class and report
pub const SAMPLE_LIMIT: usize = 16;

/// Current vs freshly rebuilt cache state for one face of a transformable box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheDiagnostic {
    pub current: CacheSnapshot,
    pub fresh: CacheSnapshot,
    pub generate_face_current_null: bool,
    pub generate_face_fresh_null: bool,
    pub set_current_result: bool,
    pub set_fresh_result: bool,
}

/// Which snapshot fields differ between current and fresh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldMismatches {
    pub axis_strip_count: bool,
    pub tilted_render_count: bool,
    pub has_axis_strip: bool,
    pub has_tilted_strip: bool,
    pub is_completely_filled: bool,
}

impl FieldMismatches {
    pub fn any(&self) -> bool {
        self.axis_strip_count
            || self.tilted_render_count
            || self.has_axis_strip
            || self.has_tilted_strip
            || self.is_completely_filled
    }
}

impl CacheDiagnostic {
    pub fn field_mismatches(&self) -> FieldMismatches {
        let (a, b) = (&self.current, &self.fresh);
        FieldMismatches {
            axis_strip_count: a.axis_strip_count != b.axis_strip_count,
            tilted_render_count: a.tilted_render_count != b.tilted_render_count,
            has_axis_strip: a.has_axis_strip != b.has_axis_strip,
            has_tilted_strip: a.has_tilted_strip != b.has_tilted_strip,
            is_completely_filled: a.is_completely_filled != b.is_completely_filled,
        }
    }

    pub fn current_vs_fresh_mismatch(&self) -> bool {
        self.field_mismatches().any()
    }

    pub fn generate_face_null_mismatch(&self) -> bool {
        self.generate_face_current_null != self.generate_face_fresh_null
    }

    pub fn set_result_mismatch(&self) -> bool {
        self.set_current_result != self.set_fresh_result
    }

    /// Any of the seven comparisons differs
    pub fn any_mismatch(&self) -> bool {
        self.current_vs_fresh_mismatch() || self.generate_face_null_mismatch() || self.set_result_mismatch()
    }
}

/// Where a face sits in the report tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceLocation {
    /// Group path, e.g. `root.children[1]`
    pub path: String,
    pub tile_index: usize,
    pub box_index: usize,
    pub facing: Facing,
}

/// Count of one mismatch class plus its first [`SAMPLE_LIMIT`] locations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MismatchTally {
    pub count: usize,
    pub samples: Vec<FaceLocation>,
}

impl MismatchTally {
    /// Count a mismatch; `location` is only built while samples remain.
    pub fn record(&mut self, location: impl FnOnce() -> FaceLocation) {
        self.count += 1;
        if self.samples.len() < SAMPLE_LIMIT {
            self.samples.push(location());
        }
    }
}

/// Per-file totals of the cache diagnostic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransformableDiagnostics {
    pub faces_evaluated: usize,
    pub cache: MismatchTally,
    pub generate_face: MismatchTally,
    pub set: MismatchTally,
}

impl TransformableDiagnostics {
    pub fn record(&mut self, diagnostic: &CacheDiagnostic, location: impl Fn() -> FaceLocation) {
        self.faces_evaluated += 1;
        if diagnostic.current_vs_fresh_mismatch() {
            self.cache.record(&location);
        }
        if diagnostic.generate_face_null_mismatch() {
            self.generate_face.record(&location);
        }
        if diagnostic.set_result_mismatch() {
            self.set.record(&location);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(axis_strip_count: usize) -> CacheSnapshot {
        CacheSnapshot {
            axis_strip_count,
            tilted_render_count: 0,
            has_axis_strip: axis_strip_count > 0,
            has_tilted_strip: false,
            is_completely_filled: axis_strip_count == 1,
        }
    }

    fn diagnostic(current: CacheSnapshot, fresh: CacheSnapshot) -> CacheDiagnostic {
        CacheDiagnostic {
            current,
            fresh,
            generate_face_current_null: false,
            generate_face_fresh_null: false,
            set_current_result: true,
            set_fresh_result: true,
        }
    }

    fn location(i: usize) -> FaceLocation {
        FaceLocation {
            path: "root".to_string(),
            tile_index: i,
            box_index: 0,
            facing: Facing::Up,
        }
    }

    #[test]
    fn test_identical_snapshots_do_not_mismatch() {
        let d = diagnostic(snapshot(1), snapshot(1));
        assert!(!d.any_mismatch());
        assert_eq!(d.field_mismatches(), FieldMismatches::default());
    }

    #[test]
    fn test_each_field_mismatch() {
        let d = diagnostic(snapshot(2), snapshot(1));
        let fields = d.field_mismatches();
        assert!(fields.axis_strip_count);
        assert!(!fields.has_axis_strip);
        assert!(fields.is_completely_filled);
        assert!(d.current_vs_fresh_mismatch());
        assert!(!d.generate_face_null_mismatch());
    }

    #[test]
    fn test_probe_mismatches_alone() {
        let mut d = diagnostic(snapshot(1), snapshot(1));
        d.set_fresh_result = false;
        assert!(d.set_result_mismatch());
        assert!(!d.current_vs_fresh_mismatch());
        assert!(d.any_mismatch());

        let mut d = diagnostic(snapshot(1), snapshot(1));
        d.generate_face_fresh_null = true;
        assert!(d.generate_face_null_mismatch());
        assert!(d.any_mismatch());
    }

    #[test]
    fn test_sample_cap() {
        let mut tally = MismatchTally::default();
        for i in 0..50 {
            tally.record(|| location(i));
        }
        assert_eq!(tally.count, 50);
        assert_eq!(tally.samples.len(), SAMPLE_LIMIT);
        assert_eq!(tally.samples[15].tile_index, 15);
    }

    #[test]
    fn test_classes_sampled_independently() {
        let mut diagnostics = TransformableDiagnostics::default();
        let mut only_set = diagnostic(snapshot(1), snapshot(1));
        only_set.set_current_result = false;
        for i in 0..20 {
            diagnostics.record(&only_set, || location(i));
        }
        diagnostics.record(&diagnostic(snapshot(0), snapshot(1)), || location(99));

        assert_eq!(diagnostics.faces_evaluated, 21);
        assert_eq!(diagnostics.set.count, 20);
        assert_eq!(diagnostics.set.samples.len(), SAMPLE_LIMIT);
        assert_eq!(diagnostics.cache.count, 1);
        assert_eq!(diagnostics.cache.samples[0].tile_index, 99);
        assert_eq!(diagnostics.generate_face.count, 0);
    }
}
