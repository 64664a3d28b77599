//! Conversion of evaluation results into report documents

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec3;
use ltface_report::{
    BoxDoc, CacheSnapshotDoc, DecodedCornerDoc, FaceLocationDoc, FaceStateDoc, FaceStateSummaryDoc,
    FieldMismatchesDoc, FloatVecDoc, GroupDoc, IntVecDoc, OUTSIDE_NEIGHBOR_POLICY_AIR, PerFacing, PerState,
    ReportDocument, RuntimeInfo, StatsDoc, TileDoc, TransformPayloadDoc, TransformableCacheDoc,
    TransformableSummaryDoc,
};

use crate::diagnostics::{CacheDiagnostic, FaceLocation, FaceStateSummary, MismatchTally, TransformableDiagnostics};
use crate::face::{FaceEvaluation, FaceState};
use crate::model::Schema;
use crate::transform::CacheSnapshot;
use crate::transform::payload::{PayloadDiagnostics, indicator_bits, indicator_hex};

use super::evaluate::{BoxEvaluation, FileEvaluation, GroupEvaluation, TileEvaluation};

pub const EXPORTER: &str = "ltface";

/// Build the report for one evaluated input.
pub fn build_report(eval: &FileEvaluation, schema: Schema, input_path: &Path, output_path: &Path) -> ReportDocument {
    ReportDocument {
        generated_at_unix_ms: unix_millis(),
        schema: schema.as_str().to_string(),
        input_path: input_path.display().to_string(),
        output_path: output_path.display().to_string(),
        outside_neighbor_policy: OUTSIDE_NEIGHBOR_POLICY_AIR.to_string(),
        with_face_states: true,
        geometry_mode: eval.geometry_mode.id().to_string(),
        runtime: RuntimeInfo {
            exporter: EXPORTER.to_string(),
            exporter_version: env!("CARGO_PKG_VERSION").to_string(),
        },
        root: group_doc(&eval.root),
        stats: StatsDoc {
            groups: eval.stats.groups,
            tiles: eval.stats.tiles,
            boxes: eval.stats.boxes,
            transformable_boxes: eval.stats.transformable_boxes,
            faces_evaluated: eval.faces.total_faces,
            renderable_faces: eval.faces.renderable_faces,
        },
        face_state_summary: summary_doc(&eval.faces),
        transformable_diagnostics_summary: transformable_doc(&eval.transformables),
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn group_doc(group: &GroupEvaluation) -> GroupDoc {
    GroupDoc {
        path: group.path.clone(),
        grid: group.grid,
        structure_id: group.structure_id.clone(),
        tiles: group.tiles.iter().map(tile_doc).collect(),
        children: group.children.iter().map(group_doc).collect(),
    }
}

fn tile_doc(tile: &TileEvaluation) -> TileDoc {
    TileDoc {
        index: tile.index,
        block_state: tile.block_state.clone(),
        color: tile.color,
        boxes: tile.boxes.iter().map(box_doc).collect(),
    }
}

fn box_doc(b: &BoxEvaluation) -> BoxDoc {
    let [min_x, min_y, min_z, max_x, max_y, max_z] = b.tile_box.bounds().to_array();
    BoxDoc {
        index: b.index,
        kind: b.tile_box.kind().to_string(),
        min_x,
        min_y,
        min_z,
        max_x,
        max_y,
        max_z,
        array: b.tile_box.to_array(),
        transform_payload: b.payload.as_ref().map(payload_doc),
        face_states: b.faces.iter().map(face_doc).collect(),
    }
}

fn face_doc(face: &FaceEvaluation) -> FaceStateDoc {
    let state = face.state;
    FaceStateDoc {
        facing: face.facing.name().to_string(),
        state: state.name().to_string(),
        outside: state.outside(),
        covered_fully: state.covered_fully(),
        partially: state.partially(),
        renderable: state.renderable(),
        reason: face.reason.to_string(),
        filled_cells: face.filled_cells,
        total_cells: face.total_cells,
        evaluated_tiles: face.counters.evaluated_tiles,
        eligible_tiles: face.counters.eligible_tiles,
        eligible_solid_face_tiles: face.counters.eligible_solid_face_tiles,
        eligible_render_combined_only_tiles: face.counters.eligible_render_combined_only_tiles,
        skipped_no_collision_structure_tiles: face.counters.skipped_no_collision_structure_tiles,
        skipped_ineligible_tiles: face.counters.skipped_ineligible_tiles,
        transformable_cache: face.cache.as_ref().map(cache_doc),
    }
}

fn snapshot_doc(snapshot: &CacheSnapshot) -> CacheSnapshotDoc {
    CacheSnapshotDoc {
        axis_strip_count: snapshot.axis_strip_count,
        tilted_render_count: snapshot.tilted_render_count,
        has_axis_strip: snapshot.has_axis_strip,
        has_tilted_strip: snapshot.has_tilted_strip,
        is_completely_filled: snapshot.is_completely_filled,
    }
}

fn cache_doc(diagnostic: &CacheDiagnostic) -> TransformableCacheDoc {
    let current = &diagnostic.current;
    let fields = diagnostic.field_mismatches();
    TransformableCacheDoc {
        axis_strip_count: current.axis_strip_count,
        tilted_render_count: current.tilted_render_count,
        has_axis_strip: current.has_axis_strip,
        has_tilted_strip: current.has_tilted_strip,
        is_completely_filled: current.is_completely_filled,
        current: snapshot_doc(current),
        fresh: snapshot_doc(&diagnostic.fresh),
        current_vs_fresh_mismatch: fields.any(),
        field_mismatches: FieldMismatchesDoc {
            axis_strip_count: fields.axis_strip_count,
            tilted_render_count: fields.tilted_render_count,
            has_axis_strip: fields.has_axis_strip,
            has_tilted_strip: fields.has_tilted_strip,
            is_completely_filled: fields.is_completely_filled,
        },
        generate_face_current_null: diagnostic.generate_face_current_null,
        generate_face_fresh_null: diagnostic.generate_face_fresh_null,
        generate_face_null_mismatch: diagnostic.generate_face_null_mismatch(),
        set_current_result: diagnostic.set_current_result,
        set_fresh_result: diagnostic.set_fresh_result,
        set_result_mismatch: diagnostic.set_result_mismatch(),
    }
}

fn float_vec(v: Vec3) -> FloatVecDoc {
    FloatVecDoc { x: v.x, y: v.y, z: v.z }
}

fn payload_doc(payload: &PayloadDiagnostics) -> TransformPayloadDoc {
    let [down, up, north, south, west, east] = payload.flipped;
    TransformPayloadDoc {
        indicator_signed: payload.indicator,
        indicator_unsigned_hex: indicator_hex(payload.indicator),
        indicator_unsigned_bits: indicator_bits(payload.indicator),
        flip_bits_by_facing: PerFacing { down, up, north, south, west, east },
        transform_payload_int_count: payload.payload_int_count,
        transform_data_word_count: payload.data_word_count,
        active_short_count_from_indicator: payload.active_short_count,
        packed_short_capacity_from_words: payload.packed_short_capacity,
        active_short_count_exceeds_packed_capacity: payload.exceeds_capacity(),
        decoded_corners: payload
            .corners
            .iter()
            .map(|c| DecodedCornerDoc {
                corner: c.corner.name().to_string(),
                index: c.corner.index(),
                base: IntVecDoc { x: c.base.x, y: c.base.y, z: c.base.z },
                transformed: float_vec(c.transformed),
                delta: float_vec(c.delta()),
            })
            .collect(),
    }
}

fn summary_doc(summary: &FaceStateSummary) -> FaceStateSummaryDoc {
    let [down, up, north, south, west, east] = summary.by_facing;
    FaceStateSummaryDoc {
        total_faces: summary.total_faces,
        renderable_faces: summary.renderable_faces,
        inside_faces: summary.inside_faces,
        outside_faces: summary.outside_faces,
        by_state: PerState {
            unloaded: summary.count(FaceState::Unloaded),
            outside_uncovered: summary.count(FaceState::OutsideUncovered),
            inside_uncovered: summary.count(FaceState::InsideUncovered),
            inside_partially_covered: summary.count(FaceState::InsidePartiallyCovered),
            inside_covered: summary.count(FaceState::InsideCovered),
        },
        by_facing: PerFacing { down, up, north, south, west, east },
        by_reason: summary
            .by_reason
            .iter()
            .map(|(reason, &count)| (reason.to_string(), count))
            .collect(),
    }
}

fn location_doc(location: &FaceLocation) -> FaceLocationDoc {
    FaceLocationDoc {
        path: location.path.clone(),
        tile_index: location.tile_index,
        box_index: location.box_index,
        facing: location.facing.name().to_string(),
    }
}

fn samples(tally: &MismatchTally) -> Vec<FaceLocationDoc> {
    tally.samples.iter().map(location_doc).collect()
}

fn transformable_doc(diag: &TransformableDiagnostics) -> TransformableSummaryDoc {
    TransformableSummaryDoc {
        transformable_faces_evaluated: diag.faces_evaluated,
        current_vs_fresh_cache_mismatch_faces: diag.cache.count,
        generate_face_current_vs_fresh_mismatch_faces: diag.generate_face.count,
        set_current_vs_fresh_mismatch_faces: diag.set.count,
        cache_mismatch_samples: samples(&diag.cache),
        generate_face_mismatch_samples: samples(&diag.generate_face),
        set_mismatch_samples: samples(&diag.set),
    }
}
