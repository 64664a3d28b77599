//! Report document definitions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One exported file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub generated_at_unix_ms: u64,
    /// `"current"` or `"legacy"`.
    pub schema: String,
    pub input_path: String,
    pub output_path: String,
    pub outside_neighbor_policy: String,
    pub with_face_states: bool,
    /// `"client"` or `"server"`.
    pub geometry_mode: String,
    pub runtime: RuntimeInfo,
    pub root: GroupDoc,
    pub stats: StatsDoc,
    pub face_state_summary: FaceStateSummaryDoc,
    pub transformable_diagnostics_summary: TransformableSummaryDoc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeInfo {
    pub exporter: String,
    pub exporter_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDoc {
    /// `root`, `root.children[0]`, `root.children[0].children[2]`, ...
    pub path: String,
    pub grid: u32,
    pub structure_id: Option<String>,
    pub tiles: Vec<TileDoc>,
    pub children: Vec<GroupDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileDoc {
    pub index: usize,
    pub block_state: String,
    pub color: i32,
    pub boxes: Vec<BoxDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxDoc {
    pub index: usize,
    /// `"aabb"` or `"transformable"`.
    pub kind: String,
    pub min_x: i32,
    pub min_y: i32,
    pub min_z: i32,
    pub max_x: i32,
    pub max_y: i32,
    pub max_z: i32,
    pub array: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub transform_payload: Option<TransformPayloadDoc>,
    pub face_states: Vec<FaceStateDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceStateDoc {
    pub facing: String,
    pub state: String,
    pub outside: bool,
    pub covered_fully: bool,
    pub partially: bool,
    pub renderable: bool,
    pub reason: String,
    pub filled_cells: usize,
    pub total_cells: usize,
    pub evaluated_tiles: usize,
    pub eligible_tiles: usize,
    pub eligible_solid_face_tiles: usize,
    pub eligible_render_combined_only_tiles: usize,
    pub skipped_no_collision_structure_tiles: usize,
    pub skipped_ineligible_tiles: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub transformable_cache: Option<TransformableCacheDoc>,
}

/// Snapshot of one facing's tilted-box cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSnapshotDoc {
    pub axis_strip_count: usize,
    pub tilted_render_count: usize,
    pub has_axis_strip: bool,
    pub has_tilted_strip: bool,
    pub is_completely_filled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMismatchesDoc {
    pub axis_strip_count: bool,
    pub tilted_render_count: bool,
    pub has_axis_strip: bool,
    pub has_tilted_strip: bool,
    pub is_completely_filled: bool,
}

/// Current-vs-fresh comparison attached to faces of transformable boxes.
///
/// The top-level snapshot fields mirror `current`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformableCacheDoc {
    pub axis_strip_count: usize,
    pub tilted_render_count: usize,
    pub has_axis_strip: bool,
    pub has_tilted_strip: bool,
    pub is_completely_filled: bool,
    pub current: CacheSnapshotDoc,
    pub fresh: CacheSnapshotDoc,
    pub current_vs_fresh_mismatch: bool,
    pub field_mismatches: FieldMismatchesDoc,
    pub generate_face_current_null: bool,
    pub generate_face_fresh_null: bool,
    pub generate_face_null_mismatch: bool,
    pub set_current_result: bool,
    pub set_fresh_result: bool,
    pub set_result_mismatch: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformPayloadDoc {
    pub indicator_signed: i32,
    pub indicator_unsigned_hex: String,
    pub indicator_unsigned_bits: String,
    pub flip_bits_by_facing: PerFacing<bool>,
    pub transform_payload_int_count: usize,
    pub transform_data_word_count: usize,
    pub active_short_count_from_indicator: u32,
    pub packed_short_capacity_from_words: usize,
    pub active_short_count_exceeds_packed_capacity: bool,
    pub decoded_corners: Vec<DecodedCornerDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedCornerDoc {
    pub corner: String,
    pub index: usize,
    pub base: IntVecDoc,
    pub transformed: FloatVecDoc,
    pub delta: FloatVecDoc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntVecDoc {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatVecDoc {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A value per facing, serialized in facing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct PerFacing<T> {
    pub down: T,
    pub up: T,
    pub north: T,
    pub south: T,
    pub west: T,
    pub east: T,
}

/// Count per face state, serialized in state order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PerState {
    pub unloaded: usize,
    pub outside_uncovered: usize,
    pub inside_uncovered: usize,
    pub inside_partially_covered: usize,
    pub inside_covered: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDoc {
    pub groups: usize,
    pub tiles: usize,
    pub boxes: usize,
    pub transformable_boxes: usize,
    pub faces_evaluated: usize,
    pub renderable_faces: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceStateSummaryDoc {
    pub total_faces: usize,
    pub renderable_faces: usize,
    pub inside_faces: usize,
    pub outside_faces: usize,
    pub by_state: PerState,
    pub by_facing: PerFacing<usize>,
    /// Sorted by reason tag.
    pub by_reason: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformableSummaryDoc {
    pub transformable_faces_evaluated: usize,
    pub current_vs_fresh_cache_mismatch_faces: usize,
    pub generate_face_current_vs_fresh_mismatch_faces: usize,
    pub set_current_vs_fresh_mismatch_faces: usize,
    pub cache_mismatch_samples: Vec<FaceLocationDoc>,
    pub generate_face_mismatch_samples: Vec<FaceLocationDoc>,
    pub set_mismatch_samples: Vec<FaceLocationDoc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceLocationDoc {
    pub path: String,
    pub tile_index: usize,
    pub box_index: usize,
    pub facing: String,
}
