//! Per-file traversal: classify every face of every box in a tree

use crate::diagnostics::{Aggregator, FaceStateSummary, TransformableDiagnostics, TreeStats};
use crate::face::{FaceEvaluation, GeometryMode, evaluate_face};
use crate::model::{Facing, Group, TileBox, TileRef, TileTree};
use crate::transform::{FaceCacheTable, PayloadDiagnostics};

/// Everything computed for one input tree.
#[derive(Clone, Debug)]
pub struct FileEvaluation {
    pub geometry_mode: GeometryMode,
    pub root: GroupEvaluation,
    pub stats: TreeStats,
    pub faces: FaceStateSummary,
    pub transformables: TransformableDiagnostics,
}

#[derive(Clone, Debug)]
pub struct GroupEvaluation {
    pub path: String,
    pub grid: u32,
    pub structure_id: Option<String>,
    pub tiles: Vec<TileEvaluation>,
    pub children: Vec<GroupEvaluation>,
}

#[derive(Clone, Debug)]
pub struct TileEvaluation {
    pub index: usize,
    pub block_state: String,
    pub color: i32,
    pub boxes: Vec<BoxEvaluation>,
}

#[derive(Clone, Debug)]
pub struct BoxEvaluation {
    pub index: usize,
    pub tile_box: TileBox,
    pub payload: Option<PayloadDiagnostics>,
    /// One entry per facing, in facing order
    pub faces: Vec<FaceEvaluation>,
}

impl FileEvaluation {
    pub fn renderable_faces(&self) -> usize {
        self.faces.renderable_faces
    }
}

/// Evaluate `tree` with a fresh face cache table.
pub fn evaluate_tree(tree: &TileTree, mode: GeometryMode) -> FileEvaluation {
    let mut caches = FaceCacheTable::new();
    evaluate_tree_with_cache(tree, mode, &mut caches)
}

/// Evaluate `tree` against an existing cache table.
///
/// Entries already in `caches` are treated as the memoized state of their
/// boxes, so stale entries surface in the transformable diagnostics.
pub fn evaluate_tree_with_cache(tree: &TileTree, mode: GeometryMode, caches: &mut FaceCacheTable) -> FileEvaluation {
    let tiles = tree.tiles();
    let mut aggregator = Aggregator::new();

    let root = evaluate_group(tree.root(), "root".to_string(), &tiles, mode, caches, &mut aggregator);

    log::debug!(
        "Evaluated {} groups, {} tiles, {} boxes: {} faces, {} renderable",
        aggregator.stats.groups,
        aggregator.stats.tiles,
        aggregator.stats.boxes,
        aggregator.faces.total_faces,
        aggregator.faces.renderable_faces
    );

    FileEvaluation {
        geometry_mode: mode,
        root,
        stats: aggregator.stats,
        faces: aggregator.faces,
        transformables: aggregator.transformables,
    }
}

fn evaluate_group(
    group: &Group,
    path: String,
    tiles: &[TileRef<'_>],
    mode: GeometryMode,
    caches: &mut FaceCacheTable,
    aggregator: &mut Aggregator,
) -> GroupEvaluation {
    aggregator.stats.groups += 1;

    let mut tile_evaluations = Vec::with_capacity(group.tiles.len());
    for (tile_index, tile) in group.tiles.iter().enumerate() {
        aggregator.stats.tiles += 1;
        let subject = TileRef { group, tile };

        let mut boxes = Vec::with_capacity(tile.boxes.len());
        for (box_index, tile_box) in tile.boxes.iter().enumerate() {
            aggregator.stats.boxes += 1;
            if tile_box.is_transformable() {
                aggregator.stats.transformable_boxes += 1;
            }

            let faces: Vec<FaceEvaluation> = Facing::ALL
                .iter()
                .map(|&facing| {
                    let face = evaluate_face(subject, tile_box, facing, tiles, mode, caches);
                    aggregator.record_face(&path, tile_index, box_index, &face);
                    face
                })
                .collect();

            boxes.push(BoxEvaluation {
                index: box_index,
                tile_box: tile_box.clone(),
                payload: tile_box.as_transformable().map(|tbox| tbox.payload_diagnostics()),
                faces,
            });
        }

        tile_evaluations.push(TileEvaluation {
            index: tile_index,
            block_state: tile.block_state.clone(),
            color: tile.color,
            boxes,
        });
    }

    let children = group
        .children
        .iter()
        .enumerate()
        .map(|(i, child)| evaluate_group(child, format!("{path}.children[{i}]"), tiles, mode, caches, aggregator))
        .collect();

    GroupEvaluation {
        path,
        grid: group.grid,
        structure_id: group.structure_id.clone(),
        tiles: tile_evaluations,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::SAMPLE_LIMIT;
    use crate::face::FaceState;
    use crate::model::{BoxId, Tile};
    use crate::transform::BoxFaceCache;
    use crate::transform::cache::tests::{FLAT_INDICATOR, ramp};

    fn aabb(bounds: [i32; 6]) -> TileBox {
        TileBox::from_array(&bounds).unwrap()
    }

    fn stone(boxes: Vec<TileBox>) -> Tile {
        Tile::new("minecraft:stone", -1).with_boxes(boxes)
    }

    fn flat_box(x: i32) -> TileBox {
        let mut array = vec![x, 0, 0, x + 1, 1, 1];
        array.push(FLAT_INDICATOR);
        TileBox::from_array(&array).unwrap()
    }

    fn face(eval: &FileEvaluation, path: &[usize], tile: usize, facing: Facing) -> FaceEvaluation {
        let mut group = &eval.root;
        for &i in path {
            group = &group.children[i];
        }
        group.tiles[tile].boxes[0].faces[facing.ordinal()].clone()
    }

    #[test]
    fn test_single_cube_server() {
        let tree = TileTree::new(Group::new(16).with_tile(stone(vec![aabb([0, 0, 0, 16, 16, 16])])));
        let eval = evaluate_tree(&tree, GeometryMode::Server);

        assert_eq!(eval.faces.total_faces, 6);
        assert_eq!(eval.faces.outside_faces, 6);
        assert_eq!(eval.faces.count(FaceState::OutsideUncovered), 6);
        for facing in Facing::ALL {
            let f = face(&eval, &[], 0, facing);
            assert_eq!((f.filled_cells, f.total_cells), (0, 256));
        }
        assert_eq!(eval.transformables.faces_evaluated, 0);
        assert_eq!(eval.stats, TreeStats { groups: 1, tiles: 1, boxes: 1, transformable_boxes: 0 });
    }

    #[test]
    fn test_adjacent_half_blocks() {
        let tree = TileTree::new(
            Group::new(16)
                .with_tile(stone(vec![aabb([0, 0, 0, 8, 16, 16])]))
                .with_tile(stone(vec![aabb([8, 0, 0, 16, 16, 16])])),
        );
        let eval = evaluate_tree(&tree, GeometryMode::Client);

        let east = face(&eval, &[], 0, Facing::East);
        assert_eq!(east.state, FaceState::InsideCovered);
        assert_eq!((east.filled_cells, east.total_cells), (256, 256));
        let west = face(&eval, &[], 1, Facing::West);
        assert_eq!(west.state, FaceState::InsideCovered);

        assert_eq!(eval.faces.count(FaceState::InsideCovered), 2);
        assert_eq!(eval.faces.count(FaceState::OutsideUncovered), 10);
        assert_eq!(eval.faces.renderable_faces, 10);
        assert_eq!(eval.faces.by_reason["inside_covered"], 2);
    }

    #[test]
    fn test_non_colliding_group_never_covers() {
        let mut child = Group::new(16).with_tile(stone(vec![aabb([8, 0, 0, 16, 16, 16])]));
        child.structure_id = Some("noclip".to_string());
        child.non_colliding = true;
        let tree = TileTree::new(
            Group::new(16)
                .with_tile(stone(vec![aabb([0, 0, 0, 8, 16, 16])]))
                .with_child(child),
        );
        let eval = evaluate_tree(&tree, GeometryMode::Client);

        let east = face(&eval, &[], 0, Facing::East);
        assert_eq!(east.state, FaceState::InsideUncovered);
        assert_eq!(east.counters.skipped_no_collision_structure_tiles, 1);

        // the non-colliding tile itself is still covered by the root tile
        let west = face(&eval, &[0], 0, Facing::West);
        assert_eq!(west.state, FaceState::InsideCovered);
        assert_eq!(eval.root.children[0].path, "root.children[0]");
        assert_eq!(eval.root.children[0].structure_id.as_deref(), Some("noclip"));
    }

    #[test]
    fn test_translucent_neighbour() {
        let glass = Tile::new("minecraft:glass", -1).with_boxes(vec![aabb([8, 0, 0, 16, 16, 16])]);
        let tree = TileTree::new(
            Group::new(16)
                .with_tile(stone(vec![aabb([0, 0, 0, 8, 16, 16])]))
                .with_tile(glass),
        );
        let eval = evaluate_tree(&tree, GeometryMode::Client);

        let stone_east = face(&eval, &[], 0, Facing::East);
        assert_eq!(stone_east.state, FaceState::InsideUncovered);
        assert_eq!(stone_east.counters.skipped_ineligible_tiles, 1);

        let glass_west = face(&eval, &[], 1, Facing::West);
        assert_eq!(glass_west.state, FaceState::InsideCovered);
        assert_eq!(glass_west.counters.eligible_solid_face_tiles, 1);
        assert_eq!(glass_west.counters.eligible_render_combined_only_tiles, 1);
    }

    #[test]
    fn test_stale_cache_samples_are_bounded() {
        let boxes: Vec<TileBox> = (0..9).map(flat_box).collect();
        let tree = TileTree::new(Group::new(16).with_tile(stone(boxes)));
        assert_eq!(tree.transformable_box_count(), 9);

        let mut caches = FaceCacheTable::new();
        for id in 0..9 {
            caches.insert(BoxId(id), BoxFaceCache::default());
        }
        let eval = evaluate_tree_with_cache(&tree, GeometryMode::Client, &mut caches);

        let diag = &eval.transformables;
        assert_eq!(diag.faces_evaluated, 54);
        assert_eq!(diag.cache.count, 54);
        assert_eq!(diag.generate_face.count, 54);
        assert_eq!(diag.set.count, 54);
        assert_eq!(diag.cache.samples.len(), SAMPLE_LIMIT);
        assert_eq!(diag.cache.samples[0].facing, Facing::Down);
        assert_eq!(diag.cache.samples[6].box_index, 1);
        assert_eq!(eval.faces.count(FaceState::Unloaded), 54);
    }

    #[test]
    fn test_fresh_cache_has_no_mismatch() {
        let boxes: Vec<TileBox> = (0..3).map(flat_box).collect();
        let tree = TileTree::new(Group::new(16).with_tile(stone(boxes)));
        let eval = evaluate_tree(&tree, GeometryMode::Client);

        assert_eq!(eval.transformables.faces_evaluated, 18);
        assert_eq!(eval.transformables.cache.count, 0);
        assert_eq!(eval.transformables.generate_face.count, 0);
        assert_eq!(eval.transformables.set.count, 0);
        assert_eq!(eval.stats.transformable_boxes, 3);
    }

    #[test]
    fn test_ramp_modes() {
        let tree = TileTree::new(Group::new(16).with_tile(stone(vec![TileBox::Transformable(ramp(0))])));

        let client = evaluate_tree(&tree, GeometryMode::Client);
        assert_eq!(face(&client, &[], 0, Facing::Up).state, FaceState::InsideUncovered);
        let server = evaluate_tree(&tree, GeometryMode::Server);
        assert_eq!(face(&server, &[], 0, Facing::Up).state, FaceState::Unloaded);

        let payload = client.root.tiles[0].boxes[0].payload.as_ref().unwrap();
        assert_eq!(payload.active_short_count, 2);
        assert!(!payload.exceeds_capacity());
    }

    #[test]
    fn test_filled_never_exceeds_total() {
        let tree = TileTree::new(
            Group::new(16)
                .with_tile(stone(vec![aabb([0, 0, 0, 8, 8, 8]), TileBox::Transformable(ramp(0))]))
                .with_tile(stone(vec![aabb([8, 0, 0, 16, 16, 16])]))
                .with_child(Group::new(32).with_tile(stone(vec![aabb([0, 0, 16, 32, 32, 32])]))),
        );
        let eval = evaluate_tree(&tree, GeometryMode::Client);

        fn check(group: &GroupEvaluation) {
            for tile in &group.tiles {
                for b in &tile.boxes {
                    for f in &b.faces {
                        let at = format!("{} {:?} {:?}", group.path, f.facing, f.state);
                        assert!(f.filled_cells <= f.total_cells, "{at}");
                        let full = f.total_cells > 0 && f.filled_cells == f.total_cells;
                        assert_eq!(full, f.state == FaceState::InsideCovered, "{at}");
                        let empty = matches!(
                            f.state,
                            FaceState::InsideUncovered | FaceState::OutsideUncovered | FaceState::Unloaded
                        );
                        assert_eq!(f.filled_cells == 0, empty, "{at}");
                    }
                }
            }
            group.children.iter().for_each(check);
        }
        check(&eval.root);
        assert_eq!(eval.faces.total_faces, 24);
    }

    #[test]
    fn test_zero_thickness_box_faces() {
        let tree = TileTree::new(Group::new(16).with_tile(stone(vec![aabb([0, 0, 0, 0, 16, 16])])));
        let eval = evaluate_tree(&tree, GeometryMode::Client);

        for facing in [Facing::Down, Facing::Up, Facing::North, Facing::South] {
            let f = face(&eval, &[], 0, facing);
            assert_eq!(f.state, FaceState::Unloaded, "{facing:?}");
            assert_eq!((f.filled_cells, f.total_cells), (0, 0));
        }
        for facing in [Facing::West, Facing::East] {
            let f = face(&eval, &[], 0, facing);
            assert_eq!(f.state, FaceState::OutsideUncovered, "{facing:?}");
            assert_eq!(f.total_cells, 256);
        }
        assert_eq!(eval.faces.count(FaceState::Unloaded), 4);
    }
}
