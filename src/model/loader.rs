//! Loading tile trees from JSON input files
//!
//! Two layouts are accepted. The current layout keys tiles by block state:
//!
//! ```json
//! { "grid": 16, "s": {"id": "door"}, "t": {"minecraft:stone": [[-1], [0,0,0,16,8,16]]}, "c": [], "e": {} }
//! ```
//!
//! The legacy layout lists tiles with their block name, meta and boxes:
//!
//! ```json
//! { "grid": 16, "tiles": [{"tile": {"block": "minecraft:wool", "meta": 14}, "boxes": [[0,0,0,4,4,4]]}], "children": [] }
//! ```

use std::path::Path;

use serde_json::{Map, Value};

use crate::core::{Error, Result};
use crate::export::ExportConfig;

use super::group::{Group, TileTree};
use super::tile::Tile;
use super::tile_box::TileBox;

/// Input layout a tree was read from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schema {
    Current,
    Legacy,
}

impl Schema {
    pub fn as_str(self) -> &'static str {
        match self {
            Schema::Current => "current",
            Schema::Legacy => "legacy",
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoadedTree {
    pub schema: Schema,
    pub tree: TileTree,
}

/// Read and parse one input file.
pub fn load_file(path: &Path, config: &ExportConfig) -> Result<LoadedTree> {
    let text = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text)?;
    let loaded = load_value(&value, config)?;
    log::debug!(
        "Loaded {} ({} schema, {} groups, {} transformable boxes)",
        path.display(),
        loaded.schema.as_str(),
        loaded.tree.group_count(),
        loaded.tree.transformable_box_count()
    );
    Ok(loaded)
}

/// Build a tree from an already parsed document.
pub fn load_value(value: &Value, config: &ExportConfig) -> Result<LoadedTree> {
    let object = value
        .as_object()
        .ok_or_else(|| Error::parse("root", "top-level value must be an object"))?;

    let legacy = object.get("tiles").is_some_and(Value::is_array)
        && !object.get("t").is_some_and(Value::is_object);

    let loader = Loader { config };
    let root_grid = resolve_grid(object.get("grid"), config.default_grid);
    let (schema, root) = if legacy {
        (Schema::Legacy, loader.legacy_group(object, root_grid, "root")?)
    } else {
        (Schema::Current, loader.current_group(object, root_grid, "root")?)
    };

    Ok(LoadedTree {
        schema,
        tree: TileTree::new(root),
    })
}

struct Loader<'a> {
    config: &'a ExportConfig,
}

impl Loader<'_> {
    fn current_group(&self, object: &Map<String, Value>, fallback_grid: u32, path: &str) -> Result<Group> {
        let grid = resolve_grid(object.get("grid"), fallback_grid);
        let mut group = self.new_group(grid, structure_id(object.get("s")));

        if let Some(tiles) = object.get("t").and_then(Value::as_object) {
            for (block_state, entries) in tiles {
                let entries = entries
                    .as_array()
                    .ok_or_else(|| Error::parse(format!("{path}.t[{block_state}]"), "must be a list"))?;

                let start = group.tiles.len();
                for (i, entry) in entries.iter().enumerate() {
                    let entry_path = format!("{path}.t[{block_state}][{i}]");
                    let array = int_array(entry, &entry_path)?;

                    if array.len() == 1 {
                        group.tiles.push(self.new_tile(block_state, array[0]));
                        continue;
                    }

                    let tile_box = TileBox::from_array(&array)
                        .map_err(|e| Error::parse(entry_path, e.to_string()))?;
                    if group.tiles.len() == start {
                        group.tiles.push(self.new_tile(block_state, -1));
                    }
                    if let Some(tile) = group.tiles.last_mut() {
                        tile.boxes.push(tile_box);
                    }
                }
            }
        }

        if let Some(children) = object.get("c").and_then(Value::as_array) {
            for (i, child) in children.iter().enumerate() {
                let child_path = format!("{path}.c[{i}]");
                let child = child
                    .as_object()
                    .ok_or_else(|| Error::parse(child_path.clone(), "child group must be an object"))?;
                group.children.push(self.current_group(child, grid, &child_path)?);
            }
        }

        if let Some(extensions) = object.get("e").and_then(Value::as_object) {
            for (key, child) in extensions {
                let child_path = format!("{path}.e[{key}]");
                let child = child
                    .as_object()
                    .ok_or_else(|| Error::parse(child_path.clone(), "extension group must be an object"))?;
                group.children.push(self.current_group(child, grid, &child_path)?);
            }
        }

        Ok(group)
    }

    fn legacy_group(&self, object: &Map<String, Value>, inherited_grid: u32, path: &str) -> Result<Group> {
        let grid = resolve_grid(object.get("grid"), inherited_grid);
        let mut group = self.new_group(grid, structure_id(object.get("structure")));

        let tiles = object
            .get("tiles")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::parse(format!("{path}.tiles"), "must be a list in legacy format"))?;

        for (i, entry) in tiles.iter().enumerate() {
            let entry_path = format!("{path}.tiles[{i}]");
            let entry = entry
                .as_object()
                .ok_or_else(|| Error::parse(entry_path.clone(), "tile entry must be an object"))?;
            let tile_object = entry.get("tile").and_then(Value::as_object).unwrap_or(entry);

            let block = tile_object
                .get("block")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::parse(format!("{entry_path}.tile.block"), "is required in legacy format"))?;
            let block_state = match tile_object.get("meta").and_then(Value::as_i64) {
                Some(meta) if meta != 0 => format!("{block}:{meta}"),
                _ => block.to_string(),
            };
            let color = tile_object
                .get("color")
                .and_then(as_i32)
                .unwrap_or(-1);

            let mut arrays = Vec::new();
            if let Some(boxes) = entry.get("boxes").and_then(Value::as_array) {
                for b in boxes {
                    arrays.push(int_array(b, &format!("{entry_path}.boxes[]"))?);
                }
            } else if let Some(b) = entry.get("bBox").filter(|v| !v.is_null()) {
                arrays.push(int_array(b, &format!("{entry_path}.bBox"))?);
            } else if let Some(b) = entry.get("box").filter(|v| !v.is_null()) {
                arrays.push(int_array(b, &format!("{entry_path}.box"))?);
            }

            let mut tile = self.new_tile(&block_state, color);
            for (j, array) in arrays.iter().enumerate() {
                let tile_box = TileBox::from_array(array)
                    .map_err(|e| Error::parse(format!("{entry_path}.box[{j}]"), e.to_string()))?;
                tile.boxes.push(tile_box);
            }
            group.tiles.push(tile);
        }

        if let Some(children) = object.get("children").and_then(Value::as_array) {
            for (i, child) in children.iter().enumerate() {
                let child_path = format!("{path}.children[{i}]");
                let child = child
                    .as_object()
                    .ok_or_else(|| Error::parse(child_path.clone(), "child group must be an object"))?;
                group.children.push(self.legacy_group(child, grid, &child_path)?);
            }
        }

        Ok(group)
    }

    fn new_group(&self, grid: u32, structure_id: Option<String>) -> Group {
        let mut group = Group::new(grid);
        group.non_colliding = structure_id
            .as_deref()
            .is_some_and(|id| self.config.is_non_colliding(id));
        group.structure_id = structure_id;
        group
    }

    fn new_tile(&self, block_state: &str, color: i32) -> Tile {
        let mut tile = Tile::new(block_state, color);
        if let Some(behavior) = self.config.behavior_overrides.get(&tile.block_id) {
            if let Some(solid) = behavior.provides_solid_face {
                tile.provides_solid_face = solid;
            }
            if let Some(cull) = behavior.cull_over_edge {
                tile.cull_over_edge = cull;
            }
        }
        tile
    }
}

fn resolve_grid(value: Option<&Value>, fallback: u32) -> u32 {
    value
        .and_then(Value::as_u64)
        .filter(|&grid| grid > 0)
        .and_then(|grid| u32::try_from(grid).ok())
        .unwrap_or(fallback)
}

fn structure_id(value: Option<&Value>) -> Option<String> {
    let id = value?.as_object()?.get("id")?;
    let id = match id {
        Value::String(s) => s.trim().to_string(),
        Value::Null => return None,
        other => other.to_string(),
    };
    (!id.is_empty()).then_some(id)
}

/// Accepts signed 32-bit values and unsigned 32-bit values (wrapped).
fn as_i32(value: &Value) -> Option<i32> {
    let n = value.as_i64()?;
    if let Ok(v) = i32::try_from(n) {
        return Some(v);
    }
    u32::try_from(n).ok().map(|v| v as i32)
}

fn int_array(value: &Value, path: &str) -> Result<Vec<i32>> {
    let items = value
        .as_array()
        .ok_or_else(|| Error::parse(path, "must be an int array"))?;
    items
        .iter()
        .map(|item| as_i32(item).ok_or_else(|| Error::parse(path, format!("invalid int {item}"))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::config::BehaviorOverride;
    use serde_json::json;

    fn load(value: Value) -> LoadedTree {
        load_value(&value, &ExportConfig::default()).expect("load failed")
    }

    #[test]
    fn test_current_schema_tiles_and_colors() {
        let loaded = load(json!({
            "grid": 16,
            "t": {
                "minecraft:stone": [[0, 0, 0, 8, 8, 8], [-16777216], [8, 8, 8, 16, 16, 16], [0, 8, 0, 8, 16, 8]],
                "minecraft:glass": [[-1], [0, 0, 8, 4, 4, 16]]
            }
        }));

        assert_eq!(loaded.schema, Schema::Current);
        let root = loaded.tree.root();
        assert_eq!(root.tiles.len(), 3);
        assert_eq!(root.tiles[0].color, -1);
        assert_eq!(root.tiles[0].boxes.len(), 1);
        assert_eq!(root.tiles[1].color, -16777216);
        assert_eq!(root.tiles[1].boxes.len(), 2);
        assert_eq!(root.tiles[2].block_id, "minecraft:glass");
        assert!(!root.tiles[2].provides_solid_face);
    }

    #[test]
    fn test_grid_inheritance_and_extensions() {
        let loaded = load(json!({
            "grid": 32,
            "t": {},
            "c": [{"t": {}}, {"grid": 4, "t": {}}],
            "e": {"x": {"t": {}}}
        }));
        let root = loaded.tree.root();
        let grids: Vec<u32> = root.children.iter().map(|c| c.grid).collect();
        assert_eq!(grids, vec![32, 4, 32]);
    }

    #[test]
    fn test_root_grid_falls_back_to_default() {
        let loaded = load(json!({"t": {}}));
        assert_eq!(loaded.tree.root().grid, 16);
    }

    #[test]
    fn test_noclip_structure() {
        let loaded = load(json!({
            "t": {},
            "c": [{"s": {"id": "noclip"}, "t": {}}, {"s": {"id": "door"}, "t": {}}]
        }));
        let root = loaded.tree.root();
        assert!(root.children[0].non_colliding);
        assert_eq!(root.children[1].structure_id.as_deref(), Some("door"));
        assert!(!root.children[1].non_colliding);
    }

    #[test]
    fn test_legacy_schema() {
        let loaded = load(json!({
            "grid": 16,
            "tiles": [
                {"tile": {"block": "minecraft:wool", "meta": 14, "color": -1}, "boxes": [[0, 0, 0, 4, 4, 4]]},
                {"tile": {"block": "minecraft:stone"}, "bBox": [4, 4, 4, 8, 8, 8]}
            ],
            "children": [{"tiles": [], "structure": {"id": "noclip"}}]
        }));

        assert_eq!(loaded.schema, Schema::Legacy);
        let root = loaded.tree.root();
        assert_eq!(root.tiles[0].block_state, "minecraft:wool:14");
        assert_eq!(root.tiles[0].block_id, "minecraft:wool");
        assert_eq!(root.tiles[1].boxes.len(), 1);
        assert!(root.children[0].non_colliding);
    }

    #[test]
    fn test_transformable_box_ids() {
        let loaded = load(json!({
            "t": {"minecraft:stone": [[0, 0, 0, 8, 8, 8, -16777216, 0], [0, 0, 0, 4, 4, 4, -1, 5]]}
        }));
        assert_eq!(loaded.tree.transformable_box_count(), 2);
    }

    #[test]
    fn test_parse_errors_carry_path() {
        let err = load_value(
            &json!({"t": {"minecraft:stone": [[8, 0, 0, 0, 8, 8]]}}),
            &ExportConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("root.t[minecraft:stone][0]: invalid box bounds"));

        let err = load_value(
            &json!({"t": {"minecraft:stone": [[-1], [-2147483648, 0, 0, 1, 1, 1]]}}),
            &ExportConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("root.t[minecraft:stone][1]: box coordinate -2147483648"));

        assert!(load_value(&json!([1, 2]), &ExportConfig::default()).is_err());
        assert!(load_value(&json!({"tiles": [{"tile": {}}]}), &ExportConfig::default()).is_err());
    }

    #[test]
    fn test_zero_thickness_box_loads() {
        let loaded = load(json!({"t": {"minecraft:stone": [[0, 0, 0, 0, 16, 16]]}}));
        let tile = &loaded.tree.root().tiles[0];
        assert_eq!(tile.boxes[0].to_array(), vec![0, 0, 0, 0, 16, 16]);
    }

    #[test]
    fn test_behavior_overrides_win() {
        let mut config = ExportConfig::default();
        config.behavior_overrides.insert(
            "minecraft:glass".to_string(),
            BehaviorOverride {
                provides_solid_face: Some(true),
                cull_over_edge: None,
            },
        );
        let loaded = load_value(&json!({"t": {"minecraft:glass": [[0, 0, 0, 1, 1, 1]]}}), &config).unwrap();
        assert!(loaded.tree.root().tiles[0].provides_solid_face);
    }

    #[test]
    fn test_unsigned_color_wraps() {
        let loaded = load(json!({"t": {"minecraft:stone": [[4294967295u64], [0, 0, 0, 1, 1, 1]]}}));
        assert_eq!(loaded.tree.root().tiles[0].color, -1);
    }
}
