//! Tiles and their face behaviour

use super::tile_box::TileBox;

/// Path tokens of block ids that never provide a solid face
const TRANSLUCENT_TOKENS: [&str; 8] = ["air", "leaves", "glass", "pane", "ice", "water", "lava", "barrier"];

/// Path tokens of block ids whose faces on the block edge are never culled
const NO_EDGE_CULL_TOKENS: [&str; 1] = ["leaves"];

/// One material-bearing unit of a group.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    /// Block state as written in the input, e.g. `minecraft:oak_stairs[facing=east]`
    pub block_state: String,
    /// Block state without properties or a numeric meta suffix
    pub block_id: String,
    /// ARGB color, `-1` when unset
    pub color: i32,
    pub provides_solid_face: bool,
    /// Whether faces on the block edge may be culled by the outside world
    pub cull_over_edge: bool,
    pub boxes: Vec<TileBox>,
}

impl Tile {
    /// Create a tile with capabilities inferred from its block id and color.
    pub fn new(block_state: impl Into<String>, color: i32) -> Self {
        let block_state = block_state.into();
        let block_id = canonical_block_id(&block_state);
        let provides_solid_face = !(has_path_token(&block_id, &TRANSLUCENT_TOKENS) || is_color_transparent(color));
        let cull_over_edge = !has_path_token(&block_id, &NO_EDGE_CULL_TOKENS);
        Self {
            block_state,
            block_id,
            color,
            provides_solid_face,
            cull_over_edge,
            boxes: Vec::new(),
        }
    }

    pub fn with_boxes(mut self, boxes: Vec<TileBox>) -> Self {
        self.boxes = boxes;
        self
    }

    /// Same block and color: the two tiles render as one surface.
    pub fn can_be_render_combined(&self, other: &Tile) -> bool {
        self.block_id == other.block_id && self.color == other.color
    }
}

/// Strip `[properties]` and a trailing `:meta` from a block state.
pub fn canonical_block_id(block_state: &str) -> String {
    let name = match block_state.find('[') {
        Some(index) => &block_state[..index],
        None => block_state,
    };
    let name = name.trim();

    let parts: Vec<&str> = name.split(':').collect();
    if parts.len() == 3 && parts[0..2].iter().all(|p| !p.is_empty()) && is_int(parts[2]) {
        return format!("{}:{}", parts[0], parts[1]);
    }
    name.to_string()
}

fn is_int(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn has_path_token(block_id: &str, tokens: &[&str]) -> bool {
    let path = block_id.split(':').nth(1).unwrap_or(block_id);
    path.split(['_', '.', '/', '-'])
        .any(|part| tokens.contains(&part))
}

fn is_color_transparent(color: i32) -> bool {
    ((color as u32) >> 24) & 0xFF < 0xFF
}
