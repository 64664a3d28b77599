//! Flattened tile list used by the coverage scan.
//!
//! `TileRef` is the result of walking the group tree: one entry per tile, in
//! pre-order, carrying the owning group for its grid and structure flags.

use super::group::Group;
use super::tile::Tile;

/// One tile of the flattened tree.
#[derive(Clone, Copy, Debug)]
pub struct TileRef<'a> {
    pub group: &'a Group,
    pub tile: &'a Tile,
}

/// Collect every tile below `root` in pre-order: a group's own tiles first,
/// then each child subtree in order.
pub fn flatten(root: &Group) -> Vec<TileRef<'_>> {
    let mut out = Vec::new();
    collect(root, &mut out);
    out
}

fn collect<'a>(group: &'a Group, out: &mut Vec<TileRef<'a>>) {
    out.extend(group.tiles.iter().map(|tile| TileRef { group, tile }));
    for child in &group.children {
        collect(child, out);
    }
}
