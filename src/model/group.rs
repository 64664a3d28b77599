//! Group tree and the per-file tile tree

use super::flatten::{TileRef, flatten};
use super::tile::Tile;
use super::tile_box::{BoxId, TileBox};

/// Tree node owning tiles and child groups on one grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    /// Subdivisions per block edge
    pub grid: u32,
    pub structure_id: Option<String>,
    /// Tiles of a non-colliding structure never cover other faces
    pub non_colliding: bool,
    pub tiles: Vec<Tile>,
    pub children: Vec<Group>,
}

impl Group {
    pub fn new(grid: u32) -> Self {
        Self {
            grid,
            structure_id: None,
            non_colliding: false,
            tiles: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_tile(mut self, tile: Tile) -> Self {
        self.tiles.push(tile);
        self
    }

    pub fn with_child(mut self, child: Group) -> Self {
        self.children.push(child);
        self
    }

    /// Pre-order walk over this group and all descendants
    pub fn walk(&self, visit: &mut impl FnMut(&Group)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    fn assign_box_ids(&mut self, next: &mut u32) {
        for tile in &mut self.tiles {
            for tile_box in &mut tile.boxes {
                if let TileBox::Transformable(t) = tile_box {
                    t.id = BoxId(*next);
                    *next += 1;
                }
            }
        }
        for child in &mut self.children {
            child.assign_box_ids(next);
        }
    }
}

/// A loaded, immutable group tree for one processed input.
#[derive(Clone, Debug, PartialEq)]
pub struct TileTree {
    root: Group,
    transformable_boxes: u32,
}

impl TileTree {
    /// Take ownership of `root` and number its transformable boxes in pre-order.
    pub fn new(mut root: Group) -> Self {
        let mut next = 0;
        root.assign_box_ids(&mut next);
        Self {
            root,
            transformable_boxes: next,
        }
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    /// Every tile of the tree in pre-order, paired with its group
    pub fn tiles(&self) -> Vec<TileRef<'_>> {
        flatten(&self.root)
    }

    pub fn transformable_box_count(&self) -> usize {
        self.transformable_boxes as usize
    }

    pub fn group_count(&self) -> usize {
        let mut count = 0;
        self.root.walk(&mut |_| count += 1);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tilted(bounds: [i32; 6]) -> TileBox {
        let mut array = bounds.to_vec();
        array.extend([-16_777_216, 0]);
        TileBox::from_array(&array).unwrap()
    }

    #[test]
    fn test_box_ids_follow_pre_order() {
        let child = Group::new(16).with_tile(Tile::new("minecraft:stone", -1).with_boxes(vec![
            tilted([0, 0, 0, 4, 4, 4]),
        ]));
        let root = Group::new(16)
            .with_tile(Tile::new("minecraft:stone", -1).with_boxes(vec![
                tilted([0, 0, 0, 2, 2, 2]),
                TileBox::from_array(&[2, 2, 2, 4, 4, 4]).unwrap(),
                tilted([4, 4, 4, 6, 6, 6]),
            ]))
            .with_child(child);

        let tree = TileTree::new(root);
        assert_eq!(tree.transformable_box_count(), 3);

        let ids: Vec<BoxId> = tree
            .tiles()
            .iter()
            .flat_map(|r| r.tile.boxes.iter())
            .filter_map(|b| b.as_transformable().map(|t| t.id))
            .collect();
        assert_eq!(ids, vec![BoxId(0), BoxId(1), BoxId(2)]);
    }

    #[test]
    fn test_group_count() {
        let root = Group::new(16)
            .with_child(Group::new(16).with_child(Group::new(8)))
            .with_child(Group::new(16));
        assert_eq!(TileTree::new(root).group_count(), 4);
    }
}
