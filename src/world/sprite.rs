use glam::Vec2;

use crate::defs::TileId;

/// Billboard placed in the world; its texture comes from the tile registry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub pos: Vec2,
    pub tile: TileId,
}

impl Sprite {
    pub fn new(pos: Vec2, tile: impl Into<TileId>) -> Self {
        Self {
            pos,
            tile: tile.into(),
        }
    }
}

/// Order `sprites` far-to-near from `eye` (squared distance, non-increasing).
///
/// Insertion sort: stable, in place and allocation-free. Sprite lists are
/// tens long and mostly sorted from the previous frame.
pub fn sort_back_to_front(sprites: &mut [Sprite], eye: Vec2) {
    for i in 1..sprites.len() {
        let mut j = i;
        let d = sprites[j].pos.distance_squared(eye);
        while j > 0 && sprites[j - 1].pos.distance_squared(eye) < d {
            sprites.swap(j - 1, j);
            j -= 1;
        }
    }
}
