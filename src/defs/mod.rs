pub mod flags;
pub mod tiles;

pub use self::{
    flags::TileFlags,
    tiles::{Tile, TileData, TileId, tile_data},
};
