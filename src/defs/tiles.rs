//! Static tile registry.
//!
//! Maps a [`TileId`] stored in the tile map (or referenced by a sprite) to
//! the texture it shows and the [`TileFlags`] that drive traversal,
//! collision and compositing.

use super::flags::TileFlags;
use crate::world::TextureId;

/// Raw identifier stored in every tile map cell.
pub type TileId = u8;

/// Tiles known to the registry. The discriminant is the stored [`TileId`].
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    None = 0,
    Wood = 1,
    Ghost = 2,
    /// Glass pane lying along the Y axis (seen from X steps).
    GlassVertical = 3,
    /// Glass pane lying along the X axis (seen from Y steps).
    GlassHorizontal = 4,
}

impl Tile {
    #[inline]
    pub const fn id(self) -> TileId {
        self as TileId
    }
}

impl From<Tile> for TileId {
    fn from(tile: Tile) -> Self {
        tile.id()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileData {
    pub tex: TextureId,
    pub flags: TileFlags,
}

impl TileData {
    /// Entry every unknown id resolves to: see-through and texture-less.
    pub const NONE: TileData = TileData {
        tex: 0,
        flags: TileFlags::ALPHA,
    };

    #[inline]
    pub fn is_solid(&self) -> bool {
        self.flags.contains(TileFlags::SOLID)
    }

    #[inline]
    pub fn is_alpha(&self) -> bool {
        self.flags.contains(TileFlags::ALPHA)
    }

    /// Alpha tile with nothing to draw (plain floor space).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tex == 0 && self.is_alpha()
    }
}

const TILE_DATA: [TileData; 5] = [
    TileData::NONE,
    TileData {
        tex: 2,
        flags: TileFlags::FACES.union(TileFlags::SOLID),
    },
    TileData {
        tex: 3,
        flags: TileFlags::SPRITE,
    },
    TileData {
        tex: 4,
        flags: TileFlags::VERTICAL
            .union(TileFlags::SOLID)
            .union(TileFlags::ALPHA),
    },
    TileData {
        tex: 4,
        flags: TileFlags::HORIZONTAL
            .union(TileFlags::SOLID)
            .union(TileFlags::ALPHA),
    },
];

/// Look up a tile; ids past the end of the table fall back to [`TileData::NONE`].
#[inline]
pub fn tile_data(id: TileId) -> TileData {
    TILE_DATA
        .get(id as usize)
        .copied()
        .unwrap_or(TileData::NONE)
}
