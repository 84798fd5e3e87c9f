//! Fixed-size grid of tile ids with its origin at `(0, 0)`.

use thiserror::Error;

use crate::defs::{Tile, TileData, TileId, tile_data};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TileMapError {
    #[error("cell ({x}, {y}) outside {width}x{height} map")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    #[error("map row {row} has {len} cells, expected {width}")]
    Ragged { row: usize, len: usize, width: usize },

    #[error("unknown map glyph `{glyph}` at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },

    #[error("map must have at least one cell")]
    Empty,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    width: usize,
    height: usize,
    tiles: Vec<TileId>,
}

impl TileMap {
    /// `width × height` map of empty space.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::None.id(); width * height],
        }
    }

    /// Empty map whose outermost ring is `border`, so the camera cannot leave it.
    pub fn bordered(width: usize, height: usize, border: Tile) -> Self {
        let mut map = Self::new(width, height);
        if width == 0 || height == 0 {
            return map;
        }
        for x in 0..width {
            map.tiles[x] = border.id();
            map.tiles[(height - 1) * width + x] = border.id();
        }
        for y in 0..height {
            map.tiles[y * width] = border.id();
            map.tiles[y * width + width - 1] = border.id();
        }
        map
    }

    /// Parse one string per row, top row = `y == 0`.
    ///
    /// ```text
    /// '.' or ' '  empty     '#'  wood
    /// '|'  glass lying along Y      '-'  glass lying along X
    /// ```
    pub fn from_rows(rows: &[&str]) -> Result<Self, TileMapError> {
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(TileMapError::Empty);
        }
        let mut tiles = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let len = row.chars().count();
            if len != width {
                return Err(TileMapError::Ragged { row: y, len, width });
            }
            for (x, glyph) in row.chars().enumerate() {
                let tile = match glyph {
                    '.' | ' ' => Tile::None,
                    '#' => Tile::Wood,
                    '|' => Tile::GlassVertical,
                    '-' => Tile::GlassHorizontal,
                    _ => return Err(TileMapError::UnknownGlyph { glyph, x, y }),
                };
                tiles.push(tile.id());
            }
        }
        Ok(Self {
            width,
            height: rows.len(),
            tiles,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Tile id at `(x, y)`, or `None` outside the grid.
    #[inline(always)]
    pub fn get(&self, x: i32, y: i32) -> Option<TileId> {
        if self.contains(x, y) {
            Some(self.tiles[y as usize * self.width + x as usize])
        } else {
            None
        }
    }

    /// Registry entry at `(x, y)`, or `None` outside the grid.
    #[inline(always)]
    pub fn data(&self, x: i32, y: i32) -> Option<TileData> {
        self.get(x, y).map(tile_data)
    }

    pub fn set(&mut self, x: i32, y: i32, tile: impl Into<TileId>) -> Result<(), TileMapError> {
        if !self.contains(x, y) {
            return Err(TileMapError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        self.tiles[y as usize * self.width + x as usize] = tile.into();
        Ok(())
    }
}
