pub mod camera;
pub mod helpers;
pub mod sprite;
pub mod texture;
pub mod tile_map;

pub use camera::{Camera, CameraError};
pub use sprite::{Sprite, sort_back_to_front};
pub use texture::{NO_TEXTURE, TEX_SIZE, Texture, TextureBank, TextureError, TextureId};
pub use tile_map::{TileMap, TileMapError};

/// Everything the renderer reads for one frame.
///
/// Owned by the game-state aggregate; the renderer only ever borrows it
/// for the duration of a frame.
#[derive(Clone, Debug)]
pub struct World {
    pub camera: Camera,
    pub map: TileMap,
    pub sprites: Vec<Sprite>,
    pub floor_tex: TextureId,
    pub ceiling_tex: TextureId,
    /// Seconds since start; drives sprite bobbing.
    pub time: f32,
}

impl World {
    pub fn new(camera: Camera, map: TileMap) -> Self {
        Self {
            camera,
            map,
            sprites: Vec::new(),
            floor_tex: 1,
            ceiling_tex: 2,
            time: 0.0,
        }
    }
}
