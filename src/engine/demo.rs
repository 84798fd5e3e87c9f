//! The stock scene: a walled 20×20 room split by a glass wall, three
//! ghosts, and procedurally drawn textures for every tile slot.

use glam::vec2;

use crate::{
    defs::{Tile, tile_data},
    engine::EngineError,
    renderer::Color,
    world::{
        Camera, Sprite, TEX_SIZE, Texture, TextureBank, TextureError, TextureId, TileMap, World,
    },
};

pub const FLOOR_TEX: TextureId = 1;
pub const CEILING_TEX: TextureId = 2;

/// Demo room with the camera at (5, 5) looking down −X.
pub fn demo_world() -> Result<World, EngineError> {
    let mut map = TileMap::bordered(20, 20, Tile::Wood);
    for y in 4..15 {
        map.set(6, y, Tile::GlassVertical)?;
    }
    let camera = Camera::new(vec2(5.0, 5.0), vec2(-1.0, 0.0), vec2(0.0, 0.5))?;

    let mut world = World::new(camera, map);
    world.floor_tex = FLOOR_TEX;
    world.ceiling_tex = CEILING_TEX;
    world.sprites = [(8.0, 8.0), (8.0, 10.0), (10.0, 8.0)]
        .into_iter()
        .map(|(x, y)| Sprite::new(vec2(x, y), Tile::Ghost))
        .collect();
    Ok(world)
}

/// Cheap integer hash for texture grain.
fn grain(u: usize, v: usize) -> u8 {
    let mut h = (u as u32).wrapping_mul(0x9E37_79B1) ^ (v as u32).wrapping_mul(0x85EB_CA77);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    (h >> 24) as u8
}

fn wood(n: usize) -> Texture {
    let plank = (n / 4).max(1);
    Texture::from_fn("WOOD", n, |u, v| {
        if u % plank == 0 {
            return Color::opaque(40, 24, 10);
        }
        let g = grain(u, v / 3) / 8;
        Color::opaque(130 + g, 80 + g / 2, 36)
    })
}

fn floor(n: usize) -> Texture {
    Texture::checker(
        "FLOOR",
        n,
        n / 2,
        Color::opaque(92, 92, 100),
        Color::opaque(64, 64, 72),
    )
}

/// White sheet with a ragged hem and two eyes; transparent around it.
fn ghost(n: usize) -> Texture {
    let c = n as f32 * 0.5;
    let r = n as f32 * 0.4;
    Texture::from_fn("GHOST", n, |u, v| {
        let (x, y) = (u as f32 + 0.5, v as f32 + 0.5);
        let head = (x - c).powi(2) + (y - c).powi(2) < r * r;
        let hem = (n as f32 * 0.85) - ((u / 3) % 2) as f32 * 2.0;
        let body = (x - c).abs() < r && y >= c && y < hem;
        if !(head || body) {
            return Color::TRANSPARENT;
        }
        let eye_y = c - r * 0.25;
        let eye = |ex: f32| (x - ex).powi(2) + (y - eye_y).powi(2) < (r * 0.15).powi(2);
        if eye(c - r * 0.4) || eye(c + r * 0.4) {
            Color::opaque(20, 20, 40)
        } else {
            Color::opaque(230, 235, 245)
        }
    })
}

/// Pale blue pane inside an opaque frame.
fn glass(n: usize) -> Texture {
    Texture::from_fn("GLASS", n, |u, v| {
        if u == 0 || v == 0 || u == n - 1 || v == n - 1 {
            Color::opaque(30, 50, 80)
        } else {
            Color::rgba(150, 200, 255, 80)
        }
    })
}

/// Bank with every texture the tile registry and the demo world refer to.
pub fn demo_textures() -> Result<TextureBank, TextureError> {
    let mut bank = TextureBank::default();
    bank.insert_at(FLOOR_TEX, floor(TEX_SIZE))?;
    bank.insert_at(tile_data(Tile::Wood.id()).tex, wood(TEX_SIZE))?;
    bank.insert_at(tile_data(Tile::Ghost.id()).tex, ghost(TEX_SIZE))?;
    bank.insert_at(tile_data(Tile::GlassVertical.id()).tex, glass(TEX_SIZE))?;
    Ok(bank)
}
