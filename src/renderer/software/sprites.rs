//! Billboard sprites: camera-space projection, the bob wave, and merging
//! sprite layers into a column's wall hits.

use log::trace;
use smallvec::SmallVec;

use crate::{
    defs::{TileFlags, tile_data},
    engine::Screen,
    renderer::{ColumnStrip, fog_factor},
    renderer::software::walls::{HIT_CAPACITY, TileHit},
    world::{Camera, NO_TEXTURE, Sprite, Texture, TextureId, helpers::to_basis},
};

/// Screen-space coordinates are clamped to this so later integer maths
/// cannot overflow for sprites right on the eye.
const SCREEN_LIMIT: f32 = (1 << 24) as f32;

/// Where one sprite lands on screen this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteProjection {
    /// Camera-space depth (transform Y).
    pub depth: f32,
    pub tex: TextureId,
    pub fog: f32,
    pub screen_x: i64,
    /// Width and height on screen; sprites are square.
    pub size: i64,
    /// Vertical bob in pixels, already divided by depth.
    pub v_move: i64,
    pub start_x: i64,
    pub end_x: i64,
    pub start_y: i64,
    pub end_y: i64,
}

impl SpriteProjection {
    #[inline]
    pub fn covers(&self, x: usize) -> bool {
        (self.start_x..self.end_x).contains(&(x as i64))
    }
}

/// Sprite bob in pixels at unit depth: a 0..=8 triangle wave stepping
/// sixteen times a second, one full cycle per second.
pub fn bob_offset(time: f32) -> i64 {
    let cycle = ((time * 16.0).floor() as i64).rem_euclid(16);
    if cycle < 8 { cycle } else { 16 - cycle }
}

#[inline]
fn to_px(v: f32) -> i64 {
    v.clamp(-SCREEN_LIMIT, SCREEN_LIMIT) as i64
}

/// Project `sprite` through `camera`.
///
/// `None` for sprites behind the eye, past `fog_cutoff`, whose tile is not a
/// textured sprite tile, or with no on-screen extent. A positive `bob` lifts
/// the sprite off the floor line.
pub fn project(
    sprite: &Sprite,
    camera: &Camera,
    screen: &Screen,
    bob: i64,
    fog_cutoff: f32,
) -> Option<SpriteProjection> {
    let t = to_basis(sprite.pos - camera.pos, camera.plane(), camera.dir())?;
    let depth = t.y;
    if !(depth > 0.0) || depth > fog_cutoff {
        return None;
    }
    let data = tile_data(sprite.tile);
    if !data.flags.contains(TileFlags::SPRITE) || data.tex == NO_TEXTURE {
        return None;
    }
    let tex = data.tex;

    let (w, h) = (screen.w as i64, screen.h as i64);
    let screen_x = to_px(screen.half_w * (1.0 + t.x / depth));
    let size = to_px((screen.h as f32 / depth).abs());
    if size == 0 {
        return None;
    }
    let v_move = to_px(bob as f32 / depth);

    let start_y = ((h - size) / 2 - v_move).max(0);
    let end_y = ((size + h) / 2 - v_move).min(h);
    let start_x = (screen_x - size / 2).max(0);
    let end_x = (screen_x + size / 2).min(w);
    if start_x >= end_x || start_y >= end_y {
        return None;
    }

    Some(SpriteProjection {
        depth,
        tex,
        fog: fog_factor(depth, fog_cutoff),
        screen_x,
        size,
        v_move,
        start_x,
        end_x,
        start_y,
        end_y,
    })
}

/// Paint column `x` of a projected sprite.
///
/// Texels whose alpha is below `alpha_cutoff` are skipped, as is alpha 0
/// whatever the cutoff; the rest overwrite the column (no blending).
pub fn draw_sprite_column(
    strip: &mut ColumnStrip<'_>,
    x: usize,
    proj: &SpriteProjection,
    tex: &Texture,
    alpha_cutoff: u8,
) {
    let n = tex.size as i64;
    let h = strip.height() as i64;
    let left = proj.screen_x - proj.size / 2;
    let u = ((x as i64 - left) * n / proj.size).clamp(0, n - 1) as i32;

    for y in proj.start_y..proj.end_y {
        let d = (y + proj.v_move) * 256 - h * 128 + proj.size * 128;
        let v = (d * n / proj.size / 256).clamp(0, n - 1) as i32;
        let c = tex.texel(u, v);
        if c.a > 0 && c.a >= alpha_cutoff {
            strip.set(x, y as usize, c.scale(proj.fog));
        }
    }
}

/// One surface in a column's draw list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Layer {
    Wall(TileHit),
    /// Index into the frame's sprite projections.
    Sprite { index: usize, depth: f32 },
}

impl Layer {
    #[inline]
    pub fn depth(&self) -> f32 {
        match self {
            Layer::Wall(hit) => hit.dist,
            Layer::Sprite { depth, .. } => *depth,
        }
    }
}

pub type Layers = SmallVec<[Layer; HIT_CAPACITY]>;

/// Insert every sprite covering column `x` into `layers` (nearest first),
/// keeping only sprites in front of `wall_depth`. At most `cap` layers
/// are kept in total.
pub fn merge_sprites(
    layers: &mut Layers,
    projections: &[Option<SpriteProjection>],
    x: usize,
    wall_depth: f32,
    cap: usize,
) {
    for (index, proj) in projections.iter().enumerate() {
        let Some(p) = proj else { continue };
        if !p.covers(x) || !(p.depth > 0.0 && p.depth < wall_depth) {
            continue;
        }
        if layers.len() >= cap {
            trace!("column {x}: layer cap {cap} reached, sprite {index} dropped");
            return;
        }
        let at = layers
            .iter()
            .position(|l| p.depth < l.depth())
            .unwrap_or(layers.len());
        layers.insert(
            at,
            Layer::Sprite {
                index,
                depth: p.depth,
            },
        );
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        defs::Tile,
        renderer::{Color, FrameBuffer},
        renderer::software::walls::Side,
    };
    use glam::vec2;

    fn camera_east() -> Camera {
        Camera::new(vec2(1.5, 2.5), vec2(1.0, 0.0), vec2(0.0, -0.66)).unwrap()
    }

    fn ghost_at(x: f32, y: f32) -> Sprite {
        Sprite::new(vec2(x, y), Tile::Ghost)
    }

    #[test]
    fn bob_is_a_triangle_wave() {
        let samples: Vec<i64> = (0..=16).map(|i| bob_offset(i as f32 / 16.0)).collect();
        assert_eq!(samples, [0, 1, 2, 3, 4, 5, 6, 7, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
        assert_eq!(bob_offset(3.25), bob_offset(0.25));
    }

    #[test]
    fn straight_ahead_is_centred() {
        let screen = Screen::new(64, 64);
        let p = project(&ghost_at(3.5, 2.5), &camera_east(), &screen, 0, 5.0).unwrap();
        assert!((p.depth - 2.0).abs() < 1e-6);
        assert_eq!(p.screen_x, 32);
        assert_eq!(p.size, 32);
        assert_eq!((p.start_x, p.end_x), (16, 48));
        assert_eq!((p.start_y, p.end_y), (16, 48));
        assert!((p.fog - 0.6).abs() < 1e-6);
        assert_eq!(p.tex, tile_data(Tile::Ghost.id()).tex);
    }

    #[test]
    fn bob_lifts_sprite_scaled_by_depth() {
        let screen = Screen::new(64, 64);
        let rest = project(&ghost_at(3.5, 2.5), &camera_east(), &screen, 0, 5.0).unwrap();
        let p = project(&ghost_at(3.5, 2.5), &camera_east(), &screen, 8, 5.0).unwrap();
        assert_eq!(p.v_move, 4);
        assert_eq!((p.start_y, p.end_y), (12, 44));
        // never sinks past where it stands on the floor
        assert!(p.end_y < rest.end_y);
        assert_eq!(rest.end_y, 48);
    }

    #[test]
    fn lifted_sprite_samples_full_texture() {
        let screen = Screen::new(64, 64);
        let p = project(&ghost_at(3.5, 2.5), &camera_east(), &screen, 8, 5.0).unwrap();
        // top rows red, bottom rows blue
        let tex = Texture::from_fn("G", 4, |_, v| {
            if v == 0 {
                Color::opaque(255, 0, 0)
            } else if v == 3 {
                Color::opaque(0, 0, 255)
            } else {
                Color::opaque(0, 255, 0)
            }
        });
        let mut fb = FrameBuffer::new(64, 64);
        {
            let mut strips = fb.column_strips(&[0..64]);
            draw_sprite_column(&mut strips[0], 32, &p, &tex, 255);
        }
        let fog = |c: Color| c.scale(p.fog);
        assert_eq!(fb.get(32, 12), fog(Color::opaque(255, 0, 0)));
        assert_eq!(fb.get(32, 43), fog(Color::opaque(0, 0, 255)));
        assert_eq!(fb.get(32, 44), Color::BLACK);
    }

    #[test]
    fn culled_sprites() {
        let screen = Screen::new(64, 64);
        let cam = camera_east();
        // behind the eye
        assert!(project(&ghost_at(0.5, 2.5), &cam, &screen, 0, 5.0).is_none());
        // past the fog
        assert!(project(&ghost_at(7.0, 2.5), &cam, &screen, 0, 5.0).is_none());
        // tile without a texture
        assert!(project(&Sprite::new(vec2(3.5, 2.5), 250u8), &cam, &screen, 0, 5.0).is_none());
        // opaque wall tile is not a billboard
        assert!(project(&Sprite::new(vec2(3.5, 2.5), Tile::Wood), &cam, &screen, 0, 5.0).is_none());
        // far off to the side
        assert!(project(&ghost_at(2.5, -40.0), &cam, &screen, 0, 5.0).is_none());
    }

    #[test]
    fn point_blank_sprite_does_not_overflow() {
        let screen = Screen::new(64, 64);
        let p = project(&ghost_at(1.5 + 1e-7, 2.5), &camera_east(), &screen, 0, 5.0).unwrap();
        assert_eq!((p.start_x, p.end_x), (0, 64));
        assert_eq!((p.start_y, p.end_y), (0, 64));
    }

    #[test]
    fn transparent_texels_are_skipped() {
        let screen = Screen::new(8, 8);
        // depth 1: the sprite fills the whole 8x8 screen
        let p = project(&ghost_at(2.5, 2.5), &camera_east(), &screen, 0, 1e9).unwrap();
        let tex = Texture::from_fn("G", 4, |_, v| {
            if v < 2 { Color::TRANSPARENT } else { Color::opaque(0, 200, 0) }
        });
        let mut fb = FrameBuffer::new(8, 8);
        fb.fill(Color::opaque(9, 9, 9));
        {
            let mut strips = fb.column_strips(&[0..8]);
            draw_sprite_column(&mut strips[0], 3, &p, &tex, 255);
        }
        assert_eq!(fb.get(3, 0), Color::opaque(9, 9, 9));
        assert_eq!(fb.get(3, 3), Color::opaque(9, 9, 9));
        assert_eq!(fb.get(3, 4), Color::opaque(0, 200, 0));
        assert_eq!(fb.get(3, 7), Color::opaque(0, 200, 0));
        assert_eq!(fb.get(2, 7), Color::opaque(9, 9, 9));
    }

    #[test]
    fn zero_alpha_is_never_drawn() {
        let screen = Screen::new(8, 8);
        let p = project(&ghost_at(2.5, 2.5), &camera_east(), &screen, 0, 1e9).unwrap();
        let tex = Texture::solid("CLEAR", 4, Color::TRANSPARENT);
        let mut fb = FrameBuffer::new(8, 8);
        fb.fill(Color::opaque(255, 255, 0));
        {
            let mut strips = fb.column_strips(&[0..8]);
            for x in 0..8 {
                draw_sprite_column(&mut strips[0], x, &p, &tex, 0);
            }
        }
        assert!(fb.pixels().iter().all(|&c| c == Color::opaque(255, 255, 0)));
    }

    fn wall(dist: f32) -> Layer {
        Layer::Wall(TileHit {
            dist,
            tile: tile_data(Tile::Wood.id()),
            side: Side::Vertical,
            cell: (0, 0),
        })
    }

    fn sprite_proj(depth: f32) -> Option<SpriteProjection> {
        Some(SpriteProjection {
            depth,
            tex: 3,
            fog: 1.0,
            screen_x: 4,
            size: 8,
            v_move: 0,
            start_x: 0,
            end_x: 8,
            start_y: 0,
            end_y: 8,
        })
    }

    #[test]
    fn sprite_behind_wall_contributes_nothing() {
        let mut layers: Layers = [wall(3.0)].into_iter().collect();
        merge_sprites(&mut layers, &[sprite_proj(6.0)], 4, 3.0, HIT_CAPACITY);
        assert_eq!(layers.len(), 1);
        assert!(matches!(layers[0], Layer::Wall(_)));
    }

    #[test]
    fn sprites_interleave_by_depth() {
        let glass = |d| {
            Layer::Wall(TileHit {
                dist: d,
                tile: tile_data(Tile::GlassVertical.id()),
                side: Side::Vertical,
                cell: (0, 0),
            })
        };
        let mut layers: Layers = [glass(1.0), glass(4.0)].into_iter().collect();
        let projections = [sprite_proj(2.5), None, sprite_proj(0.5), sprite_proj(-1.0), sprite_proj(9.0)];
        merge_sprites(&mut layers, &projections, 4, f32::INFINITY, HIT_CAPACITY);
        let depths: Vec<f32> = layers.iter().map(Layer::depth).collect();
        assert_eq!(depths, [0.5, 1.0, 2.5, 4.0, 9.0]);
        assert_eq!(layers[0], Layer::Sprite { index: 2, depth: 0.5 });
    }

    #[test]
    fn merge_respects_column_and_cap() {
        let mut layers: Layers = [wall(5.0)].into_iter().collect();
        merge_sprites(&mut layers, &[sprite_proj(2.0)], 8, 5.0, HIT_CAPACITY);
        assert_eq!(layers.len(), 1);

        merge_sprites(&mut layers, &[sprite_proj(2.0), sprite_proj(1.0)], 4, 5.0, 2);
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].depth(), 2.0);
    }
}
