//! Per-column DDA wall caster.
//!
//! A ray leaves the camera through each screen column and steps cell by
//! cell along whichever axis has the nearer grid line. Every drawable cell
//! it crosses goes into a [`HitList`], nearest first; the first opaque cell
//! ends the walk, alpha cells let it continue.

use glam::Vec2;
use log::trace;
use smallvec::SmallVec;

use crate::{
    defs::{TileData, TileFlags},
    engine::Screen,
    renderer::{Color, ColumnStrip, fog_factor},
    world::{Camera, Texture, TileMap, helpers::cell_of},
};

/// Surfaces a single column can record before further hits are dropped.
pub const HIT_CAPACITY: usize = 32;

/// Which grid axis the ray stepped along to reach a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Reached by an X step: the struck face runs along Y.
    Vertical,
    /// Reached by a Y step: the struck face runs along X.
    Horizontal,
}

impl Side {
    /// Tile flag a face needs to be drawn when struck from this side.
    #[inline]
    pub fn face(self) -> TileFlags {
        match self {
            Side::Vertical => TileFlags::VERTICAL,
            Side::Horizontal => TileFlags::HORIZONTAL,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileHit {
    /// Distance along the camera's forward axis (no fisheye).
    pub dist: f32,
    pub tile: TileData,
    pub side: Side,
    pub cell: (i32, i32),
}

pub type HitList = SmallVec<[TileHit; HIT_CAPACITY]>;

/// How a [`cast`] walk ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CastEnd {
    /// Distance to the opaque tile that stopped the ray, recorded or not.
    /// Infinite when the ray left the map.
    pub wall: f32,
    /// Surfaces past the hit cap were dropped.
    pub truncated: bool,
}

impl CastEnd {
    const OPEN: CastEnd = CastEnd {
        wall: f32::INFINITY,
        truncated: false,
    };
}

/// Column `x` of `width` mapped to `[-1, 1]`, sampled at the pixel centre.
#[inline(always)]
pub fn camera_x(x: usize, width: usize) -> f32 {
    2.0 * (x as f32 + 0.5) / width as f32 - 1.0
}

/// Direction of the ray through column `x`.
#[inline(always)]
pub fn ray_dir(camera: &Camera, x: usize, width: usize) -> Vec2 {
    camera.dir() + camera.plane() * camera_x(x, width)
}

/// Start distance and per-cell increment along one axis.
///
/// A zero direction component gives an infinite increment, so the axis
/// never wins the "nearer" comparison; its start distance is pinned to
/// infinity too, because `0 * inf` would otherwise poison the compare with NaN.
#[inline(always)]
fn axis(origin: f32, cell: i32, dir: f32) -> (i32, f32, f32) {
    let delta = (1.0 / dir).abs();
    if delta.is_infinite() {
        return (1, f32::INFINITY, delta);
    }
    if dir < 0.0 {
        (-1, (origin - cell as f32) * delta, delta)
    } else {
        (1, (cell as f32 + 1.0 - origin) * delta, delta)
    }
}

/// Walk the grid from `origin` along `dir`, filling `hits` nearest first.
///
/// Stops at the first non-alpha tile or when the ray leaves the map. Empty
/// cells are not recorded, and once `max_hits` surfaces are in the list the
/// walk goes on without recording so the stopping wall is still found.
pub fn cast(map: &TileMap, origin: Vec2, dir: Vec2, max_hits: usize, hits: &mut HitList) -> CastEnd {
    let (mut cx, mut cy) = cell_of(origin);
    if !map.contains(cx, cy) {
        return CastEnd::OPEN;
    }
    let cap = max_hits.min(HIT_CAPACITY);
    let mut truncated = false;

    let (step_x, mut side_x, delta_x) = axis(origin.x, cx, dir.x);
    let (step_y, mut side_y, delta_y) = axis(origin.y, cy, dir.y);

    loop {
        let (dist, side) = if side_x < side_y {
            let d = side_x;
            side_x += delta_x;
            cx += step_x;
            (d, Side::Vertical)
        } else {
            let d = side_y;
            side_y += delta_y;
            cy += step_y;
            (d, Side::Horizontal)
        };

        let Some(tile) = map.data(cx, cy) else {
            return CastEnd {
                wall: f32::INFINITY,
                truncated,
            };
        };
        if tile.is_empty() {
            continue;
        }
        if hits.len() < cap {
            hits.push(TileHit {
                dist,
                tile,
                side,
                cell: (cx, cy),
            });
        } else if !truncated {
            trace!("hit list full at ({cx}, {cy}), dropping deeper layers");
            truncated = true;
        }
        if !tile.is_alpha() {
            return CastEnd {
                wall: dist,
                truncated,
            };
        }
    }
}

/// Everything the wall slice painter needs besides the hit itself.
pub struct Slice<'a> {
    pub x: usize,
    pub origin: Vec2,
    pub ray: Vec2,
    pub screen: &'a Screen,
    pub fog_cutoff: f32,
}

/// Texture column for a hit: fractional wall coordinate, mirrored so the
/// texture reads the same way from both sides.
#[inline]
pub fn texture_u(hit: &TileHit, origin: Vec2, ray: Vec2, size: usize) -> i32 {
    let along = match hit.side {
        Side::Vertical => origin.y + hit.dist * ray.y,
        Side::Horizontal => origin.x + hit.dist * ray.x,
    };
    let frac = along - along.floor();
    let n = size as i32;
    let u = ((frac * size as f32) as i32).clamp(0, n - 1);
    let mirror = match hit.side {
        Side::Vertical => ray.x > 0.0,
        Side::Horizontal => ray.y < 0.0,
    };
    if mirror { n - u - 1 } else { u }
}

/// Paint one wall hit into column `s.x`.
///
/// Alpha tiles are composited over what is already in the column, or over
/// black when `over_black` is set (first layer drawn in this column).
/// Returns `false` if the face is not visible from the struck side.
pub fn draw_slice(
    strip: &mut ColumnStrip<'_>,
    s: &Slice<'_>,
    hit: &TileHit,
    tex: &Texture,
    over_black: bool,
) -> bool {
    if !hit.tile.flags.contains(hit.side.face()) {
        return false;
    }

    let h = s.screen.h as i64;
    let n = tex.size as i32;
    let fog = fog_factor(hit.dist, s.fog_cutoff);
    let u = texture_u(hit, s.origin, s.ray, tex.size);

    let line = s.screen.h as f32 / hit.dist;
    let half = (line as i64) / 2;
    let center = h / 2;
    let start = (center - half).max(0);
    let end = (center + half).min(h);

    let step = tex.size as f32 / line;
    let mut v = (start - center + half) as f32 * step;

    for y in start..end {
        let ty = (v as i32).rem_euclid(n);
        v += step;

        let mut c = tex.texel(u, ty).scale(fog);
        if hit.side == Side::Horizontal {
            c = c.half();
        }
        let y = y as usize;
        let out = if hit.tile.is_alpha() && !c.is_opaque() {
            let under = if over_black { Color::BLACK } else { strip.get(s.x, y) };
            under.layer(c)
        } else {
            c
        };
        strip.set(s.x, y, out);
    }
    true
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        defs::{Tile, tile_data},
        renderer::FrameBuffer,
        world::helpers::rotate,
    };
    use glam::vec2;

    fn arena5() -> TileMap {
        TileMap::bordered(5, 5, Tile::Wood)
    }

    fn cast_all(map: &TileMap, origin: Vec2, dir: Vec2) -> HitList {
        let mut hits = HitList::new();
        cast(map, origin, dir, HIT_CAPACITY, &mut hits);
        hits
    }

    /// Independent oracle: march the ray in tiny steps and report the first
    /// opaque cell entered together with the ray parameter at the entry.
    fn brute_force(map: &TileMap, origin: Vec2, dir: Vec2) -> Option<((i32, i32), f32)> {
        const STEP: f32 = 1e-3;
        let mut prev = 0.0f32;
        let mut t = STEP;
        while t < 64.0 {
            let cell = cell_of(origin + dir * t);
            match map.data(cell.0, cell.1) {
                None => return None,
                Some(tile) if !tile.is_empty() && !tile.is_alpha() => {
                    // bisect the exact entry point
                    let (mut lo, mut hi) = (prev, t);
                    for _ in 0..40 {
                        let mid = 0.5 * (lo + hi);
                        if cell_of(origin + dir * mid) == cell {
                            hi = mid;
                        } else {
                            lo = mid;
                        }
                    }
                    return Some((cell, hi));
                }
                _ => {}
            }
            prev = t;
            t += STEP;
        }
        None
    }

    fn near_corner(p: Vec2) -> bool {
        let f = p - p.round();
        f.x.abs() < 3e-3 && f.y.abs() < 3e-3
    }

    #[test]
    fn centre_of_arena_facing_east() {
        let map = arena5();
        let cam = Camera::new(vec2(2.5, 2.5), vec2(1.0, 0.0), vec2(0.0, -0.66)).unwrap();
        // one-pixel-wide screen: the only column is the centre one
        let hits = cast_all(&map, cam.pos, ray_dir(&cam, 0, 1));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].side, Side::Vertical);
        assert_eq!(hits[0].cell, (4, 2));
        assert!((hits[0].dist - 1.5).abs() < 1e-6);
    }

    #[test]
    fn matches_brute_force_walk() {
        let map = TileMap::from_rows(&[
            "##########",
            "#........#",
            "#..#.....#",
            "#......#.#",
            "#.##.....#",
            "#........#",
            "#....#...#",
            "##########",
        ])
        .unwrap();
        let origins = [vec2(1.3, 1.7), vec2(4.5, 3.5), vec2(8.2, 6.1), vec2(2.05, 5.9)];
        let mut compared = 0;
        for origin in origins {
            for i in 0..64 {
                let dir = rotate(vec2(1.0, 0.0), i as f32 * std::f32::consts::TAU / 64.0 + 0.013);
                let hits = cast_all(&map, origin, dir);
                let hit = hits.last().expect("closed map always yields a wall");
                let (cell, t) = brute_force(&map, origin, dir).expect("oracle hit");
                if cell != hit.cell {
                    // the two walks may only disagree on a corner graze
                    assert!(near_corner(origin + dir * hit.dist), "{origin} {dir}");
                    continue;
                }
                assert!((hit.dist - t).abs() < 2e-3, "{origin} {dir}: {} vs {t}", hit.dist);
                compared += 1;
            }
        }
        assert!(compared > 200);
    }

    #[test]
    fn axis_parallel_rays_terminate() {
        let map = arena5();
        // origin exactly on a grid line, so 0 * inf would be NaN
        for (origin, dir, cell, dist) in [
            (vec2(2.0, 2.0), vec2(0.0, 1.0), (2, 4), 2.0),
            (vec2(2.0, 2.0), vec2(-1.0, 0.0), (0, 2), 1.0),
            (vec2(2.5, 3.0), vec2(0.0, -1.0), (2, 0), 2.0),
            (vec2(3.0, 2.5), vec2(1.0, 0.0), (4, 2), 1.0),
        ] {
            let hits = cast_all(&map, origin, dir);
            assert_eq!(hits.len(), 1, "{origin} {dir}");
            assert_eq!(hits[0].cell, cell);
            assert!((hits[0].dist - dist).abs() < 1e-6);
        }
    }

    #[test]
    fn open_map_ray_leaves_cleanly() {
        let map = TileMap::new(4, 4);
        let hits = cast_all(&map, vec2(1.5, 1.5), vec2(0.3, 1.0));
        assert!(hits.is_empty());
        // origin outside the grid: nothing to walk
        assert!(cast_all(&map, vec2(-3.0, 1.0), vec2(1.0, 0.0)).is_empty());
    }

    #[test]
    fn alpha_tiles_are_stacked_in_order() {
        let map = TileMap::from_rows(&["......", ".|.|..", "......"]).unwrap();
        let mut hits = HitList::new();
        let end = cast(&map, vec2(0.5, 1.5), vec2(1.0, 0.0), HIT_CAPACITY, &mut hits);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.tile.is_alpha()));
        assert!((hits[0].dist - 0.5).abs() < 1e-6);
        assert!((hits[1].dist - 2.5).abs() < 1e-6);
        assert_eq!(end, CastEnd::OPEN);
    }

    #[test]
    fn hit_list_truncates_softly() {
        let row: String = std::iter::repeat('|').take(HIT_CAPACITY + 10).collect();
        let map = TileMap::from_rows(&[row.as_str()]).unwrap();
        let mut hits = HitList::new();
        assert!(cast(&map, vec2(0.5, 0.5), vec2(1.0, 0.0), 4, &mut hits).truncated);
        assert_eq!(hits.len(), 4);

        hits.clear();
        let end = cast(&map, vec2(0.5, 0.5), vec2(1.0, 0.0), usize::MAX, &mut hits);
        assert!(end.truncated);
        assert_eq!(end.wall, f32::INFINITY);
        assert_eq!(hits.len(), HIT_CAPACITY);
    }

    #[test]
    fn wall_behind_full_hit_list_keeps_its_depth() {
        let map = TileMap::from_rows(&["|||||#"]).unwrap();
        let mut hits = HitList::new();
        let end = cast(&map, vec2(0.5, 0.5), vec2(1.0, 0.0), 2, &mut hits);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.tile.is_alpha()));
        assert!(end.truncated);
        assert!((end.wall - 4.5).abs() < 1e-6);

        // room to spare: the wall is recorded and nothing is dropped
        hits.clear();
        let end = cast(&map, vec2(0.5, 0.5), vec2(1.0, 0.0), HIT_CAPACITY, &mut hits);
        assert!(!end.truncated);
        assert_eq!(hits.last().map(|h| h.dist), Some(end.wall));
    }

    #[test]
    fn unknown_tiles_are_see_through() {
        let mut map = TileMap::bordered(6, 3, Tile::Wood);
        map.set(2, 1, 200u8).unwrap();
        let hits = cast_all(&map, vec2(1.5, 1.5), vec2(1.0, 0.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].cell, (5, 1));
    }

    #[test]
    fn opaque_texels_on_glass_overwrite() {
        let screen = Screen::new(1, 8);
        let frame = Color::opaque(30, 50, 80);
        let tex = Texture::solid("FRAME", 4, frame);
        let mut fb = FrameBuffer::new(1, 8);
        fb.fill(Color::opaque(200, 0, 0));
        let s = Slice {
            x: 0,
            origin: vec2(0.5, 1.5),
            ray: vec2(1.0, 0.0),
            screen: &screen,
            fog_cutoff: 1e9,
        };
        let hit = TileHit {
            dist: 2.0,
            tile: tile_data(Tile::GlassVertical.id()),
            side: Side::Vertical,
            cell: (2, 1),
        };
        {
            let mut strips = fb.column_strips(&[0..1]);
            assert!(draw_slice(&mut strips[0], &s, &hit, &tex, false));
        }
        assert_eq!(fb.get(0, 3), frame);
        assert_eq!(fb.get(0, 0), Color::opaque(200, 0, 0));
    }

    #[test]
    fn texture_u_mirrors_by_direction() {
        let hit = TileHit {
            dist: 1.0,
            tile: tile_data(Tile::Wood.id()),
            side: Side::Vertical,
            cell: (3, 2),
        };
        // hitting an X face heading +X flips, heading -X does not
        let east = texture_u(&hit, vec2(2.0, 2.25), vec2(1.0, 0.0), 32);
        let west = texture_u(&hit, vec2(4.0, 2.25), vec2(-1.0, 0.0), 32);
        assert_eq!(west, 8);
        assert_eq!(east, 32 - 8 - 1);
    }

    #[test]
    fn slice_respects_face_flags_and_shading() {
        let screen = Screen::new(1, 8);
        let tex = Texture::solid("W", 4, Color::opaque(200, 100, 40));
        let mut fb = FrameBuffer::new(1, 8);
        let s = Slice {
            x: 0,
            origin: vec2(1.5, 1.5),
            ray: vec2(0.0, 1.0),
            screen: &screen,
            fog_cutoff: 1e9,
        };
        let mut hit = TileHit {
            dist: 2.0,
            tile: tile_data(Tile::GlassVertical.id()),
            side: Side::Horizontal,
            cell: (1, 3),
        };
        {
            let mut strips = fb.column_strips(&[0..1]);
            // vertical-only glass struck by a Y step is invisible
            assert!(!draw_slice(&mut strips[0], &s, &hit, &tex, true));
            hit.tile = tile_data(Tile::Wood.id());
            assert!(draw_slice(&mut strips[0], &s, &hit, &tex, true));
        }
        // 8 / 2 = 4 rows tall, centred: rows 2..6, halved for the Y side
        assert_eq!(fb.get(0, 1), Color::BLACK);
        assert_eq!(fb.get(0, 2), Color::opaque(100, 50, 20));
        assert_eq!(fb.get(0, 5), Color::opaque(100, 50, 20));
        assert_eq!(fb.get(0, 6), Color::BLACK);
    }
}
