//! Floor and ceiling ("deck") caster.
//!
//! Every row below the horizon sits at a fixed distance from the eye; the
//! row is walked left to right by stepping a world point along the camera
//! plane. The ceiling is the same row mirrored above the horizon, sampled
//! from a different texture with its own fog scale.

use std::ops::Range;

use crate::{
    engine::{Screen, partition},
    renderer::{Color, fog_factor, framebuffer::split_ranges_mut},
    renderer::software::walls::camera_x,
    world::{Camera, Texture, helpers::wrap01},
};

/// Read-only inputs shared by every deck band.
pub struct DeckPass<'a> {
    pub camera: &'a Camera,
    pub screen: &'a Screen,
    pub floor: &'a Texture,
    pub ceiling: &'a Texture,
    pub fog_cutoff: f32,
    pub ceiling_fog_scale: f32,
}

/// A run of floor rows plus their mirrored ceiling rows.
///
/// `rows` counts floor rows from the horizon down (0 = first row below it).
pub struct DeckBand<'a> {
    pub rows: Range<usize>,
    floor: &'a mut [Color],
    ceiling: &'a mut [Color],
    /// Screen row of `ceiling[0]`.
    ceiling_top: usize,
}

/// Mirror of floor row `j` above the horizon, if it has one.
///
/// With an odd height the middle row has no mirror.
#[inline]
fn ceiling_row(j: usize, h: usize) -> Option<usize> {
    let half = h / 2;
    let c = (h - 1 - half).checked_sub(j)?;
    (c < half).then_some(c)
}

/// Cut a top-down `w × h` pixel buffer into at most `parts` deck bands.
///
/// Together the bands own every row exactly once.
pub fn split_decks(pixels: &mut [Color], w: usize, h: usize, parts: usize) -> Vec<DeckBand<'_>> {
    let half = h / 2;
    let (top, bottom) = pixels.split_at_mut(half * w);
    let rows = partition(h - half, parts);

    let floor_ranges: Vec<_> = rows.iter().map(|r| r.start * w..r.end * w).collect();
    // later bands mirror to higher rows, so the ceiling ranges run backwards
    let ceiling_rows: Vec<_> = rows
        .iter()
        .map(|r| (h - half - r.end)..(h - half - r.start).min(half))
        .collect();
    let ceiling_ranges: Vec<_> = ceiling_rows.iter().rev().map(|r| r.start * w..r.end * w).collect();

    let floors = split_ranges_mut(bottom, &floor_ranges);
    let mut ceilings = split_ranges_mut(top, &ceiling_ranges);
    ceilings.reverse();

    rows.into_iter()
        .zip(floors)
        .zip(ceilings)
        .zip(ceiling_rows)
        .map(|(((rows, floor), ceiling), c)| DeckBand {
            rows,
            floor,
            ceiling,
            ceiling_top: c.start,
        })
        .collect()
}

#[inline(always)]
fn sample(tex: &Texture, p: glam::Vec2) -> Color {
    let n = tex.size as f32;
    tex.texel((p.x * n) as i32, (p.y * n) as i32)
}

/// Paint one band of floor rows and their ceiling mirrors.
pub fn draw_band(pass: &DeckPass<'_>, band: DeckBand<'_>) {
    let (w, h) = (pass.screen.w, pass.screen.h);
    let cam = pass.camera;
    let left = cam.dir() + cam.plane() * camera_x(0, w);

    for j in band.rows.clone() {
        let row_dist = 0.5 * h as f32 / (j + 1) as f32;
        let fog = fog_factor(row_dist, pass.fog_cutoff);
        let ceiling_fog = fog * pass.ceiling_fog_scale;
        let step = cam.plane() * (2.0 * row_dist / w as f32);
        let mut point = cam.pos + left * row_dist;

        let at = (j - band.rows.start) * w;
        let floor = &mut band.floor[at..at + w];
        let mut ceiling = match ceiling_row(j, h) {
            Some(c) => {
                let at = (c - band.ceiling_top) * w;
                Some(&mut band.ceiling[at..at + w])
            }
            None => None,
        };

        for x in 0..w {
            let t = wrap01(point);
            point += step;
            floor[x] = sample(pass.floor, t).scale(fog);
            if let Some(row) = ceiling.as_deref_mut() {
                row[x] = sample(pass.ceiling, t).scale(ceiling_fog);
            }
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
