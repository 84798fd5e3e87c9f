use glam::{Vec2, vec2};
use log::{debug, warn};
use thiserror::Error;

use super::{
    TileMap,
    helpers::{cell_of, det, rotate},
};

/// Largest squared displacement a single [`Camera::move_by`] may apply.
///
/// Anything bigger means a runaway velocity or frame delta upstream.
pub const MAX_STEP_SQ: f32 = 0.5;

#[derive(Debug, Error, PartialEq)]
pub enum CameraError {
    #[error("camera dir {dir} and plane {plane} are parallel")]
    Degenerate { dir: Vec2, plane: Vec2 },
}

/// Player view-point on the tile grid.
///
/// * `dir` is the forward vector, `plane` the perpendicular half-width of
///   the view; `|plane| / |dir|` sets the field of view.
/// * `dir` and `plane` stay linearly independent: [`Camera::new`] refuses
///   a parallel pair and [`Camera::rotate`] turns both by the same angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pos: Vec2,
    dir: Vec2,
    plane: Vec2,
}

impl Camera {
    pub fn new(pos: Vec2, dir: Vec2, plane: Vec2) -> Result<Self, CameraError> {
        let d = det(plane, dir);
        if d == 0.0 || !d.is_finite() {
            return Err(CameraError::Degenerate { dir, plane });
        }
        Ok(Self { pos, dir, plane })
    }

    /// Camera looking along `dir` (normalised) with a horizontal FoV of `fov` radians.
    pub fn looking(pos: Vec2, dir: Vec2, fov: f32) -> Result<Self, CameraError> {
        let dir = dir.normalize_or_zero();
        let plane = dir.perp() * -(fov * 0.5).tan();
        Self::new(pos, dir, plane)
    }

    #[inline(always)]
    pub fn dir(&self) -> Vec2 {
        self.dir
    }

    #[inline(always)]
    pub fn plane(&self) -> Vec2 {
        self.plane
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Walk `velocity * dt` along `dir`, refusing to enter solid or
    /// off-map cells. Returns whether the camera moved.
    pub fn move_by(&mut self, map: &TileMap, velocity: f32, dt: f32) -> bool {
        let delta = self.dir * (velocity * dt);
        debug_assert!(
            delta.length_squared() < MAX_STEP_SQ,
            "camera step {delta} too large"
        );
        let Some(delta) = clamp_step(delta) else {
            return false;
        };

        let dest = self.pos + delta;
        let (tx, ty) = cell_of(dest);
        match map.data(tx, ty) {
            Some(tile) if !tile.is_solid() => {
                self.pos = dest;
                true
            }
            _ => {
                debug!("move to {dest} blocked at cell ({tx}, {ty})");
                false
            }
        }
    }

    /// Turn by `angular_velocity * dt` radians (positive = counter-clockwise).
    ///
    /// The only operation that touches `plane`.
    pub fn rotate(&mut self, angular_velocity: f32, dt: f32) {
        let angle = angular_velocity * dt;
        self.dir = rotate(self.dir, angle);
        self.plane = rotate(self.plane, angle);
    }
}

/// Shrink an oversized step to just under `sqrt(MAX_STEP_SQ)`.
/// `None` for a non-finite step.
fn clamp_step(delta: Vec2) -> Option<Vec2> {
    if !delta.is_finite() {
        warn!("dropping non-finite camera step {delta}");
        return None;
    }
    let len_sq = delta.length_squared();
    if len_sq < MAX_STEP_SQ {
        return Some(delta);
    }
    warn!("clamping camera step {delta} (|d|² = {len_sq})");
    Some(delta.clamp_length_max(MAX_STEP_SQ.sqrt() * 0.99))
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pos: vec2(1.5, 1.5),
            dir: vec2(1.0, 0.0),
            plane: vec2(0.0, -0.66),
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
