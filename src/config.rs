//! Renderer tuning knobs.
//!
//! None of these change correctness except where [`RenderConfig::validate`]
//! says so; the defaults reproduce a 640×480, four-thread, 60 Hz target.

use thiserror::Error;

use crate::renderer::software::walls::HIT_CAPACITY;

/// Which way the packed output rows run.
///
/// The internal frame buffer is always top-down; this only affects
/// [`crate::renderer::FrameBuffer::pack_argb`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RowOrder {
    /// Row 0 is the top of the screen (minifb, softbuffer, most APIs).
    #[default]
    TopDown,
    /// Row 0 is the bottom of the screen (bottom-up DIBs).
    BottomUp,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// Render threads kept alive for the whole process.
    pub workers: usize,
    /// Distance at which fog reaches full black; sprites past it are culled.
    pub fog_cutoff: f32,
    /// Ceiling fog is the floor fog times this factor.
    pub ceiling_fog_scale: f32,
    /// Surfaces recorded per column; deeper alpha stacks are truncated.
    pub max_tile_hits: usize,
    /// Sprite texels with alpha below this are skipped.
    pub sprite_alpha_cutoff: u8,
    pub row_order: RowOrder,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            workers: 4,
            fog_cutoff: 5.0,
            ceiling_fog_scale: 0.5,
            max_tile_hits: HIT_CAPACITY,
            sprite_alpha_cutoff: 255,
            row_order: RowOrder::TopDown,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("frame size {width}x{height} must be non-zero")]
    EmptyFrame { width: usize, height: usize },

    #[error("need at least one worker")]
    NoWorkers,

    #[error("fog cutoff {0} must be positive and finite")]
    BadFogCutoff(f32),

    #[error("max tile hits {0} outside 1..={max}", max = HIT_CAPACITY)]
    BadHitCap(usize),
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyFrame {
                width: self.width,
                height: self.height,
            });
        }
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if !(self.fog_cutoff > 0.0 && self.fog_cutoff.is_finite()) {
            return Err(ConfigError::BadFogCutoff(self.fog_cutoff));
        }
        if self.max_tile_hits == 0 || self.max_tile_hits > HIT_CAPACITY {
            return Err(ConfigError::BadHitCap(self.max_tile_hits));
        }
        Ok(())
    }
}
