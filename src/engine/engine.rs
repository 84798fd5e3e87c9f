use log::{debug, warn};
use thiserror::Error;

use crate::{
    config::{ConfigError, RenderConfig},
    engine::{PoolError, Screen, WorkerPool},
    renderer::{Renderer, RendererExt, Rgba, Software},
    world::{CameraError, TextureBank, TextureError, TileMapError, World},
};

/// Longest frame delta a single tick will simulate, in seconds.
pub const MAX_DT: f32 = 0.05;
/// Radians per second at full turn input.
pub const TURN_SPEED: f32 = 2.0;
/// Tiles per second at full forward input.
pub const MOVE_SPEED: f32 = 3.0;

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Map(#[from] TileMapError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("could not start render workers: {0}")]
    Spawn(#[from] std::io::Error),
}

/// One frame of player input, each axis in `-1.0 ..= 1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCmd {
    /// Positive walks along the view direction.
    pub forward: f32,
    /// Positive turns counter-clockwise.
    pub turn: f32,
}

/// Game-state aggregate: the world, its textures, the renderer and the
/// render threads, advanced one [`Engine::tick`] per displayed frame.
pub struct Engine<R: Renderer = Software> {
    pub world: World,
    pub bank: TextureBank,
    pub renderer: R,
    pub screen: Screen,
    pool: WorkerPool,
}

impl Engine<Software> {
    /// Validate `config`, spawn its workers and wrap a software renderer.
    pub fn with_config(
        world: World,
        bank: TextureBank,
        config: RenderConfig,
    ) -> Result<Self, EngineError> {
        let renderer = Software::new(config.clone())?;
        let pool = WorkerPool::new(config.workers)?;
        debug!(
            "engine up: {}x{} on {} render workers",
            config.width, config.height, config.workers
        );
        Ok(Self::new(world, bank, renderer, pool, config.width, config.height))
    }
}

impl<R: Renderer> Engine<R> {
    pub fn new(
        world: World,
        bank: TextureBank,
        renderer: R,
        pool: WorkerPool,
        w: usize,
        h: usize,
    ) -> Self {
        Self {
            world,
            bank,
            renderer,
            screen: Screen::new(w, h),
            pool,
        }
    }

    /// Advance the clock and the camera. Returns the delta actually used.
    pub fn update(&mut self, cmd: InputCmd, dt: f32) -> f32 {
        let dt = if dt > 0.0 { dt.min(MAX_DT) } else { 0.0 };
        self.world.time += dt;

        let cam = &mut self.world.camera;
        if cmd.turn != 0.0 {
            cam.rotate(TURN_SPEED * cmd.turn.clamp(-1.0, 1.0), dt);
        }
        if cmd.forward != 0.0 {
            cam.move_by(&self.world.map, MOVE_SPEED * cmd.forward.clamp(-1.0, 1.0), dt);
        }
        dt
    }

    /// Draw the current world and loan the packed frame to `submit`.
    pub fn render_frame<F>(&mut self, submit: F) -> Result<(), PoolError>
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.renderer.draw_frame(
            self.screen.w,
            self.screen.h,
            &mut self.world,
            &self.bank,
            &self.pool,
            submit,
        )
    }

    /// One displayed frame: [`update`](Self::update), then render.
    ///
    /// A failed render pass costs that frame only; it is logged and the
    /// next tick starts clean.
    pub fn tick<F>(&mut self, cmd: InputCmd, dt: f32, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.update(cmd, dt);
        if let Err(e) = self.render_frame(submit) {
            warn!("frame at t={:.2}s incomplete: {e}", self.world.time);
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
