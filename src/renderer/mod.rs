//! Rendering abstraction layer.
//!
//! *Game logic never touches a pixel buffer directly.* It keeps a
//! [`World`] up to date and hands it to a type implementing [`Renderer`]
//! once per frame.
//!
//! * [`Software`] is the CPU ray-caster; other back-ends can slot in
//!   without changing the frame loop.
//! * A helper blanket‐impl [`RendererExt`] adds `draw_frame` so call-sites
//!   stay short.

pub mod color;
pub mod framebuffer;
pub mod software;

pub use color::{Color, fog_factor};
pub use framebuffer::{ColumnStrip, FrameBuffer};
pub use software::Software;

use crate::{
    engine::{PoolError, WorkerPool},
    world::{TextureBank, World},
};

/// Packed presentation format of the frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Draw the whole world into the internal buffer, spreading the work
    /// over `pool`.
    ///
    /// Sorts `world.sprites` back to front as a side effect.
    fn draw_world(
        &mut self,
        world: &mut World,
        bank: &TextureBank,
        pool: &WorkerPool,
    ) -> Result<(), PoolError>;

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(
        &mut self,
        width: usize,
        height: usize,
        world: &mut World,
        bank: &TextureBank,
        pool: &WorkerPool,
        submit: F,
    ) -> Result<(), PoolError>
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        let drawn = self.draw_world(world, bank, pool);
        self.end_frame(submit);
        drawn
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}
