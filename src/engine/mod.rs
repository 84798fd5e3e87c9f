//! Frame loop plumbing: the render thread pool, screen constants and the
//! [`Engine`] aggregate that ties a world to a renderer.

pub mod demo;
#[allow(clippy::module_inception)]
pub mod engine;
pub mod pool;
pub mod types;

pub use engine::{Engine, EngineError, InputCmd};
pub use pool::{PoolError, WorkerPool, partition};
pub use types::Screen;
