//! Grid ray-casting software renderer.
//!
//! A [`world::World`] (camera, tile map, sprites) is turned into a pixel
//! buffer by [`renderer::Software`], which splits every frame across the
//! long-lived threads of an [`engine::WorkerPool`].

pub mod config;
pub mod defs;
pub mod engine;
pub mod renderer;
pub mod world;
