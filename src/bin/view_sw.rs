//! Walk around the demo room.
//!
//! ```bash
//! cargo run --release -- --width 960 --height 720 --workers 8
//! ```
//!
//! Arrow keys or WASD to move and turn, Escape to quit.

use anyhow::Context;
use clap::Parser;
use log::info;
use minifb::{Key, Window, WindowOptions};
use std::time::{Duration, Instant};

use descent_rs::{
    config::{RenderConfig, RowOrder},
    engine::{
        Engine, InputCmd,
        demo::{demo_textures, demo_world},
    },
};

/// Multithreaded grid ray-caster
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Frame width in pixels
    #[arg(long, default_value_t = 640)]
    width: usize,

    /// Frame height in pixels
    #[arg(long, default_value_t = 480)]
    height: usize,

    /// Render threads
    #[arg(short, long, default_value_t = 4)]
    workers: usize,

    /// Distance (in tiles) at which fog turns everything black
    #[arg(long, default_value_t = 5.0)]
    fog: f32,

    /// Ceiling fog relative to floor fog
    #[arg(long, default_value_t = 0.5)]
    ceiling_fog: f32,

    /// Surfaces kept per column before deeper glass is dropped
    #[arg(long, default_value_t = 32)]
    max_hits: usize,

    /// Sprite texels below this alpha are not drawn
    #[arg(long, default_value_t = 255)]
    sprite_alpha: u8,

    /// Row order of the presented buffer
    #[arg(long, value_enum, default_value_t = RowOrder::TopDown)]
    rows: RowOrder,
}

impl Args {
    fn config(&self) -> RenderConfig {
        RenderConfig {
            width: self.width,
            height: self.height,
            workers: self.workers,
            fog_cutoff: self.fog,
            ceiling_fog_scale: self.ceiling_fog,
            max_tile_hits: self.max_hits,
            sprite_alpha_cutoff: self.sprite_alpha,
            row_order: self.rows,
        }
    }
}

fn read_input(win: &Window) -> InputCmd {
    let mut cmd = InputCmd::default();
    if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
        cmd.forward += 1.0;
    }
    if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
        cmd.forward -= 1.0;
    }
    if win.is_key_down(Key::Left) || win.is_key_down(Key::A) {
        cmd.turn += 1.0;
    }
    if win.is_key_down(Key::Right) || win.is_key_down(Key::D) {
        cmd.turn -= 1.0;
    }
    cmd
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = args.config();

    let world = demo_world().context("building demo world")?;
    let bank = demo_textures().context("generating textures")?;
    let mut engine = Engine::with_config(world, bank, config.clone())?;

    let mut win = Window::new(
        "descent: software ray-caster",
        config.width,
        config.height,
        WindowOptions::default(),
    )?;
    win.set_target_fps(60);
    info!(
        "{}x{} on {} render threads",
        config.width, config.height, config.workers
    );

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();
    let mut last_tick = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();
        let dt = t0.duration_since(last_tick).as_secs_f32();
        last_tick = t0;

        let cmd = read_input(&win);
        let mut shown = Ok(());
        engine.tick(cmd, dt, |fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            shown = win.update_with_buffer(fb, w, h);
        });
        shown.context("presenting frame")?;

        if last_print.elapsed() >= Duration::from_secs(3) && acc_frames > 0 {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            info!("avg render: {avg_ms:.2} ms ({:.1} FPS)", 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
