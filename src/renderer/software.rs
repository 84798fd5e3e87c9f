//! ---------------------------------------------------------------------------
//! Grid ray-casting software (CPU) renderer
//!
//! * Draws into a top-down [`FrameBuffer`] and hands out **0xAARRGGBB** words
//!   in the configured [`RowOrder`](crate::config::RowOrder).
//! * A frame is two fan-out/fan-in passes over the [`WorkerPool`]: floor and
//!   ceiling bands first, then column strips of walls and sprites drawn
//!   back to front over them.
//!
//! Workers only ever see read-only world data plus the disjoint piece of
//! the frame buffer (and depth buffer) they were given.
//! ---------------------------------------------------------------------------

pub mod planes;
pub mod sprites;
pub mod walls;

use crate::{
    config::{ConfigError, RenderConfig},
    engine::{PoolError, Screen, WorkerPool, partition},
    renderer::{Color, ColumnStrip, FrameBuffer, Renderer, Rgba, framebuffer::split_ranges_mut},
    world::{TextureBank, World, sort_back_to_front},
};
use planes::{DeckPass, draw_band, split_decks};
use sprites::{Layer, Layers, SpriteProjection, bob_offset, draw_sprite_column, merge_sprites, project};
use walls::{HIT_CAPACITY, HitList, Slice, cast, draw_slice, ray_dir};

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

pub struct Software {
    config: RenderConfig,
    screen: Screen,
    scratch: FrameBuffer,
    /// Per-column depth of the occluding wall, valid for the last frame.
    depth: Vec<f32>,
    projections: Vec<Option<SpriteProjection>>,
    packed: Vec<Rgba>,
}

impl Software {
    pub fn new(config: RenderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (w, h) = (config.width, config.height);
        Ok(Self {
            screen: Screen::new(w, h),
            scratch: FrameBuffer::new(w, h),
            depth: vec![f32::INFINITY; w],
            projections: Vec::new(),
            packed: Vec::with_capacity(w * h),
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The frame as last drawn, before packing.
    #[inline]
    pub fn frame(&self) -> &FrameBuffer {
        &self.scratch
    }

    #[inline]
    pub fn depth(&self) -> &[f32] {
        &self.depth
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.screen.w || h != self.screen.h {
            self.screen = Screen::new(w, h);
            self.scratch.resize(w, h);
        }
        self.depth.clear();
        self.depth.resize(w, f32::INFINITY);
        self.scratch.fill(Color::BLACK);
    }

    fn draw_world(
        &mut self,
        world: &mut World,
        bank: &TextureBank,
        pool: &WorkerPool,
    ) -> Result<(), PoolError> {
        let screen = self.screen;
        if screen.w == 0 || screen.h == 0 {
            return Ok(());
        }
        let cfg = &self.config;

        /* sprites: sort far → near, then project once for every column */
        sort_back_to_front(&mut world.sprites, world.camera.pos);
        let bob = bob_offset(world.time);
        self.projections.clear();
        self.projections.extend(
            world
                .sprites
                .iter()
                .map(|s| project(s, &world.camera, &screen, bob, cfg.fog_cutoff)),
        );
        let world = &*world;

        /* floor + ceiling, split by rows ------------------------------------*/
        let pass = DeckPass {
            camera: &world.camera,
            screen: &screen,
            floor: bank.texture_or_missing(world.floor_tex),
            ceiling: bank.texture_or_missing(world.ceiling_tex),
            fog_cutoff: cfg.fog_cutoff,
            ceiling_fog_scale: cfg.ceiling_fog_scale,
        };
        let pass = &pass;
        let bands = split_decks(self.scratch.pixels_mut(), screen.w, screen.h, pool.len());
        let decks = pool.scatter(
            bands
                .into_iter()
                .map(|band| move || draw_band(pass, band))
                .collect(),
        );

        /* walls + sprites, split by columns ---------------------------------*/
        let facing = FacingPass {
            world,
            bank,
            screen: &screen,
            projections: &self.projections,
            config: cfg,
        };
        let facing = &facing;
        let columns = partition(screen.w, pool.len());
        let strips = self.scratch.column_strips(&columns);
        let depths = split_ranges_mut(&mut self.depth, &columns);
        let walls = pool.scatter(
            strips
                .into_iter()
                .zip(depths)
                .map(|(strip, depth)| move || facing.draw_strip(strip, depth))
                .collect(),
        );

        decks.and(walls)
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.scratch.pack_argb(&mut self.packed, self.config.row_order);
        submit(&self.packed, self.screen.w, self.screen.h);
    }
}

/*──────────────────────── column rendering ───────────────────────────*/

/// Read-only context shared by every column strip.
struct FacingPass<'a> {
    world: &'a World,
    bank: &'a TextureBank,
    screen: &'a Screen,
    projections: &'a [Option<SpriteProjection>],
    config: &'a RenderConfig,
}

impl FacingPass<'_> {
    fn draw_strip(&self, mut strip: ColumnStrip<'_>, depth: &mut [f32]) {
        let cam = &self.world.camera;
        let cap = self.config.max_tile_hits.min(HIT_CAPACITY);
        let mut hits = HitList::new();
        let mut layers = Layers::new();

        for (x, depth) in strip.columns().zip(depth.iter_mut()) {
            let ray = ray_dir(cam, x, self.screen.w);
            hits.clear();
            *depth = cast(&self.world.map, cam.pos, ray, cap, &mut hits).wall;

            layers.clear();
            layers.extend(hits.iter().copied().map(Layer::Wall));
            merge_sprites(&mut layers, self.projections, x, *depth, cap);

            let slice = Slice {
                x,
                origin: cam.pos,
                ray,
                screen: self.screen,
                fog_cutoff: self.config.fog_cutoff,
            };
            self.composite(&mut strip, &slice, &layers);
        }
    }

    /// Draw `layers` (nearest first) back to front into column `s.x`.
    fn composite(&self, strip: &mut ColumnStrip<'_>, s: &Slice<'_>, layers: &[Layer]) {
        let mut over_black = true;
        for layer in layers.iter().rev() {
            match *layer {
                Layer::Wall(hit) => {
                    let tex = self.bank.texture_or_missing(hit.tile.tex);
                    if draw_slice(strip, s, &hit, tex, over_black) {
                        over_black = false;
                    }
                }
                Layer::Sprite { index, .. } => {
                    // a stale index is skipped rather than trusted
                    let Some(Some(p)) = self.projections.get(index) else {
                        continue;
                    };
                    let tex = self.bank.texture_or_missing(p.tex);
                    draw_sprite_column(strip, s.x, p, tex, self.config.sprite_alpha_cutoff);
                    over_black = false;
                }
            }
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
