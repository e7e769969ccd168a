use crate::{
    foundation::{
        color::Palette,
        core::{FrameIndex, Point, Vec2, Viewport},
        error::HeartlineResult,
        math::Rng64,
    },
    particles::{
        ambient::{AmbientConfig, AmbientField},
        burst::{Burst, BurstConfig},
        heart::HeartSprite,
    },
};

const AMBIENT_STREAM: u64 = 0xA4B1;
const BURST_STREAM: u64 = 0xB025;

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub ambient: AmbientConfig,
    pub burst: BurstConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> HeartlineResult<()> {
        self.ambient.validate()?;
        self.burst.validate()
    }
}

/// Identifies one run of the frame loop. Cancelling with a handle from an
/// earlier run is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoopHandle {
    generation: u64,
}

/// Everything drawn in one frame, in paint order (ambient first, bursts on top).
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameSnapshot {
    pub frame: FrameIndex,
    pub surface: Viewport,
    pub sprites: Vec<HeartSprite>,
}

/// Owns the overlay surface size, the ambient population and in-flight bursts.
#[derive(Debug)]
pub struct ParticleEngine {
    config: EngineConfig,
    ambient_rng: Rng64,
    burst_rng: Rng64,
    surface: Option<Viewport>,
    ambient: Option<AmbientField>,
    bursts: Vec<Burst>,
    generation: u64,
    running: bool,
    resize_subscribed: bool,
    frame: u64,
}

impl ParticleEngine {
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        let mut root = Rng64::new(seed);
        Self {
            config,
            ambient_rng: root.fork(AMBIENT_STREAM),
            burst_rng: root.fork(BURST_STREAM),
            surface: None,
            ambient: None,
            bursts: Vec::new(),
            generation: 0,
            running: false,
            resize_subscribed: false,
            frame: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Acquire a surface matching `surface`, subscribe to resizes and start the
    /// frame loop. A zero-sized surface starts the loop without seeding
    /// anything; the first drawable [`resize`](Self::resize) seeds it.
    ///
    /// Starting while already running restarts the loop under a new handle.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn start(&mut self, surface: Viewport) -> LoopHandle {
        if self.running {
            self.stop();
        }
        self.generation += 1;
        self.running = true;
        self.resize_subscribed = true;
        self.surface = Some(surface);
        self.seed_if_needed();
        if self.ambient.is_none() {
            tracing::debug!(
                width = surface.width,
                height = surface.height,
                "surface not drawable; waiting for resize"
            );
        }
        LoopHandle {
            generation: self.generation,
        }
    }

    /// Stop the frame loop and drop the resize subscription. Idempotent.
    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!(generation = self.generation, "frame loop stopped");
        }
        self.running = false;
        self.resize_subscribed = false;
    }

    /// Stop the loop identified by `handle`. Returns whether anything was stopped.
    pub fn cancel(&mut self, handle: LoopHandle) -> bool {
        if !self.running || handle.generation != self.generation {
            return false;
        }
        self.stop();
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn surface(&self) -> Option<Viewport> {
        self.surface
    }

    /// Track a viewport size change. Ignored once stopped.
    ///
    /// Existing particles keep their positions; the boundary policy folds any
    /// that end up outside the new surface back in over the following frames.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if !self.resize_subscribed {
            return false;
        }
        self.surface = Some(viewport);
        self.seed_if_needed();
        true
    }

    /// Advance one display frame and return what to draw.
    ///
    /// Returns `None` when the loop is stopped or no drawable surface exists.
    /// Expired bursts are cleared here whether or not anything is drawn.
    pub fn tick(&mut self, now: f64) -> Option<FrameSnapshot> {
        self.bursts.retain(|b| !b.is_expired(now));
        if !self.running {
            return None;
        }
        let surface = self.surface.filter(|s| s.is_drawable())?;
        let ambient = self.ambient.as_mut()?;

        ambient.step(surface);
        let frame = FrameIndex(self.frame);
        self.frame += 1;

        let sprites = ambient
            .sprites()
            .chain(self.bursts.iter().flat_map(|b| b.sprites(now)))
            .collect();
        Some(FrameSnapshot {
            frame,
            surface,
            sprites,
        })
    }

    /// Spawn a burst at `origin`. `count` and `palette` fall back to the
    /// configured defaults.
    pub fn burst(
        &mut self,
        origin: Point,
        count: Option<usize>,
        palette: Option<&Palette>,
        now: f64,
    ) -> usize {
        let cfg = &self.config.burst;
        let count = count.unwrap_or(cfg.count);
        let palette = palette.unwrap_or(&cfg.palette);
        let burst = Burst::spawn(origin, now, count, palette, cfg, &mut self.burst_rng);
        tracing::debug!(x = origin.x, y = origin.y, count, "burst spawned");
        self.bursts.push(burst);
        count
    }

    /// Shift live bursts by `dy` surface pixels so they stay attached to the
    /// content that spawned them when the page scrolls. Ambient hearts stay put.
    pub fn scroll_bursts(&mut self, dy: f64) {
        if dy == 0.0 {
            return;
        }
        for burst in &mut self.bursts {
            burst.translate(Vec2::new(0.0, dy));
        }
    }

    pub fn live_ambient_particles(&self) -> usize {
        self.ambient.as_ref().map_or(0, AmbientField::len)
    }

    pub fn live_burst_particles(&self, now: f64) -> usize {
        self.bursts.iter().map(|b| b.live_count(now)).sum()
    }

    pub fn ambient(&self) -> Option<&AmbientField> {
        self.ambient.as_ref()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frame
    }

    fn seed_if_needed(&mut self) {
        if self.ambient.is_some() {
            return;
        }
        let Some(surface) = self.surface.filter(|s| s.is_drawable()) else {
            return;
        };
        let rng = self.ambient_rng.fork(self.generation);
        let field = AmbientField::seed(&self.config.ambient, surface, rng);
        tracing::debug!(count = field.len(), "ambient population seeded");
        self.ambient = Some(field);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/engine.rs"]
mod tests;
