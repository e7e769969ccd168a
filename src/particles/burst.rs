use crate::{
    animation::ease::Ease,
    foundation::{
        color::{Palette, Rgba8},
        core::{Point, Vec2},
        error::{HeartlineError, HeartlineResult},
        math::{Rng64, UniformRange, clamp01},
    },
    particles::heart::HeartSprite,
};

/// Tunables for click bursts.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BurstConfig {
    pub count: usize,
    /// Final displacement per axis is drawn from `[-radius, radius]`.
    pub radius: f64,
    /// Per-particle start delay, seconds.
    pub delay_s: UniformRange,
    /// Time for one particle to travel from origin to its final offset.
    pub travel_s: f64,
    /// Time after which the whole batch is cleared.
    pub lifetime_s: f64,
    pub glyph_size: f64,
    pub ease: Ease,
    pub palette: Palette,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            count: 25,
            radius: 125.0,
            delay_s: UniformRange::new(0.0, 0.3),
            travel_s: 1.2,
            lifetime_s: 2.0,
            glyph_size: 24.0,
            ease: Ease::OutCubic,
            palette: Palette::burst(),
        }
    }
}

impl BurstConfig {
    pub fn validate(&self) -> HeartlineResult<()> {
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(HeartlineError::validation(
                "burst.radius must be finite and >= 0",
            ));
        }
        self.delay_s.validate("burst.delay_s")?;
        if self.delay_s.min < 0.0 {
            return Err(HeartlineError::validation("burst.delay_s must be >= 0"));
        }
        if !self.travel_s.is_finite() || self.travel_s <= 0.0 {
            return Err(HeartlineError::validation(
                "burst.travel_s must be finite and > 0",
            ));
        }
        if !self.lifetime_s.is_finite() || self.lifetime_s <= 0.0 {
            return Err(HeartlineError::validation(
                "burst.lifetime_s must be finite and > 0",
            ));
        }
        if !self.glyph_size.is_finite() || self.glyph_size <= 0.0 {
            return Err(HeartlineError::validation(
                "burst.glyph_size must be finite and > 0",
            ));
        }
        self.palette.validate("burst")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct BurstParticle {
    pub displacement: Vec2,
    pub delay_s: f64,
    pub color: Rgba8,
}

/// A finite, self-terminating batch of hearts flying out of one point.
#[derive(Clone, Debug)]
pub struct Burst {
    origin: Point,
    started_at: f64,
    travel_s: f64,
    lifetime_s: f64,
    glyph_size: f64,
    ease: Ease,
    particles: Vec<BurstParticle>,
}

impl Burst {
    pub fn spawn(
        origin: Point,
        now: f64,
        count: usize,
        palette: &Palette,
        config: &BurstConfig,
        rng: &mut Rng64,
    ) -> Self {
        let spread = UniformRange::new(-config.radius, config.radius);
        let particles = (0..count)
            .map(|_| BurstParticle {
                displacement: Vec2::new(spread.sample(rng), spread.sample(rng)),
                delay_s: config.delay_s.sample(rng),
                color: palette.pick(rng),
            })
            .collect();
        Self {
            origin,
            started_at: now,
            travel_s: config.travel_s,
            lifetime_s: config.lifetime_s,
            glyph_size: config.glyph_size,
            ease: config.ease,
            particles,
        }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn translate(&mut self, by: Vec2) {
        self.origin += by;
    }

    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    pub fn expires_at(&self) -> f64 {
        self.started_at + self.lifetime_s
    }

    pub fn is_expired(&self, now: f64) -> bool {
        now >= self.expires_at()
    }

    /// Members still alive at `now` (the whole batch, or none once expired).
    pub fn live_count(&self, now: f64) -> usize {
        if self.is_expired(now) {
            0
        } else {
            self.particles.len()
        }
    }

    pub fn particles(&self) -> &[BurstParticle] {
        &self.particles
    }

    /// Glyphs for `now`. Before its delay a particle sits at the origin at full
    /// size; afterwards it eases toward its final offset while shrinking and
    /// fading to nothing, and stays there invisible until the batch clears.
    pub fn sprites(&self, now: f64) -> impl Iterator<Item = HeartSprite> + '_ {
        let alive = !self.is_expired(now);
        self.particles
            .iter()
            .filter(move |_| alive)
            .map(move |p| {
                let local = clamp01((now - self.started_at - p.delay_s) / self.travel_s);
                let e = self.ease.apply(local);
                HeartSprite {
                    center: self.origin + p.displacement * e,
                    size: self.glyph_size,
                    rotation_deg: 0.0,
                    scale: 1.0 - e,
                    opacity: 1.0 - e,
                    color: p.color,
                }
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/burst.rs"]
mod tests;
