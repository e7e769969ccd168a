use crate::{
    foundation::{
        color::{Palette, Rgba8},
        core::{Point, Vec2, Viewport},
        error::HeartlineResult,
        math::{Rng64, UniformRange},
    },
    particles::heart::HeartSprite,
};

/// Ranges every ambient heart is drawn from. All draws are uniform.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub count: usize,
    pub size: UniformRange,
    /// Upward speed in px/frame (positive rises).
    pub rise_speed: UniformRange,
    /// Horizontal speed in px/frame.
    pub drift: UniformRange,
    pub opacity: UniformRange,
    pub rotation_deg: UniformRange,
    /// Degrees per frame.
    pub rotation_speed: UniformRange,
    pub palette: Palette,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            count: 30,
            size: UniformRange::new(8.0, 26.0),
            rise_speed: UniformRange::new(0.2, 0.8),
            drift: UniformRange::new(-0.25, 0.25),
            opacity: UniformRange::new(0.2, 0.7),
            rotation_deg: UniformRange::new(0.0, 360.0),
            rotation_speed: UniformRange::new(-1.0, 1.0),
            palette: Palette::ambient(),
        }
    }
}

impl AmbientConfig {
    pub fn validate(&self) -> HeartlineResult<()> {
        self.size.validate("ambient.size")?;
        self.rise_speed.validate("ambient.rise_speed")?;
        self.drift.validate("ambient.drift")?;
        self.opacity.validate("ambient.opacity")?;
        self.rotation_deg.validate("ambient.rotation_deg")?;
        self.rotation_speed.validate("ambient.rotation_speed")?;
        self.palette.validate("ambient")
    }
}

/// One long-lived floating heart.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Particle {
    pub pos: Point,
    /// Displacement per frame.
    pub vel: Vec2,
    pub size: f64,
    pub opacity: f64,
    pub rotation_deg: f64,
    pub rotation_speed: f64,
    pub color: Rgba8,
}

impl Particle {
    fn spawn(config: &AmbientConfig, surface: Viewport, rng: &mut Rng64) -> Self {
        let pos = Point::new(
            rng.next_f64_01() * surface.width_f64(),
            rng.next_f64_01() * surface.height_f64(),
        );
        let size = config.size.sample(rng);
        let rise = config.rise_speed.sample(rng);
        let drift = config.drift.sample(rng);
        Self {
            pos,
            vel: Vec2::new(drift, -rise),
            size,
            opacity: config.opacity.sample(rng),
            color: config.palette.pick(rng),
            rotation_deg: config.rotation_deg.sample(rng),
            rotation_speed: config.rotation_speed.sample(rng),
        }
    }

    pub fn sprite(&self) -> HeartSprite {
        HeartSprite {
            center: self.pos,
            size: self.size,
            rotation_deg: self.rotation_deg,
            scale: 1.0,
            opacity: self.opacity,
            color: self.color,
        }
    }
}

/// Recycle-at-the-edges policy: never destroys a particle.
///
/// Leaving through the top re-enters just below the bottom at a fresh random
/// column; leaving through a side wraps to the other side at the same height.
pub fn apply_boundary(p: &mut Particle, surface: Viewport, rng: &mut Rng64) {
    let margin = p.size * 2.0;
    let w = surface.width_f64();
    let h = surface.height_f64();

    if p.pos.y < -margin {
        p.pos.y = h + margin;
        p.pos.x = rng.next_f64_01() * w;
    }

    if p.pos.x < -margin {
        p.pos.x = w + margin;
    } else if p.pos.x > w + margin {
        p.pos.x = -margin;
    }
}

/// The steady-state population of floating hearts.
#[derive(Clone, Debug)]
pub struct AmbientField {
    particles: Vec<Particle>,
    rng: Rng64,
}

impl AmbientField {
    pub fn seed(config: &AmbientConfig, surface: Viewport, mut rng: Rng64) -> Self {
        let particles = (0..config.count)
            .map(|_| Particle::spawn(config, surface, &mut rng))
            .collect();
        Self { particles, rng }
    }

    /// Advance every particle by one frame, then apply the boundary policy.
    pub fn step(&mut self, surface: Viewport) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.rotation_deg += p.rotation_speed;
            apply_boundary(p, surface, &mut self.rng);
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn sprites(&self) -> impl Iterator<Item = HeartSprite> + '_ {
        self.particles.iter().map(Particle::sprite)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/ambient.rs"]
mod tests;
