//! Overlay rasterization: particle snapshots become draw plans, draw plans
//! become premultiplied RGBA8 frames.

pub mod cpu;
pub mod plan;

use crate::{
    foundation::{
        error::{HeartlineError, HeartlineResult},
        math::clamp01,
    },
    particles::engine::FrameSnapshot,
    render::plan::{RenderPlan, compile_frame},
};

#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixels, as image encoders expect.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 {
                px[..3].fill(0);
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    /// Number of pixels with non-zero alpha.
    pub fn painted_pixels(&self) -> usize {
        self.data.chunks_exact(4).filter(|px| px[3] != 0).count()
    }
}

pub trait RenderBackend {
    fn render_plan(&mut self, plan: &RenderPlan) -> HeartlineResult<FrameRGBA>;
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Background the surface is cleared to each frame; transparent when unset.
    pub clear_rgba: Option<[u8; 4]>,
    /// Opacity the whole particle overlay is composited with.
    pub overlay_opacity: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_rgba: None,
            overlay_opacity: 0.7,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> HeartlineResult<()> {
        if !self.overlay_opacity.is_finite() || !(0.0..=1.0).contains(&self.overlay_opacity) {
            return Err(HeartlineError::validation(
                "render.overlay_opacity must be within [0, 1]",
            ));
        }
        Ok(())
    }

    pub(crate) fn overlay_opacity_f64(&self) -> f64 {
        clamp01(f64::from(self.overlay_opacity))
    }
}

/// Compile and rasterize one snapshot. `None` when there is nothing to draw on.
pub fn render_frame(
    backend: &mut dyn RenderBackend,
    snapshot: &FrameSnapshot,
    settings: &RenderSettings,
) -> HeartlineResult<Option<FrameRGBA>> {
    match compile_frame(snapshot, settings) {
        Some(plan) => backend.render_plan(&plan).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
#[path = "../tests/unit/render.rs"]
mod tests;
