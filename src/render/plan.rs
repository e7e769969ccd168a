use crate::{
    foundation::{
        color::Rgba8,
        core::{Affine, BezPath, FrameIndex, Viewport},
        math::clamp01,
    },
    particles::{engine::FrameSnapshot, heart::heart_path},
    render::RenderSettings,
};

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Heart {
        path: BezPath,
        transform: Affine,
        color: Rgba8,
        opacity: f32,
    },
}

/// Backend-agnostic description of one overlay frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPlan {
    pub frame: FrameIndex,
    pub surface: Viewport,
    pub clear_rgba: Option<[u8; 4]>,
    /// Applied once to the whole overlay, on top of per-op opacity.
    pub overlay_opacity: f32,
    pub ops: Vec<DrawOp>,
}

/// Turn a particle snapshot into draw ops, one heart per sprite.
///
/// Sprites that are fully transparent or scaled to nothing are skipped.
pub fn compile_frame(snapshot: &FrameSnapshot, settings: &RenderSettings) -> Option<RenderPlan> {
    if !snapshot.surface.is_drawable() {
        return None;
    }

    let ops = snapshot
        .sprites
        .iter()
        .filter(|s| s.opacity > 0.0 && s.scale > 0.0 && s.size > 0.0)
        .map(|s| DrawOp::Heart {
            path: heart_path(s.size),
            transform: s.transform().to_affine(),
            color: s.color,
            opacity: clamp01(s.opacity) as f32,
        })
        .collect();

    Some(RenderPlan {
        frame: snapshot.frame,
        surface: snapshot.surface,
        clear_rgba: settings.clear_rgba,
        overlay_opacity: settings.overlay_opacity_f64() as f32,
        ops,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
