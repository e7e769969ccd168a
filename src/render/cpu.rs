use crate::{
    foundation::{
        core::Viewport,
        error::{HeartlineError, HeartlineResult},
    },
    render::{
        FrameRGBA, RenderBackend,
        plan::{DrawOp, RenderPlan},
    },
};

/// Software rasterizer for the particle overlay, backed by `vello_cpu`.
///
/// The pixmap is reused across frames while the surface size is unchanged.
#[derive(Default)]
pub struct CpuRenderer {
    surface: Option<CpuSurface>,
}

struct CpuSurface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

impl CpuRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_surface(&mut self, size: Viewport) -> HeartlineResult<&mut CpuSurface> {
        let width: u16 = size
            .width
            .try_into()
            .map_err(|_| HeartlineError::render("surface width exceeds u16"))?;
        let height: u16 = size
            .height
            .try_into()
            .map_err(|_| HeartlineError::render("surface height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(HeartlineError::render("surface has zero area"));
        }

        let stale = self
            .surface
            .as_ref()
            .is_none_or(|s| s.width != width || s.height != height);
        if stale {
            tracing::debug!(width, height, "allocating overlay pixmap");
            self.surface = None;
        }
        Ok(self.surface.get_or_insert_with(|| CpuSurface {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
        }))
    }
}

impl RenderBackend for CpuRenderer {
    #[tracing::instrument(level = "trace", skip_all, fields(frame = plan.frame.0, ops = plan.ops.len()))]
    fn render_plan(&mut self, plan: &RenderPlan) -> HeartlineResult<FrameRGBA> {
        let surface = self.ensure_surface(plan.surface)?;
        clear_pixmap(&mut surface.pixmap, [0, 0, 0, 0]);

        let mut ctx = vello_cpu::RenderContext::new(surface.width, surface.height);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        if let Some([r, g, b, a]) = plan.clear_rgba {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(surface.width),
                f64::from(surface.height),
            ));
        }

        let overlay = plan.overlay_opacity < 1.0;
        if overlay {
            ctx.push_opacity_layer(plan.overlay_opacity);
        }
        for op in &plan.ops {
            draw_op(&mut ctx, op);
        }
        if overlay {
            ctx.pop_layer();
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut surface.pixmap);

        Ok(FrameRGBA {
            width: u32::from(surface.width),
            height: u32::from(surface.height),
            data: surface.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn draw_op(ctx: &mut vello_cpu::RenderContext, op: &DrawOp) {
    match op {
        DrawOp::Heart {
            path,
            transform,
            color,
            opacity,
        } => {
            ctx.set_transform(affine_to_cpu(*transform));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                color.r, color.g, color.b, color.a,
            ));
            if *opacity < 1.0 {
                ctx.push_opacity_layer(*opacity);
            }
            ctx.fill_path(&bezpath_to_cpu(path));
            if *opacity < 1.0 {
                ctx.pop_layer();
            }
        }
    }
}

fn affine_to_cpu(a: crate::foundation::core::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: crate::foundation::core::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &crate::foundation::core::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
