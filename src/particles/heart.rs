use crate::foundation::{
    color::Rgba8,
    core::{BezPath, Point, Transform2D, Vec2},
};

/// Heart silhouette of the given size, centered on the origin with the point at +y.
///
/// Two cubic lobes meeting at `(0, -size/2)` (the notch) and `(0, size/2)` (the tip).
pub fn heart_path(size: f64) -> BezPath {
    let s = size;
    let mut path = BezPath::new();
    path.move_to((0.0, -s / 2.0));
    path.curve_to((-s / 2.0, -s), (-s, -s / 3.0), (0.0, s / 2.0));
    path.curve_to((s, -s / 3.0), (s / 2.0, -s), (0.0, -s / 2.0));
    path.close_path();
    path
}

/// One heart glyph to draw this frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct HeartSprite {
    pub center: Point,
    pub size: f64,
    pub rotation_deg: f64,
    pub scale: f64,
    pub opacity: f64,
    pub color: Rgba8,
}

impl HeartSprite {
    pub fn transform(&self) -> Transform2D {
        Transform2D {
            translate: Vec2::new(self.center.x, self.center.y),
            rotation_rad: self.rotation_deg.to_radians(),
            scale: Vec2::new(self.scale, self.scale),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/heart.rs"]
mod tests;
