use super::*;
use kurbo::Shape;

#[test]
fn silhouette_spans_expected_box() {
    let bbox = heart_path(20.0).bounding_box();
    assert!(bbox.x0 > -20.0 && bbox.x0 < -5.0);
    assert!(bbox.x1 < 20.0 && bbox.x1 > 5.0);
    assert!((bbox.y1 - 10.0).abs() < 1e-9);
    assert!(bbox.y0 < -10.0 && bbox.y0 > -20.0);
    assert!((bbox.center().x).abs() < 1e-9);
}

#[test]
fn path_is_closed_with_two_lobes() {
    let path = heart_path(10.0);
    let els = path.elements();
    assert_eq!(els.len(), 4);
    assert!(matches!(els[3], kurbo::PathEl::ClosePath));
}

#[test]
fn sprite_transform_uses_degrees() {
    let sprite = HeartSprite {
        center: Point::new(3.0, 4.0),
        size: 10.0,
        rotation_deg: 180.0,
        scale: 0.5,
        opacity: 1.0,
        color: Rgba8::rgb(255, 0, 0),
    };
    let t = sprite.transform();
    assert_eq!(t.translate, Vec2::new(3.0, 4.0));
    assert!((t.rotation_rad - std::f64::consts::PI).abs() < 1e-12);
    assert_eq!(t.scale, Vec2::new(0.5, 0.5));
}
