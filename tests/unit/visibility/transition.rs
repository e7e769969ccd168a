use super::*;

#[test]
fn hidden_until_revealed() {
    let tr = RevealTransition::default();
    let pose = tr.sample(None, 100.0);
    assert_eq!(pose.opacity, 0.0);
    assert_eq!(pose.offset, Vec2::new(0.0, 32.0));
}

#[test]
fn settles_after_duration() {
    let tr = RevealTransition::new(RevealStyle::SlideLeft).delayed(0.2);
    assert_eq!(tr.progress(Some(1.0), 1.1), 0.0);
    let pose = tr.sample(Some(1.0), 2.5);
    assert_eq!(pose, RevealPose::SHOWN);
}

#[test]
fn slide_left_starts_offscreen_left() {
    let tr = RevealTransition::new(RevealStyle::SlideLeft);
    let pose = tr.sample(Some(0.0), 0.0);
    assert_eq!(pose.offset.x, -100.0);
    assert_eq!(pose.rotate_y_deg, 45.0);
}

#[test]
fn stagger_offsets_each_item() {
    let base = RevealTransition::new(RevealStyle::ScaleIn).delayed(0.1);
    let third = base.staggered(2, 0.15);
    assert!((third.delay_s - 0.4).abs() < 1e-12);
    assert_eq!(third.progress(Some(0.0), 0.39), 0.0);
    assert!(third.progress(Some(0.0), 0.5) > 0.0);
}

#[test]
fn bounce_in_overshoots_scale() {
    let tr = RevealTransition::new(RevealStyle::BounceIn);
    let max_scale = (0..=70)
        .map(|i| tr.sample(Some(0.0), f64::from(i) / 100.0).scale)
        .fold(f64::MIN, f64::max);
    assert!(max_scale > 1.0);
    assert!((tr.sample(Some(0.0), 5.0).scale - 1.0).abs() < 1e-9);
}

#[test]
fn zero_duration_jumps_to_shown() {
    let tr = RevealTransition {
        duration_s: 0.0,
        ..RevealTransition::new(RevealStyle::FlipIn)
    };
    assert_eq!(tr.sample(Some(0.0), 0.01), RevealPose::SHOWN);
}

#[test]
fn style_json_is_tagged() {
    let tr: RevealTransition =
        serde_json::from_str(r#"{"style":{"kind":"fade_up","distance":12.0}}"#).unwrap();
    assert_eq!(tr.style, RevealStyle::FadeUp { distance: 12.0 });
    assert_eq!(tr.duration_s, 0.7);
}
