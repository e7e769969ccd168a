use super::*;

fn engine() -> ParticleEngine {
    ParticleEngine::new(EngineConfig::default(), 42)
}

#[test]
fn ambient_count_survives_resize() {
    let mut e = engine();
    e.start(Viewport::new(800, 600));
    assert_eq!(e.live_ambient_particles(), 30);

    // 2 seconds at 60 fps, then a resize, then 2 more seconds.
    for f in 0..120 {
        assert!(e.tick(f as f64 / 60.0).is_some());
    }
    assert!(e.resize(Viewport::new(400, 900)));
    for f in 120..240 {
        let snap = e.tick(f as f64 / 60.0).unwrap();
        assert_eq!(snap.surface, Viewport::new(400, 900));
        assert_eq!(snap.sprites.len(), 30);
    }
    assert_eq!(e.live_ambient_particles(), 30);
}

#[test]
fn burst_clears_after_lifetime() {
    let mut e = engine();
    e.start(Viewport::new(640, 480));
    assert_eq!(e.burst(Point::new(320.0, 240.0), None, None, 1.0), 25);
    assert_eq!(e.live_burst_particles(1.0), 25);

    let snap = e.tick(1.5).unwrap();
    assert_eq!(snap.sprites.len(), 30 + 25);

    assert_eq!(e.live_burst_particles(3.0 + 1e-6), 0);
    let snap = e.tick(3.0 + 1e-6).unwrap();
    assert_eq!(snap.sprites.len(), 30);
}

#[test]
fn burst_uses_custom_count_and_palette() {
    let mut e = engine();
    e.start(Viewport::new(640, 480));
    let only_red = Palette(vec![crate::foundation::color::Rgba8::rgb(255, 0, 0)]);
    e.burst(Point::new(10.0, 10.0), Some(5), Some(&only_red), 0.0);
    let snap = e.tick(0.1).unwrap();
    let burst: Vec<_> = snap.sprites[30..].to_vec();
    assert_eq!(burst.len(), 5);
    assert!(burst.iter().all(|s| s.color == only_red.0[0]));
}

#[test]
fn stop_and_cancel_are_idempotent() {
    let mut e = engine();
    let first = e.start(Viewport::new(320, 240));
    e.stop();
    e.stop();
    assert!(!e.is_running());
    assert!(!e.cancel(first));
    assert!(e.tick(0.0).is_none());
    assert!(!e.resize(Viewport::new(100, 100)));
}

#[test]
fn stale_handle_does_not_cancel_new_loop() {
    let mut e = engine();
    let first = e.start(Viewport::new(320, 240));
    let second = e.start(Viewport::new(320, 240));
    assert_ne!(first, second);
    assert!(!e.cancel(first));
    assert!(e.is_running());
    assert!(e.cancel(second));
    assert!(!e.cancel(second));
}

#[test]
fn zero_size_surface_waits_for_resize() {
    let mut e = engine();
    e.start(Viewport::new(0, 0));
    assert!(e.is_running());
    assert_eq!(e.live_ambient_particles(), 0);
    assert!(e.tick(0.0).is_none());

    e.resize(Viewport::new(300, 200));
    assert_eq!(e.live_ambient_particles(), 30);
    let snap = e.tick(1.0 / 60.0).unwrap();
    assert_eq!(snap.sprites.len(), 30);
    assert_eq!(snap.frame, FrameIndex(0));
}

#[test]
fn same_seed_same_frames() {
    let mut a = engine();
    let mut b = engine();
    a.start(Viewport::new(500, 500));
    b.start(Viewport::new(500, 500));
    for f in 0..30 {
        let now = f as f64 / 60.0;
        if f == 10 {
            a.burst(Point::new(250.0, 250.0), None, None, now);
            b.burst(Point::new(250.0, 250.0), None, None, now);
        }
        assert_eq!(a.tick(now), b.tick(now));
    }
}

#[test]
fn scrolling_carries_bursts_but_not_ambient_hearts() {
    let mut engine = ParticleEngine::new(EngineConfig::default(), 5);
    engine.start(Viewport::new(800, 600));
    engine.burst(Point::new(400.0, 300.0), Some(4), None, 0.0);

    let before = engine.tick(0.0).unwrap();
    engine.scroll_bursts(-120.0);
    let after = engine.tick(0.0).unwrap();

    let ambient = engine.live_ambient_particles();
    for (a, b) in before.sprites[ambient..].iter().zip(&after.sprites[ambient..]) {
        assert_eq!(b.center.x, a.center.x);
        assert!((b.center.y - (a.center.y - 120.0)).abs() < 1e-9);
    }
}
