use super::*;

fn spawn_default(now: f64, seed: u64) -> Burst {
    let config = BurstConfig::default();
    Burst::spawn(
        Point::new(200.0, 150.0),
        now,
        config.count,
        &config.palette,
        &config,
        &mut Rng64::new(seed),
    )
}

#[test]
fn burst_draws_within_configured_bounds() {
    let config = BurstConfig::default();
    let burst = spawn_default(0.0, 4);
    assert_eq!(burst.particles().len(), 25);
    for p in burst.particles() {
        assert!(p.displacement.x.abs() <= config.radius);
        assert!(p.displacement.y.abs() <= config.radius);
        assert!(config.delay_s.contains(p.delay_s));
        assert!(config.palette.0.contains(&p.color));
    }
}

#[test]
fn batch_is_gone_after_lifetime() {
    let burst = spawn_default(10.0, 1);
    assert_eq!(burst.live_count(10.0), 25);
    assert_eq!(burst.live_count(11.999), 25);
    assert_eq!(burst.live_count(12.0 + 1e-6), 0);
    assert_eq!(burst.sprites(12.5).count(), 0);
    assert!(burst.is_expired(12.0));
}

#[test]
fn particles_start_at_origin_and_end_at_offset() {
    let burst = spawn_default(0.0, 8);
    let start: Vec<_> = burst.sprites(0.0).collect();
    for s in &start {
        assert_eq!(s.center, Point::new(200.0, 150.0));
        assert_eq!(s.scale, 1.0);
        assert_eq!(s.opacity, 1.0);
    }

    // Longest delay (0.3) + travel (1.2) is still inside the 2s lifetime.
    let end: Vec<_> = burst.sprites(1.6).collect();
    for (s, p) in end.iter().zip(burst.particles()) {
        let expected = Point::new(200.0, 150.0) + p.displacement;
        assert!((s.center - expected).hypot() < 1e-9);
        assert_eq!(s.opacity, 0.0);
    }
}

#[test]
fn delayed_particle_waits_at_origin() {
    let burst = spawn_default(0.0, 21);
    let (idx, p) = burst
        .particles()
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.delay_s.total_cmp(&b.1.delay_s))
        .unwrap();
    let s = burst.sprites(p.delay_s * 0.5).nth(idx).unwrap();
    assert_eq!(s.center, burst.origin());
}

#[test]
fn config_validation() {
    assert!(BurstConfig::default().validate().is_ok());
    let bad = BurstConfig {
        lifetime_s: 0.0,
        ..BurstConfig::default()
    };
    assert!(bad.validate().is_err());
    let bad = BurstConfig {
        palette: Palette(Vec::new()),
        ..BurstConfig::default()
    };
    assert!(bad.validate().is_err());
}
