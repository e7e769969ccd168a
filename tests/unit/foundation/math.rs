use super::*;

#[test]
fn rng_is_deterministic_per_seed() {
    let mut a = Rng64::new(42);
    let mut b = Rng64::new(42);
    for _ in 0..16 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
    let mut c = Rng64::new(43);
    assert_ne!(Rng64::new(42).next_u64(), c.next_u64());
}

#[test]
fn unit_draws_stay_in_half_open_interval() {
    let mut rng = Rng64::new(7);
    for _ in 0..1000 {
        let v = rng.next_f64_01();
        assert!((0.0..1.0).contains(&v));
        assert!(rng.next_index(8) < 8);
    }
}

#[test]
fn uniform_range_samples_inside_bounds() {
    let mut rng = Rng64::new(1);
    let r = UniformRange::new(-0.25, 0.25);
    for _ in 0..500 {
        assert!(r.contains(r.sample(&mut rng)));
    }
    let fixed = UniformRange::new(3.0, 3.0);
    assert_eq!(fixed.sample(&mut rng), 3.0);
    assert!(fixed.contains(3.0));
}

#[test]
fn uniform_range_validation() {
    assert!(UniformRange::new(0.0, 1.0).validate("x").is_ok());
    assert!(UniformRange::new(2.0, 1.0).validate("x").is_err());
    assert!(UniformRange::new(f64::NAN, 1.0).validate("x").is_err());
}

#[test]
fn clamp01_handles_nan() {
    assert_eq!(clamp01(f64::NAN), 0.0);
    assert_eq!(clamp01(2.0), 1.0);
    assert_eq!(clamp01(-1.0), 0.0);
}

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}
