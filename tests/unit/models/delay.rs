//! Unit tests for delay specifications

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use taskdemo::models::DelaySpec;

#[test]
fn test_fixed_delay_is_exact() {
    let mut rng = StdRng::seed_from_u64(7);
    let delay = DelaySpec::fixed(120).sample(&mut rng, Duration::ZERO);
    assert_eq!(delay, Duration::from_millis(120));
}

#[test]
fn test_uniform_delay_stays_in_half_open_range() {
    let mut rng = StdRng::seed_from_u64(42);
    let spec = DelaySpec::uniform(50, 150);
    for _ in 0..1000 {
        let delay = spec.sample(&mut rng, Duration::ZERO);
        assert!(delay >= Duration::from_millis(50));
        assert!(delay < Duration::from_millis(150));
    }
}

#[test]
fn test_jitter_delay_stays_around_base() {
    let mut rng = StdRng::seed_from_u64(3);
    let spec = DelaySpec::jitter(300, 50);
    for _ in 0..1000 {
        let delay = spec.sample(&mut rng, Duration::ZERO);
        assert!(delay >= Duration::from_millis(250));
        assert!(delay < Duration::from_millis(350));
    }
}

#[test]
fn test_jitter_below_floor_is_clamped() {
    let mut rng = StdRng::seed_from_u64(11);
    let spec = DelaySpec::jitter(20, 50);
    for _ in 0..500 {
        let delay = spec.sample(&mut rng, Duration::from_millis(10));
        assert!(delay >= Duration::from_millis(10));
        assert!(delay < Duration::from_millis(70));
    }
}

#[test]
fn test_degenerate_range_returns_minimum() {
    let mut rng = StdRng::seed_from_u64(0);
    let delay = DelaySpec::uniform(100, 100).sample(&mut rng, Duration::ZERO);
    assert_eq!(delay, Duration::from_millis(100));
    assert_eq!(DelaySpec::uniform(200, 500).max_ms(), 500);
}
