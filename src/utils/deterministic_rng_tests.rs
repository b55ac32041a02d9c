use rand::{Rng, RngCore};
use crate::utils::{DeterministicRng, FALLBACK_RNG_SEED};

#[test]
fn test_known_xorshift_sequence() {
    let mut rng = DeterministicRng::new(1);
    assert_eq!(rng.next_u32(), 270_369);
    assert_eq!(rng.next_u32(), 67_634_689);
    assert_eq!(rng.next_u32(), 2_647_435_461);
}

#[test]
fn test_zero_seed_uses_fallback() {
    let mut zero = DeterministicRng::new(0);
    let mut fallback = DeterministicRng::new(FALLBACK_RNG_SEED);
    assert_eq!(zero.state(), FALLBACK_RNG_SEED);
    for _ in 0..16 {
        assert_eq!(zero.next_u32(), fallback.next_u32());
    }
}

#[test]
fn test_float01_uses_high_bits() {
    let mut rng = DeterministicRng::new(42);
    // First output for seed 42 is 11355432; its top 24 bits are 44357.
    let expected = 44_357.0 / 16_777_216.0;
    assert_eq!(rng.next_float01(), expected);
}

#[test]
fn test_float01_stays_in_unit_interval() {
    let mut rng = DeterministicRng::new(7);
    for _ in 0..10_000 {
        let x = rng.next_float01();
        assert!((0.0..1.0).contains(&x), "{} escaped [0, 1)", x);
    }
}

#[test]
fn test_range_interpolates_bounds() {
    let mut rng = DeterministicRng::new(99);
    for _ in 0..1_000 {
        let x = rng.range(0.65, 1.55);
        assert!(x >= 0.65 && x < 1.55, "{} outside [0.65, 1.55)", x);
    }
    // Degenerate range collapses to the bound.
    assert_eq!(rng.range(3.0, 3.0), 3.0);
}

#[test]
fn test_rng_core_matches_inherent_stream() {
    let mut a = DeterministicRng::new(1234);
    let mut b = DeterministicRng::new(1234);
    let low = a.next_u32() as u64;
    let high = a.next_u32() as u64;
    assert_eq!(RngCore::next_u64(&mut b), (high << 32) | low);

    let mut c = DeterministicRng::new(5);
    let mut d = DeterministicRng::new(5);
    let mut bytes = [0u8; 6];
    c.fill_bytes(&mut bytes);
    let first = d.next_u32().to_le_bytes();
    let second = d.next_u32().to_le_bytes();
    assert_eq!(&bytes[..4], &first[..]);
    assert_eq!(&bytes[4..], &second[..2]);
}

#[test]
fn test_rand_distributions_are_reproducible() {
    let mut a = DeterministicRng::new(2024);
    let mut b = DeterministicRng::new(2024);
    let xs: Vec<u32> = (0..32).map(|_| a.random_range(0..100)).collect();
    let ys: Vec<u32> = (0..32).map(|_| b.random_range(0..100)).collect();
    assert_eq!(xs, ys);
    assert!(xs.iter().all(|&x| x < 100));
}
