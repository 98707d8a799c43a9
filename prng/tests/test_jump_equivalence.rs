//! Jump Equivalence Tests - Jump-Ahead vs Sequential Discard
//!
//! Critical invariants tested:
//! - `jump(n)` equals `discard(n)` bit for bit for n = 0, 1 and small n
//! - Jumps compose: `jump(a); jump(b)` equals `jump(a + b)`, which carries the
//!   check to distances near 2^32 where stepping is too slow to compare
//! - MWC64X jumps wrap at the period and leave its fixed points in place
//! - Distances past 2^32 match a full sequential walk (ignored by default)
//! - The harness accepts correct engines over random populations

use lane_prng::harness::{jump_matches_discard, verify_jump_equivalence};
use lane_prng::{Engine, JumpAhead, Mwc64x, TinyMt32, TinyMt64};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MWC64X_PERIOD: u64 = 9_223_191_774_929_879_039;

// ============================================================================
// Test Helpers
// ============================================================================

fn jumped<E: JumpAhead>(engine: E, distance: u64) -> E {
    let mut engine = engine;
    engine.jump(distance);
    engine
}

fn discarded<E: Engine>(engine: E, count: u64) -> E {
    let mut engine = engine;
    engine.discard(count);
    engine
}

/// Random population and per-engine distances, reproducible from `seed`
fn random_population<E>(seed: u64, size: usize, max_distance: u64) -> (Vec<E>, Vec<u64>)
where
    E: JumpAhead,
    rand::distributions::Standard: rand::distributions::Distribution<E::Output>,
{
    let mut rng = StdRng::seed_from_u64(seed);
    let population = (0..size)
        .map(|_| {
            let mut engine = E::new(rng.gen());
            engine.discard(rng.gen_range(0..64));
            engine
        })
        .collect();
    let distances = (0..size).map(|_| rng.gen_range(0..=max_distance)).collect();
    (population, distances)
}

fn assert_small_distances<E: JumpAhead>(engine: E) {
    for n in [0u64, 1, 2, 3, 126, 127, 128, 129, 255, 256, 1000, 4097] {
        assert!(jump_matches_discard(&engine, n), "distance {}", n);
    }
}

fn assert_composes_near_2_32<E: JumpAhead>(engine: E) {
    let near = 1u64 << 32;
    for offset in [0u64, 1, 7, 300] {
        let whole = jumped(engine, near - 1 + offset);
        let split = discarded(jumped(engine, near - 1), offset);
        assert_eq!(whole, split, "2^32 - 1 + {}", offset);
    }

    let a = (1u64 << 31) + 12_345;
    let b = (1u64 << 31) - 999;
    assert_eq!(jumped(jumped(engine, a), b), jumped(engine, a + b));
}

// ============================================================================
// Small Distances
// ============================================================================

#[test]
fn test_jump_zero_is_noop() {
    let engine = TinyMt64::new(5);
    assert_eq!(jumped(engine, 0), engine);
    let engine = TinyMt32::new(5);
    assert_eq!(jumped(engine, 0), engine);
    let engine = Mwc64x::new(5);
    assert_eq!(jumped(engine, 0), engine);
}

#[test]
fn test_jump_one_is_one_step() {
    let mut engine = TinyMt64::new(5);
    let expected = jumped(engine, 1);
    engine.next();
    assert_eq!(engine, expected);
}

#[test]
fn test_small_distances_tinymt64() {
    assert_small_distances(TinyMt64::new(1));
    assert_small_distances(TinyMt64::from_state([u64::MAX, u64::MAX]));
}

#[test]
fn test_small_distances_tinymt32() {
    assert_small_distances(TinyMt32::new(1));
    assert_small_distances(TinyMt32::from_state([u32::MAX; 4]));
}

#[test]
fn test_small_distances_mwc64x() {
    assert_small_distances(Mwc64x::new(1));
    assert_small_distances(Mwc64x::new(0));
}

// ============================================================================
// Large Distances
// ============================================================================

#[test]
fn test_composes_near_2_32_tinymt64() {
    assert_composes_near_2_32(TinyMt64::new(2024));
}

#[test]
fn test_composes_near_2_32_tinymt32() {
    assert_composes_near_2_32(TinyMt32::new(2024));
}

#[test]
fn test_composes_near_2_32_mwc64x() {
    assert_composes_near_2_32(Mwc64x::new(2024));
}

#[test]
fn test_mwc64x_jump_wraps_at_period() {
    let engine = Mwc64x::new(31337);
    assert_eq!(jumped(engine, MWC64X_PERIOD), engine);
    assert_eq!(jumped(engine, MWC64X_PERIOD + 5), discarded(engine, 5));
    assert_eq!(jumped(engine, MWC64X_PERIOD - 1), {
        let mut back = jumped(engine, MWC64X_PERIOD - 2);
        back.next();
        back
    });
}

#[test]
fn test_mwc64x_fixed_points_jump_like_discard() {
    let upper = Mwc64x::from_state([u32::MAX, 4_294_883_354]);
    let zero = Mwc64x::from_state([0, 0]);
    let population = [upper, zero, upper, zero];
    assert_eq!(
        verify_jump_equivalence(&population, &[1, 1, 1000, 77]),
        Ok(())
    );
    assert_eq!(jumped(upper, MWC64X_PERIOD + 3), upper);
    assert_eq!(jumped(zero, u64::MAX), zero);
}

#[test]
fn test_mwc64x_raw_carry_above_multiplier() {
    let population = [
        Mwc64x::from_state([u32::MAX, u32::MAX]),
        Mwc64x::from_state([u32::MAX, 4_294_883_355]),
        Mwc64x::from_state([7, 4_294_950_000]),
    ];
    assert_eq!(verify_jump_equivalence(&population, &[1, 2, 500]), Ok(()));
}

/// Full sequential walk past 2^32; slow, run with `--ignored`
#[test]
#[ignore]
fn test_discard_past_2_32_tinymt32() {
    let engine = TinyMt32::new(2024);
    for offset in [0u64, 1, 17] {
        let distance = (1u64 << 32) + offset;
        assert_eq!(
            jumped(engine, distance),
            discarded(engine, distance),
            "2^32 + {}",
            offset
        );
    }
}

/// Full sequential walk to 2^32 - 1; slow, run with `--ignored`
#[test]
#[ignore]
fn test_discard_near_2_32_tinymt64() {
    let engine = TinyMt64::new(2024);
    let distance = (1u64 << 32) - 1;
    assert!(jump_matches_discard(&engine, distance));
}

#[test]
fn test_tinymt_jump_u64_max() {
    let engine = TinyMt64::new(3);
    let far = jumped(engine, u64::MAX);
    assert_eq!(discarded(far, 1), jumped(jumped(engine, u64::MAX - 1), 2));
}

// ============================================================================
// Harness over random populations
// ============================================================================

#[test]
fn test_harness_random_population_tinymt64() {
    let (population, distances) = random_population::<TinyMt64>(1, 32, 5000);
    assert_eq!(verify_jump_equivalence(&population, &distances), Ok(()));
}

#[test]
fn test_harness_random_population_tinymt32() {
    let (population, distances) = random_population::<TinyMt32>(2, 32, 5000);
    assert_eq!(verify_jump_equivalence(&population, &distances), Ok(()));
}

#[test]
fn test_harness_random_population_mwc64x() {
    let (population, distances) = random_population::<Mwc64x>(3, 32, 5000);
    assert_eq!(verify_jump_equivalence(&population, &distances), Ok(()));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_jump_equals_discard_tinymt64(seed in any::<u64>(), n in 0u64..3000) {
        prop_assert!(jump_matches_discard(&TinyMt64::new(seed), n));
    }

    #[test]
    fn prop_jump_equals_discard_tinymt32(seed in any::<u32>(), n in 0u64..3000) {
        prop_assert!(jump_matches_discard(&TinyMt32::new(seed), n));
    }

    #[test]
    fn prop_jump_equals_discard_mwc64x(seed in any::<u32>(), n in 0u64..3000) {
        prop_assert!(jump_matches_discard(&Mwc64x::new(seed), n));
    }

    #[test]
    fn prop_jumps_compose(seed in any::<u64>(), a in any::<u32>(), b in any::<u32>()) {
        let engine = TinyMt64::new(seed);
        let (a, b) = (a as u64, b as u64);
        prop_assert_eq!(jumped(jumped(engine, a), b), jumped(engine, a + b));

        let engine = Mwc64x::new(seed as u32);
        prop_assert_eq!(jumped(jumped(engine, a), b), jumped(engine, a + b));
    }
}
