//! MWC64X: 32-bit multiply-with-carry generator
//!
//! State is `(x, c)`. One step computes `a*x + c` in 64 bits: the low word
//! becomes the new `x` (and the output), the high word the new carry.
//!
//! # Algebra
//!
//! With `M = a * 2^32 - 1` prime, the state corresponds to the residue
//! `X = x*a + c (mod M)` and one step multiplies it by `a`. This turns both
//! seeding and jump-ahead into modular exponentiation:
//! - `jump(n)`: `X <- X * a^n mod M`
//! - `seed(s)`: `X = BASE * a^(s * 2^40) mod M`, i.e. seed `s` starts `s * 2^40`
//!   steps into a single fixed cycle
//!
//! `X` is never zero, so neither fixed point `(0, 0)` nor `(2^32 - 1, a - 1)` is
//! reachable from a seed. For the default parameters the period is
//! `(M - 1) / 2 = 9223191774929879039`.
//!
//! Raw states from [`MultiplyWithCarryEngine32::from_state`] or a byte image
//! need not be canonical (`x*a + c < M`). Such a state turns canonical within
//! two steps, except the fixed point `x*a + c == M`, and `jump` steps it there
//! sequentially before switching to the residue.

use super::{Engine, JumpAhead, DEFAULT_SEED};
use bytemuck::{Pod, Zeroable};

/// Residue of the default-seeded stream origin
const BASE_STATE: u64 = 4_077_358_422_479_273_989;

/// Seeds are spaced 2^40 steps apart along the cycle
const SEED_STRIDE_LOG2: u32 = 40;

/// Multiply-with-carry engine with multiplier `A` and modulus `M = A * 2^32 - 1`.
///
/// # Example
/// ```
/// use lane_prng::{Engine, Mwc64x};
///
/// let mut a = Mwc64x::new(7);
/// let mut b = a;
/// a.discard(1000);
/// for _ in 0..1000 {
///     b.next();
/// }
/// assert_eq!((a.x(), a.c()), (b.x(), b.c()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct MultiplyWithCarryEngine32<const A: u32, const M: u64> {
    x: u32,
    c: u32,
}

// SAFETY: #[repr(C)] struct of two u32 fields, no padding
unsafe impl<const A: u32, const M: u64> Zeroable for MultiplyWithCarryEngine32<A, M> {}
unsafe impl<const A: u32, const M: u64> Pod for MultiplyWithCarryEngine32<A, M> {}

/// MWC64X parameters: `A = 4294883355`, `M = A * 2^32 - 1`
pub type Mwc64x = MultiplyWithCarryEngine32<4_294_883_355, 18_446_383_549_859_758_079>;

impl<const A: u32, const M: u64> MultiplyWithCarryEngine32<A, M> {
    const PARAMETERS_VALID: () = assert!(
        M == ((A as u64) << 32) - 1,
        "MWC modulus must equal A * 2^32 - 1"
    );

    /// Seeded engine, usable in constant context
    pub const fn seeded(seed: u32) -> Self {
        let () = Self::PARAMETERS_VALID;
        let position = (seed as u128) << SEED_STRIDE_LOG2;
        let advance = pow_mod(A as u64, position, M);
        Self::from_residue(mul_mod(BASE_STATE % M, advance, M))
    }

    /// Engine with the given raw `[x, c]` words.
    ///
    /// Seeded streams keep `c < A` and `x*a + c < M`. Other words are accepted
    /// and still step, discard and jump consistently; the fixed points
    /// `(0, 0)` and `(2^32 - 1, A - 1)` stay where they are.
    pub const fn from_state(state: [u32; 2]) -> Self {
        Self {
            x: state[0],
            c: state[1],
        }
    }

    /// Raw `[x, c]` words
    pub const fn state(&self) -> [u32; 2] {
        [self.x, self.c]
    }

    /// Last output word
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Carry word
    pub const fn c(&self) -> u32 {
        self.c
    }

    /// `x*a + c` without reduction; at most `M` when `c < A`
    const fn raw_residue(&self) -> u128 {
        (self.x as u128) * (A as u128) + (self.c as u128)
    }

    /// Whether the words are exactly the decoding of their residue
    const fn is_canonical(&self) -> bool {
        self.c < A && self.raw_residue() < M as u128
    }

    const fn is_fixed_point(&self) -> bool {
        self.raw_residue() == M as u128
    }

    const fn residue(&self) -> u64 {
        let r = (self.x as u128) * (A as u128) + (self.c as u128);
        (r % (M as u128)) as u64
    }

    const fn from_residue(r: u64) -> Self {
        Self {
            x: (r / A as u64) as u32,
            c: (r % A as u64) as u32,
        }
    }
}

impl<const A: u32, const M: u64> Default for MultiplyWithCarryEngine32<A, M> {
    fn default() -> Self {
        Self::seeded(DEFAULT_SEED)
    }
}

impl<const A: u32, const M: u64> Engine for MultiplyWithCarryEngine32<A, M> {
    type Output = u32;

    const WORD_SIZE: usize = 32;
    const STATE_SIZE: usize = 2;
    const DEFAULT_SEED: u32 = DEFAULT_SEED;

    fn new(seed: u32) -> Self {
        Self::seeded(seed)
    }

    #[inline]
    fn step(&mut self) {
        let xn = A.wrapping_mul(self.x).wrapping_add(self.c);
        // carry out of the low-word addition, 0 or 1
        let carry = (xn < self.c) as u32;
        self.c = mul_hi(A, self.x).wrapping_add(carry);
        self.x = xn;
    }

    #[inline]
    fn output(&self) -> u32 {
        self.x
    }

    fn min() -> u32 {
        u32::MIN
    }

    fn max() -> u32 {
        u32::MAX
    }
}

impl<const A: u32, const M: u64> JumpAhead for MultiplyWithCarryEngine32<A, M> {
    fn jump(&mut self, distance: u64) {
        let () = Self::PARAMETERS_VALID;
        let mut distance = distance;
        while distance > 0 && !self.is_canonical() && !self.is_fixed_point() {
            self.step();
            distance -= 1;
        }
        if distance == 0 || self.is_fixed_point() {
            return;
        }
        let advance = pow_mod(A as u64, distance as u128, M);
        *self = Self::from_residue(mul_mod(self.residue(), advance, M));
    }
}

/// High 32 bits of the 32x32 -> 64 bit product
const fn mul_hi(a: u32, b: u32) -> u32 {
    (((a as u64) * (b as u64)) >> 32) as u32
}

const fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    (((a as u128) * (b as u128)) % (m as u128)) as u64
}

const fn pow_mod(base: u64, mut exp: u128, m: u64) -> u64 {
    let mut result = 1 % m;
    let mut base = base % m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: u64 = 9_223_191_774_929_879_039;

    #[test]
    fn test_seeded_states() {
        assert_eq!(Mwc64x::new(0).state(), [949_352_540, 406_302_289]);
        assert_eq!(Mwc64x::new(1).state(), [10_436_854, 1_172_332_534]);
        assert_eq!(Mwc64x::default().state(), [2_783_831_448, 2_679_385_677]);
    }

    #[test]
    fn test_reference_outputs() {
        let mut rng = Mwc64x::new(1);
        assert_eq!(rng.next(), 1_265_699_304);
        assert_eq!(rng.next(), 551_160_738);
        assert_eq!(rng.next(), 1_669_878_621);
    }

    #[test]
    fn test_discard_1000_from_default() {
        let mut rng = Mwc64x::default();
        rng.discard(1000);
        assert_eq!(rng.state(), [3_624_883_707, 2_472_751_792]);
    }

    #[test]
    fn test_zero_seed_is_not_degenerate() {
        let mut rng = Mwc64x::new(0);
        let first = rng.state();
        rng.step();
        assert_ne!(rng.state(), first);
        assert_ne!(first, [0, 0]);
    }

    #[test]
    fn test_jump_matches_discard() {
        let base = Mwc64x::new(12345);
        for n in [0u64, 1, 2, 77, 1000, 4096] {
            let mut jumped = base;
            let mut stepped = base;
            jumped.jump(n);
            stepped.discard(n);
            assert_eq!(jumped, stepped, "distance {}", n);
        }
    }

    #[test]
    fn test_jump_wraps_at_period() {
        let base = Mwc64x::new(7);
        let mut full = base;
        full.jump(PERIOD);
        assert_eq!(full, base);

        let mut wrapped = base;
        let mut short = base;
        wrapped.jump(PERIOD + 5);
        short.discard(5);
        assert_eq!(wrapped, short);
    }

    #[test]
    fn test_jump_leaves_fixed_points_in_place() {
        let upper = Mwc64x::from_state([u32::MAX, 4_294_883_354]);
        let zero = Mwc64x::from_state([0, 0]);
        for fixed in [upper, zero] {
            for n in [0u64, 1, 2, 1000, PERIOD, u64::MAX] {
                let mut jumped = fixed;
                jumped.jump(n);
                assert_eq!(jumped, fixed, "distance {}", n);
            }
            let mut stepped = fixed;
            stepped.discard(3);
            assert_eq!(stepped, fixed);
        }
    }

    #[test]
    fn test_jump_from_non_canonical_state() {
        // carry at or above A only arises from raw images
        let raws = [
            [u32::MAX, 4_294_883_355],
            [u32::MAX, u32::MAX],
            [u32::MAX - 1, u32::MAX],
            [0, u32::MAX],
            [12_345, 4_294_900_000],
        ];
        for raw in raws {
            let base = Mwc64x::from_state(raw);
            for n in [1u64, 2, 3, 50] {
                let mut jumped = base;
                let mut stepped = base;
                jumped.jump(n);
                stepped.discard(n);
                assert_eq!(jumped, stepped, "state {:?} distance {}", raw, n);
            }
        }
    }

    #[test]
    fn test_pow_mod() {
        assert_eq!(pow_mod(2, 10, 1_000_000), 1024);
        assert_eq!(pow_mod(5, 0, 7), 1);
        assert_eq!(pow_mod(3, 1u128 << 70, 1), 0);
    }
}
