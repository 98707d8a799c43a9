//! TinyMT64: 64-bit Tiny Mersenne Twister
//!
//! 127 significant bits of state in two `u64` words, period 2^127 - 1.
//!
//! # Algorithm
//!
//! Each step clears the top bit of the first word, mixes both words with a
//! fixed shift/XOR sequence and rotates the result in. The matrix constants
//! are folded in through a mask derived from the low bit of the new word
//! (`0 - bit`), never through a branch, so every lane executes the same
//! instruction stream. Output is the tempered sum of the two words.
//!
//! # Parameters
//!
//! `MAT1`, `MAT2` and `TMAT` come from the TinyMT parameter search. Arbitrary
//! values are not supported: a parameter set whose characteristic polynomial
//! is not of degree 127 is rejected at compile time when [`JumpAhead::jump`]
//! is used.

use super::{Engine, JumpAhead, DEFAULT_SEED};
use crate::gf2::{jump_linear, minimal_polynomial, Gf2Linear, Gf2Poly};
use bytemuck::{Pod, Zeroable};

const SH0: u32 = 12;
const SH1: u32 = 11;
const SH8: u32 = 8;
const MASK: u64 = 0x7fff_ffff_ffff_ffff;
const MIN_LOOP: usize = 8;
const MEXP: usize = 127;
const INIT_MULTIPLIER: u64 = 6_364_136_223_846_793_005;

/// TinyMT64 engine for a compile-time parameter set.
///
/// # Example
/// ```
/// use lane_prng::{Engine, TinyMt64};
///
/// let mut rng = TinyMt64::new(1);
/// assert_eq!(rng.next(), 15503804787016557143);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct TinyMt64Engine<const MAT1: u32, const MAT2: u32, const TMAT: u64> {
    state: [u64; 2],
}

// SAFETY: #[repr(C)] wrapper around [u64; 2]; every bit pattern is a valid state
unsafe impl<const MAT1: u32, const MAT2: u32, const TMAT: u64> Zeroable
    for TinyMt64Engine<MAT1, MAT2, TMAT>
{
}
unsafe impl<const MAT1: u32, const MAT2: u32, const TMAT: u64> Pod
    for TinyMt64Engine<MAT1, MAT2, TMAT>
{
}

/// TinyMT64 with the reference parameter set
pub type TinyMt64 = TinyMt64Engine<0xfa05_1f40, 0xffd0_fff4, 0x58d0_2ffe_ffbf_ffbc>;

impl<const MAT1: u32, const MAT2: u32, const TMAT: u64> TinyMt64Engine<MAT1, MAT2, TMAT> {
    /// Characteristic polynomial of the step function, derived from the
    /// recurrence during constant evaluation.
    pub const CHARACTERISTIC: Gf2Poly = {
        let (poly, degree) = characteristic_polynomial::<MAT1, MAT2>();
        assert!(
            degree == MEXP,
            "TinyMT64 parameters must have a degree-127 characteristic polynomial"
        );
        poly
    };

    /// Seeded engine, usable in constant context
    pub const fn seeded(seed: u64) -> Self {
        Self {
            state: init_state::<MAT1, MAT2, TMAT>(seed),
        }
    }

    /// Engine with the given raw state words
    pub const fn from_state(state: [u64; 2]) -> Self {
        Self { state }
    }

    /// Raw state words
    pub const fn state(&self) -> [u64; 2] {
        self.state
    }
}

impl<const MAT1: u32, const MAT2: u32, const TMAT: u64> Default
    for TinyMt64Engine<MAT1, MAT2, TMAT>
{
    fn default() -> Self {
        Self::seeded(DEFAULT_SEED as u64)
    }
}

impl<const MAT1: u32, const MAT2: u32, const TMAT: u64> Engine
    for TinyMt64Engine<MAT1, MAT2, TMAT>
{
    type Output = u64;

    const WORD_SIZE: usize = 64;
    const STATE_SIZE: usize = 2;
    const DEFAULT_SEED: u64 = DEFAULT_SEED as u64;

    fn new(seed: u64) -> Self {
        Self::seeded(seed)
    }

    #[inline]
    fn step(&mut self) {
        self.state = next_state::<MAT1, MAT2>(self.state);
    }

    #[inline]
    fn output(&self) -> u64 {
        temper::<TMAT>(self.state)
    }

    fn min() -> u64 {
        u64::MIN
    }

    fn max() -> u64 {
        u64::MAX
    }
}

impl<const MAT1: u32, const MAT2: u32, const TMAT: u64> JumpAhead
    for TinyMt64Engine<MAT1, MAT2, TMAT>
{
    fn jump(&mut self, distance: u64) {
        let Linear::<MAT1, MAT2>(state) =
            jump_linear(Linear(self.state), distance, &Self::CHARACTERISTIC);
        self.state = state;
    }
}

/// Bare state words under the step function, without tempering
#[derive(Clone, Copy)]
struct Linear<const MAT1: u32, const MAT2: u32>([u64; 2]);

impl<const MAT1: u32, const MAT2: u32> Gf2Linear for Linear<MAT1, MAT2> {
    fn zero() -> Self {
        Linear([0; 2])
    }

    fn xor(self, other: Self) -> Self {
        Linear([self.0[0] ^ other.0[0], self.0[1] ^ other.0[1]])
    }

    fn advance(self) -> Self {
        Linear(next_state::<MAT1, MAT2>(self.0))
    }
}

const fn init_state<const MAT1: u32, const MAT2: u32, const TMAT: u64>(seed: u64) -> [u64; 2] {
    let mut state = [seed ^ ((MAT1 as u64) << 32), (MAT2 as u64) ^ TMAT];
    let mut i = 1;
    while i < MIN_LOOP {
        let prev = state[(i - 1) & 1];
        state[i & 1] ^=
            (i as u64).wrapping_add(INIT_MULTIPLIER.wrapping_mul(prev ^ (prev >> 62)));
        i += 1;
    }
    // period certification: the all-zero state is a fixed point
    if state[0] & MASK == 0 && state[1] == 0 {
        state = [b'T' as u64, b'M' as u64];
    }
    state
}

const fn next_state<const MAT1: u32, const MAT2: u32>(state: [u64; 2]) -> [u64; 2] {
    let mut x = (state[0] & MASK) ^ state[1];
    x ^= x << SH0;
    x ^= x >> 32;
    x ^= x << 32;
    x ^= x << SH1;
    let mask = (x & 1).wrapping_neg();
    [
        state[1] ^ (mask & MAT1 as u64),
        x ^ (mask & ((MAT2 as u64) << 32)),
    ]
}

const fn temper<const TMAT: u64>(state: [u64; 2]) -> u64 {
    let mut x = state[0].wrapping_add(state[1]);
    x ^= state[0] >> SH8;
    x ^ ((x & 1).wrapping_neg() & TMAT)
}

/// Berlekamp-Massey over 2 * MEXP bits of the low bit of the second word
const fn characteristic_polynomial<const MAT1: u32, const MAT2: u32>() -> (Gf2Poly, usize) {
    let mut state = next_state::<MAT1, MAT2>([0, 1]);
    let mut sequence = Gf2Poly::ZERO;
    let mut i = 0;
    while i < 2 * MEXP {
        if state[1] & 1 == 1 {
            sequence = sequence.with_bit(i);
        }
        state = next_state::<MAT1, MAT2>(state);
        i += 1;
    }
    minimal_polynomial(&sequence, 2 * MEXP)
}
