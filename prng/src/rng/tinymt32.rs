//! TinyMT32: 32-bit Tiny Mersenne Twister
//!
//! 127 significant bits of state in four `u32` words, period 2^127 - 1.
//! Seeding runs the step function 8 extra times so the matrix constants are
//! fully mixed into the state before the first draw.

use super::{Engine, JumpAhead, DEFAULT_SEED};
use crate::gf2::{jump_linear, minimal_polynomial, Gf2Linear, Gf2Poly};
use bytemuck::{Pod, Zeroable};

const SH0: u32 = 1;
const SH1: u32 = 10;
const SH8: u32 = 8;
const MASK: u32 = 0x7fff_ffff;
const MIN_LOOP: usize = 8;
const PRE_LOOP: usize = 8;
const MEXP: usize = 127;
const INIT_MULTIPLIER: u32 = 1_812_433_253;

/// TinyMT32 engine for a compile-time parameter set.
///
/// The branchless masking and parameter caveats of
/// [`TinyMt64Engine`](super::TinyMt64Engine) apply unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct TinyMt32Engine<const MAT1: u32, const MAT2: u32, const TMAT: u32> {
    state: [u32; 4],
}

// SAFETY: #[repr(C)] wrapper around [u32; 4]; every bit pattern is a valid state
unsafe impl<const MAT1: u32, const MAT2: u32, const TMAT: u32> Zeroable
    for TinyMt32Engine<MAT1, MAT2, TMAT>
{
}
unsafe impl<const MAT1: u32, const MAT2: u32, const TMAT: u32> Pod
    for TinyMt32Engine<MAT1, MAT2, TMAT>
{
}

/// TinyMT32 with the reference parameter set
pub type TinyMt32 = TinyMt32Engine<0x8f70_11ee, 0xfc78_ff1f, 0x3793_fdff>;

impl<const MAT1: u32, const MAT2: u32, const TMAT: u32> TinyMt32Engine<MAT1, MAT2, TMAT> {
    /// Characteristic polynomial of the step function
    pub const CHARACTERISTIC: Gf2Poly = {
        let (poly, degree) = characteristic_polynomial::<MAT1, MAT2>();
        assert!(
            degree == MEXP,
            "TinyMT32 parameters must have a degree-127 characteristic polynomial"
        );
        poly
    };

    /// Seeded engine, including the pre-loop; usable in constant context
    pub const fn seeded(seed: u32) -> Self {
        let mut state = init_state::<MAT1, MAT2, TMAT>(seed);
        let mut i = 0;
        while i < PRE_LOOP {
            state = next_state::<MAT1, MAT2>(state);
            i += 1;
        }
        Self { state }
    }

    /// Engine with the given raw state words
    pub const fn from_state(state: [u32; 4]) -> Self {
        Self { state }
    }

    /// Raw state words
    pub const fn state(&self) -> [u32; 4] {
        self.state
    }
}

impl<const MAT1: u32, const MAT2: u32, const TMAT: u32> Default
    for TinyMt32Engine<MAT1, MAT2, TMAT>
{
    fn default() -> Self {
        Self::seeded(DEFAULT_SEED)
    }
}

impl<const MAT1: u32, const MAT2: u32, const TMAT: u32> Engine
    for TinyMt32Engine<MAT1, MAT2, TMAT>
{
    type Output = u32;

    const WORD_SIZE: usize = 32;
    const STATE_SIZE: usize = 4;
    const DEFAULT_SEED: u32 = DEFAULT_SEED;

    fn new(seed: u32) -> Self {
        Self::seeded(seed)
    }

    #[inline]
    fn step(&mut self) {
        self.state = next_state::<MAT1, MAT2>(self.state);
    }

    #[inline]
    fn output(&self) -> u32 {
        temper::<TMAT>(self.state)
    }

    fn min() -> u32 {
        u32::MIN
    }

    fn max() -> u32 {
        u32::MAX
    }
}

impl<const MAT1: u32, const MAT2: u32, const TMAT: u32> JumpAhead
    for TinyMt32Engine<MAT1, MAT2, TMAT>
{
    fn jump(&mut self, distance: u64) {
        let Linear::<MAT1, MAT2>(state) =
            jump_linear(Linear(self.state), distance, &Self::CHARACTERISTIC);
        self.state = state;
    }
}

#[derive(Clone, Copy)]
struct Linear<const MAT1: u32, const MAT2: u32>([u32; 4]);

impl<const MAT1: u32, const MAT2: u32> Gf2Linear for Linear<MAT1, MAT2> {
    fn zero() -> Self {
        Linear([0; 4])
    }

    fn xor(self, other: Self) -> Self {
        let [a0, a1, a2, a3] = self.0;
        let [b0, b1, b2, b3] = other.0;
        Linear([a0 ^ b0, a1 ^ b1, a2 ^ b2, a3 ^ b3])
    }

    fn advance(self) -> Self {
        Linear(next_state::<MAT1, MAT2>(self.0))
    }
}

const fn init_state<const MAT1: u32, const MAT2: u32, const TMAT: u32>(seed: u32) -> [u32; 4] {
    let mut state = [seed, MAT1, MAT2, TMAT];
    let mut i = 1;
    while i < MIN_LOOP {
        let prev = state[(i - 1) & 3];
        state[i & 3] ^=
            (i as u32).wrapping_add(INIT_MULTIPLIER.wrapping_mul(prev ^ (prev >> 30)));
        i += 1;
    }
    if state[0] & MASK == 0 && state[1] == 0 && state[2] == 0 && state[3] == 0 {
        state = [b'T' as u32, b'I' as u32, b'N' as u32, b'Y' as u32];
    }
    state
}

const fn next_state<const MAT1: u32, const MAT2: u32>(state: [u32; 4]) -> [u32; 4] {
    let mut x = (state[0] & MASK) ^ state[1] ^ state[2];
    let mut y = state[3];
    x ^= x << SH0;
    y ^= (y >> SH0) ^ x;
    let mask = (y & 1).wrapping_neg();
    [
        state[1],
        state[2] ^ (mask & MAT1),
        x ^ (y << SH1) ^ (mask & MAT2),
        y,
    ]
}

const fn temper<const TMAT: u32>(state: [u32; 4]) -> u32 {
    let t1 = state[0].wrapping_add(state[2] >> SH8);
    let t0 = state[3] ^ t1;
    t0 ^ ((t1 & 1).wrapping_neg() & TMAT)
}

const fn characteristic_polynomial<const MAT1: u32, const MAT2: u32>() -> (Gf2Poly, usize) {
    let mut state = next_state::<MAT1, MAT2>([0, 0, 0, 1]);
    let mut sequence = Gf2Poly::ZERO;
    let mut i = 0;
    while i < 2 * MEXP {
        if state[3] & 1 == 1 {
            sequence = sequence.with_bit(i);
        }
        state = next_state::<MAT1, MAT2>(state);
        i += 1;
    }
    minimal_polynomial(&sequence, 2 * MEXP)
}
