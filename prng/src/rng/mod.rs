//! Deterministic pseudorandom bit generators
//!
//! Three engines share one contract, [`Engine`]:
//! - [`TinyMt64`]: 64-bit Tiny Mersenne Twister, 2 x `u64` state
//! - [`TinyMt32`]: 32-bit Tiny Mersenne Twister, 4 x `u32` state
//! - [`Mwc64x`]: 32-bit multiply-with-carry, `(x, c)` state
//!
//! CRITICAL: Every engine is a plain `#[repr(C)]` word array. Copying the
//! value (or its byte image) duplicates the generator exactly, which is what
//! lets one engine per lane be bulk-copied between host and device memory.

mod mwc;
mod tinymt32;
mod tinymt64;

pub use mwc::{MultiplyWithCarryEngine32, Mwc64x};
pub use tinymt32::{TinyMt32, TinyMt32Engine};
pub use tinymt64::{TinyMt64, TinyMt64Engine};

use bytemuck::Pod;
use std::fmt;
use thiserror::Error;

/// Seed used by default-constructed engines
pub const DEFAULT_SEED: u32 = 5489;

/// Errors decoding an engine from a byte image
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("Byte image has {actual} bytes, engine state needs {expected}")]
    Length { expected: usize, actual: usize },
}

/// Capability set shared by every generator.
///
/// Seeding and stepping never fail: any bit pattern of the output width is a
/// valid seed, and every operation is a bounded-time transformation of the
/// state words.
///
/// # Example
/// ```
/// use lane_prng::{Engine, TinyMt64};
///
/// let mut a = TinyMt64::new(42);
/// let mut b = TinyMt64::new(42);
///
/// a.discard(10);
/// for _ in 0..10 {
///     b.next();
/// }
/// assert_eq!(a, b);
/// assert_eq!(a.next(), b.next());
/// ```
pub trait Engine: Copy + Eq + Default + fmt::Debug + Pod {
    /// Output word
    type Output: Copy + Eq + Ord + fmt::Debug;

    /// Width of [`Self::Output`] in bits
    const WORD_SIZE: usize;

    /// Number of words in the state array
    const STATE_SIZE: usize;

    /// Seed used by [`Default`]
    const DEFAULT_SEED: Self::Output;

    /// Create an engine whose state is a pure function of `seed`
    fn new(seed: Self::Output) -> Self;

    /// Reset the state from `value`, independent of the previous state
    fn seed(&mut self, value: Self::Output) {
        *self = Self::new(value);
    }

    /// Advance the state by one position without producing output
    fn step(&mut self);

    /// Output for the current state (the tempering transform)
    fn output(&self) -> Self::Output;

    /// Advance one step and return the tempered output
    fn next(&mut self) -> Self::Output {
        self.step();
        self.output()
    }

    /// Advance as if [`Engine::next`] had been called `count` times.
    ///
    /// This is sequential stepping and the reference behavior for
    /// [`JumpAhead::jump`].
    fn discard(&mut self, count: u64) {
        for _ in 0..count {
            self.step();
        }
    }

    /// Smallest output value
    fn min() -> Self::Output;

    /// Largest output value
    fn max() -> Self::Output;

    /// The state words as bytes, in word order with no padding.
    ///
    /// Words are in native byte order: the image is meant for transfer
    /// between execution contexts of the same machine.
    fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Rebuild an engine from an image produced by [`Engine::as_bytes`]
    fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        let expected = std::mem::size_of::<Self>();
        if bytes.len() != expected {
            return Err(ImageError::Length {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(bytemuck::pod_read_unaligned(bytes))
    }
}

/// Logarithmic-time equivalent of [`Engine::discard`].
pub trait JumpAhead: Engine {
    /// Advance by `distance` steps in O(log distance) time.
    ///
    /// The result is bit-identical to `discard(distance)` for every state
    /// reachable by seeding and stepping.
    fn jump(&mut self, distance: u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_contract<E: Engine>() {
        let mut a = E::default();
        let mut b = E::new(E::DEFAULT_SEED);
        assert_eq!(a, b);

        a.next();
        assert_ne!(a, b, "one step must change the state");

        b.seed(E::DEFAULT_SEED);
        a.seed(E::DEFAULT_SEED);
        assert_eq!(a, b, "seed() must not depend on prior state");

        assert!(E::min() < E::max());
        assert_eq!(std::mem::size_of::<E>() * 8, E::WORD_SIZE * E::STATE_SIZE);
    }

    #[test]
    fn test_contract_tinymt64() {
        check_contract::<TinyMt64>();
    }

    #[test]
    fn test_contract_tinymt32() {
        check_contract::<TinyMt32>();
    }

    #[test]
    fn test_contract_mwc64x() {
        check_contract::<Mwc64x>();
    }

    #[test]
    fn test_byte_image_round_trip() {
        let mut engine = TinyMt32::new(7);
        engine.discard(3);
        let restored = TinyMt32::from_bytes(engine.as_bytes()).unwrap();
        assert_eq!(restored, engine);
    }

    #[test]
    fn test_byte_image_wrong_length() {
        let err = Mwc64x::from_bytes(&[0u8; 5]).unwrap_err();
        assert_eq!(
            err,
            ImageError::Length {
                expected: 8,
                actual: 5
            }
        );
    }
}
