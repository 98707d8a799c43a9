//! `rand_core` adapters
//!
//! Lets every engine drive the `rand` ecosystem (distributions, shuffles,
//! `gen_range`). The engine stream is unchanged: `next_u32`/`next_u64` are
//! built from successive [`Engine::next`] outputs.
//!
//! - 32-bit engines: `next_u64` is two draws, low word first
//! - TinyMT64: `next_u32` is the high half of one draw
//!
//! Seeds are the little-endian bytes of the engine's native seed word.

use crate::rng::{Engine, MultiplyWithCarryEngine32, TinyMt32Engine, TinyMt64Engine};
use rand_core::{impls, Error, RngCore, SeedableRng};

impl<const MAT1: u32, const MAT2: u32, const TMAT: u64> RngCore
    for TinyMt64Engine<MAT1, MAT2, TMAT>
{
    fn next_u32(&mut self) -> u32 {
        (Engine::next(self) >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        Engine::next(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl<const MAT1: u32, const MAT2: u32, const TMAT: u64> SeedableRng
    for TinyMt64Engine<MAT1, MAT2, TMAT>
{
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::seeded(u64::from_le_bytes(seed))
    }
}

impl<const MAT1: u32, const MAT2: u32, const TMAT: u32> RngCore
    for TinyMt32Engine<MAT1, MAT2, TMAT>
{
    fn next_u32(&mut self) -> u32 {
        Engine::next(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl<const MAT1: u32, const MAT2: u32, const TMAT: u32> SeedableRng
    for TinyMt32Engine<MAT1, MAT2, TMAT>
{
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::seeded(u32::from_le_bytes(seed))
    }
}

impl<const A: u32, const M: u64> RngCore for MultiplyWithCarryEngine32<A, M> {
    fn next_u32(&mut self) -> u32 {
        Engine::next(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl<const A: u32, const M: u64> SeedableRng for MultiplyWithCarryEngine32<A, M> {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::seeded(u32::from_le_bytes(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{Mwc64x, TinyMt32, TinyMt64};

    #[test]
    fn test_next_u64_low_word_first() {
        let mut words = Mwc64x::new(9);
        let lo = words.next() as u64;
        let hi = words.next() as u64;

        let mut rng = Mwc64x::new(9);
        assert_eq!(RngCore::next_u64(&mut rng), lo | (hi << 32));
    }

    #[test]
    fn test_tinymt64_next_u32_is_high_half() {
        let mut engine = TinyMt64::new(1);
        let mut rng = TinyMt64::new(1);
        assert_eq!(RngCore::next_u32(&mut rng), (engine.next() >> 32) as u32);
    }

    #[test]
    fn test_from_seed_matches_new() {
        assert_eq!(TinyMt64::from_seed(1u64.to_le_bytes()), TinyMt64::new(1));
        assert_eq!(TinyMt32::from_seed(77u32.to_le_bytes()), TinyMt32::new(77));
        assert_eq!(Mwc64x::from_seed(5489u32.to_le_bytes()), Mwc64x::default());
    }

    #[test]
    fn test_fill_bytes_uses_stream() {
        let mut rng = TinyMt32::new(3);
        let mut buf = [0u8; 8];
        rng.fill_bytes(&mut buf);

        let mut engine = TinyMt32::new(3);
        let a = engine.next().to_le_bytes();
        let b = engine.next().to_le_bytes();
        assert_eq!(&buf[..4], &a);
        assert_eq!(&buf[4..], &b);
    }
}
