//! Jump/step equivalence harness
//!
//! Runs both advance paths on copies of every engine in a population and
//! compares the resulting states bit for bit.
//!
//! # Critical Invariants
//!
//! - A mismatch is a defect in the jump-ahead arithmetic, not in the caller.
//!   Jump-ahead must not be trusted until this check passes; sequential
//!   `discard` stays correct regardless.

use crate::rng::JumpAhead;
use thiserror::Error;
use tracing::{debug, warn};

/// Failures reported by [`verify_jump_equivalence`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EquivalenceError {
    #[error("Population has {engines} engines but {distances} distances")]
    LengthMismatch { engines: usize, distances: usize },

    #[error("Jump diverged from discard for engine {index} at distance {distance}")]
    Mismatch { index: usize, distance: u64 },
}

/// Whether `jump(distance)` and `discard(distance)` agree for one engine.
///
/// Neither path touches `engine`; both run on copies.
pub fn jump_matches_discard<E: JumpAhead>(engine: &E, distance: u64) -> bool {
    let mut skip = *engine;
    let mut step = *engine;
    skip.jump(distance);
    step.discard(distance);
    skip == step
}

/// Check every engine in `population` against its own distance.
///
/// `distances[i]` is applied to `population[i]`. Returns the first engine
/// whose jump-ahead diverges from sequential stepping.
///
/// # Example
/// ```
/// use lane_prng::harness::verify_jump_equivalence;
/// use lane_prng::{Engine, TinyMt32};
///
/// let population: Vec<TinyMt32> = (1..=4).map(TinyMt32::new).collect();
/// verify_jump_equivalence(&population, &[0, 1, 500, 2048]).unwrap();
/// ```
pub fn verify_jump_equivalence<E: JumpAhead>(
    population: &[E],
    distances: &[u64],
) -> Result<(), EquivalenceError> {
    if population.len() != distances.len() {
        return Err(EquivalenceError::LengthMismatch {
            engines: population.len(),
            distances: distances.len(),
        });
    }

    debug!(
        engines = population.len(),
        "Verifying jump-ahead against sequential discard"
    );

    for (index, (engine, &distance)) in population.iter().zip(distances).enumerate() {
        if !jump_matches_discard(engine, distance) {
            warn!(index, distance, "Jump-ahead diverged from sequential discard");
            return Err(EquivalenceError::Mismatch { index, distance });
        }
    }

    debug!(engines = population.len(), "Jump-ahead verified");
    Ok(())
}
