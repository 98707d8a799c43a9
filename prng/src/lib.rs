//! Lane PRNG - Deterministic Generators with Pointer-Free State
//!
//! Pseudorandom bit generators whose whole state is a small `#[repr(C)]` word
//! array, so one engine per parallel lane can be copied, compared and
//! transferred as plain bytes.
//!
//! # Architecture
//!
//! - **rng**: Engine contract and the TinyMT64, TinyMT32 and MWC64X engines
//! - **gf2**: GF(2) polynomial arithmetic behind TinyMT jump-ahead
//! - **harness**: Jump-ahead vs sequential discard verification
//! - **lanes**: Splitting one seed into disjoint per-lane substreams
//! - **snapshot**: Serialized state with parameter hashing
//!
//! # Critical Invariants
//!
//! 1. Same seed, same operation sequence, same outputs
//! 2. `jump(n)` is bit-identical to `discard(n)`
//! 3. No engine operation allocates, fails or logs
//!
//! # Example
//! ```
//! use lane_prng::{Engine, JumpAhead, TinyMt64};
//!
//! let mut rng = TinyMt64::new(1);
//! assert_eq!(rng.next(), 15503804787016557143);
//!
//! let mut far = TinyMt64::new(1);
//! far.jump(1 << 40);
//! ```

// Module declarations
pub mod gf2;
pub mod harness;
pub mod lanes;
mod rand_compat;
pub mod rng;
pub mod snapshot;

// Re-exports for convenience
pub use harness::{jump_matches_discard, verify_jump_equivalence, EquivalenceError};
pub use lanes::{partition_lanes, LaneConfig, LaneError};
pub use rng::{
    Engine, ImageError, JumpAhead, MultiplyWithCarryEngine32, Mwc64x, TinyMt32, TinyMt32Engine,
    TinyMt64, TinyMt64Engine, DEFAULT_SEED,
};
pub use snapshot::{Snapshot, SnapshotError, StateSnapshot};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn lane_prng(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::engines::PyTinyMt64>()?;
    m.add_class::<ffi::engines::PyTinyMt32>()?;
    m.add_class::<ffi::engines::PyMwc64x>()?;
    Ok(())
}
