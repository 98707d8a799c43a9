//! PyO3 wrappers for the engines
//!
//! One class per default parameter set. Method names follow the Rust
//! [`Engine`] contract so Python and Rust callers read the same.
//!
//! # Example (from Python)
//!
//! ```python
//! from lane_prng import TinyMT64
//!
//! lanes = TinyMT64.partition(seed=42, lanes=4)
//! first = [lane.next() for lane in lanes]
//! ```

use pyo3::prelude::*;

use super::{lane_error_to_py, snapshot_error_to_py};
use crate::lanes::{partition_lanes, LaneConfig, DEFAULT_STRIDE};
use crate::rng::{Engine, JumpAhead, Mwc64x, TinyMt32, TinyMt64};
use crate::snapshot::{Snapshot, StateSnapshot};

macro_rules! py_engine {
    ($py:ident, $name:tt, $engine:ty, $word:ty) => {
        #[pyclass(name = $name)]
        #[derive(Clone)]
        pub struct $py {
            inner: $engine,
        }

        #[pymethods]
        impl $py {
            /// Seeded engine; `None` uses the default seed
            #[new]
            #[pyo3(signature = (seed = None))]
            fn new(seed: Option<$word>) -> Self {
                let inner = match seed {
                    Some(seed) => <$engine as Engine>::new(seed),
                    None => <$engine>::default(),
                };
                Self { inner }
            }

            fn seed(&mut self, value: $word) {
                Engine::seed(&mut self.inner, value);
            }

            fn next(&mut self) -> $word {
                Engine::next(&mut self.inner)
            }

            fn discard(&mut self, count: u64) {
                self.inner.discard(count);
            }

            fn jump(&mut self, distance: u64) {
                self.inner.jump(distance);
            }

            #[staticmethod]
            fn min() -> $word {
                <$engine as Engine>::min()
            }

            #[staticmethod]
            fn max() -> $word {
                <$engine as Engine>::max()
            }

            /// State words widened to 64 bits
            fn state(&self) -> Vec<u64> {
                self.inner.words()
            }

            /// Snapshot as a JSON string
            fn snapshot(&self) -> PyResult<String> {
                self.inner
                    .snapshot()
                    .and_then(|snapshot| snapshot.to_json())
                    .map_err(snapshot_error_to_py)
            }

            #[staticmethod]
            fn restore(json: &str) -> PyResult<Self> {
                let snapshot = StateSnapshot::from_json(json).map_err(snapshot_error_to_py)?;
                let inner = <$engine>::restore(&snapshot).map_err(snapshot_error_to_py)?;
                Ok(Self { inner })
            }

            /// One engine per lane, lane `i` jumped `i * stride` ahead
            #[staticmethod]
            #[pyo3(signature = (seed, lanes, stride = DEFAULT_STRIDE))]
            fn partition(seed: u64, lanes: usize, stride: u64) -> PyResult<Vec<Self>> {
                let config = LaneConfig {
                    seed,
                    lanes,
                    stride,
                };
                let engines: Vec<$engine> =
                    partition_lanes(&config).map_err(lane_error_to_py)?;
                Ok(engines.into_iter().map(|inner| Self { inner }).collect())
            }

            fn __eq__(&self, other: &Self) -> bool {
                self.inner == other.inner
            }

            fn __repr__(&self) -> String {
                format!("{}(state={:?})", $name, self.inner.state())
            }
        }
    };
}

py_engine!(PyTinyMt64, "TinyMT64", TinyMt64, u64);
py_engine!(PyTinyMt32, "TinyMT32", TinyMt32, u32);
py_engine!(PyMwc64x, "MWC64X", Mwc64x, u32);
