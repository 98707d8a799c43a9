//! PyO3 bindings
//!
//! Python classes mirroring the Rust engines, so scripts can reproduce a
//! lane's stream exactly. Enabled with the `pyo3` feature.

pub mod engines;

use pyo3::exceptions::PyValueError;
use pyo3::PyErr;

use crate::lanes::LaneError;
use crate::snapshot::SnapshotError;

pub(crate) fn lane_error_to_py(e: LaneError) -> PyErr {
    PyValueError::new_err(format!("Invalid lane partition: {}", e))
}

pub(crate) fn snapshot_error_to_py(e: SnapshotError) -> PyErr {
    PyValueError::new_err(format!("Failed to restore snapshot: {}", e))
}
