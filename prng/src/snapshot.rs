//! Snapshot - Save/Restore Engine State
//!
//! Serializes an engine's state words together with the compile-time
//! parameters that give them meaning.
//!
//! # Critical Invariants
//!
//! - **Determinism**: a restored engine produces the same future outputs as
//!   the engine it was taken from
//! - **Parameter Matching**: a snapshot only restores into the same variant
//!   with the same parameters (checked by SHA256 of the parameter set)

use crate::rng::{Engine, MultiplyWithCarryEngine32, TinyMt32Engine, TinyMt64Engine};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

/// Errors restoring an engine from a [`StateSnapshot`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Snapshot is for variant '{found}', expected '{expected}'")]
    VariantMismatch { expected: String, found: String },

    #[error("Snapshot parameters {found:?} differ from engine parameters {expected:?}")]
    ParameterMismatch { expected: Vec<u64>, found: Vec<u64> },

    #[error("Parameter hash mismatch: snapshot has {found}, computed {expected}")]
    HashMismatch { expected: String, found: String },

    #[error("Snapshot has {found} state words, expected {expected}")]
    WordCount { expected: usize, found: usize },

    #[error("State word {value:#x} does not fit in {bits} bits")]
    WordOutOfRange { value: u64, bits: usize },

    #[error("Carry {carry} must be below multiplier {multiplier}")]
    InvalidCarry { carry: u64, multiplier: u64 },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Serialized engine state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Engine family, e.g. "tinymt64"
    pub variant: String,

    /// Compile-time parameters in declaration order
    pub parameters: Vec<u64>,

    /// State words in storage order, widened to u64
    pub words: Vec<u64>,

    /// SHA256 of the canonical `{variant, parameters}` JSON
    pub parameters_hash: String,
}

impl StateSnapshot {
    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| {
            SnapshotError::Serialization(format!("Snapshot serialization failed: {}", e))
        })
    }

    /// Parse a snapshot from JSON; parameters are checked on restore
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|e| {
            SnapshotError::Serialization(format!("Snapshot deserialization failed: {}", e))
        })
    }
}

#[derive(Serialize)]
struct ParameterSet<'a> {
    variant: &'a str,
    parameters: &'a [u64],
}

/// Sort object keys at every level so the JSON text is canonical
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Compute deterministic SHA256 hash of a parameter set
///
/// Keys are sorted before hashing, so the hash depends neither on struct
/// field order nor on how `serde_json` orders its maps.
pub fn compute_parameters_hash(variant: &str, parameters: &[u64]) -> Result<String, SnapshotError> {
    let value = serde_json::to_value(ParameterSet {
        variant,
        parameters,
    })
    .map_err(|e| SnapshotError::Serialization(format!("Parameter serialization failed: {}", e)))?;

    let json = serde_json::to_string(&canonicalize(value))
        .map_err(|e| SnapshotError::Serialization(format!("Parameter serialization failed: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Engines that can be saved to and restored from a [`StateSnapshot`]
pub trait Snapshot: Engine {
    /// Engine family name stored in snapshots
    const VARIANT: &'static str;

    /// Compile-time parameters, widened to u64
    fn parameters() -> Vec<u64>;

    /// State words, widened to u64
    fn words(&self) -> Vec<u64>;

    /// Rebuild an engine from state words, without the variant checks of
    /// [`Snapshot::restore`]
    fn from_words(words: &[u64]) -> Result<Self, SnapshotError>;

    /// Capture the current state with this engine's parameters
    fn snapshot(&self) -> Result<StateSnapshot, SnapshotError> {
        let parameters = Self::parameters();
        let parameters_hash = compute_parameters_hash(Self::VARIANT, &parameters)?;
        Ok(StateSnapshot {
            variant: Self::VARIANT.to_string(),
            parameters,
            words: self.words(),
            parameters_hash,
        })
    }

    /// Rebuild an engine, rejecting snapshots of any other variant or
    /// parameter set
    fn restore(snapshot: &StateSnapshot) -> Result<Self, SnapshotError> {
        let result = validate::<Self>(snapshot).and_then(|()| Self::from_words(&snapshot.words));
        if let Err(e) = &result {
            warn!(variant = Self::VARIANT, error = %e, "Rejected engine snapshot");
        }
        result
    }
}

fn validate<E: Snapshot>(snapshot: &StateSnapshot) -> Result<(), SnapshotError> {
    if snapshot.variant != E::VARIANT {
        return Err(SnapshotError::VariantMismatch {
            expected: E::VARIANT.to_string(),
            found: snapshot.variant.clone(),
        });
    }

    let expected = E::parameters();
    if snapshot.parameters != expected {
        return Err(SnapshotError::ParameterMismatch {
            expected,
            found: snapshot.parameters.clone(),
        });
    }

    let hash = compute_parameters_hash(E::VARIANT, &expected)?;
    if snapshot.parameters_hash != hash {
        return Err(SnapshotError::HashMismatch {
            expected: hash,
            found: snapshot.parameters_hash.clone(),
        });
    }

    if snapshot.words.len() != E::STATE_SIZE {
        return Err(SnapshotError::WordCount {
            expected: E::STATE_SIZE,
            found: snapshot.words.len(),
        });
    }
    Ok(())
}

fn word_array<const N: usize>(words: &[u64]) -> Result<[u64; N], SnapshotError> {
    <[u64; N]>::try_from(words).map_err(|_| SnapshotError::WordCount {
        expected: N,
        found: words.len(),
    })
}

fn narrow_u32(value: u64) -> Result<u32, SnapshotError> {
    u32::try_from(value).map_err(|_| SnapshotError::WordOutOfRange { value, bits: 32 })
}

impl<const MAT1: u32, const MAT2: u32, const TMAT: u64> Snapshot
    for TinyMt64Engine<MAT1, MAT2, TMAT>
{
    const VARIANT: &'static str = "tinymt64";

    fn parameters() -> Vec<u64> {
        vec![MAT1 as u64, MAT2 as u64, TMAT]
    }

    fn words(&self) -> Vec<u64> {
        self.state().to_vec()
    }

    fn from_words(words: &[u64]) -> Result<Self, SnapshotError> {
        Ok(Self::from_state(word_array(words)?))
    }
}

impl<const MAT1: u32, const MAT2: u32, const TMAT: u32> Snapshot
    for TinyMt32Engine<MAT1, MAT2, TMAT>
{
    const VARIANT: &'static str = "tinymt32";

    fn parameters() -> Vec<u64> {
        vec![MAT1 as u64, MAT2 as u64, TMAT as u64]
    }

    fn words(&self) -> Vec<u64> {
        self.state().iter().map(|&w| w as u64).collect()
    }

    fn from_words(words: &[u64]) -> Result<Self, SnapshotError> {
        let [w0, w1, w2, w3] = word_array(words)?;
        Ok(Self::from_state([
            narrow_u32(w0)?,
            narrow_u32(w1)?,
            narrow_u32(w2)?,
            narrow_u32(w3)?,
        ]))
    }
}

impl<const A: u32, const M: u64> Snapshot for MultiplyWithCarryEngine32<A, M> {
    const VARIANT: &'static str = "mwc64x";

    fn parameters() -> Vec<u64> {
        vec![A as u64, M]
    }

    fn words(&self) -> Vec<u64> {
        vec![self.x() as u64, self.c() as u64]
    }

    fn from_words(words: &[u64]) -> Result<Self, SnapshotError> {
        let [x, c] = word_array(words)?;
        let (x, c) = (narrow_u32(x)?, narrow_u32(c)?);
        if c >= A {
            return Err(SnapshotError::InvalidCarry {
                carry: c as u64,
                multiplier: A as u64,
            });
        }
        Ok(Self::from_state([x, c]))
    }
}
