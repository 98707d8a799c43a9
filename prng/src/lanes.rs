//! Lane partitioning
//!
//! Splits one seeded stream into disjoint substreams, one per parallel lane.
//! Lane `i` of `L` starts at `jump(seed_state, i * stride)`; with a stride
//! larger than the number of draws any lane makes, no two lanes overlap.
//!
//! # Critical Invariants
//!
//! - **Determinism**: the same config always yields the same lane engines
//! - **Independence**: a lane engine depends only on `(seed, lane, stride)`,
//!   so each lane may compute its own engine without synchronization

use crate::rng::{Engine, JumpAhead, DEFAULT_SEED};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default distance between consecutive lanes
pub const DEFAULT_STRIDE: u64 = 1 << 40;

/// Errors validating a [`LaneConfig`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LaneError {
    #[error("Lane count must be positive")]
    NoLanes,

    #[error("Stride must be positive when partitioning {lanes} lanes")]
    ZeroStride { lanes: usize },

    #[error("Offset of the last of {lanes} lanes with stride {stride} overflows u64")]
    StrideOverflow { lanes: usize, stride: u64 },

    #[error("Lane {lane} out of range for {lanes} lanes")]
    LaneOutOfRange { lane: usize, lanes: usize },

    #[error("Seed {seed} does not fit a {word_size}-bit engine")]
    SeedOutOfRange { seed: u64, word_size: usize },

    #[error("Invalid lane config: {0}")]
    Parse(String),
}

/// How a seed is split across lanes
///
/// # Example
/// ```
/// use lane_prng::lanes::LaneConfig;
///
/// let config = LaneConfig::from_json(r#"{"seed": 42, "lanes": 8}"#).unwrap();
/// assert_eq!(config.lanes, 8);
/// assert_eq!(config.stride, lane_prng::lanes::DEFAULT_STRIDE);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    /// Seed shared by every lane
    pub seed: u64,

    /// Number of lanes
    pub lanes: usize,

    /// Steps between the starts of consecutive lanes
    pub stride: u64,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED as u64,
            lanes: 1,
            stride: DEFAULT_STRIDE,
        }
    }
}

impl LaneConfig {
    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, LaneError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| LaneError::Parse(format!("{}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs that cannot be partitioned
    pub fn validate(&self) -> Result<(), LaneError> {
        if self.lanes == 0 {
            return Err(LaneError::NoLanes);
        }
        if self.lanes > 1 && self.stride == 0 {
            return Err(LaneError::ZeroStride { lanes: self.lanes });
        }
        let last = (self.lanes - 1) as u64;
        if last.checked_mul(self.stride).is_none() {
            return Err(LaneError::StrideOverflow {
                lanes: self.lanes,
                stride: self.stride,
            });
        }
        Ok(())
    }

    /// Offset of `lane` from the seeded state, in steps
    pub fn lane_offset(&self, lane: usize) -> Result<u64, LaneError> {
        if lane >= self.lanes {
            return Err(LaneError::LaneOutOfRange {
                lane,
                lanes: self.lanes,
            });
        }
        (lane as u64)
            .checked_mul(self.stride)
            .ok_or(LaneError::StrideOverflow {
                lanes: self.lanes,
                stride: self.stride,
            })
    }
}

fn seeded_origin<E>(config: &LaneConfig) -> Result<E, LaneError>
where
    E: Engine,
    E::Output: TryFrom<u64>,
{
    let seed = <E::Output as TryFrom<u64>>::try_from(config.seed).map_err(|_| {
        LaneError::SeedOutOfRange {
            seed: config.seed,
            word_size: E::WORD_SIZE,
        }
    })?;
    Ok(E::new(seed))
}

/// Engine for a single lane, as that lane would build it for itself
pub fn lane_engine<E>(config: &LaneConfig, lane: usize) -> Result<E, LaneError>
where
    E: JumpAhead,
    E::Output: TryFrom<u64>,
{
    config.validate()?;
    let offset = config.lane_offset(lane)?;
    let mut engine: E = seeded_origin(config)?;
    engine.jump(offset);
    Ok(engine)
}

/// Engines for every lane, in lane order.
///
/// # Example
/// ```
/// use lane_prng::lanes::{partition_lanes, LaneConfig};
/// use lane_prng::{Engine, JumpAhead, TinyMt64};
///
/// let config = LaneConfig { seed: 7, lanes: 4, stride: 1 << 20 };
/// let lanes: Vec<TinyMt64> = partition_lanes(&config).unwrap();
///
/// let mut third = TinyMt64::new(7);
/// third.jump(2 << 20);
/// assert_eq!(lanes[2], third);
/// ```
pub fn partition_lanes<E>(config: &LaneConfig) -> Result<Vec<E>, LaneError>
where
    E: JumpAhead,
    E::Output: TryFrom<u64>,
{
    config.validate()?;
    let origin: E = seeded_origin(config)?;

    debug!(
        seed = config.seed,
        lanes = config.lanes,
        stride = config.stride,
        "Partitioning stream into lanes"
    );

    let mut engines = Vec::with_capacity(config.lanes);
    let mut current = origin;
    for lane in 0..config.lanes {
        if lane > 0 {
            current.jump(config.stride);
        }
        engines.push(current);
    }
    Ok(engines)
}

/// Index of the first engine still in the default-seeded state
pub fn position_of_untouched<E: Engine>(engines: &[E]) -> Option<usize> {
    let fresh = E::default();
    engines.iter().position(|engine| *engine == fresh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{Mwc64x, TinyMt32};

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(LaneConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_lanes_rejected() {
        let config = LaneConfig {
            lanes: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(LaneError::NoLanes));
    }

    #[test]
    fn test_zero_stride_allowed_for_single_lane() {
        let config = LaneConfig {
            lanes: 1,
            stride: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));

        let config = LaneConfig {
            lanes: 2,
            stride: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(LaneError::ZeroStride { lanes: 2 }));
    }

    #[test]
    fn test_stride_overflow_rejected() {
        let config = LaneConfig {
            seed: 1,
            lanes: 3,
            stride: u64::MAX / 2 + 1,
        };
        assert!(matches!(
            config.validate(),
            Err(LaneError::StrideOverflow { lanes: 3, .. })
        ));
    }

    #[test]
    fn test_seed_too_wide_for_32_bit_engine() {
        let config = LaneConfig {
            seed: u64::from(u32::MAX) + 1,
            ..Default::default()
        };
        assert_eq!(
            partition_lanes::<TinyMt32>(&config),
            Err(LaneError::SeedOutOfRange {
                seed: u64::from(u32::MAX) + 1,
                word_size: 32
            })
        );
    }

    #[test]
    fn test_lane_engine_out_of_range() {
        let config = LaneConfig {
            lanes: 2,
            ..Default::default()
        };
        assert_eq!(
            lane_engine::<Mwc64x>(&config, 2),
            Err(LaneError::LaneOutOfRange { lane: 2, lanes: 2 })
        );
    }

    #[test]
    fn test_position_of_untouched() {
        let mut engines = vec![Mwc64x::new(1), Mwc64x::default(), Mwc64x::new(3)];
        assert_eq!(position_of_untouched(&engines), Some(1));
        engines[1].next();
        assert_eq!(position_of_untouched(&engines), None);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            LaneConfig::from_json("{\"lanes\": \"many\"}"),
            Err(LaneError::Parse(_))
        ));
    }
}
