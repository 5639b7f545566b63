//! Configuration validation errors.

use crate::action::{ActionKind, Landmark};

/// Reasons a profile is rejected at load time.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Lower bound of a delay range exceeds its upper bound.
    #[error("{what}: minimum {min_ms} ms exceeds maximum {max_ms} ms")]
    InvertedRange {
        what: &'static str,
        min_ms: u64,
        max_ms: u64,
    },

    /// Standard deviation is negative or not a number.
    #[error("reaction delay standard deviation must be a non-negative number, got {0}")]
    InvalidStdDev(f64),

    /// Mean is not a finite number.
    #[error("reaction delay mean must be finite, got {0}")]
    InvalidMean(f64),

    /// Blacklist entries would never suppress anything.
    #[error("blacklist expiry must be greater than zero")]
    ZeroExpiry,

    #[error("patrol lane '{lane}' has no strike cells")]
    LaneWithoutStrike { lane: String },

    #[error("patrol lane '{lane}' mixes cells from different planes")]
    LaneSpansPlanes { lane: String },

    /// The activity needs a landmark the profile does not define.
    #[error("landmark '{landmark}' is required for action '{action}'")]
    MissingLandmark {
        landmark: Landmark,
        action: ActionKind,
    },

    #[error("landmark '{0}' must be a single tile")]
    ExpectedTile(Landmark),

    #[error("landmark '{0}' must be an area")]
    ExpectedArea(Landmark),

    #[error("landmark '{0}' has min corner past max corner")]
    MalformedArea(Landmark),

    /// A retry budget of zero would escalate before the first attempt.
    #[error("retry budget '{0}' must be at least 1")]
    ZeroRetryBudget(&'static str),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
