//! Configuration errors.
//!
//! Only construction can fail. Once an animator exists, every tick succeeds:
//! missing measurements skip the tick and out-of-range progress is clamped.

use thiserror::Error;

/// Rejected motion configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A keyframe curve needs a start and an end.
    #[error("keyframes need at least two points, got {count}")]
    TooFewKeyframes {
        /// Number of points supplied.
        count: usize,
    },
    /// A keyframe input or output is NaN or infinite.
    #[error("keyframe {index} is not finite")]
    NonFiniteKeyframe {
        /// Position of the offending point.
        index: usize,
    },
    /// Keyframe inputs must be strictly increasing.
    #[error("keyframe inputs must be strictly increasing: point {index} ({current}) follows {previous}")]
    UnorderedKeyframes {
        /// Position of the offending point.
        index: usize,
        /// Input of the preceding point.
        previous: f32,
        /// Input of the offending point.
        current: f32,
    },
    /// A spring parameter is outside its valid range.
    #[error("spring {field} must be {requirement}, got {value}")]
    InvalidSpring {
        /// Parameter name.
        field: &'static str,
        /// Human readable constraint.
        requirement: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// A scroll window anchor is NaN or infinite.
    #[error("scroll window {field} anchor is not finite")]
    NonFiniteAnchor {
        /// `"start"` or `"end"`.
        field: &'static str,
    },
    /// A scroll anchor string is not `"<element> <viewport>"`.
    #[error("invalid scroll anchor {anchor:?}, expected \"<element> <viewport>\"")]
    InvalidAnchor {
        /// The rejected text.
        anchor: String,
    },
    /// Options could not be parsed.
    #[error("failed to parse animator options: {0}")]
    Parse(#[from] serde_json::Error),
}
