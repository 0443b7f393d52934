//! Error types for the keyframe engine

use serde::{Deserialize, Serialize};

use crate::value::ValueKind;

/// Every way a track mutation or time conversion can be rejected.
///
/// Mutators validate completely before touching any state, so receiving one of
/// these means the track is exactly as it was before the call.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimationError {
    /// A channel's key count does not match the keyframe count
    #[error("Channel '{channel}' has {actual} keys but the track has {expected} keyframes")]
    ChannelLengthMismatch {
        channel: String,
        expected: usize,
        actual: usize,
    },

    /// Keyframe index outside the keyframe list
    #[error("Keyframe index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Keyframe would break the non-decreasing time order
    #[error("Keyframe {index} at tick {time} breaks time ordering")]
    KeyframeOrder { index: usize, time: i64 },

    /// No channel registered under this name
    #[error("Channel not found: {name}")]
    ChannelNotFound { name: String },

    /// A channel with this name already exists
    #[error("Channel already exists: {name}")]
    DuplicateChannel { name: String },

    /// Value kind does not match the channel's kind
    #[error("Channel '{channel}' expects {expected:?}, got {actual:?}")]
    ValueKindMismatch {
        channel: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// An insert did not supply a value for this channel
    #[error("Missing value for channel '{channel}'")]
    MissingChannelValue { channel: String },

    /// An insert supplied a value for a channel the track does not own
    #[error("Value supplied for unknown channel '{channel}'")]
    UnknownChannelValue { channel: String },

    /// Frame rates must be strictly positive
    #[error("Invalid frame rate: {numerator}/{denominator}")]
    InvalidFrameRate { numerator: i64, denominator: i64 },

    /// Tempo must be strictly positive
    #[error("Invalid tempo")]
    InvalidTempo,

    /// Ratios need a non-zero denominator
    #[error("Invalid ratio: zero denominator")]
    InvalidRatio,

    /// Track durations cannot be negative
    #[error("Invalid duration: {duration}")]
    InvalidDuration { duration: i64 },

    /// Serialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl AnimationError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::ChannelLengthMismatch { .. }
            | Self::ChannelNotFound { .. }
            | Self::DuplicateChannel { .. }
            | Self::ValueKindMismatch { .. }
            | Self::MissingChannelValue { .. }
            | Self::UnknownChannelValue { .. } => "channel",
            Self::IndexOutOfBounds { .. } | Self::KeyframeOrder { .. } => "keyframe",
            Self::InvalidFrameRate { .. }
            | Self::InvalidTempo
            | Self::InvalidRatio
            | Self::InvalidDuration { .. } => {
                "time"
            }
            Self::SerializationError { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for AnimationError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            reason: err.to_string(),
        }
    }
}
