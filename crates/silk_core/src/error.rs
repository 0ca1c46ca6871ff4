//! Synchronous error taxonomy
//!
//! These errors are raised at construction/registration time and rejected
//! before any state changes. Runtime degradations inside the frame tick
//! (stale keys, degenerate geometry) never surface as errors; they go
//! through [`crate::diagnostics`] instead, because frame-loop code must
//! never throw mid-tick.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SilkError {
    /// A trigger's resolved scroll span is empty or inverted.
    #[error("trigger start offset {start} must be less than end offset {end}")]
    InvalidTriggerRange { start: f32, end: f32 },

    /// A timeline was built with no keyframe tracks.
    #[error("timeline has no keyframe tracks")]
    EmptyTimeline,

    /// A track was built with no keyframes.
    #[error("track \"{path}\" has no keyframes")]
    EmptyTrack { path: String },

    /// Track keyframes were supplied out of order.
    #[error("track \"{path}\" keyframes must be ordered ascending by position")]
    UnsortedKeyframes { path: String },

    /// A keyframe position fell outside the normalized [0, 1] range.
    #[error("track \"{path}\" keyframe position {at} is outside [0, 1]")]
    KeyframeOutOfRange { path: String, at: f32 },
}
