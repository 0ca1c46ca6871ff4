//! Silk Animation System
//!
//! Keyframe timelines evaluated against an externally supplied progress
//! value (scroll triggers) or against time (free-running animations).
//!
//! # Features
//!
//! - **Easing Registry**: fixed set of named curves, cubic bezier, and
//!   custom functions
//! - **Keyframe Tracks**: per-property keyframe sequences, validated at
//!   construction, sampled as a pure function of progress
//! - **Timeline Engine**: progress-driven `advance` with idempotent write
//!   deduplication, time-driven `tick` with repeat modes, and cooperative
//!   cancellation

pub mod easing;
pub mod engine;
pub mod keyframe;
pub mod timeline;

pub use easing::Easing;
pub use engine::{CancelBehavior, TimelineEngine};
pub use keyframe::{Keyframe, Track, TrackBuilder};
pub use timeline::{Playback, RepeatMode, Timeline};
