//! Keyframe tracks
//!
//! A track binds one scene property to an ordered keyframe sequence over
//! normalized progress. Sampling is a pure function of progress: no hidden
//! counters, so the same progress always yields the same value regardless
//! of evaluation history.

use silk_core::{PropertyPath, SilkError};
use smallvec::SmallVec;

use crate::easing::Easing;

/// A single keyframe at a normalized position in [0, 1].
#[derive(Clone, Copy, Debug)]
pub struct Keyframe {
    /// Position along the track's driving parameter (progress or
    /// normalized time).
    pub at: f32,
    /// Property value at this keyframe.
    pub value: f32,
    /// Easing applied to the segment arriving *at* this keyframe.
    pub easing: Easing,
}

/// Keyframe sequence for one animated property.
///
/// Construct through [`Track::builder`], which validates ordering and
/// range up front so sampling never has to handle malformed data.
#[derive(Clone, Debug)]
pub struct Track {
    path: PropertyPath,
    keyframes: SmallVec<[Keyframe; 4]>,
}

impl Track {
    pub fn builder(path: impl Into<PropertyPath>) -> TrackBuilder {
        TrackBuilder::new(path)
    }

    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Value at the first keyframe, used when a cancelled timeline reverts.
    pub fn initial_value(&self) -> f32 {
        self.keyframes[0].value
    }

    /// Sample the track at a progress value.
    ///
    /// Progress is clamped to [0, 1]; before the first keyframe the first
    /// value holds, past the last keyframe the last value holds.
    pub fn sample(&self, progress: f32) -> f32 {
        let progress = progress.clamp(0.0, 1.0);
        let keyframes = &self.keyframes;

        if progress <= keyframes[0].at {
            return keyframes[0].value;
        }
        let last = &keyframes[keyframes.len() - 1];
        if progress >= last.at {
            return last.value;
        }

        // Find the segment containing `progress`. Tracks are small, so a
        // linear scan beats a binary search in practice.
        let mut upper = 1;
        while keyframes[upper].at < progress {
            upper += 1;
        }
        let from = &keyframes[upper - 1];
        let to = &keyframes[upper];

        let span = to.at - from.at;
        if span <= f32::EPSILON {
            return to.value;
        }

        let local = (progress - from.at) / span;
        let eased = to.easing.apply(local);
        from.value + (to.value - from.value) * eased
    }
}

/// Fluent builder for [`Track`].
///
/// # Example
///
/// ```rust
/// use silk_animation::{Easing, Track};
///
/// let track = Track::builder("camera.position.y")
///     .ease(Easing::EaseOutCubic)
///     .at(0.0, 0.0)
///     .at(1.0, 6.0)
///     .build()
///     .unwrap();
/// assert_eq!(track.sample(0.0), 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct TrackBuilder {
    path: PropertyPath,
    keyframes: SmallVec<[Keyframe; 4]>,
    default_easing: Easing,
}

impl TrackBuilder {
    pub fn new(path: impl Into<PropertyPath>) -> Self {
        Self {
            path: path.into(),
            keyframes: SmallVec::new(),
            default_easing: Easing::Linear,
        }
    }

    /// Default easing for subsequently added keyframes.
    pub fn ease(mut self, easing: Easing) -> Self {
        self.default_easing = easing;
        self
    }

    /// Add a keyframe using the current default easing.
    pub fn at(self, at: f32, value: f32) -> Self {
        let easing = self.default_easing;
        self.at_with_ease(at, value, easing)
    }

    /// Add a keyframe with explicit easing for its arriving segment.
    pub fn at_with_ease(mut self, at: f32, value: f32, easing: Easing) -> Self {
        self.keyframes.push(Keyframe { at, value, easing });
        self
    }

    /// Validate and build the track.
    ///
    /// Keyframes must be supplied in ascending `at` order within [0, 1];
    /// out-of-order or out-of-range input is rejected rather than silently
    /// sorted, since it nearly always indicates an authoring mistake.
    pub fn build(self) -> Result<Track, SilkError> {
        if self.keyframes.is_empty() {
            return Err(SilkError::EmptyTrack {
                path: self.path.as_str().to_owned(),
            });
        }
        for pair in self.keyframes.windows(2) {
            if pair[1].at < pair[0].at {
                return Err(SilkError::UnsortedKeyframes {
                    path: self.path.as_str().to_owned(),
                });
            }
        }
        for keyframe in &self.keyframes {
            if !(0.0..=1.0).contains(&keyframe.at) {
                return Err(SilkError::KeyframeOutOfRange {
                    path: self.path.as_str().to_owned(),
                    at: keyframe.at,
                });
            }
        }
        Ok(Track {
            path: self.path,
            keyframes: self.keyframes,
        })
    }
}
