//! Timelines and time-driven playback
//!
//! A timeline groups keyframe tracks that move together. Trigger-bound
//! timelines are evaluated at whatever progress their trigger dictates;
//! free-running timelines carry a [`Playback`] that converts elapsed time
//! into progress with a configurable repeat mode.

use silk_core::{SceneAdapter, SilkError};
use smallvec::SmallVec;

use crate::keyframe::Track;

/// What happens when a time-driven timeline reaches its end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Play to the end once and stop there.
    #[default]
    Once,
    /// Wrap back to the start every iteration.
    Loop,
    /// Alternate forward and backward each iteration.
    PingPong,
}

/// A set of keyframe tracks evaluated at a shared progress value.
///
/// Immutable after construction; all playback bookkeeping lives in the
/// engine, so evaluating a timeline at any progress is a pure function of
/// that progress.
#[derive(Clone, Debug)]
pub struct Timeline {
    tracks: SmallVec<[Track; 2]>,
}

impl Timeline {
    /// Build a timeline from validated tracks. Rejects an empty track list.
    pub fn new(tracks: impl IntoIterator<Item = Track>) -> Result<Self, SilkError> {
        let tracks: SmallVec<[Track; 2]> = tracks.into_iter().collect();
        if tracks.is_empty() {
            return Err(SilkError::EmptyTimeline);
        }
        Ok(Self { tracks })
    }

    /// Convenience constructor for the common one-track case.
    pub fn single(track: Track) -> Self {
        Self {
            tracks: SmallVec::from_iter([track]),
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Write every track's value at `progress` to the scene.
    pub fn apply_at(&self, progress: f32, scene: &mut dyn SceneAdapter) {
        for track in &self.tracks {
            scene.set_property(track.path(), track.sample(progress));
        }
    }

    /// Write every track's first-keyframe value to the scene. Used when a
    /// cancelled timeline reverts to its initial state.
    pub fn apply_initial(&self, scene: &mut dyn SceneAdapter) {
        for track in &self.tracks {
            scene.set_property(track.path(), track.initial_value());
        }
    }
}

/// Time-to-progress conversion for free-running timelines.
#[derive(Clone, Copy, Debug)]
pub struct Playback {
    /// Iteration duration in seconds.
    duration: f32,
    repeat: RepeatMode,
    /// Seconds into the current iteration.
    elapsed: f32,
    playing: bool,
    /// Current ping-pong direction.
    reversed: bool,
}

impl Playback {
    /// Create a playback that starts playing immediately.
    pub fn new(duration: f32, repeat: RepeatMode) -> Self {
        Self {
            duration: duration.max(f32::EPSILON),
            repeat,
            elapsed: 0.0,
            playing: true,
            reversed: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Progress in [0, 1] for the current direction.
    pub fn progress(&self) -> f32 {
        let forward = (self.elapsed / self.duration).clamp(0.0, 1.0);
        if self.reversed {
            1.0 - forward
        } else {
            forward
        }
    }

    /// Advance by `dt` seconds and return the resulting progress.
    pub fn tick(&mut self, dt: f32) -> f32 {
        if !self.playing {
            return self.progress();
        }

        self.elapsed += dt;
        if self.elapsed >= self.duration {
            match self.repeat {
                RepeatMode::Once => {
                    self.elapsed = self.duration;
                    self.playing = false;
                }
                RepeatMode::Loop => {
                    self.elapsed = self.elapsed.rem_euclid(self.duration);
                }
                RepeatMode::PingPong => {
                    while self.elapsed >= self.duration {
                        self.elapsed -= self.duration;
                        self.reversed = !self.reversed;
                    }
                }
            }
        }

        self.progress()
    }
}
