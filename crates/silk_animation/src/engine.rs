//! Timeline engine
//!
//! Owns every live timeline and applies interpolated property values to
//! the scene. Trigger-bound timelines are advanced to an externally
//! computed progress; free-running timelines are clocked by `tick`.
//!
//! Property setters on the scene are not assumed side-effect-free, so the
//! engine skips a write pass only when the requested progress is
//! bit-identical to the last applied one. That makes `advance` idempotent:
//! a repeated call with the same progress performs zero scene mutations.

use silk_core::{Diagnostic, DiagnosticSink, Diagnostics, SceneAdapter, TimelineKey};
use slotmap::SlotMap;

use crate::timeline::{Playback, RepeatMode, Timeline};

/// What a cancelled timeline leaves behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CancelBehavior {
    /// Keep whatever values were last applied.
    #[default]
    Hold,
    /// Reapply every track's initial keyframe value.
    Revert,
}

enum Driver {
    /// Progress arrives from outside (a scroll trigger).
    Progress,
    /// Progress is derived from elapsed time.
    Timed(Playback),
}

struct Entry {
    timeline: Timeline,
    driver: Driver,
    /// Bit pattern of the last applied progress, for write deduplication.
    last_applied: Option<u32>,
}

/// Registry and evaluator for all live timelines.
#[derive(Default)]
pub struct TimelineEngine {
    timelines: SlotMap<TimelineKey, Entry>,
    diagnostics: Diagnostics,
}

impl TimelineEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an observer for stale-key diagnostics.
    pub fn set_diagnostic_sink(&mut self, sink: Option<DiagnosticSink>) {
        self.diagnostics.set_sink(sink);
    }

    /// Add a trigger-driven timeline. The caller supplies progress through
    /// [`advance`](Self::advance).
    pub fn insert(&mut self, timeline: Timeline) -> TimelineKey {
        self.timelines.insert(Entry {
            timeline,
            driver: Driver::Progress,
            last_applied: None,
        })
    }

    /// Add a free-running timeline that plays `duration` seconds per
    /// iteration under the given repeat mode, starting immediately.
    pub fn insert_timed(
        &mut self,
        timeline: Timeline,
        duration: f32,
        repeat: RepeatMode,
    ) -> TimelineKey {
        self.timelines.insert(Entry {
            timeline,
            driver: Driver::Timed(Playback::new(duration, repeat)),
            last_applied: None,
        })
    }

    pub fn contains(&self, key: TimelineKey) -> bool {
        self.timelines.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    /// Whether a timed timeline is still playing. Progress-driven and
    /// stale keys report false.
    pub fn is_playing(&self, key: TimelineKey) -> bool {
        match self.timelines.get(key) {
            Some(Entry {
                driver: Driver::Timed(playback),
                ..
            }) => playback.is_playing(),
            _ => false,
        }
    }

    /// Set every property of the timeline to its value at `progress`.
    ///
    /// Progress is clamped to [0, 1]. A stale key is a no-op with a
    /// diagnostic; the frame loop must never fail mid-tick.
    pub fn advance(&mut self, key: TimelineKey, progress: f32, scene: &mut dyn SceneAdapter) {
        let Some(entry) = self.timelines.get_mut(key) else {
            self.diagnostics.emit(Diagnostic::StaleTimeline { timeline: key });
            return;
        };
        let progress = progress.clamp(0.0, 1.0);
        if entry.last_applied == Some(progress.to_bits()) {
            return;
        }
        entry.timeline.apply_at(progress, scene);
        entry.last_applied = Some(progress.to_bits());
    }

    /// Advance every free-running timeline by `dt` seconds.
    pub fn tick(&mut self, dt: f32, scene: &mut dyn SceneAdapter) {
        for (_, entry) in self.timelines.iter_mut() {
            let Driver::Timed(playback) = &mut entry.driver else {
                continue;
            };
            let progress = playback.tick(dt);
            if entry.last_applied == Some(progress.to_bits()) {
                continue;
            }
            entry.timeline.apply_at(progress, scene);
            entry.last_applied = Some(progress.to_bits());
        }
    }

    /// Stop a timeline and remove it from the engine.
    ///
    /// With [`CancelBehavior::Revert`] the timeline's initial keyframe
    /// state is written back to the scene first. Cancelling an already
    /// removed key is a no-op with a diagnostic.
    pub fn cancel(
        &mut self,
        key: TimelineKey,
        behavior: CancelBehavior,
        scene: &mut dyn SceneAdapter,
    ) {
        match self.timelines.remove(key) {
            Some(entry) => {
                tracing::trace!(?key, ?behavior, "timeline cancelled");
                if behavior == CancelBehavior::Revert {
                    entry.timeline.apply_initial(scene);
                }
            }
            None => {
                self.diagnostics.emit(Diagnostic::StaleTimeline { timeline: key });
            }
        }
    }
}
