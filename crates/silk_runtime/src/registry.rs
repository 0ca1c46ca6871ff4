//! Trigger registry
//!
//! Declarative bindings from measured element regions to timelines. Each
//! trigger resolves to a scroll span `[start, end]` in document pixels;
//! its progress is the clamped position of the smoothed scroll value
//! inside that span.
//!
//! # Evaluation order
//!
//! Triggers are evaluated strictly in registration order. Unrelated
//! triggers are independent, but when several triggers share one timeline
//! the later registration is applied last and therefore wins on
//! overlapping writes to the same property. This tie-break is a documented
//! design choice, not an accident of iteration order, which is why the
//! registry keeps an explicit order list beside the slotmap (slot reuse
//! would otherwise scramble it).

use rustc_hash::FxHashMap;
use silk_core::{
    Diagnostic, DiagnosticSink, Diagnostics, ElementId, LayoutProvider, SilkError, TimelineKey,
    TriggerKey,
};
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::simulator::ScrollState;

/// Declarative trigger options, resolved against the element's measured
/// geometry at registration and on every refresh.
#[derive(Clone, Copy, Debug)]
pub struct TriggerConfig {
    /// Offset in pixels added to the element's top edge to form the span
    /// start.
    pub start_offset: f32,
    /// Offset in pixels added to the element's bottom edge to form the
    /// span end.
    pub end_offset: f32,
    /// Report an active flag while the scroll position is inside the span,
    /// letting the scheduler freeze scroll-driven camera motion.
    pub pinned: bool,
    /// The timeline this trigger drives. Non-owning; several triggers may
    /// deliberately share one timeline.
    pub timeline: TimelineKey,
}

impl TriggerConfig {
    pub fn new(timeline: TimelineKey) -> Self {
        Self {
            start_offset: 0.0,
            end_offset: 0.0,
            pinned: false,
            timeline,
        }
    }

    pub fn with_offsets(mut self, start: f32, end: f32) -> Self {
        self.start_offset = start;
        self.end_offset = end;
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }
}

struct Trigger {
    element: ElementId,
    config: TriggerConfig,
    /// Resolved span start in document pixels.
    start: f32,
    /// Resolved span end in document pixels.
    end: f32,
    /// Element measured zero height; progress 0, never active.
    degenerate: bool,
}

impl Trigger {
    fn resolve(&mut self, measure: silk_core::Measure) {
        self.degenerate = measure.height <= 0.0;
        self.start = measure.offset_top + self.config.start_offset;
        self.end = measure.offset_top + measure.height + self.config.end_offset;
    }

    fn progress(&self, position: f32) -> f32 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return 0.0;
        }
        ((position - self.start) / span).clamp(0.0, 1.0)
    }

    fn contains(&self, position: f32) -> bool {
        position >= self.start && position <= self.end
    }
}

/// One trigger's result for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressUpdate {
    pub trigger: TriggerKey,
    pub timeline: TimelineKey,
    /// Clamped progress in [0, 1].
    pub progress: f32,
    /// True only for pinned triggers while the scroll position is inside
    /// their span (boundaries inclusive).
    pub pin_active: bool,
}

/// Registry of scroll triggers.
#[derive(Default)]
pub struct TriggerRegistry {
    triggers: SlotMap<TriggerKey, Trigger>,
    /// Registration order; evaluation and tie-breaking follow this.
    order: Vec<TriggerKey>,
    by_element: FxHashMap<ElementId, SmallVec<[TriggerKey; 1]>>,
    diagnostics: Diagnostics,
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an observer for degenerate-geometry and stale-key
    /// diagnostics.
    pub fn set_diagnostic_sink(&mut self, sink: Option<DiagnosticSink>) {
        self.diagnostics.set_sink(sink);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: TriggerKey) -> bool {
        self.triggers.contains_key(key)
    }

    /// Resolved `(start, end)` span of a live trigger.
    pub fn span(&self, key: TriggerKey) -> Option<(f32, f32)> {
        self.triggers.get(key).map(|t| (t.start, t.end))
    }

    /// Register a trigger on an element, measuring it immediately.
    ///
    /// A zero-height element is not an error: the trigger registers as
    /// degenerate (progress 0, never active) and a
    /// [`Diagnostic::DegenerateTrigger`] is emitted. A span whose resolved
    /// start is not below its end is rejected synchronously.
    pub fn register(
        &mut self,
        element: ElementId,
        config: TriggerConfig,
        layout: &dyn LayoutProvider,
    ) -> Result<TriggerKey, SilkError> {
        let measure = layout.measure(element);
        let mut trigger = Trigger {
            element,
            config,
            start: 0.0,
            end: 0.0,
            degenerate: false,
        };
        trigger.resolve(measure);

        if !trigger.degenerate && trigger.start >= trigger.end {
            return Err(SilkError::InvalidTriggerRange {
                start: trigger.start,
                end: trigger.end,
            });
        }

        let degenerate = trigger.degenerate;
        let key = self.triggers.insert(trigger);
        self.order.push(key);
        self.by_element.entry(element).or_default().push(key);

        if degenerate {
            self.diagnostics
                .emit(Diagnostic::DegenerateTrigger { trigger: key, element });
        }
        Ok(key)
    }

    /// Remove a trigger. A stale key is a no-op with a diagnostic.
    pub fn unregister(&mut self, key: TriggerKey) {
        match self.triggers.remove(key) {
            Some(trigger) => {
                self.order.retain(|k| *k != key);
                if let Some(keys) = self.by_element.get_mut(&trigger.element) {
                    keys.retain(|k| *k != key);
                    if keys.is_empty() {
                        self.by_element.remove(&trigger.element);
                    }
                }
            }
            None => {
                self.diagnostics.emit(Diagnostic::StaleTrigger { trigger: key });
            }
        }
    }

    /// Remove every trigger bound to an element, for hosts that tear an
    /// element out of the document wholesale.
    pub fn unregister_element(&mut self, element: ElementId) {
        let Some(keys) = self.by_element.remove(&element) else {
            return;
        };
        for key in keys {
            self.triggers.remove(key);
            self.order.retain(|k| *k != key);
        }
    }

    /// Re-measure every trigger against current layout.
    ///
    /// Called by the scheduler at the next tick boundary after a resize or
    /// content-mutation signal, never mid-frame. A trigger entering the
    /// degenerate state is flagged once per entry.
    pub fn refresh(&mut self, layout: &dyn LayoutProvider) {
        for &key in &self.order {
            let trigger = &mut self.triggers[key];
            let was_degenerate = trigger.degenerate;
            trigger.resolve(layout.measure(trigger.element));
            if trigger.degenerate && !was_degenerate {
                self.diagnostics.emit(Diagnostic::DegenerateTrigger {
                    trigger: key,
                    element: trigger.element,
                });
            }
        }
    }

    /// Compute every trigger's progress for the frame, in registration
    /// order, appending to `out` (cleared first).
    ///
    /// Degenerate triggers report progress 0 and are never pin-active.
    pub fn compute_progress(&self, scroll: &ScrollState, out: &mut Vec<ProgressUpdate>) {
        out.clear();
        let position = scroll.smoothed_position;
        for &key in &self.order {
            let trigger = &self.triggers[key];
            let (progress, pin_active) = if trigger.degenerate {
                (0.0, false)
            } else {
                (
                    trigger.progress(position),
                    trigger.config.pinned && trigger.contains(position),
                )
            };
            out.push(ProgressUpdate {
                trigger: key,
                timeline: trigger.config.timeline,
                progress,
                pin_active,
            });
        }
    }
}
