//! Soft-failure diagnostics
//!
//! Nothing in steady-state per-frame execution is allowed to abort the
//! loop. Conditions that would be errors elsewhere (operating on a stale
//! key, a trigger element that measures zero height) degrade to no-ops and
//! are reported here. Install a sink to observe them; without one they are
//! logged at debug level.

use crate::host::ElementId;
use crate::id::{TimelineKey, TriggerKey};

/// A non-fatal condition observed during registration or a frame tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// A trigger's element measured zero height; the trigger reports
    /// progress 0 and is never active until a refresh gives it extent.
    DegenerateTrigger {
        trigger: TriggerKey,
        element: ElementId,
    },
    /// An operation referenced a trigger that is no longer registered.
    StaleTrigger { trigger: TriggerKey },
    /// An operation referenced a timeline that was cancelled or removed.
    StaleTimeline { timeline: TimelineKey },
}

/// Observer callback for [`Diagnostic`] events.
pub type DiagnosticSink = Box<dyn FnMut(Diagnostic) + Send>;

/// Diagnostic dispatch owned by each component that can degrade.
#[derive(Default)]
pub struct Diagnostics {
    sink: Option<DiagnosticSink>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(sink: DiagnosticSink) -> Self {
        Self { sink: Some(sink) }
    }

    /// Replace the sink. Passing `None` reverts to debug logging.
    pub fn set_sink(&mut self, sink: Option<DiagnosticSink>) {
        self.sink = sink;
    }

    /// Report a diagnostic to the sink, or to the log when no sink is set.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        match &mut self.sink {
            Some(sink) => sink(diagnostic),
            None => tracing::debug!(?diagnostic, "silk diagnostic"),
        }
    }
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics")
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}
