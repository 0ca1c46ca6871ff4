//! Render loop scheduler
//!
//! The single per-frame tick that keeps scroll, triggers, timelines, and
//! the scene in lockstep. On every frame signal, in fixed order:
//!
//! 1. consume deferred resize/content-mutation signals (refresh geometry)
//! 2. drain queued input into the scroll simulator
//! 3. compute trigger progress and advance the affected timelines
//! 4. tick free-running timelines
//! 5. apply the scroll-driven camera write (frozen while a pin is active)
//! 6. render the scene
//!
//! Rendering therefore always observes the state computed earlier in the
//! *same* tick, never a stale one. The loop owns its collaborators
//! outright (explicit dependency injection, no global registries) and is
//! driven by the host calling [`RenderLoop::pump`] while a frame request
//! is outstanding.

use silk_animation::{CancelBehavior, RepeatMode, Timeline, TimelineEngine};
use silk_core::{
    loop_events, ElementId, FrameClock, FrameContext, FrameRequest, LayoutProvider, LoopState,
    PropertyPath, SceneAdapter, SilkError, StateTransitions, TimelineKey, TriggerKey,
    ViewportSize,
};

use crate::registry::{ProgressUpdate, TriggerConfig, TriggerRegistry};
use crate::simulator::{ScrollSimulator, ScrollState};

/// Scheduler configuration.
#[derive(Clone, Debug)]
pub struct RenderLoopConfig {
    /// Scene property that receives the smoothed scroll position every
    /// frame, typically a camera path. While a pinned trigger is active
    /// the written value is frozen at its pin-entry position.
    pub camera_scroll_path: Option<PropertyPath>,
    /// Upper clamp for frame dt in seconds; a backgrounded host can
    /// deliver one enormous gap and the smoothing must stay stable.
    pub max_frame_dt: f32,
    /// Initial viewport size, updated through `notify_resize`.
    pub viewport: ViewportSize,
}

impl Default for RenderLoopConfig {
    fn default() -> Self {
        Self {
            camera_scroll_path: None,
            max_frame_dt: 0.1,
            viewport: ViewportSize::default(),
        }
    }
}

/// The render loop: lifecycle FSM plus the per-frame pipeline.
pub struct RenderLoop {
    state: LoopState,
    simulator: ScrollSimulator,
    registry: TriggerRegistry,
    engine: TimelineEngine,
    scene: Box<dyn SceneAdapter>,
    clock: Box<dyn FrameClock>,
    layout: Box<dyn LayoutProvider>,
    config: RenderLoopConfig,

    frame_request: Option<FrameRequest>,
    /// Raw input accumulated since the last tick.
    pending_delta: f32,
    /// Geometry changed; refresh at the next tick boundary, never mid-frame.
    needs_refresh: bool,
    pending_viewport: Option<ViewportSize>,
    viewport: ViewportSize,
    elapsed: f32,
    /// Re-entrancy guard: a frame signal arriving while one is being
    /// processed is coalesced, not queued.
    in_frame: bool,
    /// Scroll value held while a pinned trigger is active.
    pin_hold: Option<f32>,
    progress_scratch: Vec<ProgressUpdate>,
}

impl RenderLoop {
    /// Assemble a loop from its collaborators.
    pub fn new(
        simulator: ScrollSimulator,
        registry: TriggerRegistry,
        engine: TimelineEngine,
        scene: Box<dyn SceneAdapter>,
        clock: Box<dyn FrameClock>,
        layout: Box<dyn LayoutProvider>,
        config: RenderLoopConfig,
    ) -> Self {
        let viewport = config.viewport;
        Self {
            state: LoopState::Idle,
            simulator,
            registry,
            engine,
            scene,
            clock,
            layout,
            config,
            frame_request: None,
            pending_delta: 0.0,
            // Resolve trigger spans and scroll bounds on the first tick.
            needs_refresh: true,
            pending_viewport: None,
            viewport,
            elapsed: 0.0,
            in_frame: false,
            pin_hold: None,
            progress_scratch: Vec::new(),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Begin (or resume) frame processing. Takes the frame request from
    /// the clock; no-op unless Idle or Paused.
    pub fn start(&mut self) {
        if let Some(next) = self.state.on_event(loop_events::START) {
            self.state = next;
            if self.frame_request.is_none() {
                self.frame_request = Some(self.clock.request());
            }
        }
    }

    /// Stop requesting frames without touching any state. No mutation
    /// occurs until `start` is called again.
    pub fn pause(&mut self) {
        if let Some(next) = self.state.on_event(loop_events::PAUSE) {
            self.state = next;
            self.release_frame_request();
        }
    }

    /// Tear the loop down. The frame request is released on every path
    /// into `Destroyed`; all later calls on the loop are no-ops.
    pub fn destroy(&mut self) {
        if let Some(next) = self.state.on_event(loop_events::DESTROY) {
            self.state = next;
            self.release_frame_request();
            self.pending_delta = 0.0;
            self.pending_viewport = None;
            self.needs_refresh = false;
        }
    }

    fn release_frame_request(&mut self) {
        if let Some(request) = self.frame_request.take() {
            self.clock.cancel(request);
        }
    }

    // =========================================================================
    // Host signals (delivered asynchronously, acted on at the next tick)
    // =========================================================================

    /// Queue a raw scroll delta (wheel, touch-drag, keyboard). Ignored
    /// unless the loop is running; drained at the next tick.
    pub fn queue_scroll(&mut self, delta: f32) {
        if self.state.is_running() {
            self.pending_delta += delta;
        }
    }

    /// Record a viewport resize. Geometry is re-measured at the start of
    /// the next tick, never mid-frame.
    pub fn notify_resize(&mut self, viewport: ViewportSize) {
        if !self.state.is_destroyed() {
            self.pending_viewport = Some(viewport);
            self.needs_refresh = true;
        }
    }

    /// Record a content mutation (elements added, removed, or reflowed).
    pub fn notify_content_mutated(&mut self) {
        if !self.state.is_destroyed() {
            self.needs_refresh = true;
        }
    }

    /// Process one frame signal from the host.
    ///
    /// No-op unless running. At most one frame is ever in flight: a
    /// re-entrant signal (nested event dispatch on a cooperative host) is
    /// coalesced rather than queued, so work is never duplicated.
    pub fn pump(&mut self, dt: f32) {
        if !self.state.is_running() {
            return;
        }
        if self.in_frame {
            tracing::trace!("frame signal coalesced: previous frame still in flight");
            return;
        }
        self.in_frame = true;
        self.frame(dt);
        self.in_frame = false;
    }

    fn frame(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, self.config.max_frame_dt);

        // 1. Deferred geometry.
        if let Some(viewport) = self.pending_viewport.take() {
            self.viewport = viewport;
        }
        if self.needs_refresh {
            self.registry.refresh(self.layout.as_ref());
            let scrollable = (self.layout.content_height() - self.viewport.height).max(0.0);
            self.simulator.set_bounds(0.0, scrollable);
            self.needs_refresh = false;
        }

        // 2. Input.
        let delta = std::mem::take(&mut self.pending_delta);
        let scroll = *self.simulator.update(delta, dt);
        self.elapsed += dt;

        // 3. Trigger progress, registration order (shared-timeline
        // tie-break: last registered wins).
        let mut updates = std::mem::take(&mut self.progress_scratch);
        self.registry.compute_progress(&scroll, &mut updates);
        for update in &updates {
            self.engine
                .advance(update.timeline, update.progress, self.scene.as_mut());
        }

        // 4. Free-running timelines.
        self.engine.tick(dt, self.scene.as_mut());

        // 5. Scroll-driven camera, frozen while any pin is active.
        if let Some(path) = &self.config.camera_scroll_path {
            let pinned = updates.iter().any(|u| u.pin_active);
            let value = if pinned {
                *self.pin_hold.get_or_insert(scroll.smoothed_position)
            } else {
                self.pin_hold = None;
                scroll.smoothed_position
            };
            self.scene.set_property(path, value);
        }
        self.progress_scratch = updates;

        // 6. Render with this tick's state.
        let frame = FrameContext {
            dt,
            elapsed: self.elapsed,
            viewport: self.viewport,
        };
        self.scene.render(&frame);
    }

    // =========================================================================
    // Content wiring
    // =========================================================================

    /// Add a trigger-driven timeline to the engine.
    pub fn add_timeline(&mut self, timeline: Timeline) -> TimelineKey {
        self.engine.insert(timeline)
    }

    /// Add a free-running timeline that plays on the loop's clock.
    pub fn add_timed_timeline(
        &mut self,
        timeline: Timeline,
        duration: f32,
        repeat: RepeatMode,
    ) -> TimelineKey {
        self.engine.insert_timed(timeline, duration, repeat)
    }

    /// Cancel a timeline, optionally reverting to its initial state.
    pub fn cancel_timeline(&mut self, key: TimelineKey, behavior: CancelBehavior) {
        self.engine.cancel(key, behavior, self.scene.as_mut());
    }

    /// Register a scroll trigger against current layout.
    pub fn register_trigger(
        &mut self,
        element: ElementId,
        config: TriggerConfig,
    ) -> Result<TriggerKey, SilkError> {
        self.registry.register(element, config, self.layout.as_ref())
    }

    /// Remove a trigger. Stale keys degrade to a diagnostic.
    pub fn unregister_trigger(&mut self, key: TriggerKey) {
        self.registry.unregister(key);
    }

    /// Remove every trigger bound to an element.
    pub fn unregister_element(&mut self, element: ElementId) {
        self.registry.unregister_element(element);
    }

    /// Programmatic jump: snap the scroll position and zero velocity.
    /// The target is clamped to the current scroll bounds.
    pub fn jump_to(&mut self, position: f32) {
        if !self.state.is_destroyed() {
            self.simulator.jump_to(position);
        }
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    pub fn scroll_state(&self) -> &ScrollState {
        self.simulator.state()
    }

    pub fn registry(&self) -> &TriggerRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &TimelineEngine {
        &self.engine
    }

    /// True while a pinned trigger is freezing the camera write.
    pub fn is_pin_active(&self) -> bool {
        self.pin_hold.is_some()
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        // Guaranteed release on every exit path.
        self.release_frame_request();
    }
}
