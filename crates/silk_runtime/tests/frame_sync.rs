//! Integration tests for the scroll → trigger → timeline → render pipeline
//!
//! These tests verify that:
//! - rendering observes the same tick's scroll state, never a stale one
//! - trigger progress drives timelines end to end through the scheduler
//! - shared timelines resolve overlapping writes by registration order
//! - pinned triggers freeze the scroll-driven camera write
//! - resize and content-mutation signals take effect at tick boundaries
//! - a destroyed loop ignores frame signals entirely

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use silk_animation::{RepeatMode, Timeline, TimelineEngine, Track};
use silk_core::{
    ElementId, FrameClock, FrameContext, FrameRequest, LayoutProvider, Measure, PropertyPath,
    SceneAdapter, ViewportSize,
};
use silk_runtime::{
    RenderLoop, RenderLoopConfig, ScrollSimulator, SmoothingConfig, TriggerConfig,
    TriggerRegistry,
};

const CAMERA: &str = "camera.position.y";

// ============================================================================
// Test doubles
// ============================================================================

#[derive(Default)]
struct SceneLog {
    /// Latest value per property path.
    current: HashMap<String, f32>,
    /// Total property mutations.
    writes: u64,
    /// Camera value visible at each render call.
    rendered_camera: Vec<Option<f32>>,
    frames: Vec<FrameContext>,
}

#[derive(Clone, Default)]
struct SceneDouble(Arc<Mutex<SceneLog>>);

impl SceneDouble {
    fn value(&self, path: &str) -> Option<f32> {
        self.0.lock().unwrap().current.get(path).copied()
    }

    fn writes(&self) -> u64 {
        self.0.lock().unwrap().writes
    }

    fn render_count(&self) -> usize {
        self.0.lock().unwrap().frames.len()
    }

    fn last_rendered_camera(&self) -> Option<f32> {
        *self.0.lock().unwrap().rendered_camera.last().unwrap()
    }
}

impl SceneAdapter for SceneDouble {
    fn set_property(&mut self, path: &PropertyPath, value: f32) {
        let mut log = self.0.lock().unwrap();
        log.current.insert(path.as_str().to_owned(), value);
        log.writes += 1;
    }

    fn render(&mut self, frame: &FrameContext) {
        let mut log = self.0.lock().unwrap();
        let camera = log.current.get(CAMERA).copied();
        log.rendered_camera.push(camera);
        log.frames.push(*frame);
    }
}

#[derive(Default)]
struct ClockSpy {
    requests: u64,
    cancels: u64,
}

#[derive(Clone, Default)]
struct SharedClock(Arc<Mutex<ClockSpy>>);

impl FrameClock for SharedClock {
    fn request(&mut self) -> FrameRequest {
        let mut spy = self.0.lock().unwrap();
        spy.requests += 1;
        FrameRequest(spy.requests)
    }

    fn cancel(&mut self, _request: FrameRequest) {
        self.0.lock().unwrap().cancels += 1;
    }
}

#[derive(Default)]
struct LayoutState {
    elements: HashMap<ElementId, Measure>,
    content_height: f32,
}

/// Layout double the test can mutate while the loop holds its own handle.
#[derive(Clone, Default)]
struct SharedLayout(Arc<Mutex<LayoutState>>);

impl SharedLayout {
    fn place(&self, element: ElementId, offset_top: f32, height: f32) {
        let mut state = self.0.lock().unwrap();
        state.elements.insert(element, Measure { offset_top, height });
        state.content_height = state
            .elements
            .values()
            .map(|m| m.offset_top + m.height)
            .fold(state.content_height, f32::max);
    }
}

impl LayoutProvider for SharedLayout {
    fn measure(&self, element: ElementId) -> Measure {
        self.0.lock().unwrap().elements[&element]
    }

    fn content_height(&self) -> f32 {
        self.0.lock().unwrap().content_height.max(2000.0)
    }
}

fn opacity_ramp(path: &str) -> Timeline {
    Timeline::single(
        Track::builder(path)
            .at(0.0, 0.0)
            .at(1.0, 1.0)
            .build()
            .unwrap(),
    )
}

struct Rig {
    scene: SceneDouble,
    clock: SharedClock,
    layout: SharedLayout,
    render_loop: RenderLoop,
}

fn rig() -> Rig {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("silk_runtime=trace")
        .try_init();
    let scene = SceneDouble::default();
    let clock = SharedClock::default();
    let layout = SharedLayout::default();
    let render_loop = RenderLoop::new(
        ScrollSimulator::new(SmoothingConfig::default()),
        TriggerRegistry::new(),
        TimelineEngine::new(),
        Box::new(scene.clone()),
        Box::new(clock.clone()),
        Box::new(layout.clone()),
        RenderLoopConfig {
            camera_scroll_path: Some(PropertyPath::from(CAMERA)),
            viewport: ViewportSize::new(800.0, 600.0),
            ..Default::default()
        },
    );
    Rig {
        scene,
        clock,
        layout,
        render_loop,
    }
}

// ============================================================================
// Tests
// ============================================================================

/// The scene must observe the scroll state computed earlier in the *same*
/// tick — a one-frame lag here shows up as visible jitter between DOM
/// animation and the 3D scene.
#[test]
fn test_render_sees_same_tick_scroll_state() {
    let mut rig = rig();
    rig.render_loop.start();

    rig.render_loop.queue_scroll(500.0);
    for _ in 0..30 {
        rig.render_loop.pump(0.016);
        let rendered = rig.scene.last_rendered_camera().unwrap();
        let current = rig.render_loop.scroll_state().smoothed_position;
        assert_eq!(
            rendered, current,
            "render observed a stale scroll position"
        );
    }
}

/// Full pipeline: input → smoothing → trigger progress → timeline →
/// scene property.
#[test]
fn test_trigger_drives_timeline_end_to_end() {
    let mut rig = rig();
    let element = ElementId(1);
    rig.layout.place(element, 100.0, 200.0);

    let timeline = rig.render_loop.add_timeline(opacity_ramp("hero.opacity"));
    rig.render_loop
        .register_trigger(element, TriggerConfig::new(timeline))
        .unwrap();

    rig.render_loop.start();
    // First tick resolves scroll bounds from layout.
    rig.render_loop.pump(0.016);
    rig.render_loop.jump_to(200.0);
    rig.render_loop.pump(0.016);

    // Scroll sits mid-span, so the track reads its midpoint value.
    let opacity = rig.scene.value("hero.opacity").unwrap();
    assert!((opacity - 0.5).abs() < 1e-4, "opacity {opacity}");

    rig.render_loop.jump_to(400.0);
    rig.render_loop.pump(0.016);
    assert_eq!(rig.scene.value("hero.opacity"), Some(1.0));
}

/// Two triggers deliberately sharing one timeline: both are evaluated
/// every frame, in registration order, so the last-registered trigger
/// wins on overlapping writes.
#[test]
fn test_shared_timeline_last_registered_wins() {
    let mut rig = rig();
    let first_element = ElementId(1);
    let second_element = ElementId(2);
    // Overlapping spans with different geometry, so the two triggers
    // compute different progress for the same scroll position.
    rig.layout.place(first_element, 0.0, 400.0);
    rig.layout.place(second_element, 0.0, 800.0);

    let shared = rig.render_loop.add_timeline(opacity_ramp("hero.opacity"));
    rig.render_loop
        .register_trigger(first_element, TriggerConfig::new(shared))
        .unwrap();
    rig.render_loop
        .register_trigger(second_element, TriggerConfig::new(shared))
        .unwrap();

    rig.render_loop.start();
    rig.render_loop.pump(0.016);
    rig.render_loop.jump_to(200.0);
    rig.render_loop.pump(0.016);

    // First trigger: 200/400 = 0.5. Second trigger: 200/800 = 0.25.
    // Registration order means the second write lands last.
    let opacity = rig.scene.value("hero.opacity").unwrap();
    assert!((opacity - 0.25).abs() < 1e-4, "opacity {opacity}");
}

/// A pinned trigger freezes the scroll-driven camera write for the span
/// it covers, while trigger progress keeps advancing.
#[test]
fn test_pin_freezes_camera_write_within_span() {
    let mut rig = rig();
    let element = ElementId(1);
    rig.layout.place(element, 100.0, 200.0);

    let timeline = rig.render_loop.add_timeline(opacity_ramp("hero.opacity"));
    rig.render_loop
        .register_trigger(element, TriggerConfig::new(timeline).pinned())
        .unwrap();

    rig.render_loop.start();
    rig.render_loop.pump(0.016);

    rig.render_loop.jump_to(150.0);
    rig.render_loop.pump(0.016);
    assert!(rig.render_loop.is_pin_active());
    assert_eq!(rig.scene.value(CAMERA), Some(150.0));

    // Scroll moves deeper into the span: camera stays frozen at the
    // pin-entry value, the timeline keeps advancing.
    rig.render_loop.jump_to(250.0);
    rig.render_loop.pump(0.016);
    assert_eq!(rig.scene.value(CAMERA), Some(150.0));
    let opacity = rig.scene.value("hero.opacity").unwrap();
    assert!((opacity - 0.75).abs() < 1e-4);

    // Leaving the span releases the pin.
    rig.render_loop.jump_to(400.0);
    rig.render_loop.pump(0.016);
    assert!(!rig.render_loop.is_pin_active());
    assert_eq!(rig.scene.value(CAMERA), Some(400.0));
}

/// Destroy, then a late frame signal: nothing runs, nothing renders, and
/// the clock subscription was released exactly once.
#[test]
fn test_destroyed_loop_ignores_frame_signals() {
    let mut rig = rig();
    let element = ElementId(1);
    rig.layout.place(element, 100.0, 200.0);
    let timeline = rig.render_loop.add_timeline(opacity_ramp("hero.opacity"));
    rig.render_loop
        .register_trigger(element, TriggerConfig::new(timeline))
        .unwrap();

    rig.render_loop.start();
    rig.render_loop.pump(0.016);
    let writes_before = rig.scene.writes();
    let renders_before = rig.scene.render_count();
    let scroll_before = *rig.render_loop.scroll_state();

    rig.render_loop.destroy();
    rig.render_loop.queue_scroll(500.0);
    rig.render_loop.pump(0.016);
    rig.render_loop.pump(0.016);

    assert_eq!(rig.scene.writes(), writes_before);
    assert_eq!(rig.scene.render_count(), renders_before);
    assert_eq!(*rig.render_loop.scroll_state(), scroll_before);
    assert_eq!(rig.clock.0.lock().unwrap().cancels, 1);
}

/// Pause stops mutation; resume picks up where it left off with a fresh
/// frame request.
#[test]
fn test_pause_and_resume_round_trip() {
    let mut rig = rig();
    rig.render_loop.start();
    rig.render_loop.queue_scroll(300.0);
    rig.render_loop.pump(0.016);
    let paused_position = rig.render_loop.scroll_state().smoothed_position;

    rig.render_loop.pause();
    rig.render_loop.pump(0.016);
    assert_eq!(
        rig.render_loop.scroll_state().smoothed_position,
        paused_position
    );

    rig.render_loop.start();
    for _ in 0..120 {
        rig.render_loop.pump(0.016);
    }
    // The queued raw position is eventually reached after resume.
    assert!((rig.render_loop.scroll_state().smoothed_position - 300.0).abs() < 0.5);

    let spy = rig.clock.0.lock().unwrap();
    assert_eq!(spy.requests, 2);
    assert_eq!(spy.cancels, 1);
}

/// Content mutation signals are deferred to the next tick boundary, then
/// trigger geometry and progress follow the new measurements.
#[test]
fn test_content_mutation_refreshes_geometry_next_tick() {
    let mut rig = rig();
    let element = ElementId(1);
    rig.layout.place(element, 100.0, 200.0);

    let timeline = rig.render_loop.add_timeline(opacity_ramp("hero.opacity"));
    let trigger = rig
        .render_loop
        .register_trigger(element, TriggerConfig::new(timeline))
        .unwrap();

    rig.render_loop.start();
    rig.render_loop.pump(0.016);
    rig.render_loop.jump_to(300.0);
    rig.render_loop.pump(0.016);
    assert_eq!(rig.scene.value("hero.opacity"), Some(1.0));

    // The element doubles in height. Until the next tick the old span
    // stands.
    rig.layout.place(element, 100.0, 400.0);
    assert_eq!(rig.render_loop.registry().span(trigger), Some((100.0, 300.0)));

    rig.render_loop.notify_content_mutated();
    rig.render_loop.pump(0.016);
    assert_eq!(rig.render_loop.registry().span(trigger), Some((100.0, 500.0)));
    let opacity = rig.scene.value("hero.opacity").unwrap();
    assert!((opacity - 0.5).abs() < 1e-4, "opacity {opacity}");
}

/// Free-running timelines play on the loop's clamped clock alongside
/// scroll-driven ones.
#[test]
fn test_timed_timeline_plays_on_loop_clock() {
    let mut rig = rig();
    rig.render_loop
        .add_timed_timeline(opacity_ramp("fog.density"), 1.0, RepeatMode::Once);

    rig.render_loop.start();
    for _ in 0..25 {
        rig.render_loop.pump(0.02);
    }
    let density = rig.scene.value("fog.density").unwrap();
    assert!((density - 0.5).abs() < 1e-4, "density {density}");

    for _ in 0..30 {
        rig.render_loop.pump(0.02);
    }
    assert_eq!(rig.scene.value("fog.density"), Some(1.0));
}
