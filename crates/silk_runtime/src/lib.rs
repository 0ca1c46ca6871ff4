//! Silk Runtime
//!
//! Scroll-synchronized animation runtime: one authoritative smoothed
//! scroll signal drives declarative triggers, keyframe timelines, and a
//! 3D scene render inside a single per-frame tick.
//!
//! # Architecture
//!
//! - [`ScrollSimulator`]: raw input deltas → smoothed, inertia-damped
//!   scroll position
//! - [`TriggerRegistry`]: measured element regions → per-trigger progress
//! - [`silk_animation::TimelineEngine`]: progress → interpolated property
//!   writes
//! - [`RenderLoop`]: the per-frame scheduler tying it all together, with a
//!   strict update order so the render always sees this tick's state
//!
//! # Example
//!
//! ```rust,ignore
//! use silk_runtime::prelude::*;
//!
//! let mut engine = TimelineEngine::new();
//! let fade = engine.insert(Timeline::single(
//!     Track::builder("hero.opacity").at(0.0, 0.0).at(1.0, 1.0).build()?,
//! ));
//!
//! let mut page = RenderLoop::new(
//!     ScrollSimulator::new(SmoothingConfig::snappy()),
//!     TriggerRegistry::new(),
//!     engine,
//!     scene,   // Box<dyn SceneAdapter>
//!     clock,   // Box<dyn FrameClock>
//!     layout,  // Box<dyn LayoutProvider>
//!     RenderLoopConfig::default(),
//! );
//! page.register_trigger(hero_element, TriggerConfig::new(fade))?;
//! page.start();
//! // host: page.pump(dt) once per display frame
//! ```

pub mod registry;
pub mod scheduler;
pub mod simulator;

pub use registry::{ProgressUpdate, TriggerConfig, TriggerRegistry};
pub use scheduler::{RenderLoop, RenderLoopConfig};
pub use simulator::{ScrollSimulator, ScrollState, SmoothingConfig};

/// Convenience re-exports for typical embedders.
pub mod prelude {
    pub use crate::registry::{TriggerConfig, TriggerRegistry};
    pub use crate::scheduler::{RenderLoop, RenderLoopConfig};
    pub use crate::simulator::{ScrollSimulator, ScrollState, SmoothingConfig};
    pub use silk_animation::{
        CancelBehavior, Easing, RepeatMode, Timeline, TimelineEngine, Track,
    };
    pub use silk_core::{
        Diagnostic, ElementId, FrameClock, FrameContext, FrameRequest, LayoutProvider,
        LoopState, Measure, PropertyPath, SceneAdapter, SilkError, ViewportSize,
    };
}
