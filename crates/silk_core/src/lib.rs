//! Silk Core Primitives
//!
//! This crate provides the foundational pieces shared by the Silk
//! scroll-synchronization runtime:
//!
//! - **Host Interfaces**: minimal traits for the frame clock, layout
//!   measurement, and the external 3D scene
//! - **Frame Context**: the per-tick view of time and viewport geometry
//! - **State Transitions**: a lightweight FSM trait used by the render loop
//! - **Errors & Diagnostics**: synchronous construction errors and the
//!   soft-failure channel for in-frame degradations

pub mod diagnostics;
pub mod error;
pub mod frame;
pub mod fsm;
pub mod host;
pub mod id;

pub use diagnostics::{Diagnostic, DiagnosticSink, Diagnostics};
pub use error::SilkError;
pub use frame::{FrameContext, ViewportSize};
pub use fsm::{loop_events, LoopState, StateTransitions};
pub use host::{ElementId, FrameClock, FrameRequest, LayoutProvider, Measure, PropertyPath, SceneAdapter};
pub use id::{TimelineKey, TriggerKey};
