//! Scroll simulator
//!
//! Converts raw wheel/touch/keyboard deltas into a smoothed,
//! inertia-damped scroll position. Smoothing is a first-order exponential
//! decay toward the raw position:
//!
//! ```text
//! alpha    = 1 - exp(-rate * dt)
//! smoothed = smoothed + (raw - smoothed) * alpha
//! ```
//!
//! Because `alpha` is derived from `dt`, the filter is frame-rate
//! independent: any dt schedule covering the same elapsed time converges
//! to the same position for the same input. dt is clamped before use so a
//! backgrounded tab delivering one enormous gap cannot destabilize the
//! filter.

/// The authoritative scroll signal for one frame.
///
/// Owned and mutated exclusively by [`ScrollSimulator`]; every other
/// component reads it within the same tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollState {
    /// Accumulated raw input position, clamped to bounds.
    pub raw_position: f32,
    /// Low-pass filtered position, clamped to bounds. This is the value
    /// triggers and the scene consume.
    pub smoothed_position: f32,
    /// Per-frame smoothed delta divided by dt, in pixels per second.
    /// Decays toward zero once input goes idle.
    pub velocity: f32,
    /// Inclusive scrollable range (min, max).
    pub bounds: (f32, f32),
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            raw_position: 0.0,
            smoothed_position: 0.0,
            velocity: 0.0,
            bounds: (0.0, 0.0),
        }
    }
}

/// Smoothing parameters.
#[derive(Clone, Copy, Debug)]
pub struct SmoothingConfig {
    /// Decay rate in 1/seconds. Higher tracks the raw position faster.
    pub rate: f32,
    /// Upper clamp for dt in seconds, protecting against large host gaps.
    pub max_frame_dt: f32,
    /// Position distance below which the simulator reports settled.
    pub settle_epsilon: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            rate: 8.0,
            max_frame_dt: 0.1,
            settle_epsilon: 0.05,
        }
    }
}

impl SmoothingConfig {
    /// Tight tracking with little perceptible lag.
    pub fn snappy() -> Self {
        Self {
            rate: 14.0,
            ..Default::default()
        }
    }

    /// Loose, floaty tracking for slow cinematic pages.
    pub fn floaty() -> Self {
        Self {
            rate: 4.0,
            ..Default::default()
        }
    }
}

/// Physics-smoothed scroll position simulator.
#[derive(Clone, Debug, Default)]
pub struct ScrollSimulator {
    state: ScrollState,
    config: SmoothingConfig,
}

impl ScrollSimulator {
    pub fn new(config: SmoothingConfig) -> Self {
        Self {
            state: ScrollState::default(),
            config,
        }
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    /// Feed one frame of input and advance the filter by `dt` seconds.
    ///
    /// Out-of-range raw input is clamped, never rejected. A non-positive
    /// dt leaves the state untouched.
    pub fn update(&mut self, raw_delta: f32, dt: f32) -> &ScrollState {
        let dt = dt.min(self.config.max_frame_dt);
        if dt <= 0.0 {
            return &self.state;
        }

        let (min, max) = self.state.bounds;
        self.state.raw_position = (self.state.raw_position + raw_delta).clamp(min, max);

        let alpha = 1.0 - (-self.config.rate * dt).exp();
        let previous = self.state.smoothed_position;
        let smoothed = previous + (self.state.raw_position - previous) * alpha;
        self.state.smoothed_position = smoothed.clamp(min, max);
        self.state.velocity = (self.state.smoothed_position - previous) / dt;

        if self.is_settled() && raw_delta == 0.0 {
            tracing::trace!(
                position = self.state.smoothed_position,
                "scroll simulator settled"
            );
        }

        &self.state
    }

    /// Replace the scrollable range, re-clamping both positions. Called
    /// when content height changes on resize.
    pub fn set_bounds(&mut self, min: f32, max: f32) {
        let (min, max) = if max < min { (max, min) } else { (min, max) };
        self.state.bounds = (min, max);
        self.state.raw_position = self.state.raw_position.clamp(min, max);
        self.state.smoothed_position = self.state.smoothed_position.clamp(min, max);
    }

    /// Zero the velocity instantly, leaving positions untouched.
    pub fn stop(&mut self) {
        self.state.velocity = 0.0;
    }

    /// Programmatic jump: snap raw and smoothed to a clamped target with
    /// zero velocity, so the next frame starts from rest at the target.
    pub fn jump_to(&mut self, position: f32) {
        let (min, max) = self.state.bounds;
        let position = position.clamp(min, max);
        self.state.raw_position = position;
        self.state.smoothed_position = position;
        self.stop();
    }

    /// True once the smoothed position has converged onto the raw position.
    pub fn is_settled(&self) -> bool {
        (self.state.raw_position - self.state.smoothed_position).abs()
            < self.config.settle_epsilon
    }
}
