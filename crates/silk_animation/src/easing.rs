//! Easing functions
//!
//! Pure mappings from linear progress in [0, 1] to perceptual progress.
//! The engine ships a fixed registry of named curves; anything else goes
//! through [`Easing::CubicBezier`] or [`Easing::Custom`].

use std::f32::consts::TAU;

/// Easing curve selector.
#[derive(Clone, Copy, Debug, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    /// Overshooting spring-like settle, eases out.
    EaseOutElastic,
    /// CSS-style cubic bezier with control points (x1, y1, x2, y2).
    CubicBezier(f32, f32, f32, f32),
    /// Arbitrary user curve. Must map 0 to 0 and 1 to 1 for seamless
    /// keyframe boundaries; the engine does not enforce this.
    Custom(fn(f32) -> f32),
}

impl Easing {
    /// Look up a named curve from the fixed registry.
    ///
    /// Recognized names: `linear`, `ease-in`, `ease-out`, `ease-in-out`
    /// (cubic aliases), the explicit `ease-{in,out,in-out}-{quad,cubic,quart}`
    /// forms, and `elastic-out`.
    pub fn by_name(name: &str) -> Option<Self> {
        let easing = match name {
            "linear" => Easing::Linear,
            "ease-in" | "ease-in-cubic" => Easing::EaseInCubic,
            "ease-out" | "ease-out-cubic" => Easing::EaseOutCubic,
            "ease-in-out" | "ease-in-out-cubic" => Easing::EaseInOutCubic,
            "ease-in-quad" => Easing::EaseInQuad,
            "ease-out-quad" => Easing::EaseOutQuad,
            "ease-in-out-quad" => Easing::EaseInOutQuad,
            "ease-in-quart" => Easing::EaseInQuart,
            "ease-out-quart" => Easing::EaseOutQuart,
            "ease-in-out-quart" => Easing::EaseInOutQuart,
            "elastic-out" => Easing::EaseOutElastic,
            _ => return None,
        };
        Some(easing)
    }

    /// Apply the curve to a progress value in [0, 1].
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => ease_in_pow(t, 2),
            Easing::EaseOutQuad => ease_out_pow(t, 2),
            Easing::EaseInOutQuad => ease_in_out_pow(t, 2),
            Easing::EaseInCubic => ease_in_pow(t, 3),
            Easing::EaseOutCubic => ease_out_pow(t, 3),
            Easing::EaseInOutCubic => ease_in_out_pow(t, 3),
            Easing::EaseInQuart => ease_in_pow(t, 4),
            Easing::EaseOutQuart => ease_out_pow(t, 4),
            Easing::EaseInOutQuart => ease_in_out_pow(t, 4),
            Easing::EaseOutElastic => ease_out_elastic(t),
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
            Easing::Custom(f) => f(t),
        }
    }
}

#[inline]
fn ease_in_pow(t: f32, n: i32) -> f32 {
    t.powi(n)
}

#[inline]
fn ease_out_pow(t: f32, n: i32) -> f32 {
    1.0 - (1.0 - t).powi(n)
}

#[inline]
fn ease_in_out_pow(t: f32, n: i32) -> f32 {
    if t < 0.5 {
        0.5 * (2.0 * t).powi(n)
    } else {
        1.0 - 0.5 * (2.0 - 2.0 * t).powi(n)
    }
}

fn ease_out_elastic(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let period = 0.3;
    2.0_f32.powf(-10.0 * t) * ((t - period / 4.0) * TAU / period).sin() + 1.0
}

/// Cubic bezier easing matching the CSS timing-function model.
///
/// Solves x(p) = t with Newton iterations, falling back to bisection when
/// the local slope is too flat. Internal math in f64 so repeated per-frame
/// evaluation stays jitter-free.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let target = t as f64;
    let (x1, y1, x2, y2) = (x1 as f64, y1 as f64, x2 as f64, y2 as f64);

    let mut p = target;
    for _ in 0..8 {
        let err = bezier_axis(p, x1, x2) - target;
        if err.abs() < 1e-7 {
            return bezier_axis(p, y1, y2) as f32;
        }
        let slope = bezier_axis_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = target;
    for _ in 0..24 {
        let x = bezier_axis(p, x1, x2);
        if (x - target).abs() < 1e-7 {
            break;
        }
        if x < target {
            lo = p;
        } else {
            hi = p;
        }
        p = 0.5 * (lo + hi);
    }

    bezier_axis(p, y1, y2) as f32
}

/// One axis of the cubic bezier with implicit endpoints 0 and 1, in Horner
/// form.
#[inline]
fn bezier_axis(p: f64, c1: f64, c2: f64) -> f64 {
    let a = 1.0 + 3.0 * (c1 - c2);
    let b = 3.0 * (c2 - 2.0 * c1);
    let c = 3.0 * c1;
    ((a * p + b) * p + c) * p
}

#[inline]
fn bezier_axis_slope(p: f64, c1: f64, c2: f64) -> f64 {
    let a = 1.0 + 3.0 * (c1 - c2);
    let b = 3.0 * (c2 - 2.0 * c1);
    let c = 3.0 * c1;
    (3.0 * a * p + 2.0 * b) * p + c
}
