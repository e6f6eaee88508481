//! Easing curves for time-based transitions.

use serde::{Deserialize, Serialize};

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 24;
const SOLVE_EPSILON: f32 = 1e-6;

/// Maps normalized time in `[0, 1]` to normalized progress.
///
/// The named curves match the CSS keywords of the same name.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// Arbitrary CSS cubic-bezier with control points `(x1, y1)` and
    /// `(x2, y2)`; `x1` and `x2` are clamped to `[0, 1]`.
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Applies the curve to `t`, clamped to `[0, 1]`.
    ///
    /// Both end points are exact for every curve.
    ///
    /// ```
    /// use vitrine_components::easing::Easing;
    ///
    /// assert_eq!(Easing::EaseInOut.apply(0.0), 0.0);
    /// assert_eq!(Easing::EaseInOut.apply(1.0), 1.0);
    /// assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-4);
    /// ```
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self {
            Self::Linear => t,
            Self::EaseIn => cubic_bezier(t, 0.42, 0.0, 1.0, 1.0),
            Self::EaseOut => cubic_bezier(t, 0.0, 0.0, 0.58, 1.0),
            Self::EaseInOut => cubic_bezier(t, 0.42, 0.0, 0.58, 1.0),
            Self::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, x1, y1, x2, y2),
        }
    }
}

/// Evaluates a CSS cubic-bezier with end points `(0,0)` and `(1,1)` at time
/// `u`.
fn cubic_bezier(u: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let x1 = x1.clamp(0.0, 1.0);
    let x2 = x2.clamp(0.0, 1.0);

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let t = solve_t_for_x(u, ax, bx, cx);
    sample_curve(ay, by, cy, t)
}

#[inline]
fn sample_curve(a: f32, b: f32, c: f32, t: f32) -> f32 {
    ((a * t + b) * t + c) * t
}

fn solve_t_for_x(u: f32, ax: f32, bx: f32, cx: f32) -> f32 {
    let mut t = u;
    for _ in 0..NEWTON_ITERATIONS {
        let x = sample_curve(ax, bx, cx, t) - u;
        if x.abs() < SOLVE_EPSILON {
            return t;
        }
        let dx = (3.0 * ax * t + 2.0 * bx) * t + cx;
        if dx.abs() < SOLVE_EPSILON {
            break;
        }
        t -= x / dx;
        if !(0.0..=1.0).contains(&t) {
            break;
        }
    }

    // x(t) is monotonic for x1, x2 in [0, 1]; bisection always converges.
    let mut lo = 0.0;
    let mut hi = 1.0;
    t = u;
    for _ in 0..BISECTION_ITERATIONS {
        let x = sample_curve(ax, bx, cx, t);
        if (x - u).abs() < SOLVE_EPSILON {
            return t;
        }
        if x < u {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) * 0.5;
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::CubicBezier(0.25, 0.1, 0.25, 1.0),
    ];

    #[test]
    fn end_points_are_exact() {
        for curve in CURVES {
            assert_eq!(curve.apply(0.0), 0.0, "{curve:?}");
            assert_eq!(curve.apply(1.0), 1.0, "{curve:?}");
            assert_eq!(curve.apply(-1.0), 0.0, "{curve:?}");
            assert_eq!(curve.apply(2.0), 1.0, "{curve:?}");
        }
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        for step in 1..10 {
            let t = step as f32 / 10.0;
            let forward = Easing::EaseInOut.apply(t);
            let backward = 1.0 - Easing::EaseInOut.apply(1.0 - t);
            assert!((forward - backward).abs() < 1e-3, "t = {t}");
        }
    }

    #[test]
    fn ease_in_starts_slow_and_ease_out_starts_fast() {
        assert!(Easing::EaseIn.apply(0.25) < 0.25);
        assert!(Easing::EaseOut.apply(0.25) > 0.25);
    }

    #[test]
    fn curves_are_monotonic() {
        for curve in CURVES {
            let mut previous = 0.0;
            for step in 1..=200 {
                let value = curve.apply(step as f32 / 200.0);
                assert!(value + 1e-4 >= previous, "{curve:?} at {step}");
                previous = value;
            }
        }
    }
}
