//! Monotonic easing curves applied to a segment's local progress.

use serde::{Deserialize, Serialize};

/// Easing attached to a keyframe; shapes progress towards the next entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// CSS-style timing curve with control points (x1, y1) and (x2, y2).
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Easing {
    /// True when `apply` is the identity map.
    #[inline]
    pub fn is_identity(&self) -> bool {
        match *self {
            Easing::Linear => true,
            Easing::CubicBezier { x1, y1, x2, y2 } => {
                x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0
            }
            _ => false,
        }
    }

    /// Map progress in [0,1] to eased progress in [0,1].
    /// Endpoints are preserved exactly.
    pub fn apply(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => t * t * (3.0 - 2.0 * t),
            Easing::CubicBezier { x1, y1, x2, y2 } => bezier_ease(t, x1, y1, x2, y2),
        }
    }
}

#[inline]
fn cubic_bezier(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Invert the x polynomial by bisection, then evaluate y.
fn bezier_ease(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    // x must stay monotonic for the inversion to be unique
    let x1 = x1.clamp(0.0, 1.0);
    let x2 = x2.clamp(0.0, 1.0);
    let mut lo = 0.0f64;
    let mut hi = 1.0f64;
    let mut mid = t;
    for _ in 0..48 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-12 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}
