//! Tangent parameterization shared by every monospline blend.
//!
//! A `TangentParameter` is built once per evaluation from the playback times
//! of up to four loop entries and the query position between the middle two.
//! Animatable kinds feed it one scalar component at a time; the slopes are
//! the three-point (quadratic) derivatives, limited Fritsch-Carlson style so a
//! segment never overshoots its neighbours.

use serde::{Deserialize, Serialize};

/// Abscissa gaps at or below this are treated as coincident.
pub const DEFAULT_COINCIDENT_EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TangentParameter {
    x0: Option<f64>,
    x1: f64,
    x2: f64,
    x3: Option<f64>,
    /// Query abscissa.
    x: f64,
    /// Eased progress between x1 and x2.
    t: f64,
    /// Position used for the Hermite basis, in [0, 1].
    s: f64,
    epsilon: f64,
}

impl TangentParameter {
    /// Four-point parameter for an interior segment.
    pub fn interior(x0: f64, x1: f64, x2: f64, x3: f64, x: f64, t: f64) -> Self {
        Self::new(Some(x0), x1, x2, Some(x3), x, t)
    }

    /// Segment with no usable left neighbour.
    pub fn first(x1: f64, x2: f64, x3: f64, x: f64, t: f64) -> Self {
        Self::new(None, x1, x2, Some(x3), x, t)
    }

    /// Segment with no usable right neighbour.
    pub fn end(x0: f64, x1: f64, x2: f64, x: f64, t: f64) -> Self {
        Self::new(Some(x0), x1, x2, None, x, t)
    }

    pub fn new(x0: Option<f64>, x1: f64, x2: f64, x3: Option<f64>, x: f64, t: f64) -> Self {
        let mut param = Self {
            x0,
            x1,
            x2,
            x3,
            x,
            t,
            s: 0.0,
            epsilon: DEFAULT_COINCIDENT_EPSILON,
        };
        param.s = param.compute_s();
        param
    }

    /// Override the coincidence threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = if epsilon.is_finite() && epsilon >= 0.0 {
            epsilon
        } else {
            DEFAULT_COINCIDENT_EPSILON
        };
        self.s = self.compute_s();
        self
    }

    fn compute_s(&self) -> f64 {
        let t = if self.t.is_finite() {
            self.t.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if t == 0.0 || t == 1.0 {
            return t;
        }
        let h = self.x2 - self.x1;
        if h > self.epsilon && self.x.is_finite() {
            ((self.x - self.x1) / h).clamp(0.0, 1.0)
        } else {
            t
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn t(&self) -> f64 {
        self.t
    }

    /// Hermite position in [0, 1].
    #[inline]
    pub fn s(&self) -> f64 {
        self.s
    }

    /// Hermite basis `[h00, h10, h01, h11]` at `s`.
    pub fn basis(&self) -> [f64; 4] {
        let s = self.s;
        let s2 = s * s;
        let s3 = s2 * s;
        [
            2.0 * s3 - 3.0 * s2 + 1.0,
            s3 - 2.0 * s2 + s,
            -2.0 * s3 + 3.0 * s2,
            s3 - s2,
        ]
    }

    fn left_interval(&self) -> Option<f64> {
        self.x0
            .map(|x0| self.x1 - x0)
            .filter(|h| *h > self.epsilon)
    }

    fn right_interval(&self) -> Option<f64> {
        self.x3
            .map(|x3| x3 - self.x2)
            .filter(|h| *h > self.epsilon)
    }

    /// Interior blend of one component.
    #[inline]
    pub fn interpolate(&self, f0: f64, f1: f64, f2: f64, f3: f64) -> f64 {
        self.evaluate(Some(f0), f1, f2, Some(f3))
    }

    /// Blend of one component without a left neighbour.
    #[inline]
    pub fn interpolate_first(&self, f1: f64, f2: f64, f3: f64) -> f64 {
        self.evaluate(None, f1, f2, Some(f3))
    }

    /// Blend of one component without a right neighbour.
    #[inline]
    pub fn interpolate_end(&self, f0: f64, f1: f64, f2: f64) -> f64 {
        self.evaluate(Some(f0), f1, f2, None)
    }

    fn evaluate(&self, f0: Option<f64>, f1: f64, f2: f64, f3: Option<f64>) -> f64 {
        let s = self.s;
        if s == 0.0 {
            return f1;
        }
        if s == 1.0 {
            return f2;
        }
        let h = self.x2 - self.x1;
        if h <= self.epsilon {
            return f1 * (1.0 - s) + f2 * s;
        }

        let d12 = (f2 - f1) / h;
        let left = f0.zip(self.left_interval()).map(|(f0, h0)| ((f1 - f0) / h0, h0));
        let right = f3.zip(self.right_interval()).map(|(f3, h2)| ((f3 - f2) / h2, h2));

        let m1 = match (left, right) {
            (Some((d01, h0)), _) => interior_slope(d01, d12, h0, h),
            (None, Some((d23, h2))) => end_slope(d12, d23, h, h2),
            (None, None) => d12,
        };
        let m2 = match (left, right) {
            (_, Some((d23, h2))) => interior_slope(d12, d23, h, h2),
            (Some((d01, h0)), None) => end_slope(d12, d01, h, h0),
            (None, None) => d12,
        };

        let [h00, h10, h01, h11] = self.basis();
        h00 * f1 + h10 * h * m1 + h01 * f2 + h11 * h * m2
    }
}

/// Slope at the point shared by two intervals. Zero at local extrema,
/// capped at three times the smaller secant.
fn interior_slope(d_left: f64, d_right: f64, h_left: f64, h_right: f64) -> f64 {
    if d_left * d_right <= 0.0 {
        return 0.0;
    }
    let m = (h_right * d_left + h_left * d_right) / (h_left + h_right);
    let cap = 3.0 * d_left.abs().min(d_right.abs());
    m.clamp(-cap, cap)
}

/// One-sided slope at a segment end with only one further neighbour.
fn end_slope(d_near: f64, d_far: f64, h_near: f64, h_far: f64) -> f64 {
    let m = ((2.0 * h_near + h_far) * d_near - h_near * d_far) / (h_near + h_far);
    if m * d_near <= 0.0 {
        0.0
    } else if d_near * d_far < 0.0 && m.abs() > 3.0 * d_near.abs() {
        3.0 * d_near
    } else {
        m
    }
}
