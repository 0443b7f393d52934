//! Layer transform and procedural wiggle parameters.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::{Animatable, Keys, Mix, Point};

/// 2D affine transform split into blendable parts. Rotation is in radians and
/// is blended as a plain scalar, so multi-turn keys spin the long way.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Point,
    pub anchor: Point,
    pub rotation: f64,
    pub scale: Point,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Point::ZERO,
        anchor: Point::ZERO,
        rotation: 0.0,
        scale: Point::new(1.0, 1.0),
    };

    pub fn from_translation(x: f64, y: f64) -> Self {
        Self {
            translation: Point::new(x, y),
            ..Self::IDENTITY
        }
    }

    /// Map a point from layer space to parent space.
    pub fn apply(&self, point: Point) -> Point {
        let local = point - self.anchor;
        let scaled = Point::new(local.x * self.scale.x, local.y * self.scale.y);
        let (sin, cos) = self.rotation.sin_cos();
        let rotated = Point::new(
            scaled.x * cos - scaled.y * sin,
            scaled.x * sin + scaled.y * cos,
        );
        rotated + self.anchor + self.translation
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Animatable for Transform {
    fn mix(mix: Mix<'_>, keys: Keys<'_, Self>) -> Self {
        Transform {
            translation: Point {
                x: mix.component(&keys, |t| t.translation.x),
                y: mix.component(&keys, |t| t.translation.y),
            },
            anchor: Point {
                x: mix.component(&keys, |t| t.anchor.x),
                y: mix.component(&keys, |t| t.anchor.y),
            },
            rotation: mix.component(&keys, |t| t.rotation),
            scale: Point {
                x: mix.component(&keys, |t| t.scale.x),
                y: mix.component(&keys, |t| t.scale.y),
            },
        }
    }
}

/// Parameters of a periodic jitter applied on top of a layer's transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wiggle {
    /// Peak displacement per axis.
    pub amplitude: Point,
    /// Oscillations per second.
    pub frequency: f64,
    /// Phase offset in turns.
    pub phase: f64,
    /// Decorrelates the x and y oscillators; switches, never blends.
    pub seed: u64,
}

impl Wiggle {
    pub const NONE: Wiggle = Wiggle {
        amplitude: Point::ZERO,
        frequency: 0.0,
        phase: 0.0,
        seed: 0,
    };

    /// Displacement at `seconds` into the timeline.
    pub fn offset_at(&self, seconds: f64) -> Point {
        let turns = self.frequency * seconds + self.phase;
        // Derive a stable y-axis phase shift from the seed.
        let shift = (self.seed % 1024) as f64 / 1024.0;
        Point::new(
            self.amplitude.x * (TAU * turns).sin(),
            self.amplitude.y * (TAU * (turns + shift)).cos(),
        )
    }
}

impl Default for Wiggle {
    fn default() -> Self {
        Self::NONE
    }
}

impl Animatable for Wiggle {
    fn mix(mix: Mix<'_>, keys: Keys<'_, Self>) -> Self {
        Wiggle {
            amplitude: Point {
                x: mix.component(&keys, |w| w.amplitude.x),
                y: mix.component(&keys, |w| w.amplitude.y),
            },
            frequency: mix.component(&keys, |w| w.frequency),
            phase: mix.component(&keys, |w| w.phase),
            seed: *mix.pick(&keys.f1.seed, &keys.f2.seed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn rotated(x: f64, deg: f64) -> Transform {
        Transform {
            translation: Point::new(x, 2.0 * x),
            anchor: Point::new(5.0, 5.0),
            rotation: deg.to_radians(),
            scale: Point::new(1.0 + x, 1.0),
        }
    }

    #[test]
    fn transform_linear_endpoints() {
        let a = rotated(0.3, 10.0);
        let b = rotated(1.7, 95.0);
        assert_eq!(Transform::linear(&a, &b, 0.0), a);
        assert_eq!(Transform::linear(&a, &b, 1.0), b);
    }

    #[test]
    fn transform_monospline_straight_line() {
        let keys: Vec<Transform> = (0..4).map(|i| rotated(i as f64, 30.0 * i as f64)).collect();
        let t = 0.6;
        let got = Transform::monospline(&keys[0], &keys[1], &keys[2], &keys[3], &even_interior(t));
        let want = Transform::linear(&keys[1], &keys[2], t);
        assert!(got.translation.distance(&want.translation) < 1e-12);
        assert!((got.rotation - want.rotation).abs() < 1e-12);
        assert!(got.scale.distance(&want.scale) < 1e-12);
    }

    #[test]
    fn transform_apply_rotates_about_anchor() {
        let t = Transform {
            rotation: std::f64::consts::FRAC_PI_2,
            anchor: Point::new(1.0, 0.0),
            ..Transform::IDENTITY
        };
        let p = t.apply(Point::new(2.0, 0.0));
        assert!(p.distance(&Point::new(1.0, 1.0)) < 1e-12);
        assert_eq!(Transform::from_translation(3.0, 4.0).apply(Point::ZERO), Point::new(3.0, 4.0));
    }

    #[test]
    fn wiggle_seed_switches_at_segment_end() {
        let a = Wiggle {
            amplitude: Point::new(1.0, 1.0),
            frequency: 2.0,
            phase: 0.0,
            seed: 7,
        };
        let b = Wiggle {
            amplitude: Point::new(3.0, 5.0),
            frequency: 4.0,
            phase: 0.5,
            seed: 99,
        };
        assert_eq!(Wiggle::linear(&a, &b, 0.0), a);
        assert_eq!(Wiggle::linear(&a, &b, 1.0), b);
        let mid = Wiggle::linear(&a, &b, 0.5);
        assert_eq!(mid.seed, 7);
        assert_eq!(mid.frequency, 3.0);
    }

    #[test]
    fn wiggle_offset_is_periodic() {
        let w = Wiggle {
            amplitude: Point::new(2.0, 2.0),
            frequency: 1.0,
            phase: 0.0,
            seed: 0,
        };
        assert!(w.offset_at(0.25).distance(&Point::new(2.0, 0.0)) < 1e-12);
        assert!(w.offset_at(1.25).distance(&w.offset_at(0.25)) < 1e-9);
        assert_eq!(Wiggle::NONE.offset_at(3.0), Point::ZERO);
    }
}
