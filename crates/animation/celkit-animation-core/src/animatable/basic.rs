//! Points and colors.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use super::{Animatable, Keys, Mix};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Animatable for Point {
    fn mix(mix: Mix<'_>, keys: Keys<'_, Self>) -> Self {
        Point {
            x: mix.component(&keys, |p| p.x),
            y: mix.component(&keys, |p| p.y),
        }
    }
}

/// RGBA color, components nominally in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with every component clamped into [0, 1].
    pub fn clamped(&self) -> Color {
        Color::rgba(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Animatable for Color {
    fn mix(mix: Mix<'_>, keys: Keys<'_, Self>) -> Self {
        Color {
            r: mix.component(&keys, |c| c.r),
            g: mix.component(&keys, |c| c.g),
            b: mix.component(&keys, |c| c.b),
            a: mix.component(&keys, |c| c.a),
        }
    }
}
