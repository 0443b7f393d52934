//! Animatable value kinds.
//!
//! Every kind blends through one entry point, [`Animatable::mix`], which sees
//! the neighbouring keys and a [`Mix`] describing the blend. The four public
//! blends (`linear`, `first_monospline`, `monospline`, `end_monospline`) are
//! provided on top of it and short-circuit when the two central keys share a
//! [`StableId`].

pub mod basic;
pub mod geometry;
pub mod material;
pub mod text;
pub mod transform;

pub use basic::{Color, Point};
pub use geometry::{Drawing, Geometry, Line, Stroke};
pub use material::Material;
pub use text::Text;
pub use transform::{Transform, Wiggle};

use std::fmt::Debug;

use crate::ids::{same_identity, StableId};
use crate::resolver::Blend;
use crate::tangent::TangentParameter;

/// Blend being applied to a set of keys.
#[derive(Clone, Copy, Debug)]
pub enum Mix<'a> {
    Linear(f64),
    First(&'a TangentParameter),
    Interior(&'a TangentParameter),
    End(&'a TangentParameter),
}

impl<'a> Mix<'a> {
    /// Progress across the central pair in [0, 1].
    #[inline]
    pub fn progress(&self) -> f64 {
        match self {
            Mix::Linear(t) => *t,
            Mix::First(p) | Mix::Interior(p) | Mix::End(p) => p.s(),
        }
    }

    /// Blend one scalar component. Missing outer neighbours fall back to the
    /// nearest central key.
    pub fn scalar(&self, f0: Option<f64>, f1: f64, f2: f64, f3: Option<f64>) -> f64 {
        match self {
            Mix::Linear(t) => lerp(f1, f2, *t),
            Mix::First(p) => p.interpolate_first(f1, f2, f3.unwrap_or(f2)),
            Mix::Interior(p) => p.interpolate(f0.unwrap_or(f1), f1, f2, f3.unwrap_or(f2)),
            Mix::End(p) => p.interpolate_end(f0.unwrap_or(f1), f1, f2),
        }
    }

    /// Blend the component selected by `field` across `keys`.
    #[inline]
    pub fn component<T>(&self, keys: &Keys<'_, T>, field: impl Fn(&T) -> f64) -> f64 {
        self.scalar(
            keys.f0.map(&field),
            field(keys.f1),
            field(keys.f2),
            keys.f3.map(&field),
        )
    }

    /// Discrete fields switch to the right key only once the segment completes.
    #[inline]
    pub fn pick<'v, V: ?Sized>(&self, left: &'v V, right: &'v V) -> &'v V {
        if self.progress() >= 1.0 {
            right
        } else {
            left
        }
    }
}

/// `a` at `t == 0`, `b` at `t == 1`, exactly.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Keys around the segment being blended; `f1 -> f2` is the central pair.
#[derive(Debug)]
pub struct Keys<'k, T> {
    pub f0: Option<&'k T>,
    pub f1: &'k T,
    pub f2: &'k T,
    pub f3: Option<&'k T>,
}

impl<'k, T> Clone for Keys<'k, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'k, T> Copy for Keys<'k, T> {}

impl<'k, T> Keys<'k, T> {
    /// Project every key through `f`; keys where `f` yields nothing drop out
    /// as outer neighbours.
    pub fn project<U>(&self, f: impl Fn(&'k T) -> Option<&'k U>) -> Option<Keys<'k, U>> {
        Some(Keys {
            f0: self.f0.and_then(&f),
            f1: f(self.f1)?,
            f2: f(self.f2)?,
            f3: self.f3.and_then(&f),
        })
    }
}

/// A value that can be keyed on a track and blended between keyframes.
pub trait Animatable: Clone + Debug + Send + Sync + 'static {
    /// Blend the central pair of `keys` as described by `mix`.
    fn mix(mix: Mix<'_>, keys: Keys<'_, Self>) -> Self;

    /// Identity that lets blending skip field math entirely.
    fn stable_id(&self) -> Option<StableId> {
        None
    }

    /// Exact key value, no blending.
    fn step(&self) -> Self {
        self.clone()
    }

    fn linear(f0: &Self, f1: &Self, t: f64) -> Self {
        mix_or_identity(
            Mix::Linear(t),
            Keys {
                f0: None,
                f1: f0,
                f2: f1,
                f3: None,
            },
        )
    }

    fn first_monospline(f1: &Self, f2: &Self, f3: &Self, tangent: &TangentParameter) -> Self {
        mix_or_identity(
            Mix::First(tangent),
            Keys {
                f0: None,
                f1,
                f2,
                f3: Some(f3),
            },
        )
    }

    fn monospline(
        f0: &Self,
        f1: &Self,
        f2: &Self,
        f3: &Self,
        tangent: &TangentParameter,
    ) -> Self {
        mix_or_identity(
            Mix::Interior(tangent),
            Keys {
                f0: Some(f0),
                f1,
                f2,
                f3: Some(f3),
            },
        )
    }

    fn end_monospline(f0: &Self, f1: &Self, f2: &Self, tangent: &TangentParameter) -> Self {
        mix_or_identity(
            Mix::End(tangent),
            Keys {
                f0: Some(f0),
                f1,
                f2,
                f3: None,
            },
        )
    }
}

fn mix_or_identity<T: Animatable>(mix: Mix<'_>, keys: Keys<'_, T>) -> T {
    if same_identity(keys.f1.stable_id(), keys.f2.stable_id()) {
        return keys.f1.clone();
    }
    T::mix(mix, keys)
}

/// Evaluate `blend` over a channel's keys. `None` if an index is missing.
pub fn blend_keys<T: Animatable>(keys: &[T], blend: &Blend) -> Option<T> {
    match blend {
        Blend::Step { key } => keys.get(*key).map(Animatable::step),
        Blend::Linear { from, to, t } => Some(T::linear(keys.get(*from)?, keys.get(*to)?, *t)),
        Blend::FirstMonospline { keys: [a, b, c], tangent } => Some(T::first_monospline(
            keys.get(*a)?,
            keys.get(*b)?,
            keys.get(*c)?,
            tangent,
        )),
        Blend::Monospline {
            keys: [a, b, c, d],
            tangent,
        } => Some(T::monospline(
            keys.get(*a)?,
            keys.get(*b)?,
            keys.get(*c)?,
            keys.get(*d)?,
            tangent,
        )),
        Blend::EndMonospline { keys: [a, b, c], tangent } => Some(T::end_monospline(
            keys.get(*a)?,
            keys.get(*b)?,
            keys.get(*c)?,
            tangent,
        )),
    }
}

/// Blend two lists element by element. Elements present on both central keys
/// are mixed; the tail of the longer central key passes through unchanged.
pub(crate) fn mix_positional<T: Animatable>(
    mix: Mix<'_>,
    keys: Keys<'_, Vec<T>>,
) -> Vec<T> {
    let (left, right) = (keys.f1, keys.f2);
    let len = left.len().max(right.len());
    (0..len)
        .filter_map(|i| match keys.project(|list| list.get(i)) {
            Some(item_keys) => Some(T::mix(mix, item_keys)),
            None => left.get(i).or_else(|| right.get(i)).cloned(),
        })
        .collect()
}

impl Animatable for f64 {
    fn mix(mix: Mix<'_>, keys: Keys<'_, Self>) -> Self {
        mix.component(&keys, |v| *v)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn scalar_linear_endpoints() {
        assert_eq!(f64::linear(&0.1, &0.7, 0.0), 0.1);
        assert_eq!(f64::linear(&0.1, &0.7, 1.0), 0.7);
    }

    #[test]
    fn scalar_monospline_straight_line() {
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let mono = f64::monospline(&1.0, &2.0, &3.0, &4.0, &even_interior(t));
            assert!((mono - f64::linear(&2.0, &3.0, t)).abs() < 1e-12);
            let first = f64::first_monospline(&2.0, &3.0, &4.0, &even_first(t));
            assert!((first - f64::linear(&2.0, &3.0, t)).abs() < 1e-12);
            let end = f64::end_monospline(&1.0, &2.0, &3.0, &even_end(t));
            assert!((end - f64::linear(&2.0, &3.0, t)).abs() < 1e-12);
        }
    }

    #[test]
    fn blend_keys_dispatch() {
        let keys = vec![0.0, 10.0, 20.0, 30.0];
        assert_eq!(blend_keys(&keys, &Blend::Step { key: 2 }), Some(20.0));
        assert_eq!(
            blend_keys(
                &keys,
                &Blend::Linear {
                    from: 1,
                    to: 2,
                    t: 0.5
                }
            ),
            Some(15.0)
        );
        assert_eq!(blend_keys(&keys, &Blend::Step { key: 9 }), None);
    }

    #[test]
    fn positional_tail_passes_through() {
        let short = vec![0.0, 10.0];
        let long = vec![10.0, 20.0, 99.0];
        let keys = Keys {
            f0: None,
            f1: &short,
            f2: &long,
            f3: None,
        };
        assert_eq!(mix_positional(Mix::Linear(0.5), keys), vec![5.0, 15.0, 99.0]);
    }
}
