//! Keyframes: timed events shared by every channel of a track.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::time::Tick;

/// How the segment leaving a keyframe is interpolated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Interpolation {
    /// Monotone spline through the neighbouring keys.
    #[default]
    Spline,
    /// Spline that does not look across this keyframe.
    Bound,
    /// Straight blend to the next key.
    Linear,
    /// Hold this key's value until the next one.
    None,
}

/// Loop markers bracketing a span that replays until the next keyframe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoopMarker {
    #[serde(default)]
    pub is_start: bool,
    #[serde(default)]
    pub is_end: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: Tick,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default)]
    pub loop_marker: LoopMarker,
}

impl Keyframe {
    /// Spline keyframe with linear easing and no loop markers.
    #[inline]
    pub fn new(time: impl Into<Tick>) -> Self {
        Self {
            time: time.into(),
            easing: Easing::Linear,
            interpolation: Interpolation::Spline,
            loop_marker: LoopMarker::default(),
        }
    }

    #[inline]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[inline]
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    #[inline]
    pub fn loop_start(mut self) -> Self {
        self.loop_marker.is_start = true;
        self
    }

    #[inline]
    pub fn loop_end(mut self) -> Self {
        self.loop_marker.is_end = true;
        self
    }

    #[inline]
    pub fn is_loop_start(&self) -> bool {
        self.loop_marker.is_start
    }

    #[inline]
    pub fn is_loop_end(&self) -> bool {
        self.loop_marker.is_end
    }
}

/// Index of the first keyframe that breaks non-decreasing time order.
pub(crate) fn first_out_of_order(keyframes: &[Keyframe]) -> Option<usize> {
    keyframes
        .windows(2)
        .position(|pair| pair[1].time < pair[0].time)
        .map(|i| i + 1)
}
