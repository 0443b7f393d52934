//! Time resolution: maps a query tick onto one loop-table segment and picks the
//! interpolation used across it.
//!
//! The result is computed once per `Track::update` and handed unchanged to
//! every channel, so all channels blend the same keys with the same parameter.

use serde::{Deserialize, Serialize};

use crate::keyframe::{Interpolation, Keyframe};
use crate::loop_table::LoopTable;
use crate::tangent::TangentParameter;
use crate::time::Tick;

/// Which blend a segment uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterpolationState {
    Step,
    Linear,
    FirstMonospline,
    Monospline,
    EndMonospline,
}

/// Blend instruction in terms of source keyframe indices.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Blend {
    Step {
        key: usize,
    },
    Linear {
        from: usize,
        to: usize,
        t: f64,
    },
    /// Keys are `[current, next, after_next]`.
    FirstMonospline {
        keys: [usize; 3],
        tangent: TangentParameter,
    },
    /// Keys are `[previous, current, next, after_next]`.
    Monospline {
        keys: [usize; 4],
        tangent: TangentParameter,
    },
    /// Keys are `[previous, current, next]`.
    EndMonospline {
        keys: [usize; 3],
        tangent: TangentParameter,
    },
}

impl Blend {
    #[inline]
    pub fn state(&self) -> InterpolationState {
        match self {
            Blend::Step { .. } => InterpolationState::Step,
            Blend::Linear { .. } => InterpolationState::Linear,
            Blend::FirstMonospline { .. } => InterpolationState::FirstMonospline,
            Blend::Monospline { .. } => InterpolationState::Monospline,
            Blend::EndMonospline { .. } => InterpolationState::EndMonospline,
        }
    }
}

/// Outcome of resolving one query time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Query time after clamping to the track duration.
    pub time: Tick,
    /// Index into the loop table.
    pub entry_index: usize,
    /// Keyframe the entry replays.
    pub source_index: usize,
    /// `time - entry.playback_time`; negative before the first entry.
    pub local_offset: Tick,
    /// Distance to the next entry, zero for the terminal entry.
    pub segment_span: Tick,
    /// Eased progress across the segment (0 for steps).
    pub progress: f64,
    pub blend: Blend,
}

impl Resolution {
    #[inline]
    pub fn state(&self) -> InterpolationState {
        self.blend.state()
    }
}

/// Resolve `time` against a loop table.
///
/// Times before the first entry clamp to entry 0 and times past `duration`
/// clamp to `duration`; both land on a step rather than an error.
pub fn resolve(
    time: Tick,
    table: &LoopTable,
    keyframes: &[Keyframe],
    duration: Tick,
    coincident_epsilon: f64,
) -> Option<Resolution> {
    let time = time.min(duration);
    let entry_index = table.entry_index_at(time)?;
    let entry = *table.get(entry_index)?;
    let keyframe = keyframes.get(entry.source_index)?;
    let local_offset = time - entry.playback_time;
    let next = table.get(entry_index + 1).copied();
    let segment_span = next
        .map(|n| n.playback_time - entry.playback_time)
        .unwrap_or(Tick::ZERO);

    let step = Resolution {
        time,
        entry_index,
        source_index: entry.source_index,
        local_offset,
        segment_span,
        progress: 0.0,
        blend: Blend::Step {
            key: entry.source_index,
        },
    };

    let Some(next) = next else {
        return Some(step);
    };
    if local_offset <= Tick::ZERO
        || segment_span <= Tick::ZERO
        || keyframe.interpolation == Interpolation::None
    {
        return Some(step);
    }

    let span = segment_span.as_f64();
    let progress = keyframe.easing.apply(local_offset.as_f64() / span);
    let linear = Blend::Linear {
        from: entry.source_index,
        to: next.source_index,
        t: progress,
    };
    let with_blend = |blend: Blend| Resolution {
        progress,
        blend,
        ..step
    };

    if keyframe.interpolation == Interpolation::Linear || keyframes.len() == 2 {
        return Some(with_blend(linear));
    }

    let next_keyframe = keyframes.get(next.source_index)?;
    let previous = entry_index
        .checked_sub(1)
        .and_then(|i| table.get(i))
        .copied()
        .filter(|_| keyframe.interpolation != Interpolation::Bound);
    let after = table
        .get(entry_index + 2)
        .copied()
        .filter(|_| next_keyframe.interpolation != Interpolation::Bound);

    let x = if keyframe.easing.is_identity() {
        time.as_f64()
    } else {
        progress * span + entry.playback_time.as_f64()
    };
    let x1 = entry.playback_time.as_f64();
    let x2 = next.playback_time.as_f64();

    let blend = match (previous, after) {
        (Some(prev), Some(after)) => Blend::Monospline {
            keys: [
                prev.source_index,
                entry.source_index,
                next.source_index,
                after.source_index,
            ],
            tangent: TangentParameter::interior(
                prev.playback_time.as_f64(),
                x1,
                x2,
                after.playback_time.as_f64(),
                x,
                progress,
            )
            .with_epsilon(coincident_epsilon),
        },
        (Some(prev), None) => Blend::EndMonospline {
            keys: [prev.source_index, entry.source_index, next.source_index],
            tangent: TangentParameter::end(prev.playback_time.as_f64(), x1, x2, x, progress)
                .with_epsilon(coincident_epsilon),
        },
        (None, Some(after)) => Blend::FirstMonospline {
            keys: [entry.source_index, next.source_index, after.source_index],
            tangent: TangentParameter::first(x1, x2, after.playback_time.as_f64(), x, progress)
                .with_epsilon(coincident_epsilon),
        },
        (None, None) => linear,
    };
    Some(with_blend(blend))
}
