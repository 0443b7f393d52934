//! Baking API: sample one channel of a track at every frame of a range.

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;
use crate::time::FrameRate;
use crate::track::Track;
use crate::value::ChannelValue;
use crate::Result;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BakingConfig {
    pub frame_rate: FrameRate,
    /// First frame, inclusive.
    pub start_frame: i64,
    /// Last frame, inclusive. `None` bakes through the frame holding the track end.
    pub end_frame: Option<i64>,
}

impl Default for BakingConfig {
    fn default() -> Self {
        Self {
            frame_rate: FrameRate::default(),
            start_frame: 0,
            end_frame: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BakedChannel<T> {
    pub name: String,
    pub frame_rate: FrameRate,
    pub start_frame: i64,
    /// One value per frame starting at `start_frame`.
    pub values: Vec<T>,
}

impl<T> BakedChannel<T> {
    #[inline]
    pub fn end_frame(&self) -> i64 {
        self.start_frame + self.values.len() as i64 - 1
    }
}

/// Bake channel `name` of `track`. The track's evaluated state is untouched.
///
/// An empty range yields no values; a track without keyframes yields none
/// either.
pub fn bake_channel<T: ChannelValue>(
    track: &Track,
    name: &str,
    cfg: &BakingConfig,
) -> Result<BakedChannel<T>> {
    let channel = track.channel::<T>(name).ok_or_else(|| {
        match track.channel_dyn(name) {
            Some(other) => AnimationError::ValueKindMismatch {
                channel: name.into(),
                expected: other.kind(),
                actual: T::KIND,
            },
            None => AnimationError::ChannelNotFound { name: name.into() },
        }
    })?;
    let end_frame = cfg
        .end_frame
        .unwrap_or_else(|| cfg.frame_rate.tick_to_frame(track.duration()));

    let values = (cfg.start_frame..=end_frame)
        .map_while(|frame| {
            let time = cfg.frame_rate.frame_to_tick(frame);
            track
                .resolve(time)
                .and_then(|resolution| channel.sample(&resolution))
        })
        .collect();

    Ok(BakedChannel {
        name: name.to_owned(),
        frame_rate: cfg.frame_rate,
        start_frame: cfg.start_frame,
        values,
    })
}

/// Export a baked channel as `serde_json::Value`.
pub fn export_baked_json<T: Serialize>(baked: &BakedChannel<T>) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(baked)?)
}
