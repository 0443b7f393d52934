//! Track orchestration.
//!
//! A [`Track`] owns one keyframe list and any number of named attribute
//! channels, each holding exactly one key per keyframe. Every mutation is
//! validated in full before any state changes and then applied to the
//! keyframes and every channel in the same call, followed by an explicit
//! loop-table rebuild. [`Track::update`] resolves the query time once and hands
//! that single resolution to every channel.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::channel::{AnimationChannel, KeyChannel};
use crate::config::Config;
use crate::error::AnimationError;
use crate::keyframe::{first_out_of_order, Keyframe};
use crate::loop_table::LoopTable;
use crate::resolver::{resolve, Resolution};
use crate::time::Tick;
use crate::value::{AnimatedValue, ChannelValue};
use crate::Result;

#[derive(Debug)]
pub struct Track {
    keyframes: Vec<Keyframe>,
    duration: Tick,
    channels: IndexMap<String, Box<dyn AnimationChannel>>,
    loop_table: LoopTable,
    /// Index into `keyframes`, never into the loop table.
    edit_index: usize,
    last_resolution: Option<Resolution>,
    config: Config,
}

impl Track {
    /// Track with default [`Config`]. Keyframes must be in non-decreasing time
    /// order and the duration must not be negative.
    pub fn new(keyframes: Vec<Keyframe>, duration: Tick) -> Result<Self> {
        Self::with_config(keyframes, duration, Config::default())
    }

    pub fn with_config(keyframes: Vec<Keyframe>, duration: Tick, config: Config) -> Result<Self> {
        if duration < Tick::ZERO {
            return Err(AnimationError::InvalidDuration {
                duration: duration.get(),
            });
        }
        if let Some(index) = first_out_of_order(&keyframes) {
            return Err(AnimationError::KeyframeOrder {
                index,
                time: keyframes[index].time.get(),
            });
        }
        let mut track = Self {
            keyframes,
            duration,
            channels: IndexMap::new(),
            loop_table: LoopTable::default(),
            edit_index: 0,
            last_resolution: None,
            config,
        };
        track.rebuild_loop_table();
        Ok(track)
    }

    // --- channels ---

    /// Register a channel. `keys` must hold one value per keyframe.
    pub fn add_channel<T: ChannelValue>(
        &mut self,
        name: impl Into<String>,
        keys: Vec<T>,
    ) -> Result<()> {
        self.add_boxed_channel(name, Box::new(KeyChannel::new(keys)))
    }

    /// Register an already boxed channel.
    pub fn add_boxed_channel(
        &mut self,
        name: impl Into<String>,
        channel: Box<dyn AnimationChannel>,
    ) -> Result<()> {
        let name = name.into();
        if self.channels.contains_key(&name) {
            return Err(AnimationError::DuplicateChannel { name });
        }
        if channel.len() != self.keyframes.len() {
            debug!(channel = %name, keys = channel.len(), "rejected channel with wrong key count");
            return Err(AnimationError::ChannelLengthMismatch {
                channel: name,
                expected: self.keyframes.len(),
                actual: channel.len(),
            });
        }
        self.channels.insert(name, channel);
        Ok(())
    }

    pub fn remove_channel(&mut self, name: &str) -> Result<Box<dyn AnimationChannel>> {
        self.channels
            .shift_remove(name)
            .ok_or_else(|| AnimationError::ChannelNotFound { name: name.into() })
    }

    /// Channel names in registration order.
    pub fn channel_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.channels.keys().map(String::as_str)
    }

    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel_dyn(&self, name: &str) -> Option<&dyn AnimationChannel> {
        self.channels.get(name).map(|c| &**c)
    }

    /// Typed access; `None` if the channel is missing or holds another kind.
    pub fn channel<T: ChannelValue>(&self, name: &str) -> Option<&KeyChannel<T>> {
        self.channels.get(name)?.as_any().downcast_ref()
    }

    /// Value of a channel from the last [`Track::update`].
    pub fn value<T: ChannelValue>(&self, name: &str) -> Option<&T> {
        self.channel::<T>(name)?.current_value()
    }

    // --- keyframe mutation ---

    /// Insert `keyframe` before `index`, with one value for every channel.
    ///
    /// Rejected as a whole if the index is out of range, the keyframe breaks
    /// time ordering, or `values` misses a channel, names an unknown one, or
    /// carries the wrong kind. A channel that still refuses its key after
    /// validation has every earlier channel's insert undone.
    pub fn insert_keyframe<K>(
        &mut self,
        index: usize,
        keyframe: Keyframe,
        values: impl IntoIterator<Item = (K, AnimatedValue)>,
    ) -> Result<()>
    where
        K: Into<String>,
    {
        let len = self.keyframes.len();
        let mut values: IndexMap<String, AnimatedValue> =
            values.into_iter().map(|(k, v)| (k.into(), v)).collect();
        if let Err(err) = self.validate_insert(index, &keyframe, &values) {
            debug!(index, error = %err, "rejected keyframe insert");
            return Err(err);
        }

        for slot in 0..self.channels.len() {
            let Some((name, channel)) = self.channels.get_index_mut(slot) else {
                break;
            };
            let Some(value) = values.swap_remove(name.as_str()) else {
                continue;
            };
            let err = match channel.insert(index, value) {
                Ok(()) if channel.len() == len + 1 => continue,
                Ok(()) => {
                    let actual = channel.len();
                    if actual > len {
                        channel.remove(index);
                    }
                    AnimationError::ChannelLengthMismatch {
                        channel: name.clone(),
                        expected: len + 1,
                        actual,
                    }
                }
                Err(v) => AnimationError::ValueKindMismatch {
                    channel: name.clone(),
                    expected: channel.kind(),
                    actual: v.kind(),
                },
            };
            self.undo_insert(slot, index);
            debug!(index, error = %err, "channel refused keyframe insert, rolled back");
            return Err(err);
        }
        self.keyframes.insert(index, keyframe);
        if len > 0 && index <= self.edit_index {
            self.edit_index += 1;
        }
        trace!(index, time = keyframe.time.get(), "inserted keyframe");
        self.rebuild_loop_table();
        Ok(())
    }

    fn validate_insert(
        &self,
        index: usize,
        keyframe: &Keyframe,
        values: &IndexMap<String, AnimatedValue>,
    ) -> Result<()> {
        let len = self.keyframes.len();
        if index > len {
            return Err(AnimationError::IndexOutOfBounds { index, len });
        }
        self.check_order(index, index, keyframe)?;
        self.check_channel_lengths()?;
        if let Some(unknown) = values.keys().find(|k| !self.channels.contains_key(*k)) {
            return Err(AnimationError::UnknownChannelValue {
                channel: unknown.clone(),
            });
        }
        for (name, channel) in &self.channels {
            let value = values
                .get(name)
                .ok_or_else(|| AnimationError::MissingChannelValue {
                    channel: name.clone(),
                })?;
            if !channel.accepts(value) {
                return Err(AnimationError::ValueKindMismatch {
                    channel: name.clone(),
                    expected: channel.kind(),
                    actual: value.kind(),
                });
            }
        }
        Ok(())
    }

    fn check_channel_lengths(&self) -> Result<()> {
        let expected = self.keyframes.len();
        match self.channels.iter().find(|(_, c)| c.len() != expected) {
            Some((name, channel)) => Err(AnimationError::ChannelLengthMismatch {
                channel: name.clone(),
                expected,
                actual: channel.len(),
            }),
            None => Ok(()),
        }
    }

    /// Take the key at `index` back out of the channels before `upto`.
    fn undo_insert(&mut self, upto: usize, index: usize) {
        for (_, channel) in self.channels.iter_mut().take(upto) {
            channel.remove(index);
        }
    }

    /// Put `removed` keys back at `index`, in channel order.
    fn undo_remove(&mut self, index: usize, removed: IndexMap<String, AnimatedValue>) {
        for (name, value) in removed {
            if let Some(channel) = self.channels.get_mut(&name) {
                // The value came out of this channel, so its kind matches.
                let _ = channel.insert(index, value);
            }
        }
    }

    /// `keyframe` placed at `index` must not precede the keyframe before it
    /// or follow the one at `next`.
    fn check_order(&self, index: usize, next: usize, keyframe: &Keyframe) -> Result<()> {
        let before = index.checked_sub(1).and_then(|i| self.keyframes.get(i));
        let after = self.keyframes.get(next);
        if before.is_some_and(|k| k.time > keyframe.time)
            || after.is_some_and(|k| k.time < keyframe.time)
        {
            return Err(AnimationError::KeyframeOrder {
                index,
                time: keyframe.time.get(),
            });
        }
        Ok(())
    }

    /// Remove the keyframe at `index` together with every channel's key there.
    /// If any channel fails to give up its key, the keys already taken are put
    /// back and the track is left unchanged.
    pub fn remove_keyframe(
        &mut self,
        index: usize,
    ) -> Result<(Keyframe, IndexMap<String, AnimatedValue>)> {
        let len = self.keyframes.len();
        if index >= len {
            return Err(AnimationError::IndexOutOfBounds { index, len });
        }
        self.check_channel_lengths()?;
        let mut removed = IndexMap::with_capacity(self.channels.len());
        for slot in 0..self.channels.len() {
            let Some((name, channel)) = self.channels.get_index_mut(slot) else {
                break;
            };
            let taken = channel.remove(index);
            let actual = channel.len();
            if let Some(value) = taken {
                if actual + 1 == len {
                    removed.insert(name.clone(), value);
                    continue;
                }
                if actual < len {
                    let _ = channel.insert(index, value);
                }
            }
            let err = AnimationError::ChannelLengthMismatch {
                channel: name.clone(),
                expected: len - 1,
                actual,
            };
            self.undo_remove(index, removed);
            debug!(index, error = %err, "channel refused keyframe removal, rolled back");
            return Err(err);
        }
        let keyframe = self.keyframes.remove(index);
        if index < self.edit_index {
            self.edit_index -= 1;
        }
        self.edit_index = self.edit_index.min(self.keyframes.len().saturating_sub(1));
        trace!(index, "removed keyframe");
        self.rebuild_loop_table();
        Ok((keyframe, removed))
    }

    /// Swap the keyframe at `index`, keeping every channel's key. Returns the
    /// previous keyframe.
    pub fn replace_keyframe(&mut self, index: usize, keyframe: Keyframe) -> Result<Keyframe> {
        let len = self.keyframes.len();
        if index >= len {
            return Err(AnimationError::IndexOutOfBounds { index, len });
        }
        self.check_order(index, index + 1, &keyframe)?;
        let previous = std::mem::replace(&mut self.keyframes[index], keyframe);
        self.rebuild_loop_table();
        Ok(previous)
    }

    /// Swap one channel's key at `index`. Returns the previous value.
    pub fn replace_key_value(
        &mut self,
        channel: &str,
        index: usize,
        value: AnimatedValue,
    ) -> Result<AnimatedValue> {
        let len = self.keyframes.len();
        let target = self
            .channels
            .get_mut(channel)
            .ok_or_else(|| AnimationError::ChannelNotFound {
                name: channel.into(),
            })?;
        if index >= len {
            return Err(AnimationError::IndexOutOfBounds { index, len });
        }
        let expected = target.kind();
        target
            .replace(index, value)
            .map_err(|v| AnimationError::ValueKindMismatch {
                channel: channel.into(),
                expected,
                actual: v.kind(),
            })
    }

    pub fn set_duration(&mut self, duration: Tick) -> Result<()> {
        if duration < Tick::ZERO {
            return Err(AnimationError::InvalidDuration {
                duration: duration.get(),
            });
        }
        self.duration = duration;
        self.rebuild_loop_table();
        Ok(())
    }

    /// Re-expand the loop table from the current keyframes and duration.
    /// Every mutator calls this; the cached resolution is dropped with it.
    pub fn rebuild_loop_table(&mut self) {
        self.loop_table = LoopTable::build(
            &self.keyframes,
            self.duration,
            self.config.max_loop_entries,
        );
        self.last_resolution = None;
    }

    // --- evaluation ---

    /// Resolve `time` without evaluating any channel.
    pub fn resolve(&self, time: Tick) -> Option<Resolution> {
        resolve(
            time,
            &self.loop_table,
            &self.keyframes,
            self.duration,
            self.config.coincident_epsilon,
        )
    }

    /// Resolve `time` once and evaluate every channel against that result.
    /// `None` when the track has no keyframes.
    pub fn update(&mut self, time: Tick) -> Option<Resolution> {
        let resolution = self.resolve(time);
        if let Some(resolution) = &resolution {
            for channel in self.channels.values_mut() {
                channel.evaluate(resolution);
            }
        }
        self.last_resolution = resolution;
        resolution
    }

    #[inline]
    pub fn last_resolution(&self) -> Option<&Resolution> {
        self.last_resolution.as_ref()
    }

    // --- edit cursor ---

    #[inline]
    pub fn edit_index(&self) -> usize {
        self.edit_index
    }

    pub fn set_edit_index(&mut self, index: usize) -> Result<()> {
        let len = self.keyframes.len();
        if index >= len {
            return Err(AnimationError::IndexOutOfBounds { index, len });
        }
        self.edit_index = index;
        Ok(())
    }

    /// Point the edit cursor at the keyframe playing at `time`.
    pub fn select_keyframe_at(&mut self, time: Tick) -> Option<usize> {
        let source = self.resolve(time)?.source_index;
        self.edit_index = source;
        Some(source)
    }

    // --- accessors ---

    #[inline]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    #[inline]
    pub fn loop_table(&self) -> &LoopTable {
        &self.loop_table
    }

    #[inline]
    pub fn duration(&self) -> Tick {
        self.duration
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
