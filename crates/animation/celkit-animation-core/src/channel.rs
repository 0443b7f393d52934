//! Attribute channels: one key per keyframe, evaluated against the track's
//! shared resolution.

use std::any::Any;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::animatable::blend_keys;
use crate::resolver::{InterpolationState, Resolution};
use crate::value::{AnimatedValue, ChannelValue, ValueKind};

/// Which segment and blend a channel was last evaluated with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationStamp {
    pub entry_index: usize,
    pub state: InterpolationState,
}

impl From<&Resolution> for EvaluationStamp {
    fn from(resolution: &Resolution) -> Self {
        Self {
            entry_index: resolution.entry_index,
            state: resolution.state(),
        }
    }
}

/// Object-safe view of a channel so a track can own channels of every kind.
///
/// Index-based mutators assume the caller already checked bounds and kind
/// (the track validates a whole operation before applying any of it).
pub trait AnimationChannel: Debug + Send + Sync {
    fn kind(&self) -> ValueKind;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn accepts(&self, value: &AnimatedValue) -> bool {
        value.kind() == self.kind()
    }

    /// Insert a key before `index`. A value of the wrong kind is handed back.
    fn insert(&mut self, index: usize, value: AnimatedValue) -> Result<(), AnimatedValue>;

    fn remove(&mut self, index: usize) -> Option<AnimatedValue>;

    /// Swap the key at `index`, returning the previous one.
    fn replace(&mut self, index: usize, value: AnimatedValue)
        -> Result<AnimatedValue, AnimatedValue>;

    fn key(&self, index: usize) -> Option<AnimatedValue>;

    /// Blend this channel's keys as `resolution` dictates and keep the result.
    fn evaluate(&mut self, resolution: &Resolution);

    /// Value from the last `evaluate`, if any.
    fn current(&self) -> Option<AnimatedValue>;

    fn last_evaluation(&self) -> Option<EvaluationStamp>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Typed channel holding one `T` per keyframe.
#[derive(Clone, Debug)]
pub struct KeyChannel<T> {
    keys: Vec<T>,
    current: Option<T>,
    stamp: Option<EvaluationStamp>,
}

impl<T: ChannelValue> KeyChannel<T> {
    pub fn new(keys: Vec<T>) -> Self {
        Self {
            keys,
            current: None,
            stamp: None,
        }
    }

    #[inline]
    pub fn keys(&self) -> &[T] {
        &self.keys
    }

    #[inline]
    pub fn current_value(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Blend without touching the evaluated state.
    #[inline]
    pub fn sample(&self, resolution: &Resolution) -> Option<T> {
        blend_keys(&self.keys, &resolution.blend)
    }
}

impl<T: ChannelValue> AnimationChannel for KeyChannel<T> {
    #[inline]
    fn kind(&self) -> ValueKind {
        T::KIND
    }

    #[inline]
    fn len(&self) -> usize {
        self.keys.len()
    }

    fn insert(&mut self, index: usize, value: AnimatedValue) -> Result<(), AnimatedValue> {
        let value = T::from_value(value)?;
        self.keys.insert(index.min(self.keys.len()), value);
        Ok(())
    }

    fn remove(&mut self, index: usize) -> Option<AnimatedValue> {
        (index < self.keys.len()).then(|| self.keys.remove(index).into_value())
    }

    fn replace(
        &mut self,
        index: usize,
        value: AnimatedValue,
    ) -> Result<AnimatedValue, AnimatedValue> {
        if index >= self.keys.len() {
            return Err(value);
        }
        let value = T::from_value(value)?;
        Ok(std::mem::replace(&mut self.keys[index], value).into_value())
    }

    fn key(&self, index: usize) -> Option<AnimatedValue> {
        self.keys.get(index).cloned().map(ChannelValue::into_value)
    }

    fn evaluate(&mut self, resolution: &Resolution) {
        self.current = self.sample(resolution);
        if self.current.is_none() {
            warn!(
                entry_index = resolution.entry_index,
                keys = self.keys.len(),
                "resolution refers to a key this channel does not have"
            );
        }
        self.stamp = Some(EvaluationStamp::from(resolution));
    }

    fn current(&self) -> Option<AnimatedValue> {
        self.current.clone().map(ChannelValue::into_value)
    }

    #[inline]
    fn last_evaluation(&self) -> Option<EvaluationStamp> {
        self.stamp
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
