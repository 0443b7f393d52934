//! Celkit Animation Core (engine-agnostic)
//!
//! Keyframe interpolation for layered cel animation. A [`Track`] owns one
//! keyframe list and any number of attribute channels; loop-marked keyframe
//! ranges are expanded into a [`LoopTable`], a query time is resolved once to a
//! segment and blend mode, and every channel is evaluated against that same
//! [`Resolution`].

pub mod animatable;
pub mod baking;
pub mod channel;
pub mod config;
pub mod easing;
pub mod error;
pub mod ids;
pub mod keyframe;
pub mod loop_table;
pub mod resolver;
pub mod tangent;
pub mod time;
pub mod timeline;
pub mod track;
pub mod value;

// Re-exports for consumers (renderers, editors)
pub use animatable::{
    Animatable, Color, Drawing, Geometry, Line, Material, Point, Stroke, Text, Transform, Wiggle,
};
pub use baking::{bake_channel, BakedChannel, BakingConfig};
pub use channel::{AnimationChannel, EvaluationStamp, KeyChannel};
pub use config::Config;
pub use easing::Easing;
pub use error::AnimationError;
pub use ids::StableId;
pub use keyframe::{Interpolation, Keyframe, LoopMarker};
pub use loop_table::{LoopEntry, LoopTable};
pub use resolver::{Blend, InterpolationState, Resolution};
pub use tangent::TangentParameter;
pub use time::{FrameRate, Ratio, Tempo, Tick};
pub use timeline::Timeline;
pub use track::Track;
pub use value::{AnimatedValue, ChannelValue, ValueKind};

/// Result type for fallible track and time operations.
pub type Result<T> = core::result::Result<T, AnimationError>;
