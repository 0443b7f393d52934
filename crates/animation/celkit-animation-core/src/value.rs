//! Dynamically typed key values, used where a caller hands one value per
//! channel to a track mutation without knowing each channel's concrete type.

use serde::{Deserialize, Serialize};

use crate::animatable::{
    Animatable, Color, Drawing, Geometry, Material, Point, Text, Transform, Wiggle,
};

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar,
    Point,
    Color,
    Transform,
    Wiggle,
    Material,
    Geometry,
    Drawing,
    Text,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum AnimatedValue {
    Scalar(f64),
    Point(Point),
    Color(Color),
    Transform(Transform),
    Wiggle(Wiggle),
    Material(Material),
    Geometry(Geometry),
    Drawing(Drawing),
    /// Step-only, never blended.
    Text(Text),
}

/// An [`Animatable`] kind that has a slot in [`AnimatedValue`].
pub trait ChannelValue: Animatable + Sized {
    const KIND: ValueKind;

    fn into_value(self) -> AnimatedValue;

    /// Unwrap the matching variant, handing the value back untouched otherwise.
    fn from_value(value: AnimatedValue) -> Result<Self, AnimatedValue>;
}

macro_rules! channel_values {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        impl AnimatedValue {
            #[inline]
            pub fn kind(&self) -> ValueKind {
                match self {
                    $(AnimatedValue::$variant(_) => ValueKind::$variant,)*
                }
            }
        }

        $(
            impl ChannelValue for $ty {
                const KIND: ValueKind = ValueKind::$variant;

                #[inline]
                fn into_value(self) -> AnimatedValue {
                    AnimatedValue::$variant(self)
                }

                #[inline]
                fn from_value(value: AnimatedValue) -> Result<Self, AnimatedValue> {
                    match value {
                        AnimatedValue::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }

            impl From<$ty> for AnimatedValue {
                fn from(value: $ty) -> Self {
                    AnimatedValue::$variant(value)
                }
            }

            impl TryFrom<AnimatedValue> for $ty {
                type Error = AnimatedValue;

                fn try_from(value: AnimatedValue) -> Result<Self, Self::Error> {
                    <$ty as ChannelValue>::from_value(value)
                }
            }
        )*
    };
}

channel_values! {
    Scalar => f64,
    Point => Point,
    Color => Color,
    Transform => Transform,
    Wiggle => Wiggle,
    Material => Material,
    Geometry => Geometry,
    Drawing => Drawing,
    Text => Text,
}
