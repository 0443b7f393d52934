use serde::{Deserialize, Serialize};

use super::{Animatable, Keys, Mix};

/// Text content. Never blended: holds the left key until the segment ends.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Text(pub String);

impl Text {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Text(value.to_owned())
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Text(value)
    }
}

impl Animatable for Text {
    fn mix(mix: Mix<'_>, keys: Keys<'_, Self>) -> Self {
        mix.pick(keys.f1, keys.f2).clone()
    }
}
