//! Stable identities for values that must survive blending unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity carried by materials, geometries and drawings.
///
/// Two values sharing a `StableId` are the same content; blending between them
/// returns the left value untouched.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StableId(Uuid);

impl StableId {
    /// Allocate a fresh random identity.
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[inline]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[inline]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for StableId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// True when both values carry the same identity.
#[inline]
pub(crate) fn same_identity(a: Option<StableId>, b: Option<StableId>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}
