//! Engine tunables.

use serde::{Deserialize, Serialize};

use crate::tangent::DEFAULT_COINCIDENT_EPSILON;

/// Limits and tolerances shared by every track built with it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hard cap on loop-table size. Tiling stops once it is reached.
    pub max_loop_entries: usize,

    /// Spline neighbours closer than this many ticks are treated as coincident.
    pub coincident_epsilon: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_loop_entries: 1 << 20,
            coincident_epsilon: DEFAULT_COINCIDENT_EPSILON,
        }
    }
}
