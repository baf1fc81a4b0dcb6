//! Numeric thresholds used to classify elements.

use serde::{Deserialize, Serialize};

/// Thresholds that decide what counts as a source and what counts as a wire.
///
/// Loaded from the `[solver]` table of the CLI config or a netlist's
/// `[tolerances]` table; any omitted field keeps its default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    /// An element with `|voltage|` above this is a source
    #[serde(default = "default_source_epsilon")]
    pub source_epsilon: f64,
    /// A non-source with resistance below this is a wire (and shorts a parallel branch)
    #[serde(default = "default_wire_epsilon")]
    pub wire_epsilon: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            source_epsilon: default_source_epsilon(),
            wire_epsilon: default_wire_epsilon(),
        }
    }
}

fn default_source_epsilon() -> f64 {
    1e-5
}

fn default_wire_epsilon() -> f64 {
    1e-6
}

impl Tolerances {
    #[inline]
    pub fn is_source(&self, voltage: f64) -> bool {
        voltage.abs() > self.source_epsilon
    }

    #[inline]
    pub fn is_short(&self, resistance: f64) -> bool {
        resistance < self.wire_epsilon
    }

    #[inline]
    pub fn is_wire(&self, voltage: f64, resistance: f64) -> bool {
        !self.is_source(voltage) && self.is_short(resistance)
    }
}
