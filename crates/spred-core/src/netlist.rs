//! Serializable circuit description.
//!
//! A netlist is the declaration list of a circuit in a form serde can read,
//! typically a TOML file with one `[[element]]` table per element:
//!
//! ```toml
//! title = "voltage divider"
//!
//! [[element]]
//! kind = "battery"
//! name = "B1"
//! voltage = 10.0
//! negative = "A"
//! positive = "B"
//!
//! [[element]]
//! kind = "resistor"
//! name = "R1"
//! resistance = 5.0
//! negative = "B"
//! positive = "A"
//! ```

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::error::CircuitResult;
use crate::tolerance::Tolerances;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Netlist {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Overrides the caller's tolerances when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerances: Option<Tolerances>,
    #[serde(default, rename = "element")]
    pub elements: Vec<ElementSpec>,
}

/// One declared element. `negative`/`positive` name the terminal nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementSpec {
    Wire {
        name: String,
        negative: String,
        positive: String,
    },
    Resistor {
        name: String,
        resistance: f64,
        negative: String,
        positive: String,
    },
    Battery {
        name: String,
        voltage: f64,
        /// Internal resistance
        #[serde(default)]
        resistance: f64,
        negative: String,
        positive: String,
    },
}

impl ElementSpec {
    pub fn name(&self) -> &str {
        match self {
            ElementSpec::Wire { name, .. }
            | ElementSpec::Resistor { name, .. }
            | ElementSpec::Battery { name, .. } => name,
        }
    }

    fn declare(&self, circuit: &mut Circuit) -> CircuitResult<()> {
        match self {
            ElementSpec::Wire {
                name,
                negative,
                positive,
            } => circuit.add_wire(name, negative, positive)?,
            ElementSpec::Resistor {
                name,
                resistance,
                negative,
                positive,
            } => circuit.add_resistor(name, *resistance, negative, positive)?,
            ElementSpec::Battery {
                name,
                voltage,
                resistance,
                negative,
                positive,
            } => circuit.add_element(name, *voltage, *resistance, negative, positive)?,
        };
        Ok(())
    }
}

impl Netlist {
    /// Declare every element, in order, into a fresh circuit.
    pub fn build(&self) -> CircuitResult<Circuit> {
        self.build_with(Tolerances::default())
    }

    /// Like [`Netlist::build`], with `fallback` used unless the netlist
    /// carries its own tolerances.
    pub fn build_with(&self, fallback: Tolerances) -> CircuitResult<Circuit> {
        let tolerances = self.tolerances.unwrap_or(fallback);
        let mut circuit = Circuit::with_tolerances(tolerances);
        for spec in &self.elements {
            spec.declare(&mut circuit)?;
        }
        Ok(circuit)
    }
}
