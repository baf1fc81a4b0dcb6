//! Pre-flight checks, run before the solver mutates anything.

use crate::circuit::Circuit;
use crate::error::{CircuitError, CircuitResult};
use crate::graph_utils;

impl Circuit {
    /// Reject circuits the reduction cannot meaningfully solve.
    ///
    /// Checks, in order: at least one element, at least one source, at least
    /// one resistor, every terminal node shared with another element, and a
    /// single connected component.
    pub fn validate(&self) -> CircuitResult<()> {
        let active = self.active();
        if active.is_empty() {
            return Err(CircuitError::EmptyCircuit);
        }

        if !active.iter().any(|&id| self.is_source(id)) {
            return Err(CircuitError::NoSource);
        }

        if !active.iter().any(|&id| self.el(id).resistance() > 0.0) {
            return Err(CircuitError::NoResistor);
        }

        for &id in active {
            let element = self.el(id);
            for node_id in [element.node1(), element.node2()] {
                let node = self.nd(node_id);
                if node.degree() < 2 {
                    return Err(CircuitError::UnderConnected {
                        element: element.name().to_string(),
                        node: node.name().to_string(),
                        degree: node.degree(),
                    });
                }
            }
        }

        let components = graph_utils::connected_components(self);
        if components > 1 {
            return Err(CircuitError::Disconnected { components });
        }

        Ok(())
    }
}
