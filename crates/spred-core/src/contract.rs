//! Wire elimination by node contraction.
//!
//! A wire has no resistance and no EMF, so its two endpoints are the same
//! electrical node. Contracting it moves everything on one endpoint onto the
//! other and removes the wire from the active network.

use tracing::debug;

use crate::circuit::Circuit;
use crate::connection::Connection;
use crate::error::{CircuitError, CircuitResult};
use crate::ElementId;

impl Circuit {
    /// Contract every wire, in active-list order, and return them in
    /// contraction order.
    ///
    /// Contraction never turns a non-wire into a wire, so working from a
    /// snapshot of the wires is the same as rescanning after each one.
    pub(crate) fn contract_wires(&mut self) -> CircuitResult<Vec<ElementId>> {
        let wires: Vec<ElementId> = self
            .active()
            .iter()
            .copied()
            .filter(|&id| self.is_wire(id))
            .collect();

        for &wire in &wires {
            self.contract_wire(wire)?;
        }
        Ok(wires)
    }

    fn contract_wire(&mut self, wire: ElementId) -> CircuitResult<()> {
        let keep = self.el(wire).node1();
        let drop = self.el(wire).node2();

        // A zero-resistance path in parallel with anything shorts it
        for node in [keep, drop] {
            let shorted = self
                .nd(node)
                .incident()
                .iter()
                .any(|&other| other != wire && self.connection(wire, other) == Connection::Parallel);
            if shorted {
                return Err(CircuitError::ShortCircuit {
                    element: self.el(wire).name().to_string(),
                });
            }
        }

        self.detach(wire);
        self.deactivate(wire);

        let moved: Vec<ElementId> = self.nd(drop).incident().to_vec();
        for &other in &moved {
            self.rebind(other, drop, keep);
        }
        self.remove_node(drop);

        debug!(
            wire = self.el(wire).name(),
            keep = self.nd(keep).name(),
            drop = self.nd(drop).name(),
            moved = moved.len(),
            "contracted wire"
        );

        Ok(())
    }
}
