//! The solve pipeline: validate, contract wires, reduce, back-substitute.
//!
//! All mutation happens on a working copy of the circuit. The caller's
//! registry only receives the per-element voltages and currents, and only
//! when every stage succeeded; a failed solve leaves it exactly as it was.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::circuit::Circuit;
use crate::error::{CircuitError, CircuitResult};
use crate::{ElementId, NodeId};

/// Summary of a successful solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveReport {
    /// Resistance of the single equivalent element
    pub equivalent_resistance: f64,
    /// Net EMF of the single equivalent element
    pub equivalent_emf: f64,
    /// Current through the equivalent element (`emf / resistance`)
    pub source_current: f64,
    pub merges: usize,
    pub contracted_wires: usize,
}

impl Circuit {
    /// Solve the circuit, annotating every element with current and voltage.
    pub fn solve(&mut self) -> CircuitResult<SolveReport> {
        let mut working = self.clone();
        let report = working.run_pipeline()?;
        self.commit_solution(&working);

        info!(
            elements = self.element_count(),
            merges = report.merges,
            wires = report.contracted_wires,
            resistance = report.equivalent_resistance,
            current = report.source_current,
            "circuit solved"
        );
        Ok(report)
    }

    fn run_pipeline(&mut self) -> CircuitResult<SolveReport> {
        self.validate()?;
        // Declared terminals, before contraction moves them
        let terminals: Vec<(NodeId, NodeId)> = self
            .elements()
            .map(|element| (element.node1(), element.node2()))
            .collect();

        let wires = self.contract_wires()?;
        let reduction = self.reduce()?;

        let root = self.el(reduction.root);
        if self.tolerances().is_short(root.resistance()) {
            return Err(CircuitError::ZeroEquivalentResistance {
                element: root.name().to_string(),
            });
        }
        let equivalent_emf = root.emf();
        let equivalent_resistance = root.resistance();
        let source_current = equivalent_emf / equivalent_resistance;

        let flows = self.back_substitute(reduction.root, source_current);
        self.resolve_wires(&terminals, &flows, &wires, source_current)?;

        Ok(SolveReport {
            equivalent_resistance,
            equivalent_emf,
            source_current,
            merges: reduction.merges,
            contracted_wires: wires.len(),
        })
    }

    /// Give contracted wires their current by Kirchhoff's current law.
    ///
    /// `flows` are the node1-to-node2 flows of every other leaf. On the
    /// declared terminals the wires form a forest, so a wire with an endpoint
    /// touched by no other pending wire carries exactly that node's surplus.
    /// Peeling such wires resolves all of them; anything left over is a loop
    /// of wires.
    ///
    /// Wire currents are reported like the other leaves: the magnitude of the
    /// flow, carrying the sign of `loop_current`.
    fn resolve_wires(
        &mut self,
        terminals: &[(NodeId, NodeId)],
        flows: &[(ElementId, f64)],
        wires: &[ElementId],
        loop_current: f64,
    ) -> CircuitResult<()> {
        let mut surplus: HashMap<NodeId, f64> = HashMap::new();
        for &(id, flow) in flows {
            let (node1, node2) = terminals[id.value()];
            *surplus.entry(node1).or_default() -= flow;
            *surplus.entry(node2).or_default() += flow;
        }

        let mut pending = wires.to_vec();
        while let Some((index, node)) = leaf_wire(terminals, &pending) {
            let wire = pending.swap_remove(index);
            let (node1, node2) = terminals[wire.value()];
            let net = surplus.get(&node).copied().unwrap_or(0.0);
            let flow = if node == node1 {
                *surplus.entry(node2).or_default() += net;
                net
            } else {
                *surplus.entry(node1).or_default() += net;
                -net
            };

            let element = self.el_mut(wire);
            element.set_current(flow.abs().copysign(loop_current));
            element.set_solved_voltage(0.0);
            debug!(wire = element.name(), flow, "resolved wire current");
        }

        match pending.first() {
            Some(&wire) => Err(CircuitError::ShortCircuit {
                element: self.el(wire).name().to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// A pending wire with an endpoint no other pending wire touches, and that
/// endpoint.
fn leaf_wire(terminals: &[(NodeId, NodeId)], pending: &[ElementId]) -> Option<(usize, NodeId)> {
    let mut degree: HashMap<NodeId, usize> = HashMap::new();
    for wire in pending {
        let (node1, node2) = terminals[wire.value()];
        *degree.entry(node1).or_default() += 1;
        *degree.entry(node2).or_default() += 1;
    }
    pending.iter().enumerate().find_map(|(index, wire)| {
        let (node1, node2) = terminals[wire.value()];
        [node1, node2]
            .into_iter()
            .find(|node| degree[node] == 1)
            .map(|node| (index, node))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current(circuit: &Circuit, name: &str) -> f64 {
        circuit
            .element_by_name(name)
            .and_then(|e| e.current())
            .unwrap_or_else(|| panic!("{name} has no current"))
    }

    #[test]
    fn test_solve_annotates_and_marks_solved() {
        let mut circuit = Circuit::new();
        circuit.add_battery("B1", 12.0, "A", "B").unwrap();
        circuit.add_resistor("R1", 4.0, "B", "A").unwrap();

        let report = circuit.solve().unwrap();
        assert!(circuit.is_solved());
        assert!((report.source_current - 3.0).abs() < 1e-12);
        assert!((current(&circuit, "R1") - 3.0).abs() < 1e-12);
        assert!((circuit.element_by_name("R1").unwrap().voltage() - 12.0).abs() < 1e-12);
        // Source keeps its EMF as voltage
        assert_eq!(circuit.element_by_name("B1").unwrap().voltage(), 12.0);
    }

    #[test]
    fn test_failed_solve_leaves_registry_untouched() {
        let mut circuit = Circuit::new();
        circuit.add_battery("B1", 10.0, "A", "B").unwrap();
        circuit.add_wire("W1", "B", "C").unwrap();
        circuit.add_resistor("R1", 5.0, "C", "A").unwrap();
        circuit.add_wire("W2", "A", "C").unwrap();

        let err = circuit.solve().unwrap_err();
        assert!(matches!(err, CircuitError::ShortCircuit { .. }));
        assert!(!circuit.is_solved());
        assert_eq!(circuit.node_count(), 3);
        assert_eq!(circuit.element_count(), 4);
        let w1 = circuit.element_id("W1").unwrap();
        assert_eq!(circuit.endpoint_names(w1), Some(("B", "C")));
        assert!(circuit.elements().all(|e| e.current().is_none()));
    }

    #[test]
    fn test_solve_keeps_declared_topology() {
        let mut circuit = Circuit::new();
        circuit.add_battery("B1", 10.0, "A", "B").unwrap();
        circuit.add_wire("W1", "B", "C").unwrap();
        circuit.add_resistor("R1", 5.0, "C", "A").unwrap();

        let report = circuit.solve().unwrap();
        assert_eq!(report.contracted_wires, 1);
        assert_eq!(circuit.node_count(), 3);
        let r1 = circuit.element_id("R1").unwrap();
        assert_eq!(circuit.endpoint_names(r1), Some(("C", "A")));
        assert!((current(&circuit, "W1") - 2.0).abs() < 1e-12);
        assert_eq!(circuit.element_by_name("W1").unwrap().voltage(), 0.0);
    }

    #[test]
    fn test_adding_element_clears_solution() {
        let mut circuit = Circuit::new();
        circuit.add_battery("B1", 10.0, "A", "B").unwrap();
        circuit.add_resistor("R1", 5.0, "B", "A").unwrap();
        circuit.solve().unwrap();

        circuit.add_resistor("R2", 5.0, "B", "A").unwrap();
        assert!(!circuit.is_solved());
        assert!(circuit.elements().all(|e| e.current().is_none()));
        // The solved drop on R1 must not turn it into a source
        assert_eq!(circuit.element_by_name("R1").unwrap().voltage(), 0.0);

        circuit.solve().unwrap();
        assert!((current(&circuit, "B1") - 4.0).abs() < 1e-12);
        assert!((current(&circuit, "R2") - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_wire_between_junctions_carries_branch_sum() {
        let mut circuit = Circuit::new();
        circuit.add_battery("B1", 10.0, "A", "B").unwrap();
        circuit.add_resistor("R1", 10.0, "B", "C").unwrap();
        circuit.add_resistor("R2", 10.0, "B", "C").unwrap();
        circuit.add_wire("W1", "C", "D").unwrap();
        circuit.add_resistor("R3", 10.0, "D", "A").unwrap();
        circuit.add_resistor("R4", 10.0, "D", "A").unwrap();

        circuit.solve().unwrap();
        // Both halves of R1 || R2 leave C through W1
        assert!((current(&circuit, "W1") - 1.0).abs() < 1e-12);
        assert!((current(&circuit, "B1") - 1.0).abs() < 1e-12);
        assert!((current(&circuit, "R3") - 0.5).abs() < 1e-12);
        assert!(circuit.elements().all(|e| e.current().is_some()));
    }

    #[test]
    fn test_wire_tree_at_junction() {
        // W1 and W2 meet at C, feeding two parallel resistors
        let mut circuit = Circuit::new();
        circuit.add_battery("B1", 12.0, "A", "B").unwrap();
        circuit.add_wire("W1", "B", "C").unwrap();
        circuit.add_wire("W2", "C", "D").unwrap();
        circuit.add_resistor("R1", 6.0, "C", "A").unwrap();
        circuit.add_resistor("R2", 3.0, "D", "A").unwrap();

        circuit.solve().unwrap();
        assert!((current(&circuit, "B1") - 6.0).abs() < 1e-12);
        assert!((current(&circuit, "R1") - 2.0).abs() < 1e-12);
        assert!((current(&circuit, "R2") - 4.0).abs() < 1e-12);
        assert!((current(&circuit, "W1") - 6.0).abs() < 1e-12);
        assert!((current(&circuit, "W2") - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_wire_loop_is_short_circuit() {
        let mut circuit = Circuit::new();
        circuit.add_battery("B1", 10.0, "A", "B").unwrap();
        let r1 = circuit.add_resistor("R1", 5.0, "B", "A").unwrap();
        let w1 = circuit.add_wire("W1", "A", "C").unwrap();
        let w2 = circuit.add_wire("W2", "C", "A").unwrap();
        let terminals: Vec<_> = circuit
            .elements()
            .map(|e| (e.node1(), e.node2()))
            .collect();

        let result = circuit.resolve_wires(&terminals, &[(r1, 2.0)], &[w1, w2], 2.0);
        assert_eq!(
            result,
            Err(CircuitError::ShortCircuit {
                element: "W1".into()
            })
        );
    }
}
