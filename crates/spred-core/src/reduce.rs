//! Pairwise series/parallel reduction into a binary merge tree.
//!
//! Each merge replaces two active elements with one equivalent element whose
//! [`MergeRecord`] remembers the children and the combination used. The loop
//! ends when a single element is left; that element is the root of the
//! merge tree handed to back-substitution.

use tracing::debug;

use crate::circuit::{Circuit, MergeRecord};
use crate::connection::{coincidences, Connection};
use crate::error::{CircuitError, CircuitResult};
use crate::{ElementId, NodeId};

/// Electrical equivalent of a pair, before it is pushed into the arena.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Equivalent {
    emf: f64,
    resistance: f64,
    endpoints: (NodeId, NodeId),
    right_reversed: bool,
}

/// Result of a completed reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reduction {
    /// The single remaining equivalent element
    pub root: ElementId,
    pub merges: usize,
}

impl Circuit {
    /// Merge pairs until one element remains.
    ///
    /// Sources are left alone while any passive pair can still be merged;
    /// once a pass finds nothing, source merges are allowed for the rest of
    /// the reduction. A pass that finds nothing even then means the network
    /// is not series/parallel reducible.
    pub(crate) fn reduce(&mut self) -> CircuitResult<Reduction> {
        let mut allow_sources = false;
        let mut merges = 0;

        while self.active().len() > 1 {
            match self.find_mergeable(allow_sources) {
                Some((e1, e2, cxn)) => {
                    self.merge(e1, e2, cxn)?;
                    merges += 1;
                }
                None if !allow_sources => {
                    debug!("no passive pair left, allowing source merges");
                    allow_sources = true;
                }
                None => {
                    return Err(CircuitError::Irreducible {
                        remaining: self.active().len(),
                    })
                }
            }
        }

        let root = *self.active().first().ok_or(CircuitError::EmptyCircuit)?;
        Ok(Reduction { root, merges })
    }

    /// First reducible pair in stable scan order.
    fn find_mergeable(&self, allow_sources: bool) -> Option<(ElementId, ElementId, Connection)> {
        let active = self.active();
        for (i, &e1) in active.iter().enumerate() {
            for &e2 in &active[i + 1..] {
                let cxn = self.connection(e1, e2);
                if cxn == Connection::None {
                    continue;
                }
                if !allow_sources && (self.is_source(e1) || self.is_source(e2)) {
                    continue;
                }
                return Some((e1, e2, cxn));
            }
        }
        None
    }

    /// Replace `e1` and `e2` with their equivalent element.
    pub(crate) fn merge(&mut self, e1: ElementId, e2: ElementId, cxn: Connection) -> CircuitResult<ElementId> {
        let equivalent = match cxn {
            Connection::Series => self.series_equivalent(e1, e2)?,
            Connection::Parallel => self.parallel_equivalent(e1, e2)?,
            Connection::None => {
                return Err(CircuitError::Irreducible {
                    remaining: self.active().len(),
                })
            }
        };

        let name = format!("{}+{}", self.el(e1).name(), self.el(e2).name());
        for child in [e1, e2] {
            self.detach(child);
            self.deactivate(child);
        }

        debug!(
            element = %name,
            kind = cxn.as_str(),
            emf = equivalent.emf,
            resistance = equivalent.resistance,
            "merged pair"
        );

        let record = MergeRecord {
            left: e1,
            right: e2,
            kind: cxn,
            right_reversed: equivalent.right_reversed,
        };
        Ok(self.push_merged(
            name,
            equivalent.emf,
            equivalent.resistance,
            equivalent.endpoints,
            record,
        ))
    }

    /// End-to-end combination through the first shared node.
    ///
    /// The equivalent keeps `e1`'s polarity: its EMF counts from `e1`'s
    /// outer node through `e1`, then through `e2` (subtracted when the two
    /// meet on same-polarity terminals, which is also when `e2` runs
    /// backwards through the equivalent).
    fn series_equivalent(&self, e1: ElementId, e2: ElementId) -> CircuitResult<Equivalent> {
        let shared = coincidences(self, e1, e2)
            .into_iter()
            .next()
            .ok_or(CircuitError::Irreducible {
                remaining: self.active().len(),
            })?;

        let a = self.el(e1);
        let b = self.el(e2);
        let second_emf = if shared.same_polarity() { -b.emf() } else { b.emf() };

        let outer_a = if shared.first_at_node1 { a.node2() } else { a.node1() };
        let outer_b = if shared.second_at_node1 { b.node2() } else { b.node1() };
        let endpoints = if shared.first_at_node1 {
            (outer_b, outer_a)
        } else {
            (outer_a, outer_b)
        };

        Ok(Equivalent {
            emf: a.emf() + second_emf,
            resistance: a.resistance() + b.resistance(),
            endpoints,
            right_reversed: shared.same_polarity(),
        })
    }

    fn parallel_equivalent(&self, e1: ElementId, e2: ElementId) -> CircuitResult<Equivalent> {
        let tol = self.tolerances();
        let a = self.el(e1);
        let b = self.el(e2);

        for element in [a, b] {
            if tol.is_short(element.resistance()) {
                return Err(CircuitError::ShortCircuit {
                    element: element.name().to_string(),
                });
            }
        }
        if tol.is_source(a.emf()) || tol.is_source(b.emf()) {
            return Err(CircuitError::ParallelVoltageConflict {
                left: a.name().to_string(),
                right: b.name().to_string(),
            });
        }

        let resistance = 1.0 / (1.0 / a.resistance() + 1.0 / b.resistance());
        Ok(Equivalent {
            emf: 0.0,
            resistance,
            endpoints: (a.node1(), a.node2()),
            right_reversed: b.node1() != a.node1(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_merge_adds_resistance() {
        let mut circuit = Circuit::new();
        circuit.add_battery("B1", 10.0, "A", "B").unwrap();
        let r1 = circuit.add_resistor("R1", 5.0, "B", "C").unwrap();
        let r2 = circuit.add_resistor("R2", 7.0, "C", "A").unwrap();

        let merged = circuit.merge(r1, r2, Connection::Series).unwrap();
        let element = circuit.el(merged);
        assert_eq!(element.name(), "R1+R2");
        assert_eq!(element.resistance(), 12.0);
        assert_eq!(element.node1(), circuit.node_id("B").unwrap());
        assert_eq!(element.node2(), circuit.node_id("A").unwrap());
        assert_eq!(
            element.merge_record(),
            Some(&MergeRecord {
                left: r1,
                right: r2,
                kind: Connection::Series,
                right_reversed: false,
            })
        );
        // Children leave the network and the shared node empties
        assert_eq!(circuit.active().len(), 2);
        assert_eq!(circuit.node_by_name("C").unwrap().degree(), 0);
    }

    #[test]
    fn test_parallel_merge_halves_equal_resistors() {
        let mut circuit = Circuit::new();
        circuit.add_battery("B1", 10.0, "A", "B").unwrap();
        let r1 = circuit.add_resistor("R1", 10.0, "A", "B").unwrap();
        let r2 = circuit.add_resistor("R2", 10.0, "B", "A").unwrap();

        let merged = circuit.merge(r1, r2, Connection::Parallel).unwrap();
        assert!((circuit.el(merged).resistance() - 5.0).abs() < 1e-12);
        assert_eq!(circuit.el(merged).emf(), 0.0);
    }

    #[test]
    fn test_parallel_merge_rejects_sources() {
        let mut circuit = Circuit::new();
        let b1 = circuit.add_element("B1", 5.0, 1.0, "A", "B").unwrap();
        let r1 = circuit.add_resistor("R1", 10.0, "A", "B").unwrap();
        circuit.add_resistor("R2", 10.0, "A", "B").unwrap();

        assert_eq!(
            circuit.merge(b1, r1, Connection::Parallel),
            Err(CircuitError::ParallelVoltageConflict {
                left: "B1".into(),
                right: "R1".into()
            })
        );
    }

    #[test]
    fn test_series_sources_in_reverse_subtract() {
        let mut circuit = Circuit::new();
        // Both positive terminals meet at B
        let b1 = circuit.add_battery("B1", 5.0, "A", "B").unwrap();
        let b2 = circuit.add_battery("B2", 3.0, "C", "B").unwrap();
        circuit.add_resistor("R1", 1.0, "C", "A").unwrap();

        let merged = circuit.merge(b1, b2, Connection::Series).unwrap();
        let element = circuit.el(merged);
        assert_eq!(element.emf(), 2.0);
        assert_eq!(element.node1(), circuit.node_id("A").unwrap());
        assert_eq!(element.node2(), circuit.node_id("C").unwrap());
        // Leaf sources are not rewritten
        assert_eq!(circuit.el(b2).emf(), 3.0);
    }

    #[test]
    fn test_series_keeps_first_polarity_when_entered_at_negative() {
        let mut circuit = Circuit::new();
        // B1's negative terminal is the shared node
        let b1 = circuit.add_battery("B1", 5.0, "B", "A").unwrap();
        let r1 = circuit.add_resistor("R1", 2.0, "B", "C").unwrap();
        circuit.add_resistor("R2", 1.0, "C", "A").unwrap();

        let merged = circuit.merge(b1, r1, Connection::Series).unwrap();
        let element = circuit.el(merged);
        assert_eq!(element.emf(), 5.0);
        assert_eq!(element.node1(), circuit.node_id("C").unwrap());
        assert_eq!(element.node2(), circuit.node_id("A").unwrap());
    }

    #[test]
    fn test_parallel_records_reversed_branch() {
        let mut circuit = Circuit::new();
        circuit.add_battery("B1", 10.0, "A", "B").unwrap();
        let r1 = circuit.add_resistor("R1", 10.0, "A", "B").unwrap();
        let r2 = circuit.add_resistor("R2", 10.0, "B", "A").unwrap();

        let merged = circuit.merge(r1, r2, Connection::Parallel).unwrap();
        let record = circuit.el(merged).merge_record().copied().unwrap();
        assert!(record.right_reversed);
    }

    #[test]
    fn test_series_records_reversed_source() {
        let mut circuit = Circuit::new();
        let b1 = circuit.add_battery("B1", 5.0, "A", "B").unwrap();
        let b2 = circuit.add_battery("B2", 3.0, "C", "B").unwrap();
        let r1 = circuit.add_resistor("R1", 1.0, "C", "A").unwrap();

        let opposed = circuit.merge(b1, b2, Connection::Series).unwrap();
        assert!(circuit.el(opposed).merge_record().unwrap().right_reversed);
        // Merged element runs A to C, R1 continues C to A
        let looped = circuit.merge(opposed, r1, Connection::Series).unwrap();
        assert!(!circuit.el(looped).merge_record().unwrap().right_reversed);
    }

    #[test]
    fn test_series_flips_source_after_passive() {
        let mut circuit = Circuit::new();
        let r1 = circuit.add_resistor("R1", 2.0, "A", "B").unwrap();
        let b1 = circuit.add_battery("B1", 6.0, "C", "B").unwrap();
        circuit.add_resistor("R2", 1.0, "C", "A").unwrap();

        // A to C crosses B1 from its positive to its negative terminal
        let merged = circuit.merge(r1, b1, Connection::Series).unwrap();
        let element = circuit.el(merged);
        assert_eq!(element.emf(), -6.0);
        assert_eq!(element.node1(), circuit.node_id("A").unwrap());
        assert_eq!(element.node2(), circuit.node_id("C").unwrap());
        assert!(element.merge_record().unwrap().right_reversed);
    }

    #[test]
    fn test_bridge_is_irreducible() {
        let mut circuit = Circuit::new();
        circuit.add_battery("B1", 10.0, "A", "D").unwrap();
        circuit.add_resistor("R1", 1.0, "A", "B").unwrap();
        circuit.add_resistor("R2", 2.0, "A", "C").unwrap();
        circuit.add_resistor("R3", 3.0, "B", "C").unwrap();
        circuit.add_resistor("R4", 4.0, "B", "D").unwrap();
        circuit.add_resistor("R5", 5.0, "C", "D").unwrap();

        assert_eq!(
            circuit.reduce(),
            Err(CircuitError::Irreducible { remaining: 6 })
        );
    }

    #[test]
    fn test_reduce_counts_merges() {
        let mut circuit = Circuit::new();
        circuit.add_battery("B1", 10.0, "A", "B").unwrap();
        circuit.add_resistor("R1", 10.0, "A", "B").unwrap();
        circuit.add_resistor("R2", 10.0, "A", "B").unwrap();

        let reduction = circuit.reduce().unwrap();
        assert_eq!(reduction.merges, 2);
        assert_eq!(circuit.active(), &[reduction.root]);
        assert_eq!(circuit.el(reduction.root).name(), "B1+R1+R2");
    }
}
