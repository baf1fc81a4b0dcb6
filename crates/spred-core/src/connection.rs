//! Series/parallel classification of element pairs.

use crate::circuit::Circuit;
use crate::{ElementId, NodeId};

/// How two elements relate through their shared nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connection {
    /// Not directly reducible
    #[default]
    None,
    /// Exactly one shared node, and nothing else attached to it
    Series,
    /// Both endpoints shared
    Parallel,
}

impl Connection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connection::None => "none",
            Connection::Series => "series",
            Connection::Parallel => "parallel",
        }
    }
}

/// Which terminals of the two elements coincide on a shared node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Coincidence {
    pub node: NodeId,
    /// The shared node is the first element's `node1`
    pub first_at_node1: bool,
    /// The shared node is the second element's `node1`
    pub second_at_node1: bool,
}

impl Coincidence {
    /// Both elements meet the shared node with the same terminal polarity.
    pub fn same_polarity(&self) -> bool {
        self.first_at_node1 == self.second_at_node1
    }
}

/// Terminal coincidences between two elements, checked in the fixed order
/// node1–node1, node2–node2, node1–node2, node2–node1.
pub(crate) fn coincidences(circuit: &Circuit, e1: ElementId, e2: ElementId) -> Vec<Coincidence> {
    let a = circuit.el(e1);
    let b = circuit.el(e2);
    let pairs = [
        (a.node1(), b.node1(), true, true),
        (a.node2(), b.node2(), false, false),
        (a.node1(), b.node2(), true, false),
        (a.node2(), b.node1(), false, true),
    ];
    pairs
        .into_iter()
        .filter(|(x, y, _, _)| x == y)
        .map(|(node, _, first_at_node1, second_at_node1)| Coincidence {
            node,
            first_at_node1,
            second_at_node1,
        })
        .collect()
}

impl Circuit {
    /// Classify two active elements.
    ///
    /// When only two elements remain they are always treated as series: they
    /// form the whole loop, so combining them end to end is the last step.
    pub fn connection(&self, e1: ElementId, e2: ElementId) -> Connection {
        if self.active().len() == 2 {
            return Connection::Series;
        }

        let shared = coincidences(self, e1, e2);
        match shared.as_slice() {
            [only] if self.nd(only.node).degree() == 2 => Connection::Series,
            [_, _] => Connection::Parallel,
            _ => Connection::None,
        }
    }
}
