//! # spred-core: Series/Parallel Reduction for DC Networks
//!
//! Computes steady-state current and voltage for resistive DC circuits made of
//! wires, resistors and ideal voltage sources connecting named nodes.
//!
//! ## Design Philosophy
//!
//! The circuit is reduced, not solved as a linear system:
//! - **Wires** are contracted by fusing their two endpoint nodes
//! - **Series / parallel pairs** are merged into one equivalent element, and
//!   each merge is recorded as a node of a binary merge tree
//! - The last remaining element gives the loop current by Ohm's law, which is
//!   pushed back down the merge tree to every declared element
//!
//! Networks that need full mesh/nodal analysis (bridges) are rejected with
//! [`CircuitError::Irreducible`].
//!
//! ## Quick Start
//!
//! ```rust
//! use spred_core::Circuit;
//!
//! let mut circuit = Circuit::new();
//! circuit.add_battery("B1", 10.0, "A", "B").unwrap();
//! circuit.add_resistor("R1", 5.0, "B", "C").unwrap();
//! circuit.add_resistor("R2", 5.0, "C", "A").unwrap();
//!
//! let report = circuit.solve().unwrap();
//! assert!((report.source_current - 1.0).abs() < 1e-9);
//!
//! let r1 = circuit.element_by_name("R1").unwrap();
//! assert!((r1.voltage() - 5.0).abs() < 1e-9);
//! ```
//!
//! ## Storage
//!
//! Nodes and elements live in arenas owned by [`Circuit`] and are addressed
//! by the [`NodeId`] / [`ElementId`] newtypes. Merge-tree elements refer to
//! their children by id, so contraction and restoration never leave dangling
//! references.
//!
//! ## Modules
//!
//! - [`circuit`] - Topology registry (nodes, elements, declaration)
//! - [`connection`] - Series/parallel classification of element pairs
//! - [`validate`] - Pre-flight checks
//! - [`contract`] - Wire elimination
//! - [`reduce`] - Pairwise merging into a merge tree
//! - [`substitute`] - Current distribution back down the merge tree
//! - [`solve`] - Transactional solve pipeline
//! - [`graph_utils`] - petgraph view, connectivity and DOT export
//! - [`netlist`] - serde circuit description

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod circuit;
pub mod connection;
pub mod contract;
pub mod error;
pub mod graph_utils;
pub mod netlist;
pub mod reduce;
pub mod solve;
pub mod substitute;
pub mod tolerance;
pub mod validate;

pub use circuit::{Circuit, Element, ElementKind, ElementReport, Node};
pub use connection::Connection;
pub use error::{CircuitError, CircuitResult};
pub use netlist::{ElementSpec, Netlist};
pub use solve::SolveReport;
pub use tolerance::Tolerances;

// Newtype wrappers for arena indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(usize);

impl NodeId {
    #[inline]
    pub fn new(value: usize) -> Self {
        NodeId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl ElementId {
    #[inline]
    pub fn new(value: usize) -> Self {
        ElementId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node#{}", self.0)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Element#{}", self.0)
    }
}
