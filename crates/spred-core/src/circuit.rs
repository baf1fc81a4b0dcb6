//! Topology registry: named nodes, named elements and their incidence.
//!
//! The registry is the only owner of nodes and elements. Both live in arenas
//! (`Vec`s indexed by [`NodeId`] / [`ElementId`]); a name index maps the
//! caller's names onto those ids. During a solve the same structure doubles as
//! the working state of the reduction: the `active` list holds the elements
//! still taking part, and merge-tree elements are appended behind the
//! declared ones.

use std::collections::HashMap;

use serde::Serialize;

use crate::connection::Connection;
use crate::error::{CircuitError, CircuitResult};
use crate::tolerance::Tolerances;
use crate::{ElementId, NodeId};

/// A junction where element terminals meet.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    /// Elements currently incident on this node (order irrelevant)
    incident: Vec<ElementId>,
    /// Cleared when the node is contracted away
    live: bool,
}

impl Node {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            incident: Vec::new(),
            live: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn incident(&self) -> &[ElementId] {
        &self.incident
    }

    /// Number of element terminals attached to this node.
    pub fn degree(&self) -> usize {
        self.incident.len()
    }

    pub fn is_live(&self) -> bool {
        self.live
    }
}

/// How a merge-tree element was formed from its two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRecord {
    pub left: ElementId,
    pub right: ElementId,
    pub kind: Connection,
    /// `right` runs node1 to node2 against the merged element's orientation.
    /// `left` always keeps it.
    pub right_reversed: bool,
}

/// A two-terminal branch: wire, resistor, source, or a merge-tree equivalent.
///
/// `node1` is the negative terminal and `node2` the positive one; the
/// distinction only matters for sources.
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    /// Declared (or combined) EMF
    emf: f64,
    resistance: f64,
    node1: NodeId,
    node2: NodeId,
    current: Option<f64>,
    /// Ohm's-law voltage written by back-substitution for non-sources
    solved_voltage: Option<f64>,
    merge: Option<MergeRecord>,
}

impl Element {
    fn new(name: impl Into<String>, emf: f64, resistance: f64, node1: NodeId, node2: NodeId) -> Self {
        Self {
            name: name.into(),
            emf,
            resistance,
            node1,
            node2,
            current: None,
            solved_voltage: None,
            merge: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Voltage across the element: the EMF for sources, the solved drop otherwise.
    pub fn voltage(&self) -> f64 {
        self.solved_voltage.unwrap_or(self.emf)
    }

    /// Declared EMF, independent of any solution.
    pub fn emf(&self) -> f64 {
        self.emf
    }

    /// Signed current, `None` until a solve determines it.
    pub fn current(&self) -> Option<f64> {
        self.current
    }

    pub fn resistance(&self) -> f64 {
        self.resistance
    }

    /// Negative terminal.
    pub fn node1(&self) -> NodeId {
        self.node1
    }

    /// Positive terminal.
    pub fn node2(&self) -> NodeId {
        self.node2
    }

    pub fn is_leaf(&self) -> bool {
        self.merge.is_none()
    }

    pub fn merge_record(&self) -> Option<&MergeRecord> {
        self.merge.as_ref()
    }

    pub(crate) fn set_current(&mut self, current: f64) {
        self.current = Some(current);
    }

    pub(crate) fn set_solved_voltage(&mut self, voltage: f64) {
        self.solved_voltage = Some(voltage);
    }

    fn clear_solution(&mut self) {
        self.current = None;
        self.solved_voltage = None;
    }
}

/// Element category as seen by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Wire,
    Resistor,
    Battery,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Wire => "wire",
            ElementKind::Resistor => "resistor",
            ElementKind::Battery => "battery",
        }
    }
}

/// One row of solved output, with endpoint names resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementReport {
    pub name: String,
    pub kind: ElementKind,
    pub voltage: f64,
    pub current: Option<f64>,
    pub resistance: f64,
    pub negative: String,
    pub positive: String,
}

/// A DC circuit: node and element arenas plus the name indexes over them.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    nodes: Vec<Node>,
    elements: Vec<Element>,
    /// Elements taking part in the network, in declaration/merge order
    active: Vec<ElementId>,
    node_names: HashMap<String, NodeId>,
    element_names: HashMap<String, ElementId>,
    tolerances: Tolerances,
    solved: bool,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerances(tolerances: Tolerances) -> Self {
        Self {
            tolerances,
            ..Self::default()
        }
    }

    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    pub fn set_tolerances(&mut self, tolerances: Tolerances) {
        self.tolerances = tolerances;
        self.clear_solution();
    }

    // =========================================================================
    // Declaration
    // =========================================================================

    pub fn add_wire(
        &mut self,
        name: &str,
        negative_node: &str,
        positive_node: &str,
    ) -> CircuitResult<ElementId> {
        self.add_element(name, 0.0, 0.0, negative_node, positive_node)
    }

    pub fn add_resistor(
        &mut self,
        name: &str,
        resistance: f64,
        negative_node: &str,
        positive_node: &str,
    ) -> CircuitResult<ElementId> {
        self.add_element(name, 0.0, resistance, negative_node, positive_node)
    }

    pub fn add_battery(
        &mut self,
        name: &str,
        voltage: f64,
        negative_node: &str,
        positive_node: &str,
    ) -> CircuitResult<ElementId> {
        self.add_element(name, voltage, 0.0, negative_node, positive_node)
    }

    /// Declare an element with both an EMF and a resistance.
    ///
    /// Any previous solution is discarded, since it no longer describes the
    /// network.
    pub fn add_element(
        &mut self,
        name: &str,
        voltage: f64,
        resistance: f64,
        negative_node: &str,
        positive_node: &str,
    ) -> CircuitResult<ElementId> {
        if self.element_names.contains_key(name) {
            return Err(CircuitError::DuplicateName(name.to_string()));
        }
        if negative_node == positive_node {
            return Err(CircuitError::SelfLoop {
                element: name.to_string(),
                node: negative_node.to_string(),
            });
        }
        if !voltage.is_finite() {
            return Err(CircuitError::InvalidValue {
                element: name.to_string(),
                quantity: "voltage",
                value: voltage,
            });
        }
        if !resistance.is_finite() || resistance < 0.0 {
            return Err(CircuitError::InvalidValue {
                element: name.to_string(),
                quantity: "resistance",
                value: resistance,
            });
        }

        let node1 = self.node_or_create(negative_node);
        let node2 = self.node_or_create(positive_node);
        let id = self.push_element(Element::new(name, voltage, resistance, node1, node2));
        self.element_names.insert(name.to_string(), id);
        self.clear_solution();
        Ok(id)
    }

    fn node_or_create(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.node_names.get(name) {
            return id;
        }
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(name));
        self.node_names.insert(name.to_string(), id);
        id
    }

    fn clear_solution(&mut self) {
        for element in &mut self.elements {
            element.clear_solution();
        }
        self.solved = false;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.value())
    }

    pub fn element_id(&self, name: &str) -> Option<ElementId> {
        self.element_names.get(name).copied()
    }

    pub fn element_by_name(&self, name: &str) -> Option<&Element> {
        self.element_id(name).and_then(|id| self.element(id))
    }

    /// Declared elements in declaration order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.is_leaf())
    }

    pub fn element_count(&self) -> usize {
        self.element_names.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.value())
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.node_names.get(name).copied()
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.node_id(name).and_then(|id| self.node(id))
    }

    /// Nodes still present (contracted nodes are skipped).
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_live())
            .map(|(i, node)| (NodeId::new(i), node))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_live()).count()
    }

    /// Names of the negative and positive terminal nodes.
    pub fn endpoint_names(&self, id: ElementId) -> Option<(&str, &str)> {
        let element = self.element(id)?;
        Some((
            self.node(element.node1)?.name(),
            self.node(element.node2)?.name(),
        ))
    }

    pub fn kind(&self, element: &Element) -> ElementKind {
        if self.tolerances.is_source(element.emf) {
            ElementKind::Battery
        } else if self.tolerances.is_short(element.resistance) {
            ElementKind::Wire
        } else {
            ElementKind::Resistor
        }
    }

    /// True after a successful solve, until the circuit is modified.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Per-element rows in declaration order.
    pub fn element_report(&self) -> Vec<ElementReport> {
        self.elements
            .iter()
            .filter(|e| e.is_leaf())
            .map(|element| ElementReport {
                name: element.name.clone(),
                kind: self.kind(element),
                voltage: element.voltage(),
                current: element.current,
                resistance: element.resistance,
                negative: self.nodes[element.node1.value()].name.clone(),
                positive: self.nodes[element.node2.value()].name.clone(),
            })
            .collect()
    }

    // =========================================================================
    // Working-state operations used by the solve pipeline
    // =========================================================================

    pub(crate) fn el(&self, id: ElementId) -> &Element {
        &self.elements[id.value()]
    }

    pub(crate) fn el_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.value()]
    }

    pub(crate) fn nd(&self, id: NodeId) -> &Node {
        &self.nodes[id.value()]
    }

    pub(crate) fn active(&self) -> &[ElementId] {
        &self.active
    }

    pub(crate) fn is_source(&self, id: ElementId) -> bool {
        self.tolerances.is_source(self.el(id).emf)
    }

    pub(crate) fn is_wire(&self, id: ElementId) -> bool {
        let element = self.el(id);
        self.tolerances.is_wire(element.emf, element.resistance)
    }

    /// Add an element to the arena, the active list and both endpoint nodes.
    fn push_element(&mut self, element: Element) -> ElementId {
        let id = ElementId::new(self.elements.len());
        self.elements.push(element);
        self.attach(id);
        self.active.push(id);
        id
    }

    /// Append a merge-tree element; it is not entered into the name index.
    pub(crate) fn push_merged(
        &mut self,
        name: String,
        emf: f64,
        resistance: f64,
        endpoints: (NodeId, NodeId),
        record: MergeRecord,
    ) -> ElementId {
        let mut element = Element::new(name, emf, resistance, endpoints.0, endpoints.1);
        element.merge = Some(record);
        self.push_element(element)
    }

    /// Register an element on its endpoint nodes.
    pub(crate) fn attach(&mut self, id: ElementId) {
        let (node1, node2) = {
            let element = self.el(id);
            (element.node1, element.node2)
        };
        self.nodes[node1.value()].incident.push(id);
        self.nodes[node2.value()].incident.push(id);
    }

    /// Remove an element from its endpoint nodes (one entry per terminal).
    pub(crate) fn detach(&mut self, id: ElementId) {
        let (node1, node2) = {
            let element = self.el(id);
            (element.node1, element.node2)
        };
        for node in [node1, node2] {
            let incident = &mut self.nodes[node.value()].incident;
            if let Some(pos) = incident.iter().position(|&e| e == id) {
                incident.swap_remove(pos);
            }
        }
    }

    pub(crate) fn activate(&mut self, id: ElementId) {
        if !self.active.contains(&id) {
            self.active.push(id);
        }
    }

    pub(crate) fn deactivate(&mut self, id: ElementId) {
        self.active.retain(|&e| e != id);
    }

    /// Move every terminal of `id` sitting on `from` over to `to`.
    pub(crate) fn rebind(&mut self, id: ElementId, from: NodeId, to: NodeId) {
        let element = self.el_mut(id);
        if element.node1 == from {
            element.node1 = to;
        } else if element.node2 == from {
            element.node2 = to;
        }
        let incident = &mut self.nodes[from.value()].incident;
        if let Some(pos) = incident.iter().position(|&e| e == id) {
            incident.swap_remove(pos);
        }
        self.nodes[to.value()].incident.push(id);
    }

    /// Drop a node that has been contracted into another one.
    pub(crate) fn remove_node(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.value()];
        node.live = false;
        self.node_names.remove(&node.name);
    }

    /// Copy the solution of a working copy back onto the declared elements.
    pub(crate) fn commit_solution(&mut self, working: &Circuit) {
        for (element, solved) in self.elements.iter_mut().zip(&working.elements) {
            element.current = solved.current;
            element.solved_voltage = solved.solved_voltage;
        }
        self.solved = true;
    }
}
