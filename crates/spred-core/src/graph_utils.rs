use crate::circuit::Circuit;
use crate::{ElementId, NodeId};
use petgraph::algo::connected_components as count_components;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Undirected multigraph view of a circuit: node weights are node names,
/// edge weights are the ids of the active elements joining them.
pub fn to_graph(circuit: &Circuit) -> UnGraph<String, ElementId> {
    let mut graph = UnGraph::new_undirected();
    let mut index: HashMap<NodeId, NodeIndex> = HashMap::new();
    for (id, node) in circuit.nodes() {
        index.insert(id, graph.add_node(node.name().to_string()));
    }
    for &id in circuit.active() {
        let element = circuit.el(id);
        if let (Some(&a), Some(&b)) = (index.get(&element.node1()), index.get(&element.node2())) {
            graph.add_edge(a, b, id);
        }
    }
    graph
}

/// Number of connected components. Nodes only exist while elements touch them,
/// so isolated nodes never inflate the count.
pub fn connected_components(circuit: &Circuit) -> usize {
    count_components(&to_graph(circuit))
}

/// Render the circuit as a Graphviz `graph`, one labelled edge per element.
pub fn export_dot(circuit: &Circuit) -> String {
    let graph = to_graph(circuit);
    let mut buffer = String::new();
    buffer.push_str("graph circuit {\n");
    for node in graph.node_indices() {
        let label = sanitize_label(&graph[node]);
        buffer.push_str(&format!("  n{} [label=\"{}\"];\n", node.index(), label));
    }
    for edge in graph.edge_references() {
        let source = edge.source().index();
        let target = edge.target().index();
        let element = circuit.el(*edge.weight());
        let label = sanitize_label(element.name());
        buffer.push_str(&format!("  n{source} -- n{target} [label=\"{label}\"];\n"));
    }
    buffer.push('}');
    buffer
}

fn sanitize_label(label: &str) -> String {
    label.replace('"', "\\\"")
}
