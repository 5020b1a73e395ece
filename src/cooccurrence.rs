use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

use crate::mineral_network::Registro;

/// Co-occurrence graph: nodes are column values, an edge weight counts the
/// groups in which both endpoints appear together.
pub type CooccurrenceGraph = UnGraph<String, u32>;

/// Group records by one column and connect every pair of distinct values of
/// the other column that appear in the same group, incrementing the edge
/// weight once per shared group.
///
/// Values that never share a group with another value end up with no node.
pub fn cooccurrence_graph<'a, G, E>(
    registros: &'a [Registro],
    group_by: G,
    entity: E,
) -> CooccurrenceGraph
where
    G: Fn(&'a Registro) -> &'a str,
    E: Fn(&'a Registro) -> &'a str,
{
    // Groups are processed in first-appearance order so node indices do not
    // depend on hash iteration order.
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&str>> = HashMap::new();

    for registro in registros {
        let key = group_by(registro);
        let members = groups.entry(key).or_insert_with(|| {
            order.push(key);
            Vec::new()
        });
        let value = entity(registro);
        if !members.contains(&value) {
            members.push(value);
        }
    }

    let mut graph: CooccurrenceGraph = UnGraph::new_undirected();
    let mut indices: HashMap<&str, NodeIndex> = HashMap::new();

    for key in order {
        let members = &groups[key];
        for i in 0..members.len() {
            for j in i + 1..members.len() {
                let node1 = *indices
                    .entry(members[i])
                    .or_insert_with(|| graph.add_node(members[i].to_string()));
                let node2 = *indices
                    .entry(members[j])
                    .or_insert_with(|| graph.add_node(members[j].to_string()));

                if graph.contains_edge(node1, node2) {
                    let edge = graph.find_edge(node1, node2).unwrap();
                    let weight = graph.edge_weight_mut(edge).unwrap();
                    *weight += 1;
                } else {
                    graph.add_edge(node1, node2, 1);
                }
            }
        }
    }

    graph
}
