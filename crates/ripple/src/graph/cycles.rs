//! Dependency cycle detection among affected modules using petgraph.

use std::collections::{HashMap, HashSet};

use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};

use super::DependencyGraph;
use crate::types::TraversalDirection;

/// Strongly connected components of the subgraph induced by `modules`.
///
/// Only real cycles are returned: components with more than one module, or
/// a single module with an edge to itself. Each cycle is sorted, and the
/// list is sorted, so results are deterministic.
#[must_use]
pub fn find_cycles<S: AsRef<str>>(graph: &DependencyGraph<'_>, modules: &[S]) -> Vec<Vec<String>> {
    let members: HashSet<&str> = modules.iter().map(|m| m.as_ref()).collect();

    let mut subgraph: DiGraph<&str, ()> = DiGraph::new();
    let mut node_map: HashMap<&str, NodeIndex> = HashMap::new();
    for module in modules {
        let module = module.as_ref();
        node_map
            .entry(module)
            .or_insert_with(|| subgraph.add_node(module));
    }

    let mut self_loops: HashSet<NodeIndex> = HashSet::new();
    for (module, &from) in &node_map {
        for (next, _) in graph.neighbors(module, TraversalDirection::Dependencies) {
            if !members.contains(next) {
                continue;
            }
            let to = node_map[next];
            if from == to {
                self_loops.insert(from);
            }
            subgraph.update_edge(from, to, ());
        }
    }

    let mut cycles: Vec<Vec<String>> = algo::tarjan_scc(&subgraph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || scc.iter().any(|n| self_loops.contains(n)))
        .map(|scc| {
            let mut cycle: Vec<String> = scc.iter().map(|&n| subgraph[n].to_string()).collect();
            cycle.sort();
            cycle
        })
        .collect();
    cycles.sort();
    cycles
}

/// Returns `true` if `a` and `b` belong to the same cycle.
#[must_use]
pub fn share_cycle(cycles: &[Vec<String>], a: &str, b: &str) -> bool {
    cycles
        .iter()
        .any(|cycle| cycle.iter().any(|m| m == a) && cycle.iter().any(|m| m == b))
}
