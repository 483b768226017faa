//! Dependency graph operations for impact analysis.
//!
//! This module provides the graph side of the engine:
//! - Arena-style adjacency over a borrowed `DependencyResult`
//! - Bounded multi-source BFS reachability (who is affected, how far away)
//! - Path finding and path weights ([`paths`])
//! - Cycle detection among affected modules ([`cycles`])
//!
//! ## Design
//!
//! - The caller's edge list is never copied or mutated; the graph stores
//!   references to it in one flat arena
//! - Adjacency is two index lists per module (outgoing and incoming), so both
//!   traversal directions are cheap
//! - A graph is built per analysis call and never shared or cached
//!
//! ## Edge Direction Reminder
//!
//! - Edges point from **dependent -> dependency** (`from` depends on `to`)
//! - `TraversalDirection::Dependents` follows edges backwards: a change to
//!   `core/auth` reaches `api/handlers` when `api/handlers -> core/auth`
//! - `TraversalDirection::Dependencies` follows edges forwards

pub mod cycles;
pub mod paths;

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::trace;

use crate::config::{ExcludeMatcher, ImpactAnalysisConfig};
use crate::types::{Dependency, DependencyResult, DependencyStrength, TraversalDirection};

/// Read-only adjacency view over a dependency snapshot.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph<'a> {
    edges: Vec<&'a Dependency>,
    outgoing: HashMap<&'a str, Vec<usize>>,
    incoming: HashMap<&'a str, Vec<usize>>,
}

/// How a module was reached during traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reach<'a> {
    /// Shortest number of hops from any seed.
    pub distance: usize,
    /// Strongest edge reaching the module at that distance (`None` for seeds).
    pub edge: Option<&'a Dependency>,
}

impl Reach<'_> {
    /// Strength of the reaching edge; seeds count as strong.
    #[must_use]
    pub fn strength(&self) -> DependencyStrength {
        self.edge.map_or(DependencyStrength::Strong, |e| e.strength)
    }

    /// Returns `true` if `other` should replace `self` as the record for a module.
    fn is_improved_by(&self, other: &Reach<'_>) -> bool {
        other.distance < self.distance
            || (other.distance == self.distance && other.strength() > self.strength())
    }
}

impl<'a> DependencyGraph<'a> {
    /// Build the traversal graph for one analysis.
    ///
    /// External edges are dropped unless `include_external_deps` is set.
    /// Weak edges are dropped when `consider_weak_deps` is off; optional
    /// edges are always kept.
    #[must_use]
    pub fn build(result: &'a DependencyResult, config: &ImpactAnalysisConfig) -> Self {
        let graph = Self::from_edges(result.dependencies.iter().filter(|dep| {
            if dep.external && !config.include_external_deps {
                return false;
            }
            config.consider_weak_deps || dep.strength != DependencyStrength::Weak
        }));
        trace!(
            total_edges = result.dependencies.len(),
            kept_edges = graph.edge_count(),
            "Built dependency graph"
        );
        graph
    }

    /// Build a graph over every given edge, without filtering.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = &'a Dependency>,
    {
        let mut graph = Self::default();
        for dep in edges {
            let idx = graph.edges.len();
            graph.edges.push(dep);
            graph.outgoing.entry(dep.from.as_str()).or_default().push(idx);
            graph.incoming.entry(dep.to.as_str()).or_default().push(idx);
        }
        graph
    }

    /// Number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if `module` is an endpoint of any edge.
    #[must_use]
    pub fn contains(&self, module: &str) -> bool {
        self.outgoing.contains_key(module) || self.incoming.contains_key(module)
    }

    /// Neighbors of `module` in the given direction, with the connecting edge.
    pub fn neighbors<'g>(
        &'g self,
        module: &str,
        direction: TraversalDirection,
    ) -> impl Iterator<Item = (&'a str, &'a Dependency)> + 'g {
        let index = match direction {
            TraversalDirection::Dependents => &self.incoming,
            TraversalDirection::Dependencies => &self.outgoing,
        };
        index
            .get(module)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&idx| {
                let dep = self.edges[idx];
                let next = match direction {
                    TraversalDirection::Dependents => dep.from.as_str(),
                    TraversalDirection::Dependencies => dep.to.as_str(),
                };
                (next, dep)
            })
    }

    /// Strongest edge connecting `from` to `to` when walking in `direction`.
    #[must_use]
    pub fn edge_between(
        &self,
        from: &str,
        to: &str,
        direction: TraversalDirection,
    ) -> Option<&'a Dependency> {
        self.neighbors(from, direction)
            .filter(|(next, _)| *next == to)
            .map(|(_, dep)| dep)
            .max_by_key(|dep| dep.strength)
    }

    /// Number of distinct modules that depend on `module`.
    #[must_use]
    pub fn fan_in(&self, module: &str) -> usize {
        self.neighbors(module, TraversalDirection::Dependents)
            .map(|(dependent, _)| dependent)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Bounded multi-source BFS from `seeds`.
    ///
    /// Every seed is reported at distance 0. Other modules are reported with
    /// their shortest distance and the strongest edge reaching them at that
    /// distance. Modules matching `exclude` are neither reported nor
    /// expanded; seeds are never excluded. Modules at `max_depth` are
    /// reported but not expanded.
    ///
    /// Results are in discovery order.
    #[must_use]
    pub fn reachable<S: AsRef<str>>(
        &self,
        seeds: &[S],
        direction: TraversalDirection,
        max_depth: usize,
        exclude: &ExcludeMatcher,
    ) -> Vec<(String, Reach<'a>)> {
        let mut found: Vec<(String, Reach<'a>)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut queue: VecDeque<(String, usize)> = VecDeque::new();

        for seed in seeds {
            let seed = seed.as_ref();
            if index.contains_key(seed) {
                continue;
            }
            index.insert(seed.to_string(), found.len());
            found.push((
                seed.to_string(),
                Reach {
                    distance: 0,
                    edge: None,
                },
            ));
            queue.push_back((seed.to_string(), 0));
        }

        while let Some((current, distance)) = queue.pop_front() {
            if distance >= max_depth {
                continue;
            }
            let candidate_distance = distance + 1;

            for (next, dep) in self.neighbors(&current, direction) {
                let candidate = Reach {
                    distance: candidate_distance,
                    edge: Some(dep),
                };

                if let Some(&slot) = index.get(next) {
                    // Same-level rediscovery can only upgrade the edge; BFS
                    // order guarantees the distance is already minimal.
                    let existing = &mut found[slot].1;
                    if existing.is_improved_by(&candidate) {
                        *existing = candidate;
                    }
                    continue;
                }

                if exclude.is_excluded(next) {
                    trace!(module = next, "Skipping excluded module");
                    continue;
                }

                index.insert(next.to_string(), found.len());
                found.push((next.to_string(), candidate));
                queue.push_back((next.to_string(), candidate_distance));
            }
        }

        found
    }
}

/// Merge reachability results from several traversals.
///
/// Keeps the first-seen order and, per module, the shortest distance
/// (strongest edge on ties).
#[must_use]
pub fn merge_reaches<'a>(
    traversals: impl IntoIterator<Item = Vec<(String, Reach<'a>)>>,
) -> Vec<(String, Reach<'a>)> {
    let mut merged: Vec<(String, Reach<'a>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for traversal in traversals {
        for (module, reach) in traversal {
            match index.get(&module) {
                Some(&slot) => {
                    if merged[slot].1.is_improved_by(&reach) {
                        merged[slot].1 = reach;
                    }
                }
                None => {
                    index.insert(module.clone(), merged.len());
                    merged.push((module, reach));
                }
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DependencyType;

    fn dep(from: &str, to: &str, strength: DependencyStrength) -> Dependency {
        Dependency::new(from, to, DependencyType::Import, strength)
    }

    fn no_excludes() -> ExcludeMatcher {
        ExcludeMatcher::new::<&str>(&[]).expect("empty matcher")
    }

    fn distances(found: &[(String, Reach<'_>)]) -> HashMap<String, usize> {
        found
            .iter()
            .map(|(m, r)| (m.clone(), r.distance))
            .collect()
    }

    #[test]
    fn build_drops_external_edges_by_default() {
        let result = DependencyResult {
            dependencies: vec![
                dep("a", "b", DependencyStrength::Strong),
                dep("a", "github.com/lib/pq", DependencyStrength::Strong).external(),
            ],
            ..DependencyResult::default()
        };

        let graph = DependencyGraph::build(&result, &ImpactAnalysisConfig::default());
        assert_eq!(graph.edge_count(), 1);
        assert!(!graph.contains("github.com/lib/pq"));

        let config = ImpactAnalysisConfig {
            include_external_deps: true,
            ..ImpactAnalysisConfig::default()
        };
        let graph = DependencyGraph::build(&result, &config);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn build_drops_only_weak_edges_when_disabled() {
        let result = DependencyResult {
            dependencies: vec![
                dep("a", "b", DependencyStrength::Strong),
                dep("a", "c", DependencyStrength::Weak),
                dep("a", "d", DependencyStrength::Optional),
            ],
            ..DependencyResult::default()
        };
        let config = ImpactAnalysisConfig {
            consider_weak_deps: false,
            ..ImpactAnalysisConfig::default()
        };

        let graph = DependencyGraph::build(&result, &config);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(
            graph.edge_between("a", "b", TraversalDirection::Dependencies).map(|d| d.strength),
            Some(DependencyStrength::Strong)
        );
        assert!(graph.edge_between("a", "c", TraversalDirection::Dependencies).is_none());
        assert_eq!(
            graph.edge_between("a", "d", TraversalDirection::Dependencies).map(|d| d.strength),
            Some(DependencyStrength::Optional)
        );
    }

    #[test]
    fn build_does_not_touch_caller_edges() {
        let result = DependencyResult {
            dependencies: vec![
                dep("z", "y", DependencyStrength::Weak),
                dep("a", "b", DependencyStrength::Strong),
            ],
            ..DependencyResult::default()
        };
        let before = result.clone();
        let _graph = DependencyGraph::build(&result, &ImpactAnalysisConfig::default());
        assert_eq!(result, before);
    }

    #[test]
    fn reachable_follows_dependents_backwards() {
        // web -> api -> auth -> user
        let edges = [
            dep("web", "api", DependencyStrength::Weak),
            dep("api", "auth", DependencyStrength::Strong),
            dep("auth", "user", DependencyStrength::Strong),
        ];
        let graph = DependencyGraph::from_edges(&edges);

        let found = graph.reachable(
            &["auth"],
            TraversalDirection::Dependents,
            10,
            &no_excludes(),
        );
        let d = distances(&found);
        assert_eq!(d["auth"], 0);
        assert_eq!(d["api"], 1);
        assert_eq!(d["web"], 2);
        assert!(!d.contains_key("user"));
    }

    #[test]
    fn reachable_respects_max_depth() {
        let edges = [
            dep("a", "b", DependencyStrength::Strong),
            dep("b", "c", DependencyStrength::Strong),
            dep("c", "d", DependencyStrength::Strong),
        ];
        let graph = DependencyGraph::from_edges(&edges);

        let found = graph.reachable(&["a"], TraversalDirection::Dependencies, 2, &no_excludes());
        let d = distances(&found);
        assert_eq!(d.get("c"), Some(&2));
        assert!(!d.contains_key("d"));

        let found = graph.reachable(&["a"], TraversalDirection::Dependencies, 0, &no_excludes());
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn reachable_terminates_on_cycles() {
        let edges = [
            dep("a", "b", DependencyStrength::Strong),
            dep("b", "c", DependencyStrength::Strong),
            dep("c", "a", DependencyStrength::Strong),
        ];
        let graph = DependencyGraph::from_edges(&edges);

        let found = graph.reachable(&["a"], TraversalDirection::Dependencies, 100, &no_excludes());
        assert_eq!(found.len(), 3);
        assert_eq!(distances(&found)["a"], 0);
    }

    #[test]
    fn reachable_prefers_stronger_edge_at_same_distance() {
        // Both x and y depend on the seed; z depends on both, weakly on x.
        let edges = [
            dep("x", "seed", DependencyStrength::Strong),
            dep("y", "seed", DependencyStrength::Strong),
            dep("z", "x", DependencyStrength::Weak),
            dep("z", "y", DependencyStrength::Strong),
        ];
        let graph = DependencyGraph::from_edges(&edges);

        let found = graph.reachable(&["seed"], TraversalDirection::Dependents, 5, &no_excludes());
        let (_, z) = found.iter().find(|(m, _)| m == "z").expect("z reached");
        assert_eq!(z.distance, 2);
        assert_eq!(z.strength(), DependencyStrength::Strong);
    }

    #[test]
    fn reachable_skips_excluded_modules_but_keeps_seeds() {
        let edges = [
            dep("mock_api", "core", DependencyStrength::Strong),
            dep("web", "mock_api", DependencyStrength::Strong),
            dep("test_core", "core", DependencyStrength::Strong),
        ];
        let graph = DependencyGraph::from_edges(&edges);
        let exclude = ExcludeMatcher::new(&["mock_*", "test_*"]).expect("valid patterns");

        let found = graph.reachable(&["core", "test_core"], TraversalDirection::Dependents, 5, &exclude);
        let d = distances(&found);
        assert!(d.contains_key("core"));
        assert!(d.contains_key("test_core"));
        assert!(!d.contains_key("mock_api"));
        // Only reachable through the excluded module.
        assert!(!d.contains_key("web"));
    }

    #[test]
    fn fan_in_counts_distinct_dependents() {
        let edges = [
            dep("a", "core", DependencyStrength::Strong),
            dep("a", "core", DependencyStrength::Weak),
            dep("b", "core", DependencyStrength::Strong),
        ];
        let graph = DependencyGraph::from_edges(&edges);
        assert_eq!(graph.fan_in("core"), 2);
        assert_eq!(graph.fan_in("a"), 0);
    }

    #[test]
    fn merge_keeps_shortest_distance() {
        let edges = [
            dep("a", "b", DependencyStrength::Weak),
            dep("c", "b", DependencyStrength::Strong),
        ];
        let first = vec![(
            "b".to_string(),
            Reach {
                distance: 3,
                edge: Some(&edges[0]),
            },
        )];
        let second = vec![(
            "b".to_string(),
            Reach {
                distance: 1,
                edge: Some(&edges[1]),
            },
        )];

        let merged = merge_reaches([first, second]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].1.distance, 1);
        assert_eq!(merged[0].1.strength(), DependencyStrength::Strong);
    }
}
