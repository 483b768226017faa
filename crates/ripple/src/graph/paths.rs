//! Path finding and path cost over a [`DependencyGraph`].
//!
//! Paths are ordered module sequences including both endpoints. A path walked
//! in [`TraversalDirection::Dependents`] goes from a changed module to the
//! modules that depend on it; in [`TraversalDirection::Dependencies`] it goes
//! from a module to what it depends on.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{Error, Result};
use crate::types::{DependencyStrength, DependencyType, PathType, TraversalDirection};

use super::DependencyGraph;

/// Breadth-first shortest path from `source` to `target`.
///
/// Returns `Some(vec![source])` when the endpoints are equal and `None` when
/// `target` cannot be reached. Direction matters: a path `A -> B` says
/// nothing about `B -> A`.
#[must_use]
pub fn find_path(
    graph: &DependencyGraph<'_>,
    source: &str,
    target: &str,
    direction: TraversalDirection,
) -> Option<Vec<String>> {
    find_path_avoiding(graph, source, target, direction, |_| false)
}

/// Like [`find_path`], but never steps onto a module for which `avoid`
/// returns `true`. The source itself is always allowed.
#[must_use]
pub fn find_path_avoiding<F>(
    graph: &DependencyGraph<'_>,
    source: &str,
    target: &str,
    direction: TraversalDirection,
    avoid: F,
) -> Option<Vec<String>>
where
    F: Fn(&str) -> bool,
{
    if source == target {
        return Some(vec![source.to_string()]);
    }

    let mut parent: HashMap<&str, &str> = HashMap::new();
    let mut visited: HashSet<&str> = HashSet::from([source]);
    let mut queue: VecDeque<&str> = VecDeque::from([source]);

    while let Some(current) = queue.pop_front() {
        for (next, _) in graph.neighbors(current, direction) {
            if avoid(next) || !visited.insert(next) {
                continue;
            }
            parent.insert(next, current);
            if next == target {
                return Some(reconstruct(&parent, source, target));
            }
            queue.push_back(next);
        }
    }

    None
}

fn reconstruct(parent: &HashMap<&str, &str>, source: &str, target: &str) -> Vec<String> {
    let mut path = vec![target.to_string()];
    let mut current = target;
    while current != source {
        match parent.get(current) {
            Some(&prev) => {
                path.push(prev.to_string());
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Sum of strength weights along `path`.
///
/// Parallel edges between the same pair count once, with the strongest
/// weight. A single-node path weighs zero.
///
/// # Errors
///
/// Returns `Error::PathContract` if some consecutive pair has no edge in
/// `graph`, which means the path was not derived from this graph.
pub fn calculate_path_weight(
    graph: &DependencyGraph<'_>,
    path: &[String],
    direction: TraversalDirection,
) -> Result<f64> {
    path.windows(2).try_fold(0.0, |total, pair| {
        let edge = graph
            .edge_between(&pair[0], &pair[1], direction)
            .ok_or_else(|| Error::PathContract {
                from: pair[0].clone(),
                to: pair[1].clone(),
            })?;
        Ok(total + edge.strength.weight())
    })
}

/// Classify a path by shape.
///
/// `in_cycle` reports whether both endpoints sit in one dependency cycle,
/// which makes an otherwise simple path circular.
#[must_use]
pub fn classify_path(path: &[String], in_cycle: bool) -> PathType {
    let mut seen = HashSet::new();
    if in_cycle || !path.iter().all(|node| seen.insert(node.as_str())) {
        return PathType::Circular;
    }
    if path.len() == 2 {
        PathType::Direct
    } else {
        PathType::Transitive
    }
}

/// Edges on `path` whose failure propagates for certain: strong or
/// inheritance edges, formatted `"a -> b"` in path order.
#[must_use]
pub fn critical_edges(
    graph: &DependencyGraph<'_>,
    path: &[String],
    direction: TraversalDirection,
) -> Vec<String> {
    edges_where(graph, path, direction, |strength, dep_type| {
        strength == DependencyStrength::Strong || dep_type == DependencyType::Inherit
    })
}

/// Weak or optional edges on `path`, where the impact chain could be cut.
#[must_use]
pub fn breaking_points(
    graph: &DependencyGraph<'_>,
    path: &[String],
    direction: TraversalDirection,
) -> Vec<String> {
    edges_where(graph, path, direction, |strength, _| {
        strength != DependencyStrength::Strong
    })
}

fn edges_where(
    graph: &DependencyGraph<'_>,
    path: &[String],
    direction: TraversalDirection,
    keep: impl Fn(DependencyStrength, DependencyType) -> bool,
) -> Vec<String> {
    path.windows(2)
        .filter(|pair| {
            graph
                .edge_between(&pair[0], &pair[1], direction)
                .is_some_and(|dep| keep(dep.strength, dep.dep_type))
        })
        .map(|pair| format!("{} -> {}", pair[0], pair[1]))
        .collect()
}

/// Risk score of a path in `[0, 10]`.
///
/// Heavier paths are riskier, longer ones dilute, and the target's own
/// impact score adds to it. Circular paths are amplified by half.
#[must_use]
pub fn path_risk_score(
    total_weight: f64,
    path_length: usize,
    target_score: f64,
    path_type: PathType,
) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let mut score = total_weight - 0.5 * path_length as f64 + 0.3 * target_score;
    if path_type == PathType::Circular {
        score *= 1.5;
    }
    score.clamp(0.0, 10.0)
}
