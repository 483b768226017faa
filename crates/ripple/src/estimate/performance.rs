//! Performance impact heuristic.
//!
//! Flags affected modules that look performance sensitive (by path keyword)
//! and modules likely to sit on hot paths: widely depended-on modules close
//! to the change, and high-risk modules near it.

use crate::change_set::remove_duplicates;
use crate::graph::DependencyGraph;
use crate::types::{AffectedModule, Effort, PerformanceImpact, RiskLevel};

/// Path keywords that suggest a performance-sensitive component.
const PERFORMANCE_KEYWORDS: &[&str] = &[
    "cache", "database", "network", "query", "index", "memory", "algorithm",
];

/// Dependents needed for a near-change module to count as a hot spot.
const HOT_FAN_IN: usize = 3;

/// Build the performance sub-report.
#[must_use]
pub fn analyze_performance_impact(
    graph: &DependencyGraph<'_>,
    affected: &[AffectedModule],
) -> PerformanceImpact {
    let mut components = Vec::new();
    let mut benchmarks = Vec::new();
    let mut bottlenecks = Vec::new();

    for module in affected {
        let lowered = module.module_path.to_lowercase();
        if PERFORMANCE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            components.push(module.module_path.clone());
            benchmarks.push(format!("Benchmark {} performance", module.module_path));
        }

        if is_bottleneck(graph, module) {
            bottlenecks.push(module.module_path.clone());
        }
    }

    let components = remove_duplicates(components);
    let bottlenecks = remove_duplicates(bottlenecks);
    let performance_risk = if components.len() > 5 || bottlenecks.len() > 3 {
        Effort::High
    } else if components.len() > 2 || bottlenecks.len() > 1 {
        Effort::Medium
    } else {
        Effort::Low
    };

    PerformanceImpact {
        affected_components: components,
        performance_risk,
        recommended_benchmarks: remove_duplicates(benchmarks),
        potential_bottlenecks: bottlenecks,
    }
}

fn is_bottleneck(graph: &DependencyGraph<'_>, module: &AffectedModule) -> bool {
    let hot_spot =
        module.distance_from_change <= 1 && graph.fan_in(&module.module_path) >= HOT_FAN_IN;
    let risky_core = module.risk_level == RiskLevel::High && module.distance_from_change <= 2;
    hot_spot || risky_core
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Dependency, DependencyStrength, DependencyType};

    fn module(path: &str, distance: usize, risk: RiskLevel) -> AffectedModule {
        AffectedModule {
            module_path: path.to_string(),
            language: "go".to_string(),
            distance_from_change: distance,
            dependency_strength: DependencyStrength::Strong,
            dependency_type: None,
            test_coverage: 0.5,
            impact_score: 1.0,
            risk_level: risk,
            impact_types: Vec::new(),
            reason_for_impact: String::new(),
            affected_features: Vec::new(),
        }
    }

    fn dep(from: &str, to: &str) -> Dependency {
        Dependency::new(from, to, DependencyType::Import, DependencyStrength::Strong)
    }

    #[test]
    fn keyword_modules_get_benchmarks() {
        let graph = DependencyGraph::from_edges(&[]);
        let affected = vec![
            module("storage/Cache", 3, RiskLevel::Low),
            module("web/ui", 3, RiskLevel::Low),
        ];

        let impact = analyze_performance_impact(&graph, &affected);
        assert_eq!(impact.affected_components, vec!["storage/Cache"]);
        assert_eq!(impact.recommended_benchmarks, vec!["Benchmark storage/Cache performance"]);
        assert!(impact.potential_bottlenecks.is_empty());
        assert_eq!(impact.performance_risk, Effort::Low);
    }

    #[test]
    fn high_fan_in_near_change_is_a_bottleneck() {
        let edges = vec![dep("a", "core"), dep("b", "core"), dep("c", "core"), dep("a", "far")];
        let graph = DependencyGraph::from_edges(&edges);
        let affected = vec![
            module("core", 0, RiskLevel::Medium),
            module("far", 3, RiskLevel::Medium),
        ];

        let impact = analyze_performance_impact(&graph, &affected);
        assert_eq!(impact.potential_bottlenecks, vec!["core"]);
    }

    #[test]
    fn risk_grows_with_bottlenecks() {
        let graph = DependencyGraph::from_edges(&[]);
        let affected: Vec<_> = (0..4)
            .map(|i| module(&format!("svc/m{i}"), 1, RiskLevel::High))
            .collect();

        let impact = analyze_performance_impact(&graph, &affected);
        assert_eq!(impact.potential_bottlenecks.len(), 4);
        assert_eq!(impact.performance_risk, Effort::High);

        let impact = analyze_performance_impact(&graph, &affected[..2]);
        assert_eq!(impact.performance_risk, Effort::Medium);
    }
}
