//! The impact analyzer: validates inputs and runs the analysis pipeline.
//!
//! ```text
//! validate → graph → reachability → scoring → paths → cycles
//!          → risk → test impact → performance → summary → recommendations
//! ```
//!
//! Every call builds its own graph and report. The analyzer holds only the
//! immutable configuration and the compiled exclude patterns, so one
//! analyzer can serve concurrent calls.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::change_set::remove_duplicates;
use crate::config::{ExcludeMatcher, ImpactAnalysisConfig};
use crate::error::{Error, Result};
use crate::estimate::{analyze_performance_impact, analyze_test_impact};
use crate::graph::cycles::{find_cycles, share_cycle};
use crate::graph::paths::{
    breaking_points, calculate_path_weight, classify_path, critical_edges, find_path_avoiding,
    path_risk_score,
};
use crate::graph::{DependencyGraph, Reach, merge_reaches};
use crate::report::{generate_impact_summary, generate_mitigation_strategies, generate_recommendations};
use crate::risk::assess_risks;
use crate::scoring::{
    TagContext, calculate_impact_score, determine_impact_types, identify_affected_features,
    reason_for_impact, sort_by_impact,
};
use crate::types::{
    AffectedModule, ChangeSet, DependencyResult, ImpactPath, ImpactReport, TraversalDirection,
};

/// Supplies test coverage ratios for modules.
pub trait CoverageSource {
    /// Coverage ratio of `module` in `[0, 1]`, if known.
    fn coverage(&self, module: &str) -> Option<f64>;
}

impl CoverageSource for HashMap<String, f64> {
    fn coverage(&self, module: &str) -> Option<f64> {
        self.get(module).copied()
    }
}

/// No coverage data; every module counts as untested.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCoverage;

impl CoverageSource for NoCoverage {
    fn coverage(&self, _module: &str) -> Option<f64> {
        None
    }
}

/// Coverage assumed for modules the coverage source does not know.
pub const DEFAULT_COVERAGE: f64 = 0.0;

/// Change impact analyzer.
#[derive(Debug, Clone)]
pub struct ImpactAnalyzer {
    config: ImpactAnalysisConfig,
    exclude: ExcludeMatcher,
}

impl ImpactAnalyzer {
    /// Create an analyzer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration fails validation.
    pub fn new(config: ImpactAnalysisConfig) -> Result<Self> {
        config.validate()?;
        let exclude = ExcludeMatcher::new(&config.exclude_patterns)?;
        Ok(Self { config, exclude })
    }

    /// The analyzer's configuration.
    #[must_use]
    pub fn config(&self) -> &ImpactAnalysisConfig {
        &self.config
    }

    /// Returns `true` if `module_path` matches an exclude pattern.
    ///
    /// Patterns are tried in configuration order; the first match wins.
    #[must_use]
    pub fn should_exclude_module(&self, module_path: &str) -> bool {
        self.exclude.matching_pattern(module_path).is_some()
    }

    /// Analyze a change without coverage data.
    ///
    /// # Errors
    ///
    /// See [`ImpactAnalyzer::analyze_impact_with_coverage`].
    pub fn analyze_impact(
        &self,
        change_set: &ChangeSet,
        dependencies: &DependencyResult,
    ) -> Result<ImpactReport> {
        self.analyze_impact_with_coverage(change_set, dependencies, &NoCoverage)
    }

    /// Analyze a change, reading module coverage from `coverage`.
    ///
    /// An empty affected set is a successful, empty report.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidInput` if the change set has no modules, the
    ///   dependency snapshot is empty, or a changed module is missing from
    ///   the snapshot's module metadata
    /// - `Error::PathContract` if path tracing produced a path the graph
    ///   cannot weigh, which indicates a bug
    pub fn analyze_impact_with_coverage(
        &self,
        change_set: &ChangeSet,
        dependencies: &DependencyResult,
        coverage: &dyn CoverageSource,
    ) -> Result<ImpactReport> {
        validate_inputs(change_set, dependencies)?;
        info!(
            change_set = %change_set.id,
            changed_modules = change_set.changed_modules.len(),
            change_type = %change_set.change_type,
            "Starting impact analysis"
        );

        let graph = DependencyGraph::build(dependencies, &self.config);
        let seeds = remove_duplicates(change_set.changed_modules.iter().map(String::as_str));

        let reached = merge_reaches([
            graph.reachable(&seeds, TraversalDirection::Dependents, self.config.max_depth, &self.exclude),
            graph.reachable(&seeds, TraversalDirection::Dependencies, self.config.max_depth, &self.exclude),
        ]);
        debug!(reached = reached.len(), "Traversed dependency graph");

        let mut affected = self.score_modules(change_set, dependencies, &reached, coverage);
        sort_by_impact(&mut affected);
        debug!(affected = affected.len(), "Scored affected modules");

        let module_names: Vec<&str> = affected.iter().map(|m| m.module_path.as_str()).collect();
        let cycles = find_cycles(&graph, &module_names);
        if !cycles.is_empty() {
            debug!(cycles = cycles.len(), "Found dependency cycles among affected modules");
        }

        let impact_paths = self.trace_impact_paths(&graph, &seeds, &affected, &cycles)?;
        debug!(paths = impact_paths.len(), "Traced impact paths");

        let risk_assessment = assess_risks(
            change_set,
            &affected,
            &impact_paths,
            cycles,
            &self.config.risk_levels,
        );

        let test_impact = self
            .config
            .analyze_test_impact
            .then(|| analyze_test_impact(change_set, &affected));

        let full_graph = DependencyGraph::from_edges(&dependencies.dependencies);
        let performance_impact = analyze_performance_impact(&full_graph, &affected);

        let summary = generate_impact_summary(&affected, &impact_paths, &risk_assessment);
        let recommendations = generate_recommendations(change_set, &affected, &risk_assessment);
        let mitigation_strategies = generate_mitigation_strategies(&risk_assessment, &affected);

        info!(
            change_set = %change_set.id,
            affected = summary.total_affected_modules,
            paths = summary.total_impact_paths,
            overall_risk = %summary.overall_risk_level,
            "Impact analysis complete"
        );

        Ok(ImpactReport {
            change_set: change_set.clone(),
            summary,
            affected_modules: affected,
            impact_paths,
            risk_assessment,
            test_impact,
            performance_impact,
            recommendations,
            mitigation_strategies,
            generated_at: Utc::now(),
        })
    }

    fn score_modules(
        &self,
        change_set: &ChangeSet,
        dependencies: &DependencyResult,
        reached: &[(String, Reach<'_>)],
        coverage: &dyn CoverageSource,
    ) -> Vec<AffectedModule> {
        reached
            .iter()
            .filter_map(|(module, reach)| {
                let test_coverage = coverage_for(coverage, module);
                let strength = reach.strength();
                let impact_score = calculate_impact_score(reach.distance, strength, test_coverage);

                if !change_set.touches(module) && impact_score < self.config.impact_threshold {
                    debug!(module = %module, impact_score, "Below impact threshold");
                    return None;
                }

                let language = dependencies
                    .language_of(module)
                    .or_else(|| reach.edge.map(|e| e.language.as_str()).filter(|l| !l.is_empty()))
                    .unwrap_or_default()
                    .to_string();
                let dependency_type = reach.edge.map(|e| e.dep_type);

                Some(AffectedModule {
                    impact_types: determine_impact_types(&TagContext {
                        distance: reach.distance,
                        dependency_type,
                        change_type: change_set.change_type,
                    }),
                    reason_for_impact: reason_for_impact(
                        reach.distance,
                        strength,
                        change_set.change_type,
                    ),
                    affected_features: identify_affected_features(module, &language),
                    risk_level: self.config.risk_levels.classify(impact_score),
                    module_path: module.clone(),
                    language,
                    distance_from_change: reach.distance,
                    dependency_strength: strength,
                    dependency_type,
                    test_coverage,
                    impact_score,
                })
            })
            .collect()
    }

    /// One representative path from each changed module to each reached
    /// module, capped at `max_impact_paths`, highest risk first.
    fn trace_impact_paths(
        &self,
        graph: &DependencyGraph<'_>,
        seeds: &[&str],
        affected: &[AffectedModule],
        cycles: &[Vec<String>],
    ) -> Result<Vec<ImpactPath>> {
        let mut paths = Vec::new();

        'sources: for &source in seeds {
            for target in affected.iter().filter(|m| !m.is_direct()) {
                if paths.len() >= self.config.max_impact_paths {
                    debug!(cap = self.config.max_impact_paths, "Impact path cap reached");
                    break 'sources;
                }

                let Some((path, direction)) = [
                    TraversalDirection::Dependents,
                    TraversalDirection::Dependencies,
                ]
                .into_iter()
                .find_map(|d| {
                    find_path_avoiding(graph, source, &target.module_path, d, |m| {
                        self.exclude.is_excluded(m)
                    })
                    .map(|p| (p, d))
                })
                else {
                    continue;
                };

                let total_weight = calculate_path_weight(graph, &path, direction)?;
                let path_length = path.len() - 1;
                let path_type =
                    classify_path(&path, share_cycle(cycles, source, &target.module_path));

                paths.push(ImpactPath {
                    id: format!("path_{}", paths.len() + 1),
                    source_module: source.to_string(),
                    target_module: target.module_path.clone(),
                    path_length,
                    total_weight,
                    risk_score: path_risk_score(
                        total_weight,
                        path_length,
                        target.impact_score,
                        path_type,
                    ),
                    path_type,
                    direction,
                    critical_edges: critical_edges(graph, &path, direction),
                    breaking_points: breaking_points(graph, &path, direction),
                    path,
                });
            }
        }

        paths.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
        Ok(paths)
    }
}

fn validate_inputs(change_set: &ChangeSet, dependencies: &DependencyResult) -> Result<()> {
    if change_set.changed_modules.is_empty() {
        return Err(Error::InvalidInput(format!(
            "change set '{}' has no changed modules",
            change_set.id
        )));
    }
    if dependencies.is_empty() {
        return Err(Error::InvalidInput(
            "dependency result has no modules or dependencies".to_string(),
        ));
    }
    if let Some(missing) = change_set
        .changed_modules
        .iter()
        .find(|m| !dependencies.modules.contains_key(*m))
    {
        return Err(Error::InvalidInput(format!(
            "changed module '{missing}' is not in the dependency result"
        )));
    }
    Ok(())
}

fn coverage_for(source: &dyn CoverageSource, module: &str) -> f64 {
    match source.coverage(module) {
        Some(ratio) if (0.0..=1.0).contains(&ratio) => ratio,
        Some(ratio) => {
            warn!(module, ratio, "Coverage ratio outside [0, 1], clamping");
            if ratio.is_nan() {
                DEFAULT_COVERAGE
            } else {
                ratio.clamp(0.0, 1.0)
            }
        }
        None => DEFAULT_COVERAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChangeType, Dependency, DependencyStrength, DependencyType, ModuleDependencies};

    fn snapshot(edges: &[(&str, &str, DependencyStrength)]) -> DependencyResult {
        let mut result = DependencyResult {
            repository: "test".to_string(),
            ..DependencyResult::default()
        };
        for &(from, to, strength) in edges {
            result
                .dependencies
                .push(Dependency::new(from, to, DependencyType::Import, strength));
            for m in [from, to] {
                result
                    .modules
                    .entry(m.to_string())
                    .or_insert_with(|| ModuleDependencies::new(m, "go"));
            }
        }
        result
    }

    fn analyzer() -> ImpactAnalyzer {
        ImpactAnalyzer::new(ImpactAnalysisConfig::default()).expect("default config is valid")
    }

    #[test]
    fn empty_change_set_is_invalid_input() {
        let deps = snapshot(&[("a", "b", DependencyStrength::Strong)]);
        let change = ChangeSet::new("cs", ChangeType::Modification, Vec::<String>::new());

        let err = analyzer().analyze_impact(&change, &deps).expect_err("empty change set");
        assert!(err.is_input_error());
    }

    #[test]
    fn empty_dependency_result_is_invalid_input() {
        let change = ChangeSet::new("cs", ChangeType::Modification, ["a"]);
        let err = analyzer()
            .analyze_impact(&change, &DependencyResult::default())
            .expect_err("empty snapshot");
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn unknown_changed_module_is_invalid_input() {
        let deps = snapshot(&[("a", "b", DependencyStrength::Strong)]);
        let change = ChangeSet::new("cs", ChangeType::Modification, ["ghost"]);

        let err = analyzer().analyze_impact(&change, &deps).expect_err("unknown module");
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn isolated_module_yields_successful_report() {
        let mut deps = snapshot(&[("a", "b", DependencyStrength::Strong)]);
        deps.modules
            .insert("lonely".to_string(), ModuleDependencies::new("lonely", "go"));
        let change = ChangeSet::new("cs", ChangeType::Modification, ["lonely"]);

        let report = analyzer().analyze_impact(&change, &deps).expect("valid input");
        assert_eq!(report.affected_modules.len(), 1);
        assert!(report.impact_paths.is_empty());
        assert_eq!(report.summary.total_affected_modules, 1);
    }

    #[test]
    fn coverage_is_clamped_and_defaulted() {
        let coverage: HashMap<String, f64> =
            HashMap::from([("a".to_string(), 1.7), ("b".to_string(), 0.4)]);
        assert!((coverage_for(&coverage, "a") - 1.0).abs() < f64::EPSILON);
        assert!((coverage_for(&coverage, "b") - 0.4).abs() < f64::EPSILON);
        assert!(coverage_for(&coverage, "c").abs() < f64::EPSILON);
        assert!(coverage_for(&NoCoverage, "a").abs() < f64::EPSILON);
    }

    #[test]
    fn modules_below_threshold_are_dropped() {
        // One hop over an optional edge scores 0.88.
        let deps = snapshot(&[
            ("m1", "m0", DependencyStrength::Optional),
            ("m2", "m1", DependencyStrength::Optional),
        ]);
        let config = ImpactAnalysisConfig {
            impact_threshold: 0.95,
            ..ImpactAnalysisConfig::default()
        };
        let analyzer = ImpactAnalyzer::new(config).expect("valid config");
        let change = ChangeSet::new("cs", ChangeType::Modification, ["m0"]);

        let report = analyzer.analyze_impact(&change, &deps).expect("valid input");
        let paths: Vec<&str> = report
            .affected_modules
            .iter()
            .map(|m| m.module_path.as_str())
            .collect();
        assert_eq!(paths, vec!["m0"]);
    }

    #[test]
    fn should_exclude_module_uses_configured_patterns() {
        let analyzer = analyzer();
        assert!(analyzer.should_exclude_module("test_auth"));
        assert!(analyzer.should_exclude_module("mock_db"));
        assert!(!analyzer.should_exclude_module("core/auth"));
    }

    #[test]
    fn analyzer_keeps_its_configuration() {
        let config = ImpactAnalysisConfig {
            max_depth: 3,
            ..ImpactAnalysisConfig::default()
        };
        let analyzer = ImpactAnalyzer::new(config.clone()).expect("valid config");
        assert_eq!(analyzer.config().max_depth, 3);
        assert_eq!(analyzer.config().exclude_patterns, config.exclude_patterns);
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = ImpactAnalysisConfig {
            exclude_patterns: vec!["[".to_string()],
            ..ImpactAnalysisConfig::default()
        };
        assert!(matches!(ImpactAnalyzer::new(config), Err(Error::Config(_))));
    }
}
