//! Report assembly: summary statistics, recommendations and mitigation
//! strategies.

use std::collections::BTreeMap;

use crate::risk::{POOR_COVERAGE_THRESHOLD, language_count};
use crate::types::{
    AffectedModule, ChangeSet, ChangeType, Effort, ImpactPath, ImpactSummary, MitigationStrategy,
    OverallRisk, RiskAssessment, RiskLevel,
};

/// Affected-module count above which phased deployment is advised.
const LARGE_SCOPE: usize = 20;

/// Summarize an analysis.
#[must_use]
pub fn generate_impact_summary(
    affected: &[AffectedModule],
    paths: &[ImpactPath],
    assessment: &RiskAssessment,
) -> ImpactSummary {
    let count = |level: RiskLevel| affected.iter().filter(|m| m.risk_level == level).count();

    let mut language_breakdown = BTreeMap::new();
    let mut impact_by_depth = BTreeMap::new();
    for module in affected {
        let language = if module.language.is_empty() {
            "unknown"
        } else {
            module.language.as_str()
        };
        *language_breakdown.entry(language.to_string()).or_insert(0) += 1;
        *impact_by_depth.entry(module.distance_from_change).or_insert(0) += 1;
    }

    ImpactSummary {
        total_affected_modules: affected.len(),
        total_impact_paths: paths.len(),
        max_impact_depth: affected
            .iter()
            .map(|m| m.distance_from_change)
            .max()
            .unwrap_or(0),
        high_risk_modules: count(RiskLevel::High),
        medium_risk_modules: count(RiskLevel::Medium),
        low_risk_modules: count(RiskLevel::Low),
        minimal_risk_modules: count(RiskLevel::Minimal),
        cross_language_impact: language_count(affected) > 1,
        language_breakdown,
        impact_by_depth,
        estimated_effort: estimate_overall_effort(affected, assessment.overall_risk),
        overall_risk_level: assessment.overall_risk,
    }
}

/// Coarse effort to ship the change safely.
#[must_use]
pub fn estimate_overall_effort(affected: &[AffectedModule], overall: OverallRisk) -> Effort {
    #[allow(clippy::cast_precision_loss)]
    let base = affected.len() as f64 * 0.5;
    let per_module: f64 = affected
        .iter()
        .map(|m| match m.risk_level {
            RiskLevel::High => 3.0,
            RiskLevel::Medium => 1.5,
            RiskLevel::Low => 0.5,
            RiskLevel::Minimal => 0.0,
        })
        .sum();
    let multiplier = match overall {
        OverallRisk::Critical => 2.0,
        OverallRisk::High => 1.5,
        OverallRisk::Medium => 1.2,
        OverallRisk::Low => 1.0,
    };

    let score = (base + per_module) * multiplier;
    if score > 50.0 {
        Effort::High
    } else if score > 20.0 {
        Effort::Medium
    } else {
        Effort::Low
    }
}

/// Substantiated guidance, most important first.
///
/// Returns an empty list when nothing notable applies.
#[must_use]
pub fn generate_recommendations(
    change_set: &ChangeSet,
    affected: &[AffectedModule],
    assessment: &RiskAssessment,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if assessment.overall_risk == OverallRisk::Critical {
        recommendations.extend([
            "Critical risk - consider splitting the change into smaller parts".to_string(),
            "Require senior engineer review before deployment".to_string(),
            "Prepare a comprehensive rollback plan".to_string(),
        ]);
    }
    if assessment.overall_risk.is_elevated() {
        recommendations
            .push("High risk - thorough testing and staged rollout recommended".to_string());
    }
    if affected.len() > LARGE_SCOPE {
        recommendations.push("Large impact scope - consider phased deployment".to_string());
    }

    recommendations.extend(
        affected
            .iter()
            .filter(|m| m.test_coverage < POOR_COVERAGE_THRESHOLD)
            .map(|m| {
                format!(
                    "Low test coverage in {} ({:.0}%) - add tests before release",
                    m.module_path,
                    m.test_coverage * 100.0
                )
            }),
    );

    if language_count(affected) > 1 {
        recommendations
            .push("Cross-language impact detected - ensure integration testing".to_string());
    }
    if change_set.change_type == ChangeType::Deletion {
        recommendations
            .push("Deletion changes - verify no breaking dependencies remain".to_string());
    }
    for cycle in &assessment.dependency_cycles {
        recommendations.push(format!(
            "Break the dependency cycle between {} before extending it",
            cycle.join(", ")
        ));
    }

    recommendations
}

/// Mitigation strategies for the identified risks, highest priority first.
#[must_use]
pub fn generate_mitigation_strategies(
    assessment: &RiskAssessment,
    affected: &[AffectedModule],
) -> Vec<MitigationStrategy> {
    let mut strategies = Vec::new();

    if !assessment.high_risk_modules.is_empty() {
        strategies.push(strategy(
            "High-Risk Module Monitoring",
            "Implement enhanced monitoring for high-risk modules",
            9,
            (Effort::Medium, Effort::High),
            "high_risk_modules",
            &[
                "Set up detailed logging for high-risk modules",
                "Implement health checks and alerts",
                "Create rollback procedures",
                "Schedule post-deployment monitoring",
            ],
        ));
    }

    if affected
        .iter()
        .any(|m| m.test_coverage < POOR_COVERAGE_THRESHOLD)
    {
        strategies.push(strategy(
            "Test Coverage Improvement",
            "Improve test coverage for affected modules",
            7,
            (Effort::High, Effort::High),
            "poor_test_coverage",
            &[
                "Identify critical paths in affected modules",
                "Write unit tests for core functionality",
                "Add integration tests for module interactions",
                "Run mutation testing to verify test quality",
            ],
        ));
    }

    if !assessment.critical_paths.is_empty() {
        strategies.push(strategy(
            "Critical Path Protection",
            "Protect critical dependency paths from failures",
            8,
            (Effort::Medium, Effort::High),
            "critical_paths",
            &[
                "Add circuit breakers on critical paths",
                "Add redundancy where possible",
                "Create fallback mechanisms",
                "Monitor path health continuously",
            ],
        ));
    }

    if language_count(affected) > 1 {
        strategies.push(strategy(
            "Cross-Language Integration Testing",
            "Ensure proper integration across programming languages",
            6,
            (Effort::Medium, Effort::Medium),
            "cross_language_complexity",
            &[
                "Set up end-to-end test environments",
                "Test API contracts between languages",
                "Verify data serialization and deserialization",
                "Monitor inter-service communication",
            ],
        ));
    }

    if assessment.overall_risk.is_elevated() {
        strategies.push(strategy(
            "Staged Deployment",
            "Deploy changes in stages to minimize risk",
            10,
            (Effort::Low, Effort::High),
            "overall_high_risk",
            &[
                "Deploy to a development environment first",
                "Run the comprehensive test suite",
                "Deploy to staging with production-like data",
                "Monitor for 24 hours before production deployment",
                "Deploy to production during low-traffic periods",
            ],
        ));
    }

    if !assessment.dependency_cycles.is_empty() {
        strategies.push(strategy(
            "Dependency Cycle Breaking",
            "Break dependency cycles so changes stop propagating in loops",
            5,
            (Effort::High, Effort::Medium),
            "dependency_cycles",
            &[
                "Identify the weakest edge in each cycle",
                "Extract shared types into a separate module",
                "Invert the dependency behind an interface",
            ],
        ));
    }

    // Stable sort keeps discovery order among equal priorities.
    strategies.sort_by(|a, b| b.priority.cmp(&a.priority));
    for (i, s) in strategies.iter_mut().enumerate() {
        s.id = format!("strategy_{}", i + 1);
    }
    strategies
}

fn strategy(
    name: &str,
    description: &str,
    priority: u8,
    (effort, effectiveness): (Effort, Effort),
    risk: &str,
    steps: &[&str],
) -> MitigationStrategy {
    MitigationStrategy {
        id: String::new(),
        name: name.to_string(),
        description: description.to_string(),
        priority,
        effort,
        effectiveness,
        applicable_risks: vec![risk.to_string()],
        steps: steps.iter().map(ToString::to_string).collect(),
    }
}
