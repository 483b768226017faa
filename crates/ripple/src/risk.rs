//! Risk assessment of a change.
//!
//! Five metrics, each in `[0, 10]`, are combined into a weighted overall
//! score that maps onto [`OverallRisk`]:
//!
//! | Metric | Formula | Weight |
//! |--------|---------|--------|
//! | Change complexity | 1.5 × changed modules | 0.2 |
//! | Impact scope | 0.5 × affected modules | 0.3 |
//! | Test coverage risk | (1 − mean coverage) × 10 | 0.2 |
//! | Dependency risk | longest path + 0.5 × mean path weight | 0.2 |
//! | Historical risk | baseline per change type | 0.1 |

use std::collections::HashSet;

use crate::config::RiskLevels;
use crate::types::{
    AffectedModule, ChangeSet, ChangeType, ImpactPath, OverallRisk, RiskAssessment, RiskLevel,
    RiskMetrics,
};

const METRIC_CAP: f64 = 10.0;

/// Coverage below which a module counts as poorly tested.
pub const POOR_COVERAGE_THRESHOLD: f64 = 0.5;

/// Coverage above which a module counts as well tested.
const GOOD_COVERAGE_THRESHOLD: f64 = 0.8;

/// Paths longer than this count as complex.
const COMPLEX_PATH_LENGTH: usize = 4;

/// Assess the risk of a change from its scored modules and paths.
#[must_use]
pub fn assess_risks(
    change_set: &ChangeSet,
    affected: &[AffectedModule],
    paths: &[ImpactPath],
    cycles: Vec<Vec<String>>,
    levels: &RiskLevels,
) -> RiskAssessment {
    let high_risk_modules = affected
        .iter()
        .filter(|m| m.risk_level == RiskLevel::High)
        .map(|m| m.module_path.clone())
        .collect();

    let critical_paths = paths
        .iter()
        .filter(|p| p.risk_score >= levels.high_risk_threshold)
        .map(|p| p.id.clone())
        .collect();

    let risk_metrics = calculate_risk_metrics(change_set, affected, paths);
    let overall_risk = determine_overall_risk(risk_metrics.overall_risk_score);

    RiskAssessment {
        overall_risk,
        risk_factors: identify_risk_factors(change_set, affected, paths, &cycles),
        mitigating_factors: identify_mitigating_factors(change_set, affected),
        high_risk_modules,
        critical_paths,
        dependency_cycles: cycles,
        risk_metrics,
    }
}

/// Compute the quantitative risk metrics.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate_risk_metrics(
    change_set: &ChangeSet,
    affected: &[AffectedModule],
    paths: &[ImpactPath],
) -> RiskMetrics {
    let change_complexity = (change_set.changed_modules.len() as f64 * 1.5).min(METRIC_CAP);
    let impact_scope = (affected.len() as f64 * 0.5).min(METRIC_CAP);

    let test_coverage_risk = if affected.is_empty() {
        0.0
    } else {
        let mean = affected.iter().map(|m| m.test_coverage).sum::<f64>() / affected.len() as f64;
        (1.0 - mean) * 10.0
    };

    let dependency_risk = if paths.is_empty() {
        0.0
    } else {
        let longest = paths.iter().map(|p| p.path_length).max().unwrap_or(0);
        let mean_weight = paths.iter().map(|p| p.total_weight).sum::<f64>() / paths.len() as f64;
        (longest as f64 + 0.5 * mean_weight).min(METRIC_CAP)
    };

    let historical_risk = match change_set.change_type {
        ChangeType::Deletion => 8.0,
        ChangeType::Modification => 5.0,
        ChangeType::Addition => 3.0,
    };

    let overall_risk_score = 0.2 * change_complexity
        + 0.3 * impact_scope
        + 0.2 * test_coverage_risk
        + 0.2 * dependency_risk
        + 0.1 * historical_risk;

    RiskMetrics {
        change_complexity,
        impact_scope,
        test_coverage_risk,
        dependency_risk,
        historical_risk,
        overall_risk_score,
    }
}

/// Map an overall risk score onto a level.
#[must_use]
pub fn determine_overall_risk(score: f64) -> OverallRisk {
    [
        (8.0, OverallRisk::Critical),
        (6.0, OverallRisk::High),
        (3.0, OverallRisk::Medium),
    ]
    .into_iter()
    .find(|(threshold, _)| score >= *threshold)
    .map_or(OverallRisk::Low, |(_, level)| level)
}

/// Number of distinct languages among affected modules.
#[must_use]
pub fn language_count(affected: &[AffectedModule]) -> usize {
    affected
        .iter()
        .map(|m| m.language.as_str())
        .filter(|l| !l.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

fn identify_risk_factors(
    change_set: &ChangeSet,
    affected: &[AffectedModule],
    paths: &[ImpactPath],
    cycles: &[Vec<String>],
) -> Vec<String> {
    let mut factors = Vec::new();

    if change_set.changed_modules.len() > 5 {
        factors.push("Large number of changed modules".to_string());
    }
    if change_set.change_type == ChangeType::Deletion {
        factors.push("Deletion changes have higher risk of breaking dependencies".to_string());
    }

    let high_risk = affected
        .iter()
        .filter(|m| m.risk_level == RiskLevel::High)
        .count();
    if high_risk > 3 {
        factors.push(format!("{high_risk} modules at high risk"));
    }

    let poor_coverage = affected
        .iter()
        .filter(|m| m.test_coverage < POOR_COVERAGE_THRESHOLD)
        .count();
    if poor_coverage > 2 {
        factors.push(format!("{poor_coverage} modules with poor test coverage"));
    }

    let complex = paths
        .iter()
        .filter(|p| p.path_length > COMPLEX_PATH_LENGTH)
        .count();
    if complex > 0 {
        factors.push(format!("{complex} complex dependency paths"));
    }

    if language_count(affected) > 1 {
        factors.push("Cross-language dependencies increase complexity".to_string());
    }

    for cycle in cycles {
        factors.push(format!("Dependency cycle among affected modules: {}", cycle.join(", ")));
    }

    factors
}

fn identify_mitigating_factors(change_set: &ChangeSet, affected: &[AffectedModule]) -> Vec<String> {
    let mut factors = Vec::new();

    let well_tested = affected
        .iter()
        .filter(|m| m.test_coverage > GOOD_COVERAGE_THRESHOLD)
        .count();
    if well_tested > 0 {
        factors.push(format!("{well_tested} modules have good test coverage"));
    }
    if change_set.change_type == ChangeType::Addition {
        factors.push("Addition changes are generally safer".to_string());
    }

    factors
}
