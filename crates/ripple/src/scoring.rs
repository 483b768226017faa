//! Impact scoring and risk classification.
//!
//! A module's score decays geometrically with distance from the change, is
//! scaled by the strength of the edge that reached it, and is boosted
//! slightly when the module is poorly tested:
//!
//! ```text
//! score = clamp(10 · 0.8^distance · factor(strength) · (1 + 0.1 · (1 − coverage)), 0, 10)
//! ```
//!
//! Classification and tagging are ordered rule tables, so adding a band or a
//! tag is a one-line change.

use crate::config::RiskLevels;
use crate::types::{
    AffectedModule, ChangeType, DependencyStrength, DependencyType, ImpactTag, RiskLevel,
};

/// Maximum impact score.
pub const MAX_IMPACT_SCORE: f64 = 10.0;

/// Per-hop decay of the impact score.
const DISTANCE_DECAY: f64 = 0.8;

/// Score boost at zero coverage.
const COVERAGE_BOOST: f64 = 0.1;

/// Impact score in `[0, 10]`.
///
/// Coverage outside `[0, 1]` is clamped.
#[must_use]
pub fn calculate_impact_score(distance: usize, strength: DependencyStrength, coverage: f64) -> f64 {
    let coverage = coverage.clamp(0.0, 1.0);
    let decay = DISTANCE_DECAY.powi(i32::try_from(distance).unwrap_or(i32::MAX));
    let score = MAX_IMPACT_SCORE
        * decay
        * strength.score_factor()
        * (1.0 + COVERAGE_BOOST * (1.0 - coverage));
    score.clamp(0.0, MAX_IMPACT_SCORE)
}

impl RiskLevels {
    /// Classify a score; each threshold is an inclusive lower bound.
    #[must_use]
    pub fn classify(&self, score: f64) -> RiskLevel {
        [
            (self.high_risk_threshold, RiskLevel::High),
            (self.medium_risk_threshold, RiskLevel::Medium),
            (self.low_risk_threshold, RiskLevel::Low),
        ]
        .into_iter()
        .find(|(threshold, _)| score >= *threshold)
        .map_or(RiskLevel::Minimal, |(_, level)| level)
    }
}

/// Classify a score against the configured thresholds.
#[must_use]
pub fn determine_risk_level(score: f64, levels: &RiskLevels) -> RiskLevel {
    levels.classify(score)
}

/// What a tag rule sees about one module.
#[derive(Debug, Clone, Copy)]
pub struct TagContext {
    /// Hops from the nearest changed module.
    pub distance: usize,
    /// Type of the reaching edge (`None` for changed modules).
    pub dependency_type: Option<DependencyType>,
    /// Kind of change under analysis.
    pub change_type: ChangeType,
}

type TagRule = (fn(&TagContext) -> bool, ImpactTag);

const TAG_RULES: &[TagRule] = &[
    (|c| c.distance == 0, ImpactTag::Direct),
    (|c| c.distance == 1, ImpactTag::Immediate),
    (|c| c.distance > 1, ImpactTag::Transitive),
    (|c| c.dependency_type == Some(DependencyType::Import), ImpactTag::Compile),
    (|c| c.dependency_type == Some(DependencyType::Require), ImpactTag::Runtime),
    (|c| c.dependency_type == Some(DependencyType::Inherit), ImpactTag::Interface),
    (|c| c.dependency_type == Some(DependencyType::Call), ImpactTag::Behavior),
    (|c| c.change_type == ChangeType::Modification, ImpactTag::Behavioral),
    (|c| c.change_type == ChangeType::Deletion, ImpactTag::Breaking),
    (|c| c.change_type == ChangeType::Addition, ImpactTag::Additive),
];

/// Impact tags for a module, in rule order.
#[must_use]
pub fn determine_impact_types(ctx: &TagContext) -> Vec<ImpactTag> {
    TAG_RULES
        .iter()
        .filter(|(applies, _)| applies(ctx))
        .map(|&(_, tag)| tag)
        .collect()
}

/// One-sentence explanation of why a module is affected.
#[must_use]
pub fn reason_for_impact(
    distance: usize,
    strength: DependencyStrength,
    change_type: ChangeType,
) -> String {
    if distance == 0 {
        return "Module is directly modified".to_string();
    }

    let reach = if distance == 1 {
        "Module directly depends on modified code".to_string()
    } else {
        format!("Module transitively affected through {distance}-degree dependency")
    };
    let coupling = match strength {
        DependencyStrength::Strong => "strong coupling",
        DependencyStrength::Weak => "weak coupling",
        DependencyStrength::Optional => "optional dependency",
    };
    let consequence = match change_type {
        ChangeType::Deletion => "may break functionality",
        ChangeType::Modification => "may change behavior",
        ChangeType::Addition => "may affect interfaces",
    };
    format!("{reach} ({coupling}) - {consequence}")
}

/// Path segments that name a feature on their own.
const FEATURE_SEGMENT_MARKERS: &[&str] = &["service", "handler", "controller", "api"];

/// `(language, path fragment, feature)` conventions.
const LANGUAGE_FEATURES: &[(&[&str], &str, &str)] = &[
    (&["go"], "cmd/", "CLI Commands"),
    (&["go"], "pkg/", "Core Libraries"),
    (&["go"], "internal/", "Internal APIs"),
    (&["javascript", "typescript"], "components", "UI Components"),
    (&["javascript", "typescript"], "services", "Business Services"),
    (&["javascript", "typescript"], "utils", "Utility Functions"),
    (&["python"], "models", "Data Models"),
    (&["python"], "views", "View Layer"),
    (&["python"], "serializers", "Data Serialization"),
    (&["rust"], "bin/", "CLI Commands"),
];

const DEFAULT_FEATURE: &str = "Core Functionality";

/// Product features a module likely backs, inferred from its path.
#[must_use]
pub fn identify_affected_features(module_path: &str, language: &str) -> Vec<String> {
    let mut features: Vec<String> = module_path
        .split('/')
        .filter(|segment| FEATURE_SEGMENT_MARKERS.iter().any(|m| segment.contains(m)))
        .map(title_case)
        .collect();

    features.extend(
        LANGUAGE_FEATURES
            .iter()
            .filter(|(langs, fragment, _)| {
                langs.contains(&language) && module_path.contains(fragment)
            })
            .map(|(_, _, feature)| (*feature).to_string()),
    );

    if features.is_empty() {
        features.push(DEFAULT_FEATURE.to_string());
    }
    features
}

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Sort affected modules by score descending, then distance, then path.
pub fn sort_by_impact(modules: &mut [AffectedModule]) {
    modules.sort_by(|a, b| {
        b.impact_score
            .total_cmp(&a.impact_score)
            .then(a.distance_from_change.cmp(&b.distance_from_change))
            .then_with(|| a.module_path.cmp(&b.module_path))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case::changed(0, DependencyStrength::Strong, 0.0, 10.0)]
    #[case::immediate_strong(1, DependencyStrength::Strong, 0.8, 8.16)]
    #[case::far_weak(3, DependencyStrength::Weak, 0.3, 1.808)]
    #[case::distant_optional(5, DependencyStrength::Optional, 0.9, 0.331)]
    fn impact_score_reference_points(
        #[case] distance: usize,
        #[case] strength: DependencyStrength,
        #[case] coverage: f64,
        #[case] expected: f64,
    ) {
        let score = calculate_impact_score(distance, strength, coverage);
        assert!((score - expected).abs() < 0.01, "got {score}, expected {expected}");
    }

    #[rstest]
    #[case::changed(0, DependencyStrength::Strong, 0.0, RiskLevel::High)]
    #[case::immediate_strong(1, DependencyStrength::Strong, 0.8, RiskLevel::High)]
    #[case::far_weak(3, DependencyStrength::Weak, 0.3, RiskLevel::Low)]
    #[case::distant_optional(5, DependencyStrength::Optional, 0.9, RiskLevel::Minimal)]
    fn default_bands(
        #[case] distance: usize,
        #[case] strength: DependencyStrength,
        #[case] coverage: f64,
        #[case] expected: RiskLevel,
    ) {
        let score = calculate_impact_score(distance, strength, coverage);
        assert_eq!(determine_risk_level(score, &RiskLevels::default()), expected);
    }

    #[rstest]
    #[case::high_boundary(7.0, RiskLevel::High)]
    #[case::below_high(6.99, RiskLevel::Medium)]
    #[case::medium_boundary(4.0, RiskLevel::Medium)]
    #[case::low_boundary(1.0, RiskLevel::Low)]
    #[case::below_low(0.99, RiskLevel::Minimal)]
    fn thresholds_are_inclusive(#[case] score: f64, #[case] expected: RiskLevel) {
        assert_eq!(RiskLevels::default().classify(score), expected);
    }

    #[test]
    fn impact_types_for_changed_module() {
        let tags = determine_impact_types(&TagContext {
            distance: 0,
            dependency_type: None,
            change_type: ChangeType::Modification,
        });
        assert_eq!(tags, vec![ImpactTag::Direct, ImpactTag::Behavioral]);
    }

    #[rstest]
    #[case::import(1, DependencyType::Import, ChangeType::Deletion, &[ImpactTag::Immediate, ImpactTag::Compile, ImpactTag::Breaking])]
    #[case::require(2, DependencyType::Require, ChangeType::Addition, &[ImpactTag::Transitive, ImpactTag::Runtime, ImpactTag::Additive])]
    #[case::inherit(1, DependencyType::Inherit, ChangeType::Modification, &[ImpactTag::Immediate, ImpactTag::Interface, ImpactTag::Behavioral])]
    #[case::call(4, DependencyType::Call, ChangeType::Modification, &[ImpactTag::Transitive, ImpactTag::Behavior, ImpactTag::Behavioral])]
    #[case::config(1, DependencyType::ConfigReference, ChangeType::Addition, &[ImpactTag::Immediate, ImpactTag::Additive])]
    fn impact_types_for_reached_module(
        #[case] distance: usize,
        #[case] dep_type: DependencyType,
        #[case] change_type: ChangeType,
        #[case] expected: &[ImpactTag],
    ) {
        let tags = determine_impact_types(&TagContext {
            distance,
            dependency_type: Some(dep_type),
            change_type,
        });
        assert_eq!(tags, expected);
    }

    #[test]
    fn reason_mentions_distance_coupling_and_consequence() {
        assert_eq!(
            reason_for_impact(0, DependencyStrength::Strong, ChangeType::Deletion),
            "Module is directly modified"
        );
        assert_eq!(
            reason_for_impact(1, DependencyStrength::Strong, ChangeType::Modification),
            "Module directly depends on modified code (strong coupling) - may change behavior"
        );
        assert_eq!(
            reason_for_impact(3, DependencyStrength::Optional, ChangeType::Deletion),
            "Module transitively affected through 3-degree dependency (optional dependency) - may break functionality"
        );
    }

    #[rstest]
    #[case::api_segment("api/handlers", "go", &["Api", "Handlers"])]
    #[case::go_cmd("cmd/server", "go", &["CLI Commands"])]
    #[case::ts_components("web/components", "typescript", &["UI Components"])]
    #[case::python_models("app/models", "python", &["Data Models"])]
    #[case::fallback("core/auth", "go", &["Core Functionality"])]
    #[case::language_mismatch("app/models", "go", &["Core Functionality"])]
    fn affected_features(#[case] path: &str, #[case] language: &str, #[case] expected: &[&str]) {
        assert_eq!(identify_affected_features(path, language), expected);
    }

    proptest! {
        #[test]
        fn score_stays_in_range(
            distance in 0usize..64,
            strength in prop::sample::select(vec![
                DependencyStrength::Strong,
                DependencyStrength::Weak,
                DependencyStrength::Optional,
            ]),
            coverage in -1.0f64..2.0,
        ) {
            let score = calculate_impact_score(distance, strength, coverage);
            prop_assert!((0.0..=MAX_IMPACT_SCORE).contains(&score));
        }

        #[test]
        fn score_decreases_with_distance(distance in 0usize..30, coverage in 0.0f64..=1.0) {
            let near = calculate_impact_score(distance, DependencyStrength::Strong, coverage);
            let far = calculate_impact_score(distance + 1, DependencyStrength::Strong, coverage);
            prop_assert!(far < near);
        }
    }
}
