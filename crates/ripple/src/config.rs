//! Configuration for impact analysis.
//!
//! `ImpactAnalysisConfig` is an immutable value passed into the analyzer at
//! construction. Every field has a default, so a caller may pass no
//! configuration at all, and a YAML file only needs to name the fields it
//! overrides:
//!
//! ```yaml
//! max_depth: 6
//! include_external_deps: false
//! exclude_patterns: ["test_*", "*_test.*", "mock_*", "vendor/*"]
//! risk_levels:
//!   high_risk_threshold: 8.0
//! ```

use std::path::Path;

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Default maximum traversal depth.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Default minimum score for a non-changed module to be reported.
pub const DEFAULT_IMPACT_THRESHOLD: f64 = 0.1;

/// Default cap on the number of impact paths in a report.
pub const DEFAULT_MAX_IMPACT_PATHS: usize = 100;

/// Default exclude patterns (test and mock modules).
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["test_*", "*_test.*", "mock_*"];

/// Score thresholds for risk classification.
///
/// Each threshold is the inclusive lower bound of its band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskLevels {
    /// Scores at or above this are high risk.
    pub high_risk_threshold: f64,
    /// Scores at or above this are medium risk.
    pub medium_risk_threshold: f64,
    /// Scores at or above this are low risk.
    pub low_risk_threshold: f64,
}

impl Default for RiskLevels {
    fn default() -> Self {
        Self {
            high_risk_threshold: 7.0,
            medium_risk_threshold: 4.0,
            low_risk_threshold: 1.0,
        }
    }
}

/// Configuration for one impact analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactAnalysisConfig {
    /// Maximum number of hops explored from a changed module.
    pub max_depth: usize,
    /// Traverse edges marked external.
    pub include_external_deps: bool,
    /// Produce the test impact sub-report.
    pub analyze_test_impact: bool,
    /// Traverse weak edges. Optional edges are always traversed.
    pub consider_weak_deps: bool,
    /// Minimum score for a non-changed module to be reported.
    pub impact_threshold: f64,
    /// Glob patterns matched against module paths.
    pub exclude_patterns: Vec<String>,
    /// Risk classification thresholds.
    pub risk_levels: RiskLevels,
    /// Cap on representative impact paths.
    pub max_impact_paths: usize,
}

impl Default for ImpactAnalysisConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            include_external_deps: false,
            analyze_test_impact: true,
            consider_weak_deps: true,
            impact_threshold: DEFAULT_IMPACT_THRESHOLD,
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(ToString::to_string)
                .collect(),
            risk_levels: RiskLevels::default(),
            max_impact_paths: DEFAULT_MAX_IMPACT_PATHS,
        }
    }
}

impl ImpactAnalysisConfig {
    /// Load configuration from a YAML file.
    ///
    /// Missing fields take their defaults. The loaded configuration is
    /// validated before it is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        debug!(path = %path.display(), ?config, "Loaded impact analysis configuration");
        Ok(config)
    }

    /// Save configuration to a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check thresholds and exclude patterns.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if thresholds are out of order or outside
    /// `[0, 10]`, or if an exclude pattern is not a valid glob.
    pub fn validate(&self) -> Result<()> {
        let levels = &self.risk_levels;
        let ordered = [
            levels.low_risk_threshold,
            levels.medium_risk_threshold,
            levels.high_risk_threshold,
        ];
        if ordered.iter().any(|t| !(0.0..=10.0).contains(t)) {
            return Err(Error::Config(
                "risk thresholds must be within [0, 10]".to_string(),
            ));
        }
        if ordered.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::Config(format!(
                "risk thresholds must satisfy low <= medium <= high (got {} / {} / {})",
                levels.low_risk_threshold,
                levels.medium_risk_threshold,
                levels.high_risk_threshold
            )));
        }
        if !(0.0..=10.0).contains(&self.impact_threshold) {
            return Err(Error::Config(format!(
                "impact threshold {} is outside [0, 10]",
                self.impact_threshold
            )));
        }
        ExcludeMatcher::new(&self.exclude_patterns)?;
        Ok(())
    }
}

/// Compiled exclude patterns.
///
/// `*` and `?` never match `/`, so `test_*` excludes `test_auth` but not
/// `core/test_auth`.
#[derive(Debug, Clone)]
pub struct ExcludeMatcher {
    globs: Vec<(String, globset::GlobMatcher)>,
    set: GlobSet,
}

impl ExcludeMatcher {
    /// Compile the given patterns.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first invalid pattern.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let mut globs = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = compile(pattern)?;
            globs.push((pattern.to_string(), glob.compile_matcher()));
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|e| Error::Config(format!("invalid exclude patterns: {e}")))?;
        Ok(Self { globs, set })
    }

    /// Returns `true` if `module_path` matches any exclude pattern.
    #[must_use]
    pub fn is_excluded(&self, module_path: &str) -> bool {
        self.set.is_match(module_path)
    }

    /// The first pattern (in configuration order) matching `module_path`.
    #[must_use]
    pub fn matching_pattern(&self, module_path: &str) -> Option<&str> {
        self.globs
            .iter()
            .find(|(_, m)| m.is_match(module_path))
            .map(|(p, _)| p.as_str())
    }
}

fn compile(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| Error::Config(format!("invalid exclude pattern '{pattern}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_match_documented_values() {
        let config = ImpactAnalysisConfig::default();
        assert_eq!(config.max_depth, 10);
        assert!(!config.include_external_deps);
        assert!(config.analyze_test_impact);
        assert!(config.consider_weak_deps);
        assert_eq!(config.risk_levels, RiskLevels::default());
        assert_eq!(config.exclude_patterns, vec!["test_*", "*_test.*", "mock_*"]);
        config.validate().expect("defaults are valid");
    }

    #[rstest]
    #[case::test_prefix("test_auth", true)]
    #[case::test_suffix("auth_test.go", true)]
    #[case::mock_prefix("mock_service", true)]
    #[case::plain("core/auth", false)]
    #[case::nested("normal/module", false)]
    #[case::nested_test_prefix("core/test_auth", false)]
    fn default_exclude_patterns(#[case] module: &str, #[case] excluded: bool) {
        let matcher = ExcludeMatcher::new(DEFAULT_EXCLUDE_PATTERNS).expect("valid patterns");
        assert_eq!(matcher.is_excluded(module), excluded);
    }

    #[test]
    fn matching_pattern_reports_first_match_in_order() {
        let matcher = ExcludeMatcher::new(&["mock_*", "*_service"]).expect("valid patterns");
        assert_eq!(matcher.matching_pattern("mock_service"), Some("mock_*"));
        assert_eq!(matcher.matching_pattern("user_service"), Some("*_service"));
        assert_eq!(matcher.matching_pattern("core"), None);
    }

    #[test]
    fn invalid_glob_is_a_config_error() {
        let err = ExcludeMatcher::new(&["[unclosed"]).expect_err("invalid glob");
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("[unclosed"));
    }

    #[rstest]
    #[case::inverted(1.0, 4.0, 7.0)]
    #[case::out_of_range(11.0, 4.0, 1.0)]
    #[case::negative(7.0, 4.0, -1.0)]
    fn validate_rejects_bad_thresholds(#[case] high: f64, #[case] medium: f64, #[case] low: f64) {
        let config = ImpactAnalysisConfig {
            risk_levels: RiskLevels {
                high_risk_threshold: high,
                medium_risk_threshold: medium,
                low_risk_threshold: low,
            },
            ..ImpactAnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "max_depth: 3\nrisk_levels:\n  high_risk_threshold: 8.5\n";
        let config: ImpactAnalysisConfig = serde_yaml::from_str(yaml).expect("valid yaml");
        assert_eq!(config.max_depth, 3);
        assert!((config.risk_levels.high_risk_threshold - 8.5).abs() < f64::EPSILON);
        assert!((config.risk_levels.medium_risk_threshold - 4.0).abs() < f64::EPSILON);
        assert_eq!(config.exclude_patterns.len(), 3);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("ripple.yaml");
        let config = ImpactAnalysisConfig {
            max_depth: 4,
            include_external_deps: true,
            exclude_patterns: vec!["vendor/*".to_string()],
            ..ImpactAnalysisConfig::default()
        };

        config.save(&path).expect("save should succeed");
        let loaded = ImpactAnalysisConfig::load(&path).expect("load should succeed");
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_rejects_invalid_pattern_in_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("ripple.yaml");
        std::fs::write(&path, "exclude_patterns: ['{a,b']\n").expect("write config");

        let err = ImpactAnalysisConfig::load(&path).expect_err("invalid pattern");
        assert!(matches!(err, Error::Config(_)));
    }
}
