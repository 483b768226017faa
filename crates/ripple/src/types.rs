//! Domain types for change impact analysis.
//!
//! These types represent the core domain model:
//! - **Inputs**: `Dependency`, `ModuleDependencies`, `DependencyResult`, `ChangeSet`
//! - **Per-module results**: `AffectedModule`, `ImpactPath`
//! - **Report**: `ImpactReport` and its sub-reports
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | Strength | Enum not String | Weights are fixed per variant |
//! | Module IDs | `String` | Identifiers come verbatim from the extraction collaborator |
//! | Language | `String` | Free-form; the engine never dispatches on an exhaustive set |
//! | Risk levels | Ordered enums | Comparisons and counting stay type-safe |

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

// ============================================================================
// Dependency graph input
// ============================================================================

/// How tightly a dependent relies on its dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyStrength {
    /// Optional dependency (feature-gated, lazily loaded)
    Optional,
    /// Weak coupling (type-only use, configuration reference)
    Weak,
    /// Strong coupling (direct import and call)
    Strong,
}

impl DependencyStrength {
    /// Weight of an edge of this strength in path costs.
    #[must_use]
    pub fn weight(self) -> f64 {
        match self {
            Self::Strong => 3.0,
            Self::Weak => 1.0,
            Self::Optional => 0.3,
        }
    }

    /// Relative contribution of this strength to an impact score.
    #[must_use]
    pub fn score_factor(self) -> f64 {
        match self {
            Self::Strong => 1.0,
            Self::Weak => 0.33,
            Self::Optional => 0.1,
        }
    }

    /// Lowercase string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Weak => "weak",
            Self::Optional => "optional",
        }
    }
}

impl fmt::Display for DependencyStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of relationship an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    /// `import` / `use` statement
    Import,
    /// Runtime `require`
    Require,
    /// Textual include
    Include,
    /// Inheritance or interface implementation
    Inherit,
    /// Composition (field of another module's type)
    Compose,
    /// Function or method call
    Call,
    /// Reference from a configuration file
    ConfigReference,
    /// Any relationship the engine has no rule for
    #[serde(other)]
    Other,
}

impl DependencyType {
    /// Snake-case string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Require => "require",
            Self::Include => "include",
            Self::Inherit => "inherit",
            Self::Compose => "compose",
            Self::Call => "call",
            Self::ConfigReference => "config_reference",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed edge `from -> to`: `from` depends on `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    /// The dependent module.
    pub from: String,
    /// The module being depended on.
    pub to: String,
    /// Kind of relationship.
    #[serde(rename = "type")]
    pub dep_type: DependencyType,
    /// Language the dependency is declared in.
    #[serde(default)]
    pub language: String,
    /// Coupling strength.
    pub strength: DependencyStrength,
    /// Whether `to` resolves outside the analyzed repository.
    #[serde(default)]
    pub external: bool,
}

impl Dependency {
    /// Create an internal dependency edge.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        dep_type: DependencyType,
        strength: DependencyStrength,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            dep_type,
            language: String::new(),
            strength,
            external: false,
        }
    }

    /// Set the declaring language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Mark the edge as pointing outside the repository.
    #[must_use]
    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }
}

/// Per-module metadata supplied by the extraction collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDependencies {
    /// Module identifier (directory/package path).
    pub module_path: String,
    /// Dominant language of the module.
    #[serde(default)]
    pub language: String,
    /// Files belonging to the module.
    #[serde(default)]
    pub files: Vec<String>,
    /// Names exported by the module.
    #[serde(default)]
    pub exports: Vec<String>,
}

impl ModuleDependencies {
    /// Create module metadata with a path and language.
    pub fn new(module_path: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            language: language.into(),
            ..Self::default()
        }
    }
}

/// Snapshot of a repository's module dependency graph.
///
/// Read-only for the duration of an analysis; the engine never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyResult {
    /// Repository the snapshot was extracted from.
    #[serde(default)]
    pub repository: String,
    /// All dependency edges.
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    /// Module metadata keyed by module identifier.
    #[serde(default)]
    pub modules: HashMap<String, ModuleDependencies>,
}

impl DependencyResult {
    /// Load a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid snapshot.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Returns `true` when the snapshot has neither edges nor modules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.modules.is_empty()
    }

    /// Language recorded for a module, if known.
    #[must_use]
    pub fn language_of(&self, module: &str) -> Option<&str> {
        self.modules
            .get(module)
            .map(|m| m.language.as_str())
            .filter(|l| !l.is_empty())
    }
}

// ============================================================================
// Change set
// ============================================================================

/// The kind of change being analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// New code was added
    Addition,
    /// Existing code was modified
    Modification,
    /// Code was removed
    Deletion,
}

impl ChangeType {
    /// Lowercase string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Addition => "addition",
            Self::Modification => "modification",
            Self::Deletion => "deletion",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit of change under analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Change set identifier.
    pub id: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Module identifiers touched by the change.
    pub changed_modules: Vec<String>,
    /// File paths touched by the change.
    #[serde(default)]
    pub changed_files: Vec<String>,
    /// Kind of change.
    pub change_type: ChangeType,
    /// Dominant language of the changed files.
    #[serde(default)]
    pub language: String,
    /// Author of the change.
    #[serde(default)]
    pub author: String,
    /// Commit the change set was derived from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,
    /// When the change set was created.
    pub timestamp: DateTime<Utc>,
}

impl ChangeSet {
    /// Create a change set touching the given modules.
    pub fn new<I, S>(id: impl Into<String>, change_type: ChangeType, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            description: String::new(),
            changed_modules: modules.into_iter().map(Into::into).collect(),
            changed_files: Vec::new(),
            change_type,
            language: String::new(),
            author: String::new(),
            commit_hash: None,
            timestamp: Utc::now(),
        }
    }

    /// Returns `true` if `module` is directly changed.
    #[must_use]
    pub fn touches(&self, module: &str) -> bool {
        self.changed_modules.iter().any(|m| m == module)
    }
}

// ============================================================================
// Per-module results
// ============================================================================

/// Categorical risk of a single affected module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Below the low-risk threshold
    Minimal,
    /// Low risk
    Low,
    /// Medium risk
    Medium,
    /// High risk
    High,
}

impl RiskLevel {
    /// Lowercase string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label describing how a module is impacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactTag {
    /// The module itself was changed
    Direct,
    /// One hop from a changed module
    Immediate,
    /// More than one hop from a changed module
    Transitive,
    /// Reached through an import edge
    Compile,
    /// Reached through a runtime require edge
    Runtime,
    /// Reached through inheritance
    Interface,
    /// Reached through a call edge
    Behavior,
    /// The change modifies existing behavior
    Behavioral,
    /// The change removes code
    Breaking,
    /// The change only adds code
    Additive,
}

impl ImpactTag {
    /// Lowercase string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Immediate => "immediate",
            Self::Transitive => "transitive",
            Self::Compile => "compile",
            Self::Runtime => "runtime",
            Self::Interface => "interface",
            Self::Behavior => "behavior",
            Self::Behavioral => "behavioral",
            Self::Breaking => "breaking",
            Self::Additive => "additive",
        }
    }
}

impl fmt::Display for ImpactTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A module reached from the change set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectedModule {
    /// Module identifier.
    pub module_path: String,
    /// Language from the module metadata (empty when unknown).
    pub language: String,
    /// Hops from the nearest changed module (0 = changed).
    pub distance_from_change: usize,
    /// Strength of the edge that reached this module.
    pub dependency_strength: DependencyStrength,
    /// Type of the edge that reached this module (`None` for changed modules).
    pub dependency_type: Option<DependencyType>,
    /// Test coverage ratio in `[0, 1]`.
    pub test_coverage: f64,
    /// Impact score in `[0, 10]`.
    pub impact_score: f64,
    /// Risk level derived from the score.
    pub risk_level: RiskLevel,
    /// How the module is impacted.
    pub impact_types: Vec<ImpactTag>,
    /// Human-readable explanation.
    pub reason_for_impact: String,
    /// Product features the module likely backs.
    pub affected_features: Vec<String>,
}

impl AffectedModule {
    /// Returns `true` if the module was directly changed.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.distance_from_change == 0
    }
}

/// Which way edges are followed during traversal.
///
/// Edges point from dependent to dependency (`from` depends on `to`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalDirection {
    /// Follow edges backwards: modules that depend on the current one
    Dependents,
    /// Follow edges forwards: modules the current one depends on
    Dependencies,
}

impl fmt::Display for TraversalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dependents => "dependents",
            Self::Dependencies => "dependencies",
        })
    }
}

/// Shape of an impact path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathType {
    /// A single edge
    Direct,
    /// Several edges, no repeated module
    Transitive,
    /// Visits a module twice
    Circular,
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Direct => "direct",
            Self::Transitive => "transitive",
            Self::Circular => "circular",
        })
    }
}

/// A concrete chain of modules showing how a change reaches a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactPath {
    /// Path identifier (`path_<n>`).
    pub id: String,
    /// Changed module the path starts from.
    pub source_module: String,
    /// Affected module the path ends at.
    pub target_module: String,
    /// Modules from source to target, both included.
    pub path: Vec<String>,
    /// Number of edges.
    pub path_length: usize,
    /// Sum of edge strength weights.
    pub total_weight: f64,
    /// Risk score in `[0, 10]`.
    pub risk_score: f64,
    /// Shape of the path.
    pub path_type: PathType,
    /// Direction the path follows through the graph.
    pub direction: TraversalDirection,
    /// Strong or inheritance edges (`"a -> b"`).
    pub critical_edges: Vec<String>,
    /// Weak or optional edges where the path could be cut (`"a -> b"`).
    pub breaking_points: Vec<String>,
}

// ============================================================================
// Report
// ============================================================================

/// Overall risk of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallRisk {
    /// Standard procedures suffice
    Low,
    /// Standard testing and review
    Medium,
    /// Thorough testing and staged rollout
    High,
    /// Split the change
    Critical,
}

impl OverallRisk {
    /// Lowercase string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Returns `true` for `High` and `Critical`.
    #[must_use]
    pub fn is_elevated(self) -> bool {
        self >= Self::High
    }
}

impl fmt::Display for OverallRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse effort estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    /// Low effort
    Low,
    /// Medium effort
    Medium,
    /// High effort
    High,
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// High-level statistics of an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactSummary {
    /// Always equals `affected_modules.len()`.
    pub total_affected_modules: usize,
    /// Always equals `impact_paths.len()`.
    pub total_impact_paths: usize,
    /// Largest distance among affected modules.
    pub max_impact_depth: usize,
    /// Modules at high risk.
    pub high_risk_modules: usize,
    /// Modules at medium risk.
    pub medium_risk_modules: usize,
    /// Modules at low risk.
    pub low_risk_modules: usize,
    /// Modules at minimal risk.
    pub minimal_risk_modules: usize,
    /// More than one language among affected modules.
    pub cross_language_impact: bool,
    /// Affected module count per language.
    pub language_breakdown: BTreeMap<String, usize>,
    /// Affected module count per distance.
    pub impact_by_depth: BTreeMap<usize, usize>,
    /// Estimated overall effort.
    pub estimated_effort: Effort,
    /// Overall risk level.
    pub overall_risk_level: OverallRisk,
}

/// Quantitative risk metrics, each in `[0, 10]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Complexity of the change itself.
    pub change_complexity: f64,
    /// How widely the change spreads.
    pub impact_scope: f64,
    /// Risk from insufficient test coverage.
    pub test_coverage_risk: f64,
    /// Risk from dependency path complexity.
    pub dependency_risk: f64,
    /// Baseline risk of the change type.
    pub historical_risk: f64,
    /// Weighted combination of the above.
    pub overall_risk_score: f64,
}

/// Risk analysis of a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Overall risk level.
    pub overall_risk: OverallRisk,
    /// Factors that increase risk.
    pub risk_factors: Vec<String>,
    /// Factors that reduce risk.
    pub mitigating_factors: Vec<String>,
    /// Modules at high risk.
    pub high_risk_modules: Vec<String>,
    /// IDs of impact paths at or above the high-risk threshold.
    pub critical_paths: Vec<String>,
    /// Dependency cycles among affected modules.
    pub dependency_cycles: Vec<Vec<String>>,
    /// Quantitative metrics.
    pub risk_metrics: RiskMetrics,
}

/// Impact of a change on testing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestImpact {
    /// Conventional test suite names of affected modules.
    pub affected_test_suites: Vec<String>,
    /// Modules whose tests likely need updating.
    pub required_test_updates: Vec<String>,
    /// Estimated testing effort.
    pub estimated_test_effort: Effort,
    /// Affected modules with insufficient coverage.
    pub test_coverage_gaps: Vec<String>,
    /// Suggested test runs.
    pub recommended_tests: Vec<String>,
}

/// Potential performance implications of a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceImpact {
    /// Affected modules that look performance sensitive.
    pub affected_components: Vec<String>,
    /// Overall performance risk.
    pub performance_risk: Effort,
    /// Suggested benchmark runs.
    pub recommended_benchmarks: Vec<String>,
    /// Modules on likely hot paths.
    pub potential_bottlenecks: Vec<String>,
}

/// A strategy to reduce the risk of a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MitigationStrategy {
    /// Strategy identifier (`strategy_<n>`).
    pub id: String,
    /// Short name.
    pub name: String,
    /// One-sentence description.
    pub description: String,
    /// Priority 1-10, higher first.
    pub priority: u8,
    /// Effort to apply.
    pub effort: Effort,
    /// Expected effectiveness.
    pub effectiveness: Effort,
    /// Risk keys this strategy addresses.
    pub applicable_risks: Vec<String>,
    /// Ordered steps.
    pub steps: Vec<String>,
}

/// Complete result of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    /// The analyzed change.
    pub change_set: ChangeSet,
    /// Summary statistics.
    pub summary: ImpactSummary,
    /// Affected modules, highest score first.
    pub affected_modules: Vec<AffectedModule>,
    /// Representative impact paths, highest risk first.
    pub impact_paths: Vec<ImpactPath>,
    /// Risk assessment.
    pub risk_assessment: RiskAssessment,
    /// Test impact (absent when disabled in the configuration).
    pub test_impact: Option<TestImpact>,
    /// Performance impact.
    pub performance_impact: PerformanceImpact,
    /// Substantiated recommendations, most important first.
    pub recommendations: Vec<String>,
    /// Mitigation strategies, highest priority first.
    pub mitigation_strategies: Vec<MitigationStrategy>,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
}

impl ImpactReport {
    /// Look up an affected module by path.
    #[must_use]
    pub fn module(&self, module_path: &str) -> Option<&AffectedModule> {
        self.affected_modules
            .iter()
            .find(|m| m.module_path == module_path)
    }
}
