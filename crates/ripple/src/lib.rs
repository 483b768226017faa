//! # Ripple: Change Impact Analysis
//!
//! Ripple answers "what does this change touch, and how risky is it?" over a
//! module dependency graph produced by an upstream extractor. Given a
//! [`ChangeSet`] and a [`DependencyResult`], it produces an [`ImpactReport`]:
//! affected modules with scores and risk levels, representative impact
//! paths, a risk assessment, test and performance impact, recommendations
//! and mitigation strategies.
//!
//! ## Design Philosophy
//!
//! - **Pure computation** - No I/O inside the engine; inputs are borrowed and never mutated
//! - **Deterministic** - Same inputs, same report (apart from timestamps)
//! - **Bounded** - `max_depth` caps graph exploration on hub modules and cycles
//! - **Substantiated** - Recommendations appear only when something backs them
//!
//! ## Quick Start
//!
//! ```
//! use ripple::{
//!     ChangeSet, ChangeType, Dependency, DependencyResult, DependencyStrength,
//!     DependencyType, ImpactAnalysisConfig, ImpactAnalyzer, ModuleDependencies,
//! };
//!
//! let mut deps = DependencyResult::default();
//! deps.dependencies.push(Dependency::new(
//!     "api/handlers",
//!     "core/auth",
//!     DependencyType::Import,
//!     DependencyStrength::Strong,
//! ));
//! for m in ["api/handlers", "core/auth"] {
//!     deps.modules.insert(m.to_string(), ModuleDependencies::new(m, "go"));
//! }
//!
//! let analyzer = ImpactAnalyzer::new(ImpactAnalysisConfig::default())?;
//! let change = ChangeSet::new("cs-1", ChangeType::Modification, ["core/auth"]);
//! let report = analyzer.analyze_impact(&change, &deps)?;
//!
//! assert_eq!(report.summary.total_affected_modules, 2);
//! assert_eq!(report.module("api/handlers").map(|m| m.distance_from_change), Some(1));
//! # Ok::<(), ripple::Error>(())
//! ```

pub mod analyzer;
pub mod change_set;
pub mod config;
mod error;
pub mod estimate;
pub mod graph;
pub mod report;
pub mod risk;
pub mod scoring;
mod types;

pub use analyzer::{CoverageSource, DEFAULT_COVERAGE, ImpactAnalyzer, NoCoverage};
pub use change_set::{create_change_set_from_git_diff, remove_duplicates};
pub use config::{ExcludeMatcher, ImpactAnalysisConfig, RiskLevels};
pub use error::{Error, Result};
pub use graph::DependencyGraph;
pub use graph::paths::{calculate_path_weight, find_path, find_path_avoiding};
pub use types::{
    AffectedModule, ChangeSet, ChangeType, Dependency, DependencyResult, DependencyStrength,
    DependencyType, Effort, ImpactPath, ImpactReport, ImpactSummary, ImpactTag,
    MitigationStrategy, ModuleDependencies, OverallRisk, PathType, PerformanceImpact,
    RiskAssessment, RiskLevel, RiskMetrics, TestImpact, TraversalDirection,
};
