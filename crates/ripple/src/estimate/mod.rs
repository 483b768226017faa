//! Derived-impact estimators.
//!
//! These turn the scored affected-module list into the test and performance
//! sub-reports. They are heuristics: each reads only the affected modules,
//! the change set and (for performance) the graph's fan-in.

pub mod performance;

pub use performance::analyze_performance_impact;
pub use test::{analyze_test_impact, estimate_test_effort, infer_test_suite_name};
