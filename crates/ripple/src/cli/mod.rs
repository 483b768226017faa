//! CLI command implementations.

mod display;

pub mod analyze;
pub mod changeset;
pub mod path;
