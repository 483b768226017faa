//! `ripple path` command implementation.

use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use ripple::{DependencyGraph, DependencyResult, TraversalDirection, calculate_path_weight, find_path};

/// Run the path command.
pub fn run(deps_path: &Path, from: &str, to: &str, dependencies: bool) -> anyhow::Result<()> {
    let deps = DependencyResult::from_json_file(deps_path)
        .with_context(|| format!("failed to load dependency snapshot {}", deps_path.display()))?;
    let graph = DependencyGraph::from_edges(&deps.dependencies);
    let direction = if dependencies {
        TraversalDirection::Dependencies
    } else {
        TraversalDirection::Dependents
    };

    let Some(path) = find_path(&graph, from, to, direction) else {
        println!(
            "No path from {} to {} following {direction}",
            from.cyan().bold(),
            to.cyan().bold()
        );
        return Ok(());
    };

    let weight = calculate_path_weight(&graph, &path, direction)?;
    println!(
        "Path from {} to {} ({} hops, weight {weight:.1}):",
        from.cyan().bold(),
        to.cyan().bold(),
        (path.len() - 1).to_string().green()
    );
    let arrow = format!(" {} ", "->".dimmed());
    println!("  {}", path.join(arrow.as_str()));
    Ok(())
}
