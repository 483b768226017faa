//! `ripple analyze` command implementation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Args;
use ripple::{
    ChangeSet, ChangeType, DependencyResult, ImpactAnalysisConfig, ImpactAnalyzer,
    create_change_set_from_git_diff, remove_duplicates,
};
use tracing::{debug, warn};

use super::display::print_report;

/// Arguments for `ripple analyze`.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Dependency snapshot (JSON)
    #[arg(short, long)]
    deps: PathBuf,

    /// Changed module (repeatable)
    #[arg(short, long = "module")]
    modules: Vec<String>,

    /// Changed file paths; modules are derived from their directories
    #[arg(long, num_args = 1..)]
    files: Vec<String>,

    /// Commit the changed files belong to
    #[arg(long, default_value = "HEAD")]
    commit: String,

    /// Author of the change
    #[arg(long, default_value = "")]
    author: String,

    /// Kind of change (addition, modification, deletion)
    #[arg(long, value_parser = parse_change_type)]
    change_type: Option<ChangeType>,

    /// Coverage ratios per module (JSON object of module -> 0..1)
    #[arg(long)]
    coverage: Option<PathBuf>,

    /// Override the maximum traversal depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Traverse edges into external dependencies
    #[arg(long)]
    include_external: bool,
}

fn parse_change_type(s: &str) -> Result<ChangeType, String> {
    match s.to_ascii_lowercase().as_str() {
        "addition" | "add" => Ok(ChangeType::Addition),
        "modification" | "modify" => Ok(ChangeType::Modification),
        "deletion" | "delete" => Ok(ChangeType::Deletion),
        other => Err(format!(
            "unknown change type '{other}' (expected addition, modification or deletion)"
        )),
    }
}

/// Run the analyze command.
pub fn run(args: &AnalyzeArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = match config_path {
        Some(path) => ImpactAnalysisConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ImpactAnalysisConfig::default(),
    };
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }
    config.include_external_deps |= args.include_external;

    let deps = DependencyResult::from_json_file(&args.deps)
        .with_context(|| format!("failed to load dependency snapshot {}", args.deps.display()))?;
    debug!(
        modules = deps.modules.len(),
        dependencies = deps.dependencies.len(),
        "Loaded dependency snapshot"
    );

    let change_set = build_change_set(args)?;
    let coverage = match &args.coverage {
        Some(path) => load_coverage(path, &deps)?,
        None => HashMap::new(),
    };

    let analyzer = ImpactAnalyzer::new(config)?;
    debug!(
        max_depth = analyzer.config().max_depth,
        include_external = analyzer.config().include_external_deps,
        "Configured analyzer"
    );
    let report = analyzer.analyze_impact_with_coverage(&change_set, &deps, &coverage)?;
    print_report(&report);
    Ok(())
}

fn build_change_set(args: &AnalyzeArgs) -> anyhow::Result<ChangeSet> {
    if args.modules.is_empty() && args.files.is_empty() {
        bail!("no change given: pass --module or --files");
    }

    let mut change_set = if args.files.is_empty() {
        let mut cs = ChangeSet::new("changeset_cli", ChangeType::Modification, Vec::<String>::new());
        cs.author.clone_from(&args.author);
        cs
    } else {
        create_change_set_from_git_diff(&args.commit, &args.author, &args.files)
    };

    change_set.changed_modules = remove_duplicates(
        change_set
            .changed_modules
            .iter()
            .chain(&args.modules)
            .cloned(),
    );
    if let Some(change_type) = args.change_type {
        change_set.change_type = change_type;
    }
    Ok(change_set)
}

fn load_coverage(path: &Path, deps: &DependencyResult) -> anyhow::Result<HashMap<String, f64>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read coverage file {}", path.display()))?;
    let coverage: HashMap<String, f64> = serde_json::from_str(&content)
        .with_context(|| format!("invalid coverage file {}", path.display()))?;

    for module in coverage.keys().filter(|m| !deps.modules.contains_key(*m)) {
        warn!(module = %module, "Coverage given for a module not in the dependency snapshot");
    }
    Ok(coverage)
}
