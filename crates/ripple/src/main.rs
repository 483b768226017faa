//! Ripple CLI - change impact analysis from the command line.
//!
//! Loads a dependency snapshot produced by an extractor, runs the impact
//! analysis for a change and prints a colored summary.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// Ripple: change impact analysis over module dependency graphs.
#[derive(Parser)]
#[command(name = "ripple")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Analysis configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the impact of a change
    Analyze(cli::analyze::AnalyzeArgs),

    /// Show the shortest dependency path between two modules
    Path {
        /// Dependency snapshot (JSON)
        #[arg(short, long)]
        deps: PathBuf,

        /// Start module
        from: String,

        /// End module
        to: String,

        /// Follow edges towards dependencies instead of dependents
        #[arg(long)]
        dependencies: bool,
    },

    /// Build a change set from a commit's changed files
    Changeset {
        /// Commit hash
        #[arg(long)]
        commit: String,

        /// Commit author
        #[arg(long, default_value = "")]
        author: String,

        /// Changed file paths
        #[arg(required = true)]
        files: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Analyze(args) => cli::analyze::run(&args, cli.config.as_deref()),
        Commands::Path {
            deps,
            from,
            to,
            dependencies,
        } => cli::path::run(&deps, &from, &to, dependencies),
        Commands::Changeset {
            commit,
            author,
            files,
        } => {
            cli::changeset::run(&commit, &author, &files);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            for cause in e.chain().skip(1) {
                eprintln!("  {}: {cause}", "caused by".dimmed());
            }
            ExitCode::FAILURE
        }
    }
}
