//! Common display utilities for CLI commands.

use colored::{ColoredString, Colorize};
use ripple::{Effort, ImpactReport, OverallRisk, RiskLevel};

const MAX_DISPLAY_ITEMS: usize = 10;
const DEFAULT_TERMINAL_WIDTH: usize = 80;
const INDENT: &str = "    ";

/// Current terminal width, falling back to 80 columns.
fn terminal_width() -> usize {
    terminal_size::terminal_size().map_or(DEFAULT_TERMINAL_WIDTH, |(w, _)| usize::from(w.0))
}

/// Display a list with bullets, truncating after `MAX_DISPLAY_ITEMS`.
pub fn print_list(items: &[String], empty_message: &str) {
    if items.is_empty() {
        println!("{INDENT}{}", empty_message.dimmed());
        return;
    }

    for item in items.iter().take(MAX_DISPLAY_ITEMS) {
        println!("{INDENT}{} {item}", "•".dimmed());
    }

    if items.len() > MAX_DISPLAY_ITEMS {
        println!(
            "{INDENT}{} ... and {} more",
            "•".dimmed(),
            items.len() - MAX_DISPLAY_ITEMS
        );
    }
}

/// Display wrapped sentences, one bullet each.
fn print_wrapped(lines: &[String], empty_message: &str) {
    if lines.is_empty() {
        println!("{INDENT}{}", empty_message.dimmed());
        return;
    }

    let width = terminal_width().saturating_sub(INDENT.len() + 2).max(20);
    for line in lines {
        let mut wrapped = textwrap::wrap(line, width).into_iter();
        if let Some(first) = wrapped.next() {
            println!("{INDENT}{} {first}", "•".dimmed());
        }
        for rest in wrapped {
            println!("{INDENT}  {rest}");
        }
    }
}

fn overall_risk(risk: OverallRisk) -> ColoredString {
    let label = risk.as_str().to_uppercase();
    match risk {
        OverallRisk::Critical => label.red().bold(),
        OverallRisk::High => label.red(),
        OverallRisk::Medium => label.yellow(),
        OverallRisk::Low => label.green(),
    }
}

fn module_risk(risk: RiskLevel) -> ColoredString {
    match risk {
        RiskLevel::High => risk.as_str().red(),
        RiskLevel::Medium => risk.as_str().yellow(),
        RiskLevel::Low => risk.as_str().green(),
        RiskLevel::Minimal => risk.as_str().dimmed(),
    }
}

fn effort(effort: Effort) -> ColoredString {
    let label = effort.to_string();
    match effort {
        Effort::High => label.red(),
        Effort::Medium => label.yellow(),
        Effort::Low => label.green(),
    }
}

/// Print the summary of an impact report.
pub fn print_report(report: &ImpactReport) {
    let summary = &report.summary;

    println!(
        "Impact analysis for {} ({}):",
        report.change_set.id.cyan().bold(),
        report.change_set.change_type
    );
    println!();
    println!(
        "  {}: {}   {}: {:.1}/10",
        "Overall risk".white().bold(),
        overall_risk(summary.overall_risk_level),
        "Score".white().bold(),
        report.risk_assessment.risk_metrics.overall_risk_score
    );
    println!(
        "  {}: {}   {}: {}   {}: {}",
        "Affected modules".white().bold(),
        summary.total_affected_modules.to_string().green(),
        "Impact paths".white().bold(),
        summary.total_impact_paths,
        "Max depth".white().bold(),
        summary.max_impact_depth
    );
    println!(
        "  {}: {} high, {} medium, {} low, {} minimal",
        "Risk levels".white().bold(),
        summary.high_risk_modules.to_string().red(),
        summary.medium_risk_modules.to_string().yellow(),
        summary.low_risk_modules.to_string().green(),
        summary.minimal_risk_modules
    );
    if summary.cross_language_impact {
        let languages: Vec<String> = summary
            .language_breakdown
            .iter()
            .map(|(lang, n)| format!("{lang} ({n})"))
            .collect();
        println!("  {}: {}", "Languages".white().bold(), languages.join(", "));
    }
    println!(
        "  {}: {}",
        "Estimated effort".white().bold(),
        effort(summary.estimated_effort)
    );
    if let Some(tests) = &report.test_impact {
        println!(
            "  {}: {}",
            "Test effort".white().bold(),
            effort(tests.estimated_test_effort)
        );
    }

    println!();
    println!("  {}:", "Most affected".white().bold());
    let modules: Vec<String> = report
        .affected_modules
        .iter()
        .map(|m| {
            format!(
                "{} [{}] score {:.2}, distance {}",
                m.module_path,
                module_risk(m.risk_level),
                m.impact_score,
                m.distance_from_change
            )
        })
        .collect();
    print_list(&modules, "(none)");

    if !report.impact_paths.is_empty() {
        println!();
        println!("  {}:", "Riskiest paths".white().bold());
        let paths: Vec<String> = report
            .impact_paths
            .iter()
            .map(|p| format!("{} ({}, risk {:.1})", p.path.join(" -> "), p.path_type, p.risk_score))
            .collect();
        print_list(&paths, "(none)");
    }

    if !report.risk_assessment.dependency_cycles.is_empty() {
        println!();
        println!("  {}:", "Dependency cycles".yellow().bold());
        let cycles: Vec<String> = report
            .risk_assessment
            .dependency_cycles
            .iter()
            .map(|c| c.join(", "))
            .collect();
        print_list(&cycles, "(none)");
    }

    println!();
    println!("  {}:", "Recommendations".white().bold());
    print_wrapped(&report.recommendations, "(nothing notable)");

    if !report.mitigation_strategies.is_empty() {
        println!();
        println!("  {}:", "Mitigation strategies".white().bold());
        let strategies: Vec<String> = report
            .mitigation_strategies
            .iter()
            .map(|s| format!("[{}] {}: {}", s.priority, s.name, s.description))
            .collect();
        print_wrapped(&strategies, "(none)");
    }
}
