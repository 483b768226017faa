//! `ripple changeset` command implementation.

use colored::Colorize;
use ripple::create_change_set_from_git_diff;

use super::display::print_list;

/// Run the changeset command.
pub fn run(commit: &str, author: &str, files: &[String]) {
    let change_set = create_change_set_from_git_diff(commit, author, files);

    println!("{} {}", "Change set".white().bold(), change_set.id.cyan().bold());
    println!("  {}: {}", "Description".dimmed(), change_set.description);
    println!("  {}: {}", "Language".dimmed(), change_set.language);
    println!("  {}: {}", "Change type".dimmed(), change_set.change_type);
    if !change_set.author.is_empty() {
        println!("  {}: {}", "Author".dimmed(), change_set.author);
    }
    println!();
    println!(
        "  {} ({}):",
        "Modules".white().bold(),
        change_set.changed_modules.len().to_string().green()
    );
    print_list(&change_set.changed_modules, "(no module directories)");
}
