//! Change set construction from a version-control diff.
//!
//! Turns a commit hash, an author and a list of changed file paths into a
//! [`ChangeSet`]. Everything is derived deterministically from the file
//! paths; nothing touches the repository.

use std::collections::HashSet;
use std::hash::Hash;
use std::path::Path;

use chrono::Utc;

use crate::types::{ChangeSet, ChangeType};

/// Length of the commit hash prefix used in identifiers.
const SHORT_HASH_LEN: usize = 8;

/// Leading source-root segments stripped from module paths.
const SOURCE_ROOTS: &[&str] = &["./", "src/", "lib/"];

/// Language reported when no changed file has a known extension.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// File extension to language.
const EXTENSION_LANGUAGES: &[(&str, &str)] = &[
    ("go", "go"),
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("py", "python"),
    ("java", "java"),
    ("rs", "rust"),
    ("rb", "ruby"),
    ("php", "php"),
    ("cs", "csharp"),
];

/// Build a change set from a commit's changed files.
///
/// - id is `changeset_` plus the first 8 characters of the hash
/// - changed modules are the files' parent directories, with a leading
///   `./`, `src/` or `lib/` removed, in first-occurrence order
/// - language is the majority language of the files' extensions
/// - change type is always `Modification`; the file list alone cannot tell
///   additions from edits
#[must_use]
pub fn create_change_set_from_git_diff(
    commit_hash: &str,
    author: &str,
    changed_files: &[String],
) -> ChangeSet {
    let short = short_hash(commit_hash);
    ChangeSet {
        id: format!("changeset_{short}"),
        description: format!("Change set from commit {short}"),
        changed_modules: extract_modules_from_files(changed_files),
        changed_files: changed_files.to_vec(),
        change_type: ChangeType::Modification,
        language: infer_primary_language(changed_files),
        author: author.to_string(),
        commit_hash: Some(commit_hash.to_string()),
        timestamp: Utc::now(),
    }
}

fn short_hash(commit_hash: &str) -> &str {
    commit_hash
        .char_indices()
        .nth(SHORT_HASH_LEN)
        .map_or(commit_hash, |(end, _)| &commit_hash[..end])
}

/// Module identifiers for a list of changed files.
///
/// Files at the repository root have no module and are skipped. A file
/// directly under `src/` or `lib/` belongs to that directory's module.
#[must_use]
pub fn extract_modules_from_files(files: &[String]) -> Vec<String> {
    let modules = files.iter().filter_map(|file| {
        let dir = Path::new(file).parent()?.to_str()?;
        let module = strip_source_root(dir);
        (!module.is_empty() && module != ".").then(|| module.to_string())
    });
    remove_duplicates(modules)
}

fn strip_source_root(dir: &str) -> &str {
    SOURCE_ROOTS
        .iter()
        .fold(dir, |module, root| module.strip_prefix(root).unwrap_or(module))
}

/// Majority language over the files' extensions.
///
/// Ties go to the language seen first. Returns `"unknown"` when no file has
/// a known extension.
#[must_use]
pub fn infer_primary_language(files: &[String]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for language in files.iter().filter_map(|f| language_for_file(f)) {
        match counts.iter_mut().find(|(l, _)| *l == language) {
            Some((_, count)) => *count += 1,
            None => counts.push((language, 1)),
        }
    }

    // `max_by_key` keeps the last maximum; reverse so the first seen wins ties.
    counts
        .into_iter()
        .rev()
        .max_by_key(|&(_, count)| count)
        .map_or_else(|| UNKNOWN_LANGUAGE.to_string(), |(l, _)| l.to_string())
}

/// Language of a single file, from its extension.
#[must_use]
pub fn language_for_file(file: &str) -> Option<&'static str> {
    let ext = Path::new(file).extension()?.to_str()?.to_ascii_lowercase();
    EXTENSION_LANGUAGES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|&(_, language)| language)
}

/// Stable de-duplication: first occurrence wins, order preserved.
pub fn remove_duplicates<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
