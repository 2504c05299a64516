use std::path::{Path, PathBuf};

use crate::error::{InsertFmtError, Result};
use crate::formatter::{format_sql, FormatOutcome};
use crate::ignore::{has_ignore_marker, IgnoreRules};
use crate::mode::Mode;
use crate::report::{FileResult, FileStatus, Report};
use crate::standardize::standardize;

/// What should happen to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Exempted by a path pattern or the in-file marker.
    Ignored,
    /// Not formattable, or already in canonical form.
    Unchanged,
    /// The file should be replaced by `formatted`.
    Rewrite { original: String, formatted: String },
}

/// Compute the canonical text of `original`, if it has one that differs.
///
/// Both sides are standardized before comparing, so a file that only differs
/// in its trailing newlines or semicolon is left alone.
pub fn reformat(original: &str) -> Option<String> {
    let formatted = match format_sql(original) {
        FormatOutcome::Formatted(formatted) => standardize(&formatted),
        outcome => {
            tracing::debug!(outcome = outcome.label(), "nothing to rewrite");
            return None;
        }
    };
    if standardize(original) == formatted {
        tracing::debug!("already canonical");
        return None;
    }
    Some(formatted)
}

/// Format a SQL string: the canonical text if one applies, else the input.
/// Text carrying the ignore marker is returned as is.
pub fn format_string(source: &str) -> String {
    if has_ignore_marker(source) {
        return source.to_string();
    }
    reformat(source).unwrap_or_else(|| source.to_string())
}

/// Decide what to do with already-read `content` located at `path`.
pub fn verify_content(path: &str, content: &str, rules: &IgnoreRules) -> Verdict {
    if let Some(pattern) = rules.first_match(path) {
        tracing::debug!(path, pattern = pattern.as_str(), "ignored by path pattern");
        return Verdict::Ignored;
    }
    if has_ignore_marker(content) {
        tracing::debug!(path, "ignored by marker");
        return Verdict::Ignored;
    }
    match reformat(content) {
        Some(formatted) => Verdict::Rewrite {
            original: content.to_string(),
            formatted,
        },
        None => Verdict::Unchanged,
    }
}

/// Decide what to do with the file at `path`, reading it only if no path
/// pattern exempts it.
pub fn verify_file(path: &Path, rules: &IgnoreRules) -> Result<Verdict> {
    let shown = path.to_string_lossy();
    tracing::info!(path = %shown, "verifying file");

    if rules.is_ignored(&shown) {
        tracing::debug!(path = %shown, "ignored by path pattern");
        return Ok(Verdict::Ignored);
    }

    let content = std::fs::read_to_string(path).map_err(|e| InsertFmtError::io_at(path, e))?;
    Ok(verify_content(&shown, &content, rules))
}

/// Autofix a single `.sql` file.
pub fn fix_file(path: &Path, rules: &IgnoreRules, mode: &Mode) -> Result<FileResult> {
    if !is_sql_file(path, mode.sql_extension()) {
        return Err(InsertFmtError::UnsupportedExtension(path.to_path_buf()));
    }
    apply_verdict(path, verify_file(path, rules)?, mode)
}

/// Autofix every `.sql` file under `dir`, in path order.
/// The first I/O failure aborts the walk; files already rewritten stay rewritten.
pub fn fix_dir(dir: &Path, rules: &IgnoreRules, mode: &Mode) -> Result<Report> {
    let mut report = Report::new();
    for path in get_matching_paths(dir, mode)? {
        let verdict = verify_file(&path, rules)?;
        report.add(apply_verdict(&path, verdict, mode)?);
    }
    Ok(report)
}

fn apply_verdict(path: &Path, verdict: Verdict, mode: &Mode) -> Result<FileResult> {
    let status = match verdict {
        Verdict::Ignored => FileStatus::Ignored,
        Verdict::Unchanged => FileStatus::Unchanged,
        Verdict::Rewrite {
            original,
            formatted,
        } => {
            if mode.diff {
                print_diff(path, &original, &formatted);
            }
            if mode.should_write() {
                std::fs::write(path, &formatted).map_err(|e| InsertFmtError::io_at(path, e))?;
            }
            FileStatus::Changed
        }
    };
    Ok(FileResult::new(path, status))
}

/// Recursively collect the SQL files under `dir`, sorted.
pub fn get_matching_paths(dir: &Path, mode: &Mode) -> Result<Vec<PathBuf>> {
    let mut result = Vec::new();
    collect_sql_files(dir, mode.sql_extension(), &mut result)?;
    result.sort();
    Ok(result)
}

/// Check if a file has the SQL extension.
fn is_sql_file(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

fn collect_sql_files(dir: &Path, extension: &str, result: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| InsertFmtError::io_at(dir, e))?;

    for entry in entries {
        let path = entry.map_err(|e| InsertFmtError::io_at(dir, e))?.path();
        if path.is_dir() {
            collect_sql_files(&path, extension, result)?;
        } else if is_sql_file(&path, extension) {
            result.push(path);
        }
    }
    Ok(())
}

/// Print a diff between original and formatted content.
fn print_diff(path: &Path, original: &str, formatted: &str) {
    use similar::{ChangeTag, TextDiff};

    eprintln!("--- {}", path.display());
    eprintln!("+++ {}", path.display());

    let diff = TextDiff::from_lines(original, formatted);
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        eprint!("{}{}", sign, change);
        if change.missing_newline() {
            eprintln!();
        }
    }
}
