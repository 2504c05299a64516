//! Review mode: turn a merge change-set into review comments.

use crate::api::{verify_content, Verdict};
use crate::comment::{comment_create, comment_generate_id, CommentRecord};
use crate::config::{Config, ReviewSettings};
use crate::error::{InsertFmtError, Result};
use crate::ignore::IgnoreRules;

pub const FILE_PATH_PLACEHOLDER: &str = "${FILE_PATH}";
pub const FORMATTED_PLACEHOLDER: &str = "${FORMATTED}";

const SQL_SUFFIX: &str = ".sql";
const COMMENT_LANGUAGE: &str = "sql";

/// Review every changed SQL file of the configured merge.
pub fn review(config: &Config) -> Result<Vec<CommentRecord>> {
    let settings = config.review_settings()?;
    review_changes(&settings, config.ignore_rules())
}

/// One comment per changed SQL file that is not in canonical form, in
/// change-set order.
pub fn review_changes(
    settings: &ReviewSettings<'_>,
    rules: &IgnoreRules,
) -> Result<Vec<CommentRecord>> {
    let mut comments = Vec::new();

    for change in settings.changes {
        if change.deleted_file || !change.new_path.ends_with(SQL_SUFFIX) {
            continue;
        }
        if rules.is_ignored(&change.new_path) {
            tracing::debug!(path = %change.new_path, "ignored by path pattern");
            continue;
        }

        let path = settings.path_source.join(&change.new_path);
        tracing::info!(path = %path.display(), "verifying file");
        let content =
            std::fs::read_to_string(&path).map_err(|e| InsertFmtError::io_at(&path, e))?;

        if let Verdict::Rewrite { formatted, .. } =
            verify_content(&change.new_path, &content, rules)
        {
            comments.push(build_comment(settings.message, &change.new_path, &formatted));
        }
    }

    Ok(comments)
}

fn build_comment(template: &str, path: &str, formatted: &str) -> CommentRecord {
    let description = template
        .replace(FILE_PATH_PLACEHOLDER, path)
        .replace(FORMATTED_PLACEHOLDER, &render_formatted(formatted));

    comment_create(
        comment_generate_id(&description),
        path,
        description,
        false,
        1,
        1,
        COMMENT_LANGUAGE,
    )
}

/// Render SQL text as a `<pre>` block with one `<br>` per line break.
pub fn render_formatted(formatted: &str) -> String {
    let lines: Vec<String> = formatted.split('\n').map(escape_html).collect();
    format!("<pre>{}</pre>", lines.join("<br>"))
}

fn escape_html(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for ch in line.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
