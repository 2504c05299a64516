use std::sync::LazyLock;

use regex::Regex;

use crate::classifier::{classify, StatementKind};
use crate::prettify::prettify;
use crate::string_utils::{find_closing_paren, has_line_comment, only_trivia, split_top_level};

/// `INSERT INTO <table> (` with the table name captured.
static INSERT_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)INSERT\s+INTO\s+([\w.]+)\s*\(").unwrap());

/// `VALUES (` directly after the column list.
static VALUES_HEAD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\A\s*VALUES\s*\(").unwrap());

const INDENT: &str = "    ";

/// Result of trying to bring a SQL blob into canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    /// The blob is not exactly one single-row INSERT.
    NotApplicable,
    /// A single-row INSERT whose shape could not be restructured.
    /// Carries the pretty-printed text for callers that want it.
    Unformattable(String),
    /// The canonical text, not yet standardized.
    Formatted(String),
}

impl FormatOutcome {
    pub fn is_formatted(&self) -> bool {
        matches!(self, FormatOutcome::Formatted(_))
    }

    /// The canonical text, when the blob was restructured.
    pub fn formatted(&self) -> Option<&str> {
        match self {
            FormatOutcome::Formatted(text) => Some(text),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormatOutcome::NotApplicable => "not applicable",
            FormatOutcome::Unformattable(_) => "unformattable",
            FormatOutcome::Formatted(_) => "formatted",
        }
    }
}

/// Classify `sql` and, if it is a lone single-row INSERT, rewrite it into
/// canonical form.
pub fn format_sql(sql: &str) -> FormatOutcome {
    let kinds = classify(sql);
    if kinds.single() != Some(StatementKind::Insert) {
        tracing::trace!(kinds = %kinds, "statement kinds do not allow formatting");
        return FormatOutcome::NotApplicable;
    }

    let pretty = prettify(sql);
    match format_insert(&pretty) {
        Some(formatted) => FormatOutcome::Formatted(formatted),
        None => FormatOutcome::Unformattable(pretty),
    }
}

/// The column and value lists of one `INSERT ... VALUES (...)` statement.
struct InsertShape<'a> {
    columns: Vec<&'a str>,
    values: Vec<&'a str>,
    /// Byte offset just past the statement (and its `;`, if any).
    end: usize,
}

/// Rewrite every `INSERT INTO t (cols) VALUES (vals)` in `sql` into canonical
/// layout. Text around the statements is kept as is.
/// Returns `None` if no statement had the expected shape.
pub(crate) fn format_insert(sql: &str) -> Option<String> {
    let text = sql.trim();
    let mut out = String::with_capacity(text.len() + 64);
    let mut cursor = 0;
    let mut search_from = 0;
    let mut rewrote = false;

    while let Some(caps) = INSERT_HEAD.captures_at(text, search_from) {
        let (Some(head), Some(table)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        match match_insert_at(text, head.end() - 1) {
            Some(shape) => {
                out.push_str(&text[cursor..head.start()]);
                render_insert(&mut out, table.as_str(), &shape);
                cursor = shape.end;
                search_from = shape.end;
                rewrote = true;
            }
            None => search_from = head.end(),
        }
    }

    if !rewrote {
        return None;
    }
    out.push_str(&text[cursor..]);
    Some(out)
}

/// Match `(cols) VALUES (vals);?` where `open` indexes the column list's `(`.
/// The values group must end the statement: only a `;`, comments or the end
/// of the text may follow it.
fn match_insert_at(text: &str, open: usize) -> Option<InsertShape<'_>> {
    let bytes = text.as_bytes();
    let columns_close = find_closing_paren(bytes, open)?;
    let columns = &text[open + 1..columns_close];

    let values_head = VALUES_HEAD.find(&text[columns_close + 1..])?;
    let values_open = columns_close + values_head.end();
    let values_close = find_closing_paren(bytes, values_open)?;
    let values = &text[values_open + 1..values_close];

    if columns.trim().is_empty() || values.trim().is_empty() {
        return None;
    }

    let end = statement_end(text, values_close + 1)?;

    let columns = split_top_level(columns);
    let values = split_top_level(values);
    // A `--` comment inside a piece would swallow the separator emitted after it
    if columns.iter().chain(&values).any(|piece| has_line_comment(piece)) {
        return None;
    }

    Some(InsertShape {
        columns,
        values,
        end,
    })
}

/// Where the statement ends when its values group closes just before `from`.
/// Whitespace up to a `;` is consumed with it; trailing comments are kept.
fn statement_end(text: &str, from: usize) -> Option<usize> {
    let rest = &text[from..];
    let skipped = rest.len() - rest.trim_start().len();
    if rest[skipped..].starts_with(';') {
        return Some(from + skipped + 1);
    }
    only_trivia(rest).then_some(from)
}

fn render_insert(out: &mut String, table: &str, shape: &InsertShape<'_>) {
    let columns: Vec<String> = shape
        .columns
        .iter()
        .map(|col| format!("{}{}", INDENT, col.to_lowercase()))
        .collect();
    let values: Vec<String> = shape
        .values
        .iter()
        .map(|val| format!("{}{}", INDENT, val))
        .collect();

    out.push_str("INSERT INTO ");
    out.push_str(table);
    out.push_str(" (\n");
    out.push_str(&columns.join(",\n"));
    out.push_str("\n) VALUES (\n");
    out.push_str(&values.join(",\n"));
    out.push_str("\n);");
}
