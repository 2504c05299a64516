//! Generic SQL pretty-printer.
//!
//! Upper-cases keywords, collapses runs of whitespace outside literals and
//! comments, and starts each top-level clause on its own line. It knows nothing
//! about statement structure; the INSERT restructuring happens in
//! [`crate::formatter`] on top of this normalized text.

use crate::string_utils::{is_quote, skip_comment, skip_quoted};

/// Words upper-cased when they appear outside literals and are not part of a
/// dotted name.
static KEYWORDS: phf::Set<&'static str> = phf::phf_set! {
    "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CAST",
    "CONFLICT", "CREATE", "CROSS", "DEFAULT", "DELETE", "DESC", "DISTINCT",
    "DO", "DROP", "DUPLICATE", "ELSE", "END", "EXCEPT", "EXISTS", "FALSE",
    "FROM", "FULL", "GROUP", "HAVING", "IGNORE", "IN", "INNER", "INSERT",
    "INTERSECT", "INTERVAL", "INTO", "IS", "JOIN", "KEY", "LEFT", "LIKE",
    "LIMIT", "NOT", "NOTHING", "NULL", "OFFSET", "ON", "OR", "ORDER", "OUTER",
    "REPLACE", "RETURNING", "RIGHT", "SELECT", "SET", "TABLE", "THEN", "TRUE",
    "UNION", "UPDATE", "USING", "VALUES", "WHEN", "WHERE", "WITH",
};

/// Keywords that open a new line when they appear at parenthesis depth zero.
static CLAUSE_KEYWORDS: phf::Set<&'static str> = phf::phf_set! {
    "VALUES", "FROM", "WHERE", "SET", "GROUP", "ORDER", "HAVING", "LIMIT",
    "UNION", "RETURNING",
};

/// Separator owed before the next emitted token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Gap {
    None,
    Space,
    Newline,
}

struct Printer {
    out: String,
    gap: Gap,
    depth: usize,
}

impl Printer {
    fn owe(&mut self, gap: Gap) {
        self.gap = self.gap.max(gap);
    }

    fn emit(&mut self, text: &str) {
        if !self.out.is_empty() {
            match self.gap {
                Gap::None => {}
                Gap::Space => self.out.push(' '),
                Gap::Newline => {
                    let kept = self.out.trim_end_matches(' ').len();
                    self.out.truncate(kept);
                    self.out.push('\n');
                }
            }
        }
        self.gap = Gap::None;
        self.out.push_str(text);
    }

    fn last_char(&self) -> Option<char> {
        self.out.chars().next_back()
    }
}

fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_word_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Reindent `sql` and upper-case its keywords.
pub fn prettify(sql: &str) -> String {
    let bytes = sql.as_bytes();
    let mut printer = Printer {
        out: String::with_capacity(sql.len()),
        gap: Gap::None,
        depth: 0,
    };

    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];

        if b.is_ascii_whitespace() {
            printer.owe(Gap::Space);
            i += 1;
            continue;
        }

        if is_quote(b) {
            let end = skip_quoted(bytes, i);
            printer.emit(&sql[i..end]);
            i = end;
            continue;
        }

        if let Some(end) = skip_comment(bytes, i) {
            let is_line_comment = b == b'-';
            printer.emit(sql[i..end].trim_end());
            if is_line_comment {
                printer.owe(Gap::Newline);
            }
            i = end;
            continue;
        }

        if is_word_start(b) {
            let mut end = i + 1;
            while end < bytes.len() && is_word_continue(bytes[end]) {
                end += 1;
            }
            let word = &sql[i..end];
            let upper = word.to_ascii_uppercase();
            let dotted = (printer.gap == Gap::None && printer.last_char() == Some('.'))
                || bytes.get(end) == Some(&b'.');

            if dotted || !KEYWORDS.contains(upper.as_str()) {
                printer.emit(word);
            } else {
                if printer.depth == 0 && CLAUSE_KEYWORDS.contains(upper.as_str()) {
                    printer.owe(Gap::Newline);
                }
                printer.emit(&upper);
            }
            i = end;
            continue;
        }

        match b {
            b'(' => printer.depth += 1,
            b')' => printer.depth = printer.depth.saturating_sub(1),
            _ => {}
        }

        // Multi-byte characters are copied whole.
        let ch_len = sql[i..].chars().next().map(char::len_utf8).unwrap_or(1);
        printer.emit(&sql[i..i + ch_len]);
        i += ch_len;

        if b == b';' && printer.depth == 0 {
            printer.owe(Gap::Newline);
        }
    }

    printer.out
}
