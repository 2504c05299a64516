use memchr::{memchr, memchr2};

/// Whether `b` opens a quoted literal or quoted identifier.
pub(crate) fn is_quote(b: u8) -> bool {
    matches!(b, b'\'' | b'"' | b'`')
}

/// Skip a quoted literal starting at position `i` (which must point to `'`, `"` or `` ` ``).
/// Handles backslash escapes and SQL-style doubled quotes (`'it''s'`).
/// Returns the position after the closing quote, or `bytes.len()` if unterminated.
pub(crate) fn skip_quoted(bytes: &[u8], i: usize) -> usize {
    let quote = bytes[i];
    let mut j = i + 1;
    while j < bytes.len() {
        // Jump straight to the next quote or backslash
        let Some(offset) = memchr2(quote, b'\\', &bytes[j..]) else {
            return bytes.len();
        };
        let end = j + offset;
        if bytes[end] == b'\\' {
            j = end + 2;
            continue;
        }
        if bytes.get(end + 1) == Some(&quote) {
            j = end + 2;
            continue;
        }
        return end + 1;
    }
    bytes.len()
}

/// If a comment starts at `i`, return the position just after it.
/// Line comments end before their newline; block comments after `*/`.
pub(crate) fn skip_comment(bytes: &[u8], i: usize) -> Option<usize> {
    match (bytes[i], bytes.get(i + 1)) {
        (b'-', Some(b'-')) => Some(
            memchr(b'\n', &bytes[i..])
                .map(|offset| i + offset)
                .unwrap_or(bytes.len()),
        ),
        (b'/', Some(b'*')) => {
            let mut j = i + 2;
            while let Some(offset) = memchr(b'*', &bytes[j..]) {
                let star = j + offset;
                if bytes.get(star + 1) == Some(&b'/') {
                    return Some(star + 2);
                }
                j = star + 1;
            }
            Some(bytes.len())
        }
        _ => None,
    }
}

/// Given the index of an opening `(`, find the index of its matching `)`.
/// Parentheses inside literals and comments are not counted.
pub(crate) fn find_closing_paren(bytes: &[u8], open: usize) -> Option<usize> {
    debug_assert_eq!(bytes[open], b'(');
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        let b = bytes[i];
        if is_quote(b) {
            i = skip_quoted(bytes, i);
            continue;
        }
        if let Some(next) = skip_comment(bytes, i) {
            i = next;
            continue;
        }
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Split `s` on commas at parenthesis depth zero, outside literals and comments.
/// Pieces are returned trimmed; an empty input yields a single empty piece.
pub(crate) fn split_top_level(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if is_quote(b) {
            i = skip_quoted(bytes, i);
            continue;
        }
        if let Some(next) = skip_comment(bytes, i) {
            i = next;
            continue;
        }
        match b {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                pieces.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    pieces.push(s[start..].trim());
    pieces
}

/// Whether `s` holds a `--` comment outside literals.
pub(crate) fn has_line_comment(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if is_quote(b) {
            i = skip_quoted(bytes, i);
            continue;
        }
        match skip_comment(bytes, i) {
            Some(_) if b == b'-' => return true,
            Some(next) => i = next,
            None => i += 1,
        }
    }
    false
}

/// Whether `s` consists only of whitespace and comments.
pub(crate) fn only_trivia(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() {
            i += 1;
            continue;
        }
        match skip_comment(bytes, i) {
            Some(next) => i = next,
            None => return false,
        }
    }
    true
}
