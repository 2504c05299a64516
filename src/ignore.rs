use regex::Regex;

use crate::error::{InsertFmtError, Result};

/// Token a SQL author embeds in a file to exempt it from formatting.
pub const IGNORE_MARKER: &str = "acr-skip { acr-sql-format }";

/// Whether the file content carries the ignore marker.
pub fn has_ignore_marker(content: &str) -> bool {
    content.contains(IGNORE_MARKER)
}

/// Path patterns that exempt files from formatting.
///
/// A pattern matches when it matches at the start of the path; it does not
/// need to consume the whole path.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    patterns: Vec<Regex>,
}

impl IgnoreRules {
    /// Compile the configured patterns, failing on the first invalid one.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(&format!(r"\A(?:{})", pattern)).map_err(|source| {
                    InsertFmtError::InvalidPattern {
                        pattern: pattern.to_string(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The first pattern matching `path`, in configuration order.
    pub fn first_match(&self, path: &str) -> Option<&Regex> {
        self.patterns.iter().find(|re| re.is_match(path))
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        self.first_match(path).is_some()
    }
}
