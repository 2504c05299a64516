use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// A parenthesized value tuple followed by a comma and another tuple.
static MULTI_ROW_VALUES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"VALUES\s*\([^\\)]+\)\s*,\s*\(").unwrap());

/// Kinds of statement the classifier can detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// `INSERT INTO ... VALUES (...)` with a single value tuple.
    Insert,
    /// `INSERT INTO ... VALUES (...), (...)`.
    InsertMulti,
    Delete,
    Select,
    Update,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatementKind::Insert => "INSERT",
            StatementKind::InsertMulti => "INSERT_MULTI",
            StatementKind::Delete => "DELETE",
            StatementKind::Select => "SELECT",
            StatementKind::Update => "UPDATE",
        };
        f.write_str(name)
    }
}

/// The statement kinds found in one SQL blob, in detection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementKinds {
    kinds: Vec<StatementKind>,
}

impl StatementKinds {
    fn add(&mut self, kind: StatementKind) {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn contains(&self, kind: StatementKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// The only kind present, if exactly one was detected.
    pub fn single(&self) -> Option<StatementKind> {
        match self.kinds.as_slice() {
            [kind] => Some(*kind),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = StatementKind> + '_ {
        self.kinds.iter().copied()
    }
}

impl fmt::Display for StatementKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.kinds.iter().map(ToString::to_string).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

/// Detect which statement kinds appear in `sql`.
///
/// Detection is a case-insensitive substring check over the whole blob; it
/// does not parse. An `INSERT INTO` whose values clause lists more than one
/// tuple counts as `InsertMulti` and never also as `Insert`.
pub fn classify(sql: &str) -> StatementKinds {
    let upper = sql.to_uppercase();
    let mut kinds = StatementKinds::default();

    if upper.contains("INSERT INTO") {
        if MULTI_ROW_VALUES.is_match(&upper) {
            kinds.add(StatementKind::InsertMulti);
        } else {
            kinds.add(StatementKind::Insert);
        }
    }

    if upper.contains("DELETE FROM") {
        kinds.add(StatementKind::Delete);
    }

    if upper.contains("SELECT") {
        kinds.add(StatementKind::Select);
    }

    if upper.contains("UPDATE") {
        kinds.add(StatementKind::Update);
    }

    kinds
}
