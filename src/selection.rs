//! Selection contexts and commit reference extraction.
//!
//! A host hands over whatever the user had selected when an action fired.
//! Each supported shape is one variant of [`SelectionContext`]; the
//! extractor walks them and produces commit hash candidates ordered by
//! confidence, structured accessors before rendered text.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::git::{FULL_HASH_LEN, MIN_HASH_LEN};

/// Hex tokens between 7 and 40 characters, word-bounded.
#[allow(clippy::unwrap_used)] // pattern built from constants
static HEX_TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b[0-9a-fA-F]{{{MIN_HASH_LEN},{FULL_HASH_LEN}}}\b"
    ))
    .unwrap()
});

/// A value that may identify a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitValue {
    /// A bare hash, or any string that may contain one.
    Hash(String),
    /// A structured commit record with optional nested identifiers.
    Record(CommitRecord),
    /// Several values; each element yields its own candidates.
    List(Vec<CommitValue>),
}

/// Structured commit record as exposed by a commit log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Primary hash accessor.
    #[serde(default)]
    pub hash: Option<Box<CommitValue>>,
    /// Identifier accessor, often itself a record wrapping the hash.
    #[serde(default)]
    pub id: Option<Box<CommitValue>>,
    /// Full-length hash accessor.
    #[serde(default)]
    pub full_hash: Option<Box<CommitValue>>,
    /// Short-form hash accessor.
    #[serde(default)]
    pub short: Option<Box<CommitValue>>,
    /// Rendered form of the record, scanned last.
    #[serde(default)]
    pub display: Option<String>,
}

impl CommitValue {
    /// Convenience constructor for a bare hash.
    pub fn hash<S: Into<String>>(value: S) -> Self {
        Self::Hash(value.into())
    }
}

/// A single-index accessor on a table's row model.
///
/// `value` is `None` when the accessor is not supported for that row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowAccessor {
    /// Accessor name, used for ranking.
    pub name: String,
    /// Value returned for the selected row.
    pub value: Option<CommitValue>,
}

/// One selected row of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Rendered text of every visible column.
    #[serde(default)]
    pub cells: Vec<String>,
    /// Accessors on the underlying row model.
    #[serde(default)]
    pub accessors: Vec<RowAccessor>,
}

impl TableRow {
    /// Builds a row from rendered cells only.
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            accessors: Vec::new(),
        }
    }
}

/// Rows selected in a tabular view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSelection {
    /// Selected rows, in view order.
    pub rows: Vec<TableRow>,
}

/// A file entry from a version-control changes view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Path of the changed file.
    pub path: PathBuf,
    /// Revision the change belongs to, if the view shows one.
    #[serde(default)]
    pub revision: Option<String>,
}

/// What the user had selected when an action was triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionContext {
    /// Commits selected in a commit log.
    Commits(Vec<CommitValue>),
    /// Rows selected in a table.
    Table(TableSelection),
    /// Free-form rendered text.
    Text(String),
    /// Files selected in a project view.
    Files(Vec<PathBuf>),
    /// Entries selected in a changes view.
    Changes(Vec<ChangeRecord>),
}

/// Ordered, distinct commit reference candidates.
#[derive(Debug, Clone, Default)]
struct Candidates {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl Candidates {
    fn push(&mut self, token: &str) {
        if self.seen.insert(token.to_string()) {
            self.ordered.push(token.to_string());
        }
    }

    fn scan(&mut self, text: &str) {
        for token in scan_hex_tokens(text) {
            self.push(token);
        }
    }

    fn value(&mut self, value: &CommitValue) {
        match value {
            CommitValue::Hash(text) => self.scan(text),
            CommitValue::List(items) => {
                for item in items {
                    self.value(item);
                }
            }
            CommitValue::Record(record) => {
                let nested = [&record.hash, &record.id, &record.full_hash, &record.short];
                for inner in nested.into_iter().flatten() {
                    self.value(inner);
                }
                if let Some(display) = &record.display {
                    self.scan(display);
                }
            }
        }
    }

    fn table(&mut self, table: &TableSelection) {
        for row in &table.rows {
            for cell in &row.cells {
                self.scan(cell);
            }
        }
        for row in &table.rows {
            for accessor in ranked_accessors(&row.accessors) {
                if let Some(value) = &accessor.value {
                    self.value(value);
                }
            }
        }
    }

    fn selection(&mut self, selection: &SelectionContext) {
        match selection {
            SelectionContext::Commits(values) => {
                for value in values {
                    self.value(value);
                }
            }
            SelectionContext::Table(table) => self.table(table),
            SelectionContext::Text(text) => self.scan(text),
            SelectionContext::Files(_) => {}
            SelectionContext::Changes(changes) => {
                for revision in changes.iter().filter_map(|c| c.revision.as_deref()) {
                    self.scan(revision);
                }
            }
        }
    }
}

/// Returns every hex token of commit-hash length in `text`, in order.
pub fn scan_hex_tokens(text: &str) -> impl Iterator<Item = &str> {
    HEX_TOKEN_PATTERN.find_iter(text).map(|m| m.as_str())
}

/// Ranks an accessor name: `hash` > `commit` > `id` > anything else.
fn accessor_rank(name: &str) -> u8 {
    let lower = name.to_lowercase();
    if lower.contains("hash") {
        4
    } else if lower.contains("commit") {
        3
    } else if lower.contains("id") {
        2
    } else {
        0
    }
}

/// Orders accessors by descending rank, keeping declaration order on ties.
fn ranked_accessors(accessors: &[RowAccessor]) -> Vec<&RowAccessor> {
    let mut ranked: Vec<&RowAccessor> = accessors.iter().collect();
    ranked.sort_by_key(|a| std::cmp::Reverse(accessor_rank(&a.name)));
    ranked
}

/// Extracts commit reference candidates from a sequence of selections.
///
/// Selections are visited in order; within each, structured accessors come
/// before rendered text. The result is distinct and may be empty.
pub fn extract_candidates(selections: &[SelectionContext]) -> Vec<String> {
    let mut candidates = Candidates::default();
    for selection in selections {
        candidates.selection(selection);
    }
    debug!(count = candidates.ordered.len(), "extracted commit candidates");
    candidates.ordered
}
