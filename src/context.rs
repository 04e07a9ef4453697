//! Immutable snapshot of the state an action runs against.

use std::path::{Path, PathBuf};

use crate::selection::{SelectionContext, TableRow, TableSelection};

/// Everything an action may read from its host.
///
/// Built once when the action fires and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct ActionContext {
    base_dir: Option<PathBuf>,
    registered_roots: Vec<PathBuf>,
    selections: Vec<SelectionContext>,
}

impl ActionContext {
    /// Creates a context for a workspace rooted at `base_dir`.
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            ..Self::default()
        }
    }

    /// Creates a context with no workspace at all.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Adds roots known to the host's version-control registry.
    pub fn with_roots<I>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.registered_roots.extend(roots);
        self
    }

    /// Adds a selection; earlier selections are trusted more.
    pub fn with_selection(mut self, selection: SelectionContext) -> Self {
        self.selections.push(selection);
        self
    }

    /// Workspace base directory, if any.
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Roots from the host's registry, unfiltered.
    pub fn registered_roots(&self) -> &[PathBuf] {
        &self.registered_roots
    }

    /// Selections in decreasing order of confidence.
    pub fn selections(&self) -> &[SelectionContext] {
        &self.selections
    }

    /// Files selected in any file or change selection, in order.
    pub fn selected_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for selection in &self.selections {
            match selection {
                SelectionContext::Files(paths) => files.extend(paths.iter().cloned()),
                SelectionContext::Changes(changes) => {
                    files.extend(changes.iter().map(|c| c.path.clone()));
                }
                _ => {}
            }
        }
        files
    }
}

/// Parses one table row typed on the command line.
///
/// Cells are separated by tabs, or by `|` when the row has no tabs.
pub fn parse_row(row: &str) -> TableRow {
    let separator = if row.contains('\t') { '\t' } else { '|' };
    TableRow::from_cells(row.split(separator).map(str::trim))
}

/// Wraps parsed rows into a table selection.
pub fn table_from_rows<I, S>(rows: I) -> SelectionContext
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    SelectionContext::Table(TableSelection {
        rows: rows.into_iter().map(|r| parse_row(r.as_ref())).collect(),
    })
}
