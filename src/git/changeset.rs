//! Changed-file collection between a reference commit and the working tree.

use std::collections::HashSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::git::GitRunner;

/// Prefix applied to listing commands so non-ASCII paths come back unquoted.
const UNQUOTED_PATHS: [&str; 2] = ["-c", "core.quotepath=false"];

/// Which files count as "changed since" a reference.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ChangePolicy {
    /// Net difference between the reference and HEAD, plus local changes.
    ///
    /// A file edited and then reverted inside the range does not show up.
    #[default]
    NetDiff,
    /// Every file mentioned by a commit from the reference's parent to HEAD,
    /// plus local changes.
    TouchedSince,
}

impl fmt::Display for ChangePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetDiff => write!(f, "net-diff"),
            Self::TouchedSince => write!(f, "touched-since"),
        }
    }
}

/// Ordered, duplicate-free set of paths changed under a single repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    root: PathBuf,
    entries: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl ChangeSet {
    /// Creates an empty change set rooted at `root`.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Adds a path reported by git, relative to the root.
    ///
    /// Blank entries, duplicates and paths that would escape the root are
    /// ignored. Returns true when the entry was added.
    pub fn insert(&mut self, raw: &str) -> bool {
        let Some(relative) = normalize_entry(raw) else {
            if !raw.trim().is_empty() {
                warn!(entry = raw, "dropping path outside repository root");
            }
            return false;
        };
        if !self.seen.insert(relative.clone()) {
            return false;
        }
        self.entries.push(relative);
        true
    }

    /// Adds every entry in order.
    pub fn extend<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in entries {
            self.insert(entry.as_ref());
        }
    }

    /// Repository root the entries are relative to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entries relative to the root, in discovery order.
    pub fn relative(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Entries joined onto the root, in discovery order.
    ///
    /// The files are not required to exist.
    pub fn absolute(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|e| self.root.join(e)).collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalizes one line of git output into a root-relative path.
///
/// Rejects absolute paths and anything containing `..`.
pub(crate) fn normalize_entry(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut relative = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if relative.as_os_str().is_empty() {
        None
    } else {
        Some(relative)
    }
}

/// Runs a listing command with unquoted path output.
fn list<R: GitRunner + ?Sized>(runner: &R, root: &Path, args: &[&str]) -> Vec<String> {
    let mut full: Vec<&str> = UNQUOTED_PATHS.to_vec();
    full.extend_from_slice(args);
    runner.lines(root, &full)
}

/// Collects the files changed between `reference` and the current working tree.
///
/// Each git step that fails contributes nothing; the remaining steps still
/// run. The caller is expected to have validated `reference` already.
pub fn collect_changes<R: GitRunner + ?Sized>(
    runner: &R,
    root: &Path,
    reference: &str,
    policy: ChangePolicy,
) -> ChangeSet {
    let mut changes = ChangeSet::new(root);

    match policy {
        ChangePolicy::NetDiff => {
            let range = format!("{reference}..HEAD");
            changes.extend(list(
                runner,
                root,
                &["diff", "--name-only", "--diff-filter=ACMR", &range],
            ));
            changes.extend(list(
                runner,
                root,
                &["diff", "--name-only", "--diff-filter=ACMR"],
            ));
            changes.extend(list(
                runner,
                root,
                &["diff", "--name-only", "--cached", "--diff-filter=ACMR"],
            ));
        }
        ChangePolicy::TouchedSince => {
            let parent = format!("{reference}^");
            let base = if runner.succeeds(root, &["rev-parse", "--verify", &parent]) {
                parent
            } else {
                // Root commits have no parent.
                reference.to_string()
            };
            let range = format!("{base}..HEAD");
            changes.extend(list(
                runner,
                root,
                &["log", "--name-only", "--pretty=format:", &range],
            ));
            changes.extend(list(runner, root, &["ls-files", "-m"]));
            changes.extend(list(runner, root, &["diff", "--name-only", "--cached"]));
        }
    }

    changes.extend(list(
        runner,
        root,
        &["ls-files", "--others", "--exclude-standard"],
    ));

    debug!(
        root = %root.display(),
        reference,
        %policy,
        count = changes.len(),
        "collected changed files"
    );
    changes
}
