//! User-facing notifications for action outcomes.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::git::SHORT_HASH_LEN;
use crate::resolver::{Resolution, ResolveError};

/// Candidates listed in a "couldn't resolve" notice before truncating.
const MAX_LISTED_CANDIDATES: usize = 20;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Completed as asked.
    Info,
    /// Nothing to do, or the selection was unusable.
    Warning,
    /// The action could not run.
    Error,
}

/// Which outcome a notice reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoticeKind {
    /// No repository root found.
    NoRepository,
    /// Selection had no commit-like token.
    NoCommitCandidate,
    /// No candidate resolved in any root.
    NoValidCommit,
    /// Git could not be launched.
    GitUnavailable,
    /// Valid commit, nothing changed since.
    NoChanges,
    /// Files were opened.
    Opened,
    /// Anything else.
    Failed,
}

/// A notification shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Outcome reported.
    pub kind: NoticeKind,
    /// Severity.
    pub level: NoticeLevel,
    /// One-line title.
    pub title: String,
    /// Details, possibly multi-line.
    pub body: String,
}

impl Notice {
    fn new(kind: NoticeKind, level: NoticeLevel, title: &str, body: String) -> Self {
        Self {
            kind,
            level,
            title: title.to_string(),
            body,
        }
    }

    /// Notice for a failed resolution.
    pub fn from_error(error: &ResolveError) -> Self {
        match error {
            ResolveError::NoRepositoryFound => Self::new(
                NoticeKind::NoRepository,
                NoticeLevel::Error,
                "No Git root detected",
                "Couldn't find any Git roots for this workspace.".to_string(),
            ),
            ResolveError::NoCommitCandidate => Self::new(
                NoticeKind::NoCommitCandidate,
                NoticeLevel::Warning,
                "Couldn't read selected commit",
                "Select a commit row (its hash must be visible or attached to the row), \
                 or pass the hash with --commit."
                    .to_string(),
            ),
            ResolveError::NoValidCommitResolved { candidates, roots } => Self::new(
                NoticeKind::NoValidCommit,
                NoticeLevel::Error,
                "Couldn't resolve commit in any Git root",
                unresolved_body(candidates, roots),
            ),
            ResolveError::SubprocessUnavailable(message) => Self::new(
                NoticeKind::GitUnavailable,
                NoticeLevel::Error,
                "Git is unavailable",
                message.clone(),
            ),
            ResolveError::Unexpected(message) => Self::failed(message),
        }
    }

    /// Notice for a valid commit with nothing changed since.
    pub fn no_changes(resolution: &Resolution) -> Self {
        Self::new(
            NoticeKind::NoChanges,
            NoticeLevel::Warning,
            "No changed files found",
            format!(
                "No changed files found since {}.\nRoot: {}\n\nPolicy: {}",
                short_hash(&resolution.reference),
                resolution.root().display(),
                resolution.policy
            ),
        )
    }

    /// Notice for files opened from a resolution.
    pub fn opened(resolution: &Resolution, count: usize) -> Self {
        Self::new(
            NoticeKind::Opened,
            NoticeLevel::Info,
            "Opened changed files",
            format!(
                "Opened {count} file(s) changed since {}.\nRoot: {}",
                short_hash(&resolution.reference),
                resolution.root().display()
            ),
        )
    }

    /// Notice for an unexpected failure.
    pub fn failed(message: &str) -> Self {
        Self::new(
            NoticeKind::Failed,
            NoticeLevel::Error,
            "Opening changed files failed",
            message.to_string(),
        )
    }

    /// Whether the notice reports a failure.
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        writeln!(f, "{label}: {}", self.title)?;
        for line in self.body.lines() {
            if line.is_empty() {
                writeln!(f)?;
            } else {
                writeln!(f, "  {line}")?;
            }
        }
        Ok(())
    }
}

/// Truncates a commit hash to [`SHORT_HASH_LEN`] characters.
pub(crate) fn short_hash(hash: &str) -> &str {
    hash.get(..SHORT_HASH_LEN).unwrap_or(hash)
}

fn unresolved_body(candidates: &[String], roots: &[PathBuf]) -> String {
    let mut body = String::from("Candidates:\n");
    for candidate in candidates.iter().take(MAX_LISTED_CANDIDATES) {
        body.push_str(&format!("• {candidate}\n"));
    }
    if candidates.len() > MAX_LISTED_CANDIDATES {
        body.push_str(&format!(
            "• … (+{} more)\n",
            candidates.len() - MAX_LISTED_CANDIDATES
        ));
    }
    body.push_str("\nGit roots:\n");
    for root in roots {
        body.push_str(&format!("• {}\n", root.display()));
    }
    body.push_str("\nThis usually means the selection isn't a commit row.");
    body
}
