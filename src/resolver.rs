//! Changed-file resolution for a selected commit.
//!
//! The resolver finds the repository roots of a workspace, scrapes commit
//! candidates from the selection, picks the first (root, candidate) pair git
//! accepts and collects the files changed since that commit. Roots are tried
//! in order and, within a root, candidates in order.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::context::ActionContext;
use crate::git::{collect_changes, commit_exists, locate_roots, ChangePolicy, ChangeSet, GitRunner};
use crate::selection::extract_candidates;
use crate::utils::preflight::check_git_cli;

/// Terminal failures of a resolution.
///
/// An empty change set is not an error; see [`Resolution::is_empty`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No repository root could be found for the workspace.
    #[error("No Git root detected for this workspace")]
    NoRepositoryFound,

    /// The selection contains nothing that looks like a commit hash.
    #[error("No commit hash found in the current selection")]
    NoCommitCandidate,

    /// No candidate names a commit in any root.
    #[error(
        "None of {} commit candidate(s) resolves to a commit in {} Git root(s)",
        candidates.len(),
        roots.len()
    )]
    NoValidCommitResolved {
        /// Candidates that were tried, in order.
        candidates: Vec<String>,
        /// Roots that were tried, in order.
        roots: Vec<PathBuf>,
    },

    /// The git executable could not be launched.
    #[error("Git is unavailable: {0}")]
    SubprocessUnavailable(String),

    /// Anything else, with a human-readable message.
    ///
    /// `resolve` itself never returns this; actions use it for failures of
    /// their collaborators, such as an editor that cannot be launched.
    #[error("{0}")]
    Unexpected(String),
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Commit the changes are measured from.
    pub reference: String,
    /// Policy used to collect the changes.
    pub policy: ChangePolicy,
    /// Changed files, all under a single root.
    pub changes: ChangeSet,
}

impl Resolution {
    /// Repository root the resolution was made in.
    pub fn root(&self) -> &Path {
        self.changes.root()
    }

    /// Absolute paths of the changed files, in discovery order.
    pub fn files(&self) -> Vec<PathBuf> {
        self.changes.absolute()
    }

    /// Whether the reference is valid but nothing changed since.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Resolves the files changed since the commit selected in a context.
#[derive(Debug, Clone)]
pub struct ChangeSetResolver<R> {
    runner: R,
    policy: ChangePolicy,
}

impl<R: GitRunner> ChangeSetResolver<R> {
    /// Creates a resolver using the default [`ChangePolicy`].
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            policy: ChangePolicy::default(),
        }
    }

    /// Selects the changed-file policy.
    pub fn with_policy(mut self, policy: ChangePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Policy in effect.
    pub fn policy(&self) -> ChangePolicy {
        self.policy
    }

    /// Runs a full resolution against `context`.
    pub fn resolve(&self, context: &ActionContext) -> Result<Resolution, ResolveError> {
        let roots = locate_roots(context.registered_roots(), context.base_dir());
        if roots.is_empty() {
            return Err(ResolveError::NoRepositoryFound);
        }

        let candidates = extract_candidates(context.selections());
        if candidates.is_empty() {
            return Err(ResolveError::NoCommitCandidate);
        }
        debug!(roots = roots.len(), candidates = candidates.len(), "gathered candidates");

        check_git_cli(&self.runner, &roots[0])
            .map_err(|e| ResolveError::SubprocessUnavailable(e.to_string()))?;

        let chosen = self
            .choose(&roots, &candidates)
            .map(|(root, reference)| (root.to_path_buf(), reference.to_string()));
        let Some((root, reference)) = chosen else {
            return Err(ResolveError::NoValidCommitResolved { candidates, roots });
        };
        info!(root = %root.display(), %reference, "resolved commit");

        let changes = collect_changes(&self.runner, &root, &reference, self.policy);
        Ok(Resolution {
            reference,
            policy: self.policy,
            changes,
        })
    }

    /// Returns the first (root, candidate) pair naming a real commit.
    ///
    /// Pairs are tried root-major, candidate-minor, and the search stops at
    /// the first hit.
    pub fn choose<'a>(
        &self,
        roots: &'a [PathBuf],
        candidates: &'a [String],
    ) -> Option<(&'a Path, &'a str)> {
        roots.iter().find_map(|root| {
            candidates
                .iter()
                .find(|candidate| commit_exists(&self.runner, root, candidate))
                .map(|candidate| (root.as_path(), candidate.as_str()))
        })
    }
}
