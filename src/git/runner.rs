//! Subprocess plumbing for the `git` command line tool.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

/// Captured result of a finished `git` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitOutput {
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Standard output, lossily decoded.
    pub stdout: String,
}

/// Runs `git` with an argument vector inside a repository root.
///
/// Implementations return `None` when the process could not be launched at
/// all; a non-zero exit is reported through [`GitOutput::success`].
pub trait GitRunner {
    /// Runs `git <args>` with `root` as the working directory.
    fn run(&self, root: &Path, args: &[&str]) -> Option<GitOutput>;

    /// Runs a listing command and returns its non-blank, trimmed lines.
    ///
    /// Launch failures and non-zero exits both yield an empty list.
    fn lines(&self, root: &Path, args: &[&str]) -> Vec<String> {
        match self.run(root, args) {
            Some(output) if output.success => output
                .stdout
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(ToString::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Returns true when the command launched and exited with status zero.
    fn succeeds(&self, root: &Path, args: &[&str]) -> bool {
        self.run(root, args).is_some_and(|output| output.success)
    }
}

/// [`GitRunner`] backed by the `git` executable on `PATH`.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: PathBuf,
}

impl Default for SystemGit {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }
}

impl SystemGit {
    /// Uses `git` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a specific executable instead of `git` from `PATH`.
    pub fn with_program<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Returns the executable this runner launches.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl GitRunner for SystemGit {
    fn run(&self, root: &Path, args: &[&str]) -> Option<GitOutput> {
        // `output()` drains stdout and stderr before waiting on the child.
        let result = Command::new(&self.program)
            .args(args)
            .current_dir(root)
            .output();

        match result {
            Ok(output) => {
                debug!(
                    root = %root.display(),
                    ?args,
                    status = ?output.status.code(),
                    "git finished"
                );
                Some(GitOutput {
                    success: output.status.success(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                })
            }
            Err(e) => {
                debug!(root = %root.display(), ?args, error = %e, "failed to launch git");
                None
            }
        }
    }
}
