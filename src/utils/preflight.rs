//! Preflight validation checks for early failure detection
//!
//! These run before any real work so a missing tool fails fast with a clear
//! message instead of degrading into "nothing found".

use std::path::Path;

use anyhow::{bail, Result};

use crate::git::GitRunner;

/// Validate the git executable can be launched
///
/// Only launching matters: the exit status of `git --version` is ignored.
pub fn check_git_cli<R: GitRunner + ?Sized>(runner: &R, dir: &Path) -> Result<()> {
    if runner.run(dir, &["--version"]).is_none() {
        bail!(
            "Git (git) is not installed or not in PATH.\n\
             Please install it from https://git-scm.com/"
        );
    }
    Ok(())
}
