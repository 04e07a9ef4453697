//! Commit reference validation.

use std::path::Path;

use tracing::debug;

use crate::git::GitRunner;

/// Returns true when `reference` names a commit object in the repository at `root`.
///
/// Uses `git cat-file -e <ref>^{commit}`; a launch failure counts as invalid.
pub fn commit_exists<R: GitRunner + ?Sized>(runner: &R, root: &Path, reference: &str) -> bool {
    let object = format!("{reference}^{{commit}}");
    let valid = runner.succeeds(root, &["cat-file", "-e", &object]);
    debug!(root = %root.display(), reference, valid, "validated commit candidate");
    valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::GitOutput;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<Vec<String>>>,
        accept: bool,
    }

    impl GitRunner for Recorder {
        fn run(&self, _root: &Path, args: &[&str]) -> Option<GitOutput> {
            self.calls
                .borrow_mut()
                .push(args.iter().map(ToString::to_string).collect());
            Some(GitOutput {
                success: self.accept,
                stdout: String::new(),
            })
        }
    }

    #[test]
    fn peels_reference_to_commit() {
        let runner = Recorder {
            accept: true,
            ..Recorder::default()
        };
        assert!(commit_exists(&runner, Path::new("/repo"), "abc1234"));
        assert_eq!(
            runner.calls.borrow()[0],
            vec!["cat-file", "-e", "abc1234^{commit}"]
        );
    }

    #[test]
    fn non_zero_exit_is_invalid() {
        let runner = Recorder::default();
        assert!(!commit_exists(&runner, Path::new("/repo"), "deadbeef"));
    }
}
