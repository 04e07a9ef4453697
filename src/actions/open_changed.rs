//! Open every file changed since the selected commit.

use tracing::warn;

use crate::context::ActionContext;
use crate::git::GitRunner;
use crate::notify::Notice;
use crate::resolver::{ChangeSetResolver, Resolution, ResolveError};
use crate::sink::FileOpener;

/// What the action did, for display and for machine-readable output.
#[derive(Debug, Clone)]
pub struct OpenChangedReport {
    /// Notification for the user.
    pub notice: Notice,
    /// The resolution, when one was reached.
    pub resolution: Option<Resolution>,
    /// Number of files the opener accepted.
    pub opened: usize,
}

/// Resolves the changed files for `context` and hands them to `opener`.
///
/// Never fails: every outcome, including opener errors, is reported through
/// the returned notice.
pub fn open_changed_files<R, O>(
    resolver: &ChangeSetResolver<R>,
    context: &ActionContext,
    opener: &mut O,
) -> OpenChangedReport
where
    R: GitRunner,
    O: FileOpener + ?Sized,
{
    let resolution = match resolver.resolve(context) {
        Ok(resolution) => resolution,
        Err(e) => {
            return OpenChangedReport {
                notice: Notice::from_error(&e),
                resolution: None,
                opened: 0,
            }
        }
    };

    if resolution.is_empty() {
        return OpenChangedReport {
            notice: Notice::no_changes(&resolution),
            resolution: Some(resolution),
            opened: 0,
        };
    }

    match opener.open(&resolution.files()) {
        Ok(opened) => OpenChangedReport {
            notice: Notice::opened(&resolution, opened),
            resolution: Some(resolution),
            opened,
        },
        Err(e) => {
            warn!(error = %e, "failed to open changed files");
            let error = ResolveError::Unexpected(format!("{e:#}"));
            OpenChangedReport {
                notice: Notice::from_error(&error),
                resolution: Some(resolution),
                opened: 0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::GitOutput;
    use crate::notify::NoticeKind;
    use crate::selection::SelectionContext;
    use crate::sink::{EditorOpener, RecordingOpener};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Accepts every commit and lists a fixed set of untracked files.
    struct Listing(&'static str);

    impl GitRunner for Listing {
        fn run(&self, _root: &Path, args: &[&str]) -> Option<GitOutput> {
            let stdout = if args.contains(&"--others") { self.0 } else { "" };
            Some(GitOutput {
                success: true,
                stdout: stdout.to_string(),
            })
        }
    }

    struct BrokenOpener;

    impl FileOpener for BrokenOpener {
        fn open(&mut self, _paths: &[PathBuf]) -> anyhow::Result<usize> {
            anyhow::bail!("editor crashed")
        }
    }

    fn workspace() -> (TempDir, ActionContext) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("repo");
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("present.txt"), "here").unwrap();
        let context = ActionContext::new(&root)
            .with_selection(SelectionContext::Text("abcdef0 Add files".to_string()));
        (temp, context)
    }

    #[test]
    fn opens_existing_files_and_skips_missing_ones() {
        let (_temp, context) = workspace();
        let resolver = ChangeSetResolver::new(Listing("present.txt\ndeleted.txt\n"));
        let mut opener = RecordingOpener::default();

        let report = open_changed_files(&resolver, &context, &mut opener);

        assert_eq!(report.notice.kind, NoticeKind::Opened);
        assert_eq!(report.opened, 1);
        assert_eq!(report.resolution.unwrap().changes.len(), 2);
        assert!(opener.opened[0].ends_with("present.txt"));
    }

    #[test]
    fn empty_change_set_is_reported_as_no_changes() {
        let (_temp, context) = workspace();
        let resolver = ChangeSetResolver::new(Listing(""));
        let mut opener = RecordingOpener::default();

        let report = open_changed_files(&resolver, &context, &mut opener);

        assert_eq!(report.notice.kind, NoticeKind::NoChanges);
        assert!(!report.notice.is_error());
        assert!(opener.opened.is_empty());
    }

    #[test]
    fn opener_failure_becomes_unexpected_failure() {
        let (_temp, context) = workspace();
        let resolver = ChangeSetResolver::new(Listing("present.txt\n"));

        let report = open_changed_files(&resolver, &context, &mut BrokenOpener);

        assert_eq!(report.notice.kind, NoticeKind::Failed);
        assert_eq!(
            report.notice,
            Notice::from_error(&ResolveError::Unexpected("editor crashed".to_string()))
        );
        assert!(report.resolution.is_some());
        assert_eq!(report.opened, 0);
    }

    #[test]
    fn unconfigured_editor_is_harmless_without_changes() {
        let (_temp, context) = workspace();
        let resolver = ChangeSetResolver::new(Listing(""));

        let report = open_changed_files(&resolver, &context, &mut EditorOpener::new(""));

        assert_eq!(report.notice.kind, NoticeKind::NoChanges);
        assert!(!report.notice.is_error());
    }

    #[test]
    fn unconfigured_editor_fails_when_files_changed() {
        let (_temp, context) = workspace();
        let resolver = ChangeSetResolver::new(Listing("present.txt\n"));

        let report = open_changed_files(&resolver, &context, &mut EditorOpener::new(""));

        assert_eq!(report.notice.kind, NoticeKind::Failed);
        assert!(report.notice.body.contains("No editor configured"));
    }

    #[test]
    fn resolution_errors_surface_as_notices() {
        let resolver = ChangeSetResolver::new(Listing(""));
        let report = open_changed_files(
            &resolver,
            &ActionContext::detached(),
            &mut RecordingOpener::default(),
        );
        assert_eq!(report.notice.kind, NoticeKind::NoRepository);
        assert!(report.resolution.is_none());
    }
}
