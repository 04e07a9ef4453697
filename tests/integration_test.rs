use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use ctxkit::actions::{copy_file_contents, open_changed_files, ExcludeFilter, HeaderStyle};
use ctxkit::context::ActionContext;
use ctxkit::git::{collect_changes, ChangePolicy, GitRunner, SystemGit};
use ctxkit::notify::NoticeKind;
use ctxkit::resolver::{ChangeSetResolver, ResolveError};
use ctxkit::selection::{CommitValue, SelectionContext};
use ctxkit::sink::{RecordingClipboard, RecordingOpener};
use git2::{Repository, Signature};
use tempfile::TempDir;

/// Test setup that creates a temporary git repository with test commits
struct TestRepo {
    _temp_dir: TempDir,
    repo_path: PathBuf,
    repo: Repository,
    commits: Vec<git2::Oid>,
}

impl TestRepo {
    fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        // Canonical so absolute paths compare equal to what git reports
        let repo_path = temp_dir.path().canonicalize()?;

        let repo = Repository::init(&repo_path)?;

        let mut config = repo.config()?;
        config.set_str("user.name", "Test User")?;
        config.set_str("user.email", "test@example.com")?;

        Ok(TestRepo {
            _temp_dir: temp_dir,
            repo_path,
            repo,
            commits: Vec::new(),
        })
    }

    fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        let file_path = self.repo_path.join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file_path, content)?;
        Ok(file_path)
    }

    /// Writes `files` and commits them on top of the previous commit.
    fn commit(&mut self, message: &str, files: &[(&str, &str)]) -> Result<String> {
        let mut index = self.repo.index()?;
        for (name, content) in files {
            self.write(name, content)?;
            index.add_path(Path::new(name))?;
        }
        index.write()?;

        let signature = Signature::now("Test User", "test@example.com")?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent_commit = match self.commits.last() {
            Some(last_commit_id) => Some(self.repo.find_commit(*last_commit_id)?),
            None => None,
        };
        let parents: Vec<&git2::Commit> = parent_commit.iter().collect();

        let commit_id = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        self.commits.push(commit_id);
        Ok(commit_id.to_string())
    }

    fn context(&self, selection: SelectionContext) -> ActionContext {
        ActionContext::new(&self.repo_path).with_selection(selection)
    }
}

/// Whether the `git` executable can be launched here.
fn git_available() -> bool {
    SystemGit::new().succeeds(Path::new("."), &["--version"])
}

fn sorted(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths.sort();
    paths
}

#[test]
fn committed_file_is_changed_since_previous_commit() -> Result<()> {
    if !git_available() {
        return Ok(());
    }
    let mut repo = TestRepo::new()?;
    let a = repo.commit("Initial commit", &[("README.md", "hello\n")])?;
    repo.commit("Add x", &[("x.txt", "x\n")])?;

    let resolver = ChangeSetResolver::new(SystemGit::new());
    let resolution = resolver.resolve(&repo.context(SelectionContext::Commits(vec![
        CommitValue::hash(a.clone()),
    ])))?;

    assert_eq!(resolution.reference, a);
    assert_eq!(resolution.root(), repo.repo_path);
    assert_eq!(resolution.files(), vec![repo.repo_path.join("x.txt")]);
    Ok(())
}

#[test]
fn untracked_files_are_included() -> Result<()> {
    if !git_available() {
        return Ok(());
    }
    let mut repo = TestRepo::new()?;
    let a = repo.commit("Initial commit", &[("README.md", "hello\n")])?;
    repo.commit("Add x", &[("x.txt", "x\n")])?;
    repo.write("y.txt", "untracked\n")?;

    let resolver = ChangeSetResolver::new(SystemGit::new());
    let resolution = resolver.resolve(&repo.context(SelectionContext::Text(format!(
        "{} Initial commit",
        &a[..8]
    ))))?;

    assert_eq!(
        sorted(resolution.files()),
        vec![repo.repo_path.join("x.txt"), repo.repo_path.join("y.txt")]
    );
    Ok(())
}

#[test]
fn head_on_clean_tree_reports_no_changes() -> Result<()> {
    if !git_available() {
        return Ok(());
    }
    let mut repo = TestRepo::new()?;
    let head = repo.commit("Initial commit", &[("README.md", "hello\n")])?;

    let resolver = ChangeSetResolver::new(SystemGit::new());
    let context = repo.context(SelectionContext::Commits(vec![CommitValue::hash(head)]));
    let mut opener = RecordingOpener::default();

    let report = open_changed_files(&resolver, &context, &mut opener);

    assert_eq!(report.notice.kind, NoticeKind::NoChanges);
    assert!(!report.notice.is_error());
    assert!(report.resolution.is_some_and(|r| r.is_empty()));
    assert!(opener.opened.is_empty());
    Ok(())
}

#[test]
fn unknown_candidate_is_skipped() -> Result<()> {
    if !git_available() {
        return Ok(());
    }
    let mut repo = TestRepo::new()?;
    let a = repo.commit("Initial commit", &[("README.md", "hello\n")])?;
    repo.commit("Add x", &[("x.txt", "x\n")])?;

    let resolver = ChangeSetResolver::new(SystemGit::new());
    let context = repo.context(SelectionContext::Commits(vec![
        CommitValue::hash("0123456789abcdef0123456789abcdef01234567"),
        CommitValue::hash(a.clone()),
    ]));
    let mut opener = RecordingOpener::default();

    let report = open_changed_files(&resolver, &context, &mut opener);

    assert_eq!(report.notice.kind, NoticeKind::Opened);
    assert_eq!(report.resolution.map(|r| r.reference), Some(a));
    assert_eq!(opener.opened, vec![repo.repo_path.join("x.txt")]);
    Ok(())
}

#[test]
fn only_unknown_candidates_is_an_error() -> Result<()> {
    if !git_available() {
        return Ok(());
    }
    let mut repo = TestRepo::new()?;
    repo.commit("Initial commit", &[("README.md", "hello\n")])?;

    let resolver = ChangeSetResolver::new(SystemGit::new());
    let err = resolver
        .resolve(&repo.context(SelectionContext::Text("see deadbeef".to_string())))
        .unwrap_err();

    assert!(matches!(
        err,
        ResolveError::NoValidCommitResolved { ref candidates, .. } if candidates == &["deadbeef"]
    ));
    Ok(())
}

#[test]
fn collecting_twice_is_stable() -> Result<()> {
    if !git_available() {
        return Ok(());
    }
    let mut repo = TestRepo::new()?;
    let a = repo.commit("Initial commit", &[("README.md", "hello\n")])?;
    repo.commit("Add files", &[("src/lib.rs", "// lib\n"), ("x.txt", "x\n")])?;
    repo.write("README.md", "edited\n")?;

    let git = SystemGit::new();
    let first = collect_changes(&git, &repo.repo_path, &a, ChangePolicy::NetDiff);
    let second = collect_changes(&git, &repo.repo_path, &a, ChangePolicy::NetDiff);

    assert_eq!(sorted(first.absolute()), sorted(second.absolute()));
    assert_eq!(first.len(), 3);
    Ok(())
}

#[test]
fn reverted_file_only_shows_when_touched_since() -> Result<()> {
    if !git_available() {
        return Ok(());
    }
    let mut repo = TestRepo::new()?;
    let a = repo.commit("Initial commit", &[("f.txt", "one\n")])?;
    repo.commit("Change f", &[("f.txt", "two\n")])?;
    repo.commit("Revert f", &[("f.txt", "one\n")])?;

    let git = SystemGit::new();
    let net = collect_changes(&git, &repo.repo_path, &a, ChangePolicy::NetDiff);
    let touched = collect_changes(&git, &repo.repo_path, &a, ChangePolicy::TouchedSince);

    assert!(net.is_empty());
    assert_eq!(touched.absolute(), vec![repo.repo_path.join("f.txt")]);
    Ok(())
}

#[test]
fn copy_contents_uses_comment_headers() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path().canonicalize()?;
    fs::write(root.join("a.rs"), "fn a() {}\n")?;
    fs::write(root.join("Cargo.lock"), "# lock\n")?;

    let files = vec![root.join("a.rs"), root.join("Cargo.lock")];
    let filter = ExcludeFilter::new(["*.lock"])?;
    let mut sink = RecordingClipboard::default();

    let summary = copy_file_contents(&files, HeaderStyle::Comment, &filter, &mut sink)?;

    assert_eq!(summary.files, 1);
    let contents = sink.contents.unwrap_or_default();
    assert!(contents.contains(&root.join("a.rs").display().to_string()));
    assert!(contents.contains("fn a() {}"));
    assert!(!contents.contains("# lock"));
    Ok(())
}
