//! Repository root discovery.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Name of the metadata entry that marks a repository root.
const GIT_METADATA: &str = ".git";

/// Returns true when `dir` directly contains git metadata.
///
/// Worktrees and submodules keep a `.git` file rather than a directory, so
/// any entry counts.
pub fn has_git_metadata(dir: &Path) -> bool {
    dir.join(GIT_METADATA).exists()
}

/// Turns `path` into an absolute path, resolving symlinks when possible.
pub(crate) fn absolutize(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Walks upward from `start` until a directory with git metadata is found.
///
/// When `start` is a file the walk begins at its parent directory.
pub fn find_root(start: &Path) -> Option<PathBuf> {
    let start = absolutize(start);
    let mut dir = if start.is_file() {
        start.parent().map(Path::to_path_buf)
    } else {
        Some(start)
    };

    while let Some(current) = dir {
        if has_git_metadata(&current) {
            return Some(current);
        }
        dir = current.parent().map(Path::to_path_buf);
    }

    None
}

/// Returns every repository root associated with a workspace.
///
/// Registry entries are kept when they contain git metadata, deduplicated by
/// absolute path, in registry order. Only when none survive does the locator
/// fall back to walking upward from `base`, yielding at most one root.
pub fn locate_roots(registry: &[PathBuf], base: Option<&Path>) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();

    for candidate in registry {
        let absolute = absolutize(candidate);
        if !has_git_metadata(&absolute) {
            debug!(root = %absolute.display(), "registry entry has no git metadata");
            continue;
        }
        if !roots.contains(&absolute) {
            roots.push(absolute);
        }
    }

    if !roots.is_empty() {
        debug!(count = roots.len(), "using registry roots");
        return roots;
    }

    match base.and_then(find_root) {
        Some(root) => {
            debug!(root = %root.display(), "found root above workspace base");
            vec![root]
        }
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fake_repo(parent: &Path, name: &str) -> PathBuf {
        let dir = parent.join(name);
        fs::create_dir_all(dir.join(GIT_METADATA)).unwrap();
        absolutize(&dir)
    }

    #[test]
    fn find_root_walks_up_from_nested_dir() {
        let temp = TempDir::new().unwrap();
        let repo = fake_repo(temp.path(), "repo");
        let nested = repo.join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_root(&nested), Some(repo));
    }

    #[test]
    fn find_root_starts_at_parent_of_file() {
        let temp = TempDir::new().unwrap();
        let repo = fake_repo(temp.path(), "repo");
        let file = repo.join("main.rs");
        fs::write(&file, "fn main() {}").unwrap();

        assert_eq!(find_root(&file), Some(repo));
    }

    #[test]
    fn git_file_counts_as_metadata() {
        let temp = TempDir::new().unwrap();
        let worktree = temp.path().join("wt");
        fs::create_dir_all(&worktree).unwrap();
        fs::write(worktree.join(".git"), "gitdir: ../elsewhere").unwrap();

        assert!(has_git_metadata(&worktree));
    }

    #[test]
    fn registry_filters_and_dedups() {
        let temp = TempDir::new().unwrap();
        let first = fake_repo(temp.path(), "first");
        let second = fake_repo(temp.path(), "second");
        let plain = temp.path().join("plain");
        fs::create_dir_all(&plain).unwrap();

        let registry = vec![
            first.clone(),
            plain,
            second.clone(),
            first.join("."),
        ];
        assert_eq!(locate_roots(&registry, None), vec![first, second]);
    }

    #[test]
    fn registry_wins_over_base() {
        let temp = TempDir::new().unwrap();
        let registered = fake_repo(temp.path(), "registered");
        let other = fake_repo(temp.path(), "other");

        let roots = locate_roots(&[registered.clone()], Some(other.as_path()));
        assert_eq!(roots, vec![registered]);
    }

    #[test]
    fn falls_back_to_base_when_registry_is_unusable() {
        let temp = TempDir::new().unwrap();
        let repo = fake_repo(temp.path(), "repo");
        let missing = temp.path().join("missing");

        assert_eq!(locate_roots(&[missing], Some(repo.as_path())), vec![repo.clone()]);
    }

    #[test]
    fn no_roots_without_metadata() {
        let temp = TempDir::new().unwrap();
        let plain = temp.path().join("plain");
        fs::create_dir_all(&plain).unwrap();

        // The temp dir itself might sit inside a checkout on some machines.
        if find_root(&plain).is_none() {
            assert!(locate_roots(&[], Some(plain.as_path())).is_empty());
        }
        assert!(locate_roots(&[], None).is_empty());
    }
}
