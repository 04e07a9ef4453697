//! Git plumbing: root discovery, commit validation and changed-file collection.

pub mod changeset;
pub mod roots;
pub mod runner;
pub mod validate;

pub use changeset::{collect_changes, ChangePolicy, ChangeSet};
pub use roots::{find_root, has_git_metadata, locate_roots};
pub use runner::{GitOutput, GitRunner, SystemGit};
pub use validate::commit_exists;

/// Number of hex characters to show in abbreviated commit hashes.
pub const SHORT_HASH_LEN: usize = 8;

/// Shortest hex token accepted as a commit reference.
pub const MIN_HASH_LEN: usize = 7;

/// Length of a full SHA-1 commit hash in hex characters.
pub const FULL_HASH_LEN: usize = 40;
