//! Copy file contents or file names to the clipboard.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::git::roots::absolutize;
use crate::sink::{display_name, ClipboardSink};

/// How each file is introduced in a copied blob.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderStyle {
    /// `// === File: <path> ===`, each entry followed by a blank line.
    #[default]
    Comment,
    /// `===== <path> =====`, entries separated by a blank line.
    Banner,
}

impl HeaderStyle {
    /// Renders a list of (path, content) entries into one blob.
    pub fn render(self, entries: &[(PathBuf, String)]) -> String {
        match self {
            Self::Comment => {
                let mut out = String::new();
                for (path, content) in entries {
                    out.push_str(&format!("// === File: {} ===\n", path.display()));
                    out.push_str(content);
                    out.push_str("\n\n");
                }
                out
            }
            Self::Banner => entries
                .iter()
                .map(|(path, content)| format!("===== {} =====\n{content}", path.display()))
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }
}

/// Glob patterns for files that should never be copied.
#[derive(Debug, Clone)]
pub struct ExcludeFilter {
    set: GlobSet,
}

impl Default for ExcludeFilter {
    fn default() -> Self {
        Self {
            set: GlobSet::empty(),
        }
    }
}

impl ExcludeFilter {
    /// Builds a filter from glob patterns such as `*.lock` or `**/target/**`.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            builder.add(
                Glob::new(pattern).with_context(|| format!("Invalid exclude pattern: {pattern}"))?,
            );
        }
        let set = builder.build().context("Failed to build exclude patterns")?;
        Ok(Self { set })
    }

    /// Whether `path` matches any pattern, by full path or by file name.
    pub fn excludes(&self, path: &Path) -> bool {
        self.set.is_match(path) || path.file_name().is_some_and(|name| self.set.is_match(name))
    }
}

/// What a copy action put on the clipboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopySummary {
    /// Number of files included.
    pub files: usize,
    /// Size of the copied text in bytes.
    pub bytes: usize,
}

/// Keeps existing regular files that the filter does not exclude.
fn selectable_files(files: &[PathBuf], filter: &ExcludeFilter) -> Vec<PathBuf> {
    files
        .iter()
        .filter(|f| f.is_file())
        .filter(|f| {
            let excluded = filter.excludes(f);
            if excluded {
                debug!(path = %f.display(), "excluded from copy");
            }
            !excluded
        })
        .cloned()
        .collect()
}

/// Reads a file as text, replacing invalid UTF-8.
pub(crate) fn read_text(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Copies the contents of `files` with a header per file.
///
/// Directories, missing files and excluded files are skipped; nothing is
/// copied when no file remains.
pub fn copy_file_contents<S: ClipboardSink + ?Sized>(
    files: &[PathBuf],
    style: HeaderStyle,
    filter: &ExcludeFilter,
    sink: &mut S,
) -> Result<CopySummary> {
    let mut entries = Vec::new();
    for file in selectable_files(files, filter) {
        match read_text(&file) {
            Ok(content) => entries.push((absolutize(&file), content)),
            Err(e) => warn!(error = %e, "skipping unreadable file"),
        }
    }

    if entries.is_empty() {
        return Ok(CopySummary::default());
    }

    let blob = style.render(&entries);
    sink.set_contents(&blob)?;
    Ok(CopySummary {
        files: entries.len(),
        bytes: blob.len(),
    })
}

/// Copies file names relative to `base`, one per line.
///
/// Files outside `base` are listed by bare file name.
pub fn copy_file_names<S: ClipboardSink + ?Sized>(
    files: &[PathBuf],
    base: Option<&Path>,
    filter: &ExcludeFilter,
    sink: &mut S,
) -> Result<CopySummary> {
    let base = base.map(absolutize);
    let names: Vec<String> = selectable_files(files, filter)
        .iter()
        .map(|f| display_name(&absolutize(f), base.as_deref()))
        .collect();

    if names.is_empty() {
        return Ok(CopySummary::default());
    }

    let blob = names.join("\n");
    sink.set_contents(&blob)?;
    Ok(CopySummary {
        files: names.len(),
        bytes: blob.len(),
    })
}
