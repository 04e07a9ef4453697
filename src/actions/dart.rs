//! Copy a Dart file together with every project-local file it imports.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{bail, Result};
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::copy::{read_text, CopySummary, HeaderStyle};
use crate::git::roots::absolutize;
use crate::sink::ClipboardSink;

#[allow(clippy::unwrap_used)] // literal pattern
static IMPORT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"import\s+['"]([^'"]+)['"]"#).unwrap());

/// The part of `pubspec.yaml` we care about.
#[derive(Debug, Deserialize)]
struct Pubspec {
    name: Option<String>,
}

/// Returns the package name declared in `<project>/pubspec.yaml`, if any.
fn package_name(project: &Path) -> Option<String> {
    let content = fs::read_to_string(project.join("pubspec.yaml")).ok()?;
    match serde_yaml::from_str::<Pubspec>(&content) {
        Ok(pubspec) => pubspec.name.map(|n| n.trim().to_string()),
        Err(e) => {
            debug!(error = %e, "unparseable pubspec.yaml");
            None
        }
    }
}

/// Returns the import URIs of a Dart source, in order.
fn imports(content: &str) -> Vec<&str> {
    IMPORT_PATTERN
        .captures_iter(content)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

/// Walks imports from a Dart entry file, staying inside one project.
struct ImportWalker {
    project: PathBuf,
    package: Option<String>,
    visited: HashSet<PathBuf>,
    entries: Vec<(PathBuf, String)>,
}

impl ImportWalker {
    fn new(project: PathBuf) -> Self {
        let package = package_name(&project);
        Self {
            project,
            package,
            visited: HashSet::new(),
            entries: Vec::new(),
        }
    }

    /// Maps an import URI to a file inside the project, if it is local.
    fn resolve(&self, import: &str, current: &Path) -> Option<PathBuf> {
        let candidate = if let Some(rest) = import.strip_prefix("package:") {
            let (package, path) = rest.split_once('/')?;
            if self.package.as_deref() != Some(package) {
                return None;
            }
            let in_lib = self.project.join("lib").join(path);
            if in_lib.is_file() {
                in_lib
            } else {
                self.project.join(path)
            }
        } else if import.contains(':') {
            // dart:core and friends
            return None;
        } else {
            current.parent()?.join(import)
        };

        let resolved = candidate.canonicalize().ok()?;
        resolved.starts_with(&self.project).then_some(resolved)
    }

    fn visit(&mut self, file: PathBuf) {
        if !file.is_file() || !file.starts_with(&self.project) || !self.visited.insert(file.clone())
        {
            return;
        }

        let content = match read_text(&file) {
            Ok(content) => content,
            Err(e) => {
                debug!(error = %e, "skipping unreadable import");
                return;
            }
        };

        let next: Vec<PathBuf> = imports(&content)
            .into_iter()
            .filter_map(|import| self.resolve(import, &file))
            .collect();
        self.entries.push((file, content));

        for import in next {
            self.visit(import);
        }
    }
}

/// Finds the nearest ancestor of `file` holding a `pubspec.yaml`.
fn find_project(file: &Path) -> Option<PathBuf> {
    file.ancestors()
        .skip(1)
        .find(|dir| dir.join("pubspec.yaml").is_file())
        .map(Path::to_path_buf)
}

/// Copies `file` and, depth-first, every project-local Dart file it imports.
///
/// `project` bounds the walk; without it the nearest directory holding a
/// `pubspec.yaml` is used, or the file's own directory. Files other than
/// `.dart` are rejected.
pub fn copy_dart_with_related<S: ClipboardSink + ?Sized>(
    file: &Path,
    project: Option<&Path>,
    sink: &mut S,
) -> Result<CopySummary> {
    if file.extension().and_then(|e| e.to_str()) != Some("dart") {
        bail!("Not a Dart file: {}", file.display());
    }
    let file = absolutize(file);

    let project = project
        .map(absolutize)
        .or_else(|| find_project(&file))
        .or_else(|| file.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("/"));

    let mut walker = ImportWalker::new(project);
    walker.visit(file);
    debug!(count = walker.entries.len(), "collected related Dart files");

    if walker.entries.is_empty() {
        return Ok(CopySummary::default());
    }

    let blob = HeaderStyle::Comment.render(&walker.entries);
    sink.set_contents(&blob)?;
    Ok(CopySummary {
        files: walker.entries.len(),
        bytes: blob.len(),
    })
}
