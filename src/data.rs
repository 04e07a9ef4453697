//! Machine-readable reports of action outcomes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::actions::OpenChangedReport;
use crate::git::ChangePolicy;
use crate::notify::Notice;

/// How a command prints its report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable notice.
    #[default]
    Text,
    /// YAML document.
    Yaml,
    /// JSON document.
    Json,
}

/// Serializable view of an "open changed files" run.
#[derive(Debug, Clone, Serialize)]
pub struct ChangedFilesView {
    /// Notification shown to the user.
    pub notice: Notice,
    /// Root the commit was resolved in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Commit the changes are measured from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Policy used to collect changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<ChangePolicy>,
    /// Changed files as absolute paths, in discovery order.
    pub files: Vec<PathBuf>,
    /// Files actually opened.
    pub opened: usize,
}

impl From<&OpenChangedReport> for ChangedFilesView {
    fn from(report: &OpenChangedReport) -> Self {
        let resolution = report.resolution.as_ref();
        Self {
            notice: report.notice.clone(),
            root: resolution.map(|r| r.root().to_path_buf()),
            reference: resolution.map(|r| r.reference.clone()),
            policy: resolution.map(|r| r.policy),
            files: resolution.map(|r| r.files()).unwrap_or_default(),
            opened: report.opened,
        }
    }
}

/// Renders `data` in the requested format.
///
/// `Text` falls back to YAML; callers print text output themselves.
pub fn render<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(data).context("Failed to serialize to JSON")
        }
        OutputFormat::Yaml | OutputFormat::Text => {
            serde_yaml::to_string(data).context("Failed to serialize to YAML")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::ChangeSet;
    use crate::resolver::Resolution;

    fn report() -> OpenChangedReport {
        let mut changes = ChangeSet::new("/work/repo");
        changes.extend(["a.txt", "src/b.rs"]);
        let resolution = Resolution {
            reference: "abcdef0".to_string(),
            policy: ChangePolicy::NetDiff,
            changes,
        };
        OpenChangedReport {
            notice: Notice::opened(&resolution, 2),
            resolution: Some(resolution),
            opened: 2,
        }
    }

    #[test]
    fn json_view_lists_absolute_files() {
        let view = ChangedFilesView::from(&report());
        let json: serde_json::Value =
            serde_json::from_str(&render(&view, OutputFormat::Json).unwrap()).unwrap();

        assert_eq!(json["reference"], "abcdef0");
        assert_eq!(json["policy"], "net-diff");
        assert_eq!(json["notice"]["kind"], "opened");
        assert_eq!(json["files"][1], "/work/repo/src/b.rs");
        assert_eq!(json["opened"], 2);
    }

    #[test]
    fn yaml_view_omits_missing_resolution() {
        let report = OpenChangedReport {
            notice: Notice::failed("boom"),
            resolution: None,
            opened: 0,
        };
        let yaml = render(&ChangedFilesView::from(&report), OutputFormat::Yaml).unwrap();
        assert!(!yaml.contains("reference:"));
        assert!(yaml.contains("kind: failed"));
        assert!(yaml.contains("files: []"));
    }
}
