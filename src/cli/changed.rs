//! Changed command: open every file changed since a selected commit.

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::debug;

use crate::actions::{open_changed_files, OpenChangedReport};
use crate::context::{table_from_rows, ActionContext};
use crate::data::{render, ChangedFilesView, OutputFormat};
use crate::git::{ChangePolicy, SystemGit};
use crate::resolver::ChangeSetResolver;
use crate::selection::{CommitValue, SelectionContext};
use crate::sink::{EditorOpener, FileOpener, PrintOpener, RecordingOpener};
use crate::utils::Settings;

/// Changed command options.
#[derive(Parser)]
pub struct ChangedCommand {
    /// Commit hash or identifier of the selected commit (repeatable).
    #[arg(long, value_name = "ID")]
    pub commit: Vec<String>,

    /// Selected table row; cells separated by tabs or `|` (repeatable).
    #[arg(long, value_name = "CELLS")]
    pub row: Vec<String>,

    /// Free text to scan for a commit hash (repeatable).
    #[arg(long, value_name = "TEXT")]
    pub text: Vec<String>,

    /// Scans standard input for a commit hash, e.g. `git log --oneline -1 | ctxkit changed --stdin`.
    #[arg(long)]
    pub stdin: bool,

    /// Repository root to consider (repeatable); tried before settings roots.
    #[arg(long, value_name = "DIR")]
    pub root: Vec<PathBuf>,

    /// Workspace base directory used when no root is known (defaults to the current directory).
    #[arg(long, value_name = "DIR")]
    pub base: Option<PathBuf>,

    /// Which files count as changed.
    #[arg(long, value_enum)]
    pub policy: Option<ChangePolicy>,

    /// Editor command used to open the files (overrides CTXKIT_EDITOR and EDITOR).
    #[arg(long, value_name = "COMMAND")]
    pub editor: Option<String>,

    /// Prints the changed files instead of opening them.
    #[arg(long)]
    pub print: bool,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl ChangedCommand {
    /// Executes the changed command.
    pub fn execute(self) -> Result<()> {
        let settings = Settings::load()?;
        let context = self.build_context(&settings)?;
        let policy = settings.policy(self.policy);
        let resolver = ChangeSetResolver::new(SystemGit::new()).with_policy(policy);

        let mut opener = self.opener(&settings);
        let report = open_changed_files(&resolver, &context, opener.as_mut());

        self.report(&report)
    }

    /// Builds the action context from flags, settings and standard input.
    fn build_context(&self, settings: &Settings) -> Result<ActionContext> {
        let base = super::base_or_cwd(self.base.clone())?;
        let roots = self.root.iter().chain(&settings.roots).cloned();
        let mut context = ActionContext::new(base).with_roots(roots);

        if !self.commit.is_empty() {
            let values = self.commit.iter().map(CommitValue::hash).collect();
            context = context.with_selection(SelectionContext::Commits(values));
        }
        if !self.row.is_empty() {
            context = context.with_selection(table_from_rows(&self.row));
        }
        for text in &self.text {
            context = context.with_selection(SelectionContext::Text(text.clone()));
        }
        if self.stdin {
            context = context.with_selection(SelectionContext::Text(super::read_stdin()?));
        }

        debug!(selections = context.selections().len(), "built action context");
        Ok(context)
    }

    /// Picks where changed files go.
    ///
    /// A missing editor only fails once a resolution has files to open.
    fn opener(&self, settings: &Settings) -> Box<dyn FileOpener> {
        if self.print {
            // Structured reports already list the files.
            return match self.format {
                OutputFormat::Text => Box::new(PrintOpener::new(io::stdout())),
                OutputFormat::Yaml | OutputFormat::Json => Box::new(RecordingOpener::default()),
            };
        }

        let editor = settings.editor(self.editor.as_deref()).unwrap_or_default();
        Box::new(EditorOpener::new(editor))
    }

    fn report(&self, report: &OpenChangedReport) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                if report.notice.is_error() {
                    bail!("{}\n{}", report.notice.title, report.notice.body);
                }
                eprint!("{}", report.notice);
            }
            OutputFormat::Yaml | OutputFormat::Json => {
                println!("{}", render(&ChangedFilesView::from(report), self.format)?);
                if report.notice.is_error() {
                    bail!("{}", report.notice.title);
                }
            }
        }
        Ok(())
    }
}
