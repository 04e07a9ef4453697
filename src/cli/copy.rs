//! Copy commands: file contents, file names and Dart files with their imports.

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use crate::actions::{
    copy_dart_with_related, copy_file_contents, copy_file_names, CopySummary, ExcludeFilter,
    HeaderStyle,
};
use crate::context::ActionContext;
use crate::selection::SelectionContext;
use crate::sink::{ClipboardSink, PrintSink, SystemClipboard};

/// Copy operations.
#[derive(Parser)]
pub struct CopyCommand {
    /// Copy subcommand to execute.
    #[command(subcommand)]
    pub command: CopySubcommands,
}

/// Copy subcommands.
#[derive(Subcommand)]
pub enum CopySubcommands {
    /// Copies the contents of the given files, each with a path header.
    Contents(ContentsCommand),
    /// Copies the names of the given files, one per line.
    Names(NamesCommand),
    /// Copies a Dart file and the project files it imports.
    Dart(DartCommand),
}

/// Contents command options.
#[derive(Parser)]
pub struct ContentsCommand {
    /// Files to copy.
    pub files: Vec<PathBuf>,

    /// Header written before each file.
    #[arg(long, value_enum, default_value_t = HeaderStyle::Comment)]
    pub style: HeaderStyle,

    /// Glob of files to leave out (repeatable).
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Reads additional file paths from standard input, one per line.
    #[arg(long)]
    pub stdin: bool,

    /// Prints to stdout instead of the clipboard.
    #[arg(long)]
    pub print: bool,
}

/// Names command options.
#[derive(Parser)]
pub struct NamesCommand {
    /// Files whose names to copy.
    pub files: Vec<PathBuf>,

    /// Directory names are made relative to (defaults to the current directory).
    #[arg(long, value_name = "DIR")]
    pub base: Option<PathBuf>,

    /// Glob of files to leave out (repeatable).
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Reads additional file paths from standard input, one per line.
    #[arg(long)]
    pub stdin: bool,

    /// Prints to stdout instead of the clipboard.
    #[arg(long)]
    pub print: bool,
}

/// Dart command options.
#[derive(Parser)]
pub struct DartCommand {
    /// Dart file to start from.
    pub file: PathBuf,

    /// Project directory bounding the import walk (defaults to the nearest pubspec.yaml).
    #[arg(long, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Prints to stdout instead of the clipboard.
    #[arg(long)]
    pub print: bool,
}

impl CopyCommand {
    /// Executes the copy command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            CopySubcommands::Contents(contents_cmd) => contents_cmd.execute(),
            CopySubcommands::Names(names_cmd) => names_cmd.execute(),
            CopySubcommands::Dart(dart_cmd) => dart_cmd.execute(),
        }
    }
}

impl ContentsCommand {
    /// Executes the contents command.
    pub fn execute(self) -> Result<()> {
        let context = file_context(self.files, self.stdin, None)?;
        let filter = ExcludeFilter::new(&self.exclude)?;
        let mut sink = open_sink(self.print)?;
        let summary = copy_file_contents(
            &context.selected_files(),
            self.style,
            &filter,
            sink.as_mut(),
        )?;
        report(summary, self.print)
    }
}

impl NamesCommand {
    /// Executes the names command.
    pub fn execute(self) -> Result<()> {
        let base = super::base_or_cwd(self.base)?;
        let context = file_context(self.files, self.stdin, Some(base))?;
        let filter = ExcludeFilter::new(&self.exclude)?;
        let mut sink = open_sink(self.print)?;
        let summary = copy_file_names(
            &context.selected_files(),
            context.base_dir(),
            &filter,
            sink.as_mut(),
        )?;
        report(summary, self.print)
    }
}

impl DartCommand {
    /// Executes the dart command.
    pub fn execute(self) -> Result<()> {
        let mut sink = open_sink(self.print)?;
        let summary = copy_dart_with_related(&self.file, self.project.as_deref(), sink.as_mut())?;
        report(summary, self.print)
    }
}

/// Builds a file selection from arguments and, optionally, standard input.
fn file_context(
    mut files: Vec<PathBuf>,
    stdin: bool,
    base: Option<PathBuf>,
) -> Result<ActionContext> {
    if stdin {
        files.extend(super::read_stdin_paths()?);
    }
    if files.is_empty() {
        bail!("No files given. Pass file paths or use --stdin");
    }

    let context = base.map_or_else(ActionContext::detached, ActionContext::new);
    Ok(context.with_selection(SelectionContext::Files(files)))
}

fn open_sink(print: bool) -> Result<Box<dyn ClipboardSink>> {
    if print {
        Ok(Box::new(PrintSink::new(io::stdout())))
    } else {
        Ok(Box::new(SystemClipboard::new()?))
    }
}

fn report(summary: CopySummary, print: bool) -> Result<()> {
    if summary.files == 0 {
        eprintln!("Nothing copied: no readable files selected");
    } else if print {
        // Keep the printed blob newline-terminated.
        println!();
    } else {
        eprintln!(
            "Copied {} file(s), {} bytes, to the clipboard",
            summary.files, summary.bytes
        );
    }
    Ok(())
}
