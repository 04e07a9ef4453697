//! Output collaborators: where opened files and copied text end up.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::debug;

/// Displays files to the user.
pub trait FileOpener {
    /// Opens the given absolute paths and returns how many were opened.
    ///
    /// Missing files and directories are skipped silently.
    fn open(&mut self, paths: &[PathBuf]) -> Result<usize>;
}

/// Receives a text blob that replaces the clipboard contents.
pub trait ClipboardSink {
    /// Replaces the clipboard contents with `text`.
    fn set_contents(&mut self, text: &str) -> Result<()>;
}

/// Keeps existing regular files, deduplicated by resolved identity.
pub fn openable_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for path in paths {
        let Ok(resolved) = path.canonicalize() else {
            debug!(path = %path.display(), "skipping missing file");
            continue;
        };
        if !resolved.is_file() {
            continue;
        }
        if seen.insert(resolved.clone()) {
            files.push(resolved);
        }
    }

    files
}

/// Splits an editor command string into the executable and its arguments.
///
/// Handles editors specified with arguments, e.g. `"code --wait"` becomes
/// `("code", vec!["--wait"])`.
pub(crate) fn parse_editor_command(editor: &str) -> (&str, Vec<&str>) {
    let mut parts = editor.split_whitespace();
    let cmd = parts.next().unwrap_or(editor);
    let args: Vec<&str> = parts.collect();
    (cmd, args)
}

/// Opens files by launching an editor command once with every file.
#[derive(Debug, Clone)]
pub struct EditorOpener {
    command: String,
}

impl EditorOpener {
    /// Uses `command`, which may carry its own arguments (`"code -r"`).
    ///
    /// A blank command is accepted; opening files with it fails.
    pub fn new<S: Into<String>>(command: S) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Editor command line.
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl FileOpener for EditorOpener {
    fn open(&mut self, paths: &[PathBuf]) -> Result<usize> {
        let files = openable_files(paths);
        if files.is_empty() {
            return Ok(0);
        }

        let (program, args) = parse_editor_command(&self.command);
        if program.is_empty() {
            bail!(
                "No editor configured. Pass --editor, set CTXKIT_EDITOR or EDITOR, or use --print"
            );
        }

        debug!(program, count = files.len(), "launching editor");
        let status = Command::new(program)
            .args(args)
            .args(&files)
            .status()
            .with_context(|| format!("Failed to execute editor '{}'", self.command))?;

        if !status.success() {
            bail!(
                "Editor '{}' exited with non-zero status: {:?}",
                self.command,
                status.code()
            );
        }

        Ok(files.len())
    }
}

/// Writes each opened path on its own line.
#[derive(Debug)]
pub struct PrintOpener<W> {
    writer: W,
}

impl<W: Write> PrintOpener<W> {
    /// Prints to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FileOpener for PrintOpener<W> {
    fn open(&mut self, paths: &[PathBuf]) -> Result<usize> {
        let files = openable_files(paths);
        for file in &files {
            writeln!(self.writer, "{}", file.display()).context("Failed to write path")?;
        }
        Ok(files.len())
    }
}

/// Keeps opened files in memory.
#[derive(Debug, Default)]
pub struct RecordingOpener {
    /// Every file opened so far, in order.
    pub opened: Vec<PathBuf>,
}

impl FileOpener for RecordingOpener {
    fn open(&mut self, paths: &[PathBuf]) -> Result<usize> {
        let files: Vec<PathBuf> = openable_files(paths)
            .into_iter()
            .filter(|f| !self.opened.contains(f))
            .collect();
        self.opened.extend(files.iter().cloned());
        Ok(files.len())
    }
}

/// The system clipboard.
pub struct SystemClipboard {
    clipboard: arboard::Clipboard,
}

impl SystemClipboard {
    /// Connects to the system clipboard.
    pub fn new() -> Result<Self> {
        let clipboard = arboard::Clipboard::new().context("Failed to access the system clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_contents(&mut self, text: &str) -> Result<()> {
        self.clipboard
            .set_text(text)
            .context("Failed to write to the system clipboard")
    }
}

/// Writes the blob to a writer instead of the clipboard.
#[derive(Debug)]
pub struct PrintSink<W> {
    writer: W,
}

impl<W: Write> PrintSink<W> {
    /// Prints to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ClipboardSink for PrintSink<W> {
    fn set_contents(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_all(text.as_bytes())
            .and_then(|()| self.writer.flush())
            .context("Failed to write output")
    }
}

/// Keeps the latest clipboard contents in memory.
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    /// Last text set, if any.
    pub contents: Option<String>,
}

impl ClipboardSink for RecordingClipboard {
    fn set_contents(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// Returns `path` relative to `base`, or the bare file name when it is not
/// under `base`.
pub fn display_name(path: &Path, base: Option<&Path>) -> String {
    if let Some(relative) = base.and_then(|b| path.strip_prefix(b).ok()) {
        if !relative.as_os_str().is_empty() {
            return relative.to_string_lossy().into_owned();
        }
    }
    path.file_name()
        .map_or_else(|| path.to_string_lossy().into_owned(), |n| n.to_string_lossy().into_owned())
}
