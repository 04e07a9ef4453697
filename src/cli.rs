//! CLI interface for ctxkit.

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

pub mod changed;
pub mod config;
pub mod copy;

/// ctxkit: prompt-context and changed-file helpers for your editor.
#[derive(Parser)]
#[command(name = "ctxkit")]
#[command(
    about = "Copy file contents and names, and open files changed since a Git commit",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Opens every file changed since the selected commit.
    Changed(changed::ChangedCommand),
    /// Copies file contents or names to the clipboard.
    Copy(copy::CopyCommand),
    /// Shows configuration.
    Config(config::ConfigCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Changed(changed_cmd) => changed_cmd.execute(),
            Commands::Copy(copy_cmd) => copy_cmd.execute(),
            Commands::Config(config_cmd) => config_cmd.execute(),
        }
    }
}

/// Returns `base`, or the current directory when absent.
pub(crate) fn base_or_cwd(base: Option<PathBuf>) -> Result<PathBuf> {
    match base {
        Some(base) => Ok(base),
        None => std::env::current_dir().context("Failed to determine current directory"),
    }
}

/// Reads standard input as a whole.
pub(crate) fn read_stdin() -> Result<String> {
    io::read_to_string(io::stdin()).context("Failed to read standard input")
}

/// Reads one path per non-blank line from standard input.
pub(crate) fn read_stdin_paths() -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read standard input")?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(PathBuf::from(trimmed));
        }
    }
    Ok(paths)
}
