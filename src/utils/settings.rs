//! Settings and configuration utilities.
//!
//! This module reads settings from `$HOME/.ctxkit/settings.json` (or the file
//! named by `CTXKIT_SETTINGS`) and uses them as a fallback for environment
//! variables and command-line flags.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::git::ChangePolicy;

/// Environment variable that overrides the settings file location.
pub const SETTINGS_PATH_VAR: &str = "CTXKIT_SETTINGS";

/// Environment variables consulted for the editor command, in order.
pub const EDITOR_VARS: [&str; 2] = ["CTXKIT_EDITOR", "EDITOR"];

/// Settings loaded from `$HOME/.ctxkit/settings.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Environment variable overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Editor command used to open changed files (`"code -r"`, `"idea"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Default changed-file policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<ChangePolicy>,

    /// Repository roots always considered, in addition to `--root`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roots: Vec<PathBuf>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // A missing file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Self>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the settings path, honoring `CTXKIT_SETTINGS`.
    pub fn get_settings_path() -> Result<PathBuf> {
        if let Ok(path) = env::var(SETTINGS_PATH_VAR) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }

        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".ctxkit").join("settings.json"))
    }

    /// Returns an environment variable with fallback to settings.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) => Some(value),
            Err(_) => self.env.get(key).cloned(),
        }
    }

    /// Resolves the editor command.
    ///
    /// Precedence: `cli` flag, then `CTXKIT_EDITOR`/`EDITOR` (environment or
    /// the settings `env` map), then the `editor` setting.
    pub fn editor(&self, cli: Option<&str>) -> Option<String> {
        if let Some(editor) = cli.filter(|e| !e.trim().is_empty()) {
            return Some(editor.to_string());
        }
        EDITOR_VARS
            .iter()
            .find_map(|key| self.get_env_var(key).filter(|e| !e.trim().is_empty()))
            .or_else(|| self.editor.clone())
    }

    /// Resolves the changed-file policy: `cli` flag, then settings, then default.
    pub fn policy(&self, cli: Option<ChangePolicy>) -> ChangePolicy {
        cli.or(self.policy).unwrap_or_default()
    }
}
