//! Configuration-related CLI commands.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::data::{render, OutputFormat};
use crate::utils::Settings;

/// Configuration operations.
#[derive(Parser)]
pub struct ConfigCommand {
    /// Configuration subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Shows the settings in effect.
    Show(ShowCommand),
    /// Prints the settings file location.
    Path,
}

/// Show command options.
#[derive(Parser)]
pub struct ShowCommand {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

impl ConfigCommand {
    /// Executes the config command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            ConfigSubcommands::Show(show_cmd) => show_cmd.execute(),
            ConfigSubcommands::Path => {
                println!("{}", Settings::get_settings_path()?.display());
                Ok(())
            }
        }
    }
}

impl ShowCommand {
    /// Executes the show command.
    pub fn execute(self) -> Result<()> {
        let path = Settings::get_settings_path()?;
        let settings = Settings::load_from_path(&path)?;

        let source = if path.exists() {
            path.display().to_string()
        } else {
            format!("{} (not found, using defaults)", path.display())
        };
        eprintln!("# settings: {source}");
        print!("{}", render(&settings, self.format)?);
        Ok(())
    }
}
