//! Utility functions and helpers.

pub mod preflight;
pub mod settings;

pub use preflight::check_git_cli;
pub use settings::Settings;
