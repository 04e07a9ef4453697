//! # ctxkit
//!
//! Editor helpers for assembling prompt context and reviewing recent work.
//!
//! ## Features
//!
//! - Open every file changed since a selected Git commit
//! - Copy file contents or names to the clipboard
//! - Copy a Dart file together with the project files it imports
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ctxkit::actions::open_changed_files;
//! use ctxkit::context::ActionContext;
//! use ctxkit::git::SystemGit;
//! use ctxkit::resolver::ChangeSetResolver;
//! use ctxkit::selection::SelectionContext;
//! use ctxkit::sink::RecordingOpener;
//!
//! let context = ActionContext::new("/work/repo")
//!     .with_selection(SelectionContext::Text("1a2b3c4d Fix parser".to_string()));
//! let resolver = ChangeSetResolver::new(SystemGit::new());
//! let mut opener = RecordingOpener::default();
//!
//! let report = open_changed_files(&resolver, &context, &mut opener);
//! println!("{}", report.notice);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod actions;
pub mod cli;
pub mod context;
pub mod data;
pub mod git;
pub mod notify;
pub mod resolver;
pub mod selection;
pub mod sink;
pub mod utils;

pub use crate::cli::Cli;

/// The current version of ctxkit.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
