//! Editor actions built on the resolver and the output collaborators.

pub mod copy;
pub mod dart;
pub mod open_changed;

pub use copy::{copy_file_contents, copy_file_names, CopySummary, ExcludeFilter, HeaderStyle};
pub use dart::copy_dart_with_related;
pub use open_changed::{open_changed_files, OpenChangedReport};
