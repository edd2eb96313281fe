//! barrelgen - watch-driven barrel file generator
//!
//! Watches the files matched by a glob pattern and keeps a single aggregate
//! output file up to date: an `import` list for TypeScript/JavaScript or an
//! `@import` list for CSS/SCSS. Bursts of filesystem events are debounced
//! into one regeneration, redundant writes are suppressed by content
//! equality, and the first write always reflects the complete initial scan.

pub mod error;
pub mod fileset;
pub mod format;
pub mod fs;
pub mod relpath;
pub mod source;
pub mod watcher;

// Re-exports for convenience
pub use error::{GenError, GenResult};
pub use fileset::FileSet;
pub use format::{formatter_for, import_statement, render, stylesheet_import, Formatter};
pub use fs::{FileSystem, LocalFs};
pub use relpath::relative_import_path;
pub use source::{FsEvent, GlobSource, Subscription};
pub use watcher::{start, DiscoveryWritePolicy, GenEvent, GenHandle, GenOptions, DEBOUNCE_MS};
