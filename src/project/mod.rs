//! Loading sources from the filesystem.

pub mod loader;

pub use loader::{LoadError, SourceText, collect_msg_files, load_source, load_sources};
