//! Concurrent substring search over a directory tree.
//!
//! The work is split into three steps:
//!
//! 1. [`walker::list_files`] enumerates the regular files under the root.
//! 2. [`engine::search`] submits one [`WorkerPool`](crate::pool::WorkerPool)
//!    task per file; each task runs [`LineMatcher::scan_file`] and returns its
//!    own log fragment.
//! 3. The engine joins every handle in submission order and folds the
//!    fragments into a single [`SearchOutput`](crate::results::SearchOutput).
//!
//! ```rust,ignore
//! let config = SearchConfig::new("TODO", "src");
//! let output = search(&config)?;
//! println!("{} files matched", output.summary.files_with_matches);
//! ```
pub mod engine;
pub mod matcher;
pub mod walker;

pub use engine::search;
pub use matcher::{truncate_line, LineMatcher};
pub use walker::list_files;
