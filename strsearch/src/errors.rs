//! Error types for strsearch.
//!
//! Failures fall into two classes with different propagation rules:
//!
//! 1. **Per-file failures** (`FileUnreadable`, `EncodingError`, `TaskPanicked`,
//!    `TaskCancelled`) stay inside the task that produced them. The search
//!    engine counts the file as non-matching and keeps going.
//!
//! 2. **Pool lifecycle failures** (`PoolStopped`, `WorkerPanicked`) mean the
//!    engine itself was misused. They abort the search:
//!    ```rust,ignore
//!    match handle.join() {
//!        Ok(outcome) => // Use outcome,
//!        Err(e) if e.is_per_file() => // Count as no match,
//!        Err(e) => return Err(e),
//!    }
//!    ```
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid usage: {0}")]
    InvalidUsage(String),
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),
    #[error("Failed to read file {path}: {source}")]
    FileUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid UTF-8 in file {path}: {source}")]
    EncodingError {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
    #[error("Task submitted to a stopped worker pool")]
    PoolStopped,
    #[error("Task panicked: {0}")]
    TaskPanicked(String),
    #[error("Task was dropped before it ran")]
    TaskCancelled,
    #[error("Worker thread {0} panicked")]
    WorkerPanicked(usize),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SearchError {
    pub fn invalid_usage(msg: impl Into<String>) -> Self {
        Self::InvalidUsage(msg.into())
    }

    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::PathNotFound(path.into())
    }

    pub fn file_unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileUnreadable {
            path: path.into(),
            source,
        }
    }

    pub fn encoding_error(path: impl Into<PathBuf>, source: std::string::FromUtf8Error) -> Self {
        Self::EncodingError {
            path: path.into(),
            source,
        }
    }

    pub fn task_panicked(msg: impl Into<String>) -> Self {
        Self::TaskPanicked(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Failures that are isolated to one file's task
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::FileUnreadable { .. }
                | Self::EncodingError { .. }
                | Self::TaskPanicked(_)
                | Self::TaskCancelled
        )
    }

    /// Failures that indicate the worker pool was misused
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::PoolStopped | Self::WorkerPanicked(_))
    }

    /// The file a per-file failure refers to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::PathNotFound(path)
            | Self::FileUnreadable { path, .. }
            | Self::EncodingError { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<::config::ConfigError> for SearchError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
