//! Console and log-file reporting for a finished search.
use colored::Colorize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::SearchResult;
use crate::results::{AggregatedLog, Summary};

/// Command line shown when no search string was given
pub const USAGE: &str = "search-string [-p] path/to/dir -s string_to_search_for";

/// Formatting options for console output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportStyle {
    pub color: bool,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self { color: true }
    }
}

impl ReportStyle {
    pub fn plain() -> Self {
        Self { color: false }
    }

    fn green(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn red(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }

    /// `[+] Found <N> matches in <M> files (took <S> seconds)`
    pub fn format_summary(&self, summary: &Summary) -> String {
        format!(
            "[{}] Found {} matches in {} files (took {} seconds)",
            self.green("+"),
            self.green(&summary.files_with_matches.to_string()),
            self.green(&summary.files_scanned.to_string()),
            self.green(&format!("{:.6}", summary.elapsed_secs()))
        )
    }

    /// `[-] Invalid Usage: <usage>`
    pub fn format_usage(&self) -> String {
        format!("[{}] Invalid Usage: {}", self.red("-"), USAGE)
    }
}

/// Writes the log to `path`, replacing any existing file
pub fn write_log(path: &Path, log: &AggregatedLog) -> SearchResult<()> {
    fs::write(path, log.to_text())?;
    debug!("Wrote {} log entries to {}", log.len(), path.display());
    Ok(())
}
