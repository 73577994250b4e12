//! Search result types.
//!
//! Each file task produces its own [`FileOutcome`] holding the log entries
//! for that file. Workers never share a log buffer: the orchestrator builds
//! the [`AggregatedLog`] from the fragments after every task has resolved,
//! so no entry can be lost or interleaved with another.
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// One matching line, as written to the results log
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogEntry {
    /// File name (or full path) shown in the log
    pub file_label: String,
    /// 1-based line number of the match
    pub line_number: usize,
    /// Line content, truncated for display
    pub content: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {}", self.file_label, self.line_number, self.content)
    }
}

/// The result of scanning a single file
#[derive(Debug, Clone, Default)]
pub struct FileOutcome {
    /// The path to the file
    pub path: PathBuf,
    /// One entry per matching line, in line order
    pub entries: Vec<LogEntry>,
}

impl FileOutcome {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    /// Whether at least one line matched
    pub fn matched(&self) -> bool {
        !self.entries.is_empty()
    }
}

/// All match entries of one search run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedLog {
    entries: Vec<LogEntry>,
}

impl AggregatedLog {
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends one file's fragment as a unit
    pub fn append(&mut self, fragment: Vec<LogEntry>) {
        self.entries.extend(fragment);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the log text: one line per entry, newline terminated
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for entry in &self.entries {
            text.push_str(&entry.to_string());
            text.push('\n');
        }
        text
    }
}

impl fmt::Display for AggregatedLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Totals for one search run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    /// Total number of files submitted for scanning
    pub files_scanned: usize,
    /// Number of files with at least one matching line
    pub files_with_matches: usize,
    /// Total number of matching lines
    pub total_matches: usize,
    /// Files whose task failed (counted as non-matching)
    pub files_failed: usize,
    /// Wall-clock time from enumeration to the last resolved task
    pub elapsed: Duration,
}

impl Summary {
    /// Elapsed time in seconds
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_micros() as f64 / 1_000_000.0
    }
}

/// The complete output of a search run
#[derive(Debug, Clone, Default)]
pub struct SearchOutput {
    pub summary: Summary,
    pub log: AggregatedLog,
}

impl SearchOutput {
    /// Creates a new empty search output
    pub fn new() -> Self {
        Default::default()
    }

    /// Folds a successfully scanned file into the totals and the log
    pub fn add_file_outcome(&mut self, outcome: FileOutcome) {
        self.summary.files_scanned += 1;
        if outcome.matched() {
            self.summary.files_with_matches += 1;
            self.summary.total_matches += outcome.entries.len();
            self.log.append(outcome.entries);
        }
    }

    /// Counts a file whose task failed
    pub fn add_failed_file(&mut self) {
        self.summary.files_scanned += 1;
        self.summary.files_failed += 1;
    }
}
