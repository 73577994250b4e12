use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace, warn};

use crate::config::EncodingMode;
use crate::errors::{SearchError, SearchResult};
use crate::results::{FileOutcome, LogEntry};

const BUFFER_CAPACITY: usize = 8192;

/// Lines longer than this many characters are truncated in the log
pub const MAX_LINE_WIDTH: usize = 32;
/// Characters kept from a truncated line
pub const TRUNCATED_WIDTH: usize = 29;
/// Marker appended to a truncated line
pub const ELLIPSIS: &str = "...";

/// Shortens a line for the results log.
///
/// Lines of at most [`MAX_LINE_WIDTH`] characters are returned unchanged;
/// longer ones keep their first [`TRUNCATED_WIDTH`] characters followed by
/// [`ELLIPSIS`]. Widths count `char`s (Unicode scalar values), not bytes, so
/// a multi-byte character is never split.
pub fn truncate_line(line: &str) -> Cow<'_, str> {
    if line.char_indices().nth(MAX_LINE_WIDTH).is_none() {
        return Cow::Borrowed(line);
    }
    let cut = line
        .char_indices()
        .nth(TRUNCATED_WIDTH)
        .map_or(line.len(), |(index, _)| index);
    Cow::Owned(format!("{}{}", &line[..cut], ELLIPSIS))
}

/// Scans files line by line for a literal substring
#[derive(Debug, Clone)]
pub struct LineMatcher {
    needle: String,
    encoding_mode: EncodingMode,
    full_paths: bool,
}

impl LineMatcher {
    /// Creates a matcher for `needle`, which must not be empty
    pub fn new(needle: impl Into<String>) -> SearchResult<Self> {
        let needle = needle.into();
        if needle.is_empty() {
            return Err(SearchError::invalid_usage("search string must not be empty"));
        }
        Ok(Self {
            needle,
            encoding_mode: EncodingMode::default(),
            full_paths: false,
        })
    }

    pub fn with_encoding_mode(mut self, encoding_mode: EncodingMode) -> Self {
        self.encoding_mode = encoding_mode;
        self
    }

    /// Label log entries with the full path instead of the file name
    pub fn with_full_paths(mut self, full_paths: bool) -> Self {
        self.full_paths = full_paths;
        self
    }

    fn file_label(&self, path: &Path) -> String {
        if self.full_paths {
            return path.display().to_string();
        }
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }

    /// Reads `path` and records one log entry per line containing the needle
    pub fn scan_file(&self, path: &Path) -> SearchResult<FileOutcome> {
        trace!("Scanning file: {}", path.display());
        let file = File::open(path).map_err(|e| SearchError::file_unreadable(path, e))?;
        let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);

        let label = self.file_label(path);
        let mut outcome = FileOutcome::new(path);
        let mut buffer = Vec::with_capacity(256);
        let mut line_number = 0;
        let mut warned_lossy = false;

        loop {
            buffer.clear();
            let read = reader
                .read_until(b'\n', &mut buffer)
                .map_err(|e| SearchError::file_unreadable(path, e))?;
            if read == 0 {
                break;
            }
            line_number += 1;

            if buffer.last() == Some(&b'\n') {
                buffer.pop();
                if buffer.last() == Some(&b'\r') {
                    buffer.pop();
                }
            }

            let line = match String::from_utf8(std::mem::take(&mut buffer)) {
                Ok(line) => line,
                Err(e) => match self.encoding_mode {
                    EncodingMode::FailFast => return Err(SearchError::encoding_error(path, e)),
                    EncodingMode::Lossy => {
                        if !warned_lossy {
                            warn!("Invalid UTF-8 replaced in file: {}", path.display());
                            warned_lossy = true;
                        }
                        String::from_utf8_lossy(e.as_bytes()).into_owned()
                    }
                },
            };

            if line.contains(&self.needle) {
                trace!("Found match at line {}: {}", line_number, line);
                outcome.entries.push(LogEntry {
                    file_label: label.clone(),
                    line_number,
                    content: truncate_line(&line).into_owned(),
                });
            }

            buffer = line.into_bytes();
        }

        debug!(
            "Found {} matches in file {}",
            outcome.entries.len(),
            path.display()
        );
        Ok(outcome)
    }
}
