//! Optional file filters applied during directory traversal.
//!
//! Both filters are off by default, so a plain search visits every regular
//! file under the root.
use glob::Pattern;
use std::path::Path;
use tracing::warn;

/// Compiled ignore patterns; invalid globs are reported and skipped
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    patterns: Vec<Pattern>,
}

impl IgnoreSet {
    pub fn new(patterns: &[String]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Skipping invalid ignore pattern '{}': {}", p, e);
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Checks `path` against every pattern, using forward slashes
    pub fn matches(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let normalized = path.to_string_lossy().replace('\\', "/");
        self.patterns.iter().any(|p| p.matches(&normalized))
    }
}

/// Checks if a file should be included in the search based on its extension
pub fn has_valid_extension(path: &Path, extensions: &Option<Vec<String>>) -> bool {
    match extensions {
        None => true,
        Some(exts) => path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| exts.iter().any(|e| e.eq_ignore_ascii_case(ext))),
    }
}

/// Determines if a file should be included in the search
pub fn should_include_file(
    path: &Path,
    extensions: &Option<Vec<String>>,
    ignore: &IgnoreSet,
) -> bool {
    has_valid_extension(path, extensions) && !ignore.matches(path)
}
