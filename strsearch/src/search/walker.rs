use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use crate::errors::{SearchError, SearchResult};
use crate::filters::{should_include_file, IgnoreSet};

/// Lists every regular file under `root`, depth first, ordered by file name
/// within each directory.
///
/// Symlinks to regular files are listed; symlinked directories are not
/// descended into. Hidden files and `.gitignore`d files are included.
/// `extensions` and `ignore` narrow the set; ignore patterns are matched
/// against the path relative to `root`. Fails with `PathNotFound` if `root`
/// does not exist.
pub fn list_files(
    root: &Path,
    extensions: &Option<Vec<String>>,
    ignore: &IgnoreSet,
) -> SearchResult<Vec<PathBuf>> {
    if !root.exists() {
        return Err(SearchError::path_not_found(root));
    }

    debug!("Scanning directory: {}", root.display());
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };
        let is_file = if entry.path_is_symlink() {
            entry.path().is_file()
        } else {
            entry.file_type().is_some_and(|ft| ft.is_file())
        };
        if !is_file {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if should_include_file(relative, extensions, ignore) {
            trace!("Adding file: {}", entry.path().display());
            files.push(entry.into_path());
        }
    }

    debug!("Found {} files to process", files.len());
    Ok(files)
}
