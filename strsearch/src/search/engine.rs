use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::matcher::LineMatcher;
use super::walker::list_files;
use crate::config::SearchConfig;
use crate::errors::{SearchError, SearchResult};
use crate::filters::IgnoreSet;
use crate::pool::WorkerPool;
use crate::results::SearchOutput;

/// Searches every file under `config.root_path` for `config.pattern`, one
/// pool task per file.
///
/// A missing root is reported and yields an empty result. A file that cannot
/// be read counts as non-matching and does not stop the search. Only pool
/// lifecycle errors abort the run.
pub fn search(config: &SearchConfig) -> SearchResult<SearchOutput> {
    info!(
        "Starting search for '{}' in {}",
        config.pattern,
        config.root_path.display()
    );

    let matcher = Arc::new(
        LineMatcher::new(config.pattern.as_str())?
            .with_encoding_mode(config.encoding_mode)
            .with_full_paths(config.full_paths),
    );

    let start = Instant::now();

    let ignore = IgnoreSet::new(&config.ignore_patterns);
    let files = match list_files(&config.root_path, &config.file_extensions, &ignore) {
        Ok(files) => files,
        Err(e @ SearchError::PathNotFound(_)) => {
            warn!("{}", e);
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    let mut pool = WorkerPool::new(config.thread_count)?;
    debug!(
        "Submitting {} files to {} workers",
        files.len(),
        pool.thread_count()
    );

    let mut handles = Vec::with_capacity(files.len());
    for path in files {
        let matcher = Arc::clone(&matcher);
        let task_path = path.clone();
        handles.push((path, pool.submit(move || matcher.scan_file(&task_path))?));
    }

    let mut output = SearchOutput::new();
    for (path, handle) in handles {
        match handle.join() {
            Ok(outcome) => output.add_file_outcome(outcome),
            Err(e) if e.is_per_file() => {
                // Panics and cancellations carry no path of their own
                match e.path() {
                    Some(_) => warn!("{}", e),
                    None => warn!("Skipping {}: {}", path.display(), e),
                }
                output.add_failed_file();
            }
            Err(e) => {
                if e.is_fatal() {
                    error!("Worker pool failed during search: {}", e);
                }
                return Err(e);
            }
        }
    }

    pool.shutdown()?;
    output.summary.elapsed = start.elapsed();
    pool.metrics().log_stats();

    info!(
        "Search complete. Found {} matches in {} of {} files",
        output.summary.total_matches,
        output.summary.files_with_matches,
        output.summary.files_scanned
    );

    Ok(output)
}
