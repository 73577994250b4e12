pub mod config;
pub mod errors;
pub mod filters;
pub mod metrics;
pub mod pool;
pub mod report;
pub mod results;
pub mod search;

pub use crate::config::{CliOverrides, EncodingMode, SearchConfig};
pub use errors::{SearchError, SearchResult};
pub use pool::{TaskHandle, WorkerPool};
pub use report::ReportStyle;
pub use results::{AggregatedLog, FileOutcome, LogEntry, SearchOutput, Summary};
pub use search::search;
