use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// How to treat bytes that are not valid UTF-8
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingMode {
    /// Replace invalid sequences with U+FFFD and keep scanning
    #[default]
    Lossy,
    /// Fail the file with an encoding error
    FailFast,
}

impl std::str::FromStr for EncodingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lossy" => Ok(Self::Lossy),
            "failfast" => Ok(Self::FailFast),
            other => Err(format!(
                "unknown encoding mode '{}' (expected lossy or failfast)",
                other
            )),
        }
    }
}

/// Configuration for a search run.
///
/// # Configuration Locations
///
/// Values are read from these files, later ones taking precedence:
/// 1. Global `$HOME/.config/strsearch/config.yaml`
/// 2. Local `.strsearch.yaml` in the current directory
/// 3. Custom config file specified via `--config` flag
///
/// Command-line arguments override all of them (see [`SearchConfig::merge_with_cli`]).
///
/// # Configuration Format
///
/// ```yaml
/// # Substring to search for
/// pattern: "TODO"
///
/// # Root directory to scan
/// root_path: "."
///
/// # Worker threads (default: CPU cores)
/// thread_count: 4
///
/// # Where the match log is written
/// log_file: "logs.txt"
///
/// # Optional filters
/// file_extensions: ["rs", "toml"]
/// ignore_patterns: ["target/**"]
///
/// # lossy or failfast
/// encoding_mode: lossy
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// The substring to search for
    #[serde(default)]
    pub pattern: String,

    /// Root directory to start the scan from
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Number of worker threads
    /// Defaults to number of CPU cores if not specified
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// File the aggregated match log is written to
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Optional list of file extensions to include (e.g., ["rs", "toml"])
    /// If None, all files are scanned
    #[serde(default)]
    pub file_extensions: Option<Vec<String>>,

    /// Patterns to ignore (glob syntax)
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Label log entries with the full path instead of the file name
    #[serde(default)]
    pub full_paths: bool,

    /// How to handle invalid UTF-8 sequences
    #[serde(default)]
    pub encoding_mode: EncodingMode,

    /// Whether the console report uses ANSI colors
    #[serde(default = "default_color")]
    pub color: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

pub(crate) fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_file() -> PathBuf {
    PathBuf::from("logs.txt")
}

fn default_color() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            root_path: default_root_path(),
            thread_count: default_thread_count(),
            log_file: default_log_file(),
            file_extensions: None,
            ignore_patterns: Vec::new(),
            full_paths: false,
            encoding_mode: EncodingMode::default(),
            color: default_color(),
            log_level: default_log_level(),
        }
    }
}

impl SearchConfig {
    /// Creates a configuration searching `root_path` for `pattern`
    pub fn new(pattern: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self {
            pattern: pattern.into(),
            root_path: root_path.into(),
            ..Default::default()
        }
    }

    pub fn with_thread_count(mut self, thread_count: NonZeroUsize) -> Self {
        self.thread_count = thread_count;
        self
    }

    /// Loads configuration from the default locations, layering
    /// `config_path` on top when given. An explicit `config_path` must exist.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("strsearch/config.yaml")),
            // Local config
            Some(PathBuf::from(".strsearch.yaml")),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        // CLI values take precedence over config file values
        if let Some(pattern) = cli.pattern {
            self.pattern = pattern;
        }
        if let Some(root_path) = cli.root_path {
            self.root_path = root_path;
        }
        if let Some(thread_count) = cli.thread_count {
            self.thread_count = thread_count;
        }
        if let Some(log_file) = cli.log_file {
            self.log_file = log_file;
        }
        if cli.file_extensions.is_some() {
            self.file_extensions = cli.file_extensions;
        }
        if !cli.ignore_patterns.is_empty() {
            self.ignore_patterns = cli.ignore_patterns;
        }
        if cli.full_paths {
            self.full_paths = true;
        }
        if let Some(encoding_mode) = cli.encoding_mode {
            self.encoding_mode = encoding_mode;
        }
        if cli.no_color {
            self.color = false;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        self
    }
}

/// Values given on the command line; `None`/empty means "not given"
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub pattern: Option<String>,
    pub root_path: Option<PathBuf>,
    pub thread_count: Option<NonZeroUsize>,
    pub log_file: Option<PathBuf>,
    pub file_extensions: Option<Vec<String>>,
    pub ignore_patterns: Vec<String>,
    pub full_paths: bool,
    pub encoding_mode: Option<EncodingMode>,
    pub no_color: bool,
    pub log_level: Option<String>,
}
