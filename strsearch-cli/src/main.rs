use anyhow::{Context, Result};
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use strsearch::{
    report::{self, ReportStyle},
    search, CliOverrides, EncodingMode, SearchConfig, SearchOutput,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "search-string", author, version, about, long_about = None)]
struct Cli {
    /// Root directory to scan (default: current directory)
    #[arg(short = 'p', long = "path")]
    path: Option<PathBuf>,

    /// String to search for
    #[arg(short = 's', long = "search", num_args = 0..=1, default_missing_value = "")]
    search: Option<String>,

    /// Number of worker threads (default: CPU cores)
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// File the match log is written to
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Configuration file (YAML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// File extensions to include (e.g. rs,go,js)
    #[arg(short = 'e', long)]
    extensions: Option<String>,

    /// Patterns to ignore (glob format)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Log full paths instead of file names
    #[arg(long)]
    full_paths: bool,

    /// How to handle invalid UTF-8 sequences (lossy|failfast)
    #[arg(long)]
    encoding: Option<EncodingMode>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        let file_extensions = self.extensions.as_ref().map(|e| {
            e.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        });

        CliOverrides {
            pattern: self.search.clone().filter(|s| !s.is_empty()),
            root_path: self.path.clone(),
            thread_count: self.threads,
            log_file: self.output.clone(),
            file_extensions,
            ignore_patterns: self.ignore.clone(),
            full_paths: self.full_paths,
            encoding_mode: self.encoding,
            no_color: self.no_color,
            log_level: self.log_level.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // An explicit but empty -s never falls back to a configured pattern
    if matches!(cli.search.as_deref(), Some("")) {
        let style = ReportStyle {
            color: !cli.no_color,
        };
        println!("{}", style.format_usage());
        return Ok(());
    }

    let config = SearchConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?
        .merge_with_cli(cli.overrides());

    setup_logging(&config.log_level);
    debug!("Resolved configuration: {:?}", config);

    let style = ReportStyle {
        color: config.color,
    };

    if config.pattern.is_empty() {
        println!("{}", style.format_usage());
        return Ok(());
    }

    let output = search(&config).context("Search failed")?;
    print_search_results(&config, &output, style)
}

fn print_search_results(
    config: &SearchConfig,
    output: &SearchOutput,
    style: ReportStyle,
) -> Result<()> {
    report::write_log(&config.log_file, &output.log)
        .with_context(|| format!("Failed to write {}", config.log_file.display()))?;
    println!("{}", style.format_summary(&output.summary));
    Ok(())
}

fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
