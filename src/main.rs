//! gitstatus: reports the state of every git repository below a directory

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gitstatus::commands::{handle_status_command, OutputOptions};
use gitstatus::core::{
    default_root_directory, get_concurrency, stale_days, StatusConfig, DEFAULT_MAX_DEPTH,
    DEFAULT_STALE_DAYS, MAX_PULL_RETRIES,
};
use gitstatus::utils::stderr_is_terminal;

#[derive(Parser, Debug)]
#[command(name = "gitstatus")]
#[command(about = "Show the status of every git repository below a directory")]
#[command(version)]
struct Cli {
    /// Directory to scan (defaults to ~/code)
    #[arg(short, long, env = "GITSTATUS_DIR")]
    dir: Option<PathBuf>,

    /// Comma-separated path substrings to include, prefix with ! to exclude
    #[arg(short, long, env = "GITSTATUS_FILTER", default_value = "")]
    filter: String,

    /// How many directory levels below the root to search
    #[arg(short, long, env = "GITSTATUS_MAXDEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    maxdepth: usize,

    /// Show paths relative to the scanned directory
    #[arg(short, long, env = "GITSTATUS_SHORT")]
    short: bool,

    /// Pull repositories that have no local changes
    #[arg(short, long, env = "GITSTATUS_PULL")]
    pull: bool,

    /// Show every repository, including ones with nothing to report
    #[arg(short, long, env = "GITSTATUS_ALL")]
    all: bool,

    /// Collect last commit times and list the oldest repositories first
    #[arg(long, env = "GITSTATUS_STALE")]
    stale: bool,

    /// Age in days after which a repository counts as stale
    #[arg(long, env = "GITSTATUS_STALE_DAYS", default_value_t = DEFAULT_STALE_DAYS)]
    stale_days: u64,

    /// Number of repositories to probe at once
    #[arg(short, long, env = "GITSTATUS_JOBS")]
    jobs: Option<usize>,

    /// Probe one repository at a time
    #[arg(long, env = "GITSTATUS_SEQUENTIAL")]
    sequential: bool,

    /// Print the report as JSON
    #[arg(long, env = "GITSTATUS_JSON")]
    json: bool,

    /// Disable the progress bar
    #[arg(long, env = "GITSTATUS_NO_PROGRESS")]
    no_progress: bool,

    /// Verbose logging
    #[arg(short, long, env = "GITSTATUS_VERBOSE")]
    verbose: bool,
}

impl Cli {
    fn status_config(&self) -> StatusConfig {
        StatusConfig {
            root_directory: self.dir.clone().unwrap_or_else(default_root_directory),
            max_depth: self.maxdepth,
            filter_expression: self.filter.clone(),
            concurrency_limit: get_concurrency(self.jobs, self.sequential),
            enable_sync: self.pull,
            show_all: self.all,
            stale_mode: self.stale,
            stale_after: stale_days(self.stale_days),
            short_paths: self.short,
            max_retries: MAX_PULL_RETRIES,
        }
    }

    fn output_options(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            progress: !self.no_progress && stderr_is_terminal(),
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.status_config();
    debug!(?config, "starting");

    handle_status_command(config, cli.output_options()).await
}
