//! Repository status command implementation
//!
//! Discovers repositories below the configured root, probes each one with
//! bounded concurrency and prints a report of the ones worth attention.

use anyhow::Result;
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::core::config::{BRANCH_DISPLAY_WIDTH, PROGRESS_CHARS, PROGRESS_TEMPLATE};
use crate::core::{
    display_path, filter_repos, partition_visible, probe, run_all, scan_repos, set_terminal_title,
    set_terminal_title_and_flush, sort_rows, FatalError, FilterSpec, ResultRow, RunStatistics,
    StatusConfig,
};
use crate::git::{GitCli, VcsBackend};
use crate::utils::truncate_display;

const NO_MATCHES_MESSAGE: &str = "No repos match your directory & filter";
const EMPTY_SCAN_SUFFIX: &str = "does not contain any repos";
const STALE_MARKER: &str = "stale";
const COLUMN_GAP: &str = "  ";

/// How the report is presented
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Print JSON instead of a table
    pub json: bool,
    /// Show a progress bar on stderr while probing
    pub progress: bool,
}

/// Everything a completed run produced, ready to render
#[derive(Debug)]
pub struct StatusReport {
    /// Visible rows in report order
    pub rows: Vec<ResultRow>,
    /// Rows left out by the visibility rule
    pub hidden: usize,
    /// Rows whose last commit is past the stale threshold
    pub stale: usize,
    /// Candidates never probed because the run was aborted
    pub skipped: usize,
    pub fatal: Option<FatalError>,
    pub summary: String,
    /// Reference time used for staleness
    pub generated_at: DateTime<Utc>,
}

/// Result of a status run
#[derive(Debug)]
pub enum StatusOutcome {
    /// The root holds no repositories
    NoRepos,
    /// Repositories exist but the filter rejected all of them
    NoMatches,
    Completed(StatusReport),
}

/// Handles the status command
pub async fn handle_status_command(config: StatusConfig, options: OutputOptions) -> Result<()> {
    set_terminal_title("🔍 gitstatus");

    let config = Arc::new(config);
    let backend: Arc<dyn VcsBackend> = Arc::new(GitCli::new());
    let progress = options.progress && !options.json;

    let outcome = execute(Arc::clone(&config), backend, progress).await;
    set_terminal_title_and_flush("✅ gitstatus");

    match outcome? {
        StatusOutcome::NoRepos => {
            println!("{} {EMPTY_SCAN_SUFFIX}", config.root_directory.display());
            Ok(())
        }
        StatusOutcome::NoMatches => {
            println!("{NO_MATCHES_MESSAGE}");
            Ok(())
        }
        StatusOutcome::Completed(report) => {
            if options.json {
                println!("{}", render_json(&report, &config)?);
            } else {
                print!("{}", render_table(&report, &config));
            }

            match report.fatal {
                Some(fatal) => {
                    if report.skipped > 0 {
                        eprintln!("{} repos were not checked", report.skipped);
                    }
                    Err(fatal.into())
                }
                None => Ok(()),
            }
        }
    }
}

/// Runs discovery, filtering and probing for `config` against `backend`
///
/// Per-repository failures end up on rows. A fatal failure is returned inside
/// the report next to the rows completed before it.
pub async fn execute(
    config: Arc<StatusConfig>,
    backend: Arc<dyn VcsBackend>,
    show_progress: bool,
) -> Result<StatusOutcome> {
    let start_time = Instant::now();

    let root = config.root_directory.clone();
    let max_depth = config.max_depth;
    let candidates = tokio::task::spawn_blocking(move || scan_repos(root, max_depth)).await?;
    if candidates.is_empty() {
        return Ok(StatusOutcome::NoRepos);
    }

    let spec = FilterSpec::parse(&config.filter_expression);
    let candidates = filter_repos(candidates, &spec);
    if candidates.is_empty() {
        return Ok(StatusOutcome::NoMatches);
    }
    info!(
        repos = candidates.len(),
        concurrency = config.concurrency_limit,
        "probing repositories"
    );

    let progress_bar = if show_progress {
        Some(create_progress_bar(candidates.len() as u64)?)
    } else {
        None
    };
    let live_stats = Arc::new(RunStatistics::new());

    let task_config = Arc::clone(&config);
    let task_bar = progress_bar.clone();
    let task_stats = Arc::clone(&live_stats);
    let report = run_all(candidates, config.concurrency_limit, move |candidate| {
        let config = Arc::clone(&task_config);
        let backend = Arc::clone(&backend);
        let stats = Arc::clone(&task_stats);
        let progress_bar = task_bar.clone();
        async move {
            let result = probe(&candidate, &config, backend.as_ref()).await;
            if let Ok(row) = &result {
                stats.record(row);
            }
            if let Some(pb) = &progress_bar {
                pb.inc(1);
                pb.set_message(stats.progress_message());
            }
            result
        }
    })
    .await;

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    let mut rows = report.rows;
    sort_rows(&mut rows, config.sort_order());

    let generated_at = Utc::now();
    let stale = if config.stale_mode {
        rows.iter()
            .filter(|row| row.is_stale(generated_at, config.stale_after))
            .count()
    } else {
        0
    };
    let summary = RunStatistics::from_rows(&rows).generate_summary(stale, start_time.elapsed());
    let (rows, hidden) = partition_visible(rows, config.show_all);
    debug!(visible = rows.len(), hidden, "report ready");

    Ok(StatusOutcome::Completed(StatusReport {
        rows,
        hidden,
        stale,
        skipped: report.skipped,
        fatal: report.fatal,
        summary,
        generated_at,
    }))
}

fn create_progress_bar(len: u64) -> Result<ProgressBar> {
    let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)?.progress_chars(PROGRESS_CHARS);
    Ok(ProgressBar::new(len).with_style(style))
}

fn pull_cell(row: &ResultRow) -> &'static str {
    if row.was_synchronized {
        "Updated"
    } else if !row.is_dirty() && row.error.is_none() {
        "Pulled"
    } else {
        ""
    }
}

fn last_commit_cell(row: &ResultRow, report: &StatusReport, config: &StatusConfig) -> String {
    match row.last_commit_time {
        Some(time) if row.is_stale(report.generated_at, config.stale_after) => {
            format!("{} {STALE_MARKER}", time.format("%Y-%m-%d"))
        }
        Some(time) => time.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

/// Renders the report as an aligned text table followed by the hidden-count
/// and summary lines
pub fn render_table(report: &StatusReport, config: &StatusConfig) -> String {
    let has_errors = report.rows.iter().any(|row| row.error.is_some());

    let mut header = vec!["Repo", "Branch", "Modified"];
    if config.enable_sync {
        header.push("Pull");
    }
    if config.stale_mode {
        header.push("Last commit");
    }
    if has_errors {
        header.push("Error");
    }

    let body: Vec<(String, Vec<String>)> = report
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                display_path(&row.path, &config.root_directory, config.short_paths),
                truncate_display(&row.branch, BRANCH_DISPLAY_WIDTH),
                row.changed_summary.clone(),
            ];
            if config.enable_sync {
                cells.push(pull_cell(row).to_string());
            }
            if config.stale_mode {
                cells.push(last_commit_cell(row, report, config));
            }
            if has_errors {
                cells.push(row.error.as_ref().map(ToString::to_string).unwrap_or_default());
            }
            (row.status().symbol().to_string(), cells)
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for (_, cells) in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    if !body.is_empty() {
        let header_cells: Vec<String> = header.iter().map(ToString::to_string).collect();
        out.push_str(&format_line("  ", &header_cells, &widths));
        for (symbol, cells) in &body {
            out.push_str(&format_line(symbol, cells, &widths));
        }
    }

    if report.hidden > 0 {
        out.push_str(&format!(
            "{} repos with nothing to report, use --all to show them\n",
            report.hidden
        ));
    }
    out.push_str(&report.summary);
    out.push('\n');
    out
}

fn format_line(marker: &str, cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    format!("{marker} {}\n", padded.join(COLUMN_GAP).trim_end())
}

#[derive(Serialize)]
struct JsonRow<'a> {
    display_path: String,
    status: &'static str,
    stale: bool,
    #[serde(flatten)]
    row: &'a ResultRow,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    root: &'a Path,
    repos: Vec<JsonRow<'a>>,
    hidden: usize,
    stale: usize,
    skipped: usize,
    fatal: Option<String>,
    summary: &'a str,
}

/// Renders the report as pretty-printed JSON
pub fn render_json(report: &StatusReport, config: &StatusConfig) -> Result<String> {
    let repos = report
        .rows
        .iter()
        .map(|row| JsonRow {
            display_path: display_path(&row.path, &config.root_directory, config.short_paths),
            status: row.status().text(),
            stale: config.stale_mode && row.is_stale(report.generated_at, config.stale_after),
            row,
        })
        .collect();

    let document = JsonReport {
        root: &config.root_directory,
        repos,
        hidden: report.hidden,
        stale: report.stale,
        skipped: report.skipped,
        fatal: report.fatal.as_ref().map(ToString::to_string),
        summary: &report.summary,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}
