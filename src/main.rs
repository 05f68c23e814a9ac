//! CLI entry point for the bikeshare explorer.
//!
//! Loads one city's trip file, applies an optional month / weekday filter and
//! prints travel-time, station, duration and rider statistics, or pages
//! through the matching raw rows.

use anyhow::Result;
use bikeshare_explorer::analyzers::report::{QueryReport, explore, explore_concurrent, select};
use bikeshare_explorer::config::ExplorerConfig;
use bikeshare_explorer::filter::FilterSelection;
use bikeshare_explorer::output::{PAGE_SIZE, page, page_count, render_json, render_report, write_rows};
use bikeshare_explorer::parser::load_city;
use bikeshare_explorer::trips::{City, TripTable};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_explorer")]
#[command(about = "Explore US bikeshare trip data", long_about = None)]
struct Cli {
    /// Directory containing the city CSV files (overrides BIKESHARE_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct QueryArgs {
    /// City to analyze: chicago, new york city (nyc) or washington
    #[arg(short, long)]
    city: City,

    /// Month to filter by, January to June ("all" for no filter)
    #[arg(short, long)]
    month: Option<String>,

    /// Day of week to filter by ("all" for no filter)
    #[arg(short, long)]
    day: Option<String>,
}

impl QueryArgs {
    fn selection(&self) -> Result<FilterSelection> {
        Ok(FilterSelection::parse(
            self.month.as_deref(),
            self.day.as_deref(),
        )?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show travel-time, station, duration and rider statistics
    Stats {
        #[command(flatten)]
        query: QueryArgs,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Run the aggregators one after another instead of concurrently
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
    /// Print a page of the raw trip rows matching the filter as CSV
    Raw {
        #[command(flatten)]
        query: QueryArgs,

        /// Page to show, starting at 0
        #[arg(short, long, default_value_t = 0)]
        page: usize,

        /// Rows per page
        #[arg(long, default_value_t = PAGE_SIZE)]
        page_size: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    let config = ExplorerConfig::from_env().with_data_dir(cli.data_dir);
    let _file_guard = init_tracing(&config.log_file_path)?;

    match cli.command {
        Commands::Stats {
            query,
            json,
            sequential,
        } => {
            let (table, selection) = load_selection(&config, &query)?;

            let Some(report) = summarize(table, &selection, sequential).await? else {
                return Ok(());
            };

            if json {
                println!("{}", render_json(&report)?);
            } else {
                print!("{}", render_report(&report));
            }
        }
        Commands::Raw {
            query,
            page: page_index,
            page_size,
        } => {
            let (table, selection) = load_selection(&config, &query)?;
            let table = select(&table, &selection);
            let pages = page_count(&table, page_size);
            info!(page = page_index, pages, "Showing raw rows");

            if page_index >= pages {
                warn!(page = page_index, pages, "Page is past the end of the selection");
            }
            write_rows(&page(&table, page_index, page_size), std::io::stdout().lock())?;
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_tracing(log_file_path: &Path) -> Result<WorkerGuard> {
    let log_dir = log_file_path.parent().unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_explorer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

/// Parses the requested month / weekday and loads the city's full table.
#[tracing::instrument(skip(config, query), fields(city = %query.city))]
fn load_selection(
    config: &ExplorerConfig,
    query: &QueryArgs,
) -> Result<(TripTable, FilterSelection)> {
    let selection = query.selection()?;
    let table = load_city(&config.data_dir, query.city)?;
    Ok((table, selection))
}

/// Filters and runs the aggregators. Returns `None` if the user interrupts
/// with Ctrl+C; the loaded table is simply dropped.
async fn summarize(
    table: TripTable,
    selection: &FilterSelection,
    sequential: bool,
) -> Result<Option<QueryReport>> {
    if sequential {
        return Ok(Some(explore(&table, selection)));
    }

    tokio::select! {
        report = explore_concurrent(&table, selection) => Ok(Some(report?)),
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, discarding current query");
            Ok(None)
        }
    }
}
