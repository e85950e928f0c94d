pub mod output;

use std::{
    ffi::OsString,
    io::{self, Write},
    path::PathBuf,
};

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::debug;

use crate::{
    analytics::{AnalyticsEngine, ReportQuery},
    config::ConfigManager,
    core::{
        services::{AnalyticsRequest, AnalyticsService},
        time::{Clock, FixedClock, SystemClock},
    },
    domain::Timeframe,
    errors::AnalyticsError,
    storage::JsonRecordSource,
    utils::build_info,
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] AnalyticsError),
    #[error("{0}")]
    Usage(#[from] clap::Error),
    #[error("Output error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Spending analytics over exported transaction records.
#[derive(Parser, Debug)]
#[command(name = "expense_analytics_cli", version, about = "Spending analytics reports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build an analytics report for one user and timeframe
    Report(ReportArgs),
    /// Print build metadata
    Version,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// JSON file holding a record array or a map of user id to records
    #[arg(long, value_name = "FILE")]
    pub records: PathBuf,

    /// User whose records are reported on
    #[arg(long, default_value = "default")]
    pub user: String,

    /// day, week, month, quarter, year or custom
    #[arg(long, default_value = "month")]
    pub timeframe: Timeframe,

    /// First day of a custom range (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of a custom range, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Reference instant (RFC 3339); defaults to the current time
    #[arg(long)]
    pub now: Option<DateTime<Utc>>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Configuration file; defaults to the one under the app data directory
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// Parses the process arguments and runs the selected command against stdout.
pub fn run_cli() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            // --help and --version
            err.print()?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    execute(cli, &mut handle)
}

/// Runs a command line given as an argument list, writing the output to `out`.
pub fn run_with_args<I, T>(args: I, out: &mut impl Write) -> Result<(), CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    execute(cli, out)
}

pub fn execute(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    match cli.command {
        Command::Report(args) => report(args, out),
        Command::Version => {
            writeln!(out, "{}", build_info::current().describe())?;
            Ok(())
        }
    }
}

fn report(args: ReportArgs, out: &mut impl Write) -> Result<(), CliError> {
    let manager = match &args.config {
        Some(path) => ConfigManager::new(path.clone()),
        None => ConfigManager::from_env(),
    };
    let config = manager.load()?;
    debug!(config = %manager.config_path().display(), "loaded analytics configuration");

    let engine = AnalyticsEngine::from_config(&config)?;
    let source = JsonRecordSource::new(&args.records);
    let clock: Box<dyn Clock> = match args.now {
        Some(now) => Box::new(FixedClock(now)),
        None => Box::new(SystemClock),
    };
    let query = ReportQuery {
        timeframe: args.timeframe,
        custom_start: args.start,
        custom_end: args.end,
    };
    let service = AnalyticsService::new(source, clock, engine);
    let report = service.report(&AnalyticsRequest::new(args.user, query))?;

    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            write!(out, "{}", output::render_text(&report, &config.money_formatter()))?;
        }
    }
    Ok(())
}
