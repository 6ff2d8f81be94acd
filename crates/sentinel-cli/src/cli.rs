//! CLI argument definitions for Data Sentinel.

use std::path::PathBuf;

use chrono::{NaiveDate, Weekday};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use sentinel_cli::logging::LogFormat;
use sentinel_model::{HeatmapCell, Period};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "sentinel",
    version,
    about = "Data Sentinel - customer base KPIs from a spreadsheet",
    long_about = "Load a customer spreadsheet (xlsx, ods, CSV file or folder of CSV files),\n\
                  filter it by responsible, category, state and period, and print the\n\
                  dashboard KPI cards and chart breakdowns."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Dashboard configuration file (default: platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow customer values (names, categories) in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the sheets of a source with row counts and date columns.
    Sheets(SourceArgs),

    /// Print the KPI cards for a (filtered) sheet.
    Summary(SummaryArgs),

    /// Print chart data for a (filtered) sheet.
    Breakdown(BreakdownArgs),

    /// List the values offered by each filter and the default period.
    Options(OptionsArgs),

    /// Show the effective configuration, or write the defaults.
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct SourceArgs {
    /// Workbook, CSV file, or folder of CSV files.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,
}

/// Sidebar filters.
#[derive(Args)]
pub struct FilterArgs {
    /// Sheet to use (default: first configured sheet present in the source).
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// Keep rows with this responsible user (repeatable).
    #[arg(long = "responsible", value_name = "NAME")]
    pub responsibles: Vec<String>,

    /// Keep rows with this category (repeatable).
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,

    /// Keep rows with this state (repeatable).
    #[arg(long = "state", value_name = "STATE")]
    pub states: Vec<String>,

    /// First day of the period (YYYY-MM-DD); needs --to.
    #[arg(long = "from", value_name = "DATE", requires = "to")]
    pub from: Option<NaiveDate>,

    /// Last day of the period (YYYY-MM-DD); needs --from.
    #[arg(long = "to", value_name = "DATE", requires = "from")]
    pub to: Option<NaiveDate>,

    /// Date column the period applies to (default: the sheet's date column).
    #[arg(long = "date-field", value_name = "COLUMN")]
    pub date_field: Option<String>,
}

/// Chart selections applied after the sidebar filters.
#[derive(Args)]
pub struct SelectionArgs {
    /// Keep rows with exactly this category.
    #[arg(long = "pick-category", value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Keep rows recorded on this day (YYYY-MM-DD).
    #[arg(long = "pick-date", value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// Keep rows whose state contains this text.
    #[arg(long = "pick-state", value_name = "TEXT")]
    pub state: Option<String>,

    /// Keep rows in this weekday/hour cell, e.g. `mon:9` (repeatable).
    #[arg(long = "pick-cell", value_name = "DAY:HOUR", value_parser = parse_cell)]
    pub cells: Vec<HeatmapCell>,
}

#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Reference day for the recency cards (default: today).
    #[arg(long = "today", value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Bucket size for the growth card (default: from configuration).
    #[arg(long = "period", value_name = "PERIOD")]
    pub period: Option<Period>,

    /// Print JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct BreakdownArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Which chart to compute.
    #[arg(value_enum, value_name = "KIND")]
    pub kind: BreakdownKind,

    #[command(flatten)]
    pub filters: FilterArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Bucket size for timelines.
    #[arg(long = "period", value_name = "PERIOD", default_value = "monthly")]
    pub period: Period,

    /// Number of entries for ranked breakdowns.
    #[arg(long = "limit", value_name = "N", default_value_t = 10)]
    pub limit: usize,

    /// Print JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct OptionsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Sheet to use (default: first configured sheet present in the source).
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Write the default configuration to the config path.
    #[arg(long = "write-default")]
    pub write_default: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum BreakdownKind {
    /// Most frequent responsible users.
    TopResponsibles,
    /// Records per category.
    Categories,
    /// Records per state.
    States,
    /// Records per period.
    Timeline,
    /// Records per period and category.
    CategoryTimeline,
    /// Records per state and category.
    StateCategory,
    /// Records per period and state.
    StateTimeline,
    /// Records per weekday and hour.
    Heatmap,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

/// Parse `DAY:HOUR`, e.g. `mon:9` or `Sunday:23`.
fn parse_cell(value: &str) -> Result<HeatmapCell, String> {
    let (day, hour) = value
        .split_once(':')
        .ok_or_else(|| format!("expected DAY:HOUR, got '{value}'"))?;
    let weekday: Weekday = day
        .trim()
        .parse()
        .map_err(|_| format!("unknown weekday '{day}'"))?;
    let hour: u8 = hour
        .trim()
        .parse()
        .map_err(|_| format!("invalid hour '{hour}'"))?;
    if hour > 23 {
        return Err(format!("hour {hour} is out of range 0-23"));
    }
    Ok(HeatmapCell::new(weekday, hour))
}
