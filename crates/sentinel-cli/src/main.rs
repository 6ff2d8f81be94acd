//! Data Sentinel CLI.

use clap::{ColorChoice, Parser};
use sentinel_cli::logging::{LogConfig, init_logging};
use sentinel_model::DashboardConfig;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command};
use crate::commands::{
    load_dashboard_config, run_breakdown, run_config, run_options, run_sheets, run_summary,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: cannot open log file: {error}");
        std::process::exit(1);
    }

    let result = match &cli.command {
        Command::Sheets(args) => with_config(&cli, |config| run_sheets(args, config)),
        Command::Summary(args) => with_config(&cli, |config| run_summary(args, config)),
        Command::Breakdown(args) => with_config(&cli, |config| run_breakdown(args, config)),
        Command::Options(args) => with_config(&cli, |config| run_options(args, config)),
        Command::Config(args) => run_config(args, cli.config.as_ref()),
    };
    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn with_config(
    cli: &Cli,
    run: impl FnOnce(&DashboardConfig) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let config = load_dashboard_config(cli.config.as_ref())?;
    run(&config)
}

/// Logging setup from the global flags.
///
/// `--log-level` wins over `-v`/`-q`; `RUST_LOG` is honoured only when neither
/// is given.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let explicit = cli.log_level.map(LevelFilter::from);
    let ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        level_filter: explicit.unwrap_or_else(|| cli.verbosity.tracing_level_filter()),
        use_env_filter: explicit.is_none() && !cli.verbosity.is_present(),
        with_ansi: ansi,
        format: cli.log_format.into(),
        log_file: cli.log_file.clone(),
        log_data: cli.log_data,
        ..LogConfig::default()
    }
}
