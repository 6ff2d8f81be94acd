use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use sentinel_engine::{
    Dataset, apply_cross_filter, date_bounds, filter, filter_options, kpi_summary,
    period_category_counts, period_counts, top_values, value_counts, value_pair_counts,
    weekday_hour_counts,
};
use sentinel_ingest::{config_to_toml, default_config_path, load_config, save_config};
use sentinel_model::{CrossFilter, DashboardConfig, FieldRole, FilterCriteria};
use serde::Serialize;
use tracing::{debug, info, trace};

use sentinel_cli::logging::redact_value;
use sentinel_cli::pipeline::{open_source, prepare_dataset, select_sheet, sheet_overview};
use sentinel_cli::summary::{
    SummaryReport, heatmap_table, kpi_table, options_table, period_category_table, period_table,
    sheets_table, value_count_table, value_pair_table,
};

use crate::cli::{
    BreakdownArgs, BreakdownKind, ConfigArgs, FilterArgs, OptionsArgs, SelectionArgs, SourceArgs,
    SummaryArgs,
};

/// Resolve the configuration path: explicit flag, else the platform default.
fn config_path(explicit: Option<&PathBuf>) -> Option<PathBuf> {
    explicit.cloned().or_else(default_config_path)
}

pub fn load_dashboard_config(explicit: Option<&PathBuf>) -> Result<DashboardConfig> {
    match config_path(explicit) {
        Some(path) => load_config(&path).context("load configuration"),
        None => Ok(DashboardConfig::default()),
    }
}

pub fn run_sheets(args: &SourceArgs, config: &DashboardConfig) -> Result<()> {
    let book = open_source(&args.source)?;
    println!("{}", sheets_table(&sheet_overview(&book, config)));
    Ok(())
}

pub fn run_summary(args: &SummaryArgs, config: &DashboardConfig) -> Result<()> {
    let base = load_sheet(&args.source, args.filters.sheet.as_deref(), config)?;
    let rows_before_filter = base.height();
    let selected = narrow(&base, &args.filters, &args.selection)?;

    let mut settings = config.kpi.clone();
    if let Some(period) = args.period {
        settings.growth_period = period;
    }
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let summary = kpi_summary(&selected, &settings, today);
    info!(
        sheet = selected.name(),
        rows = summary.total,
        "KPI summary computed"
    );

    if args.json {
        let report = SummaryReport {
            sheet: selected.name(),
            rows_before_filter,
            today,
            kpis: &summary,
        };
        println!("{}", report.to_json().context("serialize summary")?);
    } else {
        println!(
            "Sheet: {} ({} of {} rows)",
            selected.name(),
            selected.height(),
            rows_before_filter
        );
        println!("{}", kpi_table(&summary));
    }
    Ok(())
}

pub fn run_breakdown(args: &BreakdownArgs, config: &DashboardConfig) -> Result<()> {
    let base = load_sheet(&args.source, args.filters.sheet.as_deref(), config)?;
    let dataset = narrow(&base, &args.filters, &args.selection)?;
    let schema = dataset.schema();
    let date_field = schema.date.as_str();

    match args.kind {
        BreakdownKind::TopResponsibles => {
            let counts = top_values(&dataset, &schema.responsible, args.limit);
            emit(args.json, &counts, || value_count_table("Responsible", &counts))
        }
        BreakdownKind::Categories => {
            let counts = value_counts(&dataset, &schema.category);
            emit(args.json, &counts, || value_count_table("Category", &counts))
        }
        BreakdownKind::States => {
            let counts = value_counts(&dataset, &schema.state);
            emit(args.json, &counts, || value_count_table("State", &counts))
        }
        BreakdownKind::Timeline => {
            let counts = period_counts(&dataset, date_field, args.period);
            emit(args.json, &counts, || period_table(&counts))
        }
        BreakdownKind::CategoryTimeline => {
            let counts =
                period_category_counts(&dataset, date_field, &schema.category, args.period);
            emit(args.json, &counts, || period_category_table("Category", &counts))
        }
        BreakdownKind::StateCategory => {
            let counts = value_pair_counts(&dataset, &schema.state, &schema.category);
            emit(args.json, &counts, || value_pair_table(("State", "Category"), &counts))
        }
        BreakdownKind::StateTimeline => {
            let counts = period_category_counts(&dataset, date_field, &schema.state, args.period);
            emit(args.json, &counts, || period_category_table("State", &counts))
        }
        BreakdownKind::Heatmap => {
            let grid = weekday_hour_counts(&dataset, date_field);
            emit(args.json, &grid, || heatmap_table(&grid))
        }
    }
}

pub fn run_options(args: &OptionsArgs, config: &DashboardConfig) -> Result<()> {
    let dataset = load_sheet(&args.source, args.sheet.as_deref(), config)?;
    let schema = dataset.schema();

    let options: Vec<(String, Vec<String>)> = [
        ("Responsible", FieldRole::Responsible),
        ("Category", FieldRole::Category),
        ("State", FieldRole::State),
    ]
    .into_iter()
    .map(|(label, role)| {
        (
            label.to_string(),
            filter_options(&dataset, schema.column(role)),
        )
    })
    .collect();
    let bounds = date_bounds(&dataset, &schema.date);

    println!("Sheet: {} ({} rows)", dataset.name(), dataset.height());
    println!("{}", options_table(&options, bounds));
    Ok(())
}

pub fn run_config(args: &ConfigArgs, explicit: Option<&PathBuf>) -> Result<()> {
    let path = config_path(explicit);
    if args.write_default {
        let path = path.ok_or_else(|| anyhow!("no configuration path; pass --config"))?;
        save_config(&DashboardConfig::default(), &path).context("write configuration")?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let config = load_dashboard_config(explicit)?;
    match &path {
        Some(path) if path.exists() => println!("# {}", path.display()),
        Some(path) => println!("# {} (not found, showing defaults)", path.display()),
        None => println!("# defaults"),
    }
    print!("{}", config_to_toml(&config).context("serialize configuration")?);
    Ok(())
}

/// Load the chosen sheet of a source as a normalized dataset.
fn load_sheet(
    source: &SourceArgs,
    sheet: Option<&str>,
    config: &DashboardConfig,
) -> Result<Dataset> {
    let book = open_source(&source.source)?;
    let sheet = select_sheet(&book, config, sheet)?;
    prepare_dataset(sheet, config)
}

/// Apply the sidebar filters, then the chart selections.
fn narrow(dataset: &Dataset, filters: &FilterArgs, selection: &SelectionArgs) -> Result<Dataset> {
    let criteria = criteria_from_args(filters);
    trace!(
        responsibles = ?criteria
            .responsibles
            .iter()
            .map(|value| redact_value(value))
            .collect::<Vec<_>>(),
        "filter selection"
    );
    let filtered = filter(dataset, &criteria).context("apply filters")?;

    let cross = cross_filter_from_args(selection);
    if let Some(category) = &cross.category {
        trace!(category = redact_value(category), "chart selection");
    }
    let narrowed = apply_cross_filter(&filtered, &cross).context("apply chart selections")?;
    debug!(
        before = dataset.height(),
        filtered = filtered.height(),
        selected = narrowed.height(),
        "rows after filtering"
    );
    Ok(narrowed)
}

fn criteria_from_args(args: &FilterArgs) -> FilterCriteria {
    let mut criteria = FilterCriteria::new()
        .with_responsibles(args.responsibles.iter().cloned())
        .with_categories(args.categories.iter().cloned())
        .with_states(args.states.iter().cloned())
        .with_date_range(args.from, args.to);
    if let Some(field) = &args.date_field {
        criteria = criteria.with_date_field(field.clone());
    }
    criteria
}

fn cross_filter_from_args(args: &SelectionArgs) -> CrossFilter {
    let mut cross = CrossFilter::new();
    if let Some(category) = &args.category {
        cross = cross.with_category(category.clone());
    }
    if let Some(date) = args.date {
        cross = cross.with_date(date);
    }
    if let Some(state) = &args.state {
        cross = cross.with_state_contains(state.clone());
    }
    for cell in &args.cells {
        cross = cross.with_cell(*cell);
    }
    cross
}

fn emit<T: Serialize + ?Sized>(
    json: bool,
    value: &T,
    table: impl FnOnce() -> comfy_table::Table,
) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("serialize breakdown")?
        );
    } else {
        println!("{}", table());
    }
    Ok(())
}
