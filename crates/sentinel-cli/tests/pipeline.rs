//! Integration tests for source preparation and report rendering.

use std::fs;

use chrono::NaiveDate;
use sentinel_cli::pipeline::{open_source, prepare_dataset, select_sheet, sheet_overview};
use sentinel_cli::summary::{
    SummaryReport, kpi_table, period_category_table, sheets_table, value_pair_table,
};
use sentinel_engine::{kpi_summary, period_category_counts, value_pair_counts};
use sentinel_model::{DashboardConfig, KpiSettings, Period};
use tempfile::TempDir;

fn sample_source() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("ATIVOS PF E PJ.csv"),
        "Usuário responsável,Categoria,Estado,Data de cadastro\n\
         ana,PF,SP,2024-02-20\n\
         bia,PJ,RJ,2024-03-02\n\
         ,PJ,SP,2024-03-08\n\
         ana,PF,,2024-03-09\n\
         caio,PF,SP,sem data\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("CANCELADOS.csv"),
        "Usuário responsável,Categoria,Estado,Data de saida\nbia,PJ,MG,2024-01-15\n",
    )
    .unwrap();
    fs::write(dir.path().join("Resumo.csv"), "Total\n6\n").unwrap();
    dir
}

#[test]
fn overview_marks_configured_sheets() {
    let dir = sample_source();
    let book = open_source(dir.path()).unwrap();
    let overview = sheet_overview(&book, &DashboardConfig::default());

    let rows: Vec<(&str, usize, &str, bool)> = overview
        .iter()
        .map(|s| (s.name.as_str(), s.rows, s.date_field.as_str(), s.visible))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("ATIVOS PF E PJ", 5, "Data de cadastro", true),
            ("CANCELADOS", 1, "Data de saida", true),
            ("Resumo", 1, "Data de cadastro", false),
        ]
    );
    assert!(overview.iter().all(|s| s.has_date || s.name == "Resumo"));

    let mut table = sheets_table(&overview);
    table.force_no_tty();
    assert!(table.to_string().contains("Data de saida"));
}

#[test]
fn default_sheet_is_first_configured() {
    let dir = sample_source();
    let book = open_source(dir.path()).unwrap();
    let config = DashboardConfig::default();

    assert_eq!(select_sheet(&book, &config, None).unwrap().name, "ATIVOS PF E PJ");
    assert_eq!(
        select_sheet(&book, &config, Some("CANCELADOS")).unwrap().name,
        "CANCELADOS"
    );
    assert!(select_sheet(&book, &config, Some("Resumo 2")).is_err());
}

#[test]
fn cancelled_sheet_uses_exit_date() {
    let dir = sample_source();
    let book = open_source(dir.path()).unwrap();
    let config = DashboardConfig::default();
    let sheet = select_sheet(&book, &config, Some("CANCELADOS")).unwrap();
    let dataset = prepare_dataset(sheet, &config).unwrap();
    assert_eq!(dataset.schema().date, "Data de saida");
    assert_eq!(dataset.height(), 1);
}

#[test]
fn summary_report_json() {
    let dir = sample_source();
    let book = open_source(dir.path()).unwrap();
    let config = DashboardConfig::default();
    let sheet = select_sheet(&book, &config, None).unwrap();
    let dataset = prepare_dataset(sheet, &config).unwrap();

    let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    let summary = kpi_summary(&dataset, &KpiSettings::default(), today);
    let report = SummaryReport {
        sheet: dataset.name(),
        rows_before_filter: dataset.height(),
        today,
        kpis: &summary,
    };

    insta::assert_snapshot!(report.to_json().unwrap(), @r###"
    {
      "sheet": "ATIVOS PF E PJ",
      "rows_before_filter": 4,
      "today": "2024-03-10",
      "kpis": {
        "total": 4,
        "categories": 2,
        "states": 2,
        "recent_short": {
          "days": 7,
          "count": 2
        },
        "recent_long": {
          "days": 30,
          "count": 4
        },
        "incomplete_pct": 50.0,
        "growth_pct": 200.0,
        "growth_period": "monthly"
      }
    }
    "###);

    let mut table = kpi_table(&summary);
    table.force_no_tty();
    let rendered = table.to_string();
    for expected in [
        "Total records",
        "Last 7 days",
        "New records (30 days)",
        "50.00%",
        "Growth (monthly)",
        "+200.00%",
    ] {
        assert!(rendered.contains(expected), "missing {expected} in\n{rendered}");
    }
}

#[test]
fn state_breakdown_tables() {
    let dir = sample_source();
    let book = open_source(dir.path()).unwrap();
    let config = DashboardConfig::default();
    let sheet = select_sheet(&book, &config, None).unwrap();
    let dataset = prepare_dataset(sheet, &config).unwrap();
    let schema = dataset.schema();

    let pairs = value_pair_counts(&dataset, &schema.state, &schema.category);
    let rows: Vec<(&str, &str, usize)> = pairs
        .iter()
        .map(|p| (p.first.as_str(), p.second.as_str(), p.count))
        .collect();
    assert_eq!(rows, vec![("RJ", "PJ", 1), ("SP", "PF", 1), ("SP", "PJ", 1)]);

    let mut table = value_pair_table(("State", "Category"), &pairs);
    table.force_no_tty();
    let rendered = table.to_string();
    assert!(rendered.contains("State") && rendered.contains("Category"));

    let series = period_category_counts(&dataset, &schema.date, &schema.state, Period::Monthly);
    let rows: Vec<(&str, &str, usize)> = series
        .iter()
        .map(|p| (p.label.as_str(), p.category.as_str(), p.count))
        .collect();
    assert_eq!(
        rows,
        vec![("2024-02", "SP", 1), ("2024-03", "RJ", 1), ("2024-03", "SP", 1)]
    );

    let mut table = period_category_table("State", &series);
    table.force_no_tty();
    assert!(table.to_string().contains("2024-02"));
}
