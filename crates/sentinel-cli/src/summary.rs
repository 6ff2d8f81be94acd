//! Terminal tables for KPI cards, breakdowns and sheet listings.

use chrono::{NaiveDate, Weekday};
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use sentinel_engine::{
    PeriodCategoryCount, PeriodCount, ValueCount, ValuePairCount, WeekdayHourGrid,
};
use sentinel_model::{HeatmapCell, KpiSummary};
use serde::Serialize;

use crate::pipeline::SheetInfo;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Machine-readable KPI report.
#[derive(Debug, Serialize)]
pub struct SummaryReport<'a> {
    pub sheet: &'a str,
    pub rows_before_filter: usize,
    pub today: NaiveDate,
    pub kpis: &'a KpiSummary,
}

impl SummaryReport<'_> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn kpi_table(summary: &KpiSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Indicator"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    table.add_row(vec![Cell::new("Total records"), Cell::new(summary.total)]);
    table.add_row(vec![Cell::new("Categories"), Cell::new(summary.categories)]);
    table.add_row(vec![Cell::new("States"), Cell::new(summary.states)]);
    table.add_row(vec![
        Cell::new(format!("Last {} days", summary.recent_short.days)),
        Cell::new(summary.recent_short.count),
    ]);
    table.add_row(vec![
        Cell::new(format!("New records ({} days)", summary.recent_long.days)),
        Cell::new(summary.recent_long.count),
    ]);
    table.add_row(vec![
        Cell::new("Incomplete records"),
        percent_cell(summary.incomplete_pct, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new(format!("Growth ({})", summary.growth_period)),
        growth_cell(summary.growth_pct),
    ]);
    table
}

pub fn value_count_table(label: &str, counts: &[ValueCount]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell(label),
        header_cell("Records"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (rank, entry) in counts.iter().enumerate() {
        table.add_row(vec![
            dim_cell(rank + 1),
            Cell::new(&entry.value),
            Cell::new(entry.count),
        ]);
    }
    table
}

/// Ranked pairs, labelled by the two columns they come from.
pub fn value_pair_table(labels: (&str, &str), counts: &[ValuePairCount]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell(labels.0),
        header_cell(labels.1),
        header_cell("Records"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for (rank, entry) in counts.iter().enumerate() {
        table.add_row(vec![
            dim_cell(rank + 1),
            Cell::new(&entry.first),
            Cell::new(&entry.second),
            Cell::new(entry.count),
        ]);
    }
    table
}

pub fn period_table(counts: &[PeriodCount]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Period"), header_cell("Records")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for entry in counts {
        table.add_row(vec![Cell::new(&entry.label), count_cell(entry.count)]);
    }
    table
}

pub fn period_category_table(label: &str, counts: &[PeriodCategoryCount]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Period"),
        header_cell(label),
        header_cell("Records"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for entry in counts {
        table.add_row(vec![
            Cell::new(&entry.label),
            Cell::new(&entry.category),
            Cell::new(entry.count),
        ]);
    }
    table
}

/// Weekday rows (Monday first) by hour-of-day columns.
pub fn heatmap_table(grid: &WeekdayHourGrid) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("Day")];
    header.extend((0..24).map(|hour| header_cell(&format!("{hour:02}"))));
    table.set_header(header);
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for weekday in WEEKDAYS {
        let mut row = vec![Cell::new(weekday).add_attribute(Attribute::Bold)];
        row.extend((0..24u8).map(|hour| count_cell(grid.get(HeatmapCell::new(weekday, hour)))));
        table.add_row(row);
    }
    for index in 1..=24 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table
}

pub fn sheets_table(sheets: &[SheetInfo]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Rows"),
        header_cell("Date column"),
        header_cell("Shown"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for sheet in sheets {
        let date_cell = if sheet.has_date {
            Cell::new(&sheet.date_field)
        } else {
            Cell::new(format!("{} (missing)", sheet.date_field)).fg(Color::Red)
        };
        let shown = if sheet.visible {
            Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![
            Cell::new(&sheet.name).fg(Color::Blue).add_attribute(Attribute::Bold),
            Cell::new(sheet.rows),
            date_cell,
            shown,
        ]);
    }
    table
}

/// Option lists for each filter plus the default period.
pub fn options_table(
    options: &[(String, Vec<String>)],
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Filter"),
        header_cell("Options"),
        header_cell("Values"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (label, values) in options {
        let listed = if values.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(values.join(", "))
        };
        table.add_row(vec![Cell::new(label), Cell::new(values.len()), listed]);
    }
    let period = match bounds {
        Some((start, end)) => Cell::new(format!("{start} .. {end}")),
        None => dim_cell("-"),
    };
    table.add_row(vec![Cell::new("Period"), dim_cell("-"), period]);
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn percent_cell(value: f64, color: Color) -> Cell {
    if value > 0.0 {
        Cell::new(format!("{value:.2}%")).fg(color)
    } else {
        dim_cell(format!("{value:.2}%"))
    }
}

fn growth_cell(value: f64) -> Cell {
    let text = format!("{value:+.2}%");
    if value > 0.0 {
        Cell::new(text).fg(Color::Green).add_attribute(Attribute::Bold)
    } else if value < 0.0 {
        Cell::new(text).fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        dim_cell(text)
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
