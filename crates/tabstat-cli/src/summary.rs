use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tabstat_model::{AnalysisSummary, PreviewValue, SIGNIFICANCE_LEVEL, TestRecord};

pub fn print_summary(summary: &AnalysisSummary) {
    print_basic_info(summary);
    print_test_table(summary);
    print_correlation_tables(summary);
    print_preview_table(summary);
    if !summary.plots.is_empty() {
        println!();
        println!("Plot data:");
        for reference in &summary.plots {
            println!("- {reference}");
        }
    }
}

fn print_basic_info(summary: &AnalysisSummary) {
    let info = &summary.basic_info;
    println!("Rows: {}", info.rows);
    println!("Columns: {}", info.columns);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Missing"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for name in &info.numeric_cols {
        table.add_row(vec![
            Cell::new(name),
            Cell::new("numeric").fg(Color::Blue),
            missing_cell(info.missing_values.get(name).copied().unwrap_or(0)),
        ]);
    }
    for name in &info.categorical_cols {
        table.add_row(vec![
            Cell::new(name),
            Cell::new("categorical").fg(Color::Magenta),
            missing_cell(info.missing_values.get(name).copied().unwrap_or(0)),
        ]);
    }
    println!("{table}");
}

fn print_test_table(summary: &AnalysisSummary) {
    if summary.statistical_tests.is_empty() {
        println!();
        println!("No applicable statistical tests for this dataset.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Test"),
        header_cell("Variables"),
        header_cell("Statistic"),
        header_cell("P-Value"),
        header_cell("Significant"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for record in summary.statistical_tests.values() {
        table.add_row(vec![
            Cell::new(&record.test),
            Cell::new(&record.variables),
            Cell::new(record.statistic),
            Cell::new(record.p_value),
            significance_cell(record),
        ]);
    }
    println!();
    println!("Statistical tests (alpha = {SIGNIFICANCE_LEVEL}):");
    println!("{table}");
}

fn print_correlation_tables(summary: &AnalysisSummary) {
    for (method, ranking) in &summary.correlations {
        if ranking.top_pairs.is_empty() {
            continue;
        }
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Rank"),
            header_cell("Variable 1"),
            header_cell("Variable 2"),
            header_cell("Correlation"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 0, CellAlignment::Right);
        align_column(&mut table, 3, CellAlignment::Right);
        for (rank, pair) in ranking.top_pairs.iter().enumerate() {
            table.add_row(vec![
                Cell::new(rank + 1),
                Cell::new(&pair.var1),
                Cell::new(&pair.var2),
                correlation_cell(pair.correlation),
            ]);
        }
        println!();
        println!("Top correlations ({method}):");
        println!("{table}");
    }
}

fn print_preview_table(summary: &AnalysisSummary) {
    let Some(first) = summary.data_preview.first() else {
        return;
    };
    let names: Vec<&String> = first.keys().collect();
    let mut table = Table::new();
    table.set_header(names.iter().map(|name| header_cell(name)).collect::<Vec<_>>());
    apply_table_style(&mut table);
    for row in &summary.data_preview {
        table.add_row(
            names
                .iter()
                .map(|name| preview_cell(row.get(*name)))
                .collect::<Vec<_>>(),
        );
    }
    println!();
    println!("Data preview (first {} rows):", summary.data_preview.len());
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn missing_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Yellow)
    } else {
        dim_cell(count)
    }
}

fn significance_cell(record: &TestRecord) -> Cell {
    if record.significant {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn correlation_cell(value: f64) -> Cell {
    if value.abs() >= 0.7 {
        Cell::new(value).add_attribute(Attribute::Bold)
    } else {
        Cell::new(value)
    }
}

fn preview_cell(value: Option<&PreviewValue>) -> Cell {
    match value {
        Some(PreviewValue::Number(number)) => Cell::new(number),
        Some(PreviewValue::Text(text)) => Cell::new(text),
        Some(PreviewValue::Missing) | None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
