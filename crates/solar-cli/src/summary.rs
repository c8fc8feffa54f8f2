use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use solar_ingest::SkippedFile;
use solar_model::{GroupStats, HypothesisTests, RankEntry};
use solar_stats::SummaryOutcome;

use solar_cli::types::{CleanResult, IngestResult, SummarizeResult};

pub fn print_ingest(result: &IngestResult) {
    println!("Data: {}", result.data_dir.display());
    println!("Rows: {}  Columns: {}", result.rows, result.columns);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Group"),
        header_cell("Rows"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for file in &result.loaded {
        table.add_row(vec![
            Cell::new(file_name(&file.path)),
            Cell::new(&file.group),
            Cell::new(file.rows),
        ]);
    }
    table.add_row(vec![
        total_cell("TOTAL"),
        dim_cell("-"),
        Cell::new(result.rows).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_group_counts(&result.groups);
    print_skipped_files(&result.skipped);
}

fn print_group_counts(groups: &[(String, usize)]) {
    if groups.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Group"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (group, rows) in groups {
        table.add_row(vec![Cell::new(group), Cell::new(rows)]);
    }
    println!("{table}");
}

pub fn print_clean(result: &CleanResult) {
    println!("Output: {}", result.output_dir.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("File"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("Outliers"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    let mut outliers = 0usize;
    for group in &result.export.exported {
        outliers += group.outlier_rows_removed;
        table.add_row(vec![
            Cell::new(&group.group),
            Cell::new(file_name(&group.path)),
            Cell::new(group.rows),
            Cell::new(group.columns),
            count_cell(group.outlier_rows_removed, Color::Yellow),
        ]);
    }
    table.add_row(vec![
        total_cell("TOTAL"),
        dim_cell(format!("from {} input rows", result.input_rows)),
        Cell::new(result.export.total_rows()).add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(outliers, Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    for skipped in &result.export.skipped {
        eprintln!("warning: group {} not exported: {}", skipped.group, skipped.reason);
    }
    print_skipped_files(&result.skipped_files);
}

pub fn print_summarize(result: &SummarizeResult) {
    println!("Source: {}  Rows: {}", result.source, result.rows);
    println!("Report: {}", result.report_path.display());
    print_statistics(&result.outcome);
    print_tests(&result.outcome);
    for (metric, error) in result.skipped_metrics() {
        eprintln!("warning: metric {metric} skipped: {error}");
    }
    print_skipped_files(&result.skipped_files);
}

fn print_statistics(outcome: &SummaryOutcome) {
    let report = &outcome.report;
    if report.summary.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Metric"),
        header_cell("Group"),
        header_cell("Rank"),
        header_cell("Count"),
        header_cell("Mean"),
        header_cell("Median"),
        header_cell("Std"),
    ]);
    apply_table_style(&mut table);
    for index in 2..7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (metric, groups) in &report.summary {
        let ranking = report.ranking.get(metric).map(Vec::as_slice).unwrap_or(&[]);
        for (group, stats) in groups {
            let rank = rank_of(ranking, group);
            table.add_row(stats_row(metric, group, rank, stats));
        }
    }
    println!("{table}");
}

fn print_tests(outcome: &SummaryOutcome) {
    let tests = &outcome.report.tests;
    if tests.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Metric"),
        header_cell("ANOVA F"),
        header_cell("ANOVA p"),
        header_cell("Kruskal H"),
        header_cell("Kruskal p"),
    ]);
    apply_table_style(&mut table);
    for index in 1..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (metric, result) in tests {
        table.add_row(tests_row(metric, result));
    }
    println!("{table}");
}

fn print_skipped_files(skipped: &[SkippedFile]) {
    if skipped.is_empty() {
        return;
    }
    eprintln!("Skipped files:");
    for file in skipped {
        eprintln!("- {}: {}", file.path.display(), file.reason);
    }
}

fn stats_row(metric: &str, group: &str, rank: Option<usize>, stats: &GroupStats) -> Vec<Cell> {
    vec![
        Cell::new(metric),
        Cell::new(group),
        match rank {
            Some(rank) => Cell::new(rank),
            None => dim_cell("-"),
        },
        Cell::new(stats.count),
        stat_cell(stats.mean),
        stat_cell(stats.median),
        stat_cell(stats.std),
    ]
}

fn tests_row(metric: &str, tests: &HypothesisTests) -> Vec<Cell> {
    vec![
        Cell::new(metric),
        stat_cell(tests.anova_f),
        p_value_cell(tests.anova_p),
        stat_cell(tests.kruskal_h),
        p_value_cell(tests.kruskal_p),
    ]
}

/// 1-based position of a group in a ranking.
fn rank_of(ranking: &[RankEntry], group: &str) -> Option<usize> {
    ranking
        .iter()
        .position(|entry| entry.group() == group)
        .map(|index| index + 1)
}

fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}"),
        None => "-".to_string(),
    }
}

fn format_p_value(value: Option<f64>) -> String {
    match value {
        Some(value) if value < 1e-4 => format!("{value:.2e}"),
        Some(value) => format!("{value:.4}"),
        None => "-".to_string(),
    }
}

fn stat_cell(value: Option<f64>) -> Cell {
    match value {
        Some(_) => Cell::new(format_stat(value)),
        None => dim_cell("-"),
    }
}

fn p_value_cell(value: Option<f64>) -> Cell {
    match value {
        Some(p) if p < 0.05 => Cell::new(format_p_value(value)).fg(Color::Green),
        Some(_) => Cell::new(format_p_value(value)),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color)
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
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

fn total_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_stat() {
        assert_eq!(format_stat(Some(512.345)), "512.35");
        assert_eq!(format_stat(None), "-");
    }

    #[test]
    fn test_format_p_value() {
        assert_eq!(format_p_value(Some(0.0082)), "0.0082");
        insta::assert_snapshot!(format_p_value(Some(0.000012)), @"1.20e-5");
        assert_eq!(format_p_value(None), "-");
    }

    #[test]
    fn test_rank_is_one_based() {
        let ranking = vec![RankEntry::new("benin", 240.0), RankEntry::new("togo", 230.0)];
        assert_eq!(rank_of(&ranking, "benin"), Some(1));
        assert_eq!(rank_of(&ranking, "togo"), Some(2));
        assert_eq!(rank_of(&ranking, "sierraleone"), None);
    }
}
