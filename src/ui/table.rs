use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tabled::{builder::Builder, settings::Style};
use crate::storage::ResultSet;

/// Marker printed in place of an empty table
pub const NO_ROWS: &str = "(no rows)";

/// Border style for result tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStyle {
    /// Header row, dashed separator, `|` between columns
    #[default]
    Psql,
    /// GitHub flavoured markdown
    Markdown,
    Rounded,
}

/// Render a result set as an aligned table, whatever its columns are
pub fn result_table(result: &ResultSet, style: TableStyle) -> String {
    if result.is_empty() {
        return NO_ROWS.to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(result.columns().iter().cloned());
    for row in result.rows() {
        builder.push_record(row.values().iter().map(|value| value.to_string()));
    }

    let mut table = builder.build();
    match style {
        TableStyle::Psql => table.with(Style::psql()),
        TableStyle::Markdown => table.with(Style::markdown()),
        TableStyle::Rounded => table.with(Style::rounded()),
    };
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Value;

    fn sample() -> ResultSet {
        let mut rs = ResultSet::new(vec!["ID".into(), "NAME".into(), "ENDLINE".into()]);
        rs.push(vec![Value::Integer(80378), Value::Text("123.java".into()), Value::Integer(20)]);
        rs.push(vec![Value::Integer(7), Value::Null, Value::Integer(1234)]);
        rs
    }

    #[test]
    fn test_empty_result_renders_marker() {
        let rs = ResultSet::new(vec!["ID".into()]);
        assert_eq!(result_table(&rs, TableStyle::Psql), NO_ROWS);
    }

    #[test]
    fn test_table_is_aligned() {
        let table = result_table(&sample(), TableStyle::Psql);
        let widths: Vec<usize> = table.lines().map(|l| l.chars().count()).collect();
        assert_eq!(widths.len(), 4);
        assert!(widths.iter().all(|w| *w == widths[0]));
        assert!(table.lines().next().unwrap().contains("NAME"));
        assert!(table.contains("123.java"));
        assert!(table.contains("NULL"));
    }

    #[test]
    fn test_markdown_style() {
        let table = result_table(&sample(), TableStyle::Markdown);
        assert!(table.lines().all(|l| l.starts_with('|')));
    }
}
