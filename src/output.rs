use serde_json::{Map, Value};

use crate::error::Result;
use crate::report::{CellValue, ReportRows, Schema};
use crate::store::Dataset;

/// Render report rows as an aligned text table.
///
/// Columns follow the schema order; currency cells get the configured
/// symbol; ventures come out sorted by id (the row map ordering).
pub fn render_table(
    data: &Dataset,
    schema: &Schema,
    rows: &ReportRows,
    currency_symbol: &str,
) -> String {
    let mut header = vec!["venture".to_string()];
    header.extend(schema.iter().map(|(_, column)| column.name.clone()));

    let mut body = Vec::new();
    for (venture_id, row) in rows {
        let name = data
            .venture(*venture_id)
            .map(|v| v.symbol.clone())
            .unwrap_or_else(|| venture_id.to_string());

        let mut cells = vec![name];
        for (key, column) in schema {
            let symbol = if column.currency { currency_symbol } else { "" };
            cells.push(match row.get(key) {
                Some(cell) => format_cell(cell, symbol),
                None => "-".to_string(),
            });
        }
        body.push(cells);
    }

    align(&header, &body)
}

/// Render report rows as a JSON object keyed by venture symbol
pub fn render_json(data: &Dataset, rows: &ReportRows) -> Result<String> {
    let mut out = Map::new();
    for (venture_id, row) in rows {
        let name = data
            .venture(*venture_id)
            .map(|v| v.symbol.clone())
            .unwrap_or_else(|| venture_id.to_string());
        out.insert(name, serde_json::to_value(row)?);
    }
    Ok(serde_json::to_string_pretty(&Value::Object(out))?)
}

fn format_cell(cell: &CellValue, currency_symbol: &str) -> String {
    match cell {
        CellValue::Count(count) => format!("{:.2}", count),
        CellValue::Cost(cost) => format!("{}{}", currency_symbol, cost.round_dp(2)),
        CellValue::Note(note) => note.to_string(),
    }
}

fn align(header: &[String], body: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in body {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let render_row = |cells: &[String]| {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![render_row(header)];
    lines.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
    for row in body {
        lines.push(render_row(row));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{UsageType, Venture};
    use crate::report::{ColumnSchema, ReportPlugin, UsagePlugin};
    use chrono::NaiveDate;
    use rust_decimal::dec;
    use std::collections::BTreeMap;

    fn schema() -> Schema {
        vec![
            ("ut_10_count".to_string(), ColumnSchema::count("Power count".to_string())),
            ("ut_10_cost".to_string(), ColumnSchema::cost("Power cost".to_string(), true)),
        ]
    }

    fn dataset() -> Dataset {
        Dataset {
            ventures: vec![Venture {
                id: 1,
                name: "Alpha".to_string(),
                symbol: "alpha".to_string(),
            }],
            warehouses: vec![],
            usage_types: vec![UsageType {
                id: 10,
                name: "Power".to_string(),
                symbol: "power".to_string(),
                by_warehouse: false,
                by_cost: false,
                show_in_report: true,
            }],
            usage_prices: vec![],
            daily_usages: vec![],
        }
    }

    fn rows() -> ReportRows {
        let mut row = BTreeMap::new();
        row.insert("ut_10_count".to_string(), CellValue::Count(15.0));
        row.insert("ut_10_cost".to_string(), CellValue::Cost(dec!(30)));
        let mut rows = ReportRows::new();
        rows.insert(1, row);
        rows
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&dataset(), &schema(), &rows(), "$");
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("venture"));
        assert!(lines[0].contains("Power count"));
        assert!(lines[0].contains("Power cost"));
        assert!(lines[2].starts_with("alpha"));
        assert!(lines[2].contains("15.00"));
        assert!(lines[2].contains("$30"));
    }

    #[test]
    fn test_render_table_note_and_missing_cells() {
        let mut rows = rows();
        rows.get_mut(&1)
            .unwrap()
            .insert("ut_10_cost".to_string(), CellValue::Note("No price"));
        rows.entry(2).or_default(); // venture with no cells at all

        let table = render_table(&dataset(), &schema(), &rows, "$");
        assert!(table.contains("No price"));
        // Unknown venture id falls back to the id, empty cells dash out
        let last = table.lines().last().unwrap();
        assert!(last.starts_with('2'));
        assert!(last.contains('-'));
    }

    #[test]
    fn test_render_json_keys_by_symbol() {
        let out = render_json(&dataset(), &rows()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["alpha"]["ut_10_count"], 15.0);
        assert_eq!(value["alpha"]["ut_10_cost"], "30");
    }

    #[test]
    fn test_end_to_end_plugin_to_table() {
        // The rendered table for a real plugin run carries the sentinel text
        let mut data = dataset();
        data.daily_usages.push(crate::model::DailyUsage {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            venture: 1,
            usage_type: 10,
            warehouse: None,
            value: 3.0,
        });
        let plugin = UsagePlugin::new(&data);
        let ut = data.usage_type(10).unwrap();
        let rows = plugin.usages(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            None,
            ut,
            false,
            true,
        );
        let table = render_table(&data, &plugin.schema(ut), &rows, "$");
        assert!(table.contains("No price"));
        assert!(table.contains("3.00"));
    }
}
