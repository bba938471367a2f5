//! Table digests — the structured summary and its markdown rendering.
//!
//! Section order is fixed: header, missing total, numeric, text, date.
//! Sections with no qualifying columns are omitted entirely.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use freightdesk_core::error::SummaryError;
use freightdesk_core::table::{Cell, Column, ColumnKind, Table};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::stats;

/// Knobs for a summarization call.
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    /// How many raw values to sample per text column
    pub sample_size: usize,

    /// Seed for the text-value sample. `None` means each call draws an
    /// independent sample, matching the reference behavior.
    pub seed: Option<u64>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            sample_size: 3,
            seed: None,
        }
    }
}

/// Per-numeric-column statistics over non-missing values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericDigest {
    pub name: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// max − min
    pub range: f64,
    /// Sample standard deviation
    pub std: f64,
}

/// Per-text-column cardinality and a bounded value sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextDigest {
    pub name: String,
    pub unique_count: usize,
    pub sample: Vec<String>,
}

/// Per-date-column value range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateDigest {
    pub name: String,
    pub min: DateTime<Utc>,
    pub max: DateTime<Utc>,
}

/// The full digest of one table, computed fresh per call and owned by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDigest {
    pub row_count: usize,
    pub column_count: usize,
    pub column_names: Vec<String>,
    pub missing_total: usize,
    pub numeric: Vec<NumericDigest>,
    pub text: Vec<TextDigest>,
    pub date: Vec<DateDigest>,
}

impl TableDigest {
    /// Serialize the digest to its single ordered markdown block.
    pub fn render(&self) -> String {
        let mut out = vec![
            format!(
                "## Data Summary ({} rows × {} columns)",
                self.row_count, self.column_count
            ),
            format!(
                "**Columns:** {}",
                self.column_names
                    .iter()
                    .map(|n| format!("`{n}`"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            format!("**Missing values:** {} total", self.missing_total),
        ];

        if !self.numeric.is_empty() {
            out.push("\n### Numeric Columns".into());
            out.push("| column | mean | min | max | range | std |".into());
            out.push("| --- | --- | --- | --- | --- | --- |".into());
            for col in &self.numeric {
                out.push(format!(
                    "| `{}` | {} | {} | {} | {} | {} |",
                    col.name,
                    fmt_num(col.mean),
                    fmt_num(col.min),
                    fmt_num(col.max),
                    fmt_num(col.range),
                    fmt_num(col.std),
                ));
            }
        }

        if !self.text.is_empty() {
            out.push("\n### Text Columns".into());
            for col in &self.text {
                out.push(format!(
                    "- `{}`: {} unique values\n  Sample: {}",
                    col.name,
                    col.unique_count,
                    col.sample.join(", ")
                ));
            }
        }

        if !self.date.is_empty() {
            out.push("\n### Date Columns".into());
            for col in &self.date {
                out.push(format!(
                    "- `{}`: {} to {}",
                    col.name,
                    col.min.format("%Y-%m-%d %H:%M:%S"),
                    col.max.format("%Y-%m-%d %H:%M:%S"),
                ));
            }
        }

        out.join("\n")
    }
}

impl std::fmt::Display for TableDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v:.2}")
    }
}

/// Summarize a table with default options (sample size 3, unseeded).
///
/// The caller must have validated the table first; see
/// [`Table::validate`](freightdesk_core::Table::validate).
pub fn summarize(table: &Table) -> Result<TableDigest, SummaryError> {
    summarize_with(table, &SummaryOptions::default())
}

/// Summarize a table with explicit options.
pub fn summarize_with(
    table: &Table,
    options: &SummaryOptions,
) -> Result<TableDigest, SummaryError> {
    let row_count = table.row_count();
    let mut numeric = Vec::new();
    let mut text = Vec::new();
    let mut date = Vec::new();

    for column in &table.columns {
        match column.kind {
            ColumnKind::Numeric => {
                if let Some(d) = numeric_digest(column)? {
                    numeric.push(d);
                }
            }
            ColumnKind::Text => {
                text.push(text_digest(column, row_count, options));
            }
            ColumnKind::DateTime => {
                if let Some(d) = date_digest(column)? {
                    date.push(d);
                }
            }
            // Counted in the header, absent from every section
            ColumnKind::Other => {}
        }
    }

    debug!(
        rows = row_count,
        columns = table.column_count(),
        numeric = numeric.len(),
        text = text.len(),
        date = date.len(),
        "Computed table digest"
    );

    Ok(TableDigest {
        row_count,
        column_count: table.column_count(),
        column_names: table.column_names().iter().map(|s| s.to_string()).collect(),
        missing_total: table.missing_total(),
        numeric,
        text,
        date,
    })
}

/// Statistics over a numeric column's non-missing cells.
///
/// Returns `None` for an all-missing column — there is nothing to report.
fn numeric_digest(column: &Column) -> Result<Option<NumericDigest>, SummaryError> {
    let mut values = Vec::new();
    for cell in column.present() {
        match cell {
            Cell::Number(n) => values.push(*n),
            other => {
                return Err(SummaryError::Computation(format!(
                    "column `{}` is tagged numeric but holds {other:?}",
                    column.name
                )))
            }
        }
    }

    if values.is_empty() {
        return Ok(None);
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(Some(NumericDigest {
        name: column.name.clone(),
        mean: stats::mean(&values),
        min,
        max,
        range: max - min,
        std: stats::sample_std(&values),
    }))
}

fn text_digest(column: &Column, row_count: usize, options: &SummaryOptions) -> TextDigest {
    let raw: Vec<String> = column.present().map(Cell::display).collect();
    let unique_count = raw.iter().collect::<HashSet<_>>().len();
    let amount = options.sample_size.min(row_count);
    let sample = stats::sample_values(&raw, amount, options.seed);

    TextDigest {
        name: column.name.clone(),
        unique_count,
        sample,
    }
}

fn date_digest(column: &Column) -> Result<Option<DateDigest>, SummaryError> {
    let mut min: Option<DateTime<Utc>> = None;
    let mut max: Option<DateTime<Utc>> = None;

    for cell in column.present() {
        match cell {
            Cell::Timestamp(t) => {
                min = Some(min.map_or(*t, |m| m.min(*t)));
                max = Some(max.map_or(*t, |m| m.max(*t)));
            }
            other => {
                return Err(SummaryError::Computation(format!(
                    "column `{}` is tagged date/time but holds {other:?}",
                    column.name
                )))
            }
        }
    }

    Ok(match (min, max) {
        (Some(min), Some(max)) => Some(DateDigest {
            name: column.name.clone(),
            min,
            max,
        }),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn numeric_column(name: &str, values: &[f64]) -> Column {
        Column::new(
            name,
            ColumnKind::Numeric,
            values.iter().map(|v| Cell::Number(*v)).collect(),
        )
    }

    fn text_column(name: &str, values: &[&str]) -> Column {
        Column::new(
            name,
            ColumnKind::Text,
            values.iter().map(|v| Cell::Text((*v).into())).collect(),
        )
    }

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn shipment_table() -> Table {
        Table::new(vec![
            numeric_column("qty", &[1.0, 2.0, 3.0, 4.0]),
            Column::new(
                "carrier",
                ColumnKind::Text,
                vec![
                    Cell::Text("DHL".into()),
                    Cell::Text("FedEx".into()),
                    Cell::Text("DHL".into()),
                    Cell::Missing,
                ],
            ),
            Column::new(
                "shipped",
                ColumnKind::DateTime,
                vec![
                    Cell::Timestamp(ts(2024, 3, 5)),
                    Cell::Timestamp(ts(2024, 1, 1)),
                    Cell::Timestamp(ts(2024, 2, 10)),
                    Cell::Missing,
                ],
            ),
        ])
    }

    #[test]
    fn numeric_stats_match_expected() {
        let digest = summarize(&shipment_table()).unwrap();
        let qty = &digest.numeric[0];
        assert!((qty.mean - 2.5).abs() < f64::EPSILON);
        assert_eq!(qty.min, 1.0);
        assert_eq!(qty.max, 4.0);
        assert_eq!(qty.range, 3.0);
        assert!((qty.std - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn header_and_missing_lines_always_present() {
        let rendered = summarize(&shipment_table()).unwrap().render();
        assert!(rendered.contains("## Data Summary (4 rows × 3 columns)"));
        assert!(rendered.contains("**Columns:** `qty`, `carrier`, `shipped`"));
        assert!(rendered.contains("**Missing values:** 2 total"));
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let rendered = summarize(&shipment_table()).unwrap().render();
        let numeric = rendered.find("### Numeric Columns").unwrap();
        let text = rendered.find("### Text Columns").unwrap();
        let date = rendered.find("### Date Columns").unwrap();
        assert!(numeric < text);
        assert!(text < date);
    }

    #[test]
    fn empty_sections_are_omitted() {
        let table = Table::new(vec![text_column("carrier", &["DHL", "UPS"])]);
        let rendered = summarize(&table).unwrap().render();
        assert!(!rendered.contains("### Numeric Columns"));
        assert!(!rendered.contains("### Date Columns"));
        assert!(rendered.contains("### Text Columns"));
    }

    #[test]
    fn text_unique_count_and_sample_bound() {
        // 2 distinct values across 5 rows, sample_size 3
        let table = Table::new(vec![text_column(
            "lane",
            &["east", "west", "east", "east", "west"],
        )]);
        let digest = summarize(&table).unwrap();
        let lane = &digest.text[0];
        assert_eq!(lane.unique_count, 2);
        assert_eq!(lane.sample.len(), 3);
        for v in &lane.sample {
            assert!(v == "east" || v == "west");
        }
    }

    #[test]
    fn sample_shrinks_with_row_count() {
        let table = Table::new(vec![text_column("lane", &["east", "west"])]);
        let digest = summarize(&table).unwrap();
        assert_eq!(digest.text[0].sample.len(), 2);
    }

    #[test]
    fn seeded_summaries_are_identical() {
        let table = shipment_table();
        let options = SummaryOptions {
            sample_size: 3,
            seed: Some(11),
        };
        let a = summarize_with(&table, &options).unwrap().render();
        let b = summarize_with(&table, &options).unwrap().render();
        assert_eq!(a, b);
    }

    #[test]
    fn date_range_reports_min_and_max() {
        let digest = summarize(&shipment_table()).unwrap();
        let shipped = &digest.date[0];
        assert_eq!(shipped.min, ts(2024, 1, 1));
        assert_eq!(shipped.max, ts(2024, 3, 5));
    }

    #[test]
    fn other_kind_columns_counted_but_not_sectioned() {
        let table = Table::new(vec![
            numeric_column("qty", &[1.0]),
            Column::new("blob", ColumnKind::Other, vec![Cell::Text("?".into())]),
        ]);
        let digest = summarize(&table).unwrap();
        assert_eq!(digest.column_count, 2);
        assert_eq!(digest.numeric.len(), 1);
        assert!(digest.text.is_empty());
        assert!(digest.column_names.contains(&"blob".to_string()));
    }

    #[test]
    fn mistagged_numeric_column_is_classified_error() {
        let table = Table::new(vec![Column::new(
            "qty",
            ColumnKind::Numeric,
            vec![Cell::Number(1.0), Cell::Text("n/a".into())],
        )]);
        let err = summarize(&table).unwrap_err();
        assert!(err.to_string().contains("qty"));
    }

    #[test]
    fn all_missing_numeric_column_drops_from_section() {
        let table = Table::new(vec![
            numeric_column("qty", &[1.0, 2.0]),
            Column::new("weight", ColumnKind::Numeric, vec![Cell::Missing, Cell::Missing]),
        ]);
        let digest = summarize(&table).unwrap();
        assert_eq!(digest.numeric.len(), 1);
        assert_eq!(digest.missing_total, 2);
        assert_eq!(digest.column_count, 2);
    }
}
