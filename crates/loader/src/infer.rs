//! Column-kind inference over raw text grids.
//!
//! Kinds are decided once, here, at load time. Every non-empty value in a
//! column must parse as the candidate kind for the column to take it:
//! numeric beats date beats text. Empty values become missing cells and
//! never vote.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use freightdesk_core::table::{Cell, Column, ColumnKind};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Parse a raw value as a UTC timestamp, trying RFC 3339 first, then the
/// common date and datetime layouts seen in logistics exports.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
        }
    }
    None
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Decide the kind of a column from its raw values.
///
/// An all-empty column is `Other`: there is nothing to infer from, and the
/// digest has nothing to say about it beyond its missing count.
pub fn infer_kind(raw_values: &[String]) -> ColumnKind {
    let present: Vec<&str> = raw_values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();

    if present.is_empty() {
        return ColumnKind::Other;
    }
    if present.iter().all(|v| parse_number(v).is_some()) {
        return ColumnKind::Numeric;
    }
    if present.iter().all(|v| parse_datetime(v).is_some()) {
        return ColumnKind::DateTime;
    }
    ColumnKind::Text
}

/// Build a kind-tagged column from one header and its raw values.
pub fn build_column(name: &str, raw_values: Vec<String>) -> Column {
    let kind = infer_kind(&raw_values);
    let cells = raw_values
        .into_iter()
        .map(|raw| to_cell(&raw, kind))
        .collect();
    Column::new(name, kind, cells)
}

fn to_cell(raw: &str, kind: ColumnKind) -> Cell {
    let raw = raw.trim();
    if raw.is_empty() {
        return Cell::Missing;
    }
    match kind {
        // Inference guarantees these parses succeed for non-empty values
        ColumnKind::Numeric => parse_number(raw).map_or(Cell::Missing, Cell::Number),
        ColumnKind::DateTime => parse_datetime(raw).map_or(Cell::Missing, Cell::Timestamp),
        ColumnKind::Text | ColumnKind::Other => Cell::Text(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raws(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn all_numbers_infer_numeric() {
        assert_eq!(infer_kind(&raws(&["1", "2.5", "-3"])), ColumnKind::Numeric);
    }

    #[test]
    fn empty_cells_do_not_vote() {
        assert_eq!(infer_kind(&raws(&["1", "", "3"])), ColumnKind::Numeric);
    }

    #[test]
    fn mixed_values_fall_back_to_text() {
        assert_eq!(infer_kind(&raws(&["1", "DHL"])), ColumnKind::Text);
    }

    #[test]
    fn iso_dates_infer_datetime() {
        assert_eq!(
            infer_kind(&raws(&["2024-01-01", "2024-02-15 08:30:00"])),
            ColumnKind::DateTime
        );
    }

    #[test]
    fn all_empty_column_is_other() {
        assert_eq!(infer_kind(&raws(&["", "  ", ""])), ColumnKind::Other);
    }

    #[test]
    fn us_style_dates_parse() {
        let dt = parse_datetime("3/15/2024").unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-03-15");
    }

    #[test]
    fn rfc3339_parses_with_offset() {
        let dt = parse_datetime("2024-01-01T12:00:00+02:00").unwrap();
        assert_eq!(dt.format("%H").to_string(), "10");
    }

    #[test]
    fn built_column_maps_empties_to_missing() {
        let col = build_column("qty", raws(&["1", "", "3"]));
        assert_eq!(col.kind, ColumnKind::Numeric);
        assert_eq!(col.cells[1], Cell::Missing);
        assert_eq!(col.missing_count(), 1);
    }

    #[test]
    fn text_column_keeps_raw_values() {
        let col = build_column("carrier", raws(&["DHL", "FedEx"]));
        assert_eq!(col.kind, ColumnKind::Text);
        assert_eq!(col.cells[0], Cell::Text("DHL".into()));
    }
}
