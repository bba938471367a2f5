//! Tabular file loading for FreightDesk.
//!
//! Reads delimited text (`.csv`) and spreadsheets (`.xlsx`, `.xls`) into the
//! in-memory [`Table`] model, inferring each column's kind once at load time.
//! Oversized and unsupported files are rejected before any parsing happens.

pub mod infer;

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use freightdesk_core::error::LoadError;
use freightdesk_core::table::Table;
use tracing::debug;

pub use infer::{build_column, infer_kind, parse_datetime};

/// Load a table from a supported file, enforcing the size cap.
///
/// Dispatches on the file extension: `csv` for delimited text, `xlsx`/`xls`
/// for spreadsheets. Anything else is rejected as unsupported.
pub fn load(path: &Path, max_file_size_mb: u64) -> Result<Table, LoadError> {
    check_size(path, max_file_size_mb)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let table = match extension.as_str() {
        "csv" => load_csv(path)?,
        "xlsx" | "xls" => load_excel(path)?,
        other => return Err(LoadError::UnsupportedType(other.to_string())),
    };

    debug!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "Loaded table"
    );
    Ok(table)
}

fn check_size(path: &Path, max_mb: u64) -> Result<(), LoadError> {
    let metadata = std::fs::metadata(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let size = metadata.len();
    if size > max_mb * 1024 * 1024 {
        return Err(LoadError::TooLarge {
            size_mb: size as f64 / (1024.0 * 1024.0),
            max_mb,
        });
    }
    Ok(())
}

/// Read a CSV file with a header row into a kind-tagged table.
pub fn load_csv(path: &Path) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?
        .iter()
        .map(str::to_string)
        .collect();

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(|e| LoadError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        // Short rows pad with empties; long rows drop the overflow
        for (idx, raw) in raw_columns.iter_mut().enumerate() {
            raw.push(record.get(idx).unwrap_or_default().to_string());
        }
    }

    Ok(assemble(&headers, raw_columns))
}

/// Read the first worksheet of a spreadsheet into a kind-tagged table.
pub fn load_excel(path: &Path) -> Result<Table, LoadError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::Parse {
            path: path.display().to_string(),
            reason: "workbook has no sheets".into(),
        })?
        .map_err(|e| LoadError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(data_to_raw).collect(),
        None => Vec::new(),
    };

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (idx, raw) in raw_columns.iter_mut().enumerate() {
            raw.push(row.get(idx).map(data_to_raw).unwrap_or_default());
        }
    }

    Ok(assemble(&headers, raw_columns))
}

fn assemble(headers: &[String], raw_columns: Vec<Vec<String>>) -> Table {
    let columns = headers
        .iter()
        .zip(raw_columns)
        .map(|(name, raw)| build_column(name, raw))
        .collect();
    Table::new(columns)
}

/// Render a spreadsheet cell as the raw text the inference pass consumes.
fn data_to_raw(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|naive| naive.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freightdesk_core::table::ColumnKind;
    use std::io::Write;
    use tempfile::Builder;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut tmp = Builder::new().suffix(".csv").tempfile().unwrap();
        tmp.write_all(content.as_bytes()).unwrap();
        tmp.flush().unwrap();
        tmp
    }

    #[test]
    fn csv_loads_with_inferred_kinds() {
        let tmp = write_csv(
            "order_id,carrier,qty,shipped\n\
             1001,DHL,4,2024-01-05\n\
             1002,FedEx,2,2024-01-09\n\
             1003,DHL,7,2024-02-01\n",
        );
        let table = load(tmp.path(), 10).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 4);
        assert_eq!(table.columns[0].kind, ColumnKind::Numeric);
        assert_eq!(table.columns[1].kind, ColumnKind::Text);
        assert_eq!(table.columns[2].kind, ColumnKind::Numeric);
        assert_eq!(table.columns[3].kind, ColumnKind::DateTime);
    }

    #[test]
    fn short_rows_pad_with_missing() {
        let tmp = write_csv("a,b\n1,x\n2\n");
        let table = load(tmp.path(), 10).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns[1].missing_count(), 1);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let mut tmp = Builder::new().suffix(".parquet").tempfile().unwrap();
        tmp.write_all(b"whatever").unwrap();
        let err = load(tmp.path(), 10).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedType(_)));
    }

    #[test]
    fn oversized_file_is_rejected_before_parsing() {
        let tmp = write_csv(&format!("a\n{}\n", "x".repeat(2048)));
        let err = load(tmp.path(), 0).unwrap_err();
        assert!(matches!(err, LoadError::TooLarge { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load(Path::new("/nonexistent/orders.csv"), 10).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn empty_data_csv_loads_as_zero_rows() {
        let tmp = write_csv("a,b\n");
        let table = load(tmp.path(), 10).unwrap();
        assert_eq!(table.row_count(), 0);
        assert!(table.validate().is_err());
    }
}
