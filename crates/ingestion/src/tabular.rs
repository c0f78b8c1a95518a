//! CSV and XLSX readers
//!
//! Both formats are reduced to a header row plus raw string rows and then
//! typed by `Table::from_raw`, so a spreadsheet and its CSV export infer
//! the same column types.

use crate::errors::IngestionError;
use analystforge_common::document::Table;
use calamine::{open_workbook_auto, Data, ExcelDateTime, Range, Reader};
use chrono::NaiveTime;
use std::path::Path;
use tracing::debug;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read a comma-separated file with a header row
pub fn read_csv(path: &Path) -> Result<Table, IngestionError> {
    let bytes = std::fs::read(path)?;
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    let csv_error = |e: csv::Error| IngestionError::CsvParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(columns = headers.len(), rows = rows.len(), "CSV parsed");

    Table::from_raw(headers, rows).map_err(|e| IngestionError::invalid_table(path, e))
}

/// Read the first worksheet of a workbook; its first row is the header
pub fn read_xlsx(path: &Path) -> Result<Table, IngestionError> {
    let spreadsheet_error = |message: String| IngestionError::SpreadsheetError {
        path: path.display().to_string(),
        message,
    };

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| spreadsheet_error(format!("Failed to open spreadsheet: {}", e)))?;

    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| spreadsheet_error("Workbook has no worksheets".to_string()))?;

    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|e| spreadsheet_error(format!("Failed to read sheet {}: {}", first_sheet, e)))?;

    debug!(sheet = %first_sheet, size = ?range.get_size(), "Worksheet read");

    table_from_range(&range).map_err(|e| IngestionError::invalid_table(path, e))
}

fn table_from_range(range: &Range<Data>) -> analystforge_common::Result<Table> {
    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|row| row.iter().map(cell_text).collect())
        .unwrap_or_default();
    let body = rows.map(|row| row.iter().map(cell_text).collect()).collect();

    Table::from_raw(headers, body)
}

/// Cell text as it would appear in a CSV export.
///
/// Date and duration cells are rendered as text rather than their serial
/// number, so they never type as numeric columns.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::DateTime(value) => excel_datetime_text(value),
        Data::DateTimeIso(text) | Data::DurationIso(text) => text.clone(),
        other => other.to_string(),
    }
}

fn excel_datetime_text(value: &ExcelDateTime) -> String {
    if value.is_duration() {
        return match value.as_duration() {
            Some(duration) => {
                let seconds = duration.num_seconds();
                format!("{:02}:{:02}:{:02}", seconds / 3600, seconds % 3600 / 60, seconds % 60)
            }
            None => String::new(),
        };
    }

    match value.as_datetime() {
        Some(datetime) if datetime.time() == NaiveTime::MIN => {
            datetime.format("%Y-%m-%d").to_string()
        }
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => {
            debug!("Date cell out of range, treating as missing");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::write_xlsx;
    use analystforge_common::document::{CellValue, DType};
    use std::io::Write;

    fn write_temp(suffix: &str, content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_with_missing_values() {
        let file = write_temp(
            ".csv",
            b"date,amount,qty\n2024-01-01,10.5,1\n2024-01-02,,2\n2024-01-03,NA,3\n",
        );
        let table = read_csv(file.path()).unwrap();

        assert_eq!(table.shape(), (3, 3));
        let amount = table.column("amount").unwrap();
        assert_eq!(amount.dtype, DType::Float64);
        assert_eq!(amount.missing_count(), 2);
        assert_eq!(table.column("qty").unwrap().dtype, DType::Int64);
    }

    #[test]
    fn test_read_csv_strips_bom_and_keeps_quoted_commas() {
        let file = write_temp(".csv", b"\xEF\xBB\xBFname,note\nann,\"a, b\"\n");
        let table = read_csv(file.path()).unwrap();

        assert_eq!(table.columns()[0].name, "name");
        assert_eq!(
            table.column("note").unwrap().values[0],
            CellValue::Text("a, b".to_string())
        );
    }

    #[test]
    fn test_read_empty_csv_fails() {
        let file = write_temp(".csv", b"");
        let err = read_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("No columns to parse from file"));
    }

    #[test]
    fn test_read_csv_rejects_long_rows() {
        let file = write_temp(".csv", b"a,b\n1,2,3\n");
        assert!(matches!(
            read_csv(file.path()).unwrap_err(),
            IngestionError::InvalidTable { .. }
        ));
    }

    #[test]
    fn test_read_csv_invalid_utf8() {
        let file = write_temp(".csv", b"a,b\n\xff\xfe,1\n");
        assert!(matches!(
            read_csv(file.path()).unwrap_err(),
            IngestionError::CsvParseError { .. }
        ));
    }

    #[test]
    fn test_table_from_range() {
        let mut range = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("city".to_string()));
        range.set_value((0, 1), Data::String("population".to_string()));
        range.set_value((0, 2), Data::String("capital".to_string()));
        range.set_value((1, 0), Data::String("Oslo".to_string()));
        range.set_value((1, 1), Data::Float(709000.0));
        range.set_value((1, 2), Data::Bool(true));
        range.set_value((2, 0), Data::String("Bergen".to_string()));
        range.set_value((2, 1), Data::Int(285000));
        range.set_value((2, 2), Data::Bool(false));

        let table = table_from_range(&range).unwrap();
        let dtypes: Vec<DType> = table.columns().iter().map(|c| c.dtype).collect();
        assert_eq!(dtypes, vec![DType::Object, DType::Int64, DType::Bool]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_date_cells_are_not_numeric() {
        use calamine::ExcelDateTimeType;

        let mut range = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("date".to_string()));
        range.set_value((0, 1), Data::String("amount".to_string()));
        range.set_value((0, 2), Data::String("qty".to_string()));
        for (row, serial) in [(1u32, 45292.0), (2, 45293.5)] {
            range.set_value(
                (row, 0),
                Data::DateTime(ExcelDateTime::new(serial, ExcelDateTimeType::DateTime, false)),
            );
            range.set_value((row, 1), Data::Float(10.5));
            range.set_value((row, 2), Data::Int(row as i64));
        }
        range.set_value((2, 1), Data::Empty);

        let table = table_from_range(&range).unwrap();
        let date = table.column("date").unwrap();
        assert_eq!(date.dtype, DType::Object);
        assert_eq!(
            date.values,
            vec![
                CellValue::Text("2024-01-01".to_string()),
                CellValue::Text("2024-01-02 12:00:00".to_string()),
            ]
        );

        let numeric: Vec<&str> = table.numeric_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(numeric, vec!["amount", "qty"]);
    }

    #[test]
    fn test_iso_date_cells_keep_their_text() {
        assert_eq!(cell_text(&Data::DateTimeIso("2024-03-01T08:30:00".to_string())), "2024-03-01T08:30:00");
        assert_eq!(cell_text(&Data::DurationIso("PT1H".to_string())), "PT1H");
    }

    #[test]
    fn test_read_xlsx_workbook() {
        let file = write_xlsx(&[
            &["city", "population", "capital"],
            &["Oslo", "709000", "TRUE"],
            &["Bergen", "285000", "FALSE"],
        ]);
        let table = read_xlsx(file.path()).unwrap();

        assert_eq!(table.shape(), (2, 3));
        assert_eq!(table.column("city").unwrap().dtype, DType::Object);
        assert_eq!(table.column("population").unwrap().dtype, DType::Int64);
        assert_eq!(
            table.column("population").unwrap().values[1],
            CellValue::Int(285000)
        );
    }

    #[test]
    fn test_read_xlsx_garbage_fails() {
        let file = write_temp(".xlsx", b"definitely not a zip archive");
        assert!(matches!(
            read_xlsx(file.path()).unwrap_err(),
            IngestionError::SpreadsheetError { .. }
        ));
    }
}
