//! Tabular document model
//!
//! Columns are stored column-major with an inferred [`DType`]. Cells start
//! life as raw strings (CSV fields, spreadsheet cell text) and are typed
//! once, column by column, when the table is built.

use crate::errors::{AppError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of rows shown in samples and prompt context
pub const HEAD_ROWS: usize = 5;

/// Raw cell spellings treated as missing values
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan",
    "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a",
    "nan", "null",
];

/// One row as an ordered column -> value mapping
pub type Record = IndexMap<String, CellValue>;

/// Inferred column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DType {
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "float64")]
    Float64,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "object")]
    Object,
}

impl DType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, DType::Int64 | DType::Float64)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DType::Int64 => "int64",
            DType::Float64 => "float64",
            DType::Bool => "bool",
            DType::Object => "object",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single typed cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("NaN"),
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Bool(true) => f.write_str("True"),
            CellValue::Bool(false) => f.write_str("False"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: DType,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Number of missing cells in this column
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }
}

/// Column-major table with equal-length columns
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a typed table from a header row and raw string rows.
    ///
    /// Short rows are padded with missing values. A row with more fields
    /// than the header is rejected.
    pub fn from_raw(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if headers.is_empty() {
            return Err(AppError::parse("No columns to parse from file"));
        }

        let width = headers.len();
        let row_count = rows.len();
        let mut raw_columns: Vec<Vec<Option<String>>> =
            (0..width).map(|_| Vec::with_capacity(row_count)).collect();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(AppError::parse(format!(
                    "Expected {} fields in line {}, saw {}",
                    width,
                    row_idx + 2,
                    row.len()
                )));
            }
            let mut fields = row.into_iter();
            for column in raw_columns.iter_mut() {
                let cell = fields.next().filter(|f| !is_missing(f));
                column.push(cell);
            }
        }

        let columns = dedupe_headers(headers)
            .into_iter()
            .zip(raw_columns)
            .map(|(name, raw)| {
                let (dtype, values) = infer_column(raw);
                Column { name, dtype, values }
            })
            .collect();

        Ok(Self { columns, row_count })
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count, self.columns.len())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Numeric columns, in source order
    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.dtype.is_numeric())
    }

    /// Row `index` as an ordered record
    pub fn row(&self, index: usize) -> Option<Record> {
        if index >= self.row_count {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|c| (c.name.clone(), c.values[index].clone()))
                .collect(),
        )
    }

    /// All rows as ordered records
    pub fn rows(&self) -> impl Iterator<Item = Record> + '_ {
        (0..self.row_count).filter_map(move |i| self.row(i))
    }

    /// First `n` rows as ordered records
    pub fn head(&self, n: usize) -> Vec<Record> {
        self.rows().take(n).collect()
    }

    /// Fixed-width text rendering of the first `n` rows, one line per row
    /// prefixed with its 0-based index, values right-aligned under their
    /// column names.
    pub fn render_head(&self, n: usize) -> String {
        let shown = n.min(self.row_count);

        if shown == 0 {
            let names: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
            return format!("Empty DataFrame\nColumns: [{}]\nIndex: []", names.join(", "));
        }

        let index_width = (shown - 1).to_string().len();
        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| c.values[..shown].iter().map(|v| v.to_string()).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .zip(&cells)
            .map(|(c, values)| {
                values
                    .iter()
                    .map(|v| v.chars().count())
                    .chain(std::iter::once(c.name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = Vec::with_capacity(shown + 1);

        let mut header = " ".repeat(index_width);
        for (column, width) in self.columns.iter().zip(&widths) {
            header.push_str(&format!("  {:>width$}", column.name, width = width));
        }
        lines.push(header);

        for row in 0..shown {
            let mut line = format!("{:<width$}", row, width = index_width);
            for (values, width) in cells.iter().zip(&widths) {
                line.push_str(&format!("  {:>width$}", values[row], width = width));
            }
            lines.push(line);
        }

        lines.join("\n")
    }
}

fn is_missing(raw: &str) -> bool {
    MISSING_MARKERS.contains(&raw)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Blank headers become `Unnamed: {i}`; repeats get `.1`, `.2`, ... suffixes
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());

    for (i, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", i)
        } else {
            header
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.push(name);
    }

    seen
}

/// Pick the narrowest type every present cell fits, then convert.
///
/// Integer columns with gaps become float64, and boolean columns with gaps
/// become object, since neither can hold a missing marker natively.
fn infer_column(raw: Vec<Option<String>>) -> (DType, Vec<CellValue>) {
    let present: Vec<&str> = raw.iter().flatten().map(|s| s.trim()).collect();
    let has_missing = present.len() < raw.len();

    let dtype = if present.is_empty() {
        DType::Float64
    } else if present.iter().all(|s| s.parse::<i64>().is_ok()) {
        if has_missing { DType::Float64 } else { DType::Int64 }
    } else if present.iter().all(|s| s.parse::<f64>().is_ok()) {
        DType::Float64
    } else if !has_missing && present.iter().all(|s| parse_bool(s).is_some()) {
        DType::Bool
    } else {
        DType::Object
    };

    let values = raw
        .into_iter()
        .map(|cell| match cell {
            None => CellValue::Null,
            Some(s) => match dtype {
                DType::Int64 => s.trim().parse().map(CellValue::Int).unwrap_or(CellValue::Null),
                DType::Float64 => s.trim().parse().map(CellValue::Float).unwrap_or(CellValue::Null),
                DType::Bool => parse_bool(&s).map(CellValue::Bool).unwrap_or(CellValue::Null),
                DType::Object => CellValue::Text(s),
            },
        })
        .collect();

    (dtype, values)
}
