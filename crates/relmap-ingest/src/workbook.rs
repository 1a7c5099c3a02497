//! In-memory workbook model and loaders.
//!
//! Spreadsheets (`.xlsx`, `.xlsm`, `.xls`, `.xlsb`, `.ods`) are read with
//! calamine; a `.json` snapshot of the same shape is accepted as well so that
//! captured uploads and test fixtures can be replayed without an office file.

use calamine::{open_workbook_auto, Data, Range, Reader};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::SchemaError;

/// Which of the two pipeline inputs a workbook plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkbookRole {
    /// Sheets `Node` and `Connections`.
    Graph,
    /// Sheets `Nodes`, `Edge` and `Global`.
    Style,
}

impl fmt::Display for WorkbookRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkbookRole::Graph => f.write_str("graph workbook"),
            WorkbookRole::Style => f.write_str("style workbook"),
        }
    }
}

/// A raw spreadsheet cell, before any schema coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    /// Empty cells and whitespace-only text both count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text rendering used for text columns and error messages.
    ///
    /// Integral floats drop their fractional part (`3.0` -> `"3"`), since
    /// spreadsheet engines store most numbers as floats.
    pub fn render(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", *f as i64)
            }
            CellValue::Float(f) => f.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            name: name.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: Vec<CellValue>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Cell at `(row, col)`; short rows read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Spreadsheet row number of data row `index` (the header is row 1).
    pub fn display_row(index: usize) -> usize {
        index + 2
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    /// File name or other locator, used only in messages.
    #[serde(default)]
    pub source: String,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            sheets: Vec::new(),
        }
    }

    pub fn with_sheet(mut self, sheet: Sheet) -> Self {
        self.sheets.push(sheet);
        self
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load a workbook from disk, choosing the reader from the file extension.
pub fn load_workbook(path: &Path, role: WorkbookRole) -> Result<Workbook, SchemaError> {
    let file = path.display().to_string();
    let fail = |message: String| SchemaError::Workbook {
        workbook: role,
        file: file.clone(),
        message,
    };

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let mut workbook = if is_json {
        let text = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
        serde_json::from_str::<Workbook>(&text).map_err(|e| fail(e.to_string()))?
    } else {
        let mut book = open_workbook_auto(path).map_err(|e| fail(e.to_string()))?;
        let names = book.sheet_names().to_vec();
        let mut workbook = Workbook::default();
        for name in names {
            let range = book
                .worksheet_range(&name)
                .map_err(|e| fail(format!("sheet `{name}`: {e}")))?;
            workbook.sheets.push(sheet_from_range(&name, &range));
        }
        workbook
    };

    if workbook.source.is_empty() {
        workbook.source = file;
    }
    tracing::debug!(
        workbook = %role,
        source = %workbook.source,
        sheets = ?workbook.sheet_names(),
        "loaded workbook"
    );
    Ok(workbook)
}

/// Convert a calamine range: first row is the header, the rest are data.
///
/// Trailing rows with no content are dropped (formatting alone can extend a
/// sheet's used range); blank rows *between* data rows are kept so the schema
/// pass can reject them.
pub fn sheet_from_range(name: &str, range: &Range<Data>) -> Sheet {
    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|r| r.iter().map(|c| cell_from_data(c).render().trim().to_string()).collect())
        .unwrap_or_default();

    let mut data: Vec<Vec<CellValue>> = rows.map(|r| r.iter().map(cell_from_data).collect()).collect();
    while data
        .last()
        .is_some_and(|r| r.iter().all(CellValue::is_blank))
    {
        data.pop();
    }

    Sheet {
        name: name.to_string(),
        headers,
        rows: data,
    }
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}
