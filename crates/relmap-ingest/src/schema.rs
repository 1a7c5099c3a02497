//! Sheet schema descriptors and the generic table-validation routine.
//!
//! Each sheet is described once, as an ordered list of columns with a semantic
//! type and a [`Presence`]. All declared columns must be present (extra
//! columns are ignored); a `Required` column must be non-blank in every row,
//! a `Joined` column only in the rows a graph actually joins against.

use std::collections::HashSet;

use serde_json::Value;

use crate::workbook::{CellValue, Sheet, WorkbookRole};
use crate::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    /// Join key text, trimmed of surrounding whitespace.
    Key,
    /// Text holding a JSON document (e.g. `background_mode`).
    Json,
}

impl ColumnType {
    fn expected(self) -> &'static str {
        match self {
            ColumnType::Integer => "an integer",
            ColumnType::Text | ColumnType::Key => "text",
            ColumnType::Json => "valid JSON",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    /// Blank allowed unless the row is the first one for a key the graph uses.
    Joined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub ty: ColumnType,
    pub presence: Presence,
}

const fn req(name: &'static str, ty: ColumnType) -> ColumnSpec {
    ColumnSpec {
        name,
        ty,
        presence: Presence::Required,
    }
}

const fn opt(name: &'static str, ty: ColumnType) -> ColumnSpec {
    ColumnSpec {
        name,
        ty,
        presence: Presence::Optional,
    }
}

const fn joined(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        ty: ColumnType::Text,
        presence: Presence::Joined,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SheetSchema {
    pub sheet: &'static str,
    pub workbook: WorkbookRole,
    pub columns: &'static [ColumnSpec],
}

use ColumnType::{Integer, Json, Key, Text};

pub const NODE_SHEET: SheetSchema = SheetSchema {
    sheet: "Node",
    workbook: WorkbookRole::Graph,
    columns: &[
        req("Node Id", Integer),
        req("Name", Text),
        req("Type", Text),
        opt("Relationship", Text),
        req("SubType", Key),
        opt("data_grid_title1", Text),
        opt("data_grid_info1", Text),
        opt("data_grid_title2", Text),
        opt("data_grid_info2", Text),
        opt("data_grid_title3", Text),
        opt("data_grid_info3", Text),
        opt("data_grid_title4", Text),
        opt("data_grid_info4", Text),
        opt("data_grid_title5", Text),
        opt("data_grid_info5", Text),
    ],
};

pub const CONNECTIONS_SHEET: SheetSchema = SheetSchema {
    sheet: "Connections",
    workbook: WorkbookRole::Graph,
    columns: &[
        opt("UId", Text),
        req("from", Integer),
        opt("to", Integer),
        req("Level", Key),
    ],
};

pub const NODE_STYLE_SHEET: SheetSchema = SheetSchema {
    sheet: "Nodes",
    workbook: WorkbookRole::Style,
    columns: &[
        req("Component", Key),
        joined("node_image"),
        joined("node_color"),
        joined("node_label_font_alignment"),
        joined("node_label_font_color"),
        joined("node_label_font_background"),
        req("node_label_font_size", Integer),
        joined("node_shape"),
        req("node_size", Integer),
        req("node_shadow", Integer),
    ],
};

pub const EDGE_STYLE_SHEET: SheetSchema = SheetSchema {
    sheet: "Edge",
    workbook: WorkbookRole::Style,
    columns: &[
        req("L2", Key),
        req("edge_width", Integer),
        joined("edge_color"),
        req("edge_length", Integer),
        req("edge_dashes", Integer),
        opt("connection_type", Text),
    ],
};

/// Prefix of the per-category legend caption columns in `Global`.
pub const LEGEND_CAPTION_PREFIX: &str = "legend_";

pub const GLOBAL_SHEET: SheetSchema = SheetSchema {
    sheet: "Global",
    workbook: WorkbookRole::Style,
    columns: &[
        req("client_name", Text),
        req("logo_url", Text),
        req("sidebar_short_logo", Text),
        req("background_mode", Json),
        opt("legend_Target Entity", Text),
        opt("legend_Organisation", Text),
        opt("legend_Individual", Text),
        opt("legend_Observations", Text),
    ],
};

/// Every sheet, in the order checks are reported.
pub static ALL_SHEETS: [SheetSchema; 5] = [
    NODE_SHEET,
    CONNECTIONS_SHEET,
    NODE_STYLE_SHEET,
    EDGE_STYLE_SHEET,
    GLOBAL_SHEET,
];

// ============================================================================
// Typed tables
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TypedCell {
    Null,
    Int(i64),
    Text(String),
    Json(Value),
}

/// A sheet restricted to its declared columns, every cell coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub sheet: &'static str,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<TypedCell>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = TypedRow<'_>> {
        (0..self.rows.len()).map(move |index| TypedRow { table: self, index })
    }
}

/// Accessors over one coerced row.
///
/// After `coerce_sheet` succeeds every declared column exists with its declared
/// type, so the error paths here only fire on a mismatched descriptor.
#[derive(Debug, Clone, Copy)]
pub struct TypedRow<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> TypedRow<'a> {
    fn get(&self, column: &str) -> Option<&'a TypedCell> {
        let col = self.table.columns.iter().position(|c| *c == column)?;
        self.table.rows.get(self.index)?.get(col)
    }

    fn mismatch(&self, column: &str, expected: &'static str) -> SchemaError {
        SchemaError::TypeMismatch {
            sheet: self.table.sheet.to_string(),
            column: column.to_string(),
            row: Sheet::display_row(self.index),
            value: String::new(),
            expected,
        }
    }

    pub fn int(&self, column: &str) -> Result<i64, SchemaError> {
        self.opt_int(column)?
            .ok_or_else(|| self.mismatch(column, Integer.expected()))
    }

    pub fn opt_int(&self, column: &str) -> Result<Option<i64>, SchemaError> {
        match self.get(column) {
            Some(TypedCell::Int(i)) => Ok(Some(*i)),
            Some(TypedCell::Null) => Ok(None),
            _ => Err(self.mismatch(column, Integer.expected())),
        }
    }

    pub fn text(&self, column: &str) -> Result<String, SchemaError> {
        self.opt_text(column)?
            .ok_or_else(|| self.mismatch(column, Text.expected()))
    }

    pub fn opt_text(&self, column: &str) -> Result<Option<String>, SchemaError> {
        match self.get(column) {
            Some(TypedCell::Text(s)) => Ok(Some(s.clone())),
            Some(TypedCell::Null) => Ok(None),
            _ => Err(self.mismatch(column, Text.expected())),
        }
    }

    /// A `Joined` cell; blank on rows nothing joins against.
    pub fn joined_text(&self, column: &str) -> Result<String, SchemaError> {
        Ok(self.opt_text(column)?.unwrap_or_default())
    }

    /// Borrowed text of a key column, `None` when blank.
    pub fn key(&self, column: &str) -> Result<Option<&'a str>, SchemaError> {
        match self.get(column) {
            Some(TypedCell::Text(s)) => Ok(Some(s.as_str())),
            Some(TypedCell::Null) => Ok(None),
            _ => Err(self.mismatch(column, Key.expected())),
        }
    }

    pub fn json(&self, column: &str) -> Result<Value, SchemaError> {
        match self.get(column) {
            Some(TypedCell::Json(v)) => Ok(v.clone()),
            _ => Err(self.mismatch(column, Json.expected())),
        }
    }
}

// ============================================================================
// Checks (one function per phase, so callers can order phases across sheets)
// ============================================================================

pub fn check_columns(sheet: &Sheet, schema: &SheetSchema) -> Result<(), SchemaError> {
    let missing: Vec<String> = schema
        .columns
        .iter()
        .filter(|c| sheet.column_index(c.name).is_none())
        .map(|c| c.name.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumn {
            sheet: schema.sheet.to_string(),
            columns: missing,
        })
    }
}

/// A row is blank when every cell in it (declared or not) is blank.
pub fn check_blank_rows(sheet: &Sheet, schema: &SheetSchema) -> Result<(), SchemaError> {
    match sheet
        .rows
        .iter()
        .position(|row| row.iter().all(CellValue::is_blank))
    {
        Some(index) => Err(SchemaError::BlankRow {
            sheet: schema.sheet.to_string(),
            row: Sheet::display_row(index),
        }),
        None => Ok(()),
    }
}

pub fn coerce_sheet(sheet: &Sheet, schema: &SheetSchema) -> Result<Table, SchemaError> {
    let mut positions = Vec::with_capacity(schema.columns.len());
    for spec in schema.columns {
        let Some(pos) = sheet.column_index(spec.name) else {
            return Err(SchemaError::MissingColumn {
                sheet: schema.sheet.to_string(),
                columns: vec![spec.name.to_string()],
            });
        };
        positions.push((spec, pos));
    }

    let mut rows = Vec::with_capacity(sheet.rows.len());
    for index in 0..sheet.rows.len() {
        let mut typed = Vec::with_capacity(positions.len());
        for (spec, pos) in &positions {
            let cell = sheet.cell(index, *pos);
            let required = spec.presence == Presence::Required;
            let value = coerce_cell(cell, spec.ty, required).ok_or_else(|| {
                SchemaError::TypeMismatch {
                    sheet: schema.sheet.to_string(),
                    column: spec.name.to_string(),
                    row: Sheet::display_row(index),
                    value: cell.render(),
                    expected: spec.ty.expected(),
                }
            })?;
            typed.push(value);
        }
        rows.push(typed);
    }

    Ok(Table {
        sheet: schema.sheet,
        columns: schema.columns.iter().map(|c| c.name).collect(),
        rows,
    })
}

/// Fails on a blank `Joined` cell in the first row of each key in `used`.
///
/// Later rows for the same key are never joined, so they are not checked.
pub fn check_joined_cells(
    table: &Table,
    schema: &SheetSchema,
    key_column: &str,
    used: &HashSet<&str>,
) -> Result<(), SchemaError> {
    let Some(key_pos) = table.columns.iter().position(|c| *c == key_column) else {
        return Ok(());
    };
    let mut seen = HashSet::new();
    for (index, row) in table.rows.iter().enumerate() {
        let Some(TypedCell::Text(key)) = row.get(key_pos) else {
            continue;
        };
        if !used.contains(key.as_str()) || !seen.insert(key.as_str()) {
            continue;
        }
        for (spec, cell) in schema.columns.iter().zip(row) {
            if spec.presence == Presence::Joined && *cell == TypedCell::Null {
                return Err(SchemaError::TypeMismatch {
                    sheet: schema.sheet.to_string(),
                    column: spec.name.to_string(),
                    row: Sheet::display_row(index),
                    value: String::new(),
                    expected: spec.ty.expected(),
                });
            }
        }
    }
    Ok(())
}

/// Columns, blank rows, then coercion, for a single sheet.
pub fn validate_sheet(sheet: &Sheet, schema: &SheetSchema) -> Result<Table, SchemaError> {
    check_columns(sheet, schema)?;
    check_blank_rows(sheet, schema)?;
    coerce_sheet(sheet, schema)
}

fn coerce_cell(cell: &CellValue, ty: ColumnType, required: bool) -> Option<TypedCell> {
    if cell.is_blank() {
        return if required { None } else { Some(TypedCell::Null) };
    }
    match ty {
        Integer => coerce_int(cell).map(TypedCell::Int),
        Text => Some(TypedCell::Text(cell.render())),
        Key => Some(TypedCell::Text(cell.render().trim().to_string())),
        Json => serde_json::from_str(cell.render().trim())
            .ok()
            .map(TypedCell::Json),
    }
}

fn coerce_int(cell: &CellValue) -> Option<i64> {
    fn from_float(f: f64) -> Option<i64> {
        (f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15).then_some(f as i64)
    }

    match cell {
        CellValue::Int(i) => Some(*i),
        CellValue::Float(f) => from_float(*f),
        CellValue::Text(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(from_float))
        }
        CellValue::Bool(_) | CellValue::Empty => None,
    }
}
