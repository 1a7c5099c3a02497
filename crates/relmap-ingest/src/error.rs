use crate::workbook::WorkbookRole;

/// Structural failures found before any cross-sheet rule runs.
///
/// Every variant is fatal to the run; no partially coerced tables are returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("{workbook} `{file}` could not be read: {message}")]
    Workbook {
        workbook: WorkbookRole,
        file: String,
        message: String,
    },

    #[error("missing required sheet `{sheet}` in the {workbook}")]
    MissingSheet {
        workbook: WorkbookRole,
        sheet: String,
    },

    #[error("missing columns in sheet `{sheet}`: {}", columns.join(", "))]
    MissingColumn { sheet: String, columns: Vec<String> },

    #[error("blank row in sheet `{sheet}` (row {row})")]
    BlankRow { sheet: String, row: usize },

    #[error("invalid value in sheet `{sheet}`, column `{column}`, row {row}: `{value}` is not {expected}")]
    TypeMismatch {
        sheet: String,
        column: String,
        row: usize,
        value: String,
        expected: &'static str,
    },

    #[error("sheet `{sheet}` has no data rows")]
    EmptySheet { sheet: String },
}

impl SchemaError {
    /// Short machine-readable code, stable across message wording changes.
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Workbook { .. } => "workbook",
            SchemaError::MissingSheet { .. } => "missing_sheet",
            SchemaError::MissingColumn { .. } => "missing_column",
            SchemaError::BlankRow { .. } => "blank_row",
            SchemaError::TypeMismatch { .. } => "type_mismatch",
            SchemaError::EmptySheet { .. } => "empty_sheet",
        }
    }
}
