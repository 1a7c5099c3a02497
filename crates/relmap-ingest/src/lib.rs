//! Workbook ingestion for Relmap
//!
//! Loads the two input workbooks and runs the schema pass:
//! - graph workbook: sheets `Node` and `Connections`
//! - style workbook: sheets `Nodes`, `Edge` and `Global`
//!
//! The schema pass checks sheet presence, column presence, blank rows and
//! per-column type coercion, and yields typed `relmap_model` tables.
//! Cross-sheet rules live in `relmap-graph`.

mod error;
pub mod schema;
pub mod validate;
pub mod workbook;

pub use error::SchemaError;
pub use validate::{validate_workbooks, ValidatedWorkbooks};
pub use workbook::{load_workbook, CellValue, Sheet, Workbook, WorkbookRole};
