//! Graph assembly for Relmap
//!
//! Turns schema-validated workbook tables into a `GraphDocument`:
//! - integrity rules across the Node, Connections and style sheets
//! - node views joined with their category style
//! - edge views filtered, sorted by `from` and renumbered
//! - legend from the style table or from operator icon choices
//!
//! `pipeline::run` strings the stages together for one run.

pub mod document;
pub mod edges;
mod error;
pub mod integrity;
pub mod legend;
pub mod nodes;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;

pub use document::build_document;
pub use edges::assemble_edges;
pub use error::{IntegrityError, RunError};
pub use integrity::{check_integrity, IntegrityOptions, TARGET_ENTITY};
pub use legend::{assemble_legend, LegendMode};
pub use nodes::{assemble_nodes, sanitize_name};
pub use pipeline::{assemble, run, validate, PipelineConfig, RunContext};
