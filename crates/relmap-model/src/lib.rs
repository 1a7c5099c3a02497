//! Relmap data model
//!
//! Shared types for the relationship-map pipeline:
//! - typed input records, coerced from the graph and style workbooks
//! - the rendered `GraphDocument` handed to the visualization front end
//! - the fixed icon table used by interactive legends
//! - a stable digest for serialized documents

pub mod digest;
pub mod document;
pub mod icons;
pub mod records;

pub use document::*;
pub use icons::*;
pub use records::*;
