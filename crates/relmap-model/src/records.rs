//! Typed rows coerced from the input workbooks.
//!
//! These are produced by the schema pass in `relmap-ingest` and consumed by the
//! integrity checks and assemblers in `relmap-graph`. They carry no rendering
//! decisions: blank optional cells stay `None` here and are normalized later.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of (title, info) pairs carried by every node row.
pub const DATA_GRID_SLOTS: usize = 5;

/// One `(data_grid_titleN, data_grid_infoN)` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridEntry {
    pub title: Option<String>,
    pub info: Option<String>,
}

/// A row of the graph workbook's `Node` sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: i64,
    pub name: String,
    pub node_type: String,
    pub relationship: Option<String>,
    pub subtype: String,
    pub grid: [GridEntry; DATA_GRID_SLOTS],
}

/// A row of the graph workbook's `Connections` sheet.
///
/// `to` is optional: a blank target is legal at the schema level and rejected
/// (or dropped) later depending on whether `from` names a real node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub uid: Option<String>,
    pub from: i64,
    pub to: Option<i64>,
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelFont {
    pub alignment: String,
    pub color: String,
    pub background: String,
    pub size: i64,
}

/// Node styling for one category (`Nodes` sheet, keyed by `Component`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRule {
    pub category: String,
    pub image: String,
    pub color: String,
    pub label_font: LabelFont,
    pub shape: String,
    pub size: i64,
    /// Raw spreadsheet value; zero means "no shadow".
    pub shadow: i64,
}

/// Edge styling for one connection level (`Edge` sheet, keyed by `L2`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeStyleRule {
    pub level: String,
    pub width: i64,
    pub color: String,
    pub length: i64,
    /// Raw spreadsheet value; zero means a solid line.
    pub dashes: i64,
    pub connection_type: Option<String>,
}

/// Branding and global settings, taken from the first row of `Global`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandingConfig {
    pub client_name: String,
    pub logo_url: String,
    pub sidebar_short_logo: String,
    pub background_mode: serde_json::Value,
    /// Category -> caption, from the non-blank `legend_<category>` cells.
    #[serde(default)]
    pub legend_captions: BTreeMap<String, String>,
}

/// The validated, type-coerced contents of the graph workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphTables {
    pub nodes: Vec<NodeRecord>,
    pub connections: Vec<ConnectionRecord>,
}

/// The validated, type-coerced contents of the style workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleTables {
    pub node_styles: Vec<StyleRule>,
    pub edge_styles: Vec<EdgeStyleRule>,
    pub branding: BrandingConfig,
}

impl GraphTables {
    /// Distinct `SubType` values in first-appearance order.
    pub fn distinct_subtypes(&self) -> Vec<&str> {
        distinct_in_order(self.nodes.iter().map(|n| n.subtype.as_str()))
    }

    /// Distinct `Type` values in first-appearance order.
    pub fn distinct_types(&self) -> Vec<&str> {
        distinct_in_order(self.nodes.iter().map(|n| n.node_type.as_str()))
    }
}

impl StyleTables {
    /// Node style for `category`; the first matching row wins.
    pub fn node_style(&self, category: &str) -> Option<&StyleRule> {
        self.node_styles.iter().find(|s| s.category == category)
    }

    /// Edge style for `level`; the first matching row wins.
    pub fn edge_style(&self, level: &str) -> Option<&EdgeStyleRule> {
        self.edge_styles.iter().find(|s| s.level == level)
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = std::collections::HashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}
