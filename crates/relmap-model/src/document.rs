//! The rendered graph document.
//!
//! This is the only artifact that outlives a pipeline run: it is downloaded by
//! the operator and/or inserted into the document store, then read by the
//! visualization front end. Field names are part of the renderer contract.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Constant tag emitted in every document.
pub const SEARCH_CASE_NAME: &str = "beacon";

/// A boolean rendered as the JSON *strings* `"true"` / `"false"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFlag {
    True,
    False,
}

impl From<bool> for TextFlag {
    fn from(value: bool) -> Self {
        if value {
            TextFlag::True
        } else {
            TextFlag::False
        }
    }
}

impl TextFlag {
    pub fn as_bool(self) -> bool {
        matches!(self, TextFlag::True)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataGrid {
    pub data_grid_title1: String,
    pub data_grid_info1: String,
    pub data_grid_title2: String,
    pub data_grid_info2: String,
    pub data_grid_title3: String,
    pub data_grid_info3: String,
    pub data_grid_title4: String,
    pub data_grid_info4: String,
    pub data_grid_title5: String,
    pub data_grid_info5: String,
    /// Always a single space; reserved by the renderer.
    pub data_grid_properties: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeProperties {
    pub node_size: i64,
    pub node_shape: String,
    pub node_shadow: TextFlag,
    pub node_label_font_size: i64,
    pub node_label_font_color: String,
    pub node_label_font_background: String,
    pub node_label_font_alignment: String,
    pub node_image: String,
    pub node_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeView {
    pub name: String,
    #[serde(rename = "SubType")]
    pub subtype: String,
    #[serde(rename = "UID")]
    pub uid: i64,
    pub data_grid_properties: DataGrid,
    pub node_properties: NodeProperties,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeView {
    pub from: i64,
    pub to: i64,
    pub edge_width: i64,
    pub edge_color: String,
    pub edge_length: i64,
    pub edge_dashes: TextFlag,
    pub connection_type: Option<String>,
    /// Positional, 1-based, assigned after sorting by `from`.
    #[serde(rename = "UID")]
    pub uid: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    #[serde(rename = "type")]
    pub node_type: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphView {
    pub node: Vec<NodeView>,
    pub node_connections: Vec<EdgeView>,
}

/// Category -> icon URL, in first-appearance order of the Node sheet.
pub type Legend = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub legend: Legend,
    pub client_name: String,
    pub logo_url: String,
    pub sidebar_short_logo: String,
    pub background_mode: serde_json::Value,
    pub search_case_name: String,
    pub filters: Filters,
    #[serde(rename = "default")]
    pub view: GraphView,
}

impl GraphDocument {
    /// The downloadable copy: 2-space indented JSON.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Compact form used for storage and digests.
    pub fn to_compact_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.view.node.iter().map(|n| n.uid)
    }
}
