//! Legend assembly: one entry per distinct node subtype present in the Node
//! sheet, in first-appearance order.

use relmap_model::{GraphTables, IconChoices, Legend, StyleTables};
use serde::{Deserialize, Serialize};

use crate::nodes::style_index;

/// Where legend and node icons come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "icons", rename_all = "snake_case")]
pub enum LegendMode {
    /// Fixed mapping: the style workbook's `node_image` per category.
    StyleTable,
    /// The operator picked one of the fixed icon options per subtype.
    Interactive(IconChoices),
}

impl LegendMode {
    pub fn is_interactive(&self) -> bool {
        matches!(self, LegendMode::Interactive(_))
    }

    /// Subtypes present in `graph` that have no icon in this mode.
    ///
    /// Always empty for `StyleTable`; subtype coverage there is an integrity rule.
    pub fn missing_choices<'a>(&self, graph: &'a GraphTables) -> Vec<&'a str> {
        match self {
            LegendMode::StyleTable => Vec::new(),
            LegendMode::Interactive(choices) => graph
                .distinct_subtypes()
                .into_iter()
                .filter(|subtype| choices.get(subtype).is_none())
                .collect(),
        }
    }
}

pub fn assemble_legend(graph: &GraphTables, style: &StyleTables, mode: &LegendMode) -> Legend {
    let mut legend = Legend::new();
    match mode {
        LegendMode::StyleTable => {
            let styles = style_index(style);
            for subtype in graph.distinct_subtypes() {
                if let Some(rule) = styles.get(subtype) {
                    legend.insert(subtype.to_string(), rule.image.clone());
                }
            }
        }
        LegendMode::Interactive(choices) => {
            for subtype in graph.distinct_subtypes() {
                if let Some(url) = choices.url_for(subtype) {
                    legend.insert(subtype.to_string(), url.to_string());
                }
            }
        }
    }
    tracing::debug!(entries = legend.len(), interactive = mode.is_interactive(), "assembled legend");
    legend
}
