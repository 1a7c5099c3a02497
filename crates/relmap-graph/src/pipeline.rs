//! One validation + assembly run over a pair of workbooks.
//!
//! Everything a run needs travels in a `RunContext`; there is no shared
//! session state between runs.

use relmap_ingest::{validate_workbooks, ValidatedWorkbooks, Workbook};
use relmap_model::GraphDocument;
use serde::{Deserialize, Serialize};

use crate::document::build_document;
use crate::edges::assemble_edges;
use crate::integrity::{check_integrity, IntegrityOptions, TARGET_ENTITY};
use crate::legend::{assemble_legend, LegendMode};
use crate::nodes::assemble_nodes;
use crate::RunError;

fn default_target_category() -> String {
    TARGET_ENTITY.to_string()
}

/// Operator-tunable knobs for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Force the single-target-entity rule on or off. `None` uses the legend
    /// mode's default: on for interactive runs, off for style-table runs.
    #[serde(default)]
    pub single_target_entity: Option<bool>,
    #[serde(default = "default_target_category")]
    pub target_category: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            single_target_entity: None,
            target_category: default_target_category(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub config: PipelineConfig,
    pub legend: LegendMode,
}

impl RunContext {
    pub fn new(config: PipelineConfig, legend: LegendMode) -> Self {
        Self { config, legend }
    }

    pub fn style_table() -> Self {
        Self::new(PipelineConfig::default(), LegendMode::StyleTable)
    }

    pub fn integrity_options(&self) -> IntegrityOptions {
        IntegrityOptions {
            single_target_entity: self
                .config
                .single_target_entity
                .unwrap_or_else(|| self.legend.is_interactive()),
            target_category: self.config.target_category.clone(),
        }
    }
}

/// Schema pass, integrity rules, then icon-choice coverage.
pub fn validate(
    ctx: &RunContext,
    graph: &Workbook,
    style: &Workbook,
) -> Result<ValidatedWorkbooks, RunError> {
    let tables = validate_workbooks(graph, style)?;
    check_integrity(&tables.graph, &tables.style, &ctx.integrity_options())?;

    if let Some(subtype) = ctx.legend.missing_choices(&tables.graph).first() {
        return Err(RunError::MissingIconChoice {
            subtype: subtype.to_string(),
        });
    }
    Ok(tables)
}

/// Assemble a document from tables that already passed `validate`.
pub fn assemble(ctx: &RunContext, tables: &ValidatedWorkbooks) -> GraphDocument {
    let nodes = assemble_nodes(&tables.graph, &tables.style, &ctx.legend);
    let edges = assemble_edges(&tables.graph, &tables.style);
    let legend = assemble_legend(&tables.graph, &tables.style, &ctx.legend);
    build_document(&tables.graph, &tables.style, legend, nodes, edges)
}

pub fn run(ctx: &RunContext, graph: &Workbook, style: &Workbook) -> Result<GraphDocument, RunError> {
    let tables = match validate(ctx, graph, style) {
        Ok(tables) => tables,
        Err(err) => {
            tracing::warn!(code = err.code(), error = %err, "run rejected");
            return Err(err);
        }
    };
    let document = assemble(ctx, &tables);
    tracing::info!(
        nodes = document.view.node.len(),
        edges = document.view.node_connections.len(),
        legend = document.legend.len(),
        "graph document built"
    );
    Ok(document)
}
