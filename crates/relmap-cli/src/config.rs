//! Optional `relmap.json` config file.
//!
//! ```json
//! { "pipeline": { "single_target_entity": true }, "store_path": "out/documents.jsonl", "project": "acme-map" }
//! ```
//!
//! Every field is optional; command-line flags win over file values.

use anyhow::{Context, Result};
use relmap_graph::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    #[serde(default)]
    pub project: Option<String>,
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Apply `--single-target` / `--allow-multiple-targets`.
    pub fn pipeline_with(&self, single_target: Option<bool>) -> PipelineConfig {
        let mut pipeline = self.pipeline.clone();
        if single_target.is_some() {
            pipeline.single_target_entity = single_target;
        }
        pipeline
    }
}
