//! Relmap document storage
//!
//! Each pipeline run ends with at most one write: the finished
//! `GraphDocument`, keyed by the project (application) name it was built for.
//!
//! - `DocumentSink` is the write-only interface the pipeline talks to
//! - `JsonLinesStore` appends one JSON record per insert and can read back the
//!   newest record for a project
//! - `MemorySink` keeps records in memory
//!
//! Writes are never retried; a failed insert is reported to the caller.

pub mod persistence;


use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use relmap_model::digest::document_digest_v1;
use relmap_model::GraphDocument;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

pub use persistence::JsonLinesStore;

// ============================================================================
// Core Types
// ============================================================================

pub type RecordId = Uuid;

/// One stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocumentV1 {
    pub id: RecordId,
    pub app_name: String,
    pub stored_at: DateTime<Utc>,
    /// `relmap_model::digest::document_digest_v1` of `document`.
    pub digest: String,
    pub document: GraphDocument,
}

impl StoredDocumentV1 {
    pub fn new(app_name: &str, document: &GraphDocument) -> Result<Self, StoreError> {
        Ok(Self {
            id: Uuid::new_v4(),
            app_name: app_name.to_string(),
            stored_at: Utc::now(),
            digest: document_digest_v1(document)?,
            document: document.clone(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store record could not be (de)serialized: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(&self) -> Result<JsonLinesStore, StoreError> {
        JsonLinesStore::open(&self.path)
    }
}

// ============================================================================
// Sinks
// ============================================================================

/// Write-only destination for finished documents.
pub trait DocumentSink {
    fn insert(
        &self,
        app_name: &str,
        document: &GraphDocument,
    ) -> Result<StoredDocumentV1, StoreError>;
}

/// In-memory sink, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<StoredDocumentV1>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<StoredDocumentV1> {
        self.records.lock().clone()
    }

    pub fn latest(&self, app_name: &str) -> Option<StoredDocumentV1> {
        self.records
            .lock()
            .iter()
            .rev()
            .find(|r| r.app_name == app_name)
            .cloned()
    }
}

impl DocumentSink for MemorySink {
    fn insert(
        &self,
        app_name: &str,
        document: &GraphDocument,
    ) -> Result<StoredDocumentV1, StoreError> {
        let record = StoredDocumentV1::new(app_name, document)?;
        self.records.lock().push(record.clone());
        tracing::debug!(app_name, id = %record.id, "document kept in memory");
        Ok(record)
    }
}
