//! Append-only JSON-lines store.
//!
//! One line per insert, written in full and synced before `insert` returns.
//! Reads scan the whole file; the newest matching line wins.

use parking_lot::Mutex;
use relmap_model::GraphDocument;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::{DocumentSink, StoreError, StoredDocumentV1};

pub struct JsonLinesStore {
    file: Mutex<File>,
    path: PathBuf,
}

impl JsonLinesStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        Ok(Self {
            file: Mutex::new(file),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &StoredDocumentV1) -> Result<(), StoreError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = self.file.lock();
        file.write_all(&line)?;
        file.sync_data()?;
        Ok(())
    }

    /// Every record in insertion order. Blank lines are skipped.
    pub fn records(&self) -> Result<Vec<StoredDocumentV1>, StoreError> {
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(0))?;

        let mut out = Vec::new();
        for line in BufReader::new(&*file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            out.push(serde_json::from_str(&line)?);
        }
        Ok(out)
    }

    /// Newest record stored under `app_name`, if any.
    pub fn latest(&self, app_name: &str) -> Result<Option<StoredDocumentV1>, StoreError> {
        Ok(self
            .records()?
            .into_iter()
            .rev()
            .find(|r| r.app_name == app_name))
    }
}

impl DocumentSink for JsonLinesStore {
    fn insert(
        &self,
        app_name: &str,
        document: &GraphDocument,
    ) -> Result<StoredDocumentV1, StoreError> {
        let record = StoredDocumentV1::new(app_name, document)?;
        self.append(&record)?;
        tracing::info!(
            app_name,
            id = %record.id,
            digest = %record.digest,
            path = %self.path.display(),
            "document stored"
        );
        Ok(record)
    }
}
