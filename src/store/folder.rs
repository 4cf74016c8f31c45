// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicU64;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::model::RecordId;

use super::{
    next_timestamp, validate_data, DiagramData, DiagramRecord, RemoteStore, SortOrder, StoreError,
    DEFAULT_COLLECTION,
};

const RECORD_EXTENSION: &str = "json";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable storage where
    /// possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

/// Diagram collection stored as `<root>/<collection>/<record-id>.json`.
#[derive(Debug)]
pub struct FolderStore {
    root: PathBuf,
    collection: String,
    durability: WriteDurability,
    clock: AtomicU64,
}

impl FolderStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            collection: DEFAULT_COLLECTION.to_owned(),
            durability: WriteDurability::default(),
            clock: AtomicU64::new(0),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn collection_dir(&self) -> PathBuf {
        self.root.join(&self.collection)
    }

    pub fn record_path(&self, id: &RecordId) -> PathBuf {
        self.collection_dir()
            .join(format!("{}.{RECORD_EXTENSION}", id.as_str()))
    }

    fn not_found(&self, id: &RecordId) -> StoreError {
        StoreError::NotFound {
            collection: self.collection.clone(),
            id: id.to_string(),
        }
    }

    async fn read_record(&self, id: &RecordId) -> Result<DiagramRecord, StoreError> {
        let path = self.record_path(id);
        match read_record_file(&path).await {
            Err(StoreError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Err(self.not_found(id))
            }
            other => other,
        }
    }

    async fn write_record(&self, record: &DiagramRecord) -> Result<(), StoreError> {
        let id = record.record_id()?;
        let path = self.record_path(&id);
        let contents = serde_json::to_string_pretty(record).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;

        write_atomic(
            &self.collection_dir(),
            &path,
            format!("{contents}\n").as_bytes(),
            self.durability,
        )
        .await?;
        debug!(path = ?path, "wrote diagram record");
        Ok(())
    }
}

impl RemoteStore for FolderStore {
    async fn create(&self, data: DiagramData) -> Result<DiagramRecord, StoreError> {
        validate_data(&data)?;

        let id = RecordId::generate();
        let created = next_timestamp(&self.clock);
        let record = DiagramRecord::from_data(id.into_string(), data, created, created);
        self.write_record(&record).await?;
        Ok(record)
    }

    async fn update(&self, id: &RecordId, data: DiagramData) -> Result<DiagramRecord, StoreError> {
        validate_data(&data)?;

        let existing = self.read_record(id).await?;
        let updated = next_timestamp(&self.clock).max(existing.updated.saturating_add(1));
        let record = DiagramRecord::from_data(id.to_string(), data, existing.created, updated);
        self.write_record(&record).await?;
        Ok(record)
    }

    async fn get_one(&self, id: &RecordId) -> Result<DiagramRecord, StoreError> {
        let mut record = self.read_record(id).await?;
        // The file name is authoritative for the record id.
        record.id = id.to_string();
        Ok(record)
    }

    async fn get_full_list(&self, sort: SortOrder) -> Result<Vec<DiagramRecord>, StoreError> {
        let dir = self.collection_dir();
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { path: dir, source }),
        };

        let mut records = Vec::new();
        loop {
            let entry = entries.next_entry().await.map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
            let Some(entry) = entry else {
                break;
            };
            let path = entry.path();
            let Some(id) = record_id_from_path(&path) else {
                continue;
            };

            let mut record = match read_record_file(&path).await {
                Ok(record) => record,
                Err(err) => {
                    warn!(path = ?path, error = %err, "skipping unreadable diagram record");
                    continue;
                }
            };
            record.id = id;
            records.push(record);
        }

        sort.sort(&mut records);
        Ok(records)
    }
}

// Record file helpers: id/path mapping and atomic writes.
include!("folder/helpers.rs");
