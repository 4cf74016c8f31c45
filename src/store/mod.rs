// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Remote diagram store contract and backends.
//!
//! The core only needs four document-store calls over one collection of diagram
//! records. `MemoryStore` keeps records in process; `FolderStore` keeps one JSON file per
//! record on disk.

use std::fmt;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::{IdError, RecordId};

pub mod folder;
pub mod memory;
pub mod record;

pub use folder::{FolderStore, WriteDurability};
pub use memory::MemoryStore;
pub use record::{DiagramData, DiagramRecord, EdgeJson, NodeDataJson, NodeJson, PositionJson};

/// Default collection holding diagram records.
pub const DEFAULT_COLLECTION: &str = "mindmaps";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    CreatedDesc,
    CreatedAsc,
}

impl SortOrder {
    /// Sort expression in document-store query syntax.
    pub fn as_param(self) -> &'static str {
        match self {
            Self::CreatedDesc => "-created",
            Self::CreatedAsc => "created",
        }
    }

    pub(crate) fn sort(self, records: &mut [DiagramRecord]) {
        records.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));
        if self == Self::CreatedDesc {
            records.reverse();
        }
    }
}

/// Narrow CRUD contract over the diagram collection.
pub trait RemoteStore: Send + Sync {
    fn create(
        &self,
        data: DiagramData,
    ) -> impl Future<Output = Result<DiagramRecord, StoreError>> + Send;

    fn update(
        &self,
        id: &RecordId,
        data: DiagramData,
    ) -> impl Future<Output = Result<DiagramRecord, StoreError>> + Send;

    fn get_one(&self, id: &RecordId)
        -> impl Future<Output = Result<DiagramRecord, StoreError>> + Send;

    fn get_full_list(
        &self,
        sort: SortOrder,
    ) -> impl Future<Output = Result<Vec<DiagramRecord>, StoreError>> + Send;
}

#[derive(Debug)]
pub enum StoreError {
    NotFound {
        collection: String,
        id: String,
    },
    Validation {
        field: &'static str,
        message: String,
    },
    Unavailable {
        reason: String,
    },
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidId {
        field: &'static str,
        value: String,
        source: Box<IdError>,
    },
    SymlinkRefused {
        path: PathBuf,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { collection, id } => {
                write!(f, "record {id:?} not found in collection {collection:?}")
            }
            Self::Validation { field, message } => {
                write!(f, "record rejected: {field} {message}")
            }
            Self::Unavailable { reason } => write!(f, "store unavailable: {reason}"),
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid id for {field}: {value:?}: {source}"),
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidId { source, .. } => Some(source),
            Self::NotFound { .. }
            | Self::Validation { .. }
            | Self::Unavailable { .. }
            | Self::SymlinkRefused { .. } => None,
        }
    }
}

/// Checks shared by every backend before a record is written.
pub(crate) fn validate_data(data: &DiagramData) -> Result<(), StoreError> {
    if data.name.trim().is_empty() {
        return Err(StoreError::Validation {
            field: "name",
            message: "must not be blank".to_owned(),
        });
    }
    let non_finite = data
        .nodes
        .iter()
        .find(|node| !(node.position.x.is_finite() && node.position.y.is_finite()));
    if let Some(node) = non_finite {
        return Err(StoreError::Validation {
            field: "nodes[].position",
            message: format!("must be finite (node {:?})", node.id),
        });
    }
    Ok(())
}

/// Unix milliseconds, strictly increasing per clock so records created back to back
/// still sort in creation order.
pub(crate) fn next_timestamp(last: &AtomicU64) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;
    let mut prev = last.load(Ordering::Relaxed);
    loop {
        let next = now.max(prev.saturating_add(1));
        match last.compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => prev = actual,
        }
    }
}
