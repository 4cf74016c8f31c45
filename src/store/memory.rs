// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;

use crate::model::RecordId;

use super::{
    next_timestamp, validate_data, DiagramData, DiagramRecord, RemoteStore, SortOrder, StoreError,
    DEFAULT_COLLECTION,
};

/// In-process diagram collection.
///
/// Besides backing tests and demos it can simulate a slow or unreachable service via
/// [`MemoryStore::set_latency`] and [`MemoryStore::set_unavailable`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, DiagramRecord>>,
    clock: AtomicU64,
    latency: Mutex<Option<Duration>>,
    unavailable: Mutex<Option<String>>,
    creates: AtomicUsize,
    updates: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every call by `latency` before it touches the collection.
    pub async fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock().await = latency;
    }

    /// While set, every call fails with `StoreError::Unavailable`.
    pub async fn set_unavailable(&self, reason: Option<&str>) {
        *self.unavailable.lock().await = reason.map(ToOwned::to_owned);
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    /// Number of successful `create` calls so far.
    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::Relaxed)
    }

    /// Number of successful `update` calls so far.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::Relaxed)
    }

    async fn before_call(&self) -> Result<(), StoreError> {
        let latency = *self.latency.lock().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(reason) = self.unavailable.lock().await.clone() {
            return Err(StoreError::Unavailable { reason });
        }
        Ok(())
    }

    fn not_found(id: &str) -> StoreError {
        StoreError::NotFound {
            collection: DEFAULT_COLLECTION.to_owned(),
            id: id.to_owned(),
        }
    }
}

impl RemoteStore for MemoryStore {
    async fn create(&self, data: DiagramData) -> Result<DiagramRecord, StoreError> {
        self.before_call().await?;
        validate_data(&data)?;

        let id = RecordId::generate().into_string();
        let created = next_timestamp(&self.clock);
        let record = DiagramRecord::from_data(id.clone(), data, created, created);

        self.records.lock().await.insert(id, record.clone());
        self.creates.fetch_add(1, Ordering::Relaxed);
        Ok(record)
    }

    async fn update(&self, id: &RecordId, data: DiagramData) -> Result<DiagramRecord, StoreError> {
        self.before_call().await?;
        validate_data(&data)?;

        let mut records = self.records.lock().await;
        let Some(existing) = records.get_mut(id.as_str()) else {
            return Err(Self::not_found(id.as_str()));
        };
        let updated = next_timestamp(&self.clock);
        *existing = DiagramRecord::from_data(existing.id.clone(), data, existing.created, updated);

        self.updates.fetch_add(1, Ordering::Relaxed);
        Ok(existing.clone())
    }

    async fn get_one(&self, id: &RecordId) -> Result<DiagramRecord, StoreError> {
        self.before_call().await?;

        self.records
            .lock()
            .await
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| Self::not_found(id.as_str()))
    }

    async fn get_full_list(&self, sort: SortOrder) -> Result<Vec<DiagramRecord>, StoreError> {
        self.before_call().await?;

        let mut records = self.records.lock().await.values().cloned().collect::<Vec<_>>();
        sort.sort(&mut records);
        Ok(records)
    }
}
