// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Save/load of the shared graph against a [`RemoteStore`].
//!
//! The graph lock is held only while a snapshot is taken or a result is applied, never
//! across a store call. Edits made while a request is in flight are therefore allowed: a
//! save persists the snapshot taken when it started, and a load that completes later
//! overwrites whatever was edited in the meantime.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::model::{Graph, RecordId};
use crate::ops::reset_diagram;
use crate::store::record::{decode_graph, diagram_data};
use crate::store::{RemoteStore, SortOrder, StoreError};

/// The graph shared between the UI thread and in-flight persistence requests.
pub type SharedGraph = Arc<Mutex<Graph>>;

pub fn shared_graph(graph: Graph) -> SharedGraph {
    Arc::new(Mutex::new(graph))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayOptions {
    /// Upper bound for a single store call. `None` waits forever.
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created { id: RecordId },
    Updated { id: RecordId },
}

impl SaveOutcome {
    pub fn id(&self) -> &RecordId {
        match self {
            Self::Created { id } | Self::Updated { id } => id,
        }
    }
}

/// One entry of the saved-diagram directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramSummary {
    pub id: RecordId,
    pub name: String,
    pub created: u64,
}

impl DiagramSummary {
    /// Name for menus; unnamed records fall back to their id.
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            format!("Mind Map {}", self.id)
        } else {
            self.name.clone()
        }
    }
}

#[derive(Debug)]
pub enum PersistenceError {
    Store(StoreError),
    Cancelled,
    TimedOut { after: Duration },
}

impl PersistenceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_not_found())
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Cancelled => f.write_str("request cancelled"),
            Self::TimedOut { after } => write!(f, "request timed out after {after:?}"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Cancelled | Self::TimedOut { .. } => None,
        }
    }
}

impl From<StoreError> for PersistenceError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

pub struct PersistenceGateway<S> {
    graph: SharedGraph,
    store: S,
    options: GatewayOptions,
}

impl<S: RemoteStore> PersistenceGateway<S> {
    pub fn new(graph: SharedGraph, store: S) -> Self {
        Self::with_options(graph, store, GatewayOptions::default())
    }

    pub fn with_options(graph: SharedGraph, store: S, options: GatewayOptions) -> Self {
        Self {
            graph,
            store,
            options,
        }
    }

    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &GatewayOptions {
        &self.options
    }

    pub async fn save(&self, name: &str) -> Result<SaveOutcome, PersistenceError> {
        self.save_with(name, &CancellationToken::new()).await
    }

    /// Persists the current graph under `name`.
    ///
    /// Updates the bound record when there is one; otherwise creates a record and binds
    /// its id, unless the graph was replaced (load/new) while the create was in flight.
    pub async fn save_with(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<SaveOutcome, PersistenceError> {
        let (data, bound_id, generation, rev) = {
            let graph = self.graph.lock().await;
            (
                diagram_data(name, graph.nodes(), graph.edges()),
                graph.current_diagram_id().cloned(),
                graph.generation(),
                graph.rev(),
            )
        };

        if let Some(id) = bound_id {
            self.request(cancel, self.store.update(&id, data)).await?;
            self.mark_saved(generation, rev, None).await;
            info!(id = %id, diagram = name, "updated diagram");
            return Ok(SaveOutcome::Updated { id });
        }

        let record = self.request(cancel, self.store.create(data)).await?;
        let id = record.record_id()?;
        self.mark_saved(generation, rev, Some(&id)).await;
        info!(id = %id, diagram = name, "created diagram");
        Ok(SaveOutcome::Created { id })
    }

    async fn mark_saved(&self, generation: u64, rev: u64, created: Option<&RecordId>) {
        let mut graph = self.graph.lock().await;
        if graph.generation() != generation {
            warn!(
                id = ?created,
                "diagram was replaced while saving; leaving the new diagram unbound"
            );
            return;
        }
        if let Some(id) = created {
            if graph.current_diagram_id().is_none() {
                graph.bind_diagram_id(id.clone());
            }
        }
        graph.mark_clean_at(rev);
    }

    pub async fn load(&self, id: &RecordId) -> Result<DiagramSummary, PersistenceError> {
        self.load_with(id, &CancellationToken::new()).await
    }

    /// Replaces the whole graph with the stored record and returns the record's summary.
    /// Unsaved edits are discarded. On any error the graph is left as it was.
    pub async fn load_with(
        &self,
        id: &RecordId,
        cancel: &CancellationToken,
    ) -> Result<DiagramSummary, PersistenceError> {
        let record = self.request(cancel, self.store.get_one(id)).await?;
        let record_id = record.record_id()?;
        let (nodes, edges) = decode_graph(&record)?;

        let mut graph = self.graph.lock().await;
        graph.replace_loaded(nodes, edges, record_id.clone());

        let violations = graph.tree_violations();
        if !violations.is_empty() {
            warn!(
                id = %record_id,
                count = violations.len(),
                first = %violations[0],
                "loaded diagram is not a valid tree"
            );
        }
        info!(id = %record_id, nodes = graph.nodes().len(), "loaded diagram");
        Ok(DiagramSummary {
            id: record_id,
            name: record.name,
            created: record.created,
        })
    }

    /// Saved diagrams, newest first. Failures are logged and yield an empty list.
    pub async fn list_saved(&self) -> Vec<DiagramSummary> {
        let cancel = CancellationToken::new();
        let records = match self
            .request(&cancel, self.store.get_full_list(SortOrder::CreatedDesc))
            .await
        {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "failed to list saved diagrams");
                return Vec::new();
            }
        };

        let mut summaries = records
            .into_iter()
            .filter_map(|record| match record.record_id() {
                Ok(id) => Some(DiagramSummary {
                    id,
                    name: record.name,
                    created: record.created,
                }),
                Err(err) => {
                    warn!(error = %err, "skipping saved diagram with invalid id");
                    None
                }
            })
            .collect::<Vec<_>>();
        summaries.sort_by(|a, b| b.created.cmp(&a.created));
        summaries
    }

    /// Starts a fresh unsaved diagram.
    pub async fn new_diagram(&self) {
        let mut graph = self.graph.lock().await;
        reset_diagram(&mut graph);
        info!("started new diagram");
    }

    async fn request<T>(
        &self,
        cancel: &CancellationToken,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, PersistenceError> {
        let bounded = async {
            match self.options.request_timeout {
                Some(after) => match tokio::time::timeout(after, call).await {
                    Ok(result) => result.map_err(PersistenceError::Store),
                    Err(_) => Err(PersistenceError::TimedOut { after }),
                },
                None => call.await.map_err(PersistenceError::Store),
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PersistenceError::Cancelled),
            result = bounded => result,
        }
    }
}
