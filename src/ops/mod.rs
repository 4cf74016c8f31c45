// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for the mind map graph.
//!
//! These functions are the only public write path into [`Graph`]. Each produces a coarse
//! delta that the rendering layer can use to refresh derived state.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use tracing::debug;

use crate::model::{Edge, EdgeId, ElementRef, Graph, Node, NodeId, Position};

/// Label given to every node created by [`add_child`].
pub const NEW_NODE_LABEL: &str = "New Node";

/// One UI-originated edit inside a change batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOp {
    MoveNode { node_id: NodeId, position: Position },
    RemoveNode { node_id: NodeId },
    RemoveEdge { edge_id: EdgeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    /// Number of ops that actually changed the graph.
    pub applied: usize,
    pub delta: Delta,
}

/// Minimal delta describing which elements changed as the result of applying ops.
///
/// This is intentionally coarse: it reports only added/removed/updated element refs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ElementRef>,
    pub removed: Vec<ElementRef>,
    pub updated: Vec<ElementRef>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: HashSet<ElementRef>,
    removed: HashSet<ElementRef>,
    updated: HashSet<ElementRef>,
}

impl DeltaBuilder {
    fn record_added(&mut self, element: ElementRef) {
        self.removed.remove(&element);
        self.updated.remove(&element);
        self.added.insert(element);
    }

    fn record_removed(&mut self, element: ElementRef) {
        // Added and removed within one batch nets out to nothing.
        if self.added.remove(&element) {
            self.updated.remove(&element);
            return;
        }
        self.updated.remove(&element);
        self.removed.insert(element);
    }

    fn record_updated(&mut self, element: ElementRef) {
        if self.added.contains(&element) || self.removed.contains(&element) {
            return;
        }
        self.updated.insert(element);
    }

    fn finish(self) -> Delta {
        let mut added = self.added.into_iter().collect::<Vec<_>>();
        let mut removed = self.removed.into_iter().collect::<Vec<_>>();
        let mut updated = self.updated.into_iter().collect::<Vec<_>>();

        added.sort();
        removed.sort();
        updated.sort();

        Delta { added, removed, updated }
    }
}

/// Applies a batch of UI edits as a left fold; each op sees the result of the previous one.
///
/// Ops naming an absent id are no-ops, and so are moves to a non-finite position.
/// `RemoveNode` does not cascade: incident edges and descendants stay behind until the
/// caller removes them too (see [`remove_subtree`]).
pub fn apply_changes(graph: &mut Graph, changes: &[ChangeOp]) -> ApplyResult {
    let mut delta = DeltaBuilder::default();
    let mut applied = 0_usize;

    for change in changes {
        if apply_change(graph, change, &mut delta) {
            applied += 1;
        }
    }

    if applied > 0 {
        graph.bump_rev();
    }
    debug!(ops = changes.len(), applied, rev = graph.rev(), "applied change batch");

    ApplyResult { new_rev: graph.rev(), applied, delta: delta.finish() }
}

/// Ids of the node and edge created by [`add_child`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildCreated {
    pub node_id: NodeId,
    pub edge_id: EdgeId,
    pub new_rev: u64,
    /// Lists the new node and edge as added.
    pub delta: Delta,
}

/// Appends a new child node under `parent_id` together with its parent edge.
///
/// Both elements are installed or neither is: an absent parent or a non-finite position
/// is rejected before the graph is touched.
pub fn add_child(
    graph: &mut Graph,
    parent_id: &NodeId,
    position: Position,
) -> Result<ChildCreated, ApplyError> {
    if !graph.contains_node(parent_id) {
        return Err(ApplyError::NodeNotFound { node_id: parent_id.clone() });
    }
    if !position.is_finite() {
        return Err(ApplyError::NonFinitePosition { position });
    }

    let node_id = NodeId::generate();
    let edge_id = EdgeId::generate();
    let node = Node::new(node_id.clone(), NEW_NODE_LABEL, position, Some(parent_id.clone()));
    let edge = Edge::new(edge_id.clone(), parent_id.clone(), node_id.clone());

    graph.nodes_mut().push(node);
    graph.edges_mut().push(edge);
    graph.bump_rev();
    debug!(parent = %parent_id, node = %node_id, edge = %edge_id, "added child node");

    let mut delta = DeltaBuilder::default();
    delta.record_added(ElementRef::Node(node_id.clone()));
    delta.record_added(ElementRef::Edge(edge_id.clone()));

    Ok(ChildCreated { node_id, edge_id, new_rev: graph.rev(), delta: delta.finish() })
}

pub fn rename_node(
    graph: &mut Graph,
    node_id: &NodeId,
    label: impl Into<String>,
) -> Result<ApplyResult, ApplyError> {
    let Some(node) = graph.node_mut(node_id) else {
        return Err(ApplyError::NodeNotFound { node_id: node_id.clone() });
    };
    node.set_label(label);
    graph.bump_rev();

    let mut delta = DeltaBuilder::default();
    delta.record_updated(ElementRef::Node(node_id.clone()));
    Ok(ApplyResult { new_rev: graph.rev(), applied: 1, delta: delta.finish() })
}

/// Removes a node, all of its descendants, and every edge touching any of them.
///
/// This is the cascading counterpart of `ChangeOp::RemoveNode`. The root cannot be
/// removed this way; use a new diagram instead.
pub fn remove_subtree(graph: &mut Graph, node_id: &NodeId) -> Result<ApplyResult, ApplyError> {
    let Some(node) = graph.node(node_id) else {
        return Err(ApplyError::NodeNotFound { node_id: node_id.clone() });
    };
    if node.is_root() {
        return Err(ApplyError::RootNode { node_id: node_id.clone() });
    }

    let doomed = collect_subtree(graph, node_id);
    let mut delta = DeltaBuilder::default();

    remove_edges_touching(graph, &doomed, &mut delta);
    remove_nodes_in(graph, &doomed, &mut delta);
    graph.bump_rev();
    debug!(node = %node_id, removed = doomed.len(), "removed subtree");

    Ok(ApplyResult { new_rev: graph.rev(), applied: 1, delta: delta.finish() })
}

/// Discards everything and starts over from a fresh "New Mind Map" root.
pub fn reset_diagram(graph: &mut Graph) {
    graph.reset();
    debug!(generation = graph.generation(), "reset diagram");
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApplyError {
    NodeNotFound { node_id: NodeId },
    RootNode { node_id: NodeId },
    NonFinitePosition { position: Position },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound { node_id } => write!(f, "node not found (id={node_id})"),
            Self::RootNode { node_id } => {
                write!(f, "root node cannot be removed as a subtree (id={node_id})")
            }
            Self::NonFinitePosition { position } => {
                write!(f, "position must be finite (x={}, y={})", position.x, position.y)
            }
        }
    }
}

impl std::error::Error for ApplyError {}

// Extracted per-op implementation for change batches and subtree removal.
include!("ops_impl.rs");
