// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Change-op implementation helpers used by `apply_changes` and `remove_subtree`.
/// Keeps `ops::mod` focused on public op types and orchestration.
fn apply_change(graph: &mut Graph, change: &ChangeOp, delta: &mut DeltaBuilder) -> bool {
    match change {
        ChangeOp::MoveNode { node_id, position } => {
            if !position.is_finite() {
                debug!(node = %node_id, ?position, "ignoring move to non-finite position");
                return false;
            }
            let Some(node) = graph.node_mut(node_id) else {
                return false;
            };
            node.set_position(*position);
            delta.record_updated(ElementRef::Node(node_id.clone()));
            true
        }
        ChangeOp::RemoveNode { node_id } => {
            let before_len = graph.nodes().len();
            graph.nodes_mut().retain(|node| node.id() != node_id);
            if graph.nodes().len() == before_len {
                return false;
            }
            delta.record_removed(ElementRef::Node(node_id.clone()));
            true
        }
        ChangeOp::RemoveEdge { edge_id } => {
            let before_len = graph.edges().len();
            graph.edges_mut().retain(|edge| edge.id() != edge_id);
            if graph.edges().len() == before_len {
                return false;
            }
            delta.record_removed(ElementRef::Edge(edge_id.clone()));
            true
        }
    }
}

fn collect_subtree(graph: &Graph, node_id: &NodeId) -> BTreeSet<NodeId> {
    let mut doomed = BTreeSet::new();
    let mut stack = vec![node_id.clone()];

    while let Some(current) = stack.pop() {
        if !doomed.insert(current.clone()) {
            continue;
        }
        stack.extend(graph.children_of(&current).map(|child| child.id().clone()));
    }

    doomed
}

fn remove_edges_touching(graph: &mut Graph, doomed: &BTreeSet<NodeId>, delta: &mut DeltaBuilder) {
    let removed_edge_ids = graph
        .edges()
        .iter()
        .filter(|edge| doomed.contains(edge.source_id()) || doomed.contains(edge.target_id()))
        .map(|edge| edge.id().clone())
        .collect::<Vec<_>>();
    graph
        .edges_mut()
        .retain(|edge| !doomed.contains(edge.source_id()) && !doomed.contains(edge.target_id()));
    for edge_id in removed_edge_ids {
        delta.record_removed(ElementRef::Edge(edge_id));
    }
}

fn remove_nodes_in(graph: &mut Graph, doomed: &BTreeSet<NodeId>, delta: &mut DeltaBuilder) {
    graph.nodes_mut().retain(|node| !doomed.contains(node.id()));
    for node_id in doomed {
        delta.record_removed(ElementRef::Node(node_id.clone()));
    }
}
