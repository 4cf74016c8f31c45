// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use super::ids::{EdgeId, NodeId, RecordId};
use super::node::{Edge, Node, Position};

pub const ROOT_NODE_ID: &str = "root";
pub const INITIAL_ROOT_LABEL: &str = "Mind Map";
pub const NEW_DIAGRAM_ROOT_LABEL: &str = "New Mind Map";

/// The authoritative mind map state for one editing session.
///
/// Everything outside the crate reads through the accessors below. Writes are
/// crate-internal and go through `crate::ops` (edits) or `crate::persist` (load/save
/// bookkeeping), so the node/edge pairing cannot be broken by scattered writers.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    current_diagram_id: Option<RecordId>,
    rev: u64,
    baseline_rev: u64,
    generation: u64,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// A single root node, no edges, not bound to a remote record.
    pub fn new() -> Self {
        Self::with_root_label(INITIAL_ROOT_LABEL)
    }

    fn with_root_label(label: &str) -> Self {
        Self {
            nodes: vec![Node::root(root_node_id(), label)],
            edges: Vec::new(),
            current_diagram_id: None,
            rev: 0,
            baseline_rev: 0,
            generation: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            nodes,
            edges,
            current_diagram_id: None,
            rev: 0,
            baseline_rev: 0,
            generation: 0,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == node_id)
    }

    pub fn edge(&self, edge_id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id() == edge_id)
    }

    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.node(node_id).is_some()
    }

    /// The first parentless node, if any.
    pub fn root(&self) -> Option<&Node> {
        self.nodes.iter().find(|node| node.is_root())
    }

    pub fn children_of<'a>(&'a self, node_id: &'a NodeId) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes
            .iter()
            .filter(move |node| node.parent_id() == Some(node_id))
    }

    /// Sums parent-relative positions up to the root. `None` when the node or an ancestor
    /// is missing, or the parent chain loops.
    pub fn absolute_position(&self, node_id: &NodeId) -> Option<Position> {
        let mut node = self.node(node_id)?;
        let mut at = node.position();
        for _ in 0..self.nodes.len() {
            let Some(parent_id) = node.parent_id() else {
                return Some(at);
            };
            node = self.node(parent_id)?;
            at = at.offset_by(node.position());
        }
        None
    }

    pub fn current_diagram_id(&self) -> Option<&RecordId> {
        self.current_diagram_id.as_ref()
    }

    /// Monotonic revision, bumped by every mutation that changed something.
    pub fn rev(&self) -> u64 {
        self.rev
    }

    /// Bumped whenever the graph is replaced wholesale (load, new diagram).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when edits were made since the last save, load, or reset.
    pub fn is_dirty(&self) -> bool {
        self.rev != self.baseline_rev
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    pub(crate) fn edges_mut(&mut self) -> &mut Vec<Edge> {
        &mut self.edges
    }

    pub(crate) fn node_mut(&mut self, node_id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id() == node_id)
    }

    pub(crate) fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }

    pub(crate) fn mark_clean_at(&mut self, rev: u64) {
        self.baseline_rev = rev;
    }

    pub(crate) fn bind_diagram_id(&mut self, diagram_id: RecordId) {
        self.current_diagram_id = Some(diagram_id);
    }

    /// Wholesale replacement with a fetched record. Local edits are discarded.
    pub(crate) fn replace_loaded(&mut self, nodes: Vec<Node>, edges: Vec<Edge>, id: RecordId) {
        self.nodes = nodes;
        self.edges = edges;
        self.current_diagram_id = Some(id);
        self.generation = self.generation.saturating_add(1);
        self.bump_rev();
        self.baseline_rev = self.rev;
    }

    /// Back to a single "New Mind Map" root, unbound from any record.
    pub(crate) fn reset(&mut self) {
        let fresh = Self::with_root_label(NEW_DIAGRAM_ROOT_LABEL);
        self.nodes = fresh.nodes;
        self.edges = fresh.edges;
        self.current_diagram_id = None;
        self.generation = self.generation.saturating_add(1);
        self.bump_rev();
        self.baseline_rev = self.rev;
    }

    /// Lists every broken tree invariant. An empty list means the graph is a valid tree.
    pub fn tree_violations(&self) -> Vec<TreeViolation> {
        let mut violations = Vec::new();

        let mut node_ids = BTreeSet::<&NodeId>::new();
        for node in &self.nodes {
            if !node_ids.insert(node.id()) {
                violations.push(TreeViolation::DuplicateNodeId {
                    node_id: node.id().clone(),
                });
            }
        }

        let mut edge_ids = BTreeSet::<&EdgeId>::new();
        for edge in &self.edges {
            if !edge_ids.insert(edge.id()) {
                violations.push(TreeViolation::DuplicateEdgeId {
                    edge_id: edge.id().clone(),
                });
            }
            if !node_ids.contains(edge.source_id()) || !node_ids.contains(edge.target_id()) {
                violations.push(TreeViolation::DanglingEdge {
                    edge_id: edge.id().clone(),
                });
            }
        }

        let root_ids = self
            .nodes
            .iter()
            .filter(|node| node.is_root())
            .map(|node| node.id().clone())
            .collect::<Vec<_>>();
        match root_ids.len() {
            0 => violations.push(TreeViolation::NoRoot),
            1 => {}
            _ => violations.push(TreeViolation::MultipleRoots {
                root_ids: root_ids.clone(),
            }),
        }

        let mut edges_by_target = BTreeMap::<&NodeId, Vec<&Edge>>::new();
        for edge in &self.edges {
            edges_by_target.entry(edge.target_id()).or_default().push(edge);
        }

        for node in &self.nodes {
            let incoming = edges_by_target.get(node.id()).map(Vec::as_slice).unwrap_or(&[]);
            let Some(parent_id) = node.parent_id() else {
                if let Some(edge) = incoming.first() {
                    violations.push(TreeViolation::MismatchedParentEdge {
                        node_id: node.id().clone(),
                        edge_id: edge.id().clone(),
                    });
                }
                continue;
            };

            if !node_ids.contains(parent_id) {
                violations.push(TreeViolation::MissingParent {
                    node_id: node.id().clone(),
                    parent_id: parent_id.clone(),
                });
            }

            match incoming {
                [] => violations.push(TreeViolation::MissingParentEdge {
                    node_id: node.id().clone(),
                }),
                [edge] => {
                    if edge.source_id() != parent_id {
                        violations.push(TreeViolation::MismatchedParentEdge {
                            node_id: node.id().clone(),
                            edge_id: edge.id().clone(),
                        });
                    }
                }
                _ => violations.push(TreeViolation::DuplicateParentEdge {
                    node_id: node.id().clone(),
                }),
            }
        }

        // Walk parent links from the root; whatever is left over sits on a cycle or
        // hangs below a missing parent.
        if let [root_id] = root_ids.as_slice() {
            let mut children = BTreeMap::<&NodeId, Vec<&NodeId>>::new();
            for node in &self.nodes {
                if let Some(parent_id) = node.parent_id() {
                    children.entry(parent_id).or_default().push(node.id());
                }
            }

            let mut reached = BTreeSet::<&NodeId>::new();
            let mut queue = VecDeque::from([root_id]);
            while let Some(node_id) = queue.pop_front() {
                if !reached.insert(node_id) {
                    continue;
                }
                if let Some(child_ids) = children.get(node_id) {
                    queue.extend(child_ids.iter().copied());
                }
            }

            for node in &self.nodes {
                let parent_missing = node
                    .parent_id()
                    .is_some_and(|parent_id| !node_ids.contains(parent_id));
                if !reached.contains(node.id()) && !parent_missing {
                    violations.push(TreeViolation::Unreachable {
                        node_id: node.id().clone(),
                    });
                }
            }
        }

        violations
    }
}

fn root_node_id() -> NodeId {
    NodeId::new(ROOT_NODE_ID).expect("root node id is a valid id segment")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeViolation {
    NoRoot,
    MultipleRoots { root_ids: Vec<NodeId> },
    DuplicateNodeId { node_id: NodeId },
    DuplicateEdgeId { edge_id: EdgeId },
    MissingParent { node_id: NodeId, parent_id: NodeId },
    MissingParentEdge { node_id: NodeId },
    DuplicateParentEdge { node_id: NodeId },
    MismatchedParentEdge { node_id: NodeId, edge_id: EdgeId },
    DanglingEdge { edge_id: EdgeId },
    Unreachable { node_id: NodeId },
}

impl fmt::Display for TreeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRoot => f.write_str("graph has no root node"),
            Self::MultipleRoots { root_ids } => {
                write!(f, "graph has {} root nodes", root_ids.len())
            }
            Self::DuplicateNodeId { node_id } => write!(f, "duplicate node id {node_id}"),
            Self::DuplicateEdgeId { edge_id } => write!(f, "duplicate edge id {edge_id}"),
            Self::MissingParent { node_id, parent_id } => {
                write!(f, "node {node_id} references missing parent {parent_id}")
            }
            Self::MissingParentEdge { node_id } => {
                write!(f, "node {node_id} has no edge from its parent")
            }
            Self::DuplicateParentEdge { node_id } => {
                write!(f, "node {node_id} is the target of more than one edge")
            }
            Self::MismatchedParentEdge { node_id, edge_id } => write!(
                f,
                "edge {edge_id} targets node {node_id} but does not start at its parent"
            ),
            Self::DanglingEdge { edge_id } => {
                write!(f, "edge {edge_id} references a missing node")
            }
            Self::Unreachable { node_id } => {
                write!(f, "node {node_id} is not reachable from the root")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Graph, TreeViolation, INITIAL_ROOT_LABEL, ROOT_NODE_ID};
    use crate::model::fixtures::{eid, nid, three_level_tree};
    use crate::model::{Edge, Node, Position};

    #[test]
    fn new_graph_is_a_single_unbound_root() {
        let graph = Graph::new();

        assert_eq!(graph.nodes().len(), 1);
        assert!(graph.edges().is_empty());
        assert_eq!(graph.current_diagram_id(), None);

        let root = graph.root().expect("root");
        assert_eq!(root.id().as_str(), ROOT_NODE_ID);
        assert_eq!(root.label(), INITIAL_ROOT_LABEL);
        assert_eq!(root.position(), Position::ORIGIN);
        assert!(graph.tree_violations().is_empty());
        assert!(!graph.is_dirty());
    }

    #[test]
    fn valid_tree_has_no_violations() {
        let graph = three_level_tree();
        assert_eq!(graph.tree_violations(), Vec::new());

        let root_id = nid("root");
        let children = graph.children_of(&root_id).map(|n| n.id().clone()).collect::<Vec<_>>();
        assert_eq!(children, vec![nid("a"), nid("b")]);
    }

    #[test]
    fn absolute_position_sums_the_parent_chain() {
        let graph = three_level_tree();

        assert_eq!(graph.absolute_position(&nid("root")), Some(Position::ORIGIN));
        assert_eq!(graph.absolute_position(&nid("a")), Some(Position::new(120.0, -40.0)));
        assert_eq!(graph.absolute_position(&nid("c")), Some(Position::new(360.0, -80.0)));
        assert_eq!(graph.absolute_position(&nid("ghost")), None);
    }

    #[test]
    fn absolute_position_gives_up_on_parent_loops() {
        let graph = Graph::from_parts(
            vec![
                Node::new(nid("x"), "X", Position::ORIGIN, Some(nid("y"))),
                Node::new(nid("y"), "Y", Position::ORIGIN, Some(nid("x"))),
            ],
            Vec::new(),
        );
        assert_eq!(graph.absolute_position(&nid("x")), None);
    }

    #[test]
    fn reports_orphan_and_dangling_edge() {
        let mut graph = three_level_tree();
        graph.nodes_mut().retain(|node| node.id() != &nid("a"));

        let violations = graph.tree_violations();
        assert!(violations.contains(&TreeViolation::DanglingEdge { edge_id: eid("e:root-a") }));
        assert!(violations.contains(&TreeViolation::DanglingEdge { edge_id: eid("e:a-c") }));
        assert!(violations.contains(&TreeViolation::MissingParent {
            node_id: nid("c"),
            parent_id: nid("a"),
        }));
    }

    #[test]
    fn reports_missing_and_duplicate_parent_edges() {
        let mut graph = three_level_tree();
        graph.edges_mut().retain(|edge| edge.id() != &eid("e:root-b"));
        graph
            .edges_mut()
            .push(Edge::new(eid("e:a-c-again"), nid("a"), nid("c")));

        let violations = graph.tree_violations();
        assert!(violations.contains(&TreeViolation::MissingParentEdge { node_id: nid("b") }));
        assert!(violations.contains(&TreeViolation::DuplicateParentEdge { node_id: nid("c") }));
    }

    #[test]
    fn reports_cycles_as_unreachable() {
        let nodes = vec![
            Node::root(nid("root"), "Root"),
            Node::new(nid("x"), "X", Position::ORIGIN, Some(nid("y"))),
            Node::new(nid("y"), "Y", Position::ORIGIN, Some(nid("x"))),
        ];
        let edges = vec![
            Edge::new(eid("e:y-x"), nid("y"), nid("x")),
            Edge::new(eid("e:x-y"), nid("x"), nid("y")),
        ];
        let graph = Graph::from_parts(nodes, edges);

        let violations = graph.tree_violations();
        assert!(violations.contains(&TreeViolation::Unreachable { node_id: nid("x") }));
        assert!(violations.contains(&TreeViolation::Unreachable { node_id: nid("y") }));
    }

    #[test]
    fn reports_missing_and_extra_roots() {
        let graph = Graph::from_parts(Vec::new(), Vec::new());
        assert_eq!(graph.tree_violations(), vec![TreeViolation::NoRoot]);

        let graph = Graph::from_parts(
            vec![Node::root(nid("r1"), "R1"), Node::root(nid("r2"), "R2")],
            Vec::new(),
        );
        assert_eq!(
            graph.tree_violations(),
            vec![TreeViolation::MultipleRoots { root_ids: vec![nid("r1"), nid("r2")] }]
        );
    }

    #[test]
    fn reset_discards_content_and_bumps_generation() {
        let mut graph = three_level_tree();
        graph.bind_diagram_id(crate::model::RecordId::new("rec1").expect("record id"));
        let generation = graph.generation();

        graph.reset();

        assert_eq!(graph.nodes().len(), 1);
        assert!(graph.edges().is_empty());
        assert_eq!(graph.current_diagram_id(), None);
        assert_eq!(graph.root().expect("root").label(), super::NEW_DIAGRAM_ROOT_LABEL);
        assert_eq!(graph.generation(), generation + 1);
        assert!(!graph.is_dirty());
    }
}
