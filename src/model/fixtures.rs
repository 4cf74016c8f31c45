// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::graph::Graph;
use super::ids::{EdgeId, NodeId};
use super::node::{Edge, Node, Position};

pub(crate) fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

pub(crate) fn eid(value: &str) -> EdgeId {
    EdgeId::new(value).expect("edge id")
}

/// root ─┬─ a ── c
///       └─ b
pub(crate) fn three_level_tree() -> Graph {
    let nodes = vec![
        Node::root(nid("root"), "Mind Map"),
        Node::new(nid("a"), "A", Position::new(120.0, -40.0), Some(nid("root"))),
        Node::new(nid("b"), "B", Position::new(120.0, 40.0), Some(nid("root"))),
        Node::new(nid("c"), "C", Position::new(240.0, -40.0), Some(nid("a"))),
    ];
    let edges = vec![
        Edge::new(eid("e:root-a"), nid("root"), nid("a")),
        Edge::new(eid("e:root-b"), nid("root"), nid("b")),
        Edge::new(eid("e:a-c"), nid("a"), nid("c")),
    ];

    Graph::from_parts(nodes, edges)
}
