// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::{EdgeId, NodeId};

/// Canvas-space coordinate.
///
/// A node's position is relative to its parent's origin; the root's is relative to the
/// canvas origin. Absolute positions are the sum along the parent chain.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite. JSON has no encoding for NaN or infinity.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn offset_by(self, origin: Position) -> Self {
        Self::new(self.x + origin.x, self.y + origin.y)
    }
}

/// A labelled mind-map node. `position` is parent-relative (see [`Position`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    label: String,
    position: Position,
    parent_id: Option<NodeId>,
}

impl Node {
    pub fn new(
        id: NodeId,
        label: impl Into<String>,
        position: Position,
        parent_id: Option<NodeId>,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            position,
            parent_id,
        }
    }

    pub fn root(id: NodeId, label: impl Into<String>) -> Self {
        Self::new(id, label, Position::ORIGIN, None)
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn parent_id(&self) -> Option<&NodeId> {
        self.parent_id.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub(crate) fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

/// Connector from a parent node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    id: EdgeId,
    source_id: NodeId,
    target_id: NodeId,
}

impl Edge {
    pub fn new(id: EdgeId, source_id: NodeId, target_id: NodeId) -> Self {
        Self {
            id,
            source_id,
            target_id,
        }
    }

    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    pub fn source_id(&self) -> &NodeId {
        &self.source_id
    }

    pub fn target_id(&self) -> &NodeId {
        &self.target_id
    }
}

/// Reference to either kind of graph element, used in change deltas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementRef {
    Node(NodeId),
    Edge(EdgeId),
}
