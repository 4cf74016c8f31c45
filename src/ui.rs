// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Gesture state shared between the canvas callbacks and the graph core.
//!
//! A connect gesture starts when the user presses a node's handle and ends on pointer
//! release. Releasing over a node focuses that node's label editor; releasing over the
//! empty pane branches a new child from the node the gesture started on.

use tracing::debug;

use crate::canvas::{resolve_child_position, LayoutSource, ScreenPoint, ViewTransform};
use crate::model::{Graph, NodeId, Position};
use crate::ops::{add_child, ApplyError, ChildCreated};

/// What the pointer was over when it was released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Node(NodeId),
    Pane,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GestureEnd {
    pub pointer: ScreenPoint,
    pub target: DropTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Move keyboard focus into this node's label input.
    FocusLabel { node_id: NodeId },
    CreateChild { parent_id: NodeId, position: Position },
    Ignored,
}

impl GestureOutcome {
    /// Performs graph edits implied by the outcome. Only `CreateChild` mutates.
    pub fn apply(&self, graph: &mut Graph) -> Result<Option<ChildCreated>, ApplyError> {
        match self {
            Self::CreateChild { parent_id, position } => {
                add_child(graph, parent_id, *position).map(Some)
            }
            Self::FocusLabel { .. } | Self::Ignored => Ok(None),
        }
    }
}

/// Tracks the node a connect gesture started from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectGesture {
    connecting_node_id: Option<NodeId>,
}

impl ConnectGesture {
    pub fn start(&mut self, node_id: NodeId) {
        self.connecting_node_id = Some(node_id);
    }

    pub fn connecting_node_id(&self) -> Option<&NodeId> {
        self.connecting_node_id.as_ref()
    }

    /// Classifies a pointer release and clears the gesture.
    pub fn end(
        &mut self,
        end: &GestureEnd,
        pane_origin: ScreenPoint,
        view: ViewTransform,
        layouts: &impl LayoutSource,
    ) -> GestureOutcome {
        let connecting = self.connecting_node_id.take();

        match &end.target {
            DropTarget::Node(node_id) => GestureOutcome::FocusLabel {
                node_id: node_id.clone(),
            },
            DropTarget::Pane => {
                let Some(parent_id) = connecting else {
                    return GestureOutcome::Ignored;
                };
                let Some(layout) = layouts.layout_of(&parent_id) else {
                    debug!(parent = %parent_id, "gesture parent is not rendered; ignoring");
                    return GestureOutcome::Ignored;
                };
                match resolve_child_position(end.pointer, pane_origin, view, &layout) {
                    Some(position) => GestureOutcome::CreateChild { parent_id, position },
                    None => {
                        debug!(parent = %parent_id, "gesture parent has no layout yet; ignoring");
                        GestureOutcome::Ignored
                    }
                }
            }
            DropTarget::Other => GestureOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConnectGesture, DropTarget, GestureEnd, GestureOutcome};
    use crate::canvas::{NodeLayout, ScreenPoint, ViewTransform};
    use crate::model::{Graph, NodeId, Position};

    fn root_id() -> NodeId {
        NodeId::new("root").expect("node id")
    }

    fn root_layout(node_id: &NodeId) -> Option<NodeLayout> {
        (node_id.as_str() == "root")
            .then(|| NodeLayout::measured(Position::new(-50.0, -20.0), 100.0, 40.0))
    }

    fn release(target: DropTarget) -> GestureEnd {
        GestureEnd { pointer: ScreenPoint::new(300.0, 200.0), target }
    }

    #[test]
    fn pane_release_creates_child_of_connecting_node() {
        let mut graph = Graph::new();
        let mut gesture = ConnectGesture::default();
        gesture.start(root_id());

        let outcome = gesture.end(
            &release(DropTarget::Pane),
            ScreenPoint::new(0.0, 0.0),
            ViewTransform::IDENTITY,
            &root_layout,
        );

        assert_eq!(
            outcome,
            GestureOutcome::CreateChild {
                parent_id: root_id(),
                position: Position::new(400.0, 240.0),
            }
        );
        assert_eq!(gesture.connecting_node_id(), None);

        let created = outcome.apply(&mut graph).expect("apply").expect("child created");
        assert_eq!(graph.node(&created.node_id).expect("child").parent_id(), Some(&root_id()));
        assert!(graph.tree_violations().is_empty());
    }

    #[test]
    fn node_release_focuses_the_label() {
        let mut graph = Graph::new();
        let mut gesture = ConnectGesture::default();
        gesture.start(root_id());
        let other = NodeId::new("other").expect("node id");

        let outcome = gesture.end(
            &release(DropTarget::Node(other.clone())),
            ScreenPoint::default(),
            ViewTransform::IDENTITY,
            &root_layout,
        );

        assert_eq!(outcome, GestureOutcome::FocusLabel { node_id: other });
        assert_eq!(outcome.apply(&mut graph).expect("apply"), None);
        assert_eq!(graph.nodes().len(), 1);
    }

    #[test]
    fn release_without_start_or_layout_is_ignored() {
        let mut gesture = ConnectGesture::default();
        let outcome = gesture.end(
            &release(DropTarget::Pane),
            ScreenPoint::default(),
            ViewTransform::IDENTITY,
            &root_layout,
        );
        assert_eq!(outcome, GestureOutcome::Ignored);

        gesture.start(NodeId::new("unrendered").expect("node id"));
        let outcome = gesture.end(
            &release(DropTarget::Pane),
            ScreenPoint::default(),
            ViewTransform::IDENTITY,
            &root_layout,
        );
        assert_eq!(outcome, GestureOutcome::Ignored);

        gesture.start(root_id());
        let outcome = gesture.end(
            &release(DropTarget::Other),
            ScreenPoint::default(),
            ViewTransform::IDENTITY,
            &root_layout,
        );
        assert_eq!(outcome, GestureOutcome::Ignored);
    }
}
