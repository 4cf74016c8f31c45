// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Screen-space to canvas-space conversion for gesture-created nodes.

use crate::model::{NodeId, Position};

/// A point in screen (client) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pan/zoom of the canvas viewport: `screen = canvas * zoom + (x, y)`, relative to the pane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, zoom: 1.0 };

    /// Inverse transform of a pane-relative point. `None` for a degenerate zoom.
    pub fn pane_to_canvas(&self, pane_x: f64, pane_y: f64) -> Option<Position> {
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return None;
        }
        Some(Position::new((pane_x - self.x) / self.zoom, (pane_y - self.y) / self.zoom))
    }
}

/// Measured layout of a rendered node, as reported by the canvas layer.
///
/// Every field is optional because a node that has not been laid out yet has no
/// measurements; a zero width or height counts as unmeasured too.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeLayout {
    pub position_absolute: Option<Position>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl NodeLayout {
    pub fn measured(position_absolute: Position, width: f64, height: f64) -> Self {
        Self {
            position_absolute: Some(position_absolute),
            width: Some(width),
            height: Some(height),
        }
    }

    fn known(&self) -> Option<(Position, f64, f64)> {
        let position = self.position_absolute?;
        let width = self.width.filter(|w| *w != 0.0 && w.is_finite())?;
        let height = self.height.filter(|h| *h != 0.0 && h.is_finite())?;
        Some((position, width, height))
    }
}

/// Lookup of node measurements owned by the rendering layer.
pub trait LayoutSource {
    fn layout_of(&self, node_id: &NodeId) -> Option<NodeLayout>;
}

impl<F> LayoutSource for F
where
    F: Fn(&NodeId) -> Option<NodeLayout>,
{
    fn layout_of(&self, node_id: &NodeId) -> Option<NodeLayout> {
        self(node_id)
    }
}

/// Parent-relative position for a child dropped at `pointer`, or `None` when the parent
/// has not been laid out yet or the inputs do not produce a finite point (the gesture is
/// then ignored).
///
/// The pointer is moved into canvas space (pane offset, then inverse pan/zoom) and then
/// expressed relative to the parent's center, which keeps the new node's handle under
/// the cursor regardless of how large the parent is.
pub fn resolve_child_position(
    pointer: ScreenPoint,
    pane_origin: ScreenPoint,
    view: ViewTransform,
    parent: &NodeLayout,
) -> Option<Position> {
    let (parent_position, width, height) = parent.known()?;
    let canvas = view.pane_to_canvas(pointer.x - pane_origin.x, pointer.y - pane_origin.y)?;

    let position = Position::new(
        canvas.x - parent_position.x + width / 2.0,
        canvas.y - parent_position.y + height / 2.0,
    );
    position.is_finite().then_some(position)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{resolve_child_position, NodeLayout, ScreenPoint, ViewTransform};
    use crate::model::Position;

    fn parent() -> NodeLayout {
        NodeLayout::measured(Position::new(50.0, 20.0), 120.0, 40.0)
    }

    #[test]
    fn identity_view_offsets_by_pane_and_parent_center() {
        let resolved = resolve_child_position(
            ScreenPoint::new(310.0, 140.0),
            ScreenPoint::new(10.0, 40.0),
            ViewTransform::IDENTITY,
            &parent(),
        );

        // canvas (300, 100) - parent (50, 20) + half size (60, 20)
        assert_eq!(resolved, Some(Position::new(310.0, 100.0)));
    }

    #[test]
    fn pan_and_zoom_are_inverted() {
        let view = ViewTransform { x: 100.0, y: -50.0, zoom: 2.0 };

        let resolved = resolve_child_position(
            ScreenPoint::new(500.0, 250.0),
            ScreenPoint::new(0.0, 0.0),
            view,
            &parent(),
        );

        // canvas ((500-100)/2, (250+50)/2) = (200, 150)
        assert_eq!(resolved, Some(Position::new(210.0, 150.0)));
    }

    #[test]
    fn resolution_is_deterministic() {
        let view = ViewTransform { x: 3.5, y: 7.25, zoom: 0.75 };
        let pointer = ScreenPoint::new(123.0, 456.0);
        let pane = ScreenPoint::new(8.0, 16.0);

        let first = resolve_child_position(pointer, pane, view, &parent());
        for _ in 0..10 {
            assert_eq!(resolve_child_position(pointer, pane, view, &parent()), first);
        }
    }

    #[rstest]
    #[case::no_position(NodeLayout { position_absolute: None, ..parent() })]
    #[case::no_width(NodeLayout { width: None, ..parent() })]
    #[case::no_height(NodeLayout { height: None, ..parent() })]
    #[case::zero_width(NodeLayout { width: Some(0.0), ..parent() })]
    #[case::zero_height(NodeLayout { height: Some(0.0), ..parent() })]
    #[case::unmeasured(NodeLayout::default())]
    fn unknown_parent_layout_yields_no_position(
        #[case] layout: NodeLayout,
        #[values((0.0, 0.0), (250.0, -30.0), (1e9, 1e9))] pointer: (f64, f64),
    ) {
        let resolved = resolve_child_position(
            ScreenPoint::new(pointer.0, pointer.1),
            ScreenPoint::default(),
            ViewTransform::IDENTITY,
            &layout,
        );

        assert_eq!(resolved, None);
    }

    #[rstest]
    fn non_finite_inputs_yield_no_position(
        #[values(f64::NAN, f64::INFINITY, f64::NEG_INFINITY)] bad: f64,
    ) {
        let pointers = [ScreenPoint::new(bad, 10.0), ScreenPoint::new(10.0, bad)];
        for pointer in pointers {
            let resolved =
                resolve_child_position(pointer, ScreenPoint::default(), ViewTransform::IDENTITY, &parent());
            assert_eq!(resolved, None, "pointer {pointer:?}");
        }

        let pan = ViewTransform { x: bad, y: 0.0, zoom: 1.0 };
        let resolved =
            resolve_child_position(ScreenPoint::new(1.0, 1.0), ScreenPoint::default(), pan, &parent());
        assert_eq!(resolved, None);

        let parent_at = NodeLayout { position_absolute: Some(Position::new(bad, 0.0)), ..parent() };
        let resolved = resolve_child_position(
            ScreenPoint::new(1.0, 1.0),
            ScreenPoint::default(),
            ViewTransform::IDENTITY,
            &parent_at,
        );
        assert_eq!(resolved, None);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn degenerate_zoom_yields_no_position(#[case] zoom: f64) {
        let view = ViewTransform { x: 0.0, y: 0.0, zoom };
        let resolved =
            resolve_child_position(ScreenPoint::new(1.0, 1.0), ScreenPoint::default(), view, &parent());

        assert_eq!(resolved, None);
    }
}
