// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A mind map is a tree of labeled nodes plus one parent→child edge per non-root node,
//! optionally bound to a remote diagram record.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod graph;
pub mod ids;
pub mod node;

pub use graph::{
    Graph, TreeViolation, INITIAL_ROOT_LABEL, NEW_DIAGRAM_ROOT_LABEL, ROOT_NODE_ID,
};
pub use ids::{EdgeId, Id, IdError, NodeId, RecordId};
pub use node::{Edge, ElementRef, Node, Position};
