// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mind-map graph core: a rooted tree of labelled nodes, the edits a canvas makes to it,
//! and save/load against a document store.
//!
//! - [`model`]: graph state and typed ids.
//! - [`ops`]: change batches, child creation, relabel, subtree removal.
//! - [`canvas`] and [`ui`]: pointer gestures resolved into canvas positions.
//! - [`store`] and [`persist`]: the record store contract and the save/load gateway.

pub mod canvas;
pub mod config;
pub mod model;
pub mod ops;
pub mod persist;
pub mod store;
pub mod ui;
