// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! JSON shape of diagram records.
//!
//! Field names are camelCase. Records written by the older web client use
//! `parentNode`, `source`, `target` and nest the label under `data`; those are accepted on
//! read and normalized on the next write.

use serde::{Deserialize, Serialize};

use crate::model::{Edge, EdgeId, Id, IdError, Node, NodeId, Position, RecordId};

use super::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionJson {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeDataJson {
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeJson {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing)]
    pub data: Option<NodeDataJson>,
    pub position: PositionJson,
    #[serde(default, alias = "parentNode", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl NodeJson {
    fn label(&self) -> &str {
        self.label
            .as_deref()
            .or_else(|| self.data.as_ref().and_then(|data| data.label.as_deref()))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeJson {
    pub id: String,
    #[serde(alias = "source")]
    pub source_id: String,
    #[serde(alias = "target")]
    pub target_id: String,
}

/// Writable part of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramData {
    pub name: String,
    pub nodes: Vec<NodeJson>,
    pub edges: Vec<EdgeJson>,
}

/// A stored diagram. `created`/`updated` are unix milliseconds assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<NodeJson>,
    #[serde(default)]
    pub edges: Vec<EdgeJson>,
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub updated: u64,
}

impl DiagramRecord {
    pub(crate) fn from_data(id: String, data: DiagramData, created: u64, updated: u64) -> Self {
        Self {
            id,
            name: data.name,
            nodes: data.nodes,
            edges: data.edges,
            created,
            updated,
        }
    }

    pub fn record_id(&self) -> Result<RecordId, StoreError> {
        parse_id("id", &self.id)
    }
}

pub fn diagram_data(name: &str, nodes: &[Node], edges: &[Edge]) -> DiagramData {
    DiagramData {
        name: name.to_owned(),
        nodes: nodes.iter().map(node_to_json).collect(),
        edges: edges.iter().map(edge_to_json).collect(),
    }
}

/// Decodes a fetched record back into graph elements, validating every id.
pub fn decode_graph(record: &DiagramRecord) -> Result<(Vec<Node>, Vec<Edge>), StoreError> {
    let nodes = record
        .nodes
        .iter()
        .map(node_from_json)
        .collect::<Result<Vec<_>, _>>()?;
    let edges = record
        .edges
        .iter()
        .map(edge_from_json)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((nodes, edges))
}

fn node_to_json(node: &Node) -> NodeJson {
    let position = node.position();
    NodeJson {
        id: node.id().to_string(),
        label: Some(node.label().to_owned()),
        data: None,
        position: PositionJson {
            x: position.x,
            y: position.y,
        },
        parent_id: node.parent_id().map(ToString::to_string),
    }
}

fn edge_to_json(edge: &Edge) -> EdgeJson {
    EdgeJson {
        id: edge.id().to_string(),
        source_id: edge.source_id().to_string(),
        target_id: edge.target_id().to_string(),
    }
}

fn node_from_json(json: &NodeJson) -> Result<Node, StoreError> {
    let id: NodeId = parse_id("nodes[].id", &json.id)?;
    let parent_id = json
        .parent_id
        .as_deref()
        .map(|raw| parse_id("nodes[].parentId", raw))
        .transpose()?;
    Ok(Node::new(
        id,
        json.label(),
        Position::new(json.position.x, json.position.y),
        parent_id,
    ))
}

fn edge_from_json(json: &EdgeJson) -> Result<Edge, StoreError> {
    let id: EdgeId = parse_id("edges[].id", &json.id)?;
    let source_id: NodeId = parse_id("edges[].sourceId", &json.source_id)?;
    let target_id: NodeId = parse_id("edges[].targetId", &json.target_id)?;
    Ok(Edge::new(id, source_id, target_id))
}

fn parse_id<T>(field: &'static str, raw: &str) -> Result<Id<T>, StoreError> {
    Id::new(raw.to_owned()).map_err(|source: IdError| StoreError::InvalidId {
        field,
        value: raw.to_owned(),
        source: Box::new(source),
    })
}
