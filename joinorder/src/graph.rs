/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use shared::{NodeId, NodeSet, MAX_NODES};

/// How a base collection is read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPath {
    pub collection: String,
}

impl AccessPath {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
        }
    }
}

/// Equality between a field of the left side and a field of the right side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinPredicate {
    pub left_field: String,
    pub right_field: String,
}

/// Join condition connecting two disjoint groups of nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinEdge {
    pub left: NodeSet,
    pub right: NodeSet,
    pub predicates: Vec<JoinPredicate>,
}

impl JoinEdge {
    pub fn nodes(&self) -> NodeSet {
        self.left | self.right
    }

    /// True if the edge has one endpoint in `a` and the other in `b`
    pub fn connects(&self, a: &NodeSet, b: &NodeSet) -> bool {
        (self.left.is_subset_of(a) && self.right.is_subset_of(b))
            || (self.left.is_subset_of(b) && self.right.is_subset_of(a))
    }

    /// Fields the predicates of this edge reference on `node`'s side
    pub fn fields_for(&self, node: NodeId) -> Vec<&str> {
        if self.left.contains(node) {
            self.predicates.iter().map(|p| p.left_field.as_str()).collect()
        } else if self.right.contains(node) {
            self.predicates.iter().map(|p| p.right_field.as_str()).collect()
        } else {
            Vec::new()
        }
    }
}

/// Position of an edge in [`JoinGraph::edges`]
pub type EdgeId = usize;

/// Read-only view of the query's join graph
pub trait JoinGraph {
    fn num_nodes(&self) -> usize;

    fn access_path(&self, node: NodeId) -> &AccessPath;

    fn edges(&self) -> &[JoinEdge];

    /// Edges connecting `left` with `right`, in edge order
    fn join_edges(&self, left: &NodeSet, right: &NodeSet) -> Vec<EdgeId> {
        self.edges()
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.connects(left, right))
            .map(|(id, _)| id)
            .collect()
    }

    fn edge(&self, id: EdgeId) -> &JoinEdge {
        &self.edges()[id]
    }
}

/// Join graph held entirely in memory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryJoinGraph {
    nodes: Vec<AccessPath>,
    edges: Vec<JoinEdge>,
}

impl InMemoryJoinGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, access_path: AccessPath) -> Result<NodeId, GraphError> {
        if self.nodes.len() >= MAX_NODES {
            return Err(GraphError::TooManyNodes);
        }
        self.nodes.push(access_path);
        Ok(self.nodes.len() - 1)
    }

    pub fn add_edge(&mut self, edge: JoinEdge) -> Result<EdgeId, GraphError> {
        for node in edge.nodes().iter() {
            self.check_node(node)?;
        }
        if let Some(node) = edge.left.intersection(edge.right).iter().next() {
            return Err(GraphError::SelfJoin(node));
        }
        self.edges.push(edge);
        Ok(self.edges.len() - 1)
    }

    /// Adds the edge `left.left_field = right.right_field`
    pub fn add_simple_equality_edge(
        &mut self,
        left: NodeId,
        right: NodeId,
        left_field: &str,
        right_field: &str,
    ) -> Result<EdgeId, GraphError> {
        self.check_node(left)?;
        self.check_node(right)?;
        self.add_edge(JoinEdge {
            left: NodeSet::singleton(left),
            right: NodeSet::singleton(right),
            predicates: vec![JoinPredicate {
                left_field: left_field.to_string(),
                right_field: right_field.to_string(),
            }],
        })
    }

    fn check_node(&self, node: NodeId) -> Result<(), GraphError> {
        if node < self.nodes.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownNode(node))
        }
    }
}

impl JoinGraph for InMemoryJoinGraph {
    fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn access_path(&self, node: NodeId) -> &AccessPath {
        &self.nodes[node]
    }

    fn edges(&self) -> &[JoinEdge] {
        &self.edges
    }
}
