/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! JSON query descriptions.
//!
//! ```json
//! {
//!   "nodes": [
//!     {"collection": "orders", "cardinality": 5000},
//!     {"collection": "customers", "cardinality": 200,
//!      "indexes": [{"name": "id_1", "key_pattern": ["id"]}]}
//!   ],
//!   "edges": [
//!     {"left": 0, "right": 1, "left_field": "customer_id", "right_field": "id", "selectivity": 0.005}
//!   ],
//!   "strategy": {"plan_shape": "ZIG_ZAG", "mode": "CHEAPEST"}
//! }
//! ```

use crate::catalog::{InMemoryIndexCatalog, IndexEntry};
use crate::cost::{DefaultJoinCostEstimator, JoinCostEstimator, SelectivityCardinalityEstimator};
use crate::enumerator::{JoinPlanTable, PlanEnumerator};
use crate::error::{EnumeratorResult, QueryLoadError};
use crate::graph::{AccessPath, InMemoryJoinGraph, JoinGraph};
use crate::strategy::EnumerationStrategy;
use serde::Deserialize;
use shared::NodeId;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct NodeDescription {
    pub collection: String,
    pub cardinality: f64,
    #[serde(default)]
    pub indexes: Vec<IndexEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeDescription {
    pub left: NodeId,
    pub right: NodeId,
    pub left_field: String,
    pub right_field: String,
    pub selectivity: Option<f64>,
}

/// Query description as written on disk
#[derive(Debug, Clone, Deserialize)]
pub struct JoinQuery {
    pub nodes: Vec<NodeDescription>,
    #[serde(default)]
    pub edges: Vec<EdgeDescription>,
    pub strategy: Option<EnumerationStrategy>,
}

impl JoinQuery {
    pub fn from_json_str(json: &str) -> Result<Self, QueryLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, QueryLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Builds the join graph, index catalog and cardinality model
    pub fn load(&self) -> Result<LoadedQuery, QueryLoadError> {
        let mut graph = InMemoryJoinGraph::new();
        let mut indexes = InMemoryIndexCatalog::new();
        let mut base_cardinalities = Vec::with_capacity(self.nodes.len());

        for node in &self.nodes {
            let id = graph.add_node(AccessPath::new(node.collection.clone()))?;
            if node.cardinality.is_nan() || node.cardinality <= 0.0 {
                return Err(QueryLoadError::InvalidCardinality {
                    node: id,
                    cardinality: node.cardinality,
                });
            }
            base_cardinalities.push(node.cardinality);
            for index in &node.indexes {
                indexes.add_index(id, index.clone());
            }
        }

        let mut selectivities = Vec::with_capacity(self.edges.len());
        for edge in &self.edges {
            let id = graph.add_simple_equality_edge(
                edge.left,
                edge.right,
                &edge.left_field,
                &edge.right_field,
            )?;
            let selectivity = edge
                .selectivity
                .unwrap_or(SelectivityCardinalityEstimator::DEFAULT_SELECTIVITY);
            if selectivity.is_nan() || selectivity <= 0.0 || selectivity > 1.0 {
                return Err(QueryLoadError::InvalidSelectivity { edge: id, selectivity });
            }
            selectivities.push(selectivity);
        }

        let mut cardinality = SelectivityCardinalityEstimator::new(base_cardinalities);
        for (edge, selectivity) in graph.edges().iter().zip(selectivities) {
            cardinality.add_edge_selectivity(edge.nodes(), selectivity);
        }

        Ok(LoadedQuery {
            graph,
            indexes,
            cardinality,
            strategy: self.strategy.clone(),
        })
    }
}

/// A query ready to be enumerated
#[derive(Debug)]
pub struct LoadedQuery {
    pub graph: InMemoryJoinGraph,
    pub indexes: InMemoryIndexCatalog,
    pub cardinality: SelectivityCardinalityEstimator,
    pub strategy: Option<EnumerationStrategy>,
}

impl LoadedQuery {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, QueryLoadError> {
        JoinQuery::from_file(path)?.load()
    }

    pub fn from_json_str(json: &str) -> Result<Self, QueryLoadError> {
        JoinQuery::from_json_str(json)?.load()
    }

    /// Enumerates with the default cost model, or with no cost model when `with_cost` is false
    pub fn enumerate(
        &self,
        strategy: &EnumerationStrategy,
        with_cost: bool,
    ) -> EnumeratorResult<JoinPlanTable> {
        let coster = DefaultJoinCostEstimator::new(&self.cardinality);
        let coster: Option<&dyn JoinCostEstimator> = if with_cost { Some(&coster) } else { None };
        let enumerator = PlanEnumerator::new(
            &self.graph,
            &self.indexes,
            &self.cardinality,
            coster,
            strategy,
        )?;
        Ok(enumerator.enumerate_join_subsets())
    }
}
