/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

#![allow(dead_code)]

use joinorder::*;

/// Join graph fixture: node `i` reads collection `nss{i}` with `i * 1000 + 10` rows
/// and joins on field `a{i}`; every edge is 10% selective.
pub struct TestQuery {
    pub graph: InMemoryJoinGraph,
    pub indexes: InMemoryIndexCatalog,
    base_cardinalities: Vec<f64>,
}

impl TestQuery {
    pub fn new(num_nodes: usize, with_indexes: bool) -> Self {
        let mut graph = InMemoryJoinGraph::new();
        let mut indexes = InMemoryIndexCatalog::new();
        let mut base_cardinalities = Vec::new();
        for i in 0..num_nodes {
            let node = graph.add_node(AccessPath::new(format!("nss{}", i))).unwrap();
            base_cardinalities.push(i as f64 * 1000.0 + 10.0);
            if with_indexes {
                let field = format!("a{}", i);
                indexes.add_index(node, IndexEntry::new(format!("{}_1", field), &[field.as_str()]));
            }
        }
        Self {
            graph,
            indexes,
            base_cardinalities,
        }
    }

    /// Every pair of nodes joined by an edge
    pub fn fully_connected(num_nodes: usize, with_indexes: bool) -> Self {
        let mut query = Self::new(num_nodes, with_indexes);
        for i in 1..num_nodes {
            for j in 0..i {
                query.add_edge(j, i);
            }
        }
        query
    }

    pub fn add_edge(&mut self, left: NodeId, right: NodeId) {
        self.graph
            .add_simple_equality_edge(left, right, &format!("a{}", left), &format!("a{}", right))
            .unwrap();
    }

    pub fn cardinality(&self) -> SelectivityCardinalityEstimator {
        SelectivityCardinalityEstimator::for_graph(&self.graph, self.base_cardinalities.clone())
    }

    pub fn try_enumerate(&self, strategy: &EnumerationStrategy) -> Result<JoinPlanTable, EnumeratorError> {
        let cardinality = self.cardinality();
        let coster = DefaultJoinCostEstimator::new(&cardinality);
        let enumerator = PlanEnumerator::new(
            &self.graph,
            &self.indexes,
            &cardinality,
            Some(&coster),
            strategy,
        )?;
        Ok(enumerator.enumerate_join_subsets())
    }

    pub fn enumerate(&self, strategy: &EnumerationStrategy) -> JoinPlanTable {
        self.try_enumerate(strategy).unwrap()
    }

    pub fn enumerate_without_cost(&self, strategy: &EnumerationStrategy) -> JoinPlanTable {
        let cardinality = self.cardinality();
        PlanEnumerator::new(&self.graph, &self.indexes, &cardinality, None, strategy)
            .unwrap()
            .enumerate_join_subsets()
    }
}

pub fn strategy(shape: PlanTreeShape, prune_hj: bool, mode: PlanEnumerationMode) -> EnumerationStrategy {
    EnumerationStrategy::new(
        shape,
        PerSubsetLevelEnumerationMode::from_mode(mode).unwrap(),
        prune_hj,
    )
}

pub fn cheapest(shape: PlanTreeShape) -> EnumerationStrategy {
    strategy(shape, false, PlanEnumerationMode::Cheapest)
}

pub fn schedule(modes: &[(usize, PlanEnumerationMode)]) -> PerSubsetLevelEnumerationMode {
    PerSubsetLevelEnumerationMode::new(
        modes
            .iter()
            .map(|&(level, mode)| SubsetLevelMode::new(level, mode))
            .collect(),
    )
    .unwrap()
}

pub fn hinted(hints: &[(NodeId, JoinMethod, bool)]) -> PerSubsetLevelEnumerationMode {
    PerSubsetLevelEnumerationMode::new(
        hints
            .iter()
            .enumerate()
            .map(|(level, &(node, method, left))| {
                SubsetLevelMode::hinted(level, JoinHint::new(node, method, left))
            })
            .collect(),
    )
    .unwrap()
}

pub fn bits(subsets: &[JoinSubset], num_nodes: usize) -> Vec<String> {
    subsets.iter().map(|s| s.subset.to_bit_string(num_nodes)).collect()
}
