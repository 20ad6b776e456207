/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::Cardinality;
use crate::graph::JoinGraph;
use rustc_hash::FxHashMap;
use shared::NodeSet;
use std::cell::RefCell;

/// Output cardinality of joining a set of nodes
pub trait CardinalityEstimator {
    /// Memoization is up to the implementation; the enumerator calls this freely.
    fn estimate_or_get_cached(&self, nodes: NodeSet) -> Cardinality;
}

/// Estimates a subset as the product of its base cardinalities and the
/// selectivities of every edge it fully contains
#[derive(Debug)]
pub struct SelectivityCardinalityEstimator {
    base: Vec<f64>,
    edges: Vec<(NodeSet, f64)>,
    cache: RefCell<FxHashMap<NodeSet, Cardinality>>,
}

impl SelectivityCardinalityEstimator {
    pub const DEFAULT_SELECTIVITY: f64 = 0.1;

    pub fn new(base_cardinalities: Vec<f64>) -> Self {
        Self {
            base: base_cardinalities,
            edges: Vec::new(),
            cache: RefCell::new(FxHashMap::default()),
        }
    }

    /// Estimator with the default selectivity on every edge of `graph`
    pub fn for_graph(graph: &dyn JoinGraph, base_cardinalities: Vec<f64>) -> Self {
        let mut estimator = Self::new(base_cardinalities);
        for edge in graph.edges() {
            estimator.add_edge_selectivity(edge.nodes(), Self::DEFAULT_SELECTIVITY);
        }
        estimator
    }

    pub fn add_edge_selectivity(&mut self, nodes: NodeSet, selectivity: f64) {
        self.edges.push((nodes, selectivity));
        self.cache.borrow_mut().clear();
    }

    pub fn base_cardinality(&self, node: usize) -> f64 {
        self.base.get(node).copied().unwrap_or(0.0)
    }

    fn estimate(&self, nodes: NodeSet) -> Cardinality {
        let rows: f64 = nodes.iter().map(|n| self.base_cardinality(n)).product();
        let selectivity: f64 = self
            .edges
            .iter()
            .filter(|(edge_nodes, _)| edge_nodes.is_subset_of(&nodes))
            .map(|(_, s)| *s)
            .product();
        Cardinality(rows * selectivity)
    }
}

impl CardinalityEstimator for SelectivityCardinalityEstimator {
    fn estimate_or_get_cached(&self, nodes: NodeSet) -> Cardinality {
        if let Some(cached) = self.cache.borrow().get(&nodes) {
            return *cached;
        }
        let estimate = self.estimate(nodes);
        self.cache.borrow_mut().insert(nodes, estimate);
        estimate
    }
}
