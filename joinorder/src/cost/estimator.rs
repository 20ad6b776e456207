/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{CardinalityEstimator, Cost};
use crate::catalog::IndexEntry;
use crate::plan::PlanNode;
use shared::{NodeId, NodeSet};

/// Cost hooks the plan generator calls for every candidate plan
pub trait JoinCostEstimator {
    fn cost_base_access(&self, node: NodeId) -> Cost;

    fn cost_nested_loop(&self, left: &PlanNode, right: &PlanNode) -> Cost;

    fn cost_hash_join(&self, left: &PlanNode, right: &PlanNode) -> Cost;

    /// Cost of probing `index` on `right_node` once per row produced by `left`
    fn cost_indexed_nested_loop(&self, left: &PlanNode, right_node: NodeId, index: &IndexEntry)
        -> Cost;
}

/// Per-row cost constants for the default model
pub struct CostConstants;

impl CostConstants {
    pub const COST_PER_ROW_SCAN: f64 = 1.0;
    pub const COST_PER_ROW_HASH_BUILD: f64 = 2.0;
    pub const COST_PER_ROW_HASH_PROBE: f64 = 1.0;
    pub const COST_PER_INDEX_PROBE: f64 = 3.0;
}

/// Cost model driven by a cardinality estimator
pub struct DefaultJoinCostEstimator<'a> {
    cardinality: &'a dyn CardinalityEstimator,
}

impl<'a> DefaultJoinCostEstimator<'a> {
    pub fn new(cardinality: &'a dyn CardinalityEstimator) -> Self {
        Self { cardinality }
    }

    fn rows(&self, plan: &PlanNode) -> f64 {
        self.cardinality.estimate_or_get_cached(plan.subset()).value()
    }
}

impl<'a> JoinCostEstimator for DefaultJoinCostEstimator<'a> {
    fn cost_base_access(&self, node: NodeId) -> Cost {
        let rows = self
            .cardinality
            .estimate_or_get_cached(NodeSet::singleton(node))
            .value();
        Cost(rows * CostConstants::COST_PER_ROW_SCAN)
    }

    fn cost_nested_loop(&self, left: &PlanNode, right: &PlanNode) -> Cost {
        // The inner side is re-read for every outer row
        left.cost() + right.cost() * self.rows(left)
    }

    fn cost_hash_join(&self, left: &PlanNode, right: &PlanNode) -> Cost {
        left.cost()
            + right.cost()
            + Cost(self.rows(left) * CostConstants::COST_PER_ROW_HASH_BUILD)
            + Cost(self.rows(right) * CostConstants::COST_PER_ROW_HASH_PROBE)
    }

    fn cost_indexed_nested_loop(
        &self,
        left: &PlanNode,
        _right_node: NodeId,
        _index: &IndexEntry,
    ) -> Cost {
        left.cost() + Cost(self.rows(left) * CostConstants::COST_PER_INDEX_PROBE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::SelectivityCardinalityEstimator;
    use crate::plan::PlanRegistry;
    use shared::JoinMethod;

    #[test]
    fn test_smaller_build_side_is_cheaper() {
        let cards = SelectivityCardinalityEstimator::new(vec![10.0, 1010.0]);
        let coster = DefaultJoinCostEstimator::new(&cards);
        let mut registry = PlanRegistry::new();
        let a = registry.register_base_node(0, "a", coster.cost_base_access(0));
        let b = registry.register_base_node(1, "b", coster.cost_base_access(1));

        let ab = coster.cost_hash_join(registry.get(a), registry.get(b));
        let ba = coster.cost_hash_join(registry.get(b), registry.get(a));
        assert_eq!(ab, Cost(2050.0));
        assert_eq!(ba, Cost(3050.0));
        assert_eq!(coster.cost_nested_loop(registry.get(a), registry.get(b)), Cost(10110.0));

        let joined = registry.register_joining_node(JoinMethod::Hash, a, b, ab);
        assert_eq!(registry.subset_of(joined), NodeSet::full(2));
        let index = IndexEntry::new("id", &["id"]);
        let inlj = coster.cost_indexed_nested_loop(registry.get(a), 1, &index);
        assert_eq!(inlj, Cost(40.0));
    }
}
