/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::catalog::IndexCatalog;
use crate::cost::{CardinalityEstimator, Cost, JoinCostEstimator};
use crate::graph::{EdgeId, JoinGraph};
use crate::plan::{JoinSubset, PlanNodeId, PlanRegistry};
use crate::strategy::{EnumerationStrategy, PlanEnumerationMode, PlanTreeShape, SubsetLevelMode};
use log::trace;
use shared::JoinMethod;

/// Collaborators borrowed for one enumeration run
#[derive(Clone, Copy)]
pub(crate) struct EnumerationContext<'a> {
    pub graph: &'a dyn JoinGraph,
    pub indexes: &'a dyn IndexCatalog,
    pub cardinality: &'a dyn CardinalityEstimator,
    pub coster: Option<&'a dyn JoinCostEstimator>,
    pub strategy: &'a EnumerationStrategy,
}

/// Builds the candidate joins of one level.
///
/// The mode in effect for the level is passed in explicitly; the generator has no
/// other view of the schedule.
pub(crate) struct JoinPlanGenerator<'a, 'r> {
    ctx: EnumerationContext<'a>,
    registry: &'r mut PlanRegistry,
    level_mode: &'a SubsetLevelMode,
}

impl<'a, 'r> JoinPlanGenerator<'a, 'r> {
    pub(crate) fn new(
        ctx: EnumerationContext<'a>,
        registry: &'r mut PlanRegistry,
        level_mode: &'a SubsetLevelMode,
    ) -> Self {
        Self {
            ctx,
            registry,
            level_mode,
        }
    }

    /// Adds to `cur` every plan joining `left` (as left child) with `right` that the
    /// shape, pruning and mode rules allow
    pub(crate) fn enumerate_join_plans(
        &mut self,
        left: &JoinSubset,
        right: &JoinSubset,
        cur: &mut JoinSubset,
    ) {
        if left.plans.is_empty() || right.plans.is_empty() {
            return;
        }

        assert!(
            left.subset | right.subset == cur.subset,
            "join of {} and {} does not produce {}",
            left.subset,
            right.subset,
            cur.subset
        );
        assert!(
            left.subset.is_disjoint(&right.subset),
            "join sides {} and {} overlap",
            left.subset,
            right.subset
        );

        let edges = self.ctx.graph.join_edges(&left.subset, &right.subset);
        if edges.is_empty() {
            return;
        }

        for method in JoinMethod::ENUMERATION_ORDER {
            if !self.can_plan_be_enumerated(method, left, right) {
                continue;
            }
            match method {
                JoinMethod::IndexedNestedLoop => {
                    self.enumerate_indexed_nested_loop(left, right, cur, &edges)
                }
                JoinMethod::Hash | JoinMethod::NestedLoop => match self.level_mode.mode {
                    PlanEnumerationMode::All => self.enumerate_all_plans(method, left, right, cur),
                    PlanEnumerationMode::Cheapest | PlanEnumerationMode::Hinted => {
                        self.enumerate_cheapest_plan(method, left, right, cur)
                    }
                },
            }
        }
    }

    fn can_plan_be_enumerated(&self, method: JoinMethod, left: &JoinSubset, right: &JoinSubset) -> bool {
        if let (PlanEnumerationMode::Hinted, Some(hint)) = (self.level_mode.mode, &self.level_mode.hint) {
            if hint.method != method {
                return false;
            }
        }

        let shape = self.ctx.strategy.plan_shape;
        let left_is_base = left.is_base_collection_access();
        let right_is_base = right.is_base_collection_access();

        // NLJ and INLJ always need a base collection on the inner side
        if (shape == PlanTreeShape::LeftDeep
            || method == JoinMethod::NestedLoop
            || method == JoinMethod::IndexedNestedLoop)
            && !right_is_base
        {
            return false;
        }
        if shape == PlanTreeShape::RightDeep && !left_is_base {
            return false;
        }
        if shape == PlanTreeShape::ZigZag && !left_is_base && !right_is_base {
            return false;
        }

        if self.ctx.strategy.enable_hj_order_pruning
            && method == JoinMethod::Hash
            && (shape == PlanTreeShape::ZigZag || (left_is_base && right_is_base))
        {
            // The mirror orientation is enumerated too, keep only the smaller build side
            let left_card = self.ctx.cardinality.estimate_or_get_cached(left.subset);
            let right_card = self.ctx.cardinality.estimate_or_get_cached(right.subset);
            if left_card > right_card {
                return false;
            }
        }

        true
    }

    fn enumerate_cheapest_plan(
        &mut self,
        method: JoinMethod,
        left: &JoinSubset,
        right: &JoinSubset,
        cur: &mut JoinSubset,
    ) {
        let (Some(left_plan), Some(right_plan)) = (left.best_plan(), right.best_plan()) else {
            return;
        };
        let cost = self.join_cost(method, left_plan, right_plan);
        self.enumerate_join_plan(method, left_plan, right_plan, cost, cur);
    }

    fn enumerate_all_plans(
        &mut self,
        method: JoinMethod,
        left: &JoinSubset,
        right: &JoinSubset,
        cur: &mut JoinSubset,
    ) {
        for &left_plan in &left.plans {
            if self.registry.is_index_probe(left_plan) {
                continue;
            }
            for &right_plan in &right.plans {
                if self.registry.is_index_probe(right_plan) {
                    continue;
                }
                let cost = self.join_cost(method, left_plan, right_plan);
                self.enumerate_join_plan(method, left_plan, right_plan, cost, cur);
            }
        }
    }

    fn enumerate_indexed_nested_loop(
        &mut self,
        left: &JoinSubset,
        right: &JoinSubset,
        cur: &mut JoinSubset,
        edges: &[EdgeId],
    ) {
        let Some(right_node) = right.node_id() else {
            return;
        };
        // Index choice only looks at the first connecting edge
        let edge = self.ctx.graph.edge(edges[0]);
        let Some(index) = self
            .ctx
            .indexes
            .best_index_satisfying_predicates(right_node, edge)
        else {
            return;
        };
        let collection = self.ctx.graph.access_path(right_node).collection.clone();

        let left_plans: Vec<PlanNodeId> = match self.level_mode.mode {
            PlanEnumerationMode::All => left
                .plans
                .iter()
                .copied()
                .filter(|id| !self.registry.is_index_probe(*id))
                .collect(),
            PlanEnumerationMode::Cheapest | PlanEnumerationMode::Hinted => {
                left.best_plan().into_iter().collect()
            }
        };

        for left_plan in left_plans {
            let cost = match self.ctx.coster {
                Some(coster) => {
                    coster.cost_indexed_nested_loop(self.registry.get(left_plan), right_node, &index)
                }
                None => Cost::ZERO,
            };
            // The probe only exists as the right child of a kept join
            let is_best = self.is_best_plan_so_far(cost, cur);
            if !self.keeps_plan(is_best) {
                continue;
            }
            let probe =
                self.registry
                    .register_index_probe_node(right_node, index.clone(), collection.clone());
            self.add_plan_to_subset(JoinMethod::IndexedNestedLoop, left_plan, probe, cost, is_best, cur);
        }
    }

    fn join_cost(&self, method: JoinMethod, left: PlanNodeId, right: PlanNodeId) -> Cost {
        let Some(coster) = self.ctx.coster else {
            return Cost::ZERO;
        };
        let (left, right) = (self.registry.get(left), self.registry.get(right));
        match method {
            JoinMethod::Hash => coster.cost_hash_join(left, right),
            JoinMethod::NestedLoop => coster.cost_nested_loop(left, right),
            JoinMethod::IndexedNestedLoop => {
                unreachable!("INLJ is costed against an index, not a plan")
            }
        }
    }

    fn enumerate_join_plan(
        &mut self,
        method: JoinMethod,
        left: PlanNodeId,
        right: PlanNodeId,
        cost: Cost,
        cur: &mut JoinSubset,
    ) {
        let is_best = self.is_best_plan_so_far(cost, cur);
        if self.keeps_plan(is_best) {
            self.add_plan_to_subset(method, left, right, cost, is_best, cur);
        }
    }

    /// Ties keep the earlier plan as best
    fn is_best_plan_so_far(&self, cost: Cost, cur: &JoinSubset) -> bool {
        match cur.best_plan() {
            None => true,
            Some(best) => cost < self.registry.cost_of(best),
        }
    }

    // HINTED keeps whatever the hint produced
    fn keeps_plan(&self, is_best: bool) -> bool {
        is_best || self.level_mode.mode != PlanEnumerationMode::Cheapest
    }

    fn add_plan_to_subset(
        &mut self,
        method: JoinMethod,
        left: PlanNodeId,
        right: PlanNodeId,
        cost: Cost,
        is_best: bool,
        cur: &mut JoinSubset,
    ) {
        let plan = self.registry.register_joining_node(method, left, right, cost);
        cur.plans.push(plan);
        if is_best {
            cur.best_plan_index = Some(cur.plans.len() - 1);
        }
        trace!(
            "{} {} {}x{} cost={} best={}",
            cur.subset,
            method,
            self.registry.subset_of(left),
            self.registry.subset_of(right),
            cost,
            is_best
        );
    }
}
