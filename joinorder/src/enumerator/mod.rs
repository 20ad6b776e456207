/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Bottom-up dynamic programming over subsets of joined nodes.
//!
//! Level `k` of the table holds one [`JoinSubset`] per distinct set of `k + 1`
//! nodes reachable under the active enumeration modes. Every subset at level `k`
//! is formed by adding one base node to a subset of level `k - 1`, and its plans
//! join the two in one or both orientations.

mod combinations;
mod generator;
mod table;

pub use table::{JoinPlanTable, LevelSummary, SubsetSummary, TableSummary};

use crate::catalog::IndexCatalog;
use crate::cost::{CardinalityEstimator, Cost, JoinCostEstimator};
use crate::error::{EnumeratorError, EnumeratorResult};
use crate::graph::JoinGraph;
use crate::plan::{JoinSubset, PlanRegistry};
use crate::strategy::EnumerationStrategy;
use combinations::CombinationSequence;
use generator::{EnumerationContext, JoinPlanGenerator};
use log::debug;
use rustc_hash::FxHashMap;
use shared::{NodeSet, MAX_NODES};

/// One enumeration run over a join graph
pub struct PlanEnumerator<'a> {
    ctx: EnumerationContext<'a>,
}

impl<'a> PlanEnumerator<'a> {
    /// Checks the strategy against the graph; a run that would start from a bad
    /// configuration is rejected here instead of failing halfway through.
    pub fn new(
        graph: &'a dyn JoinGraph,
        indexes: &'a dyn IndexCatalog,
        cardinality: &'a dyn CardinalityEstimator,
        coster: Option<&'a dyn JoinCostEstimator>,
        strategy: &'a EnumerationStrategy,
    ) -> EnumeratorResult<Self> {
        let num_nodes = graph.num_nodes();
        if num_nodes == 0 {
            return Err(EnumeratorError::EmptyGraph);
        }
        if num_nodes > MAX_NODES {
            return Err(EnumeratorError::TooManyNodes(num_nodes));
        }

        for (level, hint) in strategy.mode.hints() {
            if hint.node >= num_nodes {
                return Err(EnumeratorError::HintNodeOutOfRange {
                    level,
                    node: hint.node,
                    num_nodes,
                });
            }
        }

        let last_level = num_nodes - 1;
        if let Some(last) = strategy.mode.entries().last() {
            if last.is_hinted() && last.level < last_level {
                return Err(EnumeratorError::HintedScheduleEndsEarly {
                    level: last.level,
                    last_level,
                });
            }
        }

        Ok(Self {
            ctx: EnumerationContext {
                graph,
                indexes,
                cardinality,
                coster,
                strategy,
            },
        })
    }

    /// Runs the whole search and returns the filled table
    pub fn enumerate_join_subsets(self) -> JoinPlanTable {
        let ctx = self.ctx;
        let num_nodes = ctx.graph.num_nodes();
        let mut registry = PlanRegistry::new();
        let mut levels: Vec<Vec<JoinSubset>> = Vec::with_capacity(num_nodes);

        let mut level_sizes = CombinationSequence::new(num_nodes);
        // C(n, 0) is the empty subset, never materialized
        level_sizes.next_value();

        let mut cursor = ctx.strategy.mode.cursor();
        let first_mode = cursor.current();
        let hinted_first_level_node = first_mode
            .hint
            .filter(|_| first_mode.is_hinted())
            .map(|hint| hint.node);

        let mut base_level = Vec::with_capacity(level_sizes.next_value() as usize);
        for node in 0..num_nodes {
            let cost = ctx
                .coster
                .map_or(Cost::ZERO, |coster| coster.cost_base_access(node));
            let collection = ctx.graph.access_path(node).collection.clone();
            let mut subset = JoinSubset::new(NodeSet::singleton(node));
            subset.plans.push(registry.register_base_node(node, collection, cost));
            subset.best_plan_index = Some(0);
            base_level.push(subset);
        }
        debug!("level 0 ({}): {} base subsets", first_mode, base_level.len());
        levels.push(base_level);

        for level in 1..num_nodes {
            let level_mode = cursor.advance_to(level);
            let hint = level_mode.hint.filter(|_| level_mode.is_hinted());
            if let Some(hint) = &hint {
                debug!("level {} restricted to {}", level, hint);
            }

            let max_subsets = level_sizes.next_value();
            // Every subset of the previous level extends to at most one subset per missing
            // node, and to exactly one under a hint
            let prev_len = levels[level - 1].len();
            let reachable = if hint.is_some() {
                prev_len
            } else {
                prev_len.saturating_mul(num_nodes - level)
            };
            let reserve = usize::try_from(max_subsets).map_or(reachable, |bound| bound.min(reachable));
            levels.push(Vec::with_capacity(reserve));
            let (prev_levels, cur_levels) = levels.split_at_mut(level);
            let base = &prev_levels[0];
            let prev = &prev_levels[level - 1];
            let cur = &mut cur_levels[0];

            let mut generator = JoinPlanGenerator::new(ctx, &mut registry, level_mode);
            let mut positions: FxHashMap<NodeSet, usize> = FxHashMap::default();

            for prev_subset in prev {
                for node in 0..num_nodes {
                    if prev_subset.subset.contains(node) {
                        continue;
                    }
                    if let Some(hint) = &hint {
                        if node != hint.node {
                            continue;
                        }
                        if level == 1 {
                            if let Some(first) = hinted_first_level_node {
                                if !prev_subset.subset.contains(first) {
                                    continue;
                                }
                            }
                        }
                    }

                    let new_set = prev_subset.subset.with(node);
                    let position = match positions.get(&new_set) {
                        // Both orientations of a pair of base nodes were tried the first time
                        Some(_) if prev_subset.is_base_collection_access() => continue,
                        Some(&position) => position,
                        None => {
                            assert!(
                                (cur.len() as u64) < max_subsets,
                                "level {} exceeded its bound of {} subsets",
                                level,
                                max_subsets
                            );
                            cur.push(JoinSubset::new(new_set));
                            positions.insert(new_set, cur.len() - 1);
                            cur.len() - 1
                        }
                    };

                    let target = &mut cur[position];
                    let base_subset = &base[node];
                    if hint.map_or(true, |hint| !hint.is_left_child) {
                        generator.enumerate_join_plans(prev_subset, base_subset, target);
                    }
                    if hint.map_or(true, |hint| hint.is_left_child) {
                        generator.enumerate_join_plans(base_subset, prev_subset, target);
                    }
                }
            }

            debug!(
                "level {} ({}): {} subsets, {} plans",
                level,
                level_mode,
                cur.len(),
                cur.iter().map(|s| s.plans.len()).sum::<usize>()
            );
        }

        let final_level = levels.last().map_or(0, Vec::len);
        assert!(
            final_level == 1,
            "final level holds {} subsets instead of one",
            final_level
        );

        JoinPlanTable::new(num_nodes, levels, registry, ctx.strategy.clone())
    }
}
