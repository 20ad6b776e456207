/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::cost::Cost;
use crate::plan::{JoinSubset, PlanNodeId, PlanRegistry, PlanTree};
use crate::strategy::EnumerationStrategy;
use serde::Serialize;
use std::fmt;

/// Result of an enumeration run: the DP levels and the registry owning their plans
#[derive(Debug)]
pub struct JoinPlanTable {
    num_nodes: usize,
    levels: Vec<Vec<JoinSubset>>,
    registry: PlanRegistry,
    strategy: EnumerationStrategy,
}

impl JoinPlanTable {
    pub(crate) fn new(
        num_nodes: usize,
        levels: Vec<Vec<JoinSubset>>,
        registry: PlanRegistry,
        strategy: EnumerationStrategy,
    ) -> Self {
        Self {
            num_nodes,
            levels,
            registry,
            strategy,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Subsets of `level`, in discovery order. Panics past the last level.
    pub fn get_subsets(&self, level: usize) -> &[JoinSubset] {
        &self.levels[level]
    }

    /// The subset covering every node
    pub fn final_subset(&self) -> &JoinSubset {
        &self.levels[self.levels.len() - 1][0]
    }

    pub fn best_final_plan(&self) -> Option<PlanNodeId> {
        self.final_subset().best_plan()
    }

    /// Every complete plan except the best one
    pub fn rejected_final_plans(&self) -> Vec<PlanNodeId> {
        self.final_subset().rejected_plans()
    }

    /// False when hints could not be satisfied, or the graph is disconnected
    pub fn enumeration_successful(&self) -> bool {
        !self.final_subset().plans.is_empty()
    }

    pub fn registry(&self) -> &PlanRegistry {
        &self.registry
    }

    pub fn strategy(&self) -> &EnumerationStrategy {
        &self.strategy
    }

    pub fn summary(&self) -> TableSummary {
        let levels = self
            .levels
            .iter()
            .enumerate()
            .map(|(level, subsets)| LevelSummary {
                level,
                subsets: subsets
                    .iter()
                    .map(|s| SubsetSummary {
                        nodes: s.subset.to_bit_string(self.num_nodes),
                        plans: s.plans.len(),
                        best_plan_index: s.best_plan_index,
                    })
                    .collect(),
            })
            .collect();

        let best = self.best_final_plan();
        TableSummary {
            strategy: self.strategy.to_string(),
            successful: self.enumeration_successful(),
            levels,
            best_cost: best.map(|id| self.registry.cost_of(id)),
            best_plan: best.map(|id| self.registry.tree(id, self.num_nodes)),
            rejected_plans: self.rejected_final_plans().len(),
        }
    }
}

impl fmt::Display for JoinPlanTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "HJ order pruning enabled: {}",
            self.strategy.enable_hj_order_pruning
        )?;
        for (level, subsets) in self.levels.iter().enumerate() {
            writeln!(f, "Level {}:", level)?;
            let rendered: Vec<String> = subsets.iter().map(|s| s.describe(self.num_nodes)).collect();
            writeln!(f, "  {}", rendered.join(", "))?;
        }

        let final_subset = self.final_subset();
        match final_subset.best_plan_index {
            Some(best) => writeln!(f, "Output plans (best plan {}):", best)?,
            None => writeln!(f, "Output plans (best plan none):")?,
        }
        write!(f, "{}", self.registry.plans_to_string(&final_subset.plans))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubsetSummary {
    pub nodes: String,
    pub plans: usize,
    pub best_plan_index: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelSummary {
    pub level: usize,
    pub subsets: Vec<SubsetSummary>,
}

/// Serializable digest of a [`JoinPlanTable`]
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub strategy: String,
    pub successful: bool,
    pub levels: Vec<LevelSummary>,
    pub best_cost: Option<Cost>,
    pub best_plan: Option<PlanTree>,
    pub rejected_plans: usize,
}
