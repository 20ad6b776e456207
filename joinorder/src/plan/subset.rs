/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::PlanNodeId;
use serde::Serialize;
use shared::{NodeId, NodeSet};

/// DP table cell: the candidate plans found so far for one set of joined nodes.
///
/// Plans are kept in discovery order; `best_plan_index` tracks the cheapest one
/// seen so far and is only moved by a strictly cheaper plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinSubset {
    pub subset: NodeSet,
    pub plans: Vec<PlanNodeId>,
    pub best_plan_index: Option<usize>,
}

impl JoinSubset {
    pub fn new(subset: NodeSet) -> Self {
        Self {
            subset,
            plans: Vec::new(),
            best_plan_index: None,
        }
    }

    pub fn best_plan(&self) -> Option<PlanNodeId> {
        self.best_plan_index.map(|i| self.plans[i])
    }

    /// A single base node, no join performed yet
    pub fn is_base_collection_access(&self) -> bool {
        self.subset.len() == 1
    }

    /// Node of a base collection access
    pub fn node_id(&self) -> Option<NodeId> {
        self.subset.single_node()
    }

    /// Plans other than the best one, in discovery order
    pub fn rejected_plans(&self) -> Vec<PlanNodeId> {
        self.plans
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != self.best_plan_index)
            .map(|(_, id)| *id)
            .collect()
    }

    pub fn describe(&self, num_nodes: usize) -> String {
        match self.best_plan_index {
            Some(best) => format!(
                "{} ({} plans, best {})",
                self.subset.to_bit_string(num_nodes),
                self.plans.len(),
                best
            ),
            None => format!("{} (0 plans)", self.subset.to_bit_string(num_nodes)),
        }
    }
}
