/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub mod mode;
pub mod parser;

pub use mode::{
    JoinHint, ModeCursor, PerSubsetLevelEnumerationMode, PlanEnumerationMode, SubsetLevelMode,
};
pub use parser::parse_schedule;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape restriction on the plan trees the enumerator may build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanTreeShape {
    /// Every join has a base access as its right child
    LeftDeep,
    /// Every join has a base access as its left child
    RightDeep,
    /// Every join has a base access on at least one side
    ZigZag,
}

impl fmt::Display for PlanTreeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlanTreeShape::LeftDeep => "LEFT_DEEP",
            PlanTreeShape::RightDeep => "RIGHT_DEEP",
            PlanTreeShape::ZigZag => "ZIG_ZAG",
        };
        f.write_str(name)
    }
}

impl FromStr for PlanTreeShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "left-deep" => Ok(PlanTreeShape::LeftDeep),
            "right-deep" => Ok(PlanTreeShape::RightDeep),
            "zig-zag" | "zigzag" => Ok(PlanTreeShape::ZigZag),
            other => Err(format!("unknown plan tree shape '{}'", other)),
        }
    }
}

/// Knobs controlling a single enumeration run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationStrategy {
    pub plan_shape: PlanTreeShape,
    pub mode: PerSubsetLevelEnumerationMode,
    /// Reject hash joins whose build side is larger than the probe side
    pub enable_hj_order_pruning: bool,
}

impl EnumerationStrategy {
    pub fn new(
        plan_shape: PlanTreeShape,
        mode: PerSubsetLevelEnumerationMode,
        enable_hj_order_pruning: bool,
    ) -> Self {
        Self {
            plan_shape,
            mode,
            enable_hj_order_pruning,
        }
    }

    pub fn with_plan_shape(mut self, plan_shape: PlanTreeShape) -> Self {
        self.plan_shape = plan_shape;
        self
    }

    pub fn with_mode(mut self, mode: PerSubsetLevelEnumerationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_hj_order_pruning(mut self, enabled: bool) -> Self {
        self.enable_hj_order_pruning = enabled;
        self
    }
}

impl Default for EnumerationStrategy {
    fn default() -> Self {
        Self {
            plan_shape: PlanTreeShape::ZigZag,
            mode: PerSubsetLevelEnumerationMode::from_mode(PlanEnumerationMode::Cheapest)
                .unwrap_or_else(|_| unreachable!("CHEAPEST is a valid single mode")),
            enable_hj_order_pruning: true,
        }
    }
}

impl fmt::Display for EnumerationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shape={} modes=[{}] hj_order_pruning={}",
            self.plan_shape, self.mode, self.enable_hj_order_pruning
        )
    }
}
