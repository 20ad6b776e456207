/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Cost and cardinality models consulted by the enumerator.
//!
//! The enumerator only depends on the [`CardinalityEstimator`] and
//! [`JoinCostEstimator`] traits; the structs here are the reference models used
//! by the CLI and the tests.

pub mod cardinality;
pub mod estimator;

pub use cardinality::{CardinalityEstimator, SelectivityCardinalityEstimator};
pub use estimator::{CostConstants, DefaultJoinCostEstimator, JoinCostEstimator};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

/// Relative cost of a plan, only meaningful compared with other costs
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cost(pub f64);

impl Cost {
    pub const ZERO: Cost = Cost(0.0);

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Cost) -> Cost {
        Cost(self.0 + rhs.0)
    }
}

impl Mul<f64> for Cost {
    type Output = Cost;

    fn mul(self, rhs: f64) -> Cost {
        Cost(self.0 * rhs)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Estimated number of rows
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cardinality(pub f64);

impl Cardinality {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}
