/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Join order enumeration for a cost-based query optimizer.
//!
//! Given the collections of a query and the join predicates between them, the
//! enumerator builds a dynamic programming table over subsets of joined
//! collections and produces candidate join plans with their relative costs.
//!
//! - `strategy`: plan tree shapes and the per-level enumeration mode schedule
//! - `enumerator`: the subset DP driver and the join plan generator
//! - `plan`: plan node registry and DP table cells
//! - `graph`, `catalog`, `cost`: the collaborators the enumerator consults
//! - `query`: JSON query descriptions for the command line tool
//!
//! ```rust,ignore
//! let query = LoadedQuery::from_file("query.json")?;
//! let table = query.enumerate(&EnumerationStrategy::default(), true)?;
//! println!("{}", table);
//! ```

pub mod catalog;
pub mod cost;
pub mod enumerator;
pub mod error;
pub mod graph;
pub mod plan;
pub mod query;
pub mod strategy;

pub use catalog::{InMemoryIndexCatalog, IndexCatalog, IndexEntry};
pub use cost::{
    Cardinality, CardinalityEstimator, Cost, DefaultJoinCostEstimator, JoinCostEstimator,
    SelectivityCardinalityEstimator,
};
pub use enumerator::{JoinPlanTable, PlanEnumerator, TableSummary};
pub use error::{EnumeratorError, GraphError, QueryLoadError, ScheduleError, ScheduleParseError};
pub use graph::{AccessPath, EdgeId, InMemoryJoinGraph, JoinEdge, JoinGraph, JoinPredicate};
pub use plan::{JoinSubset, PlanNode, PlanNodeId, PlanNodeKind, PlanRegistry, PlanTree};
pub use query::{JoinQuery, LoadedQuery};
pub use strategy::{
    parse_schedule, EnumerationStrategy, JoinHint, PerSubsetLevelEnumerationMode,
    PlanEnumerationMode, PlanTreeShape, SubsetLevelMode,
};
pub use shared::{JoinMethod, NodeId, NodeSet, MAX_NODES};
