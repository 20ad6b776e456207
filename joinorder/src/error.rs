/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Configuration errors.
//!
//! Everything here is detected before a search begins. Internal consistency
//! violations inside the enumerator are programming defects and panic instead.

use shared::{NodeId, MAX_NODES};
use thiserror::Error;

/// An enumeration mode schedule that violates one of its invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("enumeration mode schedule must have at least one entry")]
    Empty,

    #[error("first schedule entry must be at level 0, found level {0}")]
    FirstLevelNotZero(usize),

    #[error("HINTED enumeration requires a hint (entry at level {level})")]
    MissingHint { level: usize },

    #[error("schedule levels must strictly increase: level {current} follows level {previous}")]
    NonAscendingLevels { previous: usize, current: usize },

    #[error("mode {mode} repeated at consecutive levels {previous} and {current}")]
    RepeatedMode {
        mode: &'static str,
        previous: usize,
        current: usize,
    },

    #[error("node {node} is hinted more than once (again at level {level})")]
    RepeatedHintNode { node: NodeId, level: usize },

    #[error("entry after HINTED level {hinted} must be at level {}, found {current}", .hinted + 1)]
    GapAfterHint { hinted: usize, current: usize },
}

/// Mismatch between an enumeration strategy and the join graph it is applied to
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnumeratorError {
    #[error("join graph has no nodes")]
    EmptyGraph,

    #[error("join graph has {0} nodes, at most {} are supported", MAX_NODES)]
    TooManyNodes(usize),

    #[error("hint at level {level} names node {node}, but the graph only has {num_nodes} nodes")]
    HintNodeOutOfRange {
        level: usize,
        node: NodeId,
        num_nodes: usize,
    },

    #[error(
        "last schedule entry is HINTED at level {level}, but enumeration runs to level {last_level}"
    )]
    HintedScheduleEndsEarly { level: usize, last_level: usize },
}

/// Invalid join graph construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("join graph already holds the maximum of {} nodes", MAX_NODES)]
    TooManyNodes,

    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("edge joins node {0} with itself")]
    SelfJoin(NodeId),
}

/// Failure to load a query description
#[derive(Debug, Error)]
pub enum QueryLoadError {
    #[error("failed to read query description: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed query description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid join graph: {0}")]
    Graph(#[from] GraphError),

    #[error("cardinality of node {node} must be positive, found {cardinality}")]
    InvalidCardinality { node: NodeId, cardinality: f64 },

    #[error("selectivity of edge {edge} must be in (0, 1], found {selectivity}")]
    InvalidSelectivity { edge: usize, selectivity: f64 },
}

/// Text schedule that could not be parsed or validated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleParseError {
    #[error("syntax error in schedule near '{0}'")]
    Syntax(String),

    #[error(transparent)]
    Invalid(#[from] ScheduleError),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
pub type EnumeratorResult<T> = Result<T, EnumeratorError>;
