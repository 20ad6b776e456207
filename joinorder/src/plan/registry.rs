/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::catalog::IndexEntry;
use crate::cost::Cost;
use serde::Serialize;
use shared::{JoinMethod, NodeId, NodeSet};
use std::fmt;
use std::fmt::Write as _;

/// Handle of a plan node inside a [`PlanRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PlanNodeId(u32);

impl PlanNodeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlanNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node of a candidate plan tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanNode {
    /// Full read of one base collection
    BaseAccess {
        node: NodeId,
        collection: String,
        subset: NodeSet,
        cost: Cost,
    },
    /// Binary join of two plans covering disjoint subsets
    Joining {
        method: JoinMethod,
        left: PlanNodeId,
        right: PlanNodeId,
        subset: NodeSet,
        cost: Cost,
    },
    /// Index lookup on one collection, only valid as the right child of an INLJ
    IndexProbe {
        node: NodeId,
        index: IndexEntry,
        collection: String,
        subset: NodeSet,
    },
}

/// Discriminant of a [`PlanNode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanNodeKind {
    BaseAccess,
    Joining,
    IndexProbe,
}

impl PlanNode {
    pub fn kind(&self) -> PlanNodeKind {
        match self {
            PlanNode::BaseAccess { .. } => PlanNodeKind::BaseAccess,
            PlanNode::Joining { .. } => PlanNodeKind::Joining,
            PlanNode::IndexProbe { .. } => PlanNodeKind::IndexProbe,
        }
    }

    pub fn subset(&self) -> NodeSet {
        match self {
            PlanNode::BaseAccess { subset, .. }
            | PlanNode::Joining { subset, .. }
            | PlanNode::IndexProbe { subset, .. } => *subset,
        }
    }

    /// Index probes carry no cost of their own, they are costed with their join
    pub fn cost(&self) -> Cost {
        match self {
            PlanNode::BaseAccess { cost, .. } | PlanNode::Joining { cost, .. } => *cost,
            PlanNode::IndexProbe { .. } => Cost::ZERO,
        }
    }

    pub fn join_method(&self) -> Option<JoinMethod> {
        match self {
            PlanNode::Joining { method, .. } => Some(*method),
            _ => None,
        }
    }

    /// Left and right child of a join
    pub fn children(&self) -> Option<(PlanNodeId, PlanNodeId)> {
        match self {
            PlanNode::Joining { left, right, .. } => Some((*left, *right)),
            _ => None,
        }
    }
}

/// Owned, nested rendering of a plan for serialization
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanTree {
    BaseAccess {
        node: NodeId,
        collection: String,
        cost: Cost,
    },
    Join {
        method: JoinMethod,
        nodes: String,
        cost: Cost,
        left: Box<PlanTree>,
        right: Box<PlanTree>,
    },
    IndexProbe {
        node: NodeId,
        collection: String,
        index: String,
    },
}

/// Arena owning every plan node built during one enumeration run
#[derive(Debug, Default)]
pub struct PlanRegistry {
    nodes: Vec<PlanNode>,
}

impl PlanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: PlanNode) -> PlanNodeId {
        let id = u32::try_from(self.nodes.len())
            .unwrap_or_else(|_| panic!("plan registry exceeded {} nodes", u32::MAX));
        self.nodes.push(node);
        PlanNodeId(id)
    }

    pub fn register_base_node(
        &mut self,
        node: NodeId,
        collection: impl Into<String>,
        cost: Cost,
    ) -> PlanNodeId {
        self.push(PlanNode::BaseAccess {
            node,
            collection: collection.into(),
            subset: NodeSet::singleton(node),
            cost,
        })
    }

    /// Registers a join of two existing plans; the new node covers the union of their subsets
    pub fn register_joining_node(
        &mut self,
        method: JoinMethod,
        left: PlanNodeId,
        right: PlanNodeId,
        cost: Cost,
    ) -> PlanNodeId {
        let subset = self.subset_of(left) | self.subset_of(right);
        self.push(PlanNode::Joining {
            method,
            left,
            right,
            subset,
            cost,
        })
    }

    pub fn register_index_probe_node(
        &mut self,
        node: NodeId,
        index: IndexEntry,
        collection: impl Into<String>,
    ) -> PlanNodeId {
        self.push(PlanNode::IndexProbe {
            node,
            index,
            collection: collection.into(),
            subset: NodeSet::singleton(node),
        })
    }

    pub fn get(&self, id: PlanNodeId) -> &PlanNode {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: PlanNodeId) -> PlanNodeKind {
        self.get(id).kind()
    }

    pub fn is_index_probe(&self, id: PlanNodeId) -> bool {
        self.kind(id) == PlanNodeKind::IndexProbe
    }

    pub fn subset_of(&self, id: PlanNodeId) -> NodeSet {
        self.get(id).subset()
    }

    pub fn cost_of(&self, id: PlanNodeId) -> Cost {
        self.get(id).cost()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn tree(&self, id: PlanNodeId, num_nodes: usize) -> PlanTree {
        match self.get(id) {
            PlanNode::BaseAccess {
                node,
                collection,
                cost,
                ..
            } => PlanTree::BaseAccess {
                node: *node,
                collection: collection.clone(),
                cost: *cost,
            },
            PlanNode::Joining {
                method,
                left,
                right,
                subset,
                cost,
            } => PlanTree::Join {
                method: *method,
                nodes: subset.to_bit_string(num_nodes),
                cost: *cost,
                left: Box::new(self.tree(*left, num_nodes)),
                right: Box::new(self.tree(*right, num_nodes)),
            },
            PlanNode::IndexProbe {
                node,
                index,
                collection,
                ..
            } => PlanTree::IndexProbe {
                node: *node,
                collection: collection.clone(),
                index: index.name.clone(),
            },
        }
    }

    /// Indented, one node per line rendering of the plan rooted at `id`
    pub fn plan_to_string(&self, id: PlanNodeId) -> String {
        let mut out = String::new();
        self.write_plan(&mut out, id, 0);
        out
    }

    /// Renders several plans one after another, each prefixed with its position
    pub fn plans_to_string(&self, ids: &[PlanNodeId]) -> String {
        let mut out = String::new();
        for (i, id) in ids.iter().enumerate() {
            let _ = writeln!(out, "{}:", i);
            self.write_plan(&mut out, *id, 1);
        }
        out
    }

    fn write_plan(&self, out: &mut String, id: PlanNodeId, depth: usize) {
        let indent = "  ".repeat(depth);
        match self.get(id) {
            PlanNode::BaseAccess {
                node,
                collection,
                cost,
                ..
            } => {
                let _ = writeln!(out, "{}SCAN {} (node {}) cost={}", indent, collection, node, cost);
            }
            PlanNode::Joining {
                method,
                left,
                right,
                subset,
                cost,
            } => {
                let _ = writeln!(out, "{}{} {} cost={}", indent, method, subset, cost);
                self.write_plan(out, *left, depth + 1);
                self.write_plan(out, *right, depth + 1);
            }
            PlanNode::IndexProbe {
                node,
                index,
                collection,
                ..
            } => {
                let _ = writeln!(
                    out,
                    "{}INDEX_PROBE {} (node {}) index={}",
                    indent, collection, node, index.name
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joining_node_covers_union() {
        let mut registry = PlanRegistry::new();
        let a = registry.register_base_node(0, "a", Cost(1.0));
        let b = registry.register_base_node(2, "b", Cost(2.0));
        let ab = registry.register_joining_node(JoinMethod::NestedLoop, a, b, Cost(5.0));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.subset_of(ab), NodeSet::singleton(0).with(2));
        assert_eq!(registry.cost_of(ab), Cost(5.0));
        assert_eq!(registry.get(ab).children(), Some((a, b)));
        assert_eq!(registry.kind(a), PlanNodeKind::BaseAccess);
        assert_eq!(registry.get(ab).join_method(), Some(JoinMethod::NestedLoop));
    }

    #[test]
    fn test_index_probe_has_no_cost() {
        let mut registry = PlanRegistry::new();
        let probe = registry.register_index_probe_node(1, IndexEntry::new("id_1", &["id"]), "b");
        assert!(registry.is_index_probe(probe));
        assert_eq!(registry.cost_of(probe), Cost::ZERO);
        assert_eq!(registry.subset_of(probe), NodeSet::singleton(1));
    }

    #[test]
    fn test_plan_dump() {
        let mut registry = PlanRegistry::new();
        let a = registry.register_base_node(0, "a", Cost(10.0));
        let probe = registry.register_index_probe_node(1, IndexEntry::new("id_1", &["id"]), "b");
        let join = registry.register_joining_node(JoinMethod::IndexedNestedLoop, a, probe, Cost(40.0));

        let expected = "INLJ {0,1} cost=40.00\n  SCAN a (node 0) cost=10.00\n  INDEX_PROBE b (node 1) index=id_1\n";
        assert_eq!(registry.plan_to_string(join), expected);
        assert!(registry.plans_to_string(&[a, join]).starts_with("0:\n  SCAN a"));
    }

    #[test]
    fn test_tree_serializes_nested() {
        let mut registry = PlanRegistry::new();
        let a = registry.register_base_node(0, "a", Cost(1.0));
        let b = registry.register_base_node(1, "b", Cost(1.0));
        let join = registry.register_joining_node(JoinMethod::Hash, a, b, Cost(3.0));

        let json = serde_json::to_value(registry.tree(join, 2)).unwrap();
        assert_eq!(json["kind"], "join");
        assert_eq!(json["method"], "HJ");
        assert_eq!(json["nodes"], "11");
        assert_eq!(json["left"]["collection"], "a");
        assert_eq!(json["right"]["kind"], "base_access");
    }
}
