/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr};

/// Identifier of one base collection in a join graph, numbered `0..num_nodes`.
pub type NodeId = usize;

/// Upper bound on the number of nodes a single join graph may hold.
pub const MAX_NODES: usize = 64;

/// Fixed-width bitset over node identifiers.
///
/// Two node sets are equal iff they hold the same nodes, no matter how they were
/// assembled, which makes `NodeSet` usable directly as a deduplication key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeSet(u64);

impl NodeSet {
    /// The empty set
    pub const fn empty() -> Self {
        NodeSet(0)
    }

    /// Set holding exactly one node
    pub fn singleton(node: NodeId) -> Self {
        NodeSet::empty().with(node)
    }

    /// Set holding nodes `0..num_nodes`
    pub fn full(num_nodes: usize) -> Self {
        assert!(num_nodes <= MAX_NODES, "node count {} exceeds {}", num_nodes, MAX_NODES);
        if num_nodes == MAX_NODES {
            NodeSet(u64::MAX)
        } else {
            NodeSet((1u64 << num_nodes) - 1)
        }
    }

    pub const fn from_bits(bits: u64) -> Self {
        NodeSet(bits)
    }

    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// Returns a copy of this set with `node` added
    pub fn with(self, node: NodeId) -> Self {
        assert!(node < MAX_NODES, "node {} out of range", node);
        NodeSet(self.0 | (1u64 << node))
    }

    pub fn insert(&mut self, node: NodeId) {
        *self = self.with(node);
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node < MAX_NODES && self.0 & (1u64 << node) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of nodes in the set
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn union(self, other: NodeSet) -> NodeSet {
        NodeSet(self.0 | other.0)
    }

    pub fn intersection(self, other: NodeSet) -> NodeSet {
        NodeSet(self.0 & other.0)
    }

    pub fn is_subset_of(&self, other: &NodeSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn is_disjoint(&self, other: &NodeSet) -> bool {
        self.0 & other.0 == 0
    }

    /// The node of a singleton set, `None` for any other size
    pub fn single_node(&self) -> Option<NodeId> {
        if self.len() == 1 {
            Some(self.0.trailing_zeros() as NodeId)
        } else {
            None
        }
    }

    /// Iterates over member nodes in ascending order
    pub fn iter(&self) -> NodeSetIter {
        NodeSetIter { remaining: self.0 }
    }

    /// Renders the set as a bit string of `num_nodes` characters, highest node first,
    /// so node 0 is the rightmost character (`{0}` over two nodes is `"01"`).
    pub fn to_bit_string(&self, num_nodes: usize) -> String {
        (0..num_nodes)
            .rev()
            .map(|node| if self.contains(node) { '1' } else { '0' })
            .collect()
    }

    /// Parses the format produced by [`NodeSet::to_bit_string`].
    pub fn from_bit_string(bits: &str) -> Option<NodeSet> {
        if bits.len() > MAX_NODES {
            return None;
        }
        let mut set = NodeSet::empty();
        for (node, c) in bits.chars().rev().enumerate() {
            match c {
                '1' => set.insert(node),
                '0' => {}
                _ => return None,
            }
        }
        Some(set)
    }
}

impl BitOr for NodeSet {
    type Output = NodeSet;

    fn bitor(self, rhs: NodeSet) -> NodeSet {
        self.union(rhs)
    }
}

impl BitAnd for NodeSet {
    type Output = NodeSet;

    fn bitand(self, rhs: NodeSet) -> NodeSet {
        self.intersection(rhs)
    }
}

impl FromIterator<NodeId> for NodeSet {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        iter.into_iter().fold(NodeSet::empty(), NodeSet::with)
    }
}

impl fmt::Debug for NodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeSet{}", self)
    }
}

impl fmt::Display for NodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, node) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", node)?;
        }
        write!(f, "}}")
    }
}

/// Ascending iterator over the nodes of a [`NodeSet`]
pub struct NodeSetIter {
    remaining: u64,
}

impl Iterator for NodeSetIter {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.remaining.trailing_zeros() as NodeId;
        // Clear lowest set bit
        self.remaining &= self.remaining - 1;
        Some(node)
    }
}
