/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::graph::JoinEdge;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use shared::NodeId;

/// Secondary index over one base collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    /// Indexed fields, leading field first
    pub key_pattern: Vec<String>,
}

impl IndexEntry {
    pub fn new(name: impl Into<String>, key_pattern: &[&str]) -> Self {
        Self {
            name: name.into(),
            key_pattern: key_pattern.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn leading_field(&self) -> Option<&str> {
        self.key_pattern.first().map(String::as_str)
    }
}

/// Source of indexes usable for indexed nested loop joins
pub trait IndexCatalog {
    /// Index on `node` that can answer the predicates of `edge`, if any
    fn best_index_satisfying_predicates(&self, node: NodeId, edge: &JoinEdge) -> Option<IndexEntry>;
}

/// Catalog picking the first registered index whose leading field appears
/// in one of the edge's predicates on that node
#[derive(Debug, Clone, Default)]
pub struct InMemoryIndexCatalog {
    indexes: FxHashMap<NodeId, Vec<IndexEntry>>,
}

impl InMemoryIndexCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_index(&mut self, node: NodeId, index: IndexEntry) {
        self.indexes.entry(node).or_default().push(index);
    }

    pub fn indexes_for(&self, node: NodeId) -> &[IndexEntry] {
        self.indexes.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.values().all(Vec::is_empty)
    }
}

impl IndexCatalog for InMemoryIndexCatalog {
    fn best_index_satisfying_predicates(&self, node: NodeId, edge: &JoinEdge) -> Option<IndexEntry> {
        let fields = edge.fields_for(node);
        self.indexes_for(node)
            .iter()
            .find(|index| {
                index
                    .leading_field()
                    .map_or(false, |leading| fields.contains(&leading))
            })
            .cloned()
    }
}
