use dashmap::DashMap;
use std::sync::Arc;

use crate::node::SearchNode;

/// Thread-safe fingerprint → node map using DashMap.
///
/// Two descents asking for the same fingerprint always receive the same
/// `Arc<SearchNode>`; whichever then locks it first does the expansion.
#[derive(Debug, Default)]
pub struct NodeTable {
    table: DashMap<u64, Arc<SearchNode>>,
}

impl NodeTable {
    pub fn new() -> Self {
        Self {
            table: DashMap::new(),
        }
    }

    /// Node for `key`, allocating an unexpanded one on first use.
    ///
    /// Returns the node and whether it already existed.
    pub fn get_or_insert(&self, key: u64) -> (Arc<SearchNode>, bool) {
        if let Some(node) = self.table.get(&key) {
            return (Arc::clone(node.value()), true);
        }
        let mut inserted = false;
        let node = self
            .table
            .entry(key)
            .or_insert_with(|| {
                inserted = true;
                Arc::new(SearchNode::new())
            })
            .value()
            .clone();
        (node, !inserted)
    }

    /// Lookup without inserting.
    pub fn get(&self, key: u64) -> Option<Arc<SearchNode>> {
        self.table.get(&key).map(|entry| Arc::clone(entry.value()))
    }

    /// Drop every node.
    pub fn clear(&self) {
        self.table.clear();
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
