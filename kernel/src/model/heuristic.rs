//! `HeuristicTableV1`: per-node non-negative cost-to-goal estimates.
//!
//! The table is tied to one goal by convention. Construction only rejects
//! values that cannot be an estimate at all (negative numbers, empty names,
//! repeated entries). Coverage and `h(goal) == 0` are checked by the search
//! engine at call time; admissibility and consistency are audited offline.

use std::collections::BTreeMap;

use super::road_graph::RoadGraphV1;
use crate::proof::canon::{canonical_json_bytes, CanonError};
use crate::proof::hash::{canonical_hash, ContentHash, HashDomain};

/// Heuristic table construction failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeuristicError {
    /// An estimate was below zero.
    NegativeEstimate { node: String, value: i64 },
    /// The same node appeared twice in the entry list.
    DuplicateNode { node: String },
    /// A node identifier was the empty string.
    EmptyNodeName,
}

impl std::fmt::Display for HeuristicError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeEstimate { node, value } => {
                write!(f, "heuristic for {node} is negative ({value})")
            }
            Self::DuplicateNode { node } => write!(f, "heuristic for {node} given twice"),
            Self::EmptyNodeName => write!(f, "heuristic node identifier must not be empty"),
        }
    }
}

impl std::error::Error for HeuristicError {}

/// Immutable map from node identifier to estimate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeuristicTableV1 {
    estimates: BTreeMap<String, i64>,
}

impl HeuristicTableV1 {
    /// Build a table from `(node, estimate)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`HeuristicError`] on a negative estimate, an empty node name,
    /// or a repeated node.
    pub fn from_entries(entries: &[(&str, i64)]) -> Result<Self, HeuristicError> {
        let mut estimates = BTreeMap::new();
        for &(node, value) in entries {
            if node.is_empty() {
                return Err(HeuristicError::EmptyNodeName);
            }
            if value < 0 {
                return Err(HeuristicError::NegativeEstimate {
                    node: node.to_string(),
                    value,
                });
            }
            if estimates.insert(node.to_string(), value).is_some() {
                return Err(HeuristicError::DuplicateNode {
                    node: node.to_string(),
                });
            }
        }
        Ok(Self { estimates })
    }

    /// The all-zero table over every node of `graph`.
    ///
    /// A* with this table expands like uniform-cost search.
    #[must_use]
    pub fn zero_for(graph: &RoadGraphV1) -> Self {
        Self {
            estimates: graph.node_names().map(|n| (n.to_string(), 0)).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, node: &str) -> Option<i64> {
        self.estimates.get(node).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }

    /// Entries in node-identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.estimates.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Graph nodes with no estimate, sorted.
    #[must_use]
    pub fn missing_nodes<'g>(&self, graph: &'g RoadGraphV1) -> Vec<&'g str> {
        graph
            .node_names()
            .filter(|n| !self.estimates.contains_key(*n))
            .collect()
    }

    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .estimates
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::from(*v)))
            .collect();
        serde_json::Value::Object(map)
    }

    /// Content fingerprint of the table.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if canonical serialization fails.
    pub fn fingerprint(&self) -> Result<ContentHash, CanonError> {
        let bytes = canonical_json_bytes(&self.to_json_value())?;
        Ok(canonical_hash(HashDomain::HeuristicTable, &bytes))
    }
}
