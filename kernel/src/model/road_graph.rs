//! `RoadGraphV1`: a static, weighted, undirected graph over named nodes.
//!
//! Invariants (checked once, at construction):
//!
//! - every road is present in both directions with the same weight;
//! - no self-loops, no repeated neighbor within one node's listing;
//! - every weight is a positive integer (km);
//! - every neighbor is itself a node of the graph;
//! - the sum of all road weights fits in `i64`, so no simple path cost can
//!   overflow.
//!
//! Neighbor order is the declaration order and is preserved exactly.
//! Depth-first search relies on it.

use std::collections::{BTreeMap, BTreeSet};

use crate::proof::canon::{canonical_json_bytes, CanonError};
use crate::proof::hash::{canonical_hash, ContentHash, HashDomain};

/// One directed half of an undirected road.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadV1 {
    /// Neighbor node identifier.
    pub to: String,
    /// Positive road length.
    pub km: i64,
}

/// Construction-time graph validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A node identifier was the empty string.
    EmptyNodeName,
    /// The same node was declared twice in an adjacency listing.
    DuplicateNode { node: String },
    /// A road connects a node to itself.
    SelfLoop { node: String },
    /// A road weight was zero or negative.
    NonPositiveWeight { from: String, to: String, km: i64 },
    /// A node lists the same neighbor more than once.
    DuplicateNeighbor { node: String, neighbor: String },
    /// A neighbor is not declared as a node.
    UnknownNeighbor { node: String, neighbor: String },
    /// `from → to` exists but `to → from` is missing or has a different weight.
    AsymmetricRoad {
        from: String,
        to: String,
        km: i64,
        reverse_km: Option<i64>,
    },
    /// A road was added twice with different weights.
    ConflictingRoad {
        from: String,
        to: String,
        existing_km: i64,
        requested_km: i64,
    },
    /// Adding this road would push the total road weight past `i64::MAX`.
    TotalWeightOverflow { from: String, to: String, km: i64 },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNodeName => write!(f, "node identifier must not be empty"),
            Self::DuplicateNode { node } => write!(f, "node {node} declared twice"),
            Self::SelfLoop { node } => write!(f, "self-loop on {node}"),
            Self::NonPositiveWeight { from, to, km } => {
                write!(f, "road {from} -> {to} has non-positive weight {km}")
            }
            Self::DuplicateNeighbor { node, neighbor } => {
                write!(f, "{node} lists neighbor {neighbor} more than once")
            }
            Self::UnknownNeighbor { node, neighbor } => {
                write!(f, "{node} lists undeclared neighbor {neighbor}")
            }
            Self::AsymmetricRoad {
                from,
                to,
                km,
                reverse_km,
            } => match reverse_km {
                Some(r) => write!(f, "road {from} -> {to} is {km} km but {to} -> {from} is {r} km"),
                None => write!(f, "road {from} -> {to} has no reverse road"),
            },
            Self::ConflictingRoad {
                from,
                to,
                existing_km,
                requested_km,
            } => write!(
                f,
                "road {from} -- {to} already exists with {existing_km} km (requested {requested_km} km)"
            ),
            Self::TotalWeightOverflow { from, to, km } => write!(
                f,
                "road {from} -- {to} ({km} km) overflows the total road weight"
            ),
        }
    }
}

impl std::error::Error for GraphError {}

fn add_to_total(total: i64, from: &str, to: &str, km: i64) -> Result<i64, GraphError> {
    total
        .checked_add(km)
        .ok_or_else(|| GraphError::TotalWeightOverflow {
            from: from.to_string(),
            to: to.to_string(),
            km,
        })
}

/// Immutable road graph.
///
/// Nodes are stored in a `BTreeMap` so node iteration is sorted and
/// deterministic; each node's neighbor list keeps declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadGraphV1 {
    adjacency: BTreeMap<String, Vec<RoadV1>>,
    total_km: i64,
}

impl RoadGraphV1 {
    /// Build a graph from a per-node adjacency listing.
    ///
    /// Each entry is `(node, [(neighbor, km), ...])`. Symmetry is verified,
    /// not inferred: both directions must be listed.
    ///
    /// # Errors
    ///
    /// Returns the first [`GraphError`] found.
    pub fn from_adjacency(listing: &[(&str, &[(&str, i64)])]) -> Result<Self, GraphError> {
        let mut adjacency: BTreeMap<String, Vec<RoadV1>> = BTreeMap::new();

        for &(node, roads) in listing {
            if node.is_empty() {
                return Err(GraphError::EmptyNodeName);
            }
            if adjacency.contains_key(node) {
                return Err(GraphError::DuplicateNode {
                    node: node.to_string(),
                });
            }
            let mut seen = BTreeSet::new();
            let mut out = Vec::with_capacity(roads.len());
            for &(neighbor, km) in roads {
                check_road(node, neighbor, km)?;
                if !seen.insert(neighbor) {
                    return Err(GraphError::DuplicateNeighbor {
                        node: node.to_string(),
                        neighbor: neighbor.to_string(),
                    });
                }
                out.push(RoadV1 {
                    to: neighbor.to_string(),
                    km,
                });
            }
            adjacency.insert(node.to_string(), out);
        }

        let mut total_km = 0i64;
        for (node, roads) in &adjacency {
            for road in roads {
                let Some(back) = adjacency.get(&road.to) else {
                    return Err(GraphError::UnknownNeighbor {
                        node: node.clone(),
                        neighbor: road.to.clone(),
                    });
                };
                let reverse_km = back.iter().find(|r| &r.to == node).map(|r| r.km);
                if reverse_km != Some(road.km) {
                    return Err(GraphError::AsymmetricRoad {
                        from: node.clone(),
                        to: road.to.clone(),
                        km: road.km,
                        reverse_km,
                    });
                }
                if node.as_str() < road.to.as_str() {
                    total_km = add_to_total(total_km, node, &road.to, road.km)?;
                }
            }
        }

        Ok(Self {
            adjacency,
            total_km,
        })
    }

    /// Whether `node` is part of the graph.
    #[must_use]
    pub fn contains(&self, node: &str) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Roads leaving `node`, in declaration order.
    #[must_use]
    pub fn neighbors(&self, node: &str) -> Option<&[RoadV1]> {
        self.adjacency.get(node).map(Vec::as_slice)
    }

    /// Roads leaving `node`, sorted by neighbor identifier.
    #[must_use]
    pub fn sorted_neighbors(&self, node: &str) -> Option<Vec<&RoadV1>> {
        self.adjacency.get(node).map(|roads| {
            let mut sorted: Vec<&RoadV1> = roads.iter().collect();
            sorted.sort_by(|a, b| a.to.cmp(&b.to));
            sorted
        })
    }

    /// Weight of the road between `from` and `to`, if any.
    #[must_use]
    pub fn weight(&self, from: &str, to: &str) -> Option<i64> {
        self.adjacency
            .get(from)?
            .iter()
            .find(|r| r.to == to)
            .map(|r| r.km)
    }

    /// Node identifiers in sorted order.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected roads.
    #[must_use]
    pub fn road_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    /// Sum of all road weights, each undirected road counted once.
    ///
    /// Bounds the cost of every simple path in the graph.
    #[must_use]
    pub fn total_km(&self) -> i64 {
        self.total_km
    }

    /// JSON projection: `{"nodes": {name: [{"km": .., "to": ..}, ...]}}`.
    ///
    /// Neighbor arrays keep declaration order.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let nodes: serde_json::Map<String, serde_json::Value> = self
            .adjacency
            .iter()
            .map(|(node, roads)| {
                let roads: Vec<serde_json::Value> = roads
                    .iter()
                    .map(|r| serde_json::json!({"km": r.km, "to": r.to}))
                    .collect();
                (node.clone(), serde_json::Value::Array(roads))
            })
            .collect();
        serde_json::json!({ "nodes": nodes })
    }

    /// Content fingerprint of the graph, including neighbor order.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if canonical serialization fails.
    pub fn fingerprint(&self) -> Result<ContentHash, CanonError> {
        let bytes = canonical_json_bytes(&self.to_json_value())?;
        Ok(canonical_hash(HashDomain::RoadGraph, &bytes))
    }
}

/// Incremental builder that adds both directions of every road at once.
///
/// Symmetric by construction. Per-node neighbor order is the order in which
/// roads touching that node were added.
#[derive(Debug, Default)]
pub struct RoadGraphBuilder {
    adjacency: BTreeMap<String, Vec<RoadV1>>,
    total_km: i64,
}

impl RoadGraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a node without roads (isolated nodes are allowed).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EmptyNodeName`] for an empty identifier.
    pub fn add_node(&mut self, node: &str) -> Result<&mut Self, GraphError> {
        if node.is_empty() {
            return Err(GraphError::EmptyNodeName);
        }
        self.adjacency.entry(node.to_string()).or_default();
        Ok(self)
    }

    /// Add the undirected road `a -- b` of length `km`.
    ///
    /// Re-adding an existing road with the same weight is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] for empty names, self-loops, non-positive
    /// weights, a conflicting weight for an existing road, or a road that
    /// would overflow the total weight.
    pub fn add_road(&mut self, a: &str, b: &str, km: i64) -> Result<&mut Self, GraphError> {
        check_road(a, b, km)?;
        if let Some(existing_km) = self
            .adjacency
            .get(a)
            .and_then(|roads| roads.iter().find(|r| r.to == b))
            .map(|r| r.km)
        {
            if existing_km == km {
                return Ok(self);
            }
            return Err(GraphError::ConflictingRoad {
                from: a.to_string(),
                to: b.to_string(),
                existing_km,
                requested_km: km,
            });
        }
        self.total_km = add_to_total(self.total_km, a, b, km)?;
        self.adjacency.entry(a.to_string()).or_default().push(RoadV1 {
            to: b.to_string(),
            km,
        });
        self.adjacency.entry(b.to_string()).or_default().push(RoadV1 {
            to: a.to_string(),
            km,
        });
        Ok(self)
    }

    /// Finish the graph.
    #[must_use]
    pub fn build(self) -> RoadGraphV1 {
        RoadGraphV1 {
            adjacency: self.adjacency,
            total_km: self.total_km,
        }
    }
}

fn check_road(from: &str, to: &str, km: i64) -> Result<(), GraphError> {
    if from.is_empty() || to.is_empty() {
        return Err(GraphError::EmptyNodeName);
    }
    if from == to {
        return Err(GraphError::SelfLoop {
            node: from.to_string(),
        });
    }
    if km <= 0 {
        return Err(GraphError::NonPositiveWeight {
            from: from.to_string(),
            to: to.to_string(),
            km,
        });
    }
    Ok(())
}
