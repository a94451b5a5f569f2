//! Core search node type and the A* frontier ordering key.

/// An immutable search node in the frontier.
///
/// Every push creates a fresh value; nodes are never updated in place.
/// `h_cost` is 0 for depth-first and breadth-first search.
///
/// Costs use plain addition. Paths are simple, so `g_cost` is bounded by
/// [`RoadGraphV1::total_km`], and A* rejects estimates that would push
/// `g_cost + h_cost` past `i64::MAX` before the first pop.
///
/// [`RoadGraphV1::total_km`]: wayfinder_kernel::model::road_graph::RoadGraphV1::total_km
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNodeV1 {
    /// Graph node this entry stands on.
    pub node: String,
    /// Nodes from the start up to and including `node`.
    pub path: Vec<String>,
    /// Accumulated road cost along `path`.
    pub g_cost: i64,
    /// Heuristic estimate at `node`.
    pub h_cost: i64,
    /// Global push counter for deterministic tie-breaking.
    pub creation_order: u64,
}

impl SearchNodeV1 {
    /// The root entry for `start`.
    #[must_use]
    pub fn root(start: &str, h_cost: i64) -> Self {
        Self {
            node: start.to_string(),
            path: vec![start.to_string()],
            g_cost: 0,
            h_cost,
            creation_order: 0,
        }
    }

    /// A child entry reached over a road of length `km`.
    #[must_use]
    pub fn child(&self, to: &str, km: i64, h_cost: i64, creation_order: u64) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend(self.path.iter().cloned());
        path.push(to.to_string());
        Self {
            node: to.to_string(),
            path,
            g_cost: self.g_cost + km,
            h_cost,
            creation_order,
        }
    }

    /// `f_cost = g_cost + h_cost` (the A* ordering key).
    #[must_use]
    pub fn f_cost(&self) -> i64 {
        self.g_cost + self.h_cost
    }
}

/// The frontier ordering key: `(f_cost, g_cost, node, creation_order)`.
///
/// Lower `f_cost` first, then lower `g_cost`, then node identifier in byte
/// order, then older `creation_order`. The last component makes the order
/// total even when the same node is pushed twice with equal costs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierKey {
    pub f_cost: i64,
    pub g_cost: i64,
    pub node: String,
    pub creation_order: u64,
}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.f_cost
            .cmp(&other.f_cost)
            .then(self.g_cost.cmp(&other.g_cost))
            .then_with(|| self.node.cmp(&other.node))
            .then(self.creation_order.cmp(&other.creation_order))
    }
}

impl From<&SearchNodeV1> for FrontierKey {
    fn from(node: &SearchNodeV1) -> Self {
        Self {
            f_cost: node.f_cost(),
            g_cost: node.g_cost,
            node: node.node.clone(),
            creation_order: node.creation_order,
        }
    }
}
