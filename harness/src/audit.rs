//! Offline heuristic audit.
//!
//! The search engine trusts its heuristic table. This module checks it
//! against ground truth: Dijkstra shortest costs to the goal. A table is
//! sound for A* when it covers every node, is zero at the goal, never
//! overestimates (admissible), and satisfies the triangle inequality on
//! every road (consistent).

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use wayfinder_kernel::model::heuristic::HeuristicTableV1;
use wayfinder_kernel::model::road_graph::RoadGraphV1;

/// `h(node)` exceeds the true remaining cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissibilityViolationV1 {
    pub node: String,
    pub estimate: i64,
    pub true_cost: i64,
}

/// `h(from) > km(from, to) + h(to)` on some road.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsistencyViolationV1 {
    pub from: String,
    pub to: String,
    pub km: i64,
    pub from_estimate: i64,
    pub to_estimate: i64,
}

/// Audit report for one heuristic table against one goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicAuditV1 {
    pub goal: String,
    /// `h(goal)`, `None` if the table lacks the goal.
    pub goal_estimate: Option<i64>,
    /// Graph nodes without an estimate.
    pub missing: Vec<String>,
    /// True cost to the goal for every node that can reach it.
    pub true_costs: BTreeMap<String, i64>,
    pub admissibility_violations: Vec<AdmissibilityViolationV1>,
    pub consistency_violations: Vec<ConsistencyViolationV1>,
}

impl HeuristicAuditV1 {
    #[must_use]
    pub fn is_admissible(&self) -> bool {
        self.admissibility_violations.is_empty()
    }

    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.consistency_violations.is_empty()
    }

    /// Safe to hand to A*: complete, zero at the goal, admissible, consistent.
    #[must_use]
    pub fn is_sound(&self) -> bool {
        self.missing.is_empty()
            && self.goal_estimate == Some(0)
            && self.is_admissible()
            && self.is_consistent()
    }

    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "admissibility_violations": self.admissibility_violations.iter().map(|v| serde_json::json!({
                "estimate": v.estimate,
                "node": v.node,
                "true_cost": v.true_cost,
            })).collect::<Vec<_>>(),
            "admissible": self.is_admissible(),
            "consistency_violations": self.consistency_violations.iter().map(|v| serde_json::json!({
                "from": v.from,
                "from_estimate": v.from_estimate,
                "km": v.km,
                "to": v.to,
                "to_estimate": v.to_estimate,
            })).collect::<Vec<_>>(),
            "consistent": self.is_consistent(),
            "goal": self.goal,
            "goal_estimate": self.goal_estimate,
            "missing": self.missing,
            "sound": self.is_sound(),
        })
    }
}

/// Dijkstra from `source`. Returns the cost to every reachable node.
///
/// Roads are undirected, so these are also the costs *to* `source`.
#[must_use]
pub fn shortest_costs(graph: &RoadGraphV1, source: &str) -> BTreeMap<String, i64> {
    let mut settled: BTreeMap<String, i64> = BTreeMap::new();
    if !graph.contains(source) {
        return settled;
    }
    let mut heap: BinaryHeap<Reverse<(i64, String)>> = BinaryHeap::new();
    heap.push(Reverse((0, source.to_string())));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if settled.contains_key(&node) {
            continue;
        }
        for road in graph.neighbors(&node).unwrap_or_default() {
            // A settled cost plus one unsettled road is a simple path cost,
            // which the graph's total weight bounds.
            if !settled.contains_key(&road.to) {
                heap.push(Reverse((cost + road.km, road.to.clone())));
            }
        }
        settled.insert(node, cost);
    }
    settled
}

/// Audit `heuristic` as an estimate of the cost to `goal` on `graph`.
#[must_use]
pub fn audit_heuristic(
    graph: &RoadGraphV1,
    heuristic: &HeuristicTableV1,
    goal: &str,
) -> HeuristicAuditV1 {
    let true_costs = shortest_costs(graph, goal);

    let admissibility_violations = true_costs
        .iter()
        .filter_map(|(node, &true_cost)| {
            let estimate = heuristic.get(node)?;
            (estimate > true_cost).then(|| AdmissibilityViolationV1 {
                node: node.clone(),
                estimate,
                true_cost,
            })
        })
        .collect();

    let mut consistency_violations = Vec::new();
    for from in graph.node_names() {
        let Some(from_estimate) = heuristic.get(from) else {
            continue;
        };
        for road in graph.neighbors(from).unwrap_or_default() {
            let Some(to_estimate) = heuristic.get(&road.to) else {
                continue;
            };
            // An overflowing bound exceeds every i64 estimate.
            let violated = matches!(
                road.km.checked_add(to_estimate),
                Some(bound) if from_estimate > bound
            );
            if violated {
                consistency_violations.push(ConsistencyViolationV1 {
                    from: from.to_string(),
                    to: road.to.clone(),
                    km: road.km,
                    from_estimate,
                    to_estimate,
                });
            }
        }
    }

    HeuristicAuditV1 {
        goal: goal.to_string(),
        goal_estimate: heuristic.get(goal),
        missing: heuristic
            .missing_nodes(graph)
            .into_iter()
            .map(str::to_string)
            .collect(),
        true_costs,
        admissibility_violations,
        consistency_violations,
    }
}

/// The exact-cost heuristic toward `goal`: `h(n) = d(n, goal)`, and 0 for
/// nodes that cannot reach the goal.
///
/// Perfectly informed and consistent; useful as an A* test oracle.
#[must_use]
pub fn exact_heuristic(graph: &RoadGraphV1, goal: &str) -> HeuristicTableV1 {
    let costs = shortest_costs(graph, goal);
    let entries: Vec<(&str, i64)> = graph
        .node_names()
        .map(|n| (n, costs.get(n).copied().unwrap_or(0)))
        .collect();
    // Costs are sums of positive weights, never negative; names come from the graph.
    HeuristicTableV1::from_entries(&entries).unwrap_or_else(|_| HeuristicTableV1::zero_for(graph))
}
