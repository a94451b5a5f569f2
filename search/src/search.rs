//! Search entry points and the shared, fully traced expansion loop.
//!
//! All three strategies run the same state machine:
//!
//! ```text
//! INIT → POP → ( GOAL_FOUND                      terminal, success
//!              | ALREADY_CLOSED → POP
//!              | EXPAND → POP )
//!      → ... → FRONTIER_EMPTY                    terminal, failure
//! ```
//!
//! Only the frontier discipline, the neighbor order, and the trace labels
//! differ between strategies. Closed nodes are never reopened, even when a
//! cheaper route to them turns up later.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use tracing::debug;
use wayfinder_kernel::model::heuristic::HeuristicTableV1;
use wayfinder_kernel::model::road_graph::{RoadGraphV1, RoadV1};

use crate::error::SearchError;
use crate::frontier::{Frontier, PriorityFrontier, QueueFrontier, StackFrontier};
use crate::node::SearchNodeV1;
use crate::policy::{Strategy, StrategyKindV1};
use crate::trace::{
    FrontierSnapshotEntryV1, SearchTraceV1, StepIndexV1, TerminationReasonV1, TraceActionV1,
    TraceRecordV1,
};

/// A path from start to goal with its total road cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePathV1 {
    pub nodes: Vec<String>,
    pub cost: i64,
}

impl RoutePathV1 {
    /// Number of roads traveled.
    #[must_use]
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// `A → B → C` rendering.
    #[must_use]
    pub fn describe(&self) -> String {
        self.nodes.join(" → ")
    }
}

/// Result of a search execution.
///
/// Always contains the complete trace regardless of how the search
/// terminated. Check [`SearchResult::is_goal_reached`] or inspect
/// `termination_reason` to determine the outcome.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub strategy: StrategyKindV1,
    pub termination_reason: TerminationReasonV1,
    /// `None` when the goal is unreachable.
    pub path: Option<RoutePathV1>,
    /// Nodes closed and expanded (equals `closed.len()`).
    pub nodes_expanded: u64,
    /// Frontier pops.
    pub steps: u64,
    pub frontier_high_water: u64,
    /// Wall-clock duration of the whole call. Observational only.
    pub elapsed: Duration,
    /// Closed set at termination.
    pub closed: BTreeSet<String>,
    pub trace: SearchTraceV1,
}

impl SearchResult {
    /// Returns `true` if the search terminated because the goal was popped.
    #[must_use]
    pub fn is_goal_reached(&self) -> bool {
        self.termination_reason == TerminationReasonV1::GoalReached
    }

    /// Cost of the returned path, if any.
    #[must_use]
    pub fn cost(&self) -> Option<i64> {
        self.path.as_ref().map(|p| p.cost)
    }
}

/// Run `strategy` from `start` to `goal`.
///
/// # Errors
///
/// Returns [`SearchError`] for unknown endpoints or, for A*, a heuristic
/// table that does not cover the graph or is non-zero at the goal. No trace
/// is produced in that case.
pub fn search(
    graph: &RoadGraphV1,
    strategy: &Strategy<'_>,
    start: &str,
    goal: &str,
) -> Result<SearchResult, SearchError> {
    match strategy {
        Strategy::DepthFirst => depth_first(graph, start, goal),
        Strategy::BreadthFirst => breadth_first(graph, start, goal),
        Strategy::AStar { heuristic } => astar(graph, heuristic, start, goal),
    }
}

/// Depth-first search. Returns the first path found, not the cheapest.
///
/// Neighbors are pushed in reverse declaration order, so they are popped in
/// declaration order.
///
/// # Errors
///
/// Returns [`SearchError::UnknownStart`] or [`SearchError::UnknownGoal`].
pub fn depth_first(
    graph: &RoadGraphV1,
    start: &str,
    goal: &str,
) -> Result<SearchResult, SearchError> {
    let clock = Instant::now();
    validate_endpoints(graph, start, goal)?;
    Ok(run_traced(
        graph,
        start,
        goal,
        StackFrontier::new(),
        StrategyKindV1::DepthFirst,
        None,
        clock,
    ))
}

/// Breadth-first search. Returns a path with the fewest roads, which is
/// not necessarily the cheapest.
///
/// Neighbors are enqueued in lexicographic order.
///
/// # Errors
///
/// Returns [`SearchError::UnknownStart`] or [`SearchError::UnknownGoal`].
pub fn breadth_first(
    graph: &RoadGraphV1,
    start: &str,
    goal: &str,
) -> Result<SearchResult, SearchError> {
    let clock = Instant::now();
    validate_endpoints(graph, start, goal)?;
    Ok(run_traced(
        graph,
        start,
        goal,
        QueueFrontier::new(),
        StrategyKindV1::BreadthFirst,
        None,
        clock,
    ))
}

/// A* search with `heuristic` as the cost-to-goal estimate.
///
/// Optimal when the heuristic is consistent. Children are pushed
/// unconditionally; stale duplicates are skipped when popped.
///
/// The frontier orders entries by `f`, then `g`, then node identifier, then
/// push order. Among several equal-cost paths to the goal, the one whose
/// goal entry was pushed first is returned.
///
/// # Errors
///
/// Returns [`SearchError`] for unknown endpoints, a node without an
/// estimate, a non-zero estimate at the goal, or an estimate large enough
/// that `g + h` could overflow.
pub fn astar(
    graph: &RoadGraphV1,
    heuristic: &HeuristicTableV1,
    start: &str,
    goal: &str,
) -> Result<SearchResult, SearchError> {
    let clock = Instant::now();
    validate_endpoints(graph, start, goal)?;
    validate_heuristic(graph, heuristic, goal)?;
    Ok(run_traced(
        graph,
        start,
        goal,
        PriorityFrontier::new(),
        StrategyKindV1::AStar,
        Some(heuristic),
        clock,
    ))
}

fn validate_endpoints(graph: &RoadGraphV1, start: &str, goal: &str) -> Result<(), SearchError> {
    if !graph.contains(start) {
        return Err(SearchError::UnknownStart {
            node: start.to_string(),
        });
    }
    if !graph.contains(goal) {
        return Err(SearchError::UnknownGoal {
            node: goal.to_string(),
        });
    }
    Ok(())
}

fn validate_heuristic(
    graph: &RoadGraphV1,
    heuristic: &HeuristicTableV1,
    goal: &str,
) -> Result<(), SearchError> {
    if let Some(node) = heuristic.missing_nodes(graph).first() {
        return Err(SearchError::MissingHeuristic {
            node: (*node).to_string(),
        });
    }
    if let Some(value) = heuristic.get(goal).filter(|&v| v != 0) {
        return Err(SearchError::HeuristicGoalNonZero {
            goal: goal.to_string(),
            value,
        });
    }
    // g never exceeds the total road weight, so this bounds every f.
    let total_km = graph.total_km();
    match heuristic
        .iter()
        .filter(|&(node, _)| graph.contains(node))
        .find(|&(_, estimate)| total_km.checked_add(estimate).is_none())
    {
        Some((node, estimate)) => Err(SearchError::EstimateOverflow {
            node: node.to_string(),
            estimate,
        }),
        None => Ok(()),
    }
}

fn estimate(heuristic: Option<&HeuristicTableV1>, node: &str) -> i64 {
    heuristic.and_then(|h| h.get(node)).unwrap_or(0)
}

fn ordered_roads<'g>(graph: &'g RoadGraphV1, node: &str, kind: StrategyKindV1) -> Vec<&'g RoadV1> {
    match kind {
        StrategyKindV1::DepthFirst => graph
            .neighbors(node)
            .map(|roads| roads.iter().rev().collect())
            .unwrap_or_default(),
        StrategyKindV1::BreadthFirst | StrategyKindV1::AStar => {
            graph.sorted_neighbors(node).unwrap_or_default()
        }
    }
}

const fn pop_action(kind: StrategyKindV1) -> TraceActionV1 {
    match kind {
        StrategyKindV1::DepthFirst => TraceActionV1::PopFromStack,
        StrategyKindV1::BreadthFirst => TraceActionV1::Dequeue,
        StrategyKindV1::AStar => TraceActionV1::PopMinF,
    }
}

fn pop_message(kind: StrategyKindV1, current: &SearchNodeV1) -> String {
    match kind {
        StrategyKindV1::DepthFirst => format!("Popped {} from OPEN stack", current.node),
        StrategyKindV1::BreadthFirst => format!("Dequeued {} from OPEN queue", current.node),
        StrategyKindV1::AStar => format!(
            "Popped {} with f={} (g={}+h={})",
            current.node,
            current.f_cost(),
            current.g_cost,
            current.h_cost
        ),
    }
}

fn goal_record_parts(kind: StrategyKindV1, current: &SearchNodeV1) -> (TraceActionV1, String) {
    match kind {
        StrategyKindV1::AStar => (
            TraceActionV1::OptimalGoal,
            format!("Optimal path found! Cost: {}km", current.g_cost),
        ),
        StrategyKindV1::DepthFirst | StrategyKindV1::BreadthFirst => (
            TraceActionV1::GoalFound,
            format!("Goal {} reached! Cost: {}km", current.node, current.g_cost),
        ),
    }
}

fn expand_message(kind: StrategyKindV1, added: &[FrontierSnapshotEntryV1]) -> String {
    match kind {
        StrategyKindV1::AStar => format!("Added {} neighbors to OPEN", added.len()),
        StrategyKindV1::DepthFirst | StrategyKindV1::BreadthFirst => {
            let names: Vec<&str> = added.iter().map(|e| e.node.as_str()).collect();
            format!("Added [{}] to OPEN", names.join(", "))
        }
    }
}

fn node_record<F: Frontier>(
    step: StepIndexV1,
    current: &SearchNodeV1,
    scored: bool,
    frontier: &F,
    closed: &BTreeSet<String>,
    action: TraceActionV1,
    message: String,
) -> TraceRecordV1 {
    TraceRecordV1 {
        step,
        current: Some(current.node.clone()),
        path: current.path.clone(),
        cost: current.g_cost,
        f_cost: scored.then(|| current.f_cost()),
        frontier: frontier.snapshot(),
        closed: closed.clone(),
        added: Vec::new(),
        action,
        message,
    }
}

fn run_traced<F: Frontier>(
    graph: &RoadGraphV1,
    start: &str,
    goal: &str,
    mut frontier: F,
    kind: StrategyKindV1,
    heuristic: Option<&HeuristicTableV1>,
    clock: Instant,
) -> SearchResult {
    let scored = heuristic.is_some();
    let mut closed: BTreeSet<String> = BTreeSet::new();
    let mut records: Vec<TraceRecordV1> = Vec::new();
    let mut nodes_expanded: u64 = 0;
    let mut step: u64 = 0;
    let mut next_creation_order: u64 = 1;

    let root = SearchNodeV1::root(start, estimate(heuristic, start));
    let root_f = scored.then(|| root.f_cost());
    frontier.push(root);
    records.push(TraceRecordV1 {
        step: StepIndexV1::INITIAL,
        current: None,
        path: Vec::new(),
        cost: 0,
        f_cost: root_f,
        frontier: frontier.snapshot(),
        closed: BTreeSet::new(),
        added: Vec::new(),
        action: TraceActionV1::Initialize,
        message: format!("Starting {} from {start} to {goal}", kind.display_name()),
    });

    let mut found: Option<SearchNodeV1> = None;

    while let Some(current) = frontier.pop() {
        step += 1;
        records.push(node_record(
            StepIndexV1::pop(step),
            &current,
            scored,
            &frontier,
            &closed,
            pop_action(kind),
            pop_message(kind, &current),
        ));

        if current.node == goal {
            let (action, message) = goal_record_parts(kind, &current);
            records.push(node_record(
                StepIndexV1::after(step),
                &current,
                scored,
                &frontier,
                &closed,
                action,
                message,
            ));
            found = Some(current);
            break;
        }

        if closed.contains(&current.node) {
            let message = format!("{} already closed, skipped", current.node);
            records.push(node_record(
                StepIndexV1::after(step),
                &current,
                scored,
                &frontier,
                &closed,
                TraceActionV1::SkipClosed,
                message,
            ));
            continue;
        }

        closed.insert(current.node.clone());
        nodes_expanded += 1;

        let mut added: Vec<FrontierSnapshotEntryV1> = Vec::new();
        for road in ordered_roads(graph, &current.node, kind) {
            if closed.contains(&road.to) {
                continue;
            }
            let child = current.child(
                &road.to,
                road.km,
                estimate(heuristic, &road.to),
                next_creation_order,
            );
            next_creation_order += 1;
            added.push(if scored {
                FrontierSnapshotEntryV1::scored(&child)
            } else {
                FrontierSnapshotEntryV1::unscored(&child)
            });
            frontier.push(child);
        }

        if !added.is_empty() {
            let message = expand_message(kind, &added);
            let mut record = node_record(
                StepIndexV1::after(step),
                &current,
                scored,
                &frontier,
                &closed,
                TraceActionV1::Expand,
                message,
            );
            record.added = added;
            records.push(record);
        }
    }

    let termination_reason = if found.is_some() {
        TerminationReasonV1::GoalReached
    } else {
        records.push(TraceRecordV1 {
            step: StepIndexV1::after(step),
            current: None,
            path: Vec::new(),
            cost: 0,
            f_cost: None,
            frontier: Vec::new(),
            closed: closed.clone(),
            added: Vec::new(),
            action: TraceActionV1::FrontierExhausted,
            message: format!("OPEN is empty: {goal} is unreachable from {start}"),
        });
        TerminationReasonV1::FrontierExhausted
    };

    let path = found.map(|n| RoutePathV1 {
        nodes: n.path,
        cost: n.g_cost,
    });

    debug!(
        strategy = kind.as_str(),
        start,
        goal,
        steps = step,
        nodes_expanded,
        cost = path.as_ref().map(|p| p.cost),
        termination = termination_reason.as_str(),
        "search finished"
    );

    SearchResult {
        strategy: kind,
        termination_reason,
        path,
        nodes_expanded,
        steps: step,
        frontier_high_water: frontier.high_water(),
        elapsed: clock.elapsed(),
        closed,
        trace: SearchTraceV1 {
            strategy: kind,
            start: start.to_string(),
            goal: goal.to_string(),
            records,
        },
    }
}
