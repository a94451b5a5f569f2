//! Trace replay verification.
//!
//! [`replay_trace`] walks a trace front to back without re-running any
//! search and checks that it is internally consistent. [`verify_result`]
//! additionally cross-checks a [`SearchResult`] against its own trace and
//! the graph it ran on.

use std::collections::BTreeSet;

use wayfinder_kernel::model::road_graph::RoadGraphV1;

use crate::search::{RoutePathV1, SearchResult};
use crate::trace::{SearchTraceV1, StepIndexV1, TerminationReasonV1, TraceActionV1};

/// What a consistent trace says happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcomeV1 {
    pub termination_reason: TerminationReasonV1,
    pub path: Option<RoutePathV1>,
    /// Pop count.
    pub steps: u64,
    /// Closed set carried by the last record.
    pub closed: BTreeSet<String>,
}

impl ReplayOutcomeV1 {
    #[must_use]
    pub fn nodes_expanded(&self) -> u64 {
        self.closed.len() as u64
    }
}

/// Replay failure. `index` is the offending record position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    EmptyTrace,
    /// The first record is not a well-formed `Initialize` record.
    BadInitialRecord { detail: String },
    StepOutOfOrder {
        index: usize,
        found: StepIndexV1,
        expected: StepIndexV1,
    },
    /// A secondary record names a different node than its pop.
    CurrentMismatch { index: usize },
    ClosedSetShrank { index: usize },
    /// More than one node was closed between two records.
    ClosedSetJump { index: usize, added: usize },
    /// A node was closed that was not the most recent pop.
    UnexpectedClose { index: usize, node: String },
    NodeClosedTwice { index: usize, node: String },
    /// A `Skip Closed` record for a node that is not closed.
    SkipOfOpenNode { index: usize, node: String },
    RecordAfterTerminal { index: usize },
    MissingTerminalRecord,
    /// The goal record does not describe a start→goal path.
    GoalMismatch { index: usize },
    /// The exhaustion record still lists frontier entries.
    FrontierNotEmpty { index: usize },
    /// A path uses a road the graph does not have.
    UnknownRoad { from: String, to: String },
    /// The path's total cost does not fit in `i64`.
    CostOverflow { from: String, to: String },
    /// A result field disagrees with the replayed trace.
    ResultMismatch { field: &'static str },
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTrace => write!(f, "trace has no records"),
            Self::BadInitialRecord { detail } => write!(f, "bad initial record: {detail}"),
            Self::StepOutOfOrder {
                index,
                found,
                expected,
            } => write!(f, "record {index}: step {found}, expected {expected}"),
            Self::CurrentMismatch { index } => {
                write!(f, "record {index}: current node differs from its pop")
            }
            Self::ClosedSetShrank { index } => write!(f, "record {index}: closed set shrank"),
            Self::ClosedSetJump { index, added } => {
                write!(f, "record {index}: {added} nodes closed at once")
            }
            Self::UnexpectedClose { index, node } => {
                write!(f, "record {index}: {node} closed without being popped")
            }
            Self::NodeClosedTwice { index, node } => {
                write!(f, "record {index}: {node} expanded twice")
            }
            Self::SkipOfOpenNode { index, node } => {
                write!(f, "record {index}: skip of {node}, which is not closed")
            }
            Self::RecordAfterTerminal { index } => {
                write!(f, "record {index} follows a terminal record")
            }
            Self::MissingTerminalRecord => write!(f, "trace does not end in a terminal record"),
            Self::GoalMismatch { index } => {
                write!(f, "record {index}: goal record does not reach the goal")
            }
            Self::FrontierNotEmpty { index } => {
                write!(f, "record {index}: frontier exhausted but not empty")
            }
            Self::UnknownRoad { from, to } => write!(f, "path uses missing road {from} -> {to}"),
            Self::CostOverflow { from, to } => {
                write!(f, "path cost overflows at road {from} -> {to}")
            }
            Self::ResultMismatch { field } => {
                write!(f, "result field {field} disagrees with its trace")
            }
        }
    }
}

impl std::error::Error for ReplayError {}

/// Replay `trace` and reconstruct its outcome.
///
/// # Errors
///
/// Returns the first [`ReplayError`] encountered.
pub fn replay_trace(trace: &SearchTraceV1) -> Result<ReplayOutcomeV1, ReplayError> {
    let Some(first) = trace.records.first() else {
        return Err(ReplayError::EmptyTrace);
    };
    check_initial(trace, first)?;

    let mut whole: u64 = 0;
    let mut secondary_seen = false;
    let mut last_pop: Option<(&str, &BTreeSet<String>)> = None;
    let mut terminal: Option<(usize, TerminationReasonV1)> = None;

    for (index, pair) in trace.records.windows(2).enumerate() {
        let index = index + 1;
        let (prev, rec) = (&pair[0], &pair[1]);

        if terminal.is_some() {
            return Err(ReplayError::RecordAfterTerminal { index });
        }

        // Closed-set growth is attributed to the latest pop before `rec`.
        if !prev.closed.is_subset(&rec.closed) {
            return Err(ReplayError::ClosedSetShrank { index });
        }
        let grown: Vec<&String> = rec.closed.difference(&prev.closed).collect();
        if grown.len() > 1 {
            return Err(ReplayError::ClosedSetJump {
                index,
                added: grown.len(),
            });
        }
        if let Some(node) = grown.first() {
            match last_pop {
                Some((popped, before)) if popped == node.as_str() => {
                    if before.contains(*node) {
                        return Err(ReplayError::NodeClosedTwice {
                            index,
                            node: (*node).clone(),
                        });
                    }
                }
                _ => {
                    return Err(ReplayError::UnexpectedClose {
                        index,
                        node: (*node).clone(),
                    })
                }
            }
        }

        if rec.action.is_pop() {
            let expected = StepIndexV1::pop(whole + 1);
            if rec.step != expected {
                return Err(ReplayError::StepOutOfOrder {
                    index,
                    found: rec.step,
                    expected,
                });
            }
            whole += 1;
            secondary_seen = false;
            let Some(current) = rec.current.as_deref() else {
                return Err(ReplayError::CurrentMismatch { index });
            };
            last_pop = Some((current, &rec.closed));
            continue;
        }

        let expected = StepIndexV1::after(whole);
        let exhausted = rec.action == TraceActionV1::FrontierExhausted;
        if rec.step != expected || whole == 0 || (secondary_seen && !exhausted) {
            return Err(ReplayError::StepOutOfOrder {
                index,
                found: rec.step,
                expected,
            });
        }
        secondary_seen = true;

        match rec.action {
            TraceActionV1::Initialize => {
                return Err(ReplayError::BadInitialRecord {
                    detail: format!("Initialize repeated at record {index}"),
                })
            }
            TraceActionV1::FrontierExhausted => {
                if !rec.frontier.is_empty() {
                    return Err(ReplayError::FrontierNotEmpty { index });
                }
                terminal = Some((index, TerminationReasonV1::FrontierExhausted));
            }
            TraceActionV1::GoalFound | TraceActionV1::OptimalGoal => {
                check_same_current(index, rec.current.as_deref(), last_pop)?;
                let reaches_goal = rec.current.as_deref() == Some(trace.goal.as_str())
                    && rec.path.first() == Some(&trace.start)
                    && rec.path.last() == Some(&trace.goal);
                if !reaches_goal {
                    return Err(ReplayError::GoalMismatch { index });
                }
                terminal = Some((index, TerminationReasonV1::GoalReached));
            }
            TraceActionV1::SkipClosed => {
                check_same_current(index, rec.current.as_deref(), last_pop)?;
                if let Some((node, before)) = last_pop {
                    if !before.contains(node) {
                        return Err(ReplayError::SkipOfOpenNode {
                            index,
                            node: node.to_string(),
                        });
                    }
                }
            }
            TraceActionV1::Expand => {
                check_same_current(index, rec.current.as_deref(), last_pop)?;
            }
            TraceActionV1::PopFromStack | TraceActionV1::Dequeue | TraceActionV1::PopMinF => {}
        }
    }

    // A trace with only the initial record has no terminal record either.
    let Some((end, termination_reason)) = terminal else {
        return Err(ReplayError::MissingTerminalRecord);
    };
    let last = &trace.records[end];
    let path = match termination_reason {
        TerminationReasonV1::GoalReached => Some(RoutePathV1 {
            nodes: last.path.clone(),
            cost: last.cost,
        }),
        TerminationReasonV1::FrontierExhausted => None,
    };

    Ok(ReplayOutcomeV1 {
        termination_reason,
        path,
        steps: whole,
        closed: last.closed.clone(),
    })
}

/// Replay `result.trace` and check that every result field agrees with it
/// and that the returned path exists in `graph` at the stated cost.
///
/// # Errors
///
/// Returns a [`ReplayError`] describing the first disagreement.
pub fn verify_result(result: &SearchResult, graph: &RoadGraphV1) -> Result<(), ReplayError> {
    let outcome = replay_trace(&result.trace)?;

    if result.trace.strategy != result.strategy {
        return Err(ReplayError::ResultMismatch { field: "strategy" });
    }
    if outcome.termination_reason != result.termination_reason {
        return Err(ReplayError::ResultMismatch {
            field: "termination_reason",
        });
    }
    if outcome.steps != result.steps {
        return Err(ReplayError::ResultMismatch { field: "steps" });
    }
    if outcome.closed != result.closed {
        return Err(ReplayError::ResultMismatch { field: "closed" });
    }
    if outcome.nodes_expanded() != result.nodes_expanded {
        return Err(ReplayError::ResultMismatch {
            field: "nodes_expanded",
        });
    }
    if outcome.path != result.path {
        return Err(ReplayError::ResultMismatch { field: "path" });
    }
    if let Some(path) = &result.path {
        if path_cost(graph, &path.nodes)? != path.cost {
            return Err(ReplayError::ResultMismatch { field: "cost" });
        }
    }
    Ok(())
}

/// Sum of road weights along `nodes`.
///
/// # Errors
///
/// Returns [`ReplayError::UnknownRoad`] if two consecutive nodes are not
/// connected, or [`ReplayError::CostOverflow`] if the sum leaves `i64`.
/// A path that revisits nodes can exceed the graph's total road weight.
pub fn path_cost(graph: &RoadGraphV1, nodes: &[String]) -> Result<i64, ReplayError> {
    nodes.windows(2).try_fold(0i64, |acc, hop| {
        let km = graph
            .weight(&hop[0], &hop[1])
            .ok_or_else(|| ReplayError::UnknownRoad {
                from: hop[0].clone(),
                to: hop[1].clone(),
            })?;
        acc.checked_add(km).ok_or_else(|| ReplayError::CostOverflow {
            from: hop[0].clone(),
            to: hop[1].clone(),
        })
    })
}

fn check_initial(
    trace: &SearchTraceV1,
    first: &crate::trace::TraceRecordV1,
) -> Result<(), ReplayError> {
    let detail = if first.action != TraceActionV1::Initialize {
        Some(format!("action is {}", first.action))
    } else if first.step != StepIndexV1::INITIAL {
        Some(format!("step is {}", first.step))
    } else if first.current.is_some() {
        Some("current node is set".to_string())
    } else if !first.closed.is_empty() {
        Some("closed set is not empty".to_string())
    } else if first.frontier.len() != 1 || first.frontier[0].node != trace.start {
        Some("frontier is not exactly the start node".to_string())
    } else {
        None
    };
    match detail {
        Some(detail) => Err(ReplayError::BadInitialRecord { detail }),
        None => Ok(()),
    }
}

fn check_same_current(
    index: usize,
    current: Option<&str>,
    last_pop: Option<(&str, &BTreeSet<String>)>,
) -> Result<(), ReplayError> {
    match (current, last_pop) {
        (Some(c), Some((popped, _))) if c == popped => Ok(()),
        _ => Err(ReplayError::CurrentMismatch { index }),
    }
}
