//! Typed search errors.
//!
//! `SearchError` represents pre-flight failures only. An unreachable goal is
//! not an error: it is expressed via
//! [`crate::trace::TerminationReasonV1::FrontierExhausted`] and still produces
//! a complete trace.

/// Typed failure for pre-flight input validation.
///
/// Returned before the first trace record is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The start node is not in the graph.
    UnknownStart { node: String },
    /// The goal node is not in the graph.
    UnknownGoal { node: String },
    /// The heuristic table has no estimate for a graph node.
    MissingHeuristic { node: String },
    /// The heuristic does not estimate zero at the goal.
    HeuristicGoalNonZero { goal: String, value: i64 },
    /// `estimate` plus the graph's total road weight does not fit in `i64`,
    /// so `f = g + h` could overflow during the search.
    EstimateOverflow { node: String, estimate: i64 },
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownStart { node } => write!(f, "start node {node} is not in the graph"),
            Self::UnknownGoal { node } => write!(f, "goal node {node} is not in the graph"),
            Self::MissingHeuristic { node } => {
                write!(f, "heuristic table has no estimate for {node}")
            }
            Self::HeuristicGoalNonZero { goal, value } => {
                write!(f, "heuristic at goal {goal} must be 0, got {value}")
            }
            Self::EstimateOverflow { node, estimate } => write!(
                f,
                "heuristic estimate {estimate} at {node} overflows f = g + h on this graph"
            ),
        }
    }
}

impl std::error::Error for SearchError {}
