//! `SearchTraceV1`: the ordered record of every algorithmic step.
//!
//! A trace is append-only while the search runs and immutable afterwards.
//! Each record carries value copies of the frontier and closed set, so a
//! renderer can play the search back without re-running it.
//!
//! Step numbering: the initial record is step 0; every pop increments the
//! whole step; a secondary event for the same pop (goal, skip, expand,
//! exhaustion) carries the same whole step with the half flag set, rendered
//! as `3.5`.

use std::collections::BTreeSet;

use wayfinder_kernel::proof::canon::{canonical_json_bytes, CanonError};
use wayfinder_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::node::SearchNodeV1;
use crate::policy::StrategyKindV1;

/// Schema tag embedded in every serialized trace.
pub const SEARCH_TRACE_SCHEMA_VERSION: &str = "search_trace.v1";

/// Position of a record in the search timeline.
///
/// Ordering is `(whole, half)` with `false < true`, so `3 < 3.5 < 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StepIndexV1 {
    pub whole: u64,
    pub half: bool,
}

impl StepIndexV1 {
    /// Step 0, the initial record.
    pub const INITIAL: Self = Self {
        whole: 0,
        half: false,
    };

    /// The pop record of step `whole`.
    #[must_use]
    pub const fn pop(whole: u64) -> Self {
        Self { whole, half: false }
    }

    /// The secondary event following the pop of step `whole`.
    #[must_use]
    pub const fn after(whole: u64) -> Self {
        Self { whole, half: true }
    }
}

impl std::fmt::Display for StepIndexV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.half {
            write!(f, "{}.5", self.whole)
        } else {
            write!(f, "{}", self.whole)
        }
    }
}

/// What a trace record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceActionV1 {
    /// Frontier seeded with the start node.
    Initialize,
    /// Depth-first pop.
    PopFromStack,
    /// Breadth-first pop.
    Dequeue,
    /// A* pop of the minimum-`f` entry.
    PopMinF,
    /// Node closed and its open neighbors pushed.
    Expand,
    /// Popped node was already closed; discarded.
    SkipClosed,
    /// Goal popped by depth-first or breadth-first search.
    GoalFound,
    /// Goal popped by A*.
    OptimalGoal,
    /// Frontier ran dry without reaching the goal.
    FrontierExhausted,
}

impl TraceActionV1 {
    /// Human-facing label, stable across versions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Initialize => "Initialize",
            Self::PopFromStack => "Pop from Stack",
            Self::Dequeue => "Dequeue",
            Self::PopMinF => "Pop min f(n)",
            Self::Expand => "Expand",
            Self::SkipClosed => "Skip Closed",
            Self::GoalFound => "GOAL FOUND!",
            Self::OptimalGoal => "OPTIMAL GOAL!",
            Self::FrontierExhausted => "Frontier Exhausted",
        }
    }

    /// Whether this action starts a new whole step.
    #[must_use]
    pub const fn is_pop(self) -> bool {
        matches!(self, Self::PopFromStack | Self::Dequeue | Self::PopMinF)
    }

    /// Whether this action ends the search.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::GoalFound | Self::OptimalGoal | Self::FrontierExhausted
        )
    }
}

impl std::fmt::Display for TraceActionV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One frontier entry as seen by an observer.
///
/// `f_cost` is present only for A*.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierSnapshotEntryV1 {
    pub node: String,
    pub f_cost: Option<i64>,
}

impl FrontierSnapshotEntryV1 {
    /// Entry without a priority (stack and queue frontiers).
    #[must_use]
    pub fn unscored(node: &SearchNodeV1) -> Self {
        Self {
            node: node.node.clone(),
            f_cost: None,
        }
    }

    /// Entry carrying the node's `f_cost` (priority frontier).
    #[must_use]
    pub fn scored(node: &SearchNodeV1) -> Self {
        Self {
            node: node.node.clone(),
            f_cost: Some(node.f_cost()),
        }
    }
}

impl std::fmt::Display for FrontierSnapshotEntryV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.f_cost {
            Some(cost) => write!(f, "{}(f={cost})", self.node),
            None => f.write_str(&self.node),
        }
    }
}

/// A single trace record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecordV1 {
    pub step: StepIndexV1,
    /// Node being processed; `None` for the initial record and the
    /// frontier-exhausted record.
    pub current: Option<String>,
    /// Path from start to `current` (empty for the initial record).
    pub path: Vec<String>,
    /// Accumulated cost `g` of `path`.
    pub cost: i64,
    /// `g + h` for A*; `None` for the uninformed strategies.
    pub f_cost: Option<i64>,
    /// Frontier contents after this event.
    pub frontier: Vec<FrontierSnapshotEntryV1>,
    /// Closed set after this event.
    pub closed: BTreeSet<String>,
    /// Neighbors pushed by this event (only `Expand` is non-empty).
    pub added: Vec<FrontierSnapshotEntryV1>,
    pub action: TraceActionV1,
    pub message: String,
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReasonV1 {
    /// The goal was popped from the frontier.
    GoalReached,
    /// The frontier emptied without reaching the goal.
    FrontierExhausted,
}

impl TerminationReasonV1 {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GoalReached => "goal_reached",
            Self::FrontierExhausted => "frontier_exhausted",
        }
    }
}

/// The complete trace of one search invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTraceV1 {
    pub strategy: StrategyKindV1,
    pub start: String,
    pub goal: String,
    pub records: Vec<TraceRecordV1>,
}

impl SearchTraceV1 {
    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The last record, if any.
    #[must_use]
    pub fn last(&self) -> Option<&TraceRecordV1> {
        self.records.last()
    }

    /// Serialize the trace to canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }

    /// Content digest over the canonical bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        let bytes = self.to_canonical_json_bytes()?;
        Ok(canonical_hash(HashDomain::SearchTrace, &bytes))
    }

    /// JSON projection (not yet canonicalized).
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "goal": self.goal,
            "records": self.records.iter().map(record_to_json).collect::<Vec<_>>(),
            "schema_version": SEARCH_TRACE_SCHEMA_VERSION,
            "start": self.start,
            "strategy": self.strategy.as_str(),
        })
    }
}

fn record_to_json(r: &TraceRecordV1) -> serde_json::Value {
    serde_json::json!({
        "action": r.action.label(),
        "added": r.added.iter().map(snapshot_entry_to_json).collect::<Vec<_>>(),
        "closed": r.closed.iter().collect::<Vec<_>>(),
        "cost": r.cost,
        "current": r.current,
        "f_cost": r.f_cost,
        "frontier": r.frontier.iter().map(snapshot_entry_to_json).collect::<Vec<_>>(),
        "message": r.message,
        "path": r.path,
        "step": {
            "half": r.step.half,
            "label": r.step.to_string(),
            "whole": r.step.whole,
        },
    })
}

fn snapshot_entry_to_json(e: &FrontierSnapshotEntryV1) -> serde_json::Value {
    serde_json::json!({"f_cost": e.f_cost, "node": e.node})
}
