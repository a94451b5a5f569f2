//! Wayfinder Search: deterministic, fully traced graph search over road graphs.
//!
//! This crate provides the search layer for Wayfinder. It depends only on
//! `wayfinder_kernel`. It does NOT depend on `wayfinder_harness` and performs
//! no I/O.
//!
//! # Crate dependency graph
//!
//! ```text
//! wayfinder_kernel  ←  wayfinder_search  ←  wayfinder_harness
//! (graph, canon)       (frontiers, trace)   (worlds, bundles, runner)
//! ```
//!
//! # Key types
//!
//! - [`SearchNodeV1`]: immutable frontier entry (node, path, g, h)
//! - [`Frontier`]: stack / queue / priority discipline behind one trait
//! - [`SearchTraceV1`]: ordered record of every algorithmic step
//! - [`SearchResult`]: path, counters, elapsed time, and the trace
//! - [`Strategy`]: which algorithm to run (DFS, BFS, A*)

#![forbid(unsafe_code)]

pub mod error;
pub mod frontier;
pub mod node;
pub mod policy;
pub mod replay;
pub mod search;
pub mod trace;

pub use error::SearchError;
pub use frontier::{Frontier, PriorityFrontier, QueueFrontier, StackFrontier};
pub use node::{FrontierKey, SearchNodeV1};
pub use policy::{Strategy, StrategyKindV1};
pub use search::{astar, breadth_first, depth_first, search, RoutePathV1, SearchResult};
pub use trace::{
    FrontierSnapshotEntryV1, SearchTraceV1, StepIndexV1, TerminationReasonV1, TraceActionV1,
    TraceRecordV1,
};
