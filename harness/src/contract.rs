//! World contract: the minimal trait a route world must implement.
//!
//! Worlds provide domain data only: a road graph, a heuristic table toward
//! their goal, and the start/goal pair. Worlds may NOT run searches, write
//! artifacts, or verify traces; those are runner concerns.

use wayfinder_kernel::model::heuristic::{HeuristicError, HeuristicTableV1};
use wayfinder_kernel::model::road_graph::{GraphError, RoadGraphV1};

/// Typed failure for world construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// The world's road data failed graph validation.
    Graph(GraphError),
    /// The world's heuristic data failed table validation.
    Heuristic(HeuristicError),
}

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Graph(e) => write!(f, "world graph is invalid: {e}"),
            Self::Heuristic(e) => write!(f, "world heuristic is invalid: {e}"),
        }
    }
}

impl std::error::Error for WorldError {}

impl From<GraphError> for WorldError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}

impl From<HeuristicError> for WorldError {
    fn from(e: HeuristicError) -> Self {
        Self::Heuristic(e)
    }
}

/// The contract a world must implement to be run by the comparison runner.
pub trait RouteWorldV1 {
    /// Unique world identifier (e.g., `"poland_roads"`).
    fn world_id(&self) -> &str;

    /// Build the road graph.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Graph`] if the world's data is malformed.
    fn graph(&self) -> Result<RoadGraphV1, WorldError>;

    /// Build the heuristic table toward [`RouteWorldV1::goal`].
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Heuristic`] if the world's data is malformed.
    fn heuristic(&self) -> Result<HeuristicTableV1, WorldError>;

    fn start(&self) -> &str;

    fn goal(&self) -> &str;
}
