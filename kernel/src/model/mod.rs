//! Graph and heuristic data model.
//!
//! Both types are validated at construction and immutable afterwards, so a
//! search never has to re-check weights, symmetry, or estimate signs.

pub mod heuristic;
pub mod road_graph;
