//! World implementations for the comparison runner.

pub mod poland_roads;
pub mod split_islands;
