//! Shared fixtures for wayfinder benchmark suites.
//!
//! Grid worlds scale smoothly with `side`, so strategy costs can be compared
//! across sizes. Weights are deterministic (no RNG) to keep runs comparable.

use wayfinder_kernel::model::heuristic::HeuristicTableV1;
use wayfinder_kernel::model::road_graph::{RoadGraphBuilder, RoadGraphV1};

/// Cheapest road weight in a grid world; scales the Manhattan heuristic.
pub const GRID_MIN_KM: i64 = 10;

/// Node name of grid cell `(row, col)`.
#[must_use]
pub fn cell(row: usize, col: usize) -> String {
    format!("r{row:03}c{col:03}")
}

/// A `side × side` grid with 4-neighbor roads.
///
/// Weights vary in `GRID_MIN_KM..GRID_MIN_KM + 7` by position, so A* has
/// real ties and detours to resolve.
///
/// # Panics
///
/// Panics if `side` is zero. Benchmark setup failures are fatal.
#[must_use]
pub fn grid_graph(side: usize) -> RoadGraphV1 {
    assert!(side > 0, "grid needs at least one cell");
    let mut builder = RoadGraphBuilder::new();
    builder.add_node(&cell(0, 0)).expect("cell name");
    for row in 0..side {
        for col in 0..side {
            let km = GRID_MIN_KM + i64::try_from((row * 7 + col * 3) % 7).unwrap_or(0);
            if col + 1 < side {
                builder
                    .add_road(&cell(row, col), &cell(row, col + 1), km)
                    .expect("grid road");
            }
            if row + 1 < side {
                builder
                    .add_road(&cell(row, col), &cell(row + 1, col), km)
                    .expect("grid road");
            }
        }
    }
    builder.build()
}

/// Manhattan distance to the far corner, scaled by [`GRID_MIN_KM`].
/// Admissible and consistent on [`grid_graph`].
///
/// # Panics
///
/// Panics on table construction failure. Benchmark setup failures are fatal.
#[must_use]
pub fn grid_heuristic(side: usize) -> HeuristicTableV1 {
    let goal = side - 1;
    let names: Vec<(String, i64)> = (0..side)
        .flat_map(|row| (0..side).map(move |col| (row, col)))
        .map(|(row, col)| {
            let hops = (goal - row) + (goal - col);
            (cell(row, col), GRID_MIN_KM * i64::try_from(hops).unwrap_or(0))
        })
        .collect();
    let entries: Vec<(&str, i64)> = names.iter().map(|(n, h)| (n.as_str(), *h)).collect();
    HeuristicTableV1::from_entries(&entries).expect("grid heuristic")
}

/// Start and goal corners of a grid of the given side.
#[must_use]
pub fn grid_corners(side: usize) -> (String, String) {
    (cell(0, 0), cell(side - 1, side - 1))
}
