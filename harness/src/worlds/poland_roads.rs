//! `PolandRoads`: the reference world. Seventeen Polish cities joined by 22
//! two-way roads (km), searched from Glogow to Plock.
//!
//! The adjacency listing below is declaration-ordered per city. Depth-first
//! search depends on that order, so it must not be re-sorted.
//!
//! The heuristic is a per-city distance estimate to Plock. It is admissible
//! and consistent for this graph (checked by `audit` tests).

use wayfinder_kernel::model::heuristic::HeuristicTableV1;
use wayfinder_kernel::model::road_graph::RoadGraphV1;

use crate::contract::{RouteWorldV1, WorldError};

pub const START: &str = "Glogow";
pub const GOAL: &str = "Plock";

const ROADS: &[(&str, &[(&str, i64)])] = &[
    ("Glogow", &[("Leszno", 45), ("Wroclaw", 140)]),
    ("Leszno", &[("Glogow", 45), ("Poznan", 90), ("Kalisz", 130)]),
    ("Poznan", &[("Leszno", 90), ("Bydgoszcz", 140), ("Konin", 120)]),
    ("Bydgoszcz", &[("Poznan", 140), ("Wloclawek", 110)]),
    ("Wloclawek", &[("Bydgoszcz", 110), ("Plock", 55)]),
    ("Konin", &[("Poznan", 120), ("Lodz", 120)]),
    ("Kalisz", &[("Leszno", 130), ("Lodz", 120), ("Czestochowa", 160)]),
    (
        "Lodz",
        &[
            ("Konin", 120),
            ("Kalisz", 120),
            ("Warsaw", 150),
            ("Radom", 165),
            ("Krakow", 280),
        ],
    ),
    ("Warsaw", &[("Lodz", 150), ("Plock", 130), ("Radom", 105)]),
    ("Radom", &[("Warsaw", 105), ("Kielce", 82), ("Lodz", 165)]),
    ("Kielce", &[("Radom", 82), ("Krakow", 120)]),
    ("Krakow", &[("Kielce", 120), ("Katowice", 85), ("Lodz", 280)]),
    ("Katowice", &[("Krakow", 85), ("Czestochowa", 80), ("Opole", 118)]),
    ("Czestochowa", &[("Kalisz", 160), ("Katowice", 80)]),
    ("Opole", &[("Wroclaw", 100), ("Katowice", 118)]),
    ("Wroclaw", &[("Glogow", 140), ("Opole", 100)]),
    ("Plock", &[("Wloclawek", 55), ("Warsaw", 130)]),
];

const ESTIMATES_TO_PLOCK: &[(&str, i64)] = &[
    ("Glogow", 280),
    ("Leszno", 250),
    ("Poznan", 200),
    ("Bydgoszcz", 100),
    ("Wloclawek", 55),
    ("Konin", 150),
    ("Kalisz", 220),
    ("Lodz", 130),
    ("Warsaw", 100),
    ("Radom", 180),
    ("Kielce", 250),
    ("Krakow", 320),
    ("Katowice", 350),
    ("Czestochowa", 280),
    ("Opole", 320),
    ("Wroclaw", 300),
    ("Plock", 0),
];

/// Reference road network world.
pub struct PolandRoads;

impl RouteWorldV1 for PolandRoads {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "poland_roads"
    }

    fn graph(&self) -> Result<RoadGraphV1, WorldError> {
        Ok(RoadGraphV1::from_adjacency(ROADS)?)
    }

    fn heuristic(&self) -> Result<HeuristicTableV1, WorldError> {
        Ok(HeuristicTableV1::from_entries(ESTIMATES_TO_PLOCK)?)
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn start(&self) -> &str {
        START
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn goal(&self) -> &str {
        GOAL
    }
}
