//! `SplitIslands`: two disconnected road islands. The goal sits on the
//! island the start cannot reach, so every strategy exhausts its frontier.

use wayfinder_kernel::model::heuristic::HeuristicTableV1;
use wayfinder_kernel::model::road_graph::{RoadGraphBuilder, RoadGraphV1};

use crate::contract::{RouteWorldV1, WorldError};

/// Unreachable-goal world.
pub struct SplitIslands;

impl RouteWorldV1 for SplitIslands {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "split_islands"
    }

    fn graph(&self) -> Result<RoadGraphV1, WorldError> {
        let mut builder = RoadGraphBuilder::new();
        builder
            .add_road("Hel", "Jastarnia", 12)?
            .add_road("Jastarnia", "Wladyslawowo", 18)?
            .add_road("Hel", "Wladyslawowo", 35)?
            .add_road("Sobieszewo", "Mikoszewo", 9)?;
        Ok(builder.build())
    }

    fn heuristic(&self) -> Result<HeuristicTableV1, WorldError> {
        Ok(HeuristicTableV1::zero_for(&self.graph()?))
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn start(&self) -> &str {
        "Hel"
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn goal(&self) -> &str {
        "Mikoszewo"
    }
}
