//! Invalid inputs fail before any trace exists, with a typed error naming
//! the problem. Malformed graphs and heuristics cannot be built at all.

use wayfinder_harness::contract::{RouteWorldV1, WorldError};
use wayfinder_harness::runner::{run_comparison, ComparisonConfig};
use wayfinder_harness::worlds::poland_roads::{PolandRoads, GOAL, START};
use wayfinder_kernel::model::heuristic::{HeuristicError, HeuristicTableV1};
use wayfinder_kernel::model::road_graph::{GraphError, RoadGraphBuilder, RoadGraphV1};
use wayfinder_search::error::SearchError;
use wayfinder_search::policy::Strategy;
use wayfinder_search::search::{astar, search};

#[test]
fn unknown_endpoints_are_rejected_by_every_strategy() {
    let graph = PolandRoads.graph().unwrap();
    let h = PolandRoads.heuristic().unwrap();

    for strategy in [
        Strategy::DepthFirst,
        Strategy::BreadthFirst,
        Strategy::AStar { heuristic: &h },
    ] {
        assert_eq!(
            search(&graph, &strategy, "Gdansk", GOAL).unwrap_err(),
            SearchError::UnknownStart {
                node: "Gdansk".into()
            }
        );
        assert_eq!(
            search(&graph, &strategy, START, "Gdansk").unwrap_err(),
            SearchError::UnknownGoal {
                node: "Gdansk".into()
            }
        );
    }
}

#[test]
fn astar_needs_an_estimate_for_every_node() {
    let graph = PolandRoads.graph().unwrap();
    let partial = HeuristicTableV1::from_entries(&[("Glogow", 280), ("Plock", 0)]).unwrap();
    assert!(matches!(
        astar(&graph, &partial, START, GOAL),
        Err(SearchError::MissingHeuristic { .. })
    ));
}

#[test]
fn astar_needs_zero_at_goal() {
    let mut b = RoadGraphBuilder::new();
    b.add_road("A", "B", 3).unwrap();
    let graph = b.build();
    let h = HeuristicTableV1::from_entries(&[("A", 1), ("B", 2)]).unwrap();
    assert_eq!(
        astar(&graph, &h, "A", "B").unwrap_err(),
        SearchError::HeuristicGoalNonZero {
            goal: "B".into(),
            value: 2
        }
    );
}

#[test]
fn uninformed_search_ignores_heuristic_problems() {
    let graph = PolandRoads.graph().unwrap();
    let r = search(&graph, &Strategy::BreadthFirst, START, GOAL).unwrap();
    assert!(r.is_goal_reached());
}

#[test]
fn bad_weights_cannot_be_built() {
    let mut b = RoadGraphBuilder::new();
    assert!(matches!(
        b.add_road("A", "B", 0),
        Err(GraphError::NonPositiveWeight { km: 0, .. })
    ));
    assert!(matches!(
        b.add_road("A", "B", -5),
        Err(GraphError::NonPositiveWeight { km: -5, .. })
    ));
    assert!(matches!(
        b.add_road("A", "A", 5),
        Err(GraphError::SelfLoop { .. })
    ));
}

#[test]
fn one_way_listing_cannot_be_built() {
    let err = RoadGraphV1::from_adjacency(&[("A", &[("B", 4)]), ("B", &[])]).unwrap_err();
    assert!(matches!(err, GraphError::AsymmetricRoad { reverse_km: None, .. }));

    let err =
        RoadGraphV1::from_adjacency(&[("A", &[("B", 4)]), ("B", &[("A", 5)])]).unwrap_err();
    assert!(matches!(
        err,
        GraphError::AsymmetricRoad {
            reverse_km: Some(5),
            ..
        }
    ));
}

#[test]
fn negative_estimates_cannot_be_built() {
    assert_eq!(
        HeuristicTableV1::from_entries(&[("A", -1)]).unwrap_err(),
        HeuristicError::NegativeEstimate {
            node: "A".into(),
            value: -1
        }
    );
}

/// Total road weight exactly `i64::MAX`: the largest graph that can be built.
struct FullRange;

impl RouteWorldV1 for FullRange {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "full_range"
    }

    fn graph(&self) -> Result<RoadGraphV1, WorldError> {
        let mut b = RoadGraphBuilder::new();
        b.add_road("A", "B", i64::MAX - 1)?.add_road("B", "C", 1)?;
        Ok(b.build())
    }

    fn heuristic(&self) -> Result<HeuristicTableV1, WorldError> {
        Ok(HeuristicTableV1::zero_for(&self.graph()?))
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn start(&self) -> &str {
        "A"
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn goal(&self) -> &str {
        "C"
    }
}

#[test]
fn overflowing_total_weight_cannot_be_built() {
    let mut b = RoadGraphBuilder::new();
    b.add_road("A", "B", i64::MAX).unwrap();
    assert!(matches!(
        b.add_road("B", "C", 1),
        Err(GraphError::TotalWeightOverflow { km: 1, .. })
    ));
}

#[test]
fn full_range_costs_are_exact_end_to_end() {
    let run = run_comparison(&FullRange, &ComparisonConfig::default()).unwrap();
    for result in &run.results {
        assert_eq!(result.cost(), Some(i64::MAX), "{}", result.strategy);
    }
    assert!(run.audit.is_sound());
    assert_eq!(run.audit.true_costs.get("A"), Some(&i64::MAX));
}

#[test]
fn estimate_that_could_overflow_f_is_rejected() {
    let graph = FullRange.graph().unwrap();
    let h = HeuristicTableV1::from_entries(&[("A", 1), ("B", 1), ("C", 0)]).unwrap();
    assert_eq!(
        astar(&graph, &h, "A", "C").unwrap_err(),
        SearchError::EstimateOverflow {
            node: "A".into(),
            estimate: 1
        }
    );
}
