//! An unreachable goal is an outcome, not an error: every strategy returns
//! `Ok` with no path, a frontier-exhausted trace, and valid counters.

use wayfinder_harness::contract::RouteWorldV1;
use wayfinder_harness::worlds::split_islands::SplitIslands;
use wayfinder_kernel::model::heuristic::HeuristicTableV1;
use wayfinder_kernel::model::road_graph::RoadGraphBuilder;
use wayfinder_search::policy::Strategy;
use wayfinder_search::replay::{replay_trace, verify_result};
use wayfinder_search::search::search;
use wayfinder_search::trace::{StepIndexV1, TerminationReasonV1, TraceActionV1};

#[test]
fn every_strategy_exhausts_on_split_islands() {
    let graph = SplitIslands.graph().unwrap();
    let h = SplitIslands.heuristic().unwrap();

    for strategy in [
        Strategy::DepthFirst,
        Strategy::BreadthFirst,
        Strategy::AStar { heuristic: &h },
    ] {
        let r = search(&graph, &strategy, "Hel", "Mikoszewo").unwrap();
        let kind = strategy.kind();

        assert_eq!(r.termination_reason, TerminationReasonV1::FrontierExhausted, "{kind}");
        assert!(r.path.is_none());
        assert!(!r.is_goal_reached());
        assert_eq!(r.nodes_expanded, 3, "{kind}: the whole start island is closed");
        assert_eq!(r.nodes_expanded, r.closed.len() as u64);

        let last = r.trace.last().unwrap();
        assert_eq!(last.action, TraceActionV1::FrontierExhausted);
        assert!(last.frontier.is_empty());
        assert!(last.current.is_none());
        assert_eq!(last.step, StepIndexV1::after(r.steps));
        assert_eq!(last.message, "OPEN is empty: Mikoszewo is unreachable from Hel");

        verify_result(&r, &graph).unwrap();
        assert!(replay_trace(&r.trace).unwrap().path.is_none());
    }
}

#[test]
fn isolated_start_exhausts_after_one_pop() {
    let mut b = RoadGraphBuilder::new();
    b.add_node("Lonely").unwrap().add_road("A", "B", 4).unwrap();
    let graph = b.build();
    let h = HeuristicTableV1::zero_for(&graph);

    let r = search(&graph, &Strategy::AStar { heuristic: &h }, "Lonely", "B").unwrap();
    assert_eq!(r.steps, 1);
    assert_eq!(r.nodes_expanded, 1);
    // Initialize, pop, exhausted. No Expand: nothing was pushed.
    assert_eq!(r.trace.len(), 3);
    assert_eq!(r.frontier_high_water, 1);
}

#[test]
fn start_equal_goal_terminates_on_first_pop() {
    let graph = SplitIslands.graph().unwrap();
    let r = search(&graph, &Strategy::BreadthFirst, "Hel", "Hel").unwrap();
    let path = r.path.as_ref().unwrap();
    assert_eq!(path.nodes, ["Hel"]);
    assert_eq!(path.cost, 0);
    assert_eq!(r.nodes_expanded, 0);
    assert_eq!(r.steps, 1);
    assert_eq!(r.trace.len(), 3);
}
