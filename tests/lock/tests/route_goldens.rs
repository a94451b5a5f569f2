//! Golden outcomes for the reference road network, Glogow to Plock.
//!
//! Paths, costs, counters, and record counts are pinned per strategy. Any
//! change to neighbor ordering, tie-breaking, or trace layout shows up here.

use wayfinder_harness::contract::RouteWorldV1;
use wayfinder_harness::worlds::poland_roads::{PolandRoads, GOAL, START};
use wayfinder_kernel::model::heuristic::HeuristicTableV1;
use wayfinder_kernel::model::road_graph::RoadGraphV1;
use wayfinder_search::search::{astar, breadth_first, depth_first, SearchResult};
use wayfinder_search::trace::{StepIndexV1, TerminationReasonV1, TraceActionV1};

fn world() -> (RoadGraphV1, HeuristicTableV1) {
    (PolandRoads.graph().unwrap(), PolandRoads.heuristic().unwrap())
}

fn path_of(result: &SearchResult) -> Vec<&str> {
    result
        .path
        .as_ref()
        .expect("goal should be reached")
        .nodes
        .iter()
        .map(String::as_str)
        .collect()
}

fn count(result: &SearchResult, action: TraceActionV1) -> usize {
    result
        .trace
        .records
        .iter()
        .filter(|r| r.action == action)
        .count()
}

#[test]
fn depth_first_golden() {
    let (graph, _) = world();
    let r = depth_first(&graph, START, GOAL).unwrap();

    assert_eq!(
        path_of(&r),
        ["Glogow", "Leszno", "Poznan", "Bydgoszcz", "Wloclawek", "Plock"]
    );
    assert_eq!(r.cost(), Some(440));
    assert_eq!(r.nodes_expanded, 5);
    assert_eq!(r.steps, 6);
    assert_eq!(r.trace.len(), 13);
    assert_eq!(r.termination_reason, TerminationReasonV1::GoalReached);
    assert_eq!(count(&r, TraceActionV1::SkipClosed), 0);

    let first_expand = &r.trace.records[2];
    assert_eq!(first_expand.action, TraceActionV1::Expand);
    let added: Vec<&str> = first_expand.added.iter().map(|e| e.node.as_str()).collect();
    assert_eq!(added, ["Wroclaw", "Leszno"]);
}

#[test]
fn breadth_first_golden() {
    let (graph, _) = world();
    let r = breadth_first(&graph, START, GOAL).unwrap();

    assert_eq!(
        path_of(&r),
        ["Glogow", "Leszno", "Kalisz", "Lodz", "Warsaw", "Plock"]
    );
    assert_eq!(r.cost(), Some(575));
    assert_eq!(r.path.as_ref().unwrap().hops(), 5);
    assert_eq!(r.nodes_expanded, 16);
    assert_eq!(r.steps, 22);
    assert_eq!(r.trace.len(), 43);
    assert_eq!(count(&r, TraceActionV1::SkipClosed), 5);
    assert_eq!(count(&r, TraceActionV1::Dequeue), 22);
}

#[test]
fn astar_golden() {
    let (graph, h) = world();
    let r = astar(&graph, &h, START, GOAL).unwrap();

    assert_eq!(
        path_of(&r),
        ["Glogow", "Leszno", "Poznan", "Bydgoszcz", "Wloclawek", "Plock"]
    );
    assert_eq!(r.cost(), Some(440));
    assert_eq!(r.nodes_expanded, 9);
    assert_eq!(r.steps, 10);
    assert_eq!(r.trace.len(), 21);

    let pops: Vec<&str> = r
        .trace
        .records
        .iter()
        .filter(|rec| rec.action == TraceActionV1::PopMinF)
        .filter_map(|rec| rec.current.as_deref())
        .collect();
    assert_eq!(
        pops,
        [
            "Glogow", "Leszno", "Poznan", "Bydgoszcz", "Kalisz", "Konin", "Lodz", "Wroclaw",
            "Wloclawek", "Plock"
        ]
    );
}

#[test]
fn astar_trace_carries_scores() {
    let (graph, h) = world();
    let r = astar(&graph, &h, START, GOAL).unwrap();

    let first = &r.trace.records[0];
    assert_eq!(first.action, TraceActionV1::Initialize);
    assert_eq!(first.frontier.len(), 1);
    assert_eq!(first.frontier[0].f_cost, Some(280));

    for rec in &r.trace.records {
        assert!(rec.frontier.iter().all(|e| e.f_cost.is_some()));
        let fs: Vec<i64> = rec.frontier.iter().filter_map(|e| e.f_cost).collect();
        assert!(fs.windows(2).all(|w| w[0] <= w[1]), "snapshot in pop order");
    }

    let last = r.trace.last().unwrap();
    assert_eq!(last.action, TraceActionV1::OptimalGoal);
    assert_eq!(last.f_cost, Some(440));
    assert_eq!(last.step, StepIndexV1::after(10));
    assert_eq!(last.message, "Optimal path found! Cost: 440km");
}

#[test]
fn uninformed_traces_are_unscored() {
    let (graph, _) = world();
    for r in [
        depth_first(&graph, START, GOAL).unwrap(),
        breadth_first(&graph, START, GOAL).unwrap(),
    ] {
        for rec in &r.trace.records {
            assert_eq!(rec.f_cost, None);
            assert!(rec.frontier.iter().all(|e| e.f_cost.is_none()));
        }
        assert_eq!(r.trace.last().unwrap().action, TraceActionV1::GoalFound);
    }
}

#[test]
fn breadth_first_skips_and_dead_ends() {
    let (graph, _) = world();
    let r = breadth_first(&graph, START, GOAL).unwrap();
    let records = &r.trace.records;

    let skipped: Vec<u64> = records
        .iter()
        .filter(|rec| rec.action == TraceActionV1::SkipClosed)
        .map(|rec| rec.step.whole)
        .collect();
    assert_eq!(skipped, [12, 13, 18, 20, 21]);

    // Konin and Kielce are closed but push nothing, so no Expand record.
    for (step, node) in [(10, "Konin"), (19, "Kielce")] {
        let at_step: Vec<_> = records.iter().filter(|rec| rec.step.whole == step).collect();
        assert_eq!(at_step.len(), 1, "step {step} has only its pop record");
        assert_eq!(at_step[0].current.as_deref(), Some(node));
        let next = records
            .iter()
            .find(|rec| rec.step.whole == step + 1)
            .unwrap();
        assert!(next.closed.contains(node));
    }
}

#[test]
fn dfs_and_astar_agree_bfs_pays_for_fewer_hops() {
    let (graph, h) = world();
    let dfs = depth_first(&graph, START, GOAL).unwrap();
    let bfs = breadth_first(&graph, START, GOAL).unwrap();
    let star = astar(&graph, &h, START, GOAL).unwrap();

    assert_eq!(dfs.path, star.path);
    assert!(bfs.cost() > star.cost());
    assert!(bfs.path.as_ref().unwrap().hops() <= star.path.as_ref().unwrap().hops());
    assert_eq!(
        star.path.as_ref().unwrap().describe(),
        "Glogow → Leszno → Poznan → Bydgoszcz → Wloclawek → Plock"
    );
}
