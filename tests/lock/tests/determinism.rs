//! In-process determinism: the same inputs give the same canonical trace
//! bytes, digests, and bundle, run after run.

use wayfinder_harness::contract::RouteWorldV1;
use wayfinder_harness::runner::{run_comparison, strategy_for, ComparisonConfig};
use wayfinder_harness::worlds::poland_roads::{PolandRoads, GOAL, START};
use wayfinder_kernel::proof::canon::is_canonical_json;
use wayfinder_search::policy::StrategyKindV1;
use wayfinder_search::search::search;

const RUNS: usize = 10;

#[test]
fn trace_bytes_are_identical_across_runs() {
    let graph = PolandRoads.graph().unwrap();
    let h = PolandRoads.heuristic().unwrap();

    for kind in StrategyKindV1::ALL {
        let strategy = strategy_for(kind, &h);
        let baseline = search(&graph, &strategy, START, GOAL).unwrap();
        let bytes = baseline.trace.to_canonical_json_bytes().unwrap();
        assert!(is_canonical_json(&bytes));

        for _ in 1..RUNS {
            let again = search(&graph, &strategy, START, GOAL).unwrap();
            assert_eq!(again.trace, baseline.trace, "{kind}");
            assert_eq!(again.trace.to_canonical_json_bytes().unwrap(), bytes);
            assert_eq!(again.trace.digest().unwrap(), baseline.trace.digest().unwrap());
        }
    }
}

#[test]
fn trace_digests_differ_between_strategies() {
    let graph = PolandRoads.graph().unwrap();
    let h = PolandRoads.heuristic().unwrap();
    let digests: Vec<_> = StrategyKindV1::ALL
        .into_iter()
        .map(|k| {
            search(&graph, &strategy_for(k, &h), START, GOAL)
                .unwrap()
                .trace
                .digest()
                .unwrap()
        })
        .collect();
    assert_ne!(digests[0], digests[1]);
    assert_ne!(digests[1], digests[2]);
    assert_ne!(digests[0], digests[2]);
}

#[test]
fn bundle_digest_ignores_timings() {
    let with = run_comparison(&PolandRoads, &ComparisonConfig::default()).unwrap();
    let without = run_comparison(
        &PolandRoads,
        &ComparisonConfig {
            include_timings: false,
            ..ComparisonConfig::default()
        },
    )
    .unwrap();
    // Timings are observational, so they never reach the digest basis.
    assert_eq!(with.bundle.digest, without.bundle.digest);
    assert_ne!(with.bundle.manifest, without.bundle.manifest);
}

#[test]
fn graph_fingerprint_is_stable() {
    let a = PolandRoads.graph().unwrap().fingerprint().unwrap();
    let b = PolandRoads.graph().unwrap().fingerprint().unwrap();
    assert_eq!(a, b);
    assert_eq!(a.algorithm(), "sha256");
    assert_eq!(a.hex_digest().len(), 64);
}
