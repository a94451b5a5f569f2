//! Binary that runs the reference world through the comparison runner and
//! prints deterministic `key=value` lines for cross-process checks.
//!
//! Usage: `route_fixture`
//! Output, per strategy `<s>` in `dfs`, `bfs`, `astar`:
//!   `<s>_path`=Glogow,Leszno,...
//!   `<s>_cost`=440
//!   `<s>_expanded`=5
//!   `<s>_steps`=6
//!   `<s>_trace_digest`=sha256:...
//! then `artifact_count`=5 and `bundle_digest`=sha256:...
//!
//! Timings are observational and left out, so every line is reproducible.
//! Logs go to stderr as JSON; stdout carries only the lines above.

use wayfinder_harness::logging::init_structured_logging;
use wayfinder_harness::runner::{run_comparison, ComparisonConfig};
use wayfinder_harness::worlds::poland_roads::PolandRoads;

fn main() {
    init_structured_logging();

    let config = ComparisonConfig {
        include_timings: false,
        ..ComparisonConfig::default()
    };
    let run = run_comparison(&PolandRoads, &config).expect("comparison run failed");

    for row in &run.report.rows {
        let s = row.strategy.as_str();
        let path = row.path.as_ref().map_or_else(String::new, |p| p.nodes.join(","));
        let cost = row.cost().map_or_else(|| "none".to_string(), |c| c.to_string());
        println!("{s}_path={path}");
        println!("{s}_cost={cost}");
        println!("{s}_expanded={}", row.nodes_expanded);
        println!("{s}_steps={}", row.steps);
        println!("{s}_trace_digest={}", row.trace_digest.as_str());
    }
    println!("artifact_count={}", run.bundle.artifacts.len());
    println!("bundle_digest={}", run.bundle.digest.as_str());
}
