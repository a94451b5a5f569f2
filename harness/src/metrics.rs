//! Per-strategy performance metrics and the side-by-side comparison report.
//!
//! Everything except wall-clock time is a pure function of the search
//! trace, so [`ComparisonReportV1::to_json_value`] is deterministic. Timings
//! live in a separate, observational projection.

use std::fmt::Write as _;
use std::time::Duration;

use wayfinder_kernel::model::road_graph::RoadGraphV1;
use wayfinder_kernel::proof::canon::CanonError;
use wayfinder_kernel::proof::hash::ContentHash;
use wayfinder_search::policy::StrategyKindV1;
use wayfinder_search::search::{RoutePathV1, SearchResult};

/// Metrics for one strategy run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyMetricsV1 {
    pub strategy: StrategyKindV1,
    pub path: Option<RoutePathV1>,
    pub nodes_expanded: u64,
    pub steps: u64,
    /// Largest frontier snapshot over the trace.
    pub max_frontier_size: usize,
    /// Largest closed set over the trace.
    pub max_closed_size: usize,
    pub frontier_high_water: u64,
    pub trace_records: usize,
    pub trace_digest: ContentHash,
    pub elapsed: Duration,
}

impl StrategyMetricsV1 {
    /// Derive metrics from a finished search.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if the trace cannot be digested.
    pub fn from_result(result: &SearchResult) -> Result<Self, CanonError> {
        let records = &result.trace.records;
        Ok(Self {
            strategy: result.strategy,
            path: result.path.clone(),
            nodes_expanded: result.nodes_expanded,
            steps: result.steps,
            max_frontier_size: records.iter().map(|r| r.frontier.len()).max().unwrap_or(0),
            max_closed_size: records.iter().map(|r| r.closed.len()).max().unwrap_or(0),
            frontier_high_water: result.frontier_high_water,
            trace_records: records.len(),
            trace_digest: result.trace.digest()?,
            elapsed: result.elapsed,
        })
    }

    #[must_use]
    pub fn cost(&self) -> Option<i64> {
        self.path.as_ref().map(|p| p.cost)
    }

    /// Nodes on the path, start and goal included.
    #[must_use]
    pub fn path_length(&self) -> Option<usize> {
        self.path.as_ref().map(|p| p.nodes.len())
    }
}

/// Side-by-side comparison of several strategies on one world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonReportV1 {
    pub world_id: String,
    pub start: String,
    pub goal: String,
    pub node_count: usize,
    pub road_count: usize,
    /// One row per strategy, in run order.
    pub rows: Vec<StrategyMetricsV1>,
}

impl ComparisonReportV1 {
    /// Build a report from finished searches on `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if a trace cannot be digested.
    pub fn from_results(
        world_id: &str,
        graph: &RoadGraphV1,
        start: &str,
        goal: &str,
        results: &[SearchResult],
    ) -> Result<Self, CanonError> {
        let rows = results
            .iter()
            .map(StrategyMetricsV1::from_result)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            world_id: world_id.to_string(),
            start: start.to_string(),
            goal: goal.to_string(),
            node_count: graph.node_count(),
            road_count: graph.road_count(),
            rows,
        })
    }

    #[must_use]
    pub fn row(&self, strategy: StrategyKindV1) -> Option<&StrategyMetricsV1> {
        self.rows.iter().find(|r| r.strategy == strategy)
    }

    /// Cheapest cost any strategy found.
    #[must_use]
    pub fn best_cost(&self) -> Option<i64> {
        self.rows.iter().filter_map(StrategyMetricsV1::cost).min()
    }

    /// Whether `strategy` matched the cheapest cost found. `None` if it
    /// did not run or found no path.
    #[must_use]
    pub fn is_cost_optimal(&self, strategy: StrategyKindV1) -> Option<bool> {
        let cost = self.row(strategy)?.cost()?;
        Some(Some(cost) == self.best_cost())
    }

    /// Metric × strategy box table for terminal output.
    #[must_use]
    pub fn render_summary_table(&self) -> String {
        const LABEL: usize = 25;
        const CELL: usize = 15;

        let rule = |left: &str, mid: &str, right: &str| {
            let mut line = String::from(left);
            line.push_str(&"─".repeat(LABEL));
            for _ in &self.rows {
                line.push_str(mid);
                line.push_str(&"─".repeat(CELL));
            }
            line.push_str(right);
            line.push('\n');
            line
        };
        let row = |label: &str, cells: &[String]| {
            let mut line = format!("│ {label:<w$} ", w = LABEL - 2);
            for cell in cells {
                let _ = write!(line, "│ {cell:<w$} ", w = CELL - 2);
            }
            line.push_str("│\n");
            line
        };
        let cells = |f: &dyn Fn(&StrategyMetricsV1) -> String| -> Vec<String> {
            self.rows.iter().map(f).collect()
        };
        let or_na = |v: Option<String>| v.unwrap_or_else(|| "N/A".to_string());

        let mut out = String::new();
        out.push_str(&rule("┌", "┬", "┐"));
        let headers: Vec<String> = self
            .rows
            .iter()
            .map(|r| r.strategy.display_name().to_string())
            .collect();
        out.push_str(&row("Metric", &headers));
        out.push_str(&rule("├", "┼", "┤"));
        out.push_str(&row(
            "Path Cost (km)",
            &cells(&|m| or_na(m.cost().map(|c| c.to_string()))),
        ));
        out.push_str(&row(
            "Path Length (nodes)",
            &cells(&|m| or_na(m.path_length().map(|n| n.to_string()))),
        ));
        out.push_str(&row(
            "Nodes Expanded",
            &cells(&|m| m.nodes_expanded.to_string()),
        ));
        out.push_str(&row("Total Steps", &cells(&|m| m.steps.to_string())));
        out.push_str(&row(
            "Max Open Size",
            &cells(&|m| m.max_frontier_size.to_string()),
        ));
        out.push_str(&row(
            "Max Closed Size",
            &cells(&|m| m.max_closed_size.to_string()),
        ));
        out.push_str(&row(
            "Execution Time (ms)",
            &cells(&|m| format!("{:.2}", m.elapsed.as_secs_f64() * 1000.0)),
        ));
        out.push_str(&rule("└", "┴", "┘"));
        out
    }

    /// Deterministic projection. Excludes timings.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let best = self.best_cost();
        let rows: Vec<serde_json::Value> = self
            .rows
            .iter()
            .map(|m| {
                serde_json::json!({
                    "cost": m.cost(),
                    "cost_optimal": m.cost().map(|c| Some(c) == best),
                    "frontier_high_water": m.frontier_high_water,
                    "max_closed_size": m.max_closed_size,
                    "max_frontier_size": m.max_frontier_size,
                    "nodes_expanded": m.nodes_expanded,
                    "path": m.path.as_ref().map(|p| p.nodes.clone()),
                    "path_length": m.path_length(),
                    "steps": m.steps,
                    "strategy": m.strategy.as_str(),
                    "trace_digest": m.trace_digest.as_str(),
                    "trace_records": m.trace_records,
                })
            })
            .collect();
        serde_json::json!({
            "best_cost": best,
            "goal": self.goal,
            "node_count": self.node_count,
            "road_count": self.road_count,
            "rows": rows,
            "schema_version": "comparison.v1",
            "start": self.start,
            "world_id": self.world_id,
        })
    }

    /// Observational projection: elapsed wall-clock time per strategy, in
    /// whole microseconds.
    #[must_use]
    pub fn timings_json_value(&self) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = self
            .rows
            .iter()
            .map(|m| {
                serde_json::json!({
                    "elapsed_us": u64::try_from(m.elapsed.as_micros()).unwrap_or(u64::MAX),
                    "strategy": m.strategy.as_str(),
                })
            })
            .collect();
        serde_json::json!({
            "rows": rows,
            "schema_version": "timings.v1",
            "world_id": self.world_id,
        })
    }
}
