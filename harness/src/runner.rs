//! Comparison runner: run several strategies on one world and package the
//! traces, report, and world description as an artifact bundle.
//!
//! # Pipeline
//!
//! ```text
//! world.graph() + world.heuristic()
//!   → [search() → verify_result()] × strategies
//!   → ComparisonReportV1 + HeuristicAuditV1
//!   → world.json, trace_<kind>.json, comparison.json, timings.json
//!   → build_bundle()
//! ```
//!
//! Every trace is replay-verified before it is written. A run that cannot
//! be verified produces no bundle.

use tracing::info;

use wayfinder_kernel::model::heuristic::HeuristicTableV1;
use wayfinder_kernel::model::road_graph::RoadGraphV1;
use wayfinder_kernel::proof::canon::{canonical_json_bytes, CanonError};
use wayfinder_kernel::proof::hash::canonical_hash;
use wayfinder_search::error::SearchError;
use wayfinder_search::policy::{Strategy, StrategyKindV1};
use wayfinder_search::replay::{verify_result, ReplayError};
use wayfinder_search::search::{search, SearchResult};

use crate::audit::{audit_heuristic, HeuristicAuditV1};
use crate::bundle::{
    build_bundle, trace_artifact_name, ArtifactBundleV1, ArtifactInput, BundleBuildError,
    COMPARISON_ARTIFACT, DOMAIN_BUNDLE_ARTIFACT, TIMINGS_ARTIFACT, WORLD_ARTIFACT,
};
use crate::contract::{RouteWorldV1, WorldError};
use crate::metrics::ComparisonReportV1;

/// What a comparison run executes and emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonConfig {
    /// Strategies to run, in report order. Duplicates are rejected.
    pub strategies: Vec<StrategyKindV1>,
    /// Include the observational `timings.json` artifact.
    pub include_timings: bool,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            strategies: StrategyKindV1::ALL.to_vec(),
            include_timings: true,
        }
    }
}

/// Error during a comparison run.
#[derive(Debug)]
pub enum RunError {
    /// The world's data failed validation.
    World(WorldError),
    /// `config.strategies` is empty.
    NoStrategies,
    /// `config.strategies` names a strategy twice.
    DuplicateStrategy { strategy: StrategyKindV1 },
    /// The engine rejected the inputs.
    Search(SearchError),
    /// A finished search failed replay verification.
    Replay {
        strategy: StrategyKindV1,
        error: ReplayError,
    },
    /// Canonical JSON serialization failed.
    Canon(CanonError),
    /// Bundle assembly failed.
    Bundle(BundleBuildError),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::World(e) => write!(f, "{e}"),
            Self::NoStrategies => write!(f, "no strategies configured"),
            Self::DuplicateStrategy { strategy } => {
                write!(f, "strategy {strategy} configured more than once")
            }
            Self::Search(e) => write!(f, "search rejected inputs: {e}"),
            Self::Replay { strategy, error } => {
                write!(f, "{strategy} trace failed replay: {error}")
            }
            Self::Canon(e) => write!(f, "canonical JSON: {e}"),
            Self::Bundle(e) => write!(f, "bundle: {e}"),
        }
    }
}

impl std::error::Error for RunError {}

impl From<WorldError> for RunError {
    fn from(e: WorldError) -> Self {
        Self::World(e)
    }
}

impl From<SearchError> for RunError {
    fn from(e: SearchError) -> Self {
        Self::Search(e)
    }
}

impl From<CanonError> for RunError {
    fn from(e: CanonError) -> Self {
        Self::Canon(e)
    }
}

impl From<BundleBuildError> for RunError {
    fn from(e: BundleBuildError) -> Self {
        Self::Bundle(e)
    }
}

/// Everything a comparison run produced.
#[derive(Debug)]
pub struct ComparisonRunV1 {
    /// One result per configured strategy, in config order.
    pub results: Vec<SearchResult>,
    pub report: ComparisonReportV1,
    pub audit: HeuristicAuditV1,
    pub bundle: ArtifactBundleV1,
}

impl ComparisonRunV1 {
    #[must_use]
    pub fn result(&self, strategy: StrategyKindV1) -> Option<&SearchResult> {
        self.results.iter().find(|r| r.strategy == strategy)
    }
}

/// Run every configured strategy on `world` and bundle the evidence.
///
/// # Errors
///
/// Returns [`RunError`] if the world is malformed, the config is empty or
/// repeats a strategy, the engine rejects the inputs, a trace fails replay,
/// or the bundle cannot be assembled.
pub fn run_comparison(
    world: &dyn RouteWorldV1,
    config: &ComparisonConfig,
) -> Result<ComparisonRunV1, RunError> {
    check_config(config)?;

    let graph = world.graph()?;
    let heuristic = world.heuristic()?;
    let (start, goal) = (world.start(), world.goal());

    info!(
        world_id = world.world_id(),
        nodes = graph.node_count(),
        roads = graph.road_count(),
        start,
        goal,
        "comparison started"
    );

    let mut results = Vec::with_capacity(config.strategies.len());
    for &kind in &config.strategies {
        let result = search(&graph, &strategy_for(kind, &heuristic), start, goal)?;
        verify_result(&result, &graph).map_err(|error| RunError::Replay {
            strategy: kind,
            error,
        })?;
        info!(
            strategy = kind.as_str(),
            reached = result.is_goal_reached(),
            cost = result.cost(),
            expanded = result.nodes_expanded,
            steps = result.steps,
            "strategy finished"
        );
        results.push(result);
    }

    let report = ComparisonReportV1::from_results(world.world_id(), &graph, start, goal, &results)?;
    let audit = audit_heuristic(&graph, &heuristic, goal);
    let bundle = assemble_bundle(world, &graph, &heuristic, &results, &report, &audit, config)?;

    info!(
        world_id = world.world_id(),
        artifacts = bundle.artifacts.len(),
        digest = bundle.digest.as_str(),
        "bundle built"
    );

    Ok(ComparisonRunV1 {
        results,
        report,
        audit,
        bundle,
    })
}

/// The engine strategy for `kind`; A* borrows `heuristic`.
#[must_use]
pub fn strategy_for(kind: StrategyKindV1, heuristic: &HeuristicTableV1) -> Strategy<'_> {
    match kind {
        StrategyKindV1::DepthFirst => Strategy::DepthFirst,
        StrategyKindV1::BreadthFirst => Strategy::BreadthFirst,
        StrategyKindV1::AStar => Strategy::AStar { heuristic },
    }
}

fn check_config(config: &ComparisonConfig) -> Result<(), RunError> {
    if config.strategies.is_empty() {
        return Err(RunError::NoStrategies);
    }
    for (i, kind) in config.strategies.iter().enumerate() {
        if config.strategies[..i].contains(kind) {
            return Err(RunError::DuplicateStrategy { strategy: *kind });
        }
    }
    Ok(())
}

/// Self-contained description of the world, enough to rerun the searches.
fn world_json_value(
    world: &dyn RouteWorldV1,
    graph: &RoadGraphV1,
    heuristic: &HeuristicTableV1,
) -> serde_json::Value {
    serde_json::json!({
        "goal": world.goal(),
        "graph": graph.to_json_value(),
        "heuristic": heuristic.to_json_value(),
        "schema_version": "world.v1",
        "start": world.start(),
        "world_id": world.world_id(),
    })
}

fn assemble_bundle(
    world: &dyn RouteWorldV1,
    graph: &RoadGraphV1,
    heuristic: &HeuristicTableV1,
    results: &[SearchResult],
    report: &ComparisonReportV1,
    audit: &HeuristicAuditV1,
    config: &ComparisonConfig,
) -> Result<ArtifactBundleV1, RunError> {
    let world_bytes = canonical_json_bytes(&world_json_value(world, graph, heuristic))?;
    let world_hash = canonical_hash(DOMAIN_BUNDLE_ARTIFACT, &world_bytes);

    let mut comparison = report.to_json_value();
    comparison["heuristic_audit"] = audit.to_json_value();
    comparison["world_digest"] = serde_json::Value::String(world_hash.as_str().to_string());
    let comparison_bytes = canonical_json_bytes(&comparison)?;

    let mut artifacts = vec![
        ArtifactInput {
            name: WORLD_ARTIFACT.to_string(),
            content: world_bytes,
            normative: true,
            precomputed_hash: Some(world_hash),
        },
        ArtifactInput::from((COMPARISON_ARTIFACT.to_string(), comparison_bytes, true)),
    ];
    for result in results {
        artifacts.push(ArtifactInput::from((
            trace_artifact_name(result.strategy.as_str()),
            result.trace.to_canonical_json_bytes()?,
            true,
        )));
    }
    if config.include_timings {
        artifacts.push(ArtifactInput::from((
            TIMINGS_ARTIFACT.to_string(),
            canonical_json_bytes(&report.timings_json_value())?,
            false,
        )));
    }

    Ok(build_bundle(artifacts)?)
}
