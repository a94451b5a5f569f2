//! Strategy selection.

use wayfinder_kernel::model::heuristic::HeuristicTableV1;

/// Which search algorithm to run, with its per-strategy inputs.
#[derive(Debug, Clone, Copy)]
pub enum Strategy<'h> {
    /// Stack frontier, neighbors visited in declaration order.
    DepthFirst,
    /// Queue frontier, neighbors in lexicographic order.
    BreadthFirst,
    /// Priority frontier keyed on `g + h`.
    AStar { heuristic: &'h HeuristicTableV1 },
}

impl Strategy<'_> {
    #[must_use]
    pub fn kind(&self) -> StrategyKindV1 {
        match self {
            Self::DepthFirst => StrategyKindV1::DepthFirst,
            Self::BreadthFirst => StrategyKindV1::BreadthFirst,
            Self::AStar { .. } => StrategyKindV1::AStar,
        }
    }
}

/// Data-free strategy tag used in traces, reports, and artifact names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StrategyKindV1 {
    DepthFirst,
    BreadthFirst,
    AStar,
}

impl StrategyKindV1 {
    /// Every strategy, in the canonical comparison order.
    pub const ALL: [Self; 3] = [Self::DepthFirst, Self::BreadthFirst, Self::AStar];

    /// Short machine name: `dfs`, `bfs`, `astar`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DepthFirst => "dfs",
            Self::BreadthFirst => "bfs",
            Self::AStar => "astar",
        }
    }

    /// Display name used in summary tables and log lines.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::DepthFirst => "DFS",
            Self::BreadthFirst => "BFS",
            Self::AStar => "A*",
        }
    }

    /// Parse the short machine name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl std::fmt::Display for StrategyKindV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
