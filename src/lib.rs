//! Steiner trees in undirected weighted graphs: an exhaustive exact solver and the
//! Kou-Markowsky-Berman approximation.

pub mod config;
mod error;
mod graph;
pub mod instance;
pub mod logging;
mod metric_closure;
pub mod report;
mod shortest_paths;
mod spanning_tree;
mod steiner_tree;
mod util;

pub use error::{SteinerError, SteinerResult};
pub use graph::{EdgeWeight, Graph, NodeId, NodeIndex};
pub use metric_closure::{
    build_metric_closure, build_metric_closure_parallel, ClosureEdge, MetricClosure,
};
pub use shortest_paths::{dijkstra, ShortestPath};
pub use spanning_tree::SpanningForest;
pub use steiner_tree::exact::{solve_exact, ExactSolution, SearchLimits};
pub use steiner_tree::kou::solve_approximate;
pub use steiner_tree::tree::{SteinerTree, TreeEdge};
pub use util::{combinations, Combinations, GenericResult, NaturalOrInfinite};

use serde::{Deserialize, Serialize};

/// Which solver [solve] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Exhaustive search, exponential in the number of non-terminals.
    Exact,
    /// Kou-Markowsky-Berman approximation.
    Kou,
}

/// What is known about the weight of a [Solution].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Guarantee {
    Optimal,
    /// Within `2 (1 - 1/L)` of the optimum, `L` the number of leaves.
    Approximate,
    /// Best tree of an exact search that was stopped early.
    Truncated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution<N> {
    pub tree: SteinerTree<N>,
    pub guarantee: Guarantee,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveOptions {
    /// Bounds for [Algorithm::Exact]; ignored by [Algorithm::Kou].
    pub limits: SearchLimits,
    /// Build the metric closure for [Algorithm::Kou] on the rayon thread pool.
    pub parallel_closure: bool,
}

/// Run `algorithm` on `graph` and `terminals`.
pub fn solve<N: NodeId>(
    graph: &Graph<N>,
    terminals: &[N],
    algorithm: Algorithm,
    options: &SolveOptions,
) -> SteinerResult<Solution<N>> {
    match algorithm {
        Algorithm::Exact => {
            let solution = solve_exact(graph, terminals, options.limits)?;
            let guarantee = if solution.is_optimal() {
                Guarantee::Optimal
            } else {
                Guarantee::Truncated
            };
            Ok(Solution {
                tree: solution.into_tree(),
                guarantee,
            })
        }
        Algorithm::Kou => {
            let tree = if options.parallel_closure && terminals.len() > 1 {
                let closure = build_metric_closure_parallel(graph)?;
                solve_approximate(graph, terminals, Some(&closure))?
            } else {
                solve_approximate(graph, terminals, None)?
            };
            Ok(Solution {
                tree,
                guarantee: Guarantee::Approximate,
            })
        }
    }
}
