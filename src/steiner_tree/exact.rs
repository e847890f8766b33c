use crate::error::{SteinerError, SteinerResult};
use crate::graph::{NodeId, NodeIndex};
use crate::spanning_tree::kruskal;
use crate::steiner_tree::tree::{EdgeTree, SteinerTree};
use crate::util::combinations;
use crate::Graph;
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// Bounds on the exhaustive search. The default is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Largest node subset (terminals included) that is tried.
    pub max_subset_size: Option<usize>,
    /// The search stops before the first subset evaluated after this instant.
    pub deadline: Option<Instant>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_subset_size(self, max_subset_size: usize) -> Self {
        Self {
            max_subset_size: Some(max_subset_size),
            ..self
        }
    }

    pub fn with_deadline(self, deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            ..self
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Result of [solve_exact].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExactSolution<N> {
    /// The whole search space was explored; the tree has minimum weight.
    Optimal(SteinerTree<N>),
    /// A limit cut the search short; the tree is the best one seen, with no guarantee.
    Truncated(SteinerTree<N>),
}

impl<N> ExactSolution<N> {
    pub fn tree(&self) -> &SteinerTree<N> {
        match self {
            Self::Optimal(tree) | Self::Truncated(tree) => tree,
        }
    }

    pub fn into_tree(self) -> SteinerTree<N> {
        match self {
            Self::Optimal(tree) | Self::Truncated(tree) => tree,
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, Self::Optimal(_))
    }
}

/// Minimum Steiner tree by exhaustive search.
///
/// Subsets are tried by increasing size, from the terminals alone up to all nodes. Every
/// subset contains all terminals plus some non-terminals; the minimum spanning tree of
/// the subgraph it induces is a candidate if it is connected. The lightest candidate wins
/// and ties keep the first one found.
///
/// **Cost is exponential**: `O(2^(n-t) · m log m)` for `n` nodes, `t` terminals and `m`
/// edges. Use it for small instances and for checking approximations only, and bound it
/// with `limits` when the instance size is not known to be small. When a limit stops the
/// search early the best tree so far is returned as [ExactSolution::Truncated]; if
/// nothing qualified by then the result is [SteinerError::SearchTruncated].
///
/// Fails with [SteinerError::NoSteinerTreeFound] when the terminals are not all in one
/// connected component.
pub fn solve_exact<N: NodeId>(
    graph: &Graph<N>,
    terminals: &[N],
    limits: SearchLimits,
) -> SteinerResult<ExactSolution<N>> {
    let terminals = graph.resolve_terminals(terminals)?;
    let steiner_nodes = graph
        .node_indices()
        .filter(|n| terminals.binary_search(n).is_err())
        .collect::<Vec<_>>();
    let n = graph.num_nodes();
    let largest = limits.max_subset_size.map_or(n, |k| k.min(n));
    let mut truncated = largest < n;

    let mut best: Option<(u64, EdgeTree)> = None;
    let mut explored = 0u64;
    let mut members: Vec<NodeIndex> = Vec::with_capacity(n);
    'search: for size in terminals.len()..=largest {
        for extra in combinations(&steiner_nodes, size - terminals.len()) {
            if limits.expired() {
                truncated = true;
                break 'search;
            }
            explored += 1;
            members.clear();
            members.extend_from_slice(&terminals);
            members.extend(extra);
            let forest = kruskal(n, &members, graph.induced_edges(&members));
            if !forest.is_tree() {
                continue;
            }
            let weight = forest.weight();
            if best.as_ref().map_or(true, |(lightest, _)| weight < *lightest) {
                best = Some((weight, EdgeTree::spanning(&members, &forest)));
            }
        }
        debug!("subsets up to size {} explored ({} so far)", size, explored);
    }

    match (best, truncated) {
        (Some((weight, tree)), false) => {
            info!("exact: optimum {} after {} subsets", weight, explored);
            Ok(ExactSolution::Optimal(tree.into_steiner_tree(graph)))
        }
        (Some((weight, tree)), true) => {
            warn!(
                "exact search truncated after {} subsets, best weight {} is not proven optimal",
                explored, weight
            );
            Ok(ExactSolution::Truncated(tree.into_steiner_tree(graph)))
        }
        (None, true) => Err(SteinerError::SearchTruncated { explored }),
        (None, false) => Err(SteinerError::NoSteinerTreeFound {
            context: format!(
                "terminals {:?} are not connected to each other",
                terminals.iter().map(|&t| graph.node(t)).collect::<Vec<_>>()
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{
        cycle_graph, indexed_graph, small_test_graph, steiner_example_paper,
        steiner_example_wiki,
    };
    use crate::util::TestResult;

    fn optimum(graph: &Graph<usize>, terminals: &[usize]) -> SteinerResult<SteinerTree<usize>> {
        match solve_exact(graph, terminals, SearchLimits::unbounded())? {
            ExactSolution::Optimal(tree) => Ok(tree),
            ExactSolution::Truncated(_) => panic!("unbounded search was truncated"),
        }
    }

    #[test]
    fn test_exact_trivial() -> TestResult {
        let (graph, terminals) = small_test_graph();
        assert_eq!(optimum(&graph, &terminals)?.total_weight(), 3);
        Ok(())
    }

    #[test]
    fn test_exact_cycle_keeps_first_of_equal_trees() -> TestResult {
        let tree = optimum(&cycle_graph(), &[0, 2])?;
        assert_eq!(tree.total_weight(), 2);
        assert_eq!(tree.nodes(), &[0, 1, 2]);
        Ok(())
    }

    #[test]
    fn test_exact_star() -> TestResult {
        let graph = Graph::from_edges([('c', 'a', 5), ('c', 'b', 5), ('c', 'd', 5)]);
        let solution = solve_exact(&graph, &['a', 'b', 'd'], SearchLimits::unbounded())?;
        assert!(solution.is_optimal());
        assert_eq!(solution.tree().total_weight(), 15);
        assert_eq!(solution.tree().num_edges(), 3);
        Ok(())
    }

    #[test]
    fn test_exact_wiki_example() -> TestResult {
        let (graph, terminals) = steiner_example_wiki();
        let tree = optimum(&graph, &terminals)?;
        assert_eq!(tree.total_weight(), 25 + 30 + 15 + 10 + 40 + 50 + 20);
        assert!(tree.is_tree());
        Ok(())
    }

    #[test]
    fn test_exact_paper_example() -> TestResult {
        let (graph, terminals) = steiner_example_paper();
        let tree = optimum(&graph, &terminals)?;
        assert_eq!(tree.total_weight(), 5);
        // the star around 5 (with 5-2 of weight 2) is found before 5-6-2 of equal weight
        assert!(tree.contains(&5));
        assert_eq!(tree.num_nodes(), 5);
        Ok(())
    }

    #[test]
    fn test_exact_all_terminals_is_mst() -> TestResult {
        let (graph, _) = steiner_example_paper();
        let all = graph.nodes().to_vec();
        let tree = optimum(&graph, &all)?;
        assert_eq!(tree.total_weight(), graph.minimum_spanning_forest().weight());
        Ok(())
    }

    #[test]
    fn test_exact_single_terminal() -> TestResult {
        let tree = optimum(&cycle_graph(), &[1])?;
        assert_eq!(tree.nodes(), &[1]);
        assert_eq!(tree.total_weight(), 0);
        Ok(())
    }

    #[test]
    fn test_exact_disconnected() {
        let graph = indexed_graph(4, &[(0, 1, 1), (2, 3, 1)]);
        assert!(matches!(
            solve_exact(&graph, &[0, 3], SearchLimits::unbounded()),
            Err(SteinerError::NoSteinerTreeFound { .. })
        ));
        assert_eq!(
            solve_exact(&graph, &[], SearchLimits::unbounded()),
            Err(SteinerError::EmptyTerminalSet)
        );
    }

    #[test]
    fn test_exact_subset_cap() -> TestResult {
        let (graph, terminals) = steiner_example_paper();
        let limits = SearchLimits::unbounded().with_max_subset_size(4);
        let capped = solve_exact(&graph, &terminals, limits)?;
        assert!(!capped.is_optimal());
        assert_eq!(capped.tree().total_weight(), 6);

        let (wiki, terminals) = steiner_example_wiki();
        assert_eq!(
            solve_exact(&wiki, &terminals, SearchLimits::unbounded().with_max_subset_size(5)),
            Err(SteinerError::SearchTruncated { explored: 1 })
        );
        Ok(())
    }

    #[test]
    fn test_exact_cap_at_node_count_is_not_truncation() -> TestResult {
        let (graph, terminals) = small_test_graph();
        let limits = SearchLimits::unbounded().with_max_subset_size(3);
        let solution = solve_exact(&graph, &terminals, limits)?;
        assert!(solution.is_optimal());
        Ok(())
    }

    #[test]
    fn test_exact_expired_deadline() {
        let (graph, terminals) = steiner_example_wiki();
        let limits = SearchLimits::unbounded().with_deadline(Instant::now());
        assert_eq!(
            solve_exact(&graph, &terminals, limits),
            Err(SteinerError::SearchTruncated { explored: 0 })
        );
    }
}
