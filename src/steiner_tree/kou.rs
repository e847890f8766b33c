use crate::error::{SteinerError, SteinerResult};
use crate::graph::{NodeId, NodeIndex};
use crate::metric_closure::{build_metric_closure, MetricClosure};
use crate::spanning_tree::kruskal;
use crate::steiner_tree::tree::{EdgeTree, SteinerTree};
use crate::util::combinations;
use crate::Graph;
use log::{debug, info};
use std::collections::BTreeSet;

/// Approximate Steiner tree by Kou, Markowsky and Berman.
///
/// 1. metric closure of the whole graph (`closure`, or built here when `None`),
/// 2. minimum spanning tree of the closure restricted to the terminals,
/// 3. each tree edge replaced by its shortest path in the graph,
/// 4. minimum spanning tree of the subgraph formed by those path edges,
/// 5. non-terminal leaves pruned until all leaves are terminals.
///
/// The weight of the result is at most `2 (1 - 1/L)` times the optimum, `L` being the
/// number of leaves of an optimal tree. Passing a closure built by
/// [build_metric_closure](crate::build_metric_closure) on the same graph avoids
/// recomputing it for every terminal set.
///
/// Fails with [SteinerError::EmptyTerminalSet], [SteinerError::UnknownTerminal],
/// [SteinerError::ClosureMismatch] or, if the graph is not connected,
/// [SteinerError::DisconnectedGraph]. A single terminal yields a one-node tree.
pub fn solve_approximate<N: NodeId>(
    graph: &Graph<N>,
    terminals: &[N],
    closure: Option<&MetricClosure>,
) -> SteinerResult<SteinerTree<N>> {
    let terminals = graph.resolve_terminals(terminals)?;
    if let [only] = terminals[..] {
        return Ok(EdgeTree::single(only).into_steiner_tree(graph));
    }

    let built;
    let closure = match closure {
        Some(closure) => {
            closure.check_matches(graph)?;
            closure
        }
        None => {
            built = build_metric_closure(graph)?;
            &built
        }
    };

    let terminal_tree = terminal_spanning_tree(closure, &terminals)?;
    let candidates = expand_paths(graph, closure, &terminal_tree)?;
    debug!(
        "terminal tree expanded into {} candidate edges",
        candidates.len()
    );

    let forest = graph.spanning_forest_of(candidates);
    if !forest.is_tree() {
        return Err(SteinerError::GraphNotConnected {
            components: forest.components(),
        });
    }
    let mut tree = EdgeTree::from_forest(&forest);
    if terminals.iter().any(|t| !tree.nodes().contains(t)) {
        return Err(closure.mismatch(graph));
    }
    let pruned = tree.prune_leaves(&terminals);
    debug!("pruned {} non-terminal nodes", pruned);

    let tree = tree.into_steiner_tree(graph);
    info!(
        "kou: {} terminals, tree of {} nodes with weight {}",
        terminals.len(),
        tree.num_nodes(),
        tree.total_weight()
    );
    Ok(tree)
}

/// Minimum spanning tree of the closure restricted to `terminals`, as pairs of graph
/// node indices.
fn terminal_spanning_tree(
    closure: &MetricClosure,
    terminals: &[NodeIndex],
) -> SteinerResult<Vec<(NodeIndex, NodeIndex)>> {
    let positions = (0..terminals.len()).collect::<Vec<_>>();
    let edges = combinations(&positions, 2)
        .map(|pair| {
            let (i, j) = (pair[0], pair[1]);
            (i, j, closure.distance(terminals[i], terminals[j]))
        })
        .collect::<Vec<_>>();
    let forest = kruskal(terminals.len(), &positions, edges);
    if !forest.is_tree() {
        return Err(SteinerError::GraphNotConnected {
            components: forest.components(),
        });
    }
    debug!(
        "terminal tree in the metric closure has weight {}",
        forest.weight()
    );
    Ok(forest
        .edges()
        .iter()
        .map(|&(i, j, _)| (terminals[i], terminals[j]))
        .collect())
}

/// Consecutive node pairs along the shortest path of every closure edge, deduplicated
/// and ordered. Every path must run from `u` to `v` over edges of `graph`.
fn expand_paths<N: NodeId>(
    graph: &Graph<N>,
    closure: &MetricClosure,
    closure_edges: &[(NodeIndex, NodeIndex)],
) -> SteinerResult<BTreeSet<(NodeIndex, NodeIndex)>> {
    let mut pairs = BTreeSet::new();
    for &(u, v) in closure_edges {
        let path = closure.path(u, v);
        if path.first() != Some(&u) || path.last() != Some(&v) {
            return Err(closure.mismatch(graph));
        }
        for step in path.windows(2) {
            if graph.min_weight(step[0], step[1]).is_none() {
                return Err(closure.mismatch(graph));
            }
            pairs.insert((step[0].min(step[1]), step[0].max(step[1])));
        }
    }
    Ok(pairs)
}
