use crate::graph::{EdgeWeight, NodeId, NodeIndex};
use crate::spanning_tree::SpanningForest;
use crate::Graph;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Working tree over node indices of one graph, used while a solver builds its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EdgeTree {
    nodes: BTreeSet<NodeIndex>,
    // keys are always ordered pairs (a < b)
    edges: BTreeMap<(NodeIndex, NodeIndex), EdgeWeight>,
}

impl EdgeTree {
    pub fn single(node: NodeIndex) -> Self {
        Self {
            nodes: BTreeSet::from([node]),
            edges: BTreeMap::new(),
        }
    }

    pub fn from_forest(forest: &SpanningForest<EdgeWeight>) -> Self {
        let mut tree = Self {
            nodes: BTreeSet::new(),
            edges: BTreeMap::new(),
        };
        for &(a, b, weight) in forest.edges() {
            tree.nodes.insert(a);
            tree.nodes.insert(b);
            tree.edges.insert((a.min(b), a.max(b)), weight);
        }
        tree
    }

    /// Like [EdgeTree::from_forest], but also keeps members the forest has no edge for
    /// (a one-node candidate has no edges at all).
    pub fn spanning(members: &[NodeIndex], forest: &SpanningForest<EdgeWeight>) -> Self {
        let mut tree = Self::from_forest(forest);
        tree.nodes.extend(members.iter().copied());
        tree
    }

    pub fn nodes(&self) -> &BTreeSet<NodeIndex> {
        &self.nodes
    }

    #[cfg(test)]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Remove non-terminal leaves until every leaf is a terminal. A node whose last
    /// neighbor was pruned goes as well unless it is a terminal. Returns how many nodes
    /// were removed.
    ///
    /// `terminals` must be sorted.
    pub fn prune_leaves(&mut self, terminals: &[NodeIndex]) -> usize {
        debug_assert!(terminals.windows(2).all(|w| w[0] < w[1]));
        let is_terminal = |n: NodeIndex| terminals.binary_search(&n).is_ok();

        let mut adjacency: BTreeMap<NodeIndex, BTreeSet<NodeIndex>> =
            self.nodes.iter().map(|&n| (n, BTreeSet::new())).collect();
        for &(a, b) in self.edges.keys() {
            adjacency.entry(a).or_default().insert(b);
            adjacency.entry(b).or_default().insert(a);
        }
        let mut pending = adjacency
            .iter()
            .filter(|&(&n, neighbors)| neighbors.len() == 1 && !is_terminal(n))
            .map(|(&n, _)| n)
            .collect::<Vec<_>>();

        let mut removed = 0;
        while let Some(leaf) = pending.pop() {
            let Some(neighbors) = adjacency.get(&leaf) else {
                continue;
            };
            if neighbors.len() > 1 {
                continue;
            }
            let parent = neighbors.iter().next().copied();
            adjacency.remove(&leaf);
            self.nodes.remove(&leaf);
            removed += 1;
            if let Some(parent) = parent {
                self.edges.remove(&(leaf.min(parent), leaf.max(parent)));
                if let Some(siblings) = adjacency.get_mut(&parent) {
                    siblings.remove(&leaf);
                    if siblings.len() <= 1 && !is_terminal(parent) {
                        pending.push(parent);
                    }
                }
            }
        }
        removed
    }

    /// Copy the tree out of the graph's index space into caller ids.
    pub fn into_steiner_tree<N: NodeId>(self, graph: &Graph<N>) -> SteinerTree<N> {
        let nodes = self
            .nodes
            .iter()
            .map(|&n| graph.node(n).clone())
            .collect();
        let edges = self
            .edges
            .iter()
            .map(|(&(a, b), &weight)| TreeEdge {
                a: graph.node(a).clone(),
                b: graph.node(b).clone(),
                weight,
            })
            .collect::<Vec<_>>();
        let total_weight = edges.iter().map(|e| u64::from(e.weight)).sum();
        SteinerTree {
            nodes,
            edges,
            total_weight,
        }
    }
}

/// Edge of a [SteinerTree].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TreeEdge<N> {
    pub a: N,
    pub b: N,
    pub weight: EdgeWeight,
}

/// A tree spanning a set of terminals, returned by the solvers.
///
/// The tree owns copies of the node ids and edge weights, so it stays valid (and can be
/// modified or dropped) independently of the graph it was computed from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SteinerTree<N> {
    nodes: Vec<N>,
    edges: Vec<TreeEdge<N>>,
    total_weight: u64,
}

impl<N: NodeId> SteinerTree<N> {
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn edges(&self) -> &[TreeEdge<N>] {
        &self.edges
    }

    /// Sum of the edge weights.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, node: &N) -> bool {
        self.nodes.contains(node)
    }

    pub fn degree(&self, node: &N) -> usize {
        self.edges
            .iter()
            .filter(|e| &e.a == node || &e.b == node)
            .count()
    }

    /// Nodes with exactly one incident edge.
    pub fn leaves(&self) -> Vec<&N> {
        self.nodes.iter().filter(|n| self.degree(n) == 1).collect()
    }

    pub fn num_leaves(&self) -> usize {
        self.leaves().len()
    }

    /// Connected and acyclic.
    pub fn is_tree(&self) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        if self.edges.len() + 1 != self.nodes.len() {
            return false;
        }
        let position = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n, i))
            .collect::<HashMap<_, _>>();
        let mut adjacency = vec![vec![]; self.nodes.len()];
        for edge in &self.edges {
            let (Some(&a), Some(&b)) = (position.get(&edge.a), position.get(&edge.b)) else {
                return false;
            };
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![0];
        seen[0] = true;
        while let Some(top) = stack.pop() {
            for &next in &adjacency[top] {
                if !seen[next] {
                    seen[next] = true;
                    stack.push(next);
                }
            }
        }
        seen.iter().all(|&s| s)
    }

    /// `2 (1 - 1/L)` for the `L` leaves of this particular tree. Computed on an optimal
    /// tree it is the factor within which a Kou-Markowsky-Berman tree is guaranteed to be
    /// optimal. On the approximate tree itself it is only a figure for reports, not a bound
    /// that holds in general. `None` for trees with fewer than two leaves.
    pub fn approximation_bound(&self) -> Option<f64> {
        let leaves = self.num_leaves();
        (leaves >= 2).then(|| 2.0 * (1.0 - 1.0 / leaves as f64))
    }

    /// Realised ratio `total_weight / optimal`. `None` if `optimal` is zero.
    pub fn approximation_ratio(&self, optimal: u64) -> Option<f64> {
        (optimal > 0).then(|| self.total_weight as f64 / optimal as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{cycle_graph, indexed_graph};
    use crate::spanning_tree::kruskal;

    fn path_forest(pairs: &[(usize, usize, u32)]) -> SpanningForest<u32> {
        let mut nodes = pairs.iter().flat_map(|&(a, b, _)| [a, b]).collect::<Vec<_>>();
        nodes.sort_unstable();
        nodes.dedup();
        let universe = nodes.iter().max().map_or(0, |m| m + 1);
        kruskal(universe, &nodes, pairs.to_vec())
    }

    #[test]
    fn test_prune_leaves_chain() {
        // 0 - 1 - 2 - 3 - 4, terminals 1 and 2
        let forest = path_forest(&[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 4, 1)]);
        let mut tree = EdgeTree::from_forest(&forest);
        assert_eq!(tree.prune_leaves(&[1, 2]), 3);
        assert_eq!(tree.nodes(), &BTreeSet::from([1, 2]));
        assert_eq!(tree.num_edges(), 1);
    }

    #[test]
    fn test_prune_keeps_terminals_of_any_degree() {
        // star around 0 with a dangling path 3 - 4
        let forest = path_forest(&[(0, 1, 1), (0, 2, 1), (0, 3, 1), (3, 4, 1)]);
        let mut tree = EdgeTree::from_forest(&forest);
        assert_eq!(tree.prune_leaves(&[0, 1, 2]), 2);
        assert_eq!(tree.nodes(), &BTreeSet::from([0, 1, 2]));
        let mut untouched = EdgeTree::from_forest(&forest);
        assert_eq!(untouched.prune_leaves(&[1, 2, 4]), 0);
    }

    #[test]
    fn test_single_node_tree() {
        let graph = cycle_graph();
        let mut tree = EdgeTree::single(2);
        assert_eq!(tree.prune_leaves(&[2]), 0);
        let tree = tree.into_steiner_tree(&graph);
        assert_eq!(tree.nodes(), &[2]);
        assert!(tree.is_tree());
        assert_eq!(tree.total_weight(), 0);
        assert_eq!(tree.approximation_bound(), None);
    }

    #[test]
    fn test_into_steiner_tree() {
        let mut graph = Graph::new();
        graph.add_edge("x", "y", 3);
        graph.add_edge("y", "z", 4);
        graph.add_edge("z", "x", 10);
        let forest = graph.minimum_spanning_forest();
        let tree = EdgeTree::from_forest(&forest).into_steiner_tree(&graph);
        assert_eq!(tree.nodes(), &["x", "y", "z"]);
        assert_eq!(tree.total_weight(), 7);
        assert!(tree.is_tree());
        assert_eq!(tree.degree(&"y"), 2);
        let mut leaves = tree.leaves().into_iter().copied().collect::<Vec<_>>();
        leaves.sort_unstable();
        assert_eq!(leaves, vec!["x", "z"]);
        assert_eq!(tree.approximation_bound(), Some(1.0));
        assert_eq!(tree.approximation_ratio(7), Some(1.0));
        assert_eq!(tree.approximation_ratio(0), None);
    }

    #[test]
    fn test_is_tree_rejects_cycle_and_forest() {
        let graph = indexed_graph(4, &[(0, 1, 1), (2, 3, 1)]);
        let forest = EdgeTree::from_forest(&graph.minimum_spanning_forest());
        assert!(!forest.into_steiner_tree(&graph).is_tree());
        let cycle = SteinerTree {
            nodes: vec![0, 1, 2],
            edges: vec![
                TreeEdge { a: 0, b: 1, weight: 1 },
                TreeEdge { a: 1, b: 2, weight: 1 },
                TreeEdge { a: 2, b: 0, weight: 1 },
            ],
            total_weight: 3,
        };
        assert!(!cycle.is_tree());
    }

    #[test]
    fn test_serialize() -> crate::util::TestResult {
        let graph = indexed_graph(2, &[(0, 1, 5)]);
        let tree =
            EdgeTree::from_forest(&graph.minimum_spanning_forest()).into_steiner_tree(&graph);
        let json = serde_json::to_value(&tree)?;
        assert_eq!(json["total_weight"], 5);
        assert_eq!(json["edges"][0]["weight"], 5);
        Ok(())
    }
}
