use crate::error::{SteinerError, SteinerResult};
use crate::spanning_tree::{kruskal, SpanningForest};
use crate::util::NaturalOrInfinite;
use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;

pub type NodeIndex = usize;
pub type EdgeWeight = u32;

/// Requirements on caller-chosen node identifiers.
pub trait NodeId: Clone + Eq + Hash + Debug + Send + Sync {}

impl<T: Clone + Eq + Hash + Debug + Send + Sync> NodeId for T {}

#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub struct Edge {
    to: NodeIndex,
    weight: EdgeWeight,
}

/// Undirected multigraph with non-negative integer weights.
///
/// Nodes live in an arena and are addressed by [NodeIndex] internally; the caller's
/// identifiers are only used at the boundary. Parallel edges are all kept in the adjacency
/// lists, and a per-pair index remembers the cheapest one, which is the only edge between
/// the pair that tree construction ever uses.
#[derive(Clone, Debug)]
pub struct Graph<N> {
    nodes: Vec<N>,
    indices: HashMap<N, NodeIndex>,
    adjacency: Vec<Vec<Edge>>,
    num_edges: usize,
    /// One entry per connected pair `(a, b)` with `a < b`, in order of first insertion,
    /// carrying the minimum weight among the parallel edges.
    cheapest: Vec<(NodeIndex, NodeIndex, EdgeWeight)>,
    pair_index: HashMap<(NodeIndex, NodeIndex), usize>,
}

impl<N: NodeId> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeId> Graph<N> {
    pub fn new() -> Self {
        Self {
            nodes: vec![],
            indices: HashMap::new(),
            adjacency: vec![],
            num_edges: 0,
            cheapest: vec![],
            pair_index: HashMap::new(),
        }
    }

    pub fn from_edges<I: IntoIterator<Item = (N, N, EdgeWeight)>>(edges: I) -> Self {
        let mut graph = Self::new();
        for (a, b, weight) in edges {
            graph.add_edge(a, b, weight);
        }
        graph
    }

    /// Insert a node if it is not present yet and return its index.
    pub fn add_node(&mut self, id: N) -> NodeIndex {
        if let Some(&index) = self.indices.get(&id) {
            return index;
        }
        let index = self.nodes.len();
        self.indices.insert(id.clone(), index);
        self.nodes.push(id);
        self.adjacency.push(vec![]);
        index
    }

    /// Add an undirected edge, creating missing endpoints. An existing edge between the
    /// same pair is kept alongside the new one.
    pub fn add_edge(&mut self, a: N, b: N, weight: EdgeWeight) {
        let a = self.add_node(a);
        let b = self.add_node(b);
        self.adjacency[a].push(Edge { to: b, weight });
        if a != b {
            self.adjacency[b].push(Edge { to: a, weight });
            let key = (a.min(b), a.max(b));
            match self.pair_index.get(&key) {
                Some(&slot) => {
                    let entry = &mut self.cheapest[slot].2;
                    *entry = (*entry).min(weight);
                }
                None => {
                    self.pair_index.insert(key, self.cheapest.len());
                    self.cheapest.push((key.0, key.1, weight));
                }
            }
        }
        self.num_edges += 1;
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges, counting parallel edges separately.
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Iterator over the node indices.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        0..self.num_nodes()
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn node(&self, index: NodeIndex) -> &N {
        &self.nodes[index]
    }

    pub fn node_index(&self, id: &N) -> Option<NodeIndex> {
        self.indices.get(id).copied()
    }

    /// Adjacent nodes with the weight of the connecting edge. A neighbor reached by
    /// parallel edges appears once per edge.
    pub fn neighbors(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, EdgeWeight)> + '_ {
        self.adjacency[node].iter().map(|e| (e.to, e.weight))
    }

    pub fn degree(&self, node: NodeIndex) -> usize {
        self.adjacency[node].len()
    }

    /// Weights of all (parallel) edges between `a` and `b`.
    pub fn weights_between(
        &self,
        a: NodeIndex,
        b: NodeIndex,
    ) -> impl Iterator<Item = EdgeWeight> + '_ {
        self.adjacency[a]
            .iter()
            .filter(move |e| e.to == b)
            .map(|e| e.weight)
    }

    /// Weight of the cheapest edge between `a` and `b`, if they are adjacent.
    pub fn min_weight(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeWeight> {
        self.pair_index
            .get(&(a.min(b), a.max(b)))
            .map(|&slot| self.cheapest[slot].2)
    }

    pub fn weight(&self, from: NodeIndex, to: NodeIndex) -> NaturalOrInfinite {
        self.min_weight(from, to)
            .map(NaturalOrInfinite::from)
            .unwrap_or_else(NaturalOrInfinite::infinity)
    }

    /// Every stored edge `(a, b, weight)` in insertion order, parallel edges included.
    /// Only edges with `a <= b` are returned since this is an undirected graph.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, EdgeWeight)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(from, e)| e.iter().map(move |&Edge { to, weight }| (from, to, weight)))
            .filter(|&(from, to, _)| from <= to)
    }

    /// One edge per adjacent pair, carrying the cheapest parallel weight.
    pub fn simple_edges(&self) -> &[(NodeIndex, NodeIndex, EdgeWeight)] {
        &self.cheapest
    }

    /// Subgraph consisting of exactly the given node pairs. Its node set is the set of
    /// endpoints touched; each pair gets the cheapest weight. Pairs that are not adjacent
    /// in `self` are skipped.
    pub fn edge_subgraph<I>(&self, pairs: I) -> Graph<N>
    where
        I: IntoIterator<Item = (NodeIndex, NodeIndex)>,
    {
        let mut sub = Graph::new();
        for (a, b) in pairs {
            if let Some(weight) = self.min_weight(a, b) {
                sub.add_edge(self.nodes[a].clone(), self.nodes[b].clone(), weight);
            }
        }
        sub
    }

    /// Subgraph on `members` with every edge of `self` between two of them.
    pub fn induced_subgraph(&self, members: &[NodeIndex]) -> Graph<N> {
        let mut sub = Graph::new();
        for &m in members {
            sub.add_node(self.nodes[m].clone());
        }
        for (a, b, weight) in self.induced_edges(members) {
            sub.add_edge(self.nodes[a].clone(), self.nodes[b].clone(), weight);
        }
        sub
    }

    /// Cheapest edges between members, as indices into `self`.
    pub(crate) fn induced_edges(
        &self,
        members: &[NodeIndex],
    ) -> Vec<(NodeIndex, NodeIndex, EdgeWeight)> {
        let mut inside = vec![false; self.num_nodes()];
        for &m in members {
            inside[m] = true;
        }
        self.cheapest
            .iter()
            .copied()
            .filter(|&(a, b, _)| inside[a] && inside[b])
            .collect()
    }

    /// Minimum spanning forest of the whole graph.
    pub fn minimum_spanning_forest(&self) -> SpanningForest<EdgeWeight> {
        let nodes = self.node_indices().collect::<Vec<_>>();
        kruskal(self.num_nodes(), &nodes, self.cheapest.clone())
    }

    /// Minimum spanning forest of the edge-induced subgraph on `pairs`, without building
    /// that subgraph. Indices in the result refer to `self`.
    pub fn spanning_forest_of<I>(&self, pairs: I) -> SpanningForest<EdgeWeight>
    where
        I: IntoIterator<Item = (NodeIndex, NodeIndex)>,
    {
        let mut touched = vec![false; self.num_nodes()];
        let mut nodes = vec![];
        let mut edges = vec![];
        for (a, b) in pairs {
            let Some(weight) = self.min_weight(a, b) else {
                continue;
            };
            for n in [a, b] {
                if !touched[n] {
                    touched[n] = true;
                    nodes.push(n);
                }
            }
            edges.push((a, b, weight));
        }
        kruskal(self.num_nodes(), &nodes, edges)
    }

    /// Whether all nodes are mutually reachable. The empty graph counts as connected.
    pub fn is_connected(&self) -> bool {
        if self.nodes.is_empty() {
            return true;
        }
        let mut seen = vec![false; self.num_nodes()];
        let mut queue = VecDeque::from([0]);
        seen[0] = true;
        let mut reached = 1;
        while let Some(node) = queue.pop_front() {
            for edge in &self.adjacency[node] {
                if !seen[edge.to] {
                    seen[edge.to] = true;
                    reached += 1;
                    queue.push_back(edge.to);
                }
            }
        }
        reached == self.num_nodes()
    }

    /// Map terminal ids to indices, dropping duplicates. The result is sorted.
    pub(crate) fn resolve_terminals(&self, terminals: &[N]) -> SteinerResult<Vec<NodeIndex>> {
        if terminals.is_empty() {
            return Err(SteinerError::EmptyTerminalSet);
        }
        let mut resolved = terminals
            .iter()
            .map(|t| {
                self.node_index(t).ok_or_else(|| SteinerError::UnknownTerminal {
                    terminal: format!("{:?}", t),
                })
            })
            .collect::<SteinerResult<Vec<_>>>()?;
        resolved.sort_unstable();
        resolved.dedup();
        Ok(resolved)
    }
}
