use crate::graph::NodeIndex;
use std::cmp::Ordering;

/// Union-find over `0..n` with path halving and union by rank.
#[derive(Clone, Debug)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets of `a` and `b`. Returns false if they were already one set.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            Ordering::Less => self.parent[ra] = rb,
            Ordering::Greater => self.parent[rb] = ra,
            Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Output of [kruskal]: a minimum spanning forest and how many trees it has.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpanningForest<W> {
    edges: Vec<(NodeIndex, NodeIndex, W)>,
    components: usize,
}

impl<W: Copy + Into<u64>> SpanningForest<W> {
    pub fn edges(&self) -> &[(NodeIndex, NodeIndex, W)] {
        &self.edges
    }

    /// Number of connected components spanned. Zero for an empty node set.
    pub fn components(&self) -> usize {
        self.components
    }

    /// A forest with at most one component is a spanning tree.
    pub fn is_tree(&self) -> bool {
        self.components <= 1
    }

    pub fn weight(&self) -> u64 {
        self.edges.iter().map(|&(_, _, w)| w.into()).sum()
    }
}

/// Kruskal's algorithm over the participating `nodes` (indices below `universe`).
///
/// Every edge endpoint must be one of `nodes`. Edges of equal weight are taken in input
/// order, so identical inputs give identical forests. Self-loops and parallel edges are
/// harmless: they never join two separate components twice.
pub fn kruskal<W: Ord + Copy>(
    universe: usize,
    nodes: &[NodeIndex],
    mut edges: Vec<(NodeIndex, NodeIndex, W)>,
) -> SpanningForest<W> {
    edges.sort_by_key(|&(_, _, weight)| weight);
    let wanted = nodes.len().saturating_sub(1);
    let mut sets = DisjointSet::new(universe);
    let mut tree = Vec::with_capacity(wanted);
    for (a, b, weight) in edges {
        if tree.len() == wanted {
            break;
        }
        if sets.union(a, b) {
            tree.push((a, b, weight));
        }
    }
    let components = nodes.len() - tree.len();
    SpanningForest {
        edges: tree,
        components,
    }
}
