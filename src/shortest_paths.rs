use crate::graph::{NodeId, NodeIndex};
use crate::util::NaturalOrInfinite;
use crate::Graph;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::ops::{Index, Range};

/// Shortest distance between two nodes together with one path realizing it. The path
/// starts at the source and ends at the destination; it is empty if there is no path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortestPath {
    distance: NaturalOrInfinite,
    path: Vec<NodeIndex>,
}

impl ShortestPath {
    pub fn new(path: Vec<NodeIndex>, distance: NaturalOrInfinite) -> Self {
        Self { path, distance }
    }

    pub fn distance(&self) -> NaturalOrInfinite {
        self.distance
    }

    pub fn path(&self) -> &[NodeIndex] {
        &self.path
    }

    pub fn is_reachable(&self) -> bool {
        self.distance.is_finite()
    }
}

impl Default for ShortestPath {
    fn default() -> Self {
        Self {
            distance: NaturalOrInfinite::infinity(),
            path: vec![],
        }
    }
}

impl Ord for ShortestPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance().cmp(&other.distance())
    }
}

impl PartialOrd for ShortestPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Frontier entry. Ordered so that the max-heap pops the smallest distance first and,
/// among equal distances, the smallest node index.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct NodeDistance {
    node: NodeIndex,
    distance: NaturalOrInfinite,
}

impl Ord for NodeDistance {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for NodeDistance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra's algorithm from `source`. Entry `v` of the result is the shortest path from
/// `source` to `v` ([ShortestPath::default] if `v` is unreachable).
pub fn dijkstra<N: NodeId>(graph: &Graph<N>, source: NodeIndex) -> Vec<ShortestPath> {
    let n = graph.num_nodes();
    let mut distances = vec![NaturalOrInfinite::infinity(); n];
    let mut predecessors: Vec<Option<NodeIndex>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut frontier = BinaryHeap::new();

    distances[source] = 0.into();
    frontier.push(NodeDistance {
        node: source,
        distance: distances[source],
    });

    while let Some(NodeDistance { node, distance }) = frontier.pop() {
        if settled[node] {
            continue;
        }
        settled[node] = true;
        order.push(node);
        for (neighbor, weight) in graph.neighbors(node) {
            let new_distance = distance + weight.into();
            if new_distance < distances[neighbor] {
                distances[neighbor] = new_distance;
                predecessors[neighbor] = Some(node);
                frontier.push(NodeDistance {
                    node: neighbor,
                    distance: new_distance,
                });
            }
        }
    }

    // Nodes are settled after their predecessor, so each path extends one built earlier.
    let mut row = vec![ShortestPath::default(); n];
    for node in order {
        let mut path = match predecessors[node] {
            Some(pred) => row[pred].path.clone(),
            None => Vec::new(),
        };
        path.push(node);
        row[node] = ShortestPath::new(path, distances[node]);
    }
    row
}

/// Shortest paths between all ordered pairs of nodes, one Dijkstra run per source.
pub struct ShortestPathMatrix {
    paths: Vec<ShortestPath>,
    dimension: usize,
}

impl ShortestPathMatrix {
    pub fn new<N: NodeId>(graph: &Graph<N>) -> Self {
        let rows = graph
            .node_indices()
            .map(|source| dijkstra(graph, source))
            .collect::<Vec<_>>();
        Self::from_rows(rows)
    }

    /// Same result as [ShortestPathMatrix::new], with the sources spread over the rayon
    /// thread pool.
    pub fn new_parallel<N: NodeId>(graph: &Graph<N>) -> Self {
        let rows = (0..graph.num_nodes())
            .into_par_iter()
            .map(|source| dijkstra(graph, source))
            .collect::<Vec<_>>();
        Self::from_rows(rows)
    }

    fn from_rows(rows: Vec<Vec<ShortestPath>>) -> Self {
        let dimension = rows.len();
        let paths = rows.into_iter().flatten().collect::<Vec<_>>();
        debug_assert_eq!(paths.len(), dimension * dimension);
        Self { paths, dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The first pair `(from, to)`, in row-major order, with no path between them.
    pub fn first_unreachable(&self) -> Option<(NodeIndex, NodeIndex)> {
        self.paths
            .iter()
            .position(|p| !p.is_reachable())
            .map(|i| (i / self.dimension, i % self.dimension))
    }

    fn index_range(&self, index: usize) -> Range<usize> {
        let start = index * self.dimension;
        start..start + self.dimension
    }
}

/// This allows for neat two-dimensional indexing (e.g. `spm[a][b]`).
impl Index<usize> for ShortestPathMatrix {
    type Output = [ShortestPath];

    fn index(&self, index: usize) -> &Self::Output {
        &self.paths[self.index_range(index)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{
        indexed_graph, shortcut_test_graph, small_test_graph, steiner_example_wiki,
    };

    #[test]
    fn test_shortest_path_matrix_1() {
        let (graph, _) = small_test_graph();
        let spm = ShortestPathMatrix::new(&graph);
        assert_eq!(spm[0][1], ShortestPath::new(vec![0, 1], 1.into()));
        assert_eq!(spm[1][2], ShortestPath::new(vec![1, 2], 2.into()));
        assert!(
            spm[0][2] == ShortestPath::new(vec![0, 2], 3.into())
                || spm[0][2] == ShortestPath::new(vec![0, 1, 2], 3.into())
        );
        assert_eq!(spm[2][2], ShortestPath::new(vec![2], 0.into()));
    }

    /// Every path runs from `i` to `j` over real edges and its weight is the distance.
    fn assert_paths_valid(spm: &ShortestPathMatrix, graph: &Graph<usize>) {
        for i in 0..spm.dimension() {
            for j in 0..spm.dimension() {
                let sp = &spm[i][j];
                assert_eq!(sp.distance(), spm[j][i].distance());
                assert_eq!(sp.path().first(), Some(&i));
                assert_eq!(sp.path().last(), Some(&j));
                let walked = sp
                    .path()
                    .windows(2)
                    .map(|w| graph.weight(w[0], w[1]))
                    .fold(NaturalOrInfinite::from(0), |acc, w| acc + w);
                assert_eq!(walked, sp.distance());
            }
        }
    }

    #[test]
    fn test_shortest_path_matrix_2() {
        let (graph, _) = shortcut_test_graph();
        let spm = ShortestPathMatrix::new(&graph);
        assert_eq!(spm[0][2], ShortestPath::new(vec![0, 1, 2], 2.into()));
        assert_eq!(spm[3][0], ShortestPath::new(vec![3, 1, 0], 3.into()));
        assert_eq!(spm[3][2], ShortestPath::new(vec![3, 1, 2], 3.into()));
        assert_eq!(spm[2][3].path(), &[2, 1, 3]);
        assert_paths_valid(&spm, &graph);
    }

    #[test]
    fn test_shortest_path_matrix_3() {
        let (graph, _) = steiner_example_wiki();
        let spm = ShortestPathMatrix::new(&graph);
        assert_eq!(
            spm[11][0],
            ShortestPath::new(vec![11, 10, 8, 4, 0], (10 + 15 + 30 + 25).into())
        );
        assert_eq!(spm[6][9], ShortestPath::new(vec![6, 7, 9], (50 + 20).into()));
        assert_eq!(
            spm[6][11],
            ShortestPath::new(vec![6, 7, 9, 10, 11], (10 + 40 + 50 + 20).into())
        );
        assert_eq!(
            spm[6][0],
            ShortestPath::new(vec![6, 3, 2, 1, 0], (30 + 50 + 30 + 15).into())
        );
        assert_paths_valid(&spm, &graph);
        assert_eq!(spm.first_unreachable(), None);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let (graph, _) = steiner_example_wiki();
        let serial = ShortestPathMatrix::new(&graph);
        let parallel = ShortestPathMatrix::new_parallel(&graph);
        assert_eq!(serial.paths, parallel.paths);
    }

    #[test]
    fn test_dijkstra_uses_cheapest_parallel_edge() {
        let graph = indexed_graph(3, &[(0, 1, 10), (0, 1, 2), (1, 2, 3)]);
        let row = dijkstra(&graph, 0);
        assert_eq!(row[1], ShortestPath::new(vec![0, 1], 2.into()));
        assert_eq!(row[2], ShortestPath::new(vec![0, 1, 2], 5.into()));
    }

    #[test]
    fn test_unreachable() {
        let graph = indexed_graph(4, &[(0, 1, 1), (2, 3, 1)]);
        let spm = ShortestPathMatrix::new(&graph);
        assert!(!spm[0][2].is_reachable());
        assert!(spm[0][2].path().is_empty());
        assert_eq!(spm.first_unreachable(), Some((0, 2)));
    }
}
