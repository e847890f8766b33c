use crate::error::{SteinerError, SteinerResult};
use crate::graph::{NodeId, NodeIndex};
use crate::shortest_paths::ShortestPathMatrix;
use crate::Graph;
use log::debug;

/// Complete graph over the nodes of a connected graph. The edge `{u, v}` carries the
/// shortest-path distance between `u` and `v` and the node sequence realizing it.
///
/// Node indices are those of the graph the closure was built from. A closure can be
/// reused for any number of solves on that same graph.
pub struct MetricClosure {
    paths: ShortestPathMatrix,
}

/// One edge of a [MetricClosure], `u < v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosureEdge<'a> {
    pub u: NodeIndex,
    pub v: NodeIndex,
    pub distance: u64,
    pub path: &'a [NodeIndex],
}

impl MetricClosure {
    pub fn num_nodes(&self) -> usize {
        self.paths.dimension()
    }

    pub fn distance(&self, u: NodeIndex, v: NodeIndex) -> u64 {
        self.paths[u][v].distance().finite_value()
    }

    /// Nodes of one shortest `u`-`v` path, from `u` to `v` inclusive.
    pub fn path(&self, u: NodeIndex, v: NodeIndex) -> &[NodeIndex] {
        self.paths[u][v].path()
    }

    /// All `n(n-1)/2` closure edges, `u` ascending, then `v` ascending.
    pub fn edges(&self) -> impl Iterator<Item = ClosureEdge<'_>> + '_ {
        let n = self.num_nodes();
        (0..n).flat_map(move |u| {
            (u + 1..n).map(move |v| ClosureEdge {
                u,
                v,
                distance: self.distance(u, v),
                path: self.path(u, v),
            })
        })
    }

    /// Fail unless this closure was built over a graph of the same size as `graph`.
    pub(crate) fn check_matches<N: NodeId>(&self, graph: &Graph<N>) -> SteinerResult<()> {
        if self.num_nodes() != graph.num_nodes() {
            return Err(self.mismatch(graph));
        }
        Ok(())
    }

    pub(crate) fn mismatch<N: NodeId>(&self, graph: &Graph<N>) -> SteinerError {
        SteinerError::ClosureMismatch {
            closure_nodes: self.num_nodes(),
            graph_nodes: graph.num_nodes(),
        }
    }

    fn from_matrix<N: NodeId>(graph: &Graph<N>, paths: ShortestPathMatrix) -> SteinerResult<Self> {
        if let Some((from, to)) = paths.first_unreachable() {
            return Err(SteinerError::DisconnectedGraph {
                from: format!("{:?}", graph.node(from)),
                to: format!("{:?}", graph.node(to)),
            });
        }
        debug!("metric closure built over {} nodes", paths.dimension());
        Ok(Self { paths })
    }
}

/// Metric closure of `graph`, running Dijkstra from every node.
///
/// Costs `O(n · m log n)` time and `O(n²)` stored paths. Fails with
/// [SteinerError::DisconnectedGraph] if some pair of nodes is not connected.
pub fn build_metric_closure<N: NodeId>(graph: &Graph<N>) -> SteinerResult<MetricClosure> {
    MetricClosure::from_matrix(graph, ShortestPathMatrix::new(graph))
}

/// [build_metric_closure] with the per-source runs on the rayon thread pool. The result
/// is identical to the serial one.
pub fn build_metric_closure_parallel<N: NodeId>(graph: &Graph<N>) -> SteinerResult<MetricClosure> {
    MetricClosure::from_matrix(graph, ShortestPathMatrix::new_parallel(graph))
}
