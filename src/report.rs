//! Summary of an instance and of a benchmarked solve, for printing or JSON output.

use crate::graph::{EdgeWeight, NodeId};
use crate::{Algorithm, Graph, Guarantee, Solution, SteinerTree};
use serde::Serialize;
use std::fmt::{self, Display};
use std::time::{Duration, Instant};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphStatistics {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub num_terminals: usize,
    pub average_degree: f64,
    pub min_degree: usize,
    pub max_degree: usize,
    pub average_weight: f64,
    pub min_weight: EdgeWeight,
    pub max_weight: EdgeWeight,
}

impl GraphStatistics {
    /// Degree and weight figures are zero for a graph without nodes or edges.
    pub fn new<N: NodeId>(graph: &Graph<N>, terminals: &[N]) -> Self {
        let degrees = graph
            .node_indices()
            .map(|ni| graph.degree(ni))
            .collect::<Vec<_>>();
        let weights = graph
            .edges()
            .map(|(_, _, weight)| weight)
            .collect::<Vec<_>>();
        Self {
            num_nodes: graph.num_nodes(),
            num_edges: graph.num_edges(),
            num_terminals: terminals.len(),
            average_degree: mean(degrees.iter().map(|&d| d as f64)),
            min_degree: degrees.iter().min().copied().unwrap_or(0),
            max_degree: degrees.iter().max().copied().unwrap_or(0),
            average_weight: mean(weights.iter().map(|&w| f64::from(w))),
            min_weight: weights.iter().min().copied().unwrap_or(0),
            max_weight: weights.iter().max().copied().unwrap_or(0),
        }
    }
}

fn mean<I: ExactSizeIterator<Item = f64>>(values: I) -> f64 {
    let n = values.len();
    if n == 0 {
        0.0
    } else {
        values.sum::<f64>() / n as f64
    }
}

/// Run `closure` and measure its wall time.
pub fn measure_time<F: FnOnce() -> R, R>(closure: F) -> (R, Duration) {
    let before = Instant::now();
    let result = closure();
    (result, before.elapsed())
}

/// Everything known about one benchmarked solve.
#[derive(Clone, Debug, Serialize)]
pub struct SolveReport<N> {
    pub algorithm: Algorithm,
    pub guarantee: Guarantee,
    pub statistics: GraphStatistics,
    pub terminals: Vec<N>,
    pub run_times_secs: Vec<f64>,
    pub average_time_secs: f64,
    pub tree: SteinerTree<N>,
    pub total_weight: u64,
    pub optimal_weight: Option<u64>,
    /// `total_weight / optimal_weight`.
    pub approximation_ratio: Option<f64>,
    pub leaves: usize,
    /// Kou only: `2 (1 - 1/L)` for the leaves of this tree.
    pub max_approximation_ratio: Option<f64>,
    /// `optimal_weight * max_approximation_ratio`.
    pub worst_case: Option<f64>,
}

impl<N: NodeId> SolveReport<N> {
    pub fn new(
        algorithm: Algorithm,
        solution: Solution<N>,
        run_times: &[Duration],
        statistics: GraphStatistics,
        terminals: Vec<N>,
        optimal_weight: Option<u64>,
    ) -> Self {
        let Solution { tree, guarantee } = solution;
        let run_times_secs = run_times.iter().map(Duration::as_secs_f64).collect::<Vec<_>>();
        let average_time_secs = mean(run_times_secs.iter().copied());
        let max_approximation_ratio = match algorithm {
            Algorithm::Kou => tree.approximation_bound(),
            Algorithm::Exact => None,
        };
        Self {
            algorithm,
            guarantee,
            statistics,
            terminals,
            run_times_secs,
            average_time_secs,
            total_weight: tree.total_weight(),
            approximation_ratio: optimal_weight.and_then(|opt| tree.approximation_ratio(opt)),
            leaves: tree.num_leaves(),
            worst_case: optimal_weight
                .zip(max_approximation_ratio)
                .map(|(opt, bound)| opt as f64 * bound),
            max_approximation_ratio,
            optimal_weight,
            tree,
        }
    }
}

fn optional<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "unknown".to_string(), |v| v.to_string())
}

impl<N: NodeId> Display for SolveReport<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.statistics;
        writeln!(f, "--------------------")?;
        writeln!(f, "Algorithm: {:?} ({:?})", self.algorithm, self.guarantee)?;
        writeln!(
            f,
            "Average time: {:.6}s over {} run(s)",
            self.average_time_secs,
            self.run_times_secs.len()
        )?;
        writeln!(f, "--------------------")?;
        writeln!(f, "{} nodes", s.num_nodes)?;
        writeln!(f, "{} edges", s.num_edges)?;
        writeln!(f, "Terminal nodes {}: {:?}", s.num_terminals, self.terminals)?;
        writeln!(
            f,
            "Degree min/avg/max: {}/{:.2}/{}, weight min/avg/max: {}/{:.2}/{}",
            s.min_degree,
            s.average_degree,
            s.max_degree,
            s.min_weight,
            s.average_weight,
            s.max_weight
        )?;
        writeln!(f, "--------------------")?;
        let edges = self
            .tree
            .edges()
            .iter()
            .map(|e| format!("({:?}, {:?}, {})", e.a, e.b, e.weight))
            .collect::<Vec<_>>();
        writeln!(f, "Steiner tree edges: [{}]", edges.join(", "))?;
        writeln!(f, "Total weight: {}", self.total_weight)?;
        writeln!(f, "Optimal weight: {}", optional(self.optimal_weight))?;
        writeln!(f, "Approximation ratio: {}", optional(self.approximation_ratio))?;
        writeln!(f, "Leaves: {}", self.leaves)?;
        if self.algorithm == Algorithm::Kou {
            writeln!(f, "Max approximation ratio: {}", optional(self.max_approximation_ratio))?;
            writeln!(f, "Worst approximation case: {}", optional(self.worst_case))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{cycle_graph, steiner_example_wiki};
    use crate::util::TestResult;
    use crate::{solve, SolveOptions};

    #[test]
    fn test_graph_statistics() {
        let (graph, terminals) = steiner_example_wiki();
        let stats = GraphStatistics::new(&graph, &terminals);
        assert_eq!(stats.num_nodes, 12);
        assert_eq!(stats.num_edges, 15);
        assert_eq!(stats.num_terminals, 5);
        assert_eq!(stats.min_degree, 1);
        assert_eq!(stats.max_degree, 4);
        assert_eq!(stats.min_weight, 10);
        assert_eq!(stats.max_weight, 60);
        assert!((stats.average_degree - 30.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_graph_statistics() {
        let graph: Graph<u8> = Graph::new();
        let stats = GraphStatistics::new(&graph, &[]);
        assert_eq!(stats.average_degree, 0.0);
        assert_eq!(stats.max_weight, 0);
    }

    #[test]
    fn test_kou_report() -> TestResult {
        let graph = cycle_graph();
        let terminals = vec![0, 2];
        let solution = solve(&graph, &terminals, Algorithm::Kou, &SolveOptions::default())?;
        let stats = GraphStatistics::new(&graph, &terminals);
        let times = [Duration::from_millis(10), Duration::from_millis(30)];
        let report = SolveReport::new(Algorithm::Kou, solution, &times, stats, terminals, Some(2));
        assert!((report.average_time_secs - 0.02).abs() < 1e-9);
        assert_eq!(report.total_weight, 2);
        assert_eq!(report.approximation_ratio, Some(1.0));
        assert_eq!(report.leaves, 2);
        assert_eq!(report.max_approximation_ratio, Some(1.0));
        assert_eq!(report.worst_case, Some(2.0));
        let text = report.to_string();
        assert!(text.contains("Total weight: 2"));
        assert!(text.contains("Worst approximation case: 2"));
        let json = serde_json::to_value(&report)?;
        assert_eq!(json["algorithm"], "kou");
        Ok(())
    }

    #[test]
    fn test_exact_report_has_no_bound() -> TestResult {
        let (graph, terminals) = steiner_example_wiki();
        let solution = solve(&graph, &terminals, Algorithm::Exact, &SolveOptions::default())?;
        let stats = GraphStatistics::new(&graph, &terminals);
        let report = SolveReport::new(Algorithm::Exact, solution, &[], stats, terminals, None);
        assert_eq!(report.max_approximation_ratio, None);
        assert_eq!(report.approximation_ratio, None);
        assert!(report.to_string().contains("Optimal weight: unknown"));
        assert!(!report.to_string().contains("Worst approximation case"));
        Ok(())
    }
}
