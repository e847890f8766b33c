use thiserror::Error;

/// Failures of the Steiner tree solvers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SteinerError {
    /// Some pair of nodes has no path between them, so no metric closure exists.
    #[error("graph is disconnected: no path from {from} to {to}")]
    DisconnectedGraph { from: String, to: String },

    #[error("the terminal set is empty")]
    EmptyTerminalSet,

    /// A spanning tree over the terminals was required but only a forest exists.
    #[error("terminals span {components} components instead of one")]
    GraphNotConnected { components: usize },

    /// The exact search exhausted every candidate subset.
    #[error("no Steiner tree found: {context}")]
    NoSteinerTreeFound { context: String },

    /// The exact search hit its bound before any candidate qualified.
    #[error("search truncated after {explored} subsets without a Steiner tree")]
    SearchTruncated { explored: u64 },

    #[error("terminal {terminal} is not a node of the graph")]
    UnknownTerminal { terminal: String },

    /// A precomputed closure does not describe the graph it was passed with.
    #[error("metric closure does not match the graph ({closure_nodes} vs {graph_nodes} nodes)")]
    ClosureMismatch {
        closure_nodes: usize,
        graph_nodes: usize,
    },
}

pub type SteinerResult<T> = Result<T, SteinerError>;
