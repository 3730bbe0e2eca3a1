/// Result alias for `eigenmap`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the graph analyses in this crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Input was empty.
    #[error("empty input provided")]
    EmptyInput,

    /// A node has zero degree, so `D^(-1/2)` is undefined.
    #[error("degenerate graph: node {node} has zero degree")]
    DegenerateGraph {
        /// Index of the offending node.
        node: usize,
    },

    /// Invalid parameter value, or parameters inconsistent with the input.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: String,
    },

    /// Invalid number of clusters requested.
    #[error("cannot create {requested} clusters from {n_items} items")]
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of items.
        n_items: usize,
    },

    /// Dimension mismatch between rows or matrix sides.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// The graph has a self-loop where the algorithm forbids one.
    #[error("self-loop on node {node} is not supported")]
    SelfLoop {
        /// Index of the node carrying the loop.
        node: usize,
    },

    /// The eigensolver backend failed or returned malformed output.
    #[error("eigendecomposition failed: {0}")]
    Eigensolver(String),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}
