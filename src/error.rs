//! Error types for the FNR-tree index.
//!
//! Index operations themselves never fail: a lookup miss is `None`, a removal
//! miss is `false`, and coordinates are accepted as given. Errors come from
//! configuration, from joining network edges to their nodes, and from the
//! structural self-check.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FnrError>;

#[derive(Debug, Error)]
pub enum FnrError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Edge {edge} references unknown node {node}")]
    UnknownNode { edge: i64, node: i64 },

    #[error("Tree invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
