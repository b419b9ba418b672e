//! Error types for html-tree-diff.
//!
//! The diff core is total; errors only come from location lookups and the
//! markup reader.

use thiserror::Error;

/// Errors that can occur outside the diff core.
#[derive(Debug, Error)]
pub enum DiffError {
    /// A location path index is out of range for its level
    #[error("no node at path {path:?}: index {index} out of range at depth {depth}")]
    LocationNotFound {
        /// The full path that was requested
        path: Vec<usize>,
        /// The offending child index
        index: usize,
        /// Depth (0-based) at which the lookup failed
        depth: usize,
    },

    /// The empty path names the root element, not a child node
    #[error("empty location path")]
    EmptyPath,

    /// The markup reader could not decode its input
    #[error("markup parse error: {0}")]
    Parse(String),
}

/// Result type alias for fallible html-tree-diff operations.
pub type DiffResult<T> = Result<T, DiffError>;

impl DiffError {
    /// Create a lookup error for `path`, failing at `depth`.
    pub fn not_found(path: &[usize], depth: usize) -> Self {
        Self::LocationNotFound {
            path: path.to_vec(),
            index: path[depth],
            depth,
        }
    }

    /// Create a parse error from any error type.
    pub fn parse(err: impl std::error::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
