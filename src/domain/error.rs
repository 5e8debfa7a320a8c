//! Domain-level errors for tree construction, checks and builders

use std::path::PathBuf;

use generational_arena::Index;
use thiserror::Error;

/// Domain errors represent tree construction and builder failures.
///
/// Mutations on a tree in the wrong state are not errors: they are no-ops
/// reported through a `bool` return value.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid construction: an empty node cannot have {children} children")]
    InvalidConstruction { children: usize },

    #[error("node not found: {0:?}")]
    NodeNotFound(Index),

    #[error("node already has a parent: {0:?}")]
    AlreadyAttached(Index),

    #[error("node listed twice as a child: {0:?}")]
    DuplicateChild(Index),

    #[error("an empty node cannot become a child: {0:?}")]
    EmptyChild(Index),

    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("cannot walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("invalid paper record at line {line}: {message}")]
    InvalidRecord { line: u64, message: String },

    #[error("cannot read paper dataset {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invariant violated at {node:?}: {message}")]
    InvariantViolation { node: Index, message: String },
}

/// Result type for tree operations.
pub type DomainResult<T> = Result<T, DomainError>;
