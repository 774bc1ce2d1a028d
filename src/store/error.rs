//! Store layer error types
//!
//! All errors the Git backend can report are defined here.
//! We use `thiserror` for ergonomic error definition and better error messages

use std::path::PathBuf;

use thiserror::Error;

/// the main error type for store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// error from the underlying Git library
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// no repository at the given path
    #[error("repository not found: {0}")]
    NotInitialized(PathBuf),

    /// repository has no commits (unborn HEAD)
    #[error("repository is empty: no commits found")]
    EmptyRepository,

    /// the requested object is absent from the store
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// the named ref does not exist
    #[error("ref not found: {0}")]
    RefNotFound(String),

    /// an object decoded to a kind the caller cannot use
    #[error("unexpected object kind for {id}: expected {expected}, found {found}")]
    UnexpectedKind {
        id: String,
        expected: &'static str,
        found: String,
    },
}

impl StoreError {
    /// check if this error indicates the resource doesn't exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::ObjectNotFound(_)
                | StoreError::RefNotFound(_)
                | StoreError::EmptyRepository
        )
    }
}

/// result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
