//! Namespace engine error types
//!
//! Every component-level failure is final for its request; the protocol
//! layer translates these into filesystem-level failure signals.

use thiserror::Error;

use crate::store::StoreError;

/// the main error type for namespace resolution
#[derive(Debug, Error)]
pub enum NamespaceError {
    /// the path does not resolve to any object, ref or ancestor
    #[error("path does not exist")]
    NotFound,

    /// the path attempts to descend through a non-directory terminal
    #[error("not a directory")]
    NotADirectory,

    /// a component expected to be an object id failed to decode
    #[error("invalid object id")]
    InvalidId,

    /// an ancestor index is not a valid non-negative integer or out of range
    #[error("invalid ancestor index")]
    InvalidIndex,

    /// the backing store reported a failure distinct from not-found
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl NamespaceError {
    /// store misses become namespace `NotFound`; real failures stay typed
    pub(crate) fn from_store(e: StoreError) -> Self {
        if e.is_not_found() {
            NamespaceError::NotFound
        } else {
            NamespaceError::Store(e)
        }
    }

    /// check if this error maps to the "does not exist" outcome
    pub fn is_not_found(&self) -> bool {
        match self {
            NamespaceError::NotFound
            | NamespaceError::InvalidId
            | NamespaceError::InvalidIndex => true,
            NamespaceError::Store(e) => e.is_not_found(),
            NamespaceError::NotADirectory => false,
        }
    }
}

/// result type alias for namespace operations
pub type NamespaceResult<T> = Result<T, NamespaceError>;
