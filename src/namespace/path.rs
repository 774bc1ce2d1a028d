//! Virtual path segmentation.
//!
//! This is the single source of truth for splitting slash-delimited virtual
//! paths. Every other part of the engine goes through these functions rather
//! than re-splitting ad hoc, so separator collapsing behaves the same
//! everywhere.

use crate::namespace::error::{NamespaceError, NamespaceResult};

/// Iterate the non-empty components of a path, collapsing repeated `/`.
///
/// Borrows straight from the input; nothing is allocated.
pub fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|c| !c.is_empty())
}

/// Get the component at a zero-based `index`.
///
/// Indexing at or beyond the component count fails with `NotFound`. A path
/// ending in a separator contributes no component there.
pub fn component(path: &str, index: usize) -> NamespaceResult<&str> {
    components(path).nth(index).ok_or(NamespaceError::NotFound)
}

/// Count the components of a path under the same collapsing rule.
pub fn component_count(path: &str) -> usize {
    components(path).count()
}
