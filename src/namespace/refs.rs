//! Ref namespace projection.
//!
//! Refs are stored flatly; their slash-structured names are what this module
//! turns into a synthetic directory hierarchy. Every operation works over a
//! freshly fetched ref list and scans all of it - there is no index and
//! nothing survives the request.
//!
//! Component comparison is always exact per-segment equality, never a byte
//! prefix: `heads/ma` must not match `heads/main`.

use crate::namespace::error::{NamespaceError, NamespaceResult};
use crate::namespace::link::{self, LinkDestination};
use crate::namespace::path;
use crate::store::{GitStore, RefEntry};

/// Classification of a path below `/refs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefNode {
    /// some ref's full name equals the path: projected as a symlink
    Leaf,
    /// refs exist strictly below the path: projected as a directory
    Directory,
}

/// Distinct next-level child names among refs matching `prefix`
/// component-wise. An empty prefix matches every ref; a ref exactly as long
/// as the prefix is the leaf itself and contributes no child here.
pub fn list_children(refs: &[RefEntry], prefix: &[&str]) -> Vec<String> {
    let mut children: Vec<String> = Vec::new();
    for r in refs {
        let comps: Vec<&str> = path::components(&r.name).collect();
        if comps.len() <= prefix.len() {
            continue;
        }
        if !matches_prefix(&comps, prefix) {
            continue;
        }
        let next = comps[prefix.len()];
        if !children.iter().any(|seen| seen == next) {
            children.push(next.to_string());
        }
    }
    children
}

/// Classify `rel` (components below `/refs`) among the refs.
pub fn stat(refs: &[RefEntry], rel: &[&str]) -> NamespaceResult<RefNode> {
    let mut below = false;
    for r in refs {
        let comps: Vec<&str> = path::components(&r.name).collect();
        if comps.len() < rel.len() || !matches_prefix(&comps, rel) {
            continue;
        }
        if comps.len() == rel.len() {
            return Ok(RefNode::Leaf);
        }
        below = true;
    }
    if below {
        Ok(RefNode::Directory)
    } else {
        Err(NamespaceError::NotFound)
    }
}

/// Symlink target for a leaf ref: one `../` per component of its own path
/// under `/refs`, then `commit/<target>`.
pub fn link_target(store: &GitStore, refs: &[RefEntry], rel: &[&str]) -> NamespaceResult<String> {
    match stat(refs, rel)? {
        RefNode::Leaf => {
            let name = rel.join("/");
            let target = store
                .resolve_ref(&name)
                .map_err(NamespaceError::from_store)?;
            Ok(link::build_target(rel.len(), LinkDestination::Commit, target))
        }
        RefNode::Directory => Err(NamespaceError::NotFound),
    }
}

fn matches_prefix(comps: &[&str], prefix: &[&str]) -> bool {
    comps.iter().zip(prefix).all(|(a, b)| a == b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ObjectId, OID_HEX_LEN};

    fn refs() -> Vec<RefEntry> {
        let target = ObjectId::from_hex(&"b".repeat(OID_HEX_LEN)).unwrap();
        ["heads/main", "heads/feature/x", "tags/v1.0"]
            .into_iter()
            .map(|name| RefEntry {
                name: name.to_string(),
                target,
            })
            .collect()
    }

    fn sorted(mut names: Vec<String>) -> Vec<String> {
        names.sort();
        names
    }

    #[test]
    fn test_empty_prefix_lists_top_level() {
        assert_eq!(sorted(list_children(&refs(), &[])), vec!["heads", "tags"]);
    }

    #[test]
    fn test_children_are_distinct() {
        assert_eq!(
            sorted(list_children(&refs(), &["heads"])),
            vec!["feature", "main"]
        );
        assert_eq!(
            list_children(&refs(), &["heads", "feature"]),
            vec!["x".to_string()]
        );
    }

    #[test]
    fn test_exact_ref_contributes_no_children() {
        assert!(list_children(&refs(), &["heads", "main"]).is_empty());
        assert!(list_children(&refs(), &["nope"]).is_empty());
    }

    #[test]
    fn test_stat_classification() {
        assert_eq!(stat(&refs(), &["heads"]).unwrap(), RefNode::Directory);
        assert_eq!(
            stat(&refs(), &["heads", "feature"]).unwrap(),
            RefNode::Directory
        );
        assert_eq!(stat(&refs(), &["heads", "main"]).unwrap(), RefNode::Leaf);
        assert_eq!(
            stat(&refs(), &["heads", "feature", "x"]).unwrap(),
            RefNode::Leaf
        );
        assert!(matches!(
            stat(&refs(), &["heads", "missing"]),
            Err(NamespaceError::NotFound)
        ));
    }

    #[test]
    fn test_segments_are_not_prefix_matched() {
        // `heads/ma` is not `heads/main`, even though it is a byte prefix
        assert!(matches!(
            stat(&refs(), &["heads", "ma"]),
            Err(NamespaceError::NotFound)
        ));
        assert!(list_children(&refs(), &["head"]).is_empty());
    }
}
