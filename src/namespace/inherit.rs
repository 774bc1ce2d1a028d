//! Ancestor link projection.
//!
//! Every commit gets one numbered entry per parent, each a symlink into its
//! own sibling subtree (`../<parentId>`). Recursion happens on the client
//! side by following the emitted links; nothing below two levels resolves
//! here.

use crate::namespace::error::{NamespaceError, NamespaceResult};
use crate::namespace::link::{self, LinkDestination};
use crate::store::{CommitMeta, GitStore, Object, ObjectId};

/// List the numbered parent entries of a commit: `"0"` .. `"n-1"`.
pub fn list_parents(store: &GitStore, id: ObjectId) -> NamespaceResult<Vec<String>> {
    let meta = commit_meta(store, id)?;
    Ok((0..meta.parent_count()).map(|i| i.to_string()).collect())
}

/// Check that a two-component path names a real parent entry.
pub fn validate_entry(store: &GitStore, id: ObjectId, index: &str) -> NamespaceResult<()> {
    let meta = commit_meta(store, id)?;
    parse_index(index, meta.parent_count())?;
    Ok(())
}

/// Symlink target for `/inherit/<oid>/<i>`: the sibling `../<parentId>`.
pub fn link_target(store: &GitStore, id: ObjectId, index: &str) -> NamespaceResult<String> {
    let meta = commit_meta(store, id)?;
    let index = parse_index(index, meta.parent_count())?;
    let parent = meta.parent(index).ok_or(NamespaceError::InvalidIndex)?;
    Ok(link::build_target(
        1,
        LinkDestination::InheritSibling,
        parent,
    ))
}

/// Parse an ancestor index component.
///
/// Only all-ASCII-digit strings qualify; the value must be strictly below
/// the parent count.
fn parse_index(comp: &str, parent_count: usize) -> NamespaceResult<usize> {
    if comp.is_empty() || !comp.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NamespaceError::InvalidIndex);
    }
    let index: usize = comp.parse().map_err(|_| NamespaceError::InvalidIndex)?;
    if index >= parent_count {
        return Err(NamespaceError::InvalidIndex);
    }
    Ok(index)
}

fn commit_meta(store: &GitStore, id: ObjectId) -> NamespaceResult<CommitMeta> {
    match store.lookup(id).map_err(NamespaceError::from_store)? {
        Object::Commit(meta) => Ok(meta),
        // only commits have ancestry
        _ => Err(NamespaceError::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository, Signature};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        store: GitStore,
        roots: Vec<ObjectId>,
        merge: ObjectId,
        tree: ObjectId,
    }

    /// two root commits and a merge commit with both as parents, in order
    fn setup() -> Fixture {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let sig = Signature::now("Test", "test@test.com").unwrap();

        let tree_id = repo.treebuilder(None).unwrap().write().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();

        let r0 = repo.commit(None, &sig, &sig, "root zero", &tree, &[]).unwrap();
        let r1 = repo.commit(None, &sig, &sig, "root one", &tree, &[]).unwrap();
        let p0 = repo.find_commit(r0).unwrap();
        let p1 = repo.find_commit(r1).unwrap();
        let merge = repo
            .commit(None, &sig, &sig, "merge", &tree, &[&p0, &p1])
            .unwrap();

        Fixture {
            store: GitStore::open(dir.path()).unwrap(),
            _dir: dir,
            roots: vec![ObjectId::new(r0), ObjectId::new(r1)],
            merge: ObjectId::new(merge),
            tree: ObjectId::new(tree_id),
        }
    }

    #[test]
    fn test_list_parents_of_merge() {
        let fx = setup();
        assert_eq!(list_parents(&fx.store, fx.merge).unwrap(), vec!["0", "1"]);
    }

    #[test]
    fn test_root_commit_has_no_parents() {
        let fx = setup();
        assert!(list_parents(&fx.store, fx.roots[0]).unwrap().is_empty());
    }

    #[test]
    fn test_non_commit_is_not_found() {
        let fx = setup();
        assert!(matches!(
            list_parents(&fx.store, fx.tree),
            Err(NamespaceError::NotFound)
        ));
    }

    #[test]
    fn test_link_target_points_at_sibling() {
        let fx = setup();
        assert_eq!(
            link_target(&fx.store, fx.merge, "0").unwrap(),
            format!("../{}", fx.roots[0])
        );
        assert_eq!(
            link_target(&fx.store, fx.merge, "1").unwrap(),
            format!("../{}", fx.roots[1])
        );
    }

    #[test]
    fn test_out_of_range_index() {
        let fx = setup();
        assert!(matches!(
            link_target(&fx.store, fx.merge, "2"),
            Err(NamespaceError::InvalidIndex)
        ));
        assert!(matches!(
            validate_entry(&fx.store, fx.roots[0], "0"),
            Err(NamespaceError::InvalidIndex)
        ));
    }

    #[test]
    fn test_malformed_index() {
        let fx = setup();
        for bad in ["", "+1", "-1", "1x", "one", " 1"] {
            assert!(
                matches!(
                    link_target(&fx.store, fx.merge, bad),
                    Err(NamespaceError::InvalidIndex)
                ),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_valid_entry() {
        let fx = setup();
        validate_entry(&fx.store, fx.merge, "0").unwrap();
        validate_entry(&fx.store, fx.merge, "1").unwrap();
    }
}
