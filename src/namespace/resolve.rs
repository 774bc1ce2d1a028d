//! Object path resolution for descent below a commit or tree.
//!
//! The first component names an object; every further component is a tree
//! entry name, matched byte-for-byte. Commits promote transparently to
//! their tree before descent. Each step hands a uniquely owned object to
//! the next; no reference to an intermediate survives its successor.

use crate::namespace::error::{NamespaceError, NamespaceResult};
use crate::store::{EntryMode, GitStore, Object, ObjectId, StoreError};

/// Terminal of a resolved descent.
#[derive(Debug)]
pub struct Resolved {
    pub id: ObjectId,
    pub object: Object,
    /// structural mode of the last traversed tree entry; `None` at the
    /// descent root, which has no entry of its own
    pub mode: Option<EntryMode>,
}

/// Descend the object graph one path component at a time.
pub fn resolve(store: &GitStore, comps: &[&str]) -> NamespaceResult<Resolved> {
    let (first, rest) = match comps.split_first() {
        Some(split) => split,
        None => return Err(NamespaceError::NotFound),
    };

    let id = ObjectId::from_hex(first).ok_or(NamespaceError::InvalidId)?;
    let object = lookup(store, id)?;
    let mut current = Resolved {
        id,
        object,
        mode: None,
    };

    for comp in rest {
        let entries = match current.object {
            Object::Commit(meta) => {
                let tree_id = meta.tree;
                match lookup(store, tree_id)? {
                    Object::Tree(entries) => entries,
                    other => {
                        return Err(NamespaceError::Store(StoreError::UnexpectedKind {
                            id: tree_id.to_string(),
                            expected: "tree",
                            found: other.kind_name().to_string(),
                        }))
                    }
                }
            }
            Object::Tree(entries) => entries,
            Object::Blob { .. } => return Err(NamespaceError::NotADirectory),
        };

        let entry = entries
            .into_iter()
            .find(|e| e.name == *comp)
            .ok_or(NamespaceError::NotFound)?;

        let object = lookup(store, entry.id)?;
        current = Resolved {
            id: entry.id,
            object,
            mode: Some(entry.mode),
        };
    }

    Ok(current)
}

fn lookup(store: &GitStore, id: ObjectId) -> NamespaceResult<Object> {
    store.lookup(id).map_err(NamespaceError::from_store)
}
