//! virtual namespace resolution engine
//!
//! this module maps slash-delimited virtual paths onto the repository's
//! object graph and synthesizes directory listings over data that is not
//! naturally hierarchical (the flat object store, the flat ref list).
//!
//! # Layout
//!
//! ```text
//! /
//! ├── HEAD                   symlink -> commit/<head-id>
//! ├── obj/<oid>              raw decoded content of any object, one flat level
//! ├── commit/<oid>/<path…>   tree descent below a commit (or tree) id
//! ├── refs/<path…>           synthetic hierarchy over the flat ref names
//! └── inherit/<oid>/<n>      numbered parent symlinks -> ../<parent-id>
//! ```
//!
//! The engine is request-scoped and stateless: every operation fetches what
//! it needs from the store, holds nothing across calls, and mutates nothing.

pub mod error;
mod inherit;
mod link;
mod path;
mod range;
mod refs;
mod resolve;

pub use error::{NamespaceError, NamespaceResult};

use chrono::{DateTime, Utc};

use crate::store::{EntryMode, GitStore, Object, ObjectId, StoreError};
use link::LinkDestination;

/// tree structural size is not meaningful; directories report a fixed
/// placeholder instead
const DIR_SIZE: u64 = 0;

/// Filesystem-visible kind of a virtual node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    RegularFile,
    Symlink,
}

/// Attributes of a virtual node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    pub kind: NodeKind,
    pub size: u64,
    /// author timestamp, present only for commit directories
    pub mtime: Option<DateTime<Utc>>,
}

impl Attributes {
    fn directory() -> Self {
        Self {
            kind: NodeKind::Directory,
            size: DIR_SIZE,
            mtime: None,
        }
    }

    fn commit_directory(mtime: DateTime<Utc>) -> Self {
        Self {
            kind: NodeKind::Directory,
            size: DIR_SIZE,
            mtime: Some(mtime),
        }
    }

    fn regular(size: u64) -> Self {
        Self {
            kind: NodeKind::RegularFile,
            size,
            mtime: None,
        }
    }

    fn symlink() -> Self {
        Self {
            kind: NodeKind::Symlink,
            size: 0,
            mtime: None,
        }
    }
}

/// A single directory listing entry.
///
/// Tree and ref listings carry full attributes; enumeration listings over
/// the whole store carry kind-only placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct DirEntry {
    pub name: String,
    pub attr: Option<Attributes>,
}

/// The namespace engine.
///
/// Holds the process-wide store handle and nothing else. Clone is cheap
/// (the handle is Arc-shared) and every operation is safe to run
/// concurrently with any other.
#[derive(Clone)]
pub struct Namespace {
    store: GitStore,
}

impl Namespace {
    pub fn new(store: GitStore) -> Self {
        Self { store }
    }

    /// Attributes of the node at a virtual path.
    pub fn attributes(&self, vpath: &str) -> NamespaceResult<Attributes> {
        let comps: Vec<&str> = path::components(vpath).collect();
        match comps.split_first() {
            None => Ok(Attributes::directory()),
            Some((&"HEAD", [])) => Ok(Attributes::symlink()),
            Some((&"obj", rest)) => self.obj_attributes(rest),
            Some((&"commit", rest)) => self.commit_attributes(rest),
            Some((&"refs", rest)) => self.ref_attributes(rest),
            Some((&"inherit", rest)) => self.inherit_attributes(rest),
            Some(_) => Err(NamespaceError::NotFound),
        }
    }

    /// Children of the directory at a virtual path.
    pub fn list_children(&self, vpath: &str) -> NamespaceResult<Vec<DirEntry>> {
        let comps: Vec<&str> = path::components(vpath).collect();
        match comps.split_first() {
            None => Ok(root_entries()),
            Some((&"HEAD", [])) => Err(NamespaceError::NotADirectory),
            Some((&"obj", [])) => Ok(name_entries(
                self.store.object_ids()?,
                NodeKind::RegularFile,
            )),
            Some((&"obj", [_])) => Err(NamespaceError::NotADirectory),
            Some((&"commit", [])) => {
                Ok(name_entries(self.store.commit_ids()?, NodeKind::Directory))
            }
            Some((&"commit", rest)) => self.commit_children(rest),
            Some((&"refs", rest)) => self.ref_children(rest),
            Some((&"inherit", [])) => {
                Ok(name_entries(self.store.commit_ids()?, NodeKind::Directory))
            }
            Some((&"inherit", [hex])) => self.inherit_children(hex),
            Some((&"inherit", [_, _])) => Err(NamespaceError::NotADirectory),
            Some(_) => Err(NamespaceError::NotFound),
        }
    }

    /// Read a clipped byte range from the leaf at a virtual path.
    pub fn read(&self, vpath: &str, offset: u64, len: u32) -> NamespaceResult<Vec<u8>> {
        let comps: Vec<&str> = path::components(vpath).collect();
        let data = match comps.split_first() {
            Some((&"obj", [hex])) => {
                let id = ObjectId::from_hex(hex).ok_or(NamespaceError::InvalidId)?;
                self.store
                    .read_raw(id)
                    .map_err(NamespaceError::from_store)?
            }
            Some((&"commit", rest)) if !rest.is_empty() => {
                let resolved = resolve::resolve(&self.store, rest)?;
                match (&resolved.object, resolved.mode) {
                    (Object::Blob { .. }, Some(_)) => self
                        .store
                        .read_raw(resolved.id)
                        .map_err(NamespaceError::from_store)?,
                    _ => return Err(NamespaceError::NotFound),
                }
            }
            _ => return Err(NamespaceError::NotFound),
        };
        Ok(range::clip(&data, offset, len).to_vec())
    }

    /// Target string of the symlink at a virtual path.
    pub fn read_link(&self, vpath: &str) -> NamespaceResult<String> {
        let comps: Vec<&str> = path::components(vpath).collect();
        match comps.split_first() {
            Some((&"HEAD", [])) => {
                let head = self.store.head().map_err(NamespaceError::from_store)?;
                Ok(link::build_target(0, LinkDestination::Commit, head))
            }
            Some((&"commit", rest)) if !rest.is_empty() => {
                let resolved = resolve::resolve(&self.store, rest)?;
                match (&resolved.object, resolved.mode) {
                    (Object::Blob { .. }, Some(EntryMode::Symlink)) => {
                        // tree symlinks store their target as the blob content
                        let data = self
                            .store
                            .read_raw(resolved.id)
                            .map_err(NamespaceError::from_store)?;
                        Ok(String::from_utf8_lossy(&data).into_owned())
                    }
                    _ => Err(NamespaceError::NotFound),
                }
            }
            Some((&"refs", rel)) if !rel.is_empty() => {
                let list = self.store.list_refs()?;
                refs::link_target(&self.store, &list, rel)
            }
            Some((&"inherit", [hex, index])) => {
                let id = ObjectId::from_hex(hex).ok_or(NamespaceError::InvalidId)?;
                inherit::link_target(&self.store, id, index)
            }
            _ => Err(NamespaceError::NotFound),
        }
    }

    // ==================== obj ====================

    fn obj_attributes(&self, rest: &[&str]) -> NamespaceResult<Attributes> {
        match rest {
            [] => Ok(Attributes::directory()),
            [hex] => {
                let id = ObjectId::from_hex(hex).ok_or(NamespaceError::InvalidId)?;
                let size = self
                    .store
                    .raw_size(id)
                    .map_err(NamespaceError::from_store)?;
                Ok(Attributes::regular(size))
            }
            _ => Err(NamespaceError::NotFound),
        }
    }

    // ==================== commit ====================

    fn commit_attributes(&self, rest: &[&str]) -> NamespaceResult<Attributes> {
        if rest.is_empty() {
            return Ok(Attributes::directory());
        }
        let resolved = resolve::resolve(&self.store, rest)?;
        match (resolved.object, resolved.mode) {
            (Object::Commit(meta), _) => Ok(Attributes::commit_directory(meta.timestamp)),
            (Object::Tree(_), _) => Ok(Attributes::directory()),
            // a bare blob id is not a valid descent root here
            (Object::Blob { .. }, None) => Err(NamespaceError::NotFound),
            (Object::Blob { .. }, Some(EntryMode::Symlink)) => Ok(Attributes::symlink()),
            (Object::Blob { size }, Some(_)) => Ok(Attributes::regular(size)),
        }
    }

    fn commit_children(&self, rest: &[&str]) -> NamespaceResult<Vec<DirEntry>> {
        let resolved = resolve::resolve(&self.store, rest)?;
        let entries = match (resolved.object, resolved.mode) {
            (Object::Commit(meta), _) => {
                let tree_id = meta.tree;
                match self
                    .store
                    .lookup(tree_id)
                    .map_err(NamespaceError::from_store)?
                {
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
            (Object::Tree(entries), _) => entries,
            (Object::Blob { .. }, None) => return Err(NamespaceError::NotFound),
            (Object::Blob { .. }, Some(_)) => return Err(NamespaceError::NotADirectory),
        };

        let mut children = Vec::with_capacity(entries.len());
        for entry in entries {
            let attr = match entry.mode {
                EntryMode::Directory => Attributes::directory(),
                EntryMode::Symlink => Attributes::symlink(),
                EntryMode::Regular => {
                    let size = self
                        .store
                        .raw_size(entry.id)
                        .map_err(NamespaceError::from_store)?;
                    Attributes::regular(size)
                }
            };
            children.push(DirEntry {
                name: entry.name,
                attr: Some(attr),
            });
        }
        Ok(children)
    }

    // ==================== refs ====================

    fn ref_attributes(&self, rel: &[&str]) -> NamespaceResult<Attributes> {
        if rel.is_empty() {
            return Ok(Attributes::directory());
        }
        let list = self.store.list_refs()?;
        match refs::stat(&list, rel)? {
            refs::RefNode::Leaf => Ok(Attributes::symlink()),
            refs::RefNode::Directory => Ok(Attributes::directory()),
        }
    }

    fn ref_children(&self, rel: &[&str]) -> NamespaceResult<Vec<DirEntry>> {
        let list = self.store.list_refs()?;
        if !rel.is_empty() {
            match refs::stat(&list, rel)? {
                refs::RefNode::Leaf => return Err(NamespaceError::NotADirectory),
                refs::RefNode::Directory => {}
            }
        }
        let mut children = Vec::new();
        for name in refs::list_children(&list, rel) {
            let mut child_rel = rel.to_vec();
            child_rel.push(&name);
            let attr = match refs::stat(&list, &child_rel)? {
                refs::RefNode::Leaf => Attributes::symlink(),
                refs::RefNode::Directory => Attributes::directory(),
            };
            children.push(DirEntry {
                name: name.clone(),
                attr: Some(attr),
            });
        }
        Ok(children)
    }

    // ==================== inherit ====================

    fn inherit_attributes(&self, rest: &[&str]) -> NamespaceResult<Attributes> {
        match rest {
            [] => Ok(Attributes::directory()),
            // one component is always typed as a directory, without a
            // store round-trip
            [_hex] => Ok(Attributes::directory()),
            [hex, index] => {
                let id = ObjectId::from_hex(hex).ok_or(NamespaceError::InvalidId)?;
                inherit::validate_entry(&self.store, id, index)?;
                Ok(Attributes::symlink())
            }
            _ => Err(NamespaceError::NotFound),
        }
    }

    fn inherit_children(&self, hex: &str) -> NamespaceResult<Vec<DirEntry>> {
        let id = ObjectId::from_hex(hex).ok_or(NamespaceError::InvalidId)?;
        Ok(inherit::list_parents(&self.store, id)?
            .into_iter()
            .map(|name| DirEntry {
                name,
                attr: Some(Attributes::symlink()),
            })
            .collect())
    }
}

fn root_entries() -> Vec<DirEntry> {
    let dir = |name: &str| DirEntry {
        name: name.to_string(),
        attr: Some(Attributes::directory()),
    };
    vec![
        dir("commit"),
        dir("obj"),
        dir("refs"),
        dir("inherit"),
        DirEntry {
            name: "HEAD".to_string(),
            attr: Some(Attributes::symlink()),
        },
    ]
}

/// Enumeration listings over the whole store: names plus a kind; sizes are
/// not computed during a full scan.
fn name_entries(ids: Vec<ObjectId>, kind: NodeKind) -> Vec<DirEntry> {
    let attr = Attributes {
        kind,
        size: 0,
        mtime: None,
    };
    ids.into_iter()
        .map(|id| DirEntry {
            name: id.to_string(),
            attr: Some(attr),
        })
        .collect()
}
