//! core type-safe wrappers around git primitives for the store layer.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use git2::Oid;

/// Length in hex characters of a full object id.
pub const OID_HEX_LEN: usize = 40;

/// Content-derived identifier of a commit, tree or blob.
///
/// The inner Oid is only accessible within the store module, so raw git2
/// ids never leak into the namespace engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub(crate) Oid);

impl ObjectId {
    pub(crate) fn new(oid: Oid) -> Self {
        Self(oid)
    }

    /// raw Oid (for internal use only)
    pub(crate) fn raw(&self) -> Oid {
        self.0
    }

    /// parse an ObjectId from a full-width hex string
    ///
    /// Partial ids are rejected; every id in the virtual namespace is
    /// exactly [`OID_HEX_LEN`] characters.
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != OID_HEX_LEN {
            return None;
        }
        Oid::from_str(hex).ok().map(ObjectId)
    }

    /// short form of the object ID
    pub fn short(&self) -> String {
        self.0.to_string()[..7].to_string()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural mode of a tree entry.
///
/// Directory entries address a Tree; the other two address a Blob, the
/// symlink bit being a property of the entry rather than the blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    Directory,
    Regular,
    Symlink,
}

/// A single named entry inside a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub mode: EntryMode,
    pub id: ObjectId,
}

/// Decoded metadata of a commit.
#[derive(Debug, Clone)]
pub struct CommitMeta {
    pub tree: ObjectId,
    pub parents: Vec<ObjectId>,
    pub timestamp: DateTime<Utc>,
}

impl CommitMeta {
    /// create CommitMeta from a git2::Commit
    pub(crate) fn from_git2(commit: &git2::Commit<'_>) -> Self {
        let time = commit.time();
        let timestamp = Utc
            .timestamp_opt(time.seconds(), 0)
            .single()
            .unwrap_or_default();

        Self {
            tree: ObjectId::new(commit.tree_id()),
            parents: commit.parent_ids().map(ObjectId::new).collect(),
            timestamp,
        }
    }

    /// number of parent commits
    pub fn parent_count(&self) -> usize {
        self.parents.len()
    }

    /// get the parent at `index`, if any
    pub fn parent(&self, index: usize) -> Option<ObjectId> {
        self.parents.get(index).copied()
    }
}

/// A decoded object, tagged by kind.
///
/// Every lookup produces a uniquely owned value; the engine matches on it
/// exhaustively and never holds a reference back into the store.
#[derive(Debug, Clone)]
pub enum Object {
    Commit(CommitMeta),
    Tree(Vec<TreeEntry>),
    Blob { size: u64 },
}

impl Object {
    /// human-readable kind name, for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Object::Commit(_) => "commit",
            Object::Tree(_) => "tree",
            Object::Blob { .. } => "blob",
        }
    }
}

/// A ref name (with the leading `refs/` already stripped) and its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefEntry {
    pub name: String,
    pub target: ObjectId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_from_hex() {
        let hex = "0123456789abcdef0123456789abcdef01234567";
        let id = ObjectId::from_hex(hex).unwrap();
        assert_eq!(id.to_string(), hex);
        assert_eq!(id.short(), "0123456");
    }

    #[test]
    fn test_object_id_rejects_short_and_invalid() {
        assert!(ObjectId::from_hex("").is_none());
        assert!(ObjectId::from_hex("abc123").is_none()); // partial
        assert!(ObjectId::from_hex(&"g".repeat(OID_HEX_LEN)).is_none()); // non-hex
        assert!(ObjectId::from_hex(&"a".repeat(OID_HEX_LEN + 1)).is_none()); // too long
    }

    #[test]
    fn test_commit_meta_parent_access() {
        let a = ObjectId::from_hex(&"a".repeat(OID_HEX_LEN)).unwrap();
        let b = ObjectId::from_hex(&"b".repeat(OID_HEX_LEN)).unwrap();
        let meta = CommitMeta {
            tree: a,
            parents: vec![a, b],
            timestamp: Utc.timestamp_opt(0, 0).single().unwrap(),
        };

        assert_eq!(meta.parent_count(), 2);
        assert_eq!(meta.parent(1), Some(b));
        assert_eq!(meta.parent(2), None);
    }
}
