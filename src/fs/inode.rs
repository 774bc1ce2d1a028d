//! In-memory inode bookkeeping for a FUSE session.
//!
//! The engine itself is path-keyed; the kernel speaks inodes. This table
//! assigns an inode the first time a virtual path is seen and keeps the
//! mapping stable for the life of the mount, since the kernel may hand an
//! inode back at any later point.

use std::collections::HashMap;

/// The inode of the mount root.
pub const ROOT_INO: u64 = 1;

/// Bidirectional inode <-> virtual-path table.
pub struct InodeTable {
    paths: HashMap<u64, String>,
    inodes: HashMap<String, u64>,
    next: u64,
}

impl InodeTable {
    pub fn new() -> Self {
        let mut table = Self {
            paths: HashMap::new(),
            inodes: HashMap::new(),
            next: ROOT_INO + 1,
        };
        table.paths.insert(ROOT_INO, "/".to_string());
        table.inodes.insert("/".to_string(), ROOT_INO);
        table
    }

    /// Path for an inode the kernel handed back.
    pub fn path(&self, ino: u64) -> Option<&str> {
        self.paths.get(&ino).map(String::as_str)
    }

    /// Inode for a path, assigning a fresh one on first sight.
    pub fn assign(&mut self, path: &str) -> u64 {
        if let Some(ino) = self.inodes.get(path) {
            return *ino;
        }
        let ino = self.next;
        self.next += 1;
        self.paths.insert(ino, path.to_string());
        self.inodes.insert(path.to_string(), ino);
        ino
    }

    /// Join a child name below a directory path.
    pub fn child_path(parent: &str, name: &str) -> String {
        if parent == "/" {
            format!("/{}", name)
        } else {
            format!("{}/{}", parent, name)
        }
    }

    /// Parent of a virtual path; the root is its own parent.
    pub fn parent_path(path: &str) -> &str {
        match path.rfind('/') {
            Some(0) | None => "/",
            Some(idx) => &path[..idx],
        }
    }
}

impl Default for InodeTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_preassigned() {
        let table = InodeTable::new();
        assert_eq!(table.path(ROOT_INO), Some("/"));
    }

    #[test]
    fn test_assignment_is_stable() {
        let mut table = InodeTable::new();
        let a = table.assign("/commit");
        let b = table.assign("/refs");
        assert_ne!(a, b);
        assert_ne!(a, ROOT_INO);
        assert_eq!(table.assign("/commit"), a);
        assert_eq!(table.path(a), Some("/commit"));
        assert_eq!(table.path(ROOT_INO + 100), None);
    }

    #[test]
    fn test_child_path_join() {
        assert_eq!(InodeTable::child_path("/", "commit"), "/commit");
        assert_eq!(InodeTable::child_path("/commit", "abc"), "/commit/abc");
    }

    #[test]
    fn test_parent_path() {
        assert_eq!(InodeTable::parent_path("/"), "/");
        assert_eq!(InodeTable::parent_path("/commit"), "/");
        assert_eq!(InodeTable::parent_path("/commit/abc"), "/commit");
    }
}
