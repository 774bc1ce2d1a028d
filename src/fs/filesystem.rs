//! fuser dispatch for the virtual namespace.
//!
//! Translates the kernel's inode-based requests into path-based engine
//! calls. Only the read-side operations are implemented; everything else
//! keeps fuser's defaults and fails accordingly.

use std::ffi::OsStr;
use std::time::{Duration, UNIX_EPOCH};

use fuser::{
    FileAttr, FileType, Filesystem, ReplyAttr, ReplyData, ReplyDirectory, ReplyEntry, Request,
};
use tracing::{debug, error};

use crate::fs::inode::InodeTable;
use crate::namespace::{Attributes, Namespace, NamespaceError, NodeKind};

/// Kernel cache validity for entries and attributes. The projected graph
/// is immutable, so a fixed TTL is safe.
const TTL: Duration = Duration::from_secs(1);

/// The mounted filesystem: the namespace engine plus inode bookkeeping.
pub struct GitViewFs {
    ns: Namespace,
    inodes: InodeTable,
}

impl GitViewFs {
    pub fn new(ns: Namespace) -> Self {
        Self {
            ns,
            inodes: InodeTable::new(),
        }
    }

    fn file_attr(&self, ino: u64, attr: &Attributes, req: &Request<'_>) -> FileAttr {
        let (kind, perm) = match attr.kind {
            NodeKind::Directory => (FileType::Directory, 0o755),
            NodeKind::RegularFile => (FileType::RegularFile, 0o444),
            NodeKind::Symlink => (FileType::Symlink, 0o777),
        };
        let mtime = attr
            .mtime
            .map(|t| UNIX_EPOCH + Duration::from_secs(t.timestamp().max(0) as u64))
            .unwrap_or(UNIX_EPOCH);
        FileAttr {
            ino,
            size: attr.size,
            blocks: attr.size.div_ceil(512),
            atime: mtime,
            mtime,
            ctime: mtime,
            crtime: mtime,
            kind,
            perm,
            nlink: 1,
            uid: req.uid(),
            gid: req.gid(),
            rdev: 0,
            blksize: 512,
            flags: 0,
        }
    }

    fn path_of(&self, ino: u64) -> Option<String> {
        self.inodes.path(ino).map(str::to_string)
    }
}

/// Map an engine failure onto an errno, logging store failures with
/// enough context to diagnose them.
fn errno(op: &str, path: &str, err: &NamespaceError) -> i32 {
    match err {
        NamespaceError::NotADirectory => libc::ENOTDIR,
        NamespaceError::Store(e) if !e.is_not_found() => {
            error!(op, path, error = %e, "store failure");
            libc::EIO
        }
        _ => {
            debug!(op, path, error = %err, "request failed");
            libc::ENOENT
        }
    }
}

impl Filesystem for GitViewFs {
    fn lookup(&mut self, req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        let parent_path = match self.path_of(parent) {
            Some(p) => p,
            None => return reply.error(libc::ENOENT),
        };
        let name = match name.to_str() {
            Some(n) => n,
            None => return reply.error(libc::ENOENT),
        };
        let path = InodeTable::child_path(&parent_path, name);
        match self.ns.attributes(&path) {
            Ok(attr) => {
                let ino = self.inodes.assign(&path);
                reply.entry(&TTL, &self.file_attr(ino, &attr, req), 0);
            }
            Err(e) => reply.error(errno("lookup", &path, &e)),
        }
    }

    fn getattr(&mut self, req: &Request<'_>, ino: u64, reply: ReplyAttr) {
        let path = match self.path_of(ino) {
            Some(p) => p,
            None => return reply.error(libc::ENOENT),
        };
        match self.ns.attributes(&path) {
            Ok(attr) => reply.attr(&TTL, &self.file_attr(ino, &attr, req)),
            Err(e) => reply.error(errno("getattr", &path, &e)),
        }
    }

    fn readlink(&mut self, _req: &Request<'_>, ino: u64, reply: ReplyData) {
        let path = match self.path_of(ino) {
            Some(p) => p,
            None => return reply.error(libc::ENOENT),
        };
        match self.ns.read_link(&path) {
            Ok(target) => reply.data(target.as_bytes()),
            Err(e) => reply.error(errno("readlink", &path, &e)),
        }
    }

    fn read(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        let path = match self.path_of(ino) {
            Some(p) => p,
            None => return reply.error(libc::ENOENT),
        };
        let offset = offset.max(0) as u64;
        match self.ns.read(&path, offset, size) {
            Ok(data) => reply.data(&data),
            Err(e) => reply.error(errno("read", &path, &e)),
        }
    }

    fn readdir(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        let path = match self.path_of(ino) {
            Some(p) => p,
            None => return reply.error(libc::ENOENT),
        };
        let children = match self.ns.list_children(&path) {
            Ok(children) => children,
            Err(e) => return reply.error(errno("readdir", &path, &e)),
        };

        let parent_ino = self.inodes.assign(InodeTable::parent_path(&path));
        let mut entries: Vec<(u64, FileType, String)> = vec![
            (ino, FileType::Directory, ".".to_string()),
            (parent_ino, FileType::Directory, "..".to_string()),
        ];
        for child in children {
            let child_path = InodeTable::child_path(&path, &child.name);
            let child_ino = self.inodes.assign(&child_path);
            let kind = match child.attr.map(|a| a.kind) {
                Some(NodeKind::Directory) => FileType::Directory,
                Some(NodeKind::Symlink) => FileType::Symlink,
                _ => FileType::RegularFile,
            };
            entries.push((child_ino, kind, child.name));
        }

        for (i, (child_ino, kind, name)) in
            entries.into_iter().enumerate().skip(offset.max(0) as usize)
        {
            // offset of the entry after this one, for restartable listings
            if reply.add(child_ino, (i + 1) as i64, kind, &name) {
                break;
            }
        }
        reply.ok();
    }
}
