//! FUSE protocol layer.
//!
//! This module is the only place that knows about the kernel protocol; the
//! namespace engine stays path-keyed and testable without a mount.
//!
//! The module is split the usual way for fuser-backed filesystems:
//! - `inode` - inode <-> virtual-path bookkeeping
//! - `filesystem` - the `fuser::Filesystem` implementation

mod filesystem;
mod inode;

pub use filesystem::GitViewFs;
pub use inode::{InodeTable, ROOT_INO};

use std::io;
use std::path::Path;

use fuser::MountOption;

use crate::namespace::Namespace;

/// Mount the namespace read-only at `mountpoint`.
///
/// Blocks until the filesystem is unmounted; the store handle is dropped
/// on return.
pub fn mount(ns: Namespace, mountpoint: &Path) -> io::Result<()> {
    let options = [
        MountOption::RO,
        MountOption::FSName("gitview".to_string()),
        MountOption::DefaultPermissions,
    ];
    fuser::mount2(GitViewFs::new(ns), mountpoint, &options)
}
