//! GitView - a read-only FUSE projection of a Git repository
//!
//! This crate mounts the immutable object graph of a repository (commits,
//! trees, blobs, refs) as a browsable filesystem. Nothing is ever written;
//! every path is computed on demand from the backing object store.
//!
//! # Example
//!
//! ```no_run
//! use gitview::fs;
//! use gitview::namespace::Namespace;
//! use gitview::store::GitStore;
//!
//! let store = GitStore::open("./some/repo").unwrap();
//! fs::mount(Namespace::new(store), "/mnt/repo".as_ref()).unwrap();
//! ```

#![allow(dead_code)] // Some methods are for public API extensibility

pub mod fs;
pub mod namespace;
pub mod store;
