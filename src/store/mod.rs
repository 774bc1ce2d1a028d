//! store layer for gitview
//!
//! this module provides a complete read-only abstraction over git for the
//! namespace engine. The upper layers (namespace resolution, FUSE dispatch)
//! use this API and never touch git2 directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       GitStore                              │
//! │  (process-wide handle: lookup, raw reads, refs, HEAD)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!        ┌─────────────────────┼─────────────────────┐
//!        │                     │                     │
//!        ▼                     ▼                     ▼
//!  ┌─────────────┐       ┌─────────────┐       ┌─────────────┐
//!  │   objects   │       │    refs     │       │    odb      │
//!  │ (tagged     │       │ (flat name  │       │ (raw bytes, │
//!  │  lookups)   │       │  list)      │       │  full scan) │
//!  └─────────────┘       └─────────────┘       └─────────────┘
//! ```
//!
//! Everything here is a fresh read against the backing repository; no
//! object, listing or ref is cached between requests.

mod error;
mod repository;
mod types;

// Re-export public API
pub use error::{StoreError, StoreResult};
pub use repository::GitStore;
pub use types::{CommitMeta, EntryMode, Object, ObjectId, RefEntry, TreeEntry, OID_HEX_LEN};
