//! quill - a minimal content-addressed version control system
//!
//! files are staged into an index, snapshotted into trees and recorded as a
//! linear chain of commits. everything lives under `.quill/` in the working
//! tree root.
//!
//! # Core concepts
//!
//! - **Blob**: raw file content, keyed by SHA-256 of the bytes
//! - **Index**: the staging area, path -> (digest, mode, staged flag) (JSON)
//! - **Tree**: a snapshot of the index at commit time (JSON)
//! - **Commit**: tree + parent + author + timestamp + message (JSON), keyed by
//!   the digest of its own serialization with the `hash` field blank
//! - **HEAD**: the hex digest of the newest commit, or nothing
//!
//! # On-disk layout
//!
//! ```text
//! .quill/
//!   objects/<2 hex>/<62 hex>   blobs, trees, commits
//!   index                      staging index
//!   HEAD                       history pointer
//!   config/user                name=... / email=...
//!   tmp/                       staging area for atomic writes
//!   lock                       advisory lock file
//! ```
//!
//! # Example usage
//!
//! ```no_run
//! use quill::{ops, Repo, UserConfig};
//! use std::path::{Path, PathBuf};
//!
//! let user = UserConfig::new("Ann", "ann@example.com").unwrap();
//! let repo = Repo::init(Path::new("/path/to/work"), &user).unwrap();
//!
//! ops::add(&repo, &[PathBuf::from("notes.txt")]).unwrap();
//! let hash = ops::commit(&repo, "first notes").unwrap();
//!
//! for entry in ops::log(&repo, None).unwrap() {
//!     println!("{}", entry);
//! }
//! # let _ = hash;
//! ```

mod config;
mod error;
mod hash;
mod head;
mod index;
mod object;
mod repo;

pub mod fs;
pub mod ops;
pub mod types;

pub use config::{is_valid_email, UserConfig};
pub use error::{CommitStep, Error, IoResultExt, Result};
pub use hash::Hash;
pub use head::{read_head, resolve_rev, write_head};
pub use index::{clear_staged_flags, AddOutcome, Index};
pub use object::{
    list_tree_paths, object_exists, object_path, read_blob, read_commit, read_object, read_tree,
    write_blob, write_commit, write_object, write_tree,
};
pub use repo::{Repo, RepoLock, QUILL_DIR};
pub use types::{ChangeKind, Commit, CommitDraft, DiffEntry, Entry, SealedCommit, Tree};
