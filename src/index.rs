//! the staging index: `.quill/index`
//!
//! a JSON document mapping repository-relative paths to their last staged
//! content digest, plus the tree digest of the last commit:
//!
//! ```text
//! {
//!   "entries": {
//!     "a.txt": { "path": "a.txt", "hash": "2cf2...", "mode": "644", "staged": true }
//!   },
//!   "lastCommitTree": "9f86..."
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, IoResultExt, Result};
use crate::fs::{reject_symlinked_parents, resolve_in_repo, write_atomic};
use crate::hash::{hex_or_empty, Hash};
use crate::object::{read_tree, write_blob};
use crate::repo::{create_dir, Repo};
use crate::types::Entry;

/// permissions for the index file
const INDEX_MODE: u32 = 0o600;

/// the staging area
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    #[serde(default)]
    pub entries: BTreeMap<String, Entry>,
    #[serde(
        rename = "lastCommitTree",
        default,
        with = "hex_or_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_commit_tree: Option<Hash>,
}

/// what staging a single file did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// content recorded and marked for the next commit
    Staged(String),
    /// content identical to the committed version; nothing changed
    Unchanged(String),
    /// a staged path was restored to its committed content and unstaged
    Unstaged(String),
}

impl AddOutcome {
    /// repository-relative path the outcome refers to
    pub fn path(&self) -> &str {
        match self {
            AddOutcome::Staged(p) | AddOutcome::Unchanged(p) | AddOutcome::Unstaged(p) => p,
        }
    }
}

impl fmt::Display for AddOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddOutcome::Staged(p) => write!(f, "added {:?} to staging area", p),
            AddOutcome::Unchanged(p) => {
                write!(f, "file {:?} unchanged, not adding to staging area", p)
            }
            AddOutcome::Unstaged(p) => {
                write!(f, "file {:?} matches last commit, removed from staging area", p)
            }
        }
    }
}

impl Index {
    /// load the index, or an empty one if none has been saved yet
    pub fn load(repo: &Repo) -> Result<Self> {
        let path = repo.index_path();

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no index at {}, starting empty", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(Error::Read { path, source: e }),
        };

        serde_json::from_slice(&bytes).map_err(|source| Error::IndexCorrupt { path, source })
    }

    /// persist the full index (pretty-printed), replacing the previous file
    pub fn save(&self, repo: &Repo) -> Result<()> {
        create_dir(&repo.quill_path())?;

        let mut bytes = serde_json::to_vec_pretty(self).map_err(Error::Serialize)?;
        bytes.push(b'\n');
        write_atomic(repo, &repo.index_path(), &bytes, INDEX_MODE)
    }

    /// look up an entry by repository-relative path
    pub fn get(&self, path: &str) -> Option<&Entry> {
        self.entries.get(path)
    }

    /// is anything staged for the next commit
    pub fn has_staged(&self) -> bool {
        self.entries.values().any(|e| e.staged)
    }

    /// staged entries in path order
    pub fn staged_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values().filter(|e| e.staged)
    }

    /// stage a single regular file
    ///
    /// `path` may be absolute or relative to the repository root; either way it
    /// must resolve inside the root. the index is updated in memory only, the
    /// caller saves it.
    pub fn add_path(&mut self, repo: &Repo, path: &Path) -> Result<AddOutcome> {
        let (abs, rel) = resolve_in_repo(repo.root(), path)?;
        reject_symlinked_parents(repo.root(), &abs, path)?;

        let meta = fs::symlink_metadata(&abs).with_read_path(&abs)?;
        if !meta.file_type().is_file() {
            return Err(Error::NotRegularFile(abs));
        }

        let content = fs::read(&abs).with_read_path(&abs)?;
        let hash = Hash::digest(&content);
        let mode = meta.permissions().mode();

        if let Some(existing) = self.entries.get(&rel) {
            if existing.hash == hash && !existing.staged {
                debug!("{} unchanged, not staged", rel);
                return Ok(AddOutcome::Unchanged(rel));
            }

            if existing.staged
                && existing.hash != hash
                && self.committed_hash(repo, &rel)? == Some(hash)
            {
                info!("{} restored to committed content, unstaged", rel);
                let mut entry = Entry::staged(rel.clone(), hash, mode);
                entry.staged = false;
                self.entries.insert(rel.clone(), entry);
                return Ok(AddOutcome::Unstaged(rel));
            }
        }

        write_blob(repo, &content)?;
        let entry = Entry::staged(rel.clone(), hash, mode);
        self.entries.insert(rel.clone(), entry);

        info!("staged {} ({})", rel, hash.short());
        Ok(AddOutcome::Staged(rel))
    }

    /// digest `path` had in the last commit, if any
    ///
    /// a `lastCommitTree` missing from the store counts as no committed digest.
    fn committed_hash(&self, repo: &Repo, path: &str) -> Result<Option<Hash>> {
        let Some(tree_hash) = self.last_commit_tree else {
            return Ok(None);
        };
        let tree = match read_tree(repo, &tree_hash) {
            Ok(tree) => tree,
            Err(Error::ObjectNotFound(_)) => {
                warn!(
                    "last commit tree {} is missing from the store",
                    tree_hash.short()
                );
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        Ok(tree.get(path).map(|e| e.hash))
    }

    /// mark every entry committed and remember the tree it went into
    pub fn mark_committed(&mut self, tree: Hash) {
        self.last_commit_tree = Some(tree);
        for entry in self.entries.values_mut() {
            entry.staged = false;
        }
    }
}

/// post-commit: clear all staged flags, record `tree`, persist
pub fn clear_staged_flags(repo: &Repo, tree: &Hash) -> Result<()> {
    let mut index = Index::load(repo)?;
    index.mark_committed(*tree);
    index.save(repo)?;
    debug!("cleared staged flags, last commit tree {}", tree.short());
    Ok(())
}
