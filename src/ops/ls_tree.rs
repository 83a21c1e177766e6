use std::fmt;

use crate::error::Result;
use crate::hash::Hash;
use crate::head::resolve_rev;
use crate::object::{read_commit, read_tree};
use crate::repo::Repo;

/// one path recorded in a commit's tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsTreeEntry {
    pub path: String,
    pub hash: Hash,
    pub mode: String,
}

impl fmt::Display for LsTreeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}\t{}", self.mode, self.hash, self.path)
    }
}

/// list the tree of `rev` (`HEAD` or a full commit hash), ordered by path
pub fn ls_tree(repo: &Repo, rev: &str) -> Result<Vec<LsTreeEntry>> {
    let commit_hash = resolve_rev(repo, rev)?;
    let commit = read_commit(repo, &commit_hash)?;
    let tree = read_tree(repo, &commit.tree)?;

    Ok(tree
        .entries()
        .map(|e| LsTreeEntry {
            path: e.path.clone(),
            hash: e.hash,
            mode: e.mode.clone(),
        })
        .collect())
}
