use std::collections::BTreeMap;

use crate::error::Result;
use crate::hash::Hash;
use crate::object::{list_tree_paths, read_commit};
use crate::repo::Repo;
use crate::types::{ChangeKind, DiffEntry};

/// changes introduced by `child_tree` relative to the tree of `parent_commit`
///
/// with no parent every path in the child tree is reported as added.
pub fn diff(
    repo: &Repo,
    child_tree: &Hash,
    parent_commit: Option<&Hash>,
) -> Result<Vec<DiffEntry>> {
    let new = list_tree_paths(repo, child_tree)?;

    let old = match parent_commit {
        Some(parent) => {
            let parent = read_commit(repo, parent)?;
            list_tree_paths(repo, &parent.tree)?
        }
        None => Vec::new(),
    };

    Ok(diff_paths(&old, &new))
}

/// changes between two commits; `parent` defaults to the commit's own parent
pub fn diff_commits(
    repo: &Repo,
    commit: &Hash,
    parent: Option<&Hash>,
) -> Result<Vec<DiffEntry>> {
    let child = read_commit(repo, commit)?;
    let parent = parent.copied().or(child.parent);
    diff(repo, &child.tree, parent.as_ref())
}

/// classify each path from two (digest, path) listings, sorted by path
pub fn diff_paths(old: &[(Hash, String)], new: &[(Hash, String)]) -> Vec<DiffEntry> {
    let old: BTreeMap<&str, &Hash> = old.iter().map(|(h, p)| (p.as_str(), h)).collect();
    let new: BTreeMap<&str, &Hash> = new.iter().map(|(h, p)| (p.as_str(), h)).collect();

    let mut changes = Vec::new();

    for (path, hash) in &new {
        match old.get(path) {
            None => changes.push(DiffEntry::new(*path, ChangeKind::Added)),
            Some(old_hash) if old_hash != hash => {
                changes.push(DiffEntry::new(*path, ChangeKind::Modified))
            }
            Some(_) => {}
        }
    }

    for path in old.keys() {
        if !new.contains_key(path) {
            changes.push(DiffEntry::new(*path, ChangeKind::Deleted));
        }
    }

    changes.sort_by(|a, b| a.path.cmp(&b.path));
    changes
}
