use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hash::Hash;
use crate::types::Entry;

/// a snapshot of the staging index: path -> entry, ordered by path
///
/// the ordered map makes the serialized form canonical, so two trees with
/// the same entries always hash the same.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    entries: BTreeMap<String, Entry>,
}

impl Tree {
    /// create a tree from path-keyed entries
    pub fn new(entries: BTreeMap<String, Entry>) -> Self {
        Self { entries }
    }

    /// create an empty tree
    pub fn empty() -> Self {
        Self::default()
    }

    /// entries in path order
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// look up entry by path
    pub fn get(&self, path: &str) -> Option<&Entry> {
        self.entries.get(path)
    }

    /// (digest, path) pairs in path order
    pub fn paths(&self) -> Vec<(Hash, String)> {
        self.entries
            .iter()
            .map(|(path, entry)| (entry.hash, path.clone()))
            .collect()
    }

    /// number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// is tree empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
