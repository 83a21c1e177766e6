use serde::{Deserialize, Serialize};

use crate::hash::Hash;

/// a path record shared by the staging index and tree snapshots
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// repository-relative, slash-separated path
    pub path: String,
    /// digest of the staged content
    pub hash: Hash,
    /// octal permission bits, e.g. `644`
    pub mode: String,
    /// part of the next commit
    #[serde(default, skip_serializing_if = "is_false")]
    pub staged: bool,
}

impl Entry {
    /// a freshly staged entry
    pub fn staged(path: impl Into<String>, hash: Hash, mode: u32) -> Self {
        Self {
            path: path.into(),
            hash,
            mode: format_mode(mode),
            staged: true,
        }
    }
}

/// render permission bits as the octal mode string
pub fn format_mode(mode: u32) -> String {
    format!("{:o}", mode & 0o777)
}

fn is_false(b: &bool) -> bool {
    !*b
}
