use std::collections::HashSet;
use std::fmt;

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::head::read_head;
use crate::object::read_commit;
use crate::ops::diff;
use crate::repo::Repo;
use crate::types::Commit;
use crate::types::DiffEntry;

/// date layout used in log output, e.g. `Mon Jan 2 15:04:05 2024 -0700`
const DATE_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

/// commit with its hash and the changes it introduced
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub hash: Hash,
    pub commit: Commit,
    pub changes: Vec<DiffEntry>,
}

/// walk history from HEAD to the root commit, newest first
///
/// returns an empty list when there are no commits. a commit reached twice
/// means the parent chain loops and fails with `CorruptHistory`.
pub fn log(repo: &Repo, max_count: Option<usize>) -> Result<Vec<LogEntry>> {
    let mut entries = Vec::new();
    let mut visited = HashSet::new();
    let mut next = read_head(repo)?;

    while let Some(hash) = next {
        if let Some(max) = max_count {
            if entries.len() >= max {
                break;
            }
        }

        if !visited.insert(hash) {
            return Err(Error::CorruptHistory(hash));
        }

        let commit = read_commit(repo, &hash)?;
        let changes = diff(repo, &commit.tree, commit.parent.as_ref())?;

        next = commit.parent;
        entries.push(LogEntry {
            hash,
            commit,
            changes,
        });
    }

    Ok(entries)
}

/// format a log entry for display
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "commit {}", self.hash)?;
        writeln!(f, "Author: {}", self.commit.author)?;
        writeln!(f, "Date:   {}", self.commit.timestamp.format(DATE_FORMAT))?;
        writeln!(f)?;
        for line in self.commit.message.lines() {
            writeln!(f, "    {}", line)?;
        }
        writeln!(f)?;

        if self.commit.is_root() {
            writeln!(f, "Files:")?;
            for change in &self.changes {
                writeln!(f, "    {}", change.path)?;
            }
            writeln!(f)?;
        } else if !self.changes.is_empty() {
            writeln!(f, "Changes:")?;
            for change in &self.changes {
                writeln!(f, "    {}", change)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
