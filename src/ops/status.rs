use std::fmt;

use crate::error::Result;
use crate::hash::Hash;
use crate::head::read_head;
use crate::index::Index;
use crate::repo::Repo;
use crate::types::Entry;

/// summary of HEAD and the staging area
#[derive(Debug, Clone)]
pub struct Status {
    pub head: Option<Hash>,
    pub staged: Vec<Entry>,
    pub tracked: usize,
}

/// report the current HEAD and what the next commit would record
pub fn status(repo: &Repo) -> Result<Status> {
    let head = read_head(repo)?;
    let index = Index::load(repo)?;

    Ok(Status {
        head,
        staged: index.staged_entries().cloned().collect(),
        tracked: index.entries.len(),
    })
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.head {
            Some(hash) => writeln!(f, "HEAD at {}", hash.short())?,
            None => writeln!(f, "No commits yet.")?,
        }
        writeln!(f, "{} tracked file(s)", self.tracked)?;

        if self.staged.is_empty() {
            writeln!(f, "nothing staged for commit")?;
        } else {
            writeln!(f, "Changes to be committed:")?;
            for entry in &self.staged {
                writeln!(f, "    {}", entry.path)?;
            }
        }
        Ok(())
    }
}
