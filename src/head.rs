//! the history pointer: `.quill/HEAD`

use std::fs;

use tracing::info;

use crate::error::{Error, Result};
use crate::fs::write_atomic;
use crate::hash::Hash;
use crate::repo::Repo;

/// permissions for the HEAD file
const HEAD_MODE: u32 = 0o644;

/// read the current history pointer
///
/// `None` means no commits exist yet (absent or empty HEAD).
pub fn read_head(repo: &Repo) -> Result<Option<Hash>> {
    let head_path = repo.head_path();

    let content = match fs::read_to_string(&head_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(Error::Read {
                path: head_path,
                source: e,
            })
        }
    };

    let hex = content.trim();
    if hex.is_empty() {
        return Ok(None);
    }
    Hash::from_hex(hex).map(Some)
}

/// overwrite the history pointer
pub fn write_head(repo: &Repo, hash: &Hash) -> Result<()> {
    write_atomic(repo, &repo.head_path(), hash.to_hex().as_bytes(), HEAD_MODE)?;
    info!("HEAD is now {}", hash.short());
    Ok(())
}

/// resolve `HEAD` or a full 64-char hash to a commit hash
pub fn resolve_rev(repo: &Repo, rev: &str) -> Result<Hash> {
    if rev == "HEAD" {
        return read_head(repo)?.ok_or(Error::NoCommits);
    }

    Hash::from_hex(rev)
}
