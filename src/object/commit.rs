use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::store;
use crate::repo::Repo;
use crate::types::{Commit, SealedCommit};

/// write a sealed commit to the object store under its own hash
pub fn write_commit(repo: &Repo, sealed: &SealedCommit) -> Result<Hash> {
    store::put(repo, &sealed.hash, &sealed.bytes)?;
    Ok(sealed.hash)
}

/// read a commit from the object store
///
/// the record's own `hash` field must name the digest it was read under.
pub fn read_commit(repo: &Repo, hash: &Hash) -> Result<Commit> {
    let bytes = store::get(repo, hash)?;

    let commit: Commit = serde_json::from_slice(&bytes).map_err(|source| Error::Deserialize {
        hash: *hash,
        source,
    })?;

    if commit.hash != Some(*hash) {
        return Err(Error::CorruptObject(*hash));
    }

    Ok(commit)
}
