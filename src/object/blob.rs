use crate::error::Result;
use crate::hash::Hash;
use crate::object::store;
use crate::repo::Repo;

/// write raw file content to the object store
///
/// returns the blob hash, `sha256(content)`.
pub fn write_blob(repo: &Repo, content: &[u8]) -> Result<Hash> {
    let hash = Hash::digest(content);
    store::put(repo, &hash, content)?;
    Ok(hash)
}

/// read blob content
pub fn read_blob(repo: &Repo, hash: &Hash) -> Result<Vec<u8>> {
    store::get(repo, hash)
}
