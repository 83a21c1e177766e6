use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};
use crate::fs::write_atomic;
use crate::hash::Hash;
use crate::repo::{create_dir, Repo};

/// permissions for stored objects
const OBJECT_MODE: u32 = 0o600;

/// store `content` under `hash`
///
/// objects are write-once: if the object already exists nothing is written.
/// the caller is responsible for `hash` actually being the digest of `content`.
pub fn put(repo: &Repo, hash: &Hash, content: &[u8]) -> Result<()> {
    let path = object_path(repo, hash);

    // deduplication: if object already exists, we're done
    if path.exists() {
        debug!("object {} already stored", hash.short());
        return Ok(());
    }

    // fan-out directory; a concurrent writer may have created it already
    let (dir, _) = hash.to_path_components();
    create_dir(&repo.objects_path().join(dir))?;

    write_atomic(repo, &path, content, OBJECT_MODE)?;

    debug!("stored object {} ({} bytes)", hash.short(), content.len());
    Ok(())
}

/// read the exact bytes stored under `hash`
pub fn get(repo: &Repo, hash: &Hash) -> Result<Vec<u8>> {
    let path = object_path(repo, hash);
    fs::read(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ObjectNotFound(*hash)
        } else {
            Error::Read { path, source: e }
        }
    })
}

/// check if an object exists in the store
pub fn exists(repo: &Repo, hash: &Hash) -> bool {
    object_path(repo, hash).is_file()
}

/// get the filesystem path to an object: `objects/<2 hex>/<62 hex>`
pub fn object_path(repo: &Repo, hash: &Hash) -> PathBuf {
    let (dir, file) = hash.to_path_components();
    repo.objects_path().join(dir).join(file)
}
