use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::store;
use crate::repo::Repo;
use crate::types::{Entry, Tree};

/// on-disk shape, with `entries` optional so a missing container is detectable
#[derive(Deserialize)]
struct RawTree {
    entries: Option<BTreeMap<String, Entry>>,
}

/// write a tree to the object store
///
/// trees are serialized as JSON; the hash is computed over those bytes.
pub fn write_tree(repo: &Repo, tree: &Tree) -> Result<Hash> {
    let bytes = serde_json::to_vec(tree).map_err(Error::Serialize)?;
    let hash = Hash::digest(&bytes);
    store::put(repo, &hash, &bytes)?;
    Ok(hash)
}

/// read a tree from the object store
pub fn read_tree(repo: &Repo, hash: &Hash) -> Result<Tree> {
    let bytes = store::get(repo, hash)?;

    let raw: RawTree = serde_json::from_slice(&bytes).map_err(|source| Error::Deserialize {
        hash: *hash,
        source,
    })?;

    let entries = raw.entries.ok_or(Error::InvalidTree(*hash))?;
    Ok(Tree::new(entries))
}

/// list (digest, path) pairs of a stored tree, ordered by path
pub fn list_tree_paths(repo: &Repo, hash: &Hash) -> Result<Vec<(Hash, String)>> {
    Ok(read_tree(repo, hash)?.paths())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserConfig;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let user = UserConfig::new("Test", "test@example.com").unwrap();
        let repo = Repo::init(dir.path(), &user).unwrap();
        (dir, repo)
    }

    fn sample_tree() -> Tree {
        let mut entries = BTreeMap::new();
        for (path, content) in [("src/main.rs", "fn main() {}"), ("README", "readme")] {
            entries.insert(
                path.to_string(),
                Entry::staged(path, Hash::digest(content.as_bytes()), 0o644),
            );
        }
        Tree::new(entries)
    }

    #[test]
    fn test_write_and_read_tree() {
        let (_dir, repo) = test_repo();

        let tree = sample_tree();
        let hash = write_tree(&repo, &tree).unwrap();

        assert_eq!(read_tree(&repo, &hash).unwrap(), tree);
    }

    #[test]
    fn test_tree_deduplication() {
        let (_dir, repo) = test_repo();

        let h1 = write_tree(&repo, &sample_tree()).unwrap();
        let h2 = write_tree(&repo, &sample_tree()).unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_list_tree_paths_sorted() {
        let (_dir, repo) = test_repo();

        let hash = write_tree(&repo, &sample_tree()).unwrap();
        let paths = list_tree_paths(&repo, &hash).unwrap();

        assert_eq!(
            paths,
            vec![
                (Hash::digest(b"readme"), "README".to_string()),
                (Hash::digest(b"fn main() {}"), "src/main.rs".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_tree() {
        let (_dir, repo) = test_repo();

        let hash = write_tree(&repo, &Tree::empty()).unwrap();
        assert!(read_tree(&repo, &hash).unwrap().is_empty());
    }

    #[test]
    fn test_tree_without_entries_field() {
        let (_dir, repo) = test_repo();

        let bytes = br#"{"something":"else"}"#;
        let hash = Hash::digest(bytes);
        store::put(&repo, &hash, bytes).unwrap();

        let result = read_tree(&repo, &hash);
        assert!(matches!(result, Err(Error::InvalidTree(_))));
    }

    #[test]
    fn test_tree_not_json() {
        let (_dir, repo) = test_repo();

        let bytes = b"plain blob content";
        let hash = Hash::digest(bytes);
        store::put(&repo, &hash, bytes).unwrap();

        let result = read_tree(&repo, &hash);
        assert!(matches!(result, Err(Error::Deserialize { .. })));
    }

    #[test]
    fn test_read_nonexistent_tree() {
        let (_dir, repo) = test_repo();

        let result = read_tree(&repo, &Hash::ZERO);
        assert!(matches!(result, Err(Error::ObjectNotFound(_))));
    }
}
