use tracing::debug;

use crate::error::Result;
use crate::hash::Hash;
use crate::index::Index;
use crate::object::write_tree;
use crate::repo::Repo;
use crate::types::Tree;

/// snapshot the current index into a stored tree object
///
/// the index itself is left untouched.
pub fn build_tree(repo: &Repo) -> Result<Hash> {
    let index = Index::load(repo)?;
    let tree = Tree::new(index.entries);
    let hash = write_tree(repo, &tree)?;

    debug!("built tree {} with {} entries", hash.short(), tree.len());
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserConfig;
    use crate::object::read_tree;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let user = UserConfig::new("Test", "test@example.com").unwrap();
        let repo = Repo::init(dir.path(), &user).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_build_tree_from_index() {
        let (_dir, repo) = test_repo();
        fs::write(repo.root().join("a.txt"), "hello").unwrap();

        let mut index = Index::load(&repo).unwrap();
        index.add_path(&repo, Path::new("a.txt")).unwrap();
        index.save(&repo).unwrap();

        let hash = build_tree(&repo).unwrap();
        let tree = read_tree(&repo, &hash).unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get("a.txt").unwrap().hash, Hash::digest(b"hello"));

        // index is not mutated
        assert_eq!(Index::load(&repo).unwrap(), index);
    }

    #[test]
    fn test_build_tree_is_stable() {
        let (_dir, repo) = test_repo();
        fs::write(repo.root().join("a.txt"), "a").unwrap();
        fs::write(repo.root().join("b.txt"), "b").unwrap();

        // stage in opposite orders into two fresh indexes
        let mut first = Index::default();
        first.add_path(&repo, Path::new("a.txt")).unwrap();
        first.add_path(&repo, Path::new("b.txt")).unwrap();
        first.save(&repo).unwrap();
        let h1 = build_tree(&repo).unwrap();

        let mut second = Index::default();
        second.add_path(&repo, Path::new("b.txt")).unwrap();
        second.add_path(&repo, Path::new("a.txt")).unwrap();
        second.save(&repo).unwrap();
        let h2 = build_tree(&repo).unwrap();

        assert_eq!(h1, h2);
    }

    #[test]
    fn test_build_tree_empty_index() {
        let (_dir, repo) = test_repo();

        let hash = build_tree(&repo).unwrap();
        assert!(read_tree(&repo, &hash).unwrap().is_empty());
    }
}
