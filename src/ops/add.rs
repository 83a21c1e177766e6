use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::fs::clean_path;
use crate::index::{AddOutcome, Index};
use crate::repo::{Repo, QUILL_DIR};

/// stage files and directories
///
/// directories are walked recursively (skipping `.quill`). relative paths are
/// taken relative to the repository root. the index is saved once, after every
/// path has been staged; the first failure aborts without saving.
pub fn add(repo: &Repo, paths: &[PathBuf]) -> Result<Vec<AddOutcome>> {
    let _lock = repo.lock()?;
    let mut index = Index::load(repo)?;
    let mut outcomes = Vec::new();

    for path in paths {
        let abs = clean_path(&repo.root().join(path));
        let is_dir = fs::symlink_metadata(&abs)
            .map(|m| m.is_dir())
            .unwrap_or(false);

        if is_dir && abs.starts_with(repo.root()) {
            add_directory(repo, &mut index, &abs, &mut outcomes)?;
        } else {
            outcomes.push(index.add_path(repo, path)?);
        }
    }

    index.save(repo)?;
    Ok(outcomes)
}

/// stage every regular file below `dir`, in file name order
fn add_directory(
    repo: &Repo,
    index: &mut Index,
    dir: &Path,
    outcomes: &mut Vec<AddOutcome>,
) -> Result<()> {
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || e.file_name() != QUILL_DIR);

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dir.to_path_buf());
            Error::Read {
                path,
                source: e.into(),
            }
        })?;

        if entry.file_type().is_file() {
            outcomes.push(index.add_path(repo, entry.path())?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserConfig;
    use crate::Hash;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let user = UserConfig::new("Test", "test@example.com").unwrap();
        let repo = Repo::init(dir.path(), &user).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_add_single_file_persists() {
        let (_dir, repo) = test_repo();
        fs::write(repo.root().join("a.txt"), "hello").unwrap();

        let outcomes = add(&repo, &[PathBuf::from("a.txt")]).unwrap();
        assert_eq!(outcomes, vec![AddOutcome::Staged("a.txt".to_string())]);

        let index = Index::load(&repo).unwrap();
        assert_eq!(index.get("a.txt").unwrap().hash, Hash::digest(b"hello"));
        assert!(index.get("a.txt").unwrap().staged);
    }

    #[test]
    fn test_add_directory_recursively() {
        let (_dir, repo) = test_repo();
        fs::create_dir_all(repo.root().join("src/nested")).unwrap();
        fs::write(repo.root().join("src/b.rs"), "b").unwrap();
        fs::write(repo.root().join("src/a.rs"), "a").unwrap();
        fs::write(repo.root().join("src/nested/c.rs"), "c").unwrap();

        let outcomes = add(&repo, &[PathBuf::from("src")]).unwrap();
        let paths: Vec<_> = outcomes.iter().map(|o| o.path()).collect();
        assert_eq!(paths, vec!["src/a.rs", "src/b.rs", "src/nested/c.rs"]);
    }

    #[test]
    fn test_add_root_skips_metadata_dir() {
        let (_dir, repo) = test_repo();
        fs::write(repo.root().join("top.txt"), "top").unwrap();

        let outcomes = add(&repo, &[PathBuf::from(".")]).unwrap();
        let paths: Vec<_> = outcomes.iter().map(|o| o.path()).collect();
        assert_eq!(paths, vec!["top.txt"]);
    }

    #[test]
    fn test_add_twice_reports_unchanged_after_commit() {
        let (_dir, repo) = test_repo();
        fs::write(repo.root().join("a.txt"), "hello").unwrap();

        add(&repo, &[PathBuf::from("a.txt")]).unwrap();
        crate::index::clear_staged_flags(&repo, &Hash::ZERO).unwrap();

        let outcomes = add(&repo, &[PathBuf::from("a.txt")]).unwrap();
        assert_eq!(outcomes, vec![AddOutcome::Unchanged("a.txt".to_string())]);
    }

    #[test]
    fn test_add_failure_leaves_index_untouched() {
        let (_dir, repo) = test_repo();
        fs::write(repo.root().join("a.txt"), "hello").unwrap();

        let result = add(
            &repo,
            &[PathBuf::from("a.txt"), PathBuf::from("../../etc/passwd")],
        );
        assert!(matches!(result, Err(Error::PathTraversal(_))));
        assert!(Index::load(&repo).unwrap().entries.is_empty());
    }

    #[test]
    fn test_add_directory_outside_repository() {
        let (dir, repo) = test_repo();
        let outside = dir.path().parent().unwrap().to_path_buf();

        let result = add(&repo, &[outside]);
        assert!(matches!(result, Err(Error::PathTraversal(_))));
    }

    #[test]
    fn test_add_symlinked_directory_rejected() {
        let (_dir, repo) = test_repo();
        let outside = tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), "secret").unwrap();
        std::os::unix::fs::symlink(outside.path(), repo.root().join("link")).unwrap();

        let result = add(&repo, &[PathBuf::from("link")]);
        assert!(matches!(result, Err(Error::NotRegularFile(_))));

        let result = add(&repo, &[PathBuf::from("link/secret.txt")]);
        assert!(matches!(result, Err(Error::PathTraversal(_))));

        assert!(Index::load(&repo).unwrap().entries.is_empty());
    }

    #[test]
    fn test_walk_skips_nested_symlinked_directory() {
        let (_dir, repo) = test_repo();
        let outside = tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), "secret").unwrap();
        fs::create_dir(repo.root().join("src")).unwrap();
        fs::write(repo.root().join("src/a.rs"), "a").unwrap();
        std::os::unix::fs::symlink(outside.path(), repo.root().join("src/link")).unwrap();

        let outcomes = add(&repo, &[PathBuf::from(".")]).unwrap();
        let paths: Vec<_> = outcomes.iter().map(|o| o.path()).collect();
        assert_eq!(paths, vec!["src/a.rs"]);
    }
}
