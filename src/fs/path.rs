use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, IoResultExt, Result};
use crate::repo::QUILL_DIR;

/// lexically normalize a path: drop `.` and fold `..` into its parent
///
/// symlinks are never consulted. `..` above the filesystem root stays at the
/// root, matching how the kernel resolves it.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// resolve `path` against the repository root and check it stays inside
///
/// relative paths are taken relative to `root`. returns the cleaned absolute
/// path and the slash-separated repository-relative path.
pub fn resolve_in_repo(root: &Path, path: &Path) -> Result<(PathBuf, String)> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    let cleaned = clean_path(&joined);

    let rel = match cleaned.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel,
        _ => return Err(Error::PathTraversal(path.to_path_buf())),
    };

    if rel.starts_with(QUILL_DIR) {
        return Err(Error::ReservedPath(path.to_path_buf()));
    }

    let rel = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    Ok((cleaned, rel))
}

/// fail if any directory between `root` and `abs` is a symlink
///
/// `abs` must already be a cleaned path under `root`. the final component is
/// not inspected; `original` is what gets reported.
pub fn reject_symlinked_parents(root: &Path, abs: &Path, original: &Path) -> Result<()> {
    let Some(parent) = abs.parent() else {
        return Ok(());
    };

    for dir in parent.ancestors() {
        if dir == root || !dir.starts_with(root) {
            break;
        }
        let meta = fs::symlink_metadata(dir).with_read_path(dir)?;
        if meta.file_type().is_symlink() {
            return Err(Error::PathTraversal(original.to_path_buf()));
        }
    }

    Ok(())
}
