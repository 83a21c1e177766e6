use std::fs::{self, File, Permissions};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::error::{IoResultExt, Result};
use crate::repo::{create_dir, Repo};

/// write `content` to `target` atomically: temp -> fsync -> rename -> fsync dir
///
/// the temp file lives under `.quill/tmp` so a reader never observes a
/// partially written target. `mode` is applied before the rename.
pub fn write_atomic(repo: &Repo, target: &Path, content: &[u8], mode: u32) -> Result<()> {
    let tmp_dir = repo.tmp_path();
    create_dir(&tmp_dir)?;

    let tmp_path = tmp_dir.join(uuid::Uuid::new_v4().to_string());
    {
        let mut tmp_file = File::create(&tmp_path).with_write_path(&tmp_path)?;
        tmp_file.write_all(content).with_write_path(&tmp_path)?;
        tmp_file.sync_all().with_write_path(&tmp_path)?;
    }
    fs::set_permissions(&tmp_path, Permissions::from_mode(mode)).with_write_path(&tmp_path)?;

    if let Err(e) = fs::rename(&tmp_path, target).with_write_path(target) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    if let Some(parent) = target.parent() {
        fsync_dir(parent)?;
    }

    Ok(())
}

/// fsync a directory
pub fn fsync_dir(path: &Path) -> Result<()> {
    let dir = File::open(path).with_write_path(path)?;
    dir.sync_all().with_write_path(path)?;
    Ok(())
}
