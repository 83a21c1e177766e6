use std::fs::{DirBuilder, File};
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};

use nix::fcntl::{Flock, FlockArg};
use tracing::{debug, info};

use crate::config::UserConfig;
use crate::error::{Error, IoResultExt, Result};

/// name of the metadata directory at the repository root
pub const QUILL_DIR: &str = ".quill";

/// permissions for directories created under `.quill`
pub(crate) const DIR_MODE: u32 = 0o750;

/// a quill repository, identified by its working tree root
pub struct Repo {
    root: PathBuf,
}

impl Repo {
    /// initialize a new repository at the given working tree root
    pub fn init(path: &Path, user: &UserConfig) -> Result<Self> {
        let quill = path.join(QUILL_DIR);
        if quill.exists() {
            return Err(Error::RepoExists(path.to_path_buf()));
        }

        // create directory structure
        for dir in [quill.clone(), quill.join("objects"), quill.join("config")] {
            create_dir(&dir)?;
        }

        let repo = Self::open(path)?;
        user.save(&repo)?;

        info!("initialized empty repository in {}", quill.display());
        Ok(repo)
    }

    /// open an existing repository rooted exactly at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if !path.join(QUILL_DIR).is_dir() {
            return Err(Error::NotARepository(path.to_path_buf()));
        }

        let root = path.canonicalize().with_read_path(path)?;
        Ok(Self { root })
    }

    /// find the nearest ancestor of `start` (inclusive) holding a `.quill` directory
    pub fn discover(start: &Path) -> Result<Self> {
        let start = start.canonicalize().with_read_path(start)?;

        for dir in start.ancestors() {
            if dir.join(QUILL_DIR).is_dir() {
                debug!("found repository at {}", dir.display());
                return Ok(Self {
                    root: dir.to_path_buf(),
                });
            }
        }

        Err(Error::NotARepository(start))
    }

    /// working tree root (canonical)
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// path to the `.quill` directory
    pub fn quill_path(&self) -> PathBuf {
        self.root.join(QUILL_DIR)
    }

    /// path to objects directory
    pub fn objects_path(&self) -> PathBuf {
        self.quill_path().join("objects")
    }

    /// path to the staging index file
    pub fn index_path(&self) -> PathBuf {
        self.quill_path().join("index")
    }

    /// path to the history pointer file
    pub fn head_path(&self) -> PathBuf {
        self.quill_path().join("HEAD")
    }

    /// path to the user identity file
    pub fn user_config_path(&self) -> PathBuf {
        self.quill_path().join("config").join("user")
    }

    /// path to tmp directory (for atomic writes)
    pub fn tmp_path(&self) -> PathBuf {
        self.quill_path().join("tmp")
    }

    /// path to lock file
    pub fn lock_path(&self) -> PathBuf {
        self.quill_path().join("lock")
    }

    /// acquire exclusive lock on repository
    /// returns a guard that releases the lock on drop
    pub fn lock(&self) -> Result<RepoLock> {
        let lock_path = self.lock_path();
        let file = File::create(&lock_path).with_write_path(&lock_path)?;

        let flock = Flock::lock(file, FlockArg::LockExclusiveNonblock)
            .map_err(|_| Error::LockContention)?;

        Ok(RepoLock { flock })
    }

    /// try to acquire exclusive lock, returning None if already locked
    pub fn try_lock(&self) -> Result<Option<RepoLock>> {
        let lock_path = self.lock_path();
        let file = File::create(&lock_path).with_write_path(&lock_path)?;

        match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(flock) => Ok(Some(RepoLock { flock })),
            Err((_, nix::errno::Errno::EWOULDBLOCK)) => Ok(None),
            Err(_) => Err(Error::LockContention),
        }
    }
}

/// guard that holds repository lock until dropped
pub struct RepoLock {
    #[allow(dead_code)]
    flock: Flock<File>,
}

/// create a directory (and parents) with repository permissions
///
/// an already existing directory counts as success.
pub(crate) fn create_dir(path: &Path) -> Result<()> {
    DirBuilder::new()
        .recursive(true)
        .mode(DIR_MODE)
        .create(path)
        .with_write_path(path)
}
