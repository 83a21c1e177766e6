use std::fmt;
use std::path::PathBuf;

use crate::Hash;

/// error type for quill operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a quill repository (or any of the parent directories): {0}")]
    NotARepository(PathBuf),

    #[error("repository already exists at {0}")]
    RepoExists(PathBuf),

    #[error("path escapes the repository: {0}")]
    PathTraversal(PathBuf),

    #[error("path is inside the repository metadata directory: {0}")]
    ReservedPath(PathBuf),

    #[error("not a regular file: {0}")]
    NotRegularFile(PathBuf),

    #[error("object not found: {0}")]
    ObjectNotFound(Hash),

    #[error("corrupt object: {0} does not describe itself")]
    CorruptObject(Hash),

    #[error("commit history revisits {0}")]
    CorruptHistory(Hash),

    #[error("index at {path} is corrupt: {source}")]
    IndexCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to deserialize object {hash}: {source}")]
    Deserialize {
        hash: Hash,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid tree {0}: no entries field")]
    InvalidTree(Hash),

    #[error("serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("read error at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write error at {path}: {source}")]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no commits yet")]
    NoCommits,

    #[error("no changes staged for commit")]
    NothingStaged,

    #[error("commit message cannot be empty")]
    EmptyMessage,

    #[error("invalid hash hex: {0}")]
    InvalidHashHex(String),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("user config error: {0}")]
    UserConfig(String),

    #[error("lock contention on repository")]
    LockContention,

    #[error("commit failed while {step}: {source}")]
    Commit {
        step: CommitStep,
        #[source]
        source: Box<Error>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// stage of the commit sequence, used to tag failures
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitStep {
    BuildTree,
    ReadHead,
    Serialize,
    StoreCommit,
    UpdateHead,
    ClearIndex,
}

impl fmt::Display for CommitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CommitStep::BuildTree => "building tree",
            CommitStep::ReadHead => "reading HEAD",
            CommitStep::Serialize => "serializing commit",
            CommitStep::StoreCommit => "storing commit object",
            CommitStep::UpdateHead => "updating HEAD",
            CommitStep::ClearIndex => "clearing staged flags",
        };
        f.write_str(s)
    }
}

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_read_path(self, path: impl Into<PathBuf>) -> Result<T>;
    fn with_write_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_read_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Read {
            path: path.into(),
            source,
        })
    }

    fn with_write_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::StorageWrite {
            path: path.into(),
            source,
        })
    }
}

/// helper to tag a failure with the commit step it happened in
pub trait CommitStepExt<T> {
    fn during(self, step: CommitStep) -> Result<T>;
}

impl<T> CommitStepExt<T> for Result<T> {
    fn during(self, step: CommitStep) -> Result<T> {
        self.map_err(|source| Error::Commit {
            step,
            source: Box::new(source),
        })
    }
}
